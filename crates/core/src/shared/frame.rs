use ndarray::{ArrayView3, ArrayViewMut3};

/// A single camera frame: contiguous pixel bytes in row-major order.
///
/// Color frames are RGB (`channels == 3`); detector input is single-channel
/// luma (`channels == 1`). Conversion from the camera's native layout happens
/// at I/O boundaries only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A black frame of the given geometry.
    pub fn zeroed(width: u32, height: u32, channels: u8, index: usize) -> Self {
        let len = (width as usize) * (height as usize) * (channels as usize);
        Self::new(vec![0; len], width, height, channels, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Flips the frame left-to-right in place.
    ///
    /// Webcams deliver a viewer-facing image; mirroring makes the preview
    /// behave like a mirror for the person in front of the camera.
    pub fn mirror_horizontal(&mut self) {
        let row_len = self.width as usize * self.channels as usize;
        let channels = self.channels as usize;
        if row_len == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_len) {
            let w = row.len() / channels;
            for col in 0..w / 2 {
                let left = col * channels;
                let right = (w - 1 - col) * channels;
                for c in 0..channels {
                    row.swap(left + c, right + c);
                }
            }
        }
    }

    /// Single-channel luma copy using ITU-R BT.601 weights.
    ///
    /// Frames that are already single-channel are cloned unchanged.
    pub fn to_grayscale(&self) -> Frame {
        if self.channels == 1 {
            return self.clone();
        }
        let channels = self.channels as usize;
        let luma = self
            .data
            .chunks_exact(channels)
            .map(|px| {
                let r = px[0] as u32;
                let g = px[1] as u32;
                let b = px[2] as u32;
                // Fixed-point 0.299 / 0.587 / 0.114, rounded.
                ((r * 4899 + g * 9617 + b * 1868 + 8192) >> 14) as u8
            })
            .collect();
        Frame::new(luma, self.width, self.height, 1, self.index)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
