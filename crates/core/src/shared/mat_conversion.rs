//! Conversions between [`Frame`] and OpenCV `Mat` at the I/O boundary.
//!
//! OpenCV stores color images as BGR; frames are RGB everywhere else.

use opencv::core::{Mat, Scalar, CV_8UC1, CV_8UC3};
use opencv::imgproc;
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Copies a BGR (3-channel) or grayscale (1-channel) 8-bit `Mat` into a frame.
pub fn mat_to_frame(mat: &Mat, index: usize) -> opencv::Result<Frame> {
    let width = mat.cols().max(0) as u32;
    let height = mat.rows().max(0) as u32;

    match mat.typ() {
        t if t == CV_8UC3 => {
            let mut rgb = Mat::default();
            imgproc::cvt_color_def(mat, &mut rgb, imgproc::COLOR_BGR2RGB)?;
            Ok(Frame::new(rgb.data_bytes()?.to_vec(), width, height, 3, index))
        }
        t if t == CV_8UC1 => {
            let owned;
            let continuous = if mat.is_continuous() {
                mat
            } else {
                owned = mat.try_clone()?;
                &owned
            };
            Ok(Frame::new(
                continuous.data_bytes()?.to_vec(),
                width,
                height,
                1,
                index,
            ))
        }
        other => Err(opencv::Error::new(
            opencv::core::StsUnsupportedFormat,
            format!("unsupported Mat type {other}"),
        )),
    }
}

/// Copies a frame into a fresh `Mat`: RGB frames become BGR, gray stays gray.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let rows = frame.height() as i32;
    let cols = frame.width() as i32;
    match frame.channels() {
        1 => {
            let mut gray = Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(0.0))?;
            gray.data_bytes_mut()?.copy_from_slice(frame.data());
            Ok(gray)
        }
        3 => {
            let mut rgb = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))?;
            rgb.data_bytes_mut()?.copy_from_slice(frame.data());
            let mut bgr = Mat::default();
            imgproc::cvt_color_def(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
            Ok(bgr)
        }
        n => Err(opencv::Error::new(
            opencv::core::StsUnsupportedFormat,
            format!("unsupported channel count {n}"),
        )),
    }
}
