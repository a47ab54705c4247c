use std::time::Instant;

use thiserror::Error;

use crate::capture::domain::frame_source::{CaptureError, FrameSource, OpenSource};
use crate::detection::domain::face_detector::FaceDetector;
use crate::display::domain::frame_display::FrameDisplay;
use crate::overlay::domain::overlay_compositor::{CompositeOutcome, OverlayCompositor};
use crate::pipeline::session_logger::SessionLogger;
use crate::shared::constants::STOP_KEY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Stopped | SessionState::Failed)
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("camera {index} is unavailable: {reason}")]
    DeviceUnavailable { index: i32, reason: String },
    #[error("failed to load asset: {0}")]
    AssetLoadFailure(String),
    #[error("frame capture failed: {0}")]
    CaptureFailed(String),
    #[error("face detection failed: {0}")]
    Detection(String),
    #[error("sticker compositing failed: {0}")]
    Composite(String),
    #[error("display failed: {0}")]
    Display(String),
    #[error("session already finished in state {0:?}")]
    AlreadyFinished(SessionState),
}

impl From<CaptureError> for SessionError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::DeviceUnavailable { index, reason } => {
                SessionError::DeviceUnavailable { index, reason }
            }
            CaptureError::CaptureFailed(reason) => SessionError::CaptureFailed(reason),
        }
    }
}

/// Counters reported when a session ends on the stop key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub state: SessionState,
    pub frames_processed: usize,
    pub faces_composited: usize,
    pub faces_skipped: usize,
}

impl SessionSummary {
    fn new() -> Self {
        Self {
            state: SessionState::Running,
            frames_processed: 0,
            faces_composited: 0,
            faces_skipped: 0,
        }
    }
}

/// Capture, detect, composite and display loop for one camera.
///
/// The session owns its camera and window. Both are released on every exit
/// path, and a session that has stopped or failed cannot be run again.
pub struct OverlaySession {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    compositor: Box<dyn OverlayCompositor>,
    display: Box<dyn FrameDisplay>,
    logger: Box<dyn SessionLogger>,
    stop_key: char,
    state: SessionState,
}

impl OverlaySession {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        compositor: Box<dyn OverlayCompositor>,
        display: Box<dyn FrameDisplay>,
        logger: Box<dyn SessionLogger>,
    ) -> Self {
        Self {
            source,
            detector,
            compositor,
            display,
            logger,
            stop_key: STOP_KEY,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs until the stop key is pressed or a collaborator fails.
    pub fn run(&mut self, device_index: i32) -> Result<SessionSummary, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyFinished(self.state));
        }

        let result = self.run_loop(device_index);
        self.display.close();

        match result {
            Ok(mut summary) => {
                self.state = SessionState::Stopped;
                summary.state = self.state;
                self.logger.summary();
                Ok(summary)
            }
            Err(e) => {
                self.state = SessionState::Failed;
                log::error!("Session failed: {e}");
                self.logger.summary();
                Err(e)
            }
        }
    }

    fn run_loop(&mut self, device_index: i32) -> Result<SessionSummary, SessionError> {
        let Self {
            source,
            detector,
            compositor,
            display,
            logger,
            stop_key,
            state,
        } = self;

        let mut camera = OpenSource::open(source.as_mut(), device_index)?;
        *state = SessionState::Running;
        let info = camera.info();
        logger.info(&format!(
            "Session started on camera {device_index} ({}x{} @ {:.1} fps); press '{stop_key}' to quit",
            info.width, info.height, info.fps
        ));

        let mut summary = SessionSummary::new();
        loop {
            let t = Instant::now();
            let mut frame = camera.next_frame()?;
            logger.timing("capture", elapsed_ms(t));

            let t = Instant::now();
            let gray = frame.to_grayscale();
            let faces = detector
                .detect(&gray)
                .map_err(|e| SessionError::Detection(e.to_string()))?;
            logger.timing("detect", elapsed_ms(t));
            logger.metric("faces", faces.len() as f64);

            let t = Instant::now();
            for face in &faces {
                let outcome = compositor
                    .composite(&mut frame, face)
                    .map_err(|e| SessionError::Composite(e.to_string()))?;
                match outcome {
                    CompositeOutcome::Applied => summary.faces_composited += 1,
                    CompositeOutcome::Skipped { reason } => {
                        log::debug!("Frame {}: face skipped ({reason})", frame.index());
                        summary.faces_skipped += 1;
                    }
                }
            }
            logger.timing("composite", elapsed_ms(t));

            let t = Instant::now();
            display
                .show(&frame)
                .map_err(|e| SessionError::Display(e.to_string()))?;
            let key = display
                .poll_key()
                .map_err(|e| SessionError::Display(e.to_string()))?;
            logger.timing("display", elapsed_ms(t));

            summary.frames_processed += 1;
            logger.progress(summary.frames_processed);

            if key == Some(*stop_key) {
                logger.info(&format!(
                    "Stop key pressed after {} frames",
                    summary.frames_processed
                ));
                return Ok(summary);
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
