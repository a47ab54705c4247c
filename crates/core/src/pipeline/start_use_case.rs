use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::model_resolver::ModelResolver;
use crate::detection::infrastructure::ordered_face_detector::OrderedFaceDetector;
use crate::diagnostics::capability_check::{
    check_capabilities, CapabilityReport, Requirements, SystemProbe,
};
use crate::display::domain::frame_display::FrameDisplay;
use crate::geometry::domain::geometry_solver::GeometrySolver;
use crate::overlay::infrastructure::sticker_compositor::StickerCompositor;
use crate::overlay::infrastructure::sticker_loader::load_sticker;
use crate::pipeline::overlay_session::{OverlaySession, SessionError, SessionSummary};
use crate::pipeline::session_logger::SessionLogger;
use crate::shared::constants::{CASCADE_MODEL_NAME, CASCADE_MODEL_URL};

/// Builds a face detector from a resolved model file.
pub type DetectorFactory =
    Box<dyn FnOnce(&Path) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>>>;

/// Where the cascade model comes from.
pub enum ModelSource {
    /// A user-supplied file; must exist.
    Explicit(PathBuf),
    /// Working directory, OpenCV cascade directories, then download.
    Resolve(ModelResolver),
}

#[derive(Debug)]
pub enum StartOutcome {
    /// The host failed the capability check; nothing was started.
    Declined(CapabilityReport),
    Finished(SessionSummary),
}

/// Entry point of the application: pre-flight, asset loading, session.
pub struct StartUseCase {
    probe: Box<dyn SystemProbe>,
    requirements: Requirements,
    model: ModelSource,
    build_detector: DetectorFactory,
    solver: Box<dyn GeometrySolver>,
    source: Box<dyn FrameSource>,
    display: Box<dyn FrameDisplay>,
    logger: Box<dyn SessionLogger>,
}

impl StartUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        probe: Box<dyn SystemProbe>,
        requirements: Requirements,
        model: ModelSource,
        build_detector: DetectorFactory,
        solver: Box<dyn GeometrySolver>,
        source: Box<dyn FrameSource>,
        display: Box<dyn FrameDisplay>,
        logger: Box<dyn SessionLogger>,
    ) -> Self {
        Self {
            probe,
            requirements,
            model,
            build_detector,
            solver,
            source,
            display,
            logger,
        }
    }

    /// Checks the host, loads the model and sticker, then runs the session
    /// on `device_index` until the stop key.
    ///
    /// An incompatible host is not an error: a warning is logged and
    /// [`StartOutcome::Declined`] is returned without touching any asset.
    pub fn execute(
        mut self,
        sticker_path: &Path,
        device_index: i32,
    ) -> Result<StartOutcome, SessionError> {
        let report = check_capabilities(self.probe.as_mut(), &self.requirements);
        if !report.is_compatible() {
            log::warn!("Not starting the overlay session on this system");
            return Ok(StartOutcome::Declined(report));
        }

        let model_path = resolve_model(&self.model)?;
        log::info!("Using face model {}", model_path.display());
        let detector = (self.build_detector)(&model_path)
            .map_err(|e| SessionError::AssetLoadFailure(e.to_string()))?;

        let sticker =
            load_sticker(sticker_path).map_err(|e| SessionError::AssetLoadFailure(e.to_string()))?;
        let compositor = StickerCompositor::new(sticker, self.solver);

        let mut session = OverlaySession::new(
            self.source,
            Box::new(OrderedFaceDetector::new(detector)),
            Box::new(compositor),
            self.display,
            self.logger,
        );
        session.run(device_index).map(StartOutcome::Finished)
    }
}

fn resolve_model(model: &ModelSource) -> Result<PathBuf, SessionError> {
    match model {
        ModelSource::Explicit(path) => {
            if !path.is_file() {
                return Err(SessionError::AssetLoadFailure(format!(
                    "cascade file not found: {}",
                    path.display()
                )));
            }
            Ok(path.canonicalize().unwrap_or_else(|_| path.clone()))
        }
        ModelSource::Resolve(resolver) => resolver
            .resolve(CASCADE_MODEL_NAME, CASCADE_MODEL_URL)
            .map_err(|e| SessionError::AssetLoadFailure(e.to_string())),
    }
}
