use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use ar_overlay_core::capture::domain::frame_source::FrameSource;
use ar_overlay_core::capture::infrastructure::mirroring_frame_source::MirroringFrameSource;
use ar_overlay_core::capture::infrastructure::opencv_camera::OpencvCamera;
use ar_overlay_core::detection::domain::face_detector::{
    DetectionParams, FaceDetector, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};
use ar_overlay_core::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use ar_overlay_core::detection::infrastructure::model_resolver::ModelResolver;
use ar_overlay_core::diagnostics::capability_check::Requirements;
use ar_overlay_core::diagnostics::infrastructure::host_probe::HostProbe;
use ar_overlay_core::display::infrastructure::highgui_display::HighguiDisplay;
use ar_overlay_core::geometry::infrastructure::dlt_geometry_solver::DltGeometrySolver;
use ar_overlay_core::pipeline::session_logger::LogSessionLogger;
use ar_overlay_core::pipeline::start_use_case::{
    DetectorFactory, ModelSource, StartOutcome, StartUseCase,
};
use ar_overlay_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_STICKER_PATH, MIN_LOGICAL_CORES, MIN_RAM_GB, WINDOW_TITLE,
};

/// Pastes a sticker above every face in the live webcam feed.
#[derive(Parser)]
#[command(name = "ar-overlay")]
struct Cli {
    /// Sticker image to overlay.
    #[arg(default_value = DEFAULT_STICKER_PATH)]
    sticker: PathBuf,

    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: i32,

    /// Haar cascade XML file (skips model lookup and download).
    #[arg(long)]
    cascade: Option<PathBuf>,

    /// Image pyramid scale step of the detector (> 1.0).
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// Neighbouring detections required to keep a face.
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: i32,

    /// Smallest face edge in pixels.
    #[arg(long, default_value = "30")]
    min_size: i32,

    /// Minimum installed memory in GB.
    #[arg(long, default_value_t = MIN_RAM_GB)]
    min_ram_gb: u64,

    /// Minimum number of logical CPU cores.
    #[arg(long, default_value_t = MIN_LOGICAL_CORES)]
    min_cores: usize,
}

impl Cli {
    fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            scale_factor: self.scale_factor,
            min_neighbors: self.min_neighbors,
            min_size: (self.min_size, self.min_size),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let requirements = Requirements {
        min_ram_gb: cli.min_ram_gb,
        min_cores: cli.min_cores,
    };
    let probe = HostProbe::new(
        Box::new(|| Box::new(OpencvCamera::new()) as Box<dyn FrameSource>),
        cli.camera,
    );

    let model = match &cli.cascade {
        Some(path) => ModelSource::Explicit(path.clone()),
        None => ModelSource::Resolve(
            ModelResolver::from_current_dir()?.with_progress(Box::new(download_progress)),
        ),
    };

    let params = cli.detection_params();
    let build_detector: DetectorFactory = Box::new(move |model_path: &Path| {
        let detector = CascadeFaceDetector::new(model_path, params)?;
        Ok(Box::new(detector) as Box<dyn FaceDetector>)
    });

    let source: Box<dyn FrameSource> =
        Box::new(MirroringFrameSource::new(Box::new(OpencvCamera::new())));

    let use_case = StartUseCase::new(
        Box::new(probe),
        requirements,
        model,
        build_detector,
        Box::new(DltGeometrySolver::new()),
        source,
        Box::new(HighguiDisplay::new(WINDOW_TITLE)),
        Box::new(LogSessionLogger::default()),
    );

    match use_case.execute(&cli.sticker, cli.camera)? {
        StartOutcome::Declined(_) => {
            log::warn!("Overlay not started: system requirements not met");
        }
        StartOutcome::Finished(summary) => {
            log::info!(
                "Session ended: {} frames, {} stickers placed, {} faces skipped",
                summary.frames_processed,
                summary.faces_composited,
                summary.faces_skipped
            );
        }
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.camera < 0 {
        return Err(format!("Camera index must be non-negative, got {}", cli.camera).into());
    }
    if let Some(path) = &cli.cascade {
        if !path.is_file() {
            return Err(format!("Cascade file not found: {}", path.display()).into());
        }
    }
    cli.detection_params().validate()?;
    if cli.min_cores == 0 {
        return Err("Minimum core count must be at least 1".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
