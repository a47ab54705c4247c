use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::OPENCV_HAARCASCADE_DIRS;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("could not determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model {name} is missing after download to {path}")]
    Missing { name: String, path: PathBuf },
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Retrieves a remote model into a local file.
pub trait ModelFetcher: Send {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<(), ModelResolveError>;
}

/// Blocking HTTP download through `reqwest`.
///
/// The body is streamed into `<dest>.part` and renamed on success; a failed
/// download leaves neither file behind.
pub struct HttpModelFetcher;

impl ModelFetcher for HttpModelFetcher {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<(), ModelResolveError> {
        let temp_path = dest.with_extension("part");

        let result = download_inner(url, dest, &temp_path, progress);

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        result
    }
}

/// Locates a detector model on disk, downloading it as a last resort.
///
/// Resolution order:
/// 1. Working directory
/// 2. Bundled data directories of the vision library installation
/// 3. Download from URL into the working directory
///
/// Every successful lookup yields an absolute path to an existing file.
pub struct ModelResolver {
    working_dir: PathBuf,
    bundled_dirs: Vec<PathBuf>,
    fetcher: Box<dyn ModelFetcher>,
    progress: Option<ProgressFn>,
}

impl ModelResolver {
    pub fn new(working_dir: &Path, bundled_dirs: Vec<PathBuf>) -> Result<Self, ModelResolveError> {
        Ok(Self {
            working_dir: absolutize(working_dir)?,
            bundled_dirs,
            fetcher: Box::new(HttpModelFetcher),
            progress: None,
        })
    }

    /// Resolver rooted at the process working directory, searching the
    /// well-known OpenCV cascade directories.
    pub fn from_current_dir() -> Result<Self, ModelResolveError> {
        let cwd = std::env::current_dir().map_err(ModelResolveError::WorkingDir)?;
        Self::new(&cwd, bundled_cascade_dirs())
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn ModelFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn resolve(&self, name: &str, url: &str) -> Result<PathBuf, ModelResolveError> {
        let local_path = self.working_dir.join(name);
        if local_path.is_file() {
            log::info!("Using model from working directory: {}", local_path.display());
            return Ok(local_path);
        }

        for dir in &self.bundled_dirs {
            let bundled_path = dir.join(name);
            if bundled_path.is_file() {
                let path = absolutize(&bundled_path)?;
                log::info!("Using bundled model: {}", path.display());
                return Ok(path);
            }
        }

        log::info!("'{name}' not found locally, downloading from {url}");
        self.fetcher
            .fetch(url, &local_path, self.progress.as_ref())?;
        if !local_path.is_file() {
            return Err(ModelResolveError::Missing {
                name: name.to_string(),
                path: local_path,
            });
        }
        log::info!("Downloaded {name} to {}", local_path.display());
        Ok(local_path)
    }
}

/// Cascade directories to search: the one reported by the OpenCV
/// installation itself (when built with `opencv`), then common prefixes.
pub fn bundled_cascade_dirs() -> Vec<PathBuf> {
    let common: Vec<PathBuf> = OPENCV_HAARCASCADE_DIRS.iter().map(PathBuf::from).collect();
    library_cascade_dir()
        .filter(|dir| !common.contains(dir))
        .into_iter()
        .chain(common)
        .collect()
}

#[cfg(feature = "opencv")]
fn library_cascade_dir() -> Option<PathBuf> {
    let relative = format!(
        "haarcascades/{}",
        crate::shared::constants::CASCADE_MODEL_NAME
    );
    match opencv::core::find_file(&relative, false, true) {
        Ok(found) if !found.is_empty() => {
            let dir = Path::new(&found).parent()?.to_path_buf();
            log::debug!("OpenCV reports cascade directory {}", dir.display());
            Some(dir)
        }
        Ok(_) => None,
        Err(e) => {
            log::debug!("OpenCV could not locate {relative}: {e}");
            None
        }
    }
}

#[cfg(not(feature = "opencv"))]
fn library_cascade_dir() -> Option<PathBuf> {
    None
}

fn absolutize(path: &Path) -> Result<PathBuf, ModelResolveError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ModelResolveError::WorkingDir)?;
    Ok(cwd.join(path))
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<&ProgressFn>,
) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let write_err = |path: &Path, e: std::io::Error| ModelResolveError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = fs::File::create(temp_path).map_err(|e| write_err(temp_path, e))?;

    let mut reader = response;
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| write_err(temp_path, e))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .map_err(|e| write_err(temp_path, e))?;
        downloaded += n as u64;
        if let Some(cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(|e| write_err(temp_path, e))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| write_err(dest, e))?;

    Ok(())
}
