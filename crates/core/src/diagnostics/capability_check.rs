use crate::shared::constants::{MIN_LOGICAL_CORES, MIN_RAM_GB};

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Minimum host resources needed to run a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirements {
    pub min_ram_gb: u64,
    pub min_cores: usize,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            min_ram_gb: MIN_RAM_GB,
            min_cores: MIN_LOGICAL_CORES,
        }
    }
}

/// Source of host facts for the capability check.
pub trait SystemProbe {
    fn total_memory_bytes(&mut self) -> u64;

    fn logical_cores(&self) -> usize;

    /// Whether the camera can be opened and yields at least one frame.
    /// The device must be released again before returning.
    fn camera_readable(&mut self) -> bool;

    fn os_description(&self) -> String;
}

/// Outcome of one pre-flight run.
#[derive(Clone, Debug, PartialEq)]
pub struct CapabilityReport {
    pub total_memory_bytes: u64,
    pub logical_cores: usize,
    pub camera_readable: bool,
    pub os: String,
    pub requirements: Requirements,
}

impl CapabilityReport {
    pub fn memory_ok(&self) -> bool {
        self.total_memory_bytes >= self.requirements.min_ram_gb * BYTES_PER_GB
    }

    pub fn cores_ok(&self) -> bool {
        self.logical_cores >= self.requirements.min_cores
    }

    pub fn is_compatible(&self) -> bool {
        self.memory_ok() && self.cores_ok() && self.camera_readable
    }
}

/// Probes the host and compares it against `requirements`.
///
/// Stateless apart from the probe; each check is logged on its own line.
pub fn check_capabilities(
    probe: &mut dyn SystemProbe,
    requirements: &Requirements,
) -> CapabilityReport {
    let report = CapabilityReport {
        total_memory_bytes: probe.total_memory_bytes(),
        logical_cores: probe.logical_cores(),
        camera_readable: probe.camera_readable(),
        os: probe.os_description(),
        requirements: *requirements,
    };

    log::info!("Operating system: {}", report.os);
    log::info!(
        "{} Memory: {:.1} GB (need {} GB)",
        verdict(report.memory_ok()),
        report.total_memory_bytes as f64 / BYTES_PER_GB as f64,
        requirements.min_ram_gb
    );
    log::info!(
        "{} CPU cores: {} (need {})",
        verdict(report.cores_ok()),
        report.logical_cores,
        requirements.min_cores
    );
    log::info!("{} Camera readable", verdict(report.camera_readable));

    if report.is_compatible() {
        log::info!("System meets all requirements");
    } else {
        log::warn!("System does not meet the minimum requirements");
    }
    report
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "[PASS]"
    } else {
        "[FAIL]"
    }
}
