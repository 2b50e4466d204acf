//! Best-effort process virtual-memory size, for the end-of-run
//! diagnostic line. Only available on Linux, where it's read from
//! `/proc/self/status`; elsewhere this returns `None` and the driver
//! logs a warning and reports 0.0 MB instead of failing the run.

/// Process virtual size in megabytes, or `None` if it couldn't be read.
pub fn process_vsize_mb() -> Option<f64> {
    read_vsize_kb(LINUX_STATUS_PATH).map(|kb| kb / 1024.0)
}

#[cfg(target_os = "linux")]
const LINUX_STATUS_PATH: &str = "/proc/self/status";

#[cfg(not(target_os = "linux"))]
const LINUX_STATUS_PATH: &str = "";

fn read_vsize_kb(path: &str) -> Option<f64> {
    if path.is_empty() {
        return None;
    }

    let status = std::fs::read_to_string(path).ok()?;
    parse_vsize_kb(&status)
}

fn parse_vsize_kb(status: &str) -> Option<f64> {
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmSize:") {
            let digits = rest.trim().trim_end_matches("kB").trim();
            return digits.parse().ok();
        }
    }
    None
}
