use dataforge_generate::GenerationReport;
use tracing::info;

const LISTED_FILES: usize = 5;
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

pub fn log_report(report: &GenerationReport) {
    info!(
        event = "run_finished",
        files = report.files.len(),
        lines = report.lines_written,
        size = %format_bytes(report.bytes_written),
        duration_ms = report.duration_ms,
        "generation finished"
    );
    for file in report.files.iter().take(LISTED_FILES) {
        info!(path = %file.path.display(), size = %format_bytes(file.bytes), "created");
    }
    if report.files.len() > LISTED_FILES {
        info!("... and {} more", report.files.len() - LISTED_FILES);
    }
}

/// Human-readable size with one decimal, in 1024 steps up to TB.
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}
