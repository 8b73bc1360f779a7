use crate::metrics::{ERROR_ADVISORY, RunSummary};

use super::RunSettings;

#[must_use]
pub fn banner(url: &str, settings: &RunSettings) -> String {
    if settings.rps == 0 {
        format!(
            "Hitting URL {} with {} workers and {} requests as fast as I can",
            url,
            settings.workers.get(),
            settings.total.get()
        )
    } else {
        format!(
            "Hitting URL {} with {} workers, {} requests and {} rps",
            url,
            settings.workers.get(),
            settings.total.get(),
            settings.rps
        )
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("{}", summary.summary_line());
    if summary.has_errors() {
        println!("{}", ERROR_ADVISORY);
    }
}
