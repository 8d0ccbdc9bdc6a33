//! Human-readable run summaries

use crate::output::RunReport;
use crate::state::SkipReason;

/// The one-line verdict printed at the end of a run
pub fn summary_line(report: &RunReport) -> String {
    if report.had_failures() {
        format!(
            "Downloaded {} of {} books; some books or pages were skipped, see the log for details",
            report.records.len(),
            report.links_collected
        )
    } else {
        format!("All {} books downloaded", report.records.len())
    }
}

/// Prints the run report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== Run Summary ===\n");

    println!("Catalog:");
    println!("  Last page: {}", report.last_page);
    println!("  Requested pages: {}", report.range);
    println!("  Pages collected: {}", report.pages_fetched.len());
    if let Some(page) = report.boundary_exceeded {
        println!("  Stopped at page {}: past the last catalog page", page);
    }
    println!("  Book links: {}", report.links_collected);
    println!();

    println!("Books:");
    println!(
        "  Fetched: {} ({:.1}%)",
        report.records.len(),
        report.success_rate()
    );
    println!("  Skipped: {}", report.skipped.len());

    let counts = report.skipped_by_reason();
    for reason in [
        SkipReason::Unavailable,
        SkipReason::Transport,
        SkipReason::Extraction,
        SkipReason::Io,
    ] {
        if let Some(count) = counts.get(&reason) {
            println!("    {}: {}", reason, count);
        }
    }
    println!();

    if !report.failed_pages.is_empty() {
        println!("Failed catalog pages:");
        for failure in &report.failed_pages {
            println!("  {} ({}): {}", failure.page, failure.url, failure.error);
        }
        println!();
    }

    if !report.skipped.is_empty() {
        println!("Skipped books:");
        for skipped in &report.skipped {
            println!("  {} [{}]", skipped.url, skipped.reason);
        }
        println!();
    }

    println!("Description: {}", report.description_path.display());
    println!("Duration: {}s", report.duration_seconds());
    println!();
    println!("{}", summary_line(report));
}
