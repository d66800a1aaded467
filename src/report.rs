//! Terminal presentation of a benchmark run: result list and bar chart.

use crate::harness::BenchmarkResult;

const CHART_WIDTH: usize = 40;

pub fn format_time_ms(time_ms: f64) -> String {
    format!("{:.3} ms", time_ms)
}

/// Prints one line per result: name, digest (or the error sentinel), time.
/// Failed strategies keep their slot so the list length always matches the
/// registry.
pub fn print_results(results: &[BenchmarkResult]) {
    println!("Results:");
    for result in results {
        if result.is_failure() {
            println!("  {}: {} (failed)", result.name, result.hash);
        } else {
            println!(
                "  {}: {} ({})",
                result.name,
                result.hash,
                format_time_ms(result.time_ms)
            );
        }
    }
}

/// Renders a bar chart keyed by strategy name, bar length proportional to
/// elapsed time scaled against the slowest strategy.
pub fn render_chart(results: &[BenchmarkResult]) -> String {
    let name_width = results.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let max_time = results
        .iter()
        .filter(|r| !r.is_failure())
        .map(|r| r.time_ms)
        .fold(0.0f64, f64::max);

    let mut chart = String::from("Elapsed time per strategy:\n");
    for result in results {
        if result.is_failure() {
            chart.push_str(&format!("{:<width$}  failed\n", result.name, width = name_width));
            continue;
        }

        let bar_len = if max_time > 0.0 {
            let scaled = (result.time_ms / max_time * CHART_WIDTH as f64).round() as usize;
            scaled.clamp(1, CHART_WIDTH)
        } else {
            0
        };

        chart.push_str(&format!(
            "{:<name_width$}  [{:<chart_width$}] {}\n",
            result.name,
            "=".repeat(bar_len),
            format_time_ms(result.time_ms),
            name_width = name_width,
            chart_width = CHART_WIDTH,
        ));
    }
    chart
}
