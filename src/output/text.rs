//! Plain-text top-N report.
//!
//! ```text
//! ** TOP CALLS **
//! 0. /shop/xxx : 2
//! ** TOP AVG DURATION **
//! 0. /shop/xxx : 0.200s
//! ```

use crate::aggregator::{rank_rows, Metric, ReportRow};
use crate::utils::config::AnalyzerConfig;

/// Render one section: heading plus up to `top_n` ranked rows
pub fn render_section(rows: &[ReportRow], metric: Metric, top_n: usize) -> String {
    let mut out = format!("** {} **\n", metric.title());
    for ranked in rank_rows(rows, metric, top_n) {
        out.push_str(&format!("{}. {} : {}\n", ranked.rank, ranked.route, ranked.value));
    }
    out
}

/// Render all five sections in report order
pub fn render_report(rows: &[ReportRow], config: &AnalyzerConfig) -> String {
    Metric::ALL
        .iter()
        .map(|&metric| render_section(rows, metric, config.num_in_top))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_report() {
        let rows = vec![
            ReportRow {
                route: "/shop/xxx".to_string(),
                calls: 2,
                errors_404: 0,
                errors_5xx: 1,
                total_duration: 0.4,
            },
            ReportRow {
                route: "/missing".to_string(),
                calls: 1,
                errors_404: 1,
                errors_5xx: 0,
                total_duration: 0.25,
            },
        ];

        let report = render_report(&rows, &AnalyzerConfig::new(1, 10));
        assert_eq!(
            report,
            "** TOP CALLS **\n\
             0. /shop/xxx : 2\n\
             ** TOP 404 **\n\
             0. /missing : 1\n\
             ** TOP 5xx **\n\
             0. /shop/xxx : 1\n\
             ** TOP AVG DURATION **\n\
             0. /missing : 0.250s\n\
             ** TOP COST **\n\
             0. /shop/xxx : 0.400s\n"
        );
    }

    #[test]
    fn test_render_empty_report_keeps_headings() {
        let report = render_report(&[], &AnalyzerConfig::default());
        assert_eq!(report.lines().count(), 5);
    }
}
