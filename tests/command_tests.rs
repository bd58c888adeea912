use flate2::write::GzEncoder;
use flate2::Compression;
use route_stats::commands::{execute_analyze, validate_args, AnalyzeArgs};
use route_stats::output::read_report;
use route_stats::utils::config::AnalyzerConfig;
use route_stats::utils::error::{FormatError, InputError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const LOG: &str = concat!(
    r#"10.0.0.1 - - [21/Aug/2014:00:10:14 +0200] "GET /shop/42 HTTP/1.1" 200 10 "-" "ua""#,
    "\n",
    r#"10.0.0.2 - - [21/Aug/2014:00:10:15 +0200] "GET /shop/17?ref=home HTTP/1.1" 200 10 "-" "ua""#,
    "\n",
    r#"10.0.0.3 - - [21/Aug/2014:00:10:16 +0200] "GET /missing HTTP/1.1" 404 10 "-" "ua""#,
    "\n",
);

fn args_for(path: &Path) -> AnalyzeArgs {
    AnalyzeArgs {
        log_file: path.to_path_buf(),
        print_report: false,
        ..Default::default()
    }
}

fn plain_log(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_analyze_plain_log() {
    let log = plain_log(LOG);
    let analysis = execute_analyze(&args_for(log.path())).unwrap();

    assert_eq!(analysis.format_name.as_deref(), Some("combined"));
    assert_eq!(analysis.lines_read, 3);
    assert_eq!(analysis.parse_errors, 0);

    let routes: Vec<&str> = analysis.rows.iter().map(|r| r.route.as_str()).collect();
    assert_eq!(routes, vec!["/missing", "/shop/xxx"]);
}

#[test]
fn test_analyze_gzip_log_with_json_report() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("access.log.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(LOG.as_bytes()).unwrap();
    std::fs::write(&log_path, encoder.finish().unwrap()).unwrap();

    let json_path = temp_dir.path().join("report.json");
    let args = AnalyzeArgs {
        output_json: Some(json_path.clone()),
        ..args_for(&log_path)
    };
    let analysis = execute_analyze(&args).unwrap();
    assert_eq!(analysis.summary.total_calls, 3);

    let report = read_report(&json_path).unwrap();
    assert_eq!(report.sections[1].rows[0].route, "/missing");
}

#[test]
fn test_corrupt_gzip_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("access.log.gz");
    std::fs::write(&log_path, LOG).unwrap();

    let err = execute_analyze(&args_for(&log_path)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::DecompressFailed { .. })
    ));
}

#[test]
fn test_unrecognized_format_is_fatal() {
    let log = plain_log("this is not an access log\n");

    let err = execute_analyze(&args_for(log.path())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FormatError>(),
        Some(FormatError::Unrecognized { .. })
    ));
}

#[test]
fn test_empty_log_yields_no_rows() {
    let log = plain_log("");

    let analysis = execute_analyze(&args_for(log.path())).unwrap();
    assert!(analysis.rows.is_empty());
    assert_eq!(analysis.format_name, None);
    assert_eq!(analysis.summary.total_calls, 0);
}

#[test]
fn test_explicit_custom_template() {
    let log = plain_log("GET /a/b 200\nGET /a/c 500\n");
    let args = AnalyzeArgs {
        format: Some("$request_line_is_not_used".to_string()),
        ..args_for(log.path())
    };
    assert!(execute_analyze(&args).is_err());

    let args = AnalyzeArgs {
        format: Some(r"(?P<url>/\S*) $status".to_string()),
        config: AnalyzerConfig::new(10, 1),
        ..args_for(log.path())
    };
    let analysis = execute_analyze(&args).unwrap();
    assert_eq!(analysis.format_name.as_deref(), Some("custom"));
    assert_eq!(analysis.summary.errors_5xx, 1);
}

#[test]
fn test_validate_args_rejects_zero_top() {
    let args = AnalyzeArgs {
        log_file: "access.log".into(),
        config: AnalyzerConfig::new(0, 10),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}
