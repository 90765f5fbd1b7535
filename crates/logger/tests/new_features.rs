//! Tests for verbose output and the file sink.

use logger::{enable_verbose, error, info, verbose, warn};

#[test]
fn verbose_respects_runtime_flag() {
    verbose!("not shown until enabled");
    enable_verbose();
    verbose!("shown: {}", 42);
}

#[cfg(feature = "file-logging")]
#[test]
fn file_sink_writes_timestamped_tagged_lines() {
    use logger::{close_file_logging, init_file_logging, set_level, Level};
    use std::fs;

    let dir = tempfile_dir();
    let log_path = dir.join("seo_logger_test.log");
    let _ = fs::remove_file(&log_path);

    set_level(Level::Info);
    init_file_logging(&log_path).expect("open log file");

    info!("export finished");
    warn!("subscription fetch failed");
    error!("analysis failed");
    enable_verbose();
    verbose!("verbose line stays on the console");

    close_file_logging();

    let contents = fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("[INFO] export finished"));
    assert!(contents.contains("[WARN] subscription fetch failed"));
    assert!(contents.contains("[ERROR] analysis failed"));
    assert!(!contents.contains("verbose line"));
    for line in contents.lines() {
        let stamp = line.split(' ').next().unwrap_or_default();
        assert!(stamp.ends_with('Z') && stamp.contains('T'), "timestamped: {line}");
    }

    let _ = fs::remove_file(&log_path);
}

#[cfg(feature = "file-logging")]
fn tempfile_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("seo-logger-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
