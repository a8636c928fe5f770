use std::fs;

use log::{Level, Record};
use mirrorgrid::logger::{dispatch, LogBuffer, LogLevel};
use tempfile::TempDir;

fn emit(logger: &dyn log::Log, level: Level, message: &str) {
    logger.log(
        &Record::builder()
            .level(level)
            .target("mirrorgrid::tests")
            .args(format_args!("{}", message))
            .build(),
    );
}

#[test]
fn test_levels_are_a_set() {
    let buffer = LogBuffer::new();
    let (_, logger) = dispatch(&[LogLevel::Error, LogLevel::Debug], &buffer, None)
        .unwrap()
        .into_log();

    emit(logger.as_ref(), Level::Info, "info is not listed");
    emit(logger.as_ref(), Level::Error, "error is listed");
    emit(logger.as_ref(), Level::Trace, "debug maps to trace");

    let logs = buffer.get_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].ends_with("TRACE debug maps to trace"));
    assert!(logs[1].ends_with("ERROR error is listed"));
}

#[test]
fn test_default_levels_drop_debug() {
    let buffer = LogBuffer::new();
    let (_, logger) = dispatch(&LogLevel::default_levels(), &buffer, None)
        .unwrap()
        .into_log();

    emit(logger.as_ref(), Level::Trace, "hidden");
    emit(logger.as_ref(), Level::Debug, "shown");

    assert_eq!(buffer.len(), 1);
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("logs").join("mirrorgrid.log");
    let buffer = LogBuffer::new();
    let (_, logger) = dispatch(&[LogLevel::Warn], &buffer, Some(path.clone()))
        .unwrap()
        .into_log();

    emit(logger.as_ref(), Level::Warn, "Test message with file");
    logger.flush();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("Test message with file"));
    assert!(content.contains("WARN"));
}
