use fx_ir::Location;
use pretty_assertions::assert_eq;

use super::*;
use crate::ErrorCode;

fn error_at(line: u32, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(message)
        .at(&Location::new("test.fx", line))
}

#[test]
fn counts_errors_and_warnings() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.has_errors().is_none());

    queue.emit_warning(Diagnostic::warning(ErrorCode::W5001).with_message("no strategy"));
    assert!(queue.has_errors().is_none());
    assert_eq!(queue.warning_count(), 1);

    let _ = queue.emit_error(error_at(3, "missing"));
    assert!(queue.has_errors().is_some());
    assert_eq!(queue.error_count(), 1);
}

#[test]
fn identical_diagnostics_are_deduplicated() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(3, "same")));
    assert!(!queue.add(error_at(3, "same")));
    assert!(queue.add(error_at(3, "different")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn unlimited_config_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    assert!(queue.add(error_at(3, "same")));
    assert!(queue.add(error_at(3, "same")));
    assert_eq!(queue.flush().len(), 2);
}

#[test]
fn errors_past_limit_are_counted_not_kept() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: true,
    });
    for line in 1..=4 {
        let _ = queue.emit_error(error_at(line, "boom"));
    }
    assert!(queue.limit_reached());
    assert_eq!(queue.error_count(), 4);
    assert_eq!(queue.peek().count(), 2);
}

#[test]
fn flush_sorts_by_location_and_resets() {
    let mut queue = DiagnosticQueue::new();
    let _ = queue.emit_error(error_at(9, "late"));
    let _ = queue.emit_error(error_at(2, "early"));
    let _ = queue.emit_error(Diagnostic::error(ErrorCode::E9001).with_message("nowhere"));

    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["nowhere", "early", "late"]);
    assert_eq!(queue.error_count(), 0);
    assert!(queue.has_errors().is_none());
}

#[test]
fn merge_moves_diagnostics_and_counts() {
    let mut main = DiagnosticQueue::new();
    let _ = main.emit_error(error_at(1, "first"));

    let mut worker = main.fork();
    let _ = worker.emit_error(error_at(5, "link failed"));
    worker.emit_warning(Diagnostic::warning(ErrorCode::W5001).with_message("stub"));

    main.merge(worker);
    assert_eq!(main.error_count(), 2);
    assert_eq!(main.warning_count(), 1);
    assert_eq!(main.peek().count(), 3);
}

#[test]
fn merge_carries_errors_dropped_by_the_worker() {
    let config = DiagnosticConfig {
        error_limit: 1,
        deduplicate: false,
    };
    let mut main = DiagnosticQueue::with_config(config);
    let mut worker = main.fork();
    let _ = worker.emit_error(error_at(1, "kept"));
    let _ = worker.emit_error(error_at(2, "dropped"));

    main.merge(worker);
    assert_eq!(main.error_count(), 2);
    assert_eq!(main.peek().count(), 1);
    assert!(main.limit_reached());
}
