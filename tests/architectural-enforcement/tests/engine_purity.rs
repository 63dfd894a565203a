//! Integration Test: Face Engine Purity
//!
//! The engine runs its frame work under a lock with a 20 ms budget. Anything
//! that can stall (sleeping, blocking file or network I/O) or abort (unwrap,
//! expect) in that code path shows up as dropped frames or a dead display.
//!
//! **Policy**:
//! - No `thread::sleep` / `tokio::time::sleep` in `face/core/src`
//! - No `std::fs` outside `config.rs`, no `std::net` anywhere
//! - No `.unwrap()` / `.expect(` in production code of either crate

use architectural_enforcement::{is_allowed, production_lines, workspace_root, SourceLine};

fn report(title: &str, violations: &[SourceLine]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s). Fix these before merging!", violations.len());
}

#[test]
fn test_no_sleep_in_engine() {
    let violations: Vec<_> = production_lines(&workspace_root().join("face/core/src"))
        .into_iter()
        .filter(|l| l.code.contains("thread::sleep") || l.code.contains("time::sleep"))
        .collect();
    report("Sleep calls found in the face engine", &violations);
}

#[test]
fn test_no_blocking_io_in_engine() {
    let violations: Vec<_> = production_lines(&workspace_root().join("face/core/src"))
        .into_iter()
        .filter(|l| {
            (l.code.contains("std::fs") && !is_allowed(l, &["config.rs"]))
                || l.code.contains("std::net")
        })
        .collect();
    report("Blocking I/O found in the face engine", &violations);
}

#[test]
fn test_no_panicking_error_handling() {
    let root = workspace_root();
    let violations: Vec<_> = ["face/core/src", "tui/src"]
        .iter()
        .flat_map(|dir| production_lines(&root.join(dir)))
        .filter(|l| l.code.contains(".unwrap()") || l.code.contains(".expect("))
        .collect();
    report("unwrap()/expect() found in production code", &violations);
}

#[test]
fn test_scanner_sees_engine_sources() {
    let lines = production_lines(&workspace_root().join("face/core/src"));
    assert!(lines.iter().any(|l| is_allowed(l, &["engine.rs"])));
}
