//! Hygiene: coding standards enforced at test time.
//!
//! Scans the production sources of the scene engine and its web host for
//! antipatterns. Each pattern has a budget (ideally zero). To add one, fix an
//! existing one first; budgets never grow.

use std::fs;
use std::path::Path;

/// Source roots, relative to the `scene` package directory.
const ROOTS: [&str; 2] = ["src", "../web/src"];

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics: these abort the wasm instance.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or handle the error" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or handle the error" },
    Budget { pattern: "panic!(", max: 0, why: "degrade to an idle or sentinel state" },
    Budget { pattern: "unreachable!(", max: 0, why: "make the state unrepresentable" },
    Budget { pattern: "todo!(", max: 0, why: "stubs do not ship" },
    Budget { pattern: "unimplemented!(", max: 0, why: "stubs do not ship" },
    // Silent loss: discards errors without inspecting them.
    Budget { pattern: "let _ =", max: 0, why: "log or propagate the value" },
    Budget { pattern: ".ok()", max: 0, why: "log or propagate the error" },
    // Output goes through the `log` facade.
    Budget { pattern: "println!(", max: 0, why: "use log::info! and friends" },
    Budget { pattern: "eprintln!(", max: 0, why: "use log::error!" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" },
];

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under every root, excluding `_test.rs` siblings.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    for root in ROOTS {
        collect_rs_files(Path::new(root), &mut files);
    }
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits_for(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|file| (file.path.clone(), file.content.lines().filter(|line| line.contains(pattern)).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "scene sources not found");
}

#[test]
fn antipattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let hits = hits_for(&files, budget.pattern);
        let count: usize = hits.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let detail: Vec<String> = hits.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            failures.push(format!(
                "`{}` budget exceeded: found {count}, max {} ({})\n{}",
                budget.pattern,
                budget.max,
                budget.why,
                detail.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
