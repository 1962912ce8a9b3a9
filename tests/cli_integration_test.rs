//! Runs the built binary against a small fixture repository.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn designmap(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_designmap"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .env("DESIGNMAP_STORE_DIR", cwd.join("store"))
        .output()
        .expect("Failed to execute designmap")
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        ("repo/README.md", "# Demo\n\nProject Name: Demo\nVersion: 0.3\n"),
        ("repo/src/app.py", "import os\nimport requests\n\ndef foo():\n    pass\n"),
        ("repo/src/util.go", "package util\n\nimport \"github.com/gin-gonic/gin\"\n\nfunc Handler() {}\n"),
    ];
    for (path, body) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, body).unwrap();
    }
    dir
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("designmap exited with {:?}", output.status.code());
    }
}

#[test]
fn test_synthesize_json_to_file() {
    let dir = fixture();
    let out = dir.path().join("doc.json");
    let output = designmap(
        &["synthesize", "repo", "--project-id", "demo", "--output", out.to_str().unwrap()],
        dir.path(),
    );
    assert_success(&output);

    let doc: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["project_id"], "demo");
    assert_eq!(doc["meta"]["document_type"], "system_design_document");
    assert_eq!(doc["modules"][0]["content"]["p_n"], "Demo");
    assert_eq!(doc["modules"][0]["content"]["p_v"], "0.3");
    assert_eq!(doc["tech_stack"]["frameworks"], serde_json::json!(["github.com/gin-gonic/gin"]));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Synthesized"));
}

#[test]
fn test_synthesize_markdown_to_stdout() {
    let dir = fixture();
    let output = designmap(&["synthesize", "repo", "--format", "markdown"], dir.path());
    assert_success(&output);

    let markdown = String::from_utf8(output.stdout).unwrap();
    assert!(markdown.starts_with("# repo\n"));
    assert!(markdown.contains("## Python Module (src/app.py)"));
    assert!(markdown.contains("Functions:\n- foo"));
}

#[test]
fn test_pdf_requires_extended_flag() {
    let dir = fixture();
    let denied = designmap(&["synthesize", "repo", "--format", "pdf"], dir.path());
    assert_eq!(denied.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&denied.stderr).contains("not available"));

    let allowed = designmap(&["synthesize", "repo", "--format", "pdf", "--extended"], dir.path());
    assert_success(&allowed);
    assert!(allowed.stdout.starts_with(b"%PDF-"));
}

#[test]
fn test_convert_round_trip_through_human() {
    let dir = fixture();
    let structured = dir.path().join("doc.json");
    let human = dir.path().join("doc.human.json");
    let back = dir.path().join("doc.back.json");

    assert_success(&designmap(
        &["synthesize", "repo", "-o", structured.to_str().unwrap()],
        dir.path(),
    ));
    assert_success(&designmap(
        &["convert", "--from", "json", "--to", "human", "-i", structured.to_str().unwrap(), "-o", human.to_str().unwrap()],
        dir.path(),
    ));
    assert_success(&designmap(
        &["convert", "--from", "human", "--to", "json", "-i", human.to_str().unwrap(), "-o", back.to_str().unwrap()],
        dir.path(),
    ));

    let read = |p: &Path| -> Value { serde_json::from_str(&fs::read_to_string(p).unwrap()).unwrap() };
    let human_doc = read(&human);
    assert_eq!(human_doc["modules"][0]["content"]["Project Name"], "Demo");
    assert_eq!(read(&back), read(&structured));
}

#[test]
fn test_caller_saves_document_to_store() {
    let dir = fixture();
    let output = designmap(&["synthesize", "repo", "--caller", "alice", "-o", "doc.json"], dir.path());
    assert_success(&output);

    let documents = dir.path().join("store").join("alice").join("documents");
    let saved: Vec<_> = fs::read_dir(documents).unwrap().collect();
    assert_eq!(saved.len(), 1);
}

#[test]
fn test_init_then_config_is_used() {
    let dir = fixture();
    assert_success(&designmap(&["init"], dir.path()));
    assert!(dir.path().join(".designmap.toml").is_file());

    let again = designmap(&["init"], dir.path());
    assert!(!again.status.success());
    assert_success(&designmap(&["init", "--force"], dir.path()));
}

#[test]
fn test_unsupported_conversion_exit_code() {
    let dir = fixture();
    let input = dir.path().join("doc.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();
    let output = designmap(
        &["convert", "--from", "pdf", "--to", "json", "-i", input.to_str().unwrap()],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(2));
}
