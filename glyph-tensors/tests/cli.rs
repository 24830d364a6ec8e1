//! Running the `glyph-tensors` binary.

use std::process::Command;

#[test]
fn print_paths_goes_to_stderr() {
    let dir = std::env::temp_dir().join(format!("glyph-tensors-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let font_path = dir.join("Simple.ttf");
    std::fs::write(&font_path, font_test_data::SIMPLE_GLYF).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_glyph-tensors"))
        .args(["tensors", "--print-paths", "--seed", "7"])
        .arg(&font_path)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Simple.ttf"));
    // stdout holds exactly one JSON record and nothing else
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["record"]["variations"], serde_json::json!([0.0]));
    assert!(record["diagnostics"]["rows"].as_u64().unwrap() > 0);

    std::fs::remove_dir_all(&dir).unwrap();
}
