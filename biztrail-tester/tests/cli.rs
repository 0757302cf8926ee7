use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "biztrail-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_biztrail-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    assert!(content.contains("conservative"));
}

#[test]
fn cli_json_report_covers_requested_runs() {
    let exe = env!("CARGO_BIN_EXE_biztrail-tester");
    let output_path = temp_path("json");
    let output = Command::new(exe)
        .args([
            "--strategies",
            "balanced,random",
            "--seeds",
            "1,2",
            "--iterations",
            "2",
            "--max-months",
            "12",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(report["records"].as_array().map(Vec::len), Some(8));
    assert_eq!(report["aggregates"].as_array().map(Vec::len), Some(2));
}

#[test]
fn cli_markdown_report_to_stdout() {
    let exe = env!("CARGO_BIN_EXE_biztrail-tester");
    let output = Command::new(exe)
        .args([
            "--strategies",
            "conservative",
            "--iterations",
            "1",
            "--max-months",
            "6",
            "--report",
            "markdown",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Business Trail Playthrough Results"));
    assert!(stdout.contains("| Conservative |"));
}

#[test]
fn cli_seeds_from_dashboard_metrics() {
    let exe = env!("CARGO_BIN_EXE_biztrail-tester");
    let metrics_path = temp_path("metrics");
    std::fs::write(
        &metrics_path,
        r#"[{"metric_name": "Cash on Hand", "value": 1000, "category": "cash"},
            {"metric_name": "Operating Expenses", "value": 500000, "category": "expenses"}]"#,
    )
    .expect("write metrics");
    let output = Command::new(exe)
        .args(["--strategies", "balanced", "--iterations", "1", "--report", "json", "--metrics"])
        .arg(&metrics_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json on stdout");
    assert_eq!(report["records"][0]["ending"], "cash_depleted");
    assert_eq!(report["records"][0]["months_played"], 1);
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_biztrail-tester");
    let output = Command::new(exe)
        .args(["--strategies", "reckless"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown strategy"));
}
