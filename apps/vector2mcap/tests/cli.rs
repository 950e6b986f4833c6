use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vector2mcap"))
}

#[test]
fn converts_matching_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("a.out"),
        "{\"metric\":{\"name\":\"c1\",\"timestamp\":\"2025-01-01T00:00:00Z\",\"counter\":{\"value\":3}}}\nnot json\n",
    )
    .expect("write");
    let output = dir.path().join("nested/out.mcap");

    let result = binary()
        .arg(format!("{}/*.out", dir.path().display()))
        .arg("-o")
        .arg(&output)
        .arg("--json")
        .env_remove("V2M_COMPRESSION")
        .env_remove("V2M_PROGRESS_INTERVAL")
        .output()
        .expect("run");

    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert!(output.exists());
    let summary: serde_json::Value = serde_json::from_slice(&result.stdout).expect("summary json");
    assert_eq!(summary["written"], 1);
    assert_eq!(summary["errored"], 1);
    assert_eq!(summary["observed"], 2);
}

#[test]
fn no_inputs_exits_non_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.mcap");
    let result = binary()
        .arg(format!("{}/*.missing", dir.path().display()))
        .arg("-o")
        .arg(&output)
        .output()
        .expect("run");

    assert!(!result.status.success());
    assert!(!output.exists());
}
