use std::process::Command;

fn warden() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_warden"));
    // Keep ambient credentials out of CLI behavior tests.
    for var in [
        "GITHUB_TOKEN",
        "SLACK_TOKEN",
        "SLACK_CHANNEL",
        "LLM_API_KEY",
        "GROQ_API_KEY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = warden().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("review"));
    assert!(stdout.contains("init"));
}

#[test]
fn review_without_credentials_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = warden()
        .args(["review", "https://github.com/acme/widgets", "7"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GITHUB_TOKEN"), "stderr was: {stderr}");
}

#[test]
fn review_requires_pr_number_argument() {
    let output = warden()
        .args(["review", "https://github.com/acme/widgets"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn config_flag_rejects_missing_file() {
    let output = warden()
        .args(["--config", "/nonexistent/warden.toml", "serve"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
