//! Integration tests for the `stdtest` command-line interface.

// For now, only compile this for Unix-like platforms (Linux, macOS).
#![cfg(unix)]
#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

const SUM_SCRIPT: &str = "awk '{ s = 0; for (i = 1; i <= NF; i++) s += $i; print s }'\n";

fn stdtest() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("stdtest"));
    cmd.env_remove("STDTEST_LAUNCHER")
        .env_remove("STDTEST_TIMEOUT")
        .env_remove("STDTEST_VERBOSE")
        .env("NO_COLOR", "1");
    cmd
}

struct Fixture {
    dir: assert_fs::TempDir,
}

impl Fixture {
    fn new(script: &str, config: &str) -> Result<Self> {
        let dir = assert_fs::TempDir::new()?;
        dir.child("prog.sh").write_str(script)?;
        dir.child("tests.json").write_str(config)?;
        Ok(Self { dir })
    }

    fn command(&self) -> assert_cmd::Command {
        let mut cmd = stdtest();
        cmd.arg("--launcher")
            .arg("sh")
            .arg("--source-path")
            .arg(self.dir.child("prog.sh").path())
            .arg("--tests-config")
            .arg(self.dir.child("tests.json").path());
        cmd
    }
}

#[test]
fn missing_arguments_print_usage() {
    stdtest()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    stdtest()
        .args(["--source-path", "main.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tests-config"));
}

#[test]
fn passing_suite_exits_cleanly() -> Result<()> {
    let fixture = Fixture::new(
        SUM_SCRIPT,
        r#"[
            {"name": "sample", "input": "1 2 3 4 5", "output": ["15"]},
            {"name": "negative", "input": "-1 -2 0 0 0", "output": ["-3"]}
        ]"#,
    )?;

    fixture.command().assert().success().stderr("");

    Ok(())
}

#[test]
fn verbose_reports_each_case() -> Result<()> {
    let fixture = Fixture::new(
        SUM_SCRIPT,
        r#"[{"name": "sample", "input": "1 2 3 4 5", "output": ["15"]}]"#,
    )?;

    fixture
        .command()
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("[sample]... ok."))
        .stderr(predicate::str::contains("1 succeeded"));

    Ok(())
}

#[test]
fn mismatch_names_case_and_fragment() -> Result<()> {
    let fixture = Fixture::new(
        "cat\n",
        r#"[
            {"name": "echo", "input": "1 2 3 4 5", "output": ["15"]},
            {"name": "unreached", "input": "", "output": []}
        ]"#,
    )?;

    fixture
        .command()
        .arg("--verbose")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[echo]... FAILED."))
        .stderr(predicate::str::contains("\"15\""))
        .stderr(predicate::str::contains("1 2 3 4 5"))
        .stderr(predicate::str::contains("unreached").not());

    Ok(())
}

#[test]
fn failing_target_is_reported() -> Result<()> {
    let fixture = Fixture::new(
        "echo boom >&2\nexit 4\n",
        r#"[{"name": "crashes", "input": "", "output": []}]"#,
    )?;

    fixture
        .command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[crashes]... FAILED."))
        .stderr(predicate::str::contains("boom"));

    Ok(())
}

#[test]
fn malformed_config_runs_nothing() -> Result<()> {
    let fixture = Fixture::new("touch ran\n", r#"[{"name": "x", "input": "#)?;

    fixture
        .command()
        .current_dir(fixture.dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse test config"));

    fixture.dir.child("ran").assert(predicate::path::missing());

    Ok(())
}

#[test]
fn list_prints_selected_cases() -> Result<()> {
    let fixture = Fixture::new(
        "touch ran\n",
        r#"[
            {"name": "sum small", "input": ""},
            {"name": "sum large", "input": ""},
            {"name": "echo", "input": ""}
        ]"#,
    )?;

    fixture
        .command()
        .current_dir(fixture.dir.path())
        .args(["--list", "sum", "--skip", "large"])
        .assert()
        .success()
        .stdout("sum small: test\n");

    fixture.dir.child("ran").assert(predicate::path::missing());

    Ok(())
}

#[test]
fn timeout_fails_hung_target() -> Result<()> {
    let fixture = Fixture::new(
        "sleep 30\n",
        r#"[{"name": "hangs", "input": "", "output": []}]"#,
    )?;

    fixture
        .command()
        .args(["--timeout", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[hangs]... FAILED."))
        .stderr(predicate::str::contains("timed out"));

    Ok(())
}
