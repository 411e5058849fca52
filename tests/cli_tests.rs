mod common;

use common::TestResult;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn tabulate(args: &[&std::path::Path]) -> std::io::Result<std::process::Output> {
    Command::new(env!("CARGO_BIN_EXE_tabulate"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
}

#[test]
fn test_converts_records_to_csv() -> TestResult {
    let dir = TempDir::new()?;
    let data = dir.path().join("data.json");
    let output = dir.path().join("out.csv");
    fs::write(
        &data,
        r#"[{"code": "a", "name": "Alpha"}, {"code": "b", "name": "Beta", "extra": true}]"#,
    )?;

    let result = tabulate(&[&data, &output])?;
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(fs::read_to_string(&output)?, "code,name\na,Alpha\nb,Beta\n");
    Ok(())
}

#[test]
fn test_rejects_input_that_is_not_an_array() -> TestResult {
    let dir = TempDir::new()?;
    let data = dir.path().join("data.json");
    let output = dir.path().join("out.csv");
    fs::write(&data, r#"{"code": "a"}"#)?;

    let result = tabulate(&[&data, &output])?;
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("JSON array"));
    Ok(())
}

#[test]
fn test_missing_input_file_fails() -> TestResult {
    let dir = TempDir::new()?;
    let result = tabulate(&[&dir.path().join("absent.json"), &dir.path().join("out.csv")])?;
    assert!(!result.status.success());
    Ok(())
}
