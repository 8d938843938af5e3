//! Tests for the command runner.
//!
//! These tests point `GITHUB_ACTIONS_BINARY` at fake binaries and apply env
//! files to the process, so they all run serially.

use super::*;
use crate::binary::ACTIONS_BINARY_ENV;
use crate::process::StdioMode;
use crate::testing::RecordingExecutor;
use serial_test::serial;
use std::cell::RefCell;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::rc::Rc;
use tempfile::TempDir;

const USER_VAR: &str = "E2E_RUNNER_TEST_USER";
const TOKEN_VAR: &str = "E2E_RUNNER_TEST_TOKEN";

fn write_env_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("login.env");
    let content = format!("{USER_VAR}=octocat\n{TOKEN_VAR}=abc=123\n");
    fs::write(&path, content).unwrap();
    path
}

fn set_binary(path: &str) {
    unsafe {
        env::set_var(ACTIONS_BINARY_ENV, path);
    }
}

fn reset_env() {
    unsafe {
        env::remove_var(ACTIONS_BINARY_ENV);
        env::remove_var(USER_VAR);
        env::remove_var(TOKEN_VAR);
    }
}

#[test]
#[serial]
fn test_run_applies_env_and_invokes_binary_with_command() {
    reset_env();
    set_binary("/opt/actions/github-actions");
    let dir = TempDir::new().unwrap();
    let env_file = write_env_file(&dir);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in_hook = Rc::clone(&seen);
    let executor = RecordingExecutor::new().on_execute(move |_| {
        let vars = (env::var(USER_VAR).ok(), env::var(TOKEN_VAR).ok());
        seen_in_hook.borrow_mut().push(vars);
    });

    let runner = ActionsRunner::new(&executor);

    runner.run("login", &env_file).unwrap();

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "/opt/actions/github-actions");
    assert_eq!(calls[0].args, vec![OsString::from("login")]);
    assert_eq!(calls[0].stdio, StdioMode::Inherit);

    assert_eq!(
        seen.borrow().as_slice(),
        [(Some("octocat".to_string()), Some("abc=123".to_string()))]
    );
    assert!(env::var_os(USER_VAR).is_none());
    assert!(env::var_os(TOKEN_VAR).is_none());
    reset_env();
}

#[test]
#[serial]
fn test_run_removes_env_when_binary_fails() {
    reset_env();
    set_binary("/opt/actions/github-actions");
    let dir = TempDir::new().unwrap();
    let env_file = write_env_file(&dir);
    let executor = RecordingExecutor::new().respond_with_code(2);
    let runner = ActionsRunner::new(&executor);

    let err = runner.run("push", &env_file).unwrap_err();

    match err {
        Error::CommandFailed { program, outcome } => {
            assert_eq!(program, "/opt/actions/github-actions");
            assert_eq!(outcome.code(), Some(2));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(env::var_os(USER_VAR).is_none());
    assert!(env::var_os(TOKEN_VAR).is_none());
    reset_env();
}

#[test]
#[serial]
fn test_run_removes_env_when_binary_cannot_start() {
    reset_env();
    set_binary("/opt/actions/github-actions");
    let dir = TempDir::new().unwrap();
    let env_file = write_env_file(&dir);
    let executor = RecordingExecutor::new()
        .respond_with_error(io::ErrorKind::NotFound);
    let runner = ActionsRunner::new(&executor);

    let err = runner.run("build", &env_file).unwrap_err();

    assert!(matches!(err, Error::Spawn { .. }));
    assert!(env::var_os(USER_VAR).is_none());
    reset_env();
}

#[test]
#[serial]
fn test_run_missing_env_file_does_not_invoke_binary() {
    reset_env();
    let dir = TempDir::new().unwrap();
    let executor = RecordingExecutor::new();
    let runner = ActionsRunner::new(&executor);

    let missing = dir.path().join("missing.env");
    let err = runner.run("login", missing).unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
    assert!(executor.calls().is_empty());
}

#[test]
#[serial]
fn test_run_malformed_env_file_does_not_apply_anything() {
    reset_env();
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("bad.env");
    let content = format!("{USER_VAR}=octocat\nMALFORMED\n");
    fs::write(&env_file, content).unwrap();
    let executor = RecordingExecutor::new();
    let runner = ActionsRunner::new(&executor);

    let err = runner.run("login", &env_file).unwrap_err();

    assert!(matches!(err, Error::MalformedLine { line_number: 2, .. }));
    assert!(env::var_os(USER_VAR).is_none());
    assert!(executor.calls().is_empty());
}

#[cfg(unix)]
fn write_fake_binary(dir: &TempDir, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("github-actions");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mode = fs::Permissions::from_mode(0o755);
    fs::set_permissions(&path, mode).unwrap();
    path
}

#[cfg(unix)]
#[test]
#[serial]
fn test_run_actions_command_with_real_process() {
    reset_env();
    let dir = TempDir::new().unwrap();
    let env_file = write_env_file(&dir);
    let checks = [
        r#"[ "$1" = "login" ] || exit 4"#.to_string(),
        format!(r#"[ "${USER_VAR}" = "octocat" ] || exit 4"#),
        format!(r#"[ "${TOKEN_VAR}" = "abc=123" ] || exit 4"#),
    ];
    let binary = write_fake_binary(&dir, &checks.join("\n"));
    set_binary(binary.to_str().unwrap());

    run_actions_command("login", &env_file).unwrap();

    assert!(env::var_os(USER_VAR).is_none());
    reset_env();
}

#[cfg(unix)]
#[test]
#[serial]
fn test_run_actions_command_propagates_exit_code() {
    reset_env();
    let dir = TempDir::new().unwrap();
    let env_file = write_env_file(&dir);
    let binary = write_fake_binary(&dir, "exit 4");
    set_binary(binary.to_str().unwrap());

    let err = run_actions_command("push", &env_file).unwrap_err();

    match err {
        Error::CommandFailed { outcome, .. } => assert_eq!(outcome.code(), Some(4)),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(env::var_os(TOKEN_VAR).is_none());
    reset_env();
}
