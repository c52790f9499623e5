//! Integration tests for `render`, `diff` and `gen-password`.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// render
// ============================================================================

/// A directory is rendered with context from a meta file and --set.
#[test]
fn test_render_directory() {
    let env = TestEnv::new();
    env.write("tpl/app.conf.template", "name={{ name }} port={{ port }}");
    env.write("tpl/README", "plain\n");
    env.write("meta.yml", "name: web\nport: 80\n");

    env.command()
        .args(["render", "tpl", "out", "--meta", "meta.yml", "--set", "port=8080"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 1 templates, copied 1 files"));

    assert_eq!(env.read("out/app.conf"), "name=web port=8080");
    assert_eq!(env.read("out/README"), "plain\n");
}

/// Excluded paths are skipped.
#[test]
fn test_render_exclude() {
    let env = TestEnv::new();
    env.write("tpl/keep.txt", "keep\n");
    env.write("tpl/cache/blob.bin", "blob\n");
    env.write("tpl/notes.pyc", "pyc\n");

    env.command()
        .args(["render", "tpl", "out"])
        .args(["--exclude", "tpl/cache", "--exclude", "tpl/*.pyc"])
        .assert()
        .success();

    assert!(env.exists("out/keep.txt"));
    assert!(!env.exists("out/cache"));
    assert!(!env.exists("out/notes.pyc"));
}

/// Wildcard sources place matches relative to their directory.
#[test]
fn test_render_wildcard() {
    let env = TestEnv::new();
    env.write("tpl/a.txt.template", "{{ greeting }} a");
    env.write("tpl/b.txt.template", "{{ greeting }} b");
    env.write("tpl/skip.md", "no\n");

    env.command()
        .args(["render", "tpl/*.template", "out", "--set", "greeting=hi"])
        .assert()
        .success();

    assert_eq!(env.read("out/a.txt"), "hi a");
    assert_eq!(env.read("out/b.txt"), "hi b");
    assert!(!env.exists("out/skip.md"));
}

/// A missing source exits with the I/O code.
#[test]
fn test_render_missing_source() {
    let env = TestEnv::new();

    env.command()
        .args(["render", "nowhere", "out"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("nowhere"));
}

// ============================================================================
// diff
// ============================================================================

/// Only additions and changes are printed.
#[test]
fn test_diff_prints_changes() {
    let env = TestEnv::new();
    env.write("old.yml", "a: 1\nb: {c: 2, d: 3}\ngone: true\n");
    env.write("new.yml", "a: 1\nb: {c: 2, d: 4}\nadded: x\n");

    let output = env
        .command()
        .args(["diff", "old.yml", "new.yml"])
        .output()
        .expect("Failed to run diff");
    assert!(output.status.success());

    let changes: serde_yaml::Mapping =
        serde_yaml::from_slice(&output.stdout).expect("diff output is YAML");
    let expected: serde_yaml::Mapping = serde_yaml::from_str("{b: {d: 4}, added: x}").unwrap();
    assert_eq!(changes, expected);
}

/// Identical files print nothing, even with --exit-code.
#[test]
fn test_diff_identical() {
    let env = TestEnv::new();
    env.write("a.yml", "x: [1, 2]\n");

    env.command()
        .args(["diff", "--exit-code", "a.yml", "a.yml"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

/// --exit-code turns changes into exit status 1.
#[test]
fn test_diff_exit_code() {
    let env = TestEnv::new();
    env.write("old.yml", "x: [1]\n");
    env.write("new.yml", "x: [1, 2]\n");

    env.command()
        .args(["diff", "--exit-code", "old.yml", "new.yml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("x:"));
}

/// A missing input exits with the I/O code.
#[test]
fn test_diff_missing_file() {
    let env = TestEnv::new();
    env.write("old.yml", "a: 1\n");

    env.command()
        .args(["diff", "old.yml", "new.yml"])
        .assert()
        .code(5);
}

// ============================================================================
// gen-password
// ============================================================================

/// The default password has fifteen alphanumeric characters.
#[test]
fn test_gen_password_default() {
    let env = TestEnv::new();

    let output = env.command().arg("gen-password").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let password = stdout.trim_end();
    assert_eq!(password.len(), 15);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(password.chars().filter(char::is_ascii_digit).count(), 5);
}

/// --count and --length shape the output.
#[test]
fn test_gen_password_count_and_length() {
    let env = TestEnv::new();

    let output = env
        .command()
        .args(["gen-password", "--length", "9", "--count", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|line| line.len() == 9));
}

/// A zero length is an argument error.
#[test]
fn test_gen_password_zero_length() {
    let env = TestEnv::new();

    env.command()
        .args(["gen-password", "--length", "0"])
        .assert()
        .code(4);
}
