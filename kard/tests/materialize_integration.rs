//! Integration tests for tree materialization.
//!
//! These tests render whole source trees through the public API and check
//! the resulting destination trees file by file.

mod common;

use std::fs;

use common::{list_files, RootFixture};
use kard::template::{ExclusionSet, TemplateEngine};
use serde_yaml::Mapping;

fn engine(fixture: &RootFixture, context: &str) -> TemplateEngine {
    let context: Mapping = serde_yaml::from_str(context).unwrap();
    TemplateEngine::new(fixture.path(), context)
}

#[test]
fn test_every_file_has_one_artifact() {
    let fixture = RootFixture::new();
    fixture.file("src/a.txt", "a");
    fixture.file("src/conf/app.yml.template", "name: {{ name }}");
    fixture.file("src/conf/raw.yml", "raw: true");
    fixture.file("src/deep/er/x.bin", "x");

    let out = tempfile::TempDir::new().unwrap();
    let src = fixture.path().join("src");
    let stats = engine(&fixture, "name: alpha")
        .materialize(&src, &src, out.path(), &ExclusionSet::empty(), true)
        .unwrap();

    assert_eq!(
        list_files(out.path()),
        ["a.txt", "conf/app.yml", "conf/raw.yml", "deep/er/x.bin"]
    );
    assert_eq!(stats.written(), 4);
    assert_eq!(
        fs::read_to_string(out.path().join("conf/app.yml")).unwrap(),
        "name: alpha"
    );
}

#[test]
fn test_exclusion_set_skips_literal_file() {
    let fixture = RootFixture::new();
    fixture.file("src/a.txt", "a");
    fixture.file("src/b.txt", "b");

    let out = tempfile::TempDir::new().unwrap();
    let src = fixture.path().join("src");
    let exclusions = ExclusionSet::rooted(fixture.path(), ["src/b.txt"]).unwrap();
    engine(&fixture, "{}")
        .materialize(&src, &src, out.path(), &exclusions, true)
        .unwrap();

    assert_eq!(list_files(out.path()), ["a.txt"]);
}

#[test]
fn test_excluded_directory_is_pruned() {
    let fixture = RootFixture::new();
    fixture.file("src/app/main.py", "");
    fixture.file("src/app/__pycache__/main.cpython.pyc", "");
    fixture.file("src/.git/HEAD", "ref");

    let out = tempfile::TempDir::new().unwrap();
    let src = fixture.path().join("src");
    let exclusions =
        ExclusionSet::rooted(fixture.path(), ["src/*__pycache__", "src/.git"]).unwrap();
    let stats = engine(&fixture, "{}")
        .materialize(&src, &src, out.path(), &exclusions, true)
        .unwrap();

    assert_eq!(list_files(out.path()), ["app/main.py"]);
    assert_eq!(stats.skipped, 2);
}

#[test]
fn test_templates_can_include_siblings() {
    let fixture = RootFixture::new();
    fixture.file("src/partials/db.yml", "host: {{ db.host }}");
    fixture.file(
        "src/compose.yml.template",
        "services:\n  db:\n    {% include 'src/partials/db.yml' %}",
    );

    let out = tempfile::TempDir::new().unwrap();
    let template = fixture.path().join("src/compose.yml.template");
    engine(&fixture, "db: {host: pg}")
        .materialize(
            &template,
            &template,
            &out.path().join("compose.yml.template"),
            &ExclusionSet::empty(),
            true,
        )
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("compose.yml")).unwrap(),
        "services:\n  db:\n    host: pg"
    );
}

#[test]
fn test_wildcard_keeps_relative_layout() {
    let fixture = RootFixture::new();
    fixture.file("services/web/Dockerfile.template", "FROM {{ base }}");
    fixture.file("services/worker/Dockerfile.template", "FROM {{ base }}");
    fixture.file("services/README", "docs");

    let out = tempfile::TempDir::new().unwrap();
    let pattern = fixture.path().join("services/*/Dockerfile.template");
    engine(&fixture, "base: alpine")
        .materialize(&pattern, &pattern, out.path(), &ExclusionSet::empty(), true)
        .unwrap();

    assert_eq!(list_files(out.path()), ["web/Dockerfile", "worker/Dockerfile"]);
    assert_eq!(
        fs::read_to_string(out.path().join("worker/Dockerfile")).unwrap(),
        "FROM alpine"
    );
}

#[test]
fn test_rematerialize_overwrites() {
    let fixture = RootFixture::new();
    fixture.file("src/version.txt.template", "v{{ version }}");

    let out = tempfile::TempDir::new().unwrap();
    let src = fixture.path().join("src");
    engine(&fixture, "version: 1")
        .materialize(&src, &src, out.path(), &ExclusionSet::empty(), true)
        .unwrap();
    engine(&fixture, "version: 2")
        .materialize(&src, &src, out.path(), &ExclusionSet::empty(), true)
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("version.txt")).unwrap(),
        "v2"
    );
}
