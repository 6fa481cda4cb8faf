//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use crate::runtime_config::RuntimeConfig;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ROUTES: &str = r#"
user:
  regexp: "^/user/{id}$"
  vars: { id: "@userId" }
  controller: User::show
save:
  regexp: "^/user/([0-9]+)/save$"
  ajax: true
  controller: User::save
vars:
  userId: "[0-9]+"
"#;

fn site() -> (TempDir, RuntimeConfig) {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("conf")).unwrap();
    fs::write(dir.path().join("conf/route.yaml"), ROUTES).unwrap();
    fs::write(
        dir.path().join("conf/di-dev.yaml"),
        "include: base.yaml\nclass:\n  mailer: { class: Smtp }\nraw:\n  sender: noreply\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("conf/base.yaml"),
        "class:\n  mailer: { class: NullMailer }\n  db: { class: Pg }\n",
    )
    .unwrap();

    let config = RuntimeConfig {
        run_mode: "dev".to_string(),
        site_root: dir.path().to_path_buf(),
        route_file: PathBuf::from("conf/route.yaml"),
        di_file_pattern: "conf/di-{mode}.yaml".to_string(),
    };
    (dir, config)
}

fn run(args: &[&str], config: &RuntimeConfig) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    execute(&cli, config, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["routewire", "match", "/user/1"],
        vec!["routewire", "match", "--routes", "r.yaml", "/x", "--method", "post", "--ajax"],
        vec!["routewire", "path", "user", "--var", "id=1", "--query", "a=b"],
        vec!["routewire", "inspect-di", "--file", "conf/di-dev.yaml"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_path_rejects_malformed_pair() {
    assert!(Cli::try_parse_from(["routewire", "path", "user", "--var", "id"]).is_err());

    let cli = Cli::try_parse_from(["routewire", "path", "user", "--var", "id=a=b"]).unwrap();
    match cli.command {
        Commands::Path { vars, .. } => assert_eq!(vars, vec![("id".to_string(), "a=b".to_string())]),
        other => panic!("Expected Path command, got {other:?}"),
    }
}

#[test]
fn test_match_command() {
    let (_dir, config) = site();

    let out = run(&["routewire", "match", "/user/42"], &config).unwrap();
    assert!(out.contains("route:   user"));
    assert!(out.contains("handler: User::show"));
    assert!(out.contains(r#"params:  ["42"]"#));

    let out = run(&["routewire", "match", "/user/abc"], &config).unwrap();
    assert!(out.contains("status:  404"));

    let out = run(&["routewire", "match", "/user/5/save"], &config).unwrap();
    assert!(out.contains("status:  400"));

    let out = run(
        &["routewire", "match", "/user/5/save", "--method", "post", "--ajax"],
        &config,
    )
    .unwrap();
    assert!(out.contains("route:   save"));
}

#[test]
fn test_path_command() {
    let (_dir, config) = site();
    let out = run(
        &["routewire", "path", "user", "--var", "id=42", "--query", "tab=posts"],
        &config,
    )
    .unwrap();
    assert_eq!(out.trim(), "/user/42?tab=posts");

    assert!(run(&["routewire", "path", "vars"], &config).is_err());
    assert!(run(&["routewire", "path", "missing"], &config).is_err());
}

#[test]
fn test_inspect_di_command() {
    let (_dir, config) = site();
    let out = run(&["routewire", "inspect-di"], &config).unwrap();
    assert!(out.contains("include: base.yaml"));
    assert!(out.contains("  mailer: Smtp"));
    assert!(out.contains("  db: Pg"));
    assert!(out.contains("  sender"));
}

#[test]
fn test_inspect_di_follows_file_pattern() {
    let (dir, config) = site();
    fs::write(
        dir.path().join("conf/services.prod.yaml"),
        "class:\n  cache: { class: Redis }\n",
    )
    .unwrap();
    let config = RuntimeConfig {
        run_mode: "prod".to_string(),
        di_file_pattern: "conf/services.{mode}.yaml".to_string(),
        ..config
    };

    let out = run(&["routewire", "inspect-di"], &config).unwrap();
    assert!(out.contains("services.prod.yaml"));
    assert!(out.contains("  cache: Redis"));
    assert!(!out.contains("mailer"));
}

#[test]
fn test_missing_route_file_is_an_error() {
    let (_dir, config) = site();
    let err = run(&["routewire", "match", "--routes", "nope.yaml", "/"], &config).unwrap_err();
    assert!(err.to_string().contains("nope.yaml"));
}
