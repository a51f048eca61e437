#![allow(deprecated)] // cargo_bin は assert_cmd 2.1 で非推奨

mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::prelude::*;
use serde_yaml::Value;

const APP_SPEC: &str = r#"
namespace: app
public: web:8080
services:
  web:
    image: node:20
    ports: ["8080:8080"]
    volumes:
      - .:/app
    depends_on: [cache]
  cache:
    image: redis
    ports: ["6379:6379"]
dependencies:
  - api
setup:
  - echo setup
"#;

const API_SPEC: &str = r#"
namespace: api
public: server:9000
services:
  server:
    image: api
    volumes:
      - ./data:/data
"#;

const REGISTRY: &str = r#"{
  "app": {"git": "git@example.com:app.git"},
  "api": {"git": "git@example.com:api.git"}
}"#;

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("stitch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--with"))
        .stdout(predicate::str::contains("--link"))
        .stdout(predicate::str::contains("--registry"))
        .stdout(predicate::str::contains("--generate"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("stitch").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stitch"));
}

/// Registry 未指定ならフラグと環境変数を案内してエラー
#[test]
fn test_missing_registry() {
    let workspace = TestWorkspace::new();
    workspace.write_service("app", APP_SPEC);

    workspace
        .stitch("app")
        .arg("--generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--registry"))
        .stderr(predicate::str::contains("STITCH_REGISTRY"));
}

#[test]
fn test_generate_writes_compose_file() {
    let workspace = TestWorkspace::new();
    let registry = workspace.write_registry(REGISTRY);
    workspace.write_service("app", APP_SPEC);
    let api_dir = workspace.write_service("api", API_SPEC);

    workspace
        .stitch("app")
        .arg("--registry")
        .arg(&registry)
        .arg("--with")
        .arg("api")
        .arg("--link")
        .arg("../api")
        .arg("--generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Linked 'api' to ../api."));

    let content =
        std::fs::read_to_string(workspace.path().join("app").join("docker-compose.yml")).unwrap();
    let compose: Value = serde_yaml::from_str(&content).unwrap();

    assert_eq!(compose["version"].as_str(), Some("2"));

    let web = &compose["services"]["app"];
    assert_eq!(web["ports"][0].as_str(), Some("3000:8080"));
    assert_eq!(web["depends_on"][0].as_str(), Some("app_cache"));
    assert_eq!(web["links"][0].as_str(), Some("app_cache:cache"));
    let app_dir = workspace.path().join("app");
    assert_eq!(
        web["volumes"][0].as_str(),
        Some(format!("{}:/app", app_dir.display()).as_str())
    );

    let cache = &compose["services"]["app_cache"];
    assert_eq!(cache["ports"][0].as_str(), Some("6379"));
    assert_eq!(cache["networks"][0].as_str(), Some("app_net"));

    let api = &compose["services"]["api"];
    assert_eq!(api["ports"][0].as_str(), Some("3001:9000"));
    assert_eq!(
        api["volumes"][0].as_str(),
        Some(format!("{}:/data", api_dir.join("data").display()).as_str())
    );

    assert!(compose["networks"]["app_net"].is_mapping());
    assert!(compose["networks"]["api_net"].is_mapping());
}

#[test]
fn test_generate_with_custom_base_port() {
    let workspace = TestWorkspace::new();
    let registry = workspace.write_registry(REGISTRY);
    workspace.write_service("app", APP_SPEC);
    workspace.write_service("api", API_SPEC);

    workspace
        .stitch("app")
        .env("STITCH_REGISTRY", &registry)
        .args(["--with", "api", "--link", "../api", "--generate", "--base-port", "4000"])
        .assert()
        .success();

    let content =
        std::fs::read_to_string(workspace.path().join("app").join("docker-compose.yml")).unwrap();
    let compose: Value = serde_yaml::from_str(&content).unwrap();
    assert_eq!(compose["services"]["app"]["ports"][0].as_str(), Some("4000:8080"));
    assert_eq!(compose["services"]["api"]["ports"][0].as_str(), Some("4001:9000"));
}

/// 依存サービスにモックがなければエラー
#[test]
fn test_dependency_without_mocks() {
    let workspace = TestWorkspace::new();
    let registry = workspace.write_registry(REGISTRY);
    workspace.write_service("app", APP_SPEC);

    workspace
        .stitch("app")
        .arg("--registry")
        .arg(&registry)
        .arg("--generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot find mocks for service 'api'",
        ));

    assert!(!workspace.path().join("app").join("docker-compose.yml").exists());
}

#[test]
fn test_unknown_launching_service() {
    let workspace = TestWorkspace::new();
    let registry = workspace.write_registry(REGISTRY);
    workspace.write_service("stranger", "namespace: stranger\nservices:\n  web:\n    image: nginx\n");

    workspace
        .stitch("stranger")
        .arg("--registry")
        .arg(&registry)
        .arg("--generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown service 'stranger'"));
}

#[test]
fn test_invalid_spec() {
    let workspace = TestWorkspace::new();
    let registry = workspace.write_registry(REGISTRY);
    workspace.write_service("app", "namespace: app\n");

    workspace
        .stitch("app")
        .arg("--registry")
        .arg(&registry)
        .arg("--generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid microservice spec"));
}

#[test]
fn test_malformed_registry() {
    let workspace = TestWorkspace::new();
    let registry = workspace.write_registry(r#"{"app-mocks": {"git": "u"}}"#);
    workspace.write_service("app", APP_SPEC);

    workspace
        .stitch("app")
        .arg("--registry")
        .arg(&registry)
        .arg("--generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid microservice registry"));
}
