//! Binary-level tests for the containerapp CLI

mod common;

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

use containerapp::app::{ManifestFormat, ScopedManifestFile};
use containerapp::constants::{env as env_constants, API_VERSION};

use common::{environment_id, scenario_spec, target, GROUP, SUBSCRIPTION};

/// The binary, isolated from the caller's environment and config files
fn containerapp(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("containerapp").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG");
    for var in [
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(var);
    }
    for var in [
        env_constants::ACCESS_TOKEN,
        env_constants::SUBSCRIPTION,
        env_constants::ENDPOINT,
        env_constants::LOCATION,
        env_constants::CONFIG,
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("containerapp-test.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_dry_run_keeps_manifest_environment() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        &format!("[defaults]\nsubscription = \"{}\"\n", SUBSCRIPTION),
    );
    let env1 = environment_id("env1");
    let manifest = scenario_spec(Some(env1.clone())).to_document().unwrap();
    let file =
        ScopedManifestFile::write_in(temp_dir.path(), &manifest, ManifestFormat::Yaml).unwrap();

    let assert = containerapp(temp_dir.path())
        .args(["create", "-n", "yaml1app", "-g", GROUP, "--environment", "env2", "--dry-run"])
        .arg("--yaml")
        .arg(file.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("differs from the override"));

    let document = stdout_json(assert.get_output());
    assert_eq!(document["properties"]["environmentId"], json!(env1));
    assert_eq!(document, *manifest.as_value());
}

#[test]
fn test_dry_run_injects_environment() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = scenario_spec(None).to_document().unwrap();
    let file =
        ScopedManifestFile::write_in(temp_dir.path(), &manifest, ManifestFormat::Yaml).unwrap();

    let assert = containerapp(temp_dir.path())
        .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
        .args(["create", "-n", "yaml2app", "-g", GROUP, "--environment", "env2", "--dry-run"])
        .arg("--yaml")
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("differs from the override").not());

    let document = stdout_json(assert.get_output());
    assert_eq!(
        document["properties"]["environmentId"],
        json!(target("yaml2app").environment_id("env2"))
    );
}

#[test]
fn test_dry_run_uses_configured_location() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        &format!(
            "[defaults]\nsubscription = \"{}\"\ngroup = \"{}\"\nlocation = \"northeurope\"\n",
            SUBSCRIPTION, GROUP
        ),
    );
    let mut spec = scenario_spec(Some(environment_id("env1")));
    spec.location = None;
    let manifest = spec.to_document().unwrap();
    let file =
        ScopedManifestFile::write_in(temp_dir.path(), &manifest, ManifestFormat::Json).unwrap();

    let assert = containerapp(temp_dir.path())
        .args(["create", "-n", "noloc", "--dry-run"])
        .arg("--yaml")
        .arg(file.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert_eq!(stdout_json(assert.get_output())["location"], "northeurope");
}

#[test]
fn test_malformed_manifest_fails() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("broken.yml");
    std::fs::write(&manifest, "location: eastus\nproperties: [unclosed\n").unwrap();

    containerapp(temp_dir.path())
        .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
        .args(["create", "-n", "broken", "-g", GROUP, "--dry-run"])
        .arg("--yaml")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Invalid YAML manifest"));
}

#[test]
fn test_failure_category_logged_when_verbose() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("broken.yml");
    std::fs::write(&manifest, "- not\n- a mapping\n").unwrap();

    containerapp(temp_dir.path())
        .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
        .args(["create", "-n", "broken", "-g", GROUP, "--dry-run", "--very-verbose"])
        .arg("--yaml")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Command failed"))
        .stderr(predicate::str::is_match(r"category\S*=\S*manifest").unwrap())
        .stderr(predicate::str::is_match(r"fatal\S*=\S*true").unwrap())
        .stderr(predicate::str::contains("Error: Manifest root must be a mapping"));
}

#[test]
fn test_missing_manifest_fails() {
    let temp_dir = TempDir::new().unwrap();

    containerapp(temp_dir.path())
        .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
        .args(["create", "-n", "missing", "-g", GROUP, "--yaml", "nope.yml", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest file not found"));
}

#[test]
fn test_unreadable_manifest_reports_reason() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join("manifests")).unwrap();

    containerapp(temp_dir.path())
        .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
        .args(["create", "-n", "dir", "-g", GROUP, "--yaml", "manifests", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::is_match("Error: I/O error reading manifest: .+").unwrap());
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp_dir = TempDir::new().unwrap();

    containerapp(temp_dir.path())
        .args(["show", "-n", "app", "-g", GROUP, "--config", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_configure_defaults_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("nested").join("config.toml");

    containerapp(temp_dir.path())
        .args(["configure", "--defaults", "location=eastus", "group=clitest-rg"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved defaults"));

    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("location = \"eastus\""));
    assert!(written.contains("group = \"clitest-rg\""));

    containerapp(temp_dir.path())
        .arg("configure")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("location = \"eastus\""));

    containerapp(temp_dir.path())
        .args(["configure", "--defaults", "colour=blue"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown default 'colour'"));
}

#[test]
fn test_show_requires_token() {
    let temp_dir = TempDir::new().unwrap();

    containerapp(temp_dir.path())
        .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
        .args(["show", "-n", "app", "-g", GROUP])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing access token"));
}

#[test]
fn test_create_no_wait_against_service() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let app = target("yaml1app");
    let env1 = environment_id("env1");
    let manifest = scenario_spec(Some(env1.clone())).to_document().unwrap();
    let file =
        ScopedManifestFile::write_in(temp_dir.path(), &manifest, ManifestFormat::Yaml).unwrap();

    let mut response = manifest.as_value().clone();
    response["properties"]["provisioningState"] = json!("InProgress");

    let mock = server
        .mock("PUT", app.resource_id().as_str())
        .match_query(Matcher::UrlEncoded("api-version".into(), API_VERSION.into()))
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(manifest.as_value().clone()))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(response.to_string())
        .create();

    let assert = containerapp(temp_dir.path())
        .env(env_constants::ACCESS_TOKEN, "test-token")
        .env(env_constants::ENDPOINT, server.url())
        .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
        .args(["create", "-n", "yaml1app", "-g", GROUP, "--environment", "env2", "--no-wait"])
        .arg("--yaml")
        .arg(file.path())
        .assert()
        .success();

    let resource = stdout_json(assert.get_output());
    assert_eq!(resource["properties"]["provisioningState"], "InProgress");
    assert_eq!(resource["properties"]["environmentId"], json!(env1));
    mock.assert();
}

#[test]
fn test_verify_against_service() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let app = target("yaml1app");

    let mut resource = scenario_spec(Some(environment_id("env1")))
        .to_document()
        .unwrap()
        .into_value();
    resource["properties"]["provisioningState"] = json!("Succeeded");

    let _mock = server
        .mock("GET", app.resource_id().as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(resource.to_string())
        .create();

    let run = |checks: &[&str]| {
        let mut cmd = containerapp(temp_dir.path());
        cmd.env(env_constants::ACCESS_TOKEN, "test-token")
            .env(env_constants::ENDPOINT, server.url())
            .env(env_constants::SUBSCRIPTION, SUBSCRIPTION)
            .args(["verify", "-n", "yaml1app", "-g", GROUP, "--all"]);
        for check in checks {
            cmd.arg("--check").arg(check);
        }
        cmd.assert()
    };

    run(&[
        "properties.provisioningState=Succeeded",
        "properties.configuration.ingress.additionalPortMappings[1].exposedPort=23456",
        "properties.template.scale.rules[0].http.metadata.concurrentRequests=\"50\"",
    ])
    .success()
    .stdout(predicate::str::contains("All 3 check(s) passed"));

    run(&[
        "properties.template.scale.minReplicas=2",
        "properties.template.containers[0].image=nginx",
        "properties.template.revisionSuffix=other",
    ])
    .failure()
    .stderr(predicate::str::contains("2 check(s) failed"))
    .stderr(predicate::str::contains("properties.template.scale.minReplicas: expected 2, got 1"));
}
