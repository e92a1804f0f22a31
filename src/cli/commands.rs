//! Command handlers for the container app CLI
//!
//! This module implements the command handlers that coordinate between CLI
//! arguments, configuration and the core application functionality.
//! Resource representations are printed to stdout as pretty JSON; logs,
//! warnings and the spinner go to stderr.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info};

use crate::app::{
    create_from_manifest, resolve, verify, verify_all, AccessToken, ContainerAppsClient,
    ManifestDocument, OverrideSet, ResourceApi, ResourceTarget,
};
use crate::cli::{ConfigureArgs, CreateArgs, ShowArgs, TargetArgs, VerifyArgs, WaitSpinner};
use crate::config::AppConfig;
use crate::errors::{AppError, ConfigError, Result, ValidationError};

/// Handle the create command
///
/// Loads the manifest, merges it with the command-line overrides and
/// submits it. With `--dry-run` the resolved document is printed instead.
pub async fn handle_create(args: CreateArgs, config: &AppConfig) -> Result<()> {
    let target = resolve_target(&args.target, config)?;
    let manifest = ManifestDocument::load(&args.yaml).await?;
    let overrides = build_overrides(&args, &target, config)?;
    debug!("{} override(s) for {}", overrides.len(), target);

    if args.dry_run {
        let resolved = resolve(manifest, &overrides)?;
        info!("Dry run: {} not submitted", target);
        return print_json(resolved.document.as_value());
    }

    let client = connect(config)?;
    let wait = (!args.no_wait).then(|| config.to_poll_policy());

    let spinner = WaitSpinner::start(target.name(), wait.is_some());
    let deployment = create_from_manifest(
        &client,
        &target,
        manifest,
        &overrides,
        wait.as_ref(),
        |state| spinner.update(state),
    )
    .await;
    spinner.finish();

    let deployment = deployment?;
    match deployment.provisioning_state() {
        Some(state) => info!("{} provisioning state: {}", target, state),
        None => info!("{} submitted", target),
    }
    print_json(&deployment.resource)
}

/// Handle the show command
pub async fn handle_show(args: ShowArgs, config: &AppConfig) -> Result<()> {
    let target = resolve_target(&args.target, config)?;
    let client = connect(config)?;
    let resource = client.show(&target).await?;

    match args.query {
        Some(path) => print_json(path.lookup(&resource).unwrap_or(&Value::Null)),
        None => print_json(&resource),
    }
}

/// Handle the verify command
///
/// Fetches the resource and checks every `--check`; a mismatch fails the
/// command with an assertion error.
pub async fn handle_verify(args: VerifyArgs, config: &AppConfig) -> Result<()> {
    let target = resolve_target(&args.target, config)?;
    let client = connect(config)?;
    let resource = client.show(&target).await?;

    if args.all {
        verify_all(&resource, &args.checks)?;
    } else {
        verify(&resource, &args.checks)?;
    }

    println!("All {} check(s) passed for {}", args.checks.len(), target);
    Ok(())
}

/// Handle the configure command
///
/// Without `--defaults`, prints the persisted defaults. Environment
/// variables are not written back to the file.
pub async fn handle_configure(args: ConfigureArgs, config_file: Option<PathBuf>) -> Result<()> {
    let path = AppConfig::write_path(config_file)?;
    let mut config = if path.exists() {
        AppConfig::load_from_file(&path).await?
    } else {
        AppConfig::default()
    };

    if args.defaults.is_empty() {
        let defaults = toml::to_string_pretty(&config.defaults).map_err(ConfigError::from)?;
        if defaults.trim().is_empty() {
            println!("No defaults configured ({})", path.display());
        } else {
            print!("{}", defaults);
        }
        return Ok(());
    }

    for entry in &args.defaults {
        let (key, value) = entry.split_once('=').ok_or_else(|| ValidationError::InvalidAssignment {
            input: entry.clone(),
            reason: "expected KEY=VALUE".to_string(),
        })?;
        config.set_default(key, value)?;
    }

    config.save(&path).await?;
    println!("Saved defaults to {}", path.display());
    Ok(())
}

/// Build the request target from flags and configured defaults
fn resolve_target(args: &TargetArgs, config: &AppConfig) -> Result<ResourceTarget> {
    let resource_group = args
        .resource_group
        .clone()
        .or_else(|| config.defaults.group.clone())
        .ok_or_else(|| ConfigError::MissingSetting {
            field: "resource group".to_string(),
            hint: "Pass --resource-group or run 'containerapp configure --defaults group=<name>'"
                .to_string(),
        })?;

    let subscription = args
        .subscription
        .clone()
        .or_else(|| config.defaults.subscription.clone())
        .ok_or_else(|| ConfigError::MissingSetting {
            field: "subscription".to_string(),
            hint: "Pass --subscription, set CONTAINERAPP_SUBSCRIPTION or run \
                   'containerapp configure --defaults subscription=<id>'"
                .to_string(),
        })?;

    Ok(ResourceTarget::new(subscription, resource_group, &args.name)?)
}

/// Collect `--environment`, `--location` (or the default location) and `--set`
fn build_overrides(
    args: &CreateArgs,
    target: &ResourceTarget,
    config: &AppConfig,
) -> Result<OverrideSet> {
    let mut overrides = OverrideSet::new();

    if let Some(ref environment) = args.environment {
        overrides = overrides.with_environment_id(target.environment_id(environment));
    }
    if let Some(location) = args.location.as_ref().or(config.defaults.location.as_ref()) {
        overrides = overrides.with_location(location.clone());
    }

    Ok(overrides.with_assignments(&args.set)?)
}

fn connect(config: &AppConfig) -> Result<ContainerAppsClient> {
    let token = AccessToken::from_env_or(config.client.access_token.as_deref())?;
    ContainerAppsClient::new(&config.to_client_config()?, &token)
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::generic(format!("Failed to render JSON: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_args(group: Option<&str>, subscription: Option<&str>) -> TargetArgs {
        TargetArgs {
            name: "yaml1app".to_string(),
            resource_group: group.map(str::to_string),
            subscription: subscription.map(str::to_string),
        }
    }

    fn create_args() -> CreateArgs {
        CreateArgs {
            target: target_args(Some("rg"), Some("sub")),
            yaml: PathBuf::from("app.yml"),
            environment: Some("env2".to_string()),
            location: None,
            set: vec!["tags.team=core".to_string()],
            no_wait: false,
            dry_run: true,
        }
    }

    #[test]
    fn test_target_from_defaults() {
        let mut config = AppConfig::default();
        config.defaults.group = Some("default-rg".to_string());
        config.defaults.subscription = Some("default-sub".to_string());

        let target = resolve_target(&target_args(None, None), &config).unwrap();
        assert_eq!(target.resource_group(), "default-rg");
        assert_eq!(target.subscription_id(), "default-sub");

        // Flags win over defaults
        let target = resolve_target(&target_args(Some("rg"), None), &config).unwrap();
        assert_eq!(target.resource_group(), "rg");
    }

    #[test]
    fn test_target_requires_group_and_subscription() {
        let config = AppConfig::default();
        assert!(matches!(
            resolve_target(&target_args(None, Some("sub")), &config),
            Err(AppError::Config(ConfigError::MissingSetting { .. }))
        ));
        assert!(matches!(
            resolve_target(&target_args(Some("rg"), None), &config),
            Err(AppError::Config(ConfigError::MissingSetting { .. }))
        ));
    }

    #[test]
    fn test_overrides_from_flags() {
        let mut config = AppConfig::default();
        config.defaults.location = Some("eastus".to_string());

        let args = create_args();
        let target = resolve_target(&args.target, &config).unwrap();
        let overrides = build_overrides(&args, &target, &config).unwrap();

        let fields: Vec<(&str, &Value)> = overrides
            .iter()
            .map(|o| (o.path.as_str(), &o.value))
            .collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].0, "properties.environmentId");
        assert_eq!(
            fields[0].1,
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.App/managedEnvironments/env2"
        );
        assert_eq!(fields[1], ("location", &Value::from("eastus")));
        assert_eq!(fields[2], ("tags.team", &Value::from("core")));
    }

    #[test]
    fn test_location_flag_beats_default() {
        let mut config = AppConfig::default();
        config.defaults.location = Some("eastus".to_string());

        let mut args = create_args();
        args.location = Some("westeurope".to_string());
        let target = resolve_target(&args.target, &config).unwrap();
        let overrides = build_overrides(&args, &target, &config).unwrap();

        let location = overrides.iter().find(|o| o.path.as_str() == "location").unwrap();
        assert_eq!(location.value, "westeurope");
    }
}
