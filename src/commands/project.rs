// ABOUTME: Project command implementations: init, info, version, template and destroy.
// ABOUTME: These manage the project document and templates without touching the cluster.

use kubeb::config::{ProjectSpec, destroy_project, init_project};
use kubeb::error::{Error, Result};
use kubeb::output::Output;
use kubeb::template::TemplateRegistry;
use kubeb::types::{ImageName, ReleaseName};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::InitArgs;

use super::{confirm, current_layout, orchestrator};

/// Scaffold kubeb files from a template.
pub fn init(args: InitArgs, output: Output) -> Result<()> {
    let layout = current_layout()?;
    let registry = TemplateRegistry::from_env()?;

    let name = match &args.name {
        Some(name) => ReleaseName::new(name),
        None => {
            let dir = layout
                .root()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ReleaseName::from_dir_name(&dir)
        }
    }
    .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let image = ImageName::parse(args.image.as_deref().unwrap_or(name.as_str()))
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;
    let user = args
        .user
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_default();

    let spec = ProjectSpec {
        name,
        user,
        image,
        env: args.env,
    };
    let config = init_project(&layout, &registry, &spec, &args.template, args.force)?;

    output.success(&format!(
        "Initialized {} from template {} (environment {})",
        config.name, config.template, spec.env
    ));
    Ok(())
}

#[derive(Serialize)]
struct ProjectInfo<'a> {
    name: &'a str,
    image: String,
    template: &'a str,
    user: &'a str,
    environment: Option<&'a str>,
    environments: Vec<&'a str>,
    versions: usize,
    last_deploy_version: Option<&'a str>,
}

/// Show the project document in short.
pub fn info(output: Output) -> Result<()> {
    let config = orchestrator()?.project()?;
    let info = ProjectInfo {
        name: config.name.as_str(),
        image: config.image.to_string(),
        template: &config.template,
        user: &config.user,
        environment: config.current_environment.as_deref(),
        environments: config.environments.keys().map(String::as_str).collect(),
        versions: config.version.len(),
        last_deploy_version: config.last_deploy_version.as_ref().map(|t| t.as_str()),
    };
    if output.data(&info) {
        return Ok(());
    }

    output.line(&format!("Name:         {}", info.name));
    output.line(&format!("Image:        {}", info.image));
    output.line(&format!(
        "Template:     {}{}",
        info.template,
        if config.ext_template { " (user)" } else { "" }
    ));
    output.line(&format!("User:         {}", info.user));
    output.line(&format!(
        "Environment:  {}",
        info.environment.unwrap_or("-")
    ));
    output.line(&format!("Environments: {}", info.environments.join(", ")));
    output.line(&format!("Versions:     {}", info.versions));
    output.line(&format!(
        "Deployed:     {}",
        info.last_deploy_version.unwrap_or("-")
    ));
    Ok(())
}

/// List built versions, marking the deployed one.
pub fn versions(output: Output) -> Result<()> {
    let (versions, deployed) = orchestrator()?.versions()?;
    if output.data(&versions) {
        return Ok(());
    }
    if versions.is_empty() {
        output.line("No version has been built yet");
        return Ok(());
    }
    for version in &versions {
        let marker = if deployed.as_ref() == Some(&version.tag) {
            "*"
        } else {
            " "
        };
        let summary = version.message.lines().next().unwrap_or("");
        output.line(&format!("{marker} {:<16} {summary}", version.tag.as_str()));
    }
    Ok(())
}

/// Add a user template.
pub fn template(name: String, path: PathBuf, force: bool, output: Output) -> Result<()> {
    let registry = TemplateRegistry::from_env()?;
    let target = registry.add_external(&name, &path, force)?;
    output.success(&format!("Added template {name} in {}", target.display()));
    Ok(())
}

/// Remove `.kubeb/` after confirmation.
pub fn destroy(yes: bool, output: Output) -> Result<()> {
    let layout = current_layout()?;
    if !layout.config_dir().is_dir() {
        output.line("Nothing to remove");
        return Ok(());
    }
    if !confirm("Remove all kubeb files from this project?", yes)? {
        output.line("Aborted");
        return Ok(());
    }
    destroy_project(&layout)?;
    output.success(&format!("Removed {}", layout.config_dir().display()));
    Ok(())
}
