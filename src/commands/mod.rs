// ABOUTME: Command module aggregator for the kubeb CLI.
// ABOUTME: Builds the orchestrator from the working directory and re-exports handlers.

mod build;
mod deploy;
mod environment;
mod project;

pub use build::{build, push};
pub use deploy::{delete, deploy, history, rollback};
pub use environment::{env, setenv};
pub use project::{destroy, info, init, template, versions};

use kubeb::config::{FileStore, ProjectLayout};
use kubeb::deploy::Orchestrator;
use kubeb::driver::{DockerCli, HelmCli, TeraRenderer};
use kubeb::error::{Error, Result};
use kubeb::template::TemplateRegistry;
use std::env;

/// Orchestrator wired to the real command line tools.
pub type CliOrchestrator = Orchestrator<FileStore, DockerCli, TeraRenderer, HelmCli>;

/// Layout of the project in the current directory.
pub fn current_layout() -> Result<ProjectLayout> {
    Ok(ProjectLayout::new(env::current_dir()?))
}

/// Orchestrator for the project in the current directory.
pub fn orchestrator() -> Result<CliOrchestrator> {
    let layout = current_layout()?;
    let registry = TemplateRegistry::from_env()?;
    Ok(Orchestrator::new(
        layout.clone(),
        registry.clone(),
        FileStore::new(layout.clone()),
        DockerCli::from_env(layout.root()),
        TeraRenderer::new(registry, layout.clone()),
        HelmCli::from_env(layout.root()),
    ))
}

/// Ask for confirmation unless `assume_yes`.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Error::Prompt(e.to_string()))
}
