// ABOUTME: Deploy, rollback, delete and history command implementations.
// ABOUTME: Wraps orchestrator calls with progress output and collected warnings.

use kubeb::config::parse_assignments;
use kubeb::deploy::{DeployRequest, VersionSelector};
use kubeb::diagnostics::Diagnostics;
use kubeb::error::{Error, Result};
use kubeb::output::Output;
use kubeb::types::Revision;

use super::{confirm, orchestrator};

/// Deploy a built version to the current environment.
pub async fn deploy(
    version: Option<String>,
    previous: bool,
    set: Vec<String>,
    dry_run: bool,
    no_rollback: bool,
    mut output: Output,
) -> Result<()> {
    let orchestrator = orchestrator()?;
    let config = orchestrator.project()?;

    let version = match (version, previous) {
        (Some(tag), _) => VersionSelector::Tag(tag),
        (None, true) => VersionSelector::Previous,
        (None, false) => VersionSelector::Latest,
    };
    let options = if set.is_empty() {
        None
    } else {
        Some(parse_assignments(&set)?)
    };
    let request = DeployRequest {
        version,
        options,
        dry_run,
        allow_rollback: !no_rollback,
    };

    output.start_timer();
    let mut diag = Diagnostics::default();
    let spinner = output.spinner(&format!("Deploying {}...", config.name));
    let result = orchestrator.deploy(&request, &mut diag).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let report = result?;
    if output.data(&report) {
        return Ok(());
    }
    if let Some(rendered) = &report.rendered {
        output.line(rendered.trim_end());
    }
    let verb = if dry_run { "Validated" } else { "Deployed" };
    output.success(&format!(
        "{verb} {} version {}",
        config.name, report.version.tag
    ));
    Ok(())
}

/// Roll the release back.
pub async fn rollback(revision: Option<String>, mut output: Output) -> Result<()> {
    let revision = revision
        .map(|r| r.parse::<Revision>())
        .transpose()
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;
    let orchestrator = orchestrator()?;

    output.start_timer();
    let spinner = output.spinner("Rolling back...");
    let result = orchestrator.rollback(revision).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let revision = result?;

    output.success(&format!("Rolled back to revision {revision}"));
    Ok(())
}

/// Uninstall the release after confirmation.
pub async fn delete(yes: bool, output: Output) -> Result<()> {
    let orchestrator = orchestrator()?;
    let config = orchestrator.project()?;

    if !confirm(&format!("Uninstall release {}?", config.name), yes)? {
        output.line("Aborted");
        return Ok(());
    }

    orchestrator.delete().await?;
    output.success(&format!("Uninstalled {}", config.name));
    Ok(())
}

/// Print the release history.
pub async fn history(output: Output) -> Result<()> {
    let orchestrator = orchestrator()?;
    let history = orchestrator.history().await?;

    if output.data(&history.entries) {
        return Ok(());
    }
    output.line(&format!(
        "{:<10} {:<12} {:<28} {}",
        "REVISION", "STATUS", "UPDATED", "DESCRIPTION"
    ));
    for entry in &history.entries {
        output.line(&format!(
            "{:<10} {:<12} {:<28} {}",
            entry.revision, entry.status, entry.updated, entry.description
        ));
    }
    Ok(())
}
