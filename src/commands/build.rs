// ABOUTME: Build and push command implementations.
// ABOUTME: Collects the release note, then builds, optionally pushes and records.

use kubeb::error::{Error, Result};
use kubeb::output::Output;
use kubeb::release_note;

use super::orchestrator;

/// Build a new version. Without `-m`, the note is written in an editor.
pub async fn build(messages: Vec<String>, push: bool, mut output: Output) -> Result<()> {
    let orchestrator = orchestrator()?;
    let config = orchestrator.project()?;

    let note = if messages.is_empty() {
        let buffer = dialoguer::Editor::new()
            .edit(&release_note::editor_template())
            .map_err(|e| Error::Prompt(e.to_string()))?;
        release_note::from_editor(buffer.as_deref())
    } else {
        release_note::from_messages(&messages)
    };

    output.start_timer();
    let spinner = output.spinner(&format!("Building {}...", config.image));
    let result = orchestrator.build(note, push).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let version = result?;

    if !output.data(&version) {
        output.success(&format!(
            "Built {}{}",
            config.image.tagged(&version.tag),
            if push { " and pushed it" } else { "" }
        ));
    }
    Ok(())
}

/// Push a built version; the latest one by default.
pub async fn push(version: Option<String>, mut output: Output) -> Result<()> {
    let orchestrator = orchestrator()?;
    let config = orchestrator.project()?;

    output.start_timer();
    let spinner = output.spinner(&format!("Pushing {}...", config.image));
    let result = orchestrator.push(version.as_deref()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let version = result?;

    if !output.data(&version) {
        output.success(&format!("Pushed {}", config.image.tagged(&version.tag)));
    }
    Ok(())
}
