// ABOUTME: External collaborators: image builder, manifest renderer, release driver.
// ABOUTME: Traits the orchestrator consumes plus docker, Tera and helm implementations.

mod builder;
mod command;
mod error;
mod release;
mod render;

pub use builder::{DockerCli, ImageBuilder};
pub use command::{CommandOutput, CommandRunner, CommandStatus, Phase};
pub use error::DriverError;
pub use release::{
    HelmCli, History, HistoryEntry, InstallOutput, InstallRequest, ReleaseDriver, SUPERSEDED,
    parse_history,
};
pub use render::{
    CHART_ENV_FILE, ManifestRenderer, RenderError, RenderRequest, RenderedManifest, TeraRenderer,
};
