// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: States after rendering carry the manifest so it can be cleaned up.

use crate::driver::RenderedManifest;

/// Version resolved, nothing written yet.
/// Available actions: `render()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// Manifest rendered to disk.
/// Available actions: `install()`
#[derive(Debug, Clone)]
pub struct Rendered {
    pub(crate) manifest: RenderedManifest,
}

/// Release installed or upgraded (or validated, for a dry run).
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Installed {
    pub(crate) manifest: RenderedManifest,
    /// Release printed by the driver for a dry run.
    pub(crate) rendered: Option<String>,
}

/// Install failed.
/// Available actions: `rollback()`
#[derive(Debug, Clone)]
pub struct Failed {
    pub(crate) manifest: RenderedManifest,
}
