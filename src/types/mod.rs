// ABOUTME: Validated domain types and identifiers.
// ABOUTME: Keeps version tags and driver revisions in separate type spaces.

mod image_name;
mod release_name;
mod revision;
mod version_tag;

pub use image_name::{ImageName, ParseImageNameError};
pub use release_name::{ReleaseName, ReleaseNameError};
pub use revision::{ParseRevisionError, Revision};
pub use version_tag::VersionTag;
