// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates release names and image names while loading the project document.

use serde::Deserialize;

use crate::types::{ImageName, ReleaseName};

pub fn deserialize_release_name<'de, D>(deserializer: D) -> Result<ReleaseName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ReleaseName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_image_name<'de, D>(deserializer: D) -> Result<ImageName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageName::parse(&s).map_err(serde::de::Error::custom)
}
