// ABOUTME: Environment manager: current environment pointer and variable overlays.
// ABOUTME: Merges the base `.env.<name>` file with configured overlay variables.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{Environment, ProjectConfig, ProjectLayout};
use crate::error::{Error, Result};

/// Value that marks a variable as unset in env files and overlays.
const NULL_SENTINEL: &str = "null";

/// Operates on the environments of a loaded [`ProjectConfig`].
///
/// Callers persist the document afterwards; the manager only touches the
/// environment files in the project root.
#[derive(Debug, Clone)]
pub struct EnvironmentManager {
    layout: ProjectLayout,
}

impl EnvironmentManager {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    /// Return the named environment, creating its record on first use.
    ///
    /// A missing `.env.<name>` file is seeded from `seed` (the template's
    /// dotenv file) or created empty. Existing files are never overwritten.
    pub fn select<'c>(
        &self,
        config: &'c mut ProjectConfig,
        name: &str,
        seed: Option<&Path>,
    ) -> Result<&'c Environment> {
        let env_file = self.layout.env_file(name);
        if !env_file.exists() {
            match seed.filter(|path| path.is_file()) {
                Some(seed) => {
                    std::fs::copy(seed, &env_file)?;
                }
                None => std::fs::write(&env_file, "")?,
            }
            tracing::info!("Initiated environment {} in {}", name, env_file.display());
        }

        Ok(config
            .environments
            .entry(name.to_string())
            .or_insert_with(|| Environment::new(name)))
    }

    /// Point the current environment at `name`. No validation is done here.
    pub fn set_current(&self, config: &mut ProjectConfig, name: &str) {
        config.current_environment = Some(name.to_string());
    }

    /// Merge `overrides` into the environment's overlay; overrides win.
    pub fn merge_variables<'c>(
        &self,
        config: &'c mut ProjectConfig,
        name: &str,
        overrides: BTreeMap<String, String>,
    ) -> &'c Environment {
        let environment = config
            .environments
            .entry(name.to_string())
            .or_insert_with(|| Environment::new(name));
        environment.variables.extend(overrides);
        environment
    }

    /// Variables parsed from `.env.<name>`, without empty or `null` values.
    pub fn base_variables(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let env_file = self.layout.env_file(name);
        if !env_file.is_file() {
            return Err(Error::EnvironmentFileMissing(env_file));
        }

        let entries = dotenv::from_path_iter(&env_file).map_err(|e| {
            Error::InvalidConfig(format!("cannot read {}: {}", env_file.display(), e))
        })?;

        let mut variables = BTreeMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(|e| {
                Error::InvalidConfig(format!("cannot parse {}: {}", env_file.display(), e))
            })?;
            if is_set(&value) {
                variables.insert(key, value);
            }
        }
        Ok(variables)
    }

    /// Base file variables overlaid with configured ones; configured values win.
    pub fn effective_variables(
        &self,
        config: &ProjectConfig,
        name: &str,
    ) -> Result<BTreeMap<String, String>> {
        let mut variables = self.base_variables(name)?;

        if let Some(environment) = config.environments.get(name) {
            for (key, value) in &environment.variables {
                if is_set(value) {
                    variables.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(variables)
    }
}

fn is_set(value: &str) -> bool {
    !value.is_empty() && value != NULL_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectSpec;
    use crate::types::{ImageName, ReleaseName};
    use tempfile::TempDir;

    fn setup() -> (TempDir, EnvironmentManager, ProjectConfig) {
        let dir = tempfile::tempdir().unwrap();
        let manager = EnvironmentManager::new(ProjectLayout::new(dir.path()));
        let spec = ProjectSpec {
            name: ReleaseName::new("shop").unwrap(),
            user: String::new(),
            image: ImageName::parse("acme/shop").unwrap(),
            env: "local".to_string(),
        };
        (dir, manager, ProjectConfig::new(&spec, "laravel", false))
    }

    #[test]
    fn effective_variables_skip_empty_and_null() {
        let (dir, manager, config) = setup();
        std::fs::write(dir.path().join(".env.local"), "A=\nB=null\nC=x\n").unwrap();

        let vars = manager.effective_variables(&config, "local").unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["C"], "x");
    }

    #[test]
    fn overlay_wins_over_base_file() {
        let (dir, manager, mut config) = setup();
        std::fs::write(dir.path().join(".env.local"), "APP_ENV=local\nDEBUG=true\n").unwrap();

        manager.merge_variables(
            &mut config,
            "local",
            BTreeMap::from([("APP_ENV".to_string(), "staging".to_string())]),
        );

        let vars = manager.effective_variables(&config, "local").unwrap();
        assert_eq!(vars["APP_ENV"], "staging");
        assert_eq!(vars["DEBUG"], "true");
    }

    #[test]
    fn null_overlay_does_not_mask_base_value() {
        let (dir, manager, mut config) = setup();
        std::fs::write(dir.path().join(".env.local"), "A=base\n").unwrap();

        manager.merge_variables(
            &mut config,
            "local",
            BTreeMap::from([("A".to_string(), "null".to_string())]),
        );

        let vars = manager.effective_variables(&config, "local").unwrap();
        assert_eq!(vars["A"], "base");
    }

    #[test]
    fn missing_base_file_is_reported() {
        let (_dir, manager, config) = setup();
        let err = manager.effective_variables(&config, "local").unwrap_err();
        assert!(matches!(err, Error::EnvironmentFileMissing(_)));
    }

    #[test]
    fn select_seeds_env_file_and_creates_record() {
        let (dir, manager, mut config) = setup();
        let seed = dir.path().join("dotenv");
        std::fs::write(&seed, "APP_ENV=seeded\n").unwrap();

        let environment = manager.select(&mut config, "staging", Some(&seed)).unwrap();
        assert_eq!(environment.name, "staging");

        let content = std::fs::read_to_string(dir.path().join(".env.staging")).unwrap();
        assert_eq!(content, "APP_ENV=seeded\n");
        assert!(config.environments.contains_key("staging"));
    }

    #[test]
    fn select_keeps_existing_env_file() {
        let (dir, manager, mut config) = setup();
        std::fs::write(dir.path().join(".env.local"), "KEEP=1\n").unwrap();
        let seed = dir.path().join("dotenv");
        std::fs::write(&seed, "KEEP=0\n").unwrap();

        manager.select(&mut config, "local", Some(&seed)).unwrap();

        let content = std::fs::read_to_string(dir.path().join(".env.local")).unwrap();
        assert_eq!(content, "KEEP=1\n");
    }

    #[test]
    fn set_current_does_not_validate() {
        let (_dir, manager, mut config) = setup();
        manager.set_current(&mut config, "prod");
        assert_eq!(config.current_environment.as_deref(), Some("prod"));
        assert!(!config.environments.contains_key("prod"));
    }
}
