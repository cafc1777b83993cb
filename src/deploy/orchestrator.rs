// ABOUTME: Orchestrator driving the build, deploy and rollback workflows.
// ABOUTME: Collaborators are injected; every mutation is a read-modify-write of the document.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::config::{ConfigStore, Environment, ProjectConfig, ProjectLayout};
use crate::diagnostics::{Diagnostics, Warning};
use crate::driver::{
    History, ImageBuilder, ManifestRenderer, Phase, ReleaseDriver, RenderedManifest,
};
use crate::environment::EnvironmentManager;
use crate::error::{Error, Result};
use crate::ledger::{BuildVersion, LedgerError};
use crate::template::{DOTENV_FILE, Template, TemplateRegistry};
use crate::types::{Revision, VersionTag};

use super::rollback::{RollbackOutcome, manual_rollback};
use super::{DeployReport, Deployment, ManifestSource};

/// Which recorded build a deploy targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Most recently built version.
    Latest,
    /// Exact tag.
    Tag(String),
    /// Build preceding the last deployed one.
    Previous,
}

/// Parameters of one deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub version: VersionSelector,
    /// Value overrides; persisted as the last used options unless dry run.
    pub options: Option<BTreeMap<String, String>>,
    pub dry_run: bool,
    /// Roll back automatically if the install fails.
    pub allow_rollback: bool,
}

impl DeployRequest {
    /// Deploy the latest build with automatic rollback.
    pub fn latest() -> Self {
        Self {
            version: VersionSelector::Latest,
            options: None,
            dry_run: false,
            allow_rollback: true,
        }
    }
}

/// Runs kubeb workflows against injected collaborators.
pub struct Orchestrator<S, B, R, D> {
    store: S,
    builder: B,
    renderer: R,
    driver: D,
    layout: ProjectLayout,
    registry: TemplateRegistry,
    environments: EnvironmentManager,
}

impl<S, B, R, D> Orchestrator<S, B, R, D>
where
    S: ConfigStore,
    B: ImageBuilder,
    R: ManifestRenderer,
    D: ReleaseDriver,
{
    pub fn new(
        layout: ProjectLayout,
        registry: TemplateRegistry,
        store: S,
        builder: B,
        renderer: R,
        driver: D,
    ) -> Self {
        let environments = EnvironmentManager::new(layout.clone());
        Self {
            store,
            builder,
            renderer,
            driver,
            layout,
            registry,
            environments,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The project document.
    pub fn project(&self) -> Result<ProjectConfig> {
        self.store.load()
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the image under a fresh tag, optionally push it, then record it.
    ///
    /// The ledger is only touched once every external step succeeded.
    pub async fn build(&self, note: String, push: bool) -> Result<BuildVersion> {
        let config = self.store.load()?;
        let newest = config
            .version
            .iter()
            .map(|v| &v.tag)
            .max_by_key(|tag| tag.millis());
        let tag = VersionTag::generate(Utc::now(), newest);
        if config.version.iter().any(|v| v.tag == tag) {
            return Err(Error::DuplicateTag(tag));
        }

        tracing::info!("Building image {}", config.image.tagged(&tag));
        let status = self
            .builder
            .build(&config.image, &tag, self.layout.root())
            .await?;
        if !status.success() {
            return Err(Error::ExternalCommandFailed {
                phase: Phase::Build,
                status,
            });
        }

        if push {
            self.push_tag(&config, &tag).await?;
        }

        let version = self.store.update(|config| {
            Ok(config.version.append(tag.clone(), note)?.clone())
        })?;
        tracing::info!("Recorded version {}", version.tag);
        Ok(version)
    }

    /// Push an already built version; the latest one when `version` is `None`.
    pub async fn push(&self, version: Option<&str>) -> Result<BuildVersion> {
        let config = self.store.load()?;
        let version = config.version.resolve(version)?.clone();
        self.push_tag(&config, &version.tag).await?;
        Ok(version)
    }

    async fn push_tag(&self, config: &ProjectConfig, tag: &VersionTag) -> Result<()> {
        tracing::info!("Pushing image {}", config.image.tagged(tag));
        let status = self.builder.push(&config.image, tag).await?;
        if !status.success() {
            return Err(Error::ExternalCommandFailed {
                phase: Phase::Push,
                status,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Deploy
    // =========================================================================

    /// Deploy a recorded version to the current environment.
    ///
    /// Rendering failures abort before anything is installed. A failed
    /// install is rolled back at most once, and never for a dry run.
    pub async fn deploy(
        &self,
        request: &DeployRequest,
        diag: &mut Diagnostics,
    ) -> Result<DeployReport> {
        let config = self.store.load()?;
        let version = select_version(&config, &request.version)?;

        let env_name = config.current_environment()?.to_string();
        let variables = self.environments.effective_variables(&config, &env_name)?;
        let template = Template::from_config(&config.template, config.ext_template)?;
        let env_file = self.layout.env_file(&env_name);

        tracing::info!(
            "Deploying {} version {} to environment {}",
            config.name,
            version.tag,
            env_name
        );

        let deployment = Deployment::new(
            config.name.clone(),
            version,
            request.dry_run,
            request.options.clone().unwrap_or_default(),
        );
        let deployment = deployment.render(
            &self.renderer,
            &ManifestSource {
                template: &template,
                image: &config.image,
                variables: &variables,
                env_file: &env_file,
            },
        )?;

        if let Some(options) = &request.options
            && !request.dry_run
        {
            self.store.update(|config| {
                config.last_deploy_options = Some(options.clone());
                Ok(())
            })?;
        }

        match deployment.install(&self.driver, config.install_timeout).await {
            Ok(deployed) => {
                self.cleanup(deployed.manifest(), diag);
                let report = deployed.finish();
                if !request.dry_run {
                    self.store.update(|config| {
                        config.last_deploy_version = Some(report.version.tag.clone());
                        Ok(())
                    })?;
                    tracing::info!("Deployed version {}", report.version.tag);
                }
                Ok(report)
            }
            Err((failed, source)) => {
                self.cleanup(failed.manifest(), diag);
                let tag = failed.tag().clone();
                tracing::warn!("Install of {} failed: {}", tag, source);

                let rollback = if request.allow_rollback {
                    failed.rollback(&self.driver).await
                } else {
                    RollbackOutcome::Skipped
                };
                if rollback == RollbackOutcome::Unavailable {
                    diag.warn(Warning::rollback_unavailable(format!(
                        "No superseded revision of {} to roll back to",
                        config.name
                    )));
                }

                Err(Error::DeployFailed {
                    tag,
                    source,
                    rollback,
                })
            }
        }
    }

    fn cleanup(&self, manifest: &RenderedManifest, diag: &mut Diagnostics) {
        if let Err(e) = self.renderer.cleanup(manifest) {
            diag.warn(Warning::manifest_cleanup(format!(
                "Failed to remove temporary manifest files: {}",
                e
            )));
        }
    }

    // =========================================================================
    // Release operations
    // =========================================================================

    /// Roll the release back to `revision`, or to the last superseded one.
    pub async fn rollback(&self, revision: Option<Revision>) -> Result<Revision> {
        let config = self.store.load()?;
        manual_rollback(&self.driver, &config.name, revision).await
    }

    /// Uninstall the release. Persisted state is left as is.
    pub async fn delete(&self) -> Result<()> {
        let config = self.store.load()?;
        tracing::info!("Uninstalling {}", config.name);
        let status = self.driver.uninstall(&config.name).await?;
        if !status.success() {
            return Err(Error::ExternalCommandFailed {
                phase: Phase::Uninstall,
                status,
            });
        }
        Ok(())
    }

    pub async fn history(&self) -> Result<History> {
        let config = self.store.load()?;
        let history = self.driver.history(&config.name).await?;
        if !history.status.success() {
            return Err(Error::ExternalCommandFailed {
                phase: Phase::History,
                status: history.status,
            });
        }
        Ok(history)
    }

    /// Recorded builds in ledger order, with the last deployed tag.
    pub fn versions(&self) -> Result<(Vec<BuildVersion>, Option<VersionTag>)> {
        let config = self.store.load()?;
        Ok((
            config.version.iter().cloned().collect(),
            config.last_deploy_version,
        ))
    }

    // =========================================================================
    // Environments
    // =========================================================================

    /// Make `name` the current environment. Returns whether it was new.
    pub fn use_environment(&self, name: &str) -> Result<bool> {
        self.store.update(|config| {
            let created = !config.environments.contains_key(name);
            let seed = Template::from_config(&config.template, config.ext_template)
                .ok()
                .map(|template| self.registry.dir(&template).join(DOTENV_FILE));
            self.environments.select(config, name, seed.as_deref())?;
            self.environments.set_current(config, name);
            Ok(created)
        })
    }

    /// Merge variables into the current environment's overlay.
    pub fn set_variables(&self, overrides: BTreeMap<String, String>) -> Result<Environment> {
        self.store.update(|config| {
            let name = config.current_environment()?.to_string();
            Ok(self
                .environments
                .merge_variables(config, &name, overrides)
                .clone())
        })
    }

    /// Effective variables of the current environment.
    pub fn variables(&self) -> Result<(String, BTreeMap<String, String>)> {
        let config = self.store.load()?;
        let name = config.current_environment()?.to_string();
        let variables = self.environments.effective_variables(&config, &name)?;
        Ok((name, variables))
    }
}

fn select_version(config: &ProjectConfig, selector: &VersionSelector) -> Result<BuildVersion> {
    let version = match selector {
        VersionSelector::Latest => config.version.resolve(None)?.clone(),
        VersionSelector::Tag(tag) => config.version.resolve(Some(tag.as_str()))?.clone(),
        VersionSelector::Previous => {
            let last = config.last_deploy_version.as_ref().ok_or_else(|| {
                Error::NoDeployableVersion("nothing has been deployed yet".to_string())
            })?;
            config
                .version
                .previous(last.as_str())
                .map_err(|e| match e {
                    LedgerError::NoPrevious(tag) => Error::NoDeployableVersion(format!(
                        "{tag} is the earliest recorded version"
                    )),
                    other => Error::from(other),
                })?
        }
    };
    Ok(version)
}
