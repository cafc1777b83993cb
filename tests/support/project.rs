// ABOUTME: Project fixture: a temporary project directory with an in-memory document.
// ABOUTME: Wires the fakes into an Orchestrator the way the CLI wires the real tools.

use kubeb::config::{MemoryStore, ProjectConfig, ProjectLayout, ProjectSpec};
use kubeb::deploy::Orchestrator;
use kubeb::ledger::BuildVersion;
use kubeb::template::TemplateRegistry;
use kubeb::types::{ImageName, ReleaseName, VersionTag};
use tempfile::TempDir;

use super::fakes::{FakeBuilder, FakeDriver, FakeRenderer};

pub type TestOrchestrator = Orchestrator<MemoryStore, FakeBuilder, FakeRenderer, FakeDriver>;

pub struct TestProject {
    pub dir: TempDir,
    pub home: TempDir,
    pub orchestrator: TestOrchestrator,
}

impl TestProject {
    pub fn config(&self) -> ProjectConfig {
        self.orchestrator
            .store()
            .snapshot()
            .expect("document should exist")
    }
}

/// Fresh document for release `shop` in environment `local`.
pub fn document() -> ProjectConfig {
    let spec = ProjectSpec {
        name: ReleaseName::new("shop").unwrap(),
        user: "dev".to_string(),
        image: ImageName::parse("registry.example.com/acme/shop").unwrap(),
        env: "local".to_string(),
    };
    ProjectConfig::new(&spec, "laravel", false)
}

/// Document with the given tags already built.
pub fn document_with_versions(tags: &[&str]) -> ProjectConfig {
    let mut config = document();
    for tag in tags {
        config
            .version
            .append(VersionTag::new(*tag), format!("build {tag}"))
            .unwrap();
    }
    config
}

/// Project with `config`, a `.env.local` file and the given fakes.
pub fn project(config: ProjectConfig, builder: FakeBuilder, driver: FakeDriver) -> TestProject {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env.local"), "APP_ENV=local\nAPP_DEBUG=true\n").unwrap();

    let orchestrator = Orchestrator::new(
        ProjectLayout::new(dir.path()),
        TemplateRegistry::new(home.path()),
        MemoryStore::new(config),
        builder,
        FakeRenderer::default(),
        driver,
    );
    TestProject {
        dir,
        home,
        orchestrator,
    }
}

pub fn tags(versions: &[BuildVersion]) -> Vec<&str> {
    versions.iter().map(|v| v.tag.as_str()).collect()
}
