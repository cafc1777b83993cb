// ABOUTME: Integration tests for the persisted project document.
// ABOUTME: Tests YAML parsing, file store round trips and the init/destroy lifecycle.

use kubeb::config::*;
use kubeb::error::Error;
use kubeb::template::TemplateRegistry;
use kubeb::types::{ImageName, ReleaseName, VersionTag};
use std::time::Duration;

fn spec() -> ProjectSpec {
    ProjectSpec {
        name: ReleaseName::new("shop").unwrap(),
        user: "dev".to_string(),
        image: ImageName::parse("acme/shop").unwrap(),
        env: "local".to_string(),
    }
}

mod parsing {
    use super::*;

    #[test]
    fn parse_full_document() {
        let yaml = r#"
name: shop
image: registry.example.com/acme/shop
template: laravel
ext_template: false
user: dev
environments:
  local:
    name: local
    variables: {}
  staging:
    name: staging
    variables:
      APP_DEBUG: "false"
current_environment: staging
version:
  - tag: v1700000000000
    message: first
  - tag: v1700000001000
    message: "second\nwith details"
last_deploy_version: v1700000000000
install_timeout: 5m
"#;
        let config = ProjectConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.name.as_str(), "shop");
        assert_eq!(config.image.registry(), Some("registry.example.com"));
        assert_eq!(config.current_environment().unwrap(), "staging");
        assert_eq!(config.environments["staging"].variables["APP_DEBUG"], "false");
        assert_eq!(config.version.len(), 2);
        assert_eq!(
            config.version.latest().unwrap().message,
            "second\nwith details"
        );
        assert_eq!(
            config.last_deploy_version,
            Some(VersionTag::new("v1700000000000"))
        );
        assert_eq!(config.install_timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn invalid_release_name_is_rejected() {
        let yaml = "name: Shop_App\nimage: acme/shop\ntemplate: laravel\n";
        assert!(matches!(
            ProjectConfig::from_yaml(yaml),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn tagged_image_is_rejected() {
        let yaml = "name: shop\nimage: acme/shop:latest\ntemplate: laravel\n";
        assert!(ProjectConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn no_current_environment_is_reported() {
        let yaml = "name: shop\nimage: acme/shop\ntemplate: laravel\n";
        let config = ProjectConfig::from_yaml(yaml).unwrap();
        assert!(config.current_environment().is_err());
        assert!(config.version.is_empty());
    }
}

mod file_store {
    use super::*;

    #[test]
    fn missing_document_is_configuration_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(ProjectLayout::new(dir.path()));

        assert!(!store.exists());
        assert!(matches!(
            store.load(),
            Err(Error::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn save_then_load_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(ProjectLayout::new(dir.path()));
        let mut config = ProjectConfig::new(&spec(), "laravel", false);
        config
            .version
            .append(VersionTag::new("v1"), "first".to_string())
            .unwrap();
        config.last_deploy_version = Some(VersionTag::new("v1"));

        store.save(&config).unwrap();
        let loaded = store.load().unwrap();

        assert!(dir.path().join(".kubeb/config.yml").is_file());
        assert_eq!(loaded.name, config.name);
        assert_eq!(loaded.version, config.version);
        assert_eq!(loaded.last_deploy_version, config.last_deploy_version);
        assert_eq!(loaded.environments, config.environments);
    }

    #[test]
    fn saved_document_uses_plain_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(ProjectLayout::new(dir.path()));
        store
            .save(&ProjectConfig::new(&spec(), "laravel", false))
            .unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        for field in [
            "name: shop",
            "image: acme/shop",
            "template: laravel",
            "ext_template: false",
            "current_environment: local",
        ] {
            assert!(content.contains(field), "missing `{field}` in:\n{content}");
        }
        assert!(!content.contains("install_timeout"));
    }

    #[test]
    fn failed_update_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(ProjectLayout::new(dir.path()));
        store
            .save(&ProjectConfig::new(&spec(), "laravel", false))
            .unwrap();

        let result: Result<(), Error> = store.update(|config| {
            config.user = "someone-else".to_string();
            Err(Error::InvalidConfig("stop".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.load().unwrap().user, "dev");
    }
}

mod assignments {
    use super::*;

    #[test]
    fn comma_separated_assignments_are_split() {
        let parsed = parse_assignments(&["a=1,b=2", "c=x=y"]).unwrap();
        assert_eq!(parsed["a"], "1");
        assert_eq!(parsed["b"], "2");
        assert_eq!(parsed["c"], "x=y");
    }

    #[test]
    fn missing_equals_is_rejected() {
        assert!(parse_assignment("novalue").is_err());
    }
}

mod lifecycle {
    use super::*;
    use kubeb::template::{BUILTIN_DIR, DOTENV_FILE};

    fn home_with_laravel() -> tempfile::TempDir {
        let home = tempfile::tempdir().unwrap();
        let template = home.path().join(BUILTIN_DIR).join("laravel");
        std::fs::create_dir_all(template.join("laravel/templates")).unwrap();
        std::fs::create_dir_all(template.join("docker/nginx")).unwrap();
        std::fs::write(template.join(DOTENV_FILE), "APP_ENV=local\n").unwrap();
        std::fs::write(template.join("Dockerfile"), "FROM php:8\n").unwrap();
        std::fs::write(template.join("docker/nginx/default.conf"), "server {}\n").unwrap();
        std::fs::write(template.join("laravel/Chart.yaml"), "name: laravel\n").unwrap();
        home
    }

    #[test]
    fn init_scaffolds_project_from_template() {
        let home = home_with_laravel();
        let project = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(project.path());
        let registry = TemplateRegistry::new(home.path());

        let config = init_project(&layout, &registry, &spec(), "laravel", false).unwrap();

        assert_eq!(config.template, "laravel");
        assert!(!config.ext_template);
        assert!(layout.config_file().is_file());
        assert!(project.path().join("Dockerfile").is_file());
        assert!(project.path().join("docker/nginx/default.conf").is_file());
        assert!(layout.chart_dir("laravel").join("Chart.yaml").is_file());
        assert_eq!(
            std::fs::read_to_string(layout.env_file("local")).unwrap(),
            "APP_ENV=local\n"
        );
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let home = home_with_laravel();
        let project = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(project.path());
        let registry = TemplateRegistry::new(home.path());
        let store = FileStore::new(layout.clone());

        init_project(&layout, &registry, &spec(), "laravel", false).unwrap();
        store
            .update(|config| {
                config
                    .version
                    .append(VersionTag::new("v1"), String::new())
                    .map(|_| ())
                    .map_err(Error::from)
            })
            .unwrap();

        assert!(matches!(
            init_project(&layout, &registry, &spec(), "laravel", false),
            Err(Error::AlreadyExists(_))
        ));
        assert_eq!(store.load().unwrap().version.len(), 1);

        init_project(&layout, &registry, &spec(), "laravel", true).unwrap();
        assert!(store.load().unwrap().version.is_empty());
    }

    #[test]
    fn unknown_template_fails_without_writing() {
        let home = home_with_laravel();
        let project = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(project.path());
        let registry = TemplateRegistry::new(home.path());

        assert!(matches!(
            init_project(&layout, &registry, &spec(), "rails", false),
            Err(Error::TemplateNotFound(name)) if name == "rails"
        ));
        assert!(!layout.config_dir().exists());
    }

    #[test]
    fn destroy_removes_config_dir() {
        let home = home_with_laravel();
        let project = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(project.path());
        let registry = TemplateRegistry::new(home.path());
        init_project(&layout, &registry, &spec(), "laravel", false).unwrap();

        assert!(destroy_project(&layout).unwrap());
        assert!(!layout.config_dir().exists());
        assert!(!destroy_project(&layout).unwrap());
    }
}
