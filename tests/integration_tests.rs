//! Integration tests for pkgbump
//!
//! These tests verify:
//! - Range resolution through whole workspace trees on disk
//! - Version bumping, propagation and alignment across members
//! - Quick mode, dry runs and repeated runs
//!
//! Published versions come from a pre-seeded catalog; nothing touches the
//! network.

use async_trait::async_trait;
use clap::Parser;
use pkgbump::cli::CliArgs;
use pkgbump::domain::{DependencyKind, UpdateSummary};
use pkgbump::error::{AppError, RegistryError, WorkspaceError};
use pkgbump::orchestrator::Orchestrator;
use pkgbump::registry::{MetadataSource, PackageMetadata, RegistryConfig};
use pkgbump::update::VersionCatalog;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct OfflineSource;

#[async_trait]
impl MetadataSource for OfflineSource {
    fn registry_name(&self) -> &'static str {
        "offline"
    }

    async fn fetch_metadata(
        &self,
        package: &str,
        _config: &RegistryConfig,
    ) -> Result<PackageMetadata, RegistryError> {
        Err(RegistryError::package_not_found(package, "offline"))
    }
}

fn seeded_catalog() -> Arc<VersionCatalog> {
    let catalog = VersionCatalog::new(Arc::new(OfflineSource));
    catalog.seed("lodash", false, ["4.17.21", "4.17.20", "4.16.0", "3.10.1"]);
    catalog.seed("react", false, ["19.1.0", "19.0.0", "18.3.1", "18.2.0"]);
    catalog.seed("typescript", false, ["5.5.4", "5.4.5", "5.4.2", "5.0.4"]);
    catalog.seed("eslint", false, ["9.9.0", "8.57.0", "8.50.0"]);
    Arc::new(catalog)
}

fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

async fn run(root: &Path, flags: &[&str]) -> Result<UpdateSummary, AppError> {
    let path = root.join("package.json").to_string_lossy().into_owned();
    let mut argv = vec!["pkgbump", path.as_str()];
    argv.extend(flags);
    let args = CliArgs::parse_from(argv);
    Orchestrator::with_catalog(args, seeded_catalog())
        .run_with_progress(false)
        .await
}

/// root 1.0.0 → [core 1.0.0, web 1.1.0]; web depends on core
fn create_workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    write(
        dir.path(),
        "package.json",
        r#"{
  "name": "root",
  "version": "1.0.0",
  "private": true,
  "workspaces": ["packages/*"],
  "devDependencies": {
    "typescript": "~5.4.2",
    "eslint": "^8.50.0"
  }
}
"#,
    );
    write(
        dir.path(),
        "packages/core/package.json",
        r#"{
  "name": "core",
  "version": "1.0.0",
  "dependencies": {
    "lodash": "^4.16.0"
  }
}
"#,
    );
    write(
        dir.path(),
        "packages/web/package.json",
        r#"{
  "name": "web",
  "version": "1.1.0",
  "dependencies": {
    "react": "^18.2.0",
    "core": "^1.0.0"
  },
  "peerDependencies": {
    "react": "^18.2.0"
  }
}
"#,
    );
    dir
}

mod resolution {
    use super::*;

    #[tokio::test]
    async fn test_relaxed_mode_crosses_majors() {
        let dir = create_workspace();
        let summary = run(dir.path(), &["-w"]).await.unwrap();

        assert!(summary.has_changes());
        let web = read_json(&dir.path().join("packages/web/package.json"));
        assert_eq!(web["dependencies"]["react"], "^19.1.0");
        assert_eq!(web["peerDependencies"]["react"], "^19.1.0");
        assert_eq!(web["dependencies"]["core"], "^1.0.0");

        let root = read_json(&dir.path().join("package.json"));
        assert_eq!(root["devDependencies"]["typescript"], "~5.5.4");
        assert_eq!(root["devDependencies"]["eslint"], "^9.9.0");
    }

    #[tokio::test]
    async fn test_strict_mode_stays_in_bounds() {
        let dir = create_workspace();
        run(dir.path(), &["-w", "-s"]).await.unwrap();

        let web = read_json(&dir.path().join("packages/web/package.json"));
        assert_eq!(web["dependencies"]["react"], "^18.3.1");

        let core = read_json(&dir.path().join("packages/core/package.json"));
        assert_eq!(core["dependencies"]["lodash"], "^4.17.21");

        let root = read_json(&dir.path().join("package.json"));
        assert_eq!(root["devDependencies"]["typescript"], "~5.4.5");
        assert_eq!(root["devDependencies"]["eslint"], "^8.57.0");
    }

    #[tokio::test]
    async fn test_reports_follow_processing_order() {
        let dir = create_workspace();
        let summary = run(dir.path(), &["-w", "-s"]).await.unwrap();

        let paths: Vec<PathBuf> = summary.manifests().map(|m| m.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                dir.path().join("packages/core/package.json"),
                dir.path().join("packages/web/package.json"),
                dir.path().join("package.json"),
            ]
        );

        let root = summary.manifests().last().unwrap();
        let names: Vec<&str> = root.changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["eslint", "typescript"]);
        assert!(root.changes.iter().all(|c| c.kind == DependencyKind::Dev));
    }

    #[tokio::test]
    async fn test_without_workspaces_only_root_is_processed() {
        let dir = create_workspace();
        let summary = run(dir.path(), &[]).await.unwrap();

        assert_eq!(summary.manifests().count(), 1);
        let web = fs::read_to_string(dir.path().join("packages/web/package.json")).unwrap();
        assert!(web.contains("\"react\": \"^18.2.0\""));
    }

    #[tokio::test]
    async fn test_unknown_package_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "package.json",
            r#"{"dependencies": {"left-pad": "^1.0.0"}}"#,
        );

        let result = run(dir.path(), &[]).await;
        assert!(matches!(
            result,
            Err(AppError::Registry(RegistryError::PackageNotFound { .. }))
        ));
    }
}

mod versions {
    use super::*;

    #[tokio::test]
    async fn test_bump_propagates_to_dependents() {
        let dir = create_workspace();
        let summary = run(dir.path(), &["-w", "-s", "--bump", "minor"]).await.unwrap();

        let core = read_json(&dir.path().join("packages/core/package.json"));
        assert_eq!(core["version"], "1.1.0");

        let web = read_json(&dir.path().join("packages/web/package.json"));
        assert_eq!(web["version"], "1.2.0");
        assert_eq!(web["dependencies"]["core"], "^1.1.0");

        let root = read_json(&dir.path().join("package.json"));
        assert_eq!(root["version"], "1.1.0");

        let updates = &summary.inputs[0].versions;
        assert_eq!(updates.len(), 3);
        assert!(updates
            .iter()
            .any(|u| u.name.as_deref() == Some("web") && u.from == "1.1.0" && u.to == "1.2.0"));
    }

    #[tokio::test]
    async fn test_align_to_highest_version() {
        let dir = create_workspace();
        let summary = run(dir.path(), &["-w", "-s", "-a"]).await.unwrap();

        assert_eq!(summary.inputs[0].aligned.as_deref(), Some("1.1.0"));
        for relative in ["package.json", "packages/core/package.json", "packages/web/package.json"] {
            assert_eq!(read_json(&dir.path().join(relative))["version"], "1.1.0");
        }
        let web = read_json(&dir.path().join("packages/web/package.json"));
        assert_eq!(web["dependencies"]["core"], "^1.1.0");
    }

    #[tokio::test]
    async fn test_align_after_bump() {
        let dir = create_workspace();
        let summary = run(dir.path(), &["-w", "-s", "-b", "patch", "-a"])
            .await
            .unwrap();

        // web 1.1.0 → 1.1.1 after core's bump; everything follows
        assert_eq!(summary.inputs[0].aligned.as_deref(), Some("1.1.1"));
        for relative in ["package.json", "packages/core/package.json", "packages/web/package.json"] {
            assert_eq!(read_json(&dir.path().join(relative))["version"], "1.1.1");
        }
    }

    #[tokio::test]
    async fn test_align_explicit_version() {
        let dir = create_workspace();
        run(dir.path(), &["-w", "--align=2.0.0"]).await.unwrap();

        for relative in ["package.json", "packages/core/package.json", "packages/web/package.json"] {
            assert_eq!(read_json(&dir.path().join(relative))["version"], "2.0.0");
        }
    }

    #[tokio::test]
    async fn test_duplicate_member_names_fail() {
        let dir = create_workspace();
        write(
            dir.path(),
            "packages/zzz/package.json",
            r#"{"name": "core", "version": "3.0.0"}"#,
        );

        let result = run(dir.path(), &["-w"]).await;
        assert!(matches!(
            result,
            Err(AppError::Workspace(WorkspaceError::DuplicatePackage { .. }))
        ));
    }
}

mod modes {
    use super::*;

    #[tokio::test]
    async fn test_quick_mode_hides_dev_only_changes() {
        let dir = create_workspace();
        let summary = run(dir.path(), &["-q", "-s", "-b"]).await.unwrap();

        // Only dev dependencies moved: written, not reported, not bumped
        assert!(!summary.has_changes());
        assert_eq!(summary.total_changes(), 0);
        let root = read_json(&dir.path().join("package.json"));
        assert_eq!(root["devDependencies"]["typescript"], "~5.4.5");
        assert_eq!(root["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = create_workspace();
        let paths = [
            dir.path().join("package.json"),
            dir.path().join("packages/core/package.json"),
            dir.path().join("packages/web/package.json"),
        ];
        let before: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();

        let summary = run(dir.path(), &["-w", "-x", "-b", "-a"]).await.unwrap();

        assert!(summary.dry_run);
        assert!(summary.has_changes());
        let after: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let dir = create_workspace();
        run(dir.path(), &["-w"]).await.unwrap();
        let first = fs::read_to_string(dir.path().join("packages/web/package.json")).unwrap();

        let summary = run(dir.path(), &["-w"]).await.unwrap();

        assert!(!summary.has_changes());
        let second = fs::read_to_string(dir.path().join("packages/web/package.json")).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_output_is_normalized() {
        let dir = create_workspace();
        run(dir.path(), &["-w"]).await.unwrap();

        let web = fs::read_to_string(dir.path().join("packages/web/package.json")).unwrap();
        assert_eq!(
            web,
            r#"{
  "name": "web",
  "version": "1.1.0",
  "dependencies": {
    "core": "^1.0.0",
    "react": "^19.1.0"
  },
  "peerDependencies": {
    "react": "^19.1.0"
  }
}
"#
        );
    }
}
