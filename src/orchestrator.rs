//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Input expansion: file paths and glob patterns
//! - Workflow coordination per input: load → update → align → write
//! - A single version catalog shared by every input of a run
//! - Dry-run mode support

use crate::cli::CliArgs;
use crate::domain::{InputSummary, UpdateSummary};
use crate::error::{AppError, ConfigError};
use crate::manifest::{ManifestNode, NodeContext, UpdateOptions};
use crate::progress::Progress;
use crate::registry::{HttpClient, MetadataSource, NpmRegistry};
use crate::update::{RangeResolver, VersionCatalog};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Published versions, shared across inputs
    catalog: Arc<VersionCatalog>,
}

impl Orchestrator {
    /// Create an orchestrator querying the npm registry
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        Ok(Self::with_source(args, Arc::new(NpmRegistry::new(client))))
    }

    /// Create an orchestrator with a custom metadata source
    pub fn with_source(args: CliArgs, source: Arc<dyn MetadataSource>) -> Self {
        Self::with_catalog(args, Arc::new(VersionCatalog::new(source)))
    }

    /// Create an orchestrator with a prepared catalog (for testing)
    pub fn with_catalog(args: CliArgs, catalog: Arc<VersionCatalog>) -> Self {
        Self { args, catalog }
    }

    /// Run the update workflow
    pub async fn run(&self) -> Result<UpdateSummary, AppError> {
        self.run_with_progress(self.args.show_progress()).await
    }

    /// Run the update workflow with optional progress display.
    ///
    /// Inputs are processed one after another; the first error aborts the run.
    pub async fn run_with_progress(&self, show_progress: bool) -> Result<UpdateSummary, AppError> {
        let mut progress = Progress::new(show_progress);
        let mut summary = UpdateSummary::new(self.args.dry_run);

        for path in self.inputs()? {
            let input = self.process_input(&path, &mut progress).await?;
            summary.add_input(input);
        }

        Ok(summary)
    }

    /// Manifest paths named by the command line, in order and without repeats
    pub fn inputs(&self) -> Result<Vec<PathBuf>, ConfigError> {
        expand_inputs(&self.args.files)
    }

    fn options(&self) -> UpdateOptions {
        UpdateOptions {
            quick: self.args.quick,
            bump: self.args.bump,
            workspaces: self.args.workspaces,
        }
    }

    async fn process_input(
        &self,
        path: &Path,
        progress: &mut Progress,
    ) -> Result<InputSummary, AppError> {
        let resolver = RangeResolver::new(self.catalog.clone(), self.args.strict);
        let context = NodeContext::new(resolver, self.options());
        let root = ManifestNode::load(path, context)?;

        progress.start(root.dependency_count() as u64, "Resolving dependencies");
        let reports = root.update(progress).await;
        progress.finish_and_clear();

        let mut input = InputSummary::new(path);
        input.manifests = reports?;

        if let Some(target) = &self.args.align {
            input.aligned = root.align(target.clone())?.map(|v| v.to_string());
        }

        input.versions = root.version_updates();
        input.changed = root.changed();

        if self.args.dry_run {
            debug!("Dry run, not writing {}", path.display());
        } else {
            let written = root.write()?;
            info!("Wrote {} manifest(s) for {}", written, path.display());
        }

        Ok(input)
    }
}

/// Expand paths and glob patterns into manifest paths.
///
/// Plain paths are kept as given even when missing so loading reports them;
/// an empty list means `package.json`.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    if patterns.is_empty() {
        return Ok(vec![PathBuf::from("package.json")]);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            let path = PathBuf::from(pattern);
            if !paths.contains(&path) {
                paths.push(path);
            }
            continue;
        }

        let matches = glob::glob(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        let mut matched = 0;
        for path in matches.filter_map(Result::ok) {
            matched += 1;
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        if matched == 0 {
            debug!("Pattern {} matched no files", pattern);
        }
    }

    Ok(paths)
}
