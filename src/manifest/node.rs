//! Manifest nodes
//!
//! A `ManifestNode` owns one package.json and the nodes of its workspace
//! members. Every node of a tree shares one `WorkspaceRegistry`; a node's
//! own version only ever changes through the registry, and each node
//! listens to it to keep its declared dependencies on workspace packages in
//! step.
//!
//! Lifecycle: `load` → `update` → `align` (optional) → `write`.

use crate::domain::{BumpLevel, DependencyChange, DependencyKind, ManifestReport, RangeSpec, VersionUpdate};
use crate::error::{AppError, ConfigError, ManifestError, RegistryError, WorkspaceError};
use crate::manifest::{read_manifest, write_manifest, PackageDocument};
use crate::progress::Progress;
use crate::registry::RegistryConfig;
use crate::update::RangeResolver;
use crate::workspace::{WorkspaceObserver, WorkspaceRegistry};
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Behaviour switches shared by every node of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Only account for dev/peer/optional changes when main dependencies changed
    pub quick: bool,
    /// Version increment applied to packages that changed
    pub bump: Option<BumpLevel>,
    /// Load workspace members declared in `workspaces`
    pub workspaces: bool,
}

/// Collaborators shared by every node of a workspace tree
#[derive(Clone)]
pub struct NodeContext {
    pub registry: Arc<WorkspaceRegistry>,
    pub resolver: RangeResolver,
    pub options: UpdateOptions,
}

impl NodeContext {
    /// Create a context with a fresh workspace registry
    pub fn new(resolver: RangeResolver, options: UpdateOptions) -> Self {
        Self {
            registry: Arc::new(WorkspaceRegistry::new()),
            resolver,
            options,
        }
    }
}

struct NodeState {
    document: PackageDocument,
    /// File content as loaded
    source: String,
    original_version: Version,
    version: Version,
    /// Document differs from the file on disk
    dirty: bool,
    /// Node has a change worth reporting
    changed: bool,
}

/// The part of a node the workspace registry calls back into
struct NodeShared {
    path: PathBuf,
    name: Option<String>,
    bump: Option<BumpLevel>,
    state: Mutex<NodeState>,
}

impl NodeShared {
    fn lock(&self) -> MutexGuard<'_, NodeState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a version and publish it; the caller guarantees it is not
    /// below the current one
    fn apply_version(
        &self,
        registry: &WorkspaceRegistry,
        version: &Version,
    ) -> Result<(), WorkspaceError> {
        {
            let mut state = self.lock();
            if state.version == *version {
                return Ok(());
            }
            state.document.set_version(&version.to_string());
            state.version = version.clone();
            state.dirty = true;
            state.changed = true;
        }

        info!("Updating {} version to {}", self.path.display(), version);
        if let Some(name) = &self.name {
            registry.record_update(name, version)?;
        }
        Ok(())
    }

    /// Set an explicit version.
    ///
    /// The load-time version is a no-op target; anything below it, or below
    /// a version already reached by a bump, is rejected before the document
    /// is touched.
    fn set_version(&self, registry: &WorkspaceRegistry, version: &Version) -> Result<(), AppError> {
        let (original, current) = {
            let state = self.lock();
            (state.original_version.clone(), state.version.clone())
        };
        if *version == original {
            return Ok(());
        }
        if *version < original {
            return Err(ManifestError::VersionBelowOriginal {
                path: self.path.clone(),
                original: original.to_string(),
                attempted: version.to_string(),
            }
            .into());
        }
        if *version < current {
            return Err(ManifestError::VersionBelowCurrent {
                path: self.path.clone(),
                current: current.to_string(),
                attempted: version.to_string(),
            }
            .into());
        }
        self.apply_version(registry, version)?;
        Ok(())
    }

    /// Advance the version from its original value, never moving it back
    fn bump(&self, registry: &WorkspaceRegistry) -> Result<(), WorkspaceError> {
        let Some(level) = self.bump else {
            return Ok(());
        };
        let (target, current) = {
            let state = self.lock();
            (level.apply(&state.original_version), state.version.clone())
        };
        if target <= current {
            return Ok(());
        }
        self.apply_version(registry, &target)
    }
}

impl WorkspaceObserver for NodeShared {
    fn on_version_change(
        &self,
        registry: &WorkspaceRegistry,
        name: &str,
        version: &Version,
    ) -> Result<(), WorkspaceError> {
        let touched = {
            let mut state = self.lock();
            let mut touched = false;
            for kind in DependencyKind::all() {
                let Some(declared) = state.document.dependency(*kind, name).map(str::to_string)
                else {
                    continue;
                };
                let Some(updated) = workspace_reference(&declared, version) else {
                    continue;
                };
                if updated != declared {
                    state.document.set_dependency(*kind, name, &updated);
                    touched = true;
                }
            }
            if touched {
                state.dirty = true;
                state.changed = true;
            }
            touched
        };

        if touched {
            debug!(
                "Workspace package {} moved to {} in {}",
                name,
                version,
                self.path.display()
            );
            self.bump(registry)?;
        }
        Ok(())
    }
}

/// New declaration for a dependency on a workspace package.
///
/// Caret and tilde keep their operator; protocol references such as
/// `workspace:^` or `file:../lib` are left alone.
fn workspace_reference(declared: &str, version: &Version) -> Option<String> {
    if declared.contains(':') {
        return None;
    }
    let version = version.to_string();
    match RangeSpec::parse(declared) {
        Some(spec) => Some(spec.format_updated(&version)),
        None => Some(version),
    }
}

/// Directories of the workspace members declared relative to `base`
fn expand_workspaces(base: &Path, entries: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    for entry in entries {
        if !entry.contains(['*', '?', '[']) {
            let dir = base.join(entry);
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
            continue;
        }

        let pattern = base.join(entry).to_string_lossy().into_owned();
        let matches = glob::glob(&pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut found: Vec<PathBuf> = matches
            .filter_map(Result::ok)
            .filter(|dir| dir.join("package.json").is_file())
            .collect();
        found.sort();
        for dir in found {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
    }

    Ok(dirs)
}

/// One package.json and its workspace members
pub struct ManifestNode {
    shared: Arc<NodeShared>,
    children: Vec<ManifestNode>,
    context: NodeContext,
    config: RegistryConfig,
}

impl ManifestNode {
    /// Load a manifest and, recursively, its workspace members.
    ///
    /// The package is registered in the shared registry before its members
    /// are loaded, so a member reusing an ancestor's name is rejected.
    pub fn load(path: impl Into<PathBuf>, context: NodeContext) -> Result<Self, AppError> {
        let path = path.into();
        debug!("Reading package file {}", path.display());

        let content = read_manifest(&path)?;
        let document = PackageDocument::parse(&path, &content)?;
        let config = RegistryConfig::load_for(&path)?;

        let original_version = match document.version() {
            Some(raw) => Version::parse(raw).map_err(|_| ManifestError::InvalidVersion {
                path: path.clone(),
                version: raw.to_string(),
            })?,
            None => Version::new(0, 0, 0),
        };

        let name = document.name().map(str::to_string);
        if let Some(name) = &name {
            context
                .registry
                .register(name, Some(original_version.clone()))?;
        }

        let workspaces = if context.options.workspaces {
            document.workspaces()
        } else {
            Vec::new()
        };

        let shared = Arc::new(NodeShared {
            path: path.clone(),
            name,
            bump: context.options.bump,
            state: Mutex::new(NodeState {
                document,
                source: content,
                version: original_version.clone(),
                original_version,
                dirty: false,
                changed: false,
            }),
        });
        context.registry.subscribe(shared.clone());

        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut children = Vec::new();
        for dir in expand_workspaces(&base, &workspaces)? {
            children.push(ManifestNode::load(dir.join("package.json"), context.clone())?);
        }

        Ok(Self {
            shared,
            children,
            context,
            config,
        })
    }

    /// Path of the manifest file
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Package name, if declared
    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Current package version
    pub fn version(&self) -> Version {
        self.shared.lock().version.clone()
    }

    /// Package version at load time
    pub fn original_version(&self) -> Version {
        self.shared.lock().original_version.clone()
    }

    /// Workspace members
    pub fn children(&self) -> &[ManifestNode] {
        &self.children
    }

    /// Current declared range of a dependency
    pub fn dependency(&self, kind: DependencyKind, name: &str) -> Option<String> {
        self.shared
            .lock()
            .document
            .dependency(kind, name)
            .map(str::to_string)
    }

    /// Returns true if this node's document needs writing
    pub fn is_dirty(&self) -> bool {
        self.shared.lock().dirty
    }

    /// Returns true if this node or any workspace member changed
    pub fn changed(&self) -> bool {
        self.shared.lock().changed || self.children.iter().any(ManifestNode::changed)
    }

    /// Number of declared dependencies in this tree
    pub fn dependency_count(&self) -> usize {
        let own: usize = {
            let state = self.shared.lock();
            DependencyKind::all()
                .iter()
                .map(|kind| state.document.dependencies(*kind).len())
                .sum()
        };
        own + self
            .children
            .iter()
            .map(ManifestNode::dependency_count)
            .sum::<usize>()
    }

    /// Update the dependencies of this tree, workspace members first.
    ///
    /// Returns one report per manifest in processing order.
    pub async fn update(&self, progress: &Progress) -> Result<Vec<ManifestReport>, AppError> {
        let mut reports = Vec::new();
        for child in &self.children {
            reports.extend(Box::pin(child.update(progress)).await?);
        }

        let (name, version) = {
            let state = self.shared.lock();
            (self.shared.name.clone(), state.version.to_string())
        };
        let mut report = ManifestReport::new(&self.shared.path, name, version);

        let mut changes = self.update_group(DependencyKind::Main, progress).await?;
        let main_changed = !changes.is_empty();

        for kind in &DependencyKind::all()[1..] {
            let group = self.update_group(*kind, progress).await?;
            if main_changed || !self.context.options.quick {
                changes.extend(group);
            } else if !group.is_empty() {
                debug!(
                    "Not reporting {} {} changes in {} (quick mode)",
                    group.len(),
                    kind,
                    self.shared.path.display()
                );
            }
        }

        if !changes.is_empty() {
            changes.sort_by(|a, b| a.name.cmp(&b.name));
            self.shared.lock().changed = true;
            self.shared.bump(&self.context.registry)?;
        }

        report.changes = changes;
        reports.push(report);
        Ok(reports)
    }

    /// Resolve every dependency of one group concurrently and apply the results
    async fn update_group(
        &self,
        kind: DependencyKind,
        progress: &Progress,
    ) -> Result<Vec<DependencyChange>, AppError> {
        let entries = self.shared.lock().document.dependencies(kind);
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let lookups = entries.into_iter().map(|(name, declared)| async move {
            let member = self.context.registry.has(&name);
            let updated = self
                .context
                .resolver
                .resolve(&name, &declared, member, &self.config)
                .await?;
            progress.inc();
            Ok::<_, RegistryError>(DependencyChange::new(name, declared, updated, kind))
        });

        let changes: Vec<DependencyChange> = futures::future::try_join_all(lookups)
            .await?
            .into_iter()
            .filter(|change| change.declared != change.updated)
            .collect();

        if !changes.is_empty() {
            let mut state = self.shared.lock();
            for change in &changes {
                state
                    .document
                    .set_dependency(kind, &change.name, &change.updated);
            }
            state.dirty = true;
        }

        Ok(changes)
    }

    /// Give every package of a multi-package workspace the same version.
    ///
    /// Without a target the highest registered version is used. Returns the
    /// version aligned to, or `None` when the workspace has a single package.
    pub fn align(&self, target: Option<Version>) -> Result<Option<Version>, AppError> {
        let entries = self.context.registry.entries();
        if entries.len() < 2 {
            debug!("No workspaces found in {}", self.shared.path.display());
            return Ok(None);
        }

        let target = match target {
            Some(target) => target,
            None => entries
                .into_iter()
                .map(|(_, version)| version)
                .max()
                .unwrap_or(Version::new(0, 0, 0)),
        };
        self.set_version_recursive(&target)?;
        info!("Workspaces versions aligned to {}", target);
        Ok(Some(target))
    }

    fn set_version_recursive(&self, version: &Version) -> Result<(), AppError> {
        self.shared.set_version(&self.context.registry, version)?;
        for child in &self.children {
            child.set_version_recursive(version)?;
        }
        Ok(())
    }

    /// Normalize and write every manifest of this tree.
    ///
    /// Files whose normalized content matches what was loaded are left
    /// untouched. Returns how many files were written.
    pub fn write(&self) -> Result<usize, AppError> {
        let content = {
            let mut state = self.shared.lock();
            state.document.normalize_dependencies();
            let content = state.document.to_json_string(&self.shared.path)?;
            if state.dirty || content != state.source {
                Some(content)
            } else {
                None
            }
        };

        let mut written = 0;
        if let Some(content) = content {
            debug!(">>> {} <<<\n{}", self.shared.path.display(), content);
            write_manifest(&self.shared.path, &content)?;
            written += 1;
        }

        for child in &self.children {
            written += child.write()?;
        }
        Ok(written)
    }

    /// Packages of this tree whose version moved since load
    pub fn version_updates(&self) -> Vec<VersionUpdate> {
        let mut updates = Vec::new();
        self.collect_version_updates(&mut updates);
        updates
    }

    fn collect_version_updates(&self, updates: &mut Vec<VersionUpdate>) {
        for child in &self.children {
            child.collect_version_updates(updates);
        }
        let state = self.shared.lock();
        if state.version != state.original_version {
            updates.push(VersionUpdate {
                path: self.shared.path.clone(),
                name: self.shared.name.clone(),
                from: state.original_version.to_string(),
                to: state.version.to_string(),
            });
        }
    }
}
