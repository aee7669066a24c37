//! Filesystem-backed graph loader for JavaScript/TypeScript source trees.

use archgraph_core::{ArchGraphError, GraphLoader, Result, SourceFile, SourceGraph};
use async_trait::async_trait;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "target", "dist", "build", "coverage"];

/// Extensions tried, in order, when an import omits one.
const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

#[derive(Clone)]
pub struct FsGraphLoader {
    extensions: HashSet<String>,
    static_import: Regex,
    dynamic_import: Regex,
}

impl FsGraphLoader {
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let static_import = Regex::new(
            r#"(?m)^\s*(?:import|export)\s+(?:type\s+)?(?:[^'"`;]*?\s+from\s+)?['"]([^'"]+)['"]"#,
        )
        .map_err(|e| ArchGraphError::graph_load(format!("Invalid import pattern: {}", e)))?;
        let dynamic_import = Regex::new(r#"\b(?:require|import)\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
            .map_err(|e| ArchGraphError::graph_load(format!("Invalid import pattern: {}", e)))?;

        Ok(Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            static_import,
            dynamic_import,
        })
    }

    /// Raw import specifiers in source order, without duplicates.
    pub fn import_specifiers(&self, source: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut specifiers = Vec::new();
        let mut matches: Vec<(usize, &str)> = self
            .static_import
            .captures_iter(source)
            .chain(self.dynamic_import.captures_iter(source))
            .filter_map(|c| c.get(1))
            .map(|m| (m.start(), m.as_str()))
            .collect();
        matches.sort_by_key(|(pos, _)| *pos);

        for (_, spec) in matches {
            if seen.insert(spec) {
                specifiers.push(spec.to_string());
            }
        }
        specifiers
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && self.is_source_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        files
    }

    fn load_sync(&self, root: &Path) -> Result<SourceGraph> {
        if !root.is_dir() {
            return Err(ArchGraphError::graph_load(format!(
                "Root path does not exist or is not a directory: {}",
                root.display()
            )));
        }

        let mut sources = Vec::new();
        for path in self.collect_files(root) {
            let Some(relative) = relative_path(root, &path) else {
                continue;
            };
            match std::fs::read_to_string(&path) {
                Ok(content) => sources.push((relative, content)),
                Err(e) => debug!(path = %path.display(), error = %e, "Skipping unreadable file"),
            }
        }

        let known: HashSet<&str> = sources.iter().map(|(p, _)| p.as_str()).collect();
        let files: Vec<SourceFile> = sources
            .iter()
            .map(|(path, content)| {
                let imports: BTreeSet<String> = self
                    .import_specifiers(content)
                    .iter()
                    .filter_map(|spec| resolve_import(path, spec, &known))
                    .filter(|target| target != path)
                    .collect();
                SourceFile {
                    path: path.clone(),
                    imports: imports.into_iter().collect(),
                }
            })
            .collect();

        let graph = SourceGraph {
            id: format!("graph-{}", Uuid::new_v4()),
            root_path: root.to_path_buf(),
            files,
        };
        info!(
            graph_id = %graph.id,
            files = graph.files.len(),
            imports = graph.files.iter().map(|f| f.imports.len()).sum::<usize>(),
            "Source graph loaded"
        );
        Ok(graph)
    }
}

#[async_trait]
impl GraphLoader for FsGraphLoader {
    async fn load_graph(&self, root_path: &Path) -> Result<SourceGraph> {
        let loader = self.clone();
        let root = root_path.to_path_buf();
        tokio::task::spawn_blocking(move || loader.load_sync(&root))
            .await
            .map_err(|e| ArchGraphError::graph_load(format!("Graph loading task failed: {}", e)))?
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Joins `spec` onto the directory of `from`, folding `.` and `..`.
///
/// Returns `None` when the path escapes the root.
fn join_relative(from: &str, spec: &str) -> Option<String> {
    let mut parts: Vec<&str> = from.split('/').collect();
    parts.pop();
    for component in Path::new(spec).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

/// Maps a relative import specifier onto a file of the graph.
///
/// Package imports resolve to nothing.
pub fn resolve_import(from: &str, spec: &str, known: &HashSet<&str>) -> Option<String> {
    if !(spec.starts_with("./") || spec.starts_with("../") || spec == "." || spec == "..") {
        return None;
    }
    let base = join_relative(from, spec)?;

    let mut candidates = vec![base.clone()];
    for (js, ts) in [(".js", ".ts"), (".jsx", ".tsx"), (".mjs", ".mts"), (".js", ".tsx")] {
        if let Some(stem) = base.strip_suffix(js) {
            candidates.push(format!("{}{}", stem, ts));
        }
    }
    for ext in RESOLVE_EXTENSIONS {
        candidates.push(format!("{}.{}", base, ext));
    }
    for ext in RESOLVE_EXTENSIONS {
        if base.is_empty() {
            candidates.push(format!("index.{}", ext));
        } else {
            candidates.push(format!("{}/index.{}", base, ext));
        }
    }

    candidates.into_iter().find(|c| known.contains(c.as_str()))
}
