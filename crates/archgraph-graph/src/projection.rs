//! Aggregates a file graph into modules.

use archgraph_core::{
    AggregationLevel, ArchGraphError, Module, ModuleProjection, ProjectionMetrics,
    ProjectionStrategy, Result, SourceGraph, ViewConfiguration,
};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const ROOT_MODULE: &str = ".";
const SOURCE_DIR: &str = "src";
const TEST_DIRS: &[&str] = &["__tests__", "tests", "test"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleProjectionStrategy;

impl ModuleProjectionStrategy {
    pub fn new() -> Self {
        Self
    }
}

pub fn is_test_file(path: &str) -> bool {
    let mut segments: Vec<&str> = path.split('/').collect();
    let file_name = segments.pop().unwrap_or_default();
    file_name.contains(".test.")
        || file_name.contains(".spec.")
        || segments.iter().any(|s| TEST_DIRS.contains(s))
}

fn exclusion_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            ArchGraphError::validation(format!("Invalid exclude pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ArchGraphError::validation(format!("Invalid exclude patterns: {}", e)))
}

/// Root-relative path of the module a file belongs to.
pub fn module_path(file: &str, level: AggregationLevel) -> String {
    match level {
        AggregationLevel::File => file.to_string(),
        AggregationLevel::Directory => match file.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => ROOT_MODULE.to_string(),
        },
        AggregationLevel::TopLevel => {
            let (prefix, rest) = match file.strip_prefix("src/") {
                Some(rest) => ("src/", rest),
                None => ("", file),
            };
            match rest.split_once('/') {
                Some((first, _)) => format!("{}{}", prefix, first),
                None if prefix.is_empty() => ROOT_MODULE.to_string(),
                None => SOURCE_DIR.to_string(),
            }
        }
    }
}

fn module_name(path: &str, root_name: &str) -> String {
    if path == ROOT_MODULE {
        return root_name.to_string();
    }
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Number of strongly connected components with more than one member.
///
/// `edges[i]` lists the indices node `i` depends on.
pub fn count_cycles(edges: &[Vec<usize>]) -> usize {
    strongly_connected_components(edges)
        .into_iter()
        .filter(|c| c.len() > 1)
        .count()
}

/// Tarjan's algorithm over an adjacency list.
///
/// The depth-first search keeps its frames in a heap-allocated work stack, so
/// arbitrarily long dependency chains never exhaust the thread stack.
pub fn strongly_connected_components(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    struct Tarjan {
        index_counter: usize,
        stack: Vec<usize>,
        on_stack: Vec<bool>,
        indices: Vec<Option<usize>>,
        lowlinks: Vec<usize>,
        components: Vec<Vec<usize>>,
    }

    impl Tarjan {
        fn enter(&mut self, node: usize) {
            self.indices[node] = Some(self.index_counter);
            self.lowlinks[node] = self.index_counter;
            self.index_counter += 1;
            self.stack.push(node);
            self.on_stack[node] = true;
        }

        fn close_component(&mut self, node: usize) {
            let mut component = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack[member] = false;
                component.push(member);
                if member == node {
                    break;
                }
            }
            self.components.push(component);
        }
    }

    let n = edges.len();
    let mut tarjan = Tarjan {
        index_counter: 0,
        stack: Vec::new(),
        on_stack: vec![false; n],
        indices: vec![None; n],
        lowlinks: vec![0; n],
        components: Vec::new(),
    };
    // (node, position of the next edge to follow)
    let mut work: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if tarjan.indices[root].is_some() {
            continue;
        }
        tarjan.enter(root);
        work.push((root, 0));

        while let Some(&(node, cursor)) = work.last() {
            if let Some(&next) = edges[node].get(cursor) {
                if let Some(frame) = work.last_mut() {
                    frame.1 += 1;
                }
                match tarjan.indices[next] {
                    None => {
                        tarjan.enter(next);
                        work.push((next, 0));
                    }
                    Some(index) if tarjan.on_stack[next] => {
                        tarjan.lowlinks[node] = tarjan.lowlinks[node].min(index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if Some(tarjan.lowlinks[node]) == tarjan.indices[node] {
                tarjan.close_component(node);
            }
            if let Some(&(parent, _)) = work.last() {
                tarjan.lowlinks[parent] = tarjan.lowlinks[parent].min(tarjan.lowlinks[node]);
            }
        }
    }
    tarjan.components
}

impl ModuleProjectionStrategy {
    fn project_sync(&self, graph: &SourceGraph, config: &ViewConfiguration) -> Result<ModuleProjection> {
        let excluded = exclusion_set(&config.exclude_patterns)?;
        let root_name = graph
            .root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ROOT_MODULE.to_string());

        let kept: Vec<_> = graph
            .files
            .iter()
            .filter(|f| config.include_tests || !is_test_file(&f.path))
            .filter(|f| !excluded.is_match(&f.path))
            .collect();

        let mut modules: BTreeMap<String, Module> = BTreeMap::new();
        let mut owner: HashMap<&str, String> = HashMap::new();
        for file in &kept {
            let path = module_path(&file.path, config.aggregation_level);
            let id = format!("module:{}", path);
            modules
                .entry(id.clone())
                .or_insert_with(|| Module::new(id.clone(), module_name(&path, &root_name), path))
                .add_file(file.path.clone());
            owner.insert(file.path.as_str(), id);
        }

        let mut links: Vec<(String, String)> = Vec::new();
        for file in &kept {
            let Some(from) = owner.get(file.path.as_str()) else {
                continue;
            };
            for import in &file.imports {
                if let Some(to) = owner.get(import.as_str()) {
                    if from != to {
                        links.push((from.clone(), to.clone()));
                    }
                }
            }
        }
        for (from, to) in &links {
            if let Some(module) = modules.get_mut(from) {
                module.add_dependency(to);
            }
            if let Some(module) = modules.get_mut(to) {
                module.add_dependent(from);
            }
        }

        let mut modules: Vec<Module> = modules.into_values().collect();
        modules.iter_mut().for_each(Module::refresh_metrics);

        let metrics = projection_metrics(&modules);
        debug!(
            modules = metrics.total_modules,
            files = metrics.total_files,
            cycles = metrics.cyclic_dependencies,
            skipped_files = graph.files.len() - kept.len(),
            "Module projection built"
        );
        Ok(ModuleProjection::new(modules, metrics))
    }
}

fn projection_metrics(modules: &[Module]) -> ProjectionMetrics {
    let index: HashMap<&str, usize> = modules
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id.as_str(), i))
        .collect();
    let edges: Vec<Vec<usize>> = modules
        .iter()
        .map(|m| {
            m.dependencies
                .iter()
                .filter_map(|d| index.get(d.as_str()).copied())
                .collect()
        })
        .collect();

    let total_dependencies: usize = modules.iter().map(Module::dependency_count).sum();
    ProjectionMetrics {
        total_modules: modules.len(),
        total_files: modules.iter().map(Module::file_count).sum(),
        total_dependencies,
        average_dependencies_per_module: if modules.is_empty() {
            0.0
        } else {
            total_dependencies as f64 / modules.len() as f64
        },
        max_dependencies: modules
            .iter()
            .map(Module::dependency_count)
            .max()
            .unwrap_or(0),
        cyclic_dependencies: count_cycles(&edges),
    }
}

#[async_trait]
impl ProjectionStrategy for ModuleProjectionStrategy {
    async fn project(&self, graph: &SourceGraph, config: &ViewConfiguration) -> Result<ModuleProjection> {
        self.project_sync(graph, config)
    }
}
