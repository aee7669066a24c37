use crate::{ArchGraphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub type ModuleId = String;

/// Per-module counters computed by the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetrics {
    pub file_count: usize,
    pub dependency_count: usize,
    pub dependent_count: usize,
}

/// A unit of the analyzed codebase grouping files.
///
/// `dependencies` and `dependents` behave as insertion-ordered sets; the
/// projection that builds a module is responsible for keeping them unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub path: String,
    pub files: Vec<String>,
    pub dependencies: Vec<ModuleId>,
    pub dependents: Vec<ModuleId>,
    pub metrics: ModuleMetrics,
}

impl Module {
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            files: Vec::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            metrics: ModuleMetrics::default(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn dependent_count(&self) -> usize {
        self.dependents.len()
    }

    pub fn add_file(&mut self, file: impl Into<String>) {
        self.files.push(file.into());
    }

    /// Returns false when the dependency was already declared.
    pub fn add_dependency(&mut self, target: &str) -> bool {
        if self.dependencies.iter().any(|d| d == target) {
            return false;
        }
        self.dependencies.push(target.to_string());
        true
    }

    pub fn add_dependent(&mut self, source: &str) -> bool {
        if self.dependents.iter().any(|d| d == source) {
            return false;
        }
        self.dependents.push(source.to_string());
        true
    }

    /// Syncs the metrics sub-record with the current lists.
    pub fn refresh_metrics(&mut self) {
        self.metrics = ModuleMetrics {
            file_count: self.file_count(),
            dependency_count: self.dependency_count(),
            dependent_count: self.dependent_count(),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMetrics {
    pub total_modules: usize,
    pub total_files: usize,
    pub total_dependencies: usize,
    pub average_dependencies_per_module: f64,
    pub max_dependencies: usize,
    pub cyclic_dependencies: usize,
}

/// Pre-computed module-dependency view over a parsed codebase graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleProjection {
    modules: Vec<Module>,
    metrics: ProjectionMetrics,
}

impl ModuleProjection {
    pub fn new(modules: Vec<Module>, metrics: ProjectionMetrics) -> Self {
        Self { modules, metrics }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn metrics(&self) -> &ProjectionMetrics {
        &self.metrics
    }

    pub fn find(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }
}

/// Module granularity used by the projection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationLevel {
    File,
    Directory,
    #[default]
    TopLevel,
}

impl AggregationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationLevel::File => "file",
            AggregationLevel::Directory => "directory",
            AggregationLevel::TopLevel => "top-level",
        }
    }
}

impl FromStr for AggregationLevel {
    type Err = ArchGraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(AggregationLevel::File),
            "directory" => Ok(AggregationLevel::Directory),
            "top-level" => Ok(AggregationLevel::TopLevel),
            other => Err(ArchGraphError::validation(format!(
                "Invalid aggregationLevel: {}. Must be one of: file, directory, top-level",
                other
            ))),
        }
    }
}

impl fmt::Display for AggregationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options handed to the projection strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfiguration {
    pub aggregation_level: AggregationLevel,
    pub include_tests: bool,
    pub exclude_patterns: Vec<String>,
}

/// A source file with its imports resolved to other files of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Root-relative path with `/` separators.
    pub path: String,
    pub imports: Vec<String>,
}

/// File-level dependency graph produced by a graph loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceGraph {
    pub id: String,
    pub root_path: PathBuf,
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl LayoutDirection {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, LayoutDirection::LR | LayoutDirection::RL)
    }
}

impl FromStr for LayoutDirection {
    type Err = ArchGraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TB" => Ok(LayoutDirection::TB),
            "BT" => Ok(LayoutDirection::BT),
            "LR" => Ok(LayoutDirection::LR),
            "RL" => Ok(LayoutDirection::RL),
            other => Err(ArchGraphError::validation(format!(
                "Invalid layout: {}. Must be one of: TB, BT, LR, RL",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Dependencies,
    Coupling,
    Monochrome,
}

impl FromStr for ColorScheme {
    type Err = ArchGraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dependencies" => Ok(ColorScheme::Dependencies),
            "coupling" => Ok(ColorScheme::Coupling),
            "monochrome" => Ok(ColorScheme::Monochrome),
            other => Err(ArchGraphError::validation(format!(
                "Invalid colorScheme: {}. Must be one of: dependencies, coupling, monochrome",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSizing {
    Fixed,
    #[default]
    Proportional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphViewOptions {
    pub include_metrics: bool,
    pub color_scheme: ColorScheme,
    pub node_size: NodeSizing,
    pub direction: LayoutDirection,
}

impl Default for GraphViewOptions {
    fn default() -> Self {
        Self {
            include_metrics: true,
            color_scheme: ColorScheme::default(),
            node_size: NodeSizing::default(),
            direction: LayoutDirection::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub path: String,
    pub file_count: usize,
    pub width: f64,
    pub height: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ModuleMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Renderable graph built from a projection; positions are filled by a layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
    pub direction: LayoutDirection,
    pub width: f64,
    pub height: f64,
}

impl GraphView {
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_laid_out(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.iter().all(|n| n.position.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Graphml,
    Svg,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Graphml => "graphml",
            ExportFormat::Svg => "svg",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Graphml => "graphml",
            ExportFormat::Svg => "svg",
            ExportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ArchGraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "graphml" => Ok(ExportFormat::Graphml),
            "svg" => Ok(ExportFormat::Svg),
            "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(ArchGraphError::validation(
                "Invalid format. Must be: json, graphml, svg, or markdown",
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
