use crate::{Module, ModuleMetrics, ModuleProjection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Derived edge between two modules of the same projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub strength: u32,
}

impl DependencyEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            strength: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_modules: usize,
    pub total_files: usize,
    pub total_dependencies: usize,
    pub average_coupling: f64,
    pub max_dependencies: usize,
    pub circular_dependencies: usize,
    pub architecture_score: u32,
}

/// Snapshot of a module as exposed by an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedModule {
    pub id: String,
    pub name: String,
    pub path: String,
    pub files: Vec<String>,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
    pub file_count: usize,
    pub dependency_count: usize,
    pub dependent_count: usize,
    pub metrics: ModuleMetrics,
}

impl From<&Module> for AnalyzedModule {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id.clone(),
            name: module.name.clone(),
            path: module.path.clone(),
            files: module.files.clone(),
            dependencies: module.dependencies.clone(),
            dependents: module.dependents.clone(),
            file_count: module.file_count(),
            dependency_count: module.dependency_count(),
            dependent_count: module.dependent_count(),
            metrics: module.metrics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub module_id: String,
    pub module_name: String,
    pub used_by_count: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSeverity {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub severity: RecommendationSeverity,
}

impl Recommendation {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Info,
            message: message.into(),
            severity: RecommendationSeverity::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Warning,
            message: message.into(),
            severity: RecommendationSeverity::Warning,
        }
    }
}

/// Scored, cached result of one analyze call.
///
/// Summary counts are frozen at creation time. The retained projection is
/// only used to rehydrate graph views for export and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub analysis_id: String,
    pub graph_id: String,
    pub root_path: String,
    pub summary: AnalysisSummary,
    pub modules: Vec<AnalyzedModule>,
    pub dependencies: Vec<DependencyEdge>,
    pub hotspots: Vec<Hotspot>,
    pub recommendations: Vec<Recommendation>,
    pub analyzed_at: DateTime<Utc>,
    #[serde(skip)]
    pub projection: Arc<ModuleProjection>,
}

impl AnalysisRecord {
    pub fn module(&self, id: &str) -> Option<&AnalyzedModule> {
        self.modules.iter().find(|m| m.id == id)
    }
}

/// Row returned by the analysis history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisListItem {
    pub analysis_id: String,
    pub root_path: String,
    pub module_count: usize,
    pub dependency_count: usize,
    pub circular_count: usize,
    pub score: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&AnalysisRecord> for AnalysisListItem {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            analysis_id: record.analysis_id.clone(),
            root_path: record.root_path.clone(),
            module_count: record.summary.total_modules,
            dependency_count: record.summary.total_dependencies,
            circular_count: record.summary.circular_dependencies,
            score: record.summary.architecture_score,
            created_at: record.analyzed_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPage {
    pub analyses: Vec<AnalysisListItem>,
    pub pagination: Pagination,
}
