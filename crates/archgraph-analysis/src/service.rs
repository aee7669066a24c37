//! Analysis orchestration shared by every transport.
//!
//! [`AnalysisService`] owns the typed collaborator ports and the store. It is
//! built once at startup and shared behind an `Arc`; none of its methods know
//! anything about HTTP.

use crate::export::{ExportOutput, ExportPipeline, ExportRequest};
use crate::extractor::extract_dependencies;
use crate::hotspots::detect_hotspots;
use crate::layers::LayerValidator;
use crate::listing::{paginate, ListQuery};
use crate::recommendations::generate_recommendations;
use crate::scoring::{architecture_score, count_highly_coupled};
use crate::store::AnalysisStore;
use archgraph_core::{
    AggregationLevel, AnalysisConfig, AnalysisListItem, AnalysisPage, AnalysisRecord,
    AnalysisSummary, AnalyzedModule, ArchGraphError, GraphLoader, LayerConfig, Module,
    ModuleProjection, ProjectionStrategy, Result, ValidationResult, ViewConfiguration,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Per-request overrides of the configured analysis defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    #[serde(default)]
    pub aggregation_level: Option<AggregationLevel>,
    #[serde(default)]
    pub include_tests: Option<bool>,
    #[serde(default)]
    pub exclude_patterns: Option<Vec<String>>,
    /// Only consulted by validate.
    #[serde(default)]
    pub layers: Option<LayerConfig>,
}

/// Hands out `analysis-<millis>` identifiers that never repeat within a process.
#[derive(Debug, Default)]
struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    fn next(&self, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        let now_ms = now.timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_ms.max(last + 1))
            })
            .unwrap_or(now_ms);
        let millis = now_ms.max(previous + 1);
        let stamp = Utc.timestamp_millis_opt(millis).single().unwrap_or(now);
        (format!("analysis-{}", millis), stamp)
    }
}

pub struct AnalysisService {
    store: Arc<dyn AnalysisStore>,
    loader: Arc<dyn GraphLoader>,
    strategy: Arc<dyn ProjectionStrategy>,
    exports: ExportPipeline,
    defaults: AnalysisConfig,
    ids: IdGenerator,
}

impl AnalysisService {
    pub fn new(
        store: Arc<dyn AnalysisStore>,
        loader: Arc<dyn GraphLoader>,
        strategy: Arc<dyn ProjectionStrategy>,
        exports: ExportPipeline,
        defaults: AnalysisConfig,
    ) -> Self {
        Self {
            store,
            loader,
            strategy,
            exports,
            defaults,
            ids: IdGenerator::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }

    pub fn view_configuration(&self, options: &AnalysisOptions) -> ViewConfiguration {
        let mut config = self.defaults.view_configuration();
        if let Some(level) = options.aggregation_level {
            config.aggregation_level = level;
        }
        if let Some(include_tests) = options.include_tests {
            config.include_tests = include_tests;
        }
        if let Some(patterns) = &options.exclude_patterns {
            config.exclude_patterns = patterns.clone();
        }
        config
    }

    pub fn layer_config(&self, options: &AnalysisOptions) -> LayerConfig {
        options
            .layers
            .clone()
            .unwrap_or_else(|| self.defaults.layers.clone())
    }

    /// Loads, projects and scores a source tree, then stores the resulting record.
    ///
    /// Nothing is stored when any step fails.
    #[instrument(skip(self, options))]
    pub async fn run_analysis(
        &self,
        root_path: Option<&str>,
        options: &AnalysisOptions,
    ) -> Result<AnalysisRecord> {
        let root_path = require_absolute(root_path)?;
        let view_config = self.view_configuration(options);
        info!(
            aggregation_level = %view_config.aggregation_level,
            include_tests = view_config.include_tests,
            "Starting module analysis"
        );

        let graph = self.loader.load_graph(Path::new(root_path)).await?;
        let projection = self.strategy.project(&graph, &view_config).await?;

        let (analysis_id, analyzed_at) = self.ids.next(Utc::now());
        let record = build_record(analysis_id, graph.id, root_path, projection, analyzed_at);

        self.store.put(record.clone()).await?;
        info!(
            analysis_id = %record.analysis_id,
            module_count = record.summary.total_modules,
            score = record.summary.architecture_score,
            "Module analysis complete"
        );
        Ok(record)
    }

    pub async fn get(&self, analysis_id: &str) -> Result<Arc<AnalysisRecord>> {
        self.store
            .get(analysis_id)
            .await?
            .ok_or_else(|| ArchGraphError::not_found("Analysis not found"))
    }

    pub async fn list(&self, query: &ListQuery) -> Result<AnalysisPage> {
        let items: Vec<AnalysisListItem> = self
            .store
            .list()
            .await?
            .iter()
            .map(|record| AnalysisListItem::from(record.as_ref()))
            .collect();
        Ok(paginate(items, query))
    }

    pub async fn delete(&self, analysis_id: &str) -> Result<()> {
        if !self.store.delete(analysis_id).await? {
            return Err(ArchGraphError::not_found("Analysis not found"));
        }
        info!(analysis_id, "Analysis deleted");
        Ok(())
    }

    /// Runs a fresh analysis, then validates layering of the most recent record.
    ///
    /// The most recent record is picked by a full scan, so a concurrent analyze
    /// may win over the one this call just produced.
    #[instrument(skip(self, options))]
    pub async fn validate(
        &self,
        root_path: Option<&str>,
        options: &AnalysisOptions,
    ) -> Result<ValidationResult> {
        let fresh = self.run_analysis(root_path, options).await?;
        let latest = match self.store.latest().await? {
            Some(record) => record,
            None => {
                warn!(
                    analysis_id = %fresh.analysis_id,
                    "Fresh analysis missing from store, validating it directly"
                );
                Arc::new(fresh)
            }
        };

        let validator = LayerValidator::new(self.layer_config(options));
        let result = validator.validate(&latest);
        info!(
            validation_id = %result.validation_id,
            score = result.score,
            grade = %result.grade,
            "Architecture validation complete"
        );
        Ok(result)
    }

    /// Looks up a record and renders it in the requested format.
    pub async fn export(&self, analysis_id: &str, request: &ExportRequest) -> Result<ExportOutput> {
        let record = self.get(analysis_id).await?;
        self.exports.export(&record, request).await
    }
}

fn require_absolute(root_path: Option<&str>) -> Result<&str> {
    let root_path = root_path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ArchGraphError::validation("rootPath is required"))?;
    if !Path::new(root_path).is_absolute() {
        return Err(ArchGraphError::validation("rootPath must be absolute"));
    }
    Ok(root_path)
}

/// Derives every record field from a projection.
///
/// Summary totals are computed from the same module and edge lists the record
/// carries. Only the cycle count is taken from the projection metrics.
pub fn build_record(
    analysis_id: String,
    graph_id: String,
    root_path: &str,
    projection: ModuleProjection,
    analyzed_at: DateTime<Utc>,
) -> AnalysisRecord {
    let modules = projection.modules();
    let cyclic = projection.metrics().cyclic_dependencies;

    let dependencies = extract_dependencies(modules);
    let highly_coupled = count_highly_coupled(modules.iter().map(Module::dependency_count));

    let mut outgoing: HashMap<&str, usize> = HashMap::new();
    for edge in &dependencies {
        *outgoing.entry(edge.from.as_str()).or_default() += 1;
    }
    let average_coupling = if modules.is_empty() {
        0.0
    } else {
        dependencies.len() as f64 / modules.len() as f64
    };

    let summary = AnalysisSummary {
        total_modules: modules.len(),
        total_files: modules.iter().map(Module::file_count).sum(),
        total_dependencies: dependencies.len(),
        average_coupling,
        max_dependencies: outgoing.values().copied().max().unwrap_or(0),
        circular_dependencies: cyclic,
        architecture_score: architecture_score(cyclic, highly_coupled),
    };

    AnalysisRecord {
        analysis_id,
        graph_id,
        root_path: root_path.to_string(),
        summary,
        modules: modules.iter().map(AnalyzedModule::from).collect(),
        dependencies,
        hotspots: detect_hotspots(modules),
        recommendations: generate_recommendations(cyclic, modules),
        analyzed_at,
        projection: Arc::new(projection),
    }
}
