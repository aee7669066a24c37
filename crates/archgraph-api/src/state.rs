use archgraph_analysis::{AnalysisService, ExportPipeline, InMemoryAnalysisStore};
use archgraph_core::{ConfigManager, Result};
use archgraph_graph::{
    DefaultGraphViewBuilder, FsGraphLoader, GraphMlExporter, JsonGraphExporter,
    LayeredLayoutEngine, ModuleProjectionStrategy, SvgGraphExporter,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// Wires the filesystem collaborators and an empty in-memory store.
    pub fn new(config: Arc<ConfigManager>) -> Result<Self> {
        let settings = config.config();

        let exports = ExportPipeline::new(
            Arc::new(DefaultGraphViewBuilder::new()),
            Arc::new(LayeredLayoutEngine::default()),
        )
        .with_exporter(Arc::new(JsonGraphExporter::new(settings.export.pretty_json)))
        .with_exporter(Arc::new(GraphMlExporter::new()))
        .with_exporter(Arc::new(SvgGraphExporter::from_config(&settings.export)));

        let loader = FsGraphLoader::new(&settings.analysis.source_extensions)?;
        let service = AnalysisService::new(
            Arc::new(InMemoryAnalysisStore::new()),
            Arc::new(loader),
            Arc::new(ModuleProjectionStrategy::new()),
            exports,
            settings.analysis.clone(),
        );

        info!(
            extensions = ?settings.analysis.source_extensions,
            "Analysis service ready"
        );
        Ok(Self::with_service(Arc::new(service), config))
    }

    pub fn with_service(service: Arc<AnalysisService>, config: Arc<ConfigManager>) -> Self {
        Self { service, config }
    }
}
