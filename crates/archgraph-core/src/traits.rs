use crate::{
    ExportFormat, GraphView, GraphViewOptions, ModuleProjection, Result, SourceGraph,
    ViewConfiguration,
};
use async_trait::async_trait;
use std::path::Path;

/// Parses a source tree into a file-level dependency graph.
#[async_trait]
pub trait GraphLoader: Send + Sync {
    async fn load_graph(&self, root_path: &Path) -> Result<SourceGraph>;
}

/// Aggregates a file graph into modules.
#[async_trait]
pub trait ProjectionStrategy: Send + Sync {
    async fn project(
        &self,
        graph: &SourceGraph,
        config: &ViewConfiguration,
    ) -> Result<ModuleProjection>;
}

pub trait GraphViewBuilder: Send + Sync {
    fn build(&self, projection: &ModuleProjection, options: &GraphViewOptions) -> Result<GraphView>;
}

/// Assigns node positions in place.
#[async_trait]
pub trait LayoutEngine: Send + Sync {
    async fn layout(&self, view: &mut GraphView) -> Result<()>;
}

pub trait GraphExporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn export(&self, view: &GraphView) -> Result<String>;

    fn extension(&self) -> &'static str {
        self.format().extension()
    }
}
