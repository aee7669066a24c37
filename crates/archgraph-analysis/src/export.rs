//! Format dispatch for analysis exports.

use crate::report::markdown_report;
use archgraph_core::{
    AnalysisRecord, ArchGraphError, ColorScheme, ExportFormat, GraphExporter, GraphViewBuilder,
    GraphViewOptions, LayoutDirection, LayoutEngine, NodeSizing, Result,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_FORMAT: &str = "json";
pub const DEFAULT_LAYOUT: &str = "TB";
pub const DEFAULT_COLOR_SCHEME: &str = "dependencies";

/// Parsed export query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub direction: LayoutDirection,
    pub color_scheme: ColorScheme,
}

impl ExportRequest {
    /// Absent tokens take their defaults; unknown tokens are validation errors.
    pub fn parse(
        format: Option<&str>,
        layout: Option<&str>,
        color_scheme: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            format: format.unwrap_or(DEFAULT_FORMAT).parse()?,
            direction: layout.unwrap_or(DEFAULT_LAYOUT).parse()?,
            color_scheme: color_scheme.unwrap_or(DEFAULT_COLOR_SCHEME).parse()?,
        })
    }
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            direction: LayoutDirection::default(),
            color_scheme: ColorScheme::default(),
        }
    }
}

/// JSON exports are embedded as structured values, everything else as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportContent {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutput {
    pub format: ExportFormat,
    pub content: ExportContent,
    pub filename: String,
}

pub struct ExportPipeline {
    view_builder: Arc<dyn GraphViewBuilder>,
    layout_engine: Arc<dyn LayoutEngine>,
    exporters: HashMap<ExportFormat, Arc<dyn GraphExporter>>,
}

impl ExportPipeline {
    pub fn new(view_builder: Arc<dyn GraphViewBuilder>, layout_engine: Arc<dyn LayoutEngine>) -> Self {
        Self {
            view_builder,
            layout_engine,
            exporters: HashMap::new(),
        }
    }

    /// Registers an exporter under its own format, replacing any previous one.
    pub fn with_exporter(mut self, exporter: Arc<dyn GraphExporter>) -> Self {
        self.exporters.insert(exporter.format(), exporter);
        self
    }

    pub fn supports(&self, format: ExportFormat) -> bool {
        format == ExportFormat::Markdown || self.exporters.contains_key(&format)
    }

    pub async fn export(&self, record: &AnalysisRecord, request: &ExportRequest) -> Result<ExportOutput> {
        let output = match request.format {
            ExportFormat::Markdown => ExportOutput {
                format: ExportFormat::Markdown,
                content: ExportContent::Text(markdown_report(record)),
                filename: format!("analysis-{}-report.md", record.analysis_id),
            },
            format => self.export_graph(record, request, format).await?,
        };

        info!(
            analysis_id = %record.analysis_id,
            format = %output.format,
            "Export complete"
        );
        Ok(output)
    }

    async fn export_graph(
        &self,
        record: &AnalysisRecord,
        request: &ExportRequest,
        format: ExportFormat,
    ) -> Result<ExportOutput> {
        let exporter = self.exporters.get(&format).ok_or_else(|| {
            ArchGraphError::export(format!("No exporter registered for format {}", format))
        })?;

        let options = GraphViewOptions {
            include_metrics: true,
            color_scheme: request.color_scheme,
            node_size: NodeSizing::Proportional,
            direction: request.direction,
        };
        let mut view = self.view_builder.build(&record.projection, &options)?;
        self.layout_engine.layout(&mut view).await?;
        debug!(
            nodes = view.nodes.len(),
            edges = view.edges.len(),
            "Graph view laid out"
        );

        let raw = exporter.export(&view)?;
        let content = match format {
            ExportFormat::Json => ExportContent::Json(serde_json::from_str(&raw)?),
            _ => ExportContent::Text(raw),
        };

        Ok(ExportOutput {
            format,
            content,
            filename: format!("module-graph-{}.{}", record.analysis_id, exporter.extension()),
        })
    }
}
