use archgraph_core::{
    ColorScheme, GraphView, GraphViewBuilder, GraphViewOptions, Module, ModuleProjection,
    NodeSizing, Result, ViewEdge, ViewNode,
};

pub const BASE_NODE_WIDTH: f64 = 140.0;
pub const BASE_NODE_HEIGHT: f64 = 44.0;
/// File counts above this no longer grow the node.
const MAX_SIZED_FILES: usize = 25;

/// Cold to hot.
const HEAT_PALETTE: &[&str] = &["#4caf50", "#8bc34a", "#ffc107", "#ff9800", "#f44336"];
const MONOCHROME: &str = "#90a4ae";

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGraphViewBuilder;

impl DefaultGraphViewBuilder {
    pub fn new() -> Self {
        Self
    }
}

fn heat(value: usize, max: usize) -> &'static str {
    if max == 0 {
        return HEAT_PALETTE[0];
    }
    let last = HEAT_PALETTE.len() - 1;
    let bucket = (value.min(max) * last + max / 2) / max;
    HEAT_PALETTE[bucket.min(last)]
}

fn node_size(module: &Module, sizing: NodeSizing) -> (f64, f64) {
    match sizing {
        NodeSizing::Fixed => (BASE_NODE_WIDTH, BASE_NODE_HEIGHT),
        NodeSizing::Proportional => {
            let files = module.file_count().min(MAX_SIZED_FILES) as f64;
            (BASE_NODE_WIDTH + files * 4.0, BASE_NODE_HEIGHT + files)
        }
    }
}

impl GraphViewBuilder for DefaultGraphViewBuilder {
    fn build(&self, projection: &ModuleProjection, options: &GraphViewOptions) -> Result<GraphView> {
        let modules = projection.modules();
        let max_dependents = modules.iter().map(Module::dependent_count).max().unwrap_or(0);
        let max_dependencies = modules.iter().map(Module::dependency_count).max().unwrap_or(0);

        let nodes = modules
            .iter()
            .map(|module| {
                let (width, height) = node_size(module, options.node_size);
                let color = match options.color_scheme {
                    ColorScheme::Dependencies => heat(module.dependent_count(), max_dependents),
                    ColorScheme::Coupling => heat(module.dependency_count(), max_dependencies),
                    ColorScheme::Monochrome => MONOCHROME,
                };
                ViewNode {
                    id: module.id.clone(),
                    label: module.name.clone(),
                    path: module.path.clone(),
                    file_count: module.file_count(),
                    width,
                    height,
                    color: color.to_string(),
                    metrics: options.include_metrics.then_some(module.metrics),
                    rank: None,
                    position: None,
                }
            })
            .collect();

        let edges = modules
            .iter()
            .flat_map(|module| {
                module
                    .dependencies
                    .iter()
                    .filter(|target| projection.find(target).is_some())
                    .map(move |target| ViewEdge {
                        source: module.id.clone(),
                        target: target.clone(),
                        weight: 1,
                    })
            })
            .collect();

        Ok(GraphView {
            nodes,
            edges,
            direction: options.direction,
            width: 0.0,
            height: 0.0,
        })
    }
}
