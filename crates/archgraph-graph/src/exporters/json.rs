use archgraph_core::{ExportFormat, GraphExporter, GraphView, Result};
use chrono::Utc;
use serde_json::json;

#[derive(Debug, Clone, Copy)]
pub struct JsonGraphExporter {
    pretty: bool,
}

impl JsonGraphExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonGraphExporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl GraphExporter for JsonGraphExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn export(&self, view: &GraphView) -> Result<String> {
        let document = json!({
            "metadata": {
                "nodeCount": view.nodes.len(),
                "edgeCount": view.edges.len(),
                "direction": view.direction,
                "width": view.width,
                "height": view.height,
                "exportedAt": Utc::now().to_rfc3339(),
            },
            "nodes": view.nodes,
            "edges": view.edges,
        });

        let content = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_core::{LayoutDirection, Position, ViewEdge, ViewNode};

    fn view() -> GraphView {
        GraphView {
            nodes: vec![ViewNode {
                id: "module:src/domain".into(),
                label: "domain".into(),
                path: "src/domain".into(),
                file_count: 3,
                width: 152.0,
                height: 47.0,
                color: "#4caf50".into(),
                metrics: None,
                rank: Some(0),
                position: Some(Position { x: 96.0, y: 43.5 }),
            }],
            edges: vec![ViewEdge {
                source: "module:src/domain".into(),
                target: "module:src/domain".into(),
                weight: 1,
            }],
            direction: LayoutDirection::BT,
            width: 192.0,
            height: 87.0,
        }
    }

    #[test]
    fn document_carries_nodes_edges_and_metadata() {
        let raw = JsonGraphExporter::default().export(&view()).unwrap();
        assert!(raw.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["metadata"]["nodeCount"], 1);
        assert_eq!(value["metadata"]["direction"], "BT");
        assert_eq!(value["nodes"][0]["fileCount"], 3);
        assert_eq!(value["nodes"][0]["position"]["x"], 96.0);
        assert_eq!(value["edges"][0]["weight"], 1);
    }

    #[test]
    fn compact_output() {
        let raw = JsonGraphExporter::new(false).export(&view()).unwrap();
        assert!(!raw.contains('\n'));
        assert_eq!(JsonGraphExporter::new(false).extension(), "json");
    }
}
