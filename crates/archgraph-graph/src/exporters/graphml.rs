use super::xml_escape;
use archgraph_core::{ExportFormat, GraphExporter, GraphView, Result};

/// GraphML document with label, path, file count, colour and layout keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphMlExporter;

impl GraphMlExporter {
    pub fn new() -> Self {
        Self
    }
}

impl GraphExporter for GraphMlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Graphml
    }

    fn export(&self, view: &GraphView) -> Result<String> {
        let mut output = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        output.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n");
        output.push_str("  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>\n");
        output.push_str("  <key id=\"path\" for=\"node\" attr.name=\"path\" attr.type=\"string\"/>\n");
        output.push_str("  <key id=\"files\" for=\"node\" attr.name=\"fileCount\" attr.type=\"int\"/>\n");
        output.push_str("  <key id=\"color\" for=\"node\" attr.name=\"color\" attr.type=\"string\"/>\n");
        output.push_str("  <key id=\"rank\" for=\"node\" attr.name=\"rank\" attr.type=\"int\"/>\n");
        output.push_str("  <key id=\"x\" for=\"node\" attr.name=\"x\" attr.type=\"double\"/>\n");
        output.push_str("  <key id=\"y\" for=\"node\" attr.name=\"y\" attr.type=\"double\"/>\n");
        output.push_str("  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"int\"/>\n");
        output.push_str("  <graph id=\"G\" edgedefault=\"directed\">\n");

        for node in &view.nodes {
            output.push_str(&format!("    <node id=\"{}\">\n", xml_escape(&node.id)));
            output.push_str(&format!("      <data key=\"label\">{}</data>\n", xml_escape(&node.label)));
            output.push_str(&format!("      <data key=\"path\">{}</data>\n", xml_escape(&node.path)));
            output.push_str(&format!("      <data key=\"files\">{}</data>\n", node.file_count));
            output.push_str(&format!("      <data key=\"color\">{}</data>\n", xml_escape(&node.color)));
            if let Some(rank) = node.rank {
                output.push_str(&format!("      <data key=\"rank\">{}</data>\n", rank));
            }
            if let Some(position) = node.position {
                output.push_str(&format!("      <data key=\"x\">{}</data>\n", position.x));
                output.push_str(&format!("      <data key=\"y\">{}</data>\n", position.y));
            }
            output.push_str("    </node>\n");
        }

        for (i, edge) in view.edges.iter().enumerate() {
            output.push_str(&format!(
                "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">\n",
                i,
                xml_escape(&edge.source),
                xml_escape(&edge.target)
            ));
            output.push_str(&format!("      <data key=\"weight\">{}</data>\n", edge.weight));
            output.push_str("    </edge>\n");
        }

        output.push_str("  </graph>\n");
        output.push_str("</graphml>\n");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_core::{LayoutDirection, Position, ViewEdge, ViewNode};

    fn node(id: &str, position: Option<Position>) -> ViewNode {
        ViewNode {
            id: id.into(),
            label: id.into(),
            path: id.into(),
            file_count: 2,
            width: 100.0,
            height: 40.0,
            color: "#ffc107".into(),
            metrics: None,
            rank: position.map(|_| 0),
            position,
        }
    }

    #[test]
    fn writes_nodes_edges_and_layout() {
        let view = GraphView {
            nodes: vec![
                node("module:a", Some(Position { x: 70.0, y: 40.0 })),
                node("module:b&c", None),
            ],
            edges: vec![ViewEdge {
                source: "module:a".into(),
                target: "module:b&c".into(),
                weight: 1,
            }],
            direction: LayoutDirection::TB,
            width: 0.0,
            height: 0.0,
        };
        let xml = GraphMlExporter::new().export(&view).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<graphml"));
        assert!(xml.contains("<node id=\"module:a\">"));
        assert!(xml.contains("<data key=\"x\">70</data>"));
        assert!(xml.contains("<node id=\"module:b&amp;c\">"));
        assert!(xml.contains("<edge id=\"e0\" source=\"module:a\" target=\"module:b&amp;c\">"));
        assert_eq!(xml.matches("<data key=\"x\">").count(), 1);
        assert!(xml.trim_end().ends_with("</graphml>"));
    }
}
