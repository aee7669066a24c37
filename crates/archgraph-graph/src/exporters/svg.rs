use super::xml_escape;
use archgraph_core::{ExportConfig, ExportFormat, GraphExporter, GraphView, Result, ViewNode};

const FONT_SIZE: f64 = 12.0;
const EDGE_COLOR: &str = "#607d8b";

/// Standalone SVG rendering of a laid-out view, scaled to fit the canvas.
#[derive(Debug, Clone, Copy)]
pub struct SvgGraphExporter {
    width: f64,
    height: f64,
    padding: f64,
    show_labels: bool,
}

impl SvgGraphExporter {
    pub fn new(width: u32, height: u32, padding: u32, show_labels: bool) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
            padding: f64::from(padding),
            show_labels,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.width, config.height, config.padding, config.show_labels)
    }

    fn scale(&self, view: &GraphView) -> f64 {
        let usable_w = (self.width - 2.0 * self.padding).max(1.0);
        let usable_h = (self.height - 2.0 * self.padding).max(1.0);
        if view.width <= 0.0 || view.height <= 0.0 {
            return 1.0;
        }
        (usable_w / view.width).min(usable_h / view.height).min(1.0)
    }
}

impl Default for SvgGraphExporter {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

fn center(node: &ViewNode) -> (f64, f64) {
    node.position.map(|p| (p.x, p.y)).unwrap_or((0.0, 0.0))
}

impl GraphExporter for SvgGraphExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Svg
    }

    fn export(&self, view: &GraphView) -> Result<String> {
        let scale = self.scale(view);
        let place = |x: f64, y: f64| (self.padding + x * scale, self.padding + y * scale);

        let mut output = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        );
        output.push_str("  <defs>\n");
        output.push_str(&format!(
            "    <marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>\n",
            EDGE_COLOR
        ));
        output.push_str("  </defs>\n");
        output.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

        output.push_str("  <g class=\"edges\">\n");
        for edge in &view.edges {
            let (Some(source), Some(target)) = (view.node(&edge.source), view.node(&edge.target)) else {
                continue;
            };
            let (x1, y1) = center(source);
            let (x2, y2) = center(target);
            let (x1, y1) = place(x1, y1);
            let (x2, y2) = place(x2, y2);
            output.push_str(&format!(
                "    <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#arrow)\"/>\n",
                x1, y1, x2, y2, EDGE_COLOR, edge.weight.max(1)
            ));
        }
        output.push_str("  </g>\n");

        output.push_str("  <g class=\"nodes\">\n");
        for node in &view.nodes {
            let (cx, cy) = center(node);
            let (x, y) = place(cx - node.width / 2.0, cy - node.height / 2.0);
            output.push_str(&format!(
                "    <g class=\"node\" data-id=\"{}\">\n",
                xml_escape(&node.id)
            ));
            output.push_str(&format!("      <title>{}</title>\n", xml_escape(&node.path)));
            output.push_str(&format!(
                "      <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"#37474f\"/>\n",
                x,
                y,
                node.width * scale,
                node.height * scale,
                xml_escape(&node.color)
            ));
            if self.show_labels {
                let (tx, ty) = place(cx, cy);
                output.push_str(&format!(
                    "      <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
                    tx,
                    ty,
                    FONT_SIZE,
                    xml_escape(&node.label)
                ));
            }
            output.push_str("    </g>\n");
        }
        output.push_str("  </g>\n");
        output.push_str("</svg>\n");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_core::{LayoutDirection, Position, ViewEdge};

    fn view() -> GraphView {
        let node = |id: &str, label: &str, x: f64| ViewNode {
            id: id.into(),
            label: label.into(),
            path: id.into(),
            file_count: 1,
            width: 100.0,
            height: 40.0,
            color: "#4caf50".into(),
            metrics: None,
            rank: Some(0),
            position: Some(Position { x, y: 40.0 }),
        };
        GraphView {
            nodes: vec![node("module:a", "a<b>", 70.0), node("module:c", "c", 210.0)],
            edges: vec![ViewEdge {
                source: "module:a".into(),
                target: "module:c".into(),
                weight: 1,
            }],
            direction: LayoutDirection::LR,
            width: 280.0,
            height: 80.0,
        }
    }

    #[test]
    fn renders_canvas_nodes_and_edges() {
        let svg = SvgGraphExporter::default().export(&view()).unwrap();

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1200\" height=\"800\""));
        assert_eq!(svg.matches("<rect x=").count(), 2);
        assert_eq!(svg.matches("<line ").count(), 1);
        assert!(svg.contains("marker-end=\"url(#arrow)\""));
        assert!(svg.contains(">a&lt;b&gt;</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn labels_can_be_disabled() {
        let svg = SvgGraphExporter::new(400, 300, 10, false).export(&view()).unwrap();
        assert!(!svg.contains("<text"));
        assert!(svg.contains("width=\"400\""));
    }

    #[test]
    fn large_views_are_scaled_down() {
        let exporter = SvgGraphExporter::new(200, 100, 0, true);
        let mut big = view();
        big.width = 400.0;
        big.height = 100.0;
        assert_eq!(exporter.scale(&big), 0.5);
        assert!((exporter.scale(&view()) - 200.0 / 280.0).abs() < 1e-9);
    }
}
