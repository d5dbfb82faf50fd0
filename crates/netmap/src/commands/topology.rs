//! `topology`: the graph the TUI draws, as a table or document.

use serde::Serialize;
use tabled::Tabled;
use netmap_core::topology::TopologyNode;
use netmap_core::{Controller, TopologyEdge, TopologyView};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Position")]
    position: String,
}

impl NodeRow {
    fn new(node: &TopologyNode, color: bool) -> Self {
        Self {
            id: node.id.to_string(),
            label: node.data.label.clone(),
            ip: node.data.ip.to_string(),
            icon: format!("{} {}", node.data.icon.glyph(), node.data.icon),
            status: output::status_label(node.data.status.is_online(), color),
            position: format!("({:.0}, {:.0})", node.position.x, node.position.y),
        }
    }
}

#[derive(Serialize)]
struct TopologyDocument<'a> {
    cidr: String,
    nodes: &'a [TopologyNode],
    edges: &'a [TopologyEdge],
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let mut view = TopologyView::new();
    view.rebuild(&controller.devices());
    view.set_cidr(controller.cidr().await);

    let graph = view.graph();
    let color = output::should_color(global.color);

    let out = match global.output {
        OutputFormat::Table => {
            let rows: Vec<NodeRow> = graph.nodes().iter().map(|n| NodeRow::new(n, color)).collect();
            format!(
                "Subnet: {}\n{}\nEdges: {}",
                view.cidr(),
                output::render_table(&rows),
                graph.edges().len()
            )
        }
        OutputFormat::Plain => graph
            .nodes()
            .iter()
            .map(|n| n.id.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        format => {
            let doc = TopologyDocument {
                cidr: view.cidr().to_string(),
                nodes: graph.nodes(),
                edges: graph.edges(),
            };
            output::render_single(format, &doc, |_| String::new(), |_| String::new())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
