use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::graph::{NodeData, NodeId, NodeStatus, Position, TopologyGraph, TopologyNode};
use crate::error::CoreError;
use crate::model::Device;

/// Horizontal distance between neighbouring nodes.
pub const NODE_SPACING: f64 = 150.0;
/// Every node sits on this row.
pub const ROW_Y: f64 = 150.0;

/// Project a directory snapshot into a fresh graph.
///
/// One node per device, in snapshot order, laid out along a single row.
/// The result never carries edges.
pub fn synthesize(devices: &[Arc<Device>]) -> TopologyGraph {
    let nodes = devices
        .iter()
        .zip(1u32..)
        .map(|(device, ordinal)| TopologyNode {
            id: device.id.as_ref().map_or_else(
                || NodeId::new(ordinal.to_string()),
                |id| NodeId::new(id.as_str()),
            ),
            position: Position {
                x: NODE_SPACING * f64::from(ordinal - 1),
                y: ROW_Y,
            },
            data: NodeData {
                label: format!("Device {ordinal}"),
                ip: device.ip,
                icon: device.device_type.icon(),
                status: NodeStatus::from_online(device.online),
            },
        })
        .collect();
    TopologyGraph::with_nodes(nodes)
}

/// Informational subnet label shown above the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CidrLabel {
    #[default]
    Pending,
    Known(String),
    Unknown,
}

impl CidrLabel {
    /// Fold a fetch result into a label; failures degrade to `Unknown`.
    pub fn from_result(result: Result<String, CoreError>) -> Self {
        match result {
            Ok(cidr) if !cidr.trim().is_empty() => Self::Known(cidr),
            Ok(_) => Self::Unknown,
            Err(e) => {
                warn!(error = %e, "failed to fetch CIDR label");
                Self::Unknown
            }
        }
    }
}

impl fmt::Display for CidrLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("…"),
            Self::Known(cidr) => f.write_str(cidr),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Topology state owned by one view: the current graph plus the CIDR label.
#[derive(Debug, Clone, Default)]
pub struct TopologyView {
    graph: TopologyGraph,
    cidr: CidrLabel,
}

impl TopologyView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut TopologyGraph {
        &mut self.graph
    }

    pub fn cidr(&self) -> &CidrLabel {
        &self.cidr
    }

    /// Rebuild from a new snapshot. Positions reset and every edge is dropped.
    pub fn rebuild(&mut self, devices: &[Arc<Device>]) {
        let dropped = self.graph.edges().len();
        self.graph = synthesize(devices);
        debug!(nodes = devices.len(), dropped_edges = dropped, "topology rebuilt");
    }

    /// Record the CIDR fetch outcome. Only the first outcome is kept.
    pub fn set_cidr(&mut self, result: Result<String, CoreError>) {
        self.apply_cidr(CidrLabel::from_result(result));
    }

    /// Same as [`set_cidr`](Self::set_cidr) for a label resolved elsewhere.
    pub fn apply_cidr(&mut self, label: CidrLabel) {
        if self.cidr == CidrLabel::Pending && label != CidrLabel::Pending {
            self.cidr = label;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceIcon, DeviceId, DeviceType};
    use crate::topology::Handle;
    use std::net::IpAddr;

    fn device(last_octet: u8, device_type: DeviceType, online: bool) -> Arc<Device> {
        let mut d = Device::new(IpAddr::from([10, 0, 0, last_octet]));
        d.device_type = device_type;
        d.online = online;
        Arc::new(d)
    }

    #[test]
    fn one_node_per_device_with_fallback_icons() {
        let devices: Vec<_> = (1..=5).map(|i| device(i, DeviceType::Other, false)).collect();
        let graph = synthesize(&devices);

        assert_eq!(graph.nodes().len(), devices.len());
        assert!(graph.nodes().iter().all(|n| n.data.icon == DeviceIcon::Generic));
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn layout_is_a_single_spaced_row() {
        let devices: Vec<_> = (1..=3).map(|i| device(i, DeviceType::Router, true)).collect();
        let graph = synthesize(&devices);

        let xs: Vec<f64> = graph.nodes().iter().map(|n| n.position.x).collect();
        assert_eq!(xs, vec![0.0, 150.0, 300.0]);
        assert!(graph.nodes().iter().all(|n| (n.position.y - ROW_Y).abs() < f64::EPSILON));
        assert_eq!(graph.nodes()[2].data.label, "Device 3");
    }

    #[test]
    fn node_id_prefers_device_id() {
        let mut with_id = Device::new(IpAddr::from([10, 0, 0, 1]));
        with_id.id = Some(DeviceId::from("abc"));
        let devices = vec![Arc::new(with_id), device(2, DeviceType::Switch, true)];
        let graph = synthesize(&devices);

        assert_eq!(graph.nodes()[0].id.as_str(), "abc");
        assert_eq!(graph.nodes()[1].id.as_str(), "2");
    }

    #[test]
    fn computer_online_scenario() {
        let devices = vec![device(5, DeviceType::from_wire("computer"), true)];
        let graph = synthesize(&devices);

        let node = &graph.nodes()[0];
        assert_eq!(node.data.ip, IpAddr::from([10, 0, 0, 5]));
        assert_eq!(node.data.icon, DeviceIcon::Computer);
        assert!(node.data.status.is_online());
    }

    #[test]
    fn rebuild_discards_edges() {
        let devices: Vec<_> = (1..=2).map(|i| device(i, DeviceType::Router, true)).collect();
        let mut view = TopologyView::new();
        view.rebuild(&devices);

        let a = view.graph().nodes()[0].id.clone();
        let b = view.graph().nodes()[1].id.clone();
        view.graph_mut()
            .connect(&a, Handle::Right, &b, Handle::Left)
            .unwrap();
        assert_eq!(view.graph().edges().len(), 1);

        view.rebuild(&devices);
        assert!(view.graph().edges().is_empty());
        assert_eq!(view.graph().nodes().len(), 2);
    }

    #[test]
    fn rebuild_with_empty_snapshot_clears_nodes() {
        let mut view = TopologyView::new();
        view.rebuild(&[device(1, DeviceType::Router, true)]);
        view.rebuild(&[]);
        assert!(view.graph().nodes().is_empty());
    }

    #[test]
    fn connect_rejects_unknown_and_self() {
        let devices: Vec<_> = (1..=2).map(|i| device(i, DeviceType::Router, true)).collect();
        let mut graph = synthesize(&devices);
        let a = graph.nodes()[0].id.clone();
        let ghost = NodeId::new("99");

        assert!(graph.connect(&a, Handle::Right, &ghost, Handle::Top).is_err());
        assert!(graph.connect(&a, Handle::Right, &a, Handle::Top).is_err());
        assert!(graph.connect(&a, Handle::Top, &NodeId::new("2"), Handle::Left).is_err());
    }

    #[test]
    fn connect_is_idempotent_and_disconnect_removes() {
        let devices: Vec<_> = (1..=2).map(|i| device(i, DeviceType::Router, true)).collect();
        let mut graph = synthesize(&devices);
        let (a, b) = (NodeId::new("1"), NodeId::new("2"));

        let first = graph.connect(&a, Handle::Bottom, &b, Handle::Top).unwrap();
        let again = graph.connect(&a, Handle::Bottom, &b, Handle::Top).unwrap();
        assert_eq!(first, again);
        assert_eq!(graph.edges().len(), 1);

        assert!(graph.disconnect(&first.id));
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn cidr_failure_degrades_to_unknown() {
        let mut view = TopologyView::new();
        assert_eq!(view.cidr().to_string(), "…");
        view.set_cidr(Err(CoreError::Timeout));
        assert_eq!(view.cidr(), &CidrLabel::Unknown);

        // First outcome sticks.
        view.set_cidr(Ok("10.0.0.0/24".into()));
        assert_eq!(view.cidr().to_string(), "Unknown");
    }
}
