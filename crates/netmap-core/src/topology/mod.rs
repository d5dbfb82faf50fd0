// ── Topology graph ──
//
// Renderable node/edge projection of the device directory. Nodes are
// derived from a snapshot and never authoritative; edges are operator
// annotations that live until the next rebuild.

mod graph;
mod synth;

pub use graph::{
    Handle, NodeData, NodeId, NodeStatus, Position, TopologyEdge, TopologyGraph, TopologyNode,
};
pub use synth::{CidrLabel, NODE_SPACING, ROW_Y, TopologyView, synthesize};
