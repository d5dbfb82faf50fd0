use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::DeviceIcon;

/// Node identifier: the device id when the backend has one, otherwise the
/// 1-based position in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
}

impl NodeStatus {
    pub fn from_online(online: bool) -> Self {
        if online { Self::Online } else { Self::Offline }
    }

    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Display metadata carried by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    pub ip: IpAddr,
    pub icon: DeviceIcon,
    pub status: NodeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: NodeId,
    pub position: Position,
    pub data: NodeData,
}

/// Connection points on a node. Edges leave from the right or bottom and
/// arrive at the top or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Right,
    Bottom,
    Left,
}

impl Handle {
    pub fn is_source(self) -> bool {
        matches!(self, Self::Right | Self::Bottom)
    }

    pub fn is_target(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    fn short(self) -> char {
        match self {
            Self::Top => 't',
            Self::Right => 'r',
            Self::Bottom => 'b',
            Self::Left => 'l',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopologyEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Handle,
    pub target_handle: Handle,
}

/// Positioned nodes plus operator-drawn edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyGraph {
    nodes: Vec<TopologyNode>,
    edges: Vec<TopologyEdge>,
}

impl TopologyGraph {
    /// Graph with the given nodes and no edges.
    pub fn with_nodes(nodes: Vec<TopologyNode>) -> Self {
        Self {
            nodes,
            edges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[TopologyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TopologyEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&TopologyNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_by_ip(&self, ip: IpAddr) -> Option<&TopologyNode> {
        self.nodes.iter().find(|n| n.data.ip == ip)
    }

    /// Add an edge between two existing nodes.
    ///
    /// Connecting the same pair through the same handles twice is a no-op.
    /// Self-loops and handles used in the wrong direction are rejected.
    pub fn connect(
        &mut self,
        source: &NodeId,
        source_handle: Handle,
        target: &NodeId,
        target_handle: Handle,
    ) -> Result<TopologyEdge, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidConnection {
            source_node: source.to_string(),
            target_node: target.to_string(),
            reason: reason.to_owned(),
        };

        if self.node(source).is_none() {
            return Err(invalid("unknown source node"));
        }
        if self.node(target).is_none() {
            return Err(invalid("unknown target node"));
        }
        if source == target {
            return Err(invalid("a node cannot connect to itself"));
        }
        if !source_handle.is_source() || !target_handle.is_target() {
            return Err(invalid("edges run from a right/bottom handle to a top/left handle"));
        }

        let id = format!(
            "{source}{}-{target}{}",
            source_handle.short(),
            target_handle.short()
        );
        if let Some(existing) = self.edges.iter().find(|e| e.id == id) {
            return Ok(existing.clone());
        }
        let edge = TopologyEdge {
            id,
            source: source.clone(),
            target: target.clone(),
            source_handle,
            target_handle,
        };
        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Remove an edge by id. Returns `true` if it existed.
    pub fn disconnect(&mut self, edge_id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != edge_id);
        self.edges.len() != before
    }

    /// Move a node; positions reset on the next rebuild.
    pub fn move_node(&mut self, id: &NodeId, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| &n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }
}
