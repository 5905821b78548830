// Renderable graph assembly (vis-network shaped)

use crate::derive::{EdgeColor, NodeColor, StyleThresholds, derive_degrees, node_label, node_tooltip};
use follownet_scanner::{EdgeSet, UserId};
use serde::{Deserialize, Serialize};

pub const EDGE_LABEL: &str = "Follows";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: UserId,
    pub label: String,
    /// Tooltip HTML
    pub title: String,
    pub color: NodeColor,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeFont {
    pub size: u32,
    pub family: String,
    pub align: String,
    pub stroke_width: u32,
    pub color: EdgeColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    /// The follower
    pub from: UserId,
    /// The followee
    pub to: UserId,
    pub label: String,
    pub arrows: String,
    pub font: EdgeFont,
}

impl RenderEdge {
    pub fn color(&self) -> EdgeColor {
        self.font.color
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOptions {
    pub shape: String,
    pub size: u32,
    pub font: FontOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontOptions {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub roundness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeOptions {
    pub smooth: SmoothOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceAtlasOptions {
    pub spring_length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsOptions {
    pub force_atlas2_based: ForceAtlasOptions,
    pub min_velocity: f64,
    pub solver: String,
}

/// Layout settings applied once to the whole graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphOptions {
    pub nodes: NodeOptions,
    pub edges: EdgeOptions,
    pub physics: PhysicsOptions,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            nodes: NodeOptions {
                shape: "dot".to_string(),
                size: 15,
                font: FontOptions { size: 14 },
            },
            edges: EdgeOptions {
                smooth: SmoothOptions {
                    kind: "curvedCW".to_string(),
                    roundness: 0.35,
                },
            },
            physics: PhysicsOptions {
                force_atlas2_based: ForceAtlasOptions { spring_length: 100 },
                min_velocity: 0.75,
                solver: "forceAtlas2Based".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub options: GraphOptions,
}

impl RenderableGraph {
    pub fn node(&self, id: &UserId) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn assemble(edges: &EdgeSet) -> RenderableGraph {
    assemble_with(edges, &StyleThresholds::default())
}

/// Edge colors follow the follower's degree bucket, not the followee's.
pub fn assemble_with(edges: &EdgeSet, thresholds: &StyleThresholds) -> RenderableGraph {
    let degrees = derive_degrees(edges);

    let nodes = degrees
        .iter()
        .map(|(user, &degree)| {
            let style = thresholds.style(degree);
            RenderNode {
                id: user.clone(),
                label: node_label(user, degree),
                title: node_tooltip(user, degree),
                color: style.node_color,
                size: style.size,
            }
        })
        .collect();

    let edges = edges
        .iter()
        .map(|edge| {
            let source_degree = degrees.get(&edge.follower).copied().unwrap_or_default();
            RenderEdge {
                from: edge.follower.clone(),
                to: edge.followee.clone(),
                label: EDGE_LABEL.to_string(),
                arrows: "to".to_string(),
                font: EdgeFont {
                    size: 7,
                    family: "courier".to_string(),
                    align: "center".to_string(),
                    stroke_width: 0,
                    color: thresholds.style(source_degree).edge_color,
                },
            }
        })
        .collect();

    RenderableGraph {
        nodes,
        edges,
        options: GraphOptions::default(),
    }
}
