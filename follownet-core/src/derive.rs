// Degree computation and degree-driven styling

use follownet_scanner::{EdgeSet, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const PROFILE_BASE_URL: &str = "https://github.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    Blue,
    Green,
    Orange,
    Red,
}

impl NodeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeColor::Blue => "blue",
            NodeColor::Green => "green",
            NodeColor::Orange => "orange",
            NodeColor::Red => "red",
        }
    }
}

impl fmt::Display for NodeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeColor {
    Yellow,
    Orange,
    Red,
    Blue,
}

impl EdgeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeColor::Yellow => "yellow",
            EdgeColor::Orange => "orange",
            EdgeColor::Red => "red",
            EdgeColor::Blue => "blue",
        }
    }
}

impl fmt::Display for EdgeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size and colors for one degree value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeStyle {
    pub size: f64,
    pub node_color: NodeColor,
    pub edge_color: EdgeColor,
}

/// Bucket bounds (inclusive upper limits) and the linear size formula
/// `base_size + size_per_degree * degree`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleThresholds {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub base_size: f64,
    pub size_per_degree: f64,
}

impl Default for StyleThresholds {
    fn default() -> Self {
        Self {
            low: 5,
            medium: 10,
            high: 15,
            base_size: 10.0,
            size_per_degree: 1.5,
        }
    }
}

impl StyleThresholds {
    pub fn size(&self, degree: usize) -> f64 {
        self.base_size + degree as f64 * self.size_per_degree
    }

    pub fn style(&self, degree: usize) -> DegreeStyle {
        let (node_color, edge_color) = if degree <= self.low {
            (NodeColor::Blue, EdgeColor::Yellow)
        } else if degree <= self.medium {
            (NodeColor::Green, EdgeColor::Orange)
        } else if degree <= self.high {
            (NodeColor::Orange, EdgeColor::Red)
        } else {
            (NodeColor::Red, EdgeColor::Blue)
        };

        DegreeStyle {
            size: self.size(degree),
            node_color,
            edge_color,
        }
    }
}

/// Style for `degree` under the default thresholds
pub fn style_for_degree(degree: usize) -> DegreeStyle {
    StyleThresholds::default().style(degree)
}

/// In-degree plus out-degree of every user that appears in `edges`
pub fn derive_degrees(edges: &EdgeSet) -> BTreeMap<UserId, usize> {
    let mut degrees: BTreeMap<UserId, usize> = BTreeMap::new();
    for edge in edges {
        *degrees.entry(edge.follower.clone()).or_default() += 1;
        *degrees.entry(edge.followee.clone()).or_default() += 1;
    }
    degrees
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub degree: usize,
    pub size: f64,
    pub color: NodeColor,
    pub label: String,
    pub tooltip: String,
}

pub fn profile_url(user: &UserId) -> String {
    format!("{}{}", PROFILE_BASE_URL, user)
}

pub fn node_label(user: &UserId, degree: usize) -> String {
    format!("{} ({})", user, degree)
}

/// Hover text: the degree followed by a heading and a link to the profile
pub fn node_tooltip(user: &UserId, degree: usize) -> String {
    let url = profile_url(user);
    format!(
        "degree: {}<h4>{}</h4><a href=\"{}\" target=\"_blank\">{}</a>",
        degree, user, url, url
    )
}

pub fn derive_node_styles(edges: &EdgeSet) -> BTreeMap<UserId, NodeStyle> {
    derive_node_styles_with(edges, &StyleThresholds::default())
}

pub fn derive_node_styles_with(
    edges: &EdgeSet,
    thresholds: &StyleThresholds,
) -> BTreeMap<UserId, NodeStyle> {
    derive_degrees(edges)
        .into_iter()
        .map(|(user, degree)| {
            let style = thresholds.style(degree);
            let node = NodeStyle {
                degree,
                size: style.size,
                color: style.node_color,
                label: node_label(&user, degree),
                tooltip: node_tooltip(&user, degree),
            };
            (user, node)
        })
        .collect()
}
