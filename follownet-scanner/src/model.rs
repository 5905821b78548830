use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Relation label carried by every edge in the follower graph
pub const RELATION: &str = "follows";

/// A GitHub login, kept exactly as the API returned it (case-sensitive)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(login: &str) -> Self {
        Self(login.to_string())
    }
}

impl From<String> for UserId {
    fn from(login: String) -> Self {
        Self(login)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `follower` follows `followee`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub follower: UserId,
    pub followee: UserId,
}

impl Edge {
    pub fn new(follower: impl Into<UserId>, followee: impl Into<UserId>) -> Self {
        Self {
            follower: follower.into(),
            followee: followee.into(),
        }
    }

    /// The edge as a `(follower, "follows", followee)` triple
    pub fn triple(&self) -> (&str, &'static str, &str) {
        (self.follower.as_str(), RELATION, self.followee.as_str())
    }
}

/// Set of follower edges. Iteration is sorted so output is stable, but
/// callers should only rely on set semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeSet {
    edges: BTreeSet<Edge>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the `(follower, followee)` pair was already present
    pub fn insert(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Every user that appears as a follower or a followee
    pub fn nodes(&self) -> BTreeSet<&UserId> {
        self.edges
            .iter()
            .flat_map(|e| [&e.follower, &e.followee])
            .collect()
    }

    pub fn triples(&self) -> Vec<(&str, &'static str, &str)> {
        self.edges.iter().map(Edge::triple).collect()
    }

    /// Subset of edges whose follower or followee is in `selected`.
    /// An empty selection keeps everything.
    pub fn retain_touching(&self, selected: &[UserId]) -> EdgeSet {
        if selected.is_empty() {
            return self.clone();
        }
        let selected: HashSet<&UserId> = selected.iter().collect();
        self.edges
            .iter()
            .filter(|e| selected.contains(&e.follower) || selected.contains(&e.followee))
            .cloned()
            .collect()
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl Extend<Edge> for EdgeSet {
    fn extend<I: IntoIterator<Item = Edge>>(&mut self, iter: I) {
        self.edges.extend(iter);
    }
}

impl IntoIterator for EdgeSet {
    type Item = Edge;
    type IntoIter = std::collections::btree_set::IntoIter<Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = std::collections::btree_set::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
