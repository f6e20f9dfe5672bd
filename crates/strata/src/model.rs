//! Public label types and geometry primitives.
//!
//! These are the records a caller attaches to its graph. [`crate::layout`] reads the sizes and
//! options from them and writes the computed geometry back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Direction in which ranks advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    /// Case-insensitive lookup of `tb`, `bt`, `lr`, `rl`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tb" => Some(Self::TB),
            "bt" => Some(Self::BT),
            "lr" => Some(Self::LR),
            "rl" => Some(Self::RL),
            _ => None,
        }
    }

    /// `true` when ranks run along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }
}

/// One of the four Brandes–Köpf alignments: vertical direction (up/down) then horizontal
/// direction (left/right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

impl Align {
    pub const ALL: [Align; 4] = [Align::UL, Align::UR, Align::DL, Align::DR];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ul" => Some(Self::UL),
            "ur" => Some(Self::UR),
            "dl" => Some(Self::DL),
            "dr" => Some(Self::DR),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::UL => 0,
            Self::UR => 1,
            Self::DL => 2,
            Self::DR => 3,
        }
    }
}

/// Where an edge label sits relative to its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum LabelPos {
    L,
    #[default]
    C,
    R,
}

impl LabelPos {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "l" => Some(Self::L),
            "c" => Some(Self::C),
            "r" => Some(Self::R),
            _ => None,
        }
    }
}

/// How cycles are broken before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Acyclicer {
    #[default]
    Dfs,
    Greedy,
}

impl Acyclicer {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dfs" => Some(Self::Dfs),
            "greedy" => Some(Self::Greedy),
            _ => None,
        }
    }
}

/// Rank assignment algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

impl Ranker {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "network-simplex" => Some(Self::NetworkSimplex),
            "tight-tree" => Some(Self::TightTree),
            "longest-path" => Some(Self::LongestPath),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    /// Center, written by layout.
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Written by layout; any value present beforehand is ignored. Ranks run densely from 0
    /// over the caller's own nodes and `order` is the position within the rank. Subgraph nodes
    /// get neither.
    pub rank: Option<i32>,
    pub order: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub weight: f64,
    pub minlen: usize,
    /// Label size; a zero width or height means the edge has no label.
    pub width: f64,
    pub height: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,
    /// Label center, written only for edges that carry a label.
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            weight: 1.0,
            minlen: 1,
            width: 0.0,
            height: 0.0,
            labelpos: LabelPos::C,
            labeloffset: 0.0,
            x: None,
            y: None,
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub align: Option<Align>,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,
    /// Bounding box, written by layout.
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            nodesep: 50.0,
            edgesep: 10.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            acyclicer: Acyclicer::Dfs,
            ranker: Ranker::NetworkSimplex,
            width: None,
            height: None,
        }
    }
}
