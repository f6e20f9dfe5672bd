//! The private graph the pipeline works on.
//!
//! [`crate::layout`] copies the caller's graph into a [`LayoutGraph`], runs every stage on it
//! and copies the results back. Its labels carry the intermediate state (ranks, orders,
//! subgraph borders) and a [`NodeRole`] for each synthetic node the stages introduce.

use crate::model::{Acyclicer, Align, GraphLabel, LabelPos, Point, RankDir, Ranker};
use strata_graph::{EdgeKey, Graph};

pub type LayoutGraph = Graph<LayoutNode, LayoutEdge, LayoutConfig>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// What a node of the layout graph stands for.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeRole {
    /// A node of the caller's graph.
    #[default]
    Real,
    /// An interior point of a long edge.
    VirtualChain { edge: EdgeKey },
    /// The interior point of a long edge that holds its label.
    VirtualLabel { edge: EdgeKey, labelpos: LabelPos },
    /// Keeps the rank of an edge label alive between ranking and normalization.
    EdgeProxy { edge: EdgeKey },
    Border { side: BorderSide },
    /// Root that ties every top-level node and subgraph together during ranking.
    NestingRoot,
}

impl NodeRole {
    pub fn is_dummy(&self) -> bool {
        !matches!(self, Self::Real)
    }

    pub fn is_border(&self) -> bool {
        matches!(self, Self::Border { .. })
    }

    /// Interior nodes of a normalized edge.
    pub fn is_chain(&self) -> bool {
        matches!(self, Self::VirtualChain { .. } | Self::VirtualLabel { .. })
    }

    pub fn labelpos(&self) -> LabelPos {
        match self {
            Self::VirtualLabel { labelpos, .. } => *labelpos,
            _ => LabelPos::C,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutNode {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub role: NodeRole,

    // Subgraph bookkeeping.
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    /// Indexed by rank.
    pub border_left: Vec<Option<String>>,
    pub border_right: Vec<Option<String>>,
}

impl LayoutNode {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn dummy(role: NodeRole, rank: Option<i32>) -> Self {
        Self {
            role,
            rank,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub weight: f64,
    pub minlen: i32,
    pub width: f64,
    pub height: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,
    pub label_rank: Option<i32>,
    /// Added by the nesting stage; removed again before normalization.
    pub nesting: bool,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
}

impl Default for LayoutEdge {
    fn default() -> Self {
        Self {
            weight: 1.0,
            minlen: 1,
            width: 0.0,
            height: 0.0,
            labelpos: LabelPos::C,
            labeloffset: 0.0,
            label_rank: None,
            nesting: false,
            x: None,
            y: None,
            points: Vec::new(),
        }
    }
}

impl LayoutEdge {
    pub fn weighted(weight: f64, minlen: i32) -> Self {
        Self {
            weight,
            minlen,
            ..Default::default()
        }
    }

    pub fn has_label(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Resolved graph options plus the bookkeeping stages leave for later stages.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub rankdir: RankDir,
    pub align: Option<Align>,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,

    pub nesting_root: Option<String>,
    /// Rank multiplier introduced by nesting; ranks that are multiples of it are kept even when
    /// empty.
    pub node_rank_factor: i32,
    pub max_rank: i32,

    pub width: f64,
    pub height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::from(&GraphLabel::default())
    }
}

impl From<&GraphLabel> for LayoutConfig {
    fn from(label: &GraphLabel) -> Self {
        Self {
            rankdir: label.rankdir,
            align: label.align,
            nodesep: label.nodesep,
            edgesep: label.edgesep,
            ranksep: label.ranksep,
            marginx: label.marginx,
            marginy: label.marginy,
            acyclicer: label.acyclicer,
            ranker: label.ranker,
            nesting_root: None,
            node_rank_factor: 1,
            max_rank: 0,
            width: 0.0,
            height: 0.0,
        }
    }
}
