//! Label types carried by the layout graph, and the configuration enums they use.

use crate::graphlib::{EdgeKey, Graph};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn as_str(self) -> &'static str {
        match self {
            RankDir::TB => "TB",
            RankDir::BT => "BT",
            RankDir::LR => "LR",
            RankDir::RL => "RL",
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }
}

/// Unknown directions read as top-to-bottom.
impl From<&str> for RankDir {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "bt" => RankDir::BT,
            "lr" => RankDir::LR,
            "rl" => RankDir::RL,
            _ => RankDir::TB,
        }
    }
}

impl From<String> for RankDir {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<RankDir> for String {
    fn from(d: RankDir) -> Self {
        d.as_str().to_string()
    }
}

/// Pins the final x coordinates to one of the four Brandes–Köpf alignments instead of
/// balancing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    #[serde(alias = "ul")]
    UL,
    #[serde(alias = "ur")]
    UR,
    #[serde(alias = "dl")]
    DL,
    #[serde(alias = "dr")]
    DR,
}

impl Align {
    pub const ALL: [Align; 4] = [Align::UL, Align::UR, Align::DL, Align::DR];

    pub fn is_up(self) -> bool {
        matches!(self, Align::UL | Align::UR)
    }

    pub fn is_right(self) -> bool {
        matches!(self, Align::UR | Align::DR)
    }
}

impl FromStr for Align {
    type Err = crate::LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ul" => Ok(Align::UL),
            "ur" => Ok(Align::UR),
            "dl" => Ok(Align::DL),
            "dr" => Ok(Align::DR),
            _ => Err(crate::LayoutError::UnknownAlign(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

impl Ranker {
    pub fn as_str(self) -> &'static str {
        match self {
            Ranker::NetworkSimplex => "network-simplex",
            Ranker::TightTree => "tight-tree",
            Ranker::LongestPath => "longest-path",
        }
    }
}

/// Unknown rankers fall back to network simplex.
impl From<&str> for Ranker {
    fn from(s: &str) -> Self {
        match s {
            "tight-tree" => Ranker::TightTree,
            "longest-path" => Ranker::LongestPath,
            _ => Ranker::NetworkSimplex,
        }
    }
}

impl From<String> for Ranker {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<Ranker> for String {
    fn from(r: Ranker) -> Self {
        r.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Acyclicer {
    #[default]
    Greedy,
    Dfs,
}

impl Acyclicer {
    pub fn as_str(self) -> &'static str {
        match self {
            Acyclicer::Greedy => "greedy",
            Acyclicer::Dfs => "dfs",
        }
    }
}

/// Anything other than `greedy` selects the DFS back-edge heuristic.
impl From<&str> for Acyclicer {
    fn from(s: &str) -> Self {
        match s {
            "greedy" => Acyclicer::Greedy,
            _ => Acyclicer::Dfs,
        }
    }
}

impl From<String> for Acyclicer {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<Acyclicer> for String {
    fn from(a: Acyclicer) -> Self {
        a.as_str().to_string()
    }
}

/// Where an edge label sits relative to its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPos {
    L,
    C,
    #[default]
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Kind of a synthetic node. Real nodes carry no dummy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dummy {
    /// One link of a chain replacing an edge that spans several ranks.
    Edge,
    /// The chain link reserved for an edge label.
    EdgeLabel,
    Border(BorderSide),
    SelfEdge,
    EdgeProxy,
    Root,
}

impl Dummy {
    pub fn is_border(self) -> bool {
        matches!(self, Dummy::Border(_))
    }
}

impl fmt::Display for Dummy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dummy::Edge => "edge",
            Dummy::EdgeLabel => "edge-label",
            Dummy::Border(_) => "border",
            Dummy::SelfEdge => "selfedge",
            Dummy::EdgeProxy => "edge-proxy",
            Dummy::Root => "root",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Monotonic source of dummy node ids, scoped to one layout graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGen {
    next: usize,
}

impl IdGen {
    pub fn next(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}{}", self.next)
    }
}

/// Graph-wide configuration plus state shared between pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
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

    /// Bounding box of the finished layout, margins included.
    pub width: f64,
    pub height: f64,

    #[serde(skip)]
    pub nesting_root: Option<String>,
    #[serde(skip)]
    pub node_rank_factor: Option<i32>,
    #[serde(skip)]
    pub dummy_chains: Vec<String>,
    #[serde(skip)]
    pub max_rank: Option<i32>,
    #[serde(skip)]
    pub ids: IdGen,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            nodesep: 50.0,
            edgesep: 20.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            acyclicer: Acyclicer::default(),
            ranker: Ranker::default(),
            width: 0.0,
            height: 0.0,
            nesting_root: None,
            node_rank_factor: None,
            dummy_chains: Vec::new(),
            max_rank: None,
            ids: IdGen::default(),
        }
    }
}

impl GraphLabel {
    /// Reads graph-wide options from JSON such as `{"rankdir": "LR", "ranksep": 30}`.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,

    /// Caller-pinned rank.
    pub layer: Option<i32>,
    /// Caller-pinned position within the rank, honoured before barycenters.
    pub fixorder: Option<usize>,

    pub dummy: Option<Dummy>,
    pub labelpos: Option<LabelPos>,
    pub edge_label: Option<Box<EdgeLabel>>,
    pub edge_obj: Option<EdgeKey>,

    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    pub border_left: Vec<Option<String>>,
    pub border_right: Vec<Option<String>>,

    pub self_edges: Vec<SelfEdge>,

    /// Published rank and order (`_rank` / `_order`) once a layout has run.
    pub out_rank: Option<i32>,
    pub out_order: Option<usize>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: i32,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,
    pub label_rank: Option<i32>,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,

    pub reversed: bool,
    pub forward_name: Option<String>,
    pub nesting_edge: bool,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            width: 0.0,
            height: 0.0,
            labelpos: LabelPos::R,
            labeloffset: 10.0,
            label_rank: None,
            x: None,
            y: None,
            points: Vec::new(),
            reversed: false,
            forward_name: None,
            nesting_edge: false,
        }
    }
}

impl EdgeLabel {
    pub fn with_weight(weight: f64) -> Self {
        Self {
            weight,
            ..Default::default()
        }
    }

    pub fn with_minlen(minlen: i32) -> Self {
        Self {
            minlen,
            ..Default::default()
        }
    }
}

/// A self-loop parked on its node while the rest of the graph is ranked and ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub edge_obj: EdgeKey,
    pub label: EdgeLabel,
}
