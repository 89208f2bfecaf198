//! Delegation graph model: deduplicating node/edge arena, branch flags,
//! hiding and grouping, and row/column layout.

pub mod accumulation;
pub mod color;
pub mod graph;
pub mod layout;
pub mod overview;
pub mod rebuild;
pub mod snapshot;
pub mod tooltip;

pub use color::branch_color;
pub use graph::{Branch, Edge, EdgeIndex, EdgeOptions, Graph, Node, NodeIndex};
pub use layout::{LevelLayouter, Layouter};
pub use overview::Overview;
pub use snapshot::{BranchSnapshot, EdgeSnapshot, GraphSnapshot, NodeSnapshot};
pub use tooltip::{PRELOAD_NOTE, Tooltip, TooltipGroup};
