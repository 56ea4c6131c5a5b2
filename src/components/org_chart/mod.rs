//! Pannable org chart canvas with drag-and-drop manager reassignment.

mod component;
mod drag;
mod expanded;
mod render;
mod state;
mod types;

pub use component::OrgChartCanvas;
pub use drag::ReassignIntent;
pub use expanded::{ExpandMode, ExpandedSet};
pub use state::{Point, ViewportTransform};
pub use types::OrgChartResponse;
