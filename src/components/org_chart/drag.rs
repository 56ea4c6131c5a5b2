//! Drag-and-drop manager reassignment.
//!
//! The dragged employee is kept here rather than in the card that started
//! the drag: collapsing a subtree mid-drag unmounts that card, and the
//! browser's own drag payload is only a fallback.

use thiserror::Error;

use super::types::{OrgChartNode, find_by_id, is_descendant};

/// MIME type of the JSON copy stored on the drag event.
pub const DRAG_MIME: &str = "application/json";

#[derive(Clone, Debug, PartialEq)]
pub enum DropTarget {
	Node(String),
	UnassignedZone,
	None,
}

/// A validated drop: move `user_id` under `new_manager_id`, or detach them.
#[derive(Clone, Debug, PartialEq)]
pub struct ReassignIntent {
	pub user_id: String,
	pub user_name: String,
	pub new_manager_id: Option<String>,
	/// Department name of the new manager, inherited by the moved employee.
	pub manager_department: Option<String>,
}

/// Client-side validation failures; no request is sent for these.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DropRejection {
	#[error("Cannot assign an employee as their own manager")]
	SelfAssignment,
	#[error("Cannot assign a manager to their own subordinate")]
	Cycle,
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
	dragging: Option<OrgChartNode>,
}

impl DragController {
	pub fn start(&mut self, node: OrgChartNode) {
		log::debug!("drag start: {}", node.id);
		self.dragging = Some(node);
	}

	pub fn is_dragging(&self) -> bool {
		self.dragging.is_some()
	}

	/// Returns to idle, handing back the employee if a drag was still held.
	pub fn end(&mut self) -> Option<OrgChartNode> {
		self.dragging.take()
	}

	/// Resolves a drop and returns to idle.
	///
	/// `Ok(None)` means the drop is ignored without feedback. `payload` is
	/// only consulted when the controller lost track of the drag. The target
	/// node is looked up in `forest` to learn its department.
	pub fn resolve_drop(
		&mut self,
		target: &DropTarget,
		payload: Option<OrgChartNode>,
		forest: &[OrgChartNode],
	) -> Result<Option<ReassignIntent>, DropRejection> {
		let Some(source) = self.dragging.take().or(payload) else {
			return Ok(None);
		};

		match target {
			DropTarget::None => Ok(None),
			DropTarget::UnassignedZone => Ok(Some(ReassignIntent {
				user_id: source.id,
				user_name: source.name,
				new_manager_id: None,
				manager_department: None,
			})),
			DropTarget::Node(target_id) => {
				if *target_id == source.id {
					return Err(DropRejection::SelfAssignment);
				}
				if is_descendant(&source, target_id) {
					return Err(DropRejection::Cycle);
				}
				let manager_department = find_by_id(forest, target_id)
					.and_then(|manager| manager.department.clone());
				Ok(Some(ReassignIntent {
					user_id: source.id,
					user_name: source.name,
					new_manager_id: Some(target_id.clone()),
					manager_department,
				}))
			}
		}
	}
}

pub fn encode_payload(node: &OrgChartNode) -> Option<String> {
	serde_json::to_string(node).ok()
}

pub fn decode_payload(raw: &str) -> Option<OrgChartNode> {
	if raw.is_empty() {
		return None;
	}
	serde_json::from_str(raw)
		.map_err(|e| log::warn!("ignoring malformed drag payload: {e}"))
		.ok()
}
