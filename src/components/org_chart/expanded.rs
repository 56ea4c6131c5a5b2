//! Which branches of the chart are open.

use std::collections::HashSet;

use super::types::{OrgChartNode, collect_ids, ids_to_depth};

/// How the expanded set is seeded on first load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandMode {
	All,
	/// Expand nodes shallower than this many levels.
	Levels(usize),
}

/// Node ids whose children are rendered.
///
/// `known` remembers every id seen so far so that a reload can tell new
/// nodes (expanded by default) from nodes the user already collapsed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpandedSet {
	expanded: HashSet<String>,
	known: HashSet<String>,
}

impl ExpandedSet {
	pub fn seeded(forest: &[OrgChartNode], mode: ExpandMode) -> Self {
		let mut set = Self::default();
		match mode {
			ExpandMode::All => set.expand_all(forest),
			ExpandMode::Levels(depth) => set.collapse_to_depth(forest, depth),
		}
		set
	}

	pub fn is_expanded(&self, id: &str) -> bool {
		self.expanded.contains(id)
	}

	pub fn toggle(&mut self, id: &str) {
		if !self.expanded.remove(id) {
			self.expanded.insert(id.to_owned());
		}
		self.known.insert(id.to_owned());
	}

	pub fn expand_all(&mut self, forest: &[OrgChartNode]) {
		self.expanded = collect_ids(forest);
		self.known.extend(self.expanded.iter().cloned());
	}

	/// Only roots stay expanded, so their direct reports remain visible.
	pub fn collapse_to_first_level(&mut self, forest: &[OrgChartNode]) {
		self.collapse_to_depth(forest, 1);
	}

	pub fn collapse_to_depth(&mut self, forest: &[OrgChartNode], depth: usize) {
		self.expanded = ids_to_depth(forest, depth);
		self.known.extend(collect_ids(forest));
	}

	/// Expands ids never seen before; existing choices are left alone.
	pub fn merge(&mut self, forest: &[OrgChartNode]) {
		for id in collect_ids(forest) {
			if self.known.insert(id.clone()) {
				self.expanded.insert(id);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::org_chart::types::tests::{node, sample_forest};

	#[test]
	fn toggle_flips_membership() {
		let mut set = ExpandedSet::seeded(&sample_forest(), ExpandMode::All);
		assert!(set.is_expanded("2"));
		set.toggle("2");
		assert!(!set.is_expanded("2"));
		set.toggle("2");
		assert!(set.is_expanded("2"));
	}

	#[test]
	fn first_level_keeps_only_roots() {
		let forest = sample_forest();
		let mut set = ExpandedSet::seeded(&forest, ExpandMode::All);
		set.collapse_to_first_level(&forest);
		assert!(set.is_expanded("1"));
		assert!(set.is_expanded("4"));
		assert!(!set.is_expanded("2"));
		assert!(!set.is_expanded("3"));
	}

	#[test]
	fn reload_expands_new_nodes_and_keeps_collapses() {
		// A has no reports yet; the user collapsed sibling C.
		let before = vec![node("A", vec![]), node("C", vec![node("D", vec![])])];
		let mut set = ExpandedSet::seeded(&before, ExpandMode::All);
		set.toggle("C");

		let after = vec![
			node("A", vec![node("B", vec![])]),
			node("C", vec![node("D", vec![])]),
		];
		set.merge(&after);

		assert!(set.is_expanded("A"));
		assert!(set.is_expanded("B"));
		assert!(!set.is_expanded("C"));
		assert!(set.is_expanded("D"));
	}

	#[test]
	fn merge_never_reexpands_known_nodes() {
		let forest = sample_forest();
		let mut set = ExpandedSet::seeded(&forest, ExpandMode::Levels(1));
		assert!(!set.is_expanded("2"));
		set.merge(&forest);
		assert!(!set.is_expanded("2"));
	}
}
