//! Employee tree model and its traversal helpers.
//!
//! The forest is never patched in place: every edit is followed by a fresh
//! fetch, so everything here is read-only.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// One employee and their direct reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrgChartNode {
	#[serde(deserialize_with = "employee_id")]
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub department: Option<String>,
	#[serde(default, rename = "avatarUrl", alias = "avatar_url")]
	pub avatar_url: Option<String>,
	#[serde(default)]
	pub children: Vec<OrgChartNode>,
}

/// Body of `GET /api/v1/orgchart`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgChartResponse {
	#[serde(default)]
	pub assigned: Vec<OrgChartNode>,
	#[serde(default)]
	pub unassigned: Vec<OrgChartNode>,
}

/// Depth-first projection of the assigned forest, one row per employee.
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedEmployee {
	pub id: String,
	pub name: String,
	pub title: String,
	pub manager_id: Option<String>,
}

/// Accepts ids sent either as JSON numbers or strings.
fn employee_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Number(i64),
		Text(String),
	}

	Ok(match RawId::deserialize(deserializer)? {
		RawId::Number(n) => n.to_string(),
		RawId::Text(s) => s,
	})
}

pub fn find_by_id<'a>(forest: &'a [OrgChartNode], id: &str) -> Option<&'a OrgChartNode> {
	for node in forest {
		if node.id == id {
			return Some(node);
		}
		if let Some(found) = find_by_id(&node.children, id) {
			return Some(found);
		}
	}
	None
}

/// True when `id` is `ancestor` itself or anywhere below it.
///
/// The self-inclusive answer is what the drop validator relies on.
pub fn is_descendant(ancestor: &OrgChartNode, id: &str) -> bool {
	ancestor.id == id || ancestor.children.iter().any(|child| is_descendant(child, id))
}

pub fn flatten(forest: &[OrgChartNode]) -> Vec<FlattenedEmployee> {
	fn walk(nodes: &[OrgChartNode], manager: Option<&str>, out: &mut Vec<FlattenedEmployee>) {
		for node in nodes {
			out.push(FlattenedEmployee {
				id: node.id.clone(),
				name: node.name.clone(),
				title: node.title.clone(),
				manager_id: manager.map(str::to_owned),
			});
			walk(&node.children, Some(&node.id), out);
		}
	}

	let mut out = Vec::new();
	walk(forest, None, &mut out);
	out
}

/// Number of nodes strictly below `node`.
pub fn count_descendants(node: &OrgChartNode) -> usize {
	node.children
		.iter()
		.map(|child| 1 + count_descendants(child))
		.sum()
}

pub fn collect_ids(forest: &[OrgChartNode]) -> HashSet<String> {
	let mut ids = HashSet::new();
	let mut stack: Vec<&OrgChartNode> = forest.iter().collect();
	while let Some(node) = stack.pop() {
		ids.insert(node.id.clone());
		stack.extend(node.children.iter());
	}
	ids
}

/// Ids of every node whose depth (roots are 0) is below `depth`.
pub fn ids_to_depth(forest: &[OrgChartNode], depth: usize) -> HashSet<String> {
	let mut ids = HashSet::new();
	let mut stack: Vec<(&OrgChartNode, usize)> = forest.iter().map(|n| (n, 0)).collect();
	while let Some((node, level)) = stack.pop() {
		if level >= depth {
			continue;
		}
		ids.insert(node.id.clone());
		stack.extend(node.children.iter().map(|c| (c, level + 1)));
	}
	ids
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn node(id: &str, children: Vec<OrgChartNode>) -> OrgChartNode {
		OrgChartNode {
			id: id.into(),
			name: format!("Employee {id}"),
			title: "Engineer".into(),
			department: None,
			avatar_url: None,
			children,
		}
	}

	/// 1 -> (2 -> 3), 4
	pub(crate) fn sample_forest() -> Vec<OrgChartNode> {
		vec![
			node("1", vec![node("2", vec![node("3", vec![])])]),
			node("4", vec![]),
		]
	}

	#[test]
	fn finds_nested_nodes() {
		let forest = sample_forest();
		assert_eq!(find_by_id(&forest, "3").map(|n| n.id.as_str()), Some("3"));
		assert_eq!(find_by_id(&forest, "4").map(|n| n.id.as_str()), Some("4"));
		assert!(find_by_id(&forest, "99").is_none());
	}

	#[test]
	fn descendant_check_is_self_inclusive() {
		let forest = sample_forest();
		let root = &forest[0];
		assert!(is_descendant(root, "1"));
		assert!(is_descendant(root, "3"));
		assert!(!is_descendant(root, "4"));
		assert!(!is_descendant(&root.children[0], "1"));
	}

	#[test]
	fn flatten_records_parents_depth_first() {
		let flat = flatten(&sample_forest());
		let rows: Vec<(&str, Option<&str>)> = flat
			.iter()
			.map(|e| (e.id.as_str(), e.manager_id.as_deref()))
			.collect();
		assert_eq!(
			rows,
			vec![("1", None), ("2", Some("1")), ("3", Some("2")), ("4", None)]
		);
	}

	#[test]
	fn counts_whole_subtree() {
		let forest = sample_forest();
		assert_eq!(count_descendants(&forest[0]), 2);
		assert_eq!(count_descendants(&forest[1]), 0);
	}

	#[test]
	fn ids_to_depth_limits_levels() {
		let forest = sample_forest();
		let first: HashSet<String> = ["1", "4"].iter().map(|s| s.to_string()).collect();
		assert_eq!(ids_to_depth(&forest, 1), first);
		assert_eq!(ids_to_depth(&forest, 10), collect_ids(&forest));
		assert!(ids_to_depth(&forest, 0).is_empty());
	}

	#[test]
	fn decodes_numeric_and_string_ids() {
		let json = r#"{
			"assigned": [{"id": 7, "name": "Alice", "title": "CEO", "children": [
				{"id": "8", "name": "Bob", "title": "CTO", "department": "Engineering"}
			]}],
			"unassigned": [{"id": 9, "name": "Carol", "title": "Intern", "avatar_url": "/a.png"}]
		}"#;
		let response: OrgChartResponse = serde_json::from_str(json).unwrap();
		assert_eq!(response.assigned[0].id, "7");
		assert_eq!(response.assigned[0].children[0].id, "8");
		assert_eq!(
			response.assigned[0].children[0].department.as_deref(),
			Some("Engineering")
		);
		assert_eq!(response.unassigned[0].avatar_url.as_deref(), Some("/a.png"));
		assert!(response.unassigned[0].children.is_empty());
	}
}
