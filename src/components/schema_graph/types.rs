//! Graph data structures for input to the schema graph component.
//!
//! The backend's lineage endpoint returns one payload per connected data source.
//! Payloads are converted into [`GraphNode`]s and [`GraphEdge`]s keyed by
//! [`NodeKey`], so tables that share a name across sources stay distinct.

use std::fmt;

use serde::Deserialize;

/// Composite node identity: `group_key + ":" + id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(String);

impl NodeKey {
	/// Key of table `id` in source `group_key`.
	pub fn new(group_key: &str, id: &str) -> Self {
		Self(format!("{group_key}:{id}"))
	}

	/// The `group:id` text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A table in the schema graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Table name, unique within its group.
	pub id: String,
	/// Data source the table belongs to (connection / service name).
	pub group_key: String,
	/// Row count. Carried through for rendering; the layout never reads it.
	pub weight: Option<u64>,
	/// Optional display label. Falls back to `id`.
	pub label: Option<String>,
}

impl GraphNode {
	/// Table `id` of source `group_key`, without row count or label.
	pub fn new(group_key: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			group_key: group_key.into(),
			weight: None,
			label: None,
		}
	}

	/// Composite key of this table.
	pub fn key(&self) -> NodeKey {
		NodeKey::new(&self.group_key, &self.id)
	}

	/// Label if set, else the table name.
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.id)
	}
}

/// A directed foreign-key relationship between two tables.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	/// Referencing table.
	pub source_key: NodeKey,
	/// Referenced table.
	pub target_key: NodeKey,
	/// Foreign-key column on the source table.
	pub source_column: Option<String>,
	/// Referenced column on the target table.
	pub target_column: Option<String>,
	/// `true` when deduced from column naming rather than a declared constraint.
	pub inferred: bool,
	/// Display text, e.g. `customer_id → customers.id`.
	pub label: Option<String>,
}

impl GraphEdge {
	/// Declared relationship without column metadata.
	pub fn new(source_key: NodeKey, target_key: NodeKey) -> Self {
		Self {
			source_key,
			target_key,
			source_column: None,
			target_column: None,
			inferred: false,
			label: None,
		}
	}
}

/// Complete graph data: nodes and edges, possibly spanning several sources.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Tables, in input order.
	pub nodes: Vec<GraphNode>,
	/// Relationships between them.
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Merge several lineage payloads into one graph.
	pub fn from_payloads(payloads: &[LineagePayload]) -> Self {
		let mut data = GraphData::default();
		for payload in payloads {
			payload.append_to(&mut data);
		}
		data
	}
}

/// A table entry as returned by the lineage endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct LineageTable {
	/// Table name.
	pub id: String,
	/// Display label.
	#[serde(default)]
	pub label: Option<String>,
	/// Approximate number of rows.
	#[serde(default)]
	pub row_count: Option<u64>,
}

/// A relationship entry as returned by the lineage endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct LineageRelation {
	/// Referencing table name.
	pub source: String,
	/// Referenced table name.
	pub target: String,
	/// Foreign-key column.
	#[serde(default)]
	pub source_column: Option<String>,
	/// Referenced column.
	#[serde(default)]
	pub target_column: Option<String>,
	/// Display text.
	#[serde(default)]
	pub label: Option<String>,
	/// Deduced from naming rather than declared.
	#[serde(default)]
	pub inferred: bool,
}

/// Lineage payload for a single data source.
#[derive(Clone, Debug, Deserialize)]
pub struct LineagePayload {
	/// Connection the tables belong to; becomes the node group.
	pub service_name: String,
	/// Tables of this source.
	#[serde(default)]
	pub nodes: Vec<LineageTable>,
	/// Relationships within this source.
	#[serde(default)]
	pub edges: Vec<LineageRelation>,
}

impl LineagePayload {
	fn append_to(&self, data: &mut GraphData) {
		let group = self.service_name.as_str();
		data.nodes.extend(self.nodes.iter().map(|table| GraphNode {
			id: table.id.clone(),
			group_key: group.to_string(),
			weight: table.row_count,
			label: table.label.clone(),
		}));
		data.edges.extend(self.edges.iter().map(|rel| GraphEdge {
			source_key: NodeKey::new(group, &rel.source),
			target_key: NodeKey::new(group, &rel.target),
			source_column: rel.source_column.clone(),
			target_column: rel.target_column.clone(),
			inferred: rel.inferred,
			label: rel.label.clone(),
		}));
	}
}

/// The page may embed a single payload or one per connection.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum LineageDocument {
	/// One payload per connection.
	Many(Vec<LineagePayload>),
	/// A single connection.
	One(LineagePayload),
}

impl LineageDocument {
	/// Merge all payloads into one graph.
	pub fn into_graph(self) -> GraphData {
		match self {
			LineageDocument::Many(payloads) => GraphData::from_payloads(&payloads),
			LineageDocument::One(payload) => GraphData::from_payloads(&[payload]),
		}
	}
}
