//! Page-level configuration for the schema graph.

use log::warn;
use serde::Deserialize;

use super::layout::LayoutConfig;
use super::scale::ScaleConfig;
use super::types::GraphData;

/// Everything the schema graph component can be tuned with.
///
/// Missing fields keep their defaults, so a page may override a single value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Simulation parameters.
	pub layout: LayoutConfig,
	/// Box and connector sizing.
	pub scale: ScaleConfig,
	/// Upper bound on tables handed to the layout (its cost is quadratic).
	pub max_nodes: usize,
	/// Quiet period before a changed graph is laid out.
	pub debounce_ms: u64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			layout: LayoutConfig::default(),
			scale: ScaleConfig::default(),
			max_nodes: 400,
			debounce_ms: 120,
		}
	}
}

impl GraphConfig {
	/// Replace invalid values with defaults, logging what was rejected.
	pub fn sanitized(mut self) -> Self {
		if let Err(err) = self.layout.validate() {
			warn!("lineage-graph: {err}; using default layout parameters");
			self.layout = LayoutConfig::default();
		}
		if self.max_nodes == 0 {
			warn!("lineage-graph: max_nodes must be at least 1; using default");
			self.max_nodes = GraphConfig::default().max_nodes;
		}
		self
	}
}

/// Truncate the node list to `max_nodes`.
///
/// Edges to dropped tables are kept; the layout ignores them.
pub fn cap_nodes(mut data: GraphData, max_nodes: usize) -> GraphData {
	if data.nodes.len() > max_nodes {
		warn!(
			"lineage-graph: {} tables exceed the limit of {}, showing the first {}",
			data.nodes.len(),
			max_nodes,
			max_nodes
		);
		data.nodes.truncate(max_nodes);
	}
	data
}
