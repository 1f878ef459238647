//! Layout scheduling, view transform, and hover tracking.
//!
//! Layout runs are keyed on a content signature of the graph. A new signature
//! issues a ticket with a fresh generation; only the result for the newest
//! generation is accepted, so a slow or debounced run never overwrites a newer
//! one. While a run is outstanding the status is [`LayoutStatus::Calculating`]
//! and no positions are exposed.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashSet, FxHasher};

use super::layout::{Position, PositionMap};
use super::ports::NodeBox;
use super::scale::ScaleConfig;
use super::types::{GraphData, GraphNode, NodeKey};

/// Content hash of a graph's node keys and edge endpoints, in order.
///
/// Unlike node/edge counts, this changes when tables are swapped for others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphSignature(u64);

impl GraphSignature {
	/// Signature of `data`.
	pub fn of(data: &GraphData) -> Self {
		let mut hasher = FxHasher::default();
		data.nodes.len().hash(&mut hasher);
		for node in &data.nodes {
			node.group_key.hash(&mut hasher);
			node.id.hash(&mut hasher);
		}
		data.edges.len().hash(&mut hasher);
		for edge in &data.edges {
			edge.source_key.hash(&mut hasher);
			edge.target_key.hash(&mut hasher);
		}
		Self(hasher.finish())
	}
}

/// Handle for one requested layout run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutTicket {
	generation: u64,
	/// Graph content this run lays out.
	pub signature: GraphSignature,
}

/// What the scheduler can show right now.
#[derive(Debug, PartialEq)]
pub enum LayoutStatus<'a> {
	/// Nothing requested yet.
	Idle,
	/// A run is outstanding; render a neutral placeholder.
	Calculating,
	/// Positions of the latest completed run.
	Ready(&'a PositionMap),
}

/// Last-write-wins bookkeeping for layout runs.
#[derive(Debug, Default)]
pub struct LayoutScheduler {
	generation: u64,
	requested: Option<GraphSignature>,
	positions: Option<PositionMap>,
	pending: bool,
}

impl LayoutScheduler {
	/// Request a layout for `signature`.
	///
	/// Returns `None` when that signature is already the latest request
	/// (pending or done). Otherwise discards any current positions and returns
	/// a ticket that supersedes all earlier ones.
	pub fn request(&mut self, signature: GraphSignature) -> Option<LayoutTicket> {
		if self.requested == Some(signature) {
			return None;
		}
		self.generation += 1;
		self.requested = Some(signature);
		self.positions = None;
		self.pending = true;
		Some(LayoutTicket {
			generation: self.generation,
			signature,
		})
	}

	/// `true` while no newer request has superseded `ticket`.
	pub fn is_current(&self, ticket: &LayoutTicket) -> bool {
		ticket.generation == self.generation
	}

	/// Store the result for `ticket`. Stale tickets are rejected.
	pub fn complete(&mut self, ticket: LayoutTicket, positions: PositionMap) -> bool {
		if !self.is_current(&ticket) {
			return false;
		}
		self.positions = Some(positions);
		self.pending = false;
		true
	}

	/// Current status; positions only when the latest request has completed.
	pub fn status(&self) -> LayoutStatus<'_> {
		match (&self.positions, self.pending) {
			(_, true) => LayoutStatus::Calculating,
			(Some(positions), false) => LayoutStatus::Ready(positions),
			(None, false) => LayoutStatus::Idle,
		}
	}

	/// Positions of the latest run, once it has completed.
	pub fn positions(&self) -> Option<&PositionMap> {
		match self.status() {
			LayoutStatus::Ready(positions) => Some(positions),
			_ => None,
		}
	}

	/// Forget everything and invalidate outstanding tickets.
	pub fn reset(&mut self) {
		self.generation += 1;
		self.requested = None;
		self.positions = None;
		self.pending = false;
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to `MIN_ZOOM..=MAX_ZOOM`).
	pub k: f64,
}

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 4.0;

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Convert canvas pixels to layout coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Transform that shows `bounds` (min, max) centered inside a viewport,
	/// never zooming in past 100%.
	pub fn fit(bounds: (Position, Position), width: f64, height: f64, margin: f64) -> Self {
		let (min, max) = bounds;
		let (bw, bh) = ((max.x - min.x).max(1.0), (max.y - min.y).max(1.0));
		let (vw, vh) = ((width - 2.0 * margin).max(1.0), (height - 2.0 * margin).max(1.0));
		let k = (vw / bw).min(vh / bh).clamp(MIN_ZOOM, 1.0);
		let (cx, cy) = ((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// A drag is in progress.
	pub active: bool,
	/// Pointer x when the drag started.
	pub start_x: f64,
	/// Pointer y when the drag started.
	pub start_y: f64,
	/// Transform x when the drag started.
	pub transform_start_x: f64,
	/// Transform y when the drag started.
	pub transform_start_y: f64,
}

/// Box for `node` placed with its top-left corner at `position`.
pub fn table_box(node: &GraphNode, position: Position, config: &ScaleConfig) -> NodeBox {
	let width = config.table.box_width(node.display_label());
	let height = config.table.height;
	NodeBox::new(
		Position::new(position.x + width / 2.0, position.y + height / 2.0),
		width,
		height,
	)
}

/// Core component state: graph data, layout runs, view transform and hover.
pub struct SchemaGraphState {
	/// Graph currently displayed.
	pub data: GraphData,
	/// Layout runs for `data`.
	pub scheduler: LayoutScheduler,
	/// Box and connector sizing.
	pub scale: ScaleConfig,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Drag in progress, if any.
	pub pan: PanState,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	hovered: Option<NodeKey>,
	highlighted: FxHashSet<NodeKey>,
}

impl SchemaGraphState {
	/// Empty state for a canvas of the given size.
	pub fn new(scale: ScaleConfig, width: f64, height: f64) -> Self {
		Self {
			data: GraphData::default(),
			scheduler: LayoutScheduler::default(),
			scale,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			width,
			height,
			hovered: None,
			highlighted: FxHashSet::default(),
		}
	}

	/// Replace the graph. Returns a ticket when a new layout is needed.
	///
	/// Labels and row counts are always taken from `data`; only a changed
	/// signature triggers a layout and clears the hover.
	pub fn set_data(&mut self, data: GraphData) -> Option<LayoutTicket> {
		let ticket = self.scheduler.request(GraphSignature::of(&data));
		self.data = data;
		if ticket.is_some() {
			self.set_hover(None);
		}
		ticket
	}

	/// Accept a finished layout and fit it to the viewport.
	pub fn complete(&mut self, ticket: LayoutTicket, positions: PositionMap) -> bool {
		if !self.scheduler.complete(ticket, positions) {
			return false;
		}
		if let Some(bounds) = self.bounds() {
			self.transform = ViewTransform::fit(bounds, self.width, self.height, 24.0);
		}
		true
	}

	/// Boxes for every positioned node, in node order. Repeated keys keep
	/// only their first node.
	pub fn boxes(&self) -> Vec<(NodeKey, &GraphNode, NodeBox)> {
		let Some(positions) = self.scheduler.positions() else {
			return Vec::new();
		};
		let mut seen = FxHashSet::default();
		self.data
			.nodes
			.iter()
			.filter_map(|node| {
				let key = node.key();
				let position = *positions.get(&key)?;
				if !seen.insert(key.clone()) {
					return None;
				}
				let node_box = table_box(node, position, &self.scale);
				Some((key, node, node_box))
			})
			.collect()
	}

	/// World-space bounding rectangle of all boxes.
	pub fn bounds(&self) -> Option<(Position, Position)> {
		let boxes = self.boxes();
		if boxes.is_empty() {
			return None;
		}
		let mut min = Position::new(f64::INFINITY, f64::INFINITY);
		let mut max = Position::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
		for (_, _, b) in &boxes {
			min.x = min.x.min(b.center.x - b.width / 2.0);
			min.y = min.y.min(b.center.y - b.height / 2.0);
			max.x = max.x.max(b.center.x + b.width / 2.0);
			max.y = max.y.max(b.center.y + b.height / 2.0);
		}
		Some((min, max))
	}

	/// Topmost table under the screen point, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeKey> {
		let point = self.transform.screen_to_graph(sx, sy);
		self.boxes()
			.into_iter()
			.rev()
			.find(|(_, _, b)| b.contains(point))
			.map(|(key, _, _)| key)
	}

	/// Update the hovered table; highlights it plus its direct neighbors.
	pub fn set_hover(&mut self, node: Option<NodeKey>) {
		if self.hovered == node {
			return;
		}
		self.highlighted.clear();
		if let Some(key) = &node {
			self.highlighted.insert(key.clone());
			for edge in &self.data.edges {
				if &edge.source_key == key {
					self.highlighted.insert(edge.target_key.clone());
				} else if &edge.target_key == key {
					self.highlighted.insert(edge.source_key.clone());
				}
			}
		}
		self.hovered = node;
	}

	/// Table under the pointer.
	pub fn hovered(&self) -> Option<&NodeKey> {
		self.hovered.as_ref()
	}

	/// `true` for the hovered table and its direct neighbors.
	pub fn is_highlighted(&self, key: &NodeKey) -> bool {
		self.highlighted.contains(key)
	}

	/// An edge is highlighted when it touches the hovered table.
	pub fn is_edge_highlighted(&self, source: &NodeKey, target: &NodeKey) -> bool {
		self.hovered
			.as_ref()
			.is_some_and(|h| h == source || h == target)
	}

	/// Record a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::super::layout::{LayoutConfig, compute_layout};
	use super::super::types::GraphEdge;
	use super::*;

	fn graph(ids: &[&str], edges: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: ids.iter().map(|id| GraphNode::new("db", *id)).collect(),
			edges: edges
				.iter()
				.map(|(s, t)| GraphEdge::new(NodeKey::new("db", s), NodeKey::new("db", t)))
				.collect(),
		}
	}

	fn positions(data: &GraphData) -> PositionMap {
		compute_layout(&data.nodes, &data.edges, &LayoutConfig::default())
	}

	#[test]
	fn signature_sees_same_count_swaps() {
		let a = graph(&["orders", "customers"], &[("orders", "customers")]);
		let b = graph(&["orders", "stores"], &[("orders", "stores")]);
		assert_ne!(GraphSignature::of(&a), GraphSignature::of(&b));
		assert_eq!(GraphSignature::of(&a), GraphSignature::of(&a.clone()));
	}

	#[test]
	fn signature_ignores_rendering_metadata() {
		let a = graph(&["orders"], &[]);
		let mut b = a.clone();
		b.nodes[0].weight = Some(10);
		b.nodes[0].label = Some("Orders".into());
		assert_eq!(GraphSignature::of(&a), GraphSignature::of(&b));
	}

	#[test]
	fn scheduler_reports_calculating_until_complete() {
		let mut scheduler = LayoutScheduler::default();
		assert_eq!(scheduler.status(), LayoutStatus::Idle);

		let data = graph(&["a", "b"], &[("a", "b")]);
		let ticket = scheduler.request(GraphSignature::of(&data)).unwrap();
		assert_eq!(scheduler.status(), LayoutStatus::Calculating);
		assert!(scheduler.positions().is_none());

		let result = positions(&data);
		assert!(scheduler.complete(ticket, result.clone()));
		assert_eq!(scheduler.status(), LayoutStatus::Ready(&result));
	}

	#[test]
	fn unchanged_signature_does_not_retrigger() {
		let mut scheduler = LayoutScheduler::default();
		let data = graph(&["a"], &[]);
		let sig = GraphSignature::of(&data);
		assert!(scheduler.request(sig).is_some());
		assert!(scheduler.request(sig).is_none());
	}

	#[test]
	fn stale_result_is_discarded() {
		let mut scheduler = LayoutScheduler::default();
		let old = graph(&["a", "b"], &[]);
		let new = graph(&["a", "b", "c"], &[]);

		let old_ticket = scheduler.request(GraphSignature::of(&old)).unwrap();
		let new_ticket = scheduler.request(GraphSignature::of(&new)).unwrap();
		assert!(!scheduler.is_current(&old_ticket));

		assert!(!scheduler.complete(old_ticket, positions(&old)));
		assert_eq!(scheduler.status(), LayoutStatus::Calculating);

		assert!(scheduler.complete(new_ticket, positions(&new)));
		assert_eq!(scheduler.positions().map(|p| p.len()), Some(3));
	}

	#[test]
	fn reset_invalidates_in_flight_tickets() {
		let mut scheduler = LayoutScheduler::default();
		let data = graph(&["a"], &[]);
		let ticket = scheduler.request(GraphSignature::of(&data)).unwrap();
		scheduler.reset();
		assert!(!scheduler.complete(ticket, positions(&data)));
		assert_eq!(scheduler.status(), LayoutStatus::Idle);
		// Same graph can be requested again after a reset.
		assert!(scheduler.request(GraphSignature::of(&data)).is_some());
	}

	#[test]
	fn zoom_keeps_anchor_point_fixed() {
		let mut transform = ViewTransform::default();
		let before = transform.screen_to_graph(200.0, 100.0);
		transform.zoom_at(200.0, 100.0, 2.0);
		let after = transform.screen_to_graph(200.0, 100.0);
		assert_eq!(transform.k, 2.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);

		transform.zoom_at(0.0, 0.0, 100.0);
		assert_eq!(transform.k, MAX_ZOOM);
	}

	#[test]
	fn fit_centers_bounds_without_zooming_in() {
		let bounds = (Position::new(0.0, 0.0), Position::new(100.0, 50.0));
		let t = ViewTransform::fit(bounds, 800.0, 600.0, 20.0);
		assert_eq!(t.k, 1.0);
		assert_eq!(t.x, 350.0);
		assert_eq!(t.y, 275.0);

		let wide = (Position::new(0.0, 0.0), Position::new(4000.0, 100.0));
		let t = ViewTransform::fit(wide, 800.0, 600.0, 0.0);
		assert_eq!(t.k, 0.2);
	}

	#[test]
	fn state_exposes_boxes_only_when_ready() {
		let mut state = SchemaGraphState::new(ScaleConfig::default(), 800.0, 600.0);
		let data = graph(&["orders", "customers"], &[("orders", "customers")]);
		let ticket = state.set_data(data.clone()).unwrap();
		assert!(state.boxes().is_empty());

		assert!(state.complete(ticket, positions(&data)));
		let boxes = state.boxes();
		assert_eq!(boxes.len(), 2);
		assert_eq!(boxes[0].0, NodeKey::new("db", "orders"));
	}

	#[test]
	fn repeated_key_gets_one_box_from_first_node() {
		let mut state = SchemaGraphState::new(ScaleConfig::default(), 800.0, 600.0);
		let mut data = graph(&["orders", "orders"], &[]);
		data.nodes[0].weight = Some(1);
		data.nodes[1].weight = Some(2);
		let ticket = state.set_data(data.clone()).unwrap();
		assert!(state.complete(ticket, positions(&data)));

		let boxes = state.boxes();
		assert_eq!(boxes.len(), 1);
		assert_eq!(boxes[0].1.weight, Some(1));
	}

	#[test]
	fn row_count_update_is_kept_without_relayout() {
		let mut state = SchemaGraphState::new(ScaleConfig::default(), 800.0, 600.0);
		let data = graph(&["orders"], &[]);
		let ticket = state.set_data(data.clone()).unwrap();
		assert!(state.complete(ticket, positions(&data)));

		let mut updated = data.clone();
		updated.nodes[0].weight = Some(999);
		updated.nodes[0].label = Some("Orders".into());
		assert!(state.set_data(updated).is_none());

		assert_eq!(state.data.nodes[0].weight, Some(999));
		let boxes = state.boxes();
		assert_eq!(boxes.len(), 1);
		assert_eq!(boxes[0].1.weight, Some(999));
		assert_eq!(boxes[0].1.display_label(), "Orders");
		assert!(matches!(state.scheduler.status(), LayoutStatus::Ready(_)));
	}

	#[test]
	fn hover_highlights_neighbors() {
		let mut state = SchemaGraphState::new(ScaleConfig::default(), 800.0, 600.0);
		let data = graph(&["a", "b", "c"], &[("a", "b")]);
		let ticket = state.set_data(data.clone()).unwrap();
		state.complete(ticket, positions(&data));

		let (a, b, c) = (
			NodeKey::new("db", "a"),
			NodeKey::new("db", "b"),
			NodeKey::new("db", "c"),
		);
		state.set_hover(Some(a.clone()));
		assert!(state.is_highlighted(&a));
		assert!(state.is_highlighted(&b));
		assert!(!state.is_highlighted(&c));
		assert!(state.is_edge_highlighted(&a, &b));

		state.set_hover(None);
		assert!(!state.is_highlighted(&a));
	}

	#[test]
	fn hit_test_finds_box_under_cursor() {
		let mut state = SchemaGraphState::new(ScaleConfig::default(), 800.0, 600.0);
		let data = graph(&["a", "b"], &[("a", "b")]);
		let ticket = state.set_data(data.clone()).unwrap();
		state.complete(ticket, positions(&data));

		let (key, _, b) = state.boxes()[1].clone();
		let t = &state.transform;
		let (sx, sy) = (b.center.x * t.k + t.x, b.center.y * t.k + t.y);
		assert_eq!(state.node_at_position(sx, sy), Some(key));
		assert_eq!(state.node_at_position(-10_000.0, -10_000.0), None);
	}
}
