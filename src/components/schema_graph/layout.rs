//! Force-directed layout for schema graphs.
//!
//! Tables are seeded on a circle, then moved by a fixed number of simulation
//! steps combining:
//! - inverse-square repulsion between every pair of tables
//! - Hookean springs along each relationship, pulling toward an ideal length
//! - velocity damping so the system settles
//!
//! The result is translated so the layout hugs the top-left padding corner.
//! No graph structure analysis is needed, so cyclic and disconnected schemas
//! lay out the same way: unrelated components simply drift apart.
//!
//! Each call re-seeds from scratch. For a fixed node order and edge list the
//! output is bit-identical between runs.
//!
//! Cost is `O(iterations × n²)`. Very large graphs (or very dense ones) may not
//! settle within the step budget and show up as overlapping boxes.

use std::f64::consts::PI;

use indexmap::IndexMap;
use log::debug;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::types::{GraphEdge, GraphNode, NodeKey};
use crate::error::ConfigError;

/// A point in the (unbounded) layout plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Position {
	/// Horizontal coordinate, growing right.
	pub x: f64,
	/// Vertical coordinate, growing down.
	pub y: f64,
}

impl Position {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Position) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}
}

/// Final table positions, in input node order.
pub type PositionMap = IndexMap<NodeKey, Position>;

/// Tunable simulation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Base spacing unit; scales both the seed circle and the spring length.
	pub base_gap: f64,
	/// Ideal spring length as a multiple of `base_gap`.
	pub spring_factor: f64,
	/// Numerator of the inverse-square repulsion.
	pub repel_constant: f64,
	/// Spring stiffness.
	pub attraction_constant: f64,
	/// Fraction of velocity kept after each step. Must lie in `(0, 1)`.
	pub damping: f64,
	/// Number of simulation steps.
	pub iterations: usize,
	/// Center of the seed circle.
	pub origin: Position,
	/// Minimum x and y after normalization.
	pub padding: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			base_gap: 180.0,
			spring_factor: 1.6,
			repel_constant: 20_000.0,
			attraction_constant: 0.02,
			damping: 0.82,
			iterations: 200,
			origin: Position::new(400.0, 300.0),
			padding: 40.0,
		}
	}
}

impl LayoutConfig {
	/// Target separation between two connected tables.
	pub fn ideal_distance(&self) -> f64 {
		self.base_gap * self.spring_factor
	}

	/// Radius of the seed circle for `node_count` tables.
	pub fn seed_radius(&self, node_count: usize) -> f64 {
		let rings = (node_count as f64).sqrt().ceil() / 2.0;
		self.base_gap * rings.max(1.0)
	}

	/// Check every parameter, naming the first one out of range.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let values = [
			("base_gap", self.base_gap),
			("spring_factor", self.spring_factor),
			("repel_constant", self.repel_constant),
			("attraction_constant", self.attraction_constant),
			("damping", self.damping),
			("origin.x", self.origin.x),
			("origin.y", self.origin.y),
			("padding", self.padding),
		];
		if let Some((field, _)) = values.into_iter().find(|(_, v)| !v.is_finite()) {
			return Err(ConfigError::new(field, "must be finite"));
		}
		if self.base_gap <= 0.0 {
			return Err(ConfigError::new("base_gap", "must be positive"));
		}
		if self.spring_factor <= 0.0 {
			return Err(ConfigError::new("spring_factor", "must be positive"));
		}
		if self.repel_constant < 0.0 {
			return Err(ConfigError::new("repel_constant", "must not be negative"));
		}
		if self.attraction_constant < 0.0 {
			return Err(ConfigError::new(
				"attraction_constant",
				"must not be negative",
			));
		}
		if self.damping <= 0.0 || self.damping >= 1.0 {
			return Err(ConfigError::new("damping", "must lie strictly between 0 and 1"));
		}
		if self.iterations == 0 {
			return Err(ConfigError::new("iterations", "must be at least 1"));
		}
		Ok(())
	}
}

/// Positions on the seed circle, one per table, in index order.
pub fn seed_positions(node_count: usize, config: &LayoutConfig) -> Vec<Position> {
	let radius = config.seed_radius(node_count);
	(0..node_count)
		.map(|i| {
			let angle = 2.0 * PI * i as f64 / node_count as f64;
			Position::new(
				config.origin.x + radius * angle.cos(),
				config.origin.y + radius * angle.sin(),
			)
		})
		.collect()
}

/// Lay out `nodes` connected by `edges`.
///
/// Edges whose endpoints are not both present are ignored. When several nodes
/// share a key, the first one wins. The returned map holds exactly one entry
/// per distinct node key, and is empty for empty input.
pub fn compute_layout(
	nodes: &[GraphNode],
	edges: &[GraphEdge],
	config: &LayoutConfig,
) -> PositionMap {
	let mut keys: Vec<NodeKey> = Vec::with_capacity(nodes.len());
	let mut index: FxHashMap<NodeKey, usize> = FxHashMap::default();
	for node in nodes {
		let key = node.key();
		if index.contains_key(&key) {
			debug!("lineage-graph: duplicate node key {key}, keeping first");
			continue;
		}
		index.insert(key.clone(), keys.len());
		keys.push(key);
	}

	if keys.is_empty() {
		return PositionMap::default();
	}

	let springs: Vec<(usize, usize)> = edges
		.iter()
		.filter_map(|edge| {
			let source = *index.get(&edge.source_key)?;
			let target = *index.get(&edge.target_key)?;
			Some((source, target))
		})
		.collect();

	let dangling = edges.len() - springs.len();
	if dangling > 0 {
		debug!("lineage-graph: ignoring {dangling} edges with missing endpoints");
	}

	let mut sim = Simulation::new(seed_positions(keys.len(), config));
	for _ in 0..config.iterations {
		sim.step(&springs, config);
	}
	sim.normalize(config.padding);

	debug!(
		"lineage-graph: laid out {} nodes, {} springs in {} steps",
		keys.len(),
		springs.len(),
		config.iterations
	);

	keys.into_iter().zip(sim.positions).collect()
}

/// Per-node physics state for a single layout run.
struct Simulation {
	positions: Vec<Position>,
	velocities: Vec<(f64, f64)>,
	forces: Vec<(f64, f64)>,
}

impl Simulation {
	fn new(positions: Vec<Position>) -> Self {
		let n = positions.len();
		Self {
			positions,
			velocities: vec![(0.0, 0.0); n],
			forces: vec![(0.0, 0.0); n],
		}
	}

	fn step(&mut self, springs: &[(usize, usize)], config: &LayoutConfig) {
		self.forces.fill((0.0, 0.0));
		self.apply_repulsion(config.repel_constant);
		self.apply_springs(springs, config.ideal_distance(), config.attraction_constant);

		for ((pos, vel), force) in self
			.positions
			.iter_mut()
			.zip(self.velocities.iter_mut())
			.zip(&self.forces)
		{
			vel.0 += force.0;
			vel.1 += force.1;
			pos.x += vel.0;
			pos.y += vel.1;
			vel.0 *= config.damping;
			vel.1 *= config.damping;
		}
	}

	fn apply_repulsion(&mut self, repel_constant: f64) {
		let n = self.positions.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (self.positions[i], self.positions[j]);
				let (dx, dy) = (b.x - a.x, b.y - a.y);
				let dist_sq = dx * dx + dy * dy;
				let (ux, uy) = unit_or_fallback(dx, dy, dist_sq.sqrt());
				let magnitude = repel_constant / dist_sq.max(1.0);

				self.forces[i].0 -= ux * magnitude;
				self.forces[i].1 -= uy * magnitude;
				self.forces[j].0 += ux * magnitude;
				self.forces[j].1 += uy * magnitude;
			}
		}
	}

	fn apply_springs(&mut self, springs: &[(usize, usize)], ideal: f64, stiffness: f64) {
		for &(s, t) in springs {
			if s == t {
				continue;
			}
			let (a, b) = (self.positions[s], self.positions[t]);
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let dist = dx.hypot(dy);
			let (ux, uy) = unit_or_fallback(dx, dy, dist);
			// Positive when stretched: pulls the endpoints together.
			let magnitude = (dist - ideal) * stiffness;

			self.forces[s].0 += ux * magnitude;
			self.forces[s].1 += uy * magnitude;
			self.forces[t].0 -= ux * magnitude;
			self.forces[t].1 -= uy * magnitude;
		}
	}

	fn normalize(&mut self, padding: f64) {
		let min_x = self.positions.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
		let min_y = self.positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
		if !min_x.is_finite() || !min_y.is_finite() {
			return;
		}
		let (shift_x, shift_y) = (padding - min_x, padding - min_y);
		for pos in &mut self.positions {
			pos.x += shift_x;
			pos.y += shift_y;
		}
	}
}

/// Unit vector along `(dx, dy)`; coincident points get a fixed +x direction.
fn unit_or_fallback(dx: f64, dy: f64, dist: f64) -> (f64, f64) {
	if dist > f64::EPSILON {
		(dx / dist, dy / dist)
	} else {
		(1.0, 0.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode::new("db", id)
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge::new(NodeKey::new("db", source), NodeKey::new("db", target))
	}

	fn pos(map: &PositionMap, id: &str) -> Position {
		map[&NodeKey::new("db", id)]
	}

	#[test]
	fn empty_input_yields_empty_map() {
		let config = LayoutConfig::default();
		assert!(compute_layout(&[], &[], &config).is_empty());
		assert!(compute_layout(&[], &[edge("a", "b")], &config).is_empty());
	}

	#[test]
	fn key_set_matches_node_set() {
		let nodes = vec![node("a"), node("b"), node("c"), node("a")];
		let edges = vec![edge("a", "b"), edge("b", "ghost")];
		let layout = compute_layout(&nodes, &edges, &LayoutConfig::default());

		let keys: Vec<&str> = layout.keys().map(NodeKey::as_str).collect();
		assert_eq!(keys, ["db:a", "db:b", "db:c"]);
	}

	#[test]
	fn identical_inputs_give_bit_identical_output() {
		let nodes: Vec<GraphNode> = ["orders", "customers", "items", "stores", "staff"]
			.iter()
			.map(|id| node(id))
			.collect();
		let edges = vec![
			edge("orders", "customers"),
			edge("items", "orders"),
			edge("staff", "stores"),
			edge("orders", "stores"),
		];
		let config = LayoutConfig::default();
		let first = compute_layout(&nodes, &edges, &config);
		let second = compute_layout(&nodes, &edges, &config);

		for ((ka, a), (kb, b)) in first.iter().zip(&second) {
			assert_eq!(ka, kb);
			assert_eq!(a.x.to_bits(), b.x.to_bits());
			assert_eq!(a.y.to_bits(), b.y.to_bits());
		}
	}

	#[test]
	fn dangling_edges_do_not_move_existing_nodes() {
		let nodes = vec![node("a"), node("b"), node("c")];
		let config = LayoutConfig::default();
		let clean = compute_layout(&nodes, &[edge("a", "b")], &config);
		let noisy = compute_layout(
			&nodes,
			&[edge("a", "ghost"), edge("a", "b"), edge("ghost", "c")],
			&config,
		);
		assert_eq!(clean, noisy);
	}

	#[test]
	fn connected_pair_settles_near_spring_length() {
		let config = LayoutConfig::default();
		let layout = compute_layout(&[node("a"), node("b")], &[edge("a", "b")], &config);

		let ideal = config.ideal_distance();
		let dist = pos(&layout, "a").distance(pos(&layout, "b"));
		assert!(
			(dist - ideal).abs() <= ideal * 0.1,
			"distance {dist} not within 10% of {ideal}"
		);
	}

	#[test]
	fn unconnected_nodes_only_move_apart() {
		let config = LayoutConfig::default();
		let ids = ["a", "b", "c", "d", "e"];
		let nodes: Vec<GraphNode> = ids.iter().map(|id| node(id)).collect();
		let seeds = seed_positions(nodes.len(), &config);
		let layout = compute_layout(&nodes, &[], &config);
		let finals: Vec<Position> = layout.values().copied().collect();

		for i in 0..ids.len() {
			for j in (i + 1)..ids.len() {
				let before = seeds[i].distance(seeds[j]);
				let after = finals[i].distance(finals[j]);
				assert!(after > before, "{}-{} shrank: {before} -> {after}", ids[i], ids[j]);
				assert_ne!(finals[i], finals[j]);
			}
		}
	}

	#[test]
	fn spring_pair_stays_closer_than_unlinked_third() {
		let config = LayoutConfig::default();
		let layout = compute_layout(
			&[node("A"), node("B"), node("C")],
			&[edge("A", "B")],
			&config,
		);

		let ideal = config.ideal_distance();
		let (a, b, c) = (pos(&layout, "A"), pos(&layout, "B"), pos(&layout, "C"));
		assert!((a.distance(b) - ideal).abs() <= ideal * 0.1);
		assert!(a.distance(c) > ideal);
		assert!(b.distance(c) > ideal);
	}

	#[test]
	fn layout_is_anchored_at_padding() {
		let config = LayoutConfig::default();
		let nodes = vec![node("a"), node("b"), node("c"), node("d")];
		let layout = compute_layout(&nodes, &[edge("a", "b"), edge("c", "d")], &config);

		let min_x = layout.values().map(|p| p.x).fold(f64::INFINITY, f64::min);
		let min_y = layout.values().map(|p| p.y).fold(f64::INFINITY, f64::min);
		assert!((min_x - config.padding).abs() < 1e-9);
		assert!((min_y - config.padding).abs() < 1e-9);
	}

	#[test]
	fn single_node_sits_on_the_padding_corner() {
		let config = LayoutConfig::default();
		let layout = compute_layout(&[node("solo")], &[], &config);
		let p = pos(&layout, "solo");
		assert!((p.x - config.padding).abs() < 1e-9);
		assert!((p.y - config.padding).abs() < 1e-9);
	}

	#[test]
	fn self_loops_exert_no_force() {
		let config = LayoutConfig::default();
		let nodes = vec![node("a"), node("b")];
		let plain = compute_layout(&nodes, &[], &config);
		let looped = compute_layout(&nodes, &[edge("a", "a")], &config);
		assert_eq!(plain, looped);
	}

	#[test]
	fn parallel_edges_pull_harder() {
		let config = LayoutConfig::default();
		let nodes = vec![node("a"), node("b"), node("c")];
		let single = compute_layout(&nodes, &[edge("a", "b")], &config);
		let double = compute_layout(&nodes, &[edge("a", "b"), edge("b", "a")], &config);

		let d1 = pos(&single, "a").distance(pos(&single, "b"));
		let d2 = pos(&double, "a").distance(pos(&double, "b"));
		assert!(d2 < d1);
	}

	#[test]
	fn seed_circle_radius_grows_with_node_count() {
		let config = LayoutConfig::default();
		assert_eq!(config.seed_radius(1), config.base_gap);
		assert_eq!(config.seed_radius(4), config.base_gap);
		assert_eq!(config.seed_radius(9), config.base_gap * 1.5);
		assert_eq!(config.seed_radius(16), config.base_gap * 2.0);

		let seeds = seed_positions(4, &config);
		assert!((seeds[0].x - (config.origin.x + config.base_gap)).abs() < 1e-9);
		assert!((seeds[0].y - config.origin.y).abs() < 1e-9);
	}

	#[test]
	fn default_config_is_valid() {
		assert_eq!(LayoutConfig::default().validate(), Ok(()));
	}

	#[test]
	fn validation_names_the_bad_field() {
		let bad_damping = LayoutConfig {
			damping: 1.0,
			..LayoutConfig::default()
		};
		assert_eq!(bad_damping.validate().unwrap_err().field, "damping");

		let bad_gap = LayoutConfig {
			base_gap: f64::NAN,
			..LayoutConfig::default()
		};
		assert_eq!(bad_gap.validate().unwrap_err().field, "base_gap");

		let no_steps = LayoutConfig {
			iterations: 0,
			..LayoutConfig::default()
		};
		assert_eq!(no_steps.validate().unwrap_err().field, "iterations");
	}

	#[test]
	fn partial_config_json_keeps_defaults() {
		let config: LayoutConfig =
			serde_json::from_str(r#"{"iterations": 50, "origin": {"x": 0.0, "y": 0.0}}"#).unwrap();
		assert_eq!(config.iterations, 50);
		assert_eq!(config.origin, Position::new(0.0, 0.0));
		assert_eq!(config.damping, LayoutConfig::default().damping);
	}
}
