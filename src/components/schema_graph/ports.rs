//! Connector geometry between table boxes.
//!
//! Connectors are routed orthogonally with a single bend at the midpoint. The
//! dominant axis between box centers decides whether a connector leaves through
//! the left/right or top/bottom side.

use super::layout::Position;

/// A side of a table box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	/// Upper edge.
	Top,
	/// Lower edge.
	Bottom,
	/// Left edge.
	Left,
	/// Right edge.
	Right,
}

impl Side {
	/// The facing side: `Left` for `Right`, `Top` for `Bottom`.
	pub fn opposite(self) -> Self {
		match self {
			Side::Top => Side::Bottom,
			Side::Bottom => Side::Top,
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}

	/// `true` for `Left` and `Right`.
	pub fn is_horizontal(self) -> bool {
		matches!(self, Side::Left | Side::Right)
	}
}

/// Axis-aligned table box, described by its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeBox {
	/// Center in layout coordinates.
	pub center: Position,
	/// Full width.
	pub width: f64,
	/// Full height.
	pub height: f64,
}

impl NodeBox {
	/// Box of the given size around `center`.
	pub fn new(center: Position, width: f64, height: f64) -> Self {
		Self {
			center,
			width,
			height,
		}
	}

	/// Midpoint of the given side.
	pub fn port(&self, side: Side) -> Position {
		let (hw, hh) = (self.width / 2.0, self.height / 2.0);
		let Position { x, y } = self.center;
		match side {
			Side::Top => Position::new(x, y - hh),
			Side::Bottom => Position::new(x, y + hh),
			Side::Left => Position::new(x - hw, y),
			Side::Right => Position::new(x + hw, y),
		}
	}

	/// `true` when `p` lies inside or on the border.
	pub fn contains(&self, p: Position) -> bool {
		(p.x - self.center.x).abs() <= self.width / 2.0
			&& (p.y - self.center.y).abs() <= self.height / 2.0
	}
}

/// Exit side on the source box and entry side on the target box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ports {
	/// Side the connector leaves the source box through.
	pub exit: Side,
	/// Side the connector enters the target box through.
	pub entry: Side,
}

/// Pick connector sides from the displacement between box centers.
///
/// Horizontal displacement must strictly dominate for a left/right route;
/// ties route vertically.
pub fn select_ports(source: &NodeBox, target: &NodeBox) -> Ports {
	let dx = target.center.x - source.center.x;
	let dy = target.center.y - source.center.y;

	let exit = if dx.abs() > dy.abs() {
		if dx > 0.0 { Side::Right } else { Side::Left }
	} else if dy > 0.0 {
		Side::Bottom
	} else {
		Side::Top
	};

	Ports {
		exit,
		entry: exit.opposite(),
	}
}

/// Orthogonal polyline from `source` to `target` with one bend at the midpoint.
///
/// Always four points: exit port, two bend corners, entry port. Corners collapse
/// onto a straight line when the ports are already aligned.
pub fn route_connector(source: &NodeBox, target: &NodeBox) -> [Position; 4] {
	let ports = select_ports(source, target);
	let start = source.port(ports.exit);
	let end = target.port(ports.entry);

	if ports.exit.is_horizontal() {
		let mid_x = (start.x + end.x) / 2.0;
		[
			start,
			Position::new(mid_x, start.y),
			Position::new(mid_x, end.y),
			end,
		]
	} else {
		let mid_y = (start.y + end.y) / 2.0;
		[
			start,
			Position::new(start.x, mid_y),
			Position::new(end.x, mid_y),
			end,
		]
	}
}
