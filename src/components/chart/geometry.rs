//! Geometry for inline bar, pie and line charts.
//!
//! All coordinates are SVG user units inside a [`ChartFrame`], y growing
//! downward. Rows whose value cell is null or non-numeric are skipped.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use super::table::{ChartColumns, ResultTable};

/// Requested chart style. Unknown names fall back to [`ChartKind::Bar`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartKind {
	/// Vertical bars.
	#[default]
	Bar,
	/// Horizontal bars.
	HorizontalBar,
	/// Pie wedges.
	Pie,
	/// Line through the values in row order.
	Line,
}

impl From<&str> for ChartKind {
	fn from(name: &str) -> Self {
		match name.trim().to_ascii_lowercase().as_str() {
			"pie" => ChartKind::Pie,
			"line" => ChartKind::Line,
			"horizontal_bar" | "hbar" => ChartKind::HorizontalBar,
			_ => ChartKind::Bar,
		}
	}
}

/// Drawing surface with uniform padding around the plot area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartFrame {
	/// SVG width.
	pub width: f64,
	/// SVG height.
	pub height: f64,
	/// Space around the plot area on every side.
	pub padding: f64,
}

impl Default for ChartFrame {
	fn default() -> Self {
		Self {
			width: 480.0,
			height: 260.0,
			padding: 32.0,
		}
	}
}

impl ChartFrame {
	/// `(left, top, width, height)` of the area inside the padding.
	pub fn plot_area(&self) -> (f64, f64, f64, f64) {
		(
			self.padding,
			self.padding,
			(self.width - 2.0 * self.padding).max(0.0),
			(self.height - 2.0 * self.padding).max(0.0),
		)
	}
}

/// One charted row.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
	/// Text of the label column.
	pub label: String,
	/// Numeric value.
	pub value: f64,
}

/// Label/value pairs for every row with a numeric value.
pub fn data_points(table: &ResultTable, columns: ChartColumns) -> Vec<DataPoint> {
	table
		.rows
		.iter()
		.filter_map(|row| {
			let value = row.get(columns.value)?.as_number()?;
			let label = row.get(columns.label).map(|c| c.display()).unwrap_or_default();
			Some(DataPoint { label, value })
		})
		.collect()
}

/// A bar rectangle plus the value it stands for.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
	/// Label of the row.
	pub label: String,
	/// Value the bar stands for.
	pub value: f64,
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Rectangle width.
	pub width: f64,
	/// Rectangle height.
	pub height: f64,
}

/// Fraction of each slot left empty between bars.
const BAR_GAP: f64 = 0.2;

/// Value range widened to include zero, so bars grow from a zero baseline.
fn value_range(points: &[DataPoint]) -> (f64, f64) {
	let lo = points.iter().map(|p| p.value).fold(0.0, f64::min);
	let hi = points.iter().map(|p| p.value).fold(0.0, f64::max);
	if hi - lo > 0.0 { (lo, hi) } else { (0.0, 1.0) }
}

/// Bars in a frame, vertical by default or horizontal.
///
/// Lengths are proportional to value over the range spanned by the data and
/// zero; negative values extend below (or left of) the zero baseline.
pub fn bar_layout(points: &[DataPoint], frame: &ChartFrame, horizontal: bool) -> Vec<Bar> {
	if points.is_empty() {
		return Vec::new();
	}
	let (left, top, width, height) = frame.plot_area();
	let (lo, hi) = value_range(points);
	let along = if horizontal { height } else { width };
	let across = if horizontal { width } else { height };
	let slot = along / points.len() as f64;
	let thickness = slot * (1.0 - BAR_GAP);
	let scale = across / (hi - lo);

	points
		.iter()
		.enumerate()
		.map(|(i, p)| {
			let offset = i as f64 * slot + slot * BAR_GAP / 2.0;
			let length = p.value.abs() * scale;
			let (x, y, w, h) = if horizontal {
				let zero_x = left + (-lo) * scale;
				let x = if p.value >= 0.0 { zero_x } else { zero_x - length };
				(x, top + offset, length, thickness)
			} else {
				let zero_y = top + hi * scale;
				let y = if p.value >= 0.0 { zero_y - length } else { zero_y };
				(left + offset, y, thickness, length)
			};
			Bar {
				label: p.label.clone(),
				value: p.value,
				x,
				y,
				width: w,
				height: h,
			}
		})
		.collect()
}

/// A pie wedge as an SVG path.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
	/// Label of the row.
	pub label: String,
	/// Value of the row.
	pub value: f64,
	/// Share of the total, `0..=1`.
	pub fraction: f64,
	/// Radians, clockwise from 12 o'clock.
	pub start_angle: f64,
	/// Radians, clockwise from 12 o'clock.
	pub end_angle: f64,
	/// SVG `d` attribute.
	pub path: String,
}

/// Wedges for all positive values, clockwise from 12 o'clock.
pub fn pie_slices(points: &[DataPoint], frame: &ChartFrame) -> Vec<PieSlice> {
	let positive: Vec<&DataPoint> = points.iter().filter(|p| p.value > 0.0).collect();
	let total: f64 = positive.iter().map(|p| p.value).sum();
	if positive.is_empty() || total <= 0.0 {
		return Vec::new();
	}

	let (left, top, width, height) = frame.plot_area();
	let (cx, cy) = (left + width / 2.0, top + height / 2.0);
	let r = width.min(height) / 2.0;

	let mut start = 0.0;
	positive
		.into_iter()
		.map(|p| {
			let fraction = p.value / total;
			let end = start + fraction * TAU;
			let path = if fraction >= 1.0 - 1e-9 {
				circle_path(cx, cy, r)
			} else {
				wedge_path(cx, cy, r, start, end)
			};
			let slice = PieSlice {
				label: p.label.clone(),
				value: p.value,
				fraction,
				start_angle: start,
				end_angle: end,
				path,
			};
			start = end;
			slice
		})
		.collect()
}

/// Point on the circle at `angle` radians clockwise from 12 o'clock.
fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
	(cx + r * angle.sin(), cy - r * angle.cos())
}

fn wedge_path(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> String {
	let (x1, y1) = polar(cx, cy, r, start);
	let (x2, y2) = polar(cx, cy, r, end);
	let large_arc = u8::from(end - start > PI);
	format!(
		"M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
	)
}

/// A full disc; a single arc cannot start and end at the same point.
fn circle_path(cx: f64, cy: f64, r: f64) -> String {
	format!(
		"M {cx:.2} {top:.2} A {r:.2} {r:.2} 0 1 1 {cx:.2} {bottom:.2} A {r:.2} {r:.2} 0 1 1 {cx:.2} {top:.2} Z",
		top = cy - r,
		bottom = cy + r,
	)
}

/// Evenly spaced line vertices, values scaled to the data's own min..max.
pub fn line_points(points: &[DataPoint], frame: &ChartFrame) -> Vec<(f64, f64)> {
	if points.is_empty() {
		return Vec::new();
	}
	let (left, top, width, height) = frame.plot_area();
	let lo = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
	let hi = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
	let span = if hi - lo > 0.0 { hi - lo } else { 1.0 };
	let step = if points.len() > 1 {
		width / (points.len() - 1) as f64
	} else {
		0.0
	};

	points
		.iter()
		.enumerate()
		.map(|(i, p)| {
			let x = if points.len() > 1 {
				left + i as f64 * step
			} else {
				left + width / 2.0
			};
			let y = top + height - (p.value - lo) / span * height;
			(x, y)
		})
		.collect()
}

/// SVG `points` attribute for a polyline.
pub fn polyline(vertices: &[(f64, f64)]) -> String {
	let mut out = String::new();
	for (i, (x, y)) in vertices.iter().enumerate() {
		if i > 0 {
			out.push(' ');
		}
		let _ = write!(out, "{x:.2},{y:.2}");
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn points(values: &[f64]) -> Vec<DataPoint> {
		values
			.iter()
			.enumerate()
			.map(|(i, v)| DataPoint {
				label: format!("p{i}"),
				value: *v,
			})
			.collect()
	}

	fn frame() -> ChartFrame {
		ChartFrame {
			width: 240.0,
			height: 140.0,
			padding: 20.0,
		}
	}

	#[test]
	fn chart_kind_parses_leniently() {
		assert_eq!(ChartKind::from("Pie"), ChartKind::Pie);
		assert_eq!(ChartKind::from(" line "), ChartKind::Line);
		assert_eq!(ChartKind::from("horizontal_bar"), ChartKind::HorizontalBar);
		assert_eq!(ChartKind::from("scatter"), ChartKind::Bar);
	}

	#[test]
	fn vertical_bars_scale_to_largest_value() {
		// Plot area: 200 x 100 at (20, 20).
		let bars = bar_layout(&points(&[50.0, 100.0]), &frame(), false);
		assert_eq!(bars.len(), 2);

		assert_eq!(bars[0].x, 30.0);
		assert_eq!(bars[0].width, 80.0);
		assert_eq!(bars[0].height, 50.0);
		assert_eq!(bars[0].y, 70.0);

		assert_eq!(bars[1].x, 130.0);
		assert_eq!(bars[1].height, 100.0);
		assert_eq!(bars[1].y, 20.0);
	}

	#[test]
	fn negative_bars_hang_below_zero() {
		let bars = bar_layout(&points(&[30.0, -10.0]), &frame(), false);
		// Range -10..30 over 100 units: zero baseline at y = 20 + 75.
		assert_eq!(bars[0].y + bars[0].height, 95.0);
		assert_eq!(bars[1].y, 95.0);
		assert_eq!(bars[1].height, 25.0);
	}

	#[test]
	fn horizontal_bars_grow_rightward() {
		let bars = bar_layout(&points(&[25.0, 100.0]), &frame(), true);
		assert_eq!(bars[0].x, 20.0);
		assert_eq!(bars[0].width, 50.0);
		assert_eq!(bars[1].width, 200.0);
		assert_eq!(bars[0].y, 25.0);
		assert_eq!(bars[0].height, 40.0);
	}

	#[test]
	fn all_zero_bars_are_flat() {
		let bars = bar_layout(&points(&[0.0, 0.0]), &frame(), false);
		assert!(bars.iter().all(|b| b.height == 0.0));
	}

	#[test]
	fn pie_angles_follow_shares() {
		let slices = pie_slices(&points(&[1.0, 3.0, -2.0, 0.0]), &frame());
		assert_eq!(slices.len(), 2);
		assert_eq!(slices[0].fraction, 0.25);
		assert_eq!(slices[0].start_angle, 0.0);
		assert!((slices[0].end_angle - PI / 2.0).abs() < 1e-12);
		assert!((slices[1].end_angle - TAU).abs() < 1e-12);
		// Only the 270° wedge needs the large-arc flag.
		assert!(slices[0].path.contains(" 0 0 1 "));
		assert!(slices[1].path.contains(" 0 1 1 "));
	}

	#[test]
	fn pie_wedge_starts_at_twelve_o_clock() {
		// Center (120, 70), radius 50.
		let slices = pie_slices(&points(&[1.0, 1.0]), &frame());
		assert!(slices[0].path.starts_with("M 120.00 70.00 L 120.00 20.00 A 50.00 50.00"));
		assert!(slices[0].path.ends_with("120.00 120.00 Z"));
	}

	#[test]
	fn single_slice_is_a_full_circle() {
		let slices = pie_slices(&points(&[7.0]), &frame());
		assert_eq!(slices.len(), 1);
		assert_eq!(
			slices[0].path,
			"M 120.00 20.00 A 50.00 50.00 0 1 1 120.00 120.00 A 50.00 50.00 0 1 1 120.00 20.00 Z"
		);
	}

	#[test]
	fn pie_without_positive_values_is_empty() {
		assert!(pie_slices(&points(&[0.0, -1.0]), &frame()).is_empty());
	}

	#[test]
	fn line_spans_plot_width_and_height() {
		let vertices = line_points(&points(&[10.0, 30.0, 20.0]), &frame());
		assert_eq!(vertices, vec![(20.0, 120.0), (120.0, 20.0), (220.0, 70.0)]);
		assert_eq!(polyline(&vertices), "20.00,120.00 120.00,20.00 220.00,70.00");
	}

	#[test]
	fn single_point_line_is_centered() {
		let vertices = line_points(&points(&[5.0]), &frame());
		assert_eq!(vertices, vec![(120.0, 120.0)]);
	}

	#[test]
	fn null_values_are_skipped() {
		use super::super::table::{Cell, ChartColumns, ResultTable};
		let table = ResultTable {
			columns: vec!["name".into(), "n".into()],
			rows: vec![
				vec![Cell::Text("a".into()), Cell::Number(1.0)],
				vec![Cell::Text("b".into()), Cell::Null],
				vec![Cell::Null, Cell::Number(2.0)],
			],
		};
		let pts = data_points(&table, ChartColumns { label: 0, value: 1 });
		assert_eq!(pts.len(), 2);
		assert_eq!(pts[1].label, "NULL");
	}
}
