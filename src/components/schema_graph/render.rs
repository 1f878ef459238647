//! Canvas rendering for the schema graph.
//!
//! Rendering passes, back to front:
//! 1. Background (screen space)
//! 2. Connectors, dimmed ones first, highlighted on top (world space)
//! 3. Table boxes with accent strip, label and row count (world space)
//!
//! While a layout is outstanding only a neutral status line is drawn.

use std::f64::consts::PI;

use rustc_hash::FxHashMap;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::Position;
use super::ports::{NodeBox, Side, route_connector, select_ports};
use super::scale::ScaledValues;
use super::state::{LayoutStatus, SchemaGraphState};
use super::theme::{Color, Theme};
use super::types::{GraphNode, NodeKey};

/// Renders the complete graph to the canvas.
pub fn render(state: &SchemaGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	match state.scheduler.status() {
		LayoutStatus::Idle => return,
		LayoutStatus::Calculating => {
			draw_status(state, ctx, theme, "Calculating layout…");
			return;
		}
		LayoutStatus::Ready(positions) if positions.is_empty() => {
			draw_status(state, ctx, theme, "No tables to display");
			return;
		}
		LayoutStatus::Ready(_) => {}
	}

	let scale = ScaledValues::new(&state.scale, state.transform.k);
	let boxes = state.boxes();
	let by_key: FxHashMap<&NodeKey, &NodeBox> = boxes.iter().map(|(k, _, b)| (k, b)).collect();
	let accents = theme
		.palette
		.assign(state.data.nodes.iter().map(|n| n.group_key.as_str()));
	let has_hover = state.hovered().is_some();

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	for highlighted_pass in [false, true] {
		for edge in &state.data.edges {
			let (Some(source), Some(target)) =
				(by_key.get(&edge.source_key), by_key.get(&edge.target_key))
			else {
				continue;
			};
			if edge.source_key == edge.target_key {
				continue;
			}
			let highlighted = state.is_edge_highlighted(&edge.source_key, &edge.target_key);
			if highlighted != highlighted_pass {
				continue;
			}

			let color = if highlighted {
				theme.connector.highlight
			} else if edge.inferred {
				theme.connector.inferred
			} else {
				theme.connector.declared
			};
			let alpha = if has_hover && !highlighted {
				theme.dim_alpha
			} else {
				1.0
			};
			draw_connector(
				ctx,
				&scale,
				state.scale.connector.inferred_dash,
				source,
				target,
				color.with_alpha(alpha),
				edge.inferred,
			);
		}
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for (key, node, node_box) in &boxes {
		let alpha = if has_hover && !state.is_highlighted(key) {
			theme.dim_alpha
		} else {
			1.0
		};
		let accent = accents
			.get(&node.group_key)
			.copied()
			.unwrap_or_else(|| theme.palette.get(0));
		draw_table(ctx, &scale, theme, node, node_box, accent, alpha);
	}

	ctx.restore();
}

fn draw_status(
	state: &SchemaGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	text: &str,
) {
	ctx.set_fill_style_str(&theme.status_text.to_css());
	ctx.set_font("14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, state.width / 2.0, state.height / 2.0);
}

fn draw_connector(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	dash: (f64, f64),
	source: &NodeBox,
	target: &NodeBox,
	color: Color,
	inferred: bool,
) {
	let route = route_connector(source, target);
	let entry = select_ports(source, target).entry;

	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(scale.line_width);
	if inferred {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash.0),
			&JsValue::from_f64(dash.1),
		));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.begin_path();
	ctx.move_to(route[0].x, route[0].y);
	for point in &route[1..] {
		ctx.line_to(point.x, point.y);
	}
	ctx.stroke();

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_fill_style_str(&color.to_css());
	draw_arrow_head(ctx, route[3], entry, scale.arrow_size);
}

/// Arrow head pointing into the box through `side`, tip at `tip`.
fn draw_arrow_head(ctx: &CanvasRenderingContext2d, tip: Position, side: Side, size: f64) {
	// Direction of travel when entering through each side.
	let (ux, uy) = match side {
		Side::Top => (0.0, 1.0),
		Side::Bottom => (0.0, -1.0),
		Side::Left => (1.0, 0.0),
		Side::Right => (-1.0, 0.0),
	};
	let (back_x, back_y) = (tip.x - ux * size, tip.y - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);

	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_table(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	node: &GraphNode,
	node_box: &NodeBox,
	accent: Color,
	alpha: f64,
) {
	let style = &theme.table;
	let left = node_box.center.x - node_box.width / 2.0;
	let top = node_box.center.y - node_box.height / 2.0;
	let radius = scale.corner_radius.min(node_box.height / 2.0);

	ctx.set_global_alpha(alpha);

	rounded_rect_path(ctx, left, top, node_box.width, node_box.height, radius);
	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(scale.border_width);
	ctx.stroke();

	ctx.save();
	rounded_rect_path(ctx, left, top, node_box.width, node_box.height, radius);
	ctx.clip();
	ctx.set_fill_style_str(&accent.to_css());
	ctx.fill_rect(left, top, style.accent_width, node_box.height);
	ctx.restore();

	if scale.text_alpha > 0.0 {
		ctx.set_global_alpha(alpha * scale.text_alpha);
		ctx.set_text_align("left");
		ctx.set_text_baseline("middle");
		let text_x = left + style.accent_width + 8.0;

		ctx.set_fill_style_str(&style.label.to_css());
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(node.display_label(), text_x, top + node_box.height * 0.36);

		if let Some(rows) = node.weight {
			ctx.set_fill_style_str(&style.detail.to_css());
			ctx.set_font(&scale.detail_font);
			let _ = ctx.fill_text(
				&format!("{} rows", format_count(rows)),
				text_x,
				top + node_box.height * 0.72,
			);
		}
	}

	ctx.set_global_alpha(1.0);
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	let _ = ctx.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
	ctx.line_to(x + w, y + h - r);
	let _ = ctx.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
	ctx.line_to(x + r, y + h);
	let _ = ctx.arc(x + r, y + h - r, r, PI / 2.0, PI);
	ctx.line_to(x, y + r);
	let _ = ctx.arc(x + r, y + r, r, PI, PI * 1.5);
	ctx.close_path();
}

/// Formats an integer with thousands separators (`1234567` → `1,234,567`).
pub fn format_count(n: u64) -> String {
	let digits = n.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(ch);
	}
	out
}

#[cfg(test)]
mod tests {
	use super::format_count;

	#[test]
	fn counts_get_thousands_separators() {
		assert_eq!(format_count(0), "0");
		assert_eq!(format_count(999), "999");
		assert_eq!(format_count(1000), "1,000");
		assert_eq!(format_count(1234567), "1,234,567");
	}
}
