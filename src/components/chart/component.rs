//! Leptos components for query results: an inline SVG chart and a table.

use leptos::prelude::*;

use super::geometry::{
	ChartFrame, ChartKind, bar_layout, data_points, line_points, pie_slices, polyline,
};
use super::table::{Cell, PlotResult};
use crate::components::schema_graph::theme::GroupPalette;

fn num(v: f64) -> String {
	format!("{v:.2}")
}

/// Inline chart for a plot result. Renders nothing when no column is numeric.
#[component]
pub fn InlineChart(
	/// Query result to chart.
	plot: PlotResult,
	/// SVG size; defaults to [`ChartFrame::default`].
	#[prop(optional)]
	frame: Option<ChartFrame>,
) -> impl IntoView {
	let frame = frame.unwrap_or_default();
	let table = plot.table();
	let Some(columns) = plot.chart_columns(&table) else {
		return ().into_any();
	};
	let points = data_points(&table, columns);
	let palette = GroupPalette::slate();
	let view_box = format!("0 0 {} {}", frame.width, frame.height);

	let body = match ChartKind::from(plot.chart_type.as_str()) {
		kind @ (ChartKind::Bar | ChartKind::HorizontalBar) => {
			let horizontal = kind == ChartKind::HorizontalBar;
			bar_layout(&points, &frame, horizontal)
				.into_iter()
				.map(|bar| {
					let tip = format!("{}: {}", bar.label, Cell::Number(bar.value).display());
					view! {
						<rect
							x=num(bar.x)
							y=num(bar.y)
							width=num(bar.width)
							height=num(bar.height)
							fill=palette.get(0).to_css()
						>
							<title>{tip}</title>
						</rect>
					}
				})
				.collect_view()
				.into_any()
		}
		ChartKind::Pie => pie_slices(&points, &frame)
			.into_iter()
			.enumerate()
			.map(|(i, slice)| {
				let tip = format!("{}: {:.1}%", slice.label, slice.fraction * 100.0);
				view! {
					<path d=slice.path fill=palette.get(i).to_css() stroke="#16191f">
						<title>{tip}</title>
					</path>
				}
			})
			.collect_view()
			.into_any(),
		ChartKind::Line => {
			let vertices = line_points(&points, &frame);
			let dots = vertices
				.iter()
				.zip(&points)
				.map(|(&(x, y), p)| {
					let tip = format!("{}: {}", p.label, Cell::Number(p.value).display());
					view! {
						<circle cx=num(x) cy=num(y) r="3" fill=palette.get(0).to_css()>
							<title>{tip}</title>
						</circle>
					}
				})
				.collect_view();
			view! {
				<polyline
					points=polyline(&vertices)
					fill="none"
					stroke=palette.get(0).to_css()
					stroke-width="2"
				/>
				{dots}
			}
			.into_any()
		}
	};

	view! {
		<svg
			class="inline-chart"
			viewBox=view_box
			width=frame.width.to_string()
			height=frame.height.to_string()
		>
			{body}
		</svg>
	}
	.into_any()
}

/// Result rows as an HTML table. Nulls get a distinct marker.
#[component]
pub fn ResultTableView(
	/// Query result to list.
	plot: PlotResult,
) -> impl IntoView {
	let table = plot.table();
	let footer = if plot.truncated {
		format!(
			"Showing {} of {} rows · {} ms",
			plot.row_count, plot.total_rows, plot.duration_ms
		)
	} else {
		format!("{} rows · {} ms", plot.row_count, plot.duration_ms)
	};

	let header = table
		.columns
		.iter()
		.map(|c| view! { <th>{c.clone()}</th> })
		.collect_view();
	let rows = table
		.rows
		.into_iter()
		.map(|row| {
			let cells = row
				.into_iter()
				.map(|cell| {
					let class = if cell.is_null() { "null-cell" } else { "" };
					view! { <td class=class>{cell.display()}</td> }
				})
				.collect_view();
			view! { <tr>{cells}</tr> }
		})
		.collect_view();

	view! {
		<div class="result-table">
			<table>
				<thead>
					<tr>{header}</tr>
				</thead>
				<tbody>{rows}</tbody>
			</table>
			<p class="result-footer">{footer}</p>
		</div>
	}
}
