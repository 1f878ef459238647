//! lineage-graph: schema lineage graph and inline result charts for a
//! data-dictionary dashboard.
//!
//! This crate provides WASM components that render the foreign-key graph of
//! connected databases with a force-directed layout, plus SVG charts for
//! query results. Data is fetched by the host page and embedded as JSON.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

/// Leptos components: schema graph canvas and query result charts.
pub mod components;
/// Errors for page-data loading and configuration.
pub mod error;

pub use components::chart::{InlineChart, PlotResult, ResultTableView};
pub use components::schema_graph::{
	GraphConfig, GraphData, GraphEdge, GraphNode, LayoutConfig, LineageDocument, NodeKey,
	Position, PositionMap, SchemaGraphCanvas, compute_layout,
};
pub use error::{ConfigError, LoadError};

/// Element holding one lineage payload or an array of them.
pub const LINEAGE_DATA_ID: &str = "lineage-data";
/// Element holding an optional [`GraphConfig`] override.
pub const GRAPH_CONFIG_ID: &str = "graph-config";
/// Element holding an optional plot result.
pub const PLOT_DATA_ID: &str = "plot-data";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("lineage-graph: logging initialized");
}

/// Parse the JSON text of the `<script>` element with the given id.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Result<T, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let element = window
		.document()
		.and_then(|doc| doc.get_element_by_id(id))
		.ok_or_else(|| LoadError::MissingElement { id: id.to_string() })?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| LoadError::NotAScript { id: id.to_string() })?;
	let json_text = script.text().unwrap_or_default();
	serde_json::from_str(&json_text).map_err(|source| LoadError::Parse {
		id: id.to_string(),
		source,
	})
}

fn load_graph_data() -> GraphData {
	match load_script_json::<LineageDocument>(LINEAGE_DATA_ID) {
		Ok(doc) => {
			let data = doc.into_graph();
			info!(
				"lineage-graph: loaded {} tables, {} relationships",
				data.nodes.len(),
				data.edges.len()
			);
			data
		}
		Err(e) => {
			warn!("lineage-graph: no lineage data: {e}");
			GraphData::default()
		}
	}
}

fn load_graph_config() -> GraphConfig {
	match load_script_json::<GraphConfig>(GRAPH_CONFIG_ID) {
		Ok(config) => config,
		Err(LoadError::MissingElement { .. }) => GraphConfig::default(),
		Err(e) => {
			warn!("lineage-graph: ignoring graph config: {e}");
			GraphConfig::default()
		}
	}
}

fn load_plot() -> Option<PlotResult> {
	match load_script_json::<PlotResult>(PLOT_DATA_ID) {
		Ok(plot) => Some(plot),
		Err(LoadError::MissingElement { .. }) => None,
		Err(e) => {
			warn!("lineage-graph: ignoring plot data: {e}");
			None
		}
	}
}

/// Main application component.
/// Loads lineage data from the DOM and renders the schema graph, plus the
/// query result panel when the page embeds one.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_graph_config();
	let plot = load_plot();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Schema Lineage" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<SchemaGraphCanvas data=graph_signal config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Schema Lineage"</h1>
				<p class="subtitle">"Hover a table to trace its relationships. Scroll to zoom. Drag to pan."</p>
			</div>
			{plot.map(|plot| {
				view! {
					<div class="result-panel">
						<InlineChart plot=plot.clone() />
						<ResultTableView plot=plot />
					</div>
				}
			})}
		</div>
	}
}
