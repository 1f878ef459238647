//! Schema lineage graph.
//!
//! Renders tables of one or more data sources as boxes on a canvas, with
//! foreign-key relationships drawn as orthogonal connectors:
//! - Force-directed placement (repulsion, springs, damping) in [`layout`]
//! - Side selection and single-bend routing for connectors in [`ports`]
//! - Debounced, last-write-wins layout runs with a "calculating" state
//! - Pan, zoom and neighbor highlighting on hover
//!
//! # Example
//!
//! ```ignore
//! use lineage_graph::{GraphData, LineageDocument, SchemaGraphCanvas};
//!
//! let doc: LineageDocument = serde_json::from_str(json)?;
//! let data = doc.into_graph();
//!
//! view! { <SchemaGraphCanvas data=Signal::derive(move || data.clone()) fullscreen=true /> }
//! ```

mod component;
/// Page-level tuning: layout, sizing, node cap, debounce.
pub mod config;
/// Force-directed placement of tables.
pub mod layout;
/// Connector sides and routing.
pub mod ports;
mod render;
/// Zoom-dependent sizes.
pub mod scale;
/// Layout scheduling, view transform and hover.
pub mod state;
/// Colors.
pub mod theme;
mod types;

pub use component::SchemaGraphCanvas;
pub use config::GraphConfig;
pub use layout::{LayoutConfig, Position, PositionMap, compute_layout};
pub use ports::{NodeBox, Ports, Side, route_connector, select_ports};
pub use state::{GraphSignature, LayoutScheduler, LayoutStatus, LayoutTicket};
pub use theme::Theme;
pub use types::{
	GraphData, GraphEdge, GraphNode, LineageDocument, LineagePayload, LineageRelation,
	LineageTable, NodeKey,
};
