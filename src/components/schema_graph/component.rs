//! Leptos component wrapping the schema graph canvas.
//!
//! The component creates an HTML canvas and re-renders it on demand: when a
//! layout finishes, on hover, pan, zoom and window resize. Layout runs are
//! debounced through a cancellable timeout so bursts of data changes only lay
//! out the latest graph. Until that run finishes the canvas shows a neutral
//! "calculating" state.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::leptos_dom::helpers::{TimeoutHandle, set_timeout_with_handle};
use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::{GraphConfig, cap_nodes};
use super::layout::{LayoutConfig, compute_layout};
use super::render;
use super::state::{LayoutTicket, SchemaGraphState};
use super::theme::Theme;
use super::types::GraphData;

/// Bundles graph state with the drawing surface and theme.
struct GraphContext {
	state: SchemaGraphState,
	theme: Theme,
	ctx: CanvasRenderingContext2d,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Renders the schema graph of one or more data sources on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing.
#[component]
pub fn SchemaGraphCanvas(
	/// Tables and relationships to show.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Layout and sizing overrides.
	#[prop(optional)]
	config: GraphConfig,
	/// Fill the window and follow its size.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed canvas width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed canvas height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let pending: Rc<RefCell<Option<TimeoutHandle>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let config = config.sanitized();
	let (context_init, pending_init, resize_cb_init) =
		(context.clone(), pending.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if context_init.borrow().is_none() {
			let Some(window) = web_sys::window() else {
				warn!("lineage-graph: no window, schema graph disabled");
				return;
			};
			let (w, h) = viewport_size(&window, &canvas, fullscreen, width, height);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);

			let ctx = match drawing_context(&canvas) {
				Ok(ctx) => ctx,
				Err(err) => {
					warn!("lineage-graph: canvas 2d context unavailable: {err:?}");
					return;
				}
			};
			*context_init.borrow_mut() = Some(GraphContext {
				state: SchemaGraphState::new(config.scale.clone(), w, h),
				theme: Theme::default(),
				ctx,
			});

			if fullscreen {
				let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
				*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
					let Some(win) = web_sys::window() else {
						return;
					};
					let (nw, nh) = viewport_size(&win, &canvas_resize, true, None, None);
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					if let Some(ref mut c) = *context_resize.borrow_mut() {
						c.state.resize(nw, nh);
						render::render(&c.state, &c.ctx, &c.theme);
					}
				}));
				if let Some(ref cb) = *resize_cb_init.borrow() {
					let _ =
						window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		}

		schedule_layout(
			&context_init,
			&pending_init,
			cap_nodes(graph, config.max_nodes),
			&config,
		);
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pan.active = true;
			c.state.pan.start_x = x;
			c.state.pan.start_y = y;
			c.state.pan.transform_start_x = c.state.transform.x;
			c.state.pan.transform_start_y = c.state.transform.y;
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			} else {
				let hovered = c.state.node_at_position(x, y);
				c.state.set_hover(hovered);
			}
			render::render(&c.state, &c.ctx, &c.theme);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.pan.active = false;
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pan.active = false;
			c.state.set_hover(None);
			render::render(&c.state, &c.ctx, &c.theme);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.transform.zoom_at(x, y, factor);
			render::render(&c.state, &c.ctx, &c.theme);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="schema-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

/// Hand `data` to the state and, if it changed, lay it out after the debounce.
fn schedule_layout(
	context: &SharedContext,
	pending: &Rc<RefCell<Option<TimeoutHandle>>>,
	data: GraphData,
	config: &GraphConfig,
) {
	let ticket = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		let ticket = c.state.set_data(data);
		render::render(&c.state, &c.ctx, &c.theme);
		let Some(ticket) = ticket else {
			return;
		};
		ticket
	};

	if let Some(handle) = pending.borrow_mut().take() {
		handle.clear();
	}

	let (context_run, layout) = (context.clone(), config.layout.clone());
	match set_timeout_with_handle(
		move || run_layout(&context_run, ticket, &layout),
		Duration::from_millis(config.debounce_ms),
	) {
		Ok(handle) => *pending.borrow_mut() = Some(handle),
		Err(err) => warn!("lineage-graph: failed to schedule layout: {err:?}"),
	}
}

fn run_layout(context: &SharedContext, ticket: LayoutTicket, layout: &LayoutConfig) {
	let mut guard = context.borrow_mut();
	let Some(c) = guard.as_mut() else {
		return;
	};
	if !c.state.scheduler.is_current(&ticket) {
		debug!("lineage-graph: dropping superseded layout run");
		return;
	}

	let started = now_ms();
	let positions = compute_layout(&c.state.data.nodes, &c.state.data.edges, layout);
	let placed = positions.len();
	if c.state.complete(ticket, positions) {
		info!(
			"lineage-graph: laid out {} tables, {} relationships in {:.1} ms",
			placed,
			c.state.data.edges.len(),
			now_ms() - started
		);
		render::render(&c.state, &c.ctx, &c.theme);
	}
}

fn drawing_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
	canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("no 2d context"))?
		.dyn_into()
		.map_err(JsValue::from)
}

fn viewport_size(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		return (
			dim(window.inner_width(), 800.0),
			dim(window.inner_height(), 600.0),
		);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

/// Client coordinates relative to the canvas' top-left corner.
fn canvas_point(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	client_x: i32,
	client_y: i32,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((client_x as f64 - rect.left(), client_y as f64 - rect.top()))
}

fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}
