//! Sizing of table boxes and zoom-dependent scaling of connector visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: layout coordinates. Table boxes are sized here, so they
//!   grow and shrink with zoom like the rest of the graph.
//! - **Screen-space**: canvas pixels. Line widths are specified here and
//!   divided by the zoom factor `k` before drawing.
//!
//! Label fonts sit in between: at or below 100% zoom they are world units and
//! shrink with the boxes they label; zoomed in, they keep their pixel size.

use serde::Deserialize;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size in pixels.
		min_screen: f64,
		/// Largest on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value for a base value at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Opacity that fades in between two zoom levels.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FadeBehavior {
	/// Fully transparent at or below this zoom.
	pub zero_alpha_k: f64,
	/// Fully opaque at or above this zoom.
	pub full_alpha_k: f64,
}

impl FadeBehavior {
	/// Opacity at zoom `k`.
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

/// Table box dimensions, in world units.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableScaleConfig {
	/// Narrowest box, used for short labels.
	pub min_width: f64,
	/// Approximate advance per label character.
	pub char_width: f64,
	/// Horizontal text inset on each side.
	pub text_inset: f64,
	/// Box height.
	pub height: f64,
	/// Rounding of box corners.
	pub corner_radius: f64,
	/// Label font size at 100% zoom. Never grows on screen when zoomed in.
	pub label_size: f64,
	/// Row-count font size at 100% zoom. Never grows on screen when zoomed in.
	pub detail_size: f64,
	/// Text fades out when zoomed below this range.
	pub text_fade: FadeBehavior,
}

impl Default for TableScaleConfig {
	fn default() -> Self {
		Self {
			min_width: 140.0,
			char_width: 7.5,
			text_inset: 12.0,
			height: 52.0,
			corner_radius: 6.0,
			label_size: 13.0,
			detail_size: 11.0,
			text_fade: FadeBehavior {
				zero_alpha_k: 0.25,
				full_alpha_k: 0.5,
			},
		}
	}
}

impl TableScaleConfig {
	/// Box width that fits `label`.
	pub fn box_width(&self, label: &str) -> f64 {
		let text = label.chars().count() as f64 * self.char_width + 2.0 * self.text_inset;
		text.max(self.min_width)
	}
}

/// Connector line styling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectorScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Dash pattern (dash, gap) for inferred relationships, in world units.
	pub inferred_dash: (f64, f64),
	/// Arrow head size in world units.
	pub arrow_size: f64,
	/// How the arrow head follows zoom.
	pub arrow_behavior: ScaleBehavior,
}

impl Default for ConnectorScaleConfig {
	fn default() -> Self {
		Self {
			line_width: 1.5,
			inferred_dash: (6.0, 4.0),
			arrow_size: 7.0,
			arrow_behavior: ScaleBehavior::Clamped {
				min_screen: 3.0,
				max_screen: 14.0,
			},
		}
	}
}

/// Complete scale configuration for the schema graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
	/// Table boxes and their text.
	pub table: TableScaleConfig,
	/// Connector lines and arrow heads.
	pub connector: ConnectorScaleConfig,
}

/// Pre-computed values for one zoom level. Build once per frame.
///
/// Everything except `k` and `text_alpha` is in world units, ready to draw
/// under the view transform.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom factor these values were computed for.
	pub k: f64,
	/// CSS font for table names.
	pub label_font: String,
	/// CSS font for row counts.
	pub detail_font: String,
	/// Text opacity, `0.0` hides labels entirely.
	pub text_alpha: f64,
	/// Connector stroke width.
	pub line_width: f64,
	/// Arrow head length.
	pub arrow_size: f64,
	/// Table outline width.
	pub border_width: f64,
	/// Table corner radius.
	pub corner_radius: f64,
}

impl ScaledValues {
	/// Scale `config` for zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let table = &config.table;
		let connector = &config.connector;
		Self {
			k,
			label_font: format!("600 {}px sans-serif", table.label_size / k.max(1.0)),
			detail_font: format!("{}px sans-serif", table.detail_size / k.max(1.0)),
			text_alpha: table.text_fade.apply(k),
			line_width: ScaleBehavior::Screen.apply(connector.line_width, k),
			arrow_size: connector.arrow_behavior.apply(connector.arrow_size, k),
			border_width: ScaleBehavior::Screen.apply(1.0, k),
			corner_radius: table.corner_radius,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_behavior_cancels_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(2.0, 4.0), 0.5);
	}

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let b = ScaleBehavior::Clamped {
			min_screen: 3.0,
			max_screen: 14.0,
		};
		// 7 world units at k=4 would be 28px on screen: capped to 14px.
		assert_eq!(b.apply(7.0, 4.0), 3.5);
		// At k=0.25 it would be 1.75px: raised to 3px.
		assert_eq!(b.apply(7.0, 0.25), 12.0);
		assert_eq!(b.apply(7.0, 1.0), 7.0);
	}

	#[test]
	fn fade_ramps_between_thresholds() {
		let fade = TableScaleConfig::default().text_fade;
		assert_eq!(fade.apply(0.1), 0.0);
		assert_eq!(fade.apply(0.375), 0.5);
		assert_eq!(fade.apply(2.0), 1.0);
	}

	#[test]
	fn fonts_follow_boxes_until_zoomed_in() {
		let config = ScaleConfig::default();
		// Zoomed out: world units, so the label shrinks with its box.
		assert_eq!(ScaledValues::new(&config, 0.5).label_font, "600 13px sans-serif");
		assert_eq!(ScaledValues::new(&config, 1.0).detail_font, "11px sans-serif");
		// Zoomed in: 6.5 world units at k=2 stay 13px on screen.
		assert_eq!(ScaledValues::new(&config, 2.0).label_font, "600 6.5px sans-serif");
	}

	#[test]
	fn box_width_fits_long_labels() {
		let table = TableScaleConfig::default();
		assert_eq!(table.box_width("orders"), table.min_width);
		let long = "customer_address_history_archive";
		assert_eq!(
			table.box_width(long),
			long.len() as f64 * table.char_width + 2.0 * table.text_inset
		);
	}
}
