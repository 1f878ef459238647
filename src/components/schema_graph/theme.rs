//! Visual theming for the schema graph.
//!
//! Each data source gets an accent color from the palette; declared and
//! inferred relationships are drawn in distinct connector colors.

use rustc_hash::FxHashMap;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS color string: hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Accent colors cycled across data sources.
#[derive(Clone, Debug)]
pub struct GroupPalette {
	/// Colors in assignment order.
	pub colors: Vec<Color>,
}

impl GroupPalette {
	/// Muted palette that reads well on the dark background.
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(180, 136, 100), // Tan
				Color::rgb(143, 120, 170), // Muted violet
				Color::rgb(120, 160, 120), // Sage
				Color::rgb(176, 112, 112), // Dusty red
			],
		}
	}

	/// Color for `index`, wrapping around the palette.
	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	/// Assign colors to groups in order of first appearance.
	pub fn assign<'a>(&self, groups: impl IntoIterator<Item = &'a str>) -> FxHashMap<String, Color> {
		let mut assigned: FxHashMap<String, Color> = FxHashMap::default();
		for group in groups {
			if !assigned.contains_key(group) {
				let color = self.get(assigned.len());
				assigned.insert(group.to_string(), color);
			}
		}
		assigned
	}
}

/// Colors of a table box.
#[derive(Clone, Debug)]
pub struct TableStyle {
	/// Box background.
	pub fill: Color,
	/// Box outline.
	pub border: Color,
	/// Table name text.
	pub label: Color,
	/// Row count text.
	pub detail: Color,
	/// Width of the accent strip on the left edge, in world units.
	pub accent_width: f64,
}

/// Connector colors by relationship kind.
#[derive(Clone, Debug)]
pub struct ConnectorStyle {
	/// Declared foreign-key constraints.
	pub declared: Color,
	/// Relationships deduced from column names.
	pub inferred: Color,
	/// Connectors touching the hovered table.
	pub highlight: Color,
}

/// Complete color theme for the schema graph.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: Color,
	/// Accent colors per data source.
	pub palette: GroupPalette,
	/// Table box colors.
	pub table: TableStyle,
	/// Connector colors.
	pub connector: ConnectorStyle,
	/// Opacity of elements outside the hover highlight.
	pub dim_alpha: f64,
	/// "Calculating" and empty-state text.
	pub status_text: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(22, 25, 32),
			palette: GroupPalette::slate(),
			table: TableStyle {
				fill: Color::rgb(36, 41, 52),
				border: Color::rgba(255, 255, 255, 0.12),
				label: Color::rgb(230, 233, 240),
				detail: Color::rgb(150, 158, 172),
				accent_width: 4.0,
			},
			connector: ConnectorStyle {
				declared: Color::rgb(129, 161, 193),
				inferred: Color::rgb(208, 160, 96),
				highlight: Color::rgb(236, 239, 244),
			},
			dim_alpha: 0.3,
			status_text: Color::rgb(150, 158, 172),
		}
	}
}
