//! Visual theming for the animated backgrounds.
//!
//! Provides the colour type, entity palettes, and the per-background style
//! (container colour, trail fill, cached backdrop gradient).

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Opacity in `[0, 1]`. Defaults to opaque.
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour with a replaced alpha, clamped to `[0, 1]`.
	/// Non-finite alphas collapse to fully transparent.
	pub fn with_alpha(self, a: f64) -> Self {
		let a = if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 };
		Self { a, ..self }
	}

	/// CSS colour string: hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Blue-purple-cyan palette used by the glow particles.
pub fn nebula_palette() -> Vec<Color> {
	vec![
		Color::rgb(139, 92, 246), // Purple
		Color::rgb(59, 130, 246), // Blue
		Color::rgb(34, 211, 238), // Cyan
		Color::rgb(99, 102, 241), // Indigo
		Color::rgb(168, 85, 247), // Violet
		Color::rgb(6, 182, 212),  // Light blue
	]
}

/// Saturated palette used by the light beams.
/// Alpha is replaced by each beam's pulsing opacity when drawn.
pub fn laser_palette() -> Vec<Color> {
	vec![
		Color::rgba(37, 99, 235, 0.6),   // Blue
		Color::rgba(99, 102, 241, 0.5),  // Indigo
		Color::rgba(168, 85, 247, 0.4),  // Purple
		Color::rgba(236, 72, 153, 0.35), // Pink
		Color::rgba(14, 165, 233, 0.4),  // Cyan
		Color::rgba(34, 197, 94, 0.3),   // Green
		Color::rgba(251, 146, 60, 0.25), // Orange
	]
}

/// Static radial gradient rendered once per surface size into an
/// offscreen buffer and composited every frame.
#[derive(Clone, Debug)]
pub struct BackdropStyle {
	/// Gradient stops as `(offset, color)`, offsets in `[0, 1]`.
	pub stops: Vec<(f64, Color)>,
	/// Outer radius as a fraction of `max(width, height)`.
	pub radius_scale: f64,
	/// Global alpha used when compositing the cached buffer.
	pub opacity: f64,
}

/// Complete look of one background variant.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Name used in log messages.
	pub name: &'static str,
	/// Solid colour of the container behind the canvas.
	pub base: Color,
	/// Low-alpha fill applied instead of a full clear, leaving short trails.
	pub trail: Color,
	/// Cached radial gradient drawn under the entities.
	pub backdrop: Option<BackdropStyle>,
}

impl BackgroundStyle {
	/// Dark theme for the glow particles.
	pub fn nebula() -> Self {
		Self {
			name: "nebula",
			base: Color::rgb(10, 10, 15),
			trail: Color::rgba(10, 10, 15, 0.1),
			backdrop: Some(BackdropStyle {
				stops: vec![
					(0.0, Color::rgba(15, 15, 25, 0.9)),
					(0.5, Color::rgba(10, 10, 20, 0.95)),
					(1.0, Color::rgb(5, 5, 15)),
				],
				radius_scale: 0.5,
				opacity: 0.96,
			}),
		}
	}

	/// Light theme for the beams. No backdrop; trails come from the fill alone.
	pub fn daylight() -> Self {
		Self {
			name: "daylight",
			base: Color::rgb(248, 250, 252),
			trail: Color::rgba(248, 250, 252, 0.15),
			backdrop: None,
		}
	}
}
