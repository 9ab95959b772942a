//! Drawing surface management.
//!
//! [`SurfaceMetrics`] is the host-independent description of the surface: the
//! logical (CSS) size entities live in and the device pixel ratio used for the
//! backing buffer. [`CanvasSurface`] applies those metrics to a real canvas and
//! keeps the cached backdrop buffer in sync with them.
//!
//! The backing buffer is always `logical * dpr` with `dpr` capped, and the
//! context carries a uniform `dpr` transform so every draw call works in
//! logical pixels.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::SurfaceError;
use super::render;
use super::theme::BackdropStyle;

/// Logical extent of the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	/// Logical width.
	pub width: f64,
	/// Logical height.
	pub height: f64,
}

impl Bounds {
	/// Whether `p` lies inside, edges included.
	pub fn contains(&self, p: Point) -> bool {
		(0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
	}
}

/// A position in logical surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Logical x.
	pub x: f64,
	/// Logical y.
	pub y: f64,
}

impl Point {
	/// A point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance_to(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Logical size plus pixel density of a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMetrics {
	/// Logical (CSS) width.
	pub width: f64,
	/// Logical (CSS) height.
	pub height: f64,
	/// Device pixel ratio after capping.
	pub dpr: f64,
}

impl Default for SurfaceMetrics {
	fn default() -> Self {
		Self {
			width: 0.0,
			height: 0.0,
			dpr: 1.0,
		}
	}
}

impl SurfaceMetrics {
	/// Metrics for a viewport. Negative or non-finite sizes collapse to zero and
	/// an unusable device pixel ratio falls back to 1.
	pub fn new(width: f64, height: f64, device_pixel_ratio: f64, max_ratio: f64) -> Self {
		let extent = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
		let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
			device_pixel_ratio.min(max_ratio.max(1.0))
		} else {
			1.0
		};
		Self {
			width: extent(width),
			height: extent(height),
			dpr,
		}
	}

	/// Size of the pixel buffer backing the surface.
	pub fn backing_size(&self) -> (u32, u32) {
		(
			(self.width * self.dpr).round() as u32,
			(self.height * self.dpr).round() as u32,
		)
	}

	/// Logical extent.
	pub fn bounds(&self) -> Bounds {
		Bounds {
			width: self.width,
			height: self.height,
		}
	}
}

/// A canvas configured for DPR-aware drawing, plus its cached backdrop.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	metrics: SurfaceMetrics,
	backdrop: Option<HtmlCanvasElement>,
}

impl CanvasSurface {
	/// Bind to a canvas. Fails when the host cannot provide a 2D context.
	pub fn attach(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
		let ctx = context_2d(&canvas)?;
		Ok(Self {
			canvas,
			ctx,
			metrics: SurfaceMetrics::default(),
			backdrop: None,
		})
	}

	/// Resize the backing buffer and CSS box, reset the transform to the new
	/// ratio and regenerate the cached backdrop.
	pub fn configure(
		&mut self,
		metrics: SurfaceMetrics,
		backdrop: Option<&BackdropStyle>,
	) -> Result<(), SurfaceError> {
		let (backing_w, backing_h) = metrics.backing_size();
		self.canvas.set_width(backing_w);
		self.canvas.set_height(backing_h);

		let style = self.canvas.style();
		style.set_property("width", &format!("{}px", metrics.width))?;
		style.set_property("height", &format!("{}px", metrics.height))?;

		// Resizing the canvas resets the context state; set rather than
		// multiply so repeated configures never compound the scale.
		self.ctx
			.set_transform(metrics.dpr, 0.0, 0.0, metrics.dpr, 0.0, 0.0)?;
		self.metrics = metrics;

		self.backdrop = None;
		if let Some(style) = backdrop {
			self.backdrop = Some(self.build_backdrop(style)?);
		}
		Ok(())
	}

	fn build_backdrop(&self, style: &BackdropStyle) -> Result<HtmlCanvasElement, SurfaceError> {
		let document = self
			.canvas
			.owner_document()
			.ok_or(SurfaceError::NoDocument)?;
		let buffer: HtmlCanvasElement = document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| SurfaceError::ContextUnavailable)?;
		let (backing_w, backing_h) = self.metrics.backing_size();
		buffer.set_width(backing_w);
		buffer.set_height(backing_h);

		let ctx = context_2d(&buffer)?;
		ctx.set_transform(self.metrics.dpr, 0.0, 0.0, self.metrics.dpr, 0.0, 0.0)?;
		render::paint_backdrop(&ctx, self.metrics.bounds(), style)?;
		Ok(buffer)
	}

	/// Context with the dpr transform applied.
	pub fn context(&self) -> &CanvasRenderingContext2d {
		&self.ctx
	}

	/// Metrics of the last configure.
	pub fn metrics(&self) -> SurfaceMetrics {
		self.metrics
	}

	/// Cached backdrop buffer, if the style has one.
	pub fn backdrop(&self) -> Option<&HtmlCanvasElement> {
		self.backdrop.as_ref()
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
	canvas
		.get_context("2d")?
		.ok_or(SurfaceError::ContextUnavailable)?
		.dyn_into()
		.map_err(|_| SurfaceError::ContextUnavailable)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backing_buffer_scales_by_capped_ratio() {
		let m = SurfaceMetrics::new(1280.0, 720.0, 3.0, 2.0);
		assert_eq!(m.dpr, 2.0);
		assert_eq!(m.backing_size(), (2560, 1440));
		assert_eq!(
			m.bounds(),
			Bounds {
				width: 1280.0,
				height: 720.0
			}
		);
	}

	#[test]
	fn fractional_ratio_is_kept() {
		let m = SurfaceMetrics::new(1000.0, 500.0, 1.5, 2.0);
		assert_eq!(m.backing_size(), (1500, 750));
	}

	#[test]
	fn unusable_ratio_falls_back_to_one() {
		for ratio in [0.0, -2.0, f64::NAN, f64::INFINITY] {
			assert_eq!(SurfaceMetrics::new(10.0, 10.0, ratio, 2.0).dpr, 1.0);
		}
	}

	#[test]
	fn degenerate_sizes_collapse_to_zero() {
		let m = SurfaceMetrics::new(-5.0, f64::NAN, 1.0, 2.0);
		assert_eq!(m.backing_size(), (0, 0));
	}

	#[test]
	fn point_distance() {
		assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
	}
}
