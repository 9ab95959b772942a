//! Canvas rendering for the animated backgrounds.
//!
//! Each frame is painted in passes:
//! 1. Low-alpha trail fill instead of a clear (short ghosting)
//! 2. Cached backdrop buffer, if the style has one
//! 3. Entities, then entity links on top

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::beam::Beam;
use super::field::Entity;
use super::particle::{Particle, link_alpha};
use super::simulation::Simulation;
use super::surface::{Bounds, CanvasSurface, Point};
use super::theme::{BackdropStyle, BackgroundStyle};

/// Draws one entity kind onto a context in logical coordinates.
pub trait Paint: Entity {
	/// Draw this entity.
	fn paint(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue>;

	/// Optional pass over the whole population, drawn after every entity.
	fn paint_links(
		_entities: &[Self],
		_ctx: &CanvasRenderingContext2d,
		_pointer: Option<Point>,
	) -> Result<(), JsValue> {
		Ok(())
	}
}

/// Renders the current simulation state to the surface.
pub fn render<E: Paint>(
	sim: &Simulation<E>,
	surface: &CanvasSurface,
	style: &BackgroundStyle,
) -> Result<(), JsValue> {
	let ctx = surface.context();
	let bounds = sim.metrics().bounds();

	ctx.set_fill_style_str(&style.trail.to_css());
	ctx.fill_rect(0.0, 0.0, bounds.width, bounds.height);

	if let (Some(buffer), Some(backdrop)) = (surface.backdrop(), style.backdrop.as_ref()) {
		ctx.set_global_alpha(backdrop.opacity.clamp(0.0, 1.0));
		ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
			buffer,
			0.0,
			0.0,
			bounds.width,
			bounds.height,
		)?;
		ctx.set_global_alpha(1.0);
	}

	for entity in sim.entities() {
		entity.paint(ctx)?;
	}
	E::paint_links(sim.entities(), ctx, sim.pointer())
}

/// Paints the static radial backdrop. Called once per surface configure,
/// into the offscreen buffer.
pub fn paint_backdrop(
	ctx: &CanvasRenderingContext2d,
	bounds: Bounds,
	style: &BackdropStyle,
) -> Result<(), JsValue> {
	let (cx, cy) = (bounds.width / 2.0, bounds.height / 2.0);
	let radius = bounds.width.max(bounds.height) * style.radius_scale;
	let gradient = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, radius.max(1.0))?;
	for (offset, color) in &style.stops {
		gradient.add_color_stop(offset.clamp(0.0, 1.0) as f32, &color.to_css())?;
	}

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, bounds.width, bounds.height);
	Ok(())
}

impl Paint for Particle {
	fn paint(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
		let (x, y, r) = (self.x, self.y, self.radius);
		let alpha = self.glow_alpha();

		let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
		gradient.add_color_stop(0.0, &self.color.with_alpha(alpha).to_css())?;
		gradient.add_color_stop(0.4, &self.color.with_alpha(alpha * 0.5).to_css())?;
		gradient.add_color_stop(1.0, &self.color.with_alpha(0.0).to_css())?;

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
		Ok(())
	}

	fn paint_links(
		entities: &[Self],
		ctx: &CanvasRenderingContext2d,
		pointer: Option<Point>,
	) -> Result<(), JsValue> {
		if pointer.is_none() {
			return Ok(());
		}
		ctx.set_line_width(1.0);
		for (i, a) in entities.iter().enumerate() {
			for b in &entities[i + 1..] {
				let Some(alpha) = link_alpha(a, b, pointer) else {
					continue;
				};
				let gradient = ctx.create_linear_gradient(a.x, a.y, b.x, b.y);
				gradient.add_color_stop(0.0, &a.color.with_alpha(alpha).to_css())?;
				gradient.add_color_stop(0.5, &a.color.with_alpha(alpha * 1.5).to_css())?;
				gradient.add_color_stop(1.0, &b.color.with_alpha(alpha).to_css())?;

				#[allow(deprecated)]
				ctx.set_stroke_style(&gradient);
				stroke_segment(ctx, a.position(), b.position());
			}
		}
		Ok(())
	}
}

impl Paint for Beam {
	fn paint(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
		let (start, end) = (self.position(), self.end());
		let opacity = self.opacity;

		let gradient = ctx.create_linear_gradient(start.x, start.y, end.x, end.y);
		gradient.add_color_stop(0.0, &self.color.with_alpha(0.0).to_css())?;
		gradient.add_color_stop(0.3, &self.color.with_alpha(opacity).to_css())?;
		gradient.add_color_stop(0.7, &self.color.with_alpha(opacity * 0.8).to_css())?;
		gradient.add_color_stop(1.0, &self.color.with_alpha(0.0).to_css())?;

		ctx.set_line_cap("round");

		// Main beam
		#[allow(deprecated)]
		ctx.set_stroke_style(&gradient);
		ctx.set_line_width(self.width);
		stroke_segment(ctx, start, end);

		// Glow
		ctx.set_stroke_style_str(&self.color.with_alpha(opacity * 0.3).to_css());
		ctx.set_line_width(self.width * 4.0);
		stroke_segment(ctx, start, end);

		// Bright core
		ctx.set_stroke_style_str(&self.color.with_alpha(opacity * 1.5).to_css());
		ctx.set_line_width(self.width * 0.5);
		stroke_segment(ctx, start, end);
		Ok(())
	}
}

fn stroke_segment(ctx: &CanvasRenderingContext2d, from: Point, to: Point) {
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(to.x, to.y);
	ctx.stroke();
}
