//! Light beams: straight streaks that glide across the surface and wrap.

use std::f64::consts::TAU;

use super::config::{Density, DensityConfig, FieldConfig};
use super::field::{Entity, StepContext};
use super::rng::RandomSource;
use super::surface::{Bounds, Point};
use super::theme::{Color, laser_palette};

const LENGTH: (f64, f64) = (100.0, 400.0);
const SPEED: (f64, f64) = (2.0, 8.0);
const WIDTH: (f64, f64) = (1.0, 3.5);
const OPACITY: (f64, f64) = (0.1, 0.5);
const PULSE_SPEED: (f64, f64) = (0.01, 0.03);
/// Chance per target frame that a beam changes heading.
const STEER_CHANCE: f64 = 0.005;
const STEER_MAX: f64 = 0.15;

/// A line segment moving along its own heading at constant speed.
///
/// Beams are ballistic: pointer attraction and damping only apply to
/// particles.
#[derive(Clone, Debug, PartialEq)]
pub struct Beam {
	/// Tail of the beam.
	pub x: f64,
	/// Tail of the beam.
	pub y: f64,
	/// Fixed length.
	pub length: f64,
	/// Heading in radians.
	pub angle: f64,
	/// Distance travelled per target frame.
	pub speed: f64,
	/// Stroke width of the core line.
	pub width: f64,
	/// Opacity before pulsing.
	pub base_opacity: f64,
	/// Current opacity in `[0, 1]`.
	pub opacity: f64,
	/// Current phase of the opacity pulse (radians).
	pub pulse_phase: f64,
	/// Phase advance per target frame.
	pub pulse_speed: f64,
	/// Stroke colour; its alpha is replaced when drawn.
	pub color: Color,
}

impl Beam {
	/// Head of the beam.
	pub fn end(&self) -> Point {
		Point::new(
			self.x + self.angle.cos() * self.length,
			self.y + self.angle.sin() * self.length,
		)
	}

	fn pulsed_opacity(&self) -> f64 {
		let pulse = self.pulse_phase.sin() * 0.5 + 0.5;
		(self.base_opacity * (0.6 + 0.4 * pulse)).clamp(0.0, 1.0)
	}
}

/// Map `v` back into `[0, extent]`, reappearing on the opposite edge.
fn wrap(v: f64, extent: f64) -> f64 {
	if !(extent > 0.0 && v.is_finite()) {
		return 0.0;
	}
	if (0.0..=extent).contains(&v) {
		v
	} else {
		v.rem_euclid(extent)
	}
}

impl Entity for Beam {
	fn default_config() -> FieldConfig {
		FieldConfig {
			density: DensityConfig {
				small_breakpoint: 768.0,
				small: Density {
					cap: 12,
					divisor: 30_000.0,
				},
				large: Density {
					cap: 25,
					divisor: 20_000.0,
				},
			},
			palette: laser_palette(),
			..FieldConfig::default()
		}
	}

	fn spawn(rng: &mut dyn RandomSource, bounds: Bounds, config: &FieldConfig) -> Self {
		let color = config
			.palette
			.get(rng.index(config.palette.len()))
			.copied()
			.unwrap_or(Color::rgb(37, 99, 235));
		let mut beam = Self {
			x: rng.range(0.0, bounds.width),
			y: rng.range(0.0, bounds.height),
			length: rng.range(LENGTH.0, LENGTH.1),
			angle: rng.range(0.0, TAU),
			speed: rng.range(SPEED.0, SPEED.1),
			width: rng.range(WIDTH.0, WIDTH.1),
			base_opacity: rng.range(OPACITY.0, OPACITY.1),
			opacity: 0.0,
			pulse_phase: rng.range(0.0, TAU),
			pulse_speed: rng.range(PULSE_SPEED.0, PULSE_SPEED.1),
			color,
		};
		beam.opacity = beam.pulsed_opacity();
		beam
	}

	fn step(&mut self, ctx: &StepContext<'_>, rng: &mut dyn RandomSource) {
		let f = ctx.factor;

		self.pulse_phase = (self.pulse_phase + self.pulse_speed * f) % TAU;
		self.opacity = self.pulsed_opacity();

		self.x += self.angle.cos() * self.speed * f;
		self.y += self.angle.sin() * self.speed * f;

		if rng.next_f64() < STEER_CHANCE * f {
			self.angle = (self.angle + rng.range(-STEER_MAX, STEER_MAX)).rem_euclid(TAU);
		}

		self.x = wrap(self.x, ctx.bounds.width);
		self.y = wrap(self.y, ctx.bounds.height);
	}

	fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	fn size(&self) -> f64 {
		self.length
	}

	fn size_range(&self) -> (f64, f64) {
		(self.length, self.length)
	}
}
