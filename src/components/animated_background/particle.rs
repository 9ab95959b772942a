//! Soft glowing particles that drift, breathe and lean towards the pointer.

use std::f64::consts::TAU;

use super::config::FieldConfig;
use super::field::{Entity, StepContext};
use super::rng::RandomSource;
use super::surface::{Bounds, Point};
use super::theme::{Color, nebula_palette};

const MIN_RADIUS: (f64, f64) = (20.0, 50.0);
const MAX_RADIUS: (f64, f64) = (100.0, 250.0);
/// Half-width of the initial per-axis velocity range.
const DRIFT: f64 = 0.15;
const ALPHA: (f64, f64) = (0.05, 0.2);
const PULSE_SPEED: (f64, f64) = (0.005, 0.015);

/// Peak alpha of a link between two overlapping particles.
const LINK_ALPHA: f64 = 0.15;
/// Pointer distance over which link alpha fades by one unit.
const LINK_FALLOFF: f64 = 2000.0;

/// A radial glow with a pulsing radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Centre, logical x.
	pub x: f64,
	/// Centre, logical y.
	pub y: f64,
	/// Velocity per target frame, x.
	pub vx: f64,
	/// Velocity per target frame, y.
	pub vy: f64,
	/// Current glow radius.
	pub radius: f64,
	/// Smallest radius the pulse reaches.
	pub min_radius: f64,
	/// Largest radius the pulse reaches.
	pub max_radius: f64,
	/// Current pulse phase (radians).
	pub pulse_phase: f64,
	/// Phase advance per target frame.
	pub pulse_speed: f64,
	/// Last pulse value in `[0, 1]`.
	pub pulse: f64,
	/// Glow colour.
	pub color: Color,
	/// Base opacity before pulsing.
	pub alpha: f64,
}

impl Particle {
	/// Centre alpha of the glow for the current pulse.
	pub fn glow_alpha(&self) -> f64 {
		(self.alpha * (0.5 + 0.5 * self.pulse)).clamp(0.0, 1.0)
	}

	fn attract(&mut self, pointer: Point, ctx: &StepContext<'_>) {
		let (dx, dy) = (pointer.x - self.x, pointer.y - self.y);
		let distance = dx.hypot(dy);
		let radius = ctx.config.interaction_radius(ctx.bounds);
		// Also rejects NaN distances.
		if !(distance > ctx.config.interaction.epsilon && distance < radius) {
			return;
		}
		let force = (radius - distance) / radius * ctx.config.interaction.strength * ctx.factor;
		self.vx += dx / distance * force;
		self.vy += dy / distance * force;
	}

	fn reflect(&mut self, bounds: Bounds, restitution: f64) {
		if self.x < 0.0 {
			self.x = 0.0;
			self.vx = self.vx.abs() * restitution;
		} else if self.x > bounds.width {
			self.x = bounds.width;
			self.vx = -self.vx.abs() * restitution;
		}
		if self.y < 0.0 {
			self.y = 0.0;
			self.vy = self.vy.abs() * restitution;
		} else if self.y > bounds.height {
			self.y = bounds.height;
			self.vy = -self.vy.abs() * restitution;
		}
	}
}

impl Entity for Particle {
	fn default_config() -> FieldConfig {
		FieldConfig {
			palette: nebula_palette(),
			..FieldConfig::default()
		}
	}

	fn spawn(rng: &mut dyn RandomSource, bounds: Bounds, config: &FieldConfig) -> Self {
		let color = config
			.palette
			.get(rng.index(config.palette.len()))
			.copied()
			.unwrap_or(Color::rgb(255, 255, 255));
		let max_radius = rng.range(MAX_RADIUS.0, MAX_RADIUS.1);
		let min_radius = rng.range(MIN_RADIUS.0, MIN_RADIUS.1);
		let pulse_phase = rng.range(0.0, TAU);

		Self {
			x: rng.range(0.0, bounds.width),
			y: rng.range(0.0, bounds.height),
			vx: rng.range(-DRIFT, DRIFT),
			vy: rng.range(-DRIFT, DRIFT),
			radius: rng.range(min_radius, max_radius),
			min_radius,
			max_radius,
			pulse_phase,
			pulse_speed: rng.range(PULSE_SPEED.0, PULSE_SPEED.1),
			pulse: pulse_phase.sin() * 0.5 + 0.5,
			color,
			alpha: rng.range(ALPHA.0, ALPHA.1),
		}
	}

	fn step(&mut self, ctx: &StepContext<'_>, _rng: &mut dyn RandomSource) {
		let f = ctx.factor;

		// Ease towards the pulse target instead of snapping to it.
		self.pulse_phase = (self.pulse_phase + self.pulse_speed * f) % TAU;
		self.pulse = self.pulse_phase.sin() * 0.5 + 0.5;
		let target = self.min_radius + (self.max_radius - self.min_radius) * self.pulse;
		let smoothing = 1.0 - (1.0 - ctx.config.size_smoothing.clamp(0.0, 1.0)).powf(f);
		self.radius += (target - self.radius) * smoothing;
		self.radius = self.radius.clamp(self.min_radius, self.max_radius);

		self.x += self.vx * f;
		self.y += self.vy * f;

		if let Some(pointer) = ctx.pointer {
			self.attract(pointer, ctx);
		}

		let damping = ctx.config.damping.clamp(0.0, 1.0).powf(f);
		self.vx *= damping;
		self.vy *= damping;

		self.reflect(ctx.bounds, ctx.config.restitution.clamp(0.0, 1.0));
	}

	fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	fn size(&self) -> f64 {
		self.radius
	}

	fn size_range(&self) -> (f64, f64) {
		(self.min_radius, self.max_radius)
	}
}

/// Alpha of the link drawn between two particles, if any.
///
/// Only overlapping glows are linked, and links brighten as the pointer nears
/// their midpoint. Without a pointer nothing is linked.
pub fn link_alpha(a: &Particle, b: &Particle, pointer: Option<Point>) -> Option<f64> {
	let pointer = pointer?;
	if a.position().distance_to(b.position()) >= a.radius + b.radius {
		return None;
	}
	let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
	let alpha = (LINK_ALPHA - pointer.distance_to(mid) / LINK_FALLOFF).max(0.0) * a.alpha.min(b.alpha);
	(alpha > 1e-4).then_some(alpha.min(1.0))
}

#[cfg(test)]
mod tests {
	use super::super::rng::SeededRandom;
	use super::*;

	fn particle_at(x: f64, y: f64) -> Particle {
		Particle {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius: 40.0,
			min_radius: 30.0,
			max_radius: 120.0,
			pulse_phase: 0.0,
			pulse_speed: 0.01,
			pulse: 0.5,
			color: Color::rgb(255, 255, 255),
			alpha: 0.1,
		}
	}

	fn step(p: &mut Particle, factor: f64, bounds: Bounds, pointer: Option<Point>, config: &FieldConfig) {
		let ctx = StepContext {
			factor,
			bounds,
			pointer,
			config,
		};
		p.step(&ctx, &mut SeededRandom::new(1));
	}

	const BOUNDS: Bounds = Bounds {
		width: 1000.0,
		height: 800.0,
	};

	#[test]
	fn pointer_on_top_of_particle_is_harmless() {
		let config = Particle::default_config();
		let mut p = particle_at(300.0, 300.0);
		step(&mut p, 1.0, BOUNDS, Some(Point::new(300.0, 300.0)), &config);
		assert!(p.vx.is_finite() && p.vy.is_finite());
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
	}

	#[test]
	fn pointer_attracts_within_radius() {
		let config = Particle::default_config();
		let mut p = particle_at(300.0, 300.0);
		step(&mut p, 1.0, BOUNDS, Some(Point::new(400.0, 300.0)), &config);
		assert!(p.vx > 0.0);
		assert!(p.vy.abs() < 1e-12);
	}

	#[test]
	fn pointer_outside_radius_is_ignored() {
		let config = Particle::default_config();
		let mut p = particle_at(100.0, 100.0);
		step(&mut p, 1.0, BOUNDS, Some(Point::new(900.0, 700.0)), &config);
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
	}

	#[test]
	fn small_viewports_use_tighter_radius() {
		let config = Particle::default_config();
		let phone = Bounds {
			width: 400.0,
			height: 800.0,
		};
		// 150px away: inside the large radius, outside the small one.
		let mut p = particle_at(100.0, 100.0);
		step(&mut p, 1.0, phone, Some(Point::new(250.0, 100.0)), &config);
		assert_eq!(p.vx, 0.0);
		let mut p = particle_at(100.0, 100.0);
		step(&mut p, 1.0, BOUNDS, Some(Point::new(250.0, 100.0)), &config);
		assert!(p.vx > 0.0);
	}

	#[test]
	fn damping_slows_particle() {
		let config = Particle::default_config();
		let mut p = particle_at(500.0, 400.0);
		p.vx = 1.0;
		step(&mut p, 1.0, BOUNDS, None, &config);
		assert!((p.vx - 0.99).abs() < 1e-12);
	}

	#[test]
	fn reflects_and_clamps_at_edges() {
		let config = Particle::default_config();
		let mut p = particle_at(999.5, 0.5);
		p.vx = 2.0;
		p.vy = -2.0;
		step(&mut p, 1.0, BOUNDS, None, &config);
		assert_eq!(p.x, BOUNDS.width);
		assert_eq!(p.y, 0.0);
		assert!(p.vx < 0.0);
		assert!(p.vy > 0.0);
	}

	#[test]
	fn restitution_drains_bounce_speed() {
		let config = FieldConfig {
			restitution: 0.5,
			damping: 1.0,
			..Particle::default_config()
		};
		let mut p = particle_at(0.5, 400.0);
		p.vx = -2.0;
		step(&mut p, 1.0, BOUNDS, None, &config);
		assert_eq!(p.x, 0.0);
		assert_eq!(p.vx, 1.0);
	}

	#[test]
	fn radius_eases_rather_than_snaps() {
		let config = Particle::default_config();
		let mut p = particle_at(500.0, 400.0);
		p.radius = p.min_radius;
		p.pulse_phase = std::f64::consts::FRAC_PI_2;
		step(&mut p, 1.0, BOUNDS, None, &config);
		assert!(p.radius > p.min_radius);
		assert!(p.radius < p.max_radius * 0.5);
	}

	#[test]
	fn glow_alpha_follows_pulse() {
		let mut p = particle_at(0.0, 0.0);
		p.pulse = 0.0;
		assert!((p.glow_alpha() - 0.05).abs() < 1e-12);
		p.pulse = 1.0;
		assert!((p.glow_alpha() - 0.1).abs() < 1e-12);
	}

	#[test]
	fn links_need_overlap_and_pointer() {
		let a = particle_at(100.0, 100.0);
		let b = particle_at(150.0, 100.0);
		let far = particle_at(900.0, 700.0);
		let pointer = Some(Point::new(125.0, 100.0));

		assert!(link_alpha(&a, &b, None).is_none());
		assert!(link_alpha(&a, &far, pointer).is_none());
		let alpha = link_alpha(&a, &b, pointer).unwrap();
		assert!((alpha - 0.15 * 0.1).abs() < 1e-12);
	}

	#[test]
	fn links_fade_with_pointer_distance() {
		let a = particle_at(100.0, 100.0);
		let b = particle_at(150.0, 100.0);
		let near = link_alpha(&a, &b, Some(Point::new(125.0, 150.0))).unwrap();
		let further = link_alpha(&a, &b, Some(Point::new(125.0, 250.0))).unwrap();
		assert!(near > further);
		assert!(link_alpha(&a, &b, Some(Point::new(125.0, 1000.0))).is_none());
	}

	#[test]
	fn spawn_uses_palette_and_ranges() {
		let config = Particle::default_config();
		let mut rng = SeededRandom::new(11);
		for _ in 0..200 {
			let p = Particle::spawn(&mut rng, BOUNDS, &config);
			assert!(config.palette.contains(&p.color));
			assert!((MIN_RADIUS.0..MIN_RADIUS.1).contains(&p.min_radius));
			assert!((MAX_RADIUS.0..MAX_RADIUS.1).contains(&p.max_radius));
			assert!((p.min_radius..=p.max_radius).contains(&p.radius));
			assert!(p.vx.abs() <= DRIFT && p.vy.abs() <= DRIFT);
		}
	}

	#[test]
	fn empty_palette_falls_back_to_white() {
		let config = FieldConfig::default();
		let p = Particle::spawn(&mut SeededRandom::new(3), BOUNDS, &config);
		assert_eq!(p.color, Color::rgb(255, 255, 255));
	}
}
