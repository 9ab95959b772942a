//! The entity collection and its per-frame evolution.
//!
//! A [`ParticleField`] owns every simulated entity of one background. The
//! population is fixed between reseeds: [`ParticleField::seed`] replaces the
//! whole collection (on mount and after every resize) and
//! [`ParticleField::step`] mutates entities in place, in order.

use super::config::FieldConfig;
use super::rng::RandomSource;
use super::surface::{Bounds, Point};

/// Read-only inputs shared by every entity during one step.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
	/// Normalised elapsed time; 1.0 is one target frame.
	pub factor: f64,
	/// Logical extent entities must stay inside.
	pub bounds: Bounds,
	/// Pointer snapshot for this frame, if any.
	pub pointer: Option<Point>,
	/// Tunables of the owning field.
	pub config: &'a FieldConfig,
}

/// A simulated visual element.
pub trait Entity: Clone {
	/// Defaults tuned for this entity kind.
	fn default_config() -> FieldConfig;

	/// A fresh entity placed uniformly inside `bounds`.
	fn spawn(rng: &mut dyn RandomSource, bounds: Bounds, config: &FieldConfig) -> Self;

	/// Advance one frame. Must leave the entity inside `ctx.bounds`.
	fn step(&mut self, ctx: &StepContext<'_>, rng: &mut dyn RandomSource);

	/// Anchor point kept inside the bounds.
	fn position(&self) -> Point;

	/// Current size (radius or length).
	fn size(&self) -> f64;

	/// Declared `(min, max)` for [`Entity::size`].
	fn size_range(&self) -> (f64, f64);
}

/// Owns and evolves the entity collection of one background.
pub struct ParticleField<E> {
	entities: Vec<E>,
	bounds: Bounds,
	config: FieldConfig,
	rng: Box<dyn RandomSource>,
}

impl<E: Entity> ParticleField<E> {
	/// An empty field. Call [`ParticleField::seed`] once bounds are known.
	pub fn new(config: FieldConfig, rng: Box<dyn RandomSource>) -> Self {
		Self {
			entities: Vec::new(),
			bounds: Bounds::default(),
			config,
			rng,
		}
	}

	/// Replace the population with one sized for `bounds`.
	pub fn seed(&mut self, bounds: Bounds) {
		let count = self.config.density.target_count(bounds);
		let rng = self.rng.as_mut();
		let config = &self.config;
		self.entities = (0..count).map(|_| E::spawn(rng, bounds, config)).collect();
		self.bounds = bounds;
	}

	/// Advance every entity by `factor` target frames.
	///
	/// The factor is clamped to `[0, max_factor]` so a stalled host can never
	/// produce a jump larger than the scheduler allows. A negative or NaN
	/// `max_factor` freezes the field.
	pub fn step(&mut self, factor: f64, bounds: Bounds, pointer: Option<Point>) {
		let max = self.config.timing.max_factor;
		let factor = if factor.is_finite() && max.is_finite() {
			factor.min(max).max(0.0)
		} else {
			0.0
		};
		self.bounds = bounds;
		let ctx = StepContext {
			factor,
			bounds,
			pointer,
			config: &self.config,
		};
		let rng = self.rng.as_mut();
		for entity in &mut self.entities {
			entity.step(&ctx, rng);
		}
	}
}

impl<E> ParticleField<E> {
	/// Drop every entity.
	pub fn clear(&mut self) {
		self.entities.clear();
	}

	/// Current population, in step order.
	pub fn entities(&self) -> &[E] {
		&self.entities
	}

	/// Number of entities.
	pub fn len(&self) -> usize {
		self.entities.len()
	}

	/// Whether the field has no entities.
	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	/// Bounds used by the last seed or step.
	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Tunables this field was built with.
	pub fn config(&self) -> &FieldConfig {
		&self.config
	}
}

#[cfg(test)]
mod tests {
	use super::super::beam::Beam;
	use super::super::particle::Particle;
	use super::super::rng::SeededRandom;
	use super::*;

	fn field<E: Entity>(seed: u64, width: f64, height: f64) -> ParticleField<E> {
		let mut field = ParticleField::new(E::default_config(), Box::new(SeededRandom::new(seed)));
		field.seed(Bounds { width, height });
		field
	}

	fn assert_inside<E: Entity>(field: &ParticleField<E>) {
		let bounds = field.bounds();
		for e in field.entities() {
			assert!(bounds.contains(e.position()), "{:?} escaped {bounds:?}", e.position());
		}
	}

	fn assert_sizes<E: Entity>(field: &ParticleField<E>) {
		for e in field.entities() {
			let (min, max) = e.size_range();
			assert!(
				(min..=max).contains(&e.size()),
				"size {} outside [{min}, {max}]",
				e.size()
			);
		}
	}

	#[test]
	fn seeding_fills_to_target_count() {
		let f = field::<Particle>(1, 1920.0, 1080.0);
		assert_eq!(f.len(), 50);
		assert_inside(&f);
		assert_sizes(&f);
	}

	#[test]
	fn reseed_replaces_population() {
		let mut f = field::<Particle>(2, 1920.0, 1080.0);
		f.seed(Bounds {
			width: 400.0,
			height: 800.0,
		});
		assert_eq!(f.len(), 12);
		assert_inside(&f);
	}

	#[test]
	fn particles_stay_inside_and_sized_over_many_steps() {
		let mut f = field::<Particle>(3, 800.0, 600.0);
		let bounds = f.bounds();
		for i in 0..5_000 {
			let pointer = (i % 3 == 0).then(|| Point::new((i % 800) as f64, (i % 600) as f64));
			f.step(2.0, bounds, pointer);
			assert_inside(&f);
			assert_sizes(&f);
		}
	}

	#[test]
	fn beams_stay_inside_over_many_steps() {
		let mut f = field::<Beam>(4, 1280.0, 720.0);
		let bounds = f.bounds();
		assert!(!f.is_empty());
		for _ in 0..5_000 {
			f.step(2.0, bounds, None);
			assert_inside(&f);
			assert_sizes(&f);
		}
	}

	#[test]
	fn zero_factor_is_a_no_op() {
		let mut particles = field::<Particle>(5, 1024.0, 768.0);
		let before = particles.entities().to_vec();
		let bounds = particles.bounds();
		for _ in 0..10 {
			particles.step(0.0, bounds, Some(Point::new(500.0, 400.0)));
		}
		assert_eq!(particles.entities(), &before[..]);

		let mut beams = field::<Beam>(5, 1024.0, 768.0);
		let before = beams.entities().to_vec();
		for _ in 0..10 {
			beams.step(0.0, bounds, None);
		}
		assert_eq!(beams.entities(), &before[..]);
	}

	#[test]
	fn huge_factor_moves_no_further_than_max() {
		let mut f = field::<Particle>(6, 1920.0, 1080.0);
		let bounds = f.bounds();
		let before = f.entities().to_vec();
		f.step(1e9, bounds, None);
		for (old, new) in before.iter().zip(f.entities()) {
			let limit = old.vx.hypot(old.vy) * 2.0 + 1e-9;
			let moved = old.position().distance_to(new.position());
			assert!(moved <= limit, "moved {moved} > {limit}");
		}
	}

	#[test]
	fn non_finite_factor_is_ignored() {
		let mut f = field::<Particle>(7, 640.0, 480.0);
		let bounds = f.bounds();
		let before = f.entities().to_vec();
		f.step(f64::NAN, bounds, None);
		assert_eq!(f.entities(), &before[..]);
	}

	#[test]
	fn same_seed_same_placement() {
		let a = field::<Particle>(8, 1440.0, 900.0);
		let b = field::<Particle>(8, 1440.0, 900.0);
		assert_eq!(a.entities(), b.entities());
	}

	#[test]
	fn negative_max_factor_freezes_instead_of_panicking() {
		let mut config = Particle::default_config();
		config.timing.min_factor = -2.0;
		config.timing.max_factor = -1.0;
		let mut f = ParticleField::<Particle>::new(config, Box::new(SeededRandom::new(10)));
		f.seed(Bounds {
			width: 800.0,
			height: 600.0,
		});
		let bounds = f.bounds();
		let before = f.entities().to_vec();
		f.step(1.0, bounds, None);
		assert_eq!(f.entities(), &before[..]);
	}

	#[test]
	fn clear_empties_field() {
		let mut f = field::<Beam>(9, 1440.0, 900.0);
		f.clear();
		assert!(f.is_empty());
	}
}
