//! Host-independent animation session state.
//!
//! A [`Simulation`] bundles everything a background needs between frames
//! except the canvas itself: surface metrics, the entity field, the frame
//! scheduler, the coalesced pointer and the reduced-motion policy. The browser
//! session forwards host events into it and paints whatever it holds.

use super::config::FieldConfig;
use super::field::{Entity, ParticleField};
use super::rng::RandomSource;
use super::scheduler::{FrameDecision, FrameScheduler, FrameState, PointerTracker};
use super::surface::{Point, SurfaceMetrics};

/// Per-background animation state between frames.
pub struct Simulation<E> {
	field: ParticleField<E>,
	scheduler: FrameScheduler,
	pointer: PointerTracker,
	metrics: SurfaceMetrics,
	reduced_motion: bool,
}

impl<E: Entity> Simulation<E> {
	/// A seeded, idle simulation for a surface.
	pub fn new(config: FieldConfig, metrics: SurfaceMetrics, rng: Box<dyn RandomSource>) -> Self {
		let scheduler = FrameScheduler::new(config.timing);
		let mut field = ParticleField::new(config, rng);
		field.seed(metrics.bounds());
		Self {
			field,
			scheduler,
			pointer: PointerTracker::default(),
			metrics,
			reduced_motion: false,
		}
	}

	/// Begin running. Returns whether a frame should be requested.
	pub fn start(&mut self, now: f64) -> bool {
		self.scheduler.start(now)
	}

	/// Handle a frame callback firing at `now`.
	///
	/// On [`FrameDecision::Advance`] the field has been stepped and is ready
	/// to paint; the carried factor is the clamped one, before any
	/// reduced-motion scaling.
	pub fn frame(&mut self, now: f64) -> FrameDecision {
		let decision = self.scheduler.tick(now);
		if let FrameDecision::Advance(factor) = decision {
			let scaled = factor * self.motion_scale();
			let pointer = self.pointer.take_for_frame();
			self.field.step(scaled, self.metrics.bounds(), pointer);
		}
		decision
	}

	/// Adopt new surface metrics and reseed for them.
	pub fn resize(&mut self, metrics: SurfaceMetrics) {
		self.metrics = metrics;
		self.field.seed(metrics.bounds());
	}

	/// Follow page visibility. Returns whether a frame should be requested.
	pub fn set_visible(&mut self, visible: bool, now: f64) -> bool {
		if visible {
			self.scheduler.resume(now)
		} else {
			self.scheduler.pause();
			false
		}
	}

	/// Queue a pointer position for the next frame.
	pub fn record_pointer(&mut self, position: Point) {
		self.pointer.record(position);
	}

	/// Forget the pointer.
	pub fn clear_pointer(&mut self) {
		self.pointer.clear();
	}

	/// Follow the reduced-motion preference.
	pub fn set_reduced_motion(&mut self, reduced: bool) {
		self.reduced_motion = reduced;
	}

	/// Multiplier applied to every step's delta factor.
	pub fn motion_scale(&self) -> f64 {
		if self.reduced_motion {
			self.field.config().reduced_motion_scale
		} else {
			1.0
		}
	}

	/// Current population.
	pub fn entities(&self) -> &[E] {
		self.field.entities()
	}

	/// Current surface metrics.
	pub fn metrics(&self) -> SurfaceMetrics {
		self.metrics
	}

	/// Pointer snapshot used by the last step.
	pub fn pointer(&self) -> Option<Point> {
		self.pointer.current()
	}

	/// Scheduler state.
	pub fn state(&self) -> FrameState {
		self.scheduler.state()
	}

	/// Frames advanced so far.
	pub fn frames(&self) -> u64 {
		self.scheduler.frames()
	}

	/// Tunables in use.
	pub fn config(&self) -> &FieldConfig {
		self.field.config()
	}
}

impl<E> Simulation<E> {
	/// End the session and release the population.
	pub fn terminate(&mut self) {
		self.scheduler.terminate();
		self.field.clear();
		self.pointer.clear();
	}
}
