//! Frame scheduling state machine and input coalescing.
//!
//! The scheduler never touches the host: it is told when a frame callback
//! fires, the page visibility changes or the session ends, and answers what
//! the frame should do. Transitions:
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!   \               |                  |
//!    `--------------+---terminate------+--> Terminated
//! ```

use super::config::FrameTiming;
use super::surface::Point;

/// Lifecycle of the animation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
	/// Created, not started.
	Idle,
	/// Requesting and advancing frames.
	Running,
	/// Page hidden; no frames requested.
	Paused,
	/// Disposed. Final.
	Terminated,
}

/// What a frame callback should do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameDecision {
	/// Re-entered too soon: request the next frame without doing work.
	Skip,
	/// Update and paint with this clamped delta factor, then request again.
	Advance(f64),
	/// Stop requesting frames.
	Halt,
}

/// Drives the update/draw cycle timing.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
	timing: FrameTiming,
	state: FrameState,
	last_timestamp: f64,
	frames: u64,
}

impl FrameScheduler {
	/// An idle scheduler.
	pub fn new(timing: FrameTiming) -> Self {
		Self {
			timing,
			state: FrameState::Idle,
			last_timestamp: 0.0,
			frames: 0,
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> FrameState {
		self.state
	}

	/// Frames advanced so far.
	pub fn frames(&self) -> u64 {
		self.frames
	}

	/// Idle -> Running. Returns whether a frame should be requested.
	pub fn start(&mut self, now: f64) -> bool {
		if self.state != FrameState::Idle {
			return false;
		}
		self.state = FrameState::Running;
		self.last_timestamp = now;
		true
	}

	/// Decide what the frame firing at `now` should do.
	pub fn tick(&mut self, now: f64) -> FrameDecision {
		if self.state != FrameState::Running {
			return FrameDecision::Halt;
		}
		let delta = now - self.last_timestamp;
		// A clock that went backwards resynchronises instead of stalling.
		if delta < 0.0 || !delta.is_finite() {
			self.last_timestamp = now;
			return FrameDecision::Skip;
		}
		if delta < self.timing.min_delta_ms {
			return FrameDecision::Skip;
		}
		self.last_timestamp = now;
		self.frames += 1;
		FrameDecision::Advance(self.timing.factor(delta))
	}

	/// Running -> Paused. Returns whether the state changed.
	pub fn pause(&mut self) -> bool {
		if self.state != FrameState::Running {
			return false;
		}
		self.state = FrameState::Paused;
		true
	}

	/// Paused -> Running, resynchronising the clock so hidden time is not
	/// treated as animation time. Returns whether a frame should be requested.
	pub fn resume(&mut self, now: f64) -> bool {
		if self.state != FrameState::Paused {
			return false;
		}
		self.state = FrameState::Running;
		self.last_timestamp = now;
		true
	}

	/// Any state -> Terminated. Final.
	pub fn terminate(&mut self) {
		self.state = FrameState::Terminated;
	}
}

/// Coalesces pointer input so the attraction pass sees at most one new
/// position per frame.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
	pending: Option<Point>,
	current: Option<Point>,
}

impl PointerTracker {
	/// Record a raw input event. Later events overwrite earlier ones.
	pub fn record(&mut self, position: Point) {
		if position.x.is_finite() && position.y.is_finite() {
			self.pending = Some(position);
		}
	}

	/// Forget the pointer, e.g. when it leaves the page.
	pub fn clear(&mut self) {
		self.pending = None;
		self.current = None;
	}

	/// Apply the latest pending event and return this frame's snapshot.
	pub fn take_for_frame(&mut self) -> Option<Point> {
		if let Some(p) = self.pending.take() {
			self.current = Some(p);
		}
		self.current
	}

	/// Snapshot taken by the last frame.
	pub fn current(&self) -> Option<Point> {
		self.current
	}
}
