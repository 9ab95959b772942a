//! Browser session: binds a [`Simulation`] to a canvas and the host's events.
//!
//! One [`AnimationSession`] exists per mounted background. It owns the
//! simulation and the configured surface, registers the host listeners it
//! needs (debounced resize, pointer, page visibility, reduced-motion
//! preference) and drives the `requestAnimationFrame` loop. Every listener is a
//! thin adapter that forwards into a method on the shared session state;
//! [`AnimationSession::dispose`] cancels pending work, removes every listener
//! and releases the surface and entities.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Event, EventTarget, HtmlCanvasElement, MediaQueryList, MouseEvent, Window,
};

use super::config::FieldConfig;
use super::error::SurfaceError;
use super::render::{self, Paint};
use super::rng::BrowserRandom;
use super::scheduler::FrameDecision;
use super::simulation::Simulation;
use super::surface::{CanvasSurface, Point, SurfaceMetrics};
use super::theme::BackgroundStyle;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Everything the listeners touch. `None` once the session is torn down, so
/// late callbacks become no-ops.
struct SessionState<E> {
	sim: Simulation<E>,
	surface: CanvasSurface,
	style: BackgroundStyle,
	frame_request: Option<i32>,
	resize_timer: Option<i32>,
}

type Shared<E> = Rc<RefCell<Option<SessionState<E>>>>;
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

impl<E: Paint> SessionState<E> {
	/// Returns whether another frame should be requested.
	fn on_frame(&mut self, now: f64) -> bool {
		match self.sim.frame(now) {
			FrameDecision::Halt => false,
			FrameDecision::Skip => true,
			FrameDecision::Advance(_) => {
				if let Err(e) = render::render(&self.sim, &self.surface, &self.style) {
					debug!("glowfield: frame {} not painted: {:?}", self.sim.frames(), e);
				}
				true
			}
		}
	}

	fn on_resize_settled(&mut self, metrics: SurfaceMetrics) {
		if let Err(e) = self.surface.configure(metrics, self.style.backdrop.as_ref()) {
			warn!("glowfield: surface reconfigure failed: {}", e);
		}
		self.sim.resize(metrics);
		debug!(
			"glowfield: resized to {}x{} @{}x, {} entities",
			metrics.width,
			metrics.height,
			metrics.dpr,
			self.sim.entities().len()
		);
	}

	fn on_visibility(&mut self, hidden: bool, now: f64, window: &Window, frame: &FrameSlot) {
		if hidden {
			self.sim.set_visible(false, now);
			if let Some(id) = self.frame_request.take() {
				let _ = window.cancel_animation_frame(id);
			}
			debug!("glowfield: paused");
		} else if self.sim.set_visible(true, now) {
			self.frame_request = request_frame(window, frame);
			debug!("glowfield: resumed");
		}
	}

	fn on_reduced_motion(&mut self, reduced: bool) {
		self.sim.set_reduced_motion(reduced);
		debug!("glowfield: reduced motion {}", if reduced { "on" } else { "off" });
	}
}

/// A registered host event listener.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

fn listen(
	target: &EventTarget,
	event: &'static str,
	callback: impl FnMut(Event) + 'static,
) -> Result<Listener, SurfaceError> {
	let callback = Closure::<dyn FnMut(Event)>::new(callback);
	target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
	Ok(Listener {
		target: target.clone(),
		event,
		callback,
	})
}

fn request_frame(window: &Window, frame: &FrameSlot) -> Option<i32> {
	let slot = frame.borrow();
	let cb = slot.as_ref()?;
	window.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

fn now(window: &Window) -> f64 {
	window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn viewport_metrics(window: &Window, max_ratio: f64) -> SurfaceMetrics {
	let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	SurfaceMetrics::new(
		extent(window.inner_width()),
		extent(window.inner_height()),
		window.device_pixel_ratio(),
		max_ratio,
	)
}

/// A mounted, running background animation.
pub struct AnimationSession<E> {
	window: Window,
	state: Shared<E>,
	frame: FrameSlot,
	listeners: Vec<Listener>,
	// Kept alive for pending debounce timers.
	_resize_settled: Closure<dyn FnMut()>,
}

impl<E: Paint + 'static> AnimationSession<E> {
	/// Configure `canvas` for the viewport, seed the field and start the loop.
	///
	/// Fails without side effects on the page when the host has no window or
	/// cannot provide a 2D context.
	pub fn mount(
		canvas: HtmlCanvasElement,
		config: FieldConfig,
		style: BackgroundStyle,
	) -> Result<Self, SurfaceError> {
		let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
		let document: Document = window.document().ok_or(SurfaceError::NoDocument)?;

		let max_ratio = config.max_device_pixel_ratio;
		let debounce_ms = config.resize_debounce_ms;
		let metrics = viewport_metrics(&window, max_ratio);
		let mut surface = CanvasSurface::attach(canvas)?;
		surface.configure(metrics, style.backdrop.as_ref())?;

		let reduced_query = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
		let mut sim = Simulation::new(config, metrics, Box::new(BrowserRandom));
		sim.set_reduced_motion(reduced_query.as_ref().is_some_and(MediaQueryList::matches));

		info!(
			"glowfield: {} background mounted at {}x{} @{}x with {} entities",
			style.name,
			metrics.width,
			metrics.height,
			metrics.dpr,
			sim.entities().len()
		);

		let state: Shared<E> = Rc::new(RefCell::new(Some(SessionState {
			sim,
			surface,
			style,
			frame_request: None,
			resize_timer: None,
		})));
		let frame: FrameSlot = Rc::new(RefCell::new(None));

		let (state_frame, frame_inner, window_frame) = (state.clone(), frame.clone(), window.clone());
		*frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let mut slot = state_frame.borrow_mut();
			let Some(s) = slot.as_mut() else {
				return;
			};
			s.frame_request = None;
			if s.on_frame(timestamp) {
				s.frame_request = request_frame(&window_frame, &frame_inner);
			}
		}));

		let state_settled = state.clone();
		let resize_settled = Closure::<dyn FnMut()>::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			let mut slot = state_settled.borrow_mut();
			if let Some(s) = slot.as_mut() {
				s.resize_timer = None;
				s.on_resize_settled(viewport_metrics(&window, max_ratio));
			}
		});
		let settled_fn: js_sys::Function = resize_settled.as_ref().unchecked_ref::<js_sys::Function>().clone();

		// From here on, dropping `session` on an early return tears down
		// whatever was registered.
		let mut session = Self {
			window: window.clone(),
			state: state.clone(),
			frame: frame.clone(),
			listeners: Vec::new(),
			_resize_settled: resize_settled,
		};

		let (state_resize, window_resize) = (state.clone(), window.clone());
		session.listeners.push(listen(&window, "resize", move |_| {
			let mut slot = state_resize.borrow_mut();
			let Some(s) = slot.as_mut() else {
				return;
			};
			if let Some(timer) = s.resize_timer.take() {
				window_resize.clear_timeout_with_handle(timer);
			}
			s.resize_timer = window_resize
				.set_timeout_with_callback_and_timeout_and_arguments_0(&settled_fn, debounce_ms)
				.ok();
		})?);

		let state_pointer = state.clone();
		session.listeners.push(listen(&window, "pointermove", move |event| {
			let Some(event) = event.dyn_ref::<MouseEvent>() else {
				return;
			};
			if let Some(s) = state_pointer.borrow_mut().as_mut() {
				s.sim
					.record_pointer(Point::new(event.client_x() as f64, event.client_y() as f64));
			}
		})?);

		let state_leave = state.clone();
		session.listeners.push(listen(&document, "mouseout", move |event| {
			let left_page = event
				.dyn_ref::<MouseEvent>()
				.is_some_and(|e| e.related_target().is_none());
			if !left_page {
				return;
			}
			if let Some(s) = state_leave.borrow_mut().as_mut() {
				s.sim.clear_pointer();
			}
		})?);

		let (state_vis, frame_vis, window_vis, document_vis) =
			(state.clone(), frame.clone(), window.clone(), document.clone());
		session.listeners.push(listen(&document, "visibilitychange", move |_| {
			let timestamp = now(&window_vis);
			if let Some(s) = state_vis.borrow_mut().as_mut() {
				s.on_visibility(document_vis.hidden(), timestamp, &window_vis, &frame_vis);
			}
		})?);

		if let Some(query) = reduced_query {
			let (state_motion, query_motion) = (state.clone(), query.clone());
			session.listeners.push(listen(&query, "change", move |_| {
				if let Some(s) = state_motion.borrow_mut().as_mut() {
					s.on_reduced_motion(query_motion.matches());
				}
			})?);
		}

		{
			let mut slot = state.borrow_mut();
			if let Some(s) = slot.as_mut() {
				let start = now(&window);
				if s.sim.start(start) {
					if document.hidden() {
						s.sim.set_visible(false, start);
					} else {
						s.frame_request = request_frame(&window, &frame);
					}
				}
			}
		}

		Ok(session)
	}

	/// Stop the loop, remove every listener and release the surface and
	/// entities.
	pub fn dispose(mut self) {
		self.teardown();
	}
}

impl<E> AnimationSession<E> {
	fn teardown(&mut self) {
		for listener in self.listeners.drain(..) {
			let _ = listener.target.remove_event_listener_with_callback(
				listener.event,
				listener.callback.as_ref().unchecked_ref(),
			);
		}

		if let Some(mut s) = self.state.borrow_mut().take() {
			if let Some(id) = s.frame_request.take() {
				let _ = self.window.cancel_animation_frame(id);
			}
			if let Some(timer) = s.resize_timer.take() {
				self.window.clear_timeout_with_handle(timer);
			}
			s.sim.terminate();
			info!("glowfield: {} background disposed", s.style.name);
		}

		// Breaks the frame closure's reference back to its own slot.
		self.frame.borrow_mut().take();
	}
}

impl<E> Drop for AnimationSession<E> {
	fn drop(&mut self) {
		self.teardown();
	}
}
