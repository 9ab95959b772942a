//! Leptos components wrapping the animated background canvas.
//!
//! Each component renders a fixed, full-viewport container with a canvas
//! behind the page content. Once the canvas is in the DOM an
//! [`AnimationSession`] is mounted on it; the session is disposed when the
//! component is cleaned up. If the host cannot provide a drawing surface the
//! component stays an empty container.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::debug;
use web_sys::HtmlCanvasElement;

use super::beam::Beam;
use super::config::FieldConfig;
use super::field::Entity;
use super::particle::Particle;
use super::render::Paint;
use super::session::AnimationSession;
use super::theme::BackgroundStyle;

/// Dark background of pulsing glow particles that follow the pointer.
///
/// `config` replaces the particle defaults entirely; see
/// [`FieldOverrides`](super::FieldOverrides) for partial tuning.
#[component]
pub fn AnimatedBackground(#[prop(optional)] config: Option<FieldConfig>) -> impl IntoView {
	let style = BackgroundStyle::nebula();
	let canvas_ref = NodeRef::<Canvas>::new();
	let base = style.base.to_css();

	mount_session::<Particle>(
		canvas_ref,
		config.unwrap_or_else(Particle::default_config),
		style,
	);
	background_view(canvas_ref, base, true)
}

/// Light background of drifting, wrapping light beams.
#[component]
pub fn LightPatternBackground(#[prop(optional)] config: Option<FieldConfig>) -> impl IntoView {
	let style = BackgroundStyle::daylight();
	let canvas_ref = NodeRef::<Canvas>::new();
	let base = style.base.to_css();

	mount_session::<Beam>(
		canvas_ref,
		config.unwrap_or_else(Beam::default_config),
		style,
	);
	background_view(canvas_ref, base, false)
}

/// Ties an [`AnimationSession`] to the lifetime of the calling component.
fn mount_session<E: Paint + 'static>(
	canvas_ref: NodeRef<Canvas>,
	config: FieldConfig,
	style: BackgroundStyle,
) {
	let session: Rc<RefCell<Option<AnimationSession<E>>>> = Rc::new(RefCell::new(None));
	let session_init = session.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(previous) = session_init.borrow_mut().take() {
			previous.dispose();
		}
		match AnimationSession::<E>::mount(canvas, config.clone(), style.clone()) {
			Ok(s) => *session_init.borrow_mut() = Some(s),
			Err(e) => debug!("glowfield: animation disabled: {}", e),
		}
	});

	let session = StoredValue::new_local(session);
	on_cleanup(move || {
		session.try_with_value(|slot| {
			if let Some(s) = slot.borrow_mut().take() {
				s.dispose();
			}
		});
	});
}

const FADE_IN_KEYFRAMES: &str =
	"@keyframes glowfield-fade-in { from { opacity: 0; } to { opacity: 1; } }";

fn container_style(base: &str) -> String {
	format!(
		"position: fixed; top: 0; left: 0; width: 100%; height: 100%; z-index: -1; overflow: hidden; background: {base};"
	)
}

/// Inline style of the canvas. `fade_in` eases it in over two seconds.
fn canvas_style(fade_in: bool) -> String {
	let mut style = String::from("position: absolute; top: 0; left: 0; display: block;");
	if fade_in {
		style.push_str(" animation: glowfield-fade-in 2s ease-out;");
	}
	style
}

fn background_view(canvas_ref: NodeRef<Canvas>, base: String, fade_in: bool) -> impl IntoView {
	view! {
		<div class="animated-background" style=container_style(&base) aria-hidden="true">
			{fade_in.then(|| view! { <style>{FADE_IN_KEYFRAMES}</style> })}
			<canvas
				node_ref=canvas_ref
				class="animated-background-canvas"
				style=canvas_style(fade_in)
			/>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fading_canvas_references_declared_keyframes() {
		let style = canvas_style(true);
		assert!(style.contains("animation: glowfield-fade-in 2s ease-out"));
		assert!(FADE_IN_KEYFRAMES.starts_with("@keyframes glowfield-fade-in"));
	}

	#[test]
	fn static_canvas_has_no_animation() {
		assert!(!canvas_style(false).contains("animation"));
	}

	#[test]
	fn container_uses_base_colour() {
		let style = container_style(&BackgroundStyle::nebula().base.to_css());
		assert!(style.ends_with("background: #0a0a0f;"));
		assert!(style.contains("z-index: -1"));
	}
}
