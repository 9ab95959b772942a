//! glowfield: decorative animated canvas backgrounds for Leptos pages.
//!
//! This crate provides two full-viewport background components: a dark field
//! of glowing particles that lean towards the pointer, and a light field of
//! drifting beams. Both run a frame-rate independent simulation on a
//! high-DPI aware canvas and pause while the page is hidden.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::animated_background::{
	AnimatedBackground, Beam, Entity, FieldConfig, FieldOverrides, LightPatternBackground, Particle,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("glowfield: logging initialized");
}

/// Which background the page shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
	/// Glow particles on a dark backdrop.
	#[default]
	Particles,
	/// Light beams on a light surface.
	Beams,
}

/// Page-level configuration read from the DOM.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageConfig {
	/// Background to show.
	pub variant: Variant,
	/// Partial overrides layered on the variant's defaults.
	pub field: FieldOverrides,
}

impl PageConfig {
	/// The variant's defaults with this page's overrides applied.
	pub fn field_config(&self) -> FieldConfig {
		let base = match self.variant {
			Variant::Particles => Particle::default_config(),
			Variant::Beams => Beam::default_config(),
		};
		self.field.clone().apply(base)
	}
}

/// Load background configuration from a script element with id="background-config".
/// Expected format: JSON with { variant: "particles" | "beams", field: {...} }
fn load_page_config() -> Option<PageConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("background-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<PageConfig>(&json_text) {
		Ok(config) => {
			info!("glowfield: loaded page config, variant {:?}", config.variant);
			Some(config)
		}
		Err(e) => {
			warn!("glowfield: failed to parse background config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Reads the page config from the DOM and renders the chosen background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let page = load_page_config().unwrap_or_default();
	let config = page.field_config();
	let background = match page.variant {
		Variant::Particles => view! { <AnimatedBackground config=config /> }.into_any(),
		Variant::Beams => view! { <LightPatternBackground config=config /> }.into_any(),
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="glowfield" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{background}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_page_config_defaults_to_particles() {
		let page: PageConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(page.variant, Variant::Particles);
		assert_eq!(page.field_config(), Particle::default_config());
	}

	#[test]
	fn beams_variant_layers_overrides_on_beam_defaults() {
		let page: PageConfig =
			serde_json::from_str(r#"{"variant": "beams", "field": {"reduced_motion_scale": 0.2}}"#)
				.unwrap();
		let config = page.field_config();
		assert_eq!(config.reduced_motion_scale, 0.2);
		assert_eq!(config.density, Beam::default_config().density);
	}

	#[test]
	fn invalid_timing_in_page_config_falls_back_and_ticks() {
		use components::animated_background::{FrameDecision, FrameScheduler};

		let page: PageConfig = serde_json::from_str(
			r#"{"field": {"timing": {"target_interval_ms": 16, "min_delta_ms": 1, "min_factor": 3, "max_factor": 2}}}"#,
		)
		.unwrap();
		let config = page.field_config();
		assert_eq!(config.timing, Particle::default_config().timing);

		let mut scheduler = FrameScheduler::new(config.timing);
		assert!(scheduler.start(0.0));
		assert_eq!(scheduler.tick(100.0), FrameDecision::Advance(2.0));
	}

	#[test]
	fn unknown_variant_is_rejected() {
		assert!(serde_json::from_str::<PageConfig>(r#"{"variant": "stars"}"#).is_err());
	}
}
