//! Tunable parameters for the animation core.
//!
//! Every constant that shapes the look of a background lives here so it can be
//! tuned per entity kind or overridden from the page. None of the numbers are
//! load-bearing; the invariants enforced by the field and scheduler hold for any
//! sane configuration.
//!
//! # Viewport classes
//!
//! Viewports narrower than [`DensityConfig::small_breakpoint`] are treated as
//! "small" (phones): they get a lower population cap, a larger area divisor
//! (sparser field) and a tighter pointer interaction radius.

use log::warn;
use serde::Deserialize;

use super::surface::Bounds;
use super::theme::Color;

/// Population rule for one viewport class.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Density {
	/// Upper bound on the entity count.
	pub cap: usize,
	/// Logical pixels of area per entity.
	pub divisor: f64,
}

impl Density {
	/// `min(cap, floor(width * height / divisor))`.
	pub fn count(&self, width: f64, height: f64) -> usize {
		if !(width > 0.0 && height > 0.0 && self.divisor > 0.0) {
			return 0;
		}
		let raw = (width * height / self.divisor).floor();
		if raw.is_finite() {
			(raw as usize).min(self.cap)
		} else {
			self.cap
		}
	}
}

/// Population rules for small and large viewports.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct DensityConfig {
	/// Logical width below which a viewport counts as small.
	pub small_breakpoint: f64,
	/// Rule below the breakpoint.
	pub small: Density,
	/// Rule at or above the breakpoint.
	pub large: Density,
}

impl DensityConfig {
	/// Whether `bounds` falls in the small viewport class.
	pub fn is_small(&self, bounds: Bounds) -> bool {
		bounds.width < self.small_breakpoint
	}

	/// Density rule that applies to `bounds`.
	pub fn for_bounds(&self, bounds: Bounds) -> &Density {
		if self.is_small(bounds) {
			&self.small
		} else {
			&self.large
		}
	}

	/// Number of entities to seed for a viewport.
	pub fn target_count(&self, bounds: Bounds) -> usize {
		self.for_bounds(bounds).count(bounds.width, bounds.height)
	}
}

/// Pointer attraction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct InteractionConfig {
	/// Attraction radius on small viewports.
	pub radius_small: f64,
	/// Attraction radius on large viewports.
	pub radius_large: f64,
	/// Velocity impulse at zero distance, per unit delta factor.
	pub strength: f64,
	/// Distances below this are treated as no interaction.
	pub epsilon: f64,
}

impl InteractionConfig {
	/// Whether every parameter is finite and non-negative, with positive radii.
	pub fn is_valid(&self) -> bool {
		[self.radius_small, self.radius_large, self.strength, self.epsilon]
			.iter()
			.all(|v| v.is_finite() && *v >= 0.0)
			&& self.radius_small > 0.0
			&& self.radius_large > 0.0
	}
}

/// Frame timing normalisation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct FrameTiming {
	/// Frame interval that corresponds to a delta factor of 1 (ms).
	pub target_interval_ms: f64,
	/// Frames closer together than this are skipped (ms).
	pub min_delta_ms: f64,
	/// Lower bound on the delta factor.
	pub min_factor: f64,
	/// Upper bound on the delta factor.
	pub max_factor: f64,
}

impl FrameTiming {
	/// Whether the bounds are usable: finite, positive and ordered.
	pub fn is_valid(&self) -> bool {
		self.target_interval_ms.is_finite()
			&& self.target_interval_ms > 0.0
			&& self.min_delta_ms.is_finite()
			&& self.min_delta_ms >= 0.0
			&& self.min_factor.is_finite()
			&& self.max_factor.is_finite()
			&& self.min_factor >= 0.0
			&& self.max_factor > 0.0
			&& self.min_factor <= self.max_factor
	}

	/// Normalised, clamped delta factor for an elapsed time in ms.
	///
	/// Never panics: with unordered bounds the upper bound wins.
	pub fn factor(&self, delta_ms: f64) -> f64 {
		let raw = delta_ms / self.target_interval_ms;
		if raw.is_finite() {
			raw.max(self.min_factor).min(self.max_factor)
		} else {
			self.max_factor
		}
	}
}

impl Default for FrameTiming {
	fn default() -> Self {
		Self {
			target_interval_ms: 1000.0 / 60.0,
			min_delta_ms: 1.0,
			min_factor: 0.5,
			max_factor: 2.0,
		}
	}
}

/// Complete configuration of one animated field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
	/// Population rules.
	pub density: DensityConfig,
	/// Pointer attraction.
	pub interaction: InteractionConfig,
	/// Multiplicative velocity damping per tick (at delta factor 1).
	pub damping: f64,
	/// Fraction of speed kept when reflecting off an edge.
	pub restitution: f64,
	/// Fraction of the gap to the pulse target closed per tick.
	pub size_smoothing: f64,
	/// Delta-factor normalisation.
	pub timing: FrameTiming,
	/// Quiet period before a resize storm reconfigures the surface (ms).
	pub resize_debounce_ms: i32,
	/// Multiplier applied to every delta when reduced motion is requested.
	pub reduced_motion_scale: f64,
	/// Upper bound on the device pixel ratio used for the backing buffer.
	pub max_device_pixel_ratio: f64,
	/// Colours entities draw from, uniformly.
	pub palette: Vec<Color>,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			density: DensityConfig {
				small_breakpoint: 768.0,
				small: Density {
					cap: 25,
					divisor: 25_000.0,
				},
				large: Density {
					cap: 50,
					divisor: 15_000.0,
				},
			},
			interaction: InteractionConfig {
				radius_small: 120.0,
				radius_large: 200.0,
				strength: 0.02,
				epsilon: 1e-6,
			},
			damping: 0.99,
			restitution: 1.0,
			size_smoothing: 0.1,
			timing: FrameTiming::default(),
			resize_debounce_ms: 250,
			reduced_motion_scale: 0.1,
			max_device_pixel_ratio: 2.0,
			palette: Vec::new(),
		}
	}
}

impl FieldConfig {
	/// Pointer interaction radius for a viewport.
	pub fn interaction_radius(&self, bounds: Bounds) -> f64 {
		if self.density.is_small(bounds) {
			self.interaction.radius_small
		} else {
			self.interaction.radius_large
		}
	}
}

/// `v` clamped to `[0, 1]`, or `fallback` when `v` is NaN.
fn unit(v: f64, fallback: f64) -> f64 {
	if v.is_nan() {
		fallback
	} else {
		v.clamp(0.0, 1.0)
	}
}

/// Page-supplied overrides. Absent fields keep the entity kind's defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOverrides {
	/// Replaces both population rules.
	pub density: Option<DensityConfig>,
	/// Replaces pointer attraction; ignored unless valid.
	pub interaction: Option<InteractionConfig>,
	/// Clamped to `[0, 1]`.
	pub damping: Option<f64>,
	/// Clamped to `[0, 1]`.
	pub restitution: Option<f64>,
	/// Clamped to `[0, 1]`.
	pub size_smoothing: Option<f64>,
	/// Replaces frame timing; ignored unless valid.
	pub timing: Option<FrameTiming>,
	/// Negative values become 0.
	pub resize_debounce_ms: Option<i32>,
	/// Capped at 1; ignored when negative.
	pub reduced_motion_scale: Option<f64>,
	/// Ignored unless positive.
	pub max_device_pixel_ratio: Option<f64>,
	/// Ignored when empty.
	pub palette: Option<Vec<Color>>,
}

impl FieldOverrides {
	/// Layer these overrides on top of `base`.
	pub fn apply(self, mut base: FieldConfig) -> FieldConfig {
		if let Some(v) = self.density {
			base.density = v;
		}
		if let Some(v) = self.interaction {
			if v.is_valid() {
				base.interaction = v;
			} else {
				warn!("glowfield: ignoring invalid interaction override {:?}", v);
			}
		}
		if let Some(v) = self.damping {
			base.damping = unit(v, base.damping);
		}
		if let Some(v) = self.restitution {
			base.restitution = unit(v, base.restitution);
		}
		if let Some(v) = self.size_smoothing {
			base.size_smoothing = unit(v, base.size_smoothing);
		}
		if let Some(v) = self.timing {
			if v.is_valid() {
				base.timing = v;
			} else {
				warn!("glowfield: ignoring invalid timing override {:?}", v);
			}
		}
		if let Some(v) = self.resize_debounce_ms {
			base.resize_debounce_ms = v.max(0);
		}
		if let Some(v) = self.reduced_motion_scale {
			if v.is_finite() && v >= 0.0 {
				base.reduced_motion_scale = v.min(1.0);
			} else {
				warn!("glowfield: ignoring invalid reduced_motion_scale {}", v);
			}
		}
		if let Some(v) = self.max_device_pixel_ratio {
			if v.is_finite() && v > 0.0 {
				base.max_device_pixel_ratio = v;
			} else {
				warn!("glowfield: ignoring invalid max_device_pixel_ratio {}", v);
			}
		}
		if let Some(v) = self.palette.filter(|p| !p.is_empty()) {
			base.palette = v;
		}
		base
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bounds(width: f64, height: f64) -> Bounds {
		Bounds { width, height }
	}

	#[test]
	fn large_viewport_hits_cap() {
		let cfg = FieldConfig::default();
		assert_eq!(cfg.density.target_count(bounds(1920.0, 1080.0)), 50);
	}

	#[test]
	fn small_viewport_uses_sparse_divisor() {
		let cfg = FieldConfig::default();
		// 400 * 800 / 25_000 = 12.8
		assert_eq!(cfg.density.target_count(bounds(400.0, 800.0)), 12);
	}

	#[test]
	fn empty_viewport_seeds_nothing() {
		let cfg = FieldConfig::default();
		assert_eq!(cfg.density.target_count(bounds(0.0, 900.0)), 0);
		assert_eq!(cfg.density.target_count(bounds(f64::NAN, 900.0)), 0);
	}

	#[test]
	fn factor_is_clamped() {
		let timing = FrameTiming::default();
		assert!((timing.factor(1000.0 / 60.0) - 1.0).abs() < 1e-9);
		assert_eq!(timing.factor(10_000.0), 2.0);
		assert_eq!(timing.factor(2.0), 0.5);
		assert_eq!(timing.factor(f64::INFINITY), 2.0);
	}

	#[test]
	fn interaction_radius_follows_viewport_class() {
		let cfg = FieldConfig::default();
		assert_eq!(cfg.interaction_radius(bounds(400.0, 800.0)), 120.0);
		assert_eq!(cfg.interaction_radius(bounds(1920.0, 1080.0)), 200.0);
	}

	#[test]
	fn overrides_keep_unspecified_defaults() {
		let overrides: FieldOverrides =
			serde_json::from_str(r#"{"damping": 0.95, "resize_debounce_ms": 100}"#).unwrap();
		let base = FieldConfig {
			palette: vec![Color::rgb(1, 1, 1)],
			..FieldConfig::default()
		};
		let merged = overrides.apply(base.clone());
		assert_eq!(merged.damping, 0.95);
		assert_eq!(merged.resize_debounce_ms, 100);
		assert_eq!(merged.palette, base.palette);
		assert_eq!(merged.density, base.density);
	}

	#[test]
	fn unordered_timing_override_keeps_defaults() {
		let overrides: FieldOverrides = serde_json::from_str(
			r#"{"timing": {"target_interval_ms": 16, "min_delta_ms": 1, "min_factor": 3, "max_factor": 2}}"#,
		)
		.unwrap();
		let merged = overrides.apply(FieldConfig::default());
		assert_eq!(merged.timing, FrameTiming::default());
		assert_eq!(merged.timing.factor(100.0), 2.0);
	}

	#[test]
	fn negative_timing_override_keeps_defaults() {
		let overrides: FieldOverrides = serde_json::from_str(
			r#"{"timing": {"target_interval_ms": 16, "min_delta_ms": 1, "min_factor": -2, "max_factor": -1}}"#,
		)
		.unwrap();
		assert_eq!(overrides.apply(FieldConfig::default()).timing, FrameTiming::default());

		let zero_interval = FrameTiming {
			target_interval_ms: 0.0,
			..FrameTiming::default()
		};
		assert!(!zero_interval.is_valid());
		assert!(FrameTiming::default().is_valid());
	}

	#[test]
	fn factor_never_panics_on_unordered_bounds() {
		let timing = FrameTiming {
			min_factor: 3.0,
			max_factor: 2.0,
			..FrameTiming::default()
		};
		assert_eq!(timing.factor(100.0), 2.0);
		assert_eq!(timing.factor(1.0), 2.0);
	}

	#[test]
	fn bad_scalar_overrides_keep_defaults() {
		let overrides: FieldOverrides = serde_json::from_str(
			r#"{"reduced_motion_scale": -1, "max_device_pixel_ratio": 0, "interaction": {"radius_small": 0, "radius_large": 200, "strength": 0.02, "epsilon": 0.000001}}"#,
		)
		.unwrap();
		let base = FieldConfig::default();
		let merged = overrides.apply(base.clone());
		assert_eq!(merged.reduced_motion_scale, base.reduced_motion_scale);
		assert_eq!(merged.max_device_pixel_ratio, base.max_device_pixel_ratio);
		assert_eq!(merged.interaction, base.interaction);
	}

	#[test]
	fn unknown_override_keys_are_rejected() {
		let parsed = serde_json::from_str::<FieldOverrides>(r#"{"dampnig": 0.5}"#);
		assert!(parsed.is_err());
	}
}
