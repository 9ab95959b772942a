//! Decorative, full-viewport animated backgrounds.
//!
//! Two variants share one engine:
//! - [`AnimatedBackground`]: dark nebula of pulsing glow particles drawn
//!   towards the pointer, with faint links between nearby particles
//! - [`LightPatternBackground`]: light surface crossed by drifting beams
//!
//! The engine splits into a host-independent core ([`Simulation`],
//! [`ParticleField`], [`FrameScheduler`]) and a thin browser layer that owns
//! the canvas, host listeners and the `requestAnimationFrame` loop.
//!
//! # Example
//!
//! ```ignore
//! use glowfield::{AnimatedBackground, Particle, Entity};
//!
//! let mut config = Particle::default_config();
//! config.damping = 0.98;
//!
//! view! { <AnimatedBackground config=config /> }
//! ```

mod beam;
mod component;
pub mod config;
mod error;
mod field;
mod particle;
mod render;
mod rng;
mod scheduler;
mod session;
mod simulation;
pub mod surface;
pub mod theme;

pub use beam::Beam;
pub use component::{AnimatedBackground, LightPatternBackground};
pub use config::{FieldConfig, FieldOverrides};
pub use error::SurfaceError;
pub use field::{Entity, ParticleField, StepContext};
pub use particle::Particle;
pub use render::Paint;
pub use rng::{BrowserRandom, RandomSource, SeededRandom};
pub use scheduler::{FrameDecision, FrameScheduler, FrameState, PointerTracker};
pub use session::AnimationSession;
pub use simulation::Simulation;
pub use surface::{Bounds, Point, SurfaceMetrics};
pub use theme::{BackgroundStyle, Color};
