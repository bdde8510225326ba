//! # particle_tree
//!
//! A glowing point-cloud shaped like a layered conical tree.
//!
//! ## Lifecycle
//!
//! | Call | When | Effect |
//! |---|---|---|
//! | [`ParticleField::spawn`] | on demand | replace every particle with a fresh tree |
//! | [`ParticleField::dissipate`] | once per fade step | dim + shrink, drop the spent ones |
//! | [`ParticleField::advance`] | every animation tick | float, drift, bounce off the edges |
//! | [`ParticleField::render`] | every animation tick | draw onto any [`Surface`] |
//! | [`ParticleField::resize`] | on viewport change | new centre for the next spawn |
//!
//! [`Framebuffer`] is a software [`Surface`] whose pixels can be handed
//! straight to a `minifb` window.
//!
//! ```rust
//! use particle_tree::{Framebuffer, ParticleField, PhysicsConfig, TreeConfig};
//!
//! let mut field = ParticleField::new(800, 600, TreeConfig::default(), PhysicsConfig::default(), Some(1));
//! let mut fb = Framebuffer::new(800, 600, 0xFF000000);
//!
//! field.spawn();
//! assert_eq!(field.len(), 209);
//!
//! while !field.is_empty() {
//!     field.dissipate();
//!     field.advance();
//!     field.render(&mut fb);
//! }
//! ```

pub mod palette;
pub mod particle;
pub mod field;
pub mod surface;
pub mod framebuffer;

pub use field::{ParticleField, PhysicsConfig, TreeConfig};
pub use framebuffer::Framebuffer;
pub use particle::Particle;
pub use surface::{Surface, GLOW_RADIUS};
