//! Core deterministic primitives.
//!
//! Vector math and seeded randomness shared by every simulation module.
//! Nothing here reads wall-clock time or ambient entropy.

pub mod rng;
pub mod vec3;

// Re-export core types
pub use rng::DeterministicRng;
pub use vec3::Vec3;
