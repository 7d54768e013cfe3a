//! Configuration types
//!
//! A `DeviceProfile` describes one display target: its geometry, the frame
//! layout, the grayscale palette, font sizes, and the text-list fallback
//! layout. `Default` is the reference glasses profile (576x200).

#[cfg(feature = "serde")]
pub mod loader;
pub mod profile;
pub mod types;

#[cfg(feature = "serde")]
pub use loader::parse_profile;
pub use profile::*;
pub use types::*;
