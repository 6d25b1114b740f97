// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Atelier crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`clock`] - Hand-driven clock for timestamp assertions
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`port`] - Persistence port that records jobs and completes them on demand
//! - [`swatch`] - Two-field fixture schema (`color`, `size`)

pub mod clock;
pub mod config;
pub mod port;
pub mod swatch;

// Re-export commonly used items at crate root for convenience
pub use clock::ManualClock;
pub use config::InMemoryConfigStore;
pub use port::RecordingPort;
pub use swatch::{swatch_editor, Swatch, SwatchField, SwatchValue};
