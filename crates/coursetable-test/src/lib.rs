//! Shared test fixtures for coursetable crates.
//!
//! This crate only depends on `coursetable-core`, so every other crate can
//! use it as a dev-dependency without cycles.
//!
//! - [`registry`] - fluent registry builder keyed by codes
//! - [`campus`] - canned problem instances
//! - [`events`] - event creation helpers
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! coursetable-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use coursetable_test::{campus, events_for};
//!
//! let registry = campus::two_rooms_three_courses();
//! ```

pub mod campus;
pub mod events;
pub mod registry;

pub use events::{event_of, events_for, pos};
pub use registry::RegistryFixture;
