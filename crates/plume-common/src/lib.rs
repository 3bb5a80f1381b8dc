//! Common utilities for the Plume style engine.
//!
//! This crate provides shared infrastructure used by every engine stage:
//! - **Warning System** - deduplicated warnings routed through the `log` facade

pub mod warning;
