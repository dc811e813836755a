//! Domain layer - Report data model and port definitions
//!
//! This module defines the data handed to the presentation layer and the
//! traits (ports) that the Kubernetes and cache adapters implement.

pub mod model;
pub mod ports;

pub use model::*;
pub use ports::*;
