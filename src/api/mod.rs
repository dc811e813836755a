//! API Module
//!
//! HTTP surface handing CRD metadata and report payloads to the dashboard.

pub mod rest;
pub mod server;

pub use rest::*;
pub use server::*;
