//! Catalog client plumbing, session state, and map projection for the aerial
//! imagery catalog viewer.
//!
//! Everything here is target-independent: the web UI supplies HTTP transport
//! and a `MapEngine` implementation, this crate decides what to request, what
//! to keep, and what the map should show.

pub mod config;
pub mod display;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod geo;
pub mod map;
pub mod query;
pub mod session;
pub mod types;
