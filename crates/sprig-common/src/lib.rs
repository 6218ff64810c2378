//! Common utilities for the sprig renderer.
//!
//! This crate provides shared infrastructure used by the other components:
//! - **Warning System** - deduplicated warnings for unsupported content
//! - **Fetching** - the [`net::Fetcher`] collaborator and its HTTP/file implementation
//! - **Links** - resolution of document-relative URLs and form bodies

pub mod link;
pub mod net;
pub mod warning;

pub use net::{FetchError, Fetcher, HttpFetcher};
