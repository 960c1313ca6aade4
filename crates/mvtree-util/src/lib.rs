//! Shared utilities for mvtree.
//!
//! This crate provides the cross-cutting error type used by the request
//! loading, filtering, repository and CLI layers.

pub mod errors;
