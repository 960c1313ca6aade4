//! Core data types for mvtree.
//!
//! This crate defines the vocabulary shared by every other crate: artifact
//! coordinates and conflict identities, Maven versions and version
//! constraints, dependency scopes with the transitive scope lattice,
//! declared dependencies, resolver configuration, request descriptors and
//! artifact inclusion filters.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod artifact_filter;
pub mod config;
pub mod coordinate;
pub mod dependency;
pub mod request;
pub mod scope;
pub mod version;
