//! Maven repository layout: POM parsing, version metadata, and a
//! [`MetadataProvider`](mvtree_resolver::MetadataProvider) over a local
//! repository directory.

pub mod metadata;
pub mod pom;
pub mod repository;

pub use repository::LocalRepository;
