//! File I/O: reference-table ingest, model artifacts, and path resolution.

pub mod artifact;
pub mod ingest;
pub mod paths;
