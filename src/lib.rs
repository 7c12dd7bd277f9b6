// Library root: exposes the pipeline for the binary and integration tests.
// The binary entry point is src/main.rs.

pub mod config;
pub mod data;
pub mod enrichment;
pub mod error;
pub mod llm;
pub mod logger;
pub mod prompt;
pub mod render;
pub mod router;
pub mod summary;
pub mod task;
