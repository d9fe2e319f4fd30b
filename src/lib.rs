//! content-ai: Branded Marketing Copy Generation
//!
//! Turns a short brief (optionally backed by an attached text, image or PDF
//! file) into a title, a post and a set of hashtags via a schema-constrained
//! call to a generative model, and keeps a durable newest-first history of
//! successful requests that can be reviewed, deleted or reused.

pub mod attachment;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod history;
pub mod logging;
pub mod prompt;
pub mod provider;
pub mod types;
