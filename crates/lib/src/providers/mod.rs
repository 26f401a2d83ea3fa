//! # Providers
//!
//! External dependencies live behind the seams in this module: the
//! embedding provider (an OpenAI-compatible HTTP service) and the verse
//! store (a local SQLite-dialect database). The pipeline in `search`
//! composes them without knowing which concrete backend is wired in.

pub mod db;
pub mod embedding;
