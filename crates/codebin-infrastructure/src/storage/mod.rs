//! Storage layer for atomic file operations.

mod json_store;

pub use json_store::JsonStore;
