//! Application layer for codebin.
//!
//! This crate provides use case implementations that coordinate between
//! domain and infrastructure layers: the editor session state machine,
//! catalog and access-control operations, and the generative features.

pub mod access;
pub mod catalog;
pub mod chat_service;
pub mod convert;
pub mod editor;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::AccessControlService;
pub use catalog::{CatalogListing, CatalogService};
pub use chat_service::ChatService;
pub use convert::ConverterService;
pub use editor::EditorService;
