pub mod error;
pub mod language;
pub mod file;
pub mod session;
pub mod draft;
pub mod compile;
pub mod generative;
pub mod auth;
pub mod chat;

// Re-export common error type
pub use error::CodebinError;
