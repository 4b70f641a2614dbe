pub mod auth;
pub mod chat;
pub mod convert;
pub mod files;
pub mod run;
