//! Content model, storage and media plumbing for the portfolio API.

pub mod auth;
pub mod content;
pub mod document;
pub mod media;
pub mod mutation;
pub mod store;
