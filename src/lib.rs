//! Core of the citedr tutor: content catalog, answer evaluation, level
//! sessions, and the persisted progression record. The terminal front end in
//! `main.rs` drives these through their public APIs.

pub mod config;
pub mod content;
pub mod engine;
pub mod session;
pub mod store;
