//! Core types shared across the crate: configuration and errors.

pub mod config;
pub mod errors;
