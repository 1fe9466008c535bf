//! Shared types and external-collaborator contracts for the musicbox client.

pub mod auth;
pub mod config;
pub mod model;
pub mod platform;
pub mod store;
