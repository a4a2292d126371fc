//! Core library for vestry - the client side of a single-parish content
//! system.
//!
//! The library is organized around two cooperating mechanisms:
//!
//! - a remote data access layer (`store` + `cache` + `service`) exposing
//!   typed reads and writes against the parish content store, with cached
//!   reads invalidated by resource family after every successful write
//! - a draft persistence layer (`drafts` + `admin`) giving each admin form
//!   a durable staging area that survives process restarts
//!
//! `auth` holds the shared-password session gate and `config` the on-disk
//! application configuration.

pub mod admin;
pub mod auth;
pub mod cache;
pub mod config;
pub mod drafts;
pub mod models;
pub mod service;
pub mod store;

pub use config::Config;
pub use service::ContentService;
