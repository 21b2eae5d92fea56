// src/lib.rs
pub mod body;
pub mod catalog;
pub mod config;
pub mod curated;
pub mod discovery;
pub mod error;
pub mod kurobbs;
pub mod pool;
pub mod timeline;
pub mod timing;
pub mod title;

pub use error::{Error, Result};
