//! Foundation types for RETROTERM.
//!
//! This crate contains the types shared by every RETROTERM crate: the error
//! taxonomy, user preferences and shell configuration, and the key-value
//! storage abstraction that persisted state is written through.

pub mod config;
pub mod error;
pub mod storage;
