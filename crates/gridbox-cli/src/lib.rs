//! Gridbox CLI library.
//!
//! This crate provides the core functionality for the `gridbox` binary: the
//! filesystem asset database, config loading, and the command
//! implementations.

pub mod commands;
pub mod config;
pub mod fs_assets;
