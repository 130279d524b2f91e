//! Core module - Contains the fundamental types and utilities
//!
//! This module provides:
//! - Error types shared across the crate
//! - Object store path sanitization
//! - Registry configuration
//! - Logging setup
//! - Rendering functions for different output formats

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod render;
