//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - 2D math types and the rotation convention
//! - Time management and the fixed-step accumulator
//! - Logging initialization

pub mod math;
pub mod time;
pub mod logging;
