//! Shared building blocks for livestat.
//!
//! Holds the row and output data model, the error type, fixed-zone time
//! conversions and the command-line settings.

pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{LiveStatError, Result};
