//! # sensorwatch-types
//!
//! Renderer-ready shapes produced by the sensorwatch polling core.
//!
//! These are read-only projections of the aggregation service's JSON
//! payloads. They carry no transport or persistence concerns, so any
//! presentation layer (terminal, web, headless export) can consume them.
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: Serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use sensorwatch_types::{AlertRecord, Severity};
//!
//! let alert = AlertRecord::new(
//!     "2024-01-01T00:00:00Z",
//!     Severity::from_label("warning"),
//!     "warning_temperature",
//!     "Temperatura elevada: 36.20°C",
//! );
//!
//! assert_eq!(alert.severity, Severity::Warning);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod alert;
mod history;
mod status;

pub use alert::*;
pub use history::*;
pub use status::*;
