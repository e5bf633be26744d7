//! # Engine Module
//!
//! Plumbing shared by the two stages.
//!
//! - **Configuration** ([`config`]) - Validated stage configurations and their builders
//! - **Error Handling** ([`error`]) - The error type every workflow returns
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Discovery** ([`discovery`]) - Lazy enumeration of systems ready for production
//! - **Parameter Generation** ([`generator`]) - The seam to the external ligand
//!   parameterization tool and its explicit run outcome

pub mod config;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod progress;
