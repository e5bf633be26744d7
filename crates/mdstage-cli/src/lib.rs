//! Command-line front end for the `mdstage` workflows.
//!
//! Ships two binaries: `setup-pym` prepares ligand directories for PyMemDyn
//! relaxation and `setup-md` stages replica production runs from the relaxed systems.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
