//! # mdstage Core Library
//!
//! File staging and batch-script generation for a ligand-to-production molecular
//! dynamics pipeline. The heavy lifting (ligand parameterization, relaxation,
//! production MD, job scheduling) is done by external programs; this library prepares
//! the directories and scripts those programs consume.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Pure, filesystem-free transforms: structure-file
//!   line filtering, `.mdp` field rewriting and batch-script rendering, plus small I/O
//!   helpers.
//!
//! - **[`engine`]: The Plumbing.** Configuration, errors, progress reporting, system
//!   discovery and the seam to the external parameter generator.
//!
//! - **[`workflows`]: The Public API.** The two stages, ligand preparation and
//!   simulation setup, each a single entry point taking an explicit configuration.

pub mod core;
pub mod engine;
pub mod workflows;
