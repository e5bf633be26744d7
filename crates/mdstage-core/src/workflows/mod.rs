//! # Workflows Module
//!
//! The two stages of the pipeline, each a single entry point taking an explicit
//! configuration and a progress reporter.
//!
//! - **Ligand Preparation** ([`ligand_prep`]) - Cleans ligand structures, builds the
//!   protein-ligand complexes, runs the parameter generator and writes relaxation
//!   scripts.
//! - **Simulation Setup** ([`md_setup`]) - Stages replica directories for production
//!   MD from the relaxation output and archives what it consumed.
//!
//! Both stages are synchronous and leave completed work on disk when they fail.

pub mod ligand_prep;
pub mod md_setup;
