//! # Core Module
//!
//! Stateless building blocks shared by both stages.
//!
//! - **Structure files** ([`structure`]) - Line-oriented cleaning of ligand PDB files
//! - **Simulation parameters** ([`mdp`]) - Rewriting of `nsteps` and `gen_seed`
//! - **Batch scripts** ([`scripts`]) - Cluster profiles and Slurm script templates
//! - **File I/O** ([`files`]) - Path-aware wrappers around `std::fs`

pub mod files;
pub mod mdp;
pub mod scripts;
pub mod structure;
