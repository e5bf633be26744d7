//! Rewriting of the production `.mdp` parameter file.
//!
//! Only two fields change between replicas: the number of integration steps and the
//! velocity-generation seed. Every other line, including comments and unknown keys,
//! passes through verbatim and in order.

use rand::Rng;

/// Integration steps per nanosecond at a 2 fs time step.
pub const STEPS_PER_NS: u64 = 500_000;

/// Largest seed accepted by GROMACS (`2^31 - 1`).
pub const MAX_SEED: u32 = i32::MAX as u32;

const NSTEPS_KEY: &str = "nsteps";
const GEN_SEED_KEY: &str = "gen_seed";

/// The values written into a replica's parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdpOverrides {
    pub simulation_time_ns: u32,
    pub seed: u32,
}

impl MdpOverrides {
    pub fn new(simulation_time_ns: u32, seed: u32) -> Self {
        Self {
            simulation_time_ns,
            seed,
        }
    }

    /// Draws a fresh seed in `[1, MAX_SEED]`.
    pub fn with_random_seed<R: Rng + ?Sized>(simulation_time_ns: u32, rng: &mut R) -> Self {
        Self::new(simulation_time_ns, rng.gen_range(1..=MAX_SEED))
    }

    pub fn nsteps(&self) -> u64 {
        nsteps_for(self.simulation_time_ns)
    }
}

pub fn nsteps_for(simulation_time_ns: u32) -> u64 {
    u64::from(simulation_time_ns) * STEPS_PER_NS
}

fn rewrite_line(line: &str, overrides: &MdpOverrides) -> String {
    let trimmed = line.trim_start();
    if trimmed.starts_with(NSTEPS_KEY) {
        format!(
            "nsteps              =  {}   ; {} ns\n",
            overrides.nsteps(),
            overrides.simulation_time_ns
        )
    } else if trimmed.starts_with(GEN_SEED_KEY) {
        format!("gen_seed            =  {}\n", overrides.seed)
    } else {
        line.to_string()
    }
}

/// Rewrites the `nsteps` and `gen_seed` lines of an `.mdp` file.
///
/// A rewritten line always ends with `\n`; untouched lines keep their original
/// terminator (or lack of one).
pub fn rewrite_mdp(content: &str, overrides: &MdpOverrides) -> String {
    content
        .split_inclusive('\n')
        .map(|line| rewrite_line(line, overrides))
        .collect()
}
