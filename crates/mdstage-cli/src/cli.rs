use clap::{Args, Parser, ValueEnum};
use mdstage::core::scripts::{ClusterProfile, RestraintScheme};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

/// Prepare ligand directories for PyMemDyn relaxation.
#[derive(Parser, Debug)]
#[command(
    name = "setup-pym",
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "Process ligands and a protein for PyMemDyn execution: clean each ligand, build the complex, run LigParGen and write Slurm scripts.",
    help_template = HELP_TEMPLATE,
)]
pub struct SetupPymCli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Do not clean the directory after processing (accepted for compatibility, has no effect)
    #[arg(long)]
    pub noclean: bool,

    /// Protein structure merged with every ligand [default: protein.pdb]
    #[arg(short, long, value_name = "FILE")]
    pub protein: Option<String>,

    /// Ligand identifier in the provided PDB files, rewritten to LIG [default: LIG]
    #[arg(short = 'l', long = "ligand-id", value_name = "ID")]
    pub ligand_id: Option<String>,

    /// Restraints applied during relaxation [default: ca]
    #[arg(short = 'r', long = "res", value_enum, value_name = "SCHEME")]
    pub restraints: Option<RestraintArg>,

    /// Water identifier [default: HOH]
    #[arg(short = 'w', long = "water", value_name = "ID")]
    pub water_id: Option<String>,

    /// Ion identifier [default: NA]
    #[arg(short = 'i', long = "ions", value_name = "ID")]
    pub ion_id: Option<String>,

    /// Prepare files for FEP calculations (adds --full_relax false to the PyMemDyn command)
    #[arg(long)]
    pub fep: bool,

    /// LigParGen executable [default: ligpargen]
    #[arg(long, value_name = "PATH")]
    pub ligpargen: Option<PathBuf>,

    /// Net molecular charge passed to LigParGen as -cb [default: 0]
    #[arg(long, value_name = "INT", allow_negative_numbers = true)]
    pub charge: Option<i32>,
}

/// Set up replica production runs after PyMemDyn equilibration.
#[derive(Parser, Debug)]
#[command(
    name = "setup-md",
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "Set up your MD simulation after PyMemDyn equilibration: stage replica directories, rewrite prod.mdp and write Slurm scripts.",
    help_template = HELP_TEMPLATE,
)]
pub struct SetupMdCli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Simulation time in nanoseconds [default: 25]
    #[arg(short = 't', long, value_name = "NS")]
    pub simulation_time: Option<u32>,

    /// Wall-clock limit per replica in hours [default: 36]. Spell the short alias with two
    /// dashes (`--rt 48`); `-rt` is read as `-r t` and rejected
    #[arg(short = 'r', long, visible_alias = "rt", value_name = "HOURS")]
    pub runtime: Option<u32>,

    /// Number of replicas per system [default: 3]
    #[arg(short = 'n', long, value_name = "N")]
    pub num_replicas: Option<u32>,

    /// Seed for the replica seed generator, for reproducible setups
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to a configuration file in TOML format
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Working directory to process
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    pub directory: PathBuf,

    /// Choose the cluster [default: TETRA]
    #[arg(short = 'C', long, value_enum, ignore_case = true, value_name = "CLUSTER")]
    pub cluster: Option<ClusterArg>,

    /// Address notified by Slurm when jobs begin and end
    #[arg(long, value_name = "EMAIL")]
    pub mail_user: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClusterArg {
    #[value(name = "CSB")]
    Csb,
    #[value(name = "CESGA")]
    Cesga,
    #[value(name = "TETRA")]
    Tetra,
}

impl From<ClusterArg> for ClusterProfile {
    fn from(arg: ClusterArg) -> Self {
        match arg {
            ClusterArg::Csb => ClusterProfile::Csb,
            ClusterArg::Cesga => ClusterProfile::Cesga,
            ClusterArg::Tetra => ClusterProfile::Tetra,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RestraintArg {
    /// C-alpha restrained relaxation
    Ca,
    /// Ballesteros-Weinstein restrained relaxation
    Bw,
}

impl From<RestraintArg> for RestraintScheme {
    fn from(arg: RestraintArg) -> Self {
        match arg {
            RestraintArg::Ca => RestraintScheme::Ca,
            RestraintArg::Bw => RestraintScheme::Bw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definitions_are_valid() {
        SetupPymCli::command().debug_assert();
        SetupMdCli::command().debug_assert();
    }

    #[test]
    fn setup_md_flags_parse() {
        let cli = SetupMdCli::parse_from([
            "setup-md", "-t", "50", "--rt", "48", "-C", "csb", "-n", "2", "--seed", "7",
        ]);
        assert_eq!(cli.simulation_time, Some(50));
        assert_eq!(cli.runtime, Some(48));
        assert_eq!(cli.common.cluster, Some(ClusterArg::Csb));
        assert_eq!(cli.num_replicas, Some(2));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.common.directory, PathBuf::from("."));
    }

    #[test]
    fn runtime_alias_needs_two_dashes() {
        let cli = SetupMdCli::parse_from(["setup-md", "--rt", "48"]);
        assert_eq!(cli.runtime, Some(48));
        assert!(SetupMdCli::try_parse_from(["setup-md", "-rt", "48"]).is_err());

        let help = SetupMdCli::command().render_long_help().to_string();
        assert!(help.contains("--rt 48"));
    }

    #[test]
    fn setup_md_leaves_unset_flags_empty() {
        let cli = SetupMdCli::parse_from(["setup-md"]);
        assert_eq!(cli.simulation_time, None);
        assert_eq!(cli.runtime, None);
        assert_eq!(cli.common.cluster, None);
        assert_eq!(cli.log.verbose, 0);
    }

    #[test]
    fn setup_pym_flags_parse() {
        let cli = SetupPymCli::parse_from([
            "setup-pym",
            "--noclean",
            "-C",
            "CESGA",
            "-p",
            "receptor.pdb",
            "-l",
            "UNL",
            "-r",
            "bw",
            "-w",
            "SOL",
            "-i",
            "CL",
            "--fep",
            "--charge",
            "-1",
            "-vv",
        ]);
        assert!(cli.noclean);
        assert_eq!(cli.common.cluster, Some(ClusterArg::Cesga));
        assert_eq!(cli.protein.as_deref(), Some("receptor.pdb"));
        assert_eq!(cli.ligand_id.as_deref(), Some("UNL"));
        assert_eq!(cli.restraints, Some(RestraintArg::Bw));
        assert_eq!(cli.water_id.as_deref(), Some("SOL"));
        assert_eq!(cli.ion_id.as_deref(), Some("CL"));
        assert!(cli.fep);
        assert_eq!(cli.charge, Some(-1));
        assert_eq!(cli.log.verbose, 2);
    }

    #[test]
    fn unknown_cluster_is_rejected() {
        let result = SetupMdCli::try_parse_from(["setup-md", "-C", "SUMMIT"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = SetupPymCli::try_parse_from(["setup-pym", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn arguments_convert_to_core_choices() {
        assert_eq!(ClusterProfile::from(ClusterArg::Tetra), ClusterProfile::Tetra);
        assert_eq!(RestraintScheme::from(RestraintArg::Ca), RestraintScheme::Ca);
    }
}
