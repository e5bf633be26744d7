//! Slurm batch-script templates for the supported clusters.
//!
//! Each cluster differs in how resources are requested and in small details of the
//! commands run (the MPI-enabled `gmx_mpi` binary on CESGA, an extra trajectory
//! post-processing step on CSB). Templates are rendered to plain strings; writing them
//! to disk is left to the caller.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::structure::CANONICAL_LIGAND_ID;

/// Wall-clock limit requested for relaxation jobs.
pub const RELAXATION_WALLTIME_HOURS: u32 = 24;

/// File name of the per-ligand relaxation script.
pub const RELAXATION_SCRIPT: &str = "pymemdyn.sh";
/// File name of the per-replica production script.
pub const PRODUCTION_SCRIPT: &str = "run_md.sh";
/// File name of the aggregate script submitting every ligand directory.
pub const SUBMIT_RELAXATION_SCRIPT: &str = "submit_pym.sh";
/// File name of the aggregate script submitting every replica directory.
pub const SUBMIT_PRODUCTION_SCRIPT: &str = "submit_md.sh";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClusterProfile {
    Csb,
    Cesga,
    #[default]
    Tetra,
}

impl ClusterProfile {
    pub const ALL: [ClusterProfile; 3] = [Self::Csb, Self::Cesga, Self::Tetra];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Csb => "CSB",
            Self::Cesga => "CESGA",
            Self::Tetra => "TETRA",
        }
    }
}

impl fmt::Display for ClusterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClusterProfile {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseChoiceError {
                kind: "cluster",
                value: s.to_string(),
                expected: "CSB, CESGA, TETRA",
            })
    }
}

/// Atoms held in place while the complex relaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RestraintScheme {
    /// C-alpha restrained relaxation.
    #[default]
    Ca,
    /// Ballesteros-Weinstein restrained relaxation.
    Bw,
}

impl RestraintScheme {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Ca => "ca",
            Self::Bw => "bw",
        }
    }
}

impl fmt::Display for RestraintScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for RestraintScheme {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ca" => Ok(Self::Ca),
            "bw" => Ok(Self::Bw),
            _ => Err(ParseChoiceError {
                kind: "restraint scheme",
                value: s.to_string(),
                expected: "ca, bw",
            }),
        }
    }
}

/// A Slurm script: shebang, `#SBATCH` directives, then the command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScript {
    shebang: &'static str,
    directives: Vec<String>,
    body: Vec<String>,
}

impl BatchScript {
    fn new(shebang: &'static str) -> Self {
        Self {
            shebang,
            directives: Vec::new(),
            body: Vec::new(),
        }
    }

    fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn mail_to(self, mail_user: Option<&str>) -> Self {
        match mail_user {
            Some(address) => self
                .directive("--mail-type=begin")
                .directive("--mail-type=end")
                .directive(format!("--mail-user={}", address)),
            None => self,
        }
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(self.shebang);
        out.push('\n');
        for directive in &self.directives {
            out.push_str("#SBATCH ");
            out.push_str(directive);
            out.push('\n');
        }
        for line in &self.body {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Parameters of the relaxation command written into each ligand directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaxationJob<'a> {
    pub restraints: RestraintScheme,
    pub water_id: &'a str,
    pub ion_id: &'a str,
    pub free_energy: bool,
    pub mail_user: Option<&'a str>,
}

impl RelaxationJob<'_> {
    fn command(&self) -> String {
        let mut command = format!(
            "pymemdyn -p complex.pdb --res {} -w {} -i {} -l {}",
            self.restraints.as_arg(),
            self.water_id,
            self.ion_id,
            CANONICAL_LIGAND_ID
        );
        if self.free_energy {
            command.push_str(" --full_relax false");
        }
        command
    }
}

pub fn relaxation_script(profile: ClusterProfile, job: &RelaxationJob<'_>) -> BatchScript {
    let walltime = format!("-t {}:00:00", RELAXATION_WALLTIME_HOURS);
    let script = match profile {
        ClusterProfile::Csb => BatchScript::new("#!/bin/bash -l")
            .directive("-N 1")
            .directive("-n 32")
            .directive(walltime)
            .directive("--gpus-per-task=1")
            .directive("--job-name=pymemdyn"),
        ClusterProfile::Cesga => BatchScript::new("#!/bin/bash -l")
            .directive("-N 1")
            .directive("-c 32")
            .directive("--mem-per-cpu=4G")
            .directive(walltime)
            .directive("--job-name=pymemdyn"),
        ClusterProfile::Tetra => BatchScript::new("#!/bin/bash -l")
            .directive("-N 1")
            .directive("-n 32")
            .directive(walltime)
            .directive("--job-name=pymemdyn"),
    };
    script.mail_to(job.mail_user).line(job.command())
}

const GROMPP: &str = "gmx grompp -f prod.mdp -c confout.gro -p topol.top -n index.ndx -o topol_prod.tpr --maxwarn 1";

pub fn production_script(
    profile: ClusterProfile,
    runtime_hours: u32,
    mail_user: Option<&str>,
) -> BatchScript {
    match profile {
        ClusterProfile::Csb => BatchScript::new("#!/bin/bash")
            .directive("-N 1")
            .directive("-n 32")
            .directive(format!("-t {}:00:00", runtime_hours))
            .directive("--gpus-per-task=1")
            .directive("--job-name=md_simulation")
            .mail_to(mail_user)
            .line("")
            .line("module load gromacs")
            .line(GROMPP)
            .line("srun gmx mdrun -s topol_prod.tpr -o traj.trr -e ener.edr -c final.gro -g production.log -x traj_prod.xtc")
            .line("")
            .line("mkdir -p finalOutput")
            .line("echo -e \"1 0\" | gmx trjconv -pbc mol -s topol_prod.tpr -center -ur compact -f traj_prod.xtc -o traj_prod_pymol.xtc &>> visualization.log"),
        ClusterProfile::Cesga => BatchScript::new("#!/bin/bash")
            .directive(format!("-t {}:00:00", runtime_hours))
            .directive("--mem-per-cpu=4G")
            .directive("-N 1")
            .directive("-c 32")
            .directive("--gres=gpu:a100")
            .mail_to(mail_user)
            .line("")
            .line("module load gromacs")
            .line(GROMPP)
            .line("srun gmx_mpi mdrun -s topol_prod.tpr -o traj.trr -e ener.edr -c confout.gro -g production.log -x traj_prod.xtc"),
        ClusterProfile::Tetra => BatchScript::new("#!/bin/bash")
            .directive("--job-name=md_simulation")
            .directive("-N 1")
            .directive("-n 1")
            .directive("-c 16")
            .directive(format!("--time=0-{}:00:00", runtime_hours))
            .mail_to(mail_user)
            .line("")
            .line("module load gromacs")
            .line(GROMPP)
            .line("srun gmx mdrun -s topol_prod.tpr -o traj.trr -e ener.edr -c final.gro -g production.log -x traj_prod.xtc"),
    }
}

/// Aggregate script for ligand directories. Directories are globbed when the script
/// runs, not when it is generated.
pub fn submit_relaxation_script() -> String {
    format!(
        "#!/bin/bash

echo 'Processing directories:'
start_dir=$(pwd)
for folder in ./*; do
    if [ -d \"$folder\" ]; then
        cd \"$folder\" || continue
        sbatch {}
        cd \"$start_dir\"
    fi
done
echo 'All jobs submitted.'
",
        RELAXATION_SCRIPT
    )
}

/// Aggregate script for replica directories. Directories are globbed when the script
/// runs, not when it is generated.
pub fn submit_production_script() -> String {
    format!(
        "#!/bin/bash

start_dir=$(pwd)

for dir in */ ; do
    cd \"$dir\"
    sbatch {}
    cd \"$start_dir\"
done
",
        PRODUCTION_SCRIPT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_job() -> RelaxationJob<'static> {
        RelaxationJob {
            restraints: RestraintScheme::Ca,
            water_id: "HOH",
            ion_id: "NA",
            free_energy: false,
            mail_user: None,
        }
    }

    #[test]
    fn cluster_profile_parses_case_insensitively() {
        assert_eq!("TETRA".parse::<ClusterProfile>(), Ok(ClusterProfile::Tetra));
        assert_eq!("csb".parse::<ClusterProfile>(), Ok(ClusterProfile::Csb));
        assert_eq!("Cesga".parse::<ClusterProfile>(), Ok(ClusterProfile::Cesga));
        let err = "summit".parse::<ClusterProfile>().unwrap_err();
        assert!(err.to_string().contains("summit"));
    }

    #[test]
    fn restraint_scheme_round_trips_through_its_argument() {
        for scheme in [RestraintScheme::Ca, RestraintScheme::Bw] {
            assert_eq!(scheme.as_arg().parse::<RestraintScheme>(), Ok(scheme));
        }
        assert!("cb".parse::<RestraintScheme>().is_err());
    }

    #[test]
    fn relaxation_script_renders_command() {
        let script = relaxation_script(ClusterProfile::Tetra, &default_job()).render();

        assert!(script.starts_with("#!/bin/bash -l\n"));
        assert!(script.contains("#SBATCH -t 24:00:00\n"));
        assert!(script.ends_with("pymemdyn -p complex.pdb --res ca -w HOH -i NA -l LIG\n"));
        assert!(!script.contains("mail"));
    }

    #[test]
    fn free_energy_flag_appends_switch() {
        let job = RelaxationJob {
            restraints: RestraintScheme::Bw,
            free_energy: true,
            ..default_job()
        };
        let script = relaxation_script(ClusterProfile::Cesga, &job).render();

        assert!(script.contains("--res bw"));
        assert!(script.ends_with(" -l LIG --full_relax false\n"));
        assert!(script.contains("#SBATCH --mem-per-cpu=4G\n"));
    }

    #[test]
    fn mail_directives_follow_resource_requests() {
        let job = RelaxationJob {
            mail_user: Some("someone@example.org"),
            ..default_job()
        };
        let script = relaxation_script(ClusterProfile::Tetra, &job).render();
        let lines: Vec<&str> = script.lines().collect();

        assert_eq!(lines[5], "#SBATCH --mail-type=begin");
        assert_eq!(lines[6], "#SBATCH --mail-type=end");
        assert_eq!(lines[7], "#SBATCH --mail-user=someone@example.org");
        assert!(lines[8].starts_with("pymemdyn"));
    }

    #[test]
    fn production_scripts_carry_runtime_in_cluster_syntax() {
        let csb = production_script(ClusterProfile::Csb, 36, None).render();
        let cesga = production_script(ClusterProfile::Cesga, 48, None).render();
        let tetra = production_script(ClusterProfile::Tetra, 12, None).render();

        assert!(csb.contains("#SBATCH -t 36:00:00\n"));
        assert!(cesga.contains("#SBATCH -t 48:00:00\n"));
        assert!(tetra.contains("#SBATCH --time=0-12:00:00\n"));
    }

    #[test]
    fn only_csb_runs_visualization_step() {
        for profile in ClusterProfile::ALL {
            let script = production_script(profile, 36, None).render();
            assert_eq!(
                script.contains("gmx trjconv"),
                profile == ClusterProfile::Csb,
                "{profile}"
            );
            assert!(script.contains(GROMPP));
        }
        let cesga = production_script(ClusterProfile::Cesga, 36, None).render();
        assert!(cesga.contains("srun gmx_mpi mdrun"));
    }

    #[test]
    fn submit_scripts_dispatch_unit_scripts() {
        assert!(submit_relaxation_script().contains("sbatch pymemdyn.sh"));
        assert!(submit_production_script().contains("sbatch run_md.sh"));
        assert!(submit_production_script().starts_with("#!/bin/bash\n"));
    }
}
