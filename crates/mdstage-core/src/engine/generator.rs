//! The seam between ligand preparation and the external parameter generator.
//!
//! The generator runs as a subprocess inside the ligand directory. Its outcome is
//! returned as an explicit [`ToolOutcome`] so the caller decides what happens on
//! failure instead of stumbling over missing output files later.

use super::config::GeneratorConfig;
use super::error::EngineError;
use crate::core::files;
use crate::core::structure::CANONICAL_LIGAND_ID;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, instrument};

/// Log file receiving the generator's combined stdout and stderr.
pub const GENERATOR_LOG: &str = "ligpargen.log";

/// Output files of a run and the canonical names they are renamed to.
pub const LIGPARGEN_ARTIFACTS: [(&str, &str); 3] = [
    ("LIG.gmx.gro", "LIG.gro"),
    ("LIG.openmm.pdb", "LIG.pdb"),
    ("LIG.gmx.itp", "LIG.itp"),
];

/// What a finished tool run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub program: String,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub status: String,
    pub output: String,
    pub log_path: PathBuf,
}

impl ToolOutcome {
    pub fn from_status(
        program: impl Into<String>,
        status: ExitStatus,
        output: String,
        log_path: PathBuf,
    ) -> Self {
        Self {
            program: program.into(),
            success: status.success(),
            exit_code: status.code(),
            status: status.to_string(),
            output,
            log_path,
        }
    }

    /// Turns an unsuccessful run into [`EngineError::ToolFailed`].
    pub fn check(self) -> Result<Self, EngineError> {
        if self.success {
            Ok(self)
        } else {
            Err(EngineError::ToolFailed {
                program: self.program,
                status: self.status,
                log: self.log_path,
            })
        }
    }
}

/// Produces force-field parameters for the canonical ligand file of a directory.
pub trait ParameterGenerator {
    /// Runs the generator on `input` inside `work_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tool could not be launched or its log could not be
    /// written. A tool that ran and failed is reported through [`ToolOutcome`].
    fn generate(&self, work_dir: &Path, input: &str) -> Result<ToolOutcome, EngineError>;

    /// Output files the generator leaves in `work_dir`, paired with their final names.
    fn artifacts(&self) -> &[(&'static str, &'static str)];
}

/// LigParGen (OPLS-AA/CM1A) invoked through its command-line front end.
#[derive(Debug, Clone)]
pub struct LigParGen {
    config: GeneratorConfig,
}

impl LigParGen {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> String {
        self.config.executable.display().to_string()
    }

    fn command(&self, work_dir: &Path, input: &str) -> std::io::Result<Command> {
        let executable = anchor_executable(&self.config.executable, &std::env::current_dir()?);
        let mut command = Command::new(executable);
        command
            .current_dir(work_dir)
            .arg("-i")
            .arg(input)
            .arg("-cb")
            .arg(self.config.charge.to_string())
            .arg("-ob")
            .arg(self.config.optimization_rounds.to_string())
            .arg("-r")
            .arg(CANONICAL_LIGAND_ID)
            .arg("-n")
            .arg(CANONICAL_LIGAND_ID);
        Ok(command)
    }
}

/// The child starts inside the ligand directory, so a relative executable path with a
/// directory part is resolved against `base` first. Bare names keep the `PATH` lookup.
fn anchor_executable(executable: &Path, base: &Path) -> PathBuf {
    if executable.is_relative() && executable.components().count() > 1 {
        base.join(executable)
    } else {
        executable.to_path_buf()
    }
}

impl ParameterGenerator for LigParGen {
    #[instrument(skip_all, fields(dir = %work_dir.display()))]
    fn generate(&self, work_dir: &Path, input: &str) -> Result<ToolOutcome, EngineError> {
        let program = self.program();
        debug!("Running {} on {}", program, input);

        let output = self
            .command(work_dir, input)
            .and_then(|mut command| command.output())
            .map_err(|source| EngineError::ToolLaunch {
                program: program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let log_path = work_dir.join(GENERATOR_LOG);
        files::write(&log_path, &combined)?;

        debug!("{} finished with {}", program, output.status);
        Ok(ToolOutcome::from_status(
            program,
            output.status,
            combined,
            log_path,
        ))
    }

    fn artifacts(&self) -> &[(&'static str, &'static str)] {
        &LIGPARGEN_ARTIFACTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn outcome(success: bool) -> ToolOutcome {
        ToolOutcome {
            program: "ligpargen".to_string(),
            success,
            exit_code: Some(if success { 0 } else { 1 }),
            status: if success {
                "exit status: 0".to_string()
            } else {
                "exit status: 1".to_string()
            },
            output: String::new(),
            log_path: PathBuf::from("lig1/ligpargen.log"),
        }
    }

    #[test]
    fn successful_outcome_passes_check() {
        assert!(outcome(true).check().is_ok());
    }

    #[test]
    fn failed_outcome_becomes_record_failure() {
        let err = outcome(false).check().unwrap_err();
        assert!(err.is_record_failure());
        assert!(err.to_string().contains("lig1/ligpargen.log"));
        assert!(err.to_string().contains("exit status: 1"));
    }

    #[test]
    fn command_carries_canonical_arguments() {
        let generator = LigParGen::new(GeneratorConfig {
            charge: -1,
            ..GeneratorConfig::default()
        });
        let command = generator.command(Path::new("lig1"), "LIG.pdb").unwrap();
        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(command.get_program(), "ligpargen");
        assert_eq!(
            args,
            vec!["-i", "LIG.pdb", "-cb", "-1", "-ob", "3", "-r", "LIG", "-n", "LIG"]
        );
        assert_eq!(command.get_current_dir(), Some(Path::new("lig1")));
    }

    #[test]
    fn relative_executable_with_directory_is_anchored() {
        let base = Path::new("/home/user/project");
        assert_eq!(
            anchor_executable(Path::new("./tools/ligpargen"), base),
            PathBuf::from("/home/user/project/./tools/ligpargen")
        );
        assert_eq!(
            anchor_executable(Path::new("bin/ligpargen"), base),
            PathBuf::from("/home/user/project/bin/ligpargen")
        );
        assert_eq!(
            anchor_executable(Path::new("ligpargen"), base),
            PathBuf::from("ligpargen")
        );
        assert_eq!(
            anchor_executable(Path::new("/opt/ligpargen"), base),
            PathBuf::from("/opt/ligpargen")
        );
    }

    #[cfg(unix)]
    #[test]
    fn relative_executable_launches_from_ligand_directory() {
        let scratch = tempfile::Builder::new().tempdir_in(".").unwrap();
        let rel_root = Path::new(".").join(scratch.path().file_name().unwrap());
        let tools = rel_root.join("tools");
        let work_dir = rel_root.join("lig1");
        fs::create_dir_all(&tools).unwrap();
        fs::create_dir_all(&work_dir).unwrap();

        let true_bin = ["/bin/true", "/usr/bin/true"]
            .into_iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .expect("no `true` binary available");
        let executable = tools.join("true");
        std::os::unix::fs::symlink(true_bin, &executable).unwrap();
        assert!(executable.is_relative());

        let generator = LigParGen::new(GeneratorConfig {
            executable,
            ..GeneratorConfig::default()
        });
        let outcome = generator.generate(&work_dir, "LIG.pdb").unwrap();

        assert!(outcome.success);
        assert!(work_dir.join(GENERATOR_LOG).is_file());
    }

    #[test]
    fn missing_executable_is_a_launch_error() {
        let dir = TempDir::new().unwrap();
        let generator = LigParGen::new(GeneratorConfig {
            executable: dir.path().join("no-such-ligpargen"),
            ..GeneratorConfig::default()
        });

        let err = generator.generate(dir.path(), "LIG.pdb").unwrap_err();

        assert!(matches!(err, EngineError::ToolLaunch { .. }));
        assert!(!err.is_record_failure());
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_captured_not_raised() {
        let dir = TempDir::new().unwrap();
        let generator = LigParGen::new(GeneratorConfig {
            executable: PathBuf::from("false"),
            ..GeneratorConfig::default()
        });

        let outcome = generator.generate(dir.path(), "LIG.pdb").unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(1));
        assert!(dir.path().join(GENERATOR_LOG).is_file());
    }
}
