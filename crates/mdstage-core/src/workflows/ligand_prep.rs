use crate::core::files;
use crate::core::scripts::{self, RELAXATION_SCRIPT, RelaxationJob, SUBMIT_RELAXATION_SCRIPT};
use crate::core::structure::{self, CANONICAL_LIGAND_ID};
use crate::engine::config::LigandPrepConfig;
use crate::engine::error::EngineError;
use crate::engine::generator::ParameterGenerator;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// Extension of the structure files picked up as ligands.
pub const STRUCTURE_EXTENSION: &str = "pdb";
/// Directory the input ligand structures are moved to once processed.
pub const BACKUP_DIR: &str = "inputFiles";
/// Canonical ligand structure inside each ligand directory.
pub const LIGAND_FILE: &str = "LIG.pdb";
/// Protein-ligand complex inside each ligand directory.
pub const COMPLEX_FILE: &str = "complex.pdb";

#[derive(Debug)]
pub struct LigandFailure {
    pub name: String,
    pub error: EngineError,
}

#[derive(Debug)]
pub struct LigandPrepReport {
    pub prepared: Vec<PathBuf>,
    pub failed: Vec<LigandFailure>,
    pub backed_up: Vec<PathBuf>,
    pub submit_script: PathBuf,
}

impl LigandPrepReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn is_structure_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == STRUCTURE_EXTENSION)
}

fn is_protein(path: &Path, protein_file: &str) -> bool {
    path.file_name().is_some_and(|name| name == protein_file)
}

/// Structure files in `root` other than the protein, sorted by name.
pub fn find_ligands(root: &Path, protein_file: &str) -> Result<Vec<PathBuf>, EngineError> {
    Ok(files::list_dir(root)?
        .into_iter()
        .filter(|path| is_structure_file(path) && !is_protein(path, protein_file))
        .collect())
}

#[instrument(skip_all, name = "ligand_prep_workflow")]
pub fn run(
    root: &Path,
    config: &LigandPrepConfig,
    generator: &dyn ParameterGenerator,
    reporter: &ProgressReporter,
) -> Result<LigandPrepReport, EngineError> {
    let protein_path = root.join(&config.protein_file);
    if !protein_path.is_file() {
        return Err(EngineError::MissingInput { path: protein_path });
    }
    let protein = files::read(&protein_path)?;

    let ligands = find_ligands(root, &config.protein_file)?;
    let total = ligands.len();
    info!("Found {} ligand file(s) in {:?}.", total, root);

    reporter.report(Progress::PhaseStart {
        name: "Preparing Ligands",
    });
    reporter.report(Progress::TaskStart {
        total_steps: total as u64,
    });

    let mut prepared = Vec::new();
    let mut failed = Vec::new();

    for (idx, source) in ligands.iter().enumerate() {
        let idx = idx + 1;
        let name = ligand_name(source);
        reporter.message(format!("Processing ({}/{}): {}", idx, total, name));

        let dir = stage_ligand(root, source, &name, &protein, config)?;

        match parameterize(&dir, generator) {
            Ok(()) => {
                write_relaxation_script(&dir, config)?;
                reporter.message(format!(
                    "Processing of {} complete. Remaining: {}",
                    name,
                    total - idx
                ));
                prepared.push(dir);
            }
            Err(e) if e.is_record_failure() => {
                error!("Ligand {} failed: {}", name, e);
                reporter.message(format!("✗ {} failed: {}", name, e));
                failed.push(LigandFailure { name, error: e });
            }
            Err(e) => return Err(e),
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let backed_up = back_up_inputs(root, &ligands)?;

    let submit_script = root.join(SUBMIT_RELAXATION_SCRIPT);
    files::write_executable(&submit_script, &scripts::submit_relaxation_script())?;

    info!(
        "Ligand preparation finished: {} prepared, {} failed.",
        prepared.len(),
        failed.len()
    );
    Ok(LigandPrepReport {
        prepared,
        failed,
        backed_up,
        submit_script,
    })
}

fn ligand_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Creates the ligand directory with the cleaned ligand and the complex.
fn stage_ligand(
    root: &Path,
    source: &Path,
    name: &str,
    protein: &[u8],
    config: &LigandPrepConfig,
) -> Result<PathBuf, EngineError> {
    let dir = root.join(name);
    files::create_dir_all(&dir)?;

    let raw = files::read_to_string(source)?;
    let cleaned = structure::clean_ligand_text(&raw, &config.ligand_id);
    files::write(&dir.join(LIGAND_FILE), &cleaned)?;
    debug!(
        "Wrote {} with {} renamed to {}.",
        LIGAND_FILE, config.ligand_id, CANONICAL_LIGAND_ID
    );

    let complex = structure::merge_complex(protein, cleaned.as_bytes());
    files::write(&dir.join(COMPLEX_FILE), complex)?;

    Ok(dir)
}

/// Runs the generator and moves its outputs to their canonical names.
fn parameterize(dir: &Path, generator: &dyn ParameterGenerator) -> Result<(), EngineError> {
    let outcome = generator.generate(dir, LIGAND_FILE)?.check()?;

    for (produced, canonical) in generator.artifacts() {
        let from = dir.join(produced);
        if !from.is_file() {
            return Err(EngineError::MissingArtifact {
                path: from,
                log: outcome.log_path.clone(),
            });
        }
        files::rename(&from, &dir.join(canonical))?;
    }
    Ok(())
}

fn write_relaxation_script(dir: &Path, config: &LigandPrepConfig) -> Result<(), EngineError> {
    let job = RelaxationJob {
        restraints: config.relaxation.restraints,
        water_id: &config.relaxation.water_id,
        ion_id: &config.relaxation.ion_id,
        free_energy: config.relaxation.free_energy,
        mail_user: config.mail_user.as_deref(),
    };
    let script = scripts::relaxation_script(config.cluster, &job).render();
    files::write_executable(&dir.join(RELAXATION_SCRIPT), &script)?;
    Ok(())
}

/// Moves the processed ligand files into [`BACKUP_DIR`]; the protein stays put.
fn back_up_inputs(root: &Path, ligands: &[PathBuf]) -> Result<Vec<PathBuf>, EngineError> {
    let backup = root.join(BACKUP_DIR);
    files::create_dir_all(&backup)?;
    let mut moved = Vec::with_capacity(ligands.len());
    for ligand in ligands {
        moved.push(files::move_into(ligand, &backup)?);
    }
    info!("Moved {} input file(s) to {:?}.", moved.len(), backup);
    Ok(moved)
}
