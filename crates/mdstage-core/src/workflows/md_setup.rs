use crate::core::files;
use crate::core::mdp::{self, MdpOverrides};
use crate::core::scripts::{self, PRODUCTION_SCRIPT, SUBMIT_PRODUCTION_SCRIPT};
use crate::engine::config::MdSetupConfig;
use crate::engine::discovery::{self, SystemDescriptor};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Directory receiving the replica directories.
pub const DESTINATION_DIR: &str = "3.md";
/// Directory the relaxation output is archived to.
pub const ARCHIVE_DIR: &str = "2.pymemdyn";
/// Directory holding the original inputs; never archived.
pub const INPUT_FILES_DIR: &str = "1.input_files";
/// Parameter file rewritten in every replica.
pub const PARAMETER_FILE: &str = "prod.mdp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaRecord {
    pub system: String,
    pub index: u32,
    pub dir: PathBuf,
    pub seed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdSetupReport {
    pub destination: PathBuf,
    pub replicas: Vec<ReplicaRecord>,
    pub duplicates: Vec<PathBuf>,
    pub archived: Vec<PathBuf>,
}

impl MdSetupReport {
    pub fn system_count(&self) -> usize {
        self.replicas
            .iter()
            .map(|r| r.system.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

pub fn replica_dir_name(system: &str, index: u32) -> String {
    format!("{}_{}", system, index)
}

#[instrument(skip_all, name = "md_setup_workflow")]
pub fn run<R: Rng + ?Sized>(
    root: &Path,
    config: &MdSetupConfig,
    rng: &mut R,
    reporter: &ProgressReporter,
) -> Result<MdSetupReport, EngineError> {
    let destination = root.join(DESTINATION_DIR);
    files::create_dir_all(&destination)?;

    reporter.report(Progress::PhaseStart {
        name: "Staging Replicas",
    });
    let exclude = vec![destination.clone()];
    let systems = discovery::discover_systems(root, &exclude);
    let (replicas, duplicates) = stage_systems(systems, &destination, config, rng, reporter)?;
    reporter.report(Progress::PhaseFinish);

    files::write_executable(
        &destination.join(SUBMIT_PRODUCTION_SCRIPT),
        &scripts::submit_production_script(),
    )?;

    reporter.report(Progress::PhaseStart {
        name: "Archiving Relaxation Output",
    });
    let archived = archive_directories(root)?;
    reporter.report(Progress::PhaseFinish);

    let report = MdSetupReport {
        destination,
        replicas,
        duplicates,
        archived,
    };
    info!(
        "Staged {} replica(s) for {} system(s).",
        report.replicas.len(),
        report.system_count()
    );
    Ok(report)
}

/// Stages every replica of every system yielded by `systems`.
///
/// A system whose name was already staged is skipped, since its replica directories
/// would collide; the skipped source directories are returned alongside the records.
pub fn stage_systems<I, R>(
    systems: I,
    destination: &Path,
    config: &MdSetupConfig,
    rng: &mut R,
    reporter: &ProgressReporter,
) -> Result<(Vec<ReplicaRecord>, Vec<PathBuf>), EngineError>
where
    I: IntoIterator<Item = Result<SystemDescriptor, EngineError>>,
    R: Rng + ?Sized,
{
    let mut seen = HashSet::new();
    let mut replicas = Vec::new();
    let mut duplicates = Vec::new();

    for system in systems {
        let system = system?;
        if !seen.insert(system.name.clone()) {
            warn!(
                "Skipping {:?}: a system named '{}' was already staged.",
                system.dir, system.name
            );
            duplicates.push(system.dir);
            continue;
        }

        reporter.message(format!(
            "Staging {} ({} replica(s))",
            system.name, config.num_replicas
        ));
        for index in 1..=config.num_replicas {
            let overrides = MdpOverrides::with_random_seed(config.simulation_time_ns, &mut *rng);
            replicas.push(stage_replica(&system, index, destination, config, &overrides)?);
        }
    }
    Ok((replicas, duplicates))
}

fn stage_replica(
    system: &SystemDescriptor,
    index: u32,
    destination: &Path,
    config: &MdSetupConfig,
    overrides: &MdpOverrides,
) -> Result<ReplicaRecord, EngineError> {
    let dir = destination.join(replica_dir_name(&system.name, index));
    files::create_dir_all(&dir)?;

    for file in system.staged_files() {
        files::copy_into(&file, &dir)?;
    }

    let script =
        scripts::production_script(config.cluster, config.runtime_hours, config.mail_user.as_deref())
            .render();
    files::write_executable(&dir.join(PRODUCTION_SCRIPT), &script)?;

    let parameter_file = dir.join(PARAMETER_FILE);
    let content = files::read_to_string(&parameter_file)?;
    files::write(&parameter_file, mdp::rewrite_mdp(&content, overrides))?;

    debug!(
        "Staged {:?} (nsteps = {}, gen_seed = {}).",
        dir,
        overrides.nsteps(),
        overrides.seed
    );
    Ok(ReplicaRecord {
        system: system.name.clone(),
        index,
        dir,
        seed: overrides.seed,
    })
}

/// Moves every top-level directory of `root` except the destination, the input files
/// and the archive itself into [`ARCHIVE_DIR`].
pub fn archive_directories(root: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let archive = root.join(ARCHIVE_DIR);
    files::create_dir_all(&archive)?;
    let keep = [DESTINATION_DIR, INPUT_FILES_DIR, ARCHIVE_DIR];

    let mut archived = Vec::new();
    for entry in files::list_dir(root)? {
        let kept = entry
            .file_name()
            .is_some_and(|name| keep.iter().any(|k| name == *k));
        if entry.is_dir() && !kept {
            archived.push(files::move_into(&entry, &archive)?);
        }
    }
    info!("Moved {} directories to {:?}.", archived.len(), archive);
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scripts::ClusterProfile;
    use crate::engine::config::MdSetupConfigBuilder;
    use crate::engine::discovery::REQUIRED_INPUTS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::fs;
    use tempfile::TempDir;

    const PROD_MDP: &str = "\
integrator          =  md
nsteps              =  100
gen_vel             =  yes
gen_seed            =  -1
";

    fn config(num_replicas: u32) -> MdSetupConfig {
        MdSetupConfigBuilder::new()
            .cluster(ClusterProfile::Tetra)
            .simulation_time_ns(25)
            .runtime_hours(36)
            .num_replicas(num_replicas)
            .build()
            .unwrap()
    }

    fn make_system(dir: &Path) {
        fs::create_dir_all(dir.join("finalOutput")).unwrap();
        for file in REQUIRED_INPUTS {
            let content = if file == "prod.mdp" { PROD_MDP } else { file };
            fs::write(dir.join(file), content).unwrap();
        }
        fs::write(dir.join("finalOutput/confout.gro"), "relaxed\n").unwrap();
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn stages_requested_replicas_end_to_end() {
        let root = TempDir::new().unwrap();
        make_system(&root.path().join("X"));
        let mut rng = StdRng::seed_from_u64(7);

        let report = run(root.path(), &config(2), &mut rng, &ProgressReporter::new()).unwrap();

        let destination = root.path().join("3.md");
        assert_eq!(report.replicas.len(), 2);
        assert_eq!(
            file_names(&destination),
            vec!["X_1", "X_2", "submit_md.sh"]
        );
        for name in ["X_1", "X_2"] {
            let replica = destination.join(name);
            assert_eq!(
                file_names(&replica),
                vec![
                    "confout.gro",
                    "index.ndx",
                    "prod.mdp",
                    "run_md.sh",
                    "topol.top",
                    "topol.tpr"
                ]
            );
            let script = fs::read_to_string(replica.join("run_md.sh")).unwrap();
            assert!(script.contains("#SBATCH --time=0-36:00:00"));
            let mdp = fs::read_to_string(replica.join("prod.mdp")).unwrap();
            assert!(mdp.contains("nsteps              =  12500000   ; 25 ns\n"));
            assert!(mdp.starts_with("integrator          =  md\n"));
        }
    }

    #[test]
    fn relaxation_output_is_archived() {
        let root = TempDir::new().unwrap();
        make_system(&root.path().join("X"));
        fs::create_dir(root.path().join("1.input_files")).unwrap();
        fs::write(root.path().join("setup.log"), "").unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let report = run(root.path(), &config(1), &mut rng, &ProgressReporter::new()).unwrap();

        assert_eq!(report.archived, vec![root.path().join("2.pymemdyn/X")]);
        assert_eq!(
            file_names(root.path()),
            vec!["1.input_files", "2.pymemdyn", "3.md", "setup.log"]
        );
        assert!(root.path().join("2.pymemdyn/X/finalOutput/confout.gro").is_file());
    }

    #[test]
    fn fragments_are_copied_with_inputs() {
        let root = TempDir::new().unwrap();
        let system = root.path().join("runs/X");
        make_system(&system);
        fs::write(system.join("LIG.itp"), "[ moleculetype ]\n").unwrap();
        fs::write(system.join("posre.itp"), "").unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        run(root.path(), &config(1), &mut rng, &ProgressReporter::new()).unwrap();

        let replica = root.path().join("3.md/X_1");
        assert!(replica.join("LIG.itp").is_file());
        assert!(replica.join("posre.itp").is_file());
    }

    #[test]
    fn incomplete_system_yields_no_replicas_and_no_error() {
        let root = TempDir::new().unwrap();
        let system = root.path().join("X");
        make_system(&system);
        fs::remove_file(system.join("finalOutput/confout.gro")).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let report = run(root.path(), &config(3), &mut rng, &ProgressReporter::new()).unwrap();

        assert!(report.replicas.is_empty());
        assert_eq!(file_names(&root.path().join("3.md")), vec!["submit_md.sh"]);
    }

    #[test]
    fn replicas_get_independent_seeds() {
        let root = TempDir::new().unwrap();
        make_system(&root.path().join("X"));
        let mut rng = StdRng::seed_from_u64(99);

        let report = run(root.path(), &config(3), &mut rng, &ProgressReporter::new()).unwrap();

        let seeds: HashSet<u32> = report.replicas.iter().map(|r| r.seed).collect();
        assert_eq!(seeds.len(), 3);
        for record in &report.replicas {
            let mdp = fs::read_to_string(record.dir.join("prod.mdp")).unwrap();
            assert!(mdp.contains(&format!("gen_seed            =  {}\n", record.seed)));
        }
    }

    #[test]
    fn duplicate_system_names_are_skipped() {
        let root = TempDir::new().unwrap();
        make_system(&root.path().join("a/X"));
        make_system(&root.path().join("b/X"));
        let mut rng = StdRng::seed_from_u64(1);

        let report = run(root.path(), &config(1), &mut rng, &ProgressReporter::new()).unwrap();

        assert_eq!(report.replicas.len(), 1);
        assert_eq!(report.duplicates, vec![root.path().join("b/X")]);
    }

    #[test]
    fn stage_systems_propagates_copy_failures() {
        let root = TempDir::new().unwrap();
        let destination = root.path().join("3.md");
        fs::create_dir(&destination).unwrap();
        let ghost = SystemDescriptor {
            name: "ghost".to_string(),
            dir: root.path().join("ghost"),
            final_configuration: root.path().join("ghost/finalOutput/confout.gro"),
            fragments: Vec::new(),
        };
        let mut rng = StdRng::seed_from_u64(1);

        let result = stage_systems(
            vec![Ok(ghost)],
            &destination,
            &config(2),
            &mut rng,
            &ProgressReporter::new(),
        );

        assert!(matches!(result, Err(EngineError::File(_))));
    }

    #[test]
    fn replica_names_append_index() {
        assert_eq!(replica_dir_name("complex", 3), "complex_3");
    }
}
