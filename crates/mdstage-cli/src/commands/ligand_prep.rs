use crate::cli::SetupPymCli;
use crate::config::builder;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use mdstage::engine::generator::LigParGen;
use mdstage::engine::progress::ProgressReporter;
use mdstage::workflows;
use tracing::{debug, info, warn};

pub fn run(args: &SetupPymCli) -> Result<()> {
    if args.noclean {
        debug!("--noclean was given; it has no effect.");
    }

    info!("Merging configuration from file and CLI arguments...");
    let app = builder::build_ligand_prep_config(args)?;
    let config = &app.core_config;

    println!("Selected cluster: {}", config.cluster);
    info!(
        "Ligand id '{}', restraints {}, water '{}', ions '{}', FEP {}.",
        config.ligand_id,
        config.relaxation.restraints,
        config.relaxation.water_id,
        config.relaxation.ion_id,
        config.relaxation.free_energy
    );

    let generator = LigParGen::new(config.generator.clone());
    let progress_handler = if args.log.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the ligand preparation workflow in {:?}...", app.root);
    let report = workflows::ligand_prep::run(&app.root, config, &generator, &reporter)?;

    let total = report.prepared.len() + report.failed.len();
    if total == 0 {
        warn!("No ligand structures found next to '{}'.", config.protein_file);
        println!("No ligand files found. Nothing to prepare.");
    }
    for failure in &report.failed {
        println!("  ✗ {}: {}", failure.name, failure.error);
    }
    println!(
        "Backed up {} input file(s) into '{}'.",
        report.backed_up.len(),
        workflows::ligand_prep::BACKUP_DIR
    );

    if !report.is_complete() {
        return Err(CliError::LigandsFailed {
            failed: report.failed.len(),
            total,
        });
    }

    println!(
        "All ligands processed. Run 'sh {}' to submit the relaxation jobs.",
        report
            .submit_script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    Ok(())
}
