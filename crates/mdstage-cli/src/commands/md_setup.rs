use crate::cli::SetupMdCli;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdstage::core::scripts::SUBMIT_PRODUCTION_SCRIPT;
use mdstage::engine::progress::ProgressReporter;
use mdstage::workflows::{self, md_setup::DESTINATION_DIR};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

pub fn run(args: &SetupMdCli) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = builder::build_md_setup_config(args)?;
    let config = &app.core_config;

    println!("Selected cluster: {}", config.cluster);
    info!(
        "{} ns per replica ({} steps), {} h wall-clock, {} replica(s) per system.",
        config.simulation_time_ns,
        mdstage::core::mdp::nsteps_for(config.simulation_time_ns),
        config.runtime_hours,
        config.num_replicas
    );

    let progress_handler = if args.log.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the MD setup workflow in {:?}...", app.root);
    let report = match app.seed {
        Some(seed) => {
            info!("Seeding replica seeds with {}.", seed);
            let mut rng = StdRng::seed_from_u64(seed);
            workflows::md_setup::run(&app.root, config, &mut rng, &reporter)?
        }
        None => {
            let mut rng = rand::thread_rng();
            workflows::md_setup::run(&app.root, config, &mut rng, &reporter)?
        }
    };

    if report.replicas.is_empty() {
        warn!("No complete system directories were found under {:?}.", app.root);
        println!("Warning: no complete systems found; '{}' is empty.", DESTINATION_DIR);
    } else {
        println!(
            "Staged {} replica(s) for {} system(s).",
            report.replicas.len(),
            report.system_count()
        );
    }
    for duplicate in &report.duplicates {
        println!(
            "  Skipped {} (a system with the same name was already staged)",
            duplicate.display()
        );
    }
    if !report.archived.is_empty() {
        println!(
            "Archived {} relaxation output directories into '{}'.",
            report.archived.len(),
            workflows::md_setup::ARCHIVE_DIR
        );
    }

    println!(
        "Folder '{}' created. Run 'cd {}' and 'sh {}' to start simulations.",
        DESTINATION_DIR, DESTINATION_DIR, SUBMIT_PRODUCTION_SCRIPT
    );
    Ok(())
}
