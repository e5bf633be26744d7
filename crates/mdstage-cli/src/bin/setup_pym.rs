use clap::Parser;
use mdstage_cli::cli::SetupPymCli;
use mdstage_cli::error::Result;
use mdstage_cli::{commands, logging};
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = SetupPymCli::parse();
    logging::setup_logging(&cli.log)?;
    logging::install_panic_hook()?;

    info!("🚀 setup-pym v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = commands::ligand_prep::run(&cli);

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
