use anyhow::Result;
use clap::Parser;
use ph_core::config::RasterConfig;

pub mod batch;
pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    run(&cli)
}

fn run(cli: &cli::Cli) -> Result<()> {
    // 3. Charger la config, puis appliquer les overrides CLI
    let mut config = resolve_config(cli)?;
    cli.apply_overrides(&mut config);
    let table = config.palette_table()?;

    // Le listing ne dépend pas des paramètres de tramage.
    if cli.list_palettes {
        print!("{}", cli::palette_listing(&table));
        return Ok(());
    }
    config.validate()?;

    // 4. Résoudre palette et matrice avant tout travail sur les pixels
    let (input, output) = cli.paths()?;
    let pipeline = pipeline::Pipeline::new(&config, &table)?;

    // 5. Lot
    let options = batch::BatchOptions {
        jobs: config.jobs,
        fail_fast: config.fail_fast,
    };
    let report = batch::run_batch(&pipeline, input, output, options)?;

    log::info!(
        "Terminé : {} écrit(s), {} échec(s)",
        report.written.len(),
        report.failures.len()
    );
    if !report.is_success() {
        for failure in &report.failures {
            log::error!("{} : {:#}", failure.input.display(), failure.error);
        }
        anyhow::bail!("{} fichier(s) en échec", report.failures.len());
    }
    Ok(())
}

/// Charge la config TOML si elle existe, sinon les défauts.
fn resolve_config(cli: &cli::Cli) -> Result<RasterConfig> {
    if cli.config.exists() {
        ph_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RasterConfig::default())
    }
}
