//! ECM IC - Entry point
//!
//! CLI Usage:
//!   ecm-ic generate -i ecm.xml -o ecm.csv --domain domain.json
//!   ecm-ic generate -i ecm.xml -o ecm.csv --settings PhysiCell_settings.xml --seed 7
//!   ecm-ic template -o ecm.xml --variant monolayer

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use env_logger::Env;

use ecm_ic::{DomainConfig, GenerateOptions, TemplateVariant};

#[derive(Parser)]
#[command(name = "ecm-ic")]
#[command(about = "Rasterize layered ECM initial conditions into a per-voxel table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite an ic_ecm document and write the voxel table
    #[command(group(ArgGroup::new("domain_source").required(true).args(["domain", "settings"])))]
    Generate {
        /// ic_ecm XML document
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "ecm.csv")]
        output: PathBuf,

        /// Domain record as JSON (x_min, x_max, dx, y_min, y_max, dy, z0)
        #[arg(long)]
        domain: Option<PathBuf>,

        /// PhysiCell settings file whose <domain> block defines the grid
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Seed for random fiber orientations
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write an example ic_ecm document
    Template {
        /// Destination path
        #[arg(short, long, default_value = "ecm.xml")]
        output: PathBuf,

        /// Which example to write
        #[arg(long, value_enum, default_value_t = VariantArg::Multilayer)]
        variant: VariantArg,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Multilayer,
    Monolayer,
}

impl From<VariantArg> for TemplateVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Multilayer => TemplateVariant::Multilayer,
            VariantArg::Monolayer => TemplateVariant::Monolayer,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    log::debug!("ecm-ic v{}", ecm_ic::VERSION);

    match cli.command {
        Commands::Generate {
            input,
            output,
            domain,
            settings,
            seed,
        } => {
            let domain = match (domain, settings) {
                (Some(path), _) => DomainConfig::load(&path)?,
                (None, Some(path)) => DomainConfig::from_physicell_settings(&path)?,
                (None, None) => anyhow::bail!("either --domain or --settings is required"),
            };
            let summary = ecm_ic::generate(&input, &output, &domain, GenerateOptions { seed })?;
            log::info!(
                "Wrote {} rows ({} x {}) from {} layer(s) to {}",
                summary.rows,
                summary.nx,
                summary.ny,
                summary.layers,
                summary.output.display()
            );
            Ok(())
        }
        Commands::Template {
            output,
            variant,
            force,
        } => ecm_ic::write_template(&output, variant.into(), force),
    }
}
