use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use instrloc_services::Settings;

#[derive(Parser)]
#[command(
    name = "instrloc",
    version,
    about = "Bilingual preparation-instruction localizer and catalog CSV generator"
)]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve translations and report unmatched terms, inconsistencies and
    /// the unique pairs that would be confirmed
    Review {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Run the full pipeline and write the localized sheet plus the
    /// catalog-import CSV
    Export {
        #[arg(short, long)]
        input: PathBuf,
        /// Localized sheet output (source, resolved target, extras)
        #[arg(long)]
        out_sheet: PathBuf,
        /// Catalog-import CSV output
        #[arg(long)]
        out_catalog: PathBuf,
        /// Secondary store-view code; falls back to config, then "ar_EG"
        #[arg(long)]
        locale: Option<String>,
        /// Keep commas in option titles unescaped
        #[arg(long, default_value_t = false)]
        no_escape_commas: bool,
        /// Collapse repeated identical pairs within one SKU's option string
        #[arg(long, default_value_t = false)]
        collapse_repeats: bool,
        /// Print the export plan without writing any file
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!("▶ Starting command: {}", cmd_name);

        let result = match self {
            Commands::Review { input } => {
                debug!("Review args: input={:?}", input);
                let cfg = instrloc_config::load_config().unwrap_or_default();
                let settings = Settings::from_config(&cfg);
                let report = instrloc_services::review_file(&input, &settings)?;

                let clean = report.unmatched.is_empty()
                    && report.inconsistencies.is_empty()
                    && report.orphaned == 0;

                for term in &report.unmatched {
                    print_advisory(use_color, "unmatched", &format!("{term} → no translation"));
                }
                for inc in &report.inconsistencies {
                    print_advisory(
                        use_color,
                        "inconsistent",
                        &format!("{} → {}", inc.source, inc.targets.join(", ")),
                    );
                }
                if report.orphaned > 0 {
                    print_advisory(
                        use_color,
                        "orphan",
                        &format!("{} instruction row(s) precede any SKU and will be dropped", report.orphaned),
                    );
                }
                if clean {
                    println!("✔ All rows resolved cleanly");
                }

                println!("{} unique pair(s) ready to confirm:", report.unique_pairs.len());
                for p in &report.unique_pairs {
                    println!("  {} → {}", p.source, p.target);
                }
                Ok(())
            }

            Commands::Export {
                input,
                out_sheet,
                out_catalog,
                locale,
                no_escape_commas,
                collapse_repeats,
                dry_run,
            } => {
                debug!(
                    "Export args: input={:?} out_sheet={:?} out_catalog={:?} locale={:?} no_escape_commas={} collapse_repeats={} dry_run={}",
                    input, out_sheet, out_catalog, locale, no_escape_commas, collapse_repeats, dry_run
                );
                let cfg = instrloc_config::load_config().unwrap_or_default();
                let mut settings = Settings::from_config(&cfg);
                if let Some(code) = locale {
                    settings.store_view_code = code;
                }
                if no_escape_commas {
                    settings.escape_commas = false;
                }
                if collapse_repeats {
                    settings.collapse_repeats = true;
                }

                let sheet = instrloc_ingest::read_sheet_from_path(&input)?;
                let bundle = instrloc_services::confirm(&sheet, &settings);

                if bundle.orphaned > 0 {
                    print_advisory(
                        use_color,
                        "orphan",
                        &format!("{} instruction row(s) dropped (no preceding SKU)", bundle.orphaned),
                    );
                }

                if bundle.records.is_empty() {
                    println!("⚠ No confirmed instruction rows with SKUs; nothing written");
                    return Ok(());
                }

                if dry_run {
                    println!(
                        "DRY-RUN: would write {} row(s) to {} and {} record(s) for {} SKU(s) to {}",
                        bundle.resolved.len(),
                        out_sheet.display(),
                        bundle.records.len(),
                        bundle.records.len() / 2,
                        out_catalog.display()
                    );
                    return Ok(());
                }

                let sheet_file = std::fs::File::create(&out_sheet)?;
                instrloc_export_csv::write_localized_sheet(sheet_file, &sheet, &bundle.resolved)?;
                println!("✔ Localized sheet saved to {}", out_sheet.display());

                let catalog_file = std::fs::File::create(&out_catalog)?;
                instrloc_export_csv::write_catalog_csv(catalog_file, &bundle.records)?;
                println!(
                    "✔ Catalog import file saved to {} ({} rows)",
                    out_catalog.display(),
                    bundle.records.len()
                );
                Ok(())
            }
        };

        match &result {
            Ok(_) => info!("✔ Finished command: {}", cmd_name),
            Err(e) => error!("✖ Command {} failed: {:?}", cmd_name, e),
        }

        result
    }
}

fn print_advisory(use_color: bool, kind: &str, message: &str) {
    if !use_color {
        println!("[{kind}] {message}");
        return;
    }
    use owo_colors::OwoColorize;
    let tag = match kind {
        "unmatched" => "⚠",
        "inconsistent" => "✖",
        "orphan" => "ℹ",
        _ => "•",
    };
    let colored_kind: String = match kind {
        "unmatched" => format!("{}", kind.yellow()),
        "inconsistent" => format!("{}", kind.red()),
        "orphan" => format!("{}", kind.cyan()),
        _ => format!("{}", kind.white()),
    };
    println!("{} [{}] {}", tag, colored_kind, message);
}

fn init_tracing() {
    let file_appender = rolling::daily("logs", "instrloc.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
