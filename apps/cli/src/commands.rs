//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use partcatalog_core::{PartParser, ProgressReporter, ScanPhase};
use partcatalog_shared::{
    AppConfig, ScanOptions, ScanOutcome, config_file_path, init_config, load_config,
    load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// PartCatalog: catalog the parts installed in a game's mod folders.
#[derive(Parser)]
#[command(
    name = "partcatalog",
    version,
    about = "Scan a game install's GameData folder and catalog every part it defines.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scan a game root and print the part catalog as JSON.
    Scan {
        /// Game root containing the data folder.
        root: PathBuf,

        /// Mod folder to treat as stock (repeatable; replaces the default set).
        #[arg(long = "stock-mod")]
        stock_mods: Vec<String>,

        /// Mod folder to leave out entirely (repeatable).
        #[arg(long = "ignore-mod")]
        ignore_mods: Vec<String>,

        /// Config file to use instead of ~/.partcatalog/partcatalog.toml.
        #[arg(short, long, env = "PARTCATALOG_CONFIG")]
        config: Option<PathBuf>,

        /// Emit one payload per mod instead of the flat catalog.
        #[arg(long)]
        group_by_mod: bool,

        /// Write JSON to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default config file.
    Init,
    /// Print the config file location.
    Path,
    /// Print the effective config.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize tracing. Logs go to stderr so stdout stays pure JSON.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "partcatalog=info",
        1 => "partcatalog=debug",
        _ => "partcatalog=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan {
            root,
            stock_mods,
            ignore_mods,
            config,
            group_by_mod,
            out,
        } => cmd_scan(
            &root,
            &stock_mods,
            &ignore_mods,
            config.as_deref(),
            group_by_mod,
            out.as_deref(),
        ),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Path => cmd_config_path(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_scan(
    root: &Path,
    stock_mods: &[String],
    ignore_mods: &[String],
    config_path: Option<&Path>,
    group_by_mod: bool,
    out: Option<&Path>,
) -> Result<()> {
    if !root.is_dir() {
        return Err(eyre!("scan root '{}' is not a directory", root.display()));
    }

    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let options = merge_options(&config, stock_mods, ignore_mods);

    info!(
        root = %root.display(),
        stock_mods = options.stock_mods.len(),
        ignore_mods = options.ignore_mods.len(),
        "scanning for parts"
    );

    let reporter = CliProgress::new();
    let outcome = PartParser::new(root, options).process(&reporter);

    let json = render(&outcome, group_by_mod)?;
    match out {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .map_err(|e| eyre!("failed to write '{}': {e}", path.display()))?;
            eprintln!(
                "  {} parts, {} ignored files → {}",
                outcome.parts.len(),
                outcome.ignored.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// CLI flags override config values.
fn merge_options(config: &AppConfig, stock_mods: &[String], ignore_mods: &[String]) -> ScanOptions {
    let mut options = ScanOptions::from(config);
    if !stock_mods.is_empty() {
        options = options.with_stock_mods(stock_mods.iter().cloned());
    }
    options.ignore_mods.extend(ignore_mods.iter().cloned());
    options
}

fn render(outcome: &ScanOutcome, group_by_mod: bool) -> Result<String> {
    let json = if group_by_mod {
        serde_json::to_string_pretty(&outcome.parts.mod_payloads())?
    } else {
        serde_json::to_string_pretty(outcome)?
    };
    Ok(json)
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_path() -> Result<()> {
    println!("{}", config_file_path()?.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar on stderr.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, phase: ScanPhase) {
        self.bar.set_message(phase.to_string());
    }

    fn file_scanned(&self, path: &str, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        self.bar.set_message(path.to_string());
    }

    fn done(&self, _outcome: &ScanOutcome) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_scan_flags() {
        let cli = Cli::try_parse_from([
            "partcatalog",
            "scan",
            "/games/ksp",
            "--stock-mod",
            "Squad",
            "--stock-mod",
            "B9_Aerospace",
            "--ignore-mod",
            "NASAmission",
            "--group-by-mod",
        ])
        .expect("parse");

        match cli.command {
            Command::Scan {
                root,
                stock_mods,
                ignore_mods,
                group_by_mod,
                ..
            } => {
                assert_eq!(root, PathBuf::from("/games/ksp"));
                assert_eq!(stock_mods, ["Squad", "B9_Aerospace"]);
                assert_eq!(ignore_mods, ["NASAmission"]);
                assert!(group_by_mod);
            }
            Command::Config { .. } => panic!("expected scan"),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        config.scan.ignore_mods = vec!["FromConfig".into()];

        let options = merge_options(&config, &["OnlyThis".to_string()], &["FromFlag".to_string()]);
        assert_eq!(options.stock_mods.len(), 1);
        assert!(options.stock_mods.contains("OnlyThis"));
        assert!(options.ignore_mods.contains("FromConfig"));
        assert!(options.ignore_mods.contains("FromFlag"));
    }

    #[test]
    fn empty_flags_keep_config_defaults() {
        let options = merge_options(&AppConfig::default(), &[], &[]);
        assert!(options.stock_mods.contains("Squad"));
        assert!(options.ignore_mods.is_empty());
    }
}
