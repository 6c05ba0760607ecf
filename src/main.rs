//! sbom-doc: summary documentation for SPDX and `CycloneDX` SBOMs.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_doc::config::{
    self, AppConfig, LicenseTextConfig, OutputConfig, ReportConfig, Validatable,
};
use sbom_doc::pipeline::{exit_codes, run_report};
use sbom_doc::render::OutputFormat;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  SPDX:      2.2, 2.3 (JSON, YAML, tag-value)",
        "\n  CycloneDX: 1.4, 1.5, 1.6 (JSON)",
        "\n\nOutput Formats:",
        "\n  console, markdown, pdf"
    )
}

#[derive(Parser)]
#[command(name = "sbom-doc")]
#[command(version, long_version = build_long_version())]
#[command(about = "Generate summary documentation for an SBOM", long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
#[command(after_help = "EXIT CODES:
    0  Report generated
    1  NTIA summary requested and the SBOM is not conformant
       (with --fail-on-nonconformance)
    3  Error occurred

EXAMPLES:
    # Summary on the terminal
    sbom-doc app.spdx.json

    # Markdown with NTIA check and license texts
    sbom-doc app.cdx.json -f markdown -o app.md --ntia-summary --include-license

    # PDF with a closing notice
    sbom-doc app.spdx -f pdf -o app.pdf --extra-text NOTICE.txt")]
struct Cli {
    #[command(flatten)]
    report: ReportArgs,

    /// Enable verbose output
    #[arg(short, long, global = true, visible_alias = "debug")]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Arguments for generating a report
#[derive(Parser)]
struct ReportArgs {
    /// Path to the SBOM (SPDX or CycloneDX)
    #[arg(required = true)]
    sbom: Option<PathBuf>,

    /// Output format (default: console)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Output file path (stdout if not specified; required for pdf)
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Append the full text of each license
    #[arg(long)]
    include_license: bool,

    /// Add the NTIA minimum elements summary
    #[arg(long)]
    ntia_summary: bool,

    /// File whose contents are appended as a closing notice
    #[arg(long)]
    extra_text: Option<PathBuf>,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long)]
    no_color: bool,

    /// Never fetch license text over the network
    #[arg(long)]
    offline: bool,

    /// Exit with code 1 when the NTIA summary finds the SBOM non-conformant
    #[arg(long)]
    fail_on_nonconformance: bool,

    /// Do not number section headings
    #[arg(long)]
    no_numbered_headings: bool,

    /// Directory with a TrueType font family for PDF output
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

impl ReportArgs {
    /// Command-line settings as a config layer to merge over the file.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            output: OutputConfig {
                format: self.format.unwrap_or_default(),
                file: self.output_file.clone(),
                no_color: self.no_color,
            },
            report: ReportConfig {
                include_license: self.include_license,
                ntia_summary: self.ntia_summary,
                extra_text: self.extra_text.clone(),
                numbered_headings: !self.no_numbered_headings,
            },
            render: config::RenderConfig {
                font_dir: self.font_dir.clone(),
                ..config::RenderConfig::default()
            },
            license_text: LicenseTextConfig::default(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .sbom-doc.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        None => generate_report(&cli.report, cli.config),
        Some(Commands::Completions { shell }) => {
            generate(shell, &mut Cli::command(), "sbom-doc", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
        Some(Commands::ConfigSchema { output }) => {
            let schema = config::generate_json_schema().context("failed to build schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }
        Some(Commands::Config { action }) => {
            run_config_action(action, cli.config)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn generate_report(args: &ReportArgs, config_path: Option<PathBuf>) -> Result<i32> {
    let sbom_path = args.sbom.clone().context("SBOM path must be specified")?;

    let (config, loaded_from) = AppConfig::from_file_with_overrides(
        config_path.as_deref(),
        &args.overrides(),
        args.format,
    );
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("Invalid configuration: {error}");
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    let summary = run_report(&config, &sbom_path, args.offline)?;

    let checked = config.report.ntia_summary;
    if args.fail_on_nonconformance && checked && !summary.ntia.is_conformant() {
        tracing::warn!("SBOM does not meet the NTIA minimum elements");
        return Ok(exit_codes::NON_CONFORMANT);
    }
    Ok(exit_codes::SUCCESS)
}

fn run_config_action(action: ConfigAction, config_path: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(config_path.as_deref());
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                ::dirs::config_dir().map(|p| p.join("sbom-doc").display().to_string()),
                ::dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order, after the git root):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in config::CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match config::discover_config_file(config_path.as_deref()) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".sbom-doc.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(())
}
