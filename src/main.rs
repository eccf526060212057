// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use ormext::app_config::{ExtensionConfig, LogLevel};
use ormext::uploadable::EntityKeymaker;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the storage key an uploaded file would get
    Key(KeyArgs),

    /// Validate a configuration file and print it with defaults filled in
    CheckConfig {
        /// Configuration file path
        #[arg(value_name = "CONFIG_PATH")]
        config_path: PathBuf,
    },

    /// Write a default configuration file
    InitConfig {
        /// Configuration file path
        #[arg(value_name = "CONFIG_PATH", default_value = "ormext.json")]
        config_path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions for ormext
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct KeyArgs {
    /// Entity class name
    #[arg(short = 'c', long)]
    class: String,

    /// File property of the entity
    #[arg(short, long)]
    property: String,

    /// Entity identifier
    #[arg(short, long)]
    id: String,

    /// Original name of the uploaded file
    #[arg(short, long)]
    name: String,

    /// Key pattern, overrides the configured one
    #[arg(long)]
    pattern: Option<String>,

    /// Configuration file path
    #[arg(long, env = "ORMEXT_CONFIG")]
    config_path: Option<PathBuf>,
}

/// ormext - translatable and uploadable entity behaviors
#[derive(Parser, Debug)]
#[command(name = "ormext")]
#[command(version)]
#[command(about = "Tools for the ormext entity behaviors")]
#[command(long_about = "Inspect ormext configuration and upload keys.

EXAMPLES:
    ormext key -c Article -p cover -i 42 -n photo.jpg   # Print an upload key
    ormext check-config ormext.json                       # Validate a config file
    ormext init-config                                    # Write ormext.json with defaults
    ormext completions bash > ormext.bash                 # Generate bash completions")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    let cli = CommandLineOptions::parse();
    let level = cli
        .log_level
        .clone()
        .map(LogLevel::from)
        .unwrap_or_default()
        .to_level_filter();

    if let Err(e) = CustomLogger::init(level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: CommandLineOptions) -> Result<()> {
    match cli.command {
        Commands::Key(args) => run_key(args),
        Commands::CheckConfig { config_path } => {
            let config = ExtensionConfig::from_file(&config_path)?;
            if cli.log_level.is_none() {
                log::set_max_level(config.log_level.to_level_filter());
            }
            info!("Configuration {} is valid", config_path.display());
            println!("{}", config.to_json_pretty()?);
            Ok(())
        }
        Commands::InitConfig { config_path, force } => write_default_config(&config_path, force),
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ormext", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_key(args: KeyArgs) -> Result<()> {
    let config = match &args.config_path {
        Some(path) => ExtensionConfig::from_file(path)?,
        None => ExtensionConfig::default(),
    };
    let keymaker: EntityKeymaker = config.uploadable.keymaker();
    debug!("Using key pattern {}", keymaker.default_pattern());

    let key = keymaker
        .render(
            &args.class,
            &args.property,
            &args.id,
            &args.name,
            args.pattern.as_deref(),
        )
        .context("Failed to create upload key")?;
    println!("{}", key);
    Ok(())
}

fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(anyhow!(
            "Config file {} already exists, use --force to overwrite",
            config_path.display()
        ));
    }

    let config_json = ExtensionConfig::default().to_json_pretty()?;
    std::fs::write(config_path, config_json)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    info!("Wrote default configuration to {}", config_path.display());
    Ok(())
}
