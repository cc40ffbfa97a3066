use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the highlighting service.
#[derive(Debug, Parser)]
#[command(
    name = "pygments-service",
    version,
    about = "Syntax highlighting microservice"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PYGMENTS_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the highlight and discovery endpoints.
    Serve(ServeArgs),
    /// List the bundled theme names and exit.
    Themes,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the theme used for inline styles.
    #[arg(long = "theme", value_name = "NAME")]
    pub theme: Option<String>,

    /// Toggle the `<div class="highlight">` wrapper around rendered output.
    #[arg(
        long = "render-wrap-div",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub wrap_div: Option<bool>,
}
