use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "defectql")]
#[command(
    about = "Policy-gated SQL assistant core for a manufacturing defects dataset",
    long_about = "Policy-gated SQL assistant core for a manufacturing defects dataset\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/defectql/config.toml\n    2. ~/.config/defectql/config.toml\n\nWithout --show-prompt or --check, an interactive check shell starts."
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use this prompt name instead of the configured default.
    #[arg(long, value_name = "NAME")]
    pub prompt: Option<String>,

    /// Print the resolved system prompt and exit.
    #[arg(long)]
    pub show_prompt: bool,

    /// Classify one SQL statement and exit; status 2 means denied.
    #[arg(long, value_name = "SQL")]
    pub check: Option<String>,
}
