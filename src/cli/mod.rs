mod args;
mod commands;
mod repl;

pub use args::CliArgs;
pub use repl::{ShellState, run_shell};
