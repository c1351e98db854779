use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::cli::commands::{Command, HELP_TEXT, is_command_line, parse_command};
use crate::policy::PolicyGate;
use crate::prompts::PromptRegistry;
use crate::trace::SessionTrace;

pub struct ShellState {
    pub registry: PromptRegistry,
    pub gate: PolicyGate,
    /// Explicit prompt selection; `None` means the registry default.
    pub prompt_name: Option<String>,
    pub trace: SessionTrace,
}

pub fn run_shell(state: &mut ShellState) -> Result<()> {
    println!("defectql policy shell. End statements with ';'. /help lists commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut buffer = String::new();

    loop {
        print_input_marker(buffer.is_empty())?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let trimmed = line.trim();

        if buffer.is_empty() {
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
                break;
            }
            if is_command_line(trimmed) {
                match parse_command(trimmed) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle_command(state, &command),
                    Err(err) => println!("error: {}", err.message()),
                }
                continue;
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');
        if trimmed.ends_with(';') {
            let statement = buffer.trim().to_string();
            buffer.clear();
            check_statement(state, &statement);
        }
    }

    Ok(())
}

fn print_input_marker(fresh: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(if fresh { b"sql> " } else { b"...> " })?;
    stdout.flush()?;
    Ok(())
}

fn check_statement(state: &ShellState, statement: &str) {
    state.trace.log_statement(statement);
    match state.gate.classify(statement) {
        Ok(decision) => {
            state.trace.log_decision(&decision);
            println!("[{}/{}] {}", decision.tier, decision.action, decision.reason);
        }
        Err(err) => println!("error: {err}"),
    }
}

fn handle_command(state: &ShellState, command: &Command) {
    match command {
        Command::Help => println!("{HELP_TEXT}"),
        Command::Prompt(name) => {
            let requested = name.as_deref().or(state.prompt_name.as_deref());
            match state.registry.resolve(requested) {
                Ok(body) => println!("{body}"),
                Err(err) => println!("error: {err}"),
            }
        }
        Command::Prompts => {
            for name in state.registry.names() {
                let marker = if state.registry.default_name() == Some(name) {
                    "* "
                } else {
                    "  "
                };
                println!("{marker}{name}");
            }
        }
        Command::Policy => {
            let config = state.gate.config();
            println!("allow_mutation = {}", config.allow_mutation);
            println!("allow_destructive = {}", config.allow_destructive);
            println!(
                "require_limit_on_explore = {}",
                config.require_limit_on_explore
            );
        }
        Command::Trace => println!("{}", state.trace.file_path().display()),
        Command::Quit => {}
    }
}
