pub mod agent;
pub mod cli;
pub mod config;
pub mod policy;
pub mod prompts;
pub mod query;
pub mod trace;

use anyhow::{Result, anyhow};
use std::fs;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use cli::{CliArgs, ShellState, run_shell};
use config::AppConfig;
use policy::PolicyGate;
use prompts::{PromptRegistry, builtin_registry};
use trace::SessionTrace;

pub fn run(args: CliArgs) -> Result<ExitCode> {
    let config = AppConfig::load_with_path(args.config.as_deref())?;
    let registry = build_registry(&config)?;
    let gate = PolicyGate::new(config.policy);

    if args.show_prompt {
        let body = registry
            .resolve(args.prompt.as_deref())
            .map_err(|err| anyhow!("Failed to resolve prompt: {err}"))?;
        println!("{body}");
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(statement) = args.check.as_deref() {
        let decision = gate
            .classify(statement)
            .map_err(|err| anyhow!("Failed to classify statement: {err}"))?;
        println!("[{}/{}] {}", decision.tier, decision.action, decision.reason);
        return Ok(if decision.action.allows_execution() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(2)
        });
    }

    // Resolve once up front so a bad --prompt fails before the shell starts.
    registry
        .resolve(args.prompt.as_deref())
        .map_err(|err| anyhow!("Failed to resolve prompt: {err}"))?;

    let session_id = generate_session_id();
    let trace = SessionTrace::create(&session_id)?;
    if let Some(name) = args.prompt.as_deref().or(registry.default_name()) {
        trace.log_prompt(name);
    }

    let mut state = ShellState {
        registry,
        gate,
        prompt_name: args.prompt,
        trace,
    };
    run_shell(&mut state)?;
    Ok(ExitCode::SUCCESS)
}

fn build_registry(config: &AppConfig) -> Result<PromptRegistry> {
    let mut registry = builtin_registry();

    for (name, path) in &config.prompt_files {
        let body = fs::read_to_string(path).map_err(|err| {
            anyhow!(
                "Failed to load prompt file {}: unable to read file: {err}",
                path.display()
            )
        })?;
        registry
            .register(name.as_str(), body)
            .map_err(|err| anyhow!("Failed to register prompt '{name}': {err}"))?;
    }

    if let Some(name) = &config.prompt {
        registry
            .set_default(name)
            .map_err(|err| anyhow!("Failed to select default prompt: {err}"))?;
    }

    Ok(registry)
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}
