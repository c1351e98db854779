#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Prompt(Option<String>),
    Prompts,
    Policy,
    Trace,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) const HELP_TEXT: &str = "Available commands:\n  /help             Show this command list\n  /prompt [name]    Show the active system prompt (or the named one)\n  /prompts          List registered prompt names\n  /policy           Show the active policy configuration\n  /trace            Show path to the current trace file\n  /quit             Exit the shell\n\nAnything else is buffered until a terminating ';' and then classified.";

pub(crate) fn parse_command(line: &str) -> Result<Command, ParseError> {
    if !line.starts_with('/') {
        return Err(ParseError::new("not a command"));
    }

    let trimmed = line.trim();
    if trimmed == "/" {
        return Err(ParseError::new("empty command. Try /help"));
    }

    let command_text = &trimmed[1..];
    let mut parts = command_text.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    if name.is_empty() {
        return Err(ParseError::new("empty command. Try /help"));
    }
    let rest = parts.next().map(str::trim).unwrap_or("");

    match name.as_str() {
        "help" => expect_no_args(rest, Command::Help, "usage: /help"),
        "prompt" => Ok(Command::Prompt(if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        })),
        "prompts" => expect_no_args(rest, Command::Prompts, "usage: /prompts"),
        "policy" => expect_no_args(rest, Command::Policy, "usage: /policy"),
        "trace" => expect_no_args(rest, Command::Trace, "usage: /trace"),
        "quit" | "exit" => expect_no_args(rest, Command::Quit, "usage: /quit"),
        _ => Err(ParseError::new(format!(
            "unknown command '/{name}'. Try /help"
        ))),
    }
}

pub(crate) fn is_command_line(line: &str) -> bool {
    line.starts_with('/')
}

fn expect_no_args(rest: &str, command: Command, usage: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::new(usage))
    }
}
