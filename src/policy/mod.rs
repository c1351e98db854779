mod normalize;

use std::error::Error;
use std::fmt::{Display, Formatter};

use normalize::{Token, has_top_level_word, is_star_projection, token_text, tokenize};

/// Policy classification bucket for one SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Read,
    Mutate,
    Destructive,
    Unrecognized,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Mutate => "mutate",
            Self::Destructive => "destructive",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host should do with the statement. `Warn` still permits
/// execution; only `Deny` refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Admit,
    Warn,
    Deny,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admit => "admit",
            Self::Warn => "warn",
            Self::Deny => "deny",
        }
    }

    pub fn allows_execution(self) -> bool {
        !matches!(self, Self::Deny)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub tier: Tier,
    pub action: Action,
    pub reason: String,
}

/// Policy knobs, bound once at gate construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyConfig {
    pub allow_mutation: bool,
    pub allow_destructive: bool,
    pub require_limit_on_explore: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_mutation: false,
            allow_destructive: false,
            require_limit_on_explore: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    InvalidStatement(String),
}

impl Display for PolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatement(msg) => write!(f, "invalid statement: {msg}"),
        }
    }
}

impl Error for PolicyError {}

pub type PolicyResult<T> = std::result::Result<T, PolicyError>;

enum StatementKind {
    Read { keyword: &'static str, explore: bool },
    DerivedCreation,
    Mutation { keyword: &'static str },
    Destructive { keyword: &'static str },
    Unrecognized { keyword: String },
}

/// Classifies SQL statements against an immutable [`PolicyConfig`].
///
/// Classification is a pure function of the statement text and the
/// configuration: it never executes the statement and holds no per-call
/// state, so one gate can serve parallel callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyGate {
    config: PolicyConfig,
}

impl PolicyGate {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> PolicyConfig {
        self.config
    }

    pub fn classify(&self, statement: &str) -> PolicyResult<PolicyDecision> {
        if statement.trim().is_empty() {
            return Err(PolicyError::InvalidStatement(
                "statement is empty".to_string(),
            ));
        }

        let tokens = tokenize(statement);
        if tokens.is_empty() {
            return Err(PolicyError::InvalidStatement(
                "statement contains only comments".to_string(),
            ));
        }

        Ok(match classify_tokens(&tokens) {
            StatementKind::Read { keyword, explore } => self.read_decision(&tokens, keyword, explore),
            StatementKind::DerivedCreation => PolicyDecision {
                tier: Tier::Read,
                action: Action::Admit,
                reason: "create-as-select admitted as read; derived objects do not modify base data"
                    .to_string(),
            },
            StatementKind::Mutation { keyword } => self.mutation_decision(keyword),
            StatementKind::Destructive { keyword } => self.destructive_decision(keyword),
            StatementKind::Unrecognized { keyword } => PolicyDecision {
                tier: Tier::Unrecognized,
                action: Action::Deny,
                reason: format!(
                    "unrecognized statement '{keyword}'; unclassified statements are denied"
                ),
            },
        })
    }

    fn read_decision(&self, tokens: &[Token], keyword: &'static str, explore: bool) -> PolicyDecision {
        let unbounded = explore
            && self.config.require_limit_on_explore
            && is_star_projection(tokens)
            && !has_top_level_word(tokens, "LIMIT")
            && !has_top_level_word(tokens, "FETCH")
            && !has_top_level_word(tokens, "GROUP");

        if unbounded {
            PolicyDecision {
                tier: Tier::Read,
                action: Action::Warn,
                reason: "unbounded SELECT * admitted with a warning; add a LIMIT or disable \
                         require_limit_on_explore"
                    .to_string(),
            }
        } else {
            PolicyDecision {
                tier: Tier::Read,
                action: Action::Admit,
                reason: format!("{keyword} statement admitted as read"),
            }
        }
    }

    fn mutation_decision(&self, keyword: &'static str) -> PolicyDecision {
        if self.config.allow_mutation {
            PolicyDecision {
                tier: Tier::Mutate,
                action: Action::Admit,
                reason: format!("{keyword} admitted by allow_mutation"),
            }
        } else {
            PolicyDecision {
                tier: Tier::Mutate,
                action: Action::Deny,
                reason: format!("{keyword} blocked by policy; enable allow_mutation to permit"),
            }
        }
    }

    fn destructive_decision(&self, keyword: &'static str) -> PolicyDecision {
        if self.config.allow_destructive {
            PolicyDecision {
                tier: Tier::Destructive,
                action: Action::Warn,
                reason: format!("destructive {keyword} admitted with a warning by allow_destructive"),
            }
        } else {
            PolicyDecision {
                tier: Tier::Destructive,
                action: Action::Deny,
                reason: format!(
                    "destructive {keyword} blocked by policy; enable allow_destructive to permit"
                ),
            }
        }
    }
}

fn classify_tokens(tokens: &[Token]) -> StatementKind {
    let first = token_text(tokens, 0).unwrap_or_default();
    match first {
        "SELECT" => StatementKind::Read {
            keyword: "SELECT",
            explore: true,
        },
        "WITH" => StatementKind::Read {
            keyword: "WITH",
            explore: false,
        },
        "EXPLAIN" => StatementKind::Read {
            keyword: "EXPLAIN",
            explore: false,
        },
        "DESCRIBE" => StatementKind::Read {
            keyword: "DESCRIBE",
            explore: false,
        },
        "SHOW" => StatementKind::Read {
            keyword: "SHOW",
            explore: false,
        },
        "INSERT" => StatementKind::Mutation { keyword: "INSERT" },
        "UPDATE" => StatementKind::Mutation { keyword: "UPDATE" },
        "DELETE" => StatementKind::Mutation { keyword: "DELETE" },
        "MERGE" => StatementKind::Mutation { keyword: "MERGE" },
        "DROP" => StatementKind::Destructive { keyword: "DROP" },
        "TRUNCATE" => StatementKind::Destructive {
            keyword: "TRUNCATE",
        },
        "ALTER" => StatementKind::Destructive { keyword: "ALTER" },
        "CREATE" => classify_create(tokens),
        other => StatementKind::Unrecognized {
            keyword: other.to_string(),
        },
    }
}

fn classify_create(tokens: &[Token]) -> StatementKind {
    let mut index = 1;
    if token_text(tokens, index) == Some("OR") && token_text(tokens, index + 1) == Some("REPLACE") {
        index += 2;
    }
    while matches!(
        token_text(tokens, index),
        Some("TEMP" | "TEMPORARY" | "GLOBAL" | "LOCAL")
    ) {
        index += 1;
    }

    match token_text(tokens, index) {
        Some("VIEW") => StatementKind::DerivedCreation,
        // CREATE TABLE is only a derived-dataset form when it carries a
        // top-level AS; a plain column-list definition falls through.
        Some("TABLE") if has_top_level_word(tokens, "AS") => StatementKind::DerivedCreation,
        _ => StatementKind::Unrecognized {
            keyword: "CREATE".to_string(),
        },
    }
}
