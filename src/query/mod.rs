use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tabular text returned by the host's query capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput {
    pub table_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    Engine(String),
    Unavailable(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(msg) => write!(f, "query engine error: {msg}"),
            Self::Unavailable(msg) => write!(f, "query capability unavailable: {msg}"),
        }
    }
}

impl Error for QueryError {}

pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// The single capability this crate consumes from its host: run one SQL
/// statement and return the result as tabular text. The database engine
/// behind it stays outside the crate; the policy gate only decides whether
/// a statement may be forwarded here.
pub trait QueryExecutor {
    fn run_query(&self, sql: &str) -> QueryResult<QueryOutput>;
}
