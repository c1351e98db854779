//! Lightweight statement scanning for classification purposes.
//!
//! This is deliberately not a SQL parser: the gate only needs the leading
//! keyword tokens, the projection shape, and whether a handful of clauses
//! appear outside of parentheses. The original statement text is never
//! rewritten; the tokens exist only so a decision can be made about it.

/// One scanned token. Word tokens are uppercased; quoted literals and
/// quoted identifiers are kept verbatim (quotes included) so their content
/// can never match a keyword. `depth` is the parenthesis nesting level the
/// token sits at, with 0 meaning top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) text: String,
    pub(crate) depth: usize,
}

/// Scans a statement into tokens, skipping whitespace, `--` line comments,
/// and `/* */` block comments (nested, per the DuckDB/Postgres dialect).
/// Returns an empty vector for input that contains only comments.
pub(crate) fn tokenize(statement: &str) -> Vec<Token> {
    let chars: Vec<char> = statement.chars().collect();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '-' && chars.get(i + 1) == Some(&'-') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if c == '/' && chars.get(i + 1) == Some(&'*') {
            let mut level = 1usize;
            i += 2;
            while i < chars.len() && level > 0 {
                if chars[i] == '/' && chars.get(i + 1) == Some(&'*') {
                    level += 1;
                    i += 2;
                } else if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    level -= 1;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            continue;
        }

        if c == '\'' || c == '"' {
            let quote = c;
            let start = i;
            i += 1;
            while i < chars.len() {
                if chars[i] == quote {
                    // A doubled quote is an escape, not a terminator.
                    if chars.get(i + 1) == Some(&quote) {
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                i += 1;
            }
            tokens.push(Token {
                text: chars[start..i].iter().collect(),
                depth,
            });
            continue;
        }

        if c.is_alphanumeric() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token {
                text: text.to_ascii_uppercase(),
                depth,
            });
            continue;
        }

        match c {
            '(' => {
                tokens.push(Token {
                    text: "(".to_string(),
                    depth,
                });
                depth += 1;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                tokens.push(Token {
                    text: ")".to_string(),
                    depth,
                });
            }
            other => tokens.push(Token {
                text: other.to_string(),
                depth,
            }),
        }
        i += 1;
    }

    tokens
}

pub(crate) fn token_text(tokens: &[Token], index: usize) -> Option<&str> {
    tokens.get(index).map(|token| token.text.as_str())
}

pub(crate) fn has_top_level_word(tokens: &[Token], word: &str) -> bool {
    tokens
        .iter()
        .any(|token| token.depth == 0 && token.text == word)
}

/// True when a leading-`SELECT` statement projects a bare or qualified star
/// (`SELECT *`, `SELECT DISTINCT *`, `SELECT m.*`).
pub(crate) fn is_star_projection(tokens: &[Token]) -> bool {
    let mut index = 1;
    if matches!(token_text(tokens, index), Some("DISTINCT" | "ALL")) {
        index += 1;
    }

    if token_text(tokens, index) == Some("*") {
        return true;
    }

    is_word(tokens, index)
        && token_text(tokens, index + 1) == Some(".")
        && token_text(tokens, index + 2) == Some("*")
}

fn is_word(tokens: &[Token], index: usize) -> bool {
    token_text(tokens, index).is_some_and(|text| {
        text.chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}
