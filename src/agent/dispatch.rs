use serde_json::{Value, json};

use crate::agent::session::{GatedQuery, QueryOutcome};
use crate::policy::{PolicyDecision, PolicyError};
use crate::query::QueryExecutor;

/// One tool call proposed by the assistant, as forwarded by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallSpec {
    pub id: Option<String>,
    pub name: String,
    pub args_json: Value,
}

/// A tool the host advertises to the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters_json_schema: Value,
}

/// The envelope returned for one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub id: Option<String>,
    pub name: String,
    pub response_json: Value,
}

pub fn tool_declarations() -> Vec<ToolDeclaration> {
    vec![ToolDeclaration {
        name: "query".to_string(),
        description: "Run a SQL statement against the manufacturing defects database and return \
                      the result as tabular text"
            .to_string(),
        parameters_json_schema: json!({
            "type": "object",
            "properties": {
                "sql": {
                    "type": "string",
                    "description": "The SQL statement to run (DuckDB dialect)"
                }
            },
            "required": ["sql"]
        }),
    }]
}

pub fn dispatch_calls<E: QueryExecutor>(
    session: &GatedQuery<E>,
    calls: &[FunctionCallSpec],
) -> Vec<ToolResponse> {
    calls
        .iter()
        .map(|call| ToolResponse {
            id: call.id.clone(),
            name: call.name.clone(),
            response_json: dispatch_one(session, call),
        })
        .collect()
}

fn dispatch_one<E: QueryExecutor>(session: &GatedQuery<E>, call: &FunctionCallSpec) -> Value {
    match call.name.as_str() {
        "query" => dispatch_query(session, call),
        _ => json!({
            "ok": false,
            "error": {
                "code": "unknown_function",
                "message": format!("unknown function: {}", call.name),
                "details": {}
            }
        }),
    }
}

fn dispatch_query<E: QueryExecutor>(session: &GatedQuery<E>, call: &FunctionCallSpec) -> Value {
    let Some(sql) = call.args_json.get("sql").and_then(Value::as_str) else {
        return json!({
            "ok": false,
            "error": {
                "code": "invalid_args",
                "message": "query requires a string 'sql' argument",
                "details": {
                    "args": call.args_json
                }
            }
        });
    };

    match session.execute(sql) {
        Ok(QueryOutcome::Executed { decision, output }) => json!({
            "ok": true,
            "result": {
                "table_text": output.table_text,
                "decision": decision_json(&decision)
            }
        }),
        Ok(QueryOutcome::Refused { decision }) => json!({
            "ok": false,
            "error": {
                "code": "policy_denied",
                "message": decision.reason.clone(),
                "details": {
                    "decision": decision_json(&decision)
                }
            }
        }),
        Ok(QueryOutcome::Failed { decision, error }) => json!({
            "ok": false,
            "error": {
                "code": "engine_error",
                "message": error.to_string(),
                "details": {
                    "decision": decision_json(&decision)
                }
            }
        }),
        Err(PolicyError::InvalidStatement(message)) => json!({
            "ok": false,
            "error": {
                "code": "invalid_statement",
                "message": message,
                "details": {}
            }
        }),
    }
}

fn decision_json(decision: &PolicyDecision) -> Value {
    json!({
        "tier": decision.tier.as_str(),
        "action": decision.action.as_str(),
        "reason": decision.reason
    })
}
