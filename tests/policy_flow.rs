//! Drives the library the way an embedding host would: resolve the system
//! prompt once, then route every proposed statement through the gate.

use serde_json::json;

use defectql::agent::{FunctionCallSpec, GatedQuery, QueryOutcome, dispatch_calls, tool_declarations};
use defectql::policy::{Action, PolicyConfig, PolicyGate, Tier};
use defectql::prompts::builtin_registry;
use defectql::query::{QueryExecutor, QueryOutput, QueryResult};

struct RecordingExecutor {
    table_text: &'static str,
}

impl QueryExecutor for RecordingExecutor {
    fn run_query(&self, sql: &str) -> QueryResult<QueryOutput> {
        assert!(!sql.trim().is_empty(), "executor received a blank statement");
        Ok(QueryOutput {
            table_text: self.table_text.to_string(),
        })
    }
}

#[test]
fn session_start_resolves_prompt_then_gates_statements() {
    let registry = builtin_registry();
    let system_prompt = registry.resolve(None).expect("default prompt");
    assert!(system_prompt.contains("manufacturing_defect_dataset"));

    let session = GatedQuery::new(
        PolicyGate::new(PolicyConfig::default()),
        RecordingExecutor {
            table_text: "n_record | 3240",
        },
    );

    let outcome = session
        .execute("SELECT COUNT(*) AS n_record FROM predicting_manufacturing_defects.main.manufacturing_defect_dataset")
        .expect("execute");
    let QueryOutcome::Executed { decision, output } = outcome else {
        panic!("expected executed outcome");
    };
    assert_eq!(decision.tier, Tier::Read);
    assert_eq!(decision.action, Action::Admit);
    assert_eq!(output.table_text, "n_record | 3240");

    let outcome = session.execute("DELETE FROM m").expect("execute");
    let QueryOutcome::Refused { decision } = outcome else {
        panic!("expected refused outcome");
    };
    assert_eq!(decision.tier, Tier::Mutate);
    assert!(decision.reason.contains("allow_mutation"));
}

#[test]
fn permissive_session_admits_what_the_default_denies() {
    let permissive = GatedQuery::new(
        PolicyGate::new(PolicyConfig {
            allow_mutation: true,
            allow_destructive: true,
            require_limit_on_explore: true,
        }),
        RecordingExecutor { table_text: "ok" },
    );

    let outcome = permissive
        .execute("INSERT INTO m VALUES (1)")
        .expect("execute");
    assert!(matches!(outcome, QueryOutcome::Executed { .. }));

    // Destructive stays flagged even when enabled.
    let outcome = permissive.execute("DROP TABLE m").expect("execute");
    let QueryOutcome::Executed { decision, .. } = outcome else {
        panic!("expected executed outcome");
    };
    assert_eq!(decision.action, Action::Warn);
}

#[test]
fn dispatch_round_trip_matches_direct_session_use() {
    let session = GatedQuery::new(
        PolicyGate::new(PolicyConfig::default()),
        RecordingExecutor {
            table_text: "DefectRate | 0.27",
        },
    );

    let declarations = tool_declarations();
    assert_eq!(declarations.len(), 1);
    let tool_name = declarations[0].name.clone();

    let responses = dispatch_calls(&session, &[
        FunctionCallSpec {
            id: Some("c1".to_string()),
            name: tool_name.clone(),
            args_json: json!({"sql": "SELECT AVG(DefectRate) FROM m"}),
        },
        FunctionCallSpec {
            id: Some("c2".to_string()),
            name: tool_name,
            args_json: json!({"sql": "TRUNCATE m"}),
        },
    ]);

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].response_json["ok"], json!(true));
    assert_eq!(
        responses[0].response_json["result"]["table_text"],
        json!("DefectRate | 0.27")
    );
    assert_eq!(responses[1].response_json["ok"], json!(false));
    assert_eq!(
        responses[1].response_json["error"]["code"],
        json!("policy_denied")
    );
}

#[test]
fn named_prompts_resolve_verbatim_alongside_gating() {
    let mut registry = builtin_registry();
    registry
        .register("quality-review", "You audit supplier quality metrics.")
        .expect("register");

    assert_eq!(
        registry.resolve(Some("quality-review")).expect("resolve"),
        "You audit supplier quality metrics."
    );
    // The default is untouched by extra registrations.
    assert_eq!(registry.default_name(), Some("manufacturing-defects"));
}
