// Copyright 2025 FormLogic Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end flows through the public surface: compile, evaluate,
//! and full form sessions with visibility, pruning and validation.

use formlogic::{
    AnswerSet, CompilationResult, FailureReason, Form, FormSession, Question, QuestionKind,
    TemplatePolicy, Value, compile, evaluate,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn answers(json: serde_json::Value) -> AnswerSet {
    serde_json::from_value(json).unwrap()
}

fn text(id: &str, variable: &str) -> Question {
    Question::new(id, QuestionKind::Text { min_length: None, max_length: None })
        .with_variable(variable)
}

fn number(id: &str, variable: &str) -> Question {
    Question::new(id, QuestionKind::Number { minimum: None, maximum: None }).with_variable(variable)
}

#[test]
fn compilation_is_deterministic() {
    let source = "$a && ($b || 0) >= 2 + 3 * $c";
    let first = compile(source);
    let second = compile(source);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn repeated_operators_flatten_to_one_node() {
    for source in ["$a && $b && $c", "$a || $b || $c"] {
        let compiled = compile(source);
        let json = serde_json::to_value(compiled.tree().unwrap()).unwrap();
        let operands = &json["variadic"]["operands"];
        assert_eq!(operands.as_array().unwrap().len(), 3, "source: {source}");
    }
}

#[rstest]
#[case("$foo[1]")]
#[case("$foo[2]")]
fn only_the_zero_index_is_accepted(#[case] source: &str) {
    assert!(compile("$foo[0]").is_success());
    match compile(source) {
        CompilationResult::Failure(failure) => {
            assert_eq!(failure.reason, FailureReason::UnsupportedIndex);
            assert!(failure.detail.contains("zero index"), "{}", failure.detail);
        }
        CompilationResult::Success(_) => panic!("{source} should not compile"),
    }
}

#[test]
fn strict_equality_downgrades_with_a_warning() {
    let strict = compile("$x === 1");
    let loose = compile("$x == 1");
    assert_eq!(
        serde_json::to_value(strict.tree().unwrap()).unwrap(),
        serde_json::to_value(loose.tree().unwrap()).unwrap()
    );
    match strict {
        CompilationResult::Success(compiled) => {
            assert!(compiled.warnings.contains(&"operator=== downgraded to ==".to_string()));
        }
        CompilationResult::Failure(failure) => panic!("unexpected failure: {failure:?}"),
    }
}

#[rstest]
#[case(serde_json::json!({}), true)]
#[case(serde_json::json!({"patient_census": 5, "bedside": 2, "hallway": 2}), true)]
#[case(serde_json::json!({"patient_census": 3, "bedside": 2, "hallway": 2}), false)]
fn census_expression_round_trip(#[case] ctx: serde_json::Value, #[case] expected: bool) {
    let compiled = compile("$patient_census >= ($bedside || 0) + ($hallway || 0)");
    let tree = compiled.tree().expect("expression should compile");

    // A stored tree must survive serialization and evaluate identically
    let stored = serde_json::to_string(tree).unwrap();
    let reloaded: formlogic::ExpressionNode = serde_json::from_str(&stored).unwrap();

    assert_eq!(evaluate(tree, &answers(ctx.clone())), Value::Bool(expected));
    assert_eq!(evaluate(&reloaded, &answers(ctx)), Value::Bool(expected));
}

#[test]
fn broken_show_when_stays_hidden_for_every_answer_set() {
    let form = Form::new(vec![
        text("free", "anything"),
        text("guarded", "guarded_answer").show_when("$a ?? $b"),
    ]);
    let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();
    for ctx in [
        serde_json::json!({}),
        serde_json::json!({"a": 1, "b": 1}),
        serde_json::json!({"a": "anything at all"}),
    ] {
        let mut ctx = answers(ctx);
        let outcome = session.recompute(&mut ctx);
        assert_eq!(outcome.visibility["guarded"], false);
    }
}

#[test]
fn toggling_visibility_prunes_the_stale_answer() {
    let form = Form::new(vec![
        text("toggle_q", "toggle"),
        text("dep_q", "dependent").show_when("$toggle == 'show'"),
    ]);
    let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();

    let mut ctx = answers(serde_json::json!({"toggle": "show"}));
    session.recompute(&mut ctx);

    ctx.insert("dependent".into(), Value::from("typed while visible"));
    let outcome = session.recompute(&mut ctx);
    assert_eq!(outcome.visibility["dep_q"], true);

    ctx.insert("toggle".into(), Value::from("hide"));
    let outcome = session.recompute(&mut ctx);
    assert_eq!(outcome.visibility["dep_q"], false);
    assert!(!ctx.contains_key("dependent"), "stale answer must be pruned");
}

#[test]
fn required_reports_exactly_one_error() {
    let form = Form::new(vec![
        Question::new("q1", QuestionKind::Text { min_length: Some(3), max_length: None })
            .with_variable("name")
            .required(),
    ]);
    let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();
    let mut ctx = answers(serde_json::json!({}));
    let outcome = session.recompute(&mut ctx);
    assert_eq!(outcome.validation.errors_for("q1").len(), 1);
    assert!(outcome.validation.errors_for("q1")[0].contains("required"));
    assert!(outcome.blocks_submission());
}

#[test]
fn cross_field_rule_mirrors_to_fields_and_form() {
    let form = Form::new(vec![
        number("total", "patient_census"),
        number("bed", "bedside"),
        number("hall", "hallway"),
    ]);
    let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();

    let mut ctx = answers(serde_json::json!({"patient_census": 5, "bedside": 3, "hallway": 3}));
    let outcome = session.recompute(&mut ctx);
    for id in ["total", "bed", "hall"] {
        assert_eq!(outcome.validation.errors_for(id).len(), 1);
    }
    assert_eq!(outcome.validation.form_errors.len(), 1);

    let mut ctx = answers(serde_json::json!({"patient_census": 6, "bedside": 3, "hallway": 3}));
    let outcome = session.recompute(&mut ctx);
    assert!(!outcome.blocks_submission());
}

#[test]
fn a_full_shift_report_session() {
    // A small but realistic template: a toggle, a guarded group with a
    // required field and a custom rule, and the census triple.
    let form = Form::new(vec![
        Question::new(
            "occurred",
            QuestionKind::Choice { options: vec!["yes".into(), "no".into()] },
        )
        .with_variable("sibr_occurred")
        .required(),
        Question::new(
            "details",
            QuestionKind::Group {
                questions: vec![
                    Question::new(
                        "team",
                        QuestionKind::Text { min_length: Some(2), max_length: None },
                    )
                    .with_variable("team_name")
                    .required(),
                    number("census_q", "patient_census")
                        .with_rule("$patient_census >= 0", "Census cannot be negative"),
                    number("bed_q", "bedside"),
                    number("hall_q", "hallway"),
                ],
            },
        )
        .show_when("$sibr_occurred == 'yes'"),
    ]);
    let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();

    // Nothing answered: only the top-level required field complains
    let mut ctx = answers(serde_json::json!({}));
    let outcome = session.recompute(&mut ctx);
    assert_eq!(outcome.visibility["details"], false);
    assert_eq!(outcome.validation.errors_for("occurred").len(), 1);
    assert!(outcome.validation.errors_for("team").is_empty());

    // Opening the group exposes its required field
    ctx.insert("sibr_occurred".into(), Value::from("yes"));
    let outcome = session.recompute(&mut ctx);
    assert_eq!(outcome.visibility["details"], true);
    assert_eq!(outcome.validation.errors_for("team").len(), 1);

    // Filling everything in cleanly unblocks submission
    ctx.insert("team_name".into(), Value::from("blue"));
    ctx.insert("patient_census".into(), Value::from(6i64));
    ctx.insert("bedside".into(), Value::from(3i64));
    ctx.insert("hallway".into(), Value::from(3i64));
    let outcome = session.recompute(&mut ctx);
    assert!(!outcome.blocks_submission());

    // Closing the group prunes its answers, census rule included
    ctx.insert("sibr_occurred".into(), Value::from("no"));
    let outcome = session.recompute(&mut ctx);
    assert!(!outcome.blocks_submission());
    for variable in ["team_name", "patient_census", "bedside", "hallway"] {
        assert!(!ctx.contains_key(variable), "{variable} should be pruned");
    }
    assert_eq!(ctx.keys().collect::<Vec<_>>(), ["sibr_occurred"]);
}
