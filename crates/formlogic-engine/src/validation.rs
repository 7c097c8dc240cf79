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

//! Answer validation
//!
//! Built-in checks run per leaf in a fixed order: a required-and-missing
//! answer short-circuits the remaining built-ins for that field with a
//! single message, then kind-specific bounds apply. Custom rules and the
//! cross-field census rule run afterwards. Hidden questions are excluded
//! from all checks, but the walk still recurses under them so a hidden
//! composite's descendants are skipped rather than orphaned.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use formlogic_core::{AnswerSet, Value};
use formlogic_evaluator::evaluate_truthy;

use crate::context::RuleContext;
use crate::question::{Form, Question, QuestionKind};

/// Message reported for a required question with no answer
pub const MSG_REQUIRED: &str = "This field is required";
/// Message reported when a numeric answer does not coerce to a number
pub const MSG_NOT_A_NUMBER: &str = "Must be a number";

/// Variable names the cross-field census rule binds to
pub const CENSUS_TOTAL: &str = "patient_census";
/// The bedside component of the census rule
pub const CENSUS_BEDSIDE: &str = "bedside";
/// The hallway component of the census rule
pub const CENSUS_HALLWAY: &str = "hallway";
/// Message reported when the census rule is violated
pub const MSG_CENSUS: &str =
    "Patient census must be at least the sum of bedside and hallway counts";

/// Field-level and form-level validation errors for one answer set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Errors attributable to a single question, keyed by identifier
    pub field_errors: IndexMap<String, Vec<String>>,
    /// Errors not attributable to a single question
    pub form_errors: Vec<String>,
}

impl ValidationResult {
    /// Whether submission must be blocked
    pub fn blocks_submission(&self) -> bool {
        !self.form_errors.is_empty() || self.field_errors.values().any(|list| !list.is_empty())
    }

    /// Errors recorded for one question
    pub fn errors_for(&self, question_id: &str) -> &[String] {
        self.field_errors
            .get(question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn push_field(&mut self, question_id: &str, message: impl Into<String>) {
        let message = message.into();
        let list = self.field_errors.entry(question_id.to_string()).or_default();
        if !list.contains(&message) {
            list.push(message);
        }
    }

    fn push_form(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.form_errors.contains(&message) {
            self.form_errors.push(message);
        }
    }
}

/// Validate one answer set against the form
///
/// `skip` holds the identifiers of hidden questions; a skipped node and
/// everything under it is excluded from both built-in and custom checks.
pub fn run_validation(
    form: &Form,
    answers: &AnswerSet,
    context: &RuleContext,
    skip: &FxHashSet<String>,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    let mut excluded = FxHashSet::default();

    for question in &form.questions {
        visit(question, answers, skip, false, &mut excluded, &mut result);
    }

    for rule in context.rules() {
        if excluded.contains(&rule.question_id) {
            continue;
        }
        if !evaluate_truthy(&rule.tree, answers) {
            result.push_field(&rule.question_id, rule.message.clone());
        }
    }

    census_rule(answers, context, &mut result);
    result
}

fn visit(
    question: &Question,
    answers: &AnswerSet,
    skip: &FxHashSet<String>,
    ancestor_skipped: bool,
    excluded: &mut FxHashSet<String>,
    result: &mut ValidationResult,
) {
    let id = &question.meta.id;
    let skipped = ancestor_skipped || skip.contains(id);
    if skipped {
        excluded.insert(id.clone());
    } else if !question.is_container() {
        check_builtins(question, answers, result);
    }
    for child in question.children() {
        visit(child, answers, skip, skipped, excluded, result);
    }
}

fn check_builtins(question: &Question, answers: &AnswerSet, result: &mut ValidationResult) {
    let id = &question.meta.id;
    let value = question
        .meta
        .variable
        .as_deref()
        .and_then(|variable| answers.get(variable))
        .unwrap_or(&Value::Null);

    if value.is_missing() {
        if question.meta.required {
            result.push_field(id, MSG_REQUIRED);
        }
        // Bound checks only apply to a present answer
        return;
    }

    match &question.kind {
        QuestionKind::Text { min_length, max_length } => {
            if let Some(text) = value.as_str() {
                let length = text.chars().count();
                if let Some(min) = min_length {
                    if length < *min {
                        result.push_field(id, format!("Must be at least {min} characters"));
                    }
                }
                if let Some(max) = max_length {
                    if length > *max {
                        result.push_field(id, format!("Must be at most {max} characters"));
                    }
                }
            }
        }
        QuestionKind::Number { minimum, maximum } => match value.as_finite_number() {
            None => result.push_field(id, MSG_NOT_A_NUMBER),
            Some(number) => {
                if let Some(min) = minimum {
                    if number < *min {
                        result.push_field(id, format!("Must be at least {min}"));
                    }
                }
                if let Some(max) = maximum {
                    if number > *max {
                        result.push_field(id, format!("Must be at most {max}"));
                    }
                }
            }
        },
        QuestionKind::MultiChoice { min_choices, max_choices, .. } => {
            if let Some(count) = value.selection_count() {
                if let Some(min) = min_choices {
                    if count < *min {
                        result.push_field(id, format!("Select at least {min} options"));
                    }
                }
                if let Some(max) = max_choices {
                    if count > *max {
                        result.push_field(id, format!("Select at most {max} options"));
                    }
                }
            }
        }
        QuestionKind::Choice { .. } => {}
        QuestionKind::Group { .. } | QuestionKind::Repeat { .. } => {}
    }
}

/// The one hard-coded cross-field invariant: when all three census
/// variables are bound in the tree, the total must cover both parts.
/// Violation mirrors one message onto all three fields and once into the
/// form-error list.
fn census_rule(answers: &AnswerSet, context: &RuleContext, result: &mut ValidationResult) {
    let owners: Option<Vec<&str>> = [CENSUS_TOTAL, CENSUS_BEDSIDE, CENSUS_HALLWAY]
        .into_iter()
        .map(|variable| context.owner_of(variable))
        .collect();
    let Some(owners) = owners else {
        return;
    };

    let number = |variable: &str| answers.get(variable).unwrap_or(&Value::Null).as_number();
    let total = number(CENSUS_TOTAL);
    let parts = number(CENSUS_BEDSIDE) + number(CENSUS_HALLWAY);
    if total >= parts {
        return;
    }

    log::debug!("census rule violated: total {total} < parts {parts}");
    for owner in owners {
        result.push_field(owner, MSG_CENSUS);
    }
    result.push_form(MSG_CENSUS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TemplatePolicy;
    use pretty_assertions::assert_eq;

    fn answers(json: serde_json::Value) -> AnswerSet {
        serde_json::from_value(json).unwrap()
    }

    fn validate(form: &Form, json: serde_json::Value) -> ValidationResult {
        let context = RuleContext::build(form, TemplatePolicy::Lenient).unwrap();
        run_validation(form, &answers(json), &context, &FxHashSet::default())
    }

    fn number_question(id: &str, variable: &str) -> Question {
        Question::new(id, QuestionKind::Number { minimum: None, maximum: None })
            .with_variable(variable)
    }

    #[test]
    fn required_short_circuits_the_bound_checks() {
        let form = Form::new(vec![
            Question::new("q1", QuestionKind::Text { min_length: Some(3), max_length: None })
                .with_variable("name")
                .required(),
        ]);
        for ctx in [
            serde_json::json!({}),
            serde_json::json!({"name": null}),
            serde_json::json!({"name": ""}),
        ] {
            let result = validate(&form, ctx);
            assert_eq!(result.errors_for("q1"), [MSG_REQUIRED]);
        }
    }

    #[test]
    fn text_length_bounds() {
        let form = Form::new(vec![
            Question::new("q1", QuestionKind::Text { min_length: Some(3), max_length: Some(5) })
                .with_variable("name"),
        ]);
        assert_eq!(
            validate(&form, serde_json::json!({"name": "ab"})).errors_for("q1"),
            ["Must be at least 3 characters"]
        );
        assert_eq!(
            validate(&form, serde_json::json!({"name": "abcdef"})).errors_for("q1"),
            ["Must be at most 5 characters"]
        );
        assert!(!validate(&form, serde_json::json!({"name": "abcd"})).blocks_submission());
        // Optional and missing: no error at all
        assert!(!validate(&form, serde_json::json!({})).blocks_submission());
    }

    #[test]
    fn numeric_bounds_and_the_not_a_number_message() {
        let form = Form::new(vec![
            Question::new("q1", QuestionKind::Number { minimum: Some(0.0), maximum: Some(10.0) })
                .with_variable("count"),
        ]);
        assert_eq!(
            validate(&form, serde_json::json!({"count": "many"})).errors_for("q1"),
            [MSG_NOT_A_NUMBER]
        );
        assert_eq!(
            validate(&form, serde_json::json!({"count": -1})).errors_for("q1"),
            ["Must be at least 0"]
        );
        assert_eq!(
            validate(&form, serde_json::json!({"count": 11})).errors_for("q1"),
            ["Must be at most 10"]
        );
        // String representation of a number is fine
        assert!(!validate(&form, serde_json::json!({"count": "7"})).blocks_submission());
    }

    #[test]
    fn choice_count_bounds() {
        let form = Form::new(vec![
            Question::new(
                "q1",
                QuestionKind::MultiChoice {
                    options: vec!["a".into(), "b".into(), "c".into()],
                    min_choices: Some(2),
                    max_choices: Some(2),
                },
            )
            .with_variable("picks"),
        ]);
        assert_eq!(
            validate(&form, serde_json::json!({"picks": ["a"]})).errors_for("q1"),
            ["Select at least 2 options"]
        );
        assert_eq!(
            validate(&form, serde_json::json!({"picks": ["a","b","c"]})).errors_for("q1"),
            ["Select at most 2 options"]
        );
        assert!(!validate(&form, serde_json::json!({"picks": ["a","b"]})).blocks_submission());
    }

    #[test]
    fn custom_rules_append_their_message_on_falsy_evaluation() {
        let form = Form::new(vec![
            number_question("q1", "age").with_rule("$age >= 18", "Must be an adult"),
        ]);
        let result = validate(&form, serde_json::json!({"age": 15}));
        assert_eq!(result.errors_for("q1"), ["Must be an adult"]);
        assert!(!validate(&form, serde_json::json!({"age": 30})).blocks_submission());
    }

    #[test]
    fn duplicate_messages_collapse() {
        let form = Form::new(vec![
            number_question("q1", "age")
                .with_rule("$age >= 18", "Must be an adult")
                .with_rule("$age > 17", "Must be an adult"),
        ]);
        let result = validate(&form, serde_json::json!({"age": 15}));
        assert_eq!(result.errors_for("q1"), ["Must be an adult"]);
    }

    #[test]
    fn skipped_questions_are_excluded_along_with_their_descendants() {
        let form = Form::new(vec![
            Question::new(
                "g",
                QuestionKind::Group {
                    questions: vec![
                        Question::new(
                            "q1",
                            QuestionKind::Text { min_length: None, max_length: None },
                        )
                        .with_variable("inner")
                        .required()
                        .with_rule("$inner == 'ok'", "inner rule"),
                    ],
                },
            ),
        ]);
        let context = RuleContext::build(&form, TemplatePolicy::Lenient).unwrap();
        let mut skip = FxHashSet::default();
        skip.insert("g".to_string());
        let result = run_validation(&form, &answers(serde_json::json!({})), &context, &skip);
        assert!(!result.blocks_submission());
    }

    #[test]
    fn census_rule_fires_only_when_violated() {
        let form = Form::new(vec![
            number_question("total", CENSUS_TOTAL),
            number_question("bed", CENSUS_BEDSIDE),
            number_question("hall", CENSUS_HALLWAY),
        ]);

        let result = validate(
            &form,
            serde_json::json!({"patient_census": 5, "bedside": 3, "hallway": 3}),
        );
        for id in ["total", "bed", "hall"] {
            assert_eq!(result.errors_for(id), [MSG_CENSUS]);
        }
        assert_eq!(result.form_errors, [MSG_CENSUS]);

        let result = validate(
            &form,
            serde_json::json!({"patient_census": 6, "bedside": 3, "hallway": 3}),
        );
        assert!(!result.blocks_submission());

        // Unanswered parts count as zero
        let result = validate(&form, serde_json::json!({}));
        assert!(!result.blocks_submission());
    }

    #[test]
    fn census_rule_needs_all_three_variables_bound() {
        let form = Form::new(vec![
            number_question("total", CENSUS_TOTAL),
            number_question("bed", CENSUS_BEDSIDE),
        ]);
        let result = validate(
            &form,
            serde_json::json!({"patient_census": 0, "bedside": 3}),
        );
        assert!(!result.blocks_submission());
    }
}
