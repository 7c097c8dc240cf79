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

//! Question visibility
//!
//! Visibility runs standalone, without any dependency on validation: the
//! map it produces holds an entry for every node in the tree, and a broken
//! display condition hides its question rather than showing it, so a bad
//! expression can never flicker a question into view.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use formlogic_core::{AnswerSet, Value};
use formlogic_evaluator::evaluate_truthy;

use crate::context::{RuleContext, ShowWhen};
use crate::question::{Form, Question};

/// Per-question visibility, fully populated on every recomputation
pub type VisibilityMap = IndexMap<String, bool>;

/// Compute visibility for every question in the form
pub fn compute_visibility(
    form: &Form,
    context: &RuleContext,
    answers: &AnswerSet,
) -> VisibilityMap {
    let mut map = VisibilityMap::new();
    for question in &form.questions {
        visit(question, context, answers, &mut map);
    }
    map
}

fn visit(
    question: &Question,
    context: &RuleContext,
    answers: &AnswerSet,
    map: &mut VisibilityMap,
) {
    let visible = match context.condition(&question.meta.id) {
        None | Some(ShowWhen::Always) => true,
        Some(ShowWhen::Broken) => false,
        Some(ShowWhen::Legacy { variable, expected }) => answers
            .get(variable)
            .unwrap_or(&Value::Null)
            .loose_eq(expected),
        Some(ShowWhen::Tree(tree)) => evaluate_truthy(tree, answers),
    };
    map.insert(question.meta.id.clone(), visible);
    for child in question.children() {
        visit(child, context, answers, map);
    }
}

/// Derive the validation skip set from a visibility map
///
/// Only directly hidden identifiers appear here; descendants of a hidden
/// composite are skipped by the validation walk itself.
pub fn skip_set(visibility: &VisibilityMap) -> FxHashSet<String> {
    visibility
        .iter()
        .filter(|(_, visible)| !**visible)
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TemplatePolicy;
    use crate::question::{Question, QuestionKind};
    use pretty_assertions::assert_eq;

    fn text(id: &str) -> Question {
        Question::new(id, QuestionKind::Text { min_length: None, max_length: None })
    }

    fn answers(json: serde_json::Value) -> AnswerSet {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn every_node_gets_an_entry() {
        let form = Form::new(vec![
            text("q1"),
            Question::new(
                "g",
                QuestionKind::Group {
                    questions: vec![text("q2"), text("q3")],
                },
            ),
        ]);
        let context = RuleContext::build(&form, TemplatePolicy::Lenient).unwrap();
        let map = compute_visibility(&form, &context, &AnswerSet::new());
        assert_eq!(map.len(), 4);
        assert!(map.values().all(|visible| *visible));
    }

    #[test]
    fn compiled_conditions_follow_the_answers() {
        let form = Form::new(vec![
            text("toggle_q").with_variable("toggle"),
            text("dependent").show_when("$toggle == 'show'"),
        ]);
        let context = RuleContext::build(&form, TemplatePolicy::Lenient).unwrap();

        let map = compute_visibility(&form, &context, &answers(serde_json::json!({})));
        assert_eq!(map["dependent"], false);

        let map = compute_visibility(
            &form,
            &context,
            &answers(serde_json::json!({"toggle": "show"})),
        );
        assert_eq!(map["dependent"], true);
    }

    #[test]
    fn broken_conditions_fail_closed() {
        let form = Form::new(vec![text("q1").show_when("$a ?? $b")]);
        let context = RuleContext::build(&form, TemplatePolicy::Lenient).unwrap();
        for ctx in [serde_json::json!({}), serde_json::json!({"a": 1, "b": 1})] {
            let map = compute_visibility(&form, &context, &answers(ctx));
            assert_eq!(map["q1"], false);
        }
    }

    #[test]
    fn legacy_fallback_compares_loosely() {
        let form = Form::new(vec![text("q1").show_when("$count = 3")]);
        let context = RuleContext::build(&form, TemplatePolicy::Lenient).unwrap();

        // The widget may submit the count as a string
        let map = compute_visibility(&form, &context, &answers(serde_json::json!({"count": "3"})));
        assert_eq!(map["q1"], true);

        let map = compute_visibility(&form, &context, &answers(serde_json::json!({"count": 4})));
        assert_eq!(map["q1"], false);

        let map = compute_visibility(&form, &context, &answers(serde_json::json!({})));
        assert_eq!(map["q1"], false);
    }

    #[test]
    fn skip_set_collects_only_hidden_ids() {
        let mut map = VisibilityMap::new();
        map.insert("a".into(), true);
        map.insert("b".into(), false);
        map.insert("c".into(), false);
        let skip = skip_set(&map);
        assert_eq!(skip.len(), 2);
        assert!(skip.contains("b"));
        assert!(skip.contains("c"));
    }
}
