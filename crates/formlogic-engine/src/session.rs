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

//! Session orchestration
//!
//! One [`FormSession`] per open form instance: it owns the form, the
//! compiled rule context, and the previous visibility map, and runs the
//! visibility, prune, validate sequence as one atomic step per answer-set
//! change. Interleaving answer mutations between the phases is undefined;
//! the session assumes a single, externally serialized stream of answer
//! snapshots.

use formlogic_core::{AnswerSet, Result};

use crate::context::{RuleContext, TemplatePolicy};
use crate::prune::prune_hidden;
use crate::question::Form;
use crate::validation::{ValidationResult, run_validation};
use crate::visibility::{VisibilityMap, compute_visibility, skip_set};

/// The outputs of one recomputation cycle
#[derive(Debug, Clone)]
pub struct RecomputeOutcome {
    /// Visibility for every question in the form
    pub visibility: VisibilityMap,
    /// Field and form errors for the pruned answer set
    pub validation: ValidationResult,
}

impl RecomputeOutcome {
    /// Whether submission must be blocked for this answer set
    pub fn blocks_submission(&self) -> bool {
        self.validation.blocks_submission()
    }
}

/// Orchestrates recomputation cycles for one respondent's open form
#[derive(Debug)]
pub struct FormSession {
    form: Form,
    context: RuleContext,
    previous: VisibilityMap,
}

impl FormSession {
    /// Compile the form's expressions and open a session
    pub fn new(form: Form, policy: TemplatePolicy) -> Result<FormSession> {
        let context = RuleContext::build(&form, policy)?;
        Ok(FormSession {
            form,
            context,
            previous: VisibilityMap::new(),
        })
    }

    /// Run one visibility, prune, validate cycle over the answer set
    ///
    /// `answers` is mutated in place: questions that just became hidden
    /// have their variables removed before validation runs, so the map
    /// left behind is exactly what should be persisted as the draft.
    pub fn recompute(&mut self, answers: &mut AnswerSet) -> RecomputeOutcome {
        let visibility = compute_visibility(&self.form, &self.context, answers);
        prune_hidden(&self.form, &self.previous, &visibility, answers);
        let validation = run_validation(&self.form, answers, &self.context, &skip_set(&visibility));
        self.previous = visibility.clone();
        RecomputeOutcome { visibility, validation }
    }

    /// The form this session is bound to
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// The compiled rule context
    pub fn context(&self) -> &RuleContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Question, QuestionKind};
    use formlogic_core::Value;
    use pretty_assertions::assert_eq;

    fn text(id: &str, variable: &str) -> Question {
        Question::new(id, QuestionKind::Text { min_length: None, max_length: None })
            .with_variable(variable)
    }

    fn answers(json: serde_json::Value) -> AnswerSet {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn toggling_away_prunes_the_dependent_answer() {
        let form = Form::new(vec![
            text("toggle_q", "toggle"),
            text("dep_q", "dependent").show_when("$toggle == 'show'"),
        ]);
        let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();

        let mut ctx = answers(serde_json::json!({"toggle": "show", "dependent": "filled in"}));
        let outcome = session.recompute(&mut ctx);
        assert_eq!(outcome.visibility["dep_q"], true);
        assert!(ctx.contains_key("dependent"));

        ctx.insert("toggle".into(), Value::from("hide"));
        let outcome = session.recompute(&mut ctx);
        assert_eq!(outcome.visibility["dep_q"], false);
        assert!(!ctx.contains_key("dependent"));
    }

    #[test]
    fn hidden_questions_do_not_validate() {
        let form = Form::new(vec![
            text("toggle_q", "toggle"),
            Question::new("dep_q", QuestionKind::Text { min_length: None, max_length: None })
                .with_variable("dependent")
                .required()
                .show_when("$toggle == 'show'"),
        ]);
        let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();

        let mut ctx = answers(serde_json::json!({}));
        let outcome = session.recompute(&mut ctx);
        assert!(!outcome.blocks_submission());

        ctx.insert("toggle".into(), Value::from("show"));
        let outcome = session.recompute(&mut ctx);
        assert!(outcome.blocks_submission());
        assert_eq!(outcome.validation.errors_for("dep_q").len(), 1);
    }

    #[test]
    fn strict_sessions_reject_broken_forms() {
        let form = Form::new(vec![
            Question::new("q", QuestionKind::Text { min_length: None, max_length: None })
                .show_when("$a ?? $b"),
        ]);
        assert!(FormSession::new(form, TemplatePolicy::Strict).is_err());
    }
}
