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

//! Stale-answer pruning
//!
//! When a question's visibility flips from visible to hidden between two
//! recomputations, its answer must not linger: a stale value could be
//! submitted despite being invisible to the respondent, or spuriously
//! satisfy a rule that references it. Pruning removes the variable of
//! every newly hidden question, and for composites every variable
//! reachable under them, before the next validation pass.

use formlogic_core::AnswerSet;

use crate::question::{Form, Question};
use crate::visibility::VisibilityMap;

/// Remove answers of questions that just transitioned visible to hidden
///
/// Only a true transition prunes: a question with no entry in `previous`
/// (the first recomputation) is left alone.
pub fn prune_hidden(
    form: &Form,
    previous: &VisibilityMap,
    current: &VisibilityMap,
    answers: &mut AnswerSet,
) {
    for question in &form.questions {
        visit(question, previous, current, answers);
    }
}

fn visit(
    question: &Question,
    previous: &VisibilityMap,
    current: &VisibilityMap,
    answers: &mut AnswerSet,
) {
    let id = &question.meta.id;
    let was_visible = previous.get(id).copied() == Some(true);
    let now_hidden = current.get(id).copied() == Some(false);
    if was_visible && now_hidden {
        let mut variables = Vec::new();
        collect_variables(question, &mut variables);
        for variable in variables {
            if answers.shift_remove(variable).is_some() {
                log::debug!("pruned stale answer '{variable}' under hidden question '{id}'");
            }
        }
        // Everything under this node is already pruned
        return;
    }
    for child in question.children() {
        visit(child, previous, current, answers);
    }
}

/// Every variable bound by this question or any question under it
fn collect_variables<'a>(question: &'a Question, out: &mut Vec<&'a str>) {
    if let Some(variable) = question.meta.variable.as_deref() {
        out.push(variable);
    }
    for child in question.children() {
        collect_variables(child, out);
    }
}
