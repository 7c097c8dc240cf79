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

//! Compiled rule context
//!
//! The context is derived once per form version: a depth-first walk that
//! registers each leaf's variable binding and compiles every show-when and
//! custom-rule expression up front. It is read-only after construction and
//! safe to share across concurrent visibility/validation passes over
//! different answer sets.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use formlogic_ast::ExpressionNode;
use formlogic_core::{FormLogicError, Result, Value};
use formlogic_parser::{CompilationResult, compile};

use crate::question::{Form, Question};

/// How [`RuleContext::build`] treats broken templates
///
/// The lenient policy reproduces the historical behavior: broken custom
/// rules are dropped, broken show-when expressions hide their question,
/// and structural mistakes are logged but tolerated. The strict policy
/// rejects the template instead, for deployments that validate at save
/// time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplatePolicy {
    /// Degrade silently at runtime
    #[default]
    Lenient,
    /// Reject broken templates at build time
    Strict,
}

/// A compiled conditional-display rule for one question
#[derive(Debug, Clone)]
pub enum ShowWhen {
    /// No expression; the question is always visible
    Always,
    /// The expression failed to compile; fail closed and hide
    Broken,
    /// Legacy literal-equality pattern rescued from an unparsable source
    Legacy {
        /// Variable whose answer is compared
        variable: String,
        /// Literal the answer must loosely equal
        expected: Value,
    },
    /// A compiled operator tree evaluated for truthiness
    Tree(ExpressionNode),
}

/// A compiled author-defined validation rule
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Identifier of the question owning the rule
    pub question_id: String,
    /// Message appended to the owning field on violation
    pub message: String,
    /// The compiled rule expression
    pub tree: ExpressionNode,
}

/// The precompiled, cacheable artifact derived from one form version
#[derive(Debug, Clone, Default)]
pub struct RuleContext {
    variable_owner: IndexMap<String, String>,
    conditions: FxHashMap<String, ShowWhen>,
    rules: Vec<CompiledRule>,
}

// Last-resort rescue for show-when sources the compiler rejects, seen in
// templates written before the expression language existed: a variable,
// one to three '=' signs, and a literal. Kept out of the compiler so its
// failure taxonomy stays exhaustive.
static LEGACY_EQUALITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\$([A-Za-z_][A-Za-z0-9_]*)\s*={1,3}\s*(.+?)\s*$")
        .expect("legacy equality pattern is valid")
});

impl RuleContext {
    /// Build the context for one form under the given policy
    ///
    /// Under [`TemplatePolicy::Lenient`] this never fails; under
    /// [`TemplatePolicy::Strict`] duplicate identifiers, variable bindings
    /// on containers, and uncompilable expressions are rejected.
    pub fn build(form: &Form, policy: TemplatePolicy) -> Result<RuleContext> {
        let mut context = RuleContext::default();
        let mut seen = FxHashSet::default();
        for question in &form.questions {
            context.register(question, policy, &mut seen)?;
        }
        log::debug!(
            "rule context built: {} variables, {} rules",
            context.variable_owner.len(),
            context.rules.len()
        );
        Ok(context)
    }

    fn register(
        &mut self,
        question: &Question,
        policy: TemplatePolicy,
        seen: &mut FxHashSet<String>,
    ) -> Result<()> {
        let id = &question.meta.id;
        if !seen.insert(id.clone()) {
            if policy == TemplatePolicy::Strict {
                return Err(FormLogicError::DuplicateQuestionId { id: id.clone() });
            }
            log::warn!("duplicate question identifier '{id}', keeping the first occurrence");
            return Ok(());
        }

        if let Some(variable) = &question.meta.variable {
            if question.is_container() {
                if policy == TemplatePolicy::Strict {
                    return Err(FormLogicError::ContainerBindsVariable { id: id.clone() });
                }
                log::warn!("question '{id}': ignoring variable binding on a container");
            } else {
                self.variable_owner.insert(variable.clone(), id.clone());
            }
        }

        if let Some(source) = &question.meta.show_when {
            let condition = match compile(source) {
                CompilationResult::Success(compiled) => ShowWhen::Tree(compiled.tree),
                CompilationResult::Failure(failure) => match legacy_equality(source) {
                    Some((variable, expected)) => {
                        log::debug!("question '{id}': legacy equality fallback on '{source}'");
                        ShowWhen::Legacy { variable, expected }
                    }
                    None => {
                        if policy == TemplatePolicy::Strict {
                            return Err(FormLogicError::BrokenCondition {
                                id: id.clone(),
                                detail: failure.detail,
                            });
                        }
                        log::warn!(
                            "question '{id}': display condition failed to compile ({}), hiding",
                            failure.detail
                        );
                        ShowWhen::Broken
                    }
                },
            };
            self.conditions.insert(id.clone(), condition);
        }

        for rule in &question.meta.rules {
            match compile(&rule.expression) {
                CompilationResult::Success(compiled) => self.rules.push(CompiledRule {
                    question_id: id.clone(),
                    message: rule.message.clone(),
                    tree: compiled.tree,
                }),
                CompilationResult::Failure(failure) => {
                    if policy == TemplatePolicy::Strict {
                        return Err(FormLogicError::BrokenRule {
                            id: id.clone(),
                            detail: failure.detail,
                        });
                    }
                    log::warn!(
                        "question '{id}': dropping validation rule that failed to compile ({})",
                        failure.detail
                    );
                }
            }
        }

        for child in question.children() {
            self.register(child, policy, seen)?;
        }
        Ok(())
    }

    /// The compiled display condition for a question, if it has one
    pub fn condition(&self, question_id: &str) -> Option<&ShowWhen> {
        self.conditions.get(question_id)
    }

    /// The identifier of the question binding a variable
    pub fn owner_of(&self, variable: &str) -> Option<&str> {
        self.variable_owner.get(variable).map(String::as_str)
    }

    /// All compiled custom rules in registration order
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Variable bindings in registration order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variable_owner
            .iter()
            .map(|(variable, id)| (variable.as_str(), id.as_str()))
    }
}

/// Parse the legacy `$var = literal` pattern, with one to three '=' signs
fn legacy_equality(source: &str) -> Option<(String, Value)> {
    let captures = LEGACY_EQUALITY.captures(source)?;
    let variable = captures[1].to_string();
    Some((variable, legacy_literal(&captures[2])))
}

fn legacy_literal(text: &str) -> Value {
    let trimmed = text.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return Value::String(trimmed[1..trimmed.len() - 1].to_string());
        }
    }
    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if let Ok(number) = trimmed.parse::<f64>() {
        return Value::Number(number);
    }
    // Bare words in legacy templates stand for themselves
    Value::String(trimmed.to_string())
}
