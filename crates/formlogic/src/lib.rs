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

//! Dynamic-form logic in Rust
//!
//! The logic layer of a form-definition platform: a restricted expression
//! language compiled into serializable operator trees, a pure evaluator
//! over flat answer sets, and a validation/visibility engine that keeps
//! answers consistent as questions appear and disappear.
//!
//! ```
//! use formlogic::{FormSession, Form, Question, QuestionKind, TemplatePolicy, AnswerSet};
//!
//! let form = Form::new(vec![
//!     Question::new("q1", QuestionKind::Text { min_length: None, max_length: None })
//!         .with_variable("toggle"),
//!     Question::new("q2", QuestionKind::Text { min_length: None, max_length: None })
//!         .with_variable("detail")
//!         .show_when("$toggle == 'show'"),
//! ]);
//! let mut session = FormSession::new(form, TemplatePolicy::Lenient).unwrap();
//! let mut answers = AnswerSet::new();
//! let outcome = session.recompute(&mut answers);
//! assert!(!outcome.visibility["q2"]);
//! ```

// Import workspace crates
pub use formlogic_ast as ast;
pub use formlogic_core as core;
pub use formlogic_diagnostics as diagnostics;
pub use formlogic_engine as engine;
pub use formlogic_evaluator as evaluator;
pub use formlogic_parser as parser;

// Primary surface
pub use formlogic_engine::{
    CompiledRule, CustomRule, Form, FormSession, Question, QuestionKind, QuestionMeta,
    RecomputeOutcome, RuleContext, ShowWhen, TemplatePolicy, ValidationResult, VisibilityMap,
    compute_visibility, prune_hidden, run_validation, skip_set,
};

// Re-export from workspace crates
pub use formlogic_ast::{
    BinaryOpData, BinaryOperator, ExpressionNode, LiteralValue, UnaryOperator, VariadicOpData,
    VariadicOperator,
};
pub use formlogic_core::{AnswerSet, FormLogicError, Result, Value};
pub use formlogic_diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use formlogic_evaluator::{evaluate, evaluate_truthy, resolve_path};
pub use formlogic_parser::{
    CompilationFailure, CompilationResult, CompiledExpression, FailureReason, compile,
};
