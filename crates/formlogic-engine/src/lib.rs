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

//! Validation and visibility engine for formlogic
//!
//! This crate understands question-tree shape: it compiles each question's
//! show-when and custom-rule expressions into a reusable [`RuleContext`],
//! computes a fully populated visibility map per answer set, validates
//! answers against built-in and author-defined rules, and prunes stale
//! answers when questions disappear. [`FormSession`] ties the phases into
//! one atomic recomputation cycle per answer-set change.

#![warn(missing_docs)]

pub mod context;
pub mod prune;
pub mod question;
pub mod session;
pub mod validation;
pub mod visibility;

// Re-export main types
pub use context::{CompiledRule, RuleContext, ShowWhen, TemplatePolicy};
pub use prune::prune_hidden;
pub use question::{CustomRule, Form, Question, QuestionKind, QuestionMeta};
pub use session::{FormSession, RecomputeOutcome};
pub use validation::{ValidationResult, run_validation};
pub use visibility::{VisibilityMap, compute_visibility, skip_set};

// Re-export from workspace crates for convenience
pub use formlogic_core::{AnswerSet, FormLogicError, Value};
