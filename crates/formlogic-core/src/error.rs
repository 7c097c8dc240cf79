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

//! Error types for the formlogic engine
//!
//! Expression compilation failures are captured as data (see the parser
//! crate) and never surface through this type; the variants here cover
//! programmer-contract violations and template-authoring errors reported
//! under strict template policies.

use thiserror::Error;

/// Result type alias for formlogic operations
pub type Result<T> = std::result::Result<T, FormLogicError>;

/// Error type for contract violations and strict-mode template rejection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormLogicError {
    /// A question tree contains the same identifier more than once
    #[error("duplicate question identifier '{id}'")]
    DuplicateQuestionId {
        /// The identifier that appeared more than once
        id: String,
    },

    /// A group or repeat node carries a variable binding
    #[error("question '{id}': container questions cannot bind a variable")]
    ContainerBindsVariable {
        /// Identifier of the offending question
        id: String,
    },

    /// A conditional-display expression failed to compile under strict policy
    #[error("question '{id}': display condition failed to compile: {detail}")]
    BrokenCondition {
        /// Identifier of the question carrying the expression
        id: String,
        /// Compiler failure detail
        detail: String,
    },

    /// A custom-validation expression failed to compile under strict policy
    #[error("question '{id}': validation rule failed to compile: {detail}")]
    BrokenRule {
        /// Identifier of the question owning the rule
        id: String,
        /// Compiler failure detail
        detail: String,
    },
}
