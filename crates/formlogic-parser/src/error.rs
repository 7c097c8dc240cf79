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

//! Parse errors with stable failure classification
//!
//! The taxonomy is exhaustive and stable: callers branch on
//! [`FailureReason`](crate::result::FailureReason), never on message text.

use formlogic_diagnostics::{Diagnostic, DiagnosticCode};
use thiserror::Error;

use crate::result::FailureReason;

/// Result type alias for tokenizer and parser internals
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Internal parse failure, carried until `compile` converts it into a
/// [`CompilationFailure`](crate::result::CompilationFailure)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character matched no lexeme class
    #[error("unexpected character '{ch}'")]
    UnexpectedCharacter {
        /// The offending character
        ch: char,
        /// Byte offset into the source
        position: usize,
    },

    /// A recognized operator spelling that the expression language does not
    /// support (e.g. `=`, `!=`, single `&` or `|`)
    #[error("unsupported operator '{symbol}'")]
    UnsupportedOperator {
        /// The operator spelling as written
        symbol: String,
        /// Byte offset into the source
        position: usize,
    },

    /// A bracket index other than literal zero
    #[error("only zero index supported, found '{found}'")]
    UnsupportedIndex {
        /// The index expression as written
        found: String,
        /// Byte offset into the source
        position: usize,
    },

    /// Leftover input after a complete expression
    #[error("trailing tokens after complete expression")]
    TrailingTokens {
        /// Byte offset of the first leftover token
        position: usize,
    },

    /// Any other syntax failure
    #[error("{message}")]
    Syntax {
        /// Human-readable description
        message: String,
        /// Byte offset into the source
        position: usize,
    },
}

impl ParseError {
    /// Create a general syntax error
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        ParseError::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Stable reason code for this failure
    pub fn reason(&self) -> FailureReason {
        match self {
            ParseError::UnexpectedCharacter { .. } => FailureReason::UnexpectedCharacter,
            ParseError::UnsupportedOperator { .. } => FailureReason::UnsupportedOperator,
            ParseError::UnsupportedIndex { .. } => FailureReason::UnsupportedIndex,
            ParseError::TrailingTokens { .. } => FailureReason::TrailingTokens,
            ParseError::Syntax { .. } => FailureReason::ParseError,
        }
    }

    /// Byte offset into the source where the failure was detected
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedCharacter { position, .. }
            | ParseError::UnsupportedOperator { position, .. }
            | ParseError::UnsupportedIndex { position, .. }
            | ParseError::TrailingTokens { position }
            | ParseError::Syntax { position, .. } => *position,
        }
    }

    /// Convert into a diagnostic entry for authoring tools
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self.reason() {
            FailureReason::UnexpectedCharacter => DiagnosticCode::UnexpectedCharacter,
            FailureReason::UnsupportedOperator => DiagnosticCode::UnsupportedOperator,
            FailureReason::UnsupportedIndex => DiagnosticCode::UnsupportedIndex,
            FailureReason::TrailingTokens => DiagnosticCode::TrailingTokens,
            FailureReason::ParseError => DiagnosticCode::ParseError,
        };
        Diagnostic::error(code, self.to_string(), self.position())
    }
}
