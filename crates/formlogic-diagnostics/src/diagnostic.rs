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

//! Core diagnostic types

use std::fmt;

/// Diagnostic severity levels
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory information that does not alter behavior
    #[default]
    Info,
    /// The expression compiled, but an author should review it
    Warning,
    /// Compilation failed; the expression degrades to its safe default
    Error,
}

/// Stable diagnostic codes
///
/// Callers branch on the code, never on message text; the set is closed
/// and additions are a compatibility event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// A character matched no lexeme class
    UnexpectedCharacter,
    /// A recognized operator spelling outside the supported set
    UnsupportedOperator,
    /// A bracket index other than literal zero
    UnsupportedIndex,
    /// Leftover input after a complete expression
    TrailingTokens,
    /// Any other syntax failure
    ParseError,
    /// Strict equality downgraded to loose equality
    OperatorDowngraded,
    /// The `variable || 0` defaulting idiom was detected
    FallbackPattern,
}

impl DiagnosticCode {
    /// Stable string form of this code, as shown to authoring tools
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::UnexpectedCharacter => "unexpected_character",
            DiagnosticCode::UnsupportedOperator => "unsupported_operator",
            DiagnosticCode::UnsupportedIndex => "unsupported_index",
            DiagnosticCode::TrailingTokens => "trailing_tokens",
            DiagnosticCode::ParseError => "parse_error",
            DiagnosticCode::OperatorDowngraded => "operator_downgraded",
            DiagnosticCode::FallbackPattern => "fallback_pattern",
        }
    }

    /// Default severity for this code
    pub const fn severity(self) -> Severity {
        match self {
            DiagnosticCode::OperatorDowngraded | DiagnosticCode::FallbackPattern => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// A single diagnostic entry for tooling display
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    /// Stable code for programmatic branching
    pub code: DiagnosticCode,
    /// Severity of this entry
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Byte offset into the expression source, when known
    pub position: Option<usize>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            position,
        }
    }

    /// Create an error-severity diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>, position: usize) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            position: Some(position),
        }
    }

    /// Create a warning-severity diagnostic without a position
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            position: None,
        }
    }

    /// Check if this entry is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(
                f,
                "[{}] {} at position {}: {}",
                self.severity, self.code, pos, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.severity, self.code, self.message),
        }
    }
}
