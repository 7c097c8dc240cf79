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

//! Compilation results as data
//!
//! [`compile`] never returns `Err` and never panics: a failed compile is a
//! value carrying a stable reason code plus diagnostics, so authoring
//! tools can render many failures at once and runtime callers can degrade
//! a single expression without aborting the question tree it belongs to.

use std::fmt;

use formlogic_ast::{ExpressionNode, VariadicOperator};
use formlogic_diagnostics::{Diagnostic, DiagnosticCode};

use crate::pratt::PrattParser;

/// Warning recorded when `===` is downgraded to `==`
pub const DOWNGRADE_WARNING: &str = "operator=== downgraded to ==";

/// Warning recorded when the `variable || 0` defaulting idiom is detected
pub const FALLBACK_WARNING: &str = "fallback pattern 'variable || 0' detected";

/// Stable failure classification
///
/// Callers branch on this code and must never need to match on the
/// `detail` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// General syntax failure
    ParseError,
    /// Leftover input after a complete expression
    TrailingTokens,
    /// A recognized operator spelling outside the supported set
    UnsupportedOperator,
    /// A bracket index other than literal zero
    UnsupportedIndex,
    /// A character matching no lexeme class
    UnexpectedCharacter,
}

impl FailureReason {
    /// Stable string form of this reason code
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureReason::ParseError => "parse_error",
            FailureReason::TrailingTokens => "trailing_tokens",
            FailureReason::UnsupportedOperator => "unsupported_operator",
            FailureReason::UnsupportedIndex => "unsupported_index",
            FailureReason::UnexpectedCharacter => "unexpected_character",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully compiled expression
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompiledExpression {
    /// The expression source text as authored
    pub source: String,
    /// The compiled operator tree
    pub tree: ExpressionNode,
    /// Advisory warnings; never alter evaluation semantics
    pub warnings: Vec<String>,
}

impl CompiledExpression {
    /// Diagnostic view of the advisory warnings, for authoring tools that
    /// render inline feedback next to the expression being edited
    pub fn warning_diagnostics(&self) -> Vec<Diagnostic> {
        self.warnings
            .iter()
            .map(|warning| {
                let code = if warning == DOWNGRADE_WARNING {
                    DiagnosticCode::OperatorDowngraded
                } else {
                    DiagnosticCode::FallbackPattern
                };
                Diagnostic::warning(code, warning.clone())
            })
            .collect()
    }
}

/// A failed compilation, captured as data
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompilationFailure {
    /// The expression source text as authored
    pub source: String,
    /// Stable reason code for programmatic branching
    pub reason: FailureReason,
    /// Human-readable failure description
    pub detail: String,
    /// Diagnostic entries for tooling display
    pub issues: Vec<Diagnostic>,
}

/// Outcome of compiling one expression string
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompilationResult {
    /// The expression compiled; warnings may still be present
    Success(CompiledExpression),
    /// The expression did not compile
    Failure(CompilationFailure),
}

impl CompilationResult {
    /// The compiled tree, when compilation succeeded
    pub fn tree(&self) -> Option<&ExpressionNode> {
        match self {
            CompilationResult::Success(ok) => Some(&ok.tree),
            CompilationResult::Failure(_) => None,
        }
    }

    /// The failure record, when compilation failed
    pub fn failure(&self) -> Option<&CompilationFailure> {
        match self {
            CompilationResult::Success(_) => None,
            CompilationResult::Failure(failure) => Some(failure),
        }
    }

    /// Whether compilation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, CompilationResult::Success(_))
    }

    /// Convert into the success record, discarding failures
    pub fn into_success(self) -> Option<CompiledExpression> {
        match self {
            CompilationResult::Success(ok) => Some(ok),
            CompilationResult::Failure(_) => None,
        }
    }
}

/// Append a warning unless an identical one is already recorded
pub fn push_unique_warning(warnings: &mut Vec<String>, warning: &str) {
    if !warnings.iter().any(|existing| existing == warning) {
        warnings.push(warning.to_string());
    }
}

/// Compile one expression string into an operator tree
///
/// All failures are returned as data; this function never panics on
/// untrusted author input.
pub fn compile(source: &str) -> CompilationResult {
    match PrattParser::new(source).parse() {
        Ok((tree, mut warnings)) => {
            if has_zero_fallback(&tree) {
                push_unique_warning(&mut warnings, FALLBACK_WARNING);
            }
            log::trace!(
                "compiled expression ({} warning(s)): {source}",
                warnings.len()
            );
            CompilationResult::Success(CompiledExpression {
                source: source.to_string(),
                tree,
                warnings,
            })
        }
        Err(err) => {
            log::debug!("expression failed to compile ({}): {source}", err.reason());
            CompilationResult::Failure(CompilationFailure {
                source: source.to_string(),
                reason: err.reason(),
                detail: err.to_string(),
                issues: vec![err.to_diagnostic()],
            })
        }
    }
}

/// Detect the `variable || 0` defaulting idiom anywhere in the tree
///
/// Advisory only: the pattern is flagged for authors (it usually means a
/// numeric field is being defaulted) but the tree is left untouched.
fn has_zero_fallback(tree: &ExpressionNode) -> bool {
    let mut found = false;
    tree.walk(&mut |node| {
        if found {
            return;
        }
        if let ExpressionNode::Variadic(data) = node {
            if data.op == VariadicOperator::Or {
                found = data.operands.windows(2).any(|pair| {
                    pair[0].as_variable().is_some()
                        && pair[1].as_literal().is_some_and(|lit| lit.is_zero())
                });
            }
        }
    });
    found
}
