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

//! Expression compiler for formlogic
//!
//! This crate turns human-authored expression text into a serializable
//! operator tree. Compilation never raises: [`compile`] always returns a
//! [`CompilationResult`], carrying either the tree plus advisory warnings
//! or a structured failure with a stable reason code and diagnostics for
//! authoring tools.

#![warn(missing_docs)]

pub mod error;
pub mod pratt;
pub mod result;
pub mod tokenizer;

// Re-export main types
pub use error::{ParseError, ParseResult};
pub use pratt::PrattParser;
pub use result::{
    CompilationFailure, CompilationResult, CompiledExpression, FailureReason, compile,
};
pub use tokenizer::{Token, Tokenizer};

// Re-export from workspace crates for convenience
pub use formlogic_ast::{ExpressionNode, LiteralValue};
pub use formlogic_diagnostics::{Diagnostic, DiagnosticCode};
