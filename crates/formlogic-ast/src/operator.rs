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

//! Operator enums for the expression operator tree
//!
//! Operators serialize as their surface symbols so that stored trees read
//! the same way the authored expressions did.

use std::fmt;

/// Variadic, flattenable operators
///
/// Repeated applications of the same associative operator collapse into a
/// single n-ary node with the operands spliced together, never a leaning
/// chain of pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VariadicOperator {
    /// Logical conjunction (`&&`)
    #[serde(rename = "&&")]
    And,
    /// Logical disjunction (`||`)
    #[serde(rename = "||")]
    Or,
    /// Addition (`+`)
    #[serde(rename = "+")]
    Add,
    /// Multiplication (`*`)
    #[serde(rename = "*")]
    Multiply,
}

/// Fixed-arity binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinaryOperator {
    /// Subtraction (`-`)
    #[serde(rename = "-")]
    Subtract,
    /// Division (`/`)
    #[serde(rename = "/")]
    Divide,
    /// Loose equality (`==`); strict `===` downgrades to this at compile time
    #[serde(rename = "==")]
    Equal,
    /// Greater than (`>`)
    #[serde(rename = ">")]
    GreaterThan,
    /// Less than (`<`)
    #[serde(rename = "<")]
    LessThan,
    /// Greater than or equal (`>=`)
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    /// Less than or equal (`<=`)
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

/// Unary prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum UnaryOperator {
    /// Logical negation (`!`), accepted only directly before a primary
    #[serde(rename = "!")]
    Not,
    /// Arithmetic negation, the one-operand form of `-`
    #[serde(rename = "-")]
    Negate,
}

impl VariadicOperator {
    /// Surface symbol for this operator
    pub const fn symbol(self) -> &'static str {
        match self {
            VariadicOperator::And => "&&",
            VariadicOperator::Or => "||",
            VariadicOperator::Add => "+",
            VariadicOperator::Multiply => "*",
        }
    }
}

impl BinaryOperator {
    /// Surface symbol for this operator
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Subtract => "-",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::LessThanOrEqual => "<=",
        }
    }
}

impl UnaryOperator {
    /// Surface symbol for this operator
    pub const fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
        }
    }
}

impl fmt::Display for VariadicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
