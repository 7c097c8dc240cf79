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

//! Expression operator-tree node definitions

use crate::operator::{BinaryOperator, UnaryOperator, VariadicOperator};
use smallvec::SmallVec;

/// Operand list for variadic nodes; most n-ary applications have few operands
pub type OperandList = SmallVec<[ExpressionNode; 4]>;

/// A node in the compiled operator tree
///
/// The tree is acyclic, finite-depth and fully self-contained: the only
/// outward references are variable paths resolved against the answer set at
/// evaluation time. Large variants are boxed to keep the enum small.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionNode {
    /// Literal value (number, string, boolean or null)
    Literal(LiteralValue),

    /// Variable reference: a dotted lookup path into the answer context
    /// (e.g. `sibr_occurred.0` reaches index 0 of a multi-valued answer)
    Variable(String),

    /// Unary prefix operation (`!` or arithmetic negation)
    Unary {
        /// The operator
        op: UnaryOperator,
        /// The operand
        operand: Box<ExpressionNode>,
    },

    /// Flattened n-ary operation; the operand list is never empty
    Variadic(Box<VariadicOpData>),

    /// Fixed-arity binary operation
    Binary(Box<BinaryOpData>),
}

/// Variadic operation data (separate struct to keep the enum small)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariadicOpData {
    /// The operator
    pub op: VariadicOperator,
    /// Operands in source order; invariant: non-empty
    pub operands: OperandList,
}

/// Binary operation data (separate struct to keep the enum small)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BinaryOpData {
    /// The operator
    pub op: BinaryOperator,
    /// Left operand
    pub left: ExpressionNode,
    /// Right operand
    pub right: ExpressionNode,
}

/// Literal values in form expressions
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// Null literal
    Null,
    /// Boolean literal
    Boolean(bool),
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
}

impl ExpressionNode {
    /// Create a literal node
    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a variable reference node
    pub fn variable(path: impl Into<String>) -> Self {
        Self::Variable(path.into())
    }

    /// Create a unary operation node
    pub fn unary(op: UnaryOperator, operand: ExpressionNode) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a variadic operation node from an operand list
    pub fn variadic(op: VariadicOperator, operands: impl Into<OperandList>) -> Self {
        Self::Variadic(Box::new(VariadicOpData {
            op,
            operands: operands.into(),
        }))
    }

    /// Create a binary operation node
    pub fn binary(op: BinaryOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Binary(Box::new(BinaryOpData { op, left, right }))
    }

    /// Combine two sides under a flattenable operator, splicing operand
    /// lists when either side already carries the same operator
    ///
    /// This is what turns `$a && $b && $c` into one three-operand node
    /// instead of a leaning chain. Construction is pure: both inputs are
    /// consumed and a fresh node is returned.
    pub fn combine_flattened(
        op: VariadicOperator,
        left: ExpressionNode,
        right: ExpressionNode,
    ) -> Self {
        let mut operands = OperandList::new();
        match left {
            ExpressionNode::Variadic(data) if data.op == op => operands.extend(data.operands),
            other => operands.push(other),
        }
        match right {
            ExpressionNode::Variadic(data) if data.op == op => operands.extend(data.operands),
            other => operands.push(other),
        }
        Self::variadic(op, operands)
    }

    /// Check if this node is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Get the variable path if this is a variable reference
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(path) => Some(path),
            _ => None,
        }
    }

    /// Get the literal value if this is a literal node
    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Walk the tree depth-first, visiting every node
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ExpressionNode)) {
        visit(self);
        match self {
            Self::Literal(_) | Self::Variable(_) => {}
            Self::Unary { operand, .. } => operand.walk(visit),
            Self::Variadic(data) => {
                for operand in &data.operands {
                    operand.walk(visit);
                }
            }
            Self::Binary(data) => {
                data.left.walk(visit);
                data.right.walk(visit);
            }
        }
    }

    /// Collect every variable path referenced anywhere in the tree
    pub fn referenced_variables(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.walk(&mut |node| {
            if let Some(path) = node.as_variable() {
                paths.push(path);
            }
        });
        paths
    }
}

impl LiteralValue {
    /// Check if this literal is the number zero
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Number(n) if *n == 0.0)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(n)
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Boolean(b)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}
