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

//! The tree-walking interpreter

use std::cmp::Ordering;

use formlogic_ast::{
    BinaryOpData, BinaryOperator, ExpressionNode, LiteralValue, UnaryOperator, VariadicOpData,
    VariadicOperator,
};
use formlogic_core::{AnswerSet, Value};

/// Evaluate an operator tree against one answer set
pub fn evaluate(tree: &ExpressionNode, answers: &AnswerSet) -> Value {
    match tree {
        ExpressionNode::Literal(literal) => literal_value(literal),
        ExpressionNode::Variable(path) => resolve_path(path, answers),
        ExpressionNode::Unary { op, operand } => match op {
            UnaryOperator::Not => Value::Bool(!evaluate(operand, answers).is_truthy()),
            UnaryOperator::Negate => Value::Number(-evaluate(operand, answers).as_number()),
        },
        ExpressionNode::Variadic(data) => evaluate_variadic(data, answers),
        ExpressionNode::Binary(data) => evaluate_binary(data, answers),
    }
}

/// Evaluate a tree and reduce the result to its truthiness
pub fn evaluate_truthy(tree: &ExpressionNode, answers: &AnswerSet) -> bool {
    evaluate(tree, answers).is_truthy()
}

/// Resolve a dotted variable path through the flat answer map
///
/// The first segment looks up the answer by variable name; each further
/// segment indexes into a multi-valued answer. The walk stops with the
/// absent value the moment a segment is missing or the current value is
/// not indexable, so `var.0` on a scalar resolves to nothing rather than
/// failing.
pub fn resolve_path(path: &str, answers: &AnswerSet) -> Value {
    let mut segments = path.split('.');
    let name = match segments.next() {
        Some(name) if !name.is_empty() => name,
        _ => return Value::Null,
    };
    let mut current = match answers.get(name) {
        Some(value) => value.clone(),
        None => {
            log::trace!("variable '{name}' not present in answer set");
            return Value::Null;
        }
    };
    for segment in segments {
        let Value::List(items) = current else {
            return Value::Null;
        };
        let Ok(index) = segment.parse::<usize>() else {
            return Value::Null;
        };
        current = match items.into_iter().nth(index) {
            Some(item) => item,
            None => return Value::Null,
        };
    }
    current
}

fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Null => Value::Null,
        LiteralValue::Boolean(b) => Value::Bool(*b),
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::String(s) => Value::String(s.clone()),
    }
}

fn evaluate_variadic(data: &VariadicOpData, answers: &AnswerSet) -> Value {
    match data.op {
        // Boolean reduction: true only when every operand is truthy,
        // short-circuiting on the first falsy one.
        VariadicOperator::And => {
            for operand in &data.operands {
                if !evaluate(operand, answers).is_truthy() {
                    return Value::Bool(false);
                }
            }
            Value::Bool(true)
        }
        // Value pass-through: the first truthy operand wins, else the
        // last operand's value. This is what makes the `$x || 0`
        // defaulting idiom yield a usable number in arithmetic while
        // still behaving as a disjunction under truthiness.
        VariadicOperator::Or => {
            let mut last = Value::Null;
            for operand in &data.operands {
                let value = evaluate(operand, answers);
                if value.is_truthy() {
                    return value;
                }
                last = value;
            }
            last
        }
        VariadicOperator::Add => Value::Number(
            data.operands
                .iter()
                .map(|operand| evaluate(operand, answers).as_number())
                .sum(),
        ),
        VariadicOperator::Multiply => Value::Number(
            data.operands
                .iter()
                .map(|operand| evaluate(operand, answers).as_number())
                .product(),
        ),
    }
}

fn evaluate_binary(data: &BinaryOpData, answers: &AnswerSet) -> Value {
    let left = evaluate(&data.left, answers);
    let right = evaluate(&data.right, answers);
    match data.op {
        BinaryOperator::Subtract => Value::Number(left.as_number() - right.as_number()),
        BinaryOperator::Divide => Value::Number(left.as_number() / right.as_number()),
        BinaryOperator::Equal => Value::Bool(left.loose_eq(&right)),
        BinaryOperator::GreaterThan => compare(&left, &right, Ordering::is_gt),
        BinaryOperator::LessThan => compare(&left, &right, Ordering::is_lt),
        BinaryOperator::GreaterThanOrEqual => compare(&left, &right, Ordering::is_ge),
        BinaryOperator::LessThanOrEqual => compare(&left, &right, Ordering::is_le),
    }
}

/// Ordering comparison over numeric coercion; NaN on either side compares
/// neither greater, less nor equal
fn compare(left: &Value, right: &Value, holds: impl Fn(Ordering) -> bool) -> Value {
    match left.as_number().partial_cmp(&right.as_number()) {
        Some(ordering) => Value::Bool(holds(ordering)),
        None => Value::Bool(false),
    }
}
