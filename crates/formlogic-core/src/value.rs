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

//! Answer value types
//!
//! Answers arrive over the wire as JSON, so the value model mirrors JSON's
//! shape and the coercion rules are tolerant of representational drift: a
//! numeric answer may show up as `5` or `"5"` depending on the widget that
//! produced it, and the two must behave identically under comparison.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single answer value as submitted by a respondent
///
/// `Null` doubles as the absent value: resolving a variable path that does
/// not exist in the answer set yields `Null` rather than an error, and all
/// coercions treat the two identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null or absent
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all numbers are f64, matching JSON)
    Number(f64),
    /// String value
    String(String),
    /// Multi-valued answer (e.g. a multiple-choice selection)
    List(Vec<Value>),
}

/// The flat answer context for one respondent's in-progress response,
/// keyed by variable name with the leading sigil stripped
pub type AnswerSet = IndexMap<String, Value>;

impl Value {
    /// Truthiness used by logical operators and visibility decisions
    ///
    /// Null is false; numbers are false when zero or NaN; strings when
    /// empty; lists when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Whether this value counts as missing for required-field checks
    ///
    /// Null, the empty string and the empty list all count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion used by arithmetic and ordering comparisons
    ///
    /// Null coerces to zero so that an unanswered total still satisfies a
    /// `>= 0` bound; strings parse when they hold a number; anything else
    /// yields NaN, which then fails every ordering comparison.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Number(n) => *n,
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Value::List(_) => f64::NAN,
        }
    }

    /// Strict numeric reading for "must be a number" validation
    ///
    /// Unlike [`Value::as_number`], Null does not default to zero here:
    /// a missing answer is not a number, it is missing.
    pub fn as_finite_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Loose equality across representational types
    ///
    /// Same-variant values compare structurally. Scalars of different
    /// variants compare numerically when both coerce to a real number.
    /// Null equals only Null; lists never equal scalars.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::List(_), _) | (_, Value::List(_)) => false,
            (a, b) => {
                let (an, bn) = (a.as_number(), b.as_number());
                !an.is_nan() && !bn.is_nan() && an == bn
            }
        }
    }

    /// Number of selected options when this is a multi-valued answer
    pub fn selection_count(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// String view of this value, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            // Answer sets are flat; nested objects have no lookup semantics
            // and behave like an opaque non-scalar.
            serde_json::Value::Object(_) => Value::Null,
        }
    }
}
