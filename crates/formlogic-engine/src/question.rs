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

//! Question tree model
//!
//! A form is a tree of questions supplied by the template editor. Leaf
//! questions bind a variable that answers are stored under; group and
//! repeat questions only structure the tree and never bind a variable
//! themselves. The kind is a closed sum so that every walk over the tree
//! is checked exhaustively when a new question kind is added.

use serde::{Deserialize, Serialize};

/// A complete form template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Form {
    /// Display title for the form
    #[serde(default)]
    pub title: String,
    /// Top-level questions in display order
    pub questions: Vec<Question>,
}

/// One node of the question tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Fields every question kind shares
    #[serde(flatten)]
    pub meta: QuestionMeta,
    /// Kind-specific constraints and children
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Fields common to every question kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionMeta {
    /// Identifier, unique within one form
    pub id: String,
    /// Display label shown to the respondent
    #[serde(default)]
    pub label: String,
    /// Variable name answers are stored under (leaves only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Whether an answer must be present
    #[serde(default)]
    pub required: bool,
    /// Conditional-display expression source text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_when: Option<String>,
    /// Author-defined validation rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<CustomRule>,
}

/// An author-defined validation rule: an expression plus the message
/// shown when the expression evaluates falsy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRule {
    /// Expression source text
    pub expression: String,
    /// Error message appended to the owning field on violation
    pub message: String,
}

/// Kind-specific parts of a question, tagged by `type` on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free-text input with optional length bounds
    Text {
        /// Minimum answer length in characters
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        /// Maximum answer length in characters
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    /// Numeric input with optional value bounds
    Number {
        /// Smallest acceptable value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        /// Largest acceptable value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
    },
    /// Single selection from a fixed option list
    Choice {
        /// Selectable options
        #[serde(default)]
        options: Vec<String>,
    },
    /// Multiple selection with optional count bounds
    MultiChoice {
        /// Selectable options
        #[serde(default)]
        options: Vec<String>,
        /// Minimum number of selected options
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_choices: Option<usize>,
        /// Maximum number of selected options
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_choices: Option<usize>,
    },
    /// A composite holding child questions
    Group {
        /// Child questions in display order
        questions: Vec<Question>,
    },
    /// A repeated section; instances share one template child
    Repeat {
        /// The template every instance is stamped from
        template: Box<Question>,
    },
}

impl Question {
    /// Create a question with the given identifier and kind
    pub fn new(id: impl Into<String>, kind: QuestionKind) -> Self {
        Question {
            meta: QuestionMeta {
                id: id.into(),
                ..QuestionMeta::default()
            },
            kind,
        }
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.meta.label = label.into();
        self
    }

    /// Bind the answer variable
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.meta.variable = Some(variable.into());
        self
    }

    /// Mark the question as required
    pub fn required(mut self) -> Self {
        self.meta.required = true;
        self
    }

    /// Attach a conditional-display expression
    pub fn show_when(mut self, expression: impl Into<String>) -> Self {
        self.meta.show_when = Some(expression.into());
        self
    }

    /// Attach an author-defined validation rule
    pub fn with_rule(mut self, expression: impl Into<String>, message: impl Into<String>) -> Self {
        self.meta.rules.push(CustomRule {
            expression: expression.into(),
            message: message.into(),
        });
        self
    }

    /// Child questions of this node, empty for leaves
    pub fn children(&self) -> &[Question] {
        match &self.kind {
            QuestionKind::Group { questions } => questions,
            QuestionKind::Repeat { template } => std::slice::from_ref(template),
            _ => &[],
        }
    }

    /// Whether this node structures the tree rather than binding an answer
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            QuestionKind::Group { .. } | QuestionKind::Repeat { .. }
        )
    }
}

impl Form {
    /// Create a form from its top-level questions
    pub fn new(questions: Vec<Question>) -> Self {
        Form {
            title: String::new(),
            questions,
        }
    }
}
