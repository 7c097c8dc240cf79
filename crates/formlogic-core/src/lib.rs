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

//! Core types for the formlogic form engine
//!
//! This crate provides the shared value model used by the expression
//! evaluator and the validation engine, plus the error types used across
//! the workspace. It is designed to be lightweight with minimal
//! dependencies.

#![warn(missing_docs)]

pub mod error;
pub mod value;

pub use error::{FormLogicError, Result};
pub use value::{AnswerSet, Value};
