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

//! Expression evaluator for formlogic
//!
//! A pure, side-effect-free tree walk over a compiled operator tree
//! against one answer set. Evaluation never fails: unresolved variable
//! paths produce the absent value and bad numeric coercions produce NaN,
//! which then fails every ordering comparison predictably. The same tree
//! and answers always yield the same result, which is what lets the
//! visibility and validation passes agree on every recomputation.

#![warn(missing_docs)]

mod interpreter;

pub use interpreter::{evaluate, evaluate_truthy, resolve_path};
