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

//! Precedence-climbing parser for form expressions
//!
//! A small Pratt-style parser over a fixed precedence table, lowest to
//! highest: logical-or, logical-and, equality/relational (one level),
//! additive, multiplicative. Parenthesized sub-expressions reset
//! precedence. All operators are left-associative; the flattenable ones
//! (`&&`, `||`, `+`, `*`) splice into n-ary nodes as they combine, so a
//! chain of the same operator produces one node rather than a leaning
//! tree.

use formlogic_ast::{
    BinaryOperator, ExpressionNode, LiteralValue, UnaryOperator, VariadicOperator,
};

use crate::error::{ParseError, ParseResult};
use crate::result::{DOWNGRADE_WARNING, push_unique_warning};
use crate::tokenizer::{SpannedToken, Token, Tokenizer};

/// Operator precedence levels (higher binds tighter)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Logical OR (lowest)
    Or = 1,
    /// Logical AND
    And = 2,
    /// Equality and relational operators, all one level
    Comparison = 3,
    /// Additive operators (`+`, `-`)
    Additive = 4,
    /// Multiplicative operators (`*`, `/`)
    Multiplicative = 5,
}

impl Precedence {
    /// Next tighter level, used for left-associative climbing
    const fn next_level(self) -> Self {
        match self {
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Multiplicative,
        }
    }
}

/// How a binary-position token combines its sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combiner {
    /// Flattenable n-ary operator
    Variadic(VariadicOperator),
    /// Fixed-arity binary operator
    Binary(BinaryOperator),
    /// `===`: accepted, downgraded to `==` with a warning
    StrictEqual,
}

fn precedence_of(token: &Token<'_>) -> Option<(Precedence, Combiner)> {
    match token {
        Token::OrOr => Some((Precedence::Or, Combiner::Variadic(VariadicOperator::Or))),
        Token::AndAnd => Some((Precedence::And, Combiner::Variadic(VariadicOperator::And))),
        Token::StrictEqual => Some((Precedence::Comparison, Combiner::StrictEqual)),
        Token::EqualEqual => Some((
            Precedence::Comparison,
            Combiner::Binary(BinaryOperator::Equal),
        )),
        Token::Greater => Some((
            Precedence::Comparison,
            Combiner::Binary(BinaryOperator::GreaterThan),
        )),
        Token::Less => Some((
            Precedence::Comparison,
            Combiner::Binary(BinaryOperator::LessThan),
        )),
        Token::GreaterEqual => Some((
            Precedence::Comparison,
            Combiner::Binary(BinaryOperator::GreaterThanOrEqual),
        )),
        Token::LessEqual => Some((
            Precedence::Comparison,
            Combiner::Binary(BinaryOperator::LessThanOrEqual),
        )),
        Token::Plus => Some((
            Precedence::Additive,
            Combiner::Variadic(VariadicOperator::Add),
        )),
        Token::Minus => Some((
            Precedence::Additive,
            Combiner::Binary(BinaryOperator::Subtract),
        )),
        Token::Star => Some((
            Precedence::Multiplicative,
            Combiner::Variadic(VariadicOperator::Multiply),
        )),
        Token::Slash => Some((
            Precedence::Multiplicative,
            Combiner::Binary(BinaryOperator::Divide),
        )),
        _ => None,
    }
}

/// Precedence-climbing parser over one expression string
pub struct PrattParser<'input> {
    tokenizer: Tokenizer<'input>,
    current: Option<SpannedToken<'input>>,
    warnings: Vec<String>,
}

impl<'input> PrattParser<'input> {
    /// Create a new parser over the given source
    pub fn new(input: &'input str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            current: None,
            warnings: Vec::new(),
        }
    }

    /// Parse the whole source to one expression tree
    ///
    /// Returns the tree plus any advisory warnings recorded along the way.
    /// Leftover tokens after a complete expression are a failure.
    pub fn parse(mut self) -> ParseResult<(ExpressionNode, Vec<String>)> {
        self.advance()?;
        let tree = self.parse_binary(Precedence::Or)?;
        if let Some(leftover) = &self.current {
            return Err(ParseError::TrailingTokens {
                position: leftover.start,
            });
        }
        Ok((tree, self.warnings))
    }

    fn advance(&mut self) -> ParseResult<()> {
        self.current = self.tokenizer.next_token()?;
        Ok(())
    }

    /// Owned view of the current token; tokens hold zero-copy slices into
    /// the source, so cloning is cheap and sidesteps borrow entanglement
    fn peek(&self) -> Option<Token<'input>> {
        self.current.as_ref().map(|spanned| spanned.token.clone())
    }

    fn current_start(&self) -> usize {
        self.current
            .as_ref()
            .map(|spanned| spanned.start)
            .unwrap_or_else(|| self.tokenizer.position())
    }

    fn parse_binary(&mut self, min: Precedence) -> ParseResult<ExpressionNode> {
        let mut left = self.parse_unary()?;
        while let Some((precedence, combiner)) = self.peek().and_then(|t| precedence_of(&t)) {
            if precedence < min {
                break;
            }
            self.advance()?;
            let right = self.parse_binary(precedence.next_level())?;
            left = self.apply(combiner, left, right);
        }
        Ok(left)
    }

    fn apply(
        &mut self,
        combiner: Combiner,
        left: ExpressionNode,
        right: ExpressionNode,
    ) -> ExpressionNode {
        match combiner {
            Combiner::Variadic(op) => ExpressionNode::combine_flattened(op, left, right),
            Combiner::Binary(op) => ExpressionNode::binary(op, left, right),
            Combiner::StrictEqual => {
                push_unique_warning(&mut self.warnings, DOWNGRADE_WARNING);
                log::debug!("strict equality downgraded to loose equality");
                ExpressionNode::binary(BinaryOperator::Equal, left, right)
            }
        }
    }

    fn parse_unary(&mut self) -> ParseResult<ExpressionNode> {
        match self.peek() {
            Some(Token::Bang) => {
                self.advance()?;
                let operand = self.parse_postfix()?;
                Ok(ExpressionNode::unary(UnaryOperator::Not, operand))
            }
            Some(Token::Minus) => {
                self.advance()?;
                let operand = self.parse_postfix()?;
                Ok(ExpressionNode::unary(UnaryOperator::Negate, operand))
            }
            _ => self.parse_postfix(),
        }
    }

    /// Parse a primary followed by at most one bracket index
    ///
    /// Only variable references may be indexed and only by literal `0`;
    /// the index is rewritten into a dotted variable path (`var.0`) rather
    /// than kept as a separate node.
    fn parse_postfix(&mut self) -> ParseResult<ExpressionNode> {
        let primary = self.parse_primary()?;
        if !matches!(self.peek(), Some(Token::LeftBracket)) {
            return Ok(primary);
        }

        let bracket_start = self.current_start();
        let Some(path) = primary.as_variable().map(str::to_string) else {
            return Err(ParseError::syntax(
                "only variable references may be indexed",
                bracket_start,
            ));
        };
        self.advance()?; // '['

        let index_start = self.current_start();
        match self.peek() {
            Some(Token::Number(n)) if n == 0.0 => self.advance()?,
            Some(other) => {
                return Err(ParseError::UnsupportedIndex {
                    found: other.describe(),
                    position: index_start,
                });
            }
            None => {
                return Err(ParseError::syntax("unterminated index", bracket_start));
            }
        }
        match self.peek() {
            Some(Token::RightBracket) => self.advance()?,
            _ => {
                return Err(ParseError::syntax(
                    "expected ']' after index",
                    self.current_start(),
                ));
            }
        }

        if matches!(self.peek(), Some(Token::LeftBracket)) {
            return Err(ParseError::syntax(
                "only a single level of indexing is supported",
                self.current_start(),
            ));
        }
        Ok(ExpressionNode::variable(format!("{path}.0")))
    }

    fn parse_primary(&mut self) -> ParseResult<ExpressionNode> {
        let start = self.current_start();
        let node = match self.peek() {
            Some(Token::Number(n)) => ExpressionNode::literal(n),
            Some(Token::String(s)) => ExpressionNode::literal(s),
            Some(Token::True) => ExpressionNode::literal(true),
            Some(Token::False) => ExpressionNode::literal(false),
            Some(Token::Null) => ExpressionNode::Literal(LiteralValue::Null),
            Some(Token::Variable(name)) => ExpressionNode::variable(name),
            Some(Token::LeftParen) => {
                self.advance()?;
                let inner = self.parse_binary(Precedence::Or)?;
                match self.peek() {
                    Some(Token::RightParen) => {
                        self.advance()?;
                        return Ok(inner);
                    }
                    _ => {
                        return Err(ParseError::syntax(
                            "expected ')' to close parenthesized expression",
                            self.current_start(),
                        ));
                    }
                }
            }
            Some(other) => {
                return Err(ParseError::syntax(
                    format!("expected expression, found {}", other.describe()),
                    start,
                ));
            }
            None => {
                return Err(ParseError::syntax("unexpected end of input", start));
            }
        };
        self.advance()?;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::FailureReason;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> ExpressionNode {
        PrattParser::new(input).parse().unwrap().0
    }

    fn parse_err(input: &str) -> ParseError {
        PrattParser::new(input).parse().unwrap_err()
    }

    #[test]
    fn precedence_orders_logic_below_comparison() {
        // $a == 1 && $b == 2  parses as  ($a == 1) && ($b == 2)
        let tree = parse("$a == 1 && $b == 2");
        match tree {
            ExpressionNode::Variadic(data) => {
                assert_eq!(data.op, VariadicOperator::And);
                assert_eq!(data.operands.len(), 2);
                assert!(matches!(data.operands[0], ExpressionNode::Binary(_)));
            }
            other => panic!("expected && node, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // $a + $b * 2  keeps the product as one operand of the sum
        let tree = parse("$a + $b * 2");
        match tree {
            ExpressionNode::Variadic(data) => {
                assert_eq!(data.op, VariadicOperator::Add);
                assert_eq!(data.operands[0], ExpressionNode::variable("a"));
                assert!(matches!(&data.operands[1], ExpressionNode::Variadic(inner)
                    if inner.op == VariadicOperator::Multiply));
            }
            other => panic!("expected + node, got {other:?}"),
        }
    }

    #[test]
    fn chains_flatten_to_one_node() {
        for (input, op) in [
            ("$a && $b && $c", VariadicOperator::And),
            ("$a || $b || $c", VariadicOperator::Or),
            ("$a + $b + $c", VariadicOperator::Add),
            ("$a * $b * $c", VariadicOperator::Multiply),
        ] {
            match parse(input) {
                ExpressionNode::Variadic(data) => {
                    assert_eq!(data.op, op, "{input}");
                    assert_eq!(data.operands.len(), 3, "{input}");
                }
                other => panic!("expected flattened node for {input}, got {other:?}"),
            }
        }
    }

    #[test]
    fn subtraction_and_division_stay_binary() {
        let tree = parse("$a - $b - $c");
        // Left associative: ($a - $b) - $c
        match tree {
            ExpressionNode::Binary(data) => {
                assert_eq!(data.op, BinaryOperator::Subtract);
                assert!(matches!(&data.left, ExpressionNode::Binary(inner)
                    if inner.op == BinaryOperator::Subtract));
                assert_eq!(data.right, ExpressionNode::variable("c"));
            }
            other => panic!("expected binary chain, got {other:?}"),
        }
    }

    #[test]
    fn parentheses_reset_precedence() {
        let tree = parse("($a || $b) && $c");
        match tree {
            ExpressionNode::Variadic(data) => {
                assert_eq!(data.op, VariadicOperator::And);
                assert!(matches!(&data.operands[0], ExpressionNode::Variadic(inner)
                    if inner.op == VariadicOperator::Or));
            }
            other => panic!("expected && node, got {other:?}"),
        }
    }

    #[test]
    fn strict_equality_downgrades_with_warning() {
        let (tree, warnings) = PrattParser::new("$x === 1").parse().unwrap();
        assert_eq!(tree, parse("$x == 1"));
        assert_eq!(warnings, vec![DOWNGRADE_WARNING.to_string()]);

        // Deduplicated across repeated occurrences
        let (_, warnings) = PrattParser::new("$x === 1 && $y === 2").parse().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unary_forms() {
        assert_eq!(
            parse("!$done"),
            ExpressionNode::unary(UnaryOperator::Not, ExpressionNode::variable("done"))
        );
        assert_eq!(
            parse("-5"),
            ExpressionNode::unary(UnaryOperator::Negate, ExpressionNode::literal(5.0))
        );
        // '!' is accepted only directly before a primary
        assert_eq!(parse_err("!!$a").reason(), FailureReason::ParseError);
    }

    #[test]
    fn zero_index_rewrites_to_dotted_path() {
        assert_eq!(parse("$foo[0]"), ExpressionNode::variable("foo.0"));
    }

    #[test]
    fn non_zero_index_is_unsupported() {
        for input in ["$foo[1]", "$foo[2]", "$foo[0.5]", "$foo[$i]"] {
            let err = parse_err(input);
            assert_eq!(err.reason(), FailureReason::UnsupportedIndex, "{input}");
            assert!(err.to_string().contains("zero index"), "{input}: {err}");
        }
    }

    #[test]
    fn indexing_restrictions_are_syntax_errors() {
        assert_eq!(parse_err("(1 + 2)[0]").reason(), FailureReason::ParseError);
        assert_eq!(parse_err("$a[0][0]").reason(), FailureReason::ParseError);
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = parse_err("$a == 1 $b");
        assert_eq!(err.reason(), FailureReason::TrailingTokens);
        assert_eq!(err.position(), 8);
    }

    #[test]
    fn literal_primaries() {
        assert_eq!(
            parse("\"show\""),
            ExpressionNode::Literal(LiteralValue::String("show".to_string()))
        );
        assert_eq!(parse("null"), ExpressionNode::Literal(LiteralValue::Null));
        assert_eq!(
            parse("true"),
            ExpressionNode::Literal(LiteralValue::Boolean(true))
        );
    }
}
