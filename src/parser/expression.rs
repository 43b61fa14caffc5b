//! Expressions, parsed by precedence climbing.
//!
//! Binding powers, lowest first: `or`, `xor`, `and`, assignment, `? :`,
//! `??`, `||`, `&&`, `|`, `^`, `&`, equality, comparison, `.`, shifts,
//! additive, multiplicative, `instanceof`. Prefix operators, `**` and
//! assignment are handled around the postfix expression.

use super::{PResult, Parser};
use crate::punctuator::{Keyword, Punctuator};
use crate::token::TokenKind;
use crate::tree::{Kind, Tree, node};

const OR: u8 = 1;
const XOR: u8 = 2;
const AND: u8 = 3;
const ASSIGN: u8 = 4;
const TERNARY: u8 = 5;
const COALESCE: u8 = 6;
const LOGICAL_OR: u8 = 7;
const LOGICAL_AND: u8 = 8;
const BIT_OR: u8 = 9;
const BIT_XOR: u8 = 10;
const BIT_AND: u8 = 11;
const EQUALITY: u8 = 12;
const COMPARISON: u8 = 13;
const CONCAT: u8 = 14;
const SHIFT: u8 = 15;
const ADDITIVE: u8 = 16;
const MULTIPLICATIVE: u8 = 17;
const INSTANCEOF: u8 = 18;

const MAGIC_CONSTANTS: &[&str] = &[
    "__LINE__",
    "__FILE__",
    "__DIR__",
    "__FUNCTION__",
    "__CLASS__",
    "__TRAIT__",
    "__METHOD__",
    "__NAMESPACE__",
    "__PROPERTY__",
];

const COMPOUND_ASSIGNMENTS: &[Punctuator] = &[
    Punctuator::PlusEqual,
    Punctuator::MinusEqual,
    Punctuator::StarEqual,
    Punctuator::SlashEqual,
    Punctuator::DotEqual,
    Punctuator::PercentEqual,
    Punctuator::StarStarEqual,
    Punctuator::AmpersandEqual,
    Punctuator::PipeEqual,
    Punctuator::CaretEqual,
    Punctuator::ShiftLeftEqual,
    Punctuator::ShiftRightEqual,
    Punctuator::CoalesceEqual,
];

/// Tokens after which a bare `yield` has no operand.
const YIELD_TERMINATORS: &[Punctuator] = &[
    Punctuator::Semicolon,
    Punctuator::RParenthesis,
    Punctuator::RBracket,
    Punctuator::Comma,
];

const fn binary_punctuator(p: Punctuator) -> Option<(Kind, u8)> {
    let op = match p {
        Punctuator::Coalesce => (Kind::NullCoalescing, COALESCE),
        Punctuator::OrOr => (Kind::ConditionalOr, LOGICAL_OR),
        Punctuator::AndAnd => (Kind::ConditionalAnd, LOGICAL_AND),
        Punctuator::Pipe => (Kind::BitwiseOr, BIT_OR),
        Punctuator::Caret => (Kind::BitwiseXor, BIT_XOR),
        Punctuator::Ampersand => (Kind::BitwiseAnd, BIT_AND),
        Punctuator::EqualEqual => (Kind::EqualTo, EQUALITY),
        Punctuator::NotEqual | Punctuator::LessGreater => (Kind::NotEqualTo, EQUALITY),
        Punctuator::StrictEqual => (Kind::StrictEqualTo, EQUALITY),
        Punctuator::StrictNotEqual => (Kind::StrictNotEqualTo, EQUALITY),
        Punctuator::Spaceship => (Kind::Spaceship, EQUALITY),
        Punctuator::LessThan => (Kind::LessThan, COMPARISON),
        Punctuator::GreaterThan => (Kind::GreaterThan, COMPARISON),
        Punctuator::LessEqual => (Kind::LessThanOrEqualTo, COMPARISON),
        Punctuator::GreaterEqual => (Kind::GreaterThanOrEqualTo, COMPARISON),
        Punctuator::Dot => (Kind::Concatenation, CONCAT),
        Punctuator::ShiftLeft => (Kind::LeftShift, SHIFT),
        Punctuator::ShiftRight => (Kind::RightShift, SHIFT),
        Punctuator::Plus => (Kind::Plus, ADDITIVE),
        Punctuator::Minus => (Kind::Minus, ADDITIVE),
        Punctuator::Star => (Kind::Multiply, MULTIPLICATIVE),
        Punctuator::Slash => (Kind::Divide, MULTIPLICATIVE),
        Punctuator::Percent => (Kind::Remainder, MULTIPLICATIVE),
        _ => return None,
    };
    Some(op)
}

/// Kinds that may stand on the left of an assignment.
const fn is_assignable(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::VariableIdentifier
            | Kind::ArrayAccess
            | Kind::ObjectMemberAccess
            | Kind::NullsafeObjectMemberAccess
            | Kind::ClassMemberAccess
            | Kind::VariableVariable
            | Kind::CompoundVariableName
            | Kind::ListExpression
            | Kind::ArrayInitializerBracket
    )
}

impl Parser<'_> {
    pub(super) fn expression(&mut self) -> PResult {
        self.binary(0)
    }

    /// Binary operator at the cursor with its binding power.
    fn binary_operator(&self) -> Option<(Kind, u8)> {
        let token = self.peek();
        match token.kind {
            TokenKind::Punctuator => {
                if self.at(Punctuator::Query) {
                    return Some((Kind::ConditionalExpression, TERNARY));
                }
                Punctuator::ALL
                    .iter()
                    .find(|p| self.at(**p))
                    .and_then(|p| binary_punctuator(*p))
            }
            TokenKind::Identifier => {
                if self.at_keyword(Keyword::Or) {
                    Some((Kind::AlternativeConditionalOr, OR))
                } else if self.at_keyword(Keyword::Xor) {
                    Some((Kind::AlternativeConditionalXor, XOR))
                } else if self.at_keyword(Keyword::And) {
                    Some((Kind::AlternativeConditionalAnd, AND))
                } else if self.at_keyword(Keyword::Instanceof) {
                    Some((Kind::Instanceof, INSTANCEOF))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub(super) fn binary(&mut self, min_bp: u8) -> PResult {
        let mut lhs = self.unary()?;
        while let Some((kind, bp)) = self.binary_operator() {
            if bp < min_bp {
                break;
            }
            if kind == Kind::ConditionalExpression {
                let query = self.token();
                let consequent = if self.at(Punctuator::Colon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                let colon = self.expect(Punctuator::Colon)?;
                let alternative = self.binary(TERNARY + 1)?;
                lhs = node![ConditionalExpression, lhs, query, consequent, colon, alternative];
                continue;
            }
            let op = self.token();
            let next_bp = if kind == Kind::NullCoalescing { bp } else { bp + 1 };
            let rhs = self.binary(next_bp)?;
            lhs = Tree::node(kind, vec![Some(lhs), Some(op), Some(rhs)]);
        }
        Ok(lhs)
    }

    fn prefix(&mut self, kind: Kind) -> PResult {
        let op = self.token();
        let operand = self.unary()?;
        Ok(Tree::node(kind, vec![Some(op), Some(operand)]))
    }

    fn unary(&mut self) -> PResult {
        let token = self.peek();
        match token.kind {
            TokenKind::Cast => return self.prefix(Kind::CastExpression),
            TokenKind::Punctuator => {
                let kind = if self.at(Punctuator::Minus) {
                    Some(Kind::UnaryMinus)
                } else if self.at(Punctuator::Plus) {
                    Some(Kind::UnaryPlus)
                } else if self.at(Punctuator::Tilde) {
                    Some(Kind::BitwiseComplement)
                } else if self.at(Punctuator::At) {
                    Some(Kind::ErrorControl)
                } else if self.at(Punctuator::Increment) {
                    Some(Kind::PrefixIncrement)
                } else if self.at(Punctuator::Decrement) {
                    Some(Kind::PrefixDecrement)
                } else {
                    None
                };
                if let Some(kind) = kind {
                    return self.prefix(kind);
                }
                if self.at(Punctuator::Bang) {
                    let op = self.token();
                    let operand = self.binary(INSTANCEOF)?;
                    return Ok(node![LogicalComplement, op, operand]);
                }
            }
            TokenKind::Identifier => {
                if self.at_keyword(Keyword::Clone) {
                    return self.prefix(Kind::CloneExpression);
                }
                if self.at_keyword(Keyword::Print) {
                    return self.keyword_operand(Kind::PrintExpression);
                }
                if self.at_keyword(Keyword::Throw) {
                    return self.keyword_operand(Kind::ThrowExpression);
                }
                if [
                    Keyword::Include,
                    Keyword::IncludeOnce,
                    Keyword::Require,
                    Keyword::RequireOnce,
                ]
                .iter()
                .any(|k| self.at_keyword(*k))
                {
                    return self.keyword_operand(Kind::IncludeExpression);
                }
                if self.at_keyword(Keyword::Yield) {
                    return self.yield_expression();
                }
            }
            _ => {}
        }
        let expr = self.postfix_expression()?;
        self.after_postfix(expr)
    }

    fn keyword_operand(&mut self, kind: Kind) -> PResult {
        let keyword = self.token();
        let operand = self.binary(ASSIGN)?;
        Ok(Tree::node(kind, vec![Some(keyword), Some(operand)]))
    }

    fn yield_expression(&mut self) -> PResult {
        let keyword = self.token();
        if self.at_keyword(Keyword::From) {
            let from = self.token();
            let operand = self.binary(ASSIGN)?;
            return Ok(node![YieldFromExpression, keyword, from, operand]);
        }
        if self.at_any(YIELD_TERMINATORS) || self.at_kind(TokenKind::CloseTag) {
            return Ok(node![YieldExpression, keyword, None, None, None]);
        }
        let first = self.binary(ASSIGN)?;
        if let Some(arrow) = self.eat(Punctuator::DoubleArrow) {
            let value = self.binary(ASSIGN)?;
            return Ok(node![YieldExpression, keyword, first, arrow, value]);
        }
        Ok(node![YieldExpression, keyword, None, None, first])
    }

    /// `**` and assignments bind to the postfix expression on their left.
    pub(super) fn after_postfix(&mut self, expr: Tree) -> PResult {
        if self.at(Punctuator::StarStar) {
            let op = self.token();
            let rhs = self.unary()?;
            return Ok(node![Power, expr, op, rhs]);
        }
        if !is_assignable(expr.kind()) {
            return Ok(expr);
        }
        if self.at(Punctuator::Equal) {
            let op = self.token();
            if let Some(amp) = self.eat(Punctuator::Ampersand) {
                let rhs = self.binary(ASSIGN)?;
                return Ok(node![AssignmentByReference, expr, op, amp, rhs]);
            }
            let rhs = self.binary(ASSIGN)?;
            return Ok(node![Assignment, expr, op, rhs]);
        }
        if self.at_any(COMPOUND_ASSIGNMENTS) {
            let op = self.token();
            let rhs = self.binary(ASSIGN)?;
            return Ok(node![CompoundAssignment, expr, op, rhs]);
        }
        Ok(expr)
    }

    pub(super) fn postfix_expression(&mut self) -> PResult {
        let mut expr = self.primary()?;
        loop {
            expr = if self.at(Punctuator::LBracket) {
                let open = self.token();
                let offset = if self.at(Punctuator::RBracket) {
                    None
                } else {
                    Some(self.expression()?)
                };
                let close = self.expect(Punctuator::RBracket)?;
                node![ArrayAccess, expr, open, offset, close]
            } else if self.at(Punctuator::LParenthesis) {
                let arguments = self.arguments()?;
                node![FunctionCall, expr, arguments]
            } else if self.at(Punctuator::Arrow) {
                let arrow = self.token();
                let member = self.member_name()?;
                node![ObjectMemberAccess, expr, arrow, member]
            } else if self.at(Punctuator::NullsafeArrow) {
                let arrow = self.token();
                let member = self.member_name()?;
                node![NullsafeObjectMemberAccess, expr, arrow, member]
            } else if self.at(Punctuator::DoubleColon) {
                let colons = self.token();
                let member = self.member_name()?;
                node![ClassMemberAccess, expr, colons, member]
            } else if self.at(Punctuator::Increment) {
                let op = self.token();
                node![PostfixIncrement, expr, op]
            } else if self.at(Punctuator::Decrement) {
                let op = self.token();
                node![PostfixDecrement, expr, op]
            } else {
                return Ok(expr);
            };
        }
    }

    /// Name after `->`, `?->` or `::`.
    fn member_name(&mut self) -> PResult {
        match self.peek().kind {
            TokenKind::Identifier => Ok(self.leaf(Kind::NameIdentifier)),
            TokenKind::Variable => Ok(self.leaf(Kind::VariableIdentifier)),
            _ if self.at(Punctuator::LCurlyBrace) => {
                let open = self.token();
                let expr = self.expression()?;
                let close = self.expect(Punctuator::RCurlyBrace)?;
                Ok(node![ComputedVariableName, open, expr, close])
            }
            _ if self.at(Punctuator::Dollar) => self.dollar_variable(),
            _ => Err(self.expected("member name")),
        }
    }

    /// `$$name` or `${expr}`.
    fn dollar_variable(&mut self) -> PResult {
        let dollar = self.token();
        if self.at(Punctuator::LCurlyBrace) {
            let open = self.token();
            let expr = self.expression()?;
            let close = self.expect(Punctuator::RCurlyBrace)?;
            return Ok(node![CompoundVariableName, dollar, open, expr, close]);
        }
        let inner = if self.at(Punctuator::Dollar) {
            self.dollar_variable()?
        } else {
            self.expect_variable()?
        };
        Ok(node![VariableVariable, dollar, inner])
    }

    pub(super) fn arguments(&mut self) -> PResult {
        let open = self.expect(Punctuator::LParenthesis)?;
        if self.at(Punctuator::Ellipsis) && self.nth_at(1, Punctuator::RParenthesis) {
            let ellipsis = self.token();
            let close = self.token();
            return Ok(node![CallableConvert, open, ellipsis, close]);
        }
        let list = self.separated_list(&[Punctuator::RParenthesis], false, Self::argument)?;
        let close = self.expect(Punctuator::RParenthesis)?;
        Ok(node![Arguments, open, list, close])
    }

    fn argument(&mut self) -> PResult {
        if self.at_kind(TokenKind::Identifier) && self.nth_at(1, Punctuator::Colon) {
            let name = self.leaf(Kind::NameIdentifier);
            let colon = self.token();
            let value = self.expression()?;
            return Ok(node![CallArgument, name, colon, value]);
        }
        let value = if self.at(Punctuator::Ellipsis) {
            let ellipsis = self.token();
            let expr = self.expression()?;
            node![SpreadArgument, ellipsis, expr]
        } else {
            self.expression()?
        };
        Ok(node![CallArgument, None, None, value])
    }

    fn primary(&mut self) -> PResult {
        let token = self.peek();
        match token.kind {
            TokenKind::Variable => Ok(self.leaf(Kind::VariableIdentifier)),
            TokenKind::Integer => Ok(self.leaf(Kind::IntegerLiteral)),
            TokenKind::Float => Ok(self.leaf(Kind::FloatLiteral)),
            TokenKind::SingleQuotedString | TokenKind::DoubleQuotedString => {
                Ok(self.leaf(Kind::RegularStringLiteral))
            }
            TokenKind::ExpandableString => Ok(self.leaf(Kind::ExpandableStringLiteral)),
            TokenKind::Heredoc => Ok(self.leaf(Kind::HeredocLiteral)),
            TokenKind::Nowdoc => Ok(self.leaf(Kind::NowdocLiteral)),
            TokenKind::ShellCommand => Ok(self.leaf(Kind::ExecutionOperator)),
            TokenKind::Identifier => self.identifier_expression(),
            TokenKind::Punctuator => self.punctuator_expression(),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn punctuator_expression(&mut self) -> PResult {
        if self.at(Punctuator::LParenthesis) {
            let open = self.token();
            let expr = self.expression()?;
            let close = self.expect(Punctuator::RParenthesis)?;
            return Ok(node![ParenthesisedExpression, open, expr, close]);
        }
        if self.at(Punctuator::LBracket) {
            let open = self.token();
            let list = self.separated_list(&[Punctuator::RBracket], true, Self::array_pair)?;
            let close = self.expect(Punctuator::RBracket)?;
            return Ok(node![ArrayInitializerBracket, open, list, close]);
        }
        if self.at(Punctuator::Dollar) {
            return self.dollar_variable();
        }
        if self.at(Punctuator::AttributeOpen) {
            let attributes = self.attributes()?;
            return self.closure(attributes);
        }
        Err(self.unexpected("expression"))
    }

    fn identifier_expression(&mut self) -> PResult {
        let text = self.peek().text.as_str();
        let next_is_paren = self.nth_at(1, Punctuator::LParenthesis);

        if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
            return Ok(self.leaf(Kind::BooleanLiteral));
        }
        if text.eq_ignore_ascii_case("null") {
            return Ok(self.leaf(Kind::NullLiteral));
        }
        if MAGIC_CONSTANTS.iter().any(|m| m.eq_ignore_ascii_case(text)) {
            return Ok(self.leaf(Kind::MagicConstant));
        }
        if self.at_keyword(Keyword::Array) && next_is_paren {
            let keyword = self.token();
            let open = self.token();
            let list = self.separated_list(&[Punctuator::RParenthesis], false, Self::array_pair)?;
            let close = self.expect(Punctuator::RParenthesis)?;
            return Ok(node![ArrayInitializerFunction, keyword, open, list, close]);
        }
        if self.at_keyword(Keyword::List) && next_is_paren {
            let keyword = self.token();
            let open = self.token();
            let list = self.separated_list(&[Punctuator::RParenthesis], true, Self::array_pair)?;
            let close = self.expect(Punctuator::RParenthesis)?;
            return Ok(node![ListExpression, keyword, open, list, close]);
        }
        if self.at_keyword(Keyword::Match) && next_is_paren {
            return self.match_expression();
        }
        if self.at_keyword(Keyword::New) {
            return self.new_expression();
        }
        if self.at_keyword(Keyword::Function)
            || self.at_keyword(Keyword::Fn)
            || (self.at_keyword(Keyword::Static)
                && (self.nth_keyword(1, Keyword::Function) || self.nth_keyword(1, Keyword::Fn)))
        {
            let attributes = Tree::node(Kind::List, Vec::new());
            return self.closure(attributes);
        }
        self.expect_name()
    }

    fn array_pair(&mut self) -> PResult {
        if self.at(Punctuator::Ellipsis) {
            let ellipsis = self.token();
            let expr = self.expression()?;
            let spread = node![SpreadArgument, ellipsis, expr];
            return Ok(node![ArrayPair, None, None, spread]);
        }
        if self.at(Punctuator::Ampersand) {
            let value = self.reference_value()?;
            return Ok(node![ArrayPair, None, None, value]);
        }
        let first = self.expression()?;
        let Some(arrow) = self.eat(Punctuator::DoubleArrow) else {
            return Ok(node![ArrayPair, None, None, first]);
        };
        let value = if self.at(Punctuator::Ampersand) {
            self.reference_value()?
        } else {
            self.expression()?
        };
        Ok(node![ArrayPair, first, arrow, value])
    }

    /// `&$var` in arrays, `foreach` targets and closure captures.
    pub(super) fn reference_value(&mut self) -> PResult {
        let amp = self.expect(Punctuator::Ampersand)?;
        let value = self.postfix_expression()?;
        Ok(node![ReferenceVariable, amp, value])
    }

    fn match_expression(&mut self) -> PResult {
        let keyword = self.token();
        let open = self.expect(Punctuator::LParenthesis)?;
        let subject = self.expression()?;
        let close = self.expect(Punctuator::RParenthesis)?;
        let lbrace = self.expect(Punctuator::LCurlyBrace)?;
        let arms = self.separated_list(&[Punctuator::RCurlyBrace], false, Self::match_arm)?;
        let rbrace = self.expect(Punctuator::RCurlyBrace)?;
        Ok(node![MatchExpression, keyword, open, subject, close, lbrace, arms, rbrace])
    }

    fn match_arm(&mut self) -> PResult {
        if self.at_keyword(Keyword::Default) && !self.nth_at(1, Punctuator::DoubleColon) {
            let keyword = self.token();
            let arrow = self.expect(Punctuator::DoubleArrow)?;
            let body = self.expression()?;
            return Ok(node![MatchDefaultClause, keyword, arrow, body]);
        }
        let conditions =
            self.separated_list(&[Punctuator::DoubleArrow], false, Self::expression)?;
        let arrow = self.expect(Punctuator::DoubleArrow)?;
        let body = self.expression()?;
        Ok(node![MatchConditionClause, conditions, arrow, body])
    }

    fn new_expression(&mut self) -> PResult {
        let keyword = self.token();
        if self.at_keyword(Keyword::Class) || self.at(Punctuator::AttributeOpen) {
            let class = self.anonymous_class()?;
            return Ok(node![NewExpression, keyword, class]);
        }
        let class = self.class_reference()?;
        if self.at(Punctuator::LParenthesis) {
            let arguments = self.arguments()?;
            return Ok(node![NewExpression, keyword, node![FunctionCall, class, arguments]]);
        }
        Ok(node![NewExpression, keyword, class])
    }

    /// Class operand of `new`: a name, `(expr)`, or a variable with member
    /// and offset accesses but no calls.
    fn class_reference(&mut self) -> PResult {
        if self.at(Punctuator::LParenthesis) {
            let open = self.token();
            let expr = self.expression()?;
            let close = self.expect(Punctuator::RParenthesis)?;
            return Ok(node![ParenthesisedExpression, open, expr, close]);
        }
        if self.at_kind(TokenKind::Identifier) {
            return self.expect_name();
        }
        let mut expr = if self.at(Punctuator::Dollar) {
            self.dollar_variable()?
        } else {
            self.expect_variable()?
        };
        loop {
            expr = if self.at(Punctuator::Arrow) {
                let arrow = self.token();
                let member = self.member_name()?;
                node![ObjectMemberAccess, expr, arrow, member]
            } else if self.at(Punctuator::NullsafeArrow) {
                let arrow = self.token();
                let member = self.member_name()?;
                node![NullsafeObjectMemberAccess, expr, arrow, member]
            } else if self.at(Punctuator::DoubleColon) {
                let colons = self.token();
                let member = self.expect_variable()?;
                node![ClassMemberAccess, expr, colons, member]
            } else if self.at(Punctuator::LBracket) {
                let open = self.token();
                let offset = self.expression()?;
                let close = self.expect(Punctuator::RBracket)?;
                node![ArrayAccess, expr, open, offset, close]
            } else {
                return Ok(expr);
            };
        }
    }

    fn anonymous_class(&mut self) -> PResult {
        let attributes = self.attributes()?;
        let class = self.expect_keyword(Keyword::Class)?;
        let arguments = if self.at(Punctuator::LParenthesis) {
            Some(self.arguments()?)
        } else {
            None
        };
        let (extends, superclass) = match self.eat_keyword(Keyword::Extends) {
            Some(kw) => (Some(kw), Some(self.expect_name()?)),
            None => (None, None),
        };
        let (implements, interfaces) = self.implements_clause()?;
        let (open, members, close) = self.class_body()?;
        Ok(node![
            AnonymousClass,
            attributes,
            class,
            arguments,
            extends,
            superclass,
            implements,
            interfaces,
            open,
            members,
            close,
        ])
    }

    /// Closure or arrow function, after any attributes.
    pub(super) fn closure(&mut self, attributes: Tree) -> PResult {
        let modifier = self.eat_keyword(Keyword::Static);
        if self.at_keyword(Keyword::Fn) {
            let keyword = self.token();
            let by_ref = self.eat(Punctuator::Ampersand);
            let parameters = self.parameter_list()?;
            let return_type = self.return_type_clause()?;
            let arrow = self.expect(Punctuator::DoubleArrow)?;
            let body = self.expression()?;
            return Ok(node![
                ArrowFunctionExpression,
                attributes,
                modifier,
                keyword,
                by_ref,
                parameters,
                return_type,
                arrow,
                body,
            ]);
        }
        let keyword = self.expect_keyword(Keyword::Function)?;
        let by_ref = self.eat(Punctuator::Ampersand);
        let parameters = self.parameter_list()?;
        let lexical_vars = if self.at_keyword(Keyword::Use) {
            Some(self.lexical_variables()?)
        } else {
            None
        };
        let return_type = self.return_type_clause()?;
        let body = self.block()?;
        Ok(node![
            FunctionExpression,
            attributes,
            modifier,
            keyword,
            by_ref,
            parameters,
            lexical_vars,
            return_type,
            body,
        ])
    }

    fn lexical_variables(&mut self) -> PResult {
        let keyword = self.token();
        let open = self.expect(Punctuator::LParenthesis)?;
        let list = self.separated_list(&[Punctuator::RParenthesis], false, |p| {
            if p.at(Punctuator::Ampersand) {
                let amp = p.token();
                let var = p.expect_variable()?;
                Ok(node![ReferenceVariable, amp, var])
            } else {
                p.expect_variable()
            }
        })?;
        let close = self.expect(Punctuator::RParenthesis)?;
        Ok(node![LexicalVariables, keyword, open, list, close])
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::tree::{Kind, Tree};

    fn expr(source: &str) -> Tree {
        let input = format!("<?php {source};");
        let lexed = tokenize(&input);
        let unit = parse(&lexed.tokens).expect("should parse");
        let stmt = unit.child(1).expect("statement");
        assert!(stmt.is(Kind::ExpressionStatement), "{:?}", stmt.kind());
        stmt.child(0).cloned().expect("expression")
    }

    fn kinds(tree: &Tree) -> Vec<Kind> {
        tree.descendants()
            .filter(|t| !t.is_leaf())
            .map(Tree::kind)
            .collect()
    }

    #[test]
    fn precedence_of_additive_and_multiplicative() {
        let tree = expr("1 + 2 * 3");
        assert!(tree.is(Kind::Plus));
        assert!(tree.child(2).is_some_and(|t| t.is(Kind::Multiply)));
    }

    #[test]
    fn left_associative_minus() {
        let tree = expr("1 - 2 - 3");
        assert!(tree.is(Kind::Minus));
        assert!(tree.child(0).is_some_and(|t| t.is(Kind::Minus)));
    }

    #[test]
    fn power_is_right_associative() {
        let tree = expr("$a ** $b ** $c");
        assert!(tree.is(Kind::Power));
        assert!(tree.child(0).is_some_and(|t| t.is(Kind::VariableIdentifier)));
        assert!(tree.child(2).is_some_and(|t| t.is(Kind::Power)));
    }

    #[test]
    fn power_binds_tighter_than_unary_minus() {
        let tree = expr("-$a ** 2");
        assert!(tree.is(Kind::UnaryMinus));
        assert!(tree.child(1).is_some_and(|t| t.is(Kind::Power)));
    }

    #[test]
    fn power_accepts_unary_on_the_right() {
        let tree = expr("2 ** -1");
        assert!(tree.is(Kind::Power));
        assert!(tree.child(2).is_some_and(|t| t.is(Kind::UnaryMinus)));
    }

    #[test]
    fn power_below_member_access() {
        let tree = expr("$a->b ** $c[0]");
        assert!(tree.is(Kind::Power));
        assert!(tree.child(0).is_some_and(|t| t.is(Kind::ObjectMemberAccess)));
        assert!(tree.child(2).is_some_and(|t| t.is(Kind::ArrayAccess)));
    }

    #[test]
    fn match_as_power_operand() {
        let tree = expr("match ($x) { 1, 2 => 3, default => 4, } ** 2");
        assert!(tree.is(Kind::Power));
        assert!(tree.child(0).is_some_and(|t| t.is(Kind::MatchExpression)));
    }

    #[test]
    fn assignment_is_right_associative() {
        let tree = expr("$a = $b = 1");
        assert!(tree.is(Kind::Assignment));
        assert!(tree.child(2).is_some_and(|t| t.is(Kind::Assignment)));
    }

    #[test]
    fn assignment_binds_tighter_than_and_keyword() {
        let tree = expr("$a = $b and $c");
        assert!(tree.is(Kind::AlternativeConditionalAnd));
        assert!(tree.child(0).is_some_and(|t| t.is(Kind::Assignment)));
    }

    #[test]
    fn negated_assignment() {
        let tree = expr("!$a = f()");
        assert!(tree.is(Kind::LogicalComplement));
        assert!(tree.child(1).is_some_and(|t| t.is(Kind::Assignment)));
    }

    #[test]
    fn reference_and_compound_assignment() {
        assert!(expr("$a = &$b").is(Kind::AssignmentByReference));
        assert!(expr("$a ??= 1").is(Kind::CompoundAssignment));
        assert!(expr("[$a, , $b] = $c").is(Kind::Assignment));
    }

    #[test]
    fn ternary_forms() {
        let full = expr("$a ? $b : $c");
        assert!(full.is(Kind::ConditionalExpression));
        assert!(full.child(2).is_some());
        let short = expr("$a ?: $c");
        assert!(short.child(2).is_none());
    }

    #[test]
    fn coalesce_is_right_associative() {
        let tree = expr("$a ?? $b ?? $c");
        assert!(tree.is(Kind::NullCoalescing));
        assert!(tree.child(2).is_some_and(|t| t.is(Kind::NullCoalescing)));
    }

    #[test]
    fn not_instanceof() {
        let tree = expr("!$a instanceof B");
        assert!(tree.is(Kind::LogicalComplement));
        assert!(tree.child(1).is_some_and(|t| t.is(Kind::Instanceof)));
    }

    #[test]
    fn calls_and_members() {
        let tree = expr("$obj?->get(1, ...$rest)::CONST");
        assert_eq!(kinds(&tree), vec![
            Kind::ClassMemberAccess,
            Kind::FunctionCall,
            Kind::NullsafeObjectMemberAccess,
            Kind::Arguments,
            Kind::SeparatedList,
            Kind::CallArgument,
            Kind::CallArgument,
            Kind::SpreadArgument,
        ]);
    }

    #[test]
    fn named_arguments_accept_keywords() {
        let tree = expr("f(if: 1, value: 2)");
        let list = tree
            .child(1)
            .and_then(|args| args.child(1))
            .expect("argument list");
        let names: Vec<_> = list
            .children()
            .flatten()
            .filter(|t| t.is(Kind::CallArgument))
            .filter_map(|arg| arg.child(0).and_then(Tree::text))
            .collect();
        assert_eq!(names, vec!["if", "value"]);
    }

    #[test]
    fn first_class_callable() {
        let tree = expr("strlen(...)");
        assert!(tree.child(1).is_some_and(|t| t.is(Kind::CallableConvert)));
    }

    #[test]
    fn new_forms() {
        let call = expr("new Foo(1)");
        assert!(call.child(1).is_some_and(|t| t.is(Kind::FunctionCall)));
        let bare = expr("new Foo");
        assert!(bare.child(1).is_some_and(|t| t.is(Kind::NameIdentifier)));
        let anon = expr("new class(1) extends A implements B, C { public $x; }");
        assert!(anon.child(1).is_some_and(|t| t.is(Kind::AnonymousClass)));
        let dynamic = expr("new $this->cls['k']()");
        let class = dynamic.child(1).and_then(|c| c.child(0));
        assert!(class.is_some_and(|t| t.is(Kind::ArrayAccess)));
    }

    #[test]
    fn closures() {
        let tree = expr("static function &($a) use (&$b, $c,): ?int { return 1; }");
        assert!(tree.is(Kind::FunctionExpression));
        assert!(tree.child(1).is_some());
        assert!(tree.child(3).is_some());
        assert!(tree.child(5).is_some_and(|t| t.is(Kind::LexicalVariables)));
        assert!(tree.child(6).is_some_and(|t| t.is(Kind::ReturnTypeClause)));
    }

    #[test]
    fn arrow_functions() {
        let tree = expr("fn(int $x): int => $x * 2");
        assert!(tree.is(Kind::ArrowFunctionExpression));
        assert!(tree.child(7).is_some_and(|t| t.is(Kind::Multiply)));
        let attributed = expr("#[Pure] fn() => 1");
        assert!(attributed.child(0).is_some_and(|t| t.slot_count() == 1));
    }

    #[test]
    fn arrays_and_lists() {
        let tree = expr("['a' => 1, ...$b, &$c]");
        assert!(tree.is(Kind::ArrayInitializerBracket));
        assert!(expr("array(1, 2)").is(Kind::ArrayInitializerFunction));
        assert!(expr("list('a' => $x) = $y").is(Kind::Assignment));
    }

    #[test]
    fn prefix_keywords() {
        assert!(expr("print $a . $b").is(Kind::PrintExpression));
        assert!(expr("clone $a").is(Kind::CloneExpression));
        assert!(expr("require_once __DIR__ . '/x.php'").is(Kind::IncludeExpression));
        assert!(expr("$a ?? throw new E()").is(Kind::NullCoalescing));
        assert!(expr("(int) $a").is(Kind::CastExpression));
        assert!(expr("@f()").is(Kind::ErrorControl));
    }

    #[test]
    fn yields() {
        let bare = expr("yield");
        assert!(bare.child(3).is_none());
        let keyed = expr("yield $k => $v");
        assert!(keyed.child(1).is_some());
        assert!(expr("yield from gen()").is(Kind::YieldFromExpression));
    }

    #[test]
    fn literals() {
        assert!(expr("TRUE").is(Kind::BooleanLiteral));
        assert!(expr("null").is(Kind::NullLiteral));
        assert!(expr("__CLASS__").is(Kind::MagicConstant));
        assert!(expr("\\Foo\\BAR").is(Kind::NamespaceName));
        assert!(expr("\"a $b\"").is(Kind::ExpandableStringLiteral));
        assert!(expr("'a'").is(Kind::RegularStringLiteral));
    }

    #[test]
    fn variable_variables() {
        assert!(expr("$$a").is(Kind::VariableVariable));
        assert!(expr("${'a' . 'b'}").is(Kind::CompoundVariableName));
        assert!(expr("$a->{$b}").is(Kind::ObjectMemberAccess));
    }
}
