//! Typed, read-only views over [`Tree`] nodes of the most used kinds.
//!
//! Each view wraps a borrowed tree of the right kind; `cast` returns
//! `None` for any other kind.

use crate::literal::{integer_literal_value, string_literal_value};
use crate::token::Token;
use crate::tree::{Kind, Tree};

macro_rules! view {
    ($(#[$meta:meta])* $name:ident: $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(&'a Tree);

        impl<'a> $name<'a> {
            #[must_use]
            pub fn cast(tree: &'a Tree) -> Option<Self> {
                matches!(tree.kind(), $(Kind::$kind)|+).then_some(Self(tree))
            }

            /// The underlying tree.
            #[must_use]
            pub const fn syntax(&self) -> &'a Tree {
                self.0
            }
        }
    };
}

view!(
    /// `callee(arguments)`.
    FunctionCall: FunctionCall
);
view!(CallArgument: CallArgument);
view!(
    /// `function (...) use (...) { ... }`.
    FunctionExpression: FunctionExpression
);
view!(ArrowFunction: ArrowFunctionExpression);
view!(
    /// Any scalar literal leaf.
    Literal: IntegerLiteral
        | FloatLiteral
        | RegularStringLiteral
        | ExpandableStringLiteral
        | HeredocLiteral
        | NowdocLiteral
        | BooleanLiteral
        | NullLiteral
        | MagicConstant
);
view!(
    /// `[lhs, operator, rhs]` of any binary kind.
    BinaryExpression: Power
        | Multiply
        | Divide
        | Remainder
        | Plus
        | Minus
        | Concatenation
        | LeftShift
        | RightShift
        | LessThan
        | GreaterThan
        | LessThanOrEqualTo
        | GreaterThanOrEqualTo
        | Spaceship
        | EqualTo
        | NotEqualTo
        | StrictEqualTo
        | StrictNotEqualTo
        | BitwiseAnd
        | BitwiseXor
        | BitwiseOr
        | ConditionalAnd
        | ConditionalOr
        | NullCoalescing
        | AlternativeConditionalAnd
        | AlternativeConditionalOr
        | AlternativeConditionalXor
        | Instanceof
);
view!(MatchExpression: MatchExpression);
view!(
    /// Class, interface, trait or enum declaration.
    ClassLike: ClassDeclaration | InterfaceDeclaration | TraitDeclaration | EnumDeclaration
);
view!(UseStatement: UseStatement | GroupUseStatement);

fn parameters_of(list: Option<&Tree>) -> impl Iterator<Item = &Tree> {
    list.and_then(|l| l.child(1))
        .into_iter()
        .flat_map(Tree::elements)
}

impl<'a> FunctionCall<'a> {
    #[must_use]
    pub fn callee(&self) -> Option<&'a Tree> {
        self.0.child(0)
    }

    /// Name of a directly named callee, without a leading `\`.
    #[must_use]
    pub fn function_name(&self) -> Option<&'a str> {
        let callee = self.callee()?;
        if !callee.is(Kind::NameIdentifier) && !callee.is(Kind::NamespaceName) {
            return None;
        }
        callee.text().map(|t| t.trim_start_matches('\\'))
    }

    /// Whether this is first-class callable syntax `f(...)`.
    #[must_use]
    pub fn is_callable_convert(&self) -> bool {
        self.0.child(1).is_some_and(|c| c.is(Kind::CallableConvert))
    }

    pub fn arguments(&self) -> impl Iterator<Item = CallArgument<'a>> {
        self.0
            .child(1)
            .filter(|a| a.is(Kind::Arguments))
            .and_then(|a| a.child(1))
            .into_iter()
            .flat_map(Tree::elements)
            .filter_map(CallArgument::cast)
    }
}

impl<'a> CallArgument<'a> {
    /// Parameter name of a named argument.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.child(0).and_then(Tree::text)
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a Tree> {
        self.0.child(2)
    }

    #[must_use]
    pub fn is_spread(&self) -> bool {
        self.value().is_some_and(|v| v.is(Kind::SpreadArgument))
    }
}

impl<'a> FunctionExpression<'a> {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.0.child(1).is_some()
    }

    #[must_use]
    pub fn returns_reference(&self) -> bool {
        self.0.child(3).is_some()
    }

    pub fn parameters(&self) -> impl Iterator<Item = &'a Tree> {
        parameters_of(self.0.child(4))
    }

    /// The `use (...)` clause.
    #[must_use]
    pub fn lexical_variables(&self) -> Option<&'a Tree> {
        self.0.child(5)
    }

    /// Captured variables, `&$x` captures as `ReferenceVariable` nodes.
    pub fn captured(&self) -> impl Iterator<Item = &'a Tree> {
        self.lexical_variables()
            .and_then(|l| l.child(2))
            .into_iter()
            .flat_map(Tree::elements)
    }

    #[must_use]
    pub fn return_type(&self) -> Option<&'a Tree> {
        self.0.child(6).and_then(|c| c.child(1))
    }

    #[must_use]
    pub fn body(&self) -> Option<&'a Tree> {
        self.0.child(7)
    }
}

impl<'a> ArrowFunction<'a> {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.0.child(1).is_some()
    }

    pub fn parameters(&self) -> impl Iterator<Item = &'a Tree> {
        parameters_of(self.0.child(4))
    }

    #[must_use]
    pub fn return_type(&self) -> Option<&'a Tree> {
        self.0.child(5).and_then(|c| c.child(1))
    }

    #[must_use]
    pub fn body(&self) -> Option<&'a Tree> {
        self.0.child(7)
    }
}

impl<'a> Literal<'a> {
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind()
    }

    #[must_use]
    pub fn token(&self) -> Option<&'a Token> {
        self.0.token()
    }

    /// Literal text as written.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.0.text().unwrap_or_default()
    }

    /// Decoded value of a regular (non-interpolating) string literal.
    #[must_use]
    pub fn string_value(&self) -> Option<String> {
        if self.kind() != Kind::RegularStringLiteral {
            return None;
        }
        string_literal_value(self.text())
    }

    #[must_use]
    pub fn integer_value(&self) -> Option<i64> {
        if self.kind() != Kind::IntegerLiteral {
            return None;
        }
        integer_literal_value(self.text())
    }
}

impl<'a> BinaryExpression<'a> {
    #[must_use]
    pub fn left(&self) -> Option<&'a Tree> {
        self.0.child(0)
    }

    #[must_use]
    pub fn operator(&self) -> Option<&'a Token> {
        self.0.child(1).and_then(Tree::token)
    }

    #[must_use]
    pub fn right(&self) -> Option<&'a Tree> {
        self.0.child(2)
    }
}

impl<'a> MatchExpression<'a> {
    #[must_use]
    pub fn subject(&self) -> Option<&'a Tree> {
        self.0.child(2)
    }

    /// `MatchConditionClause` and `MatchDefaultClause` nodes in order.
    pub fn arms(&self) -> impl Iterator<Item = &'a Tree> {
        self.0.child(5).into_iter().flat_map(Tree::elements)
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.arms().any(|arm| arm.is(Kind::MatchDefaultClause))
    }
}

impl<'a> ClassLike<'a> {
    /// Slot of the name, which differs between class and the others.
    const fn name_slot(&self) -> usize {
        match self.0.kind() {
            Kind::ClassDeclaration => 3,
            _ => 2,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.child(self.name_slot()).and_then(Tree::text)
    }

    /// `AttributeGroup` nodes.
    pub fn attributes(&self) -> impl Iterator<Item = &'a Tree> {
        self.0.child(0).into_iter().flat_map(Tree::elements)
    }

    /// Member declarations in source order.
    pub fn members(&self) -> impl Iterator<Item = &'a Tree> {
        let slot = self.0.slot_count().saturating_sub(2);
        self.0.child(slot).into_iter().flat_map(Tree::elements)
    }
}

impl<'a> UseStatement<'a> {
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.0.is(Kind::GroupUseStatement)
    }

    /// `function` or `const` for typed imports.
    #[must_use]
    pub fn import_type(&self) -> Option<&'a str> {
        self.0.child(1).and_then(Tree::text)
    }

    pub fn clauses(&self) -> impl Iterator<Item = &'a Tree> {
        let slot = if self.is_group() { 5 } else { 2 };
        self.0.child(slot).into_iter().flat_map(Tree::elements)
    }

    /// Fully qualified imported names, group prefixes applied.
    #[must_use]
    pub fn imported_names(&self) -> Vec<String> {
        let prefix = if self.is_group() {
            self.0.child(2).and_then(Tree::text)
        } else {
            None
        };
        self.clauses()
            .filter_map(|clause| clause.child(1).and_then(Tree::text))
            .map(|name| match prefix {
                Some(prefix) => format!("{prefix}\\{name}"),
                None => name.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn parse_source(source: &str) -> Tree {
        parse(&tokenize(source).tokens).expect("should parse")
    }

    fn find(tree: &Tree, kind: Kind) -> &Tree {
        tree.descendants()
            .find(|t| t.is(kind))
            .expect("kind present")
    }

    #[test]
    fn function_call_view() {
        let tree = parse_source("<?php \\preg_match('/a/', subject: $s);");
        let call = FunctionCall::cast(find(&tree, Kind::FunctionCall)).expect("call");
        assert_eq!(call.function_name(), Some("preg_match"));
        let args: Vec<_> = call.arguments().collect();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].name(), None);
        assert_eq!(args[1].name(), Some("subject"));
        assert!(FunctionCall::cast(&tree).is_none());
    }

    #[test]
    fn closure_view() {
        let tree = parse_source("<?php $f = function ($a, $b) use ($c,): bool {};");
        let closure = FunctionExpression::cast(find(&tree, Kind::FunctionExpression))
            .expect("closure");
        assert_eq!(closure.parameters().count(), 2);
        assert_eq!(closure.captured().count(), 1);
        assert!(closure.return_type().is_some());
        assert!(!closure.is_static());
    }

    #[test]
    fn literal_view() {
        let tree = parse_source("<?php f('a\\'b', 0x10);");
        let literals: Vec<_> = tree.descendants().filter_map(Literal::cast).collect();
        assert_eq!(literals[0].string_value(), Some("a'b".to_string()));
        assert_eq!(literals[1].integer_value(), Some(16));
    }

    #[test]
    fn class_like_view() {
        let tree = parse_source("<?php #[A] class C { const X = 1; function f() {} }");
        let class = ClassLike::cast(find(&tree, Kind::ClassDeclaration)).expect("class");
        assert_eq!(class.name(), Some("C"));
        assert_eq!(class.members().count(), 2);
        assert_eq!(class.attributes().count(), 1);

        let tree = parse_source("<?php enum E { case A; }");
        let e = ClassLike::cast(find(&tree, Kind::EnumDeclaration)).expect("enum");
        assert_eq!(e.name(), Some("E"));
        assert_eq!(e.members().count(), 1);
    }

    #[test]
    fn use_statement_view() {
        let tree = parse_source("<?php use A\\{B, C\\D};");
        let stmt = UseStatement::cast(find(&tree, Kind::GroupUseStatement)).expect("use");
        assert_eq!(stmt.imported_names(), vec!["A\\B", "A\\C\\D"]);
    }

    #[test]
    fn binary_and_match_views() {
        let tree = parse_source("<?php $x = match ($a) { 1 => 2, default => 3 } . 'x';");
        let concat = BinaryExpression::cast(find(&tree, Kind::Concatenation)).expect("binary");
        assert_eq!(concat.operator().map(|t| t.text.as_str()), Some("."));
        let m = MatchExpression::cast(concat.left().expect("lhs")).expect("match");
        assert_eq!(m.arms().count(), 2);
        assert!(m.has_default());
    }
}
