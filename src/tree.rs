//! The syntax tree: a closed set of node kinds over a single node type.
//!
//! A [`Tree`] is either a leaf wrapping exactly one [`Token`] or an
//! interior node holding an ordered list of child slots. Optional grammar
//! pieces are `None` slots, so every kind except the list kinds has a
//! fixed number of slots (see [`Kind::arity`]).

use crate::issue::IssueLocation;
use crate::token::Token;

/// Grammar production a tree node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    // leaves
    /// A punctuator or keyword that is part of a larger construct.
    Token,
    /// Inline HTML or a standalone open/close tag.
    InlineHtml,
    /// A lone `;`.
    EmptyStatement,
    VariableIdentifier,
    NameIdentifier,
    /// Qualified or fully qualified name such as `\Foo\Bar`.
    NamespaceName,
    /// `int`, `string`, `void`, `never`, ... in type position.
    BuiltInType,
    IntegerLiteral,
    FloatLiteral,
    /// Single-quoted or non-interpolating double-quoted string.
    RegularStringLiteral,
    ExpandableStringLiteral,
    HeredocLiteral,
    NowdocLiteral,
    /// Backtick shell command.
    ExecutionOperator,
    BooleanLiteral,
    NullLiteral,
    /// `__LINE__`, `__CLASS__`, ...
    MagicConstant,

    // lists
    /// Top-level statements followed by the end-of-file token.
    CompilationUnit,
    List,
    /// Elements interleaved with separator tokens; trailing separator allowed.
    SeparatedList,
    UnionType,
    IntersectionType,

    // expressions
    ParenthesisedExpression,
    Assignment,
    AssignmentByReference,
    CompoundAssignment,
    ConditionalExpression,
    Power,
    Multiply,
    Divide,
    Remainder,
    Plus,
    Minus,
    Concatenation,
    LeftShift,
    RightShift,
    LessThan,
    GreaterThan,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
    Spaceship,
    EqualTo,
    NotEqualTo,
    StrictEqualTo,
    StrictNotEqualTo,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    ConditionalAnd,
    ConditionalOr,
    NullCoalescing,
    AlternativeConditionalAnd,
    AlternativeConditionalOr,
    AlternativeConditionalXor,
    Instanceof,
    UnaryMinus,
    UnaryPlus,
    LogicalComplement,
    BitwiseComplement,
    ErrorControl,
    PrefixIncrement,
    PrefixDecrement,
    PostfixIncrement,
    PostfixDecrement,
    CastExpression,
    ReferenceVariable,
    SpreadArgument,
    CloneExpression,
    PrintExpression,
    ThrowExpression,
    IncludeExpression,
    VariableVariable,
    YieldExpression,
    YieldFromExpression,
    NewExpression,
    AnonymousClass,
    FunctionCall,
    Arguments,
    /// First-class callable syntax `f(...)`.
    CallableConvert,
    CallArgument,
    ObjectMemberAccess,
    NullsafeObjectMemberAccess,
    ClassMemberAccess,
    ArrayAccess,
    /// `{expr}` used as a member name.
    ComputedVariableName,
    /// `${expr}`.
    CompoundVariableName,
    ArrayInitializerBracket,
    ArrayInitializerFunction,
    ArrayPair,
    ListExpression,
    FunctionExpression,
    ArrowFunctionExpression,
    LexicalVariables,
    ReturnTypeClause,
    MatchExpression,
    MatchConditionClause,
    MatchDefaultClause,
    ParameterList,
    Parameter,
    Type,
    DnfTypeGroup,
    AttributeGroup,
    Attribute,

    // statements
    Block,
    ExpressionStatement,
    IfStatement,
    ElseifClause,
    ElseClause,
    AlternativeIfStatement,
    AlternativeElseifClause,
    AlternativeElseClause,
    WhileStatement,
    AlternativeWhileStatement,
    DoWhileStatement,
    ForStatement,
    AlternativeForStatement,
    ForeachStatement,
    AlternativeForeachStatement,
    SwitchStatement,
    AlternativeSwitchStatement,
    CaseClause,
    DefaultClause,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    EchoStatement,
    /// `<?= expr ?>`.
    EchoTagStatement,
    GlobalStatement,
    StaticStatement,
    VariableDeclaration,
    UnsetStatement,
    ThrowStatement,
    TryStatement,
    CatchBlock,
    FinallyClause,
    GotoStatement,
    LabelStatement,
    DeclareStatement,

    // declarations
    NamespaceStatement,
    UseStatement,
    GroupUseStatement,
    UseClause,
    ConstantDeclaration,
    FunctionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TraitDeclaration,
    EnumDeclaration,
    ClassPropertyDeclaration,
    ClassConstantDeclaration,
    MethodDeclaration,
    UseTraitDeclaration,
    TraitPrecedence,
    TraitAlias,
    TraitMethodReference,
    EnumCase,
}

impl Kind {
    /// Whether trees of this kind are leaves.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(
            self,
            Self::Token
                | Self::InlineHtml
                | Self::EmptyStatement
                | Self::VariableIdentifier
                | Self::NameIdentifier
                | Self::NamespaceName
                | Self::BuiltInType
                | Self::IntegerLiteral
                | Self::FloatLiteral
                | Self::RegularStringLiteral
                | Self::ExpandableStringLiteral
                | Self::HeredocLiteral
                | Self::NowdocLiteral
                | Self::ExecutionOperator
                | Self::BooleanLiteral
                | Self::NullLiteral
                | Self::MagicConstant
        )
    }

    /// Whether this is one of the `[lhs, operator, rhs]` binary kinds.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(
            self,
            Self::Power
                | Self::Multiply
                | Self::Divide
                | Self::Remainder
                | Self::Plus
                | Self::Minus
                | Self::Concatenation
                | Self::LeftShift
                | Self::RightShift
                | Self::LessThan
                | Self::GreaterThan
                | Self::LessThanOrEqualTo
                | Self::GreaterThanOrEqualTo
                | Self::Spaceship
                | Self::EqualTo
                | Self::NotEqualTo
                | Self::StrictEqualTo
                | Self::StrictNotEqualTo
                | Self::BitwiseAnd
                | Self::BitwiseXor
                | Self::BitwiseOr
                | Self::ConditionalAnd
                | Self::ConditionalOr
                | Self::NullCoalescing
                | Self::AlternativeConditionalAnd
                | Self::AlternativeConditionalOr
                | Self::AlternativeConditionalXor
                | Self::Instanceof
        )
    }

    /// Number of child slots of an interior node of this kind.
    ///
    /// `None` for leaves and for the variable-length list kinds.
    #[must_use]
    pub const fn arity(self) -> Option<usize> {
        if self.is_leaf() {
            return None;
        }
        if self.is_binary() {
            return Some(3);
        }
        let n = match self {
            Self::CompilationUnit
            | Self::List
            | Self::SeparatedList
            | Self::UnionType
            | Self::IntersectionType => return None,

            Self::UnaryMinus
            | Self::UnaryPlus
            | Self::LogicalComplement
            | Self::BitwiseComplement
            | Self::ErrorControl
            | Self::PrefixIncrement
            | Self::PrefixDecrement
            | Self::PostfixIncrement
            | Self::PostfixDecrement
            | Self::CastExpression
            | Self::ReferenceVariable
            | Self::SpreadArgument
            | Self::CloneExpression
            | Self::PrintExpression
            | Self::ThrowExpression
            | Self::IncludeExpression
            | Self::VariableVariable
            | Self::NewExpression
            | Self::FunctionCall
            | Self::ReturnTypeClause
            | Self::Type
            | Self::Attribute
            | Self::ExpressionStatement
            | Self::ElseClause
            | Self::FinallyClause
            | Self::LabelStatement => 2,

            Self::ParenthesisedExpression
            | Self::Assignment
            | Self::CompoundAssignment
            | Self::YieldFromExpression
            | Self::Arguments
            | Self::CallableConvert
            | Self::CallArgument
            | Self::ObjectMemberAccess
            | Self::NullsafeObjectMemberAccess
            | Self::ClassMemberAccess
            | Self::ComputedVariableName
            | Self::ArrayInitializerBracket
            | Self::ArrayPair
            | Self::MatchConditionClause
            | Self::MatchDefaultClause
            | Self::ParameterList
            | Self::DnfTypeGroup
            | Self::AttributeGroup
            | Self::Block
            | Self::ElseifClause
            | Self::AlternativeElseClause
            | Self::WhileStatement
            | Self::DefaultClause
            | Self::BreakStatement
            | Self::ContinueStatement
            | Self::ReturnStatement
            | Self::EchoStatement
            | Self::EchoTagStatement
            | Self::GlobalStatement
            | Self::StaticStatement
            | Self::VariableDeclaration
            | Self::ThrowStatement
            | Self::GotoStatement
            | Self::ConstantDeclaration
            | Self::TraitMethodReference => 3,

            Self::AssignmentByReference
            | Self::YieldExpression
            | Self::ArrayAccess
            | Self::CompoundVariableName
            | Self::ArrayInitializerFunction
            | Self::ListExpression
            | Self::LexicalVariables
            | Self::AlternativeElseifClause
            | Self::CaseClause
            | Self::TryStatement
            | Self::UseStatement
            | Self::UseClause
            | Self::TraitPrecedence => 4,

            Self::ConditionalExpression
            | Self::IfStatement
            | Self::DoWhileStatement
            | Self::SwitchStatement
            | Self::UnsetStatement
            | Self::DeclareStatement
            | Self::ClassPropertyDeclaration
            | Self::TraitAlias => 5,

            Self::AlternativeWhileStatement
            | Self::AlternativeSwitchStatement
            | Self::CatchBlock
            | Self::NamespaceStatement
            | Self::TraitDeclaration
            | Self::ClassConstantDeclaration
            | Self::UseTraitDeclaration
            | Self::EnumCase => 6,

            Self::MatchExpression | Self::FunctionDeclaration => 7,

            Self::FunctionExpression
            | Self::ArrowFunctionExpression
            | Self::Parameter
            | Self::AlternativeIfStatement
            | Self::GroupUseStatement
            | Self::InterfaceDeclaration
            | Self::MethodDeclaration => 8,

            Self::ForStatement | Self::ForeachStatement => 9,

            Self::AnonymousClass | Self::EnumDeclaration => 10,

            Self::ClassDeclaration => 11,

            Self::AlternativeForStatement | Self::AlternativeForeachStatement => 12,

            // leaves and binaries handled above
            _ => return None,
        };
        Some(n)
    }
}

/// A leaf: one token tagged with the kind it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    kind: Kind,
    token: Token,
}

/// An interior node with ordered, possibly empty, child slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: Kind,
    children: Vec<Option<Tree>>,
}

/// Immutable syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Leaf(Leaf),
    Node(Node),
}

impl Tree {
    #[must_use]
    pub fn leaf(kind: Kind, token: Token) -> Self {
        debug_assert!(kind.is_leaf(), "{kind:?} is not a leaf kind");
        Self::Leaf(Leaf { kind, token })
    }

    #[must_use]
    pub fn node(kind: Kind, children: Vec<Option<Self>>) -> Self {
        debug_assert!(!kind.is_leaf(), "{kind:?} is a leaf kind");
        debug_assert!(
            kind.arity().is_none_or(|n| n == children.len()),
            "{kind:?} expects {:?} children, got {}",
            kind.arity(),
            children.len()
        );
        Self::Node(Node { kind, children })
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Leaf(leaf) => leaf.kind,
            Self::Node(node) => node.kind,
        }
    }

    #[must_use]
    pub fn is(&self, kind: Kind) -> bool {
        self.kind() == kind
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The token of a leaf.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::Leaf(leaf) => Some(&leaf.token),
            Self::Node(_) => None,
        }
    }

    /// Text of a leaf's token.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.token().map(|t| t.text.as_str())
    }

    /// Direct children, left to right, one item per slot.
    ///
    /// Absent slots are yielded as `None`; leaves have no children.
    #[must_use]
    pub fn children(&self) -> Children<'_> {
        let slots: &[Option<Self>] = match self {
            Self::Leaf(_) => &[],
            Self::Node(node) => &node.children,
        };
        Children {
            inner: slots.iter(),
        }
    }

    /// The child in slot `index`, if the slot exists and is filled.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        match self {
            Self::Leaf(_) => None,
            Self::Node(node) => node.children.get(index).and_then(Option::as_ref),
        }
    }

    /// Elements of a list node, skipping separators and omitted elements.
    ///
    /// For `SeparatedList`, `UnionType` and `IntersectionType` these are
    /// the even slots; for other nodes, every filled slot.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        let step = match self.kind() {
            Kind::SeparatedList | Kind::UnionType | Kind::IntersectionType => 2,
            _ => 1,
        };
        self.children().step_by(step).flatten()
    }

    /// Number of slots, filled or not.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Node(node) => node.children.len(),
        }
    }

    #[must_use]
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            Self::Leaf(leaf) => Some(&leaf.token),
            Self::Node(node) => node.children.iter().flatten().find_map(Self::first_token),
        }
    }

    #[must_use]
    pub fn last_token(&self) -> Option<&Token> {
        match self {
            Self::Leaf(leaf) => Some(&leaf.token),
            Self::Node(node) => node
                .children
                .iter()
                .rev()
                .flatten()
                .find_map(Self::last_token),
        }
    }

    /// Every token of the tree, in source order.
    #[must_use]
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: vec![self],
        }
    }

    /// This tree and all its descendants in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self],
        }
    }

    /// Range from the first token's start to the last token's end.
    ///
    /// `None` for a node without any token, such as an empty list.
    #[must_use]
    pub fn location(&self) -> Option<IssueLocation> {
        let first = self.first_token()?;
        let last = self.last_token()?;
        Some(IssueLocation::between(first, last))
    }
}

/// Strip any number of `ParenthesisedExpression` wrappers.
#[must_use]
pub fn skip_parentheses(tree: &Tree) -> &Tree {
    let mut current = tree;
    while current.is(Kind::ParenthesisedExpression) {
        match current.child(1) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Iterator over the child slots of a tree.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    inner: std::slice::Iter<'a, Option<Tree>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Option<&'a Tree>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Option::as_ref)
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Iterator over the tokens of a tree.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    stack: Vec<&'a Tree>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(tree) = self.stack.pop() {
            match tree {
                Tree::Leaf(leaf) => return Some(&leaf.token),
                Tree::Node(node) => self.stack.extend(node.children.iter().rev().flatten()),
            }
        }
        None
    }
}

/// Pre-order iterator over a tree and its descendants.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Tree>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Tree;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.stack.pop()?;
        if let Tree::Node(node) = tree {
            self.stack.extend(node.children.iter().rev().flatten());
        }
        Some(tree)
    }
}

/// Anything that can fill a child slot.
pub(crate) trait Slot {
    fn into_slot(self) -> Option<Tree>;
}

impl Slot for Tree {
    fn into_slot(self) -> Option<Tree> {
        Some(self)
    }
}

impl Slot for Option<Tree> {
    fn into_slot(self) -> Option<Tree> {
        self
    }
}

/// Build an interior node from a kind and its slots.
macro_rules! node {
    ($kind:ident $(, $child:expr)* $(,)?) => {
        $crate::tree::Tree::node(
            $crate::tree::Kind::$kind,
            vec![$($crate::tree::Slot::into_slot($child)),*],
        )
    };
}

pub(crate) use node;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Span, TokenKind};

    fn tok(text: &str, column: usize) -> Tree {
        Tree::leaf(
            Kind::Token,
            Token {
                kind: TokenKind::Punctuator,
                text: text.to_string(),
                span: Span::new(1, column),
                trivia: Vec::new(),
            },
        )
    }

    fn var(text: &str, column: usize) -> Tree {
        Tree::leaf(
            Kind::VariableIdentifier,
            Token {
                kind: TokenKind::Variable,
                text: text.to_string(),
                span: Span::new(1, column),
                trivia: Vec::new(),
            },
        )
    }

    #[test]
    fn every_fixed_kind_reports_arity() {
        assert_eq!(Kind::Power.arity(), Some(3));
        assert_eq!(Kind::FunctionExpression.arity(), Some(8));
        assert_eq!(Kind::SeparatedList.arity(), None);
        assert_eq!(Kind::Token.arity(), None);
    }

    #[test]
    fn children_include_absent_slots() {
        let ret = node![ReturnStatement, tok("return", 0), None, tok(";", 6)];
        let slots: Vec<_> = ret.children().map(|c| c.is_some()).collect();
        assert_eq!(slots, vec![true, false, true]);
        assert_eq!(ret.children().len(), 3);
        assert!(ret.child(1).is_none());
    }

    #[test]
    fn tokens_in_order() {
        let tree = node![Power, var("$a", 0), tok("**", 3), var("$b", 6)];
        let texts: Vec<_> = tree.tokens().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["$a", "**", "$b"]);
        assert_eq!(tree.first_token().map(|t| t.column()), Some(0));
        assert_eq!(tree.last_token().map(|t| t.column()), Some(6));
    }

    #[test]
    fn descendants_pre_order() {
        let tree = node![Power, var("$a", 0), tok("**", 3), var("$b", 6)];
        let kinds: Vec<_> = tree.descendants().map(Tree::kind).collect();
        assert_eq!(kinds, vec![
            Kind::Power,
            Kind::VariableIdentifier,
            Kind::Token,
            Kind::VariableIdentifier
        ]);
    }

    #[test]
    fn location_spans_tokens() {
        let tree = node![Power, var("$a", 0), tok("**", 3), var("$b", 6)];
        let loc = tree.location().expect("has tokens");
        assert_eq!(loc.start, Span::new(1, 0));
        assert_eq!(loc.end, Span::new(1, 8));
        assert!(Tree::node(Kind::List, Vec::new()).location().is_none());
    }

    #[test]
    fn skip_nested_parentheses() {
        let inner = var("$a", 2);
        let tree = node![
            ParenthesisedExpression,
            tok("(", 0),
            node![ParenthesisedExpression, tok("(", 1), inner.clone(), tok(")", 4)],
            tok(")", 5),
        ];
        assert_eq!(skip_parentheses(&tree), &inner);
    }
}
