//! Namespaces, imports, functions, class-likes, their members, types and
//! attributes.

use super::{PResult, ParseError, Parser};
use crate::punctuator::{Keyword, Punctuator};
use crate::token::TokenKind;
use crate::tree::{Kind, Tree, node};

const BUILT_IN_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "array", "callable", "iterable", "object", "mixed", "void",
    "never", "null", "false", "true",
];

const MEMBER_MODIFIERS: &[Keyword] = &[
    Keyword::Public,
    Keyword::Protected,
    Keyword::Private,
    Keyword::Static,
    Keyword::Abstract,
    Keyword::Final,
    Keyword::Readonly,
    Keyword::Var,
];

const CLASS_MODIFIERS: &[Keyword] = &[Keyword::Abstract, Keyword::Final, Keyword::Readonly];

const PROMOTION_MODIFIERS: &[Keyword] = &[
    Keyword::Public,
    Keyword::Protected,
    Keyword::Private,
    Keyword::Readonly,
];

type Clause = (Option<Tree>, Option<Tree>);

impl Parser<'_> {
    // -- attributes

    /// Zero or more `#[...]` groups, always as a `List`.
    pub(super) fn attributes(&mut self) -> PResult {
        let mut groups = Vec::new();
        while self.at(Punctuator::AttributeOpen) {
            let open = self.token();
            let list = self.separated_list(&[Punctuator::RBracket], false, |p| {
                let name = p.expect_name()?;
                let arguments = if p.at(Punctuator::LParenthesis) {
                    Some(p.arguments()?)
                } else {
                    None
                };
                Ok(node![Attribute, name, arguments])
            })?;
            let close = self.expect(Punctuator::RBracket)?;
            groups.push(Some(node![AttributeGroup, open, list, close]));
        }
        Ok(Tree::node(Kind::List, groups))
    }

    fn modifiers(&mut self, allowed: &[Keyword]) -> Tree {
        let mut children = Vec::new();
        while allowed.iter().any(|k| self.at_keyword(*k)) {
            children.push(Some(self.token()));
        }
        Tree::node(Kind::List, children)
    }

    // -- namespaces and imports

    pub(super) fn namespace_statement(&mut self) -> PResult {
        let keyword = self.token();
        let name = if self.at_kind(TokenKind::Identifier) {
            Some(self.expect_name()?)
        } else {
            None
        };
        if self.at(Punctuator::LCurlyBrace) {
            let open = self.token();
            let body = self.statement_list(|p| p.at(Punctuator::RCurlyBrace))?;
            let close = self.expect(Punctuator::RCurlyBrace)?;
            return Ok(node![NamespaceStatement, keyword, name, None, open, body, close]);
        }
        let eos = self.eos()?;
        Ok(node![NamespaceStatement, keyword, name, eos, None, None, None])
    }

    fn use_type(&mut self) -> Option<Tree> {
        let is_type = (self.at_keyword(Keyword::Function) || self.at_keyword(Keyword::Const))
            && self.peek_at(1).kind == TokenKind::Identifier;
        is_type.then(|| self.token())
    }

    fn use_clause(&mut self, use_type: Option<Tree>, name: Tree) -> PResult {
        let (as_kw, alias) = match self.eat_keyword(Keyword::As) {
            Some(kw) => (Some(kw), Some(self.expect_identifier()?)),
            None => (None, None),
        };
        Ok(node![UseClause, use_type, name, as_kw, alias])
    }

    pub(super) fn use_statement(&mut self) -> PResult {
        let keyword = self.token();
        let use_type = self.use_type();
        let first_name = self.expect_name()?;

        if self.at(Punctuator::NsSeparator) && self.nth_at(1, Punctuator::LCurlyBrace) {
            let separator = self.token();
            let open = self.token();
            let clauses = self.separated_list(&[Punctuator::RCurlyBrace], false, |p| {
                let clause_type = p.use_type();
                let name = p.expect_name()?;
                p.use_clause(clause_type, name)
            })?;
            let close = self.expect(Punctuator::RCurlyBrace)?;
            let eos = self.eos()?;
            return Ok(node![
                GroupUseStatement,
                keyword,
                use_type,
                first_name,
                separator,
                open,
                clauses,
                close,
                eos,
            ]);
        }

        let mut clauses = vec![Some(self.use_clause(None, first_name)?)];
        while let Some(comma) = self.eat(Punctuator::Comma) {
            clauses.push(Some(comma));
            let name = self.expect_name()?;
            clauses.push(Some(self.use_clause(None, name)?));
        }
        let eos = self.eos()?;
        Ok(node![
            UseStatement,
            keyword,
            use_type,
            Tree::node(Kind::SeparatedList, clauses),
            eos,
        ])
    }

    /// `NAME = expr` as used by `const`, `declare` and class constants.
    pub(super) fn constant_assignment(&mut self) -> PResult {
        let name = self.expect_identifier()?;
        let equal = self.expect(Punctuator::Equal)?;
        let value = self.expression()?;
        Ok(node![VariableDeclaration, name, equal, value])
    }

    pub(super) fn constant_declaration(&mut self) -> PResult {
        let keyword = self.token();
        let list = self.separated_list(&[Punctuator::Semicolon], false, Self::constant_assignment)?;
        let eos = self.eos()?;
        Ok(node![ConstantDeclaration, keyword, list, eos])
    }

    // -- functions

    pub(super) fn function_declaration(&mut self, attributes: Tree) -> PResult {
        let keyword = self.expect_keyword(Keyword::Function)?;
        let by_ref = self.eat(Punctuator::Ampersand);
        let name = self.expect_identifier()?;
        let parameters = self.parameter_list()?;
        let return_type = self.return_type_clause()?;
        let body = self.block()?;
        Ok(node![
            FunctionDeclaration,
            attributes,
            keyword,
            by_ref,
            name,
            parameters,
            return_type,
            body,
        ])
    }

    pub(super) fn parameter_list(&mut self) -> PResult {
        let open = self.expect(Punctuator::LParenthesis)?;
        let list = self.separated_list(&[Punctuator::RParenthesis], false, Self::parameter)?;
        let close = self.expect(Punctuator::RParenthesis)?;
        Ok(node![ParameterList, open, list, close])
    }

    fn parameter(&mut self) -> PResult {
        let attributes = self.attributes()?;
        let modifiers = self.modifiers(PROMOTION_MODIFIERS);
        let declared_type = if self.at_kind(TokenKind::Variable)
            || self.at(Punctuator::Ampersand)
            || self.at(Punctuator::Ellipsis)
        {
            None
        } else {
            Some(self.type_declaration()?)
        };
        let by_ref = self.eat(Punctuator::Ampersand);
        let ellipsis = self.eat(Punctuator::Ellipsis);
        let variable = self.expect_variable()?;
        let (equal, default) = match self.eat(Punctuator::Equal) {
            Some(eq) => (Some(eq), Some(self.expression()?)),
            None => (None, None),
        };
        Ok(node![
            Parameter,
            attributes,
            modifiers,
            declared_type,
            by_ref,
            ellipsis,
            variable,
            equal,
            default,
        ])
    }

    pub(super) fn return_type_clause(&mut self) -> Result<Option<Tree>, ParseError> {
        let Some(colon) = self.eat(Punctuator::Colon) else {
            return Ok(None);
        };
        let declared_type = self.type_declaration()?;
        Ok(Some(node![ReturnTypeClause, colon, declared_type]))
    }

    // -- types

    /// Nullable, union, intersection or DNF type.
    pub(super) fn type_declaration(&mut self) -> PResult {
        if self.at(Punctuator::Query) {
            let query = self.token();
            let name = self.type_name()?;
            return Ok(node![Type, query, name]);
        }
        let first = self.type_atom()?;
        if self.at(Punctuator::Pipe) {
            let mut children = vec![Some(first)];
            while let Some(pipe) = self.eat(Punctuator::Pipe) {
                children.push(Some(pipe));
                children.push(Some(self.type_atom()?));
            }
            return Ok(Tree::node(Kind::UnionType, children));
        }
        if self.at_intersection() {
            let mut children = vec![Some(first)];
            while self.at_intersection() {
                children.push(Some(self.token()));
                children.push(Some(self.type_atom()?));
            }
            return Ok(Tree::node(Kind::IntersectionType, children));
        }
        Ok(first)
    }

    /// `&` joining two types, as opposed to a by-reference marker.
    fn at_intersection(&self) -> bool {
        self.at(Punctuator::Ampersand)
            && (self.peek_at(1).kind == TokenKind::Identifier
                || self.nth_at(1, Punctuator::LParenthesis))
    }

    fn type_atom(&mut self) -> PResult {
        if self.at(Punctuator::LParenthesis) {
            let open = self.token();
            let first = self.type_atom()?;
            let mut children = vec![Some(first)];
            while self.at(Punctuator::Ampersand) {
                children.push(Some(self.token()));
                children.push(Some(self.type_atom()?));
            }
            let close = self.expect(Punctuator::RParenthesis)?;
            let intersection = Tree::node(Kind::IntersectionType, children);
            return Ok(node![DnfTypeGroup, open, intersection, close]);
        }
        let name = self.type_name()?;
        Ok(node![Type, None, name])
    }

    fn type_name(&mut self) -> PResult {
        if !self.at_kind(TokenKind::Identifier) {
            return Err(self.expected("type"));
        }
        let text = self.peek().text.as_str();
        if BUILT_IN_TYPES.iter().any(|b| b.eq_ignore_ascii_case(text)) {
            return Ok(self.leaf(Kind::BuiltInType));
        }
        self.expect_name()
    }

    // -- class-likes

    /// `implements A, B` if present.
    pub(super) fn implements_clause(&mut self) -> Result<Clause, ParseError> {
        let Some(keyword) = self.eat_keyword(Keyword::Implements) else {
            return Ok((None, None));
        };
        let names = self.name_list()?;
        Ok((Some(keyword), Some(names)))
    }

    fn name_list(&mut self) -> PResult {
        self.delimited(Kind::SeparatedList, Punctuator::Comma, Self::expect_name)
    }

    /// `{ members }`.
    pub(super) fn class_body(&mut self) -> Result<(Tree, Tree, Tree), ParseError> {
        let open = self.expect(Punctuator::LCurlyBrace)?;
        let mut members = Vec::new();
        while !self.at(Punctuator::RCurlyBrace) && !self.at_eof() {
            members.push(Some(self.class_member()?));
        }
        let close = self.expect(Punctuator::RCurlyBrace)?;
        Ok((open, Tree::node(Kind::List, members), close))
    }

    pub(super) fn class_declaration(&mut self, attributes: Tree) -> PResult {
        let modifiers = self.modifiers(CLASS_MODIFIERS);
        let keyword = self.expect_keyword(Keyword::Class)?;
        let name = self.expect_identifier()?;
        let (extends, superclass) = match self.eat_keyword(Keyword::Extends) {
            Some(kw) => (Some(kw), Some(self.expect_name()?)),
            None => (None, None),
        };
        let (implements, interfaces) = self.implements_clause()?;
        let (open, members, close) = self.class_body()?;
        Ok(node![
            ClassDeclaration,
            attributes,
            modifiers,
            keyword,
            name,
            extends,
            superclass,
            implements,
            interfaces,
            open,
            members,
            close,
        ])
    }

    pub(super) fn interface_declaration(&mut self, attributes: Tree) -> PResult {
        let keyword = self.token();
        let name = self.expect_identifier()?;
        let (extends, parents) = match self.eat_keyword(Keyword::Extends) {
            Some(kw) => (Some(kw), Some(self.name_list()?)),
            None => (None, None),
        };
        let (open, members, close) = self.class_body()?;
        Ok(node![
            InterfaceDeclaration,
            attributes,
            keyword,
            name,
            extends,
            parents,
            open,
            members,
            close,
        ])
    }

    pub(super) fn trait_declaration(&mut self, attributes: Tree) -> PResult {
        let keyword = self.token();
        let name = self.expect_identifier()?;
        let (open, members, close) = self.class_body()?;
        Ok(node![TraitDeclaration, attributes, keyword, name, open, members, close])
    }

    pub(super) fn enum_declaration(&mut self, attributes: Tree) -> PResult {
        let keyword = self.token();
        let name = self.expect_identifier()?;
        let (colon, backing) = match self.eat(Punctuator::Colon) {
            Some(colon) => (Some(colon), Some(self.type_declaration()?)),
            None => (None, None),
        };
        let (implements, interfaces) = self.implements_clause()?;
        let (open, members, close) = self.class_body()?;
        Ok(node![
            EnumDeclaration,
            attributes,
            keyword,
            name,
            colon,
            backing,
            implements,
            interfaces,
            open,
            members,
            close,
        ])
    }

    fn class_member(&mut self) -> PResult {
        if self.at_keyword(Keyword::Use) {
            return self.use_trait_declaration();
        }
        let attributes = self.attributes()?;
        if self.at_keyword(Keyword::Case) {
            return self.enum_case(attributes);
        }
        let modifiers = self.modifiers(MEMBER_MODIFIERS);
        if self.at_keyword(Keyword::Const) {
            return self.class_constant(attributes, modifiers);
        }
        if self.at_keyword(Keyword::Function) {
            return self.method_declaration(attributes, modifiers);
        }
        let declared_type = if self.at_kind(TokenKind::Variable) {
            None
        } else {
            Some(self.type_declaration()?)
        };
        let properties = self.separated_list(&[Punctuator::Semicolon], false, |p| {
            let variable = p.expect_variable()?;
            let (equal, default) = match p.eat(Punctuator::Equal) {
                Some(eq) => (Some(eq), Some(p.expression()?)),
                None => (None, None),
            };
            Ok(node![VariableDeclaration, variable, equal, default])
        })?;
        let eos = self.eos()?;
        Ok(node![
            ClassPropertyDeclaration,
            attributes,
            modifiers,
            declared_type,
            properties,
            eos,
        ])
    }

    fn enum_case(&mut self, attributes: Tree) -> PResult {
        let keyword = self.token();
        let name = self.expect_identifier()?;
        let (equal, value) = match self.eat(Punctuator::Equal) {
            Some(eq) => (Some(eq), Some(self.expression()?)),
            None => (None, None),
        };
        let eos = self.eos()?;
        Ok(node![EnumCase, attributes, keyword, name, equal, value, eos])
    }

    fn class_constant(&mut self, attributes: Tree, modifiers: Tree) -> PResult {
        let keyword = self.token();
        let declared_type = if self.nth_at(1, Punctuator::Equal) {
            None
        } else {
            Some(self.type_declaration()?)
        };
        let list = self.separated_list(&[Punctuator::Semicolon], false, Self::constant_assignment)?;
        let eos = self.eos()?;
        Ok(node![
            ClassConstantDeclaration,
            attributes,
            modifiers,
            keyword,
            declared_type,
            list,
            eos,
        ])
    }

    fn method_declaration(&mut self, attributes: Tree, modifiers: Tree) -> PResult {
        let keyword = self.token();
        let by_ref = self.eat(Punctuator::Ampersand);
        let name = self.expect_identifier()?;
        let parameters = self.parameter_list()?;
        let return_type = self.return_type_clause()?;
        let body = if self.at_eos() {
            self.eos()?
        } else {
            self.block()?
        };
        Ok(node![
            MethodDeclaration,
            attributes,
            modifiers,
            keyword,
            by_ref,
            name,
            parameters,
            return_type,
            body,
        ])
    }

    fn use_trait_declaration(&mut self) -> PResult {
        let keyword = self.token();
        let traits = self.name_list()?;
        if !self.at(Punctuator::LCurlyBrace) {
            let eos = self.eos()?;
            return Ok(node![UseTraitDeclaration, keyword, traits, None, None, None, eos]);
        }
        let open = self.token();
        let mut adaptations = Vec::new();
        while !self.at(Punctuator::RCurlyBrace) && !self.at_eof() {
            adaptations.push(Some(self.trait_adaptation()?));
        }
        let close = self.expect(Punctuator::RCurlyBrace)?;
        Ok(node![
            UseTraitDeclaration,
            keyword,
            traits,
            open,
            Tree::node(Kind::List, adaptations),
            close,
            None,
        ])
    }

    fn trait_adaptation(&mut self) -> PResult {
        let reference = self.trait_method_reference()?;
        if let Some(insteadof) = self.eat_keyword(Keyword::Insteadof) {
            let names = self.name_list()?;
            let eos = self.eos()?;
            return Ok(node![TraitPrecedence, reference, insteadof, names, eos]);
        }
        let as_kw = self.expect_keyword(Keyword::As)?;
        let modifier = [Keyword::Public, Keyword::Protected, Keyword::Private]
            .iter()
            .any(|k| self.at_keyword(*k))
            .then(|| self.token());
        let alias = if self.at_kind(TokenKind::Identifier) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let eos = self.eos()?;
        Ok(node![TraitAlias, reference, as_kw, modifier, alias, eos])
    }

    fn trait_method_reference(&mut self) -> PResult {
        if self.nth_at(1, Punctuator::DoubleColon) {
            let trait_name = self.expect_name()?;
            let colons = self.token();
            let method = self.expect_identifier()?;
            return Ok(node![TraitMethodReference, trait_name, colons, method]);
        }
        let method = self.expect_identifier()?;
        Ok(node![TraitMethodReference, None, None, method])
    }
}
