//! Statements, including the alternative `:` ... `end*;` syntax.

use super::{PResult, ParseError, Parser};
use crate::punctuator::{Keyword, Punctuator};
use crate::token::TokenKind;
use crate::tree::{Kind, Tree, node};

impl Parser<'_> {
    pub(super) fn statement(&mut self) -> PResult {
        match self.peek().kind {
            TokenKind::InlineHtml | TokenKind::OpenTag | TokenKind::CloseTag => {
                return Ok(self.leaf(Kind::InlineHtml));
            }
            TokenKind::OpenTagWithEcho => {
                let tag = self.token();
                let list = self.expression_list(&[Punctuator::Semicolon])?;
                let eos = self.eos()?;
                return Ok(node![EchoTagStatement, tag, list, eos]);
            }
            TokenKind::Identifier => {
                if let Some(stmt) = self.keyword_statement()? {
                    return Ok(stmt);
                }
            }
            _ => {}
        }
        if self.at(Punctuator::LCurlyBrace) {
            return self.block();
        }
        if self.at(Punctuator::Semicolon) {
            return Ok(self.leaf(Kind::EmptyStatement));
        }
        if self.at(Punctuator::AttributeOpen) {
            let attributes = self.attributes()?;
            if let Some(decl) = self.declaration(attributes.clone())? {
                return Ok(decl);
            }
            let closure = self.closure(attributes)?;
            let expr = self.continue_expression(closure)?;
            let eos = self.eos()?;
            return Ok(node![ExpressionStatement, expr, eos]);
        }
        self.expression_statement()
    }

    fn expression_statement(&mut self) -> PResult {
        let expr = self.expression()?;
        let eos = self.eos()?;
        Ok(node![ExpressionStatement, expr, eos])
    }

    /// Calls applied to an already parsed closure.
    fn continue_expression(&mut self, closure: Tree) -> PResult {
        let mut expr = closure;
        while self.at(Punctuator::LParenthesis) {
            let arguments = self.arguments()?;
            expr = node![FunctionCall, expr, arguments];
        }
        Ok(expr)
    }

    /// Class-like or function declaration after its attributes.
    fn declaration(&mut self, attributes: Tree) -> Result<Option<Tree>, ParseError> {
        let is_function = self.at_keyword(Keyword::Function)
            && (self.peek_at(1).kind == TokenKind::Identifier
                || (self.nth_at(1, Punctuator::Ampersand)
                    && self.peek_at(2).kind == TokenKind::Identifier));
        if is_function {
            return self.function_declaration(attributes).map(Some);
        }
        let mut offset = 0;
        while [Keyword::Abstract, Keyword::Final, Keyword::Readonly]
            .iter()
            .any(|k| self.nth_keyword(offset, *k))
        {
            offset += 1;
        }
        if self.nth_keyword(offset, Keyword::Class)
            && self.peek_at(offset + 1).kind == TokenKind::Identifier
        {
            return self.class_declaration(attributes).map(Some);
        }
        if offset > 0 {
            return Ok(None);
        }
        let named = self.peek_at(1).kind == TokenKind::Identifier;
        if self.at_keyword(Keyword::Interface) && named {
            return self.interface_declaration(attributes).map(Some);
        }
        if self.at_keyword(Keyword::Trait) && named {
            return self.trait_declaration(attributes).map(Some);
        }
        if self.at_keyword(Keyword::Enum) && named {
            return self.enum_declaration(attributes).map(Some);
        }
        Ok(None)
    }

    /// Statements introduced by a keyword; `None` when the identifier
    /// starts an expression instead.
    fn keyword_statement(&mut self) -> Result<Option<Tree>, ParseError> {
        // `static::`, `list(...)`, `print`, `new` and the like are expressions
        if self.nth_at(1, Punctuator::DoubleColon) {
            return Ok(None);
        }
        if let Some(decl) = self.declaration(Tree::node(Kind::List, Vec::new()))? {
            return Ok(Some(decl));
        }
        let stmt = if self.at_keyword(Keyword::If) {
            self.if_statement()?
        } else if self.at_keyword(Keyword::While) {
            self.while_statement()?
        } else if self.at_keyword(Keyword::Do) {
            self.do_while_statement()?
        } else if self.at_keyword(Keyword::For) {
            self.for_statement()?
        } else if self.at_keyword(Keyword::Foreach) {
            self.foreach_statement()?
        } else if self.at_keyword(Keyword::Switch) {
            self.switch_statement()?
        } else if self.at_keyword(Keyword::Break) {
            self.jump_statement(Kind::BreakStatement)?
        } else if self.at_keyword(Keyword::Continue) {
            self.jump_statement(Kind::ContinueStatement)?
        } else if self.at_keyword(Keyword::Return) {
            self.jump_statement(Kind::ReturnStatement)?
        } else if self.at_keyword(Keyword::Echo) {
            let keyword = self.token();
            let list = self.expression_list(&[Punctuator::Semicolon])?;
            let eos = self.eos()?;
            node![EchoStatement, keyword, list, eos]
        } else if self.at_keyword(Keyword::Global) {
            let keyword = self.token();
            let list =
                self.separated_list(&[Punctuator::Semicolon], false, Self::postfix_expression)?;
            let eos = self.eos()?;
            node![GlobalStatement, keyword, list, eos]
        } else if self.at_keyword(Keyword::Static) && self.peek_at(1).kind == TokenKind::Variable {
            self.static_statement()?
        } else if self.at_keyword(Keyword::Unset) {
            let keyword = self.token();
            let open = self.expect(Punctuator::LParenthesis)?;
            let list = self.expression_list(&[Punctuator::RParenthesis])?;
            let close = self.expect(Punctuator::RParenthesis)?;
            let eos = self.eos()?;
            node![UnsetStatement, keyword, open, list, close, eos]
        } else if self.at_keyword(Keyword::Throw) {
            let keyword = self.token();
            let expr = self.expression()?;
            let eos = self.eos()?;
            node![ThrowStatement, keyword, expr, eos]
        } else if self.at_keyword(Keyword::Try) {
            self.try_statement()?
        } else if self.at_keyword(Keyword::Goto) {
            let keyword = self.token();
            let label = self.expect_identifier()?;
            let eos = self.eos()?;
            node![GotoStatement, keyword, label, eos]
        } else if self.at_keyword(Keyword::Declare) {
            self.declare_statement()?
        } else if self.at_keyword(Keyword::Namespace) {
            self.namespace_statement()?
        } else if self.at_keyword(Keyword::Use) {
            self.use_statement()?
        } else if self.at_keyword(Keyword::Const) {
            self.constant_declaration()?
        } else if self.nth_at(1, Punctuator::Colon) && !self.peek().text.contains('\\') {
            let label = self.leaf(Kind::NameIdentifier);
            let colon = self.token();
            node![LabelStatement, label, colon]
        } else {
            return Ok(None);
        };
        Ok(Some(stmt))
    }

    pub(super) fn block(&mut self) -> PResult {
        let open = self.expect(Punctuator::LCurlyBrace)?;
        let body = self.statement_list(|p| p.at(Punctuator::RCurlyBrace))?;
        let close = self.expect(Punctuator::RCurlyBrace)?;
        Ok(node![Block, open, body, close])
    }

    fn parenthesised(&mut self) -> PResult {
        let open = self.expect(Punctuator::LParenthesis)?;
        let expr = self.expression()?;
        let close = self.expect(Punctuator::RParenthesis)?;
        Ok(node![ParenthesisedExpression, open, expr, close])
    }

    fn expression_list(&mut self, close: &[Punctuator]) -> PResult {
        self.separated_list(close, false, Self::expression)
    }

    /// Body of an alternative-syntax construct, up to one of `ends`.
    fn alternative_body(&mut self, ends: &[Keyword]) -> PResult {
        self.statement_list(|p| ends.iter().any(|k| p.at_keyword(*k)))
    }

    fn if_statement(&mut self) -> PResult {
        let keyword = self.token();
        let condition = self.parenthesised()?;

        if let Some(colon) = self.eat(Punctuator::Colon) {
            let ends = [Keyword::Elseif, Keyword::Else, Keyword::Endif];
            let body = self.alternative_body(&ends)?;
            let mut elseifs = Vec::new();
            while self.at_keyword(Keyword::Elseif) {
                let kw = self.token();
                let cond = self.parenthesised()?;
                let colon = self.expect(Punctuator::Colon)?;
                let body = self.alternative_body(&ends)?;
                elseifs.push(Some(node![AlternativeElseifClause, kw, cond, colon, body]));
            }
            let else_clause = match self.eat_keyword(Keyword::Else) {
                Some(kw) => {
                    let colon = self.expect(Punctuator::Colon)?;
                    let body = self.alternative_body(&[Keyword::Endif])?;
                    Some(node![AlternativeElseClause, kw, colon, body])
                }
                None => None,
            };
            let endif = self.expect_keyword(Keyword::Endif)?;
            let eos = self.eos()?;
            return Ok(node![
                AlternativeIfStatement,
                keyword,
                condition,
                colon,
                body,
                Tree::node(Kind::List, elseifs),
                else_clause,
                endif,
                eos,
            ]);
        }

        let then = self.statement()?;
        let mut elseifs = Vec::new();
        while self.at_keyword(Keyword::Elseif) {
            let kw = self.token();
            let cond = self.parenthesised()?;
            let body = self.statement()?;
            elseifs.push(Some(node![ElseifClause, kw, cond, body]));
        }
        let else_clause = match self.eat_keyword(Keyword::Else) {
            Some(kw) => Some(node![ElseClause, kw, self.statement()?]),
            None => None,
        };
        Ok(node![
            IfStatement,
            keyword,
            condition,
            then,
            Tree::node(Kind::List, elseifs),
            else_clause,
        ])
    }

    fn while_statement(&mut self) -> PResult {
        let keyword = self.token();
        let condition = self.parenthesised()?;
        if let Some(colon) = self.eat(Punctuator::Colon) {
            let body = self.alternative_body(&[Keyword::Endwhile])?;
            let end = self.expect_keyword(Keyword::Endwhile)?;
            let eos = self.eos()?;
            return Ok(node![AlternativeWhileStatement, keyword, condition, colon, body, end, eos]);
        }
        let body = self.statement()?;
        Ok(node![WhileStatement, keyword, condition, body])
    }

    fn do_while_statement(&mut self) -> PResult {
        let keyword = self.token();
        let body = self.statement()?;
        let while_kw = self.expect_keyword(Keyword::While)?;
        let condition = self.parenthesised()?;
        let eos = self.eos()?;
        Ok(node![DoWhileStatement, keyword, body, while_kw, condition, eos])
    }

    fn for_statement(&mut self) -> PResult {
        let keyword = self.token();
        let open = self.expect(Punctuator::LParenthesis)?;
        let init = self.expression_list(&[Punctuator::Semicolon])?;
        let first_semi = self.expect(Punctuator::Semicolon)?;
        let condition = self.expression_list(&[Punctuator::Semicolon])?;
        let second_semi = self.expect(Punctuator::Semicolon)?;
        let update = self.expression_list(&[Punctuator::RParenthesis])?;
        let close = self.expect(Punctuator::RParenthesis)?;
        if let Some(colon) = self.eat(Punctuator::Colon) {
            let body = self.alternative_body(&[Keyword::Endfor])?;
            let end = self.expect_keyword(Keyword::Endfor)?;
            let eos = self.eos()?;
            return Ok(node![
                AlternativeForStatement,
                keyword,
                open,
                init,
                first_semi,
                condition,
                second_semi,
                update,
                close,
                colon,
                body,
                end,
                eos,
            ]);
        }
        let body = self.statement()?;
        Ok(node![
            ForStatement,
            keyword,
            open,
            init,
            first_semi,
            condition,
            second_semi,
            update,
            close,
            body,
        ])
    }

    fn foreach_target(&mut self) -> PResult {
        if self.at(Punctuator::Ampersand) {
            self.reference_value()
        } else {
            self.postfix_expression()
        }
    }

    fn foreach_statement(&mut self) -> PResult {
        let keyword = self.token();
        let open = self.expect(Punctuator::LParenthesis)?;
        let subject = self.expression()?;
        let as_kw = self.expect_keyword(Keyword::As)?;
        let first = self.foreach_target()?;
        let (key, arrow, value) = match self.eat(Punctuator::DoubleArrow) {
            Some(arrow) => (Some(first), Some(arrow), self.foreach_target()?),
            None => (None, None, first),
        };
        let close = self.expect(Punctuator::RParenthesis)?;
        if let Some(colon) = self.eat(Punctuator::Colon) {
            let body = self.alternative_body(&[Keyword::Endforeach])?;
            let end = self.expect_keyword(Keyword::Endforeach)?;
            let eos = self.eos()?;
            return Ok(node![
                AlternativeForeachStatement,
                keyword,
                open,
                subject,
                as_kw,
                key,
                arrow,
                value,
                close,
                colon,
                body,
                end,
                eos,
            ]);
        }
        let body = self.statement()?;
        Ok(node![
            ForeachStatement,
            keyword,
            open,
            subject,
            as_kw,
            key,
            arrow,
            value,
            close,
            body,
        ])
    }

    fn switch_statement(&mut self) -> PResult {
        let keyword = self.token();
        let subject = self.parenthesised()?;
        if let Some(colon) = self.eat(Punctuator::Colon) {
            let cases = self.switch_cases(|p| p.at_keyword(Keyword::Endswitch))?;
            let end = self.expect_keyword(Keyword::Endswitch)?;
            let eos = self.eos()?;
            return Ok(node![AlternativeSwitchStatement, keyword, subject, colon, cases, end, eos]);
        }
        let open = self.expect(Punctuator::LCurlyBrace)?;
        let cases = self.switch_cases(|p| p.at(Punctuator::RCurlyBrace))?;
        let close = self.expect(Punctuator::RCurlyBrace)?;
        Ok(node![SwitchStatement, keyword, subject, open, cases, close])
    }

    fn switch_cases(&mut self, is_end: impl Fn(&Self) -> bool) -> PResult {
        let mut cases = Vec::new();
        while !is_end(self) && !self.at_eof() {
            let clause_end = |p: &Self| {
                is_end(p) || p.at_keyword(Keyword::Case) || p.at_keyword(Keyword::Default)
            };
            if self.at_keyword(Keyword::Case) {
                let keyword = self.token();
                let value = self.expression()?;
                let separator = self.case_separator()?;
                let body = self.statement_list(clause_end)?;
                cases.push(Some(node![CaseClause, keyword, value, separator, body]));
            } else if self.at_keyword(Keyword::Default) {
                let keyword = self.token();
                let separator = self.case_separator()?;
                let body = self.statement_list(clause_end)?;
                cases.push(Some(node![DefaultClause, keyword, separator, body]));
            } else {
                return Err(self.expected("'case' or 'default'"));
            }
        }
        Ok(Tree::node(Kind::List, cases))
    }

    fn case_separator(&mut self) -> PResult {
        if self.at(Punctuator::Colon) || self.at(Punctuator::Semicolon) {
            Ok(self.token())
        } else {
            Err(self.expected("':'"))
        }
    }

    fn jump_statement(&mut self, kind: Kind) -> PResult {
        let keyword = self.token();
        let expr = if self.at_eos() {
            None
        } else {
            Some(self.expression()?)
        };
        let eos = self.eos()?;
        Ok(Tree::node(kind, vec![Some(keyword), expr, Some(eos)]))
    }

    fn static_statement(&mut self) -> PResult {
        let keyword = self.token();
        let list = self.separated_list(&[Punctuator::Semicolon], false, |p| {
            let variable = p.expect_variable()?;
            let (equal, init) = match p.eat(Punctuator::Equal) {
                Some(eq) => (Some(eq), Some(p.expression()?)),
                None => (None, None),
            };
            Ok(node![VariableDeclaration, variable, equal, init])
        })?;
        let eos = self.eos()?;
        Ok(node![StaticStatement, keyword, list, eos])
    }

    fn try_statement(&mut self) -> PResult {
        let keyword = self.token();
        let body = self.block()?;
        let mut catches = Vec::new();
        while self.at_keyword(Keyword::Catch) {
            let catch_kw = self.token();
            let open = self.expect(Punctuator::LParenthesis)?;
            let types = self.delimited(Kind::SeparatedList, Punctuator::Pipe, Self::expect_name)?;
            let variable = if self.at_kind(TokenKind::Variable) {
                Some(self.expect_variable()?)
            } else {
                None
            };
            let close = self.expect(Punctuator::RParenthesis)?;
            let block = self.block()?;
            catches.push(Some(node![CatchBlock, catch_kw, open, types, variable, close, block]));
        }
        let finally = match self.eat_keyword(Keyword::Finally) {
            Some(kw) => Some(node![FinallyClause, kw, self.block()?]),
            None => None,
        };
        if catches.is_empty() && finally.is_none() {
            return Err(self.expected("'catch' or 'finally'"));
        }
        Ok(node![TryStatement, keyword, body, Tree::node(Kind::List, catches), finally])
    }

    fn declare_statement(&mut self) -> PResult {
        let keyword = self.token();
        let open = self.expect(Punctuator::LParenthesis)?;
        let directives =
            self.separated_list(&[Punctuator::RParenthesis], false, Self::constant_assignment)?;
        let close = self.expect(Punctuator::RParenthesis)?;
        let body = if self.at_eos() {
            self.eos()?
        } else {
            self.statement()?
        };
        Ok(node![DeclareStatement, keyword, open, directives, close, body])
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::tree::{Kind, Tree};

    fn statements(source: &str) -> Vec<Tree> {
        let input = format!("<?php\n{source}");
        let unit = parse(&tokenize(&input).tokens).expect("should parse");
        unit.children()
            .flatten()
            .skip(1)
            .filter(|t| !t.is(Kind::Token))
            .cloned()
            .collect()
    }

    fn kinds(source: &str) -> Vec<Kind> {
        statements(source).iter().map(Tree::kind).collect()
    }

    #[test]
    fn if_elseif_else() {
        let stmts = statements("if ($a) { } elseif ($b) x(); else if ($c) {} else {}");
        let tree = &stmts[0];
        assert!(tree.is(Kind::IfStatement));
        assert_eq!(tree.child(3).map(Tree::slot_count), Some(1));
        let else_body = tree
            .child(4)
            .and_then(|e| e.child(1))
            .expect("else body");
        assert!(else_body.is(Kind::IfStatement));
    }

    #[test]
    fn alternative_syntax() {
        assert_eq!(
            kinds(
                "if ($a): echo 1; elseif ($b): else: endif;
                 while ($a): endwhile;
                 for ($i = 0; $i < 3; $i++): endfor;
                 foreach ($xs as $k => &$v): endforeach;
                 switch ($a): case 1: break; default: endswitch;"
            ),
            vec![
                Kind::AlternativeIfStatement,
                Kind::AlternativeWhileStatement,
                Kind::AlternativeForStatement,
                Kind::AlternativeForeachStatement,
                Kind::AlternativeSwitchStatement,
            ]
        );
    }

    #[test]
    fn loops() {
        assert_eq!(
            kinds(
                "while (true) {}
                 do { } while (false);
                 for (;;) break 2;
                 foreach ($a as [$x, $y]) continue;"
            ),
            vec![
                Kind::WhileStatement,
                Kind::DoWhileStatement,
                Kind::ForStatement,
                Kind::ForeachStatement,
            ]
        );
    }

    #[test]
    fn switch_cases() {
        let stmts = statements("switch ($a) { case 1; case 2: f(); break; default: g(); }");
        let cases = stmts[0].child(3).expect("cases");
        let kinds: Vec<_> = cases.children().flatten().map(Tree::kind).collect();
        assert_eq!(kinds, vec![
            Kind::CaseClause,
            Kind::CaseClause,
            Kind::DefaultClause
        ]);
    }

    #[test]
    fn simple_statements() {
        assert_eq!(
            kinds(
                "return; echo 1, 2; global $a, $b; static $x = 1, $y;
                 unset($a[0]); throw new E(); goto end; end: ; declare(strict_types=1);
                 const A = 1, B = 2;"
            ),
            vec![
                Kind::ReturnStatement,
                Kind::EchoStatement,
                Kind::GlobalStatement,
                Kind::StaticStatement,
                Kind::UnsetStatement,
                Kind::ThrowStatement,
                Kind::GotoStatement,
                Kind::LabelStatement,
                Kind::EmptyStatement,
                Kind::DeclareStatement,
                Kind::ConstantDeclaration,
            ]
        );
    }

    #[test]
    fn try_catch_finally() {
        let stmts = statements("try { } catch (A | B $e) { } catch (C) { } finally { }");
        let tree = &stmts[0];
        assert!(tree.is(Kind::TryStatement));
        assert_eq!(tree.child(2).map(Tree::slot_count), Some(2));
        assert!(tree.child(3).is_some());
    }

    #[test]
    fn try_without_handler_fails() {
        let input = "<?php try { }";
        assert!(parse(&tokenize(input).tokens).is_err());
    }

    #[test]
    fn declarations_in_closure_body() {
        let stmts = statements("$f = function () { enum E { case A; } class C {} function g() {} };");
        assert!(stmts[0].is(Kind::ExpressionStatement));
        let nested: Vec<_> = stmts[0]
            .descendants()
            .map(Tree::kind)
            .filter(|k| {
                matches!(
                    k,
                    Kind::EnumDeclaration | Kind::ClassDeclaration | Kind::FunctionDeclaration
                )
            })
            .collect();
        assert_eq!(nested.len(), 3);
    }

    #[test]
    fn keyword_expressions_are_expression_statements() {
        assert_eq!(
            kinds("static::f(); print 1; list($a) = $b; exit; new A; static fn() => 1;"),
            vec![Kind::ExpressionStatement; 6]
        );
    }

    #[test]
    fn attributed_closure_statement() {
        let stmts = statements("#[A] function () {};");
        assert!(stmts[0].is(Kind::ExpressionStatement));
        let stmts = statements("#[A] abstract class C {}");
        assert!(stmts[0].is(Kind::ClassDeclaration));
    }
}
