pub mod ast;

use crate::diagnostics::LintError;
use crate::lexer::token::Token;
use crate::lexer::lex;
use crate::span::{Span, Spanned};
use ast::*;

// Binding powers, lowest first. Binary rows use lbp; right-associative
// operators reuse lbp as rbp, left-associative ones use lbp + 1.
const BP_ASSIGN: u8 = 2;
const BP_CONDITIONAL: u8 = 3;

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
    last_end: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0, last_end: 0 }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_node(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.node)
    }

    fn at(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(token))
    }

    fn advance(&mut self) -> Option<&Spanned<Token>> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        self.last_end = tok.span.end;
        Some(tok)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span, LintError> {
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                let span = tok.span;
                self.pos += 1;
                self.last_end = span.end;
                Ok(span)
            }
            Some(tok) => Err(LintError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(LintError::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, LintError> {
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                let span = tok.span;
                self.pos += 1;
                self.last_end = span.end;
                Ok(Spanned::new(name, span))
            }
            Some(tok) => Err(LintError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(LintError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    fn start_span(&self) -> Result<Span, LintError> {
        self.peek().map(|t| t.span).ok_or_else(|| {
            LintError::syntax("unexpected end of file", self.eof_span())
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn parse_program(&mut self) -> Result<Program, LintError> {
        let mut body = Vec::new();
        while self.peek().is_some() {
            body.push(self.parse_stmt()?);
        }
        Ok(Program { body, span: Span::new(0, self.source.len()) })
    }

    pub fn parse_stmt(&mut self) -> Result<Spanned<Stmt>, LintError> {
        let start = self.start_span()?.start;
        match self.peek_node().unwrap() {
            Token::Var => self.parse_var_decl(DeclKind::Var, start),
            Token::Let => self.parse_var_decl(DeclKind::Let, start),
            Token::Const => self.parse_var_decl(DeclKind::Const, start),
            Token::Function => self.parse_fn_decl(start),
            Token::Class => self.parse_class_decl(start),
            Token::If => self.parse_if(start),
            Token::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Spanned::new(Stmt::Block(block.node), Span::new(start, span.end)))
            }
            Token::Return => {
                self.advance();
                let arg = if self.at(&Token::Semi) || self.at(&Token::RBrace) || self.peek().is_none() {
                    None
                } else {
                    Some(self.parse_expr(0)?)
                };
                self.consume_semi();
                Ok(Spanned::new(Stmt::Return(arg), Span::new(start, self.last_end)))
            }
            Token::Throw => {
                self.advance();
                let arg = self.parse_expr(0)?;
                self.consume_semi();
                Ok(Spanned::new(Stmt::Throw(arg), Span::new(start, self.last_end)))
            }
            Token::Break => {
                self.advance();
                self.consume_semi();
                Ok(Spanned::new(Stmt::Break, Span::new(start, self.last_end)))
            }
            Token::Continue => {
                self.advance();
                self.consume_semi();
                Ok(Spanned::new(Stmt::Continue, Span::new(start, self.last_end)))
            }
            Token::While => {
                self.advance();
                self.expect(&Token::LParen)?;
                let test = self.parse_expr(0)?;
                self.expect(&Token::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Spanned::new(Stmt::While { test, body }, Span::new(start, self.last_end)))
            }
            Token::For => self.parse_for_of(start),
            Token::Try => self.parse_try(start),
            Token::Semi => {
                self.advance();
                Ok(Spanned::new(Stmt::Empty, Span::new(start, self.last_end)))
            }
            _ => {
                let expr = self.parse_expr(0)?;
                self.consume_semi();
                Ok(Spanned::new(Stmt::Expr(expr), Span::new(start, self.last_end)))
            }
        }
    }

    fn consume_semi(&mut self) {
        self.eat(&Token::Semi);
    }

    fn parse_var_decl(&mut self, kind: DeclKind, start: usize) -> Result<Spanned<Stmt>, LintError> {
        self.advance();
        let declarators = self.parse_declarators()?;
        self.consume_semi();
        Ok(Spanned::new(
            Stmt::VarDecl { kind, declarators },
            Span::new(start, self.last_end),
        ))
    }

    fn parse_declarators(&mut self) -> Result<Vec<Declarator>, LintError> {
        let mut declarators = Vec::new();
        loop {
            let pattern = self.parse_pattern()?;
            self.parse_type_annotation_opt()?;
            let init = if self.eat(&Token::Eq) {
                Some(self.parse_expr(BP_ASSIGN)?)
            } else {
                None
            };
            declarators.push(Declarator { pattern, init });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(declarators)
    }

    fn parse_fn_decl(&mut self, start: usize) -> Result<Spanned<Stmt>, LintError> {
        self.advance();
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        self.parse_return_annotation_opt()?;
        let body = self.parse_block()?;
        Ok(Spanned::new(
            Stmt::FnDecl(FnDecl { name, params, body }),
            Span::new(start, self.last_end),
        ))
    }

    fn parse_class_decl(&mut self, start: usize) -> Result<Spanned<Stmt>, LintError> {
        self.advance();
        let name = self.expect_ident()?;
        let parent = if self.eat(&Token::Extends) {
            Some(Box::new(self.parse_expr(BP_CONDITIONAL + 1)?))
        } else {
            None
        };
        self.expect(&Token::LBrace)?;
        let mut methods = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.eat(&Token::Semi) {
                continue;
            }
            let is_static = self.eat(&Token::Static);
            let key = self.expect_ident()?;
            let params = self.parse_params()?;
            self.parse_return_annotation_opt()?;
            let body = self.parse_block()?;
            let span = Span::new(key.span.start, self.last_end);
            methods.push(ClassMethod {
                key,
                is_static,
                value: Spanned::new(
                    Expr::Function(FunctionExpr { name: None, params, body }),
                    span,
                ),
            });
        }
        self.expect(&Token::RBrace)?;
        Ok(Spanned::new(
            Stmt::ClassDecl(ClassDecl { name, parent, methods }),
            Span::new(start, self.last_end),
        ))
    }

    fn parse_if(&mut self, start: usize) -> Result<Spanned<Stmt>, LintError> {
        self.advance();
        self.expect(&Token::LParen)?;
        let test = self.parse_expr(0)?;
        self.expect(&Token::RParen)?;
        let consequent = Box::new(self.parse_stmt()?);
        let alternate = if self.eat(&Token::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Spanned::new(
            Stmt::If { test, consequent, alternate },
            Span::new(start, self.last_end),
        ))
    }

    fn parse_for_of(&mut self, start: usize) -> Result<Spanned<Stmt>, LintError> {
        self.advance();
        self.expect(&Token::LParen)?;
        let decl_kind = match self.peek_node() {
            Some(Token::Var) => Some(DeclKind::Var),
            Some(Token::Let) => Some(DeclKind::Let),
            Some(Token::Const) => Some(DeclKind::Const),
            _ => None,
        };
        if decl_kind.is_some() {
            self.advance();
        }
        let pattern = self.parse_pattern()?;
        self.expect(&Token::Of)?;
        let iterable = self.parse_expr(0)?;
        self.expect(&Token::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Spanned::new(
            Stmt::ForOf { decl_kind, pattern, iterable, body },
            Span::new(start, self.last_end),
        ))
    }

    fn parse_try(&mut self, start: usize) -> Result<Spanned<Stmt>, LintError> {
        self.advance();
        let block = self.parse_block()?;
        let handler = if self.eat(&Token::Catch) {
            let param = if self.eat(&Token::LParen) {
                let pattern = self.parse_pattern()?;
                self.parse_type_annotation_opt()?;
                self.expect(&Token::RParen)?;
                Some(pattern)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause { param, body })
        } else {
            None
        };
        let finalizer = if self.eat(&Token::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(LintError::syntax(
                "try statement requires a catch or finally clause",
                Span::new(start, self.last_end),
            ));
        }
        Ok(Spanned::new(
            Stmt::Try { block, handler, finalizer },
            Span::new(start, self.last_end),
        ))
    }

    fn parse_block(&mut self) -> Result<Spanned<Block>, LintError> {
        let open = self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(LintError::syntax("unclosed block", self.eof_span()));
            }
            stmts.push(self.parse_stmt()?);
        }
        let close = self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Block { stmts }, Span::new(open.start, close.end)))
    }

    // ========================================================================
    // Patterns & types
    // ========================================================================

    fn parse_pattern(&mut self) -> Result<Spanned<Pattern>, LintError> {
        let start = self.start_span()?;
        let base = match self.peek_node().unwrap() {
            Token::Ident => {
                let name = self.expect_ident()?;
                Spanned::new(Pattern::Ident(name.node), name.span)
            }
            Token::LBracket => self.parse_array_pattern()?,
            Token::LBrace => self.parse_object_pattern()?,
            other => {
                return Err(LintError::syntax(
                    format!("expected binding pattern, found {other}"),
                    start,
                ));
            }
        };
        if self.eat(&Token::Eq) {
            let value = self.parse_expr(BP_ASSIGN)?;
            let span = base.span.to(value.span);
            return Ok(Spanned::new(
                Pattern::Default { inner: Box::new(base), value: Box::new(value) },
                span,
            ));
        }
        Ok(base)
    }

    fn parse_array_pattern(&mut self) -> Result<Spanned<Pattern>, LintError> {
        let open = self.expect(&Token::LBracket)?;
        let mut elements = Vec::new();
        while !self.at(&Token::RBracket) {
            if self.eat(&Token::Comma) {
                elements.push(None);
                continue;
            }
            let pat = if self.at(&Token::Ellipsis) {
                let dots = self.expect(&Token::Ellipsis)?;
                let inner = self.parse_pattern()?;
                let span = dots.to(inner.span);
                Spanned::new(Pattern::Rest(Box::new(inner)), span)
            } else {
                self.parse_pattern()?
            };
            elements.push(Some(pat));
            if !self.at(&Token::RBracket) {
                self.expect(&Token::Comma)?;
            }
        }
        let close = self.expect(&Token::RBracket)?;
        Ok(Spanned::new(Pattern::Array(elements), open.to(close)))
    }

    fn parse_object_pattern(&mut self) -> Result<Spanned<Pattern>, LintError> {
        let open = self.expect(&Token::LBrace)?;
        let mut props = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.at(&Token::Ellipsis) {
                self.expect(&Token::Ellipsis)?;
                props.push(ObjectPatternProp::Rest(self.parse_pattern()?));
            } else {
                let key_start = self.start_span()?;
                let key = self.parse_prop_key()?;
                let value = if self.eat(&Token::Colon) {
                    self.parse_pattern()?
                } else {
                    // Shorthand: `{ a }` or `{ a = fallback }`
                    let Some(name) = key.static_name() else {
                        return Err(LintError::syntax(
                            "object pattern shorthand requires a plain key",
                            key_start,
                        ));
                    };
                    let base = Spanned::new(Pattern::Ident(name.to_string()), key_start);
                    if self.eat(&Token::Eq) {
                        let default = self.parse_expr(BP_ASSIGN)?;
                        let span = key_start.to(default.span);
                        Spanned::new(
                            Pattern::Default {
                                inner: Box::new(base),
                                value: Box::new(default),
                            },
                            span,
                        )
                    } else {
                        base
                    }
                };
                props.push(ObjectPatternProp::KeyValue { key, value });
            }
            if !self.at(&Token::RBrace) {
                self.expect(&Token::Comma)?;
            }
        }
        let close = self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Pattern::Object(props), open.to(close)))
    }

    fn parse_prop_key(&mut self) -> Result<PropKey, LintError> {
        match self.peek_node() {
            Some(Token::Ident) => Ok(PropKey::Ident(self.expect_ident()?.node)),
            Some(Token::StringLit(s)) => {
                let s = s.clone();
                self.advance();
                Ok(PropKey::StringLit(s))
            }
            Some(Token::NumberLit(n)) => {
                let n = *n;
                self.advance();
                Ok(PropKey::NumberLit(n))
            }
            Some(Token::LBracket) => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect(&Token::RBracket)?;
                Ok(PropKey::Computed(Box::new(expr)))
            }
            Some(other) => Err(LintError::syntax(
                format!("expected property key, found {other}"),
                self.start_span()?,
            )),
            None => Err(LintError::syntax("expected property key", self.eof_span())),
        }
    }

    fn parse_type_annotation_opt(&mut self) -> Result<Option<Spanned<TypeRef>>, LintError> {
        if self.eat(&Token::Colon) {
            Ok(Some(self.parse_type_ref()?))
        } else {
            Ok(None)
        }
    }

    fn parse_return_annotation_opt(&mut self) -> Result<(), LintError> {
        if self.eat(&Token::Colon) {
            self.parse_type_ref()?;
        }
        Ok(())
    }

    /// Types are opaque: a dotted name, optional balanced `<...>` arguments,
    /// optional `[]` suffixes. Only the covered text is retained.
    fn parse_type_ref(&mut self) -> Result<Spanned<TypeRef>, LintError> {
        let start = self.expect_ident()?.span;
        while self.eat(&Token::Dot) {
            self.expect_ident()?;
        }
        if self.at(&Token::Lt) {
            self.advance();
            let mut depth: i32 = 1;
            while depth > 0 {
                match self.advance().map(|t| &t.node) {
                    Some(Token::Lt) => depth += 1,
                    Some(Token::Gt) => depth -= 1,
                    Some(Token::Shr) => depth -= 2,
                    Some(Token::UShr) => depth -= 3,
                    Some(_) => {}
                    None => {
                        return Err(LintError::syntax(
                            "unclosed type argument list",
                            self.eof_span(),
                        ));
                    }
                }
            }
        }
        while self.at(&Token::LBracket) {
            self.advance();
            self.expect(&Token::RBracket)?;
        }
        let span = Span::new(start.start, self.last_end);
        Ok(Spanned::new(
            TypeRef { name: self.source[span.start..span.end].to_string() },
            span,
        ))
    }

    // ========================================================================
    // Expressions (Pratt)
    // ========================================================================

    pub fn parse_expr(&mut self, min_bp: u8) -> Result<Spanned<Expr>, LintError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some(tok) = self.peek() else { break };
            if matches!(tok.node, Token::Question) {
                if min_bp > BP_CONDITIONAL {
                    break;
                }
                self.advance();
                let consequent = self.parse_expr(BP_ASSIGN)?;
                self.expect(&Token::Colon)?;
                let alternate = self.parse_expr(BP_CONDITIONAL)?;
                let span = lhs.span.to(alternate.span);
                lhs = Spanned::new(
                    Expr::Conditional {
                        test: Box::new(lhs),
                        consequent: Box::new(consequent),
                        alternate: Box::new(alternate),
                    },
                    span,
                );
                continue;
            }
            if let Some(op) = assign_op(&tok.node) {
                if min_bp > BP_ASSIGN {
                    break;
                }
                self.advance();
                let value = self.parse_expr(BP_ASSIGN)?;
                let span = lhs.span.to(value.span);
                lhs = Spanned::new(
                    Expr::Assign { op, target: Box::new(lhs), value: Box::new(value) },
                    span,
                );
                continue;
            }
            if let Some((op, lbp)) = logical_op(&tok.node) {
                if lbp < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.parse_expr(lbp + 1)?;
                let span = lhs.span.to(rhs.span);
                lhs = Spanned::new(
                    Expr::Logical { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                    span,
                );
                continue;
            }
            if let Some((op, lbp, rbp)) = binary_op(&tok.node) {
                if lbp < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.parse_expr(rbp)?;
                let span = lhs.span.to(rhs.span);
                lhs = Spanned::new(
                    Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                    span,
                );
                continue;
            }
            break;
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Spanned<Expr>, LintError> {
        let Some(tok) = self.peek() else {
            return Err(LintError::syntax("expected expression", self.eof_span()));
        };
        let start = tok.span;
        let prefix = match tok.node {
            Token::Minus => Some(UnaryOp::Neg),
            Token::Plus => Some(UnaryOp::Plus),
            Token::Bang => Some(UnaryOp::Not),
            Token::Tilde => Some(UnaryOp::BitNot),
            Token::TypeOf => Some(UnaryOp::TypeOf),
            Token::Void => Some(UnaryOp::Void),
            Token::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = prefix {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.to(operand.span);
            return Ok(Spanned::new(Expr::Unary { op, operand: Box::new(operand) }, span));
        }
        if matches!(tok.node, Token::PlusPlus | Token::MinusMinus) {
            let op = if matches!(tok.node, Token::PlusPlus) {
                UpdateOp::Incr
            } else {
                UpdateOp::Decr
            };
            self.advance();
            let target = self.parse_unary()?;
            let span = start.to(target.span);
            return Ok(Spanned::new(
                Expr::Update { op, prefix: true, target: Box::new(target) },
                span,
            ));
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_postfix(&mut self, mut lhs: Spanned<Expr>) -> Result<Spanned<Expr>, LintError> {
        loop {
            let Some(tok) = self.peek() else { break };
            match tok.node {
                Token::Dot => {
                    self.advance();
                    let name = self.expect_ident()?;
                    let span = lhs.span.to(name.span);
                    lhs = Spanned::new(
                        Expr::Member {
                            object: Box::new(lhs),
                            property: MemberProp::Ident(name.node),
                            optional: false,
                        },
                        span,
                    );
                }
                Token::QuestionDot => {
                    self.advance();
                    match self.peek_node() {
                        Some(Token::LParen) => {
                            let args = self.parse_args()?;
                            let span = Span::new(lhs.span.start, self.last_end);
                            lhs = Spanned::new(
                                Expr::Call { callee: Box::new(lhs), args, optional: true },
                                span,
                            );
                        }
                        Some(Token::LBracket) => {
                            self.advance();
                            let index = self.parse_expr(0)?;
                            let close = self.expect(&Token::RBracket)?;
                            let span = Span::new(lhs.span.start, close.end);
                            lhs = Spanned::new(
                                Expr::Member {
                                    object: Box::new(lhs),
                                    property: MemberProp::Computed(Box::new(index)),
                                    optional: true,
                                },
                                span,
                            );
                        }
                        _ => {
                            let name = self.expect_ident()?;
                            let span = lhs.span.to(name.span);
                            lhs = Spanned::new(
                                Expr::Member {
                                    object: Box::new(lhs),
                                    property: MemberProp::Ident(name.node),
                                    optional: true,
                                },
                                span,
                            );
                        }
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expr(0)?;
                    let close = self.expect(&Token::RBracket)?;
                    let span = Span::new(lhs.span.start, close.end);
                    lhs = Spanned::new(
                        Expr::Member {
                            object: Box::new(lhs),
                            property: MemberProp::Computed(Box::new(index)),
                            optional: false,
                        },
                        span,
                    );
                }
                Token::LParen => {
                    let args = self.parse_args()?;
                    let span = Span::new(lhs.span.start, self.last_end);
                    lhs = Spanned::new(
                        Expr::Call { callee: Box::new(lhs), args, optional: false },
                        span,
                    );
                }
                Token::Bang => {
                    self.advance();
                    let span = Span::new(lhs.span.start, self.last_end);
                    lhs = Spanned::new(Expr::NonNull(Box::new(lhs)), span);
                }
                Token::PlusPlus | Token::MinusMinus => {
                    let op = if matches!(tok.node, Token::PlusPlus) {
                        UpdateOp::Incr
                    } else {
                        UpdateOp::Decr
                    };
                    self.advance();
                    let span = Span::new(lhs.span.start, self.last_end);
                    lhs = Spanned::new(
                        Expr::Update { op, prefix: false, target: Box::new(lhs) },
                        span,
                    );
                }
                Token::As => {
                    self.advance();
                    let ty = self.parse_type_ref()?;
                    let span = lhs.span.to(ty.span);
                    lhs = Spanned::new(Expr::Cast { expr: Box::new(lhs), ty }, span);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>, LintError> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        while !self.at(&Token::RParen) {
            if self.at(&Token::Ellipsis) {
                self.expect(&Token::Ellipsis)?;
                args.push(Arg::Spread(self.parse_expr(BP_ASSIGN)?));
            } else {
                args.push(Arg::Expr(self.parse_expr(BP_ASSIGN)?));
            }
            if !self.at(&Token::RParen) {
                self.expect(&Token::Comma)?;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, LintError> {
        let Some(tok) = self.peek() else {
            return Err(LintError::syntax("expected expression", self.eof_span()));
        };
        let start = tok.span;
        match &tok.node {
            Token::NumberLit(n) => {
                let n = *n;
                self.advance();
                Ok(Spanned::new(Expr::Number(n), start))
            }
            Token::StringLit(s) => {
                let s = s.clone();
                self.advance();
                Ok(Spanned::new(Expr::Str(s), start))
            }
            Token::TemplateLit(raw) => {
                let raw = raw.clone();
                self.advance();
                let parts = self.parse_template_parts(&raw, start)?;
                Ok(Spanned::new(Expr::Template(parts), start))
            }
            Token::True => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(true), start))
            }
            Token::False => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(false), start))
            }
            Token::Null => {
                self.advance();
                Ok(Spanned::new(Expr::Null, start))
            }
            Token::This => {
                self.advance();
                Ok(Spanned::new(Expr::This, start))
            }
            Token::Super => {
                self.advance();
                Ok(Spanned::new(Expr::Super, start))
            }
            Token::Ident => {
                let name = self.expect_ident()?;
                // `x => body` single-param arrow
                if self.at(&Token::Arrow) {
                    self.advance();
                    let param = Spanned::new(Pattern::Ident(name.node), name.span);
                    let body = self.parse_arrow_body()?;
                    let span = Span::new(start.start, self.last_end);
                    return Ok(Spanned::new(
                        Expr::Arrow(ArrowExpr { params: vec![param], body }),
                        span,
                    ));
                }
                Ok(Spanned::new(Expr::Ident(name.node), name.span))
            }
            Token::LBracket => self.parse_array_literal(),
            Token::LBrace => self.parse_object_literal(),
            Token::Function => {
                self.advance();
                let name = if self.at(&Token::Ident) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                let params = self.parse_params()?;
                self.parse_return_annotation_opt()?;
                let body = self.parse_block()?;
                let span = Span::new(start.start, self.last_end);
                Ok(Spanned::new(Expr::Function(FunctionExpr { name, params, body }), span))
            }
            Token::New => {
                self.advance();
                let mut callee = self.parse_primary()?;
                // Member chain binds tighter than the `new` call itself.
                loop {
                    match self.peek_node() {
                        Some(Token::Dot) => {
                            self.advance();
                            let name = self.expect_ident()?;
                            let span = callee.span.to(name.span);
                            callee = Spanned::new(
                                Expr::Member {
                                    object: Box::new(callee),
                                    property: MemberProp::Ident(name.node),
                                    optional: false,
                                },
                                span,
                            );
                        }
                        Some(Token::LBracket) => {
                            self.advance();
                            let index = self.parse_expr(0)?;
                            let close = self.expect(&Token::RBracket)?;
                            let span = Span::new(callee.span.start, close.end);
                            callee = Spanned::new(
                                Expr::Member {
                                    object: Box::new(callee),
                                    property: MemberProp::Computed(Box::new(index)),
                                    optional: false,
                                },
                                span,
                            );
                        }
                        _ => break,
                    }
                }
                let args = if self.at(&Token::LParen) {
                    self.parse_args()?
                } else {
                    Vec::new()
                };
                let span = Span::new(start.start, self.last_end);
                Ok(Spanned::new(Expr::New { callee: Box::new(callee), args }, span))
            }
            Token::LParen => {
                if let Some(arrow) = self.try_parse_arrow()? {
                    return Ok(arrow);
                }
                self.advance();
                let inner = self.parse_expr(0)?;
                let close = self.expect(&Token::RParen)?;
                Ok(Spanned::new(
                    Expr::Paren(Box::new(inner)),
                    Span::new(start.start, close.end),
                ))
            }
            other => Err(LintError::syntax(
                format!("expected expression, found {other}"),
                start,
            )),
        }
    }

    /// Speculatively parse `(params) => body`, restoring the cursor when the
    /// parenthesized text turns out not to be an arrow parameter list.
    fn try_parse_arrow(&mut self) -> Result<Option<Spanned<Expr>>, LintError> {
        let saved_pos = self.pos;
        let saved_end = self.last_end;
        let start = self.start_span()?.start;

        let attempt = (|| -> Result<Vec<Spanned<Pattern>>, LintError> {
            let params = self.parse_params()?;
            self.parse_return_annotation_opt()?;
            self.expect(&Token::Arrow)?;
            Ok(params)
        })();

        match attempt {
            Ok(params) => {
                let body = self.parse_arrow_body()?;
                let span = Span::new(start, self.last_end);
                Ok(Some(Spanned::new(Expr::Arrow(ArrowExpr { params, body }), span)))
            }
            Err(_) => {
                self.pos = saved_pos;
                self.last_end = saved_end;
                Ok(None)
            }
        }
    }

    fn parse_arrow_body(&mut self) -> Result<ArrowBody, LintError> {
        if self.at(&Token::LBrace) {
            Ok(ArrowBody::Block(self.parse_block()?))
        } else {
            Ok(ArrowBody::Expr(Box::new(self.parse_expr(BP_ASSIGN)?)))
        }
    }

    fn parse_params(&mut self) -> Result<Vec<Spanned<Pattern>>, LintError> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        while !self.at(&Token::RParen) {
            let param = if self.at(&Token::Ellipsis) {
                let dots = self.expect(&Token::Ellipsis)?;
                let inner = self.parse_pattern()?;
                let span = dots.to(inner.span);
                Spanned::new(Pattern::Rest(Box::new(inner)), span)
            } else {
                self.parse_pattern()?
            };
            self.parse_type_annotation_opt()?;
            params.push(param);
            if !self.at(&Token::RParen) {
                self.expect(&Token::Comma)?;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(params)
    }

    fn parse_array_literal(&mut self) -> Result<Spanned<Expr>, LintError> {
        let open = self.expect(&Token::LBracket)?;
        let mut elements = Vec::new();
        while !self.at(&Token::RBracket) {
            if self.eat(&Token::Comma) {
                elements.push(ArrayElem::Hole);
                continue;
            }
            if self.at(&Token::Ellipsis) {
                self.expect(&Token::Ellipsis)?;
                elements.push(ArrayElem::Spread(self.parse_expr(BP_ASSIGN)?));
            } else {
                elements.push(ArrayElem::Item(self.parse_expr(BP_ASSIGN)?));
            }
            if !self.at(&Token::RBracket) {
                self.expect(&Token::Comma)?;
            }
        }
        let close = self.expect(&Token::RBracket)?;
        Ok(Spanned::new(Expr::Array(elements), open.to(close)))
    }

    fn parse_object_literal(&mut self) -> Result<Spanned<Expr>, LintError> {
        let open = self.expect(&Token::LBrace)?;
        let mut props = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.at(&Token::Ellipsis) {
                self.expect(&Token::Ellipsis)?;
                props.push(ObjectProp::Spread(self.parse_expr(BP_ASSIGN)?));
            } else {
                let key_start = self.start_span()?;
                let key = self.parse_prop_key()?;
                if self.eat(&Token::Colon) {
                    let value = self.parse_expr(BP_ASSIGN)?;
                    props.push(ObjectProp::Entry { key, value });
                } else if self.at(&Token::LParen) {
                    // Method shorthand: `{ run() { ... } }`
                    let params = self.parse_params()?;
                    self.parse_return_annotation_opt()?;
                    let body = self.parse_block()?;
                    let span = Span::new(key_start.start, self.last_end);
                    props.push(ObjectProp::Entry {
                        key,
                        value: Spanned::new(
                            Expr::Function(FunctionExpr { name: None, params, body }),
                            span,
                        ),
                    });
                } else {
                    let Some(name) = key.static_name() else {
                        return Err(LintError::syntax(
                            "object shorthand requires a plain key",
                            key_start,
                        ));
                    };
                    props.push(ObjectProp::Entry {
                        key: PropKey::Ident(name.to_string()),
                        value: Spanned::new(Expr::Ident(name.to_string()), key_start),
                    });
                }
            }
            if !self.at(&Token::RBrace) {
                self.expect(&Token::Comma)?;
            }
        }
        let close = self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Expr::Object(props), open.to(close)))
    }

    /// Split a raw template body into chunks and `${...}` holes. Each hole is
    /// re-lexed at its real source offset so sub-expression spans stay valid.
    fn parse_template_parts(
        &mut self,
        raw: &str,
        span: Span,
    ) -> Result<Vec<TemplatePart>, LintError> {
        let bytes = raw.as_bytes();
        let mut parts = Vec::new();
        let mut chunk_start = 0;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i += 2;
                continue;
            }
            if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
                if i > chunk_start {
                    parts.push(TemplatePart::Chunk(raw[chunk_start..i].to_string()));
                }
                let mut depth = 1;
                let mut j = i + 2;
                while j < bytes.len() && depth > 0 {
                    match bytes[j] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    j += 1;
                }
                if depth != 0 {
                    return Err(LintError::syntax(
                        "unterminated template interpolation",
                        span,
                    ));
                }
                let inner = &raw[i + 2..j - 1];
                let base = span.start + 1 + i + 2;
                let sub = lex(inner)?;
                let shifted: Vec<Spanned<Token>> = sub
                    .tokens
                    .into_iter()
                    .map(|t| {
                        Spanned::new(
                            t.node,
                            Span::new(t.span.start + base, t.span.end + base),
                        )
                    })
                    .collect();
                let mut sub_parser = Parser::new(&shifted, self.source);
                let expr = sub_parser.parse_expr(0)?;
                if let Some(extra) = sub_parser.peek() {
                    return Err(LintError::syntax(
                        format!("unexpected {} in template interpolation", extra.node),
                        extra.span,
                    ));
                }
                parts.push(TemplatePart::Expr(expr));
                chunk_start = j;
                i = j;
                continue;
            }
            i += 1;
        }
        if chunk_start < raw.len() {
            parts.push(TemplatePart::Chunk(raw[chunk_start..].to_string()));
        }
        Ok(parts)
    }
}

fn assign_op(token: &Token) -> Option<AssignOp> {
    match token {
        Token::Eq => Some(AssignOp::Assign),
        Token::PlusEq => Some(AssignOp::AddAssign),
        Token::MinusEq => Some(AssignOp::SubAssign),
        Token::StarEq => Some(AssignOp::MulAssign),
        Token::SlashEq => Some(AssignOp::DivAssign),
        Token::PercentEq => Some(AssignOp::ModAssign),
        Token::AmpAmpEq => Some(AssignOp::AndAssign),
        Token::PipePipeEq => Some(AssignOp::OrAssign),
        Token::QuestionQuestionEq => Some(AssignOp::CoalesceAssign),
        _ => None,
    }
}

fn logical_op(token: &Token) -> Option<(LogicalOp, u8)> {
    match token {
        Token::QuestionQuestion => Some((LogicalOp::Coalesce, 4)),
        Token::PipePipe => Some((LogicalOp::Or, 5)),
        Token::AmpAmp => Some((LogicalOp::And, 6)),
        _ => None,
    }
}

fn binary_op(token: &Token) -> Option<(BinOp, u8, u8)> {
    let (op, lbp) = match token {
        Token::Pipe => (BinOp::BitOr, 7),
        Token::Caret => (BinOp::BitXor, 8),
        Token::Amp => (BinOp::BitAnd, 9),
        Token::EqEq => (BinOp::Eq, 10),
        Token::EqEqEq => (BinOp::StrictEq, 10),
        Token::BangEq => (BinOp::Neq, 10),
        Token::BangEqEq => (BinOp::StrictNeq, 10),
        Token::Lt => (BinOp::Lt, 11),
        Token::Gt => (BinOp::Gt, 11),
        Token::LtEq => (BinOp::LtEq, 11),
        Token::GtEq => (BinOp::GtEq, 11),
        Token::In => (BinOp::In, 11),
        Token::InstanceOf => (BinOp::InstanceOf, 11),
        Token::Shl => (BinOp::Shl, 12),
        Token::Shr => (BinOp::Shr, 12),
        Token::UShr => (BinOp::UShr, 12),
        Token::Plus => (BinOp::Add, 13),
        Token::Minus => (BinOp::Sub, 13),
        Token::Star => (BinOp::Mul, 14),
        Token::Slash => (BinOp::Div, 14),
        Token::Percent => (BinOp::Mod, 14),
        Token::StarStar => return Some((BinOp::Pow, 15, 15)),
        _ => return None,
    };
    Some((op, lbp, lbp + 1))
}

/// Lex and parse a whole source file.
pub fn parse_source(source: &str) -> Result<(Program, Vec<crate::lexer::Comment>), LintError> {
    let out = lex(source)?;
    let mut parser = Parser::new(&out.tokens, source);
    let program = parser.parse_program()?;
    Ok((program, out.comments))
}
