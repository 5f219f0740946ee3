//! Bantam recursive descent parser

use crate::common::{CompileError, CompileResult, FileId, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Bantam parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    file: FileId,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, file: FileId) -> Self {
        Self {
            lexer: Lexer::new(source),
            file,
        }
    }

    /// Parse a complete source file
    pub fn parse_program(&mut self) -> CompileResult<Program> {
        let mut classes = Vec::new();

        while !self.check(&TokenKind::Eof)? {
            classes.push(self.parse_class()?);
        }

        Ok(Program::new(classes))
    }

    // ==================== Classes ====================

    fn parse_class(&mut self) -> CompileResult<ClassDecl> {
        let start = self.expect(TokenKind::Class)?.span;
        let name = self.expect_identifier()?;

        let parent = if self.match_token(&TokenKind::Extends)? {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let header_end = self.expect(TokenKind::LBrace)?.span;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace)? {
            members.push(self.parse_member()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(ClassDecl::new(name, parent, members, self.file, start.to(header_end)))
    }

    fn parse_member(&mut self) -> CompileResult<Member> {
        let start = self.lexer.peek()?.span;

        let ty = if self.match_token(&TokenKind::Void)? {
            Type::Void
        } else {
            self.parse_type()?
        };
        let name = self.expect_declared_name()?;

        if self.match_token(&TokenKind::LParen)? {
            let params = self.parse_params()?;
            self.expect(TokenKind::RParen)?;
            let (body, end_span) = self.parse_block_with_end()?;
            let span = start.to(body.span);
            return Ok(Member::Method(MethodDecl::new(name, params, ty, body, span, end_span)));
        }

        if ty.is_void() {
            return Err(CompileError::parser(
                format!("field '{}' cannot have type void", name),
                start,
            ));
        }

        let init = if self.match_token(&TokenKind::Eq)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.expect(TokenKind::Semi)?.span;

        Ok(Member::Field(FieldDecl::new(name, ty, init, start.to(end))))
    }

    fn parse_params(&mut self) -> CompileResult<Vec<Param>> {
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen)? {
            let start = self.lexer.peek()?.span;
            let ty = self.parse_type()?;
            let name_token = self.lexer.peek()?.span;
            let name = self.expect_declared_name()?;
            params.push(Param::new(name, ty, start.to(name_token)));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(params)
    }

    // ==================== Types ====================

    fn parse_type(&mut self) -> CompileResult<Type> {
        let token = self.lexer.next_token()?;
        let base = match token.kind {
            TokenKind::Int => Type::Int,
            TokenKind::Boolean => Type::Boolean,
            TokenKind::Identifier(name) => Type::Class(name),
            other => {
                return Err(CompileError::parser(
                    format!("expected type, found {}", other),
                    token.span,
                ));
            }
        };

        if self.check(&TokenKind::LBracket)? && self.lexer.check_at(1, &TokenKind::RBracket)? {
            self.lexer.next_token()?;
            self.lexer.next_token()?;
            return Ok(Type::array(base));
        }

        Ok(base)
    }

    /// Whether the upcoming tokens start a local variable declaration
    fn at_local_decl(&mut self) -> CompileResult<bool> {
        if self.check(&TokenKind::Int)? || self.check(&TokenKind::Boolean)? {
            return Ok(true);
        }
        if !self.check(&TokenKind::Identifier(String::new()))? {
            return Ok(false);
        }
        // Foo x ...  |  Foo[] x ...
        if self.lexer.check_at(1, &TokenKind::Identifier(String::new()))?
            || self.lexer.check_at(1, &TokenKind::This)?
            || self.lexer.check_at(1, &TokenKind::Super)?
            || self.lexer.check_at(1, &TokenKind::Null)?
        {
            return Ok(true);
        }
        Ok(self.lexer.check_at(1, &TokenKind::LBracket)?
            && self.lexer.check_at(2, &TokenKind::RBracket)?)
    }

    // ==================== Statements ====================

    fn parse_block(&mut self) -> CompileResult<Block> {
        Ok(self.parse_block_with_end()?.0)
    }

    /// Parse a block, also returning the span of its closing brace
    fn parse_block_with_end(&mut self) -> CompileResult<(Block, Span)> {
        let start = self.expect(TokenKind::LBrace)?.span;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace)? {
            stmts.push(self.parse_stmt()?);
        }

        let end = self.expect(TokenKind::RBrace)?.span;
        Ok((Block::new(stmts, start.to(end)), end))
    }

    fn parse_stmt(&mut self) -> CompileResult<Stmt> {
        let start = self.lexer.peek()?.span;

        if self.check(&TokenKind::LBrace)? {
            let block = self.parse_block()?;
            let span = block.span;
            return Ok(Stmt::new(StmtKind::Block(block), span));
        }

        if self.match_token(&TokenKind::If)? {
            self.expect(TokenKind::LParen)?;
            let condition = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let then_branch = Box::new(self.parse_stmt()?);

            let else_branch = if self.match_token(&TokenKind::Else)? {
                Some(Box::new(self.parse_stmt()?))
            } else {
                None
            };

            let end = else_branch.as_ref().map_or(then_branch.span, |e| e.span);
            return Ok(Stmt::new(
                StmtKind::If { condition, then_branch, else_branch },
                start.to(end),
            ));
        }

        if self.match_token(&TokenKind::While)? {
            self.expect(TokenKind::LParen)?;
            let condition = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let body = Box::new(self.parse_stmt()?);
            let span = start.to(body.span);
            return Ok(Stmt::new(StmtKind::While { condition, body }, span));
        }

        if self.match_token(&TokenKind::For)? {
            self.expect(TokenKind::LParen)?;
            let init = self.parse_optional_expr(&TokenKind::Semi)?;
            self.expect(TokenKind::Semi)?;
            let condition = self.parse_optional_expr(&TokenKind::Semi)?;
            self.expect(TokenKind::Semi)?;
            let update = self.parse_optional_expr(&TokenKind::RParen)?;
            self.expect(TokenKind::RParen)?;
            let body = Box::new(self.parse_stmt()?);
            let span = start.to(body.span);
            return Ok(Stmt::new(StmtKind::For { init, condition, update, body }, span));
        }

        if self.match_token(&TokenKind::Break)? {
            let end = self.expect(TokenKind::Semi)?.span;
            return Ok(Stmt::new(StmtKind::Break, start.to(end)));
        }

        if self.match_token(&TokenKind::Return)? {
            let value = self.parse_optional_expr(&TokenKind::Semi)?;
            let end = self.expect(TokenKind::Semi)?.span;
            return Ok(Stmt::new(StmtKind::Return(value), start.to(end)));
        }

        if self.at_local_decl()? {
            let ty = self.parse_type()?;
            let name = self.expect_declared_name()?;
            let init = if self.match_token(&TokenKind::Eq)? {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let end = self.expect(TokenKind::Semi)?.span;
            return Ok(Stmt::new(StmtKind::Local { name, ty, init }, start.to(end)));
        }

        let expr = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi)?.span;
        Ok(Stmt::new(StmtKind::Expr(expr), start.to(end)))
    }

    fn parse_optional_expr(&mut self, terminator: &TokenKind) -> CompileResult<Option<Expr>> {
        if self.check(terminator)? {
            Ok(None)
        } else {
            Ok(Some(self.parse_expr()?))
        }
    }

    // ==================== Expressions ====================

    fn parse_expr(&mut self) -> CompileResult<Expr> {
        let target = self.parse_expr_with_precedence(0)?;

        if self.match_token(&TokenKind::Eq)? {
            let value = self.parse_expr()?;
            let span = target.span.to(value.span);
            return Ok(Expr::new(
                ExprKind::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                span,
            ));
        }

        Ok(target)
    }

    fn parse_expr_with_precedence(&mut self, min_prec: u8) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expr()?;

        loop {
            if self.check(&TokenKind::InstanceOf)? {
                // instanceof binds like the relational operators
                if BinOp::Lt.precedence() < min_prec {
                    break;
                }
                self.lexer.next_token()?;
                let ty_start = self.lexer.peek()?.span;
                let ty = self.parse_type()?;
                let span = left.span.to(ty_start);
                left = Expr::new(ExprKind::InstanceOf { expr: Box::new(left), ty }, span);
                continue;
            }

            let Some(op) = self.peek_binary_op()? else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.lexer.next_token()?; // consume operator
            let right = self.parse_expr_with_precedence(prec + 1)?;

            let span = left.span.to(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn peek_binary_op(&mut self) -> CompileResult<Option<BinOp>> {
        Ok(match &self.lexer.peek()?.kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Percent => Some(BinOp::Rem),
            TokenKind::AmpAmp => Some(BinOp::And),
            TokenKind::PipePipe => Some(BinOp::Or),
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::Ne),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::LtEq => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::GtEq => Some(BinOp::Ge),
            _ => None,
        })
    }

    fn parse_unary_expr(&mut self) -> CompileResult<Expr> {
        let start = self.lexer.peek()?.span;

        let unary = if self.match_token(&TokenKind::Minus)? {
            Some(UnaryOp::Neg)
        } else if self.match_token(&TokenKind::Bang)? {
            Some(UnaryOp::Not)
        } else {
            None
        };
        if let Some(op) = unary {
            let operand = self.parse_unary_expr()?;
            let span = start.to(operand.span);
            return Ok(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, span));
        }

        let inc_dec = if self.match_token(&TokenKind::PlusPlus)? {
            Some(IncDecOp::Inc)
        } else if self.match_token(&TokenKind::MinusMinus)? {
            Some(IncDecOp::Dec)
        } else {
            None
        };
        if let Some(op) = inc_dec {
            let target = self.parse_unary_expr()?;
            let span = start.to(target.span);
            return Ok(Expr::new(
                ExprKind::IncDec { op, prefix: true, target: Box::new(target) },
                span,
            ));
        }

        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        loop {
            if self.match_token(&TokenKind::Dot)? {
                let member = self.lexer.peek()?.span;
                let name = self.expect_identifier()?;

                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_call_args()?;
                    let end = self.expect(TokenKind::RParen)?.span;
                    let span = expr.span.to(end);
                    expr = Expr::new(
                        ExprKind::Call {
                            receiver: Some(Box::new(expr)),
                            method: name,
                            args,
                        },
                        span,
                    );
                } else {
                    let span = expr.span.to(member);
                    expr = Expr::new(
                        ExprKind::Field {
                            object: Box::new(expr),
                            field: name,
                        },
                        span,
                    );
                }
            } else if self.match_token(&TokenKind::LBracket)? {
                let index = self.parse_expr()?;
                let end = self.expect(TokenKind::RBracket)?.span;
                let span = expr.span.to(end);
                expr = Expr::new(
                    ExprKind::Index {
                        array: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.check(&TokenKind::PlusPlus)? || self.check(&TokenKind::MinusMinus)? {
                let token = self.lexer.next_token()?;
                let op = if token.kind == TokenKind::PlusPlus { IncDecOp::Inc } else { IncDecOp::Dec };
                let span = expr.span.to(token.span);
                expr = Expr::new(
                    ExprKind::IncDec { op, prefix: false, target: Box::new(expr) },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_call_args(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();

        if !self.check(&TokenKind::RParen)? {
            args.push(self.parse_expr()?);
            while self.match_token(&TokenKind::Comma)? {
                args.push(self.parse_expr()?);
            }
        }

        Ok(args)
    }

    fn parse_primary_expr(&mut self) -> CompileResult<Expr> {
        let token = self.lexer.next_token()?;
        let start = token.span;

        let kind = match token.kind {
            TokenKind::IntLiteral(text) => {
                let value = text.parse::<i32>().map_err(|_| {
                    CompileError::parser(format!("integer literal {} is out of range", text), start)
                })?;
                ExprKind::IntLiteral(value)
            }
            TokenKind::StringLiteral(s) => ExprKind::StringLiteral(s),
            TokenKind::True => ExprKind::BoolLiteral(true),
            TokenKind::False => ExprKind::BoolLiteral(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::This => ExprKind::This,
            TokenKind::Super => ExprKind::Super,
            TokenKind::New => return self.parse_new_expr(start),
            TokenKind::Identifier(name) => {
                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_call_args()?;
                    let end = self.expect(TokenKind::RParen)?.span;
                    return Ok(Expr::new(
                        ExprKind::Call { receiver: None, method: name, args },
                        start.to(end),
                    ));
                }
                ExprKind::Name(name)
            }
            TokenKind::LParen => {
                if self.at_cast()? {
                    return self.parse_cast_expr(start);
                }
                let mut inner = self.parse_expr()?;
                let end = self.expect(TokenKind::RParen)?.span;
                inner.span = start.to(end);
                return Ok(inner);
            }
            other => {
                return Err(CompileError::parser(
                    format!("expected expression, found {}", other),
                    start,
                ));
            }
        };

        Ok(Expr::new(kind, start))
    }

    fn parse_new_expr(&mut self, start: Span) -> CompileResult<Expr> {
        let token = self.lexer.next_token()?;
        let element = match token.kind {
            TokenKind::Int => Type::Int,
            TokenKind::Boolean => Type::Boolean,
            TokenKind::Identifier(name) => {
                if self.match_token(&TokenKind::LParen)? {
                    let end = self.expect(TokenKind::RParen)?.span;
                    return Ok(Expr::new(ExprKind::New { class: name }, start.to(end)));
                }
                Type::Class(name)
            }
            other => {
                return Err(CompileError::parser(
                    format!("expected type after 'new', found {}", other),
                    token.span,
                ));
            }
        };

        self.expect(TokenKind::LBracket)?;
        let size = self.parse_expr()?;
        let end = self.expect(TokenKind::RBracket)?.span;
        Ok(Expr::new(
            ExprKind::NewArray { element, size: Box::new(size) },
            start.to(end),
        ))
    }

    /// After `(`: is this `(Type)(expr)`?
    fn at_cast(&mut self) -> CompileResult<bool> {
        if self.check(&TokenKind::Int)? || self.check(&TokenKind::Boolean)? {
            return Ok(true);
        }
        if !self.check(&TokenKind::Identifier(String::new()))? {
            return Ok(false);
        }
        if self.lexer.check_at(1, &TokenKind::LBracket)? {
            return self.lexer.check_at(2, &TokenKind::RBracket);
        }
        Ok(self.lexer.check_at(1, &TokenKind::RParen)? && self.lexer.check_at(2, &TokenKind::LParen)?)
    }

    fn parse_cast_expr(&mut self, start: Span) -> CompileResult<Expr> {
        let ty = self.parse_type()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        let end = self.expect(TokenKind::RParen)?.span;
        Ok(Expr::new(
            ExprKind::Cast { ty, expr: Box::new(expr) },
            start.to(end),
        ))
    }

    // ==================== Helpers ====================

    fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        self.lexer.check(expected)
    }

    fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        self.lexer.match_token(expected)
    }

    fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        self.lexer.expect(expected)
    }

    fn expect_identifier(&mut self) -> CompileResult<String> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            _ => Err(CompileError::parser(
                format!("expected identifier, found {}", token.kind),
                token.span,
            )),
        }
    }

    /// Name of a field, method, formal or local. The self-reference keywords
    /// are accepted here so the analyzer can report them as reserved names.
    fn expect_declared_name(&mut self) -> CompileResult<String> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            TokenKind::This => Ok("this".to_string()),
            TokenKind::Super => Ok("super".to_string()),
            TokenKind::Null => Ok("null".to_string()),
            _ => Err(CompileError::parser(
                format!("expected identifier, found {}", token.kind),
                token.span,
            )),
        }
    }
}
