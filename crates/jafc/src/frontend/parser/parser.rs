//! Recursive descent parser for JAF

use std::collections::HashSet;

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for JAF
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Span of the last consumed token
    previous: Span,
    /// Struct tags seen so far; an identifier in this set starts a declaration
    type_names: HashSet<String>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous: Span::default(),
            type_names: HashSet::new(),
        })
    }

    /// Parse a complete program into its top-level block
    pub fn parse(&mut self) -> CompileResult<Block> {
        let start_span = self.current.span;
        let mut items = Vec::new();

        while !self.at_end() {
            if !self.starts_type() {
                return Err(CompileError::parser(
                    format!("expected declaration, found {}", self.current.kind),
                    self.current.span,
                ));
            }
            items.extend(
                self.parse_declaration()?
                    .into_iter()
                    .map(BlockItem::Declaration),
            );
        }

        Ok(Block::new(items, start_span.merge(self.previous)))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.previous = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<String> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            Ok(name)
        } else {
            Err(CompileError::parser(
                format!("expected identifier, found {}", self.current.kind),
                self.current.span,
            ))
        }
    }

    /// Whether the current token can begin a type specifier
    fn starts_type(&self) -> bool {
        match &self.current.kind {
            TokenKind::Identifier(name) => self.type_names.contains(name),
            kind => kind.is_type_keyword(),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parse a declaration; one item per declarator
    fn parse_declaration(&mut self) -> CompileResult<Vec<Declaration>> {
        let start_span = self.current.span;
        let ty = self.parse_type_specifier()?;

        // Type-only declaration: struct S { ... };
        if self.match_token(&TokenKind::Semi)? {
            let span = start_span.merge(self.previous);
            return Ok(vec![Declaration::Variable(VarDecl::new(None, ty, span))]);
        }

        let name = self.expect_identifier()?;

        if self.check(&TokenKind::LParen) {
            let params = self.parse_parameter_list()?;
            let body = self.parse_block()?;
            let span = start_span.merge(body.span);
            return Ok(vec![Declaration::Function(FuncDecl::new(
                name, ty, params, body, span,
            ))]);
        }

        let mut declarations = Vec::new();
        let mut name = name;
        let mut ty = ty;
        loop {
            let init = if self.match_token(&TokenKind::Eq)? {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            let next_ty = Self::follow_type(&ty);

            let mut var = VarDecl::new(Some(name), ty, start_span.merge(self.previous));
            if let Some(init) = init {
                var = var.with_init(init);
            }
            declarations.push(Declaration::Variable(var));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
            name = self.expect_identifier()?;
            ty = next_ty;
        }

        self.expect(TokenKind::Semi)?;
        Ok(declarations)
    }

    /// Type for the declarators after the first one in `T a, b;`
    ///
    /// A struct body belongs to the first declarator only; the rest refer
    /// to it by name.
    fn follow_type(ty: &TypeSpecifier) -> TypeSpecifier {
        match (&ty.members, &ty.name) {
            (Some(_), Some(name)) => TypeSpecifier::typedef(name.clone(), ty.span),
            _ => ty.clone(),
        }
    }

    fn parse_type_specifier(&mut self) -> CompileResult<TypeSpecifier> {
        let start_span = self.current.span;

        let kind = match &self.current.kind {
            TokenKind::Void => TypeKind::Void,
            TokenKind::Int => TypeKind::Int,
            TokenKind::Float => TypeKind::Float,
            TokenKind::String => TypeKind::String,
            TokenKind::Struct => {
                self.advance()?;
                return self.parse_struct_specifier(start_span);
            }
            TokenKind::Enum => {
                self.advance()?;
                return self.parse_enum_specifier(start_span);
            }
            TokenKind::Identifier(name) if self.type_names.contains(name) => {
                let name = name.clone();
                self.advance()?;
                return Ok(TypeSpecifier::typedef(name, start_span));
            }
            other => {
                return Err(CompileError::parser(
                    format!("expected type, found {}", other),
                    start_span,
                ));
            }
        };
        self.advance()?;
        Ok(TypeSpecifier::new(kind, start_span))
    }

    fn parse_struct_specifier(&mut self, start_span: Span) -> CompileResult<TypeSpecifier> {
        let name = if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            // Visible from here on, including inside the body
            self.type_names.insert(name.clone());
            Some(name)
        } else {
            None
        };

        if !self.match_token(&TokenKind::LBrace)? {
            return match name {
                Some(name) => Ok(TypeSpecifier::typedef(name, start_span.merge(self.previous))),
                None => Err(CompileError::parser(
                    format!("expected struct name or body, found {}", self.current.kind),
                    self.current.span,
                )),
            };
        }

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(CompileError::parser("unterminated struct body", start_span));
            }
            members.extend(self.parse_member_declaration()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(TypeSpecifier::struct_def(name, members, start_span.merge(self.previous)))
    }

    fn parse_member_declaration(&mut self) -> CompileResult<Vec<VarDecl>> {
        let start_span = self.current.span;
        let ty = self.parse_type_specifier()?;

        if self.match_token(&TokenKind::Semi)? {
            return Ok(vec![VarDecl::new(None, ty, start_span.merge(self.previous))]);
        }

        let mut members = Vec::new();
        let mut ty = ty;
        loop {
            let name = self.expect_identifier()?;
            let next_ty = Self::follow_type(&ty);
            members.push(VarDecl::new(Some(name), ty, start_span.merge(self.previous)));
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
            ty = next_ty;
        }
        self.expect(TokenKind::Semi)?;
        Ok(members)
    }

    /// Enums are parsed so they can be rejected with a proper error later
    fn parse_enum_specifier(&mut self, start_span: Span) -> CompileResult<TypeSpecifier> {
        let name = if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            Some(name)
        } else {
            None
        };

        if self.match_token(&TokenKind::LBrace)? {
            while !self.check(&TokenKind::RBrace) {
                self.expect_identifier()?;
                if self.match_token(&TokenKind::Eq)? {
                    self.parse_conditional_expression()?;
                }
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RBrace)?;
        }

        let mut ty = TypeSpecifier::new(TypeKind::Enum, start_span.merge(self.previous));
        ty.name = name;
        Ok(ty)
    }

    fn parse_parameter_list(&mut self) -> CompileResult<Vec<VarDecl>> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();

        if self.match_token(&TokenKind::RParen)? {
            return Ok(params);
        }
        if self.check(&TokenKind::Void) && matches!(self.lexer.peek()?.kind, TokenKind::RParen) {
            self.advance()?;
            self.advance()?;
            return Ok(params);
        }

        loop {
            let start_span = self.current.span;
            let ty = self.parse_type_specifier()?;
            let name = if let TokenKind::Identifier(name) = &self.current.kind {
                let name = name.clone();
                self.advance()?;
                Some(name)
            } else {
                None
            };
            params.push(VarDecl::new(name, ty, start_span.merge(self.previous)));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> CompileResult<Block> {
        let start_span = self.current.span;
        self.expect(TokenKind::LBrace)?;

        let mut items = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(CompileError::parser("unterminated block", start_span));
            }
            self.parse_block_item(&mut items)?;
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Block::new(items, start_span.merge(self.previous)))
    }

    fn parse_block_item(&mut self, items: &mut Vec<BlockItem>) -> CompileResult<()> {
        if self.starts_type() {
            items.extend(
                self.parse_declaration()?
                    .into_iter()
                    .map(BlockItem::Declaration),
            );
        } else {
            items.push(BlockItem::Statement(self.parse_statement()?));
        }
        Ok(())
    }

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;

        let kind = match &self.current.kind {
            TokenKind::LBrace => StmtKind::Compound(self.parse_block()?),
            TokenKind::Semi => {
                self.advance()?;
                StmtKind::Empty
            }
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::While => {
                self.advance()?;
                let condition = self.parse_paren_expression()?;
                let body = Box::new(self.parse_statement()?);
                StmtKind::While { condition, body }
            }
            TokenKind::Do => {
                self.advance()?;
                let body = Box::new(self.parse_statement()?);
                self.expect(TokenKind::While)?;
                let condition = self.parse_paren_expression()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::DoWhile { body, condition }
            }
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::Switch => {
                self.advance()?;
                let expr = self.parse_paren_expression()?;
                let body = self.parse_block()?;
                StmtKind::Switch { expr, body }
            }
            TokenKind::Case => {
                self.advance()?;
                let value = self.parse_conditional_expression()?;
                self.expect(TokenKind::Colon)?;
                let stmt = Box::new(self.parse_statement()?);
                StmtKind::Case { value, stmt }
            }
            TokenKind::Default => {
                self.advance()?;
                self.expect(TokenKind::Colon)?;
                StmtKind::Default(Box::new(self.parse_statement()?))
            }
            TokenKind::Break => {
                self.advance()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Continue
            }
            TokenKind::Return => {
                self.advance()?;
                let value = if self.check(&TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(TokenKind::Semi)?;
                StmtKind::Return(value)
            }
            TokenKind::Goto => {
                self.advance()?;
                let label = self.expect_identifier()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Goto(label)
            }
            TokenKind::Identifier(_) if matches!(self.lexer.peek()?.kind, TokenKind::Colon) => {
                let label = self.expect_identifier()?;
                self.expect(TokenKind::Colon)?;
                let stmt = Box::new(self.parse_statement()?);
                StmtKind::Labeled { label, stmt }
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Expr(expr)
            }
        };

        Ok(Stmt::new(kind, start_span.merge(self.previous)))
    }

    fn parse_paren_expression(&mut self) -> CompileResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if_statement(&mut self) -> CompileResult<StmtKind> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_paren_expression()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(StmtKind::If { condition, then_branch, else_branch })
    }

    fn parse_for_statement(&mut self) -> CompileResult<StmtKind> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init_span = self.current.span;
        let mut init_items = Vec::new();
        if self.starts_type() {
            // The declaration consumes its own ';'
            self.parse_block_item(&mut init_items)?;
        } else if !self.match_token(&TokenKind::Semi)? {
            let expr = self.parse_expression()?;
            self.expect(TokenKind::Semi)?;
            let span = expr.span;
            init_items.push(BlockItem::Statement(Stmt::new(StmtKind::Expr(expr), span)));
        }
        let init = Block::new(init_items, init_span.merge(self.previous));

        let condition = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semi)?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(StmtKind::For { init, condition, update, body })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        let first = self.parse_assignment_expression()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let start_span = first.span;
        let mut exprs = vec![first];
        while self.match_token(&TokenKind::Comma)? {
            exprs.push(self.parse_assignment_expression()?);
        }
        Ok(Expr::new(ExprKind::Comma(exprs), start_span.merge(self.previous)))
    }

    fn parse_assignment_expression(&mut self) -> CompileResult<Expr> {
        let target = self.parse_conditional_expression()?;

        if let Some(op) = Self::assignment_op(&self.current.kind) {
            self.advance()?;
            let value = self.parse_assignment_expression()?;
            let span = target.span.merge(value.span);
            return Ok(Expr::new(
                ExprKind::Assign {
                    op,
                    target: Box::new(target),
                    value: Box::new(value),
                },
                span,
            ));
        }

        Ok(target)
    }

    fn assignment_op(kind: &TokenKind) -> Option<AssignOp> {
        Some(match kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::AddAssign,
            TokenKind::MinusEq => AssignOp::SubAssign,
            TokenKind::StarEq => AssignOp::MulAssign,
            TokenKind::SlashEq => AssignOp::DivAssign,
            TokenKind::PercentEq => AssignOp::ModAssign,
            TokenKind::AmpEq => AssignOp::AndAssign,
            TokenKind::PipeEq => AssignOp::OrAssign,
            TokenKind::CaretEq => AssignOp::XorAssign,
            TokenKind::LtLtEq => AssignOp::ShlAssign,
            TokenKind::GtGtEq => AssignOp::ShrAssign,
            _ => return None,
        })
    }

    fn parse_conditional_expression(&mut self) -> CompileResult<Expr> {
        let condition = self.parse_binary_expression(1)?;

        if self.match_token(&TokenKind::Question)? {
            let then_expr = self.parse_expression()?;
            self.expect(TokenKind::Colon)?;
            let else_expr = self.parse_conditional_expression()?;
            let span = condition.span.merge(else_expr.span);
            return Ok(Expr::new(
                ExprKind::Ternary {
                    condition: Box::new(condition),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                },
                span,
            ));
        }

        Ok(condition)
    }

    /// Precedence climbing over the left-associative binary operators
    fn parse_binary_expression(&mut self, min_precedence: u8) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expression()?;

        while let Some(precedence) = self.current.kind.binary_precedence() {
            if precedence < min_precedence {
                break;
            }
            let Some(op) = Self::binary_op(&self.current.kind) else {
                break;
            };
            self.advance()?;
            let right = self.parse_binary_expression(precedence + 1)?;
            let span = left.span.merge(right.span);
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

    fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::LtLt => BinaryOp::Shl,
            TokenKind::GtGt => BinaryOp::Shr,
            TokenKind::AmpAmp => BinaryOp::LogAnd,
            TokenKind::PipePipe => BinaryOp::LogOr,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::Ge,
            _ => return None,
        })
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let start_span = self.current.span;

        let op = match &self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            TokenKind::Plus => {
                // Unary + is a no-op
                self.advance()?;
                return self.parse_unary_expression();
            }
            TokenKind::LParen if matches!(self.lexer.peek()?.kind, TokenKind::Int | TokenKind::Float) => {
                self.advance()?;
                let target = if self.match_token(&TokenKind::Int)? {
                    TypeKind::Int
                } else {
                    self.expect(TokenKind::Float)?;
                    TypeKind::Float
                };
                self.expect(TokenKind::RParen)?;
                let operand = self.parse_unary_expression()?;
                let span = start_span.merge(operand.span);
                return Ok(Expr::new(
                    ExprKind::Cast {
                        target,
                        expr: Box::new(operand),
                    },
                    span,
                ));
            }
            _ => return self.parse_postfix_expression(),
        };

        self.advance()?;
        // i32::MIN has no positive spelling
        if op == UnaryOp::Neg
            && matches!(&self.current.kind, TokenKind::IntLiteral(s) if s == "2147483648")
        {
            let span = start_span.merge(self.current.span);
            self.advance()?;
            return Ok(Expr::int(i32::MIN, span));
        }
        let operand = self.parse_unary_expression()?;
        let span = start_span.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix_expression(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            let start_span = expr.span;
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance()?;
                    let field = self.expect_identifier()?;
                    let span = start_span.merge(self.previous);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            field,
                            member_no: None,
                        },
                        span,
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.check(&TokenKind::PlusPlus) {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    self.advance()?;
                    let span = start_span.merge(self.previous);
                    expr = Expr::new(
                        ExprKind::Unary {
                            op,
                            operand: Box::new(expr),
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    return Err(CompileError::parser(
                        "called object is not a function name",
                        self.current.span,
                    ));
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;

        match self.current.kind.clone() {
            TokenKind::IntLiteral(s) => {
                self.advance()?;
                let value = s.parse::<i32>().map_err(|_| {
                    CompileError::parser(format!("integer literal '{}' out of range", s), span)
                })?;
                Ok(Expr::new(ExprKind::IntLiteral(value), span))
            }
            TokenKind::HexLiteral(s) => {
                self.advance()?;
                // Hex literals spell out the bit pattern, so 0xFFFFFFFF is -1
                let value = u32::from_str_radix(&s[2..], 16).map_err(|_| {
                    CompileError::parser(format!("integer literal '{}' out of range", s), span)
                })?;
                Ok(Expr::new(ExprKind::IntLiteral(value as i32), span))
            }
            TokenKind::FloatLiteral(s) => {
                self.advance()?;
                let digits = s.trim_end_matches(['f', 'F']);
                let value = digits.parse::<f32>().map_err(|_| {
                    CompileError::parser(format!("invalid float literal '{}'", s), span)
                })?;
                Ok(Expr::new(ExprKind::FloatLiteral(value), span))
            }
            TokenKind::StringLiteral(s) => {
                self.advance()?;
                let value = Self::unescape(&s, span)?;
                Ok(Expr::new(ExprKind::StringLiteral(value), span))
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_argument_list()?;
                    return Ok(Expr::new(
                        ExprKind::Call {
                            name,
                            args,
                            func_no: None,
                        },
                        span.merge(self.previous),
                    ));
                }
                Ok(Expr::new(ExprKind::identifier(name), span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let mut expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                expr.span = span.merge(self.previous);
                Ok(expr)
            }
            other => Err(CompileError::parser(
                format!("expected expression, found {}", other),
                span,
            )),
        }
    }

    /// Arguments after the opening parenthesis, through the closing one
    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.match_token(&TokenKind::RParen)? {
            return Ok(args);
        }
        loop {
            args.push(self.parse_assignment_expression()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// Strip the quotes from a string literal and process escapes
    fn unescape(literal: &str, span: Span) -> CompileResult<String> {
        let inner = &literal[1..literal.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();

        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escaped = match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('0') => '\0',
                Some('\\') => '\\',
                Some('"') => '"',
                Some('\'') => '\'',
                Some(other) => {
                    return Err(CompileError::parser(
                        format!("unknown escape sequence '\\{}'", other),
                        span,
                    ));
                }
                None => return Err(CompileError::parser("dangling escape", span)),
            };
            out.push(escaped);
        }

        Ok(out)
    }
}
