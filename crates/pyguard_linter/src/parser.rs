//! Recursive-descent parser producing [`crate::ast::Module`] from source
//! text, grounded on `original_source/parser.py::parse_file`'s contract:
//! never panics on malformed input, instead returning a single
//! [`SyntaxError`] carrying a best-effort line/column and the offending
//! source line.

use crate::ast::*;
use crate::lexer::{self, Token, TokenKind, TokenPos};
use crate::position::{SourcePosition, SourceSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub source_line: Option<String>,
}

pub struct ParsedModule {
    pub module: Module,
    pub source: String,
}

/// Parses `source`, mirroring `parse_file`'s clamping behaviour: any lexer
/// or parser failure is reported against the best line/column we have,
/// clamped into range, with the corresponding source line attached.
pub fn parse(source: &str) -> Result<ParsedModule, SyntaxError> {
    let lines: Vec<&str> = source.lines().collect();
    let tokens = lexer::tokenize(source).map_err(|e| SyntaxError {
        line: clamp_line(e.pos.line, &lines),
        column: e.pos.column,
        message: e.message,
        source_line: source_line_at(&lines, e.pos.line),
    })?;

    let mut parser = Parser {
        tokens,
        pos: 0,
        lines: &lines,
    };
    let body = parser.parse_statements_until_end().map_err(|e| {
        let line = clamp_line(e.pos.line, &lines);
        SyntaxError {
            line,
            column: e.pos.column,
            message: e.message,
            source_line: source_line_at(&lines, line),
        }
    })?;
    Ok(ParsedModule {
        module: Module { body },
        source: source.to_string(),
    })
}

fn clamp_line(line: u32, lines: &[&str]) -> u32 {
    if lines.is_empty() {
        1
    } else {
        line.clamp(1, lines.len() as u32)
    }
}

fn source_line_at(lines: &[&str], line: u32) -> Option<String> {
    lines.get((line.saturating_sub(1)) as usize).map(|s| s.to_string())
}

struct ParseError {
    pos: TokenPos,
    message: String,
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    lines: &'a [&'a str],
}

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at_end(&self) -> bool {
        matches!(self.cur().kind, TokenKind::EndMarker)
    }

    fn bump(&mut self) -> Token {
        let t = self.cur().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            pos: self.cur().start,
            message: message.into(),
        }
    }

    fn is_op(&self, op: &str) -> bool {
        matches!(&self.cur().kind, TokenKind::Op(o) if *o == op)
    }

    fn is_name(&self, name: &str) -> bool {
        matches!(&self.cur().kind, TokenKind::Name(n) if n == name)
    }

    fn eat_op(&mut self, op: &str) -> PResult<Token> {
        if self.is_op(op) {
            Ok(self.bump())
        } else {
            Err(self.err(format!("expected {op:?}")))
        }
    }

    fn eat_name(&mut self, name: &str) -> PResult<Token> {
        if self.is_name(name) {
            Ok(self.bump())
        } else {
            Err(self.err(format!("expected keyword {name:?}")))
        }
    }

    fn expect_name_token(&mut self) -> PResult<(String, SourcePosition)> {
        let start = self.cur().start;
        match self.cur().kind.clone() {
            TokenKind::Name(n) => {
                self.bump();
                Ok((n, pos(start)))
            }
            _ => Err(self.err("expected identifier")),
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.cur().kind, TokenKind::Newline) {
            self.bump();
        }
    }

    /// Skips balanced tokens until a statement-ending Newline (depth 0) or
    /// Indent/Dedent/EndMarker, i.e. consumes whatever a construct we don't
    /// model in detail needs to get past.
    fn skip_to_statement_end(&mut self) {
        loop {
            match &self.cur().kind {
                TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::EndMarker => {
                    break;
                }
                TokenKind::Op(":") => {
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn parse_statements_until_end(&mut self) -> PResult<Vec<Stmt>> {
        let stmts = self.parse_block_body()?;
        if !self.at_end() {
            return Err(self.err("unexpected trailing input"));
        }
        Ok(stmts)
    }

    /// Parses a sequence of statements until Dedent or EndMarker.
    fn parse_block_body(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !matches!(self.cur().kind, TokenKind::Dedent | TokenKind::EndMarker) {
            stmts.push(self.parse_statement()?);
            self.skip_newlines();
        }
        Ok(stmts)
    }

    /// Parses the suite following a `:` — either an indented block or a
    /// single simple statement on the same line.
    fn parse_suite(&mut self) -> PResult<Vec<Stmt>> {
        self.eat_op(":")?;
        if matches!(self.cur().kind, TokenKind::Newline) {
            self.bump();
            self.skip_newlines();
            if !matches!(self.cur().kind, TokenKind::Indent) {
                return Err(self.err("expected an indented block"));
            }
            self.bump();
            let body = self.parse_block_body()?;
            if !matches!(self.cur().kind, TokenKind::Dedent) {
                return Err(self.err("expected dedent"));
            }
            self.bump();
            Ok(body)
        } else {
            let mut stmts = Vec::new();
            loop {
                stmts.push(self.parse_simple_statement()?);
                if self.is_op(";") {
                    self.bump();
                    if matches!(self.cur().kind, TokenKind::Newline) {
                        break;
                    }
                    continue;
                }
                break;
            }
            if matches!(self.cur().kind, TokenKind::Newline) {
                self.bump();
            }
            Ok(stmts)
        }
    }

    fn parse_statement(&mut self) -> PResult<Stmt> {
        if self.is_op("@") {
            return self.parse_decorated();
        }
        if self.is_name("def") {
            return self.parse_funcdef(Vec::new(), false);
        }
        if self.is_name("async") {
            let start = self.cur().start;
            self.bump();
            if self.is_name("def") {
                return self.parse_funcdef(Vec::new(), true);
            }
            // `async for`/`async with`: treat the rest as an opaque statement.
            return self.parse_other_compound(start);
        }
        if self.is_name("class") {
            return self.parse_classdef(Vec::new());
        }
        if self.is_name("if") {
            return self.parse_if();
        }
        if self.is_name("try") {
            return self.parse_try();
        }
        if matches!(
            &self.cur().kind,
            TokenKind::Name(n) if matches!(n.as_str(), "for" | "while" | "with")
        ) {
            let start = self.cur().start;
            return self.parse_other_compound(start);
        }
        self.parse_simple_statement()
    }

    fn parse_decorated(&mut self) -> PResult<Stmt> {
        let mut decorators = Vec::new();
        while self.is_op("@") {
            self.bump();
            let expr = self.parse_expr()?;
            decorators.push(Decorator { expr });
            if matches!(self.cur().kind, TokenKind::Newline) {
                self.bump();
            }
            self.skip_newlines();
        }
        if self.is_name("async") {
            self.bump();
            self.eat_name("def")?;
            return self.parse_funcdef(decorators, true);
        }
        if self.is_name("def") {
            return self.parse_funcdef(decorators, false);
        }
        if self.is_name("class") {
            return self.parse_classdef(decorators);
        }
        Err(self.err("expected a function or class definition after decorator"))
    }

    /// Consumes a compound statement we don't model semantically (`for`,
    /// `while`, `with`, `async for`/`async with`), keeping its body so span
    /// tracking for ignore ranges stays correct.
    fn parse_other_compound(&mut self, start: TokenPos) -> PResult<Stmt> {
        self.skip_to_statement_end();
        if self.is_op(":") {
            let body = self.parse_suite()?;
            let end = body.last().map_or(pos(start), |s| {
                s.span().end.unwrap_or(s.span().start)
            });
            return Ok(Stmt::Other(OtherStmt {
                span: SourceSpan::new(pos(start), end),
            }));
        }
        if matches!(self.cur().kind, TokenKind::Newline) {
            self.bump();
        }
        Ok(Stmt::Other(OtherStmt {
            span: SourceSpan::point(start.line, start.column),
        }))
    }

    fn parse_funcdef(&mut self, decorators: Vec<Decorator>, is_async: bool) -> PResult<Stmt> {
        let header_start = self.cur().start;
        self.eat_name("def")?;
        let (name, _) = self.expect_name_token()?;
        self.eat_op("(")?;
        let args = self.parse_arguments()?;
        self.eat_op(")")?;
        let mut returns = None;
        if self.is_op("->") {
            self.bump();
            returns = Some(self.parse_expr()?);
        }
        let body = self.parse_suite()?;
        let end = body
            .last()
            .map_or(pos(header_start), |s| s.span().end.unwrap_or(s.span().start));
        Ok(Stmt::FunctionDef(FunctionDef {
            name,
            is_async,
            decorators,
            args,
            returns,
            body,
            span: SourceSpan::new(pos(header_start), end),
            header_span: SourceSpan::point(header_start.line, header_start.column),
        }))
    }

    fn parse_arguments(&mut self) -> PResult<Arguments> {
        let mut arguments = Arguments::default();
        let mut seen_star = false;
        loop {
            if self.is_op(")") {
                break;
            }
            if self.is_op("*") {
                self.bump();
                seen_star = true;
                arguments.has_star_separator = true;
                if matches!(&self.cur().kind, TokenKind::Name(_)) {
                    arguments.vararg = Some(self.parse_param()?);
                }
            } else if self.is_op("**") {
                self.bump();
                arguments.kwarg = Some(self.parse_param()?);
            } else if self.is_op("/") {
                self.bump();
                // positional-only marker; params before it already landed in `args`.
                arguments.posonlyargs = std::mem::take(&mut arguments.args);
            } else {
                let param = self.parse_param()?;
                if seen_star {
                    arguments.kwonlyargs.push(param);
                } else {
                    arguments.args.push(param);
                }
            }
            if self.is_op(",") {
                self.bump();
                continue;
            }
            break;
        }
        Ok(arguments)
    }

    fn parse_param(&mut self) -> PResult<Arg> {
        let start = self.cur().start;
        let (name, _) = self.expect_name_token()?;
        let mut annotation = None;
        if self.is_op(":") {
            self.bump();
            annotation = Some(self.parse_expr_no_comma()?);
        }
        if self.is_op("=") {
            self.bump();
            // default value; we don't need it for any rule, skip balanced.
            self.skip_expr_default();
        }
        Ok(Arg {
            name,
            annotation,
            span: SourceSpan::point(start.line, start.column),
        })
    }

    fn skip_expr_default(&mut self) {
        let mut depth = 0i32;
        loop {
            match &self.cur().kind {
                TokenKind::Op("(") | TokenKind::Op("[") | TokenKind::Op("{") => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::Op(")") | TokenKind::Op("]") | TokenKind::Op("}") if depth > 0 => {
                    depth -= 1;
                    self.bump();
                }
                TokenKind::Op(",") | TokenKind::Op(")") if depth == 0 => break,
                TokenKind::Newline | TokenKind::EndMarker => break,
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn parse_classdef(&mut self, decorators: Vec<Decorator>) -> PResult<Stmt> {
        let start = self.cur().start;
        self.eat_name("class")?;
        let (name, _) = self.expect_name_token()?;
        let mut bases = Vec::new();
        if self.is_op("(") {
            self.bump();
            while !self.is_op(")") {
                bases.push(self.parse_expr_no_comma()?);
                if self.is_op(",") {
                    self.bump();
                    continue;
                }
                break;
            }
            self.eat_op(")")?;
        }
        let body = self.parse_suite()?;
        let end = body
            .last()
            .map_or(pos(start), |s| s.span().end.unwrap_or(s.span().start));
        Ok(Stmt::ClassDef(ClassDef {
            name,
            decorators,
            bases,
            body,
            span: SourceSpan::new(pos(start), end),
        }))
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        let start = self.cur().start;
        self.eat_name("if")?;
        let test = self.parse_expr()?;
        let body = self.parse_suite()?;
        let mut orelse = Vec::new();
        if self.is_name("elif") {
            orelse.push(self.parse_if_as_elif()?);
        } else if self.is_name("else") {
            self.bump();
            orelse = self.parse_suite()?;
        }
        let end_source = orelse.last().or(body.last());
        let end = end_source.map_or(pos(start), |s| s.span().end.unwrap_or(s.span().start));
        Ok(Stmt::If(If {
            test,
            body,
            orelse,
            span: SourceSpan::new(pos(start), end),
        }))
    }

    fn parse_if_as_elif(&mut self) -> PResult<Stmt> {
        let start = self.cur().start;
        self.eat_name("elif")?;
        let test = self.parse_expr()?;
        let body = self.parse_suite()?;
        let mut orelse = Vec::new();
        if self.is_name("elif") {
            orelse.push(self.parse_if_as_elif()?);
        } else if self.is_name("else") {
            self.bump();
            orelse = self.parse_suite()?;
        }
        let end_source = orelse.last().or(body.last());
        let end = end_source.map_or(pos(start), |s| s.span().end.unwrap_or(s.span().start));
        Ok(Stmt::If(If {
            test,
            body,
            orelse,
            span: SourceSpan::new(pos(start), end),
        }))
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        let start = self.cur().start;
        self.eat_name("try")?;
        let body = self.parse_suite()?;
        let mut handlers = Vec::new();
        while self.is_name("except") {
            self.bump();
            if self.is_op("*") {
                self.bump();
            }
            let kind = if self.is_op(":") {
                None
            } else {
                let expr = self.parse_expr_no_comma()?;
                if self.is_name("as") {
                    self.bump();
                    self.expect_name_token()?;
                }
                Some(expr)
            };
            let handler_body = self.parse_suite()?;
            handlers.push(ExceptHandler {
                kind,
                body: handler_body,
            });
        }
        let mut orelse = Vec::new();
        if self.is_name("else") {
            self.bump();
            orelse = self.parse_suite()?;
        }
        let mut finalbody = Vec::new();
        if self.is_name("finally") {
            self.bump();
            finalbody = self.parse_suite()?;
        }
        let end_source = finalbody
            .last()
            .or(orelse.last())
            .or(handlers.last().and_then(|h| h.body.last()))
            .or(body.last());
        let end = end_source.map_or(pos(start), |s| s.span().end.unwrap_or(s.span().start));
        Ok(Stmt::Try(Try {
            body,
            handlers,
            orelse,
            finalbody,
            span: SourceSpan::new(pos(start), end),
        }))
    }

    fn parse_simple_statement(&mut self) -> PResult<Stmt> {
        let start = self.cur().start;

        if self.is_name("import") {
            return self.parse_import(start);
        }
        if self.is_name("from") {
            return self.parse_import_from(start);
        }
        if self.is_name("return") {
            self.bump();
            let value = if matches!(self.cur().kind, TokenKind::Newline) || self.is_op(";") {
                None
            } else {
                Some(self.parse_expr()?)
            };
            self.finish_simple_statement_line();
            return Ok(Stmt::Return(Return {
                value,
                span: SourceSpan::point(start.line, start.column),
            }));
        }
        if matches!(
            &self.cur().kind,
            TokenKind::Name(n) if matches!(n.as_str(), "pass" | "break" | "continue" | "raise" | "yield" | "global" | "nonlocal" | "del" | "assert")
        ) {
            self.skip_to_statement_end();
            self.finish_simple_statement_line();
            return Ok(Stmt::Other(OtherStmt {
                span: SourceSpan::point(start.line, start.column),
            }));
        }

        let target = self.parse_expr()?;

        if self.is_op(":") {
            self.bump();
            let annotation = self.parse_expr_no_comma()?;
            let value = if self.is_op("=") {
                self.bump();
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.finish_simple_statement_line();
            return Ok(Stmt::AnnAssign(AnnAssign {
                target,
                annotation,
                value,
                span: SourceSpan::point(start.line, start.column),
            }));
        }

        if self.is_op("=") {
            let mut targets = vec![target];
            while self.is_op("=") {
                self.bump();
                targets.push(self.parse_expr()?);
            }
            let value = targets.pop().unwrap();
            self.finish_simple_statement_line();
            return Ok(Stmt::Assign(Assign {
                targets,
                value,
                span: SourceSpan::point(start.line, start.column),
            }));
        }

        if let TokenKind::Op(op) = &self.cur().kind {
            if is_augassign_op(op) {
                self.bump();
                let value = self.parse_expr()?;
                self.finish_simple_statement_line();
                return Ok(Stmt::AugAssign(AugAssign {
                    target,
                    value,
                    span: SourceSpan::point(start.line, start.column),
                }));
            }
        }

        self.finish_simple_statement_line();
        Ok(Stmt::Expr(ExprStmt {
            value: target,
            span: SourceSpan::point(start.line, start.column),
        }))
    }

    fn finish_simple_statement_line(&mut self) {
        while self.is_op(";") {
            self.bump();
            if matches!(self.cur().kind, TokenKind::Newline | TokenKind::EndMarker) {
                break;
            }
        }
        if matches!(self.cur().kind, TokenKind::Newline) {
            self.bump();
        }
    }

    fn parse_import(&mut self, start: TokenPos) -> PResult<Stmt> {
        self.eat_name("import")?;
        let names = self.parse_import_aliases()?;
        self.finish_simple_statement_line();
        Ok(Stmt::Import(Import {
            names,
            span: SourceSpan::point(start.line, start.column),
        }))
    }

    fn parse_import_from(&mut self, start: TokenPos) -> PResult<Stmt> {
        self.eat_name("from")?;
        let mut level = 0;
        while self.is_op(".") || self.is_op("...") {
            level += if self.is_op("...") { 3 } else { 1 };
            self.bump();
        }
        let module = if self.is_name("import") {
            None
        } else {
            Some(self.parse_dotted_name()?)
        };
        self.eat_name("import")?;
        let names = if self.is_op("*") {
            self.bump();
            vec![ImportAlias {
                name: "*".to_string(),
                asname: None,
            }]
        } else if self.is_op("(") {
            self.bump();
            let names = self.parse_import_aliases()?;
            if self.is_op(",") {
                self.bump();
            }
            self.eat_op(")")?;
            names
        } else {
            self.parse_import_aliases()?
        };
        self.finish_simple_statement_line();
        Ok(Stmt::ImportFrom(ImportFrom {
            module,
            level,
            names,
            span: SourceSpan::point(start.line, start.column),
        }))
    }

    fn parse_import_aliases(&mut self) -> PResult<Vec<ImportAlias>> {
        let mut names = Vec::new();
        loop {
            let name = self.parse_dotted_name()?;
            let asname = if self.is_name("as") {
                self.bump();
                Some(self.expect_name_token()?.0)
            } else {
                None
            };
            names.push(ImportAlias { name, asname });
            if self.is_op(",") {
                self.bump();
                continue;
            }
            break;
        }
        Ok(names)
    }

    fn parse_dotted_name(&mut self) -> PResult<String> {
        let (mut name, _) = self.expect_name_token()?;
        while self.is_op(".") {
            self.bump();
            let (part, _) = self.expect_name_token()?;
            name.push('.');
            name.push_str(&part);
        }
        Ok(name)
    }

    // --- Expressions ---------------------------------------------------
    //
    // We only need enough expression grammar to represent annotations,
    // assignment targets, decorators, and base-class lists. Full operator
    // precedence beyond what the rules inspect (subscripts, attributes,
    // calls, `|`) is intentionally flattened into `Expr::Other`.

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_expr_no_comma()
    }

    fn parse_expr_no_comma(&mut self) -> PResult<Expr> {
        self.parse_bitor()
    }

    fn parse_bitor(&mut self) -> PResult<Expr> {
        let start = self.cur().start;
        let mut left = self.parse_unary_or_power()?;
        while self.is_op("|") {
            self.bump();
            let right = self.parse_unary_or_power()?;
            let end = right.span().end.unwrap_or(right.span().start);
            left = Expr::BinOp(BinOpExpr {
                left: Box::new(left),
                right: Box::new(right),
                span: SourceSpan::new(pos(start), end),
            });
        }
        // Swallow any other binary operators we don't model precisely, so
        // a full boolean/arithmetic expression still parses to completion.
        while matches!(
            &self.cur().kind,
            TokenKind::Op(op) if is_other_binop(op)
        ) || self.is_name("and")
            || self.is_name("or")
            || self.is_name("not")
            || self.is_name("in")
            || self.is_name("is")
            || self.is_name("if")
        {
            if self.is_name("if") {
                // conditional expression: `a if cond else b`
                self.bump();
                self.parse_bitor()?;
                if self.is_name("else") {
                    self.bump();
                    let other = self.parse_bitor()?;
                    let end = other.span().end.unwrap_or(other.span().start);
                    left = Expr::Other(OtherExpr {
                        span: SourceSpan::new(pos(start), end),
                    });
                }
                continue;
            }
            self.bump();
            if self.is_name("not") {
                self.bump();
            }
            let right = self.parse_unary_or_power()?;
            let end = right.span().end.unwrap_or(right.span().start);
            left = Expr::Other(OtherExpr {
                span: SourceSpan::new(pos(start), end),
            });
        }
        Ok(left)
    }

    fn parse_unary_or_power(&mut self) -> PResult<Expr> {
        if matches!(&self.cur().kind, TokenKind::Op(op) if matches!(*op, "+" | "-" | "~")) {
            let start = self.cur().start;
            self.bump();
            let operand = self.parse_unary_or_power()?;
            let end = operand.span().end.unwrap_or(operand.span().start);
            return Ok(Expr::Other(OtherExpr {
                span: SourceSpan::new(pos(start), end),
            }));
        }
        if self.is_name("not") {
            let start = self.cur().start;
            self.bump();
            let operand = self.parse_unary_or_power()?;
            let end = operand.span().end.unwrap_or(operand.span().start);
            return Ok(Expr::Other(OtherExpr {
                span: SourceSpan::new(pos(start), end),
            }));
        }
        if self.is_name("lambda") {
            let start = self.cur().start;
            self.skip_to_statement_end_or_comma();
            return Ok(Expr::Other(OtherExpr {
                span: SourceSpan::point(start.line, start.column),
            }));
        }
        self.parse_postfix()
    }

    fn skip_to_statement_end_or_comma(&mut self) {
        let mut depth = 0i32;
        loop {
            match &self.cur().kind {
                TokenKind::Op("(") | TokenKind::Op("[") | TokenKind::Op("{") => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::Op(")") | TokenKind::Op("]") | TokenKind::Op("}") if depth == 0 => break,
                TokenKind::Op(")") | TokenKind::Op("]") | TokenKind::Op("}") => {
                    depth -= 1;
                    self.bump();
                }
                TokenKind::Op(",") if depth == 0 => break,
                TokenKind::Newline | TokenKind::EndMarker => break,
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.is_op(".") {
                self.bump();
                let (attr, _) = self.expect_name_token()?;
                let end = self.prev_end();
                expr = Expr::Attribute(AttributeExpr {
                    value: Box::new(expr.clone()),
                    attr,
                    span: SourceSpan::new(expr.span().start, end),
                });
            } else if self.is_op("[") {
                let start = expr.span().start;
                self.bump();
                let slice = self.parse_subscript_contents()?;
                self.eat_op("]")?;
                let end = self.prev_end();
                expr = Expr::Subscript(SubscriptExpr {
                    value: Box::new(expr),
                    slice: Box::new(slice),
                    span: SourceSpan::new(start, end),
                });
            } else if self.is_op("(") {
                let start = expr.span().start;
                self.bump();
                let mut args = Vec::new();
                while !self.is_op(")") {
                    args.push(self.parse_expr_no_comma()?);
                    if self.is_op("=") {
                        // keyword argument `name=value`; skip the value.
                        self.bump();
                        args.pop();
                        args.push(self.parse_expr_no_comma()?);
                    }
                    if self.is_op(",") {
                        self.bump();
                        continue;
                    }
                    break;
                }
                self.eat_op(")")?;
                let end = self.prev_end();
                expr = Expr::Call(CallExpr {
                    func: Box::new(expr),
                    args,
                    span: SourceSpan::new(start, end),
                });
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn prev_end(&self) -> SourcePosition {
        let idx = self.pos.saturating_sub(1);
        pos(self.tokens[idx].end)
    }

    /// A subscript slice, e.g. `Dict[str, List[int]]`'s `str, List[int]`.
    /// We don't need `a:b:c` slice semantics for any rule, so colons inside
    /// just fall into `Other`.
    fn parse_subscript_contents(&mut self) -> PResult<Expr> {
        let start = self.cur().start;
        let mut items = vec![self.parse_slice_item()?];
        let mut is_tuple = false;
        while self.is_op(",") {
            is_tuple = true;
            self.bump();
            if self.is_op("]") {
                break;
            }
            items.push(self.parse_slice_item()?);
        }
        if !is_tuple {
            return Ok(items.pop().unwrap());
        }
        let end = items.last().unwrap().span().end.unwrap_or(start_pos(start));
        Ok(Expr::Tuple(TupleExpr {
            elts: items,
            span: SourceSpan::new(pos(start), end),
        }))
    }

    fn parse_slice_item(&mut self) -> PResult<Expr> {
        if self.is_op(":") {
            let start = self.cur().start;
            self.skip_to_statement_end_or_comma();
            return Ok(Expr::Other(OtherExpr {
                span: SourceSpan::point(start.line, start.column),
            }));
        }
        self.parse_expr_no_comma()
    }

    fn parse_atom(&mut self) -> PResult<Expr> {
        let start = self.cur().start;
        match self.cur().kind.clone() {
            TokenKind::Name(n) => {
                self.bump();
                match n.as_str() {
                    "None" => Ok(Expr::Constant(ConstantExpr {
                        value: ConstantValue::None,
                        span: SourceSpan::point(start.line, start.column),
                    })),
                    "True" => Ok(Expr::Constant(ConstantExpr {
                        value: ConstantValue::Bool(true),
                        span: SourceSpan::point(start.line, start.column),
                    })),
                    "False" => Ok(Expr::Constant(ConstantExpr {
                        value: ConstantValue::Bool(false),
                        span: SourceSpan::point(start.line, start.column),
                    })),
                    _ => Ok(Expr::Name(NameExpr {
                        id: n,
                        span: SourceSpan::point(start.line, start.column),
                    })),
                }
            }
            TokenKind::Str(s) => {
                self.bump();
                // Adjacent string literal concatenation, as in `"a" "b"`.
                let mut value = s;
                while let TokenKind::Str(more) = self.cur().kind.clone() {
                    self.bump();
                    value.push_str(&more);
                }
                Ok(Expr::Constant(ConstantExpr {
                    value: ConstantValue::Str(value),
                    span: SourceSpan::point(start.line, start.column),
                }))
            }
            TokenKind::Number(_) => {
                self.bump();
                Ok(Expr::Constant(ConstantExpr {
                    value: ConstantValue::Other,
                    span: SourceSpan::point(start.line, start.column),
                }))
            }
            TokenKind::Op("(") => {
                self.bump();
                if self.is_op(")") {
                    self.bump();
                    return Ok(Expr::Other(OtherExpr {
                        span: SourceSpan::point(start.line, start.column),
                    }));
                }
                let inner = self.parse_expr()?;
                let mut is_tuple = false;
                while self.is_op(",") {
                    is_tuple = true;
                    self.bump();
                    if self.is_op(")") {
                        break;
                    }
                    self.parse_expr_no_comma()?;
                }
                self.eat_op(")")?;
                if is_tuple {
                    Ok(Expr::Other(OtherExpr {
                        span: SourceSpan::new(pos(start), self.prev_end()),
                    }))
                } else {
                    Ok(inner)
                }
            }
            TokenKind::Op("[") => {
                self.bump();
                while !self.is_op("]") {
                    self.parse_expr_no_comma()?;
                    if self.is_op(",") {
                        self.bump();
                        continue;
                    }
                    break;
                }
                self.eat_op("]")?;
                Ok(Expr::Other(OtherExpr {
                    span: SourceSpan::new(pos(start), self.prev_end()),
                }))
            }
            TokenKind::Op("{") => {
                self.bump();
                let mut depth = 0i32;
                loop {
                    match &self.cur().kind {
                        TokenKind::Op("{") => {
                            depth += 1;
                            self.bump();
                        }
                        TokenKind::Op("}") if depth == 0 => {
                            self.bump();
                            break;
                        }
                        TokenKind::Op("}") => {
                            depth -= 1;
                            self.bump();
                        }
                        TokenKind::EndMarker => break,
                        _ => {
                            self.bump();
                        }
                    }
                }
                Ok(Expr::Other(OtherExpr {
                    span: SourceSpan::new(pos(start), self.prev_end()),
                }))
            }
            TokenKind::Op("...") => {
                self.bump();
                Ok(Expr::Other(OtherExpr {
                    span: SourceSpan::point(start.line, start.column),
                }))
            }
            _ => Err(self.err("expected an expression")),
        }
    }
}

fn pos(p: TokenPos) -> SourcePosition {
    SourcePosition::new(p.line, p.column)
}

fn start_pos(p: TokenPos) -> SourcePosition {
    pos(p)
}

fn is_augassign_op(op: &str) -> bool {
    matches!(
        op,
        "+=" | "-=" | "*=" | "/=" | "//=" | "%=" | "**=" | ">>=" | "<<=" | "&=" | "|=" | "^=" | "@="
    )
}

fn is_other_binop(op: &str) -> bool {
    matches!(
        op,
        "+" | "-"
            | "*"
            | "/"
            | "//"
            | "%"
            | "**"
            | "<<"
            | ">>"
            | "&"
            | "^"
            | "<"
            | ">"
            | "<="
            | ">="
            | "=="
            | "!="
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_function() {
        let source = "def f(a, b):\n    return a + b\n";
        let parsed = parse(source).expect("should parse");
        assert_eq!(parsed.module.body.len(), 1);
        assert!(matches!(parsed.module.body[0], Stmt::FunctionDef(_)));
    }

    #[test]
    fn parses_nested_subscript_annotation() {
        let source = "from typing import Dict, List, Optional\n\ndef f() -> Optional[Dict[str, List[int]]]:\n    return None\n";
        let parsed = parse(source).expect("should parse");
        assert_eq!(parsed.module.body.len(), 2);
    }

    #[test]
    fn reports_syntax_error_with_source_line() {
        let source = "def f(:\n    pass\n";
        let err = parse(source).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.source_line.is_some());
    }

    #[test]
    fn inconsistent_dedent_is_a_syntax_error() {
        let source = "if True:\n    x = 1\n  y = 2\n";
        assert!(parse(source).is_err());
    }
}
