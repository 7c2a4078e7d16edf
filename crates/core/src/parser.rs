//! Recursive-descent parser for the selector grammar.
//!
//! ```text
//! FieldExpr        := Ident FieldLevelList
//! FieldLevelList   := '.' Ident FieldLevelList
//!                   | '.' FieldExprBracket
//!                   | ε
//! FieldExprBracket := '{' FieldExpr FieldSiblingList '}'
//! FieldSiblingList := '|' FieldExpr FieldSiblingList | ε
//! ```
//!
//! Identifiers are registered into the collector as they are consumed:
//! an identifier followed by `.` registers as a parent and descends, a
//! terminal identifier registers as a leaf, and a bracket group registers
//! its siblings under the shared prefix. Registration errors are wrapped
//! with the dotted prefix walked so far, so the final message carries one
//! fully qualified path.

use crate::collector::{Collector, ParseSession};
use crate::error::FieldError;
use crate::scanner::{Scanner, TokenKind};

/// Where a `FieldExpr` starts, for error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprContext {
    TopLevel,
    BracketStart,
    BracketSibling,
}

pub(crate) struct Parser {
    sc: Scanner,
}

impl Parser {
    pub(crate) fn new(input: &str) -> Parser {
        Parser {
            sc: Scanner::new(input),
        }
    }

    /// Parse one whole selector into `coll`. The input must be a single
    /// `FieldExpr`; trailing tokens are rejected.
    pub(crate) fn parse(
        &mut self,
        coll: &mut Collector,
        session: &mut ParseSession<'_>,
    ) -> Result<(), FieldError> {
        if !self.sc.next() {
            return Err(self.sc.err_or("missing field identifier".to_owned()));
        }
        self.parse_field_expr(coll, ExprContext::TopLevel, session)?;
        if self.sc.token_kind() != TokenKind::End {
            return Err(self
                .sc
                .err_or("not allow extra string at the end".to_owned()));
        }
        match self.sc.err() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn parse_field_expr(
        &mut self,
        coll: &mut Collector,
        ctx: ExprContext,
        session: &mut ParseSession<'_>,
    ) -> Result<(), FieldError> {
        if self.sc.token_kind() != TokenKind::Ident {
            return Err(self.expected_identifier(ctx));
        }

        let mut coll = coll;
        let mut field_elem = self.sc.ident_text().to_owned();
        let mut prefix = String::new();

        loop {
            if !self.sc.next() || self.sc.token_kind() != TokenKind::Dot {
                self.check_token_after_ident(&field_elem, ctx)?;
                return coll
                    .add_if_absent(&field_elem, false, session)
                    .map_err(|err| prepend_prefix(err, &prefix));
            }

            coll.add_if_absent(&field_elem, true, session)
                .map_err(|err| prepend_prefix(err, &prefix))?;
            coll = coll.child(&field_elem, session)?;

            if prefix.is_empty() {
                prefix = field_elem.clone();
            } else {
                prefix.push('.');
                prefix.push_str(&field_elem);
            }

            if !self.sc.next() {
                return Err(self
                    .sc
                    .err_or("expecting an identifier or a '{' after '.'".to_owned()));
            }
            match self.sc.token_kind() {
                TokenKind::Ident => {
                    field_elem = self.sc.ident_text().to_owned();
                }
                TokenKind::LBrace => {
                    return self
                        .parse_bracket(coll, session)
                        .map_err(|err| prepend_prefix(err, &prefix));
                }
                _ => {
                    return Err(self.sc.err_or(format!(
                        "expecting an identifier or a '{{' after '.', instead found '{}'",
                        self.sc.token_text()
                    )));
                }
            }
        }
    }

    fn parse_bracket(
        &mut self,
        coll: &mut Collector,
        session: &mut ParseSession<'_>,
    ) -> Result<(), FieldError> {
        if !self.sc.next() {
            return Err(self
                .sc
                .err_or("expecting an identifier after '{'".to_owned()));
        }
        self.parse_field_expr(coll, ExprContext::BracketStart, session)?;
        self.parse_sibling_list(coll, session)?;

        if self.sc.token_kind() != TokenKind::RBrace {
            if self.sc.token_kind() == TokenKind::End {
                return Err(self.sc.err_or("missing '}' at the end".to_owned()));
            }
            return Err(self.sc.err_or(format!(
                "missing '}}', instead found '{}'",
                self.sc.token_text()
            )));
        }

        self.sc.next();
        match self.sc.err() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn parse_sibling_list(
        &mut self,
        coll: &mut Collector,
        session: &mut ParseSession<'_>,
    ) -> Result<(), FieldError> {
        while self.sc.token_kind() == TokenKind::Pipe {
            if !self.sc.next() {
                return Err(self
                    .sc
                    .err_or("expecting an identifier after '|'".to_owned()));
            }
            self.parse_field_expr(coll, ExprContext::BracketSibling, session)?;
        }
        Ok(())
    }

    /// A terminal identifier at the top level must end the input; inside
    /// brackets the closing `}` or `|` legitimately follows.
    fn check_token_after_ident(
        &self,
        field_elem: &str,
        ctx: ExprContext,
    ) -> Result<(), FieldError> {
        if ctx == ExprContext::TopLevel && self.sc.token_kind() != TokenKind::End {
            return Err(self.sc.err_or(format!(
                "expected '.' after identifier '{}', instead found '{}'",
                field_elem,
                self.sc.token_text()
            )));
        }
        Ok(())
    }

    fn expected_identifier(&self, ctx: ExprContext) -> FieldError {
        match ctx {
            ExprContext::TopLevel => self.sc.err_or(format!(
                "expecting an identifier at the start, instead found '{}'",
                self.sc.token_text()
            )),
            ExprContext::BracketStart => self.sc.err_or(format!(
                "expecting an identifier after '{{', instead found '{}'",
                self.sc.token_text()
            )),
            ExprContext::BracketSibling => self.sc.err_or(format!(
                "expecting an identifier after '|', instead found '{}'",
                self.sc.token_text()
            )),
        }
    }
}

fn prepend_prefix(err: FieldError, prefix: &str) -> FieldError {
    if prefix.is_empty() {
        err
    } else {
        err.with_parent(prefix)
    }
}
