//! Single-pass tokenizer for the selector grammar.
//!
//! Tokens are identifiers (maximal runs of Unicode letters and digits)
//! and the four marks `.` `{` `}` `|`. Whitespace is never legal. Every
//! decision looks at the current character only, and the first error is
//! sticky: once set, `next` stays inert and the error keeps being
//! reported.

use crate::error::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// No current token: before the first `next`, at end of input, or
    /// after an error.
    End,
    Ident,
    Dot,
    LBrace,
    RBrace,
    Pipe,
}

pub(crate) struct Scanner {
    chars: Vec<char>,
    pos: usize,
    token: TokenKind,
    ident: String,
    err: Option<FieldError>,
}

impl Scanner {
    pub(crate) fn new(input: &str) -> Scanner {
        Scanner {
            chars: input.chars().collect(),
            pos: 0,
            token: TokenKind::End,
            ident: String::new(),
            err: None,
        }
    }

    /// Advance to the next token. Returns false at end of input or on the
    /// first error; `err` distinguishes the two.
    pub(crate) fn next(&mut self) -> bool {
        if self.err.is_some() {
            self.token = TokenKind::End;
            return false;
        }
        let Some(ch) = self.chars.get(self.pos).copied() else {
            self.token = TokenKind::End;
            return false;
        };
        match ch {
            '.' => self.emit(TokenKind::Dot),
            '{' => self.emit(TokenKind::LBrace),
            '}' => self.emit(TokenKind::RBrace),
            '|' => self.emit(TokenKind::Pipe),
            _ if ch.is_alphanumeric() => {
                self.ident.clear();
                while let Some(c) = self.chars.get(self.pos).copied() {
                    if !c.is_alphanumeric() {
                        break;
                    }
                    self.ident.push(c);
                    self.pos += 1;
                }
                self.token = TokenKind::Ident;
                true
            }
            ' ' => self.fail(FieldError::syntax("not allow spaces")),
            other => self.fail(FieldError::syntax(format!(
                "character '{}' is not allowed",
                other
            ))),
        }
    }

    fn emit(&mut self, kind: TokenKind) -> bool {
        self.pos += 1;
        self.token = kind;
        true
    }

    fn fail(&mut self, err: FieldError) -> bool {
        self.err = Some(err);
        self.token = TokenKind::End;
        false
    }

    pub(crate) fn token_kind(&self) -> TokenKind {
        self.token
    }

    /// Literal spelling of the current token, for error messages.
    pub(crate) fn token_text(&self) -> &str {
        match self.token {
            TokenKind::Ident => &self.ident,
            TokenKind::Dot => ".",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Pipe => "|",
            TokenKind::End => "",
        }
    }

    /// Text of the current identifier token. Stale outside `Ident`.
    pub(crate) fn ident_text(&self) -> &str {
        &self.ident
    }

    pub(crate) fn err(&self) -> Option<&FieldError> {
        self.err.as_ref()
    }

    /// Parser-side error constructor honoring stickiness: an earlier
    /// scanner error always wins over the parser's own message.
    pub(crate) fn err_or(&self, msg: String) -> FieldError {
        match &self.err {
            Some(err) => err.clone(),
            None => FieldError::syntax(msg),
        }
    }
}
