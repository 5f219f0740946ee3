//! Bantam lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for Bantam source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    /// Buffer for peeked tokens (supports 2-token lookahead)
    peeked: Vec<Token>,
    at_eof: bool,
    /// Line of `line_offset`, advanced lazily as tokens are scanned
    line: u32,
    line_offset: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: Vec::new(),
            at_eof: false,
            line: 1,
            line_offset: 0,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if !self.peeked.is_empty() {
            return Ok(self.peeked.remove(0));
        }

        self.scan_token()
    }

    fn scan_token(&mut self) -> CompileResult<Token> {
        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len, self.line)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                let line = self.line_at(span.start);
                Ok(Token::new(kind, Span::new(span.start, span.end, line)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                let line = self.line_at(span.start);
                Err(CompileError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end, line),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                let line = self.line_at(len);
                Ok(Token::new(TokenKind::Eof, Span::new(len, len, line)))
            }
        }
    }

    /// Line number of `offset`; offsets must be requested in increasing order
    fn line_at(&mut self, offset: usize) -> u32 {
        let source = self.inner.source();
        let newlines = source[self.line_offset..offset].bytes().filter(|b| *b == b'\n').count();
        self.line += newlines as u32;
        self.line_offset = offset;
        self.line
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> CompileResult<&Token> {
        self.peek_at(0)
    }

    /// Peek at the token at offset (0 = next, 1 = after next, etc.)
    pub fn peek_at(&mut self, offset: usize) -> CompileResult<&Token> {
        while self.peeked.len() <= offset {
            let token = self.scan_token()?;
            self.peeked.push(token);
        }
        Ok(&self.peeked[offset])
    }

    /// Check if the next token matches the expected kind
    pub fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        Ok(std::mem::discriminant(&self.peek()?.kind) == std::mem::discriminant(expected))
    }

    /// Check if the token at `offset` matches the expected kind
    pub fn check_at(&mut self, offset: usize, expected: &TokenKind) -> CompileResult<bool> {
        let token = self.peek_at(offset)?;
        Ok(std::mem::discriminant(&token.kind) == std::mem::discriminant(expected))
    }

    /// Consume the next token if it matches, return true if consumed
    pub fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        if self.check(expected)? {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expect a specific token kind, error if not found
    pub fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", expected, token.kind),
                token.span,
            ))
        }
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let source = "class extends if else while for break return new instanceof";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Class));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Extends));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::While));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Break));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Return));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::New));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::InstanceOf));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn test_identifiers_and_literals() {
        let source = "classy x1 42 \"hi there\"";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "classy"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "x1"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "hi there"
        ));
    }

    #[test]
    fn test_operators() {
        let source = "++ + -- - == = != <= < >= > && || !";
        let kinds: Vec<TokenKind> = Lexer::new(source)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();

        assert_eq!(kinds, vec![
            TokenKind::PlusPlus,
            TokenKind::Plus,
            TokenKind::MinusMinus,
            TokenKind::Minus,
            TokenKind::EqEq,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::LtEq,
            TokenKind::Lt,
            TokenKind::GtEq,
            TokenKind::Gt,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::Bang,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_line_numbers_skip_comments() {
        let source = "class A\n// note\n/* multi\nline */ {\n}";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        let lines: Vec<u32> = tokens.iter().map(|t| t.span.line).collect();
        assert_eq!(lines, vec![1, 1, 4, 5, 5]);
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("int # x");
        assert!(lexer.next_token().is_ok());
        assert!(matches!(lexer.next_token(), Err(CompileError::Lexer { .. })));
    }
}
