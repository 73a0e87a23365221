//! Pull-based scanner over JAF source with one token of lookahead

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Hands out tokens one at a time; `Eof` repeats once the input is used up
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    peeked: Option<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: None,
            at_eof: false,
        }
    }

    /// Consume the lookahead token if there is one, else scan a new token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(CompileError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Token after the current one, used to tell casts and labels apart
    pub fn peek(&mut self) -> CompileResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Scan to the end, `Eof` included (for `--dump-tokens`)
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
        let source = "int float string void struct return if else while for";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Int));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Float));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::String));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Void));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Struct));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Return));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::While));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
    }

    #[test]
    fn test_identifiers_are_not_keywords() {
        let source = "integer strings _tmp";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "integer"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "strings"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "_tmp"
        ));
    }

    #[test]
    fn test_numeric_literals() {
        let source = "42 0x1F 1.5 .25 2e3";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::HexLiteral(s) if s == "0x1F"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "1.5"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == ".25"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "2e3"
        ));
    }

    #[test]
    fn test_compound_operators() {
        let source = "+= <<= >>= ++ -- && ||";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::PlusEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LtLtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::GtGtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::PlusPlus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::MinusMinus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::AmpAmp));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::PipePipe));
    }

    #[test]
    fn test_comments_and_strings() {
        let source = "x // line comment\n/* block */ \"a \\\"b\\\"\"";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "x"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "\"a \\\"b\\\"\""
        ));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("a b");
        assert!(matches!(&lexer.peek().unwrap().kind, TokenKind::Identifier(s) if s == "a"));
        assert!(matches!(&lexer.peek().unwrap().kind, TokenKind::Identifier(s) if s == "a"));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Identifier(s) if s == "a"));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Identifier(s) if s == "b"));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("int @");
        assert!(lexer.next_token().is_ok());
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { span, .. } if span == Span::new(4, 5)));
    }

    #[test]
    fn test_simple_function() {
        let source = "int main() { return 0; }";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(tokens[0].kind, TokenKind::Int));
        assert!(matches!(&tokens[1].kind, TokenKind::Identifier(s) if s == "main"));
        assert!(matches!(tokens[2].kind, TokenKind::LParen));
        assert!(matches!(tokens[3].kind, TokenKind::RParen));
        assert!(matches!(tokens[4].kind, TokenKind::LBrace));
        assert!(matches!(tokens[5].kind, TokenKind::Return));
        assert!(matches!(&tokens[6].kind, TokenKind::IntLiteral(s) if s == "0"));
        assert!(matches!(tokens[7].kind, TokenKind::Semi));
        assert!(matches!(tokens[8].kind, TokenKind::RBrace));
        assert!(matches!(tokens[9].kind, TokenKind::Eof));
    }
}
