pub mod token;

use logos::Logos;
use crate::span::{Span, Spanned};
use crate::diagnostics::LintError;
use token::Token;

/// A source comment with its exact byte range. Comments never reach the
/// parser; they are kept aside so move fixes can carry them along with the
/// statement they annotate.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub span: Span,
    pub text: String,
    pub block: bool,
}

#[derive(Debug)]
pub struct LexOutput {
    pub tokens: Vec<Spanned<Token>>,
    pub comments: Vec<Comment>,
}

pub fn lex(source: &str) -> Result<LexOutput, LintError> {
    let mut tokens = Vec::new();
    let mut comments = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let span = Span::new(span.start, span.end);
        match result {
            Ok(tok @ (Token::LineComment | Token::BlockComment)) => {
                comments.push(Comment {
                    span,
                    text: source[span.start..span.end].to_string(),
                    block: matches!(tok, Token::BlockComment),
                });
            }
            Ok(tok) => tokens.push(Spanned::new(tok, span)),
            Err(()) => {
                return Err(LintError::syntax(
                    format!("unexpected character '{}'", &source[span.start..span.end]),
                    span,
                ));
            }
        }
    }

    Ok(LexOutput { tokens, comments })
}
