//! DDL tokenizer implementation.

use super::{Keyword, Token, TokenKind};

/// A pull-based lexer over PostgreSQL DDL text.
///
/// The lexer yields tokens until it produces `Eof`, or until it hits an
/// `Illegal` token it cannot recover from (an unterminated string, quoted
/// identifier or block comment). Other `Illegal` tokens cover a single
/// stray character and scanning continues after them.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// The current 1-based line.
    line: usize,
    /// The line the current token starts on.
    start_line: usize,
    /// Set once `Eof` or a fatal `Illegal` token has been produced.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            line: 1,
            start_line: 1,
            finished: false,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Advances over `n` bytes of input, keeping the line count.
    fn advance_bytes(&mut self, n: usize) {
        let end = self.pos + n;
        while self.pos < end && self.advance().is_some() {}
    }

    /// Skips whitespace and comments.
    ///
    /// Returns a fatal `Illegal` token if a block comment never closes.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // -- runs to end of line; the newline itself is left as whitespace
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.start = self.pos;
                self.start_line = self.line;
                if !self.skip_block_comment() {
                    return Some(self.fatal());
                }
                continue;
            }

            return None;
        }
    }

    /// Skips a (possibly nested) block comment. Returns false if the input
    /// ends before the outermost comment is closed.
    fn skip_block_comment(&mut self) -> bool {
        self.advance(); // /
        self.advance(); // *
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (None, _) => return false,
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                _ => {
                    self.advance();
                }
            }
        }
        true
    }

    /// Creates a token spanning from the token start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, &self.input[self.start..self.pos], self.start_line)
    }

    /// Consumes the rest of the input into an `Illegal` token and stops the
    /// token stream.
    fn fatal(&mut self) -> Token {
        self.pos = self.input.len();
        self.finished = true;
        self.make_token(TokenKind::Illegal)
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    /// Scans a quoted identifier. The literal keeps its quotes.
    fn scan_quoted_identifier(&mut self) -> Token {
        loop {
            match self.advance() {
                Some('"') if self.peek() == Some('"') => {
                    self.advance();
                }
                Some('"') => return self.make_token(TokenKind::Identifier),
                Some(_) => {}
                None => return self.fatal(),
            }
        }
    }

    /// Scans a number: digits with an optional fractional part. The
    /// opening character (a digit or `.`) has already been consumed.
    fn scan_number(&mut self, leading_dot: bool) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if !leading_dot && self.peek() == Some('.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        self.make_token(TokenKind::Number)
    }

    /// Scans a single-quoted string literal. The literal keeps its quotes
    /// and escapes verbatim.
    fn scan_string(&mut self) -> Token {
        loop {
            match self.advance() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.advance();
                }
                Some('\'') => return self.make_token(TokenKind::String),
                Some('\\') if self.peek() == Some('\'') => {
                    self.advance();
                }
                Some(_) => {}
                None => return self.fatal(),
            }
        }
    }

    /// Scans a dollar-quoted string (`$$...$$` or `$tag$...$tag$`). The
    /// opening `$` has already been consumed.
    fn scan_dollar_string(&mut self) -> Token {
        let rest = &self.input[self.pos..];
        let tag_len = rest
            .char_indices()
            .take_while(|&(i, c)| {
                if i == 0 {
                    c.is_alphabetic() || c == '_'
                } else {
                    c.is_alphanumeric() || c == '_'
                }
            })
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);

        if !rest[tag_len..].starts_with('$') {
            return self.make_token(TokenKind::Illegal);
        }

        let delimiter_len = tag_len + 2;
        let delimiter = self.input[self.start..self.start + delimiter_len].to_owned();
        self.advance_bytes(tag_len + 1);

        match self.input[self.pos..].find(delimiter.as_str()) {
            Some(offset) => {
                self.advance_bytes(offset + delimiter_len);
                self.make_token(TokenKind::String)
            }
            None => self.fatal(),
        }
    }

    /// Scans a psql meta-command (`\connect db`) up to end of line.
    fn scan_meta_command(&mut self) -> Token {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        self.make_token(TokenKind::MetaCommand)
    }

    /// Scans the next token.
    ///
    /// Once the token stream has ended this keeps returning `Eof`.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        if self.finished {
            return Token::eof(self.line);
        }

        if let Some(token) = self.skip_whitespace_and_comments() {
            return token;
        }

        self.start = self.pos;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            self.finished = true;
            return Token::eof(self.line);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Asterisk),
            '/' => self.make_token(TokenKind::Slash),
            '=' => self.make_token(TokenKind::Equal),

            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(true),
            '.' => self.make_token(TokenKind::Dot),
            ':' if self.peek() == Some(':') => {
                self.advance();
                self.make_token(TokenKind::Typecast)
            }

            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier(),
            '$' => self.scan_dollar_string(),
            '\\' if self.peek().is_some_and(|c| c.is_alphabetic()) => self.scan_meta_command(),

            c if c.is_ascii_digit() => self.scan_number(false),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

            _ => self.make_token(TokenKind::Illegal),
        }
    }

    /// Returns true once `Eof` or a fatal `Illegal` token has been produced.
    ///
    /// Checked right after an `Illegal` token, this tells an unterminated
    /// construct (which ends the stream) from a single stray character.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Tokenizes the entire input and returns all tokens.
    #[must_use]
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        Some(self.next_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).map(|t| t.kind).collect()
    }

    fn literals(input: &str) -> Vec<String> {
        Lexer::new(input).map(|t| t.literal).collect()
    }

    #[test]
    fn test_simple_statement() {
        assert_eq!(
            kinds("CREATE TABLE users (id bigint);"),
            vec![
                TokenKind::Keyword(Keyword::Create),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::Identifier,
                TokenKind::Keyword(Keyword::Bigint),
                TokenKind::RightParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("create Table"),
            vec![
                TokenKind::Keyword(Keyword::Create),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifier_keeps_quotes() {
        let tokens = Lexer::new(r#""my ""odd"" table""#).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].literal, r#""my ""odd"" table""#);
        assert!(tokens[1].is_eof());
    }

    #[test]
    fn test_identifier_with_dollar() {
        assert_eq!(literals("a$1 b"), vec!["a$1", "b", ""]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(literals("42 3.14 .5 7."), vec!["42", "3.14", ".5", "7.", ""]);
        assert!(kinds("42 3.14 .5")
            .iter()
            .take(3)
            .all(|k| *k == TokenKind::Number));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            kinds("public.users"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r"'it''s' 'a\'b'").tokenize();
        assert_eq!(tokens[0].literal, "'it''s'");
        assert_eq!(tokens[1].literal, r"'a\'b'");
        assert!(tokens[2].is_eof());
    }

    #[test]
    fn test_string_with_newline() {
        let tokens = Lexer::new("'a\nb' x").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_unterminated_string_stops_scan() {
        let tokens = Lexer::new("'a").tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert_eq!(tokens[0].literal, "'a");
    }

    #[test]
    fn test_unterminated_quoted_identifier_stops_scan() {
        let tokens = Lexer::new("x \"abc").tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
    }

    #[test]
    fn test_comments_are_discarded() {
        assert_eq!(
            kinds("-- header\nCREATE /* a /* nested */ comment */ TABLE"),
            vec![
                TokenKind::Keyword(Keyword::Create),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_nested_comment() {
        let tokens = Lexer::new("x /* a /* b */").tokenize();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
    }

    #[test]
    fn test_typecast_and_single_colon() {
        assert_eq!(
            kinds("'a'::text : b"),
            vec![
                TokenKind::String,
                TokenKind::Typecast,
                TokenKind::Keyword(Keyword::Text),
                TokenKind::Illegal,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_stray_character_is_recoverable() {
        let tokens = Lexer::new("a @ b").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].literal, "@");
        assert_eq!(tokens[2].literal, "b");
        assert!(tokens[3].is_eof());
    }

    #[test]
    fn test_dollar_quoted_strings() {
        let tokens = Lexer::new("$$a 'b'$$ $fn$ x $$ y $fn$;").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, "$$a 'b'$$");
        assert_eq!(tokens[1].literal, "$fn$ x $$ y $fn$");
        assert_eq!(tokens[2].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_dollar_errors() {
        let tokens = Lexer::new("$1").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].kind, TokenKind::Number);

        let tokens = Lexer::new("$$ never closed").tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
    }

    #[test]
    fn test_meta_command() {
        let tokens = Lexer::new("\\connect mydb\nCREATE").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::MetaCommand);
        assert_eq!(tokens[0].literal, "\\connect mydb");
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Create));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = Lexer::new("a\n\n  b\n/* x\n y */ c").tokenize();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 3, 5, 5]);
    }

    #[test]
    fn test_next_token_after_end() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert!(lexer.next_token().is_eof());
        assert!(lexer.next_token().is_eof());
        assert_eq!(lexer.next(), None);
    }
}
