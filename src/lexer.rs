use crate::token::{Token, TokenKind};

/// Character-level scanner. Tokens are produced on demand via
/// [`Lexer::next_token`]; once the end of input is reached every further
/// call keeps returning the `Eof` token.
#[derive(Debug, Clone)]
pub struct Lexer {
    source: Vec<char>,
    position: usize,
    read_position: usize,
    ch: char,
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer {
            source: source.chars().collect(),
            position: 0,
            read_position: 0,
            ch: '\0',
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        self.ch = self
            .source
            .get(self.read_position)
            .copied()
            .unwrap_or('\0');
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> char {
        self.source
            .get(self.read_position)
            .copied()
            .unwrap_or('\0')
    }

    fn skip_whitespace(&mut self) {
        while self.ch == ' ' || self.ch == '\t' || self.ch == '\n' || self.ch == '\r' {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while is_letter(self.ch) {
            self.read_char();
        }
        self.source[start..self.position].iter().collect()
    }

    fn read_number(&mut self) -> String {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        self.source[start..self.position].iter().collect()
    }

    // An unterminated literal absorbs the rest of the input.
    fn read_string(&mut self) -> String {
        let start = self.position + 1;
        loop {
            self.read_char();
            if self.ch == '"' || self.ch == '\0' {
                break;
            }
        }
        self.source[start..self.position].iter().collect()
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let token = match self.ch {
            '=' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    Token::new(TokenKind::Eq, "==")
                } else {
                    Token::new(TokenKind::Assign, "=")
                }
            }
            '!' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    Token::new(TokenKind::NotEq, "!=")
                } else {
                    Token::new(TokenKind::Bang, "!")
                }
            }
            '+' => Token::new(TokenKind::Plus, "+"),
            '-' => Token::new(TokenKind::Minus, "-"),
            '*' => Token::new(TokenKind::Asterisk, "*"),
            '/' => Token::new(TokenKind::Slash, "/"),
            '<' => Token::new(TokenKind::Lesser, "<"),
            '>' => Token::new(TokenKind::Greater, ">"),
            ',' => Token::new(TokenKind::Comma, ","),
            ';' => Token::new(TokenKind::Semicolon, ";"),
            ':' => Token::new(TokenKind::Colon, ":"),
            '(' => Token::new(TokenKind::LeftParen, "("),
            ')' => Token::new(TokenKind::RightParen, ")"),
            '{' => Token::new(TokenKind::LeftBrace, "{"),
            '}' => Token::new(TokenKind::RightBrace, "}"),
            '[' => Token::new(TokenKind::LeftBracket, "["),
            ']' => Token::new(TokenKind::RightBracket, "]"),
            '"' => Token::new(TokenKind::String, self.read_string()),
            '\0' => Token::new(TokenKind::Eof, ""),
            ch if is_letter(ch) => {
                let literal = self.read_identifier();
                let kind =
                    TokenKind::from_keyword_str(&literal).unwrap_or(TokenKind::Ident);
                // read_identifier has already advanced past the last character
                return Token::new(kind, literal);
            }
            ch if ch.is_ascii_digit() => {
                return Token::new(TokenKind::Int, self.read_number());
            }
            ch => Token::new(TokenKind::Illegal, ch.to_string()),
        };

        self.read_char();
        token
    }
}
