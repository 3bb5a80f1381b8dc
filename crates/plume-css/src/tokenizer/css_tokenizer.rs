use thiserror::Error;

use super::token::{CSSToken, HashType, NumericType};

/// A lexical failure that aborts the whole tokenize call.
///
/// Every other malformed input is recovered from inside the token stream
/// (`BadString`, `BadUrl`, stray `Delim`s).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// A `/*` with no matching `*/`.
    #[error("unterminated comment starting at offset {position}")]
    UnterminatedComment {
        /// Code point offset of the opening `/*`.
        position: usize,
    },
    /// An unquoted `url(` that reaches the end of input before `)`.
    #[error("unterminated url starting at offset {position}")]
    UnterminatedUrl {
        /// Code point offset where the url contents begin.
        position: usize,
    },
    /// A backslash followed by a hex digit. Hex escapes are not decoded.
    #[error("unsupported hex escape at offset {position}")]
    UnsupportedEscape {
        /// Code point offset of the backslash.
        position: usize,
    },
}

/// Tokenize CSS source text into a token stream terminated by [`CSSToken::EOF`].
///
/// # Errors
///
/// Returns a [`TokenError`] for an unterminated comment, an unterminated
/// unquoted url, or a hex escape sequence.
pub fn tokenize(text: &str) -> Result<Vec<CSSToken>, TokenError> {
    let mut tokenizer = CSSTokenizer::new(text);
    tokenizer.run()?;
    Ok(tokenizer.into_tokens())
}

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 state machine.
pub struct CSSTokenizer {
    /// The preprocessed input code points
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Collected tokens
    tokens: Vec<CSSToken>,
}

impl CSSTokenizer {
    /// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
    ///
    /// "Replace any U+000D CARRIAGE RETURN (CR) code points, U+000C FORM FEED
    /// (FF) code points, or pairs of U+000D CARRIAGE RETURN (CR) followed by
    /// U+000A LINE FEED (LF) in input by a single U+000A LINE FEED (LF) code
    /// point. Replace any U+0000 NULL ... with U+FFFD REPLACEMENT CHARACTER."
    pub fn new(input: impl AsRef<str>) -> Self {
        let mut chars = Vec::new();
        let mut iter = input.as_ref().chars().peekable();
        while let Some(c) = iter.next() {
            match c {
                '\r' => {
                    let _ = iter.next_if_eq(&'\n');
                    chars.push('\n');
                }
                '\x0C' => chars.push('\n'),
                '\0' => chars.push('\u{FFFD}'),
                c => chars.push(c),
            }
        }
        Self {
            input: chars,
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Consume tokens until EOF.
    ///
    /// # Errors
    ///
    /// Stops at the first [`TokenError`]; tokens collected so far are kept.
    pub fn run(&mut self) -> Result<(), TokenError> {
        loop {
            let token = self.consume_token()?;
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                return Ok(());
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<CSSToken> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[CSSToken] {
        &self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Result<CSSToken, TokenError> {
        // "Consume comments."
        self.consume_comments()?;

        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return Ok(CSSToken::EOF);
        };

        let token = match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }

            // "U+0022 QUOTATION MARK (")" / "U+0027 APOSTROPHE (')"
            '"' | '\'' => self.consume_string_token(c)?,

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type = if self.next_would_start_ident_sequence() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    let value = self.consume_ident_sequence()?;
                    CSSToken::Hash { value, hash_type }
                } else {
                    CSSToken::Delim('#')
                }
            }

            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,

            // "U+002B PLUS SIGN (+)"
            // "If the input stream starts with a number, reconsume the current
            // input code point, consume a numeric token, and return it."
            '+' if would_start_number(Some('+'), self.peek(), self.peek_at(1)) => {
                self.reconsume();
                self.consume_numeric_token()?
            }

            ',' => CSSToken::Comma,

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if would_start_number(Some('-'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_numeric_token()?
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    self.skip(2);
                    CSSToken::CDC
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if would_start_ident_sequence(Some('-'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_ident_like_token()?
                } else {
                    CSSToken::Delim('-')
                }
            }

            // "U+002E FULL STOP (.)"
            '.' if would_start_number(Some('.'), self.peek(), self.peek_at(1)) => {
                self.reconsume();
                self.consume_numeric_token()?
            }

            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,

            // "U+003C LESS-THAN SIGN (<)"
            // "If the next 3 input code points are U+0021 U+002D U+002D (!--),
            // consume them and return a <CDO-token>."
            '<' if self.peek() == Some('!')
                && self.peek_at(1) == Some('-')
                && self.peek_at(2) == Some('-') =>
            {
                self.skip(3);
                CSSToken::CDO
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' if self.next_would_start_ident_sequence() => {
                CSSToken::AtKeyword(self.consume_ident_sequence()?)
            }

            '[' => CSSToken::LeftBracket,

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' if is_valid_escape(Some('\\'), self.peek()) => {
                self.reconsume();
                self.consume_ident_like_token()?
            }

            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()?
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()?
            }

            // "anything else"
            // "Return a <delim-token> with its value set to the current input code point."
            c => CSSToken::Delim(c),
        };
        Ok(token)
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Unlike the standard algorithm, reaching EOF inside a comment is fatal.
    fn consume_comments(&mut self) -> Result<(), TokenError> {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            let position = self.position;
            self.skip(2);

            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        self.skip(1);
                        break;
                    }
                    Some(_) => {}
                    None => return Err(TokenError::UnterminatedComment { position }),
                }
            }
        }
        Ok(())
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.skip(1);
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> Result<CSSToken, TokenError> {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point" / "EOF"
                Some(c) if c == ending_code_point => return Ok(CSSToken::String(value)),
                None => return Ok(CSSToken::String(value)),

                // "newline"
                // "This is a parse error. Reconsume the current input code point,
                // create a <bad-string-token>, and return it."
                Some('\n') => {
                    self.reconsume();
                    return Ok(CSSToken::BadString);
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    None => {}
                    // "Otherwise, if the next input code point is a newline, consume it."
                    Some('\n') => self.skip(1),
                    Some(_) => value.push(self.consume_escaped_code_point()?),
                },

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> Result<CSSToken, TokenError> {
        let (value, numeric_type) = self.consume_number();

        // "If the next 3 input code points would start an ident sequence..."
        if self.next_would_start_ident_sequence() {
            let unit = self.consume_ident_sequence()?;
            Ok(CSSToken::Dimension { value, unit })
        }
        // "Otherwise, if the next input code point is U+0025 PERCENTAGE SIGN (%)..."
        else if self.peek() == Some('%') {
            self.skip(1);
            Ok(CSSToken::Percentage(value))
        } else {
            Ok(CSSToken::Number {
                value,
                numeric_type,
            })
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> Result<CSSToken, TokenError> {
        let string = self.consume_ident_sequence()?;

        // "If string's value is an ASCII case-insensitive match for 'url', and
        // the next input code point is U+0028 LEFT PARENTHESIS ((), consume it."
        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            self.skip(1);

            // "While the next two input code points are whitespace, consume the
            // next input code point."
            while self.peek().is_some_and(is_whitespace)
                && self.peek_at(1).is_some_and(is_whitespace)
            {
                self.skip(1);
            }

            // "If the next one or two input code points are U+0022 QUOTATION MARK
            // ("), U+0027 APOSTROPHE ('), or whitespace followed by U+0022
            // QUOTATION MARK (") or U+0027 APOSTROPHE ('), then create a
            // <function-token> with its value set to string and return it."
            let quoted = match (self.peek(), self.peek_at(1)) {
                (Some('"' | '\''), _) => true,
                (Some(c), Some('"' | '\'')) => is_whitespace(c),
                _ => false,
            };
            if quoted {
                Ok(CSSToken::Function(string))
            } else {
                self.consume_url_token()
            }
        } else if self.peek() == Some('(') {
            self.skip(1);
            Ok(CSSToken::Function(string))
        } else {
            Ok(CSSToken::Ident(string))
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// Reaching EOF before `)` is fatal.
    fn consume_url_token(&mut self) -> Result<CSSToken, TokenError> {
        let position = self.position;
        let mut value = String::new();

        // "Consume as much whitespace as possible."
        self.consume_whitespace();

        loop {
            match self.consume() {
                Some(')') => return Ok(CSSToken::Url(value)),
                None => return Err(TokenError::UnterminatedUrl { position }),

                // "whitespace"
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            self.skip(1);
                            Ok(CSSToken::Url(value))
                        }
                        None => Err(TokenError::UnterminatedUrl { position }),
                        Some(_) => {
                            self.consume_bad_url_remnants()?;
                            Ok(CSSToken::BadUrl)
                        }
                    };
                }

                // "U+0022 QUOTATION MARK ("), U+0027 APOSTROPHE ('), U+0028 LEFT
                // PARENTHESIS (() or non-printable code point"
                Some(c) if matches!(c, '"' | '\'' | '(') || is_non_printable(c) => {
                    self.consume_bad_url_remnants()?;
                    return Ok(CSSToken::BadUrl);
                }

                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point()?);
                    } else {
                        self.consume_bad_url_remnants()?;
                        return Ok(CSSToken::BadUrl);
                    }
                }

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) -> Result<(), TokenError> {
        loop {
            match self.consume() {
                Some(')') | None => return Ok(()),
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point()?;
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> Result<String, TokenError> {
        let mut result = String::new();

        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    result.push(self.consume_escaped_code_point()?);
                }
                Some(_) => {
                    self.reconsume();
                    return Ok(result);
                }
                None => return Ok(result),
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> (f32, NumericType) {
        let mut numeric_type = NumericType::Integer;
        let mut repr = String::new();

        // "If the next input code point is U+002B PLUS SIGN (+) or U+002D
        // HYPHEN-MINUS (-), consume it and append it to repr."
        if let Some(sign @ ('+' | '-')) = self.peek() {
            self.skip(1);
            repr.push(sign);
        }

        self.consume_digits(&mut repr);

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by
        // a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.skip(1);
            repr.push('.');
            numeric_type = NumericType::Number;
            self.consume_digits(&mut repr);
        }

        // "If the next 2 or 3 input code points are U+0045 (E) or U+0065 (e),
        // optionally followed by U+002D (-) or U+002B (+), followed by a digit..."
        if let Some(e @ ('e' | 'E')) = self.peek() {
            let sign = self.peek_at(1).filter(|c| matches!(*c, '+' | '-'));
            let digit_offset = if sign.is_some() { 2 } else { 1 };
            if self.peek_at(digit_offset).is_some_and(|c| c.is_ascii_digit()) {
                self.skip(1);
                repr.push(e);
                if let Some(sign) = sign {
                    self.skip(1);
                    repr.push(sign);
                }
                numeric_type = NumericType::Number;
                self.consume_digits(&mut repr);
            }
        }

        // "Convert repr to a number."
        (repr.parse().unwrap_or(0.0), numeric_type)
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(digit) = self.peek().filter(char::is_ascii_digit) {
            self.skip(1);
            repr.push(digit);
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Assumes the backslash has already been consumed. A hex digit after the
    /// backslash is rejected; any other code point stands for itself.
    fn consume_escaped_code_point(&mut self) -> Result<char, TokenError> {
        let position = self.position.saturating_sub(1);
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => Err(TokenError::UnsupportedEscape { position }),
            // "EOF": "This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => Ok('\u{FFFD}'),
            Some(c) => Ok(c),
        }
    }

    fn next_would_start_ident_sequence(&self) -> bool {
        would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2))
    }

    /// Consume and return the next code point.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Advance past `count` code points already inspected with `peek`.
    fn skip(&mut self, count: usize) {
        self.position = (self.position + count).min(self.input.len());
    }

    /// Put back the last consumed code point.
    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    // "If the first code point is not U+005C REVERSE SOLIDUS (\), return false.
    // Otherwise, if the second code point is a newline, return false.
    // Otherwise, return true."
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn would_start_ident_sequence(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        // "U+002D HYPHEN-MINUS"
        // "If the second code point is an ident-start code point or a U+002D
        // HYPHEN-MINUS, or the second and third code points are a valid escape,
        // return true."
        Some('-') => {
            second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                || is_valid_escape(second, third)
        }
        // "U+005C REVERSE SOLIDUS (\)"
        Some('\\') => is_valid_escape(first, second),
        // "ident-start code point"
        Some(c) => is_ident_start_code_point(c),
        None => false,
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn would_start_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        Some('.') => is_digit(second),
        c => is_digit(c),
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.2 Definitions - non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
const fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{E}'..='\u{1F}' | '\u{7F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_is_normalized() {
        let tokens = tokenize("a\r\nb").unwrap();
        assert_eq!(
            tokens,
            vec![
                CSSToken::ident("a"),
                CSSToken::Whitespace,
                CSSToken::ident("b"),
                CSSToken::EOF
            ]
        );
    }

    #[test]
    fn test_error_offsets() {
        assert_eq!(
            tokenize("a /* open"),
            Err(TokenError::UnterminatedComment { position: 2 })
        );
        assert_eq!(
            tokenize("x\\41"),
            Err(TokenError::UnsupportedEscape { position: 1 })
        );
    }

    #[test]
    fn test_would_start_number_helpers() {
        assert!(would_start_number(Some('-'), Some('.'), Some('5')));
        assert!(!would_start_number(Some('-'), Some('.'), Some('x')));
        assert!(would_start_ident_sequence(Some('-'), Some('-'), None));
        assert!(!would_start_ident_sequence(Some('-'), Some('1'), None));
    }
}
