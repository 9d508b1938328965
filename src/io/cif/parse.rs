//! CIF tokenizer.
//!
//! Splits CIF text into block headers, `loop_` keywords, tags, and
//! values. Quoting rules follow the CIF 1.1 common semantics: single or
//! double quotes close only when followed by whitespace, and a `;` in
//! the first column opens a multi-line text field terminated by the next
//! line starting with `;`. The two null markers are classified here so
//! downstream layers never see them as ordinary strings.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CifError {
    #[error("unterminated quoted value on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("unterminated text field starting on line {line}")]
    UnterminatedTextField { line: usize },

    #[error("value on line {line} appears before any data block")]
    ValueOutsideBlock { line: usize },

    #[error("tag '{tag}' on line {line} is not followed by a value")]
    MissingValue { tag: String, line: usize },

    #[error("loop_ on line {line} declares no tags")]
    EmptyLoop { line: usize },

    #[error("loop_ starting on line {line} holds {values} values for {tags} tags")]
    RaggedLoop {
        line: usize,
        tags: usize,
        values: usize,
    },

    #[error("category '{category}' is declared more than once in one data block")]
    DuplicateCategory { category: String },

    #[error("no data block found")]
    NoDataBlock,
}

/// A raw CIF value with the two null markers resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    /// The `.` marker.
    Inapplicable,
    /// The `?` marker.
    Unknown,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Converts to the nullable representation used by tables.
    pub fn into_option(self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s),
            Value::Inapplicable | Value::Unknown => None,
        }
    }

    pub fn is_null(&self) -> bool {
        !matches!(self, Value::Str(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `data_<name>` header.
    DataBlock(String),
    /// `loop_` keyword.
    Loop,
    /// `save_<name>` frame header (dictionary files only).
    SaveFrame(String),
    /// Bare `save_` closing a frame.
    SaveEnd,
    /// `_category.item` tag, stored without the leading underscore.
    Tag(String),
    Value(Value),
}

/// A token together with the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
        }
    }

    /// Produces the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned>, CifError> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(None),
                Some('#') => self.skip_to_line_end(),
                Some(';') if self.at_line_start() => {
                    return self.text_field().map(Some);
                }
                Some('\'') | Some('"') => {
                    return self.quoted_value().map(Some);
                }
                Some(_) => return self.bare_word().map(Some),
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.text.as_bytes()[self.pos - 1] == b'\n'
    }

    fn advance(&mut self, ch: char) {
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance(ch);
            } else {
                break;
            }
        }
    }

    fn skip_to_line_end(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance(ch);
        }
    }

    /// Consumes a run of non-whitespace characters and classifies it.
    fn bare_word(&mut self) -> Result<Spanned, CifError> {
        let line = self.line;
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                break;
            }
            self.advance(ch);
        }
        let word = &self.text[start..self.pos];

        let token = if let Some(tag) = word.strip_prefix('_') {
            Token::Tag(tag.to_ascii_lowercase())
        } else if let Some(name) = strip_keyword(word, "data_") {
            Token::DataBlock(name.to_string())
        } else if word.eq_ignore_ascii_case("loop_") {
            Token::Loop
        } else if word.eq_ignore_ascii_case("save_") {
            Token::SaveEnd
        } else if let Some(name) = strip_keyword(word, "save_") {
            Token::SaveFrame(name.to_string())
        } else if word == "." {
            Token::Value(Value::Inapplicable)
        } else if word == "?" {
            Token::Value(Value::Unknown)
        } else {
            Token::Value(Value::Str(word.to_string()))
        };

        Ok(Spanned { token, line })
    }

    fn quoted_value(&mut self) -> Result<Spanned, CifError> {
        let line = self.line;
        let quote = self.peek().ok_or(CifError::UnterminatedQuote { line })?;
        self.advance(quote);

        let start = self.pos;
        loop {
            match self.peek() {
                None | Some('\n') => return Err(CifError::UnterminatedQuote { line }),
                Some(ch) if ch == quote => {
                    // A quote only closes when followed by whitespace or
                    // the end of input; otherwise it is part of the value.
                    let after = self.text[self.pos + ch.len_utf8()..].chars().next();
                    if after.is_none() || after.is_some_and(char::is_whitespace) {
                        let value = self.text[start..self.pos].to_string();
                        self.advance(ch);
                        return Ok(Spanned {
                            token: Token::Value(Value::Str(value)),
                            line,
                        });
                    }
                    self.advance(ch);
                }
                Some(ch) => self.advance(ch),
            }
        }
    }

    fn text_field(&mut self) -> Result<Spanned, CifError> {
        let line = self.line;
        self.advance(';');

        let start = self.pos;
        loop {
            // Look for a line whose first character is the terminator.
            match self.peek() {
                None => return Err(CifError::UnterminatedTextField { line }),
                Some(';') if self.at_line_start() => {
                    // Trim the newline that precedes the terminator.
                    let raw = &self.text[start..self.pos];
                    let value = raw
                        .strip_suffix('\n')
                        .map(|s| s.strip_suffix('\r').unwrap_or(s))
                        .unwrap_or(raw);
                    let value = value.strip_prefix('\n').unwrap_or(value);
                    let token = Token::Value(Value::Str(value.to_string()));
                    self.advance(';');
                    return Ok(Spanned { token, line });
                }
                Some(ch) => self.advance(ch),
            }
        }
    }
}

fn strip_keyword<'a>(word: &'a str, keyword: &str) -> Option<&'a str> {
    if word.len() > keyword.len() && word[..keyword.len()].eq_ignore_ascii_case(keyword) {
        Some(&word[keyword.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(text);
        let mut out = Vec::new();
        while let Some(spanned) = tokenizer.next_token().unwrap() {
            out.push(spanned.token);
        }
        out
    }

    #[test]
    fn tokenizes_block_header_and_pair() {
        let toks = tokens("data_1ABC\n_entry.id 1ABC\n");
        assert_eq!(
            toks,
            vec![
                Token::DataBlock("1ABC".to_string()),
                Token::Tag("entry.id".to_string()),
                Token::Value(Value::Str("1ABC".to_string())),
            ]
        );
    }

    #[test]
    fn tags_are_lowercased_but_values_are_not() {
        let toks = tokens("data_x\n_Entry.ID Mixed\n");
        assert_eq!(toks[1], Token::Tag("entry.id".to_string()));
        assert_eq!(toks[2], Token::Value(Value::Str("Mixed".to_string())));
    }

    #[test]
    fn classifies_null_markers() {
        let toks = tokens("data_x\n_a.b .\n_a.c ?\n");
        assert_eq!(toks[2], Token::Value(Value::Inapplicable));
        assert_eq!(toks[4], Token::Value(Value::Unknown));
    }

    #[test]
    fn quoted_null_markers_are_ordinary_strings() {
        let toks = tokens("data_x\n_a.b '.'\n");
        assert_eq!(toks[2], Token::Value(Value::Str(".".to_string())));
    }

    #[test]
    fn quote_closes_only_before_whitespace() {
        let toks = tokens("data_x\n_a.b 'it's fine'\n");
        assert_eq!(
            toks[2],
            Token::Value(Value::Str("it's fine".to_string()))
        );
    }

    #[test]
    fn double_quoted_values_keep_spaces() {
        let toks = tokens("data_x\n_a.b \"two words\"\n");
        assert_eq!(toks[2], Token::Value(Value::Str("two words".to_string())));
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let mut tokenizer = Tokenizer::new("data_x\n_a.b 'oops\n");
        tokenizer.next_token().unwrap();
        tokenizer.next_token().unwrap();
        assert_eq!(
            tokenizer.next_token(),
            Err(CifError::UnterminatedQuote { line: 2 })
        );
    }

    #[test]
    fn text_field_spans_lines() {
        let toks = tokens("data_x\n_a.b\n;first\nsecond\n;\n");
        assert_eq!(
            toks[2],
            Token::Value(Value::Str("first\nsecond".to_string()))
        );
    }

    #[test]
    fn unterminated_text_field_reports_line() {
        let mut tokenizer = Tokenizer::new("data_x\n_a.b\n;never closed\n");
        tokenizer.next_token().unwrap();
        tokenizer.next_token().unwrap();
        assert_eq!(
            tokenizer.next_token(),
            Err(CifError::UnterminatedTextField { line: 3 })
        );
    }

    #[test]
    fn comments_are_skipped() {
        let toks = tokens("# header comment\ndata_x # trailing\n_a.b 1\n");
        assert_eq!(toks[0], Token::DataBlock("x".to_string()));
        assert_eq!(toks.len(), 3);
    }

    #[test]
    fn loop_keyword_is_case_insensitive() {
        let toks = tokens("data_x\nLOOP_\n_a.b\n1\n");
        assert_eq!(toks[1], Token::Loop);
    }

    #[test]
    fn semicolon_not_in_first_column_is_a_value_character() {
        let toks = tokens("data_x\n_a.b abc;def\n");
        assert_eq!(toks[2], Token::Value(Value::Str("abc;def".to_string())));
    }
}
