//! Fragment tokenizer.
//!
//! Splits a raw HTML fragment into text runs, start tags and end tags.
//! Comments are skipped. A `<` that does not begin a complete tag or comment
//! is emitted as [`Token::LessThan`] so the caller can keep it as text.

/// A lexical unit of a raw HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Run of text, entity references still encoded.
    Text(&'a str),
    /// Literal `<` that opens nothing.
    LessThan,
    /// `<name attrs>` or `<name attrs/>`. `name` is lowercased.
    StartTag {
        name: String,
        attrs: &'a str,
        self_closing: bool,
    },
    /// `</name>`. `name` is lowercased.
    EndTag { name: String },
}

/// Scanner state between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside markup.
    Text,
    /// At a `<`.
    TagOpen,
    /// Inside `<!-- ... -->`.
    Comment,
    /// Inside `<name ...>`.
    StartTag,
    /// Inside `</name ...>`.
    EndTag,
}

/// Iterator over the tokens of a fragment.
pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Consume `len` bytes from the current position and return them.
    fn take(&mut self, len: usize) -> &'a str {
        let slice = &self.input[self.pos..self.pos + len];
        self.pos += len;
        slice
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let mut state = State::Text;
        loop {
            let rest = &self.input[self.pos..];
            if rest.is_empty() {
                return None;
            }

            match state {
                State::Text => {
                    if rest.starts_with('<') {
                        state = State::TagOpen;
                        continue;
                    }
                    let end = rest.find('<').unwrap_or(rest.len());
                    return Some(Token::Text(self.take(end)));
                }
                State::TagOpen => {
                    let after = &rest[1..];
                    state = if after.starts_with("!--") {
                        State::Comment
                    } else if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                        State::StartTag
                    } else if after
                        .strip_prefix('/')
                        .is_some_and(|s| s.starts_with(|c: char| c.is_ascii_alphabetic()))
                    {
                        State::EndTag
                    } else {
                        self.pos += 1;
                        return Some(Token::LessThan);
                    };
                }
                State::Comment => {
                    // `<!--` is four bytes; the terminator may not overlap it.
                    if let Some(end) = rest[4..].find("-->") {
                        self.pos += 4 + end + 3;
                        state = State::Text;
                        continue;
                    }
                    self.pos += 1;
                    return Some(Token::LessThan);
                }
                State::StartTag | State::EndTag => {
                    let Some(gt) = rest.find('>') else {
                        self.pos += 1;
                        return Some(Token::LessThan);
                    };
                    let raw = self.take(gt + 1);
                    let inner = &raw[1..raw.len() - 1];
                    return Some(if state == State::StartTag {
                        start_tag(inner)
                    } else {
                        end_tag(raw, &inner[1..])
                    });
                }
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-')
}

/// Split a tag body into its name and the remainder.
fn split_name(body: &str) -> (&str, &str) {
    let end = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
    body.split_at(end)
}

fn start_tag(body: &str) -> Token<'_> {
    let (name, attrs) = split_name(body);
    let trimmed = attrs.trim_end();
    let (attrs, self_closing) = match trimmed.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (attrs, false),
    };
    Token::StartTag {
        name: name.to_ascii_lowercase(),
        attrs,
        self_closing,
    }
}

/// An end tag may only carry trailing whitespace after its name; anything
/// else makes the whole token plain text.
fn end_tag<'a>(raw: &'a str, body: &'a str) -> Token<'a> {
    let (name, rest) = split_name(body);
    if rest.trim().is_empty() {
        Token::EndTag {
            name: name.to_ascii_lowercase(),
        }
    } else {
        Token::Text(raw)
    }
}
