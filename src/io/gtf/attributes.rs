//! Tokenizer for the ninth (attribute) column of GTF/GFF lines.
//!
//! `gene_id "ENSG00000223972"; gene_name "DDX11L1";` becomes
//! `["gene_id", "ENSG00000223972", "gene_name", "DDX11L1"]`. Keys and
//! values may be separated by spaces, `;` or `=`, so GFF-style
//! `hid=trf; hstart=1` splits the same way. Single and double quotes
//! protect delimiters, and a backslash makes the next character literal.

/// Characters terminating a token outside of quotes.
const DELIMITERS: [char; 3] = [' ', ';', '='];
const ESCAPE: char = '\\';
const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';

/// Splits an attribute string into alternating key and value tokens.
///
/// Never fails: malformed input such as an unterminated quote is consumed
/// leniently. Callers detect structural problems by checking that the
/// number of tokens is even.
pub fn split_attributes(input: &str) -> Vec<String> {
    AttributeTokenizer::new(input).tokenize()
}

/// Single pass, left to right scanner over a trimmed attribute string.
#[derive(Debug)]
pub struct AttributeTokenizer {
    chars:             Vec<char>,
    /// Positions of escape characters, which are dropped from tokens.
    escaped:           Vec<bool>,
    in_single_quote:   bool,
    in_double_quote:   bool,
    escape_pending:    bool,
    /// Start of the token being scanned.
    token_start:       usize,
    /// No character of the current token has been consumed yet.
    at_token_boundary: bool,
    /// The current token was closed by a quote, which is trimmed on emit.
    token_was_quoted:  bool,
    escape_seen:       bool,
    tokens:            Vec<String>,
}

impl AttributeTokenizer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.trim().chars().collect();
        Self {
            escaped: vec![false; chars.len()],
            chars,
            in_single_quote: false,
            in_double_quote: false,
            escape_pending: false,
            token_start: 0,
            at_token_boundary: true,
            token_was_quoted: false,
            escape_seen: false,
            tokens: Vec::with_capacity(32),
        }
    }

    /// Consumes the scanner and returns all tokens.
    pub fn tokenize(mut self) -> Vec<String> {
        for pos in 0..self.chars.len() {
            self.step(pos);
        }
        self.flush();
        self.tokens
    }

    fn in_quotes(&self) -> bool {
        self.in_single_quote || self.in_double_quote
    }

    fn step(
        &mut self,
        pos: usize,
    ) {
        let c = self.chars[pos];
        if std::mem::take(&mut self.escape_pending) {
            self.at_token_boundary = false;
            return;
        }

        match c {
            ESCAPE => {
                self.escaped[pos] = true;
                self.escape_pending = true;
                self.escape_seen = true;
            },
            SINGLE_QUOTE => {
                if self.in_single_quote {
                    self.in_single_quote = false;
                    self.token_was_quoted = true;
                    return;
                }
                if !self.in_double_quote && self.at_token_boundary {
                    self.in_single_quote = true;
                    self.token_start += 1;
                }
                self.at_token_boundary = false;
            },
            DOUBLE_QUOTE => {
                if self.in_double_quote {
                    self.in_double_quote = false;
                    self.token_was_quoted = true;
                    return;
                }
                if !self.in_single_quote && self.at_token_boundary {
                    self.in_double_quote = true;
                    self.token_start += 1;
                }
                self.at_token_boundary = false;
            },
            c if DELIMITERS.contains(&c) && !self.in_quotes() => {
                self.delimit(pos)
            },
            _ => self.at_token_boundary = false,
        }
    }

    fn delimit(
        &mut self,
        pos: usize,
    ) {
        let quoted = std::mem::take(&mut self.token_was_quoted);
        let raw_len = pos - self.token_start;
        // Repeated delimiters collapse, an empty quoted value does not.
        if raw_len == 0 {
            self.token_start = pos + 1;
            return;
        }
        let len = if quoted { raw_len - 1 } else { raw_len };
        self.emit(self.token_start, len);
        self.token_start = pos + 1;
        self.at_token_boundary = true;
    }

    fn flush(&mut self) {
        if self.token_start < self.chars.len() {
            let mut len = self.chars.len() - self.token_start;
            if self.token_was_quoted {
                len -= 1;
            }
            self.emit(self.token_start, len);
        }
    }

    fn emit(
        &mut self,
        from: usize,
        len: usize,
    ) {
        let range = from..from + len;
        let token: String = if self.escape_seen {
            range
                .filter(|pos| !self.escaped[*pos])
                .map(|pos| self.chars[pos])
                .collect()
        }
        else {
            self.chars[range].iter().collect()
        };
        self.tokens.push(token);
        self.escape_seen = false;
    }
}
