//! Minimal SQL scanner for rewriting caller-supplied queries.
//!
//! Materialization has to splice clauses into query text it did not generate.
//! A plain substring search for `FROM` breaks on `EXTRACT(YEAR FROM d)`,
//! subqueries, string literals and comments, so queries are scanned into
//! lexemes with byte spans first, tracking parenthesis depth.
//!
//! The scanner never fails: an unterminated literal or comment extends to the
//! end of the input. Dollar-quoted strings and backslash escapes are not
//! recognised.

/// Lexeme classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexKind {
    /// Keyword, bare identifier or number.
    Word,
    /// `"quoted identifier"`.
    QuotedIdent,
    /// `'string literal'`.
    StringLit,
    /// `-- line` or `/* block */` comment.
    Comment,
    Whitespace,
    LParen,
    RParen,
    Semicolon,
    /// Any other single punctuation byte.
    Punct,
}

/// A lexeme with its byte span and parenthesis depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexKind,
    pub start: usize,
    pub end: usize,
    /// Nesting depth; 0 is the top level of the statement.
    pub depth: usize,
}

impl Lexeme {
    pub fn text<'a>(&self, sql: &'a str) -> &'a str {
        &sql[self.start..self.end]
    }

    /// Whether this lexeme is the given keyword (case-insensitive).
    pub fn is_keyword(&self, sql: &str, keyword: &str) -> bool {
        self.kind == LexKind::Word && self.text(sql).eq_ignore_ascii_case(keyword)
    }

    fn is_trivia(&self) -> bool {
        matches!(self.kind, LexKind::Whitespace | LexKind::Comment)
    }
}

/// Scan `sql` into lexemes.
pub fn tokenize(sql: &str) -> Vec<Lexeme> {
    let bytes = sql.as_bytes();
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        let kind = if b.is_ascii_whitespace() {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            LexKind::Whitespace
        } else if b == b'-' && next == Some(b'-') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            LexKind::Comment
        } else if b == b'/' && next == Some(b'*') {
            i += 2;
            while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                i += 1;
            }
            i = (i + 2).min(bytes.len());
            LexKind::Comment
        } else if b == b'\'' {
            i = scan_quoted(bytes, i, b'\'');
            LexKind::StringLit
        } else if b == b'"' {
            i = scan_quoted(bytes, i, b'"');
            LexKind::QuotedIdent
        } else if is_word_byte(b) {
            while i < bytes.len() && (is_word_byte(bytes[i]) || bytes[i] == b'$') {
                i += 1;
            }
            LexKind::Word
        } else {
            i += 1;
            match b {
                b'(' => LexKind::LParen,
                b')' => LexKind::RParen,
                b';' => LexKind::Semicolon,
                _ => LexKind::Punct,
            }
        };

        if kind == LexKind::RParen {
            depth = depth.saturating_sub(1);
        }
        out.push(Lexeme {
            kind,
            start,
            end: i,
            depth,
        });
        if kind == LexKind::LParen {
            depth += 1;
        }
    }

    out
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Scan a quoted run starting at the opening quote; a doubled quote is an
/// escaped quote. Returns the offset just past the closing quote.
fn scan_quoted(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Byte offsets of every top-level occurrence of `keyword`.
pub fn top_level_keywords(sql: &str, keyword: &str) -> Vec<usize> {
    tokenize(sql)
        .iter()
        .filter(|lx| lx.depth == 0 && lx.is_keyword(sql, keyword))
        .map(|lx| lx.start)
        .collect()
}

/// Whether the statement combines selects with a top-level set operator.
pub fn is_compound_select(sql: &str) -> bool {
    tokenize(sql).iter().any(|lx| {
        lx.depth == 0
            && ["UNION", "INTERSECT", "EXCEPT", "MINUS"]
                .iter()
                .any(|op| lx.is_keyword(sql, op))
    })
}

/// Offset of the `FROM` that introduces the select list's source.
///
/// This is the first top-level `FROM` after the first top-level `SELECT`, so a
/// compound select resolves to its first branch (only that branch may carry
/// `INTO`). The `FROM` of `IS [NOT] DISTINCT FROM` is an operator, not a clause.
pub fn select_from_position(sql: &str) -> Option<usize> {
    let lexemes = tokenize(sql);
    let words: Vec<&Lexeme> = lexemes
        .iter()
        .filter(|lx| lx.depth == 0 && !lx.is_trivia())
        .collect();
    let select = words
        .iter()
        .position(|lx| lx.is_keyword(sql, "SELECT"))
        .unwrap_or(0);

    words
        .iter()
        .enumerate()
        .skip(select)
        .find(|(i, lx)| lx.is_keyword(sql, "FROM") && !is_distinct_operator(sql, &words, *i))
        .map(|(_, lx)| lx.start)
}

/// Whether the `FROM` at `words[i]` ends an `IS [NOT] DISTINCT FROM` operator.
fn is_distinct_operator(sql: &str, words: &[&Lexeme], i: usize) -> bool {
    let before = |n: usize| i.checked_sub(n).map(|j| words[j]);
    match before(1) {
        Some(lx) if lx.is_keyword(sql, "DISTINCT") => {
            let prev = before(2);
            let is = |lx: Option<&Lexeme>| lx.is_some_and(|lx| lx.is_keyword(sql, "IS"));
            is(prev) || (prev.is_some_and(|lx| lx.is_keyword(sql, "NOT")) && is(before(3)))
        }
        _ => false,
    }
}

/// Whether the statement already carries a top-level `LIMIT`.
pub fn has_top_level_limit(sql: &str) -> bool {
    !top_level_keywords(sql, "LIMIT").is_empty()
}

/// Strip trailing whitespace, comments and statement terminators.
pub fn trim_statement(sql: &str) -> &str {
    let lexemes = tokenize(sql);
    let end = lexemes
        .iter()
        .rev()
        .find(|lx| !lx.is_trivia() && lx.kind != LexKind::Semicolon)
        .map_or(0, |lx| lx.end);
    &sql[..end]
}
