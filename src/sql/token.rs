//! SQL Tokens - the atomic units of generated SQL.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::{Dialect, SqlDialect};

/// SQL Token - every element the generators emit.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Query Keywords ===
    Select,
    Distinct,
    From,
    Where,
    GroupBy,
    As,
    And,
    Case,
    When,
    Then,
    Else,
    End,
    IsNull,
    Limit,

    // === DDL Keywords ===
    Create,
    Drop,
    Table,
    If,
    Not,
    Exists,
    Primary,
    Key,
    Foreign,
    References,

    // === DML Keywords ===
    Insert,
    Into,

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,
    Eq,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    /// Indentation in units of four spaces.
    Indent(usize),

    // === Dynamic Content ===
    /// Identifier quoted for the dialect (table, column).
    Ident(String),
    /// Identifier emitted verbatim, as the caller spelled it.
    Bare(String),
    /// Qualified identifier: schema.table or just table
    QualifiedIdent {
        schema: Option<String>,
        name: String,
    },
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// NULL literal
    LitNull,

    /// Function name, remapped per dialect (e.g. BOOL_AND on Snowflake).
    FunctionName(String),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// **Never pass user input to this variant.** Only trusted fragments
    /// (configured default literals, introspected type names, caller-supplied
    /// query text) go here.
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::Distinct => "DISTINCT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::As => "AS".into(),
            Token::And => "AND".into(),
            Token::Case => "CASE".into(),
            Token::When => "WHEN".into(),
            Token::Then => "THEN".into(),
            Token::Else => "ELSE".into(),
            Token::End => "END".into(),
            Token::IsNull => "IS NULL".into(),
            Token::Limit => "LIMIT".into(),

            Token::Create => "CREATE".into(),
            Token::Drop => "DROP".into(),
            Token::Table => "TABLE".into(),
            Token::If => "IF".into(),
            Token::Not => "NOT".into(),
            Token::Exists => "EXISTS".into(),
            Token::Primary => "PRIMARY".into(),
            Token::Key => "KEY".into(),
            Token::Foreign => "FOREIGN".into(),
            Token::References => "REFERENCES".into(),

            Token::Insert => "INSERT".into(),
            Token::Into => "INTO".into(),

            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Eq => "=".into(),

            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "    ".repeat(*n),

            Token::Ident(name) => dialect.quote_identifier(name),
            Token::Bare(name) => name.clone(),
            Token::QualifiedIdent { schema, name } => match schema {
                Some(s) => format!(
                    "{}.{}",
                    dialect.quote_identifier(s),
                    dialect.quote_identifier(name)
                ),
                None => dialect.quote_identifier(name),
            },
            Token::LitInt(n) => n.to_string(),
            Token::LitFloat(f) => {
                if f.is_finite() {
                    let mut buffer = ryu::Buffer::new();
                    buffer.format_finite(*f).to_string()
                } else {
                    // No numeric spelling exists; engines accept the quoted form.
                    dialect.quote_string(&f.to_string())
                }
            }
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitNull => dialect.format_null().into(),

            Token::FunctionName(name) => match dialect.remap_function(name) {
                Some(remapped) => remapped.to_string(),
                None => name.to_uppercase(),
            },

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }

    /// Push identifiers separated by `, `.
    pub fn ident_list<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) -> &mut Self {
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.push(Token::Ident(name.clone()));
        }
        self
    }
}
