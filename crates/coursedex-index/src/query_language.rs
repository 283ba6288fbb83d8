//! Catalog query language.
//!
//! ```text
//! expr  := and ("OR" and)*
//! and   := unary (["AND"] unary)*
//! unary := ("NOT" | "-") unary | atom
//! atom  := "(" expr ")" | field ":" value | value
//! value := word | word"*" | "*" | "\"" phrase "\""
//! ```
//!
//! Juxtaposed clauses are AND-ed. Matching is case-insensitive. Bare values
//! search the document's free-text fields; `field:value` searches one field.

use crate::document::{tokenize, Document};
use crate::synonyms::Synonyms;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A query that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at position {position})")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl From<ParseError> for coursedex_core::Error {
    fn from(err: ParseError) -> Self {
        coursedex_core::Error::Query(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Matches every document.
    All,
    Term(Term),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// `None` searches the free-text fields.
    pub field: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `*`: the field has at least one value.
    Any,
    Exact(String),
    Prefix(String),
    /// Quoted value: no wildcard or synonym handling.
    Phrase(String),
}

/// Inputs to evaluation that are not part of the document.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub now: DateTime<Utc>,
    pub synonyms: &'a Synonyms,
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Word {
        field: Option<String>,
        value: String,
        quoted: bool,
        negated: bool,
    },
}

impl Expr {
    /// Parse a query string. Blank input matches everything.
    pub fn parse(input: &str) -> Result<Expr, ParseError> {
        let tokens = lex(input)?;
        if tokens.is_empty() {
            return Ok(Expr::All);
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_or()?;
        if let Some((tok, position)) = parser.tokens.get(parser.pos) {
            return Err(ParseError {
                message: format!("unexpected {}", describe(tok)),
                position: *position,
            });
        }
        Ok(expr)
    }

    /// Whether the document matches.
    pub fn matches(&self, doc: &Document, ctx: &MatchContext<'_>) -> bool {
        self.score(doc, ctx).is_some()
    }

    /// Relevance of a matching document, or `None` if it does not match.
    ///
    /// Free-text hits in a title weigh twice as much as hits elsewhere.
    pub fn score(&self, doc: &Document, ctx: &MatchContext<'_>) -> Option<f32> {
        match self {
            Expr::All => Some(0.0),
            Expr::Term(term) => term.score(doc, ctx),
            Expr::And(clauses) => clauses
                .iter()
                .try_fold(0.0, |acc, clause| clause.score(doc, ctx).map(|s| acc + s)),
            Expr::Or(clauses) => clauses
                .iter()
                .filter_map(|clause| clause.score(doc, ctx))
                .reduce(|a, b| a + b),
            Expr::Not(inner) => match inner.score(doc, ctx) {
                Some(_) => None,
                None => Some(0.0),
            },
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Expr::All)
    }
}

impl Term {
    fn score(&self, doc: &Document, ctx: &MatchContext<'_>) -> Option<f32> {
        match &self.field {
            Some(field) => {
                let values = doc.field_values(field, ctx.now);
                values
                    .iter()
                    .any(|v| self.value.matches_text(v))
                    .then_some(1.0)
            }
            None => {
                if self.value == Value::Any {
                    return Some(0.0);
                }

                let variants: Vec<Value> = match &self.value {
                    Value::Exact(word) => ctx
                        .synonyms
                        .expand(word)
                        .into_iter()
                        .map(Value::Exact)
                        .collect(),
                    other => vec![other.clone()],
                };

                doc.text_fields()
                    .into_iter()
                    .filter(|(text, _)| variants.iter().any(|v| v.matches_text(text)))
                    .map(|(_, is_title)| if is_title { 2.0 } else { 1.0 })
                    .reduce(f32::max)
            }
        }
    }
}

impl Value {
    /// Match against a whole field value or any of its tokens.
    fn matches_text(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        match self {
            Value::Any => !text.trim().is_empty(),
            Value::Exact(word) | Value::Phrase(word) => {
                lowered == *word || contains_sequence(&tokenize(text), &tokenize(word))
            }
            Value::Prefix(prefix) => {
                lowered.starts_with(prefix.as_str())
                    || tokenize(text).iter().any(|t| t.starts_with(prefix.as_str()))
            }
        }
    }

    fn from_word(value: &str, quoted: bool) -> Value {
        let lowered = value.to_lowercase();
        if quoted {
            return Value::Phrase(lowered);
        }
        if lowered == "*" {
            return Value::Any;
        }
        match lowered.strip_suffix('*') {
            Some(prefix) => Value::Prefix(prefix.to_string()),
            None => Value::Exact(lowered),
        }
    }
}

/// Whether `needle` occurs as a consecutive run of tokens in `haystack`.
fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|window| window == needle)
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::LParen => "'('".to_string(),
        Tok::RParen => "')'".to_string(),
        Tok::And => "AND".to_string(),
        Tok::Or => "OR".to_string(),
        Tok::Not => "NOT".to_string(),
        Tok::Word { value, .. } => format!("'{value}'"),
    }
}

fn is_field_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn lex(input: &str) -> Result<Vec<(Tok, usize)>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '(' {
            tokens.push((Tok::LParen, i));
            i += 1;
            continue;
        }
        if c == ')' {
            tokens.push((Tok::RParen, i));
            i += 1;
            continue;
        }

        let start = i;
        if c == '-' && chars.get(i + 1) == Some(&'(') {
            tokens.push((Tok::Not, i));
            i += 1;
            continue;
        }

        let mut negated = false;
        if c == '-' && chars.get(i + 1).is_some_and(|n| !n.is_whitespace()) {
            negated = true;
            i += 1;
        }

        let mut field = None;
        let mut word = String::new();
        let mut quoted = false;

        while i < chars.len() {
            let c = chars[i];
            if c == '"' && word.is_empty() {
                word = read_quoted(&chars, &mut i)?;
                quoted = true;
                break;
            }
            if c.is_whitespace() || c == '(' || c == ')' {
                break;
            }
            if c == ':' && field.is_none() && is_field_name(&word) {
                field = Some(std::mem::take(&mut word).to_lowercase());
                i += 1;
                continue;
            }
            word.push(c);
            i += 1;
        }

        if let Some(name) = &field {
            if word.is_empty() && !quoted {
                return Err(ParseError {
                    message: format!("missing value for field '{name}'"),
                    position: start,
                });
            }
        }

        if field.is_none() && !quoted && !negated {
            let keyword = match word.as_str() {
                "AND" => Some(Tok::And),
                "OR" => Some(Tok::Or),
                "NOT" => Some(Tok::Not),
                _ => None,
            };
            if let Some(keyword) = keyword {
                tokens.push((keyword, start));
                continue;
            }
        }

        tokens.push((
            Tok::Word {
                field,
                value: word,
                quoted,
                negated,
            },
            start,
        ));
    }

    Ok(tokens)
}

/// Read a double-quoted string starting at `chars[*i] == '"'`.
fn read_quoted(chars: &[char], i: &mut usize) -> Result<String, ParseError> {
    let open = *i;
    *i += 1;
    let mut out = String::new();
    while *i < chars.len() {
        let c = chars[*i];
        *i += 1;
        match c {
            '"' => return Ok(out),
            '\\' if *i < chars.len() => {
                out.push(chars[*i]);
                *i += 1;
            }
            _ => out.push(c),
        }
    }
    Err(ParseError {
        message: "unterminated quote".to_string(),
        position: open,
    })
}

/// Deepest allowed nesting of groups and negations.
const MAX_DEPTH: usize = 64;

struct Parser {
    tokens: Vec<(Tok, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, p)| *p)
            .unwrap_or(0)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            position: self.position(),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut clauses = vec![self.parse_and()?];
        while self.peek() == Some(&Tok::Or) {
            self.pos += 1;
            clauses.push(self.parse_and()?);
        }
        Ok(if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            Expr::Or(clauses)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut clauses = vec![self.parse_unary()?];
        loop {
            match self.peek() {
                Some(Tok::And) => {
                    self.pos += 1;
                    clauses.push(self.parse_unary()?);
                }
                Some(Tok::Word { .. }) | Some(Tok::LParen) | Some(Tok::Not) => {
                    clauses.push(self.parse_unary()?);
                }
                _ => break,
            }
        }
        Ok(if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            Expr::And(clauses)
        })
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("query nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(&Tok::Not) {
            self.descend()?;
            self.pos += 1;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let Some((tok, _)) = self.tokens.get(self.pos).cloned() else {
            return Err(self.error("unexpected end of query"));
        };

        match tok {
            Tok::LParen => {
                self.descend()?;
                self.pos += 1;
                let inner = self.parse_or()?;
                if self.peek() != Some(&Tok::RParen) {
                    return Err(self.error("expected ')'"));
                }
                self.pos += 1;
                self.depth -= 1;
                Ok(inner)
            }
            Tok::Word {
                field,
                value,
                quoted,
                negated,
            } => {
                self.pos += 1;
                let expr = if field.is_none() && !quoted && value == "*" {
                    Expr::All
                } else {
                    Expr::Term(Term {
                        field,
                        value: Value::from_word(&value, quoted),
                    })
                };
                Ok(if negated {
                    Expr::Not(Box::new(expr))
                } else {
                    expr
                })
            }
            other => Err(self.error(format!("unexpected {}", describe(&other)))),
        }
    }
}
