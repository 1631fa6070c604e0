use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// The default rule table for dice expressions.
///
/// Dice notation is registered before the bare letter rule so `d6` never
/// lexes as a character sequence followed by a number.
pub static DICE_TOKENIZER: Lazy<Tokenizer> = Lazy::new(|| {
    let mut tokenizer = Tokenizer::new();
    for &(pattern, kind) in DICE_RULES {
        tokenizer
            .add_rule(pattern, kind)
            .unwrap_or_else(|e| panic!("invalid built-in token rule {pattern:?}: {e}"));
    }
    tokenizer
});

// ASCII classes only: `\d` and `\s` would also take Unicode digits and spaces
const DICE_RULES: &[(&str, TokenKind)] = &[
    (r"[Dd][0-9]+", TokenKind::Dice),
    (r"[0-9]+", TokenKind::Number),
    (r"[,=().]", TokenKind::Literal),
    (r"[+\-]", TokenKind::ArithOp),
    (r"[/*]", TokenKind::FactorOp),
    (r"(?-u:\s)+", TokenKind::Whitespace),
    (r"[a-zA-Z]+", TokenKind::CharSequence),
];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Dice,
    Number,
    Literal,
    ArithOp,
    FactorOp,
    Whitespace,
    CharSequence,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Dice => "DICE",
            Number => "NUMBER",
            Literal => "LITERAL",
            ArithOp => "ARITHOP",
            FactorOp => "FACTOROP",
            Whitespace => "WHITESPACE",
            CharSequence => "CHARSEQUENCE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    kind: TokenKind,
    literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.literal, self.kind)
    }
}

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[error("no token rule matches the input starting at {rest:?}")]
pub struct LexError {
    pub rest: String,
}

struct Rule {
    pattern: Regex,
    kind: TokenKind,
}

/// A first-match tokenizer over an ordered table of regex rules.
///
/// Rules are tried in the order they were added, not by match length; the
/// caller is responsible for registering specific patterns before general
/// ones.
#[derive(Default)]
pub struct Tokenizer {
    rules: Vec<Rule>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `pattern` as the next rule. The pattern is anchored to the
    /// start of the remaining input.
    pub fn add_rule(&mut self, pattern: &str, kind: TokenKind) -> Result<&mut Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})", pattern))?;
        self.rules.push(Rule { pattern, kind });
        Ok(self)
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            let (kind, len) = self.next_match(rest).ok_or_else(|| LexError {
                rest: rest.to_owned(),
            })?;
            if kind != TokenKind::Whitespace {
                tokens.push(Token::new(kind, &rest[..len]));
            }
            rest = &rest[len..];
        }

        log::debug!("tokenized {:?} into {} tokens", text, tokens.len());
        Ok(tokens)
    }

    fn next_match(&self, rest: &str) -> Option<(TokenKind, usize)> {
        self.rules.iter().find_map(|rule| {
            rule.pattern
                .find(rest)
                .map(|m| m.end())
                .filter(|&len| len > 0)
                .map(|len| (rule.kind, len))
        })
    }
}
