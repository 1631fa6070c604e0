pub mod grammar;
pub mod lexer;
mod node;
mod rule;

pub use lexer::{LexError, Token, TokenKind, Tokenizer};
pub use node::{Action, Node};
pub use rule::{Alternative, Grammar, GrammarBuilder, Literal, Rule, RuleId, RuleName, Sequence, Terminal};

/// Splits `text` into tokens using the dice rule table.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    lexer::DICE_TOKENIZER.tokenize(text)
}

/// Matches `tokens` against the dice grammar, returning `None` when no
/// production fits.
pub fn parse(tokens: &[Token]) -> Option<Node<'_>> {
    let node = grammar::DICE_GRAMMAR.parse(tokens);
    if node.is_none() {
        log::debug!("no parse for {} tokens", tokens.len());
    }
    node
}
