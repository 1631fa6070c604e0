use super::lexer::{Token, TokenKind};
use super::node::{Action, Node};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Index of a rule inside its [`Grammar`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RuleId(usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RuleName {
    PlusMinusOp,
    MultDivOp,
    DotOperation,
    Name,
    Atom,
    Term,
    ArithExpr,
    Assignment,
    Expr,
    /// Anonymous rule matching a single token with this exact text.
    Literal(&'static str),
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{:?}", text),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// Matches one alternative against the tail of `tokens[..end]`.
#[enum_dispatch::enum_dispatch]
pub(crate) trait Match {
    fn try_match<'t>(&self, m: &mut Matcher<'_, 't>, end: usize) -> Option<Node<'t>>;
}

#[derive(Debug, Clone)]
#[enum_dispatch::enum_dispatch(Match)]
pub enum Alternative {
    Terminal(Terminal),
    Literal(Literal),
    Sequence(Sequence),
}

/// Consumes one token of the given kind.
#[derive(Clone)]
pub struct Terminal {
    pub kind: TokenKind,
    action: Action,
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Terminal({})", self.kind)
    }
}

impl Match for Terminal {
    fn try_match<'t>(&self, m: &mut Matcher<'_, 't>, end: usize) -> Option<Node<'t>> {
        let tokens = m.tokens;
        let last = tokens[..end].last()?;
        (last.kind() == self.kind).then(|| Node::leaf(&tokens[end - 1..end], self.action))
    }
}

/// Consumes one token whose text is exactly `text`, whatever its kind.
#[derive(Debug, Clone)]
pub struct Literal {
    pub text: &'static str,
}

impl Match for Literal {
    fn try_match<'t>(&self, m: &mut Matcher<'_, 't>, end: usize) -> Option<Node<'t>> {
        let tokens = m.tokens;
        let last = tokens[..end].last()?;
        (last.literal() == self.text).then(|| Node::literal(&tokens[end - 1..end]))
    }
}

/// Matches every part in turn, the last declared part first, each against
/// what the later parts left over.
///
/// Because the tail is matched first, a part that refers back to its own rule
/// (`Term -> Term MultDivOp Atom`) only ever sees a strictly shorter buffer.
#[derive(Clone)]
pub struct Sequence {
    pub parts: Vec<RuleId>,
    action: Action,
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sequence").field(&self.parts).finish()
    }
}

impl Match for Sequence {
    fn try_match<'t>(&self, m: &mut Matcher<'_, 't>, end: usize) -> Option<Node<'t>> {
        let mut rest = end;
        let mut children = Vec::with_capacity(self.parts.len());

        for &part in self.parts.iter().rev() {
            let child = m.match_rule(part, rest)?;
            let consumed = child.span().len();
            if consumed == 0 {
                log::warn!(
                    "{} matched without consuming any tokens; failing the sequence",
                    m.grammar.rule(part).name
                );
                return None;
            }
            rest -= consumed;
            children.push(child);
        }

        children.reverse();
        children.retain(|child| !child.is_literal());
        let tokens = m.tokens;
        Some(Node::branch(&tokens[rest..end], children, self.action))
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: RuleName,
    pub alternatives: Vec<Alternative>,
}

/// An immutable set of rules with a designated root.
///
/// Rules refer to each other by [`RuleId`], so self-referential productions
/// need no shared ownership.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    root: RuleId,
}

impl Grammar {
    pub fn root(&self) -> RuleId {
        self.root
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    pub fn rule_id(&self, name: RuleName) -> Option<RuleId> {
        self.rules.iter().position(|r| r.name == name).map(RuleId)
    }

    /// Matches the root rule against `tokens`.
    ///
    /// The match only has to reach the end of the buffer; tokens in front of
    /// the matched suffix are left unconsumed and ignored.
    pub fn parse<'t>(&self, tokens: &'t [Token]) -> Option<Node<'t>> {
        self.match_rule(self.root, tokens)
    }

    pub fn match_rule<'t>(&self, id: RuleId, tokens: &'t [Token]) -> Option<Node<'t>> {
        Matcher::new(self, tokens, true).match_rule(id, tokens.len())
    }
}

/// State of one top-level match over one token buffer.
///
/// Every buffer the matcher sees is a prefix of `tokens`, so `(rule, end)`
/// identifies a match attempt completely. Results are memoised under that
/// key; only tree shapes are kept, evaluation is still done fresh.
pub(crate) struct Matcher<'g, 't> {
    grammar: &'g Grammar,
    tokens: &'t [Token],
    memo: Option<HashMap<(RuleId, usize), Option<Node<'t>>>>,
    active: HashSet<(RuleId, usize)>,
}

impl<'g, 't> Matcher<'g, 't> {
    pub(crate) fn new(grammar: &'g Grammar, tokens: &'t [Token], memoize: bool) -> Self {
        Self {
            grammar,
            tokens,
            memo: memoize.then(HashMap::new),
            active: HashSet::new(),
        }
    }

    /// Tries the alternatives of `id` in order against `tokens[..end]` and
    /// returns the first that matches.
    pub(crate) fn match_rule(&mut self, id: RuleId, end: usize) -> Option<Node<'t>> {
        let key = (id, end);
        if let Some(found) = self.memo.as_ref().and_then(|memo| memo.get(&key)) {
            return found.clone();
        }

        let grammar = self.grammar;
        let rule = grammar.rule(id);
        if !self.active.insert(key) {
            log::warn!(
                "{} re-entered with {} tokens left; treating it as no match",
                rule.name,
                end
            );
            return None;
        }

        let found = rule
            .alternatives
            .iter()
            .find_map(|alt| alt.try_match(self, end));
        self.active.remove(&key);

        match &found {
            Some(node) => log::trace!("{} matched {} of {} tokens", rule.name, node.span().len(), end),
            None => log::trace!("{} failed with {} tokens", rule.name, end),
        }
        if let Some(memo) = &mut self.memo {
            memo.insert(key, found.clone());
        }
        found
    }
}

/// Collects rules and their alternatives before freezing them into a
/// [`Grammar`]. Rules may be referenced before any alternative is added.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the rule called `name`, declaring it if needed.
    pub fn rule(&mut self, name: RuleName) -> RuleId {
        match self.rules.iter().position(|r| r.name == name) {
            Some(i) => RuleId(i),
            None => {
                self.rules.push(Rule {
                    name,
                    alternatives: Vec::new(),
                });
                RuleId(self.rules.len() - 1)
            }
        }
    }

    /// Returns a rule that matches the single token `text`.
    pub fn literal(&mut self, text: &'static str) -> RuleId {
        let id = self.rule(RuleName::Literal(text));
        if self.rules[id.0].alternatives.is_empty() {
            self.add_literal(id, text);
        }
        id
    }

    pub fn add_terminal(&mut self, rule: RuleId, kind: TokenKind, action: Action) -> &mut Self {
        self.push(rule, Terminal { kind, action }.into())
    }

    pub fn add_literal(&mut self, rule: RuleId, text: &'static str) -> &mut Self {
        self.push(rule, Literal { text }.into())
    }

    /// Adds a sequence alternative. `parts` are listed in source order.
    pub fn add_sequence(&mut self, rule: RuleId, parts: &[RuleId], action: Action) -> &mut Self {
        let parts = parts.to_vec();
        self.push(rule, Sequence { parts, action }.into())
    }

    fn push(&mut self, rule: RuleId, alternative: Alternative) -> &mut Self {
        self.rules[rule.0].alternatives.push(alternative);
        self
    }

    pub fn build(self, root: RuleId) -> Grammar {
        Grammar {
            rules: self.rules,
            root,
        }
    }
}
