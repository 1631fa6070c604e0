use super::lexer::Token;
use crate::common::*;
use crate::roll::{Evaluator, RResult, RollError};
use std::fmt;

/// Semantic action attached to a grammar alternative.
///
/// Actions are re-run on every evaluation; nothing they compute is cached.
pub type Action = fn(&Node<'_>, &mut dyn Evaluator) -> RResult<Values>;

/// A node of the parse tree.
///
/// A node borrows the tokens its match consumed and owns the nodes of its
/// non-literal sub-matches, in the order their rules were declared.
#[derive(Clone)]
pub struct Node<'t> {
    span: &'t [Token],
    children: Vec<Node<'t>>,
    action: Option<Action>,
}

impl<'t> Node<'t> {
    pub(crate) fn leaf(span: &'t [Token], action: Action) -> Self {
        Self {
            span,
            children: Vec::new(),
            action: Some(action),
        }
    }

    pub(crate) fn literal(span: &'t [Token]) -> Self {
        Self {
            span,
            children: Vec::new(),
            action: None,
        }
    }

    pub(crate) fn branch(span: &'t [Token], children: Vec<Node<'t>>, action: Action) -> Self {
        Self {
            span,
            children,
            action: Some(action),
        }
    }

    /// The tokens consumed by this match.
    pub fn span(&self) -> &'t [Token] {
        self.span
    }

    pub fn children(&self) -> &[Node<'t>] {
        &self.children
    }

    pub fn is_literal(&self) -> bool {
        self.action.is_none()
    }

    /// Text of the first consumed token; the whole token for terminals.
    pub fn text(&self) -> &'t str {
        self.span.first().map_or("", Token::literal)
    }

    /// Runs this node's action, which in turn evaluates whatever children it
    /// needs. Each call draws new dice.
    pub fn evaluate(&self, ev: &mut dyn Evaluator) -> RResult<Values> {
        match self.action {
            Some(action) => action(self, ev),
            None => Err(RollError::NoValue(self.text().to_owned())),
        }
    }

    /// Evaluates child `i` and returns its leading value.
    pub(crate) fn value(&self, i: usize, ev: &mut dyn Evaluator) -> RResult<Int> {
        Ok(*self.children[i].evaluate(ev)?.first())
    }

    pub(crate) fn values(&self, i: usize, ev: &mut dyn Evaluator) -> RResult<Values> {
        self.children[i].evaluate(ev)
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literals: Vec<_> = self.span.iter().map(Token::literal).collect();
        f.debug_struct("Node")
            .field("span", &literals)
            .field("children", &self.children)
            .finish()
    }
}
