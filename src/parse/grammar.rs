//! The dice language itself: its productions and what each one computes.
//!
//! ```text
//! PlusMinusOp  := ARITHOP
//! MultDivOp    := FACTOROP
//! Name         := CHARSEQUENCE
//! DotOperation := DotOperation '.' Name | CHARSEQUENCE
//! Atom         := NUMBER | DICE | DotOperation | '(' ArithExpr ')'
//! Term         := Term MultDivOp Atom | Atom
//! ArithExpr    := ArithExpr PlusMinusOp Term | '-' Term | Term Term | Term
//! Assignment   := DotOperation '=' ArithExpr | ArithExpr
//! Expr         := Expr ',' Assignment | Assignment
//! ```
//!
//! `Term Term` repeats: `3 d6` evaluates `d6` three separate times and sums
//! the draws. Names are accepted but not resolved yet and evaluate to `-1`;
//! assignments evaluate to their right-hand side and bind nothing.

use super::lexer::TokenKind;
use super::node::Node;
use super::rule::{Grammar, GrammarBuilder, RuleName};
use crate::common::*;
use crate::roll::{Evaluator, RResult};
use once_cell::sync::Lazy;

pub static DICE_GRAMMAR: Lazy<Grammar> = Lazy::new(dice_grammar);

pub fn dice_grammar() -> Grammar {
    use RuleName::*;

    let mut g = GrammarBuilder::new();
    let plus_minus = g.rule(PlusMinusOp);
    let mult_div = g.rule(MultDivOp);
    let dot_operation = g.rule(DotOperation);
    let name = g.rule(Name);
    let atom = g.rule(Atom);
    let term = g.rule(Term);
    let arith_expr = g.rule(ArithExpr);
    let assignment = g.rule(Assignment);
    let expr = g.rule(Expr);

    let dot = g.literal(".");
    let equals = g.literal("=");
    let comma = g.literal(",");
    let minus = g.literal("-");
    let left_paren = g.literal("(");
    let right_paren = g.literal(")");

    g.add_terminal(plus_minus, TokenKind::ArithOp, sign);
    g.add_terminal(mult_div, TokenKind::FactorOp, sign);
    g.add_terminal(name, TokenKind::CharSequence, unresolved_name);

    g.add_sequence(dot_operation, &[dot_operation, dot, name], unresolved_name)
        .add_terminal(dot_operation, TokenKind::CharSequence, unresolved_name);

    g.add_terminal(atom, TokenKind::Number, number)
        .add_terminal(atom, TokenKind::Dice, die)
        .add_sequence(atom, &[dot_operation], passthrough)
        .add_sequence(atom, &[left_paren, arith_expr, right_paren], passthrough);

    g.add_sequence(term, &[term, mult_div, atom], mul_div)
        .add_sequence(term, &[atom], passthrough);

    g.add_sequence(arith_expr, &[arith_expr, plus_minus, term], add_sub)
        .add_sequence(arith_expr, &[minus, term], negate)
        .add_sequence(arith_expr, &[term, term], repeat)
        .add_sequence(arith_expr, &[term], passthrough);

    g.add_sequence(assignment, &[dot_operation, equals, arith_expr], assign)
        .add_sequence(assignment, &[arith_expr], passthrough);

    g.add_sequence(expr, &[expr, comma, assignment], concat)
        .add_sequence(expr, &[assignment], passthrough);

    g.build(expr)
}

fn sign(node: &Node<'_>, _: &mut dyn Evaluator) -> RResult<Values> {
    match node.text() {
        "-" | "/" => Ok(vec1![NEGATIVE]),
        _ => Ok(vec1![POSITIVE]),
    }
}

fn unresolved_name(_: &Node<'_>, _: &mut dyn Evaluator) -> RResult<Values> {
    Ok(vec1![UNRESOLVED_NAME])
}

// Number and dice tokens hold ASCII digits only, so overflow is the one way
// parsing them can fail.
fn saturating_parse<T: std::str::FromStr>(digits: &str, max: T) -> T {
    digits.parse().unwrap_or(max)
}

fn number(node: &Node<'_>, _: &mut dyn Evaluator) -> RResult<Values> {
    Ok(vec1![saturating_parse(node.text(), Int::MAX)])
}

/// `dN` draws from `[1, N]`; `d0` has no faces and is `0` without a draw.
fn die(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    // the leading 'd' or 'D' is the only non-digit of a dice token
    let digits = node.text().get(1..).unwrap_or("");
    match NonZeroUInt::new(saturating_parse(digits, UInt::MAX)) {
        Some(sides) => Ok(vec1![Int::from(ev.roll_die(sides)?)]),
        None => Ok(vec1![0]),
    }
}

fn passthrough(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    node.values(0, ev)
}

fn mul_div(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    let lhs = node.value(0, ev)?;
    let op = node.value(1, ev)?;
    let rhs = node.value(2, ev)?;

    let x = if op == POSITIVE {
        lhs.saturating_mul(rhs)
    } else if rhs == 0 {
        // saturates toward the sign of the dividend
        match lhs.signum() {
            1 => Int::MAX,
            -1 => Int::MIN,
            _ => 0,
        }
    } else {
        // truncates toward zero; only MIN / -1 overflows
        lhs.checked_div(rhs).unwrap_or(Int::MAX)
    };
    Ok(vec1![x])
}

fn add_sub(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    let lhs = node.value(0, ev)?;
    let sign = node.value(1, ev)?;
    let rhs = node.value(2, ev)?;
    Ok(vec1![lhs.saturating_add(sign.saturating_mul(rhs))])
}

fn negate(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    Ok(vec1![node.value(0, ev)?.saturating_neg()])
}

fn repeat(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    let times = node.value(0, ev)?;
    let times = usize::try_from(times.max(0)).unwrap_or(usize::MAX);
    ev.repeat(times)?;

    let mut total: Int = 0;
    for _ in 0..times {
        total = total.saturating_add(node.value(1, ev)?);
    }
    Ok(vec1![total])
}

fn assign(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    node.values(1, ev)
}

fn concat(node: &Node<'_>, ev: &mut dyn Evaluator) -> RResult<Values> {
    let mut values = node.values(0, ev)?;
    values.extend_from_slice(&node.values(1, ev)?);
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::lexer::{Token, DICE_TOKENIZER};
    use crate::parse::rule::Matcher;
    use crate::roll::{RollContext, StepRoller};

    fn mock_roller() -> StepRoller {
        StepRoller::new(NonZeroUInt::new(1).unwrap(), 1)
    }

    fn tokens(s: &str) -> Vec<Token> {
        DICE_TOKENIZER.tokenize(s).unwrap()
    }

    fn eval(s: &str) -> RResult<Values> {
        let tokens = tokens(s);
        let node = DICE_GRAMMAR.parse(&tokens).unwrap();
        RollContext::new_unbounded(mock_roller()).evaluate(&node)
    }

    fn check(s: &str, expected: &[Int]) {
        assert_eq!(eval(s).unwrap().as_slice(), expected, "evaluating {:?}", s);
    }

    fn rule_of(s: &str, name: RuleName) -> usize {
        let tokens = tokens(s);
        let id = DICE_GRAMMAR.rule_id(name).unwrap();
        DICE_GRAMMAR
            .match_rule(id, &tokens)
            .map_or(0, |node| node.span().len())
    }

    #[test]
    fn test_eval_arithmetic() {
        check("1+2", &[3]);
        check("2*3-1", &[5]);
        check("(1+2)*3", &[9]);
        check("10/3", &[3]);
        check("1-2-3", &[-4]);
        check("-7/2", &[-3]);
        check("(0-7)/2", &[-3]);
        check("8/2/2", &[2]);
    }

    #[test]
    fn test_eval_negation() {
        check("-5", &[-5]);
        check("-(2+3)", &[-5]);
        check("-2*3", &[-6]);
    }

    #[test]
    fn test_eval_dice() {
        // the step roller yields 1, 2, 3, ... in evaluation order
        check("d6", &[1]);
        check("D20 + d20", &[3]);
        check("2d6", &[1 + 2]);
        check("3d6 + 1", &[1 + 2 + 3 + 1]);
        check("3 (1d6)", &[1 + 2 + 3]);
        check("(1+1) d4 * 2", &[(1 + 2) * 2]);
    }

    #[test]
    fn test_repeat_counts() {
        check("0 d6", &[0]);
        check("4 5", &[20]);
        check("(0-1) d6", &[0]);
    }

    #[test]
    fn test_eval_lists() {
        check("1,2", &[1, 2]);
        check("1, 2+2, 3*3", &[1, 4, 9]);
        check("d6, d6", &[1, 2]);
    }

    #[test]
    fn test_eval_names_and_assignment() {
        check("x=5", &[5]);
        check("a.b.c = 2*3", &[6]);
        check("x", &[UNRESOLVED_NAME]);
        check("a.b", &[UNRESOLVED_NAME]);
        check("x + 1", &[0]);
        check("x=1, y=2", &[1, 2]);
    }

    #[test]
    fn test_eval_division_by_zero_saturates() {
        check("1/0", &[Int::MAX]);
        check("(0-7)/0", &[Int::MIN]);
        check("0/0", &[0]);
        check("d6/(1-1)", &[Int::MAX]);
    }

    #[test]
    fn test_eval_oversized_literals() {
        check("99999999999999999999", &[Int::MAX]);
        check("d0", &[0]);
        check("3 d0 + 1", &[1]);

        let tokens = tokens("d99999999999");
        let node = DICE_GRAMMAR.parse(&tokens).unwrap();
        let mut ctx = RollContext::new_unbounded(mock_roller());
        assert_eq!(ctx.evaluate(&node), Ok(vec1![1]));
        assert_eq!(ctx.rolls(), 1);
    }

    #[test]
    fn test_unbounded_evaluation_never_fails() {
        for s in ["1001 1", "1/0", "d0", "(0-5) d6", "a.b = 2 d4, x / 0", "99999999999999999999 * 2"] {
            assert!(eval(s).is_ok(), "evaluating {:?}", s);
        }
        check("1001 1", &[1001]);
    }

    #[test]
    fn test_eval_saturates() {
        check("9223372036854775807 + 1", &[Int::MAX]);
        check("-9223372036854775807 - 2", &[Int::MIN]);
        check("9223372036854775807 * 2", &[Int::MAX]);
    }

    #[test]
    fn test_productions() {
        assert_eq!(rule_of("+", RuleName::PlusMinusOp), 1);
        assert_eq!(rule_of("*", RuleName::PlusMinusOp), 0);
        assert_eq!(rule_of("/", RuleName::MultDivOp), 1);
        assert_eq!(rule_of("a.b.c", RuleName::DotOperation), 5);
        assert_eq!(rule_of("(1+2)", RuleName::Atom), 5);
        assert_eq!(rule_of("1 + 2", RuleName::Atom), 1);
        assert_eq!(rule_of("2*3/4", RuleName::Term), 5);
        assert_eq!(rule_of("2*3+4", RuleName::Term), 1);
        assert_eq!(rule_of("1+2*3", RuleName::ArithExpr), 5);
        assert_eq!(rule_of("x = 1", RuleName::Assignment), 3);
        assert_eq!(rule_of("1, x = 1, 3", RuleName::Expr), 7);
    }

    #[test]
    fn test_repeat_only_takes_the_last_two_terms() {
        // "3 1d6" lexes as 3, 1, d6; the match covers "1 d6" and the
        // leading 3 is left unconsumed
        let tokens = tokens("3 1d6");
        let node = DICE_GRAMMAR.parse(&tokens).unwrap();
        assert_eq!(node.span(), &tokens[1..]);
        let mut ctx = RollContext::new_unbounded(mock_roller());
        assert_eq!(ctx.evaluate(&node), Ok(vec1![1]));
        assert_eq!(ctx.rolls(), 2);
    }

    #[test]
    fn test_unconsumed_prefix() {
        let tokens = tokens("2*-3");
        let node = DICE_GRAMMAR.parse(&tokens).unwrap();
        assert_eq!(node.span().len(), 2);
        check("2*-3", &[-3]);
        check("(1", &[1]);
    }

    #[test]
    fn test_parse_failures() {
        for s in ["", "+", "1 +", "1)", "1 *", "=", "1,", "x ="] {
            let tokens = tokens(s);
            assert!(DICE_GRAMMAR.parse(&tokens).is_none(), "parsing {:?}", s);
        }
    }

    #[test]
    fn test_memo_does_not_change_matches() {
        for s in ["1+2*3", "(1+2)*(3-4)/d6", "x=2d6, 3 d4, a.b", "2*-3", "((((1))))"] {
            let tokens = tokens(s);
            let root = DICE_GRAMMAR.root();
            let memoized = Matcher::new(&DICE_GRAMMAR, &tokens, true).match_rule(root, tokens.len());
            let fresh = Matcher::new(&DICE_GRAMMAR, &tokens, false).match_rule(root, tokens.len());
            assert_eq!(format!("{:?}", memoized), format!("{:?}", fresh), "parsing {:?}", s);
        }
    }

    #[test]
    fn test_deep_nesting_is_fast() {
        let depth = 60;
        let s = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        check(&s, &[1]);
    }
}
