//! Shared clause-level reduction logic used by both the CNF normalizer (C3) and the
//! resolution engine (C4): a clause is a disjunction of literals, represented as a
//! [`Formula`] built from [`crate::formula::Formula::or_list`].

use std::collections::BTreeSet;

use crate::formula::{flatten_or, Formula};
use crate::name::Pred;
use crate::term::Term;

/// If `lit` is a (possibly negated) `Equals` literal whose truth value is decidable
/// without a substitution — both arguments the same term, or both distinct constants —
/// returns that value. `Equals` between a variable and anything else isn't decidable
/// here and returns `None`; it's left as a literal until unification binds the variable.
fn interpret_equals_literal(lit: &Formula) -> Option<bool> {
    let (negated, atom) = match lit {
        Formula::Not(inner) => (true, inner.as_ref()),
        other => (false, other),
    };
    let (pred, args) = atom.as_atom()?;
    if *pred != Pred::equals() || args.len() != 2 {
        return None;
    }
    let value = if args[0] == args[1] {
        true
    } else if let (Term::Constant(_), Term::Constant(_)) = (&args[0], &args[1]) {
        false
    } else {
        return None;
    };
    Some(value != negated)
}

/// Reduces a list of literals to a single clause formula: evaluates any `Equals` literal
/// whose truth is already decidable (§3's universal interpretation, applied here rather
/// than only in the model checker so resolution mode honors it too), detects a
/// complementary pair (collapsing the whole clause to `⊤`), otherwise sorts and
/// deduplicates by canonical string before folding back into an `OrList`.
pub fn reduce_literals(literals: Vec<Formula>) -> Formula {
    if literals.iter().any(|l| interpret_equals_literal(l) == Some(true)) {
        return Formula::Top;
    }
    let literals: Vec<Formula> = literals.into_iter().filter(|l| interpret_equals_literal(l) != Some(false)).collect();
    if literals.is_empty() {
        return Formula::Bottom;
    }

    let complements: BTreeSet<String> = literals.iter().map(|l| l.complement().to_string()).collect();
    if literals.iter().any(|l| complements.contains(&l.to_string())) {
        return Formula::Top;
    }

    let mut literals = literals;
    literals.sort_by_key(|l| l.to_string());
    literals.dedup_by_key(|l| l.to_string());
    Formula::or_list(literals)
}

/// The literals of a clause, in flattened form.
pub fn literals(clause: &Formula) -> Vec<Formula> {
    flatten_or(clause)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::name::{Const, Pred};
    use crate::term::Term;

    #[test]
    fn complementary_literals_collapse_to_top() {
        let p = Formula::Atom(Pred::new("P").unwrap(), vec![Term::Constant(Const::new("a").unwrap())]);
        let not_p = Formula::not(p.clone());
        assert_eq!(reduce_literals(vec![p, not_p]), Formula::Top);
    }

    #[test]
    fn reflexive_equals_literal_collapses_clause_to_top() {
        let a = Term::Constant(Const::new("a").unwrap());
        let p = Formula::Atom(Pred::new("P").unwrap(), vec![a.clone()]);
        assert_eq!(reduce_literals(vec![p, Formula::equals(a.clone(), a)]), Formula::Top);
    }

    #[test]
    fn equals_between_distinct_constants_is_dropped_as_false() {
        let a = Term::Constant(Const::new("a").unwrap());
        let b = Term::Constant(Const::new("b").unwrap());
        let p = Formula::Atom(Pred::new("P").unwrap(), vec![a.clone()]);
        assert_eq!(reduce_literals(vec![p.clone(), Formula::equals(a, b)]), p);
    }

    #[test]
    fn unit_clause_of_distinct_constant_equals_is_bottom() {
        let a = Term::Constant(Const::new("a").unwrap());
        let b = Term::Constant(Const::new("b").unwrap());
        assert_eq!(reduce_literals(vec![Formula::equals(a, b)]), Formula::Bottom);
    }
}
