//! Substitution and unification (C2). `Subst` is a finite map `Variable → Term` with
//! transitive resolution: looking up `x` follows any chain `x→y→z` to its ultimate
//! binding, which is what lets [`unify_terms`] extend the map incrementally without
//! re-walking previously unified pairs.

use std::collections::BTreeMap;

use crate::formula::Formula;
use crate::name::Var;
use crate::term::Term;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subst {
    table: BTreeMap<Var, Term>,
}

impl Subst {
    pub fn new() -> Self {
        Self { table: BTreeMap::new() }
    }

    pub fn bind(&mut self, var: Var, term: Term) {
        self.table.insert(var, term);
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolves `term` through the substitution chain. If `term` is a constant, or an
    /// unbound variable, it is returned unchanged. If it is a bound variable, the chase
    /// continues through whatever it is bound to.
    pub fn resolve(&self, term: &Term) -> Term {
        let mut current = term.clone();
        loop {
            match &current {
                Term::Variable(v) => match self.table.get(v) {
                    Some(next) if next != &current => current = next.clone(),
                    _ => return current,
                },
                Term::Constant(_) => return current,
            }
        }
    }
}

/// Attempts to unify two terms under the substitution built so far, extending `subst`
/// in place on success. Equal terms succeed trivially; an unbound variable binds to the
/// other side; two distinct constants fail. No occurs check: safe because the language
/// has no compound function terms, so a variable can never occur inside the term it
/// would be bound to.
pub fn unify_terms(a: &Term, b: &Term, subst: &mut Subst) -> bool {
    let a = subst.resolve(a);
    let b = subst.resolve(b);

    match (&a, &b) {
        (Term::Constant(x), Term::Constant(y)) => x == y,
        (Term::Variable(x), Term::Variable(y)) if x == y => true,
        (Term::Variable(x), _) => {
            subst.bind(x.clone(), b);
            true
        }
        (_, Term::Variable(y)) => {
            subst.bind(y.clone(), a);
            true
        }
    }
}

/// Structural unification over formulas, recursing through matching connectives and
/// atoms. Used by the resolution engine on quantifier-free literals, but defined
/// generally per the component contract.
pub fn unify_formulas(a: &Formula, b: &Formula, subst: &mut Subst) -> bool {
    match (a, b) {
        (Formula::Top, Formula::Top) | (Formula::Bottom, Formula::Bottom) => true,
        (Formula::Atom(pa, aa), Formula::Atom(pb, ab)) => {
            pa == pb && aa.len() == ab.len() && aa.iter().zip(ab).all(|(x, y)| unify_terms(x, y, subst))
        }
        (Formula::Not(x), Formula::Not(y)) => unify_formulas(x, y, subst),
        (Formula::And(xa, xb), Formula::And(ya, yb)) | (Formula::Or(xa, xb), Formula::Or(ya, yb)) => {
            unify_formulas(xa, ya, subst) && unify_formulas(xb, yb, subst)
        }
        (Formula::Implies(xa, xb), Formula::Implies(ya, yb)) => {
            unify_formulas(xa, ya, subst) && unify_formulas(xb, yb, subst)
        }
        _ => false,
    }
}

/// Applies `subst` to every term in `form`, replacing each variable with its transitive
/// binding (or leaving it as-is if unbound). Used on quantifier-free clauses during
/// resolution; recurses generally through the full grammar for completeness.
pub fn apply_subst(form: &Formula, subst: &Subst) -> Formula {
    match form {
        Formula::Top | Formula::Bottom => form.clone(),
        Formula::Atom(pred, args) => {
            Formula::Atom(pred.clone(), args.iter().map(|t| subst.resolve(t)).collect())
        }
        Formula::Not(a) => Formula::Not(Box::new(apply_subst(a, subst))),
        Formula::And(a, b) => Formula::And(Box::new(apply_subst(a, subst)), Box::new(apply_subst(b, subst))),
        Formula::Or(a, b) => Formula::Or(Box::new(apply_subst(a, subst)), Box::new(apply_subst(b, subst))),
        Formula::Implies(a, b) => {
            Formula::Implies(Box::new(apply_subst(a, subst)), Box::new(apply_subst(b, subst)))
        }
        Formula::Forall(v, body) => Formula::Forall(v.clone(), Box::new(apply_subst(body, subst))),
        Formula::Exists(v, body) => Formula::Exists(v.clone(), Box::new(apply_subst(body, subst))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::name::{Const, Pred};

    fn var(name: &str) -> Term {
        Term::Variable(Var::new(name).unwrap())
    }

    fn con(name: &str) -> Term {
        Term::Constant(Const::new(name).unwrap())
    }

    #[test]
    fn unifies_variable_with_constant() {
        let mut subst = Subst::new();
        assert!(unify_terms(&var("$x"), &con("a"), &mut subst));
        assert_eq!(subst.resolve(&var("$x")), con("a"));
    }

    #[test]
    fn distinct_constants_fail() {
        let mut subst = Subst::new();
        assert!(!unify_terms(&con("a"), &con("b"), &mut subst));
    }

    #[test]
    fn unifier_soundness_on_atoms() {
        let p = Pred::new("P").unwrap();
        let a = Formula::Atom(p.clone(), vec![var("$x")]);
        let b = Formula::Atom(p, vec![con("socrates")]);

        let mut subst = Subst::new();
        assert!(unify_formulas(&a, &b, &mut subst));
        assert_eq!(apply_subst(&a, &subst), apply_subst(&b, &subst));
    }
}
