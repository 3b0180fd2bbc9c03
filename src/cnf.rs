//! The CNF normalizer (C3): a deterministic six-pass rewriter from an arbitrary closed
//! formula to a list of clauses, each a disjunction of literals (or the sentinel `⊥`).

use std::collections::HashMap;

use crate::clause::{literals, reduce_literals};
use crate::error::ConstructionError;
use crate::formula::{flatten_and, Formula};
use crate::name::{Const, Pred, Var};
use crate::term::{FreeVars, Term};

/// Owns the per-instance fresh-name counter used by variable standardization (§9's design
/// note: "bind the counter to the normalizer instance, not a global"). A
/// [`crate::kb::KnowledgeBase`] keeps exactly one `Normalizer` for its whole lifetime so
/// that variables standardized across different `tell` calls never collide — this is what
/// makes invariant 5 ("standardization apart") hold across, not just within, a single
/// normalization.
#[derive(Debug, Default, Clone)]
pub struct Normalizer {
    counts: HashMap<String, u64>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs all six passes plus post-processing, turning `form` into a list of clauses.
    pub fn normalize(&mut self, form: &Formula) -> Result<Vec<Formula>, ConstructionError> {
        let form = remove_implications(form);
        let form = push_negations_in(form);
        let form = self.standardize_variables(form)?;
        let form = self.skolemize(form, &[]);
        let form = strip_universals(form);
        let form = distribute(form);

        Ok(finalize_clauses(
            flatten_and(&form).into_iter().map(|d| reduce_literals(literals(&d))).collect(),
        ))
    }

    fn fresh_name(&mut self, base: &Var) -> Var {
        let counter = self.counts.entry(base.as_str().to_string()).or_insert(0);
        let fresh = base.with_suffix(*counter);
        *counter += 1;
        fresh
    }

    fn standardize_variables(&mut self, form: Formula) -> Result<Formula, ConstructionError> {
        match form {
            Formula::Forall(var, body) => {
                let fresh = self.fresh_name(&var);
                let renamed = crate::formula::substitute_free_vars(&body, &var, &Term::Variable(fresh.clone()));
                Ok(Formula::Forall(fresh, Box::new(self.standardize_variables(renamed)?)))
            }
            Formula::Exists(var, body) => {
                let fresh = self.fresh_name(&var);
                let renamed = crate::formula::substitute_free_vars(&body, &var, &Term::Variable(fresh.clone()));
                Ok(Formula::Exists(fresh, Box::new(self.standardize_variables(renamed)?)))
            }
            Formula::Not(a) => Ok(Formula::Not(Box::new(self.standardize_variables(*a)?))),
            Formula::And(a, b) => Ok(Formula::And(
                Box::new(self.standardize_variables(*a)?),
                Box::new(self.standardize_variables(*b)?),
            )),
            Formula::Or(a, b) => Ok(Formula::Or(
                Box::new(self.standardize_variables(*a)?),
                Box::new(self.standardize_variables(*b)?),
            )),
            Formula::Implies(a, b) => Ok(Formula::Implies(
                Box::new(self.standardize_variables(*a)?),
                Box::new(self.standardize_variables(*b)?),
            )),
            Formula::Atom(_, ref args) => {
                if let Some(free) = args.free_vars::<Vec<Var>>().into_iter().next() {
                    return Err(ConstructionError::FreeVariable(free.to_string()));
                }
                Ok(form)
            }
            Formula::Top | Formula::Bottom => Ok(form),
        }
    }

    /// Skolemizes every existential in `form`, tracking `scope`: the universally bound
    /// variables enclosing the current position. No function symbols are introduced
    /// (Non-goals); see §4.3 step 4.
    fn skolemize(&mut self, form: Formula, scope: &[Var]) -> Formula {
        match form {
            Formula::Forall(var, body) => {
                let mut inner_scope = scope.to_vec();
                inner_scope.push(var.clone());
                Formula::Forall(var, Box::new(self.skolemize(*body, &inner_scope)))
            }
            Formula::Exists(var, body) => {
                let base = var.as_str().trim_start_matches('$');
                if scope.is_empty() {
                    let witness = Const::skolem_constant(base);
                    let replaced =
                        crate::formula::substitute_free_vars(&body, &var, &Term::Constant(witness));
                    self.skolemize(replaced, scope)
                } else {
                    let pred = Pred::skolem(base);
                    let args: Vec<Term> = std::iter::once(Term::Variable(var.clone()))
                        .chain(scope.iter().cloned().map(Term::Variable))
                        .collect();
                    let guard = Formula::not(Formula::atom_named(pred, args));
                    let body = self.skolemize(*body, scope);
                    Formula::Forall(var, Box::new(Formula::or(guard, body)))
                }
            }
            Formula::Not(a) => Formula::Not(Box::new(self.skolemize(*a, scope))),
            Formula::And(a, b) => {
                Formula::And(Box::new(self.skolemize(*a, scope)), Box::new(self.skolemize(*b, scope)))
            }
            Formula::Or(a, b) => {
                Formula::Or(Box::new(self.skolemize(*a, scope)), Box::new(self.skolemize(*b, scope)))
            }
            other => other,
        }
    }
}

/// `A → B ⟹ ¬A ∨ B`, descending into quantifiers.
fn remove_implications(form: &Formula) -> Formula {
    match form {
        Formula::Implies(a, b) => {
            Formula::or(Formula::not(remove_implications(a)), remove_implications(b))
        }
        Formula::Not(a) => Formula::not(remove_implications(a)),
        Formula::And(a, b) => Formula::and(remove_implications(a), remove_implications(b)),
        Formula::Or(a, b) => Formula::or(remove_implications(a), remove_implications(b)),
        Formula::Forall(v, body) => Formula::forall(v.clone(), remove_implications(body)),
        Formula::Exists(v, body) => Formula::exists(v.clone(), remove_implications(body)),
        Formula::Top | Formula::Bottom | Formula::Atom(_, _) => form.clone(),
    }
}

/// Double-negation collapse and De Morgan across `∧`/`∨`/quantifiers.
fn push_negations_in(form: Formula) -> Formula {
    match form {
        Formula::Not(inner) => match *inner {
            Formula::Not(a) => push_negations_in(*a),
            Formula::And(a, b) => {
                push_negations_in(Formula::or(Formula::not(*a), Formula::not(*b)))
            }
            Formula::Or(a, b) => {
                push_negations_in(Formula::and(Formula::not(*a), Formula::not(*b)))
            }
            Formula::Forall(v, body) => push_negations_in(Formula::exists(v, Formula::not(*body))),
            Formula::Exists(v, body) => push_negations_in(Formula::forall(v, Formula::not(*body))),
            Formula::Top => Formula::Bottom,
            Formula::Bottom => Formula::Top,
            atom @ Formula::Atom(_, _) => Formula::Not(Box::new(atom)),
            Formula::Implies(_, _) => unreachable!("implications removed before negation push-in"),
        },
        Formula::And(a, b) => Formula::and(push_negations_in(*a), push_negations_in(*b)),
        Formula::Or(a, b) => Formula::or(push_negations_in(*a), push_negations_in(*b)),
        Formula::Forall(v, body) => Formula::forall(v, push_negations_in(*body)),
        Formula::Exists(v, body) => Formula::exists(v, push_negations_in(*body)),
        Formula::Implies(_, _) => unreachable!("implications removed before negation push-in"),
        other => other,
    }
}

/// Drops every remaining `∀` binder. Safe once variable names are globally unique.
fn strip_universals(form: Formula) -> Formula {
    match form {
        Formula::Forall(_, body) => strip_universals(*body),
        Formula::Not(a) => Formula::not(strip_universals(*a)),
        Formula::And(a, b) => Formula::and(strip_universals(*a), strip_universals(*b)),
        Formula::Or(a, b) => Formula::or(strip_universals(*a), strip_universals(*b)),
        other => other,
    }
}

/// Pushes `∨` inside `∧` until the structure is a conjunction of disjunctions of
/// literals. Input must already be implication-free, negation-normal, and
/// quantifier-free.
fn distribute(form: Formula) -> Formula {
    match form {
        Formula::Or(a, b) => {
            let a = distribute(*a);
            let b = distribute(*b);
            match a {
                Formula::And(a1, a2) => distribute(Formula::and(Formula::or(*a1, b.clone()), Formula::or(*a2, b))),
                a => match b {
                    Formula::And(b1, b2) => {
                        distribute(Formula::and(Formula::or(a.clone(), *b1), Formula::or(a, *b2)))
                    }
                    b => Formula::or(a, b),
                },
            }
        }
        Formula::And(a, b) => Formula::and(distribute(*a), distribute(*b)),
        other => other,
    }
}

/// Flattens the top conjunction of already-reduced disjuncts, drops `⊤` clauses, and
/// short-circuits to `[⊥]` the moment one appears.
fn finalize_clauses(conjuncts: Vec<Formula>) -> Vec<Formula> {
    if conjuncts.iter().any(|c| *c == Formula::Bottom) {
        return vec![Formula::Bottom];
    }

    let mut kept: Vec<Formula> = conjuncts.into_iter().filter(|c| *c != Formula::Top).collect();
    if kept.is_empty() {
        return vec![Formula::Top];
    }

    kept.sort_by_key(|c| c.to_string());
    kept.dedup_by_key(|c| c.to_string());
    kept
}
