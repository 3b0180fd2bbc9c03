//! Binary resolution (C4).

use crate::clause::{literals, reduce_literals};
use crate::formula::Formula;
use crate::subst::{apply_subst, unify_formulas, Subst};

/// Resolves clause `c1` against clause `c2`: tries every pair `(l_i ∈ c1, l_j ∈ c2)` such
/// that `unify(¬l_i, l_j)` succeeds, and for each success emits the reduced resolvent. All
/// qualifying pairs are tried — a single call can yield several resolvents — except that
/// an empty resolvent or a negated-Skolem-atom singleton resolvent is `⊥` and stops the
/// scan immediately (§4.4).
pub fn resolve(c1: &Formula, c2: &Formula) -> Vec<Formula> {
    let lits1 = literals(c1);
    let lits2 = literals(c2);

    let mut results: Vec<Formula> = Vec::new();
    let mut seen: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();

    for (i, li) in lits1.iter().enumerate() {
        for (j, lj) in lits2.iter().enumerate() {
            let mut subst = Subst::new();
            if !unify_formulas(&li.complement(), lj, &mut subst) {
                continue;
            }

            let mut remaining: Vec<Formula> = Vec::new();
            remaining.extend(lits1.iter().enumerate().filter(|(k, _)| *k != i).map(|(_, l)| apply_subst(l, &subst)));
            remaining.extend(lits2.iter().enumerate().filter(|(k, _)| *k != j).map(|(_, l)| apply_subst(l, &subst)));

            if remaining.is_empty() {
                return vec![Formula::Bottom];
            }

            let resolvent = reduce_literals(remaining);

            if resolvent == Formula::Top {
                continue;
            }
            if resolvent.is_negated_skolem_atom() {
                return vec![Formula::Bottom];
            }

            let key = resolvent.to_string();
            if seen.insert(key) {
                results.push(resolvent);
            }
        }
    }

    results
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::name::{Const, Pred, Var};
    use crate::term::Term;

    fn atom(name: &str, args: Vec<Term>) -> Formula {
        Formula::atom(name, args).unwrap()
    }

    fn var(name: &str) -> Term {
        Term::Variable(Var::new(name).unwrap())
    }

    fn con(name: &str) -> Term {
        Term::Constant(Const::new(name).unwrap())
    }

    #[test]
    fn unit_resolution_yields_empty_clause() {
        let a = atom("P", vec![con("a")]);
        let not_a = Formula::not(a.clone());
        assert_eq!(resolve(&a, &not_a), vec![Formula::Bottom]);
    }

    #[test]
    fn resolving_against_a_rule_instantiates_the_variable() {
        // Not(Human($x)) | Mortal($x)   and   Human(socrates)
        let rule = Formula::or(Formula::not(atom("Human", vec![var("$x")])), atom("Mortal", vec![var("$x")]));
        let fact = atom("Human", vec![con("socrates")]);

        let resolvents = resolve(&rule, &fact);
        assert_eq!(resolvents.len(), 1);
        assert_eq!(resolvents[0], atom("Mortal", vec![con("socrates")]));
    }

    #[test]
    fn negated_skolem_singleton_resolvent_is_contradiction() {
        let skolem = Formula::atom_named(Pred::skolem("x"), vec![con("a")]);
        let rule = Formula::or(Formula::not(skolem.clone()), atom("Q", vec![con("a")]));
        let fact = Formula::not(atom("Q", vec![con("a")]));

        assert_eq!(resolve(&rule, &fact), vec![Formula::Bottom]);
    }
}
