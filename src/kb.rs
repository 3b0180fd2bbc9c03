//! The knowledge base (C6): forward-chaining over stored derivations, driving the
//! three-valued `tell`/`ask` query protocol of §4.6.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::cnf::Normalizer;
use crate::derivation::{Derivation, DEFAULT_COST_CEILING};
use crate::error::ConstructionError;
use crate::formula::{all_constants, substitute_free_vars, Formula};
use crate::name::{Const, Var};
use crate::propositional::{self, Model};
use crate::resolution;
use crate::term::{FreeVars, Term};

/// Which engine drives forward-chaining: binary resolution over clausal form, or ground
/// model search over the raw asserted formulas. §4.6's two factories pick one at
/// construction time; a `KnowledgeBase` never switches modes afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Resolution,
    ModelChecking,
}

/// The three-valued verdict a query resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Entailment,
    Contradiction,
    Contingent,
}

/// The outcome of a single `tell` or `ask` call on a closed formula.
#[derive(Debug, Clone)]
pub struct Response {
    pub query: Formula,
    pub modifying: bool,
    pub status: Status,
    /// A witness model under which `query` holds. Only ever populated in model-checking
    /// mode; a resolution-mode KB never computes models and leaves this `None`.
    pub true_model: Option<Model>,
    /// A witness model under which `¬query` holds. Same mode restriction as `true_model`.
    pub false_model: Option<Model>,
}

/// The result of `ask` on a formula with free variables: one level of map nesting per
/// free variable, peeled off left to right in the order each is first encountered.
#[derive(Debug, Clone)]
pub enum AskOutcome {
    Answer(Response),
    Bindings(BTreeMap<Const, AskOutcome>),
}

/// A mapping from clause (canonical string) to its [`Derivation`], plus whatever
/// bookkeeping the active [`Mode`] needs. Single-threaded and synchronous throughout —
/// see §5; there is no nested transaction, so `ask` may not be called from inside `ask`.
pub struct KnowledgeBase {
    normalizer: Normalizer,
    derivations: BTreeMap<String, Derivation>,
    mode: Mode,
    cost_ceiling: u64,
    /// The current satisfying assignment, maintained only in model-checking mode.
    model: Option<Model>,
}

/// `createResolutionKB()`: standardization via the CNF normalizer, rules = `[Resolution]`,
/// no model checking.
pub fn create_resolution_kb() -> KnowledgeBase {
    KnowledgeBase {
        normalizer: Normalizer::new(),
        derivations: BTreeMap::new(),
        mode: Mode::Resolution,
        cost_ceiling: DEFAULT_COST_CEILING,
        model: None,
    }
}

/// `createModelCheckingKB()`: no standardization, no rules; every insertion re-runs a full
/// propositional model search over every clause currently held.
pub fn create_model_checking_kb() -> KnowledgeBase {
    KnowledgeBase {
        normalizer: Normalizer::new(),
        derivations: BTreeMap::new(),
        mode: Mode::ModelChecking,
        cost_ceiling: DEFAULT_COST_CEILING,
        model: None,
    }
}

impl KnowledgeBase {
    /// Overrides the derivation cost ceiling (default [`DEFAULT_COST_CEILING`]). Raising it
    /// trades completeness risk for run time; it is not a soundness parameter (§9).
    pub fn with_cost_ceiling(mut self, ceiling: u64) -> Self {
        self.cost_ceiling = ceiling;
        self
    }

    pub fn len(&self) -> usize {
        self.derivations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.derivations.is_empty()
    }

    /// Asserts `formula`. Commits on `ENTAILMENT` (no-op, already known) and `CONTINGENT`
    /// (every derivation touched while testing becomes permanent); rejects and rolls back
    /// on `CONTRADICTION`.
    pub fn tell(&mut self, formula: &Formula) -> Result<Response, ConstructionError> {
        tracing::info!(formula = %formula, "tell");
        let response = self.query(formula, true)?;
        tracing::info!(status = ?response.status, "tell result");
        Ok(response)
    }

    /// Queries `formula` without modifying the KB. A formula with free variables is
    /// answered one variable at a time: the first free variable encountered is
    /// substituted with every constant in the KB's current universe, and `ask` recurses
    /// on each instantiation.
    pub fn ask(&mut self, formula: &Formula) -> Result<AskOutcome, ConstructionError> {
        tracing::info!(formula = %formula, "ask");
        self.ask_inner(formula)
    }

    fn ask_inner(&mut self, formula: &Formula) -> Result<AskOutcome, ConstructionError> {
        match first_free_var(formula) {
            Some(var) => {
                let mut bindings = BTreeMap::new();
                for constant in self.constant_universe() {
                    let instantiated = substitute_free_vars(formula, &var, &Term::Constant(constant.clone()));
                    bindings.insert(constant, self.ask_inner(&instantiated)?);
                }
                Ok(AskOutcome::Bindings(bindings))
            }
            None => {
                let response = self.query(formula, false)?;
                tracing::info!(status = ?response.status, "ask result");
                Ok(AskOutcome::Answer(response))
            }
        }
    }

    /// The §4.6 state machine: try `¬φ` first; its failure (inconsistency) means `φ` was
    /// already entailed. Otherwise roll `¬φ` back and try `φ` independently; its failure
    /// means `φ` contradicts the KB. Otherwise `φ` is contingent, and the temporary
    /// derivations from the `φ` attempt are either committed (`tell`) or rolled back
    /// (`ask`).
    fn query(&mut self, formula: &Formula, commit: bool) -> Result<Response, ConstructionError> {
        let negated = Formula::not(formula.clone());

        if !self.add_axiom(&negated)? {
            self.remove_temporary();
            return Ok(Response {
                query: formula.clone(),
                modifying: commit,
                status: Status::Entailment,
                true_model: None,
                false_model: None,
            });
        }
        let false_model = self.current_model();
        // The ¬φ branch only tested satisfiability of KB ∪ {¬φ}; roll it back before
        // testing φ independently, or φ and ¬φ would trivially resolve to ⊥ every time.
        self.remove_temporary();

        if !self.add_axiom(formula)? {
            self.remove_temporary();
            return Ok(Response {
                query: formula.clone(),
                modifying: commit,
                status: Status::Contradiction,
                true_model: None,
                false_model,
            });
        }
        let true_model = self.current_model();

        if commit {
            self.commit_temporary();
        } else {
            self.remove_temporary();
        }
        Ok(Response {
            query: formula.clone(),
            modifying: commit,
            status: Status::Contingent,
            true_model,
            false_model,
        })
    }

    /// Adds `formula` as a new axiom. Returns `Ok(false)` if doing so makes the KB
    /// inconsistent (`⊥` derived), `Ok(true)` otherwise — including the no-op case where
    /// the clause was already known.
    fn add_axiom(&mut self, formula: &Formula) -> Result<bool, ConstructionError> {
        match self.mode {
            Mode::Resolution => {
                let clauses = self.normalizer.normalize(formula)?;
                if clauses == [Formula::Bottom] {
                    return Ok(false);
                }
                for clause in clauses {
                    if !self.add_derivation(Derivation::axiom(Rc::new(clause))) {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Mode::ModelChecking => {
                let key = formula.to_string();
                if self.derivations.contains_key(&key) {
                    return Ok(true);
                }
                self.derivations.insert(key.clone(), Derivation::axiom(Rc::new(formula.clone())));
                tracing::debug!(clause = %key, "inserting derivation");

                let all: Vec<Formula> = self.derivations.values().map(|d| (*d.formula).clone()).collect();
                let universe = propositional::herbrand_universe(&all);
                let models = propositional::find_models(&all, &universe, false);
                match models.into_iter().next() {
                    Some(model) => {
                        self.model = Some(model);
                        Ok(true)
                    }
                    None => {
                        tracing::warn!("model search found no satisfying assignment");
                        Ok(false)
                    }
                }
            }
        }
    }

    /// `addDerivation`: a no-op if the clause is already stored (rules are never re-run
    /// against an already-known clause); otherwise drops clauses above the cost ceiling
    /// (silently, per §7); otherwise stores the clause and fires resolution against every
    /// derivation already present. Each unordered pair of stored clauses is resolved
    /// exactly once this way: whichever of the two is inserted second is the one whose
    /// insertion scans back over the other, since the earlier one had no partner to scan
    /// against yet. There are no unary rules in this engine — `rules = [Resolution]` per
    /// §4.6's factory — so only the binary step applies.
    fn add_derivation(&mut self, derivation: Derivation) -> bool {
        let key = derivation.formula.to_string();
        if self.derivations.contains_key(&key) {
            return true;
        }
        if *derivation.formula == Formula::Bottom {
            tracing::warn!("bottom clause derived");
            self.derivations.insert(key, derivation);
            return false;
        }
        if derivation.cost > self.cost_ceiling {
            tracing::warn!(cost = derivation.cost, ceiling = self.cost_ceiling, clause = %key, "dropping clause: cost ceiling exceeded");
            return true;
        }

        tracing::debug!(clause = %key, cost = derivation.cost, "inserting derivation");
        let formula = derivation.formula.clone();
        let cost = derivation.cost;
        self.derivations.insert(key.clone(), derivation);

        let partner_keys: Vec<String> = self.derivations.keys().filter(|k| **k != key).cloned().collect();
        for partner_key in partner_keys {
            let Some(partner) = self.derivations.get(&partner_key) else { continue };
            let partner_formula = partner.formula.clone();
            let partner_cost = partner.cost;

            tracing::trace!(c1 = %key, c2 = %partner_key, "resolution attempt");
            for resolvent in resolution::resolve(&formula, &partner_formula) {
                let child = Derivation::rule_derived(
                    Rc::new(resolvent),
                    vec![formula.clone(), partner_formula.clone()],
                    cost + partner_cost,
                );
                if !self.add_derivation(child) {
                    return false;
                }
            }
        }
        true
    }

    fn remove_temporary(&mut self) {
        self.derivations.retain(|_, d| d.permanent);
    }

    fn commit_temporary(&mut self) {
        for d in self.derivations.values_mut() {
            d.permanent = true;
        }
    }

    fn current_model(&self) -> Option<Model> {
        match self.mode {
            Mode::ModelChecking => self.model.clone(),
            Mode::Resolution => None,
        }
    }

    /// The constants mentioned across every derivation currently held, used to ground
    /// wh-query free variables.
    fn constant_universe(&self) -> std::collections::BTreeSet<Const> {
        self.derivations.values().flat_map(|d| all_constants(&d.formula)).collect()
    }
}

/// The first variable encountered, in pre-order, that is actually free in `form` as a
/// whole — the basis for §4.6's "peel off one free variable per recursive step."
fn first_free_var(form: &Formula) -> Option<Var> {
    for sub in crate::formula::all_subexpressions(form) {
        if let Formula::Atom(_, args) = &sub {
            for arg in args {
                if let Term::Variable(v) = arg {
                    if form.has_free_var(v) {
                        return Some(v.clone());
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::formula::anti_reflexive;
    use crate::name::Pred;

    fn atom(name: &str, args: Vec<Term>) -> Formula {
        Formula::atom(name, args).unwrap()
    }

    fn var(name: &str) -> Term {
        Term::Variable(Var::new(name).unwrap())
    }

    fn con(name: &str) -> Term {
        Term::Constant(Const::new(name).unwrap())
    }

    fn status_of(outcome: AskOutcome) -> Status {
        match outcome {
            AskOutcome::Answer(r) => r.status,
            AskOutcome::Bindings(_) => panic!("expected a direct answer, got bindings"),
        }
    }

    #[test]
    fn modus_ponens_is_entailed() {
        let mut kb = create_resolution_kb();
        kb.tell(&Formula::forall(
            Var::new("$x").unwrap(),
            Formula::implies(atom("Human", vec![var("$x")]), atom("Mortal", vec![var("$x")])),
        ))
        .unwrap();
        kb.tell(&atom("Human", vec![con("socrates")])).unwrap();

        let outcome = kb.ask(&atom("Mortal", vec![con("socrates")])).unwrap();
        assert_eq!(status_of(outcome), Status::Entailment);
    }

    #[test]
    fn unrelated_fact_is_contingent() {
        let mut kb = create_resolution_kb();
        kb.tell(&atom("Red", vec![con("apple")])).unwrap();

        let outcome = kb.ask(&atom("Red", vec![con("banana")])).unwrap();
        assert_eq!(status_of(outcome), Status::Contingent);
    }

    #[test]
    fn direct_negation_is_a_contradiction() {
        let mut kb = create_resolution_kb();
        kb.tell(&atom("P", vec![con("a")])).unwrap();

        let outcome = kb.ask(&Formula::not(atom("P", vec![con("a")]))).unwrap();
        assert_eq!(status_of(outcome), Status::Contradiction);
    }

    #[test]
    fn existential_witness_survives_skolemization() {
        let mut kb = create_resolution_kb();
        kb.tell(&Formula::exists(Var::new("$x").unwrap(), atom("Cat", vec![var("$x")]))).unwrap();
        kb.tell(&Formula::forall(
            Var::new("$x").unwrap(),
            Formula::implies(atom("Cat", vec![var("$x")]), atom("Animal", vec![var("$x")])),
        ))
        .unwrap();

        let outcome = kb.ask(&Formula::exists(Var::new("$x").unwrap(), atom("Animal", vec![var("$x")]))).unwrap();
        assert_eq!(status_of(outcome), Status::Entailment);
    }

    #[test]
    fn xor_chain_determines_the_other_disjunct() {
        let mut kb = create_resolution_kb();
        kb.tell(&Formula::xor(atom("A", vec![]), atom("B", vec![]))).unwrap();
        kb.tell(&atom("A", vec![])).unwrap();

        let outcome = kb.ask(&Formula::not(atom("B", vec![]))).unwrap();
        assert_eq!(status_of(outcome), Status::Entailment);
    }

    #[test]
    fn wh_query_nests_one_level_per_free_variable() {
        let mut kb = create_resolution_kb();
        kb.tell(&atom("Parent", vec![con("alice"), con("bob")])).unwrap();
        kb.tell(&atom("Parent", vec![con("alice"), con("carol")])).unwrap();
        kb.tell(&Formula::forall(
            Var::new("$x").unwrap(),
            Formula::forall(
                Var::new("$y").unwrap(),
                Formula::implies(
                    atom("Parent", vec![var("$x"), var("$y")]),
                    atom("Ancestor", vec![var("$x"), var("$y")]),
                ),
            ),
        ))
        .unwrap();

        let outcome = kb.ask(&atom("Ancestor", vec![con("alice"), var("$z")])).unwrap();
        let AskOutcome::Bindings(bindings) = outcome else { panic!("expected bindings") };
        assert_eq!(status_of(bindings[&Const::new("bob").unwrap()].clone()), Status::Entailment);
        assert_eq!(status_of(bindings[&Const::new("carol").unwrap()].clone()), Status::Entailment);
    }

    #[test]
    fn anti_reflexive_predicate_rejects_self_pairs() {
        let mut kb = create_resolution_kb();
        kb.tell(&anti_reflexive("Older").unwrap()).unwrap();

        let outcome = kb.ask(&atom("Older", vec![con("alice"), con("alice")])).unwrap();
        assert_eq!(status_of(outcome), Status::Contradiction);
    }

    #[test]
    fn tautology_leaves_the_derivation_set_unchanged() {
        let mut kb = create_resolution_kb();
        let before = kb.len();
        kb.tell(&Formula::or(atom("P", vec![con("a")]), Formula::not(atom("P", vec![con("a")])))).unwrap();
        assert_eq!(kb.len(), before);
    }

    #[test]
    fn resolution_and_model_checking_agree_on_modus_ponens() {
        let axiom1 = Formula::forall(
            Var::new("$x").unwrap(),
            Formula::implies(atom("Human", vec![var("$x")]), atom("Mortal", vec![var("$x")])),
        );
        let axiom2 = atom("Human", vec![con("socrates")]);
        let query = atom("Mortal", vec![con("socrates")]);

        let mut resolution_kb = create_resolution_kb();
        resolution_kb.tell(&axiom1).unwrap();
        resolution_kb.tell(&axiom2).unwrap();

        let mut model_kb = create_model_checking_kb();
        model_kb.tell(&axiom1).unwrap();
        model_kb.tell(&axiom2).unwrap();

        assert_eq!(status_of(resolution_kb.ask(&query).unwrap()), status_of(model_kb.ask(&query).unwrap()));
    }

    #[test]
    fn equals_reflexivity_is_entailed_in_both_modes() {
        let t = con("socrates");
        let mut resolution_kb = create_resolution_kb();
        let outcome = resolution_kb.ask(&Formula::equals(t.clone(), t.clone())).unwrap();
        assert_eq!(status_of(outcome), Status::Entailment);

        let mut model_kb = create_model_checking_kb();
        let outcome = model_kb.ask(&Formula::equals(t.clone(), t)).unwrap();
        assert_eq!(status_of(outcome), Status::Entailment);
    }

    #[test]
    fn skolem_predicate_name_is_reserved() {
        assert!(Pred::new("SkolemFoo").is_err());
    }
}
