//! Derivation bookkeeping (part of C6's data model, §3): a record pairing a clause with
//! its provenance.

use std::rc::Rc;

use crate::formula::Formula;

/// The depth bound named in §9's Open Question. The source caps derivation cost at 100
/// with no justification; this crate keeps that default but makes it a field on
/// [`crate::kb::KnowledgeBase`] rather than a hardcoded constant, so completeness-vs-time
/// is a caller decision, not a silent one.
pub const DEFAULT_COST_CEILING: u64 = 100;

/// `{ formula, children[], cost, permanent, derived }` from §3. `cost` is 0 for
/// user-asserted clauses and `sum(children.cost) + 1` for rule-derived ones; `derived`
/// distinguishes the two. `permanent` distinguishes facts that survive a query from
/// speculative assertions made while evaluating `ask`.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub formula: Rc<Formula>,
    pub children: Vec<Rc<Formula>>,
    pub cost: u64,
    pub permanent: bool,
    pub derived: bool,
}

impl Derivation {
    /// A user-asserted clause: cost 0, not derived, not yet permanent.
    pub fn axiom(formula: Rc<Formula>) -> Self {
        Self { formula, children: Vec::new(), cost: 0, permanent: false, derived: false }
    }

    /// A clause produced by a rule from `children`, whose combined cost determines
    /// whether it survives the depth bound.
    pub fn rule_derived(formula: Rc<Formula>, children: Vec<Rc<Formula>>, parent_cost: u64) -> Self {
        Self { formula, children, cost: parent_cost + 1, permanent: false, derived: true }
    }
}
