//! The formula half of the expression algebra (C1). [`Term`](crate::term::Term) covers the
//! other half. Every constructor here either cannot fail (the boolean connectives, which
//! only combine already-valid formulas) or validates a name and returns a
//! [`ConstructionError`].

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::ops::{BitAnd, BitOr, Not as NotOp};
use std::rc::Rc;

use crate::error::ConstructionError;
use crate::name::{Const, Pred, Var};
use crate::term::{FreeVars, Term};

/// A first-order formula. `Top`/`Bottom` are the out-of-band `⊤`/`⊥` sentinels the CNF
/// normalizer and resolution engine produce; user-facing construction never needs them
/// directly, but they are public because callers inspect normalizer output.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub enum Formula {
    Top,
    Bottom,
    Atom(Pred, Vec<Term>),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Forall(Var, Box<Formula>),
    Exists(Var, Box<Formula>),
}

impl Formula {
    pub fn top() -> Formula {
        Formula::Top
    }

    pub fn bottom() -> Formula {
        Formula::Bottom
    }

    /// `⊤` if `value`, else `⊥`. Used by the model checker when collapsing `Equals`.
    pub fn bool_of(value: bool) -> Formula {
        if value {
            Formula::Top
        } else {
            Formula::Bottom
        }
    }

    /// Constructs `predName(args…)`, validating the predicate name.
    pub fn atom(pred: impl Into<String>, args: Vec<Term>) -> Result<Formula, ConstructionError> {
        Ok(Formula::Atom(Pred::new(pred)?, args))
    }

    pub fn atom_named(pred: Pred, args: Vec<Term>) -> Formula {
        Formula::Atom(pred, args)
    }

    pub fn not(arg: Formula) -> Formula {
        !arg
    }

    pub fn and(a: Formula, b: Formula) -> Formula {
        a & b
    }

    pub fn or(a: Formula, b: Formula) -> Formula {
        a | b
    }

    pub fn implies(a: Formula, b: Formula) -> Formula {
        Formula::Implies(Box::new(a), Box::new(b))
    }

    pub fn forall(var: Var, body: Formula) -> Formula {
        Formula::Forall(var, Box::new(body))
    }

    pub fn exists(var: Var, body: Formula) -> Formula {
        Formula::Exists(var, Box::new(body))
    }

    /// `Equiv(a,b) ≡ (a→b) ∧ (b→a)`. Normalizes away during implication elimination.
    pub fn equiv(a: Formula, b: Formula) -> Formula {
        Formula::and(
            Formula::implies(a.clone(), b.clone()),
            Formula::implies(b, a),
        )
    }

    /// `Xor(a,b) ≡ (a∨b) ∧ ¬(a∧b)`.
    pub fn xor(a: Formula, b: Formula) -> Formula {
        Formula::and(
            Formula::or(a.clone(), b.clone()),
            Formula::not(Formula::and(a, b)),
        )
    }

    /// The reserved `Equals(x,y)` atom, given its universal interpretation by
    /// [`crate::propositional::universal_interpret`].
    pub fn equals(x: Term, y: Term) -> Formula {
        Formula::Atom(Pred::equals(), vec![x, y])
    }

    /// `AndList([f1,…,fn])`: right-associated conjunction, `⊤` for an empty list.
    pub fn and_list(forms: impl IntoIterator<Item = Formula>) -> Formula {
        let mut forms: Vec<_> = forms.into_iter().collect();
        match forms.pop() {
            None => Formula::Top,
            Some(last) => forms.into_iter().rev().fold(last, |acc, f| Formula::and(f, acc)),
        }
    }

    /// `OrList([f1,…,fn])`: right-associated disjunction, `⊥` for an empty list.
    pub fn or_list(forms: impl IntoIterator<Item = Formula>) -> Formula {
        let mut forms: Vec<_> = forms.into_iter().collect();
        match forms.pop() {
            None => Formula::Bottom,
            Some(last) => forms.into_iter().rev().fold(last, |acc, f| Formula::or(f, acc)),
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Formula::Atom(_, _))
    }

    /// A literal is an atom or the negation of an atom.
    pub fn is_literal(&self) -> bool {
        match self {
            Formula::Atom(_, _) => true,
            Formula::Not(inner) => inner.is_atom(),
            _ => false,
        }
    }

    /// The complement of a literal: `Not(l)` for an atom `l`, or `l` for `Not(l)`.
    pub fn complement(&self) -> Formula {
        match self {
            Formula::Not(inner) => (**inner).clone(),
            other => Formula::not(other.clone()),
        }
    }

    pub fn as_atom(&self) -> Option<(&Pred, &[Term])> {
        match self {
            Formula::Atom(pred, args) => Some((pred, args)),
            _ => None,
        }
    }

    /// `true` iff this formula is the negation of an atom whose predicate carries the
    /// reserved `Skolem` prefix — the edge case in §4.4/§4.3 that the resolution engine
    /// and the CNF post-processor both treat as `⊥`.
    pub fn is_negated_skolem_atom(&self) -> bool {
        match self {
            Formula::Not(inner) => matches!(inner.as_ref(), Formula::Atom(pred, _) if pred.is_skolem()),
            _ => false,
        }
    }
}

impl BitAnd for Formula {
    type Output = Formula;

    fn bitand(self, rhs: Self) -> Self::Output {
        Formula::And(Box::new(self), Box::new(rhs))
    }
}

impl BitOr for Formula {
    type Output = Formula;

    fn bitor(self, rhs: Self) -> Self::Output {
        Formula::Or(Box::new(self), Box::new(rhs))
    }
}

impl NotOp for Formula {
    type Output = Formula;

    fn not(self) -> Self::Output {
        match self {
            Formula::Not(inner) => *inner,
            other => Formula::Not(Box::new(other)),
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Top => write!(f, "True"),
            Formula::Bottom => write!(f, "False"),
            Formula::Atom(pred, args) => {
                write!(f, "{pred}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
            Formula::Not(a) => write!(f, "Not({a})"),
            Formula::And(a, b) => write!(f, "And({a},{b})"),
            Formula::Or(a, b) => write!(f, "Or({a},{b})"),
            Formula::Implies(a, b) => write!(f, "Implies({a},{b})"),
            Formula::Forall(v, body) => write!(f, "Forall({v},{body})"),
            Formula::Exists(v, body) => write!(f, "Exists({v},{body})"),
        }
    }
}

impl FreeVars for Formula {
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        match self {
            Formula::Top | Formula::Bottom => None.into_iter().collect(),
            Formula::Atom(_, args) => args.free_vars(),
            Formula::Not(a) => a.free_vars(),
            Formula::And(a, b) | Formula::Or(a, b) | Formula::Implies(a, b) => (a, b).free_vars(),
            Formula::Forall(v, body) | Formula::Exists(v, body) => {
                let mut vars = body.free_vars::<Vec<_>>();
                vars.retain(|x| x != v);
                vars.into_iter().collect()
            }
        }
    }
}

/// Recursion along a spine of right-associated `And`s, the inverse of
/// [`Formula::and_list`]. `⊤` flattens to the empty list, matching the list-builder's
/// identity element.
pub fn flatten_and(form: &Formula) -> Vec<Formula> {
    match form {
        Formula::And(a, b) => {
            let mut out = flatten_and(a);
            out.extend(flatten_and(b));
            out
        }
        Formula::Top => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Recursion along a spine of right-associated `Or`s, the inverse of
/// [`Formula::or_list`]. `⊥` flattens to the empty list.
pub fn flatten_or(form: &Formula) -> Vec<Formula> {
    match form {
        Formula::Or(a, b) => {
            let mut out = flatten_or(a);
            out.extend(flatten_or(b));
            out
        }
        Formula::Bottom => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Every subexpression of `form`, `form` included, in pre-order.
pub fn all_subexpressions(form: &Formula) -> Vec<Formula> {
    let mut out = vec![form.clone()];
    match form {
        Formula::Top | Formula::Bottom | Formula::Atom(_, _) => {}
        Formula::Not(a) | Formula::Forall(_, a) | Formula::Exists(_, a) => {
            out.extend(all_subexpressions(a));
        }
        Formula::And(a, b) | Formula::Or(a, b) | Formula::Implies(a, b) => {
            out.extend(all_subexpressions(a));
            out.extend(all_subexpressions(b));
        }
    }
    out
}

/// All free variables of `form`, deduplicated. A thin wrapper around [`FreeVars`] kept
/// around because downstream components (§4.1) name it directly.
pub fn all_free_vars(form: &Formula) -> BTreeSet<Var> {
    form.free_vars()
}

/// Every [`Const`] mentioned anywhere in `form`.
pub fn all_constants(form: &Formula) -> BTreeSet<Const> {
    fn args_consts(args: &[Term], out: &mut BTreeSet<Const>) {
        for a in args {
            if let Term::Constant(c) = a {
                out.insert(c.clone());
            }
        }
    }

    let mut out = BTreeSet::new();
    for sub in all_subexpressions(form) {
        if let Formula::Atom(_, args) = &sub {
            args_consts(args, &mut out);
        }
    }
    out
}

/// Capture-avoiding replacement of every free occurrence of `var` by `replacement`.
/// Descent stops inside a quantifier that rebinds `var`, since occurrences under that
/// binder are no longer free.
pub fn substitute_free_vars(form: &Formula, var: &Var, replacement: &Term) -> Formula {
    match form {
        Formula::Top | Formula::Bottom => form.clone(),
        Formula::Atom(pred, args) => {
            let args = args
                .iter()
                .map(|a| match a {
                    Term::Variable(v) if v == var => replacement.clone(),
                    other => other.clone(),
                })
                .collect();
            Formula::Atom(pred.clone(), args)
        }
        Formula::Not(a) => Formula::Not(Box::new(substitute_free_vars(a, var, replacement))),
        Formula::And(a, b) => Formula::And(
            Box::new(substitute_free_vars(a, var, replacement)),
            Box::new(substitute_free_vars(b, var, replacement)),
        ),
        Formula::Or(a, b) => Formula::Or(
            Box::new(substitute_free_vars(a, var, replacement)),
            Box::new(substitute_free_vars(b, var, replacement)),
        ),
        Formula::Implies(a, b) => Formula::Implies(
            Box::new(substitute_free_vars(a, var, replacement)),
            Box::new(substitute_free_vars(b, var, replacement)),
        ),
        Formula::Forall(v, body) => {
            if v == var {
                form.clone()
            } else {
                Formula::Forall(v.clone(), Box::new(substitute_free_vars(body, var, replacement)))
            }
        }
        Formula::Exists(v, body) => {
            if v == var {
                form.clone()
            } else {
                Formula::Exists(v.clone(), Box::new(substitute_free_vars(body, var, replacement)))
            }
        }
    }
}

/// `AntiReflexive(predName)`: declares a binary predicate irreflexive, i.e.
/// `Forall($x, Forall($y, Implies(predName($x,$y), Not(Equals($x,$y)))))`. Sugar carried
/// over from the reference implementation's `AntiReflexive` helper; introduces no new
/// [`Formula`] variant. Routed through `Equals` rather than the simpler `Not(predName($x,$x))`
/// so the relation's irreflexivity actually exercises the reserved equality predicate,
/// matching what the reference implementation settled on over its own simpler first draft.
pub fn anti_reflexive(pred: impl Into<String>) -> Result<Formula, ConstructionError> {
    let x = Var::new("$x")?;
    let y = Var::new("$y")?;
    let pred = Pred::new(pred)?;
    Ok(Formula::forall(
        x.clone(),
        Formula::forall(
            y.clone(),
            Formula::implies(
                Formula::atom_named(pred, vec![Term::Variable(x.clone()), Term::Variable(y.clone())]),
                Formula::not(Formula::equals(Term::Variable(x), Term::Variable(y))),
            ),
        ),
    ))
}

/// Shared structural sharing point for clauses stored in a knowledge base; see
/// [`crate::derivation::Derivation`].
pub type SharedFormula = Rc<Formula>;
