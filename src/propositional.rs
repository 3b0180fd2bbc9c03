//! Propositionalization and the model checker (C5): the alternate KB mode where
//! resolution is replaced by explicit satisfaction search over a finite Herbrand universe.

use std::collections::{BTreeMap, BTreeSet};

use crate::formula::{all_constants, flatten_and, substitute_free_vars, Formula};
use crate::name::{Const, Pred};
use crate::term::Term;

/// A ground atom: a predicate applied to constants only.
pub type GroundAtom = (Pred, Vec<Const>);

/// An assignment of truth values to ground atoms that makes every input formula true,
/// represented as the set of atoms assigned `true` (every other mentioned atom is false).
pub type Model = BTreeSet<GroundAtom>;

/// The Herbrand universe: every constant mentioned across `forms`.
pub fn herbrand_universe(forms: &[Formula]) -> BTreeSet<Const> {
    forms.iter().flat_map(all_constants).collect()
}

/// Expands every quantifier in `form` over `universe`: `∀x.φ ⟹ ⋀_{c∈U} φ[x↦c]`,
/// `∃x.φ ⟹ ⋁_{c∈U} φ[x↦c]`.
pub fn propositionalize(form: &Formula, universe: &BTreeSet<Const>) -> Formula {
    match form {
        Formula::Forall(v, body) => Formula::and_list(
            universe
                .iter()
                .map(|c| substitute_free_vars(body, v, &Term::Constant(c.clone())))
                .map(|sub| propositionalize(&sub, universe)),
        ),
        Formula::Exists(v, body) => Formula::or_list(
            universe
                .iter()
                .map(|c| substitute_free_vars(body, v, &Term::Constant(c.clone())))
                .map(|sub| propositionalize(&sub, universe)),
        ),
        Formula::Not(a) => Formula::not(propositionalize(a, universe)),
        Formula::And(a, b) => Formula::and(propositionalize(a, universe), propositionalize(b, universe)),
        Formula::Or(a, b) => Formula::or(propositionalize(a, universe), propositionalize(b, universe)),
        Formula::Implies(a, b) => Formula::implies(propositionalize(a, universe), propositionalize(b, universe)),
        other => other.clone(),
    }
}

/// Simplifies a quantifier-free formula by evaluating `Equals(a,b)` to `⊤`/`⊥` and
/// propagating boolean absorption (`⊤∧x=x`, `⊥∧x=⊥`, `⊤∨x=⊤`, `⊥∨x=x`, …) bottom-up.
pub fn universal_interpret(form: &Formula) -> Formula {
    match form {
        Formula::Top | Formula::Bottom => form.clone(),
        Formula::Atom(pred, args) if *pred == Pred::equals() => {
            Formula::bool_of(args.len() == 2 && args[0] == args[1])
        }
        Formula::Atom(_, _) => form.clone(),
        Formula::Not(a) => match universal_interpret(a) {
            Formula::Top => Formula::Bottom,
            Formula::Bottom => Formula::Top,
            other => Formula::not(other),
        },
        Formula::And(a, b) => match (universal_interpret(a), universal_interpret(b)) {
            (Formula::Bottom, _) | (_, Formula::Bottom) => Formula::Bottom,
            (Formula::Top, x) | (x, Formula::Top) => x,
            (a, b) => Formula::and(a, b),
        },
        Formula::Or(a, b) => match (universal_interpret(a), universal_interpret(b)) {
            (Formula::Top, _) | (_, Formula::Top) => Formula::Top,
            (Formula::Bottom, x) | (x, Formula::Bottom) => x,
            (a, b) => Formula::or(a, b),
        },
        Formula::Implies(a, b) => match (universal_interpret(a), universal_interpret(b)) {
            (Formula::Bottom, _) | (_, Formula::Top) => Formula::Top,
            (Formula::Top, b) => b,
            (a, Formula::Bottom) => Formula::not(a),
            (a, b) => Formula::implies(a, b),
        },
        Formula::Forall(_, _) | Formula::Exists(_, _) => {
            unreachable!("universal_interpret expects an already-propositionalized formula")
        }
    }
}

fn ground_atom(pred: &Pred, args: &[Term]) -> GroundAtom {
    let consts = args
        .iter()
        .map(|t| t.as_constant().cloned().expect("ground atom has only constant arguments"))
        .collect();
    (pred.clone(), consts)
}

fn collect_ground_atoms(form: &Formula, out: &mut BTreeSet<GroundAtom>) {
    match form {
        Formula::Top | Formula::Bottom => {}
        Formula::Atom(pred, args) => {
            out.insert(ground_atom(pred, args));
        }
        Formula::Not(a) => collect_ground_atoms(a, out),
        Formula::And(a, b) | Formula::Or(a, b) | Formula::Implies(a, b) => {
            collect_ground_atoms(a, out);
            collect_ground_atoms(b, out);
        }
        Formula::Forall(_, _) | Formula::Exists(_, _) => {
            unreachable!("ground formulas carry no quantifiers")
        }
    }
}

fn interpret_form(form: &Formula, assignment: &BTreeMap<GroundAtom, bool>) -> bool {
    match form {
        Formula::Top => true,
        Formula::Bottom => false,
        Formula::Atom(pred, args) => assignment[&ground_atom(pred, args)],
        Formula::Not(a) => !interpret_form(a, assignment),
        Formula::And(a, b) => interpret_form(a, assignment) && interpret_form(b, assignment),
        Formula::Or(a, b) => interpret_form(a, assignment) || interpret_form(b, assignment),
        Formula::Implies(a, b) => !interpret_form(a, assignment) || interpret_form(b, assignment),
        Formula::Forall(_, _) | Formula::Exists(_, _) => {
            unreachable!("ground formulas carry no quantifiers")
        }
    }
}

/// Runs the §4.5 search: propositionalizes and interprets every formula in `forms`; if any
/// collapses to `⊥` there are no models. Otherwise searches for satisfying assignments of
/// the remaining ground atoms, in degree-heuristic order, returning either the first model
/// found or every model, per `find_all`.
pub fn find_models(forms: &[Formula], universe: &BTreeSet<Const>, find_all: bool) -> Vec<Model> {
    let mut ground_forms = Vec::new();
    for form in forms {
        match universal_interpret(&propositionalize(form, universe)) {
            Formula::Bottom => return Vec::new(),
            Formula::Top => continue,
            other => ground_forms.extend(flatten_and(&other)),
        }
    }

    if ground_forms.is_empty() {
        return vec![Model::new()];
    }

    let atoms_per_form: Vec<BTreeSet<GroundAtom>> = ground_forms
        .iter()
        .map(|f| {
            let mut set = BTreeSet::new();
            collect_ground_atoms(f, &mut set);
            set
        })
        .collect();

    let mut degree: BTreeMap<GroundAtom, usize> = BTreeMap::new();
    for set in &atoms_per_form {
        for atom in set {
            *degree.entry(atom.clone()).or_insert(0) += 1;
        }
    }

    let mut atoms: Vec<GroundAtom> = degree.keys().cloned().collect();
    atoms.sort_by(|a, b| {
        degree[b].cmp(&degree[a]).then_with(|| format_atom(a).cmp(&format_atom(b)))
    });

    let prefix_forms: Vec<Vec<usize>> = (0..atoms.len())
        .map(|i| {
            let allowed: BTreeSet<&GroundAtom> = atoms[..=i].iter().collect();
            atoms_per_form
                .iter()
                .enumerate()
                .filter(|(_, set)| set.iter().all(|a| allowed.contains(a)))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect();

    let mut models = Vec::new();
    let mut assignment = BTreeMap::new();
    let mut stop = false;
    search(&atoms, &prefix_forms, &ground_forms, find_all, 0, &mut assignment, &mut models, &mut stop);
    models
}

fn format_atom((pred, args): &GroundAtom) -> String {
    let mut s = pred.to_string();
    s.push('(');
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        s.push_str(a.as_str());
    }
    s.push(')');
    s
}

fn search(
    atoms: &[GroundAtom],
    prefix_forms: &[Vec<usize>],
    ground_forms: &[Formula],
    find_all: bool,
    i: usize,
    assignment: &mut BTreeMap<GroundAtom, bool>,
    models: &mut Vec<Model>,
    stop: &mut bool,
) {
    if *stop {
        return;
    }
    if i == atoms.len() {
        models.push(assignment.iter().filter(|&(_, &v)| v).map(|(a, _)| a.clone()).collect());
        if !find_all {
            *stop = true;
        }
        return;
    }

    for val in [false, true] {
        if *stop {
            break;
        }
        assignment.insert(atoms[i].clone(), val);
        let satisfied = prefix_forms[i].iter().all(|&idx| interpret_form(&ground_forms[idx], assignment));
        if satisfied {
            search(atoms, prefix_forms, ground_forms, find_all, i + 1, assignment, models, stop);
        }
    }
    if !*stop {
        assignment.remove(&atoms[i]);
    }
}
