//! End-to-end scenarios exercising `tell`/`ask` through the public surface.

use rsproof::{
    anti_reflexive, create_resolution_kb, AskOutcome, Const, Formula, Pred, Response, Status, Term, Var,
};

fn atom(name: &str, args: Vec<Term>) -> Formula {
    Formula::atom(name, args).unwrap()
}

fn var(name: &str) -> Term {
    Term::Variable(Var::new(name).unwrap())
}

fn con(name: &str) -> Term {
    Term::Constant(Const::new(name).unwrap())
}

fn answer(outcome: AskOutcome) -> Response {
    match outcome {
        AskOutcome::Answer(response) => response,
        AskOutcome::Bindings(_) => panic!("expected a direct answer, got a wh-query binding map"),
    }
}

#[test]
fn modus_ponens() {
    let mut kb = create_resolution_kb();
    kb.tell(&Formula::forall(
        Var::new("$x").unwrap(),
        Formula::implies(atom("Human", vec![var("$x")]), atom("Mortal", vec![var("$x")])),
    ))
    .unwrap();
    kb.tell(&atom("Human", vec![con("socrates")])).unwrap();

    let response = answer(kb.ask(&atom("Mortal", vec![con("socrates")])).unwrap());
    assert_eq!(response.status, Status::Entailment);
}

#[test]
fn unknown_fact_is_contingent() {
    let mut kb = create_resolution_kb();
    kb.tell(&atom("Red", vec![con("apple")])).unwrap();

    let response = answer(kb.ask(&atom("Red", vec![con("banana")])).unwrap());
    assert_eq!(response.status, Status::Contingent);
}

#[test]
fn direct_contradiction() {
    let mut kb = create_resolution_kb();
    kb.tell(&atom("P", vec![con("a")])).unwrap();

    let response = answer(kb.ask(&Formula::not(atom("P", vec![con("a")]))).unwrap());
    assert_eq!(response.status, Status::Contradiction);
}

#[test]
fn existential_via_skolemization() {
    let mut kb = create_resolution_kb();
    kb.tell(&Formula::exists(Var::new("$x").unwrap(), atom("Cat", vec![var("$x")]))).unwrap();
    kb.tell(&Formula::forall(
        Var::new("$x").unwrap(),
        Formula::implies(atom("Cat", vec![var("$x")]), atom("Animal", vec![var("$x")])),
    ))
    .unwrap();

    let response =
        answer(kb.ask(&Formula::exists(Var::new("$x").unwrap(), atom("Animal", vec![var("$x")]))).unwrap());
    assert_eq!(response.status, Status::Entailment);
}

#[test]
fn xor_chain() {
    let mut kb = create_resolution_kb();
    kb.tell(&Formula::xor(atom("A", vec![]), atom("B", vec![]))).unwrap();
    kb.tell(&atom("A", vec![])).unwrap();

    let response = answer(kb.ask(&Formula::not(atom("B", vec![]))).unwrap());
    assert_eq!(response.status, Status::Entailment);
}

#[test]
fn wh_query_over_ancestors() {
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
    let AskOutcome::Bindings(bindings) = outcome else { panic!("expected a wh-query binding map") };

    assert_eq!(answer(bindings[&Const::new("bob").unwrap()].clone()).status, Status::Entailment);
    assert_eq!(answer(bindings[&Const::new("carol").unwrap()].clone()).status, Status::Entailment);
}

#[test]
fn irreflexivity_helper() {
    let mut kb = create_resolution_kb();
    kb.tell(&anti_reflexive("Older").unwrap()).unwrap();

    // A relation declared anti-reflexive must still hold normally between distinct pairs.
    let response = answer(kb.ask(&atom("Older", vec![con("alice"), con("bob")])).unwrap());
    assert_eq!(response.status, Status::Contingent);

    let response = answer(kb.ask(&atom("Older", vec![con("alice"), con("alice")])).unwrap());
    assert_eq!(response.status, Status::Contradiction);
}

#[test]
fn skolem_prefix_is_reserved_for_the_normalizer() {
    assert!(Pred::new("SkolemWitness").is_err());
}
