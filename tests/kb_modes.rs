//! Table-driven checks that the resolution-mode and model-checking-mode knowledge bases
//! agree on the same finite-domain problems (§9: "the model checker is the ground truth").

use rstest::rstest;
use rsproof::{create_model_checking_kb, create_resolution_kb, AskOutcome, Const, Formula, KnowledgeBase, Status, Term, Var};

fn atom(name: &str, args: Vec<Term>) -> Formula {
    Formula::atom(name, args).unwrap()
}

fn var(name: &str) -> Term {
    Term::Variable(Var::new(name).unwrap())
}

fn con(name: &str) -> Term {
    Term::Constant(Const::new(name).unwrap())
}

fn status_of(mut kb: KnowledgeBase, axioms: &[Formula], query: &Formula) -> Status {
    for axiom in axioms {
        kb.tell(axiom).unwrap();
    }
    match kb.ask(query).unwrap() {
        AskOutcome::Answer(response) => response.status,
        AskOutcome::Bindings(_) => panic!("expected a direct answer"),
    }
}

#[rstest]
#[case::modus_ponens(
    vec![
        Formula::forall(Var::new("$x").unwrap(), Formula::implies(atom("Human", vec![var("$x")]), atom("Mortal", vec![var("$x")]))),
        atom("Human", vec![con("socrates")]),
    ],
    atom("Mortal", vec![con("socrates")]),
    Status::Entailment,
)]
#[case::direct_contradiction(
    vec![atom("P", vec![con("a")])],
    Formula::not(atom("P", vec![con("a")])),
    Status::Contradiction,
)]
#[case::unrelated_fact(
    vec![atom("Red", vec![con("apple")])],
    atom("Red", vec![con("banana")]),
    Status::Contingent,
)]
fn resolution_and_model_checking_agree(#[case] axioms: Vec<Formula>, #[case] query: Formula, #[case] expected: Status) {
    assert_eq!(status_of(create_resolution_kb(), &axioms, &query), expected);
    assert_eq!(status_of(create_model_checking_kb(), &axioms, &query), expected);
}
