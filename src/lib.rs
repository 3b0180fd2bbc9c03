/// Construction-time error type.
pub mod error;

/// Lexically-validated variable, constant, and predicate names.
pub mod name;

/// Terms: variables and constants.
pub mod term;

/// Formulas: the boolean/quantifier half of the expression algebra.
pub mod formula;

/// Substitution and unification.
pub mod subst;

/// Clause-level literal reduction shared by the normalizer and the resolution engine.
pub mod clause;

/// The CNF normalizer.
pub mod cnf;

/// Derivation bookkeeping.
pub mod derivation;

/// Binary resolution.
pub mod resolution;

/// Propositionalization and the model checker.
pub mod propositional;

/// The knowledge base and its `tell`/`ask` query protocol.
pub mod kb;

pub use error::ConstructionError;
pub use formula::{all_constants, all_free_vars, anti_reflexive, flatten_and, flatten_or, Formula};
pub use kb::{create_model_checking_kb, create_resolution_kb, AskOutcome, KnowledgeBase, Response, Status};
pub use name::{Const, Pred, Var};
pub use propositional::Model;
pub use term::Term;
