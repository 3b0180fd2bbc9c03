use thiserror::Error;

/// A failure raised by a fallible constructor in the expression algebra, or by the CNF
/// normalizer when it finds a formula that is not a closed sentence.
///
/// Construction errors are programming bugs: the caller passed a name or a formula that
/// violates a lexical or structural invariant. They are never recovered internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("variable name `{0}` must start with `$`")]
    InvalidVariableName(String),

    #[error("constant name `{0}` must start with a lowercase letter")]
    InvalidConstantName(String),

    #[error("predicate name `{0}` must start with an uppercase letter")]
    InvalidPredicateName(String),

    #[error("predicate name `{0}` uses the reserved `Skolem` prefix")]
    ReservedPredicatePrefix(String),

    #[error("free variable `{0}` encountered during standardization; formula is not a sentence")]
    FreeVariable(String),

    /// An assertion about the normalizer's own invariants failed. This indicates a bug in
    /// the normalizer, not bad caller input.
    #[error("internal error: {0}")]
    Internal(String),
}
