//! Lexically-validated identifiers for the three disjoint name classes the algebra uses:
//! variables (`$x`), constants (`socrates`), and predicates (`Mortal`).

use std::fmt::{self, Display};
use std::rc::Rc;

use crate::error::ConstructionError;

const SKOLEM_PREFIX: &str = "Skolem";

fn rest_is_identifier(rest: &str) -> bool {
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The name of a bound or free variable. Always begins with `$`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct Var(Rc<str>);

impl Var {
    /// Validates and constructs a variable name. `raw` must include the leading `$`.
    pub fn new(raw: impl Into<String>) -> Result<Self, ConstructionError> {
        let raw = raw.into();
        let ok = raw.strip_prefix('$').is_some_and(|rest| {
            rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') && rest_is_identifier(rest)
        });
        if !ok {
            return Err(ConstructionError::InvalidVariableName(raw));
        }
        Ok(Self(raw.into()))
    }

    /// Constructs a fresh variable by appending `suffix` to this variable's base name,
    /// used by the CNF normalizer's standardization pass. The base name keeps its `$`.
    pub fn with_suffix(&self, suffix: u64) -> Var {
        Var(format!("{}_{}", self.0, suffix).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a constant. Always begins with a lowercase letter.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct Const(Rc<str>);

impl Const {
    pub fn new(raw: impl Into<String>) -> Result<Self, ConstructionError> {
        let raw = raw.into();
        let ok = raw.chars().next().is_some_and(|c| c.is_ascii_lowercase()) && rest_is_identifier(&raw);
        if !ok {
            return Err(ConstructionError::InvalidConstantName(raw));
        }
        Ok(Self(raw.into()))
    }

    /// Builds the fresh Herbrand constant used when Skolemizing an existential with no
    /// enclosing universals (no validation needed: `base` is always an already-valid
    /// variable's name stripped of its `$`).
    pub(crate) fn skolem_constant(base: &str) -> Const {
        Const(format!("skolem{base}").into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a predicate. Always begins with an uppercase letter. User code may not
/// introduce names starting with the reserved `Skolem` prefix; the normalizer is the only
/// thing allowed to mint those, via [`Pred::skolem`].
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct Pred(Rc<str>);

impl Pred {
    pub fn new(raw: impl Into<String>) -> Result<Self, ConstructionError> {
        let raw = raw.into();
        let ok = raw.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && rest_is_identifier(&raw);
        if !ok {
            return Err(ConstructionError::InvalidPredicateName(raw));
        }
        if raw.starts_with(SKOLEM_PREFIX) {
            return Err(ConstructionError::ReservedPredicatePrefix(raw));
        }
        Ok(Self(raw.into()))
    }

    /// Mints a Skolem predicate name from an already-standardized (globally unique)
    /// existential variable's base name. Only the CNF normalizer calls this.
    pub(crate) fn skolem(base: &str) -> Pred {
        Pred(format!("{SKOLEM_PREFIX}{base}").into())
    }

    /// The reserved predicate name carrying the built-in reflexive equality interpretation.
    pub fn equals() -> Pred {
        Pred(Rc::from("Equals"))
    }

    pub fn is_skolem(&self) -> bool {
        self.0.starts_with(SKOLEM_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
