use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt::{self, Display};

use crate::name::{Const, Var};

/// A term: either a variable or a constant. The language has no function symbols of
/// nonzero arity (see the crate's Non-goals); every Skolem witness is represented as a
/// fresh constant or a fresh predicate, never as a compound term.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub enum Term {
    Variable(Var),
    Constant(Const),
}

impl Term {
    pub fn variable(v: Var) -> Term {
        Term::Variable(v)
    }

    pub fn constant(c: Const) -> Term {
        Term::Constant(c)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Var> {
        match self {
            Term::Variable(v) => Some(v),
            Term::Constant(_) => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Const> {
        match self {
            Term::Constant(c) => Some(c),
            Term::Variable(_) => None,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{v}"),
            Term::Constant(c) => write!(f, "{c}"),
        }
    }
}

impl From<Var> for Term {
    fn from(v: Var) -> Self {
        Term::Variable(v)
    }
}

impl From<Const> for Term {
    fn from(c: Const) -> Self {
        Term::Constant(c)
    }
}

/// A value that has free [Var]s, collectible into any container. Mirrors the recursion
/// pattern used throughout this crate for traversing containers of subexpressions.
pub trait FreeVars {
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>;

    fn has_free_var(&self, v: &Var) -> bool {
        let vars: BTreeSet<Var> = self.free_vars();
        vars.contains(v)
    }
}

impl FreeVars for Term {
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        match self {
            Term::Variable(v) => Some(v.clone()).into_iter().collect(),
            Term::Constant(_) => None.into_iter().collect(),
        }
    }
}

impl<T> FreeVars for &T
where
    T: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        (*self).free_vars()
    }
}

impl<T> FreeVars for Box<T>
where
    T: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        self.as_ref().free_vars()
    }
}

impl<T> FreeVars for Option<T>
where
    T: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        self.iter().flat_map(|it| it.free_vars::<Vec<_>>()).collect()
    }
}

impl<T> FreeVars for Vec<T>
where
    T: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        self.iter().flat_map(|it| it.free_vars::<Vec<_>>()).collect()
    }
}

impl<T> FreeVars for VecDeque<T>
where
    T: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        self.iter().flat_map(|it| it.free_vars::<Vec<_>>()).collect()
    }
}

impl<T> FreeVars for BTreeSet<T>
where
    T: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        self.iter().flat_map(|it| it.free_vars::<Vec<_>>()).collect()
    }
}

impl<T> FreeVars for HashSet<T>
where
    T: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        self.iter().flat_map(|it| it.free_vars::<Vec<_>>()).collect()
    }
}

impl<T1, T2> FreeVars for (T1, T2)
where
    T1: FreeVars,
    T2: FreeVars,
{
    fn free_vars<A>(&self) -> A
    where
        A: FromIterator<Var>,
    {
        let l: Vec<Var> = self.0.free_vars();
        let r: Vec<Var> = self.1.free_vars();
        l.into_iter().chain(r).collect()
    }
}
