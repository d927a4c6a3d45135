//! The catalog of known problems.

use std::collections::HashSet;

use thiserror::Error;

use crate::checkup::problem::{self, Problem};
use crate::resources::ResourceKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate problem id in catalog: {0}")]
    DuplicateId(String),

    #[error("unknown problem id: {0}")]
    UnknownId(String),
}

/// An immutable set of problems with unique ids, kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    problems: Vec<Problem>,
}

impl Catalog {
    pub fn new(problems: Vec<Problem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for p in &problems {
            if !seen.insert(p.id) {
                return Err(CatalogError::DuplicateId(p.id.to_string()));
            }
        }
        Ok(Self { problems })
    }

    /// Every problem the checkup knows about.
    pub fn builtin() -> Self {
        Self {
            problems: vec![
                problem::POD_CRASH_LOOP_BACK_OFF,
                problem::POD_NOT_READY,
                problem::POD_IMAGE_PULL_BACK_OFF,
                problem::POD_OOM_KILLED,
                problem::POD_PENDING,
                problem::HIGH_RESTARTS,
                problem::MAXED_OUT_HPAS,
            ],
        }
    }

    /// Copy of this catalog with the named problems removed.
    pub fn without<S: AsRef<str>>(&self, ids: &[S]) -> Result<Self, CatalogError> {
        if let Some(unknown) = ids.iter().find(|id| self.get(id.as_ref()).is_none()) {
            return Err(CatalogError::UnknownId(unknown.as_ref().to_string()));
        }

        let problems = self
            .problems
            .iter()
            .filter(|p| !ids.iter().any(|id| id.as_ref() == p.id))
            .cloned()
            .collect();
        Ok(Self { problems })
    }

    pub fn get(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    /// Problems targeting `kind`, in declaration order.
    pub fn for_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(move |p| p.kind() == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.problems.iter()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
