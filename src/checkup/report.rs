//! Aggregation of resource records into a report grouped by problem and by
//! severity.

use std::collections::HashSet;

use crate::checkup::catalog::Catalog;
use crate::checkup::problem::Problem;

/// Severity of a record.
///
/// Rendering order is [`Severity::ALL`]: errors before warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The problem is actively occurring.
    Error,
    /// Not harmful right now, e.g. it happened recently.
    Warning,
}

impl Severity {
    pub const ALL: [Severity; 2] = [Severity::Error, Severity::Warning];

    pub fn from_warning(is_warning: bool) -> Self {
        if is_warning {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One occurrence of a problem on one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// `<namespace>/<name>`
    pub resource_name: String,
    /// Owning team, empty when unknown.
    pub owner: String,
    /// e.g. `pod`, `HPA`
    pub resource_type: String,
    pub problem_id: String,
    pub detail: String,
    /// Set for problems that are not causing harm right now.
    pub is_warning: bool,
}

impl ResourceRecord {
    pub fn severity(&self) -> Severity {
        Severity::from_warning(self.is_warning)
    }
}

/// Whether a run found anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    ProblemsFound,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::ProblemsFound => 1,
        }
    }
}

/// Records sharing a problem id, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemGroup<'a> {
    pub problem_id: &'a str,
    pub records: Vec<&'a ResourceRecord>,
}

/// Records split by severity, each bucket grouped by problem id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeverityIndex<'a> {
    pub errors: Vec<ProblemGroup<'a>>,
    pub warnings: Vec<ProblemGroup<'a>>,
}

impl<'a> SeverityIndex<'a> {
    pub fn bucket(&self, severity: Severity) -> &[ProblemGroup<'a>] {
        match severity {
            Severity::Error => &self.errors,
            Severity::Warning => &self.warnings,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<ProblemGroup<'a>> {
        match severity {
            Severity::Error => &mut self.errors,
            Severity::Warning => &mut self.warnings,
        }
    }
}

/// Append `record` to its group in `groups`, creating the group on first sight.
fn push_grouped<'a>(groups: &mut Vec<ProblemGroup<'a>>, record: &'a ResourceRecord) {
    match groups
        .iter_mut()
        .find(|g| g.problem_id == record.problem_id)
    {
        Some(group) => group.records.push(record),
        None => groups.push(ProblemGroup {
            problem_id: &record.problem_id,
            records: vec![record],
        }),
    }
}

/// A completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    problems: Vec<Problem>,
    records: Vec<ResourceRecord>,
}

impl Report {
    /// Build a report from the records of a scan.
    ///
    /// `problems` holds each distinct problem id once, in order of first
    /// appearance. Ids the catalog does not know are left out of `problems`;
    /// their records are kept.
    pub fn build(records: Vec<ResourceRecord>, catalog: &Catalog) -> Self {
        let mut seen = HashSet::new();
        let mut problems = Vec::new();

        for record in &records {
            if !seen.insert(record.problem_id.as_str()) {
                continue;
            }
            match catalog.get(&record.problem_id) {
                Some(problem) => problems.push(problem.clone()),
                None => tracing::debug!(id = %record.problem_id, "record references unknown problem"),
            }
        }

        Self { problems, records }
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    pub fn problem(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn is_clean(&self) -> bool {
        self.records.is_empty()
    }

    pub fn outcome(&self) -> Outcome {
        if self.is_clean() {
            Outcome::Clean
        } else {
            Outcome::ProblemsFound
        }
    }

    /// Records grouped per problem, groups in `problems` order.
    pub fn by_problem(&self) -> Vec<ProblemGroup<'_>> {
        self.problems
            .iter()
            .map(|problem| ProblemGroup {
                problem_id: problem.id,
                records: self
                    .records
                    .iter()
                    .filter(|r| r.problem_id == problem.id)
                    .collect(),
            })
            .collect()
    }

    /// Records routed by severity in a single pass, then grouped per problem
    /// in order of first appearance within each bucket.
    pub fn by_severity(&self) -> SeverityIndex<'_> {
        let mut index = SeverityIndex::default();
        for record in &self.records {
            push_grouped(index.bucket_mut(record.severity()), record);
        }
        index
    }
}
