use crate::core::package::DependencyKind;
use crate::core::version::{Version, VersionReq};
use crate::graph::{EdgeRef, PackagesGraph};

#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    pub origin: String,
    pub destination: String,
    pub constraint: VersionReq,
    pub actual_version: Version,
    pub violation_type: ViolationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    Unsatisfied,
    ExactPin,
    UpperBound,
}

impl ViolationType {
    pub fn label(&self) -> &'static str {
        match self {
            ViolationType::Unsatisfied => "unsatisfied",
            ViolationType::ExactPin => "exact-pin",
            ViolationType::UpperBound => "upper-bound",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub origin: String,
    pub destination: String,
    pub kinds: Vec<DependencyKind>,
    /// Dominant kind is one of the configured warning kinds.
    pub warn: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GraphReport {
    pub cycles: Vec<CycleReport>,
    pub violations: Vec<ConstraintViolation>,
}

impl GraphReport {
    pub fn is_clean(&self) -> bool {
        self.cycles.iter().all(|cycle| !cycle.warn) && self.violations.is_empty()
    }
}

pub fn check_graph(graph: &PackagesGraph<'_>, cycle_warning_kinds: &[DependencyKind]) -> GraphReport {
    let mut report = GraphReport::default();

    for edge in graph.edges() {
        if edge.is_cyclic() {
            let warn = edge
                .dominant_kind()
                .map(|kind| cycle_warning_kinds.contains(&kind))
                .unwrap_or(false);
            report.cycles.push(CycleReport {
                origin: edge.origin().name().to_string(),
                destination: edge.destination().name().to_string(),
                kinds: edge.kinds().to_vec(),
                warn,
            });
        }
        check_edge(&edge, &mut report.violations);
    }

    report
}

fn check_edge(edge: &EdgeRef<'_, '_>, violations: &mut Vec<ConstraintViolation>) {
    let constraint = edge.version_range();
    let actual = &edge.destination().package().version;
    let Some(req) = constraint.semver.as_ref() else {
        return;
    };
    let Some(actual_semver) = actual.semver.as_ref() else {
        return;
    };

    let violation = |violation_type| ConstraintViolation {
        origin: edge.origin().name().to_string(),
        destination: edge.destination().name().to_string(),
        constraint: constraint.clone(),
        actual_version: actual.clone(),
        violation_type,
    };

    if !req.matches(actual_semver) {
        violations.push(violation(ViolationType::Unsatisfied));
        return;
    }

    if is_exact_pin(req) {
        violations.push(violation(ViolationType::ExactPin));
    }

    if has_upper_bound(req) {
        violations.push(violation(ViolationType::UpperBound));
    }
}

pub fn fix_suggestion(violation: &ConstraintViolation) -> String {
    match violation.violation_type {
        ViolationType::Unsatisfied => format!(
            "update constraint to include {}",
            violation.actual_version.raw
        ),
        ViolationType::ExactPin => "relax exact pin to a range".to_string(),
        ViolationType::UpperBound => "consider widening upper bound".to_string(),
    }
}

fn is_exact_pin(req: &semver::VersionReq) -> bool {
    if req.comparators.len() != 1 {
        return false;
    }
    let comp = &req.comparators[0];
    if comp.op != semver::Op::Exact {
        return false;
    }
    comp.minor.is_some() && comp.patch.is_some()
}

fn has_upper_bound(req: &semver::VersionReq) -> bool {
    req.comparators
        .iter()
        .any(|comp| matches!(comp.op, semver::Op::Less | semver::Op::LessEq))
}
