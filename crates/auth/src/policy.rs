//! Route policy table.
//!
//! URL structure is enforceable data, not framework convention: every
//! protected path must match exactly one [`RoutePolicy`], and unmatched
//! paths are denied. The table is built once at startup and never mutated.

use std::collections::HashMap;

use serde::Serialize;

use staffgate_core::DomainError;

use crate::role::Role;

/// Name of the path parameter the ownership check reads.
pub const EMPLOYEE_ID_PARAM: &str = "employee_id";

/// Parameters captured from a matched path, keyed by placeholder name.
pub type PathParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Segment {
    Literal(String),
    /// `<name>` placeholder; matches exactly one segment and captures it.
    Param(String),
}

/// A slash-segmented route pattern such as
/// `/employees/<employee_id>/dashboard/`.
///
/// Matching is trailing-slash-insensitive and requires equal segment counts;
/// a placeholder never spans more than one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, DomainError> {
        if !pattern.starts_with('/') {
            return Err(DomainError::validation(format!(
                "route pattern must start with '/': {pattern:?}"
            )));
        }

        let mut segments = Vec::new();
        for part in pattern.split('/').filter(|p| !p.is_empty()) {
            if let Some(name) = part.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
                if name.is_empty() {
                    return Err(DomainError::validation(format!(
                        "empty placeholder in route pattern: {pattern:?}"
                    )));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of literal segments; the specificity rank for table ordering.
    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Match a concrete request path, capturing placeholder values.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

/// Record-ownership constraint attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipRule {
    /// No ownership constraint.
    None,
    /// The captured `employee_id` must equal the caller's linked employee
    /// id. Roles listed in `exempt` may reach any employee's records; the
    /// exemption is explicit table data, never a role special case in code.
    SelfOnly { exempt: Vec<Role> },
}

impl OwnershipRule {
    pub fn hr_exempt() -> Self {
        Self::SelfOnly {
            exempt: vec![Role::Hr],
        }
    }
}

/// One row of the route policy table.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePolicy {
    pub pattern: RoutePattern,
    pub allowed_roles: Vec<Role>,
    pub ownership: OwnershipRule,
}

impl RoutePolicy {
    pub fn new(
        pattern: &str,
        allowed_roles: &[Role],
        ownership: OwnershipRule,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            allowed_roles: allowed_roles.to_vec(),
            ownership,
        })
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// The ordered policy table. Default-deny: a path matching no row is
/// forbidden regardless of role.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyTable {
    policies: Vec<RoutePolicy>,
}

impl PolicyTable {
    /// Build a table; rows are ordered most-specific-first (literal segment
    /// count, then total segment count), so overlapping patterns resolve to
    /// the single most specific match.
    pub fn new(mut policies: Vec<RoutePolicy>) -> Self {
        policies.sort_by_key(|p| {
            (
                core::cmp::Reverse(p.pattern.literal_count()),
                core::cmp::Reverse(p.pattern.segments.len()),
            )
        });
        Self { policies }
    }

    /// The standard application route table.
    ///
    /// HR is exempt from the ownership check on employee detail routes so
    /// directory browsing works; super admin is deliberately absent from
    /// every data route (provisioning authority only).
    pub fn standard() -> Self {
        const ALL: &[Role] = &[Role::SuperAdmin, Role::Hr, Role::Employee];
        const HR: &[Role] = &[Role::Hr];
        const SUPER: &[Role] = &[Role::SuperAdmin];
        const EMPLOYEE_TABS: &[&str] = &[
            "dashboard",
            "general",
            "job",
            "payroll",
            "payslips",
            "documents",
            "attendance",
            "schedule",
        ];
        const MANAGE_TABS: &[&str] = &["general", "job", "payroll", "documents"];

        let mut rows = vec![
            RoutePolicy::new("/", ALL, OwnershipRule::None),
            RoutePolicy::new("/change-password/", ALL, OwnershipRule::None),
            RoutePolicy::new("/admin/", SUPER, OwnershipRule::None),
            RoutePolicy::new("/hr/create/", SUPER, OwnershipRule::None),
            RoutePolicy::new("/employees/directory/", HR, OwnershipRule::None),
            RoutePolicy::new("/employees/onboarding/", HR, OwnershipRule::None),
            RoutePolicy::new(
                "/employees/<employee_id>/payslips/<payroll_id>/",
                &[Role::Hr, Role::Employee],
                OwnershipRule::hr_exempt(),
            ),
        ];

        for tab in EMPLOYEE_TABS {
            rows.push(RoutePolicy::new(
                &format!("/employees/<employee_id>/{tab}/"),
                &[Role::Hr, Role::Employee],
                OwnershipRule::hr_exempt(),
            ));
        }
        for tab in MANAGE_TABS {
            rows.push(RoutePolicy::new(
                &format!("/manage/employees/<employee_id>/{tab}/"),
                HR,
                OwnershipRule::None,
            ));
        }

        // Patterns are compile-time constants; a parse failure is a bug.
        let rows = rows
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .expect("standard policy table patterns are valid");
        Self::new(rows)
    }

    /// Find the most specific policy matching a path.
    pub fn match_path(&self, path: &str) -> Option<(&RoutePolicy, PathParams)> {
        self.policies
            .iter()
            .find_map(|p| p.pattern.match_path(path).map(|params| (p, params)))
    }

    pub fn policies(&self) -> &[RoutePolicy] {
        &self.policies
    }
}
