//! Access policy - role to capability mappings and branch scoping
//!
//! Pure functions shared by the client-side route guards and the
//! server-side query layer. Everything here is deterministic, performs
//! no I/O, and is independent of any stored session: callers pass the
//! role in.
//!
//! The role tables are exhaustive `match`es. Adding a role variant is a
//! compile error until every mapping site is updated, so there is no
//! "unknown role" path that silently grants or denies access.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Permission sentinel meaning "all permissions" (admin only).
///
/// Matching is exact: `"*"` is the only wildcard, there is no prefix
/// matching of any kind.
pub const WILDCARD: &str = "*";

/// Landing route for unauthenticated staff.
pub const STAFF_LOGIN_ROUTE: &str = "/";

/// Landing route for unauthenticated students.
pub const STUDENT_LOGIN_ROUTE: &str = "/student/login";

// =============================================================================
// Roles
// =============================================================================

/// Every identity role in the system, staff and student alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Receptionist,
    Trainer,
    Student,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: &'static [Role] = &[
        Role::Admin,
        Role::Manager,
        Role::Receptionist,
        Role::Trainer,
        Role::Student,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Receptionist => "receptionist",
            Role::Trainer => "trainer",
            Role::Student => "student",
        }
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown role string. Unknown roles never resolve to a capability set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "receptionist" => Ok(Role::Receptionist),
            "trainer" => Ok(Role::Trainer),
            "student" => Ok(Role::Student),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Staff-only subset of [`Role`].
///
/// Staff sessions carry a `StaffRole`, so a staff identity can never hold
/// the student role and the two identity spaces stay non-interchangeable
/// at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Manager,
    Receptionist,
    Trainer,
}

impl StaffRole {
    pub const ALL: &'static [StaffRole] = &[
        StaffRole::Admin,
        StaffRole::Manager,
        StaffRole::Receptionist,
        StaffRole::Trainer,
    ];

    pub const fn as_role(&self) -> Role {
        match self {
            StaffRole::Admin => Role::Admin,
            StaffRole::Manager => Role::Manager,
            StaffRole::Receptionist => Role::Receptionist,
            StaffRole::Trainer => Role::Trainer,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        self.as_role().as_str()
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self, StaffRole::Admin)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Role::from_str(s)? {
            Role::Admin => Ok(StaffRole::Admin),
            Role::Manager => Ok(StaffRole::Manager),
            Role::Receptionist => Ok(StaffRole::Receptionist),
            Role::Trainer => Ok(StaffRole::Trainer),
            // The student role never yields a staff identity.
            Role::Student => Err(UnknownRole(s.to_string())),
        }
    }
}

impl From<StaffRole> for Role {
    fn from(r: StaffRole) -> Self {
        r.as_role()
    }
}

impl TryFrom<Role> for StaffRole {
    type Error = UnknownRole;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Admin => Ok(StaffRole::Admin),
            Role::Manager => Ok(StaffRole::Manager),
            Role::Receptionist => Ok(StaffRole::Receptionist),
            Role::Trainer => Ok(StaffRole::Trainer),
            Role::Student => Err(UnknownRole(Role::Student.as_str().to_string())),
        }
    }
}

// =============================================================================
// Resources
// =============================================================================

/// Coarse page/data areas gated by role.
///
/// Distinct from permissions: resources gate whole pages, permissions
/// gate actions within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Dashboard,
    Students,
    Fees,
    Attendance,
    Trainers,
    Reports,
    Branches,
}

impl Resource {
    pub const ALL: &'static [Resource] = &[
        Resource::Dashboard,
        Resource::Students,
        Resource::Fees,
        Resource::Attendance,
        Resource::Trainers,
        Resource::Reports,
        Resource::Branches,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Students => "students",
            Resource::Fees => "fees",
            Resource::Attendance => "attendance",
            Resource::Trainers => "trainers",
            Resource::Reports => "reports",
            Resource::Branches => "branches",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Permission tokens
// =============================================================================

/// Permission string constants.
///
/// Opaque tokens of the form `<resource>.<action>`; the dot carries no
/// matching semantics (see [`has_permission`]).
pub mod perm {
    pub const STUDENTS_READ: &str = "students.read";
    pub const STUDENTS_WRITE: &str = "students.write";
    pub const TRAINERS_READ: &str = "trainers.read";
    pub const TRAINERS_WRITE: &str = "trainers.write";
    pub const ATTENDANCE_READ: &str = "attendance.read";
    pub const ATTENDANCE_WRITE: &str = "attendance.write";
    pub const FEES_READ: &str = "fees.read";
    pub const FEES_WRITE: &str = "fees.write";
    pub const REPORTS_READ: &str = "reports.read";
    pub const BRANCHES_READ: &str = "branches.read";
    pub const BRANCHES_WRITE: &str = "branches.write";
    pub const PORTAL_READ: &str = "portal.read";
}

const ADMIN_PERMISSIONS: &[&str] = &[WILDCARD];

const MANAGER_PERMISSIONS: &[&str] = &[
    perm::STUDENTS_READ,
    perm::STUDENTS_WRITE,
    perm::TRAINERS_READ,
    perm::TRAINERS_WRITE,
    perm::ATTENDANCE_READ,
    perm::ATTENDANCE_WRITE,
    perm::FEES_READ,
    perm::FEES_WRITE,
    perm::REPORTS_READ,
    perm::BRANCHES_READ,
];

const RECEPTIONIST_PERMISSIONS: &[&str] = &[
    perm::STUDENTS_READ,
    perm::STUDENTS_WRITE,
    perm::TRAINERS_READ,
    perm::ATTENDANCE_READ,
    perm::ATTENDANCE_WRITE,
    perm::FEES_READ,
    perm::FEES_WRITE,
];

const TRAINER_PERMISSIONS: &[&str] = &[
    perm::STUDENTS_READ,
    perm::ATTENDANCE_READ,
    perm::ATTENDANCE_WRITE,
];

const STUDENT_PERMISSIONS: &[&str] = &[perm::PORTAL_READ];

/// Permission set for a role.
///
/// Admin gets the `"*"` sentinel; every other role gets a fixed finite
/// set. Total over the role enum.
pub const fn permissions_for(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => ADMIN_PERMISSIONS,
        Role::Manager => MANAGER_PERMISSIONS,
        Role::Receptionist => RECEPTIONIST_PERMISSIONS,
        Role::Trainer => TRAINER_PERMISSIONS,
        Role::Student => STUDENT_PERMISSIONS,
    }
}

/// True iff the role's set contains `"*"` or `permission` exactly.
pub fn has_permission(role: Role, permission: &str) -> bool {
    permissions_for(role)
        .iter()
        .any(|p| *p == WILDCARD || *p == permission)
}

const MANAGER_RESOURCES: &[Resource] = &[
    Resource::Dashboard,
    Resource::Students,
    Resource::Trainers,
    Resource::Attendance,
    Resource::Fees,
    Resource::Reports,
];

const RECEPTIONIST_RESOURCES: &[Resource] = &[
    Resource::Dashboard,
    Resource::Students,
    Resource::Attendance,
    Resource::Fees,
];

const TRAINER_RESOURCES: &[Resource] = &[
    Resource::Dashboard,
    Resource::Students,
    Resource::Attendance,
];

/// Resource set for a role.
///
/// Admin reports the full list, but admin access never depends on this
/// table: [`can_access`] special-cases the admin role before consulting
/// it. Students have no staff resources (the portal is a separate
/// identity space).
pub const fn resources_for(role: Role) -> &'static [Resource] {
    match role {
        Role::Admin => Resource::ALL,
        Role::Manager => MANAGER_RESOURCES,
        Role::Receptionist => RECEPTIONIST_RESOURCES,
        Role::Trainer => TRAINER_RESOURCES,
        Role::Student => &[],
    }
}

/// Page-level gate: admin always passes, everyone else by table lookup.
pub fn can_access(role: Role, resource: Resource) -> bool {
    if role.is_admin() {
        return true;
    }
    resources_for(role).contains(&resource)
}

/// Default landing route after login, total over the role enum.
///
/// There is deliberately no fallback arm: an unparseable role string
/// never reaches this function (it fails [`Role::from_str`] upstream and
/// the caller treats it as "no session", landing on
/// [`STAFF_LOGIN_ROUTE`]).
pub const fn default_route_for(role: Role) -> &'static str {
    match role {
        Role::Admin => "/dashboard/admin",
        Role::Manager => "/dashboard/manager",
        Role::Receptionist => "/dashboard/receptionist",
        Role::Trainer => "/dashboard/trainer",
        Role::Student => "/portal",
    }
}

// =============================================================================
// Actor and branch scoping
// =============================================================================

/// An authenticated identity as seen by the scoping layer.
///
/// Admins carry no branch (global scope); every other role has exactly
/// one branch. [`Actor::validate`] enforces the shape; server middleware
/// rejects tokens that fail it before any query runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
    pub branch_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorError {
    #[error("actor id is empty")]
    MissingId,
    #[error("non-admin actor has no branch")]
    MissingBranch,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role, branch_id: Option<i64>) -> Self {
        Self {
            id: id.into(),
            role,
            branch_id,
        }
    }

    /// Shape check: `id` present, and a branch for every non-admin role.
    pub fn validate(&self) -> Result<(), ActorError> {
        if self.id.trim().is_empty() {
            return Err(ActorError::MissingId);
        }
        if !self.role.is_admin() && self.branch_id.is_none() {
            return Err(ActorError::MissingBranch);
        }
        Ok(())
    }

    /// See [`scope_filter`].
    pub fn scope(&self) -> Option<i64> {
        scope_filter(self)
    }
}

/// Branch narrowing contract for every list/aggregate read and every
/// write: `None` means "no restriction" and is returned for admins only;
/// any other role is narrowed to its own branch.
///
/// Every repository query that touches branch-partitioned data must AND
/// the returned branch id into its predicate.
pub fn scope_filter(actor: &Actor) -> Option<i64> {
    match actor.role {
        Role::Admin => None,
        _ => actor.branch_id,
    }
}
