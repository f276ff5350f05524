//! User management: staff accounts with a role and an account status.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::entity::{Record, RecordId};
use crate::manager::{ManagerError, RecordManager};
use crate::notify::Notifier;
use crate::schema::form::{FormData, FromForm, IntoForm};
use crate::schema::ValidationErrors;
use crate::view::{GroupStats, SortKey};
use crate::Entity;

crate::choice! {
    pub enum UserRole {
        Admin => "admin",
        Manager => "manager",
        Analyst => "analyst",
        Viewer => "viewer",
    }
}

crate::choice! {
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

impl UserStatus {
    /// Past-tense verb used when a user is moved into this status.
    fn verb(self) -> &'static str {
        match self {
            UserStatus::Active => "activated",
            UserStatus::Inactive => "deactivated",
            UserStatus::Suspended => "suspended",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "users", noun = "User")]
pub struct User {
    #[entity(required, min_len = 2, search)]
    pub name: String,
    #[entity(required, email, search)]
    pub email: String,
    pub role: UserRole,
    #[entity(required, search)]
    pub department: String,
    pub status: UserStatus,
    #[entity(preserve)]
    #[serde(default)]
    pub last_login: Option<SystemTime>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        department: impl Into<String>,
    ) -> Self {
        User {
            name: name.into(),
            email: email.into(),
            role,
            department: department.into(),
            status: UserStatus::Active,
            last_login: None,
        }
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_last_login(mut self, at: SystemTime) -> Self {
        self.last_login = Some(at);
        self
    }
}

crate::choice! {
    pub enum UserSort {
        Name => "name",
        Email => "email",
        Role => "role",
        Department => "department",
        Status => "status",
        LastLogin => "last_login",
    }
}

impl SortKey<User> for UserSort {
    fn compare(&self, a: &User, b: &User) -> Ordering {
        match self {
            UserSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            UserSort::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
            UserSort::Role => a.role.cmp(&b.role),
            UserSort::Department => a.department.cmp(&b.department),
            UserSort::Status => a.status.cmp(&b.status),
            // never-logged-in sorts first
            UserSort::LastLogin => a.last_login.cmp(&b.last_login),
        }
    }
}

/// Account administration on a manager of users.
pub trait UserDirectory {
    /// Move a user to `status`. Setting the current status again is a no-op
    /// that still reports success.
    fn set_status(
        &mut self,
        id: RecordId,
        status: UserStatus,
    ) -> Result<&Record<User>, ManagerError>;

    fn role_counts(&self) -> BTreeMap<UserRole, GroupStats>;

    fn status_counts(&self) -> BTreeMap<UserStatus, GroupStats>;
}

impl<N: Notifier> UserDirectory for RecordManager<User, N> {
    fn set_status(
        &mut self,
        id: RecordId,
        status: UserStatus,
    ) -> Result<&Record<User>, ManagerError> {
        self.transition(id, status.verb(), |user| {
            user.status = status;
            Ok(())
        })
    }

    fn role_counts(&self) -> BTreeMap<UserRole, GroupStats> {
        self.view().group_by(|user| user.role)
    }

    fn status_counts(&self) -> BTreeMap<UserStatus, GroupStats> {
        self.view().group_by(|user| user.status)
    }
}

impl FromForm for User {
    fn from_form(form: &FormData) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let user = User {
            name: reader.text("name"),
            email: reader.text("email"),
            role: reader.choice("role"),
            department: reader.text("department"),
            status: reader.choice("status"),
            last_login: None,
        };
        reader.finish(user)
    }
}

impl IntoForm for User {
    fn to_form(&self) -> FormData {
        FormData::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("role", self.role.to_string())
            .with("department", self.department.as_str())
            .with("status", self.status.to_string())
    }
}

pub fn fixture() -> Vec<User> {
    use std::time::Duration;

    let day = Duration::from_secs(24 * 60 * 60);
    let seen = |days_ago: u32| SystemTime::now().checked_sub(day * days_ago);

    let mut users = vec![
        User::new("John Smith", "john.smith@attune.example", UserRole::Admin, "IT"),
        User::new("Sarah Johnson", "sarah.johnson@attune.example", UserRole::Manager, "Marketing"),
        User::new("Michael Chen", "michael.chen@attune.example", UserRole::Analyst, "Lending"),
        User::new("Emily Davis", "emily.davis@attune.example", UserRole::Viewer, "Member Services")
            .with_status(UserStatus::Inactive),
        User::new("Robert Wilson", "robert.wilson@attune.example", UserRole::Analyst, "Finance")
            .with_status(UserStatus::Suspended),
    ];
    for (user, days_ago) in users.iter_mut().zip([0, 1, 3, 45, 12]) {
        user.last_login = seen(days_ago);
    }
    users
}
