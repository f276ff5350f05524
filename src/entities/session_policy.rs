//! Password and session policy: one settings record, edited in place.

use serde::{Deserialize, Serialize};

use crate::entity::{RecordId, Seed};
use crate::manager::{ManagerConfig, ManagerError, RecordManager};
use crate::notify::{Notifier, Silent};
use crate::schema::form::{FormData, FromForm, IntoForm};
use crate::schema::ValidationErrors;
use crate::store::{RecordStore, StoreError};
use crate::Entity;

/// Id of the single policy record.
pub const POLICY_ID: RecordId = RecordId(1);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Entity)]
#[entity(collection = "session_policies", noun = "Security policy")]
#[serde(default)]
pub struct SessionPolicy {
    #[entity(required)]
    pub name: String,
    #[entity(min = 8, max = 64)]
    pub min_password_length: u32,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_numbers: bool,
    pub require_special: bool,
    /// 0 disables expiry.
    #[entity(min = 0, max = 365)]
    pub password_expiry_days: u32,
    /// How many previous passwords may not be reused.
    #[entity(min = 0, max = 24)]
    pub password_history: u32,
    pub require_mfa: bool,
    #[entity(min = 5, max = 480)]
    pub session_timeout_minutes: u32,
    #[entity(min = 3, max = 10)]
    pub max_login_attempts: u32,
    #[entity(min = 1, max = 1440)]
    pub lockout_minutes: u32,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionPolicy {
            name: "Password & session policy".to_string(),
            min_password_length: 12,
            require_uppercase: true,
            require_lowercase: true,
            require_numbers: true,
            require_special: true,
            password_expiry_days: 90,
            password_history: 5,
            require_mfa: true,
            session_timeout_minutes: 30,
            max_login_attempts: 5,
            lockout_minutes: 15,
        }
    }
}

impl SessionPolicy {
    /// Check a candidate password against the composition rules. Every
    /// unmet rule is reported under the `password` field.
    pub fn check_password(&self, password: &str) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let length = password.chars().count();
        if length < self.min_password_length as usize {
            errors.add(
                "password",
                format!("must be at least {} characters", self.min_password_length),
            );
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            errors.add("password", "must contain an uppercase letter");
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            errors.add("password", "must contain a lowercase letter");
        }
        if self.require_numbers && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.add("password", "must contain a number");
        }
        if self.require_special && !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
            errors.add("password", "must contain a special character");
        }
        errors.into_result()
    }

    /// Whether a password set `age_days` ago must be changed.
    pub fn password_expired(&self, age_days: u32) -> bool {
        self.password_expiry_days != 0 && age_days >= self.password_expiry_days
    }

    /// Whether `failed_attempts` consecutive failures lock the account.
    pub fn locks_out(&self, failed_attempts: u32) -> bool {
        failed_attempts >= self.max_login_attempts
    }
}

impl FromForm for SessionPolicy {
    fn from_form(form: &FormData) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let name = reader.text("name");
        let policy = SessionPolicy {
            name: if name.is_empty() {
                SessionPolicy::default().name
            } else {
                name
            },
            min_password_length: reader.number("min_password_length"),
            require_uppercase: reader.flag("require_uppercase"),
            require_lowercase: reader.flag("require_lowercase"),
            require_numbers: reader.flag("require_numbers"),
            require_special: reader.flag("require_special"),
            password_expiry_days: reader.number("password_expiry_days"),
            password_history: reader.number("password_history"),
            require_mfa: reader.flag("require_mfa"),
            session_timeout_minutes: reader.number("session_timeout_minutes"),
            max_login_attempts: reader.number("max_login_attempts"),
            lockout_minutes: reader.number("lockout_minutes"),
        };
        reader.finish(policy)
    }
}

impl IntoForm for SessionPolicy {
    fn to_form(&self) -> FormData {
        FormData::new()
            .with("name", self.name.as_str())
            .with("min_password_length", self.min_password_length.to_string())
            .with("require_uppercase", self.require_uppercase.to_string())
            .with("require_lowercase", self.require_lowercase.to_string())
            .with("require_numbers", self.require_numbers.to_string())
            .with("require_special", self.require_special.to_string())
            .with("password_expiry_days", self.password_expiry_days.to_string())
            .with("password_history", self.password_history.to_string())
            .with("require_mfa", self.require_mfa.to_string())
            .with("session_timeout_minutes", self.session_timeout_minutes.to_string())
            .with("max_login_attempts", self.max_login_attempts.to_string())
            .with("lockout_minutes", self.lockout_minutes.to_string())
    }
}

/// Editor for the single policy record.
///
/// Wraps a [`RecordManager`] holding exactly one record under [`POLICY_ID`];
/// there is no create or delete, only save and reset.
pub struct PolicyEditor<N = Silent> {
    manager: RecordManager<SessionPolicy, N>,
}

impl PolicyEditor<Silent> {
    pub fn new(policy: SessionPolicy) -> Result<Self, StoreError> {
        let store = RecordStore::from_seeds(vec![Seed::new(POLICY_ID.0, policy)])?;
        Ok(PolicyEditor {
            manager: RecordManager::new(store),
        })
    }
}

impl<N: Notifier> PolicyEditor<N> {
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> PolicyEditor<M> {
        PolicyEditor {
            manager: self.manager.with_notifier(notifier),
        }
    }

    pub fn with_config(self, config: ManagerConfig) -> Self {
        PolicyEditor {
            manager: self.manager.with_config(config),
        }
    }

    /// The policy in force.
    pub fn current(&self) -> Result<&SessionPolicy, StoreError> {
        Ok(&self.manager.store().require(POLICY_ID)?.fields)
    }

    /// Validate and replace the policy.
    pub fn save(&mut self, policy: SessionPolicy) -> Result<&SessionPolicy, ManagerError> {
        Ok(&self.manager.update(POLICY_ID, policy)?.fields)
    }

    pub fn submit(&mut self, form: &FormData) -> Result<&SessionPolicy, ManagerError> {
        Ok(&self.manager.submit_update(POLICY_ID, form)?.fields)
    }

    /// The settings form, pre-filled with the policy in force.
    pub fn form(&self) -> Result<FormData, StoreError> {
        Ok(self.current()?.to_form())
    }

    pub fn reset_to_defaults(&mut self) -> Result<&SessionPolicy, ManagerError> {
        self.save(SessionPolicy::default())
    }

    /// Check a password against the policy in force.
    pub fn check_password(&self, password: &str) -> Result<(), ManagerError> {
        Ok(self.current()?.check_password(password)?)
    }

    pub fn notifier(&self) -> &N {
        self.manager.notifier()
    }

    pub fn manager(&self) -> &RecordManager<SessionPolicy, N> {
        &self.manager
    }
}
