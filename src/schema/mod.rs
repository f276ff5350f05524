//! Record schemas - field-local validation rules for one entity type.
//!
//! A schema is an ordered list of rules. Each rule reads one field through a
//! typed accessor and checks it against a [`Constraint`]. Validation runs
//! every rule and reports every failing field; a candidate is accepted only
//! when all rules pass.
//!
//! ```ignore
//! let schema = Schema::new("Stakeholder")
//!     .rule(FieldRule::text("name", |s: &Stakeholder| s.name.as_str(), Constraint::Required))
//!     .rule(FieldRule::number("alignment", |s: &Stakeholder| s.alignment as f64, Constraint::Range(0.0, 100.0)));
//!
//! schema.validate(&candidate)?;
//! ```

mod error;
pub mod form;

pub use error::{ValidationError, ValidationErrors};

/// A check applied to one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Text must contain something other than whitespace.
    Required,
    /// Text must have at least this many characters (after trimming).
    MinLen(usize),
    /// Text must have at most this many characters (after trimming).
    MaxLen(usize),
    /// Text must look like an email address.
    Email,
    /// Text must be one of the listed values.
    OneOf(&'static [&'static str]),
    Min(f64),
    Max(f64),
    /// Inclusive bounds.
    Range(f64, f64),
    /// A list must hold at least this many entries.
    MinItems(usize),
}

impl Constraint {
    fn check_text(&self, value: &str) -> Option<String> {
        let value = value.trim();
        let len = value.chars().count();
        match *self {
            Constraint::Required if value.is_empty() => Some("is required".to_string()),
            Constraint::MinLen(min) if len < min => {
                Some(format!("must be at least {} characters", min))
            }
            Constraint::MaxLen(max) if len > max => {
                Some(format!("must be at most {} characters", max))
            }
            Constraint::Email if !looks_like_email(value) => {
                Some("must be a valid email address".to_string())
            }
            Constraint::OneOf(allowed) if !allowed.contains(&value) => {
                Some(format!("must be one of: {}", allowed.join(", ")))
            }
            _ => None,
        }
    }

    fn check_number(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return Some("must be a finite number".to_string());
        }
        match *self {
            Constraint::Min(min) if value < min => Some(format!("must be at least {}", min)),
            Constraint::Max(max) if value > max => Some(format!("must be at most {}", max)),
            Constraint::Range(min, max) if value < min || value > max => {
                Some(format!("must be between {} and {}", min, max))
            }
            _ => None,
        }
    }

    fn check_count(&self, count: usize) -> Option<String> {
        match *self {
            Constraint::MinItems(min) if count < min => {
                if min == 1 {
                    Some("must include at least one entry".to_string())
                } else {
                    Some(format!("must include at least {} entries", min))
                }
            }
            _ => None,
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Typed read access to one field.
pub enum Accessor<T> {
    Text(fn(&T) -> &str),
    Number(fn(&T) -> f64),
    Count(fn(&T) -> usize),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessor<T> {}

/// A constraint bound to one named field.
pub struct FieldRule<T> {
    field: &'static str,
    accessor: Accessor<T>,
    constraint: Constraint,
    optional: bool,
}

impl<T> Clone for FieldRule<T> {
    fn clone(&self) -> Self {
        FieldRule {
            field: self.field,
            accessor: self.accessor,
            constraint: self.constraint,
            optional: self.optional,
        }
    }
}

impl<T> FieldRule<T> {
    pub fn text(field: &'static str, get: fn(&T) -> &str, constraint: Constraint) -> Self {
        FieldRule {
            field,
            accessor: Accessor::Text(get),
            constraint,
            optional: false,
        }
    }

    pub fn number(field: &'static str, get: fn(&T) -> f64, constraint: Constraint) -> Self {
        FieldRule {
            field,
            accessor: Accessor::Number(get),
            constraint,
            optional: false,
        }
    }

    pub fn count(field: &'static str, get: fn(&T) -> usize, constraint: Constraint) -> Self {
        FieldRule {
            field,
            accessor: Accessor::Count(get),
            constraint,
            optional: false,
        }
    }

    /// Skip this rule when the (text) field is blank.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn constraint(&self) -> Constraint {
        self.constraint
    }

    fn check(&self, candidate: &T) -> Option<String> {
        match self.accessor {
            Accessor::Text(get) => {
                let value = get(candidate);
                if self.optional && value.trim().is_empty() {
                    return None;
                }
                self.constraint.check_text(value)
            }
            Accessor::Number(get) => self.constraint.check_number(get(candidate)),
            Accessor::Count(get) => self.constraint.check_count(get(candidate)),
        }
    }
}

impl<T> std::fmt::Debug for FieldRule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("constraint", &self.constraint)
            .field("optional", &self.optional)
            .finish()
    }
}

/// Field rules for one entity type.
#[derive(Debug, Clone)]
pub struct Schema<T> {
    entity: &'static str,
    rules: Vec<FieldRule<T>>,
}

impl<T> Schema<T> {
    pub fn new(entity: &'static str) -> Self {
        Schema {
            entity,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: FieldRule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn rules(&self) -> &[FieldRule<T>] {
        &self.rules
    }

    /// Names of the fields this schema constrains, in rule order, deduplicated.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for rule in &self.rules {
            if !fields.contains(&rule.field) {
                fields.push(rule.field);
            }
        }
        fields
    }

    /// Check every rule. At most one message is reported per field: the
    /// first rule that fails for it.
    pub fn validate(&self, candidate: &T) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            if errors.has_field(rule.field) {
                continue;
            }
            if let Some(message) = rule.check(candidate) {
                errors.add(rule.field, message);
            }
        }
        errors.into_result()
    }
}
