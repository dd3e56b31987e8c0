use std::fmt;

/// A required argument was missing or empty.
///
/// The display form matches the message callers have always seen, e.g.
/// `slug is required.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} is required.")]
pub struct ValidationError {
    pub field: &'static str,
}

impl ValidationError {
    pub const fn missing(field: &'static str) -> Self {
        Self { field }
    }
}

/// Fail with a [`ValidationError`] when `value` is empty.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    WidgetArea,
    Widget,
}

impl RegistrationKind {
    fn noun(self) -> &'static str {
        match self {
            RegistrationKind::WidgetArea => "widget area",
            RegistrationKind::Widget => "widget",
        }
    }

    fn title(self) -> &'static str {
        match self {
            RegistrationKind::WidgetArea => "Widget area",
            RegistrationKind::Widget => "Widget",
        }
    }
}

/// Non-fatal report that a slug was registered twice. The first
/// registration is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRegistration {
    pub kind: RegistrationKind,
    pub slug: String,
}

impl fmt::Display for DuplicateRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not register {} with slug \"{}\". {} \"{}\" is already registered.",
            self.kind.noun(),
            self.slug,
            self.kind.title(),
            self.slug
        )
    }
}

/// Outcome of a registration call that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered,
    Duplicate(DuplicateRegistration),
}

impl Registration {
    pub fn is_registered(&self) -> bool {
        matches!(self, Registration::Registered)
    }

    pub fn warning(&self) -> Option<&DuplicateRegistration> {
        match self {
            Registration::Registered => None,
            Registration::Duplicate(warning) => Some(warning),
        }
    }

    pub fn into_warning(self) -> Option<DuplicateRegistration> {
        match self {
            Registration::Registered => None,
            Registration::Duplicate(warning) => Some(warning),
        }
    }
}
