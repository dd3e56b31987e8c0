// dashkit-core/src/area.rs
use crate::context::Prioritized;
use crate::error::{DuplicateRegistration, Registration, RegistrationKind, ValidationError, require};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Priority given to areas and widgets that don't set one
pub const DEFAULT_PRIORITY: i32 = 10;

/// How the widgets inside an area are framed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaStyle {
    /// Every widget gets its own box
    #[default]
    Boxes,
    /// One box surrounds all widgets of the area
    Composite,
}

impl AreaStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            AreaStyle::Boxes => "boxes",
            AreaStyle::Composite => "composite",
        }
    }
}

/// Opaque icon reference, resolved by whoever renders the area
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Icon(String);

impl Icon {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Settings passed to [`AreaStore::register`]. Only `title` is required.
#[derive(Debug, Clone, Default)]
pub struct AreaSettings {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub icon: Option<Icon>,
    pub priority: Option<i32>,
    pub style: Option<AreaStyle>,
}

impl AreaSettings {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn style(mut self, style: AreaStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// A registered widget area, settings merged with its slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetArea {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<Icon>,
    pub priority: i32,
    pub style: AreaStyle,
}

impl Prioritized for WidgetArea {
    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Widget area definitions keyed by slug. Entries are never replaced.
#[derive(Debug, Default)]
pub struct AreaStore {
    areas: HashMap<String, WidgetArea>,
}

impl AreaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        slug: &str,
        settings: AreaSettings,
    ) -> Result<Registration, ValidationError> {
        require(slug, "slug")?;
        let title = settings
            .title
            .filter(|title| !title.is_empty())
            .ok_or(ValidationError::missing("settings.title"))?;

        if self.areas.contains_key(slug) {
            let warning = DuplicateRegistration {
                kind: RegistrationKind::WidgetArea,
                slug: slug.to_string(),
            };
            tracing::warn!("{}", warning);
            return Ok(Registration::Duplicate(warning));
        }

        let area = WidgetArea {
            slug: slug.to_string(),
            title,
            subtitle: settings.subtitle,
            icon: settings.icon,
            priority: settings.priority.unwrap_or(DEFAULT_PRIORITY),
            style: settings.style.unwrap_or_default(),
        };
        tracing::debug!(slug, priority = area.priority, "registered widget area");
        self.areas.insert(slug.to_string(), area);

        Ok(Registration::Registered)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.areas.contains_key(slug)
    }

    pub fn get(&self, slug: &str) -> Option<&WidgetArea> {
        self.areas.get(slug)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_settings() -> AreaSettings {
        AreaSettings::titled("Your Site")
            .subtitle("Learn about your site!")
            .icon(Icon::new("sitekit-logo"))
            .priority(10)
            .style(AreaStyle::Boxes)
    }

    #[test]
    fn test_register_area() {
        let mut store = AreaStore::new();
        let outcome = store.register("header", header_settings()).unwrap();

        assert!(outcome.is_registered());
        assert!(store.contains("header"));
        assert_eq!(
            store.get("header"),
            Some(&WidgetArea {
                slug: "header".to_string(),
                title: "Your Site".to_string(),
                subtitle: Some("Learn about your site!".to_string()),
                icon: Some(Icon::new("sitekit-logo")),
                priority: 10,
                style: AreaStyle::Boxes,
            })
        );
    }

    #[test]
    fn test_register_multiple_areas() {
        let mut store = AreaStore::new();
        store
            .register("dashboard-header", header_settings())
            .unwrap();
        store
            .register(
                "dashboard-footer",
                AreaSettings::titled("Footer").priority(12),
            )
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("dashboard-footer").unwrap().priority, 12);
        assert_eq!(store.get("dashboard-header").unwrap().priority, 10);
    }

    #[test]
    fn test_default_priority_and_style() {
        let mut store = AreaStore::new();
        store
            .register("pageviews", AreaSettings::titled("Page Views"))
            .unwrap();

        let area = store.get("pageviews").unwrap();
        assert_eq!(area.priority, DEFAULT_PRIORITY);
        assert_eq!(area.style, AreaStyle::Boxes);
        assert_eq!(area.icon, None);
    }

    #[test]
    fn test_requires_slug() {
        let mut store = AreaStore::new();
        let err = store.register("", AreaSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "slug is required.");
        assert!(store.is_empty());
    }

    #[test]
    fn test_requires_title() {
        let mut store = AreaStore::new();
        let err = store.register("header", AreaSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "settings.title is required.");

        let err = store
            .register("header", AreaSettings::titled(""))
            .unwrap_err();
        assert_eq!(err, ValidationError::missing("settings.title"));
        assert!(!store.contains("header"));
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut store = AreaStore::new();
        store.register("pageviews", header_settings()).unwrap();

        let outcome = store
            .register(
                "pageviews",
                AreaSettings::titled("Mega Page Views").style(AreaStyle::Composite),
            )
            .unwrap();

        let warning = outcome.warning().expect("duplicate should warn");
        assert_eq!(warning.slug, "pageviews");
        assert_eq!(warning.kind, RegistrationKind::WidgetArea);

        let area = store.get("pageviews").unwrap();
        assert_eq!(area.title, "Your Site");
        assert_eq!(area.style, AreaStyle::Boxes);
    }

    #[test]
    fn test_unknown_area() {
        let store = AreaStore::new();
        assert!(!store.contains("NotRealArea"));
        assert_eq!(store.get("NotRealArea"), None);
    }
}
