use crate::area::{AreaSettings, AreaStyle, Icon};
use crate::error::{DuplicateRegistration, ValidationError};
use crate::registry::{ComponentCatalog, ComponentSettings, WidgetRegistry};
use crate::widget::{WidgetSettings, WidgetWidth};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid registration: {0}")]
    Validation(#[from] ValidationError),
    #[error("Widget '{slug}' uses unknown component kind '{kind}'")]
    UnknownComponent { slug: String, kind: String },
}

/// Areas and widgets declared in `dashkit.toml`
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default, rename = "area")]
    pub areas: Vec<AreaConfig>,
    #[serde(default, rename = "widget")]
    pub widgets: Vec<WidgetConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AreaConfig {
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub style: Option<AreaStyle>,
    /// Contexts this area is assigned to
    #[serde(default)]
    pub contexts: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub slug: String,
    /// Component kind, looked up in the [`ComponentCatalog`]
    pub kind: String,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub width: Option<WidgetWidth>,
    #[serde(default)]
    pub wrap: Option<bool>,
    /// Areas this widget is assigned to
    #[serde(default)]
    pub areas: Vec<String>,
    /// Everything else is handed to the component
    #[serde(flatten)]
    pub settings: ComponentSettings,
}

impl AreaConfig {
    fn new(slug: &str, title: &str, priority: i32, style: AreaStyle) -> Self {
        Self {
            slug: slug.to_string(),
            title: Some(title.to_string()),
            subtitle: None,
            icon: None,
            priority: Some(priority),
            style: Some(style),
            contexts: vec!["dashboard".to_string()],
        }
    }

    pub fn to_settings(&self) -> AreaSettings {
        AreaSettings {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            icon: self.icon.clone(),
            priority: self.priority,
            style: self.style,
        }
    }
}

impl WidgetConfig {
    fn text(slug: &str, area: &str, width: WidgetWidth, text: &str) -> Self {
        let mut settings = ComponentSettings::new();
        settings.insert("text".to_string(), toml::Value::String(text.to_string()));

        Self {
            slug: slug.to_string(),
            kind: "text".to_string(),
            priority: None,
            width: Some(width),
            wrap: None,
            areas: vec![area.to_string()],
            settings,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let mut overview = AreaConfig::new(
            "dashboard-overview",
            "Find out how your audience is growing",
            1,
            AreaStyle::Composite,
        );
        overview.subtitle = Some("Track your site's traffic over time".to_string());
        overview.icon = Some(Icon::new("analytics"));

        let mut search = AreaConfig::new(
            "dashboard-search-funnel",
            "Search Funnel",
            2,
            AreaStyle::Boxes,
        );
        search.icon = Some(Icon::new("search-console"));

        let earnings = AreaConfig::new("dashboard-earnings", "Earnings", 3, AreaStyle::Boxes);

        Self {
            areas: vec![overview, search, earnings],
            widgets: vec![
                WidgetConfig::text(
                    "all-traffic",
                    "dashboard-overview",
                    WidgetWidth::Full,
                    "Sessions, users and bounce rate for the last 28 days.",
                ),
                WidgetConfig::text(
                    "impressions",
                    "dashboard-search-funnel",
                    WidgetWidth::Quarter,
                    "How often your site appeared in search results.",
                ),
                WidgetConfig::text(
                    "clicks",
                    "dashboard-search-funnel",
                    WidgetWidth::Quarter,
                    "How often people clicked through from search.",
                ),
                WidgetConfig::text(
                    "top-earning-pages",
                    "dashboard-earnings",
                    WidgetWidth::Half,
                    "Pages that earned the most from ads.",
                ),
            ],
        }
    }
}

impl ConfigFile {
    pub fn load() -> Result<Self, ConfigError> {
        // Priority: ./dashkit.toml -> ~/.config/dashkit/dashkit.toml -> default
        let local = std::env::current_dir()?.join("dashkit.toml");
        let user = dirs::config_dir().map(|dir| dir.join("dashkit/dashkit.toml"));

        Self::load_first(std::iter::once(local).chain(user))
    }

    /// Load the first candidate that exists, or the default when none do
    fn load_first(paths: impl IntoIterator<Item = PathBuf>) -> Result<Self, ConfigError> {
        for path in paths {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading config");
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Register and assign everything declared, areas first.
    ///
    /// Returns the duplicate registrations that were skipped.
    pub fn apply(
        &self,
        registry: &mut WidgetRegistry,
        catalog: &ComponentCatalog,
    ) -> Result<Vec<DuplicateRegistration>, ConfigError> {
        let mut warnings = Vec::new();

        for area in &self.areas {
            let outcome = registry.register_widget_area(&area.slug, area.to_settings())?;
            warnings.extend(outcome.into_warning());

            for context in &area.contexts {
                registry.assign_widget_area(&area.slug, context)?;
            }
        }

        for widget in &self.widgets {
            let component = catalog.build(&widget.kind, &widget.settings).ok_or_else(|| {
                ConfigError::UnknownComponent {
                    slug: widget.slug.clone(),
                    kind: widget.kind.clone(),
                }
            })?;

            let settings = WidgetSettings {
                component: Some(component),
                priority: widget.priority,
                width: widget.width,
                wrap_widget: widget.wrap,
            };
            let outcome = registry.register_widget(&widget.slug, settings)?;
            warnings.extend(outcome.into_warning());

            if !widget.areas.is_empty() {
                registry.assign_widget(&widget.slug, widget.areas.as_slice())?;
            }
        }

        Ok(warnings)
    }
}
