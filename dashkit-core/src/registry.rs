// dashkit-core/src/registry.rs
use crate::area::{AreaSettings, AreaStore, WidgetArea};
use crate::context::{AssignmentTable, resolve_by_priority};
use crate::error::{Registration, ValidationError, require};
use crate::event::{EventBus, RegistryChange};
use crate::widget::{TextWidget, Widget, WidgetComponent, WidgetDefinition, WidgetSettings, WidgetStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Owns every area, widget and assignment of one dashboard application.
///
/// Registration and assignment may happen in any order; the selectors
/// `get_widget_areas` and `get_widgets` resolve against the current tables
/// every time they are called. Each successful mutation is published on the
/// registry's [`EventBus`] so views know to resolve again.
#[derive(Default)]
pub struct WidgetRegistry {
    areas: AreaStore,
    context_assignments: AssignmentTable,
    widgets: WidgetStore,
    area_assignments: AssignmentTable,
    bus: EventBus,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bus(bus: EventBus) -> Self {
        Self {
            bus,
            ..Self::default()
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn register_widget_area(
        &mut self,
        slug: &str,
        settings: AreaSettings,
    ) -> Result<Registration, ValidationError> {
        let outcome = self.areas.register(slug, settings)?;
        if outcome.is_registered() {
            self.bus.publish(RegistryChange::AreaRegistered {
                slug: slug.to_string(),
            });
        }
        Ok(outcome)
    }

    pub fn is_widget_area_registered(&self, slug: &str) -> bool {
        self.areas.contains(slug)
    }

    pub fn get_widget_area(&self, slug: &str) -> Option<&WidgetArea> {
        self.areas.get(slug)
    }

    /// Assign an area to a context. The area doesn't have to be registered yet.
    pub fn assign_widget_area(
        &mut self,
        area_slug: &str,
        context_slug: &str,
    ) -> Result<(), ValidationError> {
        require(area_slug, "areaSlug")?;
        require(context_slug, "contextSlug")?;

        self.context_assignments.assign(context_slug, area_slug);
        self.bus.publish(RegistryChange::AreaAssigned {
            area: area_slug.to_string(),
            context: context_slug.to_string(),
        });
        Ok(())
    }

    /// Registered areas assigned to `context_slug`, lowest priority first
    pub fn get_widget_areas(&self, context_slug: &str) -> Result<Vec<&WidgetArea>, ValidationError> {
        require(context_slug, "contextSlug")?;

        Ok(resolve_by_priority(
            self.context_assignments.members(context_slug),
            |slug| self.areas.get(slug),
        ))
    }

    pub fn register_widget(
        &mut self,
        slug: &str,
        settings: WidgetSettings,
    ) -> Result<Registration, ValidationError> {
        let outcome = self.widgets.register(slug, settings)?;
        if outcome.is_registered() {
            self.bus.publish(RegistryChange::WidgetRegistered {
                slug: slug.to_string(),
            });
        }
        Ok(outcome)
    }

    pub fn is_widget_registered(&self, slug: &str) -> bool {
        self.widgets.contains(slug)
    }

    pub fn get_widget(&self, slug: &str) -> Option<&WidgetDefinition> {
        self.widgets.get(slug)
    }

    /// Assign a widget to one or more areas
    pub fn assign_widget<S: AsRef<str>>(
        &mut self,
        slug: &str,
        area_slugs: &[S],
    ) -> Result<(), ValidationError> {
        require(slug, "slug")?;
        if area_slugs.is_empty() || area_slugs.iter().any(|area| area.as_ref().is_empty()) {
            return Err(ValidationError::missing("areaSlugs"));
        }

        for area in area_slugs {
            let area = area.as_ref();
            self.area_assignments.assign(area, slug);
            self.bus.publish(RegistryChange::WidgetAssigned {
                widget: slug.to_string(),
                area: area.to_string(),
            });
        }
        Ok(())
    }

    /// Registered widgets assigned to `area_slug`, lowest priority first
    pub fn get_widgets(&self, area_slug: &str) -> Result<Vec<&WidgetDefinition>, ValidationError> {
        require(area_slug, "widgetAreaSlug")?;

        Ok(resolve_by_priority(
            self.area_assignments.members(area_slug),
            |slug| self.widgets.get(slug),
        ))
    }

    /// Context slugs that have at least one assignment
    pub fn contexts(&self) -> Vec<&str> {
        let mut contexts: Vec<&str> = self.context_assignments.owners().collect();
        contexts.sort_unstable();
        contexts
    }
}

/// Free-form settings of a configured widget
pub type ComponentSettings = toml::Table;

/// Builds a widget component from the settings of a configured widget
pub type ComponentBuilder = Box<dyn Fn(&ComponentSettings) -> WidgetComponent>;

/// Register a widget type under `kind`. The type needs a
/// `from_settings(&ComponentSettings) -> Self` constructor.
#[macro_export]
macro_rules! register_component {
    ($catalog:expr, $kind:expr, $widget_type:ty) => {
        $catalog.register(
            $kind,
            Box::new(|settings: &$crate::registry::ComponentSettings| {
                $crate::registry::settings_component(settings, <$widget_type>::from_settings)
            }),
        );
    };
}

/// Maps configured widget kinds to component builders
pub struct ComponentCatalog {
    builders: HashMap<String, ComponentBuilder>,
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Catalog with the kinds this crate ships (`text`)
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        register_component!(catalog, "text", TextWidget);
        catalog
    }

    pub fn register(&mut self, kind: &str, builder: ComponentBuilder) {
        self.builders.insert(kind.to_string(), builder);
    }

    pub fn build(&self, kind: &str, settings: &ComponentSettings) -> Option<WidgetComponent> {
        self.builders.get(kind).map(|build| build(settings))
    }

    pub fn kinds(&self) -> Vec<&String> {
        self.builders.keys().collect()
    }
}

/// Component that clones `settings` once and builds `W::from_settings` per instance
pub fn settings_component<W, F>(settings: &ComponentSettings, build: F) -> WidgetComponent
where
    W: Widget + 'static,
    F: Fn(&ComponentSettings) -> W + Send + Sync + 'static,
{
    let settings = settings.clone();
    Arc::new(move || Box::new(build(&settings)) as Box<dyn Widget>)
}
