// dashkit-core/src/widget.rs
use crate::area::DEFAULT_PRIORITY;
use crate::context::Prioritized;
use crate::error::{DuplicateRegistration, Registration, RegistrationKind, ValidationError, require};
use ratatui::{buffer::Buffer, layout::Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Renderable widget instance with lifecycle hooks
pub trait Widget: Send {
    /// Called once when the widget is placed on a dashboard
    fn on_mount(&mut self) {}

    /// Called every tick with delta time since last update
    fn on_update(&mut self, _delta: Duration) {}

    /// Handle input events while focused
    fn on_event(&mut self, _event: Event) -> EventResult {
        EventResult::Ignored
    }

    /// Draw the widget body. Any surrounding box is drawn by the area.
    fn render(&mut self, area: Rect, buf: &mut Buffer, focused: bool);

    /// Whether widget needs regular updates (for animations/polling)
    fn needs_update(&self) -> bool {
        false
    }

    /// Cleanup when widget is removed
    fn on_unmount(&mut self) {}
}

#[derive(Debug, Clone)]
pub enum Event {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed, // Stop propagation
    Ignored,  // Continue to next widget
}

/// Share of the area grid a widget occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetWidth {
    #[default]
    Quarter,
    Half,
    Full,
}

impl WidgetWidth {
    /// Columns taken on the 12-column area grid
    pub fn columns(self) -> u16 {
        match self {
            WidgetWidth::Quarter => 3,
            WidgetWidth::Half => 6,
            WidgetWidth::Full => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetWidth::Quarter => "quarter",
            WidgetWidth::Half => "half",
            WidgetWidth::Full => "full",
        }
    }
}

/// Builds a fresh widget instance each time a dashboard is assembled
pub type WidgetComponent = Arc<dyn Fn() -> Box<dyn Widget> + Send + Sync>;

/// Settings passed to [`WidgetStore::register`]. Only `component` is required.
#[derive(Clone, Default)]
pub struct WidgetSettings {
    pub component: Option<WidgetComponent>,
    pub priority: Option<i32>,
    pub width: Option<WidgetWidth>,
    pub wrap_widget: Option<bool>,
}

impl WidgetSettings {
    pub fn new(component: WidgetComponent) -> Self {
        Self {
            component: Some(component),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn width(mut self, width: WidgetWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn wrap_widget(mut self, wrap: bool) -> Self {
        self.wrap_widget = Some(wrap);
        self
    }
}

impl fmt::Debug for WidgetSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetSettings")
            .field("component", &self.component.as_ref().map(|_| "<component>"))
            .field("priority", &self.priority)
            .field("width", &self.width)
            .field("wrap_widget", &self.wrap_widget)
            .finish()
    }
}

/// A registered widget
#[derive(Clone)]
pub struct WidgetDefinition {
    pub slug: String,
    pub component: WidgetComponent,
    pub priority: i32,
    pub width: WidgetWidth,
    pub wrap_widget: bool,
}

impl WidgetDefinition {
    pub fn instantiate(&self) -> Box<dyn Widget> {
        (self.component)()
    }
}

impl fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("slug", &self.slug)
            .field("priority", &self.priority)
            .field("width", &self.width)
            .field("wrap_widget", &self.wrap_widget)
            .finish_non_exhaustive()
    }
}

impl Prioritized for WidgetDefinition {
    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Widget definitions keyed by slug. Entries are never replaced.
#[derive(Debug, Default)]
pub struct WidgetStore {
    widgets: HashMap<String, WidgetDefinition>,
}

impl WidgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        slug: &str,
        settings: WidgetSettings,
    ) -> Result<Registration, ValidationError> {
        require(slug, "slug")?;
        let component = settings
            .component
            .ok_or(ValidationError::missing("settings.component"))?;

        if self.widgets.contains_key(slug) {
            let warning = DuplicateRegistration {
                kind: RegistrationKind::Widget,
                slug: slug.to_string(),
            };
            tracing::warn!("{}", warning);
            return Ok(Registration::Duplicate(warning));
        }

        let definition = WidgetDefinition {
            slug: slug.to_string(),
            component,
            priority: settings.priority.unwrap_or(DEFAULT_PRIORITY),
            width: settings.width.unwrap_or_default(),
            wrap_widget: settings.wrap_widget.unwrap_or(true),
        };
        tracing::debug!(slug, priority = definition.priority, "registered widget");
        self.widgets.insert(slug.to_string(), definition);

        Ok(Registration::Registered)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.widgets.contains_key(slug)
    }

    pub fn get(&self, slug: &str) -> Option<&WidgetDefinition> {
        self.widgets.get(slug)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

/// Live widget instance placed in an area
pub struct WidgetContainer {
    widget: Box<dyn Widget>,
    last_update: Instant,
    mounted: bool,
    slug: String,
    width: WidgetWidth,
    wrap: bool,
}

impl WidgetContainer {
    pub fn new(definition: &WidgetDefinition) -> Self {
        Self::from_widget(
            definition.slug.clone(),
            definition.width,
            definition.wrap_widget,
            definition.instantiate(),
        )
    }

    pub fn from_widget(
        slug: String,
        width: WidgetWidth,
        wrap: bool,
        widget: Box<dyn Widget>,
    ) -> Self {
        Self {
            widget,
            last_update: Instant::now(),
            mounted: false,
            slug,
            width,
            wrap,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn width(&self) -> WidgetWidth {
        self.width
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    pub fn mount(&mut self) {
        if !self.mounted {
            self.widget.on_mount();
            self.mounted = true;
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_update);

        if self.widget.needs_update() {
            self.widget.on_update(delta);
        }

        self.last_update = now;
    }

    pub fn handle_event(&mut self, event: Event) -> EventResult {
        self.widget.on_event(event)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        self.widget.render(area, buf, focused);
    }

    pub fn unmount(&mut self) {
        if self.mounted {
            self.widget.on_unmount();
            self.mounted = false;
        }
    }
}

/// Plain text widget, configured with a `text` setting
#[derive(Debug, Clone, Default)]
pub struct TextWidget {
    text: String,
}

impl TextWidget {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_settings(settings: &toml::Table) -> Self {
        let text = settings
            .get("text")
            .and_then(toml::Value::as_str)
            .unwrap_or_default();
        Self::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for TextWidget {
    fn render(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        use ratatui::style::{Color, Style};
        use ratatui::widgets::{Paragraph, Wrap};

        let color = if focused { Color::White } else { Color::Gray };
        let paragraph = Paragraph::new(self.text.as_str())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(color));

        ratatui::widgets::Widget::render(paragraph, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn text_component(text: &'static str) -> WidgetComponent {
        Arc::new(move || Box::new(TextWidget::new(text)) as Box<dyn Widget>)
    }

    struct CountingWidget {
        mounts: Arc<AtomicUsize>,
        updates: Arc<AtomicUsize>,
    }

    impl Widget for CountingWidget {
        fn on_mount(&mut self) {
            self.mounts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_update(&mut self, _delta: Duration) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }

        fn render(&mut self, _area: Rect, _buf: &mut Buffer, _focused: bool) {}

        fn needs_update(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_register_widget_defaults() {
        let mut store = WidgetStore::new();
        store
            .register("pageviews", WidgetSettings::new(text_component("hi")))
            .unwrap();

        let widget = store.get("pageviews").unwrap();
        assert_eq!(widget.slug, "pageviews");
        assert_eq!(widget.priority, DEFAULT_PRIORITY);
        assert_eq!(widget.width, WidgetWidth::Quarter);
        assert!(widget.wrap_widget);
    }

    #[test]
    fn test_register_widget_requires_slug_and_component() {
        let mut store = WidgetStore::new();

        let err = store
            .register("", WidgetSettings::new(text_component("hi")))
            .unwrap_err();
        assert_eq!(err.to_string(), "slug is required.");

        let err = store
            .register("pageviews", WidgetSettings::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "settings.component is required.");
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_widget_keeps_first() {
        let mut store = WidgetStore::new();
        store
            .register(
                "pageviews",
                WidgetSettings::new(text_component("first")).width(WidgetWidth::Half),
            )
            .unwrap();
        let outcome = store
            .register(
                "pageviews",
                WidgetSettings::new(text_component("second")).width(WidgetWidth::Full),
            )
            .unwrap();

        assert_eq!(
            outcome.warning().map(|w| w.kind),
            Some(RegistrationKind::Widget)
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("pageviews").unwrap().width, WidgetWidth::Half);
    }

    #[test]
    fn test_widget_widths() {
        assert_eq!(WidgetWidth::Quarter.columns(), 3);
        assert_eq!(WidgetWidth::Half.columns(), 6);
        assert_eq!(WidgetWidth::Full.columns(), 12);
    }

    #[test]
    fn test_container_mounts_once() {
        let mounts = Arc::new(AtomicUsize::new(0));
        let updates = Arc::new(AtomicUsize::new(0));
        let widget = CountingWidget {
            mounts: mounts.clone(),
            updates: updates.clone(),
        };
        let mut container = WidgetContainer::from_widget(
            "counter".to_string(),
            WidgetWidth::Full,
            false,
            Box::new(widget),
        );

        container.mount();
        container.mount();
        container.update();

        assert_eq!(mounts.load(Ordering::SeqCst), 1);
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(container.slug(), "counter");
        assert!(!container.wraps());
    }

    #[test]
    fn test_text_widget_from_settings() {
        let settings: toml::Table = toml::from_str(r#"text = "Hello there""#).unwrap();
        let widget = TextWidget::from_settings(&settings);
        assert_eq!(widget.text(), "Hello there");

        let empty = TextWidget::from_settings(&toml::Table::new());
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_text_widget_renders_text() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        let mut widget = TextWidget::new("Visitors");

        widget.render(area, &mut buf, true);

        let line: String = (0..8).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(line, "Visitors");
    }
}
