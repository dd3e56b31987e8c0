use crate::widgets::ErrorWidget;
use dashkit_core::{
    AreaStyle, Event, EventResult, GridLayout, ValidationError, Widget, WidgetArea,
    WidgetContainer, WidgetRegistry,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// A resolved widget area with live widget instances
pub struct AreaView {
    area: WidgetArea,
    widgets: Vec<WidgetContainer>,
    grid: GridLayout,
}

impl AreaView {
    fn new(area: &WidgetArea, widgets: Vec<WidgetContainer>) -> Self {
        let widths: Vec<_> = widgets.iter().map(WidgetContainer::width).collect();
        Self {
            area: area.clone(),
            grid: GridLayout::pack(&widths),
            widgets,
        }
    }

    pub fn slug(&self) -> &str {
        &self.area.slug
    }

    pub fn widget_slugs(&self) -> Vec<&str> {
        self.widgets.iter().map(WidgetContainer::slug).collect()
    }

    fn title(&self) -> String {
        match &self.area.icon {
            Some(icon) => format!(" [{}] {} ", icon.name(), self.area.title),
            None => format!(" {} ", self.area.title),
        }
    }

    /// Rows needed on screen, used to weight the vertical split
    fn weight(&self) -> u32 {
        self.grid.row_count().max(1) as u32
    }

    /// `focused` is the index of the focused widget within this area
    fn render(&mut self, rect: Rect, buf: &mut Buffer, focused: Option<usize>) {
        let mut block = Block::default()
            .title(self.title())
            .title_style(Style::default().add_modifier(Modifier::BOLD));
        if let Some(subtitle) = &self.area.subtitle {
            block = block.title_bottom(format!(" {} ", subtitle));
        }
        block = match self.area.style {
            AreaStyle::Composite => block
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
            AreaStyle::Boxes => block.borders(Borders::TOP | Borders::BOTTOM),
        };

        let inner = block.inner(rect);
        ratatui::widgets::Widget::render(block, rect, buf);

        let cells = self.grid.calculate(inner);
        let style = self.area.style;
        for (i, (widget, cell)) in self.widgets.iter_mut().zip(cells).enumerate() {
            let is_focused = focused == Some(i);
            let body = if style == AreaStyle::Boxes && widget.wraps() {
                let color = if is_focused {
                    Color::Yellow
                } else {
                    Color::DarkGray
                };
                let frame = Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", widget.slug()))
                    .border_style(Style::default().fg(color));
                let body = frame.inner(cell);
                ratatui::widgets::Widget::render(frame, cell, buf);
                body
            } else {
                cell
            };
            widget.render(body, buf, is_focused);
        }
    }
}

/// Every area of one context, in resolved order
pub struct Dashboard {
    context: String,
    areas: Vec<AreaView>,
    focused: usize,
    placeholder: Option<ErrorWidget>,
    notice: Option<ErrorWidget>,
}

impl Dashboard {
    pub fn build(registry: &WidgetRegistry, context: &str) -> Result<Self, ValidationError> {
        let mut areas = Vec::new();
        for area in registry.get_widget_areas(context)? {
            let widgets = registry
                .get_widgets(&area.slug)?
                .into_iter()
                .map(WidgetContainer::new)
                .collect();
            areas.push(AreaView::new(area, widgets));
        }

        let placeholder = areas.is_empty().then(|| {
            let placeholder = ErrorWidget::empty_context(context, &registry.contexts());
            tracing::warn!("{}", placeholder.message());
            placeholder
        });

        Ok(Self {
            context: context.to_string(),
            areas,
            focused: 0,
            placeholder,
            notice: None,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn areas(&self) -> &[AreaView] {
        &self.areas
    }

    pub fn widget_count(&self) -> usize {
        self.areas.iter().map(|a| a.widgets.len()).sum()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Show an error along the bottom edge until the dashboard is replaced
    pub fn show_error(&mut self, message: String) {
        self.notice = Some(ErrorWidget::new(message));
    }

    fn widgets_mut(&mut self) -> impl Iterator<Item = &mut WidgetContainer> {
        self.areas.iter_mut().flat_map(|a| a.widgets.iter_mut())
    }

    pub fn mount(&mut self) {
        self.widgets_mut().for_each(WidgetContainer::mount);
    }

    pub fn update(&mut self) {
        self.widgets_mut().for_each(WidgetContainer::update);
    }

    pub fn unmount(&mut self) {
        self.widgets_mut().for_each(WidgetContainer::unmount);
    }

    pub fn focus_next(&mut self) {
        let count = self.widget_count();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.widget_count();
        if count > 0 {
            self.focused = (self.focused + count - 1) % count;
        }
    }

    /// Pass an event to the focused widget only
    pub fn handle_event(&mut self, event: Event) -> EventResult {
        let focused = self.focused;
        match self.widgets_mut().nth(focused) {
            Some(widget) => widget.handle_event(event),
            None => EventResult::Ignored,
        }
    }

    pub fn render(&mut self, rect: Rect, buf: &mut Buffer) {
        let rect = match &mut self.notice {
            Some(notice) => {
                let [body, bottom] =
                    Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(rect);
                notice.render(bottom, buf, false);
                body
            }
            None => rect,
        };

        if let Some(placeholder) = &mut self.placeholder {
            placeholder.render(rect, buf, false);
            return;
        }

        let weights: Vec<u32> = self.areas.iter().map(AreaView::weight).collect();
        let total: u32 = weights.iter().sum();
        let rects =
            Layout::vertical(weights.iter().map(|w| Constraint::Ratio(*w, total))).split(rect);

        let focused_idx = self.focused;
        let mut first = 0;
        for (view, area_rect) in self.areas.iter_mut().zip(rects.iter()) {
            let count = view.widgets.len();
            let focused = (first..first + count)
                .contains(&focused_idx)
                .then(|| focused_idx - first);
            view.render(*area_rect, buf, focused);
            first += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashkit_core::{AreaSettings, TextWidget, WidgetComponent, WidgetSettings, WidgetWidth};
    use std::sync::Arc;

    fn text(body: &'static str) -> WidgetSettings {
        let component: WidgetComponent =
            Arc::new(move || Box::new(TextWidget::new(body)) as Box<dyn Widget>);
        WidgetSettings::new(component)
    }

    fn registry() -> WidgetRegistry {
        let mut registry = WidgetRegistry::new();
        registry
            .register_widget_area(
                "search",
                AreaSettings::titled("Search").priority(2),
            )
            .unwrap();
        registry
            .register_widget_area(
                "traffic",
                AreaSettings::titled("Traffic")
                    .priority(1)
                    .style(AreaStyle::Composite),
            )
            .unwrap();
        registry.assign_widget_area("search", "dashboard").unwrap();
        registry.assign_widget_area("traffic", "dashboard").unwrap();

        registry
            .register_widget("clicks", text("Clicks").width(WidgetWidth::Half))
            .unwrap();
        registry
            .register_widget("impressions", text("Impressions").priority(1))
            .unwrap();
        registry
            .register_widget("sessions", text("Sessions").width(WidgetWidth::Full))
            .unwrap();
        registry
            .assign_widget("clicks", &["search"])
            .unwrap();
        registry
            .assign_widget("impressions", &["search"])
            .unwrap();
        registry
            .assign_widget("sessions", &["traffic"])
            .unwrap();
        registry
    }

    #[test]
    fn test_build_resolves_areas_and_widgets() {
        let dashboard = Dashboard::build(&registry(), "dashboard").unwrap();

        let areas: Vec<&str> = dashboard.areas().iter().map(AreaView::slug).collect();
        assert_eq!(areas, vec!["traffic", "search"]);
        assert_eq!(
            dashboard.areas()[1].widget_slugs(),
            vec!["impressions", "clicks"]
        );
        assert_eq!(dashboard.widget_count(), 3);
    }

    #[test]
    fn test_build_requires_context() {
        assert!(Dashboard::build(&registry(), "").is_err());
    }

    #[test]
    fn test_focus_wraps() {
        let mut dashboard = Dashboard::build(&registry(), "dashboard").unwrap();

        dashboard.focus_previous();
        assert_eq!(dashboard.focused(), 2);
        dashboard.focus_next();
        assert_eq!(dashboard.focused(), 0);
    }

    #[test]
    fn test_empty_context_renders_placeholder() {
        let mut dashboard = Dashboard::build(&registry(), "settings").unwrap();
        assert_eq!(dashboard.widget_count(), 0);
        assert_eq!(dashboard.context(), "settings");

        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        dashboard.render(area, &mut buf);

        let top: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(top.contains("Context: settings"));
    }

    #[test]
    fn test_error_notice_renders_below_areas() {
        let mut dashboard = Dashboard::build(&registry(), "dashboard").unwrap();
        assert!(dashboard.notice.is_none());
        dashboard.show_error("Config reload failed: bad toml".to_string());

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        dashboard.render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(21).contains("Error"));
        assert!(row(22).contains("Config reload failed: bad toml"));
        assert!(row(0).contains("Traffic"));
    }

    #[test]
    fn test_render_draws_area_titles() {
        let mut dashboard = Dashboard::build(&registry(), "dashboard").unwrap();
        dashboard.mount();

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        dashboard.render(area, &mut buf);

        let screen: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(screen.contains("Traffic"));
        assert!(screen.contains("Search"));
        assert!(screen.contains("impressions"));
    }
}
