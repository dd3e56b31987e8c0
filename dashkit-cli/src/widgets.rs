use dashkit_core::{ComponentSettings, Event, EventResult, Widget};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    prelude::Widget as RatatuiWidget,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Single headline number with an optional period-over-period change
#[derive(Debug, Clone, PartialEq)]
pub struct MetricWidget {
    label: String,
    value: String,
    change: Option<f64>,
    show_change: bool,
}

impl MetricWidget {
    pub fn from_settings(settings: &ComponentSettings) -> Self {
        let label = settings
            .get("label")
            .and_then(toml::Value::as_str)
            .unwrap_or_default()
            .to_string();

        let value = match settings.get("value") {
            Some(toml::Value::String(s)) => s.clone(),
            Some(toml::Value::Integer(i)) => i.to_string(),
            Some(toml::Value::Float(f)) => format!("{:.1}", f),
            _ => "-".to_string(),
        };

        let change = settings.get("change").and_then(|v| match v {
            toml::Value::Float(f) => Some(*f),
            toml::Value::Integer(i) => Some(*i as f64),
            _ => None,
        });

        Self {
            label,
            value,
            change,
            show_change: true,
        }
    }

    fn change_span(&self) -> Option<Span<'static>> {
        let change = self.change.filter(|_| self.show_change)?;
        let color = if change >= 0.0 { Color::Green } else { Color::Red };
        Some(Span::styled(
            format!("{:+.1}%", change),
            Style::default().fg(color),
        ))
    }
}

impl Widget for MetricWidget {
    fn on_event(&mut self, event: Event) -> EventResult {
        use crossterm::event::KeyCode;

        if let Event::Key(key) = event
            && key.code == KeyCode::Char('c')
        {
            self.show_change = !self.show_change;
            return EventResult::Consumed;
        }

        EventResult::Ignored
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        let label_color = if focused { Color::Yellow } else { Color::Gray };
        let mut lines = vec![
            Line::from(Span::styled(
                self.label.clone(),
                Style::default().fg(label_color),
            )),
            Line::from(Span::styled(
                self.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(change) = self.change_span() {
            lines.push(Line::from(change));
        }

        RatatuiWidget::render(Paragraph::new(lines), area, buf);
    }
}

/// Widget that displays error messages in the TUI
#[derive(Debug)]
pub struct ErrorWidget {
    message: String,
    title: String,
    border_color: Color,
}

impl ErrorWidget {
    pub fn new(message: String) -> Self {
        Self {
            title: "Error".to_string(),
            border_color: Color::Red,
            message,
        }
    }

    pub fn empty_context(context: &str, known: &[&str]) -> Self {
        let known = if known.is_empty() {
            "none".to_string()
        } else {
            known.join(", ")
        };
        Self {
            title: format!("Context: {}", context),
            border_color: Color::Yellow,
            message: format!(
                "No widget areas are assigned to '{}'. Known contexts: {}",
                context, known
            ),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Widget for ErrorWidget {
    fn render(&mut self, area: Rect, buf: &mut Buffer, _focused: bool) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color));

        let paragraph = Paragraph::new(self.message.as_str())
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White));

        RatatuiWidget::render(paragraph, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn settings(source: &str) -> ComponentSettings {
        toml::from_str(source).unwrap()
    }

    #[test]
    fn test_metric_from_settings() {
        let widget = MetricWidget::from_settings(&settings(
            r#"
label = "Sessions"
value = 1200
change = -4.25
"#,
        ));

        assert_eq!(widget.label, "Sessions");
        assert_eq!(widget.value, "1200");
        assert_eq!(widget.change, Some(-4.25));
    }

    #[test]
    fn test_metric_defaults() {
        let widget = MetricWidget::from_settings(&ComponentSettings::new());
        assert_eq!(widget.label, "");
        assert_eq!(widget.value, "-");
        assert_eq!(widget.change, None);
    }

    #[test]
    fn test_metric_toggles_change() {
        let mut widget = MetricWidget::from_settings(&settings("change = 12"));
        assert!(widget.change_span().is_some());

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(widget.on_event(Event::Key(key)), EventResult::Consumed);
        assert!(widget.change_span().is_none());

        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(widget.on_event(Event::Key(other)), EventResult::Ignored);
    }

    #[test]
    fn test_error_renders_title_and_message() {
        let mut widget = ErrorWidget::new("Config reload failed".to_string());
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf, false);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains("Error"));
        assert!(row(1).contains("Config reload failed"));
        assert_eq!(buf[(0, 0)].fg, Color::Red);
    }

    #[test]
    fn test_empty_context_message() {
        let widget = ErrorWidget::empty_context("settings", &["dashboard"]);
        assert_eq!(
            widget.message(),
            "No widget areas are assigned to 'settings'. Known contexts: dashboard"
        );

        let widget = ErrorWidget::empty_context("settings", &[]);
        assert!(widget.message().ends_with("Known contexts: none"));
    }
}
