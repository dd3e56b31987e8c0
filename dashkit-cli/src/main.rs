// dashkit-cli/src/main.rs
mod logging;
mod view;
mod widgets;

use clap::Parser;
use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    error::Error,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

use dashkit_core::{
    ComponentCatalog, ConfigFile, ValidationError, WidgetRegistry, register_component,
};
use logging::LogSink;
use view::Dashboard;
use widgets::MetricWidget;

#[derive(Parser, Debug)]
#[command(name = "dashkit", about = "Render a dashboard context from its widget areas")]
struct Cli {
    /// Config file to load instead of ./dashkit.toml or the user config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Context to render
    #[arg(long, default_value = "dashboard")]
    context: String,
    /// Print the resolved areas and widgets instead of starting the UI
    #[arg(long)]
    list: bool,
}

fn component_catalog() -> ComponentCatalog {
    let mut catalog = ComponentCatalog::with_builtins();
    register_component!(catalog, "metric", MetricWidget);
    catalog
}

fn load_registry(cli: &Cli) -> Result<WidgetRegistry, Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}. Using default.", e);
            ConfigFile::default()
        }),
    };

    let mut registry = WidgetRegistry::new();
    let skipped = config.apply(&mut registry, &component_catalog())?;

    tracing::info!(
        areas = config.areas.len(),
        widgets = config.widgets.len(),
        skipped = skipped.len(),
        "registry loaded"
    );
    Ok(registry)
}

fn print_context(registry: &WidgetRegistry, context: &str) -> Result<(), ValidationError> {
    let areas = registry.get_widget_areas(context)?;
    if areas.is_empty() {
        println!(
            "No widget areas assigned to '{}'. Known contexts: {}",
            context,
            registry.contexts().join(", ")
        );
        return Ok(());
    }

    println!("{:>8}  {:<28} {:<10} TITLE", "PRIORITY", "AREA", "STYLE");
    for area in areas {
        println!(
            "{:>8}  {:<28} {:<10} {}",
            area.priority,
            area.slug,
            area.style.as_str(),
            area.title
        );
        for widget in registry.get_widgets(&area.slug)? {
            println!(
                "{:>8}    - {:<24} {}",
                widget.priority,
                widget.slug,
                widget.width.as_str()
            );
        }
    }
    Ok(())
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    dashboard: &mut Dashboard,
    cli: &Cli,
) -> Result<(), Box<dyn Error>> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            let area = f.area();
            dashboard.render(area, f.buffer_mut());
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                CEvent::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                    if key.code == KeyCode::Char('q') {
                        return Ok(());
                    }

                    // Reload config on Ctrl+r
                    if key.code == KeyCode::Char('r')
                        && key
                            .modifiers
                            .contains(crossterm::event::KeyModifiers::CONTROL)
                    {
                        let rebuilt = load_registry(cli).and_then(|r| {
                            Dashboard::build(&r, &cli.context).map_err(Into::into)
                        });
                        match rebuilt {
                            Ok(mut fresh) => {
                                dashboard.unmount();
                                fresh.mount();
                                *dashboard = fresh;
                            }
                            Err(e) => {
                                tracing::error!("Config reload failed: {}. Keeping old config.", e);
                                dashboard.show_error(format!(
                                    "Config reload failed: {}. Keeping old config.",
                                    e
                                ));
                            }
                        }
                        continue;
                    }

                    match key.code {
                        KeyCode::Tab => dashboard.focus_next(),
                        KeyCode::BackTab => dashboard.focus_previous(),
                        _ => {
                            dashboard.handle_event(dashkit_core::Event::Key(key));
                        }
                    }
                    tracing::trace!(focused = dashboard.focused(), key = ?key.code, "key handled");
                }
                CEvent::Resize(width, height) => {
                    dashboard.handle_event(dashkit_core::Event::Resize(width, height));
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            dashboard.update();
            last_tick = Instant::now();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let sink = LogSink::new();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(sink.clone())
        .init();

    let registry = load_registry(&cli)?;

    if cli.list {
        print_context(&registry, &cli.context)?;
        return Ok(());
    }

    let mut dashboard = Dashboard::build(&registry, &cli.context)?;
    for area in dashboard.areas() {
        tracing::debug!(
            context = dashboard.context(),
            area = area.slug(),
            widgets = ?area.widget_slugs(),
            "area resolved"
        );
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Logs would draw over the alternate screen, keep them until exit
    sink.hold();

    dashboard.mount();
    let result = run(&mut terminal, &mut dashboard, &cli);
    dashboard.unmount();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    sink.release()?;

    result
}
