pub mod area;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod layout;
pub mod registry;
pub mod widget;

pub use area::{AreaSettings, AreaStore, AreaStyle, DEFAULT_PRIORITY, Icon, WidgetArea};
pub use config::{AreaConfig, ConfigError, ConfigFile, WidgetConfig};
pub use context::{AssignmentTable, Prioritized, resolve_by_priority};
pub use error::{DuplicateRegistration, Registration, RegistrationKind, ValidationError};
pub use event::{Event as BusEvent, EventBus, RegistryChange, Subscription};
pub use layout::{GRID_COLUMNS, GridLayout};
pub use registry::{ComponentBuilder, ComponentCatalog, ComponentSettings, WidgetRegistry};
pub use widget::{
    Event, EventResult, TextWidget, Widget, WidgetComponent, WidgetContainer, WidgetDefinition,
    WidgetSettings, WidgetStore, WidgetWidth,
};
