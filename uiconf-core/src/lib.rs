pub mod action;
pub mod config;
pub mod date;
pub mod error;
pub mod event;
pub mod item;
pub mod markup;
pub mod options;
pub mod registry;
pub mod schema;
pub mod widget;

pub use action::{ActionEvent, ActionInfo, ActionOutcome, Decision, confirm};
pub use config::{ConfigError, ConfigFile, WidgetConfig};
pub use date::{date_from_value, date_to_value, parse_date};
pub use error::{ErrorCode, OperationError};
pub use event::{
    Cancel, ComponentRef, Dispatcher, Event as BusEvent, EventBus, EventPayload, Handlers,
    WidgetEvent,
};
pub use item::{BuiltinName, ItemLocation, ItemName, MenuItem, ToolbarItem};
pub use options::{OptionChange, Options};
pub use registry::{
    Cancelation, EventDescriptor, WidgetDescriptor, WidgetFactory, WidgetKind, WidgetRegistry,
};
pub use schema::{DefaultValue, OptionSchema, OptionSpec, OptionType, Validated};
pub use widget::{Widget, WidgetContainer, WidgetOptions, base_schema};
