use crate::{ConfigError, EventBus, OptionSchema, Options, Validated, Widget, WidgetConfig};
use std::collections::HashMap;

pub type WidgetFactory =
    Box<dyn Fn(&str, Options, &EventBus) -> Result<Box<dyn Widget>, ConfigError>>;

/// How an event can be cancelled by its handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancelation {
    None,
    /// `cancel` is a plain boolean
    Sync,
    /// `cancel` may resolve later
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDescriptor {
    pub name: &'static str,
    pub cancel: Cancelation,
    /// Past-tense event fired when the action succeeds
    pub done: Option<&'static str>,
}

impl EventDescriptor {
    pub const fn notify(name: &'static str) -> Self {
        Self {
            name,
            cancel: Cancelation::None,
            done: None,
        }
    }

    pub const fn cancelable(name: &'static str) -> Self {
        Self {
            name,
            cancel: Cancelation::Sync,
            done: None,
        }
    }

    pub const fn deferred(name: &'static str) -> Self {
        Self {
            name,
            cancel: Cancelation::Deferred,
            done: None,
        }
    }

    pub const fn action(name: &'static str, done: &'static str) -> Self {
        Self {
            name,
            cancel: Cancelation::Deferred,
            done: Some(done),
        }
    }
}

/// Static description of a widget kind
#[derive(Debug, Clone, Copy)]
pub struct WidgetDescriptor {
    pub kind: &'static str,
    pub schema: fn() -> OptionSchema,
    pub events: &'static [EventDescriptor],
    /// Public operations, by camelCase name
    pub methods: &'static [&'static str],
}

impl WidgetDescriptor {
    pub fn event(&self, name: &str) -> Option<&EventDescriptor> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Action events whose declared done event is missing from the list
    pub fn unpaired_actions(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter(|e| e.done.is_some_and(|done| self.event(done).is_none()))
            .map(|e| e.name)
            .collect()
    }
}

/// A widget type that can be built from validated options
pub trait WidgetKind: Widget + Sized + 'static {
    fn descriptor() -> WidgetDescriptor;

    fn create(instance: &str, options: Options, bus: &EventBus) -> Result<Self, ConfigError>;
}

pub struct WidgetRegistry {
    descriptors: HashMap<String, WidgetDescriptor>,
    factories: HashMap<String, WidgetFactory>,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
            factories: HashMap::new(),
        }
    }

    pub fn register(&mut self, descriptor: WidgetDescriptor, factory: WidgetFactory) {
        self.descriptors
            .insert(descriptor.kind.to_string(), descriptor);
        self.factories.insert(descriptor.kind.to_string(), factory);
    }

    pub fn descriptor(&self, kind: &str) -> Option<&WidgetDescriptor> {
        self.descriptors.get(kind)
    }

    pub fn list_widgets(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn schema(&self, kind: &str) -> Result<OptionSchema, ConfigError> {
        self.descriptor(kind)
            .map(|d| (d.schema)())
            .ok_or_else(|| ConfigError::UnknownWidget(kind.to_string()))
    }

    /// Validate a widget configuration without building the widget
    pub fn validate(&self, config: &WidgetConfig) -> Result<Validated, ConfigError> {
        self.schema(&config.kind)?.validate(&config.options)
    }

    pub fn create(
        &self,
        config: &WidgetConfig,
        bus: &EventBus,
    ) -> Result<Box<dyn Widget>, ConfigError> {
        let factory = self
            .factories
            .get(&config.kind)
            .ok_or_else(|| ConfigError::UnknownWidget(config.kind.clone()))?;
        let options = Options::new(self.schema(&config.kind)?, &config.options)?;
        log::debug!("creating {} '{}'", config.kind, config.name);
        factory(&config.name, options, bus)
    }
}

#[macro_export]
macro_rules! register_widget {
    ($registry:expr, $widget_type:ty) => {
        $registry.register(
            <$widget_type as $crate::WidgetKind>::descriptor(),
            Box::new(|instance, options, bus| {
                let widget = <$widget_type as $crate::WidgetKind>::create(instance, options, bus)?;
                Ok(Box::new(widget) as Box<dyn $crate::Widget>)
            }),
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentRef, Dispatcher, OptionType};
    use serde_json::json;
    use std::any::Any;

    struct Clock {
        dispatcher: Dispatcher,
        options: Options,
    }

    impl Widget for Clock {
        fn kind(&self) -> &'static str {
            "clock"
        }

        fn dispatcher(&self) -> &Dispatcher {
            &self.dispatcher
        }

        fn dispatcher_mut(&mut self) -> &mut Dispatcher {
            &mut self.dispatcher
        }

        fn options(&self) -> &Options {
            &self.options
        }

        fn options_mut(&mut self) -> &mut Options {
            &mut self.options
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    const CLOCK_EVENTS: &[EventDescriptor] = &[
        EventDescriptor::action("alarmSetting", "alarmSet"),
        EventDescriptor::notify("alarmSet"),
        EventDescriptor::action("alarmClearing", "alarmCleared"),
    ];

    impl WidgetKind for Clock {
        fn descriptor() -> WidgetDescriptor {
            WidgetDescriptor {
                kind: "clock",
                schema: || {
                    OptionSchema::new().option(
                        "format",
                        OptionType::Enum(&["12h", "24h"]),
                        json!("24h"),
                    )
                },
                events: CLOCK_EVENTS,
                methods: &["setAlarm"],
            }
        }

        fn create(instance: &str, options: Options, bus: &EventBus) -> Result<Self, ConfigError> {
            Ok(Self {
                dispatcher: Dispatcher::new(ComponentRef::new("clock", instance), bus.clone()),
                options,
            })
        }
    }

    fn registry() -> WidgetRegistry {
        let mut registry = WidgetRegistry::new();
        crate::register_widget!(registry, Clock);
        registry
    }

    #[test]
    fn test_create_applies_defaults() {
        let registry = registry();
        let widget = registry
            .create(&WidgetConfig::new("c", "clock"), &EventBus::new())
            .unwrap();
        assert_eq!(widget.kind(), "clock");
        assert_eq!(widget.instance(), "c");
        assert_eq!(widget.option("format"), Some(&json!("24h")));
    }

    #[test]
    fn test_unknown_kind() {
        let err = registry()
            .create(&WidgetConfig::new("x", "gauge"), &EventBus::new())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::UnknownWidget(kind) if kind == "gauge"));
    }

    #[test]
    fn test_validate_reports_enum_error() {
        let mut config = WidgetConfig::new("c", "clock");
        config.options = json!({ "format": "36h" });
        assert!(matches!(
            registry().validate(&config),
            Err(ConfigError::NotInEnum { .. })
        ));
    }

    #[test]
    fn test_unpaired_actions_detected() {
        let descriptor = Clock::descriptor();
        assert_eq!(descriptor.unpaired_actions(), vec!["alarmClearing"]);
        assert_eq!(registry().list_widgets(), vec!["clock"]);
    }
}
