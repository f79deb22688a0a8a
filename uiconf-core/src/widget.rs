// uiconf-core/src/widget.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::any::Any;

use crate::event::{ContentReadyEvent, DisposingEvent, InitializedEvent, OptionChangedEvent};
use crate::{ConfigError, Dispatcher, OptionChange, OptionSchema, OptionType, Options, WidgetEvent};

/// Core widget trait with lifecycle hooks
pub trait Widget {
    /// Registered kind, e.g. `fileManager`
    fn kind(&self) -> &'static str;

    fn dispatcher(&self) -> &Dispatcher;

    fn dispatcher_mut(&mut self) -> &mut Dispatcher;

    fn options(&self) -> &Options;

    fn options_mut(&mut self) -> &mut Options;

    /// Apply widget-specific reactions after an option changed
    fn on_option_changed(&mut self, _change: &OptionChange) -> Result<(), ConfigError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn instance(&self) -> &str {
        &self.dispatcher().component().instance
    }

    fn option(&self, path: &str) -> Option<&Value> {
        self.options().get(path)
    }

    /// Change an option, notify `optionChanged`, then let the widget react
    fn set_option(&mut self, path: &str, value: Value) -> Result<OptionChange, ConfigError> {
        let change = self.options_mut().set(path, value)?;
        let component = self.dispatcher().component().clone();
        self.dispatcher_mut()
            .notify(OptionChangedEvent::new(component, &change));
        self.on_option_changed(&change)?;
        Ok(change)
    }

    /// Called once when the widget is attached
    fn on_mount(&mut self) {
        let component = self.dispatcher().component().clone();
        self.dispatcher_mut().notify(InitializedEvent {
            component: component.clone(),
        });
        self.dispatcher_mut().notify(ContentReadyEvent { component });
    }

    /// Cleanup when widget is removed
    fn on_unmount(&mut self) {
        let component = self.dispatcher().component().clone();
        self.dispatcher_mut().notify(DisposingEvent { component });
    }

    fn on<E: WidgetEvent>(&mut self, handler: impl FnMut(&mut E) + 'static)
    where
        Self: Sized,
    {
        self.dispatcher_mut().on(handler);
    }
}

/// Container for managing widget lifecycle
pub struct WidgetContainer {
    widget: Box<dyn Widget>,
    mounted: bool,
    name: String,
}

impl WidgetContainer {
    pub fn new(name: String, widget: Box<dyn Widget>) -> Self {
        Self {
            widget,
            mounted: false,
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self) {
        if !self.mounted {
            self.widget.on_mount();
            self.mounted = true;
        }
    }

    pub fn unmount(&mut self) {
        if self.mounted {
            self.widget.on_unmount();
            self.mounted = false;
        }
    }

    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        self.widget.as_mut()
    }

    pub fn downcast_mut<T: Widget + 'static>(&mut self) -> Option<&mut T> {
        self.widget.as_any_mut().downcast_mut::<T>()
    }
}

impl Drop for WidgetContainer {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Options every widget shares, embedded by value in widget option structs
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    pub access_key: Option<String>,
    pub active_state_enabled: bool,
    pub disabled: bool,
    pub element_attr: Map<String, Value>,
    pub focus_state_enabled: bool,
    pub height: Option<Value>,
    pub hint: Option<String>,
    pub hover_state_enabled: bool,
    pub rtl_enabled: bool,
    pub tab_index: i64,
    pub visible: bool,
    pub width: Option<Value>,
}

/// Schema of [`WidgetOptions`] plus the lifecycle handler slots
pub fn base_schema() -> OptionSchema {
    OptionSchema::new()
        .option("accessKey", OptionType::String, Value::Null)
        .option("activeStateEnabled", OptionType::Bool, json!(false))
        .option("disabled", OptionType::Bool, json!(false))
        .option("elementAttr", OptionType::Object, json!({}))
        .option("focusStateEnabled", OptionType::Bool, json!(false))
        .option("height", OptionType::dimension(), Value::Null)
        .option("hint", OptionType::String, Value::Null)
        .option("hoverStateEnabled", OptionType::Bool, json!(false))
        .option("rtlEnabled", OptionType::Bool, json!(false))
        .option("tabIndex", OptionType::integer(), json!(0))
        .option("visible", OptionType::Bool, json!(true))
        .option("width", OptionType::dimension(), Value::Null)
        .handlers(&[
            "onContentReady",
            "onDisposing",
            "onInitialized",
            "onOptionChanged",
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentRef, EventBus};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Sample {
        dispatcher: Dispatcher,
        options: Options,
        reactions: Vec<String>,
    }

    impl Sample {
        fn new() -> Self {
            Self {
                dispatcher: Dispatcher::new(ComponentRef::new("sample", "p1"), EventBus::new()),
                options: Options::new(base_schema(), &Value::Null).unwrap(),
                reactions: Vec::new(),
            }
        }
    }

    impl Widget for Sample {
        fn kind(&self) -> &'static str {
            "sample"
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

        fn on_option_changed(&mut self, change: &OptionChange) -> Result<(), ConfigError> {
            self.reactions.push(change.full_name.clone());
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_base_defaults_deserialize() {
        let options = Options::new(base_schema(), &json!({ "hint": "files" })).unwrap();
        let base: WidgetOptions = options.typed().unwrap();
        assert!(base.visible);
        assert!(!base.disabled);
        assert_eq!(base.tab_index, 0);
        assert_eq!(base.hint.as_deref(), Some("files"));
        assert_eq!(base.width, None);
    }

    #[test]
    fn test_set_option_notifies_then_reacts() {
        let mut sample = Sample::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        sample.on(move |e: &mut OptionChangedEvent| {
            log.borrow_mut().push((e.full_name.clone(), e.previous_value.clone()))
        });

        sample.set_option("disabled", json!(true)).unwrap();

        assert_eq!(*seen.borrow(), vec![("disabled".to_string(), json!(false))]);
        assert_eq!(sample.reactions, vec!["disabled"]);
        assert_eq!(sample.option("disabled"), Some(&json!(true)));
    }

    #[test]
    fn test_rejected_option_does_not_notify() {
        let mut sample = Sample::new();
        let seen = Rc::new(RefCell::new(0));
        let count = seen.clone();
        sample.on(move |_: &mut OptionChangedEvent| *count.borrow_mut() += 1);

        assert!(sample.set_option("tabIndex", json!("first")).is_err());
        assert_eq!(*seen.borrow(), 0);
        assert!(sample.reactions.is_empty());
    }

    #[test]
    fn test_container_lifecycle_is_idempotent() {
        let mut sample = Sample::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        sample.on(move |_: &mut InitializedEvent| log.borrow_mut().push("initialized"));
        let log = seen.clone();
        sample.on(move |_: &mut ContentReadyEvent| log.borrow_mut().push("contentReady"));
        let log = seen.clone();
        sample.on(move |_: &mut DisposingEvent| log.borrow_mut().push("disposing"));

        let mut container = WidgetContainer::new("p1".to_string(), Box::new(sample));
        container.mount();
        container.mount();
        assert!(container.is_mounted());
        assert!(container.downcast_mut::<Sample>().is_some());
        drop(container);

        assert_eq!(
            *seen.borrow(),
            vec!["initialized", "contentReady", "disposing"]
        );
    }
}
