// uiconf-core/src/event.rs
use crossbeam::channel::{Receiver, Sender, unbounded};
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use crate::OptionChange;

/// Event payload - can be any type
#[derive(Clone)]
pub struct EventPayload(Arc<dyn Any + Send + Sync>);

impl EventPayload {
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self(Arc::new(data))
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::downcast(self.0.clone()).ok()
    }
}

/// Event with topic and payload
#[derive(Clone)]
pub struct Event {
    pub topic: String,
    pub payload: EventPayload,
}

impl Event {
    pub fn new<T: Any + Send + Sync>(topic: impl Into<String>, data: T) -> Self {
        Self {
            topic: topic.into(),
            payload: EventPayload::new(data),
        }
    }
}

/// Subscription handle - dropping this unsubscribes
pub struct Subscription {
    id: usize,
    bus: Arc<EventBusInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut subs) = self.bus.subscriptions.write() {
            subs.remove(&self.id);
        }
    }
}

/// Internal bus state
struct EventBusInner {
    subscriptions: RwLock<HashMap<usize, (String, Sender<Event>)>>,
    next_id: std::sync::atomic::AtomicUsize,
}

/// Topic-based pub/sub for observers outside the widget's own thread
///
/// Topics are `<widgetKind>.<eventName>`, e.g. `fileManager.itemRenamed`.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventBusInner {
                subscriptions: RwLock::new(HashMap::new()),
                next_id: std::sync::atomic::AtomicUsize::new(0),
            }),
        }
    }

    /// Publish an event to all matching subscribers
    pub fn publish(&self, event: Event) {
        let Ok(subs) = self.inner.subscriptions.read() else {
            log::error!("event bus lock poisoned, dropping '{}'", event.topic);
            return;
        };

        for (pattern, tx) in subs.values() {
            if Self::topic_matches(&event.topic, pattern) {
                // Ignore send errors (subscriber dropped)
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Subscribe to topics with wildcard support
    /// Returns (Subscription, Receiver) - drop Subscription to unsubscribe
    pub fn subscribe(&self, pattern: impl Into<String>) -> (Subscription, Receiver<Event>) {
        let (tx, rx) = unbounded();
        let pattern = pattern.into();

        let id = self
            .inner
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if let Ok(mut subs) = self.inner.subscriptions.write() {
            subs.insert(id, (pattern, tx));
        }

        let sub = Subscription {
            id,
            bus: self.inner.clone(),
        };

        (sub, rx)
    }

    /// Check if topic matches pattern (supports * wildcard)
    fn topic_matches(topic: &str, pattern: &str) -> bool {
        // Exact match
        if topic == pattern {
            return true;
        }

        // Wildcard matching
        let topic_parts: Vec<&str> = topic.split('.').collect();
        let pattern_parts: Vec<&str> = pattern.split('.').collect();

        if pattern_parts.len() > topic_parts.len() {
            return false;
        }

        for (i, pattern_part) in pattern_parts.iter().enumerate() {
            if *pattern_part == "*" {
                // Wildcard at end matches everything remaining
                if i == pattern_parts.len() - 1 {
                    return true;
                }
                continue;
            }

            if i >= topic_parts.len() || topic_parts[i] != *pattern_part {
                return false;
            }
        }

        pattern_parts.len() == topic_parts.len()
    }
}

/// Which widget instance raised an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub kind: &'static str,
    pub instance: String,
}

impl ComponentRef {
    pub fn new(kind: &'static str, instance: impl Into<String>) -> Self {
        Self {
            kind,
            instance: instance.into(),
        }
    }
}

/// A typed widget event
pub trait WidgetEvent: Any {
    /// camelCase event name, used for bus topics and descriptors
    const NAME: &'static str;
}

/// Deferred cancellation flag of an "-ing" event
///
/// Always a single-resolution future; `true`/`false` are already resolved.
pub struct Cancel(LocalBoxFuture<'static, bool>);

impl Cancel {
    pub fn new(value: bool) -> Self {
        Self(future::ready(value).boxed_local())
    }

    pub fn set(&mut self, value: bool) {
        *self = Self::new(value);
    }

    /// Let the decision resolve later; `true` cancels
    pub fn defer<F>(&mut self, decision: F)
    where
        F: Future<Output = bool> + 'static,
    {
        self.0 = decision.boxed_local();
    }

    pub async fn resolve(self) -> bool {
        self.0.await
    }
}

impl Default for Cancel {
    fn default() -> Self {
        Self::new(false)
    }
}

impl From<bool> for Cancel {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for Cancel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cancel(..)")
    }
}

type ErasedHandler = Box<dyn FnMut(&mut dyn Any)>;

/// Handlers of one widget instance, keyed by event type
#[derive(Default)]
pub struct Handlers {
    slots: HashMap<TypeId, Vec<ErasedHandler>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<E: WidgetEvent>(&mut self, mut handler: impl FnMut(&mut E) + 'static) {
        self.slots
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Box::new(move |event: &mut dyn Any| {
                if let Some(event) = event.downcast_mut::<E>() {
                    handler(event);
                }
            }));
    }

    /// Run handlers in registration order
    pub fn emit<E: WidgetEvent>(&mut self, event: &mut E) {
        if let Some(handlers) = self.slots.get_mut(&TypeId::of::<E>()) {
            for handler in handlers.iter_mut() {
                handler(&mut *event);
            }
        }
    }

    pub fn has<E: WidgetEvent>(&self) -> bool {
        self.slots
            .get(&TypeId::of::<E>())
            .is_some_and(|handlers| !handlers.is_empty())
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("event_types", &self.slots.len())
            .finish()
    }
}

/// Handler registry plus bus publishing for one widget instance
pub struct Dispatcher {
    component: ComponentRef,
    handlers: Handlers,
    bus: EventBus,
}

impl Dispatcher {
    pub fn new(component: ComponentRef, bus: EventBus) -> Self {
        Self {
            component,
            handlers: Handlers::new(),
            bus,
        }
    }

    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn on<E: WidgetEvent>(&mut self, handler: impl FnMut(&mut E) + 'static) {
        self.handlers.on(handler);
    }

    /// Run handlers only; used for cancelable events
    pub fn emit<E: WidgetEvent>(&mut self, event: &mut E) {
        self.handlers.emit(event);
    }

    /// Run handlers, then publish the (possibly mutated) event on the bus
    pub fn notify<E>(&mut self, mut event: E) -> E
    where
        E: WidgetEvent + Clone + Send + Sync,
    {
        self.handlers.emit(&mut event);
        let topic = format!("{}.{}", self.component.kind, E::NAME);
        log::trace!("publishing {}", topic);
        self.bus.publish(Event::new(topic, event.clone()));
        event
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("component", &self.component)
            .field("handlers", &self.handlers)
            .finish()
    }
}

// Lifecycle events shared by every widget
#[derive(Debug, Clone)]
pub struct InitializedEvent {
    pub component: ComponentRef,
}

impl WidgetEvent for InitializedEvent {
    const NAME: &'static str = "initialized";
}

#[derive(Debug, Clone)]
pub struct ContentReadyEvent {
    pub component: ComponentRef,
}

impl WidgetEvent for ContentReadyEvent {
    const NAME: &'static str = "contentReady";
}

#[derive(Debug, Clone)]
pub struct DisposingEvent {
    pub component: ComponentRef,
}

impl WidgetEvent for DisposingEvent {
    const NAME: &'static str = "disposing";
}

#[derive(Debug, Clone)]
pub struct OptionChangedEvent {
    pub component: ComponentRef,
    pub name: String,
    pub full_name: String,
    pub value: Value,
    pub previous_value: Value,
}

impl OptionChangedEvent {
    pub fn new(component: ComponentRef, change: &OptionChange) -> Self {
        Self {
            component,
            name: change.name.clone(),
            full_name: change.full_name.clone(),
            value: change.value.clone(),
            previous_value: change.previous_value.clone(),
        }
    }
}

impl WidgetEvent for OptionChangedEvent {
    const NAME: &'static str = "optionChanged";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_topic_matching() {
        assert!(EventBus::topic_matches("fileManager.itemRenamed", "fileManager.itemRenamed"));
        assert!(EventBus::topic_matches("fileManager.itemRenamed", "fileManager.*"));
        assert!(EventBus::topic_matches("scheduler.appointmentAdded", "*"));
        assert!(!EventBus::topic_matches("scheduler.appointmentAdded", "fileManager.*"));
    }

    #[test]
    fn test_pubsub() {
        let bus = EventBus::new();
        let (_sub, rx) = bus.subscribe("fileManager.*");

        let component = ComponentRef::new("fileManager", "files");
        bus.publish(Event::new(
            "fileManager.contentReady",
            ContentReadyEvent {
                component: component.clone(),
            },
        ));

        let event = rx.recv().unwrap();
        assert_eq!(event.topic, "fileManager.contentReady");

        let received: Arc<ContentReadyEvent> = event.payload.downcast().unwrap();
        assert_eq!(received.component, component);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let (sub, rx) = bus.subscribe("test");

        bus.publish(Event::new("test", 42));
        assert!(rx.recv().is_ok());

        drop(sub); // Unsubscribe

        bus.publish(Event::new("test", 43));
        assert!(rx.recv().is_err()); // Channel closed
    }

    #[test]
    fn test_handlers_run_in_order_and_see_mutations() {
        let mut handlers = Handlers::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        handlers.on(move |e: &mut OptionChangedEvent| {
            log.borrow_mut().push(e.name.clone());
            e.name = "renamed".to_string();
        });
        let log = seen.clone();
        handlers.on(move |e: &mut OptionChangedEvent| log.borrow_mut().push(e.name.clone()));

        let mut event = OptionChangedEvent {
            component: ComponentRef::new("scheduler", "cal"),
            name: "currentView".to_string(),
            full_name: "currentView".to_string(),
            value: Value::Null,
            previous_value: Value::Null,
        };
        handlers.emit(&mut event);

        assert_eq!(*seen.borrow(), vec!["currentView", "renamed"]);
        assert!(handlers.has::<OptionChangedEvent>());
        assert!(!handlers.has::<DisposingEvent>());
    }

    #[test]
    fn test_cancel_resolves_sync_and_deferred() {
        assert!(!futures::executor::block_on(Cancel::default().resolve()));
        assert!(futures::executor::block_on(Cancel::from(true).resolve()));

        let mut cancel = Cancel::default();
        cancel.defer(async { true });
        assert!(futures::executor::block_on(cancel.resolve()));
    }

    #[test]
    fn test_dispatcher_notify_publishes_mutated_event() {
        let bus = EventBus::new();
        let (_sub, rx) = bus.subscribe("pivotGrid.disposing");
        let mut dispatcher = Dispatcher::new(ComponentRef::new("pivotGrid", "p"), bus);
        dispatcher.on(|e: &mut DisposingEvent| e.component.instance = "changed".to_string());

        let event = dispatcher.notify(DisposingEvent {
            component: dispatcher.component().clone(),
        });
        assert_eq!(event.component.instance, "changed");

        let published: Arc<DisposingEvent> = rx.recv().unwrap().payload.downcast().unwrap();
        assert_eq!(published.component.instance, "changed");
    }
}
