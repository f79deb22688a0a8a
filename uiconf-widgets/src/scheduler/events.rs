// uiconf-widgets/src/scheduler/events.rs
use chrono::{DateTime, Utc};
use serde_json::Value;
use uiconf_core::{ActionEvent, Cancel, ComponentRef, EventDescriptor, OperationError, WidgetEvent};

use super::appointment::Appointment;

macro_rules! events {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(impl WidgetEvent for $ty {
            const NAME: &'static str = $name;
        })+
    };
}

macro_rules! action_events {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl WidgetEvent for $ty {
                const NAME: &'static str = $name;
            }

            impl ActionEvent for $ty {
                fn cancel_mut(&mut self) -> &mut Cancel {
                    &mut self.cancel
                }
            }
        )+
    };
}

/// A cell of the view's grid
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub all_day: bool,
    /// Resource values of the group the cell belongs to
    pub groups: Option<Value>,
}

impl CellData {
    pub fn to_value(&self) -> Value {
        let mut value = serde_json::json!({
            "startDate": uiconf_core::date_to_value(self.start_date),
            "endDate": uiconf_core::date_to_value(self.end_date),
            "allDay": self.all_day,
        });
        if let (Some(groups), Some(map)) = (&self.groups, value.as_object_mut()) {
            map.insert("groups".to_string(), groups.clone());
        }
        value
    }
}

#[derive(Debug)]
pub struct AppointmentAddingEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub cancel: Cancel,
}

/// Fired after the store call; `error` is set when it failed
#[derive(Debug, Clone)]
pub struct AppointmentAddedEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub error: Option<OperationError>,
}

#[derive(Debug)]
pub struct AppointmentUpdatingEvent {
    pub component: ComponentRef,
    pub old_data: Appointment,
    pub new_data: Appointment,
    pub cancel: Cancel,
}

#[derive(Debug, Clone)]
pub struct AppointmentUpdatedEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub error: Option<OperationError>,
}

#[derive(Debug)]
pub struct AppointmentDeletingEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub cancel: Cancel,
}

#[derive(Debug, Clone)]
pub struct AppointmentDeletedEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub error: Option<OperationError>,
}

#[derive(Debug, Clone)]
pub struct AppointmentClickEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub targeted_appointment_data: Appointment,
    pub cancel: bool,
}

#[derive(Debug, Clone)]
pub struct AppointmentDblClickEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub targeted_appointment_data: Appointment,
    pub cancel: bool,
}

#[derive(Debug, Clone)]
pub struct AppointmentContextMenuEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub targeted_appointment_data: Appointment,
}

#[derive(Debug, Clone)]
pub struct AppointmentRenderedEvent {
    pub component: ComponentRef,
    pub appointment_data: Appointment,
    pub targeted_appointment_data: Appointment,
}

/// Raised before the edit form opens; `read_only` may be flipped by handlers
#[derive(Debug, Clone)]
pub struct AppointmentFormOpeningEvent {
    pub component: ComponentRef,
    pub appointment_data: Option<Appointment>,
    pub read_only: bool,
    pub cancel: bool,
}

#[derive(Debug, Clone)]
pub struct CellClickEvent {
    pub component: ComponentRef,
    pub cell_data: CellData,
    pub cancel: bool,
}

#[derive(Debug, Clone)]
pub struct CellContextMenuEvent {
    pub component: ComponentRef,
    pub cell_data: CellData,
}

events! {
    AppointmentAddedEvent => "appointmentAdded",
    AppointmentUpdatedEvent => "appointmentUpdated",
    AppointmentDeletedEvent => "appointmentDeleted",
    AppointmentClickEvent => "appointmentClick",
    AppointmentDblClickEvent => "appointmentDblClick",
    AppointmentContextMenuEvent => "appointmentContextMenu",
    AppointmentRenderedEvent => "appointmentRendered",
    AppointmentFormOpeningEvent => "appointmentFormOpening",
    CellClickEvent => "cellClick",
    CellContextMenuEvent => "cellContextMenu",
}

action_events! {
    AppointmentAddingEvent => "appointmentAdding",
    AppointmentUpdatingEvent => "appointmentUpdating",
    AppointmentDeletingEvent => "appointmentDeleting",
}

pub(crate) const EVENTS: &[EventDescriptor] = &[
    EventDescriptor::notify("contentReady"),
    EventDescriptor::notify("disposing"),
    EventDescriptor::notify("initialized"),
    EventDescriptor::notify("optionChanged"),
    EventDescriptor::action("appointmentAdding", "appointmentAdded"),
    EventDescriptor::notify("appointmentAdded"),
    EventDescriptor::action("appointmentUpdating", "appointmentUpdated"),
    EventDescriptor::notify("appointmentUpdated"),
    EventDescriptor::action("appointmentDeleting", "appointmentDeleted"),
    EventDescriptor::notify("appointmentDeleted"),
    EventDescriptor::cancelable("appointmentClick"),
    EventDescriptor::cancelable("appointmentDblClick"),
    EventDescriptor::notify("appointmentContextMenu"),
    EventDescriptor::notify("appointmentRendered"),
    EventDescriptor::cancelable("appointmentFormOpening"),
    EventDescriptor::cancelable("cellClick"),
    EventDescriptor::notify("cellContextMenu"),
];
