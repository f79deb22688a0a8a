// uiconf-widgets/src/scheduler/actions.rs
use serde_json::Value;
use uiconf_core::{ActionOutcome, Cancel, Decision, ErrorCode, OperationError, Widget, confirm};

use super::{
    Appointment, AppointmentAddedEvent, AppointmentAddingEvent, AppointmentDeletedEvent,
    AppointmentDeletingEvent, AppointmentUpdatedEvent, AppointmentUpdatingEvent, Scheduler,
};

pub type AppointmentResult = Result<ActionOutcome<Appointment>, OperationError>;

fn require_object(data: &Value) -> Result<(), OperationError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(OperationError::new(
            ErrorCode::Unspecified,
            "Appointment data must be an object.",
        ))
    }
}

/// `Ok(false)` when a handler cancelled without an error
fn proceed(decision: Decision) -> Result<bool, OperationError> {
    match decision {
        Decision::Proceed => Ok(true),
        Decision::Cancelled => Ok(false),
        Decision::Failed(err) => Err(err),
    }
}

impl Scheduler {
    /// Add an appointment to the store after `appointmentAdding` allows it
    pub async fn add_appointment(&mut self, appointment: Appointment) -> AppointmentResult {
        require_object(&appointment)?;
        let mut event = AppointmentAddingEvent {
            component: self.component(),
            appointment_data: appointment,
            cancel: Cancel::default(),
        };
        let decision = confirm(&mut self.dispatcher, &mut event).await;
        if !proceed(decision)? {
            return Ok(ActionOutcome::Cancelled);
        }

        // handlers may have edited the data
        let data = event.appointment_data;
        let inserted = self.store.insert(&data).await;
        let component = self.component();
        match inserted {
            Ok(saved) => {
                self.dispatcher.notify(AppointmentAddedEvent {
                    component,
                    appointment_data: saved.clone(),
                    error: None,
                });
                self.repaint().await;
                Ok(ActionOutcome::Completed(saved))
            }
            Err(err) => {
                log::warn!("{}: adding appointment failed: {}", self.instance(), err);
                self.dispatcher.notify(AppointmentAddedEvent {
                    component,
                    appointment_data: data,
                    error: Some(err.clone()),
                });
                Err(err)
            }
        }
    }

    /// Replace `target` with `appointment`
    pub async fn update_appointment(
        &mut self,
        target: &Appointment,
        appointment: Appointment,
    ) -> AppointmentResult {
        require_object(&appointment)?;
        let mut event = AppointmentUpdatingEvent {
            component: self.component(),
            old_data: target.clone(),
            new_data: appointment,
            cancel: Cancel::default(),
        };
        let decision = confirm(&mut self.dispatcher, &mut event).await;
        if !proceed(decision)? {
            return Ok(ActionOutcome::Cancelled);
        }

        let data = event.new_data;
        let updated = self.store.update(target, &data).await;
        let component = self.component();
        match updated {
            Ok(saved) => {
                self.dispatcher.notify(AppointmentUpdatedEvent {
                    component,
                    appointment_data: saved.clone(),
                    error: None,
                });
                self.repaint().await;
                Ok(ActionOutcome::Completed(saved))
            }
            Err(err) => {
                log::warn!("{}: updating appointment failed: {}", self.instance(), err);
                self.dispatcher.notify(AppointmentUpdatedEvent {
                    component,
                    appointment_data: data,
                    error: Some(err.clone()),
                });
                Err(err)
            }
        }
    }

    pub async fn delete_appointment(&mut self, appointment: Appointment) -> AppointmentResult {
        require_object(&appointment)?;
        let mut event = AppointmentDeletingEvent {
            component: self.component(),
            appointment_data: appointment,
            cancel: Cancel::default(),
        };
        let decision = confirm(&mut self.dispatcher, &mut event).await;
        if !proceed(decision)? {
            return Ok(ActionOutcome::Cancelled);
        }

        let data = event.appointment_data;
        let removed = self.store.remove(&data).await;
        let component = self.component();
        let error = removed.as_ref().err().cloned();
        if let Some(err) = &error {
            log::warn!("{}: deleting appointment failed: {}", self.instance(), err);
        }
        self.dispatcher.notify(AppointmentDeletedEvent {
            component,
            appointment_data: data.clone(),
            error,
        });
        removed?;
        self.repaint().await;
        Ok(ActionOutcome::Completed(data))
    }

    /// Close the edit form, saving its data unless the form is read-only
    pub async fn hide_appointment_popup(
        &mut self,
        save: bool,
    ) -> Result<Option<ActionOutcome<Appointment>>, OperationError> {
        let Some(popup) = self.popup.take() else {
            return Ok(None);
        };
        if !save || popup.read_only {
            return Ok(None);
        }
        let outcome = match popup.original {
            Some(original) => self.update_appointment(&original, popup.data).await?,
            None => self.add_appointment(popup.data).await?,
        };
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{record, sample_store, scheduler};
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn lunch() -> Appointment {
        json!({
            "text": "Lunch",
            "startDate": "2021-04-28T12:00:00Z",
            "endDate": "2021-04-28T13:00:00Z"
        })
    }

    #[test]
    fn test_add_fires_adding_then_added() {
        let mut s = scheduler(Value::Null);
        let adding = record_adding(&mut s);
        let added = record::<AppointmentAddedEvent>(&mut s);

        let outcome = block_on(s.add_appointment(lunch())).unwrap();

        assert_eq!(outcome, ActionOutcome::Completed(lunch()));
        assert_eq!(*adding.borrow(), vec!["Lunch".to_string()]);
        assert_eq!(added.borrow().len(), 1);
        assert!(added.borrow()[0].error.is_none());
        let stored = block_on(s.get_data_source().load()).unwrap();
        assert!(stored.contains(&lunch()));
    }

    fn record_adding(s: &mut Scheduler) -> std::rc::Rc<std::cell::RefCell<Vec<String>>> {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = seen.clone();
        s.on(move |e: &mut AppointmentAddingEvent| {
            log.borrow_mut()
                .push(e.appointment_data["text"].as_str().unwrap_or_default().to_string());
        });
        seen
    }

    #[test]
    fn test_handler_can_edit_data_before_add() {
        let mut s = scheduler(Value::Null);
        s.on(|e: &mut AppointmentAddingEvent| e.appointment_data["text"] = json!("Team lunch"));

        let saved = block_on(s.add_appointment(lunch())).unwrap().completed().unwrap();
        assert_eq!(saved["text"], "Team lunch");
    }

    #[test]
    fn test_deferred_cancel_skips_store() {
        let mut s = scheduler(Value::Null);
        let added = record::<AppointmentAddedEvent>(&mut s);
        s.on(|e: &mut AppointmentAddingEvent| e.cancel.defer(async { true }));

        let outcome = block_on(s.add_appointment(lunch())).unwrap();

        assert!(outcome.is_cancelled());
        assert!(added.borrow().is_empty());
        assert_eq!(block_on(s.get_data_source().load()).unwrap().len(), 3);
    }

    #[test]
    fn test_non_object_rejected() {
        let mut s = scheduler(Value::Null);
        let err = block_on(s.add_appointment(json!("Lunch"))).unwrap_err();
        assert_eq!(err.text, "Appointment data must be an object.");
    }

    #[test]
    fn test_update_reports_old_and_new_data() {
        let mut s = scheduler(Value::Null);
        let standup = sample_store().items()[0].clone();
        let old = std::rc::Rc::new(std::cell::RefCell::new(Value::Null));
        let log = old.clone();
        s.on(move |e: &mut AppointmentUpdatingEvent| *log.borrow_mut() = e.old_data.clone());
        let updated = record::<AppointmentUpdatedEvent>(&mut s);

        let mut moved = standup.clone();
        moved["startDate"] = json!("2021-04-28T09:30:00Z");
        block_on(s.update_appointment(&standup, moved.clone())).unwrap();

        assert_eq!(*old.borrow(), standup);
        assert_eq!(updated.borrow()[0].appointment_data, moved);
        assert!(block_on(s.get_data_source().load()).unwrap().contains(&moved));
    }

    #[test]
    fn test_cancelled_update_keeps_store() {
        let mut s = scheduler(Value::Null);
        let standup = sample_store().items()[0].clone();
        s.on(|e: &mut AppointmentUpdatingEvent| e.cancel.set(true));
        let updated = record::<AppointmentUpdatedEvent>(&mut s);

        let mut moved = standup.clone();
        moved["startDate"] = json!("2021-04-28T09:30:00Z");
        let outcome = block_on(s.update_appointment(&standup, moved.clone())).unwrap();

        assert!(outcome.is_cancelled());
        assert!(updated.borrow().is_empty());
        let stored = block_on(s.get_data_source().load()).unwrap();
        assert!(stored.contains(&standup));
        assert!(!stored.contains(&moved));
    }

    #[test]
    fn test_cancelled_delete_keeps_store() {
        let mut s = scheduler(Value::Null);
        let standup = sample_store().items()[0].clone();
        s.on(|e: &mut AppointmentDeletingEvent| e.cancel.defer(async { true }));
        let deleted = record::<AppointmentDeletedEvent>(&mut s);

        let outcome = block_on(s.delete_appointment(standup.clone())).unwrap();

        assert!(outcome.is_cancelled());
        assert!(deleted.borrow().is_empty());
        let stored = block_on(s.get_data_source().load()).unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.contains(&standup));
    }

    #[test]
    fn test_failed_delete_reports_error_in_done_event() {
        let mut s = scheduler(Value::Null);
        let deleted = record::<AppointmentDeletedEvent>(&mut s);

        let err = block_on(s.delete_appointment(lunch())).unwrap_err();

        assert_eq!(err.text, "Appointment not found.");
        assert_eq!(deleted.borrow().len(), 1);
        assert_eq!(deleted.borrow()[0].error.as_ref(), Some(&err));
    }

    #[test]
    fn test_delete_repaints_rendered_view() {
        let mut s = scheduler(Value::Null);
        block_on(s.render_appointments()).unwrap();
        assert_eq!(s.rendered_appointments().len(), 1);

        let standup = sample_store().items()[0].clone();
        block_on(s.delete_appointment(standup)).unwrap();
        assert!(s.rendered_appointments().is_empty());
    }

    #[test]
    fn test_popup_save_updates_edited_copy() {
        let mut s = scheduler(Value::Null);
        let standup = sample_store().items()[0].clone();
        assert!(s.dbl_click_appointment(standup.clone()));
        if let Some(popup) = s.popup_mut() {
            popup.data["text"] = json!("Daily standup");
        }

        let saved = block_on(s.hide_appointment_popup(true)).unwrap();

        let saved = saved.and_then(ActionOutcome::completed).unwrap();
        assert_eq!(saved["text"], "Daily standup");
        assert!(!block_on(s.get_data_source().load()).unwrap().contains(&standup));
        assert!(s.popup().is_none());
    }

    #[test]
    fn test_popup_save_adds_new_appointment() {
        let mut s = scheduler(Value::Null);
        let added = record::<AppointmentAddedEvent>(&mut s);
        assert!(s.show_appointment_popup(None, true, None));

        block_on(s.hide_appointment_popup(true)).unwrap();
        assert_eq!(added.borrow().len(), 1);
        assert_eq!(block_on(s.get_data_source().load()).unwrap().len(), 4);

        assert!(block_on(s.hide_appointment_popup(true)).unwrap().is_none());
    }

    #[test]
    fn test_done_events_reach_bus() {
        let bus = uiconf_core::EventBus::new();
        let (_sub, rx) = bus.subscribe("scheduler.*");
        let options = uiconf_core::Options::new(
            super::super::options::schema(),
            &json!({ "currentDate": "2021-04-28" }),
        )
        .unwrap();
        let mut s = Scheduler::new("calendar", options, &bus, Box::new(sample_store())).unwrap();

        block_on(s.add_appointment(lunch())).unwrap();

        let topics: Vec<String> = rx.try_iter().map(|e| e.topic).collect();
        assert!(topics.contains(&"scheduler.appointmentAdded".to_string()));
        assert!(!topics.iter().any(|t| t.ends_with("appointmentAdding")));
    }
}
