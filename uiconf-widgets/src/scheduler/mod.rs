// uiconf-widgets/src/scheduler/mod.rs
//! Scheduler widget
//!
//! Appointments live in an [`AppointmentStore`]; the widget computes the
//! visible date range, routes clicks through cancelable events and wraps
//! add/update/delete in the two-phase "-ing"/done protocol.

mod actions;
pub mod appointment;
pub mod events;
pub mod options;
pub mod store;
pub mod view;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde_json::{Value, json};
use std::any::Any;
use uiconf_core::event::OptionChangedEvent;
use uiconf_core::{
    ComponentRef, ConfigError, Dispatcher, EventBus, OperationError, OptionChange, Options,
    Widget, WidgetDescriptor, WidgetKind, date_from_value,
};

pub use actions::AppointmentResult;
pub use appointment::{Appointment, FieldExpressions};
pub use events::*;
pub use options::{
    Editing, MaxAppointmentsPerCell, RecurrenceEditMode, SchedulerOptions, ViewConfig,
};
pub use store::{AppointmentStore, InMemoryAppointmentStore};
pub use view::{ViewRange, ViewSettings, ViewType, view_range};

/// The appointment edit form
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentPopup {
    /// Working copy edited by the host before the popup is closed
    pub data: Appointment,
    /// Appointment being edited; `None` for a new one
    pub original: Option<Appointment>,
    /// Occurrence the popup was opened for
    pub current: Option<Appointment>,
    pub create_new: bool,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentTooltip {
    pub data: Appointment,
    pub target: String,
    pub current: Option<Appointment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTarget {
    pub date: DateTime<Utc>,
    pub group: Option<Value>,
    pub all_day: bool,
}

pub struct Scheduler {
    dispatcher: Dispatcher,
    options: Options,
    settings: SchedulerOptions,
    fields: FieldExpressions,
    store: Box<dyn AppointmentStore>,
    rendered: Vec<Appointment>,
    painted: bool,
    popup: Option<AppointmentPopup>,
    tooltip: Option<AppointmentTooltip>,
    scroll_position: Option<ScrollTarget>,
}

fn validate_day_hours(settings: &SchedulerOptions) -> Result<(), ConfigError> {
    let view = settings.current_view_config();
    let start = view.start_day_hour.unwrap_or(settings.start_day_hour);
    let end = view.end_day_hour.unwrap_or(settings.end_day_hour);
    if start >= end {
        return Err(ConfigError::OutOfRange {
            key: "startDayHour".to_string(),
            detail: format!("{} must be less than endDayHour ({})", start, end),
        });
    }
    Ok(())
}

impl Scheduler {
    pub fn new(
        instance: &str,
        options: Options,
        bus: &EventBus,
        store: Box<dyn AppointmentStore>,
    ) -> Result<Self, ConfigError> {
        let settings: SchedulerOptions = options.typed()?;
        validate_day_hours(&settings)?;
        let fields = FieldExpressions::from_options(&settings);

        Ok(Self {
            dispatcher: Dispatcher::new(ComponentRef::new("scheduler", instance), bus.clone()),
            options,
            settings,
            fields,
            store,
            rendered: Vec::new(),
            painted: false,
            popup: None,
            tooltip: None,
            scroll_position: None,
        })
    }

    pub fn settings(&self) -> &SchedulerOptions {
        &self.settings
    }

    pub fn fields(&self) -> &FieldExpressions {
        &self.fields
    }

    pub fn get_data_source(&self) -> &dyn AppointmentStore {
        self.store.as_ref()
    }

    pub fn current_view(&self) -> ViewType {
        self.settings.current_view
    }

    /// `currentDate` kept inside `min`/`max`
    pub fn current_date(&self) -> DateTime<Utc> {
        let mut date = self.settings.current_date;
        if let Some(min) = self.settings.min {
            date = date.max(min);
        }
        if let Some(max) = self.settings.max {
            date = date.min(max);
        }
        date
    }

    pub fn cell_duration(&self) -> f64 {
        self.settings
            .current_view_config()
            .cell_duration
            .unwrap_or(self.settings.cell_duration)
    }

    pub fn view_settings(&self) -> ViewSettings {
        let view = self.settings.current_view_config();
        ViewSettings {
            view_type: self.settings.current_view,
            current_date: self.current_date(),
            first_day_of_week: view
                .first_day_of_week
                .or(self.settings.first_day_of_week)
                .unwrap_or(0),
            interval_count: view.interval_count,
            agenda_duration: view.agenda_duration,
            start_day_hour: view.start_day_hour.unwrap_or(self.settings.start_day_hour),
            end_day_hour: view.end_day_hour.unwrap_or(self.settings.end_day_hour),
            start_date: view.start_date,
        }
    }

    pub fn view_range(&self) -> ViewRange {
        view_range(&self.view_settings())
    }

    pub fn get_start_view_date(&self) -> DateTime<Utc> {
        self.view_range().start
    }

    pub fn get_end_view_date(&self) -> DateTime<Utc> {
        self.view_range().end
    }

    /// Appointments shown by the last render
    pub fn rendered_appointments(&self) -> &[Appointment] {
        &self.rendered
    }

    /// Load the appointments overlapping the view and raise `appointmentRendered` for each
    pub async fn render_appointments(&mut self) -> Result<Vec<Appointment>, OperationError> {
        let loaded = self.store.load().await;
        let loaded = match loaded {
            Ok(items) => items,
            Err(err) => {
                log::warn!("{}: loading appointments failed: {}", self.instance(), err);
                return Err(err);
            }
        };

        let range = self.view_range();
        let cell_duration = self.cell_duration();
        let visible: Vec<Appointment> = loaded
            .into_iter()
            .filter(|data| appointment::is_visible(data))
            .filter(|data| {
                self.fields
                    .span(data, cell_duration)
                    .is_some_and(|(start, end)| range.overlaps(start, end))
            })
            .collect();

        for data in &visible {
            let component = self.component();
            self.dispatcher.notify(AppointmentRenderedEvent {
                component,
                appointment_data: data.clone(),
                targeted_appointment_data: data.clone(),
            });
        }
        log::debug!(
            "{}: rendered {} appointment(s) in {}",
            self.instance(),
            visible.len(),
            self.settings.current_view.name()
        );
        self.rendered = visible.clone();
        self.painted = true;
        Ok(visible)
    }

    /// Scroll the work space to `date`; dates outside the view are ignored
    pub fn scroll_to(&mut self, date: DateTime<Utc>, group: Option<Value>, all_day: bool) -> bool {
        if !self.view_range().contains(date) {
            log::warn!(
                "{}: cannot scroll to {}, it is outside the current view",
                self.instance(),
                date
            );
            return false;
        }
        self.scroll_position = Some(ScrollTarget {
            date,
            group,
            all_day,
        });
        true
    }

    #[deprecated(note = "use scroll_to")]
    pub fn scroll_to_time(&mut self, hours: u32, minutes: u32, date: Option<DateTime<Utc>>) -> bool {
        log::warn!("scrollToTime is deprecated, use scrollTo");
        let day = date.unwrap_or_else(|| self.current_date()).date_naive();
        let midnight = Utc.from_utc_datetime(&day.and_time(NaiveTime::default()));
        let target = view::add_minutes(midnight, hours as i64 * 60 + minutes as i64);
        self.scroll_to(target, None, false)
    }

    pub fn scroll_position(&self) -> Option<&ScrollTarget> {
        self.scroll_position.as_ref()
    }

    /// Open the edit form; returns `false` when `appointmentFormOpening` cancelled it
    pub fn show_appointment_popup(
        &mut self,
        data: Option<Appointment>,
        create_new: bool,
        current: Option<Appointment>,
    ) -> bool {
        let create_new = create_new || data.is_none();
        let working = data.clone().unwrap_or_else(|| self.new_appointment());
        let editing = self.settings.editing;
        let read_only = if create_new {
            !editing.allow_adding
        } else {
            !editing.allow_updating || appointment::is_disabled(&working)
        };

        let component = self.component();
        let event = self.dispatcher.notify(AppointmentFormOpeningEvent {
            component,
            appointment_data: Some(working.clone()),
            read_only,
            cancel: false,
        });
        if event.cancel {
            log::debug!("{}: appointment form opening cancelled", self.instance());
            return false;
        }

        self.tooltip = None;
        self.popup = Some(AppointmentPopup {
            data: working,
            original: if create_new { None } else { data },
            current,
            create_new,
            read_only: event.read_only,
        });
        true
    }

    pub fn popup(&self) -> Option<&AppointmentPopup> {
        self.popup.as_ref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut AppointmentPopup> {
        self.popup.as_mut()
    }

    pub fn show_appointment_tooltip(
        &mut self,
        data: Appointment,
        target: &str,
        current: Option<Appointment>,
    ) {
        self.tooltip = Some(AppointmentTooltip {
            data,
            target: target.to_string(),
            current,
        });
    }

    pub fn hide_appointment_tooltip(&mut self) {
        self.tooltip = None;
    }

    pub fn tooltip(&self) -> Option<&AppointmentTooltip> {
        self.tooltip.as_ref()
    }

    /// Click on an appointment: shows its tooltip unless a handler cancels
    pub fn click_appointment(&mut self, data: Appointment) -> bool {
        let component = self.component();
        let event = self.dispatcher.notify(AppointmentClickEvent {
            component,
            appointment_data: data.clone(),
            targeted_appointment_data: data.clone(),
            cancel: false,
        });
        if event.cancel {
            return false;
        }
        self.show_appointment_tooltip(data, "appointment", None);
        true
    }

    /// Double click on an appointment: opens the edit form unless cancelled
    pub fn dbl_click_appointment(&mut self, data: Appointment) -> bool {
        let component = self.component();
        let event = self.dispatcher.notify(AppointmentDblClickEvent {
            component,
            appointment_data: data.clone(),
            targeted_appointment_data: data.clone(),
            cancel: false,
        });
        if event.cancel {
            return false;
        }
        self.show_appointment_popup(Some(data), false, None)
    }

    pub fn appointment_context_menu(&mut self, data: Appointment) {
        let component = self.component();
        self.dispatcher.notify(AppointmentContextMenuEvent {
            component,
            appointment_data: data.clone(),
            targeted_appointment_data: data,
        });
    }

    /// Click on a cell: selects it unless a handler cancels
    pub fn click_cell(&mut self, cell: CellData) -> bool {
        let component = self.component();
        let event = self.dispatcher.notify(CellClickEvent {
            component,
            cell_data: cell,
            cancel: false,
        });
        if event.cancel {
            return false;
        }
        self.sync_option("selectedCellData", json!([event.cell_data.to_value()]));
        true
    }

    pub fn cell_context_menu(&mut self, cell: CellData) {
        let component = self.component();
        self.dispatcher.notify(CellContextMenuEvent {
            component,
            cell_data: cell,
        });
    }

    pub fn selected_cell_data(&self) -> &[Value] {
        &self.settings.selected_cell_data
    }

    fn component(&self) -> ComponentRef {
        self.dispatcher.component().clone()
    }

    /// Blank appointment on the selected cell, or the first cell of the view
    fn new_appointment(&self) -> Appointment {
        let selected = self.settings.selected_cell_data.first();
        let start = selected
            .and_then(|cell| cell.get("startDate"))
            .and_then(date_from_value)
            .unwrap_or_else(|| self.get_start_view_date());
        let end = selected
            .and_then(|cell| cell.get("endDate"))
            .and_then(date_from_value)
            .unwrap_or_else(|| view::add_minutes(start, self.cell_duration() as i64));

        let mut data = json!({});
        self.fields.set_dates(&mut data, start, end);
        data
    }

    /// Re-render after a data change if the view was rendered before
    async fn repaint(&mut self) {
        if !self.painted {
            return;
        }
        if let Err(err) = self.render_appointments().await {
            log::warn!("{}: repaint failed: {}", self.instance(), err);
        }
    }

    /// Mirror internal state into an option without triggering reactions
    fn sync_option(&mut self, path: &str, value: Value) {
        match self.options.set_internal(path, value) {
            Ok(change) if change.value != change.previous_value => {
                let component = self.component();
                self.dispatcher
                    .notify(OptionChangedEvent::new(component, &change));
            }
            Ok(_) => {}
            Err(err) => log::warn!("{}: cannot sync '{}': {}", self.instance(), path, err),
        }
        match self.options.typed() {
            Ok(settings) => self.settings = settings,
            Err(err) => log::warn!("{}: options out of sync: {}", self.instance(), err),
        }
    }
}

impl Widget for Scheduler {
    fn kind(&self) -> &'static str {
        "scheduler"
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
        let settings: SchedulerOptions = self.options.typed()?;
        if let Err(err) = validate_day_hours(&settings) {
            self.options
                .set_internal(&change.full_name, change.previous_value.clone())?;
            return Err(err);
        }
        self.settings = settings;
        self.fields = FieldExpressions::from_options(&self.settings);

        match change.name.as_str() {
            "dataSource" => {
                self.store = match &change.value {
                    value @ Value::Array(_) => Box::new(InMemoryAppointmentStore::from_json(value)?),
                    Value::Null => Box::new(InMemoryAppointmentStore::new()),
                    other => {
                        log::debug!("{}: keeping store for dataSource {}", self.instance(), other);
                        return Ok(());
                    }
                };
                self.rendered.clear();
                self.painted = false;
            }
            "currentView" | "currentDate" | "min" | "max" => {
                self.tooltip = None;
                self.scroll_position = None;
            }
            _ => {}
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl WidgetKind for Scheduler {
    fn descriptor() -> WidgetDescriptor {
        WidgetDescriptor {
            kind: "scheduler",
            schema: options::schema,
            events: events::EVENTS,
            methods: &[
                "addAppointment",
                "deleteAppointment",
                "getDataSource",
                "getEndViewDate",
                "getStartViewDate",
                "hideAppointmentPopup",
                "hideAppointmentTooltip",
                "scrollTo",
                "scrollToTime",
                "showAppointmentPopup",
                "showAppointmentTooltip",
                "updateAppointment",
            ],
        }
    }

    /// An array-valued `dataSource` seeds an in-memory store
    fn create(instance: &str, options: Options, bus: &EventBus) -> Result<Self, ConfigError> {
        let store = match options.get("dataSource") {
            Some(value @ Value::Array(_)) => InMemoryAppointmentStore::from_json(value)?,
            _ => InMemoryAppointmentStore::new(),
        };
        Self::new(instance, options, bus, Box::new(store))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;
    use uiconf_core::WidgetEvent;

    pub(crate) fn date(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    pub(crate) fn sample_store() -> InMemoryAppointmentStore {
        InMemoryAppointmentStore::from_json(&json!([
            {
                "text": "Standup",
                "startDate": "2021-04-28T09:00:00Z",
                "endDate": "2021-04-28T09:15:00Z"
            },
            {
                "text": "Planning",
                "startDate": "2021-04-29T13:00:00Z",
                "endDate": "2021-04-29T15:00:00Z"
            },
            {
                "text": "Hidden",
                "startDate": "2021-04-28T11:00:00Z",
                "visible": false
            }
        ]))
        .unwrap()
    }

    pub(crate) fn scheduler(config: Value) -> Scheduler {
        let mut config = config;
        if let Some(map) = config.as_object_mut() {
            map.entry("currentDate").or_insert(json!("2021-04-28T10:00:00Z"));
        } else {
            config = json!({ "currentDate": "2021-04-28T10:00:00Z" });
        }
        let options = Options::new(options::schema(), &config).unwrap();
        Scheduler::new("calendar", options, &EventBus::new(), Box::new(sample_store())).unwrap()
    }

    pub(crate) fn record<E: WidgetEvent + Clone>(s: &mut Scheduler) -> Rc<RefCell<Vec<E>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        s.on(move |e: &mut E| log.borrow_mut().push(e.clone()));
        seen
    }

    fn texts(items: &[Appointment]) -> Vec<&str> {
        items.iter().filter_map(|a| a["text"].as_str()).collect()
    }

    #[test]
    fn test_view_dates_follow_options() {
        let s = scheduler(json!({ "currentView": "week", "firstDayOfWeek": 1 }));
        assert_eq!(s.get_start_view_date(), date(2021, 4, 26, 0, 0));
        assert_eq!(s.get_end_view_date(), date(2021, 5, 2, 23, 59));
    }

    #[test]
    fn test_view_entry_overrides_day_hours() {
        let s = scheduler(json!({
            "startDayHour": 6,
            "views": [{ "type": "day", "startDayHour": 8, "endDayHour": 17 }, "week"]
        }));
        assert_eq!(s.get_start_view_date(), date(2021, 4, 28, 8, 0));
        assert_eq!(s.get_end_view_date(), date(2021, 4, 28, 16, 59));
    }

    #[test]
    fn test_agenda_duration_is_bounded() {
        for duration in [json!(-3), json!(0), json!(4_000_000_000u64)] {
            let config = json!({
                "currentView": "agenda",
                "views": [{ "type": "agenda", "agendaDuration": duration }]
            });
            let err = options::schema().validate(&config).unwrap_err();
            assert!(
                matches!(&err, ConfigError::OutOfRange { key, .. } if key.ends_with("agendaDuration")),
                "{}",
                err
            );
        }

        let s = scheduler(json!({
            "currentView": "agenda",
            "views": [{ "type": "agenda", "agendaDuration": 1000 }]
        }));
        assert_eq!(s.get_end_view_date(), date(2024, 1, 22, 23, 59));
    }

    #[test]
    fn test_current_date_clamped_to_bounds() {
        let s = scheduler(json!({ "min": "2021-05-03" }));
        assert_eq!(s.current_date(), date(2021, 5, 3, 0, 0));
        assert_eq!(s.get_start_view_date(), date(2021, 5, 3, 0, 0));
    }

    #[test]
    fn test_day_hours_must_be_ordered() {
        let options =
            Options::new(options::schema(), &json!({ "startDayHour": 18, "endDayHour": 9 }))
                .unwrap();
        assert!(matches!(
            Scheduler::new("c", options, &EventBus::new(), Box::new(sample_store())),
            Err(ConfigError::OutOfRange { .. })
        ));

        let mut s = scheduler(json!({ "endDayHour": 12 }));
        assert!(s.set_option("startDayHour", json!(13)).is_err());
        let reverted: SchedulerOptions = s.options().typed().unwrap();
        assert_eq!(reverted.start_day_hour, 0.0);
        assert_eq!(s.settings().start_day_hour, 0.0);
    }

    #[test]
    fn test_render_filters_by_range_and_visibility() {
        let mut s = scheduler(Value::Null);
        let rendered = record::<AppointmentRenderedEvent>(&mut s);

        let shown = block_on(s.render_appointments()).unwrap();

        assert_eq!(texts(&shown), vec!["Standup"]);
        assert_eq!(rendered.borrow().len(), 1);
        assert_eq!(rendered.borrow()[0].appointment_data["text"], "Standup");

        s.set_option("currentView", json!("week")).unwrap();
        let shown = block_on(s.render_appointments()).unwrap();
        assert_eq!(texts(&shown), vec!["Standup", "Planning"]);
    }

    #[test]
    fn test_field_expressions_drive_rendering() {
        let store = InMemoryAppointmentStore::from_json(&json!([
            { "subject": "Retro", "from": "2021-04-28T16:00:00Z", "to": "2021-04-28T17:00:00Z" }
        ]))
        .unwrap();
        let options = Options::new(
            options::schema(),
            &json!({
                "currentDate": "2021-04-28",
                "textExpr": "subject",
                "startDateExpr": "from",
                "endDateExpr": "to"
            }),
        )
        .unwrap();
        let mut s = Scheduler::new("c", options, &EventBus::new(), Box::new(store)).unwrap();

        let shown = block_on(s.render_appointments()).unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(s.fields().text(&shown[0]), Some("Retro"));
    }

    #[test]
    fn test_cell_click_selects_cell_unless_cancelled() {
        let mut s = scheduler(Value::Null);
        let cell = CellData {
            start_date: date(2021, 4, 28, 10, 0),
            end_date: date(2021, 4, 28, 10, 30),
            all_day: false,
            groups: None,
        };

        assert!(s.click_cell(cell.clone()));
        assert_eq!(s.selected_cell_data().len(), 1);
        assert_eq!(s.selected_cell_data()[0]["allDay"], false);

        s.on(|e: &mut CellClickEvent| e.cancel = true);
        let mut later = cell;
        later.start_date = date(2021, 4, 28, 11, 0);
        assert!(!s.click_cell(later));
        assert_eq!(
            date_from_value(&s.selected_cell_data()[0]["startDate"]),
            Some(date(2021, 4, 28, 10, 0))
        );
    }

    #[test]
    fn test_click_shows_tooltip_and_dbl_click_opens_form() {
        let mut s = scheduler(Value::Null);
        let standup = sample_store().items()[0].clone();

        assert!(s.click_appointment(standup.clone()));
        assert_eq!(s.tooltip().map(|t| t.target.as_str()), Some("appointment"));

        let opening = record::<AppointmentFormOpeningEvent>(&mut s);
        assert!(s.dbl_click_appointment(standup.clone()));
        assert!(s.tooltip().is_none());
        let popup = s.popup().unwrap();
        assert!(!popup.create_new);
        assert_eq!(popup.original.as_ref(), Some(&standup));
        assert!(!opening.borrow()[0].read_only);

        s.hide_appointment_tooltip();
        assert!(s.tooltip().is_none());
    }

    #[test]
    fn test_form_opening_can_be_cancelled() {
        let mut s = scheduler(Value::Null);
        s.on(|e: &mut AppointmentFormOpeningEvent| e.cancel = true);
        assert!(!s.show_appointment_popup(None, true, None));
        assert!(s.popup().is_none());
    }

    #[test]
    fn test_new_appointment_starts_on_selected_cell() {
        let mut s = scheduler(Value::Null);
        s.click_cell(CellData {
            start_date: date(2021, 4, 28, 14, 0),
            end_date: date(2021, 4, 28, 14, 30),
            all_day: false,
            groups: None,
        });
        assert!(s.show_appointment_popup(None, false, None));

        let popup = s.popup().unwrap();
        assert!(popup.create_new);
        assert_eq!(s.fields().start_date(&popup.data), Some(date(2021, 4, 28, 14, 0)));
        assert_eq!(s.fields().end_date(&popup.data), Some(date(2021, 4, 28, 14, 30)));
    }

    #[test]
    fn test_editing_disabled_makes_form_read_only() {
        let mut s = scheduler(json!({ "editing": { "allowUpdating": false } }));
        let standup = sample_store().items()[0].clone();
        assert!(s.show_appointment_popup(Some(standup), false, None));
        assert!(s.popup().unwrap().read_only);

        let saved = block_on(s.hide_appointment_popup(true)).unwrap();
        assert!(saved.is_none());
        assert!(s.popup().is_none());
    }

    #[test]
    #[allow(deprecated)]
    fn test_scroll_to_stays_inside_view() {
        let mut s = scheduler(Value::Null);
        assert!(s.scroll_to(date(2021, 4, 28, 15, 0), None, false));
        assert_eq!(s.scroll_position().map(|p| p.date), Some(date(2021, 4, 28, 15, 0)));

        assert!(!s.scroll_to(date(2021, 5, 28, 15, 0), None, false));
        assert!(s.scroll_to_time(7, 45, None));
        assert_eq!(s.scroll_position().map(|p| p.date), Some(date(2021, 4, 28, 7, 45)));

        s.set_option("currentView", json!("month")).unwrap();
        assert!(s.scroll_position().is_none());
    }

    #[test]
    fn test_data_source_option_replaces_store() {
        let mut s = scheduler(Value::Null);
        s.set_option(
            "dataSource",
            json!([{ "text": "Lunch", "startDate": "2021-04-28T12:00:00Z" }]),
        )
        .unwrap();
        let shown = block_on(s.render_appointments()).unwrap();
        assert_eq!(texts(&shown), vec!["Lunch"]);
    }

    #[test]
    fn test_create_from_registry_seeds_store() {
        let options = Options::new(
            options::schema(),
            &json!({
                "currentDate": "2021-04-28",
                "dataSource": [{ "text": "A", "startDate": "2021-04-28T08:00:00Z" }]
            }),
        )
        .unwrap();
        let mut s = Scheduler::create("calendar", options, &EventBus::new()).unwrap();
        assert_eq!(block_on(s.render_appointments()).unwrap().len(), 1);
        assert!(Scheduler::descriptor().unpaired_actions().is_empty());
    }
}
