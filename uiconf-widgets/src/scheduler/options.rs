// uiconf-widgets/src/scheduler/options.rs
use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uiconf_core::{OptionSchema, OptionType, WidgetOptions, base_schema, date_from_value, date_to_value};

use super::view::ViewType;

pub(crate) const VIEW_NAMES: &[&str] = &[
    "agenda",
    "day",
    "month",
    "timelineDay",
    "timelineMonth",
    "timelineWeek",
    "timelineWorkWeek",
    "week",
    "workWeek",
];

fn de_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    date_from_value(&value).ok_or_else(|| D::Error::custom(format!("invalid date {}", value)))
}

fn de_optional_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => date_from_value(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date {}", value))),
    }
}

/// `editing` may be a plain boolean switching every permission at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Editing {
    pub allow_adding: bool,
    pub allow_deleting: bool,
    pub allow_dragging: bool,
    pub allow_resizing: bool,
    pub allow_time_zone_editing: bool,
    pub allow_updating: bool,
}

impl Editing {
    pub fn all(enabled: bool) -> Self {
        Self {
            allow_adding: enabled,
            allow_deleting: enabled,
            allow_dragging: enabled,
            allow_resizing: enabled,
            allow_time_zone_editing: false,
            allow_updating: enabled,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditingFields {
    allow_adding: bool,
    allow_deleting: bool,
    allow_dragging: bool,
    allow_resizing: bool,
    allow_time_zone_editing: bool,
    allow_updating: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EditingRepr {
    Flag(bool),
    Full(EditingFields),
}

impl<'de> Deserialize<'de> for Editing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match EditingRepr::deserialize(deserializer)? {
            EditingRepr::Flag(enabled) => Self::all(enabled),
            EditingRepr::Full(e) => Self {
                allow_adding: e.allow_adding,
                allow_deleting: e.allow_deleting,
                allow_dragging: e.allow_dragging,
                allow_resizing: e.allow_resizing,
                allow_time_zone_editing: e.allow_time_zone_editing,
                allow_updating: e.allow_updating,
            },
        })
    }
}

/// How many appointments a cell shows before collapsing the rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxAppointmentsPerCell {
    Auto,
    Unlimited,
    Count(u32),
}

impl<'de> Deserialize<'de> for MaxAppointmentsPerCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) if s == "auto" => Ok(Self::Auto),
            Value::String(s) if s == "unlimited" => Ok(Self::Unlimited),
            Value::Number(n) => n
                .as_f64()
                .filter(|f| *f >= 0.0)
                .map(|f| Self::Count(f as u32))
                .ok_or_else(|| D::Error::custom("negative appointment count")),
            other => Err(D::Error::custom(format!(
                "expected a count, 'auto' or 'unlimited', got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecurrenceEditMode {
    Dialog,
    Occurrence,
    Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollingMode {
    Standard,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Scrolling {
    pub mode: ScrollingMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDragging {
    pub auto_scroll: bool,
    pub data: Value,
    pub group: Option<String>,
    pub scroll_sensitivity: f64,
    pub scroll_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub allow_multiple: bool,
    pub color_expr: String,
    pub data_source: Value,
    pub display_expr: String,
    pub field_expr: String,
    pub label: String,
    pub use_color_as_default: bool,
    pub value_expr: String,
}

/// One entry of `views`; per-view settings override the scheduler's own
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub name: Option<String>,
    pub view_type: Option<ViewType>,
    pub agenda_duration: u32,
    pub cell_duration: Option<f64>,
    pub end_day_hour: Option<f64>,
    pub start_day_hour: Option<f64>,
    pub first_day_of_week: Option<u32>,
    pub group_by_date: Option<bool>,
    pub group_orientation: Option<GroupOrientation>,
    pub groups: Option<Vec<String>>,
    pub interval_count: u32,
    pub max_appointments_per_cell: Option<MaxAppointmentsPerCell>,
    pub start_date: Option<DateTime<Utc>>,
    pub scrolling: Option<Scrolling>,
}

impl ViewConfig {
    pub fn of(view_type: ViewType) -> Self {
        Self {
            name: None,
            view_type: Some(view_type),
            agenda_duration: 7,
            cell_duration: None,
            end_day_hour: None,
            start_day_hour: None,
            first_day_of_week: None,
            group_by_date: None,
            group_orientation: None,
            groups: None,
            interval_count: 1,
            max_appointments_per_cell: None,
            start_date: None,
            scrolling: None,
        }
    }

    /// Whether this entry configures the view selected by `currentView`
    pub fn matches(&self, current: ViewType) -> bool {
        self.view_type == Some(current)
            || (self.view_type.is_none() && self.name.as_deref() == Some(current.name()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewFields {
    name: Option<String>,
    #[serde(rename = "type")]
    view_type: Option<ViewType>,
    agenda_duration: Option<u32>,
    cell_duration: Option<f64>,
    end_day_hour: Option<f64>,
    start_day_hour: Option<f64>,
    first_day_of_week: Option<u32>,
    group_by_date: Option<bool>,
    group_orientation: Option<GroupOrientation>,
    groups: Option<Vec<String>>,
    interval_count: Option<u32>,
    max_appointments_per_cell: Option<MaxAppointmentsPerCell>,
    #[serde(default, deserialize_with = "de_optional_date")]
    start_date: Option<DateTime<Utc>>,
    scrolling: Option<Scrolling>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ViewRepr {
    Name(ViewType),
    Full(ViewFields),
}

impl<'de> Deserialize<'de> for ViewConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ViewRepr::deserialize(deserializer)? {
            ViewRepr::Name(view_type) => Self::of(view_type),
            ViewRepr::Full(v) => Self {
                name: v.name,
                view_type: v.view_type,
                agenda_duration: v.agenda_duration.unwrap_or(7),
                cell_duration: v.cell_duration,
                end_day_hour: v.end_day_hour,
                start_day_hour: v.start_day_hour,
                first_day_of_week: v.first_day_of_week,
                group_by_date: v.group_by_date,
                group_orientation: v.group_orientation,
                groups: v.groups,
                interval_count: v.interval_count.unwrap_or(1).max(1),
                max_appointments_per_cell: v.max_appointments_per_cell,
                start_date: v.start_date,
                scrolling: v.scrolling,
            },
        })
    }
}

/// Typed view of a scheduler's options
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerOptions {
    #[serde(flatten)]
    pub base: WidgetOptions,
    pub adaptivity_enabled: bool,
    pub all_day_expr: String,
    pub appointment_dragging: AppointmentDragging,
    pub cell_duration: f64,
    pub cross_scrolling_enabled: bool,
    #[serde(deserialize_with = "de_date")]
    pub current_date: DateTime<Utc>,
    pub current_view: ViewType,
    pub date_serialization_format: Option<String>,
    pub description_expr: String,
    pub editing: Editing,
    pub end_date_expr: String,
    pub end_date_time_zone_expr: String,
    pub end_day_hour: f64,
    pub first_day_of_week: Option<u32>,
    pub group_by_date: bool,
    pub groups: Vec<String>,
    pub indicator_update_interval: f64,
    #[serde(default, deserialize_with = "de_optional_date")]
    pub max: Option<DateTime<Utc>>,
    pub max_appointments_per_cell: MaxAppointmentsPerCell,
    #[serde(default, deserialize_with = "de_optional_date")]
    pub min: Option<DateTime<Utc>>,
    pub no_data_text: String,
    pub recurrence_edit_mode: RecurrenceEditMode,
    pub recurrence_exception_expr: String,
    pub recurrence_rule_expr: String,
    pub remote_filtering: bool,
    pub resources: Vec<Resource>,
    pub scrolling: Scrolling,
    pub selected_cell_data: Vec<Value>,
    pub shade_until_current_time: bool,
    pub show_all_day_panel: bool,
    pub show_current_time_indicator: bool,
    pub start_date_expr: String,
    pub start_date_time_zone_expr: String,
    pub start_day_hour: f64,
    pub text_expr: String,
    pub time_zone: String,
    pub use_drop_down_view_switcher: bool,
    pub views: Vec<ViewConfig>,
}

impl SchedulerOptions {
    /// The `views` entry for `currentView`, or a bare entry of that type
    pub fn current_view_config(&self) -> ViewConfig {
        self.views
            .iter()
            .find(|view| view.matches(self.current_view))
            .cloned()
            .unwrap_or_else(|| ViewConfig::of(self.current_view))
    }
}

const HANDLERS: &[&str] = &[
    "onAppointmentAdded",
    "onAppointmentAdding",
    "onAppointmentClick",
    "onAppointmentContextMenu",
    "onAppointmentDblClick",
    "onAppointmentDeleted",
    "onAppointmentDeleting",
    "onAppointmentFormOpening",
    "onAppointmentRendered",
    "onAppointmentUpdated",
    "onAppointmentUpdating",
    "onCellClick",
    "onCellContextMenu",
];

fn hour() -> OptionType {
    OptionType::Number {
        min: Some(0.0),
        max: Some(24.0),
    }
}

fn max_appointments_per_cell() -> OptionType {
    OptionType::one_of(vec![
        OptionType::non_negative(),
        OptionType::Enum(&["auto", "unlimited"]),
    ])
}

fn scrolling() -> OptionSchema {
    OptionSchema::new().option(
        "mode",
        OptionType::Enum(&["standard", "virtual"]),
        json!("standard"),
    )
}

fn editing() -> OptionType {
    OptionType::one_of(vec![
        OptionType::Bool,
        OptionType::Group(
            OptionSchema::new()
                .option("allowAdding", OptionType::Bool, json!(true))
                .option("allowDeleting", OptionType::Bool, json!(true))
                .option("allowDragging", OptionType::Bool, json!(true))
                .option("allowResizing", OptionType::Bool, json!(true))
                .option("allowTimeZoneEditing", OptionType::Bool, json!(false))
                .option("allowUpdating", OptionType::Bool, json!(true)),
        ),
    ])
}

fn appointment_dragging() -> OptionSchema {
    OptionSchema::new()
        .option("autoScroll", OptionType::Bool, json!(true))
        .option("data", OptionType::Any, Value::Null)
        .option("group", OptionType::String, Value::Null)
        .option("scrollSensitivity", OptionType::number(), json!(60))
        .option("scrollSpeed", OptionType::number(), json!(60))
        .handlers(&["onAdd", "onDragEnd", "onDragMove", "onDragStart", "onRemove"])
}

fn resource() -> OptionType {
    OptionType::Group(
        OptionSchema::new()
            .option("allowMultiple", OptionType::Bool, json!(false))
            .option("colorExpr", OptionType::String, json!("color"))
            .option("dataSource", OptionType::Any, Value::Null)
            .option("displayExpr", OptionType::String, json!("text"))
            .option("fieldExpr", OptionType::String, json!(""))
            .option("label", OptionType::String, json!(""))
            .option("useColorAsDefault", OptionType::Bool, json!(false))
            .option("valueExpr", OptionType::String, json!("id")),
    )
}

fn templates(schema: OptionSchema, defaults: &[(&'static str, Value)]) -> OptionSchema {
    defaults.iter().fold(schema, |schema, (name, default)| {
        schema.option(name, OptionType::Template, default.clone())
    })
}

/// Per-view overrides stay null so the scheduler-level value applies
fn view() -> OptionType {
    let schema = OptionSchema::new()
        .option("agendaDuration", OptionType::int_range(1, 1000), json!(7))
        .option("cellDuration", OptionType::non_negative(), Value::Null)
        .option("endDayHour", hour(), Value::Null)
        .option("firstDayOfWeek", OptionType::int_range(0, 6), Value::Null)
        .option("groupByDate", OptionType::Bool, Value::Null)
        .option(
            "groupOrientation",
            OptionType::Enum(&["horizontal", "vertical"]),
            Value::Null,
        )
        .option("groups", OptionType::array(OptionType::String), Value::Null)
        .option("intervalCount", OptionType::int_range(1, 1000), json!(1))
        .option("maxAppointmentsPerCell", max_appointments_per_cell(), Value::Null)
        .option("name", OptionType::String, Value::Null)
        .option("startDate", OptionType::Date, Value::Null)
        .option("startDayHour", hour(), Value::Null)
        .option("type", OptionType::Enum(VIEW_NAMES), Value::Null)
        .option("scrolling", OptionType::Group(scrolling()), Value::Null);
    let schema = templates(
        schema,
        &[
            ("appointmentCollectorTemplate", json!("appointmentCollector")),
            ("appointmentTemplate", json!("item")),
            ("appointmentTooltipTemplate", json!("appointmentTooltip")),
            ("dataCellTemplate", Value::Null),
            ("dateCellTemplate", Value::Null),
            ("resourceCellTemplate", Value::Null),
            ("timeCellTemplate", Value::Null),
        ],
    )
    .option(
        "dropDownAppointmentTemplate",
        OptionType::Template,
        json!("dropDownAppointment"),
    )
    .deprecated("use appointmentTooltipTemplate");

    OptionType::one_of(vec![OptionType::Enum(VIEW_NAMES), OptionType::Group(schema)])
}

fn now() -> Value {
    date_to_value(Utc::now())
}

/// Option schema of the scheduler
pub fn schema() -> OptionSchema {
    let schema = OptionSchema::new()
        .option("adaptivityEnabled", OptionType::Bool, json!(false))
        .option("allDayExpr", OptionType::String, json!("allDay"))
        .group("appointmentDragging", appointment_dragging())
        .option("cellDuration", OptionType::non_negative(), json!(30))
        .option("crossScrollingEnabled", OptionType::Bool, json!(false))
        .computed("currentDate", OptionType::Date, now)
        .option("currentView", OptionType::Enum(VIEW_NAMES), json!("day"))
        .option("customizeDateNavigatorText", OptionType::Handler, Value::Null)
        .option("dataSource", OptionType::Any, Value::Null)
        .option("dateSerializationFormat", OptionType::String, Value::Null)
        .option("descriptionExpr", OptionType::String, json!("description"))
        .option("editing", editing(), json!(true))
        .option("endDateExpr", OptionType::String, json!("endDate"))
        .option("endDateTimeZoneExpr", OptionType::String, json!("endDateTimeZone"))
        .option("endDayHour", hour(), json!(24))
        .option("firstDayOfWeek", OptionType::int_range(0, 6), Value::Null)
        .option("focusStateEnabled", OptionType::Bool, json!(true))
        .option("groupByDate", OptionType::Bool, json!(false))
        .option("groups", OptionType::array(OptionType::String), json!([]))
        .option("indicatorUpdateInterval", OptionType::non_negative(), json!(300000))
        .option("max", OptionType::Date, Value::Null)
        .option("maxAppointmentsPerCell", max_appointments_per_cell(), json!("auto"))
        .option("min", OptionType::Date, Value::Null)
        .option("noDataText", OptionType::String, json!("No data to display"))
        .option(
            "recurrenceEditMode",
            OptionType::Enum(&["dialog", "occurrence", "series"]),
            json!("dialog"),
        )
        .option(
            "recurrenceExceptionExpr",
            OptionType::String,
            json!("recurrenceException"),
        )
        .option("recurrenceRuleExpr", OptionType::String, json!("recurrenceRule"))
        .option("remoteFiltering", OptionType::Bool, json!(false))
        .option("resources", OptionType::array(resource()), json!([]))
        .group("scrolling", scrolling())
        .option(
            "selectedCellData",
            OptionType::array(OptionType::Any),
            json!([]),
        )
        .read_only()
        .option("shadeUntilCurrentTime", OptionType::Bool, json!(false))
        .option("showAllDayPanel", OptionType::Bool, json!(true))
        .option("showCurrentTimeIndicator", OptionType::Bool, json!(true))
        .option("startDateExpr", OptionType::String, json!("startDate"))
        .option(
            "startDateTimeZoneExpr",
            OptionType::String,
            json!("startDateTimeZone"),
        )
        .option("startDayHour", hour(), json!(0))
        .option("textExpr", OptionType::String, json!("text"))
        .option("timeZone", OptionType::String, json!(""))
        .option("useDropDownViewSwitcher", OptionType::Bool, json!(false))
        .option("views", OptionType::array(view()), json!(["day", "week"]));

    let schema = templates(
        schema,
        &[
            ("appointmentCollectorTemplate", json!("appointmentCollector")),
            ("appointmentTemplate", json!("item")),
            ("appointmentTooltipTemplate", json!("appointmentTooltip")),
            ("dataCellTemplate", Value::Null),
            ("dateCellTemplate", Value::Null),
            ("resourceCellTemplate", Value::Null),
            ("timeCellTemplate", Value::Null),
        ],
    )
    .option(
        "dropDownAppointmentTemplate",
        OptionType::Template,
        json!("dropDownAppointment"),
    )
    .deprecated("use appointmentTooltipTemplate");

    base_schema().extend(schema.handlers(HANDLERS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use uiconf_core::{ConfigError, Options};

    fn typed(config: Value) -> SchedulerOptions {
        Options::new(schema(), &config).unwrap().typed().unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = typed(json!({}));
        assert_eq!(options.cell_duration, 30.0);
        assert_eq!(options.current_view, ViewType::Day);
        assert_eq!(options.end_day_hour, 24.0);
        assert_eq!(options.start_day_hour, 0.0);
        assert_eq!(options.first_day_of_week, None);
        assert_eq!(options.max_appointments_per_cell, MaxAppointmentsPerCell::Auto);
        assert_eq!(options.recurrence_edit_mode, RecurrenceEditMode::Dialog);
        assert_eq!(options.scrolling.mode, ScrollingMode::Standard);
        assert_eq!(options.editing, Editing::all(true));
        assert_eq!(options.text_expr, "text");
        assert_eq!(options.no_data_text, "No data to display");
        assert!(options.base.focus_state_enabled);
        assert!(options.appointment_dragging.auto_scroll);
        assert_eq!(options.views.len(), 2);
        assert_eq!(options.views[1], ViewConfig::of(ViewType::Week));
    }

    #[test]
    fn test_current_date_defaults_to_now() {
        let before = Utc::now();
        let options = typed(Value::Null);
        assert!(options.current_date.timestamp() >= before.timestamp());
        assert!(options.current_date.year() >= 2024);
    }

    #[test]
    fn test_current_date_accepts_strings_and_millis() {
        let options = typed(json!({ "currentDate": "2021-04-26" }));
        assert_eq!(
            options.current_date,
            Utc.with_ymd_and_hms(2021, 4, 26, 0, 0, 0).unwrap()
        );
        let options = typed(json!({ "currentDate": 0, "min": "1969-12-01" }));
        assert_eq!(options.current_date.year(), 1970);
        assert_eq!(options.min.map(|d| d.month()), Some(12));
    }

    #[test]
    fn test_editing_accepts_flag_or_group() {
        assert_eq!(typed(json!({ "editing": false })).editing, Editing::all(false));

        let editing = typed(json!({ "editing": { "allowDeleting": false } })).editing;
        assert!(!editing.allow_deleting);
        assert!(editing.allow_adding);
        assert!(!editing.allow_time_zone_editing);
    }

    #[test]
    fn test_max_appointments_per_cell_variants() {
        let options = typed(json!({ "maxAppointmentsPerCell": 3 }));
        assert_eq!(options.max_appointments_per_cell, MaxAppointmentsPerCell::Count(3));
        let options = typed(json!({ "maxAppointmentsPerCell": "unlimited" }));
        assert_eq!(options.max_appointments_per_cell, MaxAppointmentsPerCell::Unlimited);
        assert!(matches!(
            Options::new(schema(), &json!({ "maxAppointmentsPerCell": "many" })),
            Err(ConfigError::TypeMismatch { .. }) | Err(ConfigError::NotInEnum { .. })
        ));
    }

    #[test]
    fn test_views_mix_names_and_groups() {
        let options = typed(json!({
            "currentView": "week",
            "views": ["day", { "type": "week", "intervalCount": 2, "startDayHour": 8 }]
        }));
        let view = options.current_view_config();
        assert_eq!(view.view_type, Some(ViewType::Week));
        assert_eq!(view.interval_count, 2);
        assert_eq!(view.start_day_hour, Some(8.0));
        assert_eq!(view.end_day_hour, None);
        assert_eq!(view.agenda_duration, 7);
    }

    #[test]
    fn test_unknown_view_keys_reported_by_index() {
        let options = Options::new(
            schema(),
            &json!({ "views": ["day", { "type": "month", "rows": 6 }] }),
        )
        .unwrap();
        assert_eq!(options.unknown(), ["views[1].rows"]);
    }

    #[test]
    fn test_bounds_enforced() {
        assert!(matches!(
            Options::new(schema(), &json!({ "firstDayOfWeek": 7 })),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            Options::new(schema(), &json!({ "endDayHour": 25 })),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            Options::new(schema(), &json!({ "currentView": "year" })),
            Err(ConfigError::NotInEnum { .. })
        ));
    }

    #[test]
    fn test_selected_cell_data_is_read_only() {
        let mut options = Options::new(schema(), &Value::Null).unwrap();
        assert!(matches!(
            options.set("selectedCellData", json!([{}])),
            Err(ConfigError::ReadOnly(_))
        ));
    }

    #[test]
    fn test_resources_get_group_defaults() {
        let options = typed(json!({ "resources": [{ "fieldExpr": "roomId" }] }));
        let room = &options.resources[0];
        assert_eq!(room.field_expr, "roomId");
        assert_eq!(room.value_expr, "id");
        assert_eq!(room.color_expr, "color");
        assert!(!room.allow_multiple);
    }
}
