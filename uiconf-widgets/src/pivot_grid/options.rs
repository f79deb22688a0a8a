// uiconf-widgets/src/pivot_grid/options.rs
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use uiconf_core::{OptionSchema, OptionType, WidgetOptions, base_schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFieldArea {
    Column,
    Row,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowHeaderLayout {
    Standard,
    Tree,
}

/// Where totals go relative to the items they sum up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalsPrior {
    Both,
    Columns,
    None,
    Rows,
}

impl TotalsPrior {
    pub fn rows(self) -> bool {
        matches!(self, Self::Both | Self::Rows)
    }

    pub fn columns(self) -> bool {
        matches!(self, Self::Both | Self::Columns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyChangesMode {
    Instantly,
    OnDemand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollingMode {
    Standard,
    Virtual,
}

/// `useNative`: a boolean or `"auto"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseNative {
    Auto,
    Always,
    Never,
}

impl<'de> Deserialize<'de> for UseNative {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(true) => Self::Always,
            Value::Bool(false) => Self::Never,
            _ => Self::Auto,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageType {
    Custom,
    LocalStorage,
    SessionStorage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub enabled: bool,
    pub file_name: String,
    pub ignore_excel_errors: bool,
    pub proxy_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChooserTexts {
    pub all_fields: String,
    pub column_fields: String,
    pub data_fields: String,
    pub filter_fields: String,
    pub row_fields: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChooserOptions {
    pub allow_search: bool,
    pub apply_changes_mode: ApplyChangesMode,
    pub enabled: bool,
    pub height: f64,
    pub layout: u8,
    pub search_timeout: f64,
    pub texts: FieldChooserTexts,
    pub title: String,
    pub width: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPanelTexts {
    pub column_field_area: String,
    pub data_field_area: String,
    pub filter_field_area: String,
    pub row_field_area: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPanelOptions {
    pub allow_field_dragging: bool,
    pub show_column_fields: bool,
    pub show_data_fields: bool,
    pub show_filter_fields: bool,
    pub show_row_fields: bool,
    pub texts: FieldPanelTexts,
    pub visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFilterTexts {
    pub cancel: String,
    pub empty_value: String,
    pub ok: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFilterOptions {
    pub allow_search: bool,
    pub height: f64,
    pub search_timeout: f64,
    pub show_relevant_values: bool,
    pub texts: HeaderFilterTexts,
    pub width: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPanelOptions {
    pub enabled: bool,
    pub height: f64,
    pub indicator_src: String,
    pub shading: bool,
    pub shading_color: String,
    pub show_indicator: bool,
    pub show_pane: bool,
    pub text: String,
    pub width: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollingOptions {
    pub mode: ScrollingMode,
    pub use_native: UseNative,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStoringOptions {
    pub enabled: bool,
    pub saving_timeout: f64,
    pub storage_key: Option<String>,
    #[serde(rename = "type")]
    pub storage_type: StorageType,
}

/// User-facing strings; `{0}` is replaced by a field or item caption
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotGridTexts {
    pub collapse_all: String,
    pub data_not_available: String,
    pub expand_all: String,
    pub export_to_excel: String,
    pub grand_total: String,
    pub no_data: String,
    pub remove_all_sorting: String,
    pub show_field_chooser: String,
    pub sort_column_by_summary: String,
    pub sort_row_by_summary: String,
    pub total: String,
}

/// Substitute `{0}` in one of the `texts` templates
pub fn fill(template: &str, value: &str) -> String {
    template.replace("{0}", value)
}

/// Typed view of a pivot grid's options
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotGridOptions {
    #[serde(flatten)]
    pub base: WidgetOptions,
    pub allow_expand_all: bool,
    pub allow_filtering: bool,
    pub allow_sorting: bool,
    pub allow_sorting_by_summary: bool,
    pub data_field_area: DataFieldArea,
    pub encode_html: bool,
    pub export: ExportOptions,
    pub field_chooser: FieldChooserOptions,
    pub field_panel: FieldPanelOptions,
    pub header_filter: HeaderFilterOptions,
    pub hide_empty_summary_cells: bool,
    pub load_panel: LoadPanelOptions,
    pub row_header_layout: RowHeaderLayout,
    pub scrolling: ScrollingOptions,
    pub show_borders: bool,
    pub show_column_grand_totals: bool,
    pub show_column_totals: bool,
    pub show_row_grand_totals: bool,
    pub show_row_totals: bool,
    pub show_totals_prior: TotalsPrior,
    pub state_storing: StateStoringOptions,
    pub texts: PivotGridTexts,
    pub word_wrap_enabled: bool,
}

const HANDLERS: &[&str] = &[
    "onCellClick",
    "onCellPrepared",
    "onContextMenuPreparing",
    "onExported",
    "onExporting",
    "onFileSaving",
];

fn texts(entries: &[(&'static str, &'static str)]) -> OptionSchema {
    entries
        .iter()
        .fold(OptionSchema::new(), |schema, &(name, default)| {
            schema.option(name, OptionType::String, json!(default))
        })
}

fn export() -> OptionSchema {
    OptionSchema::new()
        .option("enabled", OptionType::Bool, json!(false))
        .option("fileName", OptionType::String, json!("PivotGrid"))
        .option("ignoreExcelErrors", OptionType::Bool, json!(true))
        .option("proxyUrl", OptionType::String, Value::Null)
        .deprecated("the export proxy is no longer needed")
}

fn field_chooser() -> OptionSchema {
    OptionSchema::new()
        .option("allowSearch", OptionType::Bool, json!(false))
        .option(
            "applyChangesMode",
            OptionType::Enum(&["instantly", "onDemand"]),
            json!("instantly"),
        )
        .option("enabled", OptionType::Bool, json!(true))
        .option("height", OptionType::non_negative(), json!(600))
        .option("layout", OptionType::int_range(0, 2), json!(0))
        .option("searchTimeout", OptionType::non_negative(), json!(500))
        .group(
            "texts",
            texts(&[
                ("allFields", "All Fields"),
                ("columnFields", "Column Fields"),
                ("dataFields", "Data Fields"),
                ("filterFields", "Filter Fields"),
                ("rowFields", "Row Fields"),
            ]),
        )
        .option("title", OptionType::String, json!("Field Chooser"))
        .option("width", OptionType::non_negative(), json!(600))
}

fn field_panel() -> OptionSchema {
    OptionSchema::new()
        .option("allowFieldDragging", OptionType::Bool, json!(true))
        .option("showColumnFields", OptionType::Bool, json!(true))
        .option("showDataFields", OptionType::Bool, json!(true))
        .option("showFilterFields", OptionType::Bool, json!(true))
        .option("showRowFields", OptionType::Bool, json!(true))
        .group(
            "texts",
            texts(&[
                ("columnFieldArea", "Drop Column Fields Here"),
                ("dataFieldArea", "Drop Data Fields Here"),
                ("filterFieldArea", "Drop Filter Fields Here"),
                ("rowFieldArea", "Drop Row Fields Here"),
            ]),
        )
        .option("visible", OptionType::Bool, json!(false))
}

fn header_filter() -> OptionSchema {
    OptionSchema::new()
        .option("allowSearch", OptionType::Bool, json!(false))
        .option("height", OptionType::non_negative(), json!(325))
        .option("searchTimeout", OptionType::non_negative(), json!(500))
        .option("showRelevantValues", OptionType::Bool, json!(false))
        .group(
            "texts",
            texts(&[("cancel", "Cancel"), ("emptyValue", "(Blanks)"), ("ok", "Ok")]),
        )
        .option("width", OptionType::non_negative(), json!(252))
}

fn load_panel() -> OptionSchema {
    OptionSchema::new()
        .option("enabled", OptionType::Bool, json!(true))
        .option("height", OptionType::non_negative(), json!(70))
        .option("indicatorSrc", OptionType::String, json!(""))
        .option("shading", OptionType::Bool, json!(false))
        .option("shadingColor", OptionType::String, json!(""))
        .option("showIndicator", OptionType::Bool, json!(true))
        .option("showPane", OptionType::Bool, json!(true))
        .option("text", OptionType::String, json!("Loading..."))
        .option("width", OptionType::non_negative(), json!(200))
}

fn state_storing() -> OptionSchema {
    OptionSchema::new()
        .option("customLoad", OptionType::Handler, Value::Null)
        .option("customSave", OptionType::Handler, Value::Null)
        .option("enabled", OptionType::Bool, json!(false))
        .option("savingTimeout", OptionType::non_negative(), json!(2000))
        .option("storageKey", OptionType::String, Value::Null)
        .option(
            "type",
            OptionType::Enum(&["custom", "localStorage", "sessionStorage"]),
            json!("localStorage"),
        )
}

/// Option schema of the pivot grid
pub fn schema() -> OptionSchema {
    base_schema().extend(
        OptionSchema::new()
            .option("allowExpandAll", OptionType::Bool, json!(false))
            .option("allowFiltering", OptionType::Bool, json!(false))
            .option("allowSorting", OptionType::Bool, json!(false))
            .option("allowSortingBySummary", OptionType::Bool, json!(false))
            .option(
                "dataFieldArea",
                OptionType::Enum(&["column", "row"]),
                json!("column"),
            )
            // array of records or data source configuration
            .option("dataSource", OptionType::Any, Value::Null)
            .option("encodeHtml", OptionType::Bool, json!(true))
            .group("export", export())
            .group("fieldChooser", field_chooser())
            .group("fieldPanel", field_panel())
            .group("headerFilter", header_filter())
            .option("hideEmptySummaryCells", OptionType::Bool, json!(true))
            .group("loadPanel", load_panel())
            .option(
                "rowHeaderLayout",
                OptionType::Enum(&["standard", "tree"]),
                json!("standard"),
            )
            .group(
                "scrolling",
                OptionSchema::new()
                    .option(
                        "mode",
                        OptionType::Enum(&["standard", "virtual"]),
                        json!("standard"),
                    )
                    .option(
                        "useNative",
                        OptionType::one_of(vec![OptionType::Bool, OptionType::Enum(&["auto"])]),
                        json!("auto"),
                    ),
            )
            .option("showBorders", OptionType::Bool, json!(false))
            .option("showColumnGrandTotals", OptionType::Bool, json!(true))
            .option("showColumnTotals", OptionType::Bool, json!(true))
            .option("showRowGrandTotals", OptionType::Bool, json!(true))
            .option("showRowTotals", OptionType::Bool, json!(true))
            .option(
                "showTotalsPrior",
                OptionType::Enum(&["both", "columns", "none", "rows"]),
                json!("none"),
            )
            .group("stateStoring", state_storing())
            .group(
                "texts",
                texts(&[
                    ("collapseAll", "Collapse All"),
                    ("dataNotAvailable", "N/A"),
                    ("expandAll", "Expand All"),
                    ("exportToExcel", "Export to Excel file"),
                    ("grandTotal", "Grand Total"),
                    ("noData", "No data"),
                    ("removeAllSorting", "Remove All Sorting"),
                    ("showFieldChooser", "Show Field Chooser"),
                    ("sortColumnBySummary", "Sort {0} by This Column"),
                    ("sortRowBySummary", "Sort {0} by This Row"),
                    ("total", "{0} Total"),
                ]),
            )
            .option("wordWrapEnabled", OptionType::Bool, json!(true))
            .handlers(HANDLERS),
    )
}
