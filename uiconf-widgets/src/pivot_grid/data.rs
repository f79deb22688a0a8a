// uiconf-widgets/src/pivot_grid/data.rs
//! Pivot data sources
//!
//! A data source owns the field layout and the expansion state of the
//! row and column headers, and turns its records into [`PivotData`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use uiconf_core::{ConfigError, ErrorCode, OperationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Column,
    Data,
    Filter,
    Row,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    #[default]
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A pivot field: a record property placed in one of the areas
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    pub caption: Option<String>,
    pub data_field: Option<String>,
    pub area: Option<Area>,
    pub area_index: Option<usize>,
    pub summary_type: SummaryType,
    pub sort_order: SortOrder,
    /// Records pass when their value is one of these
    pub filter_values: Option<Vec<Value>>,
    /// Expand every header item of this field
    pub expanded: bool,
    pub visible: bool,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            caption: None,
            data_field: None,
            area: None,
            area_index: None,
            summary_type: SummaryType::Count,
            sort_order: SortOrder::Asc,
            filter_values: None,
            expanded: false,
            visible: true,
        }
    }
}

impl Field {
    pub fn new(data_field: &str, area: Area) -> Self {
        Self {
            data_field: Some(data_field.to_string()),
            area: Some(area),
            ..Self::default()
        }
    }

    pub fn summary(mut self, summary_type: SummaryType) -> Self {
        self.summary_type = summary_type;
        self
    }

    pub fn caption(&self) -> &str {
        self.caption
            .as_deref()
            .or(self.data_field.as_deref())
            .unwrap_or_default()
    }

    fn value_of(&self, record: &Value) -> Value {
        self.data_field
            .as_deref()
            .and_then(|name| record.get(name))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// `D`, `T` or `GT` in header and cell descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellType {
    #[serde(rename = "D")]
    Data,
    #[serde(rename = "T")]
    Total,
    #[serde(rename = "GT")]
    GrandTotal,
}

impl CellType {
    pub fn code(self) -> &'static str {
        match self {
            Self::Data => "D",
            Self::Total => "T",
            Self::GrandTotal => "GT",
        }
    }
}

/// One row or column of the pivot table
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderItem {
    /// Field values from the outermost field inwards; empty for the grand total
    pub path: Vec<Value>,
    /// Display value of the innermost path segment
    pub caption: String,
    pub cell_type: CellType,
    /// `None` on the innermost field, which cannot expand
    pub expanded: Option<bool>,
}

impl HeaderItem {
    fn grand_total() -> Self {
        Self {
            path: Vec::new(),
            caption: String::new(),
            cell_type: CellType::GrandTotal,
            expanded: None,
        }
    }
}

/// Totals placement requested by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsLayout {
    pub row_totals: bool,
    pub column_totals: bool,
    pub row_grand_totals: bool,
    pub column_grand_totals: bool,
    pub row_totals_prior: bool,
    pub column_totals_prior: bool,
}

impl Default for TotalsLayout {
    fn default() -> Self {
        Self {
            row_totals: true,
            column_totals: true,
            row_grand_totals: true,
            column_grand_totals: true,
            row_totals_prior: false,
            column_totals_prior: false,
        }
    }
}

/// Result of a load: headers plus one summary per row, column and data field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotData {
    pub row_fields: Vec<Field>,
    pub column_fields: Vec<Field>,
    pub data_fields: Vec<Field>,
    pub rows: Vec<HeaderItem>,
    pub columns: Vec<HeaderItem>,
    /// `values[row][column][data_index]`
    pub values: Vec<Vec<Vec<Option<f64>>>>,
}

impl PivotData {
    pub fn value(&self, row: usize, column: usize, data_index: usize) -> Option<f64> {
        self.values
            .get(row)?
            .get(column)?
            .get(data_index)
            .copied()
            .flatten()
    }

    /// No summary has a value
    pub fn is_empty(&self) -> bool {
        self.values.iter().flatten().flatten().all(Option::is_none)
    }
}

#[async_trait(?Send)]
pub trait PivotDataSource {
    fn fields(&self) -> Vec<Field>;

    async fn load(&self, layout: &TotalsLayout) -> Result<PivotData, OperationError>;

    /// Returns whether the item changed state
    fn expand_header_item(&mut self, area: Area, path: &[Value]) -> bool;

    fn collapse_header_item(&mut self, area: Area, path: &[Value]) -> bool;

    fn expand_all(&mut self, area: Area);

    fn collapse_all(&mut self, area: Area);

    /// Restore the default sort order of every field
    fn reset_sorting(&mut self);

    fn state(&self) -> Value;

    fn set_state(&mut self, state: &Value) -> Result<(), OperationError>;
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn caption_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn path_key(path: &[Value]) -> String {
    serde_json::to_string(path).unwrap_or_default()
}

fn matches_path(record: &Value, fields: &[&Field], path: &[Value]) -> bool {
    path.iter()
        .zip(fields)
        .all(|(value, field)| field.value_of(record) == *value)
}

fn summarize<'a>(records: impl Iterator<Item = &'a Value>, field: &Field) -> Option<f64> {
    if field.summary_type == SummaryType::Count {
        let count = records.count();
        return (count > 0).then_some(count as f64);
    }
    let numbers: Vec<f64> = records
        .filter_map(|record| field.value_of(record).as_f64())
        .collect();
    if numbers.is_empty() {
        return None;
    }
    let sum: f64 = numbers.iter().sum();
    Some(match field.summary_type {
        SummaryType::Sum => sum,
        SummaryType::Avg => sum / numbers.len() as f64,
        SummaryType::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
        SummaryType::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        SummaryType::Count => numbers.len() as f64,
    })
}

struct Axis<'a> {
    fields: Vec<&'a Field>,
    expanded: &'a BTreeMap<String, Vec<Value>>,
    totals: bool,
    grand_total: bool,
    totals_prior: bool,
}

impl Axis<'_> {
    fn headers(&self, records: &[&Value]) -> Vec<HeaderItem> {
        if self.fields.is_empty() {
            return vec![HeaderItem::grand_total()];
        }
        let mut items = Vec::new();
        if self.grand_total && self.totals_prior {
            items.push(HeaderItem::grand_total());
        }
        self.walk(records, &mut Vec::new(), &mut items);
        if self.grand_total && !self.totals_prior {
            items.push(HeaderItem::grand_total());
        }
        items
    }

    fn walk(&self, records: &[&Value], path: &mut Vec<Value>, out: &mut Vec<HeaderItem>) {
        let depth = path.len();
        let field = self.fields[depth];
        let has_children = depth + 1 < self.fields.len();

        for value in distinct_values(records, field) {
            path.push(value.clone());
            let caption = caption_of(&value);
            if has_children && self.expanded.contains_key(&path_key(path)) {
                let subset: Vec<&Value> = records
                    .iter()
                    .copied()
                    .filter(|record| field.value_of(record) == value)
                    .collect();
                let total = HeaderItem {
                    path: path.clone(),
                    caption,
                    cell_type: CellType::Total,
                    expanded: Some(true),
                };
                if self.totals && self.totals_prior {
                    out.push(total.clone());
                }
                self.walk(&subset, path, out);
                if self.totals && !self.totals_prior {
                    out.push(total);
                }
            } else {
                out.push(HeaderItem {
                    path: path.clone(),
                    caption,
                    cell_type: CellType::Data,
                    expanded: has_children.then_some(false),
                });
            }
            path.pop();
        }
    }
}

fn distinct_values(records: &[&Value], field: &Field) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut values: Vec<Value> = records
        .iter()
        .map(|record| field.value_of(record))
        .filter(|value| seen.insert(value.to_string()))
        .collect();
    values.sort_by(compare_values);
    if field.sort_order == SortOrder::Desc {
        values.reverse();
    }
    values
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldState {
    data_field: Option<String>,
    area: Option<Area>,
    area_index: Option<usize>,
    sort_order: SortOrder,
    filter_values: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceState {
    fields: Vec<FieldState>,
    row_expanded_paths: Vec<Vec<Value>>,
    column_expanded_paths: Vec<Vec<Value>>,
}

static NULL: Value = Value::Null;

/// Data source over in-memory records
#[derive(Debug, Clone, Default)]
pub struct LocalPivotDataSource {
    records: Vec<Value>,
    fields: Vec<Field>,
    row_expanded: BTreeMap<String, Vec<Value>>,
    column_expanded: BTreeMap<String, Vec<Value>>,
}

impl LocalPivotDataSource {
    pub fn new(records: Vec<Value>, fields: Vec<Field>) -> Self {
        let mut source = Self {
            records,
            fields,
            ..Self::default()
        };
        for area in [Area::Row, Area::Column] {
            let depths: Vec<usize> = source
                .area_fields(area)
                .iter()
                .enumerate()
                .filter(|(_, field)| field.expanded)
                .map(|(depth, _)| depth)
                .collect();
            for depth in depths {
                source.expand_level(area, depth);
            }
        }
        source
    }

    /// Build from a `dataSource` option: a record array or `{ fields, store }`
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let (store, fields) = match value {
            Value::Array(_) => (value, Vec::new()),
            Value::Object(map) => {
                let fields = match map.get("fields") {
                    Some(fields) => serde_json::from_value(fields.clone()).map_err(|e| {
                        ConfigError::TypeMismatch {
                            key: "dataSource.fields".to_string(),
                            expected: "array of fields".to_string(),
                            found: e.to_string(),
                        }
                    })?,
                    None => Vec::new(),
                };
                (map.get("store").unwrap_or(&NULL), fields)
            }
            _ => (&NULL, Vec::new()),
        };
        let records = match store {
            Value::Array(records) => records.clone(),
            Value::Null => Vec::new(),
            _ => {
                return Err(ConfigError::TypeMismatch {
                    key: "dataSource.store".to_string(),
                    expected: "array of records".to_string(),
                    found: "non-array".to_string(),
                });
            }
        };
        Ok(Self::new(records, fields))
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Visible fields of `area` ordered by `areaIndex`
    pub fn area_fields(&self, area: Area) -> Vec<&Field> {
        let mut fields: Vec<(usize, &Field)> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.visible && field.area == Some(area))
            .collect();
        fields.sort_by_key(|(position, field)| (field.area_index.unwrap_or(usize::MAX), *position));
        fields.into_iter().map(|(_, field)| field).collect()
    }

    fn filtered(&self) -> Vec<&Value> {
        self.records
            .iter()
            .filter(|record| {
                self.fields.iter().all(|field| match &field.filter_values {
                    Some(allowed) => allowed.contains(&field.value_of(record)),
                    None => true,
                })
            })
            .collect()
    }

    fn expanded_mut(&mut self, area: Area) -> Option<&mut BTreeMap<String, Vec<Value>>> {
        match area {
            Area::Row => Some(&mut self.row_expanded),
            Area::Column => Some(&mut self.column_expanded),
            _ => None,
        }
    }

    /// Expand every item at `depth` of `area`
    fn expand_level(&mut self, area: Area, depth: usize) {
        let fields: Vec<Field> = self.area_fields(area).into_iter().cloned().collect();
        if depth + 1 >= fields.len() {
            return;
        }
        let paths: Vec<Vec<Value>> = self
            .filtered()
            .into_iter()
            .map(|record| {
                fields[..=depth]
                    .iter()
                    .map(|field| field.value_of(record))
                    .collect()
            })
            .collect();
        if let Some(expanded) = self.expanded_mut(area) {
            for path in paths {
                expanded.insert(path_key(&path), path);
            }
        }
    }
}

#[async_trait(?Send)]
impl PivotDataSource for LocalPivotDataSource {
    fn fields(&self) -> Vec<Field> {
        self.fields.clone()
    }

    async fn load(&self, layout: &TotalsLayout) -> Result<PivotData, OperationError> {
        let records = self.filtered();
        let row_fields = self.area_fields(Area::Row);
        let column_fields = self.area_fields(Area::Column);
        let data_fields = self.area_fields(Area::Data);

        let rows = Axis {
            fields: row_fields.clone(),
            expanded: &self.row_expanded,
            totals: layout.row_totals,
            grand_total: layout.row_grand_totals,
            totals_prior: layout.row_totals_prior,
        }
        .headers(&records);
        let columns = Axis {
            fields: column_fields.clone(),
            expanded: &self.column_expanded,
            totals: layout.column_totals,
            grand_total: layout.column_grand_totals,
            totals_prior: layout.column_totals_prior,
        }
        .headers(&records);

        let values = rows
            .iter()
            .map(|row| {
                let in_row: Vec<&Value> = records
                    .iter()
                    .copied()
                    .filter(|record| matches_path(record, &row_fields, &row.path))
                    .collect();
                columns
                    .iter()
                    .map(|column| {
                        data_fields
                            .iter()
                            .map(|field| {
                                summarize(
                                    in_row.iter().copied().filter(|record| {
                                        matches_path(record, &column_fields, &column.path)
                                    }),
                                    field,
                                )
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Ok(PivotData {
            row_fields: row_fields.into_iter().cloned().collect(),
            column_fields: column_fields.into_iter().cloned().collect(),
            data_fields: data_fields.into_iter().cloned().collect(),
            rows,
            columns,
            values,
        })
    }

    fn expand_header_item(&mut self, area: Area, path: &[Value]) -> bool {
        let depth = self.area_fields(area).len();
        if path.is_empty() || path.len() >= depth {
            return false;
        }
        self.expanded_mut(area)
            .is_some_and(|expanded| expanded.insert(path_key(path), path.to_vec()).is_none())
    }

    fn collapse_header_item(&mut self, area: Area, path: &[Value]) -> bool {
        let key = path_key(path);
        let prefix = key.trim_end_matches(']').to_string();
        let Some(expanded) = self.expanded_mut(area) else {
            return false;
        };
        let removed = expanded.remove(&key).is_some();
        // nested items collapse with their parent
        let nested = format!("{},", prefix);
        expanded.retain(|other, _| !other.starts_with(&nested));
        removed
    }

    fn expand_all(&mut self, area: Area) {
        let levels = self.area_fields(area).len();
        for depth in 0..levels.saturating_sub(1) {
            self.expand_level(area, depth);
        }
    }

    fn collapse_all(&mut self, area: Area) {
        if let Some(expanded) = self.expanded_mut(area) {
            expanded.clear();
        }
    }

    fn reset_sorting(&mut self) {
        for field in &mut self.fields {
            field.sort_order = SortOrder::Asc;
        }
    }

    fn state(&self) -> Value {
        let state = SourceState {
            fields: self
                .fields
                .iter()
                .map(|field| FieldState {
                    data_field: field.data_field.clone(),
                    area: field.area,
                    area_index: field.area_index,
                    sort_order: field.sort_order,
                    filter_values: field.filter_values.clone(),
                })
                .collect(),
            row_expanded_paths: self.row_expanded.values().cloned().collect(),
            column_expanded_paths: self.column_expanded.values().cloned().collect(),
        };
        serde_json::to_value(state).unwrap_or(Value::Null)
    }

    fn set_state(&mut self, state: &Value) -> Result<(), OperationError> {
        let state: SourceState = serde_json::from_value(state.clone()).map_err(|e| {
            OperationError::new(ErrorCode::Unspecified, format!("Invalid pivot state: {}", e))
        })?;
        if state.fields.len() != self.fields.len() {
            return Err(OperationError::new(
                ErrorCode::Unspecified,
                "Saved state does not match the configured fields.",
            ));
        }
        for (field, saved) in self.fields.iter_mut().zip(state.fields) {
            field.area = saved.area;
            field.area_index = saved.area_index;
            field.sort_order = saved.sort_order;
            field.filter_values = saved.filter_values;
        }
        self.row_expanded = state
            .row_expanded_paths
            .into_iter()
            .map(|path| (path_key(&path), path))
            .collect();
        self.column_expanded = state
            .column_expanded_paths
            .into_iter()
            .map(|path| (path_key(&path), path))
            .collect();
        Ok(())
    }
}
