// uiconf-widgets/src/pivot_grid/chart.rs
//! Feeding pivot summaries to a bound chart

use serde::Deserialize;

use super::cells::header_text;
use super::data::{CellType, HeaderItem, PivotData};
use super::options::PivotGridTexts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataFieldsDisplayMode {
    SingleAxis,
    #[default]
    SplitAxes,
    SplitPanes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PutDataFieldsInto {
    Args,
    #[default]
    Series,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartIntegration {
    /// Series from columns and arguments from rows instead of the reverse
    pub inverted: bool,
    pub data_fields_display_mode: DataFieldsDisplayMode,
    pub put_data_fields_into: PutDataFieldsInto,
    pub alternate_data_fields: bool,
}

impl Default for ChartIntegration {
    fn default() -> Self {
        Self {
            inverted: false,
            data_fields_display_mode: DataFieldsDisplayMode::default(),
            put_data_fields_into: PutDataFieldsInto::default(),
            alternate_data_fields: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub series: String,
    pub argument: String,
    pub value: f64,
}

/// Handle returned by `bind_chart`; pass it back to unbind
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBinding {
    chart: String,
    integration: ChartIntegration,
}

fn label(item: &HeaderItem, texts: &PivotGridTexts) -> String {
    if item.path.is_empty() {
        return header_text(item, texts);
    }
    item.path
        .iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Chart points come from data items only; totals are left out
fn leaves(items: &[HeaderItem]) -> Vec<(usize, &HeaderItem)> {
    let data: Vec<(usize, &HeaderItem)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.cell_type == CellType::Data)
        .collect();
    if data.is_empty() {
        // no fields on this axis: the grand total stands in
        items.iter().enumerate().collect()
    } else {
        data
    }
}

impl ChartBinding {
    pub(crate) fn new(chart: &str, integration: ChartIntegration) -> Self {
        Self {
            chart: chart.to_string(),
            integration,
        }
    }

    pub fn chart(&self) -> &str {
        &self.chart
    }

    pub fn integration(&self) -> &ChartIntegration {
        &self.integration
    }

    pub fn points(&self, data: &PivotData, texts: &PivotGridTexts) -> Vec<ChartPoint> {
        let multiple = data.data_fields.len() > 1;
        let mut points = Vec::new();
        for (row, row_item) in leaves(&data.rows) {
            for (column, column_item) in leaves(&data.columns) {
                for (index, field) in data.data_fields.iter().enumerate() {
                    let Some(value) = data.value(row, column, index) else {
                        continue;
                    };
                    let (mut series, mut argument) = if self.integration.inverted {
                        (label(column_item, texts), label(row_item, texts))
                    } else {
                        (label(row_item, texts), label(column_item, texts))
                    };
                    if multiple {
                        let target = match self.integration.put_data_fields_into {
                            PutDataFieldsInto::Series => &mut series,
                            PutDataFieldsInto::Args => &mut argument,
                        };
                        target.push_str(" | ");
                        target.push_str(field.caption());
                    }
                    points.push(ChartPoint {
                        series,
                        argument,
                        value,
                    });
                }
            }
        }
        points
    }
}
