// uiconf-widgets/src/pivot_grid/cells.rs
use serde_json::Value;

use super::data::{CellType, HeaderItem, PivotData};
use super::options::{PivotGridTexts, fill};
use crate::common::format_number;

/// A header or data cell as handed to event handlers
///
/// Header cells carry `path`, `cell_type` and `expanded`; data cells carry
/// the row/column paths and types plus `data_index`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotCell {
    pub text: String,
    pub value: Value,
    pub path: Vec<Value>,
    pub cell_type: Option<CellType>,
    pub expanded: Option<bool>,
    pub row_path: Vec<Value>,
    pub column_path: Vec<Value>,
    pub row_type: Option<CellType>,
    pub column_type: Option<CellType>,
    pub data_index: Option<usize>,
}

pub fn header_text(item: &HeaderItem, texts: &PivotGridTexts) -> String {
    match item.cell_type {
        CellType::Data => item.caption.clone(),
        CellType::Total => fill(&texts.total, &item.caption),
        CellType::GrandTotal => texts.grand_total.clone(),
    }
}

pub fn header_cell(item: &HeaderItem, texts: &PivotGridTexts) -> PivotCell {
    PivotCell {
        text: header_text(item, texts),
        value: item.path.last().cloned().unwrap_or(Value::Null),
        path: item.path.clone(),
        cell_type: Some(item.cell_type),
        expanded: item.expanded,
        ..PivotCell::default()
    }
}

/// Summary cell; empty summaries read as blank text
pub fn data_cell(data: &PivotData, row: usize, column: usize, data_index: usize) -> PivotCell {
    let value = data.value(row, column, data_index);
    let row_item = data.rows.get(row);
    let column_item = data.columns.get(column);
    PivotCell {
        text: value.map(format_number).unwrap_or_default(),
        value: value.map(Value::from).unwrap_or(Value::Null),
        row_path: row_item.map(|item| item.path.clone()).unwrap_or_default(),
        column_path: column_item.map(|item| item.path.clone()).unwrap_or_default(),
        row_type: row_item.map(|item| item.cell_type),
        column_type: column_item.map(|item| item.cell_type),
        data_index: Some(data_index),
        ..PivotCell::default()
    }
}

#[cfg(test)]
mod tests {
    use super::super::data::tests::sales;
    use super::super::data::{PivotDataSource, TotalsLayout};
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;
    use uiconf_core::Options;

    fn texts() -> PivotGridTexts {
        let options: super::super::options::PivotGridOptions =
            Options::new(super::super::options::schema(), &Value::Null)
                .unwrap()
                .typed()
                .unwrap();
        options.texts
    }

    #[test]
    fn test_header_texts() {
        let mut source = sales();
        source.expand_header_item(super::super::data::Area::Row, &[json!("Europe")]);
        let data = block_on(source.load(&TotalsLayout::default())).unwrap();

        let texts = texts();
        let labels: Vec<String> = data.rows.iter().map(|r| header_text(r, &texts)).collect();
        assert_eq!(labels, vec!["Asia", "France", "Germany", "Europe Total", "Grand Total"]);

        let asia = header_cell(&data.rows[0], &texts);
        assert_eq!(asia.value, json!("Asia"));
        assert_eq!(asia.expanded, Some(false));
    }

    #[test]
    fn test_data_cell_formats_value() {
        let data = block_on(sales().load(&TotalsLayout::default())).unwrap();
        let cell = data_cell(&data, 2, 2, 0);
        assert_eq!(cell.text, "800");
        assert_eq!(cell.row_type, Some(CellType::GrandTotal));
        assert_eq!(cell.data_index, Some(0));

        let empty = data_cell(&data, 0, 0, 0);
        assert_eq!(empty.text, "");
        assert!(empty.value.is_null());
    }
}
