// uiconf-widgets/src/pivot_grid/mod.rs
//! Pivot grid widget
//!
//! Summaries come from a [`PivotDataSource`]; the widget lays them out as
//! header and data cells, toggles header expansion on click, and exports
//! through an [`Exporter`].

pub mod cells;
pub mod chart;
pub mod data;
pub mod events;
pub mod export;
pub mod options;
pub mod state;

use serde_json::Value;
use std::any::Any;
use uiconf_core::{
    ActionOutcome, ComponentRef, ConfigError, Dispatcher, ErrorCode, EventBus, OperationError,
    OptionChange, Options, Widget, WidgetDescriptor, WidgetKind,
};

pub use cells::PivotCell;
pub use chart::{ChartBinding, ChartIntegration, ChartPoint};
pub use data::{
    Area, CellType, Field, HeaderItem, LocalPivotDataSource, PivotData, PivotDataSource,
    SortOrder, SummaryType, TotalsLayout,
};
pub use events::*;
pub use export::{DelimitedExporter, Exporter};
pub use options::{DataFieldArea, PivotGridOptions, TotalsPrior};
pub use state::{InMemoryStateStore, StateStore};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldChooserPopup {
    pub visible: bool,
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl FieldChooserPopup {
    fn from_options(settings: &PivotGridOptions, visible: bool) -> Self {
        Self {
            visible,
            title: settings.field_chooser.title.clone(),
            width: settings.field_chooser.width,
            height: settings.field_chooser.height,
        }
    }
}

/// Output of a finished export, ready for the host to write out
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub format: String,
    pub data: Vec<u8>,
}

pub struct PivotGrid {
    dispatcher: Dispatcher,
    options: Options,
    settings: PivotGridOptions,
    data_source: Box<dyn PivotDataSource>,
    exporter: Box<dyn Exporter>,
    state_store: Box<dyn StateStore>,
    state_loaded: bool,
    data: Option<PivotData>,
    charts: Vec<ChartBinding>,
    field_chooser: FieldChooserPopup,
    dimensions: (usize, usize),
}

impl PivotGrid {
    pub fn new(
        instance: &str,
        options: Options,
        bus: &EventBus,
        data_source: Box<dyn PivotDataSource>,
    ) -> Result<Self, ConfigError> {
        let settings: PivotGridOptions = options.typed()?;
        let field_chooser = FieldChooserPopup::from_options(&settings, false);

        Ok(Self {
            dispatcher: Dispatcher::new(ComponentRef::new("pivotGrid", instance), bus.clone()),
            options,
            settings,
            data_source,
            exporter: Box::new(DelimitedExporter::default()),
            state_store: Box::new(InMemoryStateStore::new()),
            state_loaded: false,
            data: None,
            charts: Vec::new(),
            field_chooser,
            dimensions: (0, 0),
        })
    }

    pub fn with_exporter(mut self, exporter: Box<dyn Exporter>) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn with_state_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.state_store = store;
        self
    }

    pub fn settings(&self) -> &PivotGridOptions {
        &self.settings
    }

    pub fn get_data_source(&self) -> &dyn PivotDataSource {
        self.data_source.as_ref()
    }

    pub fn get_data_source_mut(&mut self) -> &mut dyn PivotDataSource {
        self.data_source.as_mut()
    }

    pub fn state_store(&self) -> &dyn StateStore {
        self.state_store.as_ref()
    }

    /// Data of the last load
    pub fn data(&self) -> Option<&PivotData> {
        self.data.as_ref()
    }

    pub fn totals_layout(&self) -> TotalsLayout {
        let s = &self.settings;
        TotalsLayout {
            row_totals: s.show_row_totals,
            column_totals: s.show_column_totals,
            row_grand_totals: s.show_row_grand_totals,
            column_grand_totals: s.show_column_grand_totals,
            row_totals_prior: s.show_totals_prior.rows(),
            column_totals_prior: s.show_totals_prior.columns(),
        }
    }

    /// Reload summaries from the data source
    pub async fn refresh(&mut self) -> Result<&PivotData, OperationError> {
        let layout = self.totals_layout();
        let loaded = self.data_source.load(&layout).await;
        let data = match loaded {
            Ok(data) => data,
            Err(err) => {
                log::warn!("{}: loading pivot data failed: {}", self.instance(), err);
                return Err(err);
            }
        };
        self.dimensions = Self::measure(&data);
        log::debug!(
            "{}: loaded {} row(s) x {} column(s)",
            self.instance(),
            self.dimensions.0,
            self.dimensions.1
        );
        Ok(&*self.data.insert(data))
    }

    /// Restore stored state on first use, load, then raise `cellPrepared` per cell
    pub async fn render(&mut self) -> Result<usize, OperationError> {
        if !self.state_loaded {
            self.load_state().await?;
        }
        self.refresh().await?;
        Ok(self.prepare_cells())
    }

    fn measure(data: &PivotData) -> (usize, usize) {
        let per_column = data.data_fields.len().max(1);
        (data.rows.len(), data.columns.len() * per_column)
    }

    /// Recompute the table size from the loaded data
    pub fn update_dimensions(&mut self) -> (usize, usize) {
        self.dimensions = self.data.as_ref().map(Self::measure).unwrap_or((0, 0));
        self.dimensions
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Cell at a position of one of the areas
    ///
    /// Data cells are addressed by row and by `column * data_fields + data_index`.
    pub fn cell_at(&self, area: Area, row_index: usize, column_index: usize) -> Option<PivotCell> {
        let data = self.data.as_ref()?;
        match area {
            Area::Row => data
                .rows
                .get(row_index)
                .map(|item| cells::header_cell(item, &self.settings.texts)),
            Area::Column => data
                .columns
                .get(column_index)
                .map(|item| cells::header_cell(item, &self.settings.texts)),
            Area::Data => {
                let per_column = data.data_fields.len();
                if per_column == 0 || row_index >= data.rows.len() {
                    return None;
                }
                let (column, index) = (column_index / per_column, column_index % per_column);
                (column < data.columns.len())
                    .then(|| cells::data_cell(data, row_index, column, index))
            }
            Area::Filter => None,
        }
    }

    /// Raise `cellPrepared` for every header and data cell; returns the count
    pub fn prepare_cells(&mut self) -> usize {
        let Some(data) = self.data.as_ref() else {
            return 0;
        };
        let texts = &self.settings.texts;
        let mut prepared = Vec::new();
        for (i, item) in data.rows.iter().enumerate() {
            prepared.push((Area::Row, i, 0, cells::header_cell(item, texts)));
        }
        for (j, item) in data.columns.iter().enumerate() {
            prepared.push((Area::Column, 0, j, cells::header_cell(item, texts)));
        }
        let per_column = data.data_fields.len();
        for i in 0..data.rows.len() {
            for j in 0..data.columns.len() {
                for k in 0..per_column {
                    prepared.push((Area::Data, i, j * per_column + k, cells::data_cell(data, i, j, k)));
                }
            }
        }

        let count = prepared.len();
        let component = self.component();
        for (area, row_index, column_index, cell) in prepared {
            self.dispatcher.notify(CellPreparedEvent {
                component: component.clone(),
                area,
                cell,
                row_index,
                column_index,
            });
        }
        count
    }

    /// Click a cell; header clicks toggle expansion unless a handler cancels
    pub async fn click_cell(
        &mut self,
        area: Area,
        row_index: usize,
        column_index: usize,
    ) -> Result<bool, OperationError> {
        let Some(cell) = self.cell_at(area, row_index, column_index) else {
            log::warn!(
                "{}: no {:?} cell at ({}, {})",
                self.instance(),
                area,
                row_index,
                column_index
            );
            return Ok(false);
        };
        let (row_fields, column_fields, data_fields) = self.layout_fields();
        let component = self.component();
        let event = self.dispatcher.notify(CellClickEvent {
            component,
            area,
            cell,
            row_index,
            column_index,
            row_fields,
            column_fields,
            data_fields,
            cancel: false,
        });
        if event.cancel {
            return Ok(false);
        }

        let Some(expanded) = event.cell.expanded else {
            return Ok(true);
        };
        let toggled = if expanded {
            self.data_source.collapse_header_item(area, &event.cell.path)
        } else {
            self.data_source.expand_header_item(area, &event.cell.path)
        };
        if toggled {
            self.refresh().await?;
            self.save_state().await?;
        }
        Ok(true)
    }

    fn layout_fields(&self) -> (Vec<Field>, Vec<Field>, Vec<Field>) {
        match &self.data {
            Some(data) => (
                data.row_fields.clone(),
                data.column_fields.clone(),
                data.data_fields.clone(),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        }
    }

    fn menu_item(action: PivotMenuAction, text: &str) -> PivotMenuItem {
        PivotMenuItem {
            text: Some(text.to_string()),
            ..PivotMenuItem::named(action)
        }
    }

    /// Build the context menu for a spot of the grid and let handlers edit it
    pub fn prepare_context_menu(
        &mut self,
        area: Area,
        row_index: Option<usize>,
        column_index: Option<usize>,
        field: Option<Field>,
    ) -> Vec<PivotMenuItem> {
        let s = &self.settings;
        let header = matches!(area, Area::Row | Area::Column);
        let mut items = Vec::new();
        if header && s.allow_expand_all {
            items.push(Self::menu_item(PivotMenuAction::ExpandAll, &s.texts.expand_all));
            items.push(Self::menu_item(PivotMenuAction::CollapseAll, &s.texts.collapse_all));
        }
        if header && s.allow_sorting {
            items.push(Self::menu_item(
                PivotMenuAction::RemoveAllSorting,
                &s.texts.remove_all_sorting,
            ));
        }
        if s.field_chooser.enabled {
            let mut item = Self::menu_item(
                PivotMenuAction::ShowFieldChooser,
                &s.texts.show_field_chooser,
            );
            item.begin_group = !items.is_empty();
            items.push(item);
        }
        if s.export.enabled {
            let mut item =
                Self::menu_item(PivotMenuAction::ExportToExcel, &s.texts.export_to_excel);
            item.begin_group = true;
            items.push(item);
        }

        let cell = match (row_index, column_index) {
            (Some(row), Some(column)) => self.cell_at(area, row, column),
            (Some(row), None) => self.cell_at(area, row, 0),
            (None, Some(column)) => self.cell_at(area, 0, column),
            (None, None) => None,
        };
        let (row_fields, column_fields, data_fields) = self.layout_fields();
        let component = self.component();
        let event = self.dispatcher.notify(ContextMenuPreparingEvent {
            component,
            area,
            cell,
            row_index,
            column_index,
            field,
            row_fields,
            column_fields,
            data_fields,
            items,
        });
        event.items
    }

    /// Run a builtin context menu command
    pub async fn execute_menu_action(
        &mut self,
        action: PivotMenuAction,
        area: Area,
    ) -> Result<(), OperationError> {
        match action {
            PivotMenuAction::ExpandAll => self.data_source.expand_all(area),
            PivotMenuAction::CollapseAll => self.data_source.collapse_all(area),
            PivotMenuAction::RemoveAllSorting => self.data_source.reset_sorting(),
            PivotMenuAction::ShowFieldChooser => {
                self.show_field_chooser();
                return Ok(());
            }
            PivotMenuAction::ExportToExcel => {
                self.export_to_excel()?;
                return Ok(());
            }
        }
        self.refresh().await?;
        self.save_state().await?;
        Ok(())
    }

    /// Rows of header and cell texts, as exported
    pub fn export_table(&self) -> Vec<Vec<String>> {
        let Some(data) = self.data.as_ref() else {
            return Vec::new();
        };
        let texts = &self.settings.texts;
        let multiple = data.data_fields.len() > 1;
        let per_column = data.data_fields.len();
        let caption = |index: usize| data.data_fields[index].caption().to_string();

        let mut table = Vec::new();
        match self.settings.data_field_area {
            DataFieldArea::Column => {
                let mut head = vec![String::new()];
                for column in &data.columns {
                    let text = cells::header_text(column, texts);
                    for k in 0..per_column {
                        head.push(if multiple {
                            format!("{} | {}", text, caption(k))
                        } else {
                            text.clone()
                        });
                    }
                }
                table.push(head);
                for (i, row) in data.rows.iter().enumerate() {
                    let mut line = vec![cells::header_text(row, texts)];
                    for j in 0..data.columns.len() {
                        for k in 0..per_column {
                            line.push(cells::data_cell(data, i, j, k).text);
                        }
                    }
                    table.push(line);
                }
            }
            DataFieldArea::Row => {
                let mut head = vec![String::new()];
                head.extend(data.columns.iter().map(|c| cells::header_text(c, texts)));
                table.push(head);
                for (i, row) in data.rows.iter().enumerate() {
                    let text = cells::header_text(row, texts);
                    for k in 0..per_column {
                        let mut line = vec![if multiple {
                            format!("{} | {}", text, caption(k))
                        } else {
                            text.clone()
                        }];
                        for j in 0..data.columns.len() {
                            line.push(cells::data_cell(data, i, j, k).text);
                        }
                        table.push(line);
                    }
                }
            }
        }
        table
    }

    /// Export the loaded table: `exporting`, serialize, `fileSaving`, `exported`
    ///
    /// Cancelling `fileSaving` means the host saves the data itself; the
    /// outcome is then `Cancelled`.
    pub fn export_to_excel(&mut self) -> Result<ActionOutcome<ExportedFile>, OperationError> {
        if self.data.is_none() {
            return Err(OperationError::new(
                ErrorCode::Unspecified,
                "No data has been loaded to export.",
            ));
        }
        let component = self.component();
        let exporting = self.dispatcher.notify(ExportingEvent {
            component: component.clone(),
            file_name: self.settings.export.file_name.clone(),
            cancel: false,
        });
        if exporting.cancel {
            log::debug!("{}: export cancelled", self.instance());
            return Ok(ActionOutcome::Cancelled);
        }

        let bytes = self.exporter.export(&self.export_table())?;
        let saving = self.dispatcher.notify(FileSavingEvent {
            component: component.clone(),
            data: bytes,
            format: self.exporter.format().to_string(),
            file_name: exporting.file_name,
            cancel: false,
        });
        if saving.cancel {
            log::debug!("{}: file saving handled by host", self.instance());
            return Ok(ActionOutcome::Cancelled);
        }

        self.dispatcher.notify(ExportedEvent { component });
        Ok(ActionOutcome::Completed(ExportedFile {
            file_name: format!("{}.{}", saving.file_name, self.exporter.extension()),
            format: saving.format,
            data: saving.data,
        }))
    }

    /// Bind a chart by id; `None` when it is already bound
    pub fn bind_chart(&mut self, chart: &str, integration: ChartIntegration) -> Option<ChartBinding> {
        if self.charts.iter().any(|binding| binding.chart() == chart) {
            return None;
        }
        let binding = ChartBinding::new(chart, integration);
        self.charts.push(binding.clone());
        Some(binding)
    }

    pub fn unbind_chart(&mut self, binding: &ChartBinding) -> bool {
        let before = self.charts.len();
        self.charts.retain(|bound| bound.chart() != binding.chart());
        self.charts.len() != before
    }

    pub fn bound_charts(&self) -> &[ChartBinding] {
        &self.charts
    }

    pub fn chart_points(&self, binding: &ChartBinding) -> Vec<ChartPoint> {
        match &self.data {
            Some(data) => binding.points(data, &self.settings.texts),
            None => Vec::new(),
        }
    }

    pub fn get_field_chooser_popup(&self) -> &FieldChooserPopup {
        &self.field_chooser
    }

    pub fn show_field_chooser(&mut self) -> bool {
        if !self.settings.field_chooser.enabled {
            return false;
        }
        self.field_chooser.visible = true;
        true
    }

    pub fn hide_field_chooser(&mut self) {
        self.field_chooser.visible = false;
    }

    fn storage_key(&self) -> String {
        self.settings
            .state_storing
            .storage_key
            .clone()
            .unwrap_or_else(|| self.instance().to_string())
    }

    /// Persist the data source layout when `stateStoring` is enabled
    pub async fn save_state(&mut self) -> Result<bool, OperationError> {
        if !self.settings.state_storing.enabled {
            return Ok(false);
        }
        let key = self.storage_key();
        let state = self.data_source.state();
        self.state_store.save(&key, &state).await?;
        log::debug!("{}: state saved under '{}'", self.instance(), key);
        Ok(true)
    }

    /// Apply stored layout; returns whether a state was found
    pub async fn load_state(&mut self) -> Result<bool, OperationError> {
        self.state_loaded = true;
        if !self.settings.state_storing.enabled {
            return Ok(false);
        }
        let key = self.storage_key();
        let stored = self.state_store.load(&key).await?;
        match stored {
            Some(state) => {
                self.data_source.set_state(&state)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn component(&self) -> ComponentRef {
        self.dispatcher.component().clone()
    }
}

impl Widget for PivotGrid {
    fn kind(&self) -> &'static str {
        "pivotGrid"
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
        self.settings = self.options.typed()?;
        match change.name.as_str() {
            "dataSource" => {
                self.data_source = Box::new(LocalPivotDataSource::from_json(&change.value)?);
                self.data = None;
                self.dimensions = (0, 0);
                self.state_loaded = false;
            }
            "fieldChooser" => {
                let visible = self.field_chooser.visible && self.settings.field_chooser.enabled;
                self.field_chooser = FieldChooserPopup::from_options(&self.settings, visible);
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

impl WidgetKind for PivotGrid {
    fn descriptor() -> WidgetDescriptor {
        WidgetDescriptor {
            kind: "pivotGrid",
            schema: options::schema,
            events: events::EVENTS,
            methods: &[
                "bindChart",
                "exportToExcel",
                "getDataSource",
                "getFieldChooserPopup",
                "updateDimensions",
            ],
        }
    }

    fn create(instance: &str, options: Options, bus: &EventBus) -> Result<Self, ConfigError> {
        let source = match options.get("dataSource") {
            Some(value) => LocalPivotDataSource::from_json(value)?,
            None => LocalPivotDataSource::new(Vec::new(), Vec::new()),
        };
        Self::new(instance, options, bus, Box::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sales_source() -> Value {
        json!({
            "fields": [
                { "dataField": "region", "area": "row" },
                { "dataField": "country", "area": "row" },
                { "dataField": "year", "area": "column" },
                { "dataField": "amount", "area": "data", "summaryType": "sum", "caption": "Sales" }
            ],
            "store": [
                { "region": "Europe", "country": "France", "year": 2020, "amount": 100 },
                { "region": "Europe", "country": "Germany", "year": 2020, "amount": 250 },
                { "region": "Europe", "country": "France", "year": 2021, "amount": 50 },
                { "region": "Asia", "country": "Japan", "year": 2021, "amount": 400 }
            ]
        })
    }

    fn grid(mut config: Value) -> PivotGrid {
        if config.is_null() {
            config = json!({});
        }
        if let Some(map) = config.as_object_mut() {
            map.entry("dataSource").or_insert(sales_source());
        }
        let options = Options::new(options::schema(), &config).unwrap();
        PivotGrid::create("sales", options, &EventBus::new()).unwrap()
    }

    fn trace(grid: &mut PivotGrid) -> Rc<RefCell<Vec<&'static str>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        grid.on(move |_: &mut ExportingEvent| log.borrow_mut().push("exporting"));
        let log = seen.clone();
        grid.on(move |_: &mut FileSavingEvent| log.borrow_mut().push("fileSaving"));
        let log = seen.clone();
        grid.on(move |_: &mut ExportedEvent| log.borrow_mut().push("exported"));
        seen
    }

    #[test]
    fn test_render_prepares_every_cell() {
        let mut g = grid(Value::Null);
        let prepared = Rc::new(RefCell::new(0));
        let count = prepared.clone();
        g.on(move |_: &mut CellPreparedEvent| *count.borrow_mut() += 1);

        // 3 row headers, 3 column headers, 3 x 3 summaries
        assert_eq!(block_on(g.render()).unwrap(), 15);
        assert_eq!(*prepared.borrow(), 15);
        assert_eq!(g.dimensions(), (3, 3));
    }

    #[test]
    fn test_header_click_toggles_expansion() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();

        assert!(block_on(g.click_cell(Area::Row, 1, 0)).unwrap());
        assert_eq!(g.data().unwrap().rows.len(), 5);
        assert_eq!(g.cell_at(Area::Row, 3, 0).unwrap().text, "Europe Total");

        assert!(block_on(g.click_cell(Area::Row, 3, 0)).unwrap());
        assert_eq!(g.data().unwrap().rows.len(), 3);
    }

    #[test]
    fn test_cancelled_click_keeps_layout() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();
        g.on(|e: &mut CellClickEvent| e.cancel = e.area == Area::Row);

        assert!(!block_on(g.click_cell(Area::Row, 1, 0)).unwrap());
        assert_eq!(g.data().unwrap().rows.len(), 3);
        assert!(!block_on(g.click_cell(Area::Row, 42, 0)).unwrap());
    }

    #[test]
    fn test_data_cell_lookup() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();
        let cell = g.cell_at(Area::Data, 1, 0).unwrap();
        assert_eq!(cell.text, "350");
        assert_eq!(cell.row_path, vec![json!("Europe")]);
        assert!(g.cell_at(Area::Data, 1, 9).is_none());
    }

    #[test]
    fn test_context_menu_items_follow_options() {
        let mut g = grid(json!({ "allowExpandAll": true, "export": { "enabled": true } }));
        block_on(g.render()).unwrap();
        g.on(|e: &mut ContextMenuPreparingEvent| {
            e.items.push(PivotMenuItem {
                text: Some("Pin".to_string()),
                ..PivotMenuItem::named(uiconf_core::ItemName::Custom("pin".to_string()))
            })
        });

        let items = g.prepare_context_menu(Area::Row, Some(0), None, None);
        let names: Vec<&str> = items
            .iter()
            .filter_map(|i| i.name.as_ref().map(|n| n.as_str()))
            .collect();
        assert_eq!(
            names,
            vec!["expandAll", "collapseAll", "showFieldChooser", "exportToExcel", "pin"]
        );
        assert_eq!(items[0].text.as_deref(), Some("Expand All"));
        assert!(items[2].begin_group);

        let data_items = g.prepare_context_menu(Area::Data, Some(0), Some(0), None);
        assert_eq!(data_items.len(), 3);
    }

    #[test]
    fn test_expand_all_from_menu() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();
        block_on(g.execute_menu_action(PivotMenuAction::ExpandAll, Area::Row)).unwrap();
        assert_eq!(g.data().unwrap().rows.len(), 6);

        block_on(g.execute_menu_action(PivotMenuAction::ShowFieldChooser, Area::Row)).unwrap();
        assert!(g.get_field_chooser_popup().visible);
        assert_eq!(g.get_field_chooser_popup().title, "Field Chooser");
    }

    #[test]
    fn test_export_event_order_and_file_name() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();
        let seen = trace(&mut g);
        g.on(|e: &mut ExportingEvent| e.file_name = "Q1".to_string());

        let file = g.export_to_excel().unwrap().completed().unwrap();

        assert_eq!(*seen.borrow(), vec!["exporting", "fileSaving", "exported"]);
        assert_eq!(file.file_name, "Q1.csv");
        assert_eq!(file.format, "CSV");
        let text = String::from_utf8(file.data).unwrap();
        assert!(text.starts_with(",2020,2021,Grand Total\r\n"));
        assert!(text.contains("Europe,350,50,400\r\n"));
    }

    #[test]
    fn test_export_can_be_cancelled_at_each_step() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();
        let seen = trace(&mut g);
        g.on(|e: &mut FileSavingEvent| e.cancel = true);

        assert!(g.export_to_excel().unwrap().is_cancelled());
        assert_eq!(*seen.borrow(), vec!["exporting", "fileSaving"]);

        g.on(|e: &mut ExportingEvent| e.cancel = true);
        seen.borrow_mut().clear();
        assert!(g.export_to_excel().unwrap().is_cancelled());
        assert_eq!(*seen.borrow(), vec!["exporting"]);
    }

    #[test]
    fn test_export_requires_loaded_data() {
        let mut g = grid(Value::Null);
        assert!(g.export_to_excel().is_err());
    }

    #[test]
    fn test_chart_binding_is_unique_per_chart() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();

        let binding = g.bind_chart("sales-chart", ChartIntegration::default()).unwrap();
        assert!(g.bind_chart("sales-chart", ChartIntegration::default()).is_none());
        assert_eq!(g.chart_points(&binding).len(), 3);

        assert!(g.unbind_chart(&binding));
        assert!(!g.unbind_chart(&binding));
        assert!(g.bind_chart("sales-chart", ChartIntegration::default()).is_some());
    }

    #[test]
    fn test_state_storing_round_trip() {
        let config = json!({ "stateStoring": { "enabled": true, "storageKey": "sales-layout" } });
        let mut first = grid(config.clone());
        block_on(first.render()).unwrap();
        block_on(first.click_cell(Area::Row, 1, 0)).unwrap();

        let saved = block_on(first.state_store().load("sales-layout")).unwrap().unwrap();
        let mut store = InMemoryStateStore::new();
        block_on(store.save("sales-layout", &saved)).unwrap();

        let mut second = grid(config).with_state_store(Box::new(store));
        block_on(second.render()).unwrap();
        assert_eq!(second.data().unwrap().rows.len(), 5);
    }

    #[test]
    fn test_state_storing_disabled() {
        let mut g = grid(Value::Null);
        assert!(!block_on(g.save_state()).unwrap());
        assert!(!block_on(g.load_state()).unwrap());
    }

    #[test]
    fn test_data_source_option_replaces_source() {
        let mut g = grid(Value::Null);
        block_on(g.render()).unwrap();
        g.set_option("dataSource", json!([{ "x": 1 }])).unwrap();
        assert!(g.data().is_none());
        assert_eq!(g.update_dimensions(), (0, 0));

        block_on(g.render()).unwrap();
        assert!(g.data().unwrap().is_empty());
    }

    #[test]
    fn test_descriptor() {
        let descriptor = PivotGrid::descriptor();
        assert_eq!(descriptor.kind, "pivotGrid");
        assert!(descriptor.unpaired_actions().is_empty());
        assert!(descriptor.event("fileSaving").is_some());
    }
}
