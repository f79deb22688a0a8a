// uiconf-widgets/src/pivot_grid/events.rs
use uiconf_core::{ComponentRef, EventDescriptor, MenuItem, WidgetEvent, builtin_names};

use super::cells::PivotCell;
use super::data::{Area, Field};

builtin_names! {
    /// Context menu commands the grid performs itself
    pub enum PivotMenuAction {
        ExpandAll => "expandAll",
        CollapseAll => "collapseAll",
        ShowFieldChooser => "showFieldChooser",
        ExportToExcel => "exportToExcel",
        RemoveAllSorting => "removeAllSorting",
    }
}

pub type PivotMenuItem = MenuItem<PivotMenuAction>;

macro_rules! events {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(impl WidgetEvent for $ty {
            const NAME: &'static str = $name;
        })+
    };
}

#[derive(Debug, Clone)]
pub struct CellClickEvent {
    pub component: ComponentRef,
    pub area: Area,
    pub cell: PivotCell,
    pub row_index: usize,
    pub column_index: usize,
    pub row_fields: Vec<Field>,
    pub column_fields: Vec<Field>,
    pub data_fields: Vec<Field>,
    pub cancel: bool,
}

#[derive(Debug, Clone)]
pub struct CellPreparedEvent {
    pub component: ComponentRef,
    pub area: Area,
    pub cell: PivotCell,
    pub row_index: usize,
    pub column_index: usize,
}

/// Handlers may edit `items` before the menu is shown
#[derive(Debug, Clone)]
pub struct ContextMenuPreparingEvent {
    pub component: ComponentRef,
    pub area: Area,
    pub cell: Option<PivotCell>,
    pub row_index: Option<usize>,
    pub column_index: Option<usize>,
    pub field: Option<Field>,
    pub row_fields: Vec<Field>,
    pub column_fields: Vec<Field>,
    pub data_fields: Vec<Field>,
    pub items: Vec<PivotMenuItem>,
}

#[derive(Debug, Clone)]
pub struct ExportingEvent {
    pub component: ComponentRef,
    pub file_name: String,
    pub cancel: bool,
}

#[derive(Debug, Clone)]
pub struct ExportedEvent {
    pub component: ComponentRef,
}

/// Cancel to take over saving `data` yourself
#[derive(Debug, Clone)]
pub struct FileSavingEvent {
    pub component: ComponentRef,
    pub data: Vec<u8>,
    pub format: String,
    pub file_name: String,
    pub cancel: bool,
}

events! {
    CellClickEvent => "cellClick",
    CellPreparedEvent => "cellPrepared",
    ContextMenuPreparingEvent => "contextMenuPreparing",
    ExportingEvent => "exporting",
    ExportedEvent => "exported",
    FileSavingEvent => "fileSaving",
}

pub(crate) const EVENTS: &[EventDescriptor] = &[
    EventDescriptor::notify("contentReady"),
    EventDescriptor::notify("disposing"),
    EventDescriptor::notify("initialized"),
    EventDescriptor::notify("optionChanged"),
    EventDescriptor::cancelable("cellClick"),
    EventDescriptor::notify("cellPrepared"),
    EventDescriptor::notify("contextMenuPreparing"),
    EventDescriptor::cancelable("exporting"),
    EventDescriptor::notify("exported"),
    EventDescriptor::cancelable("fileSaving"),
];
