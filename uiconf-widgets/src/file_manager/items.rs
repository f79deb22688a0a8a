// uiconf-widgets/src/file_manager/items.rs
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uiconf_core::{MenuItem, ToolbarItem, builtin_names};

builtin_names! {
    /// Commands the file manager toolbar knows how to render
    pub enum ToolbarItemName {
        ShowNavPane => "showNavPane",
        Create => "create",
        Upload => "upload",
        Refresh => "refresh",
        SwitchView => "switchView",
        Download => "download",
        Move => "move",
        Copy => "copy",
        Rename => "rename",
        Delete => "delete",
        ClearSelection => "clearSelection",
        Separator => "separator",
    }
}

builtin_names! {
    pub enum ContextMenuItemName {
        Create => "create",
        Upload => "upload",
        Refresh => "refresh",
        Download => "download",
        Move => "move",
        Copy => "copy",
        Rename => "rename",
        Delete => "delete",
    }
}

pub type FileManagerToolbarItem = ToolbarItem<ToolbarItemName>;
pub type FileManagerMenuItem = MenuItem<ContextMenuItemName>;

/// Where a context menu was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewArea {
    NavPane,
    ItemView,
}

impl ViewArea {
    pub fn name(self) -> &'static str {
        match self {
            Self::NavPane => "navPane",
            Self::ItemView => "itemView",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlignment {
    Center,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDataType {
    String,
    Number,
    Date,
    Boolean,
    Object,
    Datetime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A column of the details view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsColumn {
    pub alignment: Option<ColumnAlignment>,
    pub caption: Option<String>,
    pub css_class: Option<String>,
    pub data_field: Option<String>,
    pub data_type: Option<ColumnDataType>,
    pub hiding_priority: Option<i64>,
    pub sort_index: Option<i64>,
    pub sort_order: Option<SortOrder>,
    pub visible: bool,
    pub visible_index: Option<i64>,
    pub width: Option<Value>,
}

impl DetailsColumn {
    pub fn field(data_field: impl Into<String>) -> Self {
        Self {
            alignment: None,
            caption: None,
            css_class: None,
            data_field: Some(data_field.into()),
            data_type: None,
            hiding_priority: None,
            sort_index: None,
            sort_order: None,
            visible: true,
            visible_index: None,
            width: None,
        }
    }

    /// Caption shown for the builtin fields when none is configured
    pub fn default_caption(data_field: &str) -> Option<&'static str> {
        match data_field {
            "name" => Some("Name"),
            "dateModified" => Some("Date Modified"),
            "size" => Some("File Size"),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnRepr {
    Field(String),
    Full(ColumnFields),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnFields {
    alignment: Option<ColumnAlignment>,
    caption: Option<String>,
    css_class: Option<String>,
    data_field: Option<String>,
    data_type: Option<ColumnDataType>,
    hiding_priority: Option<i64>,
    sort_index: Option<i64>,
    sort_order: Option<SortOrder>,
    #[serde(default = "visible_by_default")]
    visible: bool,
    visible_index: Option<i64>,
    width: Option<Value>,
}

fn visible_by_default() -> bool {
    true
}

impl<'de> Deserialize<'de> for DetailsColumn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ColumnRepr::deserialize(deserializer)? {
            ColumnRepr::Field(field) => Self::field(field),
            ColumnRepr::Full(c) => Self {
                alignment: c.alignment,
                caption: c.caption,
                css_class: c.css_class,
                data_field: c.data_field,
                data_type: c.data_type,
                hiding_priority: c.hiding_priority,
                sort_index: c.sort_index,
                sort_order: c.sort_order,
                visible: c.visible,
                visible_index: c.visible_index,
                width: c.width,
            },
        })
    }
}

/// Display text of builtin toolbar commands
pub fn toolbar_text(name: ToolbarItemName) -> Option<&'static str> {
    use ToolbarItemName::*;
    match name {
        ShowNavPane => Some("Toggle navigation pane"),
        Create => Some("New directory"),
        Upload => Some("Upload files"),
        Refresh => Some("Refresh"),
        SwitchView => Some("Switch view"),
        Download => Some("Download"),
        Move => Some("Move to"),
        Copy => Some("Copy to"),
        Rename => Some("Rename"),
        Delete => Some("Delete"),
        ClearSelection => Some("Clear selection"),
        Separator => None,
    }
}

pub fn context_menu_text(name: ContextMenuItemName) -> &'static str {
    use ContextMenuItemName::*;
    match name {
        Create => "New directory",
        Upload => "Upload files",
        Refresh => "Refresh",
        Download => "Download",
        Move => "Move to",
        Copy => "Copy to",
        Rename => "Rename",
        Delete => "Delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uiconf_core::{ItemLocation, ItemName};

    #[test]
    fn test_column_from_string_and_object() {
        let columns: Vec<DetailsColumn> = serde_json::from_value(json!([
            "name",
            { "dataField": "size", "caption": "Bytes", "visible": false, "width": 80 }
        ]))
        .unwrap();
        assert_eq!(columns[0], DetailsColumn::field("name"));
        assert_eq!(columns[1].caption.as_deref(), Some("Bytes"));
        assert!(!columns[1].visible);
        assert_eq!(columns[1].width, Some(json!(80)));
    }

    #[test]
    fn test_toolbar_item_names() {
        let items: Vec<FileManagerToolbarItem> = serde_json::from_value(json!([
            "create",
            { "name": "separator", "location": "after" },
            { "name": "archive", "text": "Archive" }
        ]))
        .unwrap();
        assert_eq!(items[0].builtin(), Some(ToolbarItemName::Create));
        assert_eq!(items[1].location, ItemLocation::After);
        assert_eq!(items[2].name, Some(ItemName::Custom("archive".to_string())));
    }

    #[test]
    fn test_default_captions() {
        assert_eq!(DetailsColumn::default_caption("dateModified"), Some("Date Modified"));
        assert_eq!(DetailsColumn::default_caption("owner"), None);
        assert_eq!(toolbar_text(ToolbarItemName::Separator), None);
    }
}
