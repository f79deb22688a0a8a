// uiconf-widgets/src/file_manager/options.rs
use serde::Deserialize;
use serde_json::{Value, json};
use uiconf_core::{OptionSchema, OptionType, WidgetOptions, base_schema};

use super::items::{DetailsColumn, FileManagerMenuItem, FileManagerToolbarItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemViewMode {
    Details,
    Thumbnails,
}

impl ItemViewMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Details => "details",
            Self::Thumbnails => "thumbnails",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Multiple,
    Single,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub copy: bool,
    pub create: bool,
    pub download: bool,
    #[serde(rename = "move")]
    pub move_: bool,
    pub delete: bool,
    pub rename: bool,
    pub upload: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextMenuOptions {
    pub items: Vec<FileManagerMenuItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailsOptions {
    pub columns: Vec<DetailsColumn>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemViewOptions {
    pub details: DetailsOptions,
    pub mode: ItemViewMode,
    pub show_folders: bool,
    pub show_parent_folder: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub show_panel: bool,
    pub show_popup: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarOptions {
    pub items: Vec<FileManagerToolbarItem>,
    pub file_selection_items: Vec<FileManagerToolbarItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    /// Bytes; zero means no limit
    pub max_file_size: f64,
    /// Bytes per provider call; zero sends the file whole
    pub chunk_size: f64,
}

/// Typed view of a file manager's options
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileManagerOptions {
    #[serde(flatten)]
    pub base: WidgetOptions,
    pub allowed_file_extensions: Vec<String>,
    pub context_menu: ContextMenuOptions,
    pub current_path: String,
    pub current_path_keys: Vec<String>,
    pub item_view: ItemViewOptions,
    pub notifications: NotificationOptions,
    pub permissions: Permissions,
    pub root_folder_name: String,
    pub selection_mode: SelectionMode,
    pub selected_item_keys: Vec<String>,
    pub focused_item_key: Option<String>,
    pub toolbar: ToolbarOptions,
    pub upload: UploadOptions,
}

impl FileManagerOptions {
    /// Whether `name` passes the `allowedFileExtensions` filter
    pub fn extension_allowed(&self, name: &str) -> bool {
        if self.allowed_file_extensions.is_empty() {
            return true;
        }
        let extension = super::provider::extension_of(name);
        self.allowed_file_extensions
            .iter()
            .any(|allowed| allowed.to_lowercase() == extension)
    }
}

const HANDLERS: &[&str] = &[
    "onContextMenuItemClick",
    "onContextMenuShowing",
    "onCurrentDirectoryChanged",
    "onDirectoryCreated",
    "onDirectoryCreating",
    "onErrorOccurred",
    "onFileUploaded",
    "onFileUploading",
    "onFocusedItemChanged",
    "onItemCopied",
    "onItemCopying",
    "onItemDeleted",
    "onItemDeleting",
    "onItemDownloading",
    "onItemMoved",
    "onItemMoving",
    "onItemRenamed",
    "onItemRenaming",
    "onSelectedFileOpened",
    "onSelectionChanged",
    "onToolbarItemClick",
];

fn toolbar_item() -> OptionType {
    OptionType::one_of(vec![
        OptionType::String,
        OptionType::Group(
            OptionSchema::new()
                .option("name", OptionType::String, Value::Null)
                .option("text", OptionType::String, Value::Null)
                .option("icon", OptionType::String, json!(""))
                .option(
                    "location",
                    OptionType::Enum(&["before", "after", "center"]),
                    json!("before"),
                )
                .option("visible", OptionType::Bool, Value::Null)
                .option("disabled", OptionType::Bool, json!(false))
                .option("cssClass", OptionType::String, Value::Null)
                .option("widget", OptionType::String, Value::Null)
                .option("options", OptionType::Object, Value::Null),
        ),
    ])
}

fn menu_item() -> OptionType {
    OptionType::one_of(vec![
        OptionType::String,
        OptionType::Group(
            OptionSchema::new()
                .option("name", OptionType::String, Value::Null)
                .option("text", OptionType::String, Value::Null)
                .option("icon", OptionType::String, json!(""))
                .option("visible", OptionType::Bool, Value::Null)
                .option("disabled", OptionType::Bool, json!(false))
                .option("beginGroup", OptionType::Bool, json!(false))
                .option("selectable", OptionType::Bool, json!(false))
                .option("selected", OptionType::Bool, json!(false))
                // Submenus are checked for shape only
                .option(
                    "items",
                    OptionType::array(OptionType::one_of(vec![
                        OptionType::String,
                        OptionType::Object,
                    ])),
                    json!([]),
                ),
        ),
    ])
}

fn details_column() -> OptionType {
    OptionType::one_of(vec![
        OptionType::String,
        OptionType::Group(
            OptionSchema::new()
                .option(
                    "alignment",
                    OptionType::Enum(&["center", "left", "right"]),
                    Value::Null,
                )
                .option("caption", OptionType::String, Value::Null)
                .option("cssClass", OptionType::String, Value::Null)
                .option("dataField", OptionType::String, Value::Null)
                .option(
                    "dataType",
                    OptionType::Enum(&["string", "number", "date", "boolean", "object", "datetime"]),
                    Value::Null,
                )
                .option("hidingPriority", OptionType::integer(), Value::Null)
                .option("sortIndex", OptionType::integer(), Value::Null)
                .option("sortOrder", OptionType::Enum(&["asc", "desc"]), Value::Null)
                .option("visible", OptionType::Bool, json!(true))
                .option("visibleIndex", OptionType::integer(), Value::Null)
                .option("width", OptionType::dimension(), Value::Null),
        ),
    ])
}

fn permissions() -> OptionSchema {
    ["copy", "create", "download", "move", "delete", "rename", "upload"]
        .into_iter()
        .fold(OptionSchema::new(), |schema, name| {
            schema.option(name, OptionType::Bool, json!(false))
        })
}

/// Option schema of the file manager
pub fn schema() -> OptionSchema {
    base_schema().extend(
        OptionSchema::new()
            .option(
                "allowedFileExtensions",
                OptionType::array(OptionType::String),
                json!([]),
            )
            .group(
                "contextMenu",
                OptionSchema::new().option(
                    "items",
                    OptionType::array(menu_item()),
                    json!([
                        "create", "upload", "rename", "move", "copy", "delete", "refresh",
                        "download"
                    ]),
                ),
            )
            .option("currentPath", OptionType::String, json!(""))
            .option(
                "currentPathKeys",
                OptionType::array(OptionType::String),
                json!([]),
            )
            .option("customizeDetailColumns", OptionType::Handler, Value::Null)
            .option("customizeThumbnail", OptionType::Handler, Value::Null)
            .option("fileSystemProvider", OptionType::Any, Value::Null)
            .option("focusedItemKey", OptionType::String, Value::Null)
            .group(
                "itemView",
                OptionSchema::new()
                    .group(
                        "details",
                        OptionSchema::new().option(
                            "columns",
                            OptionType::array(details_column()),
                            json!(["thumbnail", "name", "dateModified", "size"]),
                        ),
                    )
                    .option(
                        "mode",
                        OptionType::Enum(&["details", "thumbnails"]),
                        json!("details"),
                    )
                    .option("showFolders", OptionType::Bool, json!(true))
                    .option("showParentFolder", OptionType::Bool, json!(true)),
            )
            .group(
                "notifications",
                OptionSchema::new()
                    .option("showPanel", OptionType::Bool, json!(true))
                    .option("showPopup", OptionType::Bool, json!(true)),
            )
            .group("permissions", permissions())
            .option("rootFolderName", OptionType::String, json!("Files"))
            .option(
                "selectedItemKeys",
                OptionType::array(OptionType::String),
                json!([]),
            )
            .option(
                "selectionMode",
                OptionType::Enum(&["multiple", "single"]),
                json!("multiple"),
            )
            .group(
                "toolbar",
                OptionSchema::new()
                    .option(
                        "fileSelectionItems",
                        OptionType::array(toolbar_item()),
                        json!([
                            "download",
                            "separator",
                            "move",
                            "copy",
                            "rename",
                            "separator",
                            "delete",
                            "clearSelection",
                            { "name": "separator", "location": "after" },
                            "refresh"
                        ]),
                    )
                    .option(
                        "items",
                        OptionType::array(toolbar_item()),
                        json!([
                            "showNavPane",
                            "create",
                            "upload",
                            "switchView",
                            { "name": "separator", "location": "after" },
                            "refresh"
                        ]),
                    ),
            )
            .group(
                "upload",
                OptionSchema::new()
                    .option("chunkSize", OptionType::non_negative(), json!(200000))
                    .option("maxFileSize", OptionType::non_negative(), json!(0)),
            )
            .handlers(HANDLERS),
    )
}
