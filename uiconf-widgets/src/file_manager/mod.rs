// uiconf-widgets/src/file_manager/mod.rs
//! File manager widget
//!
//! Browses a tree served by a [`FileSystemProvider`]. Every mutation goes
//! through the two-phase "-ing"/done protocol; failures are reported through
//! [`ErrorOccurredEvent`] and returned as the method's `Err`.

mod actions;
mod commands;
pub mod events;
pub mod items;
pub mod options;
pub mod provider;

use serde_json::{Value, json};
use std::any::Any;
use uiconf_core::event::OptionChangedEvent;
use uiconf_core::{
    ActionOutcome, ComponentRef, ConfigError, Dispatcher, ErrorCode, EventBus, OperationError,
    OptionChange, Options, Widget, WidgetDescriptor, WidgetKind,
};

pub use events::*;
pub use items::{
    ContextMenuItemName, DetailsColumn, FileManagerMenuItem, FileManagerToolbarItem,
    ToolbarItemName, ViewArea,
};
pub use options::{FileManagerOptions, ItemViewMode, Permissions, SelectionMode};
pub use provider::{
    DownloadedFile, FileData, FileSystemItem, FileSystemProvider, InMemoryFileSystem, UploadInfo,
};

/// Result of one item of a multi-item action
pub type ItemResult<T> = Result<ActionOutcome<T>, OperationError>;

type ThumbnailHook = Box<dyn Fn(&FileSystemItem) -> String>;
type ColumnsHook = Box<dyn Fn(Vec<DetailsColumn>) -> Vec<DetailsColumn>>;

/// Entry of the notification panel
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub success: bool,
}

pub struct FileManager {
    dispatcher: Dispatcher,
    options: Options,
    settings: FileManagerOptions,
    provider: Box<dyn FileSystemProvider>,
    current_dir: FileSystemItem,
    items: Vec<FileSystemItem>,
    selected_keys: Vec<String>,
    focused_key: Option<String>,
    pending_path: Option<String>,
    pending_selection: Option<Vec<String>>,
    pending_focus: Option<String>,
    nav_pane_visible: bool,
    notifications: Vec<Notification>,
    customize_thumbnail: Option<ThumbnailHook>,
    customize_detail_columns: Option<ColumnsHook>,
}

impl FileManager {
    pub fn new(
        instance: &str,
        options: Options,
        bus: &EventBus,
        provider: Box<dyn FileSystemProvider>,
    ) -> Result<Self, ConfigError> {
        let settings: FileManagerOptions = options.typed()?;
        let current_dir = FileSystemItem::root(settings.root_folder_name.clone());
        let pending_path = Some(settings.current_path.clone()).filter(|p| !p.is_empty());
        let pending_selection =
            Some(settings.selected_item_keys.clone()).filter(|keys| !keys.is_empty());
        let pending_focus = settings.focused_item_key.clone();

        Ok(Self {
            dispatcher: Dispatcher::new(ComponentRef::new("fileManager", instance), bus.clone()),
            options,
            settings,
            provider,
            current_dir,
            items: Vec::new(),
            selected_keys: Vec::new(),
            focused_key: None,
            pending_path,
            pending_selection,
            pending_focus,
            nav_pane_visible: true,
            notifications: Vec::new(),
            customize_thumbnail: None,
            customize_detail_columns: None,
        })
    }

    pub fn settings(&self) -> &FileManagerOptions {
        &self.settings
    }

    pub fn provider(&self) -> &dyn FileSystemProvider {
        self.provider.as_ref()
    }

    pub fn get_current_directory(&self) -> &FileSystemItem {
        &self.current_dir
    }

    /// Items of the current directory as of the last refresh
    pub fn items(&self) -> &[FileSystemItem] {
        &self.items
    }

    /// Items the item view shows, honoring `itemView.showFolders`
    pub fn view_items(&self) -> Vec<&FileSystemItem> {
        self.items
            .iter()
            .filter(|item| self.settings.item_view.show_folders || !item.is_directory)
            .collect()
    }

    pub fn item(&self, key: &str) -> Option<&FileSystemItem> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn get_selected_items(&self) -> Vec<FileSystemItem> {
        self.selected_keys
            .iter()
            .filter_map(|key| self.item(key).cloned())
            .collect()
    }

    pub fn selected_item_keys(&self) -> &[String] {
        &self.selected_keys
    }

    pub fn focused_item_key(&self) -> Option<&str> {
        self.focused_key.as_deref()
    }

    pub fn is_nav_pane_visible(&self) -> bool {
        self.nav_pane_visible
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Reload the current directory, applying a pending `currentPath` first
    pub async fn refresh(&mut self) -> Result<Vec<FileSystemItem>, OperationError> {
        match self.pending_path.take() {
            Some(path) => self.set_current_path(&path).await?,
            None => {
                let current = self.current_dir.clone();
                self.navigate(current).await?;
            }
        }
        Ok(self.items.clone())
    }

    pub async fn set_current_path(&mut self, path: &str) -> Result<(), OperationError> {
        let resolved = self.resolve_directory(path.trim_matches('/')).await;
        match resolved {
            Ok(directory) => self.navigate(directory).await,
            Err(err) => Err(self.report_error(err, None)),
        }
    }

    pub async fn open_directory(&mut self, directory: &FileSystemItem) -> Result<(), OperationError> {
        if !directory.is_directory {
            let err = OperationError::from_code(ErrorCode::DirectoryNotFound);
            return Err(self.report_error(err, Some(directory.clone())));
        }
        self.navigate(directory.clone()).await
    }

    /// Open a listed item: directories are entered, files raise `selectedFileOpened`
    pub async fn open_item(&mut self, key: &str) -> Result<(), OperationError> {
        let item = self.find_item(key)?;
        if item.is_directory {
            return self.navigate(item).await;
        }
        let component = self.component();
        self.dispatcher.notify(SelectedFileOpenedEvent {
            component,
            file: item,
        });
        Ok(())
    }

    pub fn select_item(&mut self, key: &str) -> bool {
        if self.item(key).is_none() || self.selected_keys.iter().any(|k| k == key) {
            return false;
        }
        let mut keys = match self.settings.selection_mode {
            SelectionMode::Single => Vec::new(),
            SelectionMode::Multiple => self.selected_keys.clone(),
        };
        keys.push(key.to_string());
        self.apply_selection(keys);
        true
    }

    pub fn deselect_item(&mut self, key: &str) -> bool {
        if !self.selected_keys.iter().any(|k| k == key) {
            return false;
        }
        let keys = self
            .selected_keys
            .iter()
            .filter(|k| *k != key)
            .cloned()
            .collect();
        self.apply_selection(keys);
        true
    }

    /// Replace the selection; unknown keys are dropped, single mode keeps the first
    pub fn set_selected_item_keys(&mut self, keys: Vec<String>) {
        let mut accepted: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            if self.item(&key).is_some() && !accepted.contains(&key) {
                accepted.push(key);
            }
        }
        if self.settings.selection_mode == SelectionMode::Single {
            accepted.truncate(1);
        }
        self.apply_selection(accepted);
    }

    pub fn clear_selection(&mut self) {
        self.apply_selection(Vec::new());
    }

    pub fn set_focused_item(&mut self, key: Option<&str>) -> bool {
        if key.is_some_and(|k| self.item(k).is_none()) || key == self.focused_key.as_deref() {
            return false;
        }
        self.focused_key = key.map(str::to_string);
        self.sync_option("focusedItemKey", json!(self.focused_key));
        let component = self.component();
        let item = key.and_then(|k| self.item(k)).cloned();
        self.dispatcher.notify(FocusedItemChangedEvent {
            component,
            item,
            item_key: self.focused_key.clone(),
        });
        true
    }

    /// Install a hook that picks the thumbnail of each item
    pub fn set_customize_thumbnail(&mut self, hook: impl Fn(&FileSystemItem) -> String + 'static) {
        self.customize_thumbnail = Some(Box::new(hook));
    }

    /// Install a hook that rewrites the details view columns
    pub fn set_customize_detail_columns(
        &mut self,
        hook: impl Fn(Vec<DetailsColumn>) -> Vec<DetailsColumn> + 'static,
    ) {
        self.customize_detail_columns = Some(Box::new(hook));
    }

    fn component(&self) -> ComponentRef {
        self.dispatcher.component().clone()
    }

    fn root(&self) -> FileSystemItem {
        FileSystemItem::root(self.settings.root_folder_name.clone())
    }

    fn find_item(&mut self, key: &str) -> Result<FileSystemItem, OperationError> {
        match self.item(key) {
            Some(item) => Ok(item.clone()),
            None => {
                let err = OperationError::new(
                    ErrorCode::FileNotFound,
                    format!("Item '{}' is not in the current directory.", key),
                );
                Err(self.report_error(err, None))
            }
        }
    }

    async fn resolve_directory(&self, path: &str) -> Result<FileSystemItem, OperationError> {
        if path.is_empty() {
            return Ok(self.root());
        }
        let parent = FileSystemItem::directory(provider::parent_of(path));
        self.provider
            .get_items(&parent)
            .await?
            .into_iter()
            .find(|item| item.path == path && item.is_directory)
            .ok_or_else(|| OperationError::from_code(ErrorCode::DirectoryNotFound))
    }

    async fn navigate(&mut self, directory: FileSystemItem) -> Result<(), OperationError> {
        let listed = self.provider.get_items(&directory).await;
        let items = match listed {
            Ok(items) => items,
            Err(err) => return Err(self.report_error(err, Some(directory))),
        };
        let changed = directory.path != self.current_dir.path;
        self.current_dir = directory;
        self.items = items;
        self.pending_path = None;

        if changed {
            log::debug!("{} entered '{}'", self.instance(), self.current_dir.path);
            self.clear_selection();
            self.set_focused_item(None);
            let path = self.current_dir.path.clone();
            let keys = self.current_dir.path_keys();
            self.sync_option("currentPath", json!(path));
            self.sync_option("currentPathKeys", json!(keys));
            let component = self.component();
            self.dispatcher.notify(CurrentDirectoryChangedEvent {
                component,
                directory: self.current_dir.clone(),
            });
        } else {
            self.prune_selection();
        }

        if let Some(keys) = self.pending_selection.take() {
            self.set_selected_item_keys(keys);
        }
        if let Some(key) = self.pending_focus.take() {
            self.set_focused_item(Some(&key));
        }
        Ok(())
    }

    /// Re-list the current directory after a mutation
    async fn reload(&mut self) {
        let listed = self.provider.get_items(&self.current_dir).await;
        match listed {
            Ok(items) => {
                self.items = items;
                self.prune_selection();
                if self.focused_key.as_deref().is_some_and(|k| self.item(k).is_none()) {
                    self.set_focused_item(None);
                }
            }
            Err(err) => log::warn!(
                "{}: reload of '{}' failed: {}",
                self.instance(),
                self.current_dir.path,
                err
            ),
        }
    }

    fn prune_selection(&mut self) {
        let keys: Vec<String> = self
            .selected_keys
            .iter()
            .filter(|key| self.item(key).is_some())
            .cloned()
            .collect();
        if keys.len() != self.selected_keys.len() {
            self.apply_selection(keys);
        }
    }

    fn apply_selection(&mut self, keys: Vec<String>) {
        let previous = std::mem::replace(&mut self.selected_keys, keys);
        let selected: Vec<String> = self
            .selected_keys
            .iter()
            .filter(|key| !previous.contains(key))
            .cloned()
            .collect();
        let deselected: Vec<String> = previous
            .iter()
            .filter(|key| !self.selected_keys.contains(key))
            .cloned()
            .collect();
        if selected.is_empty() && deselected.is_empty() {
            return;
        }

        self.sync_option("selectedItemKeys", json!(self.selected_keys));
        let event = SelectionChangedEvent {
            component: self.component(),
            current_selected_item_keys: selected,
            current_deselected_item_keys: deselected,
            selected_items: self.get_selected_items(),
            selected_item_keys: self.selected_keys.clone(),
        };
        self.dispatcher.notify(event);
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

    fn notify_panel(&mut self, message: String, success: bool) {
        if self.settings.notifications.show_panel {
            self.notifications.push(Notification { message, success });
        }
    }

    /// Route a failure through `errorOccurred`; handlers may rewrite the text
    fn report_error(&mut self, err: OperationError, item: Option<FileSystemItem>) -> OperationError {
        log::warn!("{}: {}", self.instance(), err);
        let component = self.component();
        let event = self.dispatcher.notify(ErrorOccurredEvent {
            component,
            error_code: err.code,
            error_text: err.text,
            file_system_item: item,
        });
        self.notify_panel(event.error_text.clone(), false);
        OperationError::new(event.error_code, event.error_text)
    }
}

impl Widget for FileManager {
    fn kind(&self) -> &'static str {
        "fileManager"
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
            "selectionMode"
                if self.settings.selection_mode == SelectionMode::Single
                    && self.selected_keys.len() > 1 =>
            {
                let first = self.selected_keys[..1].to_vec();
                self.apply_selection(first);
            }
            "selectedItemKeys" => {
                let keys = self.settings.selected_item_keys.clone();
                self.set_selected_item_keys(keys);
                // unknown, duplicate or surplus keys are dropped from the option too
                self.sync_option("selectedItemKeys", json!(self.selected_keys));
            }
            "focusedItemKey" => {
                let key = self.settings.focused_item_key.clone();
                self.set_focused_item(key.as_deref());
                self.sync_option("focusedItemKey", json!(self.focused_key));
            }
            "currentPath" => {
                self.pending_path = Some(self.settings.current_path.clone());
            }
            "rootFolderName" if self.current_dir.is_root() => {
                self.current_dir.name = self.settings.root_folder_name.clone();
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

impl WidgetKind for FileManager {
    fn descriptor() -> WidgetDescriptor {
        WidgetDescriptor {
            kind: "fileManager",
            schema: options::schema,
            events: events::EVENTS,
            methods: &[
                "clearSelection",
                "clickContextMenuItem",
                "clickToolbarItem",
                "contextMenuItems",
                "copyItems",
                "createDirectory",
                "deleteItems",
                "deselectItem",
                "detailColumns",
                "downloadItems",
                "getCurrentDirectory",
                "getSelectedItems",
                "moveItems",
                "openDirectory",
                "openItem",
                "refresh",
                "renameItem",
                "selectItem",
                "setCurrentPath",
                "setFocusedItem",
                "setSelectedItemKeys",
                "showContextMenu",
                "switchView",
                "thumbnailFor",
                "toolbarItems",
                "uploadFile",
            ],
        }
    }

    /// An array-valued `fileSystemProvider` seeds an in-memory tree
    fn create(instance: &str, options: Options, bus: &EventBus) -> Result<Self, ConfigError> {
        let provider = match options.get("fileSystemProvider") {
            Some(value @ Value::Array(_)) => InMemoryFileSystem::from_json(value)?,
            _ => InMemoryFileSystem::new(),
        };
        Self::new(instance, options, bus, Box::new(provider))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub(crate) fn sample_fs() -> InMemoryFileSystem {
        let mut fs = InMemoryFileSystem::new();
        fs.add_file("Documents/report.txt", "quarterly");
        fs.add_file("Documents/Drafts/todo.md", "- ship");
        fs.add_directory("Images");
        fs.add_file("notes.txt", "hello");
        fs.add_file("photo.png", vec![0u8; 2048]);
        fs
    }

    pub(crate) fn manager(config: Value) -> FileManager {
        let options = Options::new(options::schema(), &config).unwrap();
        let mut fm =
            FileManager::new("files", options, &EventBus::new(), Box::new(sample_fs())).unwrap();
        block_on(fm.refresh()).unwrap();
        fm
    }

    fn record<E: uiconf_core::WidgetEvent + Clone>(fm: &mut FileManager) -> Rc<RefCell<Vec<E>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        fm.on(move |e: &mut E| log.borrow_mut().push(e.clone()));
        seen
    }

    #[test]
    fn test_refresh_lists_root() {
        let fm = manager(Value::Null);
        let keys: Vec<_> = fm.items().iter().map(|i| i.key()).collect();
        assert_eq!(keys, vec!["Documents", "Images", "notes.txt", "photo.png"]);
        assert_eq!(fm.get_current_directory().name, "Files");
        assert!(fm.get_current_directory().is_root());
    }

    #[test]
    fn test_single_selection_replaces_previous() {
        let mut fm = manager(json!({ "selectionMode": "single" }));
        assert!(fm.select_item("notes.txt"));
        let seen = record::<SelectionChangedEvent>(&mut fm);

        assert!(fm.select_item("photo.png"));

        let events = seen.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].current_selected_item_keys, vec!["photo.png"]);
        assert_eq!(events[0].current_deselected_item_keys, vec!["notes.txt"]);
        assert_eq!(events[0].selected_item_keys, vec!["photo.png"]);
        assert_eq!(fm.option("selectedItemKeys"), Some(&json!(["photo.png"])));
    }

    #[test]
    fn test_selected_keys_option_follows_accepted_selection() {
        let mut fm = manager(json!({ "selectionMode": "single" }));
        assert!(fm.select_item("notes.txt"));
        let seen = record::<SelectionChangedEvent>(&mut fm);

        fm.set_option("selectedItemKeys", json!(["notes.txt", "photo.png"]))
            .unwrap();

        assert!(seen.borrow().is_empty());
        assert_eq!(fm.selected_item_keys(), ["notes.txt"]);
        assert_eq!(fm.option("selectedItemKeys"), Some(&json!(["notes.txt"])));

        fm.set_option("selectedItemKeys", json!(["missing.txt", "photo.png"]))
            .unwrap();
        assert_eq!(fm.selected_item_keys(), ["photo.png"]);
        assert_eq!(fm.option("selectedItemKeys"), Some(&json!(["photo.png"])));

        fm.set_option("focusedItemKey", json!("missing.txt")).unwrap();
        assert_eq!(fm.option("focusedItemKey"), Some(&Value::Null));
    }

    #[test]
    fn test_multiple_selection_accumulates() {
        let mut fm = manager(Value::Null);
        fm.select_item("notes.txt");
        fm.select_item("Documents");
        assert!(!fm.select_item("notes.txt"));
        assert!(!fm.select_item("missing.txt"));
        assert_eq!(fm.selected_item_keys(), ["notes.txt", "Documents"]);
        assert_eq!(fm.get_selected_items().len(), 2);

        assert!(fm.deselect_item("notes.txt"));
        assert_eq!(fm.selected_item_keys(), ["Documents"]);
    }

    #[test]
    fn test_switching_to_single_trims_selection() {
        let mut fm = manager(Value::Null);
        fm.set_selected_item_keys(vec!["notes.txt".into(), "photo.png".into()]);
        let seen = record::<SelectionChangedEvent>(&mut fm);

        fm.set_option("selectionMode", json!("single")).unwrap();

        assert_eq!(fm.selected_item_keys(), ["notes.txt"]);
        assert_eq!(seen.borrow()[0].current_deselected_item_keys, vec!["photo.png"]);
    }

    #[test]
    fn test_selected_keys_option_applied_after_first_load() {
        let fm = manager(json!({ "selectedItemKeys": ["notes.txt", "ghost"] }));
        assert_eq!(fm.selected_item_keys(), ["notes.txt"]);
    }

    #[test]
    fn test_navigation_updates_path_options_and_clears_selection() {
        let mut fm = manager(Value::Null);
        fm.select_item("notes.txt");
        let changed = record::<CurrentDirectoryChangedEvent>(&mut fm);

        block_on(fm.open_item("Documents")).unwrap();
        block_on(fm.set_current_path("Documents/Drafts")).unwrap();

        assert_eq!(changed.borrow().len(), 2);
        assert_eq!(fm.get_current_directory().name, "Drafts");
        assert_eq!(fm.option("currentPath"), Some(&json!("Documents/Drafts")));
        assert_eq!(
            fm.option("currentPathKeys"),
            Some(&json!(["Documents", "Documents/Drafts"]))
        );
        assert!(fm.selected_item_keys().is_empty());
    }

    #[test]
    fn test_missing_directory_reports_error() {
        let mut fm = manager(Value::Null);
        let errors = record::<ErrorOccurredEvent>(&mut fm);

        let err = block_on(fm.set_current_path("Nowhere")).unwrap_err();

        assert_eq!(err.code, ErrorCode::DirectoryNotFound);
        assert_eq!(errors.borrow()[0].error_code, ErrorCode::DirectoryNotFound);
        assert!(fm.get_current_directory().is_root());
    }

    #[test]
    fn test_current_path_option_applies_on_refresh() {
        let mut fm = manager(json!({ "currentPath": "Documents" }));
        assert_eq!(fm.get_current_directory().path, "Documents");

        fm.set_option("currentPath", json!("")).unwrap();
        block_on(fm.refresh()).unwrap();
        assert!(fm.get_current_directory().is_root());
    }

    #[test]
    fn test_opening_file_raises_selected_file_opened() {
        let mut fm = manager(Value::Null);
        let opened = record::<SelectedFileOpenedEvent>(&mut fm);
        block_on(fm.open_item("notes.txt")).unwrap();
        assert_eq!(opened.borrow()[0].file.name, "notes.txt");
        assert!(fm.get_current_directory().is_root());
    }

    #[test]
    fn test_focus_tracks_option_and_event() {
        let mut fm = manager(Value::Null);
        let focused = record::<FocusedItemChangedEvent>(&mut fm);

        assert!(fm.set_focused_item(Some("photo.png")));
        assert!(!fm.set_focused_item(Some("photo.png")));
        assert!(!fm.set_focused_item(Some("ghost")));

        assert_eq!(focused.borrow().len(), 1);
        assert_eq!(fm.option("focusedItemKey"), Some(&json!("photo.png")));

        fm.set_option("focusedItemKey", json!("notes.txt")).unwrap();
        assert_eq!(fm.focused_item_key(), Some("notes.txt"));
    }

    #[test]
    fn test_hidden_folders_excluded_from_view() {
        let fm = manager(json!({ "itemView": { "showFolders": false } }));
        assert_eq!(fm.view_items().len(), 2);
    }

    #[test]
    fn test_create_from_registry_seeds_provider() {
        let options = Options::new(
            options::schema(),
            &json!({ "fileSystemProvider": [ { "name": "a.txt", "content": "x" } ] }),
        )
        .unwrap();
        let mut fm = FileManager::create("files", options, &EventBus::new()).unwrap();
        block_on(fm.refresh()).unwrap();
        assert_eq!(fm.items()[0].name, "a.txt");
        assert!(FileManager::descriptor().unpaired_actions().is_empty());
    }

    #[test]
    fn test_descriptor_lists_every_method() {
        let methods = FileManager::descriptor().methods;
        for name in ["selectItem", "openItem", "downloadItems", "toolbarItems", "setCurrentPath"] {
            assert!(methods.contains(&name), "{} missing", name);
        }
        assert!(methods.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
