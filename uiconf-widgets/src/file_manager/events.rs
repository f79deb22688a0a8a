// uiconf-widgets/src/file_manager/events.rs
use uiconf_core::{
    ActionEvent, ActionInfo, Cancel, ComponentRef, ErrorCode, EventDescriptor, OperationError,
    WidgetEvent,
};

use super::items::{FileManagerMenuItem, FileManagerToolbarItem, ViewArea};
use super::provider::{FileData, FileSystemItem};

macro_rules! events {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(impl WidgetEvent for $ty {
            const NAME: &'static str = $name;
        })+
    };
}

macro_rules! action_events {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl WidgetEvent for $ty {
                const NAME: &'static str = $name;
            }

            impl ActionEvent for $ty {
                fn cancel_mut(&mut self) -> &mut Cancel {
                    &mut self.info.cancel
                }

                fn error(&self) -> Option<OperationError> {
                    self.info.error()
                }
            }
        )+
    };
}

#[derive(Debug, Clone)]
pub struct ContextMenuItemClickEvent {
    pub component: ComponentRef,
    pub item_data: FileManagerMenuItem,
    pub file_system_item: Option<FileSystemItem>,
    pub view_area: ViewArea,
}

#[derive(Debug, Clone)]
pub struct ContextMenuShowingEvent {
    pub component: ComponentRef,
    pub file_system_item: Option<FileSystemItem>,
    pub view_area: ViewArea,
    pub cancel: bool,
}

#[derive(Debug, Clone)]
pub struct CurrentDirectoryChangedEvent {
    pub component: ComponentRef,
    pub directory: FileSystemItem,
}

/// Any failed operation; handlers may rewrite `error_text`
#[derive(Debug, Clone)]
pub struct ErrorOccurredEvent {
    pub component: ComponentRef,
    pub error_code: ErrorCode,
    pub error_text: String,
    pub file_system_item: Option<FileSystemItem>,
}

#[derive(Debug, Clone)]
pub struct FocusedItemChangedEvent {
    pub component: ComponentRef,
    pub item: Option<FileSystemItem>,
    pub item_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SelectedFileOpenedEvent {
    pub component: ComponentRef,
    pub file: FileSystemItem,
}

#[derive(Debug, Clone)]
pub struct SelectionChangedEvent {
    pub component: ComponentRef,
    pub current_selected_item_keys: Vec<String>,
    pub current_deselected_item_keys: Vec<String>,
    pub selected_items: Vec<FileSystemItem>,
    pub selected_item_keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ToolbarItemClickEvent {
    pub component: ComponentRef,
    pub item_data: FileManagerToolbarItem,
}

#[derive(Debug)]
pub struct DirectoryCreatingEvent {
    pub component: ComponentRef,
    pub parent_directory: FileSystemItem,
    pub name: String,
    pub info: ActionInfo,
}

#[derive(Debug, Clone)]
pub struct DirectoryCreatedEvent {
    pub component: ComponentRef,
    pub parent_directory: FileSystemItem,
    pub name: String,
}

#[derive(Debug)]
pub struct ItemRenamingEvent {
    pub component: ComponentRef,
    pub item: FileSystemItem,
    pub new_name: String,
    pub info: ActionInfo,
}

#[derive(Debug, Clone)]
pub struct ItemRenamedEvent {
    pub component: ComponentRef,
    pub source_item: FileSystemItem,
    pub item_name: String,
}

#[derive(Debug)]
pub struct ItemMovingEvent {
    pub component: ComponentRef,
    pub item: FileSystemItem,
    pub destination_directory: FileSystemItem,
    pub info: ActionInfo,
}

#[derive(Debug, Clone)]
pub struct ItemMovedEvent {
    pub component: ComponentRef,
    pub source_item: FileSystemItem,
    pub parent_directory: FileSystemItem,
    pub item_name: String,
    pub item_path: String,
}

#[derive(Debug)]
pub struct ItemCopyingEvent {
    pub component: ComponentRef,
    pub item: FileSystemItem,
    pub destination_directory: FileSystemItem,
    pub info: ActionInfo,
}

#[derive(Debug, Clone)]
pub struct ItemCopiedEvent {
    pub component: ComponentRef,
    pub source_item: FileSystemItem,
    pub parent_directory: FileSystemItem,
    pub item_name: String,
    pub item_path: String,
}

#[derive(Debug)]
pub struct ItemDeletingEvent {
    pub component: ComponentRef,
    pub item: FileSystemItem,
    pub info: ActionInfo,
}

#[derive(Debug, Clone)]
pub struct ItemDeletedEvent {
    pub component: ComponentRef,
    pub item: FileSystemItem,
}

#[derive(Debug)]
pub struct FileUploadingEvent {
    pub component: ComponentRef,
    pub file_data: FileData,
    pub destination_directory: FileSystemItem,
    pub info: ActionInfo,
}

#[derive(Debug, Clone)]
pub struct FileUploadedEvent {
    pub component: ComponentRef,
    pub file_data: FileData,
    pub parent_directory: FileSystemItem,
}

#[derive(Debug)]
pub struct ItemDownloadingEvent {
    pub component: ComponentRef,
    pub item: FileSystemItem,
    pub info: ActionInfo,
}

events! {
    ContextMenuItemClickEvent => "contextMenuItemClick",
    ContextMenuShowingEvent => "contextMenuShowing",
    CurrentDirectoryChangedEvent => "currentDirectoryChanged",
    ErrorOccurredEvent => "errorOccurred",
    FocusedItemChangedEvent => "focusedItemChanged",
    SelectedFileOpenedEvent => "selectedFileOpened",
    SelectionChangedEvent => "selectionChanged",
    ToolbarItemClickEvent => "toolbarItemClick",
    DirectoryCreatedEvent => "directoryCreated",
    ItemRenamedEvent => "itemRenamed",
    ItemMovedEvent => "itemMoved",
    ItemCopiedEvent => "itemCopied",
    ItemDeletedEvent => "itemDeleted",
    FileUploadedEvent => "fileUploaded",
}

action_events! {
    DirectoryCreatingEvent => "directoryCreating",
    ItemRenamingEvent => "itemRenaming",
    ItemMovingEvent => "itemMoving",
    ItemCopyingEvent => "itemCopying",
    ItemDeletingEvent => "itemDeleting",
    FileUploadingEvent => "fileUploading",
    ItemDownloadingEvent => "itemDownloading",
}

pub(crate) const EVENTS: &[EventDescriptor] = &[
    EventDescriptor::notify("contentReady"),
    EventDescriptor::notify("disposing"),
    EventDescriptor::notify("initialized"),
    EventDescriptor::notify("optionChanged"),
    EventDescriptor::notify("contextMenuItemClick"),
    EventDescriptor::cancelable("contextMenuShowing"),
    EventDescriptor::notify("currentDirectoryChanged"),
    EventDescriptor::notify("errorOccurred"),
    EventDescriptor::notify("focusedItemChanged"),
    EventDescriptor::notify("selectedFileOpened"),
    EventDescriptor::notify("selectionChanged"),
    EventDescriptor::notify("toolbarItemClick"),
    EventDescriptor::action("directoryCreating", "directoryCreated"),
    EventDescriptor::notify("directoryCreated"),
    EventDescriptor::action("itemRenaming", "itemRenamed"),
    EventDescriptor::notify("itemRenamed"),
    EventDescriptor::action("itemMoving", "itemMoved"),
    EventDescriptor::notify("itemMoved"),
    EventDescriptor::action("itemCopying", "itemCopied"),
    EventDescriptor::notify("itemCopied"),
    EventDescriptor::action("itemDeleting", "itemDeleted"),
    EventDescriptor::notify("itemDeleted"),
    EventDescriptor::action("fileUploading", "fileUploaded"),
    EventDescriptor::notify("fileUploaded"),
    EventDescriptor::deferred("itemDownloading"),
];
