// uiconf-widgets/src/file_manager/commands.rs
use serde_json::json;
use uiconf_core::{OperationError, Widget};

use super::items::{context_menu_text, toolbar_text};
use super::{
    ContextMenuItemClickEvent, ContextMenuItemName, ContextMenuShowingEvent, DetailsColumn,
    FileManager, FileManagerMenuItem, FileManagerToolbarItem, FileSystemItem, ItemViewMode,
    ToolbarItemClickEvent, ToolbarItemName, ViewArea,
};
use crate::common::format_bytes;

fn is_separator(item: &FileManagerToolbarItem) -> bool {
    item.builtin() == Some(ToolbarItemName::Separator)
}

/// Drop leading, trailing and doubled separators left by hidden items
fn drop_stray_separators(items: Vec<FileManagerToolbarItem>) -> Vec<FileManagerToolbarItem> {
    let mut out: Vec<FileManagerToolbarItem> = Vec::with_capacity(items.len());
    for item in items {
        if is_separator(&item) && out.last().is_none_or(is_separator) {
            continue;
        }
        out.push(item);
    }
    if out.last().is_some_and(is_separator) {
        out.pop();
    }
    out
}

impl FileManager {
    /// Toolbar after permission and selection rules are applied
    ///
    /// `toolbar.fileSelectionItems` replaces `toolbar.items` while anything
    /// is selected.
    pub fn toolbar_items(&self) -> Vec<FileManagerToolbarItem> {
        let source = if self.selected_keys.is_empty() {
            &self.settings.toolbar.items
        } else {
            &self.settings.toolbar.file_selection_items
        };
        let selected = self.get_selected_items();
        let visible = source
            .iter()
            .filter(|item| item.visible != Some(false))
            .filter(|item| match item.builtin() {
                Some(name) => self.toolbar_command_available(name, &selected),
                None => true,
            })
            .cloned()
            .map(|mut item| {
                if item.text.is_none() {
                    item.text = item.builtin().and_then(toolbar_text).map(str::to_string);
                }
                item.visible = Some(true);
                item
            })
            .collect();
        drop_stray_separators(visible)
    }

    fn toolbar_command_available(&self, name: ToolbarItemName, selected: &[FileSystemItem]) -> bool {
        let permissions = &self.settings.permissions;
        let any = !selected.is_empty();
        match name {
            ToolbarItemName::ShowNavPane
            | ToolbarItemName::Refresh
            | ToolbarItemName::SwitchView
            | ToolbarItemName::Separator => true,
            ToolbarItemName::Create => permissions.create,
            ToolbarItemName::Upload => permissions.upload,
            ToolbarItemName::Download => {
                permissions.download && any && selected.iter().all(|i| !i.is_directory)
            }
            ToolbarItemName::Move => permissions.move_ && any,
            ToolbarItemName::Copy => permissions.copy && any,
            ToolbarItemName::Rename => permissions.rename && selected.len() == 1,
            ToolbarItemName::Delete => permissions.delete && any,
            ToolbarItemName::ClearSelection => any,
        }
    }

    /// Context menu for `target`, or for the current directory when `None`
    ///
    /// A target that is part of the selection stands for the whole selection.
    pub fn context_menu_items(&self, target: Option<&FileSystemItem>) -> Vec<FileManagerMenuItem> {
        let targets = self.menu_targets(target);
        self.resolve_menu(&self.settings.context_menu.items, &targets)
    }

    fn menu_targets(&self, target: Option<&FileSystemItem>) -> Vec<FileSystemItem> {
        match target {
            Some(item) if self.selected_keys.iter().any(|k| k == item.key()) => {
                self.get_selected_items()
            }
            Some(item) => vec![item.clone()],
            None => Vec::new(),
        }
    }

    fn resolve_menu(
        &self,
        items: &[FileManagerMenuItem],
        targets: &[FileSystemItem],
    ) -> Vec<FileManagerMenuItem> {
        items
            .iter()
            .filter(|item| item.visible != Some(false))
            .filter(|item| match item.builtin() {
                Some(name) => self.menu_command_available(name, targets),
                None => true,
            })
            .map(|item| {
                let mut resolved = item.clone();
                if resolved.text.is_none() {
                    resolved.text = item.builtin().map(|name| context_menu_text(name).to_string());
                }
                resolved.visible = Some(true);
                resolved.items = self.resolve_menu(&item.items, targets);
                resolved
            })
            .collect()
    }

    fn menu_command_available(&self, name: ContextMenuItemName, targets: &[FileSystemItem]) -> bool {
        let permissions = &self.settings.permissions;
        let any = !targets.is_empty();
        let directories_only = targets.iter().all(|t| t.is_directory);
        match name {
            ContextMenuItemName::Create => permissions.create && directories_only,
            ContextMenuItemName::Upload => permissions.upload && directories_only,
            ContextMenuItemName::Refresh => true,
            ContextMenuItemName::Download => {
                permissions.download && any && targets.iter().all(|t| !t.is_directory)
            }
            ContextMenuItemName::Move => permissions.move_ && any,
            ContextMenuItemName::Copy => permissions.copy && any,
            ContextMenuItemName::Rename => permissions.rename && targets.len() == 1,
            ContextMenuItemName::Delete => permissions.delete && any,
        }
    }

    /// Raise `contextMenuShowing`; `None` when cancelled or nothing to show
    pub fn show_context_menu(
        &mut self,
        target_key: Option<&str>,
        view_area: ViewArea,
    ) -> Option<Vec<FileManagerMenuItem>> {
        let target = target_key.and_then(|key| self.item(key)).cloned();
        let event = self.dispatcher.notify(ContextMenuShowingEvent {
            component: self.component(),
            file_system_item: target.clone(),
            view_area,
            cancel: false,
        });
        if event.cancel {
            return None;
        }
        Some(self.context_menu_items(target.as_ref())).filter(|items| !items.is_empty())
    }

    /// Click a visible toolbar item by name
    ///
    /// Commands that need a dialog (create, upload, move, copy, rename,
    /// download) only raise `toolbarItemClick`. Returns `false` when no such
    /// enabled item is shown.
    pub async fn click_toolbar_item(&mut self, name: &str) -> Result<bool, OperationError> {
        let Some(item) = self
            .toolbar_items()
            .into_iter()
            .find(|item| item.name.as_ref().is_some_and(|n| n.as_str() == name))
        else {
            return Ok(false);
        };
        if item.disabled {
            return Ok(false);
        }

        let command = item.builtin();
        let component = self.component();
        self.dispatcher.notify(ToolbarItemClickEvent {
            component,
            item_data: item,
        });
        match command {
            Some(ToolbarItemName::Refresh) => {
                self.refresh().await?;
            }
            Some(ToolbarItemName::ClearSelection) => self.clear_selection(),
            Some(ToolbarItemName::SwitchView) => self.switch_view(),
            Some(ToolbarItemName::ShowNavPane) => self.nav_pane_visible = !self.nav_pane_visible,
            Some(ToolbarItemName::Delete) => {
                let keys = self.selected_keys.clone();
                self.delete_items(&keys).await?;
            }
            _ => {}
        }
        Ok(true)
    }

    /// Click a context menu entry (searched through submenus)
    pub async fn click_context_menu_item(
        &mut self,
        name: &str,
        target_key: Option<&str>,
        view_area: ViewArea,
    ) -> Result<bool, OperationError> {
        let target = target_key.and_then(|key| self.item(key)).cloned();
        let found = self
            .context_menu_items(target.as_ref())
            .iter()
            .find_map(|item| item.find(name).cloned());
        let Some(item) = found else {
            return Ok(false);
        };
        if item.disabled {
            return Ok(false);
        }

        let command = item.builtin();
        let component = self.component();
        self.dispatcher.notify(ContextMenuItemClickEvent {
            component,
            item_data: item,
            file_system_item: target.clone(),
            view_area,
        });
        match command {
            Some(ContextMenuItemName::Refresh) => {
                self.refresh().await?;
            }
            Some(ContextMenuItemName::Delete) => {
                let keys: Vec<String> = self
                    .menu_targets(target.as_ref())
                    .into_iter()
                    .map(|item| item.path)
                    .collect();
                self.delete_items(&keys).await?;
            }
            _ => {}
        }
        Ok(true)
    }

    /// Flip `itemView.mode` between details and thumbnails
    pub fn switch_view(&mut self) {
        let next = match self.settings.item_view.mode {
            ItemViewMode::Details => ItemViewMode::Thumbnails,
            ItemViewMode::Thumbnails => ItemViewMode::Details,
        };
        if let Err(err) = self.set_option("itemView.mode", json!(next.name())) {
            log::warn!("{}: cannot switch view: {}", self.instance(), err);
        }
    }

    /// Columns of the details view with default captions and the customize hook applied
    pub fn detail_columns(&self) -> Vec<DetailsColumn> {
        let columns = self
            .settings
            .item_view
            .details
            .columns
            .iter()
            .cloned()
            .map(|mut column| {
                if column.caption.is_none() {
                    column.caption = column
                        .data_field
                        .as_deref()
                        .and_then(DetailsColumn::default_caption)
                        .map(str::to_string);
                }
                column
            })
            .collect();
        match &self.customize_detail_columns {
            Some(customize) => customize(columns),
            None => columns,
        }
    }

    pub fn thumbnail_for(&self, item: &FileSystemItem) -> String {
        if let Some(customize) = &self.customize_thumbnail {
            return customize(item);
        }
        if let Some(thumbnail) = &item.thumbnail {
            return thumbnail.clone();
        }
        if item.is_directory {
            return "folder".to_string();
        }
        match item.extension().as_str() {
            ".png" | ".jpg" | ".jpeg" | ".gif" | ".svg" | ".bmp" => "image",
            ".txt" | ".md" | ".doc" | ".docx" | ".pdf" | ".rtf" => "doc",
            _ => "file",
        }
        .to_string()
    }

    /// Text of the size column; empty for directories
    pub fn size_text(&self, item: &FileSystemItem) -> String {
        if item.is_directory {
            String::new()
        } else {
            format_bytes(item.size)
        }
    }
}
