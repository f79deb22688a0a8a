// uiconf-widgets/src/file_manager/actions.rs
use uiconf_core::{
    ActionEvent, ActionInfo, ActionOutcome, Decision, ErrorCode, OperationError, confirm,
};

use super::{
    DirectoryCreatedEvent, DirectoryCreatingEvent, DownloadedFile, FileData, FileManager,
    FileSystemItem, FileUploadedEvent, FileUploadingEvent, ItemCopiedEvent, ItemCopyingEvent,
    ItemDeletedEvent, ItemDeletingEvent, ItemDownloadingEvent, ItemMovedEvent, ItemMovingEvent,
    ItemRenamedEvent, ItemRenamingEvent, ItemResult, UploadInfo,
};
use crate::common::format_bytes;

const INVALID_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    Move,
    Copy,
}

impl Transfer {
    fn action(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Copy => "copy",
        }
    }
}

fn validate_name(name: &str) -> Result<(), OperationError> {
    if name.trim().is_empty() || name.contains(INVALID_NAME_CHARS) {
        return Err(OperationError::from_code(ErrorCode::InvalidSymbols));
    }
    Ok(())
}

impl FileManager {
    /// Create a directory inside the current one
    pub async fn create_directory(&mut self, name: &str) -> ItemResult<FileSystemItem> {
        self.check_permission(self.settings.permissions.create, "create")?;
        let parent = self.current_dir.clone();
        if let Err(err) = validate_name(name) {
            return Err(self.report_error(err, Some(parent)));
        }

        let mut event = DirectoryCreatingEvent {
            component: self.component(),
            parent_directory: parent.clone(),
            name: name.to_string(),
            info: ActionInfo::default(),
        };
        if !self.confirm_action(&mut event, Some(&parent)).await? {
            return Ok(ActionOutcome::Cancelled);
        }

        let created = self.provider.create_directory(&parent, name).await;
        let created = match created {
            Ok(created) => created,
            Err(err) => return Err(self.report_error(err, Some(parent))),
        };
        let component = self.component();
        self.dispatcher.notify(DirectoryCreatedEvent {
            component,
            parent_directory: parent,
            name: name.to_string(),
        });
        self.notify_panel(format!("Directory '{}' created", name), true);
        self.reload().await;
        Ok(ActionOutcome::Completed(created))
    }

    pub async fn rename_item(&mut self, key: &str, new_name: &str) -> ItemResult<FileSystemItem> {
        self.check_permission(self.settings.permissions.rename, "rename")?;
        let item = self.find_item(key)?;
        if let Err(err) = validate_name(new_name) {
            return Err(self.report_error(err, Some(item)));
        }
        if !item.is_directory && !self.settings.extension_allowed(new_name) {
            let err = OperationError::from_code(ErrorCode::WrongFileExtension);
            return Err(self.report_error(err, Some(item)));
        }

        let mut event = ItemRenamingEvent {
            component: self.component(),
            item: item.clone(),
            new_name: new_name.to_string(),
            info: ActionInfo::default(),
        };
        if !self.confirm_action(&mut event, Some(&item)).await? {
            return Ok(ActionOutcome::Cancelled);
        }

        let renamed = self.provider.rename_item(&item, new_name).await;
        let renamed = match renamed {
            Ok(renamed) => renamed,
            Err(err) => return Err(self.report_error(err, Some(item))),
        };
        let component = self.component();
        self.dispatcher.notify(ItemRenamedEvent {
            component,
            source_item: item,
            item_name: new_name.to_string(),
        });
        self.notify_panel(format!("Item renamed to '{}'", new_name), true);
        self.reload().await;
        Ok(ActionOutcome::Completed(renamed))
    }

    /// Move listed items into `destination`; one event pair per item
    pub async fn move_items<K: AsRef<str>>(
        &mut self,
        keys: &[K],
        destination: &str,
    ) -> Result<Vec<ItemResult<FileSystemItem>>, OperationError> {
        self.transfer_items(keys, destination, Transfer::Move).await
    }

    /// Copy listed items into `destination`; one event pair per item
    pub async fn copy_items<K: AsRef<str>>(
        &mut self,
        keys: &[K],
        destination: &str,
    ) -> Result<Vec<ItemResult<FileSystemItem>>, OperationError> {
        self.transfer_items(keys, destination, Transfer::Copy).await
    }

    pub async fn delete_items<K: AsRef<str>>(
        &mut self,
        keys: &[K],
    ) -> Result<Vec<ItemResult<FileSystemItem>>, OperationError> {
        self.check_permission(self.settings.permissions.delete, "delete")?;
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(self.delete_item(key.as_ref()).await);
        }
        self.reload().await;
        Ok(results)
    }

    /// Upload a file into the current directory in `upload.chunkSize` chunks
    pub async fn upload_file(&mut self, file: FileData) -> ItemResult<FileSystemItem> {
        self.check_permission(self.settings.permissions.upload, "upload")?;
        let destination = self.current_dir.clone();
        if !self.settings.extension_allowed(&file.name) {
            let err = OperationError::from_code(ErrorCode::WrongFileExtension);
            return Err(self.report_error(err, None));
        }
        let max_size = self.settings.upload.max_file_size;
        if max_size > 0.0 && file.size() as f64 > max_size {
            let err = OperationError::new(
                ErrorCode::MaxFileSizeExceeded,
                format!(
                    "File size exceeds the maximum allowed size ({}).",
                    format_bytes(max_size as u64)
                ),
            );
            return Err(self.report_error(err, None));
        }

        let mut event = FileUploadingEvent {
            component: self.component(),
            file_data: file.clone(),
            destination_directory: destination.clone(),
            info: ActionInfo::default(),
        };
        if !self.confirm_action(&mut event, Some(&destination)).await? {
            return Ok(ActionOutcome::Cancelled);
        }

        let chunk_size = self.settings.upload.chunk_size as usize;
        let chunks: Vec<&[u8]> = if chunk_size == 0 || file.content.is_empty() {
            vec![file.content.as_slice()]
        } else {
            file.content.chunks(chunk_size).collect()
        };
        let chunk_count = chunks.len();
        let mut bytes_uploaded = 0u64;
        for (chunk_index, chunk) in chunks.into_iter().enumerate() {
            let info = UploadInfo {
                chunk_index,
                chunk_count,
                bytes_uploaded,
                chunk,
            };
            let sent = self.provider.upload_file_chunk(&file, info, &destination).await;
            if let Err(err) = sent {
                let aborted = self.provider.abort_file_upload(&file, &destination).await;
                if let Err(abort_err) = aborted {
                    log::warn!("aborting upload of '{}' failed: {}", file.name, abort_err);
                }
                return Err(self.report_error(err, Some(destination)));
            }
            bytes_uploaded += chunk.len() as u64;
        }
        log::debug!("uploaded '{}' in {} chunk(s)", file.name, chunk_count);

        let name = file.name.clone();
        let component = self.component();
        self.dispatcher.notify(FileUploadedEvent {
            component,
            file_data: file,
            parent_directory: destination,
        });
        self.notify_panel(format!("File '{}' uploaded", name), true);
        self.reload().await;
        match self.items.iter().find(|item| item.name == name) {
            Some(item) => Ok(ActionOutcome::Completed(item.clone())),
            None => Err(OperationError::from_code(ErrorCode::FileNotFound)),
        }
    }

    /// Download listed files; each one may be cancelled at `itemDownloading`
    pub async fn download_items<K: AsRef<str>>(
        &mut self,
        keys: &[K],
    ) -> Result<Vec<DownloadedFile>, OperationError> {
        self.check_permission(self.settings.permissions.download, "download")?;
        let mut accepted = Vec::with_capacity(keys.len());
        for key in keys {
            let item = self.find_item(key.as_ref())?;
            if item.is_directory {
                log::debug!("skipping directory '{}' in download", item.path);
                continue;
            }
            let mut event = ItemDownloadingEvent {
                component: self.component(),
                item: item.clone(),
                info: ActionInfo::default(),
            };
            if self.confirm_action(&mut event, Some(&item)).await? {
                accepted.push(item);
            }
        }
        if accepted.is_empty() {
            return Ok(Vec::new());
        }

        let downloaded = self.provider.download_items(&accepted).await;
        downloaded.map_err(|err| self.report_error(err, None))
    }

    async fn transfer_items<K: AsRef<str>>(
        &mut self,
        keys: &[K],
        destination: &str,
        mode: Transfer,
    ) -> Result<Vec<ItemResult<FileSystemItem>>, OperationError> {
        let allowed = match mode {
            Transfer::Move => self.settings.permissions.move_,
            Transfer::Copy => self.settings.permissions.copy,
        };
        self.check_permission(allowed, mode.action())?;
        let resolved = self.resolve_directory(destination.trim_matches('/')).await;
        let destination = match resolved {
            Ok(directory) => directory,
            Err(err) => return Err(self.report_error(err, None)),
        };

        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(self.transfer_item(key.as_ref(), &destination, mode).await);
        }
        self.reload().await;
        Ok(results)
    }

    async fn transfer_item(
        &mut self,
        key: &str,
        destination: &FileSystemItem,
        mode: Transfer,
    ) -> ItemResult<FileSystemItem> {
        let item = self.find_item(key)?;
        let component = self.component();
        let proceed = match mode {
            Transfer::Move => {
                let mut event = ItemMovingEvent {
                    component: component.clone(),
                    item: item.clone(),
                    destination_directory: destination.clone(),
                    info: ActionInfo::default(),
                };
                self.confirm_action(&mut event, Some(&item)).await?
            }
            Transfer::Copy => {
                let mut event = ItemCopyingEvent {
                    component: component.clone(),
                    item: item.clone(),
                    destination_directory: destination.clone(),
                    info: ActionInfo::default(),
                };
                self.confirm_action(&mut event, Some(&item)).await?
            }
        };
        if !proceed {
            return Ok(ActionOutcome::Cancelled);
        }

        let result = match mode {
            Transfer::Move => self.provider.move_item(&item, destination).await,
            Transfer::Copy => self.provider.copy_item(&item, destination).await,
        };
        let target = match result {
            Ok(target) => target,
            Err(err) => return Err(self.report_error(err, Some(item))),
        };
        match mode {
            Transfer::Move => {
                self.dispatcher.notify(ItemMovedEvent {
                    component,
                    source_item: item,
                    parent_directory: destination.clone(),
                    item_name: target.name.clone(),
                    item_path: target.path.clone(),
                });
            }
            Transfer::Copy => {
                self.dispatcher.notify(ItemCopiedEvent {
                    component,
                    source_item: item,
                    parent_directory: destination.clone(),
                    item_name: target.name.clone(),
                    item_path: target.path.clone(),
                });
            }
        }
        let verb = match mode {
            Transfer::Move => "moved",
            Transfer::Copy => "copied",
        };
        self.notify_panel(format!("Item '{}' {}", target.name, verb), true);
        Ok(ActionOutcome::Completed(target))
    }

    async fn delete_item(&mut self, key: &str) -> ItemResult<FileSystemItem> {
        let item = self.find_item(key)?;
        let mut event = ItemDeletingEvent {
            component: self.component(),
            item: item.clone(),
            info: ActionInfo::default(),
        };
        if !self.confirm_action(&mut event, Some(&item)).await? {
            return Ok(ActionOutcome::Cancelled);
        }

        let deleted = self.provider.delete_item(&item).await;
        if let Err(err) = deleted {
            return Err(self.report_error(err, Some(item)));
        }
        let component = self.component();
        self.dispatcher.notify(ItemDeletedEvent {
            component,
            item: item.clone(),
        });
        self.notify_panel(format!("Item '{}' deleted", item.name), true);
        Ok(ActionOutcome::Completed(item))
    }

    fn check_permission(&mut self, allowed: bool, action: &str) -> Result<(), OperationError> {
        if allowed {
            return Ok(());
        }
        Err(self.report_error(OperationError::no_access(action), None))
    }

    /// Run the "-ing" phase; `Ok(false)` means a handler cancelled
    async fn confirm_action<E: ActionEvent>(
        &mut self,
        event: &mut E,
        item: Option<&FileSystemItem>,
    ) -> Result<bool, OperationError> {
        let decision = confirm(&mut self.dispatcher, event).await;
        match decision {
            Decision::Proceed => Ok(true),
            Decision::Cancelled => Ok(false),
            Decision::Failed(err) => Err(self.report_error(err, item.cloned())),
        }
    }
}
