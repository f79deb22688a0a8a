// uiconf-widgets/src/file_manager/provider.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use uiconf_core::{ConfigError, ErrorCode, OperationError};

/// One file or directory as seen by the file manager
///
/// The path doubles as the item key; the root directory has an empty path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystemItem {
    pub path: String,
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    pub date_modified: DateTime<Utc>,
    pub has_sub_directories: bool,
    pub thumbnail: Option<String>,
}

impl FileSystemItem {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            name: name.into(),
            is_directory: true,
            size: 0,
            date_modified: DateTime::UNIX_EPOCH,
            has_sub_directories: false,
            thumbnail: None,
        }
    }

    /// Directory reference known only by path
    pub fn directory(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            ..Self::root("")
        }
    }

    pub fn key(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn parent_path(&self) -> &str {
        parent_of(&self.path)
    }

    /// Keys of every directory from the root down to this item
    pub fn path_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let mut current = String::new();
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            current = join_path(&current, segment);
            keys.push(current.clone());
        }
        keys
    }

    /// Lower-cased extension including the dot, empty for none
    pub fn extension(&self) -> String {
        extension_of(&self.name)
    }
}

pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

pub fn parent_of(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(i) if i > 0 => name[i..].to_lowercase(),
        _ => String::new(),
    }
}

/// File content handed to an upload
#[derive(Debug, Clone, PartialEq)]
pub struct FileData {
    pub name: String,
    pub content: Vec<u8>,
}

impl FileData {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Progress of a chunked upload
#[derive(Debug, Clone, Copy)]
pub struct UploadInfo<'a> {
    pub chunk_index: usize,
    pub chunk_count: usize,
    pub bytes_uploaded: u64,
    pub chunk: &'a [u8],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

/// Storage behind a file manager
#[async_trait(?Send)]
pub trait FileSystemProvider {
    async fn get_items(&self, directory: &FileSystemItem)
    -> Result<Vec<FileSystemItem>, OperationError>;

    async fn create_directory(
        &mut self,
        parent: &FileSystemItem,
        name: &str,
    ) -> Result<FileSystemItem, OperationError>;

    async fn rename_item(
        &mut self,
        item: &FileSystemItem,
        new_name: &str,
    ) -> Result<FileSystemItem, OperationError>;

    async fn move_item(
        &mut self,
        item: &FileSystemItem,
        destination: &FileSystemItem,
    ) -> Result<FileSystemItem, OperationError>;

    async fn copy_item(
        &mut self,
        item: &FileSystemItem,
        destination: &FileSystemItem,
    ) -> Result<FileSystemItem, OperationError>;

    async fn delete_item(&mut self, item: &FileSystemItem) -> Result<(), OperationError>;

    async fn upload_file_chunk(
        &mut self,
        file: &FileData,
        info: UploadInfo<'_>,
        destination: &FileSystemItem,
    ) -> Result<(), OperationError>;

    async fn abort_file_upload(
        &mut self,
        _file: &FileData,
        _destination: &FileSystemItem,
    ) -> Result<(), OperationError> {
        Ok(())
    }

    async fn download_items(
        &self,
        items: &[FileSystemItem],
    ) -> Result<Vec<DownloadedFile>, OperationError>;
}

#[derive(Debug, Clone)]
struct Entry {
    is_directory: bool,
    content: Vec<u8>,
    date_modified: DateTime<Utc>,
}

/// File tree held in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSystem {
    entries: BTreeMap<String, Entry>,
    /// Files whose upload has started but not finished
    uploading: HashSet<String>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `fileSystemProvider` option's array-of-objects form
    ///
    /// Each object has `name`, optional `isDirectory`, `size`, `content`
    /// and nested `items`.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let mut fs = Self::new();
        let items = value.as_array().ok_or_else(|| ConfigError::TypeMismatch {
            key: "fileSystemProvider".to_string(),
            expected: "array of items".to_string(),
            found: "non-array".to_string(),
        })?;
        fs.add_json_items("", items)?;
        Ok(fs)
    }

    fn add_json_items(&mut self, parent: &str, items: &[Value]) -> Result<(), ConfigError> {
        for (i, item) in items.iter().enumerate() {
            let name = item
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ConfigError::TypeMismatch {
                    key: format!("fileSystemProvider[{}].name", i),
                    expected: "string".to_string(),
                    found: "missing".to_string(),
                })?;
            let children = item.get("items").and_then(Value::as_array);
            let is_directory = item
                .get("isDirectory")
                .and_then(Value::as_bool)
                .unwrap_or(children.is_some());
            let path = join_path(parent, name);
            if is_directory {
                self.add_directory(&path);
                if let Some(children) = children {
                    self.add_json_items(&path, children)?;
                }
            } else {
                let content = match (item.get("content"), item.get("size")) {
                    (Some(Value::String(text)), _) => text.clone().into_bytes(),
                    (_, Some(size)) => vec![0; size.as_u64().unwrap_or(0) as usize],
                    _ => Vec::new(),
                };
                self.add_file(&path, content);
            }
        }
        Ok(())
    }

    /// Add a directory and any missing ancestors
    pub fn add_directory(&mut self, path: &str) {
        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = join_path(&current, segment);
            self.entries.entry(current.clone()).or_insert_with(|| Entry {
                is_directory: true,
                content: Vec::new(),
                date_modified: Utc::now(),
            });
        }
    }

    pub fn add_file(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        self.add_directory(parent_of(path));
        self.entries.insert(
            path.to_string(),
            Entry {
                is_directory: false,
                content: content.into(),
                date_modified: Utc::now(),
            },
        );
    }

    pub fn contains(&self, path: &str) -> bool {
        path.is_empty() || self.entries.contains_key(path)
    }

    pub fn content(&self, path: &str) -> Option<&[u8]> {
        self.entries
            .get(path)
            .filter(|e| !e.is_directory)
            .map(|e| e.content.as_slice())
    }

    /// All paths, sorted
    pub fn paths(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    fn item(&self, path: &str) -> Option<FileSystemItem> {
        let entry = self.entries.get(path)?;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Some(FileSystemItem {
            path: path.to_string(),
            name,
            is_directory: entry.is_directory,
            size: entry.content.len() as u64,
            date_modified: entry.date_modified,
            has_sub_directories: entry.is_directory
                && self
                    .children(path)
                    .any(|(_, child)| child.is_directory),
            thumbnail: None,
        })
    }

    fn children<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = (&'a String, &'a Entry)> + 'a {
        self.entries
            .iter()
            .filter(move |(path, _)| parent_of(path) == dir && !path.is_empty())
    }

    fn descendants(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}/", path);
        self.entries
            .keys()
            .filter(|p| p.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn require(&self, item: &FileSystemItem) -> Result<(), OperationError> {
        if self.contains(&item.path) {
            Ok(())
        } else if item.is_directory {
            Err(OperationError::from_code(ErrorCode::DirectoryNotFound))
        } else {
            Err(OperationError::from_code(ErrorCode::FileNotFound))
        }
    }

    fn require_directory(&self, dir: &FileSystemItem) -> Result<(), OperationError> {
        match self.entries.get(&dir.path) {
            _ if dir.is_root() => Ok(()),
            Some(entry) if entry.is_directory => Ok(()),
            _ => Err(OperationError::from_code(ErrorCode::DirectoryNotFound)),
        }
    }

    fn ensure_free(&self, path: &str, is_directory: bool) -> Result<(), OperationError> {
        if !self.entries.contains_key(path) {
            return Ok(());
        }
        let code = if is_directory {
            ErrorCode::DirectoryExists
        } else {
            ErrorCode::FileExists
        };
        Err(OperationError::from_code(code))
    }

    /// Copy `from` (and its subtree) to `to`, optionally removing the source
    fn relocate(&mut self, from: &str, to: &str, keep_source: bool) {
        let mut moves = vec![from.to_string()];
        moves.extend(self.descendants(from));
        for old in moves {
            let new = format!("{}{}", to, &old[from.len()..]);
            let entry = if keep_source {
                self.entries.get(&old).cloned()
            } else {
                self.entries.remove(&old)
            };
            if let Some(mut entry) = entry {
                entry.date_modified = Utc::now();
                self.entries.insert(new, entry);
            }
        }
    }

    fn transfer(
        &mut self,
        item: &FileSystemItem,
        destination: &FileSystemItem,
        keep_source: bool,
    ) -> Result<FileSystemItem, OperationError> {
        self.require(item)?;
        self.require_directory(destination)?;
        if item.is_directory
            && (destination.path == item.path
                || destination.path.starts_with(&format!("{}/", item.path)))
        {
            return Err(OperationError::new(
                ErrorCode::Unspecified,
                "A folder cannot be moved or copied into itself.",
            ));
        }
        let target = join_path(&destination.path, &item.name);
        self.ensure_free(&target, item.is_directory)?;
        self.relocate(&item.path, &target, keep_source);
        self.item(&target)
            .ok_or_else(|| OperationError::from_code(ErrorCode::Unspecified))
    }
}

#[async_trait(?Send)]
impl FileSystemProvider for InMemoryFileSystem {
    async fn get_items(
        &self,
        directory: &FileSystemItem,
    ) -> Result<Vec<FileSystemItem>, OperationError> {
        self.require_directory(directory)?;
        let mut items: Vec<FileSystemItem> = self
            .children(&directory.path)
            .filter_map(|(path, _)| self.item(path))
            .collect();
        items.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(items)
    }

    async fn create_directory(
        &mut self,
        parent: &FileSystemItem,
        name: &str,
    ) -> Result<FileSystemItem, OperationError> {
        self.require_directory(parent)?;
        let path = join_path(&parent.path, name);
        self.ensure_free(&path, true)?;
        self.add_directory(&path);
        self.item(&path)
            .ok_or_else(|| OperationError::from_code(ErrorCode::Unspecified))
    }

    async fn rename_item(
        &mut self,
        item: &FileSystemItem,
        new_name: &str,
    ) -> Result<FileSystemItem, OperationError> {
        self.require(item)?;
        let target = join_path(item.parent_path(), new_name);
        self.ensure_free(&target, item.is_directory)?;
        self.relocate(&item.path, &target, false);
        self.item(&target)
            .ok_or_else(|| OperationError::from_code(ErrorCode::Unspecified))
    }

    async fn move_item(
        &mut self,
        item: &FileSystemItem,
        destination: &FileSystemItem,
    ) -> Result<FileSystemItem, OperationError> {
        self.transfer(item, destination, false)
    }

    async fn copy_item(
        &mut self,
        item: &FileSystemItem,
        destination: &FileSystemItem,
    ) -> Result<FileSystemItem, OperationError> {
        self.transfer(item, destination, true)
    }

    async fn delete_item(&mut self, item: &FileSystemItem) -> Result<(), OperationError> {
        self.require(item)?;
        for path in self.descendants(&item.path) {
            self.entries.remove(&path);
        }
        self.entries.remove(&item.path);
        Ok(())
    }

    async fn upload_file_chunk(
        &mut self,
        file: &FileData,
        info: UploadInfo<'_>,
        destination: &FileSystemItem,
    ) -> Result<(), OperationError> {
        self.require_directory(destination)?;
        let path = join_path(&destination.path, &file.name);
        if info.chunk_index == 0 {
            self.ensure_free(&path, false)?;
            self.add_file(&path, Vec::new());
            self.uploading.insert(path.clone());
        }
        if !self.uploading.contains(&path) {
            return Err(OperationError::from_code(ErrorCode::FileNotFound));
        }
        let Some(entry) = self.entries.get_mut(&path) else {
            return Err(OperationError::from_code(ErrorCode::FileNotFound));
        };
        entry.content.extend_from_slice(info.chunk);
        entry.date_modified = Utc::now();
        if info.chunk_index + 1 >= info.chunk_count {
            self.uploading.remove(&path);
        }
        Ok(())
    }

    async fn abort_file_upload(
        &mut self,
        file: &FileData,
        destination: &FileSystemItem,
    ) -> Result<(), OperationError> {
        let path = join_path(&destination.path, &file.name);
        if self.uploading.remove(&path) {
            self.entries.remove(&path);
        }
        Ok(())
    }

    async fn download_items(
        &self,
        items: &[FileSystemItem],
    ) -> Result<Vec<DownloadedFile>, OperationError> {
        items
            .iter()
            .map(|item| {
                self.content(&item.path)
                    .map(|content| DownloadedFile {
                        name: item.name.clone(),
                        content: content.to_vec(),
                    })
                    .ok_or_else(|| OperationError::from_code(ErrorCode::FileNotFound))
            })
            .collect()
    }
}
