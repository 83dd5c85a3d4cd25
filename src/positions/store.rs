//! Durable position map persisted as pretty JSON keyed by asset id

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::types::Position;
use crate::errors::BotResult;
use crate::logger::{self, LogTag};

#[derive(Debug)]
pub struct PositionStore {
    path: PathBuf,
    positions: BTreeMap<String, Position>,
}

impl PositionStore {
    /// Empty store bound to `path`; nothing is read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            positions: BTreeMap::new(),
        }
    }

    /// Load the store from disk
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// moved aside to `<name>.corrupt` and the store starts empty.
    pub async fn load(path: impl Into<PathBuf>) -> BotResult<Self> {
        let path = path.into();
        let mut store = Self::new(path.clone());

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                logger::info(
                    LogTag::Positions,
                    &format!("No position file at {}, starting empty", path.display()),
                );
                return Ok(store);
            }
            Err(e) => {
                logger::error(
                    LogTag::Positions,
                    &format!("Cannot read position file {}: {}", path.display(), e),
                );
                quarantine(&path).await;
                return Ok(store);
            }
        };

        match serde_json::from_slice::<BTreeMap<String, Position>>(&data) {
            Ok(map) => {
                store.positions = map;
                logger::info(
                    LogTag::Positions,
                    &format!("Loaded {} open positions", store.positions.len()),
                );
            }
            Err(e) => {
                logger::error(
                    LogTag::Positions,
                    &format!("Position file {} is corrupt: {}", path.display(), e),
                );
                quarantine(&path).await;
            }
        }

        Ok(store)
    }

    /// Write the full mapping atomically (temp file + rename)
    pub async fn save(&self) -> BotResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec_pretty(&self.positions)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.path).await?;
        logger::verbose(
            LogTag::Positions,
            &format!("Saved {} positions to {}", self.positions.len(), self.path.display()),
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, asset_id: &str) -> Option<&Position> {
        self.positions.get(asset_id)
    }

    pub fn get_mut(&mut self, asset_id: &str) -> Option<&mut Position> {
        self.positions.get_mut(asset_id)
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.positions.contains_key(asset_id)
    }

    pub fn insert(&mut self, position: Position) {
        self.positions.insert(position.asset_id.clone(), position);
    }

    pub fn remove(&mut self, asset_id: &str) -> Option<Position> {
        self.positions.remove(asset_id)
    }

    pub fn asset_ids(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Owned copy for status publication
    pub fn snapshot(&self) -> Vec<Position> {
        self.positions.values().cloned().collect()
    }
}

/// Move a bad position file to `<name>.corrupt`; failures are only logged
async fn quarantine(path: &Path) {
    let aside = corrupt_path(path);
    match fs::rename(path, &aside).await {
        Ok(()) => logger::error(
            LogTag::Positions,
            &format!("Moved {} to {}, starting empty", path.display(), aside.display()),
        ),
        Err(e) => logger::error(
            LogTag::Positions,
            &format!(
                "Could not move {} aside ({}), starting empty",
                path.display(),
                e
            ),
        ),
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".corrupt");
    path.with_file_name(name)
}
