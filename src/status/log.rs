//! Append-only status log
//!
//! Records are length-prefixed bincode frames carrying a sequence number and
//! a checksum, appended to a single file. Opening a log replays the file
//! into an in-memory index.

use crate::model::EntityId;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Status log errors
#[derive(Error, Debug)]
pub enum StatusError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Checksum mismatch while replaying
    #[error("Status log corruption detected at offset {0}")]
    Corruption(u64),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

pub type StatusResult<T> = Result<T, StatusError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InvestigationStatus {
    #[default]
    #[serde(rename = "Not Reviewed")]
    NotReviewed,
    #[serde(rename = "Under Investigation")]
    UnderInvestigation,
    #[serde(rename = "Bad Actor")]
    BadActor,
    #[serde(rename = "Cleared")]
    Cleared,
}

impl InvestigationStatus {
    pub const ALL: [InvestigationStatus; 4] = [
        InvestigationStatus::NotReviewed,
        InvestigationStatus::UnderInvestigation,
        InvestigationStatus::BadActor,
        InvestigationStatus::Cleared,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestigationStatus::NotReviewed => "Not Reviewed",
            InvestigationStatus::UnderInvestigation => "Under Investigation",
            InvestigationStatus::BadActor => "Bad Actor",
            InvestigationStatus::Cleared => "Cleared",
        }
    }
}

impl fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestigationStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::InvalidStatus(s.to_string()))
    }
}

/// One status change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEntry {
    pub sequence: u64,
    #[serde(rename = "entity_name")]
    pub entity: EntityId,
    pub status: InvestigationStatus,
    pub timestamp: DateTime<Utc>,
}

impl StatusEntry {
    /// Ordering key for "latest": timestamp, then sequence
    fn recency(&self) -> (DateTime<Utc>, u64) {
        (self.timestamp, self.sequence)
    }
}

/// On-disk frame
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatusRecord {
    sequence: u64,
    entity: String,
    status: InvestigationStatus,
    timestamp_ms: i64,
    checksum: u32,
}

impl StatusRecord {
    fn from_entry(entry: &StatusEntry) -> Self {
        let mut record = Self {
            sequence: entry.sequence,
            entity: entry.entity.as_str().to_string(),
            status: entry.status,
            timestamp_ms: entry.timestamp.timestamp_millis(),
            checksum: 0,
        };
        record.checksum = record.calculate_checksum();
        record
    }

    fn calculate_checksum(&self) -> u32 {
        let payload = (self.sequence, &self.entity, self.status, self.timestamp_ms);
        let bytes = bincode::serialize(&payload).unwrap_or_default();
        bytes.iter().fold(0u32, |acc, &b| acc.rotate_left(5) ^ b as u32)
    }

    fn verify_checksum(&self) -> bool {
        self.checksum == self.calculate_checksum()
    }

    fn into_entry(self) -> StatusEntry {
        let timestamp = Utc
            .timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_default();
        StatusEntry {
            sequence: self.sequence,
            entity: EntityId::from(self.entity),
            status: self.status,
            timestamp,
        }
    }
}

struct LogState {
    path: Option<PathBuf>,
    writer: Option<File>,
    /// Length of the file up to the last complete record
    len: u64,
    sequence: u64,
    /// entity -> entries in append order
    history: HashMap<EntityId, Vec<StatusEntry>>,
}

/// Records read back from a log file
struct Replay {
    entries: Vec<StatusEntry>,
    /// Offset just past the last complete record
    valid_len: u64,
}

/// Append-only investigation status log
pub struct StatusLog {
    state: Mutex<LogState>,
}

impl fmt::Debug for StatusLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("StatusLog")
            .field("path", &state.path)
            .field("sequence", &state.sequence)
            .finish()
    }
}

impl StatusLog {
    /// A log that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(LogState {
                path: None,
                writer: None,
                len: 0,
                sequence: 0,
                history: HashMap::new(),
            }),
        }
    }

    /// Open (or create) a log file and replay its records
    ///
    /// A partially written record at the end of the file is cut off so new
    /// records follow the last complete one.
    pub fn open(path: impl AsRef<Path>) -> StatusResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut history: HashMap<EntityId, Vec<StatusEntry>> = HashMap::new();
        let mut sequence = 0u64;
        let mut len = 0u64;
        let mut replayed = 0usize;

        if path.exists() {
            let replay = Self::replay(&path)?;
            let file_len = std::fs::metadata(&path)?.len();
            if file_len > replay.valid_len {
                warn!(
                    valid_len = replay.valid_len,
                    file_len, "Truncating partial status record at end of log"
                );
                OpenOptions::new().write(true).open(&path)?.set_len(replay.valid_len)?;
            }
            len = replay.valid_len;

            for entry in replay.entries {
                sequence = sequence.max(entry.sequence);
                history.entry(entry.entity.clone()).or_default().push(entry);
                replayed += 1;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!("Opened status log at {:?}, {} records replayed", path, replayed);

        Ok(Self {
            state: Mutex::new(LogState {
                path: Some(path),
                writer: Some(file),
                len,
                sequence,
                history,
            }),
        })
    }

    fn replay(path: &Path) -> StatusResult<Replay> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        let mut buf = Vec::new();
        let mut offset = 0u64;

        loop {
            let mut len_bytes = [0u8; 4];
            match reader.read_exact(&mut len_bytes) {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            let len = u32::from_le_bytes(len_bytes) as usize;
            buf.resize(len, 0);
            match reader.read_exact(&mut buf) {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    // Interrupted append; everything before it is intact
                    warn!(offset, "Truncated status record at end of log; ignoring");
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            let record: StatusRecord = bincode::deserialize(&buf).map_err(|_| StatusError::Corruption(offset))?;
            if !record.verify_checksum() {
                warn!("Status log corruption detected at sequence {}", record.sequence);
                return Err(StatusError::Corruption(offset));
            }

            entries.push(record.into_entry());
            offset += 4 + len as u64;
        }

        Ok(Replay {
            entries,
            valid_len: offset,
        })
    }

    /// Record a status change stamped with the current time
    pub fn append(&self, entity: &EntityId, status: InvestigationStatus) -> StatusResult<StatusEntry> {
        self.append_at(entity, status, Utc::now())
    }

    /// Record a status change with an explicit timestamp
    ///
    /// The in-memory index only changes once the whole record is on disk. A
    /// failed write is rolled back to the previous end of the log.
    pub fn append_at(
        &self,
        entity: &EntityId,
        status: InvestigationStatus,
        timestamp: DateTime<Utc>,
    ) -> StatusResult<StatusEntry> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let entry = StatusEntry {
            sequence: state.sequence + 1,
            entity: entity.clone(),
            status,
            timestamp,
        };

        if let Some(file) = state.writer.as_mut() {
            let data = bincode::serialize(&StatusRecord::from_entry(&entry))?;
            let mut frame = Vec::with_capacity(4 + data.len());
            frame.extend_from_slice(&(data.len() as u32).to_le_bytes());
            frame.extend_from_slice(&data);

            if let Err(e) = file.write_all(&frame) {
                if let Err(rollback) = file.set_len(state.len) {
                    warn!(error = %rollback, "Could not roll back failed status append");
                }
                return Err(e.into());
            }
            state.len += frame.len() as u64;
        }

        state.sequence = entry.sequence;
        state
            .history
            .entry(entity.clone())
            .or_default()
            .push(entry.clone());
        debug!(entity = %entity, status = %status, sequence = entry.sequence, "Status appended");
        Ok(entry)
    }

    /// Current status entry of an entity
    pub fn latest(&self, entity: &EntityId) -> Option<StatusEntry> {
        let state = self.state.lock();
        state
            .history
            .get(entity)
            .and_then(|entries| entries.iter().max_by_key(|e| e.recency()))
            .cloned()
    }

    /// Current status, `NotReviewed` when the entity has no history
    pub fn current_status(&self, entity: &EntityId) -> InvestigationStatus {
        self.latest(entity).map(|e| e.status).unwrap_or_default()
    }

    /// Every change for an entity, newest first
    pub fn history(&self, entity: &EntityId) -> Vec<StatusEntry> {
        let state = self.state.lock();
        let mut entries = state.history.get(entity).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.recency().cmp(&a.recency()));
        entries
    }

    /// Current status entry of every entity with history
    pub fn all_latest(&self) -> HashMap<EntityId, StatusEntry> {
        let state = self.state.lock();
        state
            .history
            .iter()
            .filter_map(|(id, entries)| {
                entries
                    .iter()
                    .max_by_key(|e| e.recency())
                    .map(|e| (id.clone(), e.clone()))
            })
            .collect()
    }

    /// Give every entity without history a `NotReviewed` record
    pub fn initialize_defaults<'a, I>(&self, entities: I) -> StatusResult<usize>
    where
        I: IntoIterator<Item = &'a EntityId>,
    {
        let missing: Vec<EntityId> = {
            let state = self.state.lock();
            entities
                .into_iter()
                .filter(|id| !state.history.contains_key(*id))
                .cloned()
                .collect()
        };

        for id in &missing {
            self.append(id, InvestigationStatus::NotReviewed)?;
        }
        if !missing.is_empty() {
            info!(initialized = missing.len(), "Initialized default investigation statuses");
        }
        Ok(missing.len())
    }

    /// Total records
    pub fn len(&self) -> usize {
        self.state.lock().history.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
impl StatusLog {
    /// Swap the writer for a read-only handle so every append fails
    pub(crate) fn break_writer(&self) {
        let mut state = self.state.lock();
        if let Some(path) = state.path.clone() {
            state.writer = File::open(path).ok();
        }
    }
}
