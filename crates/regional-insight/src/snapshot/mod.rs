mod boundaries;
mod normalizer;
mod parser;

pub use boundaries::BoundaryCache;
pub use parser::CsvSnapshotReader;

use crate::engine::{RecordError, VillageRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid snapshot CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("snapshot must be an array of villages or an object with a `data` array")]
    Shape,
    #[error("village record {index} rejected: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: RecordError,
    },
    #[error("village id '{0}' appears more than once in the snapshot")]
    DuplicateId(String),
}

/// Immutable set of village records taken at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: String,
    captured_at: DateTime<Utc>,
    villages: Vec<VillageRecord>,
}

impl Snapshot {
    pub fn new(
        version: impl Into<String>,
        villages: Vec<VillageRecord>,
    ) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::with_capacity(villages.len());
        for village in &villages {
            if !seen.insert(village.id.as_str()) {
                return Err(SnapshotError::DuplicateId(village.id.clone()));
            }
        }

        Ok(Self {
            version: version.into(),
            captured_at: Utc::now(),
            villages,
        })
    }

    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            captured_at: Utc::now(),
            villages: Vec::new(),
        }
    }

    /// Accepts either a bare array of villages or the data service envelope `{ "data": [...] }`.
    pub fn from_json_value(
        version: impl Into<String>,
        value: Value,
    ) -> Result<Self, SnapshotError> {
        let rows = match value {
            Value::Array(rows) => rows,
            Value::Object(mut envelope) => match envelope.remove("data") {
                Some(Value::Array(rows)) => rows,
                _ => return Err(SnapshotError::Shape),
            },
            _ => return Err(SnapshotError::Shape),
        };

        let villages = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                VillageRecord::from_value(row)
                    .map_err(|source| SnapshotError::InvalidRecord { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(version, villages)
    }

    pub fn from_json_reader<R: Read>(
        version: impl Into<String>,
        reader: R,
    ) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(version, value)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn villages(&self) -> &[VillageRecord] {
        &self.villages
    }

    pub fn find(&self, id: &str) -> Option<&VillageRecord> {
        let id = id.trim();
        self.villages.iter().find(|village| village.id == id)
    }

    pub fn len(&self) -> usize {
        self.villages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.villages.is_empty()
    }
}

/// Where snapshots come from. Implementations must hand back complete snapshots or an error.
pub trait SnapshotSource: Send + Sync {
    fn list_villages(&self) -> Result<Snapshot, SnapshotError>;

    /// GeoJSON district boundaries, if the source has any.
    fn list_boundaries(&self) -> Result<Option<Value>, SnapshotError>;
}

/// Reads a snapshot export from disk. Files ending in `.csv` go through [`CsvSnapshotReader`],
/// anything else is parsed as JSON.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    villages_path: PathBuf,
    boundaries_path: Option<PathBuf>,
}

impl FileSnapshotSource {
    pub fn new(villages_path: impl Into<PathBuf>) -> Self {
        Self {
            villages_path: villages_path.into(),
            boundaries_path: None,
        }
    }

    pub fn with_boundaries(mut self, boundaries_path: impl Into<PathBuf>) -> Self {
        self.boundaries_path = Some(boundaries_path.into());
        self
    }

    fn version(&self) -> Result<String, SnapshotError> {
        let modified = std::fs::metadata(&self.villages_path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified).to_rfc3339())
    }

    fn is_csv(&self) -> bool {
        self.villages_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn list_villages(&self) -> Result<Snapshot, SnapshotError> {
        let version = self.version()?;
        let snapshot = if self.is_csv() {
            let villages = CsvSnapshotReader::from_path(&self.villages_path)?;
            Snapshot::new(version, villages)?
        } else {
            let file = std::fs::File::open(&self.villages_path)?;
            Snapshot::from_json_reader(version, std::io::BufReader::new(file))?
        };

        info!(
            path = %self.villages_path.display(),
            villages = snapshot.len(),
            version = snapshot.version(),
            "village snapshot loaded"
        );
        Ok(snapshot)
    }

    fn list_boundaries(&self) -> Result<Option<Value>, SnapshotError> {
        let Some(path) = &self.boundaries_path else {
            return Ok(None);
        };

        let file = std::fs::File::open(path)?;
        let boundaries: Value = serde_json::from_reader(std::io::BufReader::new(file))?;
        debug!(path = %path.display(), "boundary polygons read");
        Ok(Some(boundaries))
    }
}

#[derive(Debug, Clone)]
pub struct InMemorySnapshotSource {
    snapshot: Snapshot,
    boundaries: Option<Value>,
}

impl InMemorySnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            boundaries: None,
        }
    }

    pub fn with_boundaries(mut self, boundaries: Value) -> Self {
        self.boundaries = Some(boundaries);
        self
    }
}

impl SnapshotSource for InMemorySnapshotSource {
    fn list_villages(&self) -> Result<Snapshot, SnapshotError> {
        Ok(self.snapshot.clone())
    }

    fn list_boundaries(&self) -> Result<Option<Value>, SnapshotError> {
        Ok(self.boundaries.clone())
    }
}
