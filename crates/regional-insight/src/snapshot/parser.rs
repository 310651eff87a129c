use super::normalizer::normalize_header;
use super::SnapshotError;
use crate::engine::VillageRecord;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// Ingests flat CSV exports. A dotted header such as `disease.infectious_cases` becomes a nested
/// field; empty cells are left out so they read as absent.
pub struct CsvSnapshotReader;

impl CsvSnapshotReader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<VillageRecord>, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<VillageRecord>, SnapshotError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<Vec<String>> = csv_reader
            .headers()?
            .iter()
            .map(|header| {
                normalize_header(header)
                    .split('.')
                    .map(str::to_string)
                    .collect()
            })
            .collect();

        let mut villages = Vec::new();
        for (index, row) in csv_reader.records().enumerate() {
            let row = row?;
            let mut fields = Map::new();
            for (path, cell) in headers.iter().zip(row.iter()) {
                if cell.is_empty() || path.iter().any(String::is_empty) {
                    continue;
                }
                insert_path(&mut fields, path, Value::String(cell.to_string()));
            }

            let village = VillageRecord::from_value(Value::Object(fields))
                .map_err(|source| SnapshotError::InvalidRecord { index, source })?;
            villages.push(village);
        }

        Ok(villages)
    }
}

fn insert_path(fields: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut cursor = fields;
    for segment in parents {
        let entry = cursor
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        cursor = next;
    }
    cursor.insert(last.clone(), value);
}
