//! Snapshot loading.
//!
//! The snapshot is a CSV table produced by the offline scaling step with at
//! least `name`, `artists`, `year` and the standardized feature columns listed
//! in [`FEATURE_NAMES`]. Any other columns (`id`, `popularity`, `name_lower`,
//! ...) are ignored; the lookup key is always recomputed from `name`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use csv::{ReaderBuilder, StringRecord};

use crate::models::{CatalogEntry, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Snapshot integrity failures. Any of these aborts initialization.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to open snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot: {0}")]
    Csv(#[from] csv::Error),

    #[error("Snapshot is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid value {value:?} for column '{column}' at line {line}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Non-finite value for column '{column}' at line {line}")]
    NonFinite { line: u64, column: String },
}

/// Column positions of the fields the catalog needs
#[derive(Debug)]
struct ColumnLayout {
    name: usize,
    artists: usize,
    year: usize,
    features: [usize; FEATURE_COUNT],
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self, SnapshotError> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| SnapshotError::MissingColumn(column.to_string()))
        };

        let mut features = [0; FEATURE_COUNT];
        for (slot, column) in features.iter_mut().zip(FEATURE_NAMES.iter()) {
            *slot = position(*column)?;
        }

        Ok(Self {
            name: position("name")?,
            artists: position("artists")?,
            year: position("year")?,
            features,
        })
    }
}

/// Reads and validates a snapshot file
pub fn load_snapshot(path: &Path) -> Result<Vec<CatalogEntry>, SnapshotError> {
    let start = Instant::now();

    let file = File::open(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = read_snapshot(file)?;

    if entries.is_empty() {
        tracing::warn!(path = %path.display(), "Snapshot contains no songs");
    }

    tracing::info!(
        path = %path.display(),
        rows = entries.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Snapshot loaded"
    );

    Ok(entries)
}

/// Parses snapshot rows from any reader
pub fn read_snapshot<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, SnapshotError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let layout = ColumnLayout::resolve(csv_reader.headers()?)?;

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        entries.push(parse_record(&record, &layout)?);
    }

    Ok(entries)
}

fn parse_record(record: &StringRecord, layout: &ColumnLayout) -> Result<CatalogEntry, SnapshotError> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    let field = |idx: usize| record.get(idx).unwrap_or_default();

    let year = parse_year(field(layout.year)).ok_or_else(|| SnapshotError::InvalidValue {
        line,
        column: "year".to_string(),
        value: field(layout.year).to_string(),
    })?;

    let mut values = [0.0; FEATURE_COUNT];
    for ((value, &idx), column) in values
        .iter_mut()
        .zip(layout.features.iter())
        .zip(FEATURE_NAMES.iter())
    {
        let raw = field(idx).trim();
        let parsed: f64 = raw.parse().map_err(|_| SnapshotError::InvalidValue {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })?;
        if !parsed.is_finite() {
            return Err(SnapshotError::NonFinite {
                line,
                column: column.to_string(),
            });
        }
        *value = parsed;
    }

    Ok(CatalogEntry {
        name: field(layout.name).to_string(),
        artists: field(layout.artists).to_string(),
        year,
        features: FeatureVector(values),
    })
}

/// Accepts integer years, and integral floats such as `2017.0`
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }

    let year = raw.parse::<f64>().ok()?;
    if year.fract() == 0.0 && year >= i32::MIN as f64 && year <= i32::MAX as f64 {
        Some(year as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,artists,year,danceability,energy,key,loudness,mode,speechiness,acousticness,instrumentalness,liveness,valence,tempo,name_lower";

    fn snapshot(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_reads_rows_in_order() {
        let data = snapshot(&[
            "Shape of You,['Ed Sheeran'],2017,0.1,0.2,0.3,0.4,0.5,0.6,0.7,0.8,0.9,1.0,1.1,shape of you",
            "\"Photograph\",\"['Ed Sheeran', 'Someone Else']\",2014,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,-1,photograph",
        ]);

        let entries = read_snapshot(data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Shape of You");
        assert_eq!(entries[0].year, 2017);
        assert_eq!(entries[0].features.values()[0], 0.1);
        assert_eq!(entries[0].features.values()[10], 1.1);
        assert_eq!(entries[1].artists, "['Ed Sheeran', 'Someone Else']");
        assert_eq!(entries[1].features, FeatureVector([-1.0; FEATURE_COUNT]));
    }

    #[test]
    fn test_columns_resolved_by_name() {
        let data = "tempo,valence,liveness,instrumentalness,acousticness,speechiness,mode,loudness,key,energy,danceability,year,artists,name,id\n\
                    11,10,9,8,7,6,5,4,3,2,1,1999,['Prince'],1999,abc";

        let entries = read_snapshot(data.as_bytes()).unwrap();
        assert_eq!(entries[0].name, "1999");
        assert_eq!(
            entries[0].features,
            FeatureVector([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0])
        );
    }

    #[test]
    fn test_missing_feature_column() {
        let data = "name,artists,year,danceability\nA,B,2000,0.1";
        let err = read_snapshot(data.as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingColumn(ref c) if c == "energy"));
    }

    #[test]
    fn test_non_numeric_feature() {
        let data = snapshot(&["A,B,2000,0.1,loud,0,0,0,0,0,0,0,0,0,a"]);
        let err = read_snapshot(data.as_bytes()).unwrap_err();
        match err {
            SnapshotError::InvalidValue { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "energy");
                assert_eq!(value, "loud");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_feature_value() {
        let data = snapshot(&["A,B,2000,0.1,,0,0,0,0,0,0,0,0,0,a"]);
        assert!(matches!(
            read_snapshot(data.as_bytes()),
            Err(SnapshotError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_non_finite_feature() {
        let data = snapshot(&["A,B,2000,NaN,0,0,0,0,0,0,0,0,0,0,a"]);
        assert!(matches!(
            read_snapshot(data.as_bytes()),
            Err(SnapshotError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_mismatched_column_count() {
        let data = snapshot(&["A,B,2000,0,0,0"]);
        assert!(matches!(read_snapshot(data.as_bytes()), Err(SnapshotError::Csv(_))));
    }

    #[test]
    fn test_year_formats() {
        assert_eq!(parse_year("2017"), Some(2017));
        assert_eq!(parse_year(" 2017.0 "), Some(2017));
        assert_eq!(parse_year("2017.5"), None);
        assert_eq!(parse_year("soon"), None);
    }

    #[test]
    fn test_header_only_snapshot_is_empty() {
        let entries = read_snapshot(HEADER.as_bytes()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load_snapshot(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }
}
