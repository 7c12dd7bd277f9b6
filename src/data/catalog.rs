//! Dataset selection: a fixed catalog of property segments, or a
//! caller-supplied upload.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use super::RecordTable;
use crate::error::AppError;

/// Property segments with a bundled sample dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Residential,
    Mdu,
    Commercial,
    AllCombined,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::Residential,
        Segment::Mdu,
        Segment::Commercial,
        Segment::AllCombined,
    ];

    /// Display label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Segment::Residential => "Residential",
            Segment::Mdu => "MDU",
            Segment::Commercial => "Commercial",
            Segment::AllCombined => "All Combined",
        }
    }

    /// Short key used in config files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Segment::Residential => "residential",
            Segment::Mdu => "mdu",
            Segment::Commercial => "commercial",
            Segment::AllCombined => "all",
        }
    }

    /// Default file name under the data directory.
    pub fn default_file(self) -> &'static str {
        match self {
            Segment::Residential => "sample_residential.csv",
            Segment::Mdu => "sample_mdu.csv",
            Segment::Commercial => "sample_commercial.csv",
            Segment::AllCombined => "sample_all_properties.csv",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Segment {
    type Err = AppError;

    /// Accepts either the key or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Segment::ALL
            .into_iter()
            .find(|seg| seg.key().eq_ignore_ascii_case(wanted) || seg.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::InvalidParameters(format!("unknown segment: '{s}'")))
    }
}

/// Where the working table comes from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    Segment(Segment),
    /// Custom data was requested. `None` means the user asked for an upload
    /// but did not provide one.
    Upload(Option<Vec<u8>>),
}

/// Segment → CSV path mapping.
#[derive(Debug, Clone)]
pub struct Catalog {
    paths: BTreeMap<Segment, PathBuf>,
}

impl Catalog {
    /// Every segment mapped to its default file under `data_dir`, with
    /// `overrides` replacing individual entries.
    pub fn new(data_dir: &Path, overrides: &BTreeMap<Segment, PathBuf>) -> Self {
        let paths = Segment::ALL
            .into_iter()
            .map(|seg| {
                let path = match overrides.get(&seg) {
                    Some(p) if p.is_absolute() => p.clone(),
                    Some(p) => data_dir.join(p),
                    None => data_dir.join(seg.default_file()),
                };
                (seg, path)
            })
            .collect();
        Self { paths }
    }

    pub fn path(&self, segment: Segment) -> &Path {
        // Constructed with every segment present.
        &self.paths[&segment]
    }

    /// Resolve the working table. A requested-but-absent upload is a
    /// [`AppError::MissingInput`]; the caller must stop there.
    pub fn select(&self, source: DatasetSource) -> Result<RecordTable, AppError> {
        match source {
            DatasetSource::Segment(seg) => {
                let path = self.path(seg);
                info!(segment = %seg, path = %path.display(), "loading catalog dataset");
                super::csv::read_path(path)
            }
            DatasetSource::Upload(Some(bytes)) => {
                info!(bytes = bytes.len(), "parsing uploaded dataset");
                super::csv::parse(&bytes)
            }
            DatasetSource::Upload(None) => Err(AppError::MissingInput(
                "please upload a CSV file to proceed".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn segment_parses_key_and_label() {
        assert_eq!("mdu".parse::<Segment>().unwrap(), Segment::Mdu);
        assert_eq!("All Combined".parse::<Segment>().unwrap(), Segment::AllCombined);
        assert_eq!("RESIDENTIAL".parse::<Segment>().unwrap(), Segment::Residential);
        assert!("rural".parse::<Segment>().is_err());
    }

    #[test]
    fn catalog_defaults_under_data_dir() {
        let cat = Catalog::new(Path::new("/srv/data"), &BTreeMap::new());
        assert_eq!(cat.path(Segment::Commercial), Path::new("/srv/data/sample_commercial.csv"));
    }

    #[test]
    fn catalog_overrides_apply() {
        let mut overrides = BTreeMap::new();
        overrides.insert(Segment::Mdu, PathBuf::from("custom/mdu.csv"));
        overrides.insert(Segment::Residential, PathBuf::from("/abs/res.csv"));
        let cat = Catalog::new(Path::new("/srv/data"), &overrides);
        assert_eq!(cat.path(Segment::Mdu), Path::new("/srv/data/custom/mdu.csv"));
        assert_eq!(cat.path(Segment::Residential), Path::new("/abs/res.csv"));
    }

    #[test]
    fn upload_requested_but_absent_is_missing_input() {
        let cat = Catalog::new(Path::new("."), &BTreeMap::new());
        let err = cat.select(DatasetSource::Upload(None)).unwrap_err();
        assert!(matches!(err, AppError::MissingInput(_)));
    }

    #[test]
    fn upload_parses_bytes() {
        let cat = Catalog::new(Path::new("."), &BTreeMap::new());
        let t = cat.select(DatasetSource::Upload(Some(b"Region\nWest\n".to_vec()))).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn segment_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample_mdu.csv"), "Property,Units\nOak Tower,120\n").unwrap();
        let cat = Catalog::new(dir.path(), &BTreeMap::new());
        let t = cat.select(DatasetSource::Segment(Segment::Mdu)).unwrap();
        assert_eq!(t.columns(), &["Property", "Units"]);
    }

    #[test]
    fn malformed_upload_is_data_format_error() {
        let cat = Catalog::new(Path::new("."), &BTreeMap::new());
        let err = cat.select(DatasetSource::Upload(Some(b"a,b\n1\n".to_vec()))).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }
}
