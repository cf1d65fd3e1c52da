// record-noise/src/tsv.rs
//! Encoded TSV files in and out of `Dataset`
//!
//! Layout: header row, plaintext columns first, then the encoding column,
//! then the unique identifier column.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::ENCODED_FILE_PATTERNS;
use crate::errors::{NoiseError, NoiseResult};
use crate::model::{Dataset, Encoding, Record, RecordId, Schema};

/// Read an encoded TSV file into a validated dataset
pub fn read_dataset(path: &Path) -> NoiseResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.len() < 2 {
        return Err(NoiseError::Tsv(format!(
            "{} has {} column(s); an encoding and an identifier column are required",
            path.display(),
            headers.len()
        )));
    }

    let width = headers.len();
    let id_column = headers[width - 1].clone();
    let encoding_column = headers[width - 2].clone();
    let plaintext_columns = headers[..width - 2].to_vec();

    let mut entries = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let fields = result?;
        if fields.len() != width {
            return Err(NoiseError::DatasetIntegrity(format!(
                "{} row {} has {} fields, header has {}",
                path.display(),
                row + 1,
                fields.len(),
                width
            )));
        }

        let values: Vec<String> = fields.iter().take(width - 2).map(str::to_string).collect();
        let record = Record::new(RecordId::new(&fields[width - 1]), values);
        entries.push((record, Encoding::new(&fields[width - 2])));
    }

    debug!("Read {} records from {}", entries.len(), path.display());
    Dataset::new(Schema::new(plaintext_columns, encoding_column, id_column), entries)
}

/// Write a dataset with its original header. The file is written next to
/// `path` and renamed into place, so a failed write leaves no partial output.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> NoiseResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temporary_path(path);
    let result = write_to(dataset, &tmp_path);
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn write_to(dataset: &Dataset, path: &Path) -> NoiseResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(file);
    write_rows(dataset, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_rows<W: std::io::Write>(
    dataset: &Dataset,
    writer: &mut csv::Writer<W>,
) -> NoiseResult<()> {
    let schema = dataset.schema();
    let mut header: Vec<&str> = schema.plaintext_columns.iter().map(String::as_str).collect();
    header.push(&schema.encoding_column);
    header.push(&schema.id_column);
    writer.write_record(&header)?;

    for (record, encoding) in dataset.pairs() {
        let mut row: Vec<&str> = record.values().iter().map(String::as_str).collect();
        row.push(encoding.as_str());
        row.push(record.id().as_str());
        writer.write_record(&row)?;
    }
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Encoded TSV files in `dir`: each pattern's matches sorted, patterns in order
pub fn discover_encoded_files(dir: &Path) -> NoiseResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in ENCODED_FILE_PATTERNS {
        let full = dir.join(pattern);
        let mut matches = Vec::new();
        let paths = glob::glob(&full.to_string_lossy()).map_err(|e| {
            NoiseError::Config(format!("Invalid file pattern {}: {}", full.display(), e))
        })?;
        for entry in paths {
            matches.push(entry.map_err(|e| NoiseError::Io(e.into_error()))?);
        }
        matches.sort();
        files.extend(matches);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "GivenName\tSurname\tBirthday\tbf\tuid\n\
                          john\tsmith\t05/14/1990\t0101\t1\n\
                          mary\tjones\t1985-01-02\t1100\t2\n";

    #[test]
    fn test_read_and_write_preserve_layout() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("toy_bf_encoded.tsv");
        fs::write(&input, SAMPLE).unwrap();

        let dataset = read_dataset(&input).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.schema().encoding_column, "bf");
        assert_eq!(dataset.schema().id_column, "uid");
        assert_eq!(dataset.schema().roles.date_of_birth, Some(2));
        assert_eq!(dataset.encodings()[1].as_str(), "1100");

        let output = dir.path().join("out").join("toy_bf_encoded.tsv");
        write_dataset(&dataset, &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), SAMPLE);
        assert!(!dir.path().join("out").join("toy_bf_encoded.tsv.partial").exists());
    }

    #[test]
    fn test_too_few_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("x.tsv");
        fs::write(&input, "uid\n1\n").unwrap();
        assert!(matches!(read_dataset(&input), Err(NoiseError::Tsv(_))));
    }

    #[test]
    fn test_duplicate_uid_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("x.tsv");
        fs::write(&input, "GivenName\tenc\tuid\na\t1\t7\nb\t2\t7\n").unwrap();
        assert!(matches!(read_dataset(&input), Err(NoiseError::DatasetIntegrity(_))));
    }

    #[test]
    fn test_ragged_row_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("x.tsv");
        fs::write(&input, "GivenName\tenc\tuid\na\t1\n").unwrap();
        assert!(matches!(read_dataset(&input), Err(NoiseError::DatasetIntegrity(_))));
    }

    #[test]
    fn test_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "b_tmh_encoded.tsv",
            "z_bf_encoded.tsv",
            "a_bf_encoded.tsv",
            "c_bfd_encoded.tsv",
            "notes.tsv",
            "d_tsh_encoded.tsv",
        ] {
            fs::write(dir.path().join(name), "a\tb\n").unwrap();
        }
        let names: Vec<String> = discover_encoded_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "a_bf_encoded.tsv",
                "z_bf_encoded.tsv",
                "c_bfd_encoded.tsv",
                "b_tmh_encoded.tsv",
                "d_tsh_encoded.tsv",
            ]
        );
    }
}
