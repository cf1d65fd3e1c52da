// record-noise/src/model.rs
//! Records, encodings and the dataset pairing them

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::columns;
use crate::errors::{NoiseError, NoiseResult};

/// Unique record identifier, immutable once assigned
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque, previously computed representation of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Encoding(String);

impl Encoding {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext fields of one record plus its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    values: Vec<String>,
}

impl Record {
    pub fn new(id: RecordId, values: Vec<String>) -> Self {
        Self { id, values }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value(&self, column: usize) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn value_mut(&mut self, column: usize) -> Option<&mut String> {
        self.values.get_mut(column)
    }

    /// Exchange two field values in place. Out of range columns are ignored.
    pub fn swap_values(&mut self, a: usize, b: usize) {
        if a < self.values.len() && b < self.values.len() {
            self.values.swap(a, b);
        }
    }
}

/// Which plaintext columns play the given name, surname and date roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldRoles {
    pub given_name: Option<usize>,
    pub surname: Option<usize>,
    pub date_of_birth: Option<usize>,
}

impl FieldRoles {
    /// Detect roles from column names: `GivenName`, `Surname`, and the date
    /// column. The first column mentioning a birth wins; a column mentioning
    /// a date is only used when none does.
    pub fn detect(plaintext_columns: &[String]) -> Self {
        let position = |name: &str| plaintext_columns.iter().position(|c| c == name);
        let given_name = position(columns::GIVEN_NAME);
        let surname = position(columns::SURNAME);
        let marked = |marker: &str| {
            plaintext_columns.iter().enumerate().position(|(idx, c)| {
                Some(idx) != given_name && Some(idx) != surname && c.to_lowercase().contains(marker)
            })
        };
        let date_of_birth = columns::DATE_MARKERS.iter().find_map(|m| marked(m));

        Self {
            given_name,
            surname,
            date_of_birth,
        }
    }

    /// True when the column is one of the name or date columns
    pub fn is_assigned(&self, column: usize) -> bool {
        [self.given_name, self.surname, self.date_of_birth].contains(&Some(column))
    }
}

/// Column layout of a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub plaintext_columns: Vec<String>,
    pub encoding_column: String,
    pub id_column: String,
    pub roles: FieldRoles,
}

impl Schema {
    pub fn new(
        plaintext_columns: Vec<String>,
        encoding_column: impl Into<String>,
        id_column: impl Into<String>,
    ) -> Self {
        let roles = FieldRoles::detect(&plaintext_columns);
        Self {
            plaintext_columns,
            encoding_column: encoding_column.into(),
            id_column: id_column.into(),
            roles,
        }
    }

    pub fn column_name(&self, column: usize) -> &str {
        self.plaintext_columns.get(column).map(String::as_str).unwrap_or("?")
    }
}

/// Ordered (record, encoding) pairs.
///
/// `encodings[i]` is the encoding currently paired with `records[i]`. Swaps
/// only ever exchange positions in `encodings`, so the pairing stays a
/// bijection and the identifier set never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
    encodings: Vec<Encoding>,
}

impl Dataset {
    /// Build a dataset, failing on duplicate or empty identifiers and on
    /// records whose width does not match the schema.
    pub fn new(schema: Schema, entries: Vec<(Record, Encoding)>) -> NoiseResult<Self> {
        let (records, encodings) = entries.into_iter().unzip();
        let dataset = Self {
            schema,
            records,
            encodings,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn validate(&self) -> NoiseResult<()> {
        if self.records.len() != self.encodings.len() {
            return Err(NoiseError::DatasetIntegrity(format!(
                "{} records but {} encodings",
                self.records.len(),
                self.encodings.len()
            )));
        }

        let width = self.schema.plaintext_columns.len();
        let mut seen = HashSet::with_capacity(self.records.len());
        for (row, record) in self.records.iter().enumerate() {
            if record.id.as_str().trim().is_empty() {
                return Err(NoiseError::DatasetIntegrity(format!(
                    "record at row {} has no identifier",
                    row
                )));
            }
            if !seen.insert(&record.id) {
                return Err(NoiseError::DatasetIntegrity(format!(
                    "duplicate identifier '{}' at row {}",
                    record.id, row
                )));
            }
            if record.values.len() != width {
                return Err(NoiseError::DatasetIntegrity(format!(
                    "record '{}' has {} fields, expected {}",
                    record.id,
                    record.values.len(),
                    width
                )));
            }
        }

        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn encodings(&self) -> &[Encoding] {
        &self.encodings
    }

    /// Records with the encodings currently paired to them
    pub fn pairs(&self) -> impl Iterator<Item = (&Record, &Encoding)> {
        self.records.iter().zip(self.encodings.iter())
    }

    pub fn encoding_of(&self, id: &RecordId) -> Option<&Encoding> {
        self.records
            .iter()
            .position(|r| &r.id == id)
            .and_then(|idx| self.encodings.get(idx))
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.records.iter().map(Record::id)
    }

    /// Exchange the encodings paired with the records at `a` and `b`
    pub fn swap_encodings(&mut self, a: usize, b: usize) {
        if a < self.encodings.len() && b < self.encodings.len() {
            self.encodings.swap(a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(
            vec!["GivenName".into(), "Surname".into(), "Birthday".into(), "City".into()],
            "encoding",
            "uid",
        )
    }

    fn entry(id: &str, enc: &str) -> (Record, Encoding) {
        (
            Record::new(
                RecordId::new(id),
                vec!["john".into(), "smith".into(), "05/14/1990".into(), "leeds".into()],
            ),
            Encoding::new(enc),
        )
    }

    #[test]
    fn test_roles_detected_from_column_names() {
        let roles = schema().roles;
        assert_eq!(roles.given_name, Some(0));
        assert_eq!(roles.surname, Some(1));
        assert_eq!(roles.date_of_birth, Some(2));
        assert!(!roles.is_assigned(3));
    }

    #[test]
    fn test_date_role_uses_first_matching_column() {
        let columns: Vec<String> =
            vec!["Updated".into(), "DateOfBirth".into(), "BirthPlace".into()];
        let roles = FieldRoles::detect(&columns);
        assert_eq!(roles.date_of_birth, Some(1));
        assert_eq!(roles.given_name, None);
    }

    #[test]
    fn test_birth_column_preferred_over_earlier_date_column() {
        let columns: Vec<String> = vec!["Updated".into(), "GivenName".into(), "Birthday".into()];
        assert_eq!(FieldRoles::detect(&columns).date_of_birth, Some(2));

        let date_only: Vec<String> = vec!["GivenName".into(), "VisitDate".into()];
        assert_eq!(FieldRoles::detect(&date_only).date_of_birth, Some(1));

        let neither: Vec<String> = vec!["GivenName".into(), "City".into()];
        assert_eq!(FieldRoles::detect(&neither).date_of_birth, None);
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let result = Dataset::new(schema(), vec![entry("1", "a"), entry("1", "b")]);
        assert!(matches!(result, Err(NoiseError::DatasetIntegrity(_))));
    }

    #[test]
    fn test_missing_identifier_rejected() {
        let result = Dataset::new(schema(), vec![entry(" ", "a")]);
        assert!(matches!(result, Err(NoiseError::DatasetIntegrity(_))));
    }

    #[test]
    fn test_ragged_record_rejected() {
        let short = (Record::new(RecordId::new("9"), vec!["x".into()]), Encoding::new("e"));
        let result = Dataset::new(schema(), vec![entry("1", "a"), short]);
        assert!(matches!(result, Err(NoiseError::DatasetIntegrity(_))));
    }

    #[test]
    fn test_swap_encodings_changes_pairing_only() {
        let mut ds = Dataset::new(schema(), vec![entry("1", "a"), entry("2", "b")]).unwrap();
        let before: Vec<Record> = ds.records().to_vec();
        ds.swap_encodings(0, 1);
        assert_eq!(ds.records(), &before[..]);
        assert_eq!(ds.encoding_of(&RecordId::new("1")).unwrap().as_str(), "b");
        assert_eq!(ds.encoding_of(&RecordId::new("2")).unwrap().as_str(), "a");
    }
}
