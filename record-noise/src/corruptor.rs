// record-noise/src/corruptor.rs
//! Dataset-wide corruption pass
//!
//! Every record goes through field mutation (given name, surname, date of
//! birth, then the optional free-text columns) followed by record
//! perturbation. Once all records are done, a single encoding swap pass
//! breaks the pairing of a small share of records.

use log::{debug, info, warn};

use crate::config::NoiseSettings;
use crate::errors::NoiseResult;
use crate::model::{Dataset, Record};
use crate::mutators::{
    DateMutator, MutationKind, Mutator, NameMutator, RecordPerturbator, TextMutator,
};
use crate::reporters::{NoiseReport, FIELD_FORMAT};
use crate::rng::NoiseRng;

/// Applies the full noise procedure to datasets
#[derive(Debug, Clone)]
pub struct DatasetCorruptor {
    settings: NoiseSettings,
    names: NameMutator,
    text: TextMutator,
}

impl DatasetCorruptor {
    /// Build a corruptor. Settings are validated here, before any mutation.
    pub fn new(settings: NoiseSettings) -> NoiseResult<Self> {
        settings.validate()?;
        Ok(Self {
            names: NameMutator::new(&settings),
            text: TextMutator::new(&settings),
            settings,
        })
    }

    /// Corrupt a dataset with a fresh random stream seeded from the settings
    pub fn corrupt(&self, dataset: &mut Dataset) -> NoiseResult<NoiseReport> {
        let mut rng = NoiseRng::from_seed(self.settings.seed);
        self.corrupt_with_rng(dataset, &mut rng)
    }

    /// Corrupt a dataset, drawing from the given stream in dataset order
    pub fn corrupt_with_rng(
        &self,
        dataset: &mut Dataset,
        rng: &mut NoiseRng,
    ) -> NoiseResult<NoiseReport> {
        dataset.validate()?;

        let schema = dataset.schema().clone();
        let roles = schema.roles;
        let mut report = NoiseReport::new(rng.seed(), dataset.len());

        let dates = roles
            .date_of_birth
            .map(|column| DateMutator::new(&self.settings).with_field(schema.column_name(column)));
        let perturbator = RecordPerturbator::new(&self.settings, &roles);
        if !perturbator.is_active() {
            debug!("Dataset lacks a given name or surname column, name swaps disabled");
        }

        let other_columns: Vec<usize> = if self.settings.mutate_other_fields {
            (0..schema.plaintext_columns.len())
                .filter(|&column| !roles.is_assigned(column))
                .collect()
        } else {
            Vec::new()
        };

        info!(
            "Corrupting {} records (seed {}, noise level {})",
            dataset.len(),
            rng.seed(),
            self.settings.noise_level
        );

        for record in dataset.records_mut() {
            for column in [roles.given_name, roles.surname].into_iter().flatten() {
                let field = schema.column_name(column);
                apply_field(&self.names, record, column, field, rng, &mut report);
            }

            if let (Some(column), Some(dates)) = (roles.date_of_birth, dates.as_ref()) {
                apply_field(dates, record, column, schema.column_name(column), rng, &mut report);
            }

            for &column in &other_columns {
                let field = schema.column_name(column);
                apply_field(&self.text, record, column, field, rng, &mut report);
            }

            // Whole-record perturbation sees the already mutated names
            if perturbator.perturb(record, rng) {
                report.name_swaps += 1;
            }
        }

        self.swap_encodings(dataset, rng, &mut report);

        debug_assert!(dataset.validate().is_ok());
        report.rng_draws = rng.draws();
        Ok(report)
    }

    /// Mark triggers with one draw per record, then pair each trigger, in
    /// dataset order, with a uniformly chosen other record and exchange their
    /// encodings. Triggers are never revisited; partners are unrestricted, so
    /// chains of swaps may move one encoding several times.
    fn swap_encodings(&self, dataset: &mut Dataset, rng: &mut NoiseRng, report: &mut NoiseReport) {
        let probability = self.settings.probability(MutationKind::EncodingSwap);
        let len = dataset.len();

        let triggers: Vec<usize> = (0..len).filter(|_| rng.chance(probability)).collect();
        report.swap_triggers = triggers.len() as u64;

        for trigger in triggers {
            if len < 2 {
                warn!(
                    "Encoding swap triggered for a dataset of {} record(s), no partner available",
                    len
                );
                report.unpaired_triggers += 1;
                continue;
            }

            let mut partner = rng.below(len - 1);
            if partner >= trigger {
                partner += 1;
            }

            dataset.swap_encodings(trigger, partner);
            report.encoding_swaps += 1;
            debug!(
                "Swapped encodings of records {} and {}",
                dataset.records()[trigger].id(),
                dataset.records()[partner].id()
            );
        }

        info!(
            "Encoding swap pass: {} triggers, {} swaps",
            report.swap_triggers, report.encoding_swaps
        );
    }
}

fn apply_field<M: Mutator<String>>(
    mutator: &M,
    record: &mut Record,
    column: usize,
    field: &str,
    rng: &mut NoiseRng,
    report: &mut NoiseReport,
) {
    let Some(value) = record.value_mut(column) else {
        return;
    };

    match mutator.mutate(value, rng) {
        Ok(applied) => {
            for kind in applied {
                report.record_applied(field, kind);
                debug!("Applied {} to {} of record {}", kind, field, record.id());
            }
        }
        Err(e) => {
            warn!("Record {}: {}; field left unchanged", record.id(), e);
            report.record_skipped(field, FIELD_FORMAT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Encoding, RecordId, Schema};
    use std::collections::BTreeSet;

    fn schema() -> Schema {
        Schema::new(
            vec!["GivenName".into(), "Surname".into(), "Birthday".into()],
            "encoding",
            "uid",
        )
    }

    fn dataset(n: usize) -> Dataset {
        let entries = (0..n)
            .map(|i| {
                (
                    Record::new(
                        RecordId::new(format!("id{}", i)),
                        vec![format!("given{}", i), format!("sur{}", i), "1990-05-14".into()],
                    ),
                    Encoding::new(format!("enc{}", i)),
                )
            })
            .collect();
        Dataset::new(schema(), entries).unwrap()
    }

    fn quiet_settings() -> NoiseSettings {
        let mut settings = NoiseSettings::default();
        for kind in MutationKind::ALL {
            settings.set_probability(kind, 0.0);
        }
        settings
    }

    #[test]
    fn test_silent_settings_change_nothing() {
        let corruptor = DatasetCorruptor::new(quiet_settings()).unwrap();
        let mut ds = dataset(20);
        let before = ds.clone();
        let report = corruptor.corrupt(&mut ds).unwrap();
        assert_eq!(ds, before);
        assert_eq!(report.encoding_swaps, 0);
        // Per record: 6 + 6 name draws, 3 date draws, 1 name swap draw, 1 trigger draw
        assert_eq!(report.rng_draws, 20 * (6 + 6 + 3 + 1 + 1));
    }

    #[test]
    fn test_every_record_triggers() {
        let mut settings = quiet_settings();
        settings.set_probability(MutationKind::EncodingSwap, 1.0);
        let corruptor = DatasetCorruptor::new(settings).unwrap();
        let mut ds = dataset(10);
        let report = corruptor.corrupt(&mut ds).unwrap();
        assert_eq!(report.swap_triggers, 10);
        assert_eq!(report.encoding_swaps, 10);

        let encodings: BTreeSet<&str> = ds.encodings().iter().map(Encoding::as_str).collect();
        assert_eq!(encodings.len(), 10);
    }

    #[test]
    fn test_single_record_trigger_is_unpaired() {
        let mut settings = quiet_settings();
        settings.set_probability(MutationKind::EncodingSwap, 1.0);
        let corruptor = DatasetCorruptor::new(settings).unwrap();
        let mut ds = dataset(1);
        let report = corruptor.corrupt(&mut ds).unwrap();
        assert_eq!(report.unpaired_triggers, 1);
        assert_eq!(ds.encodings()[0].as_str(), "enc0");
    }

    #[test]
    fn test_two_records_always_swap_with_each_other() {
        let mut settings = quiet_settings();
        settings.set_probability(MutationKind::EncodingSwap, 1.0);
        let corruptor = DatasetCorruptor::new(settings).unwrap();
        let mut ds = dataset(2);
        corruptor.corrupt(&mut ds).unwrap();
        // Two triggers, each swapping the same pair: back to the start
        assert_eq!(ds.encodings()[0].as_str(), "enc0");
        assert_eq!(ds.encodings()[1].as_str(), "enc1");
    }

    #[test]
    fn test_malformed_date_is_skipped_not_fatal() {
        let mut settings = quiet_settings();
        settings.set_probability(MutationKind::DateShift, 1.0);
        let corruptor = DatasetCorruptor::new(settings).unwrap();
        let entries = vec![
            (
                Record::new(
                    RecordId::new("a"),
                    vec!["ann".into(), "lee".into(), "not a date".into()],
                ),
                Encoding::new("e1"),
            ),
            (
                Record::new(
                    RecordId::new("b"),
                    vec!["bob".into(), "ray".into(), "1990-05-14".into()],
                ),
                Encoding::new("e2"),
            ),
        ];
        let mut ds = Dataset::new(schema(), entries).unwrap();
        let report = corruptor.corrupt(&mut ds).unwrap();
        assert_eq!(report.skipped_count("Birthday", FIELD_FORMAT), 1);
        assert_eq!(report.applied_count("Birthday", MutationKind::DateShift), 1);
        assert_eq!(ds.records()[0].value(2), Some("not a date"));
        assert_ne!(ds.records()[1].value(2), Some("1990-05-14"));
    }

    #[test]
    fn test_invalid_settings_rejected_up_front() {
        let mut settings = NoiseSettings::default();
        settings.overrides.insert("encoding_swap".into(), -0.5);
        assert!(DatasetCorruptor::new(settings).is_err());
    }

    #[test]
    fn test_other_fields_opt_in() {
        let mut settings = quiet_settings();
        settings.set_probability(MutationKind::Missing, 1.0);
        settings.mutate_other_fields = true;
        let schema = Schema::new(vec!["GivenName".into(), "City".into()], "encoding", "uid");
        let entries = vec![(
            Record::new(RecordId::new("a"), vec!["ann".into(), "leeds".into()]),
            Encoding::new("e"),
        )];
        let mut ds = Dataset::new(schema.clone(), entries.clone()).unwrap();
        DatasetCorruptor::new(settings.clone()).unwrap().corrupt(&mut ds).unwrap();
        assert_eq!(ds.records()[0].values(), &[String::new(), String::new()]);

        settings.mutate_other_fields = false;
        let mut ds = Dataset::new(schema, entries).unwrap();
        DatasetCorruptor::new(settings).unwrap().corrupt(&mut ds).unwrap();
        assert_eq!(ds.records()[0].values(), &[String::new(), "leeds".to_string()]);
    }
}
