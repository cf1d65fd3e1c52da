// record-noise/src/mutators/record.rs
//! Whole-record structural perturbation

use crate::config::NoiseSettings;
use crate::model::{FieldRoles, Record};
use crate::mutators::{MutationKind, MutationResult, Mutator};
use crate::rng::NoiseRng;

/// Exchanges the given name and surname of a record.
///
/// Runs after the name fields have been mutated, so it swaps whatever values
/// survived field-level noise.
#[derive(Debug, Clone)]
pub struct RecordPerturbator {
    probability: f64,
    given_name: Option<usize>,
    surname: Option<usize>,
}

impl RecordPerturbator {
    pub fn new(settings: &NoiseSettings, roles: &FieldRoles) -> Self {
        Self {
            probability: settings.probability(MutationKind::NameSwap),
            given_name: roles.given_name,
            surname: roles.surname,
        }
    }

    /// False when the dataset lacks one of the two name columns
    pub fn is_active(&self) -> bool {
        self.given_name.is_some() && self.surname.is_some()
    }

    /// Swap the name fields of one record with the configured probability.
    /// Returns true when the swap happened. No draw is taken when inactive.
    pub fn perturb(&self, record: &mut Record, rng: &mut NoiseRng) -> bool {
        let (Some(given), Some(surname)) = (self.given_name, self.surname) else {
            return false;
        };

        if !rng.chance(self.probability) {
            return false;
        }

        record.swap_values(given, surname);
        log::debug!("Swapped given name and surname of record {}", record.id());
        true
    }
}

impl Mutator<Record> for RecordPerturbator {
    fn mutate(&self, input: &mut Record, rng: &mut NoiseRng) -> MutationResult {
        if self.perturb(input, rng) {
            Ok(vec![MutationKind::NameSwap])
        } else {
            Ok(vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;

    fn record() -> Record {
        Record::new(RecordId::new("r1"), vec!["JOHN".into(), "smith".into(), "1990-05-14".into()])
    }

    fn roles() -> FieldRoles {
        FieldRoles {
            given_name: Some(0),
            surname: Some(1),
            date_of_birth: Some(2),
        }
    }

    #[test]
    fn test_swaps_current_values() {
        let mut settings = NoiseSettings::default();
        settings.overrides.insert("name_swap".into(), 1.0);
        let perturbator = RecordPerturbator::new(&settings, &roles());
        let mut rec = record();
        let applied = perturbator.mutate(&mut rec, &mut NoiseRng::from_seed(0)).unwrap();
        assert_eq!(applied, vec![MutationKind::NameSwap]);
        assert_eq!(
            rec.values(),
            &["smith".to_string(), "JOHN".to_string(), "1990-05-14".to_string()]
        );
    }

    #[test]
    fn test_one_draw_per_record() {
        let perturbator = RecordPerturbator::new(&NoiseSettings::default(), &roles());
        let mut rng = NoiseRng::from_seed(3);
        let mut rec = record();
        perturbator.perturb(&mut rec, &mut rng);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_inactive_without_surname() {
        let mut settings = NoiseSettings::default();
        settings.overrides.insert("name_swap".into(), 1.0);
        let roles = FieldRoles {
            surname: None,
            ..roles()
        };
        let perturbator = RecordPerturbator::new(&settings, &roles);
        assert!(!perturbator.is_active());
        let mut rng = NoiseRng::from_seed(0);
        let mut rec = record();
        assert_eq!(perturbator.mutate(&mut rec, &mut rng), Ok(vec![]));
        assert_eq!(rng.draws(), 0);
    }
}
