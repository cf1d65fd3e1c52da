// record-noise/src/mutators/text.rs
//! Mutator for free-text columns that are neither names nor dates

use crate::config::NoiseSettings;
use crate::mutators::name::apply_string_mutation;
use crate::mutators::{first_success, Candidate, MutationKind, MutationResult, Mutator};
use crate::rng::NoiseRng;

/// Name candidates without the suffix
pub const TEXT_CANDIDATE_ORDER: [MutationKind; 5] = [
    MutationKind::Missing,
    MutationKind::Typo,
    MutationKind::CaseChange,
    MutationKind::CharSwap,
    MutationKind::Whitespace,
];

#[derive(Debug, Clone)]
pub struct TextMutator {
    candidates: Vec<Candidate>,
}

impl TextMutator {
    pub fn new(settings: &NoiseSettings) -> Self {
        Self {
            candidates: TEXT_CANDIDATE_ORDER
                .iter()
                .map(|&kind| Candidate::new(kind, settings.probability(kind)))
                .collect(),
        }
    }
}

impl Mutator<String> for TextMutator {
    fn mutate(&self, input: &mut String, rng: &mut NoiseRng) -> MutationResult {
        Ok(first_success(&self.candidates, input, rng, apply_string_mutation)
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_appends_suffix() {
        let mut settings = NoiseSettings::default();
        for kind in TEXT_CANDIDATE_ORDER {
            settings.overrides.insert(kind.name().to_string(), 0.0);
        }
        settings.overrides.insert("suffix".into(), 1.0);
        let mutator = TextMutator::new(&settings);
        let mut value = "Leeds".to_string();
        let mut rng = NoiseRng::from_seed(0);
        assert_eq!(mutator.mutate(&mut value, &mut rng), Ok(vec![]));
        assert_eq!(value, "Leeds");
        assert_eq!(rng.draws(), 5);
    }

    #[test]
    fn test_applies_at_most_one() {
        let mutator = TextMutator::new(&NoiseSettings::default());
        for seed in 0..300 {
            let mut value = "12 High Street".to_string();
            let applied = mutator.mutate(&mut value, &mut NoiseRng::from_seed(seed)).unwrap();
            assert!(applied.len() <= 1);
        }
    }
}
