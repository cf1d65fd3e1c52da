// record-noise/src/mutators/mod.rs
//! Field and record mutators

pub mod date;
pub mod name;
pub mod record;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{FieldFormatError, NoiseError};
use crate::rng::NoiseRng;

pub use date::DateMutator;
pub use name::NameMutator;
pub use record::RecordPerturbator;
pub use text::TextMutator;

/// Every kind of corruption the engine can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Missing,
    Typo,
    CaseChange,
    CharSwap,
    Whitespace,
    Suffix,
    DateShift,
    DateFormat,
    DateTextToken,
    NameSwap,
    EncodingSwap,
}

impl MutationKind {
    pub const ALL: [MutationKind; 11] = [
        MutationKind::Missing,
        MutationKind::Typo,
        MutationKind::CaseChange,
        MutationKind::CharSwap,
        MutationKind::Whitespace,
        MutationKind::Suffix,
        MutationKind::DateShift,
        MutationKind::DateFormat,
        MutationKind::DateTextToken,
        MutationKind::NameSwap,
        MutationKind::EncodingSwap,
    ];

    /// Name used in configuration overrides and reports
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Missing => "missing",
            MutationKind::Typo => "typo",
            MutationKind::CaseChange => "case_change",
            MutationKind::CharSwap => "char_swap",
            MutationKind::Whitespace => "whitespace",
            MutationKind::Suffix => "suffix",
            MutationKind::DateShift => "date_shift",
            MutationKind::DateFormat => "date_format",
            MutationKind::DateTextToken => "date_text_token",
            MutationKind::NameSwap => "name_swap",
            MutationKind::EncodingSwap => "encoding_swap",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MutationKind {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MutationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| NoiseError::Config(format!("Unknown mutation type '{}'", s)))
    }
}

/// Outcome of one mutator call: the kinds applied (empty when the value is
/// unchanged), or a malformed-field error that leaves the value untouched.
pub type MutationResult = Result<Vec<MutationKind>, FieldFormatError>;

/// Trait for mutating one value with the shared random stream
pub trait Mutator<T: ?Sized> {
    /// Mutate the given input in place
    fn mutate(&self, input: &mut T, rng: &mut NoiseRng) -> MutationResult;
}

/// A candidate mutation with its trigger probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub kind: MutationKind,
    pub probability: f64,
}

impl Candidate {
    pub fn new(kind: MutationKind, probability: f64) -> Self {
        Self { kind, probability }
    }
}

/// Try candidates in order; the first whose draw succeeds and which applies
/// to the value wins. Each candidate reached consumes its draw, applicable or not.
pub(crate) fn first_success<F>(
    candidates: &[Candidate],
    value: &mut String,
    rng: &mut NoiseRng,
    mut apply: F,
) -> Option<MutationKind>
where
    F: FnMut(MutationKind, &str, &mut NoiseRng) -> Option<String>,
{
    for candidate in candidates {
        if !rng.chance(candidate.probability) {
            continue;
        }
        if let Some(mutated) = apply(candidate.kind, value.as_str(), rng) {
            *value = mutated;
            return Some(candidate.kind);
        }
        log::trace!("{} not applicable to '{}', trying next candidate", candidate.kind, value);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in MutationKind::ALL {
            assert_eq!(kind.name().parse::<MutationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name_is_config_error() {
        assert!(matches!("typos".parse::<MutationKind>(), Err(NoiseError::Config(_))));
    }

    #[test]
    fn test_first_success_skips_inapplicable() {
        let candidates = [
            Candidate::new(MutationKind::CharSwap, 1.0),
            Candidate::new(MutationKind::Suffix, 1.0),
        ];
        let mut value = "a".to_string();
        let mut rng = NoiseRng::from_seed(0);
        let applied = first_success(&candidates, &mut value, &mut rng, |kind, v, _| match kind {
            MutationKind::CharSwap => None,
            _ => Some(format!("{}!", v)),
        });
        assert_eq!(applied, Some(MutationKind::Suffix));
        assert_eq!(value, "a!");
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_first_success_stops_early() {
        let candidates = [
            Candidate::new(MutationKind::Missing, 1.0),
            Candidate::new(MutationKind::Typo, 1.0),
        ];
        let mut value = "x".to_string();
        let mut rng = NoiseRng::from_seed(0);
        let applied =
            first_success(&candidates, &mut value, &mut rng, |_, _, _| Some(String::new()));
        assert_eq!(applied, Some(MutationKind::Missing));
        assert_eq!(rng.draws(), 1);
    }
}
