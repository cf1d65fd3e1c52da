// record-noise/src/mutators/name.rs
//! Mutator for given name and surname fields
//!
//! Candidates are tried in a fixed order and the first successful draw wins,
//! so a single pass never stacks unrelated corruptions on one name.

use crate::config::NoiseSettings;
use crate::constants::{MISSING_TOKEN, NAME_SUFFIXES, TYPO_ALPHABET};
use crate::mutators::{first_success, Candidate, MutationKind, MutationResult, Mutator};
use crate::rng::NoiseRng;

/// Candidate order for name fields. Not reorderable.
pub const NAME_CANDIDATE_ORDER: [MutationKind; 6] = [
    MutationKind::Missing,
    MutationKind::Typo,
    MutationKind::CaseChange,
    MutationKind::CharSwap,
    MutationKind::Whitespace,
    MutationKind::Suffix,
];

/// Name field mutator
#[derive(Debug, Clone)]
pub struct NameMutator {
    candidates: Vec<Candidate>,
}

impl NameMutator {
    pub fn new(settings: &NoiseSettings) -> Self {
        Self {
            candidates: NAME_CANDIDATE_ORDER
                .iter()
                .map(|&kind| Candidate::new(kind, settings.probability(kind)))
                .collect(),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Mutate a value, returning the applied kind if any
    pub fn mutate_value(&self, value: &mut String, rng: &mut NoiseRng) -> Option<MutationKind> {
        first_success(&self.candidates, value, rng, apply_string_mutation)
    }
}

impl Mutator<String> for NameMutator {
    fn mutate(&self, input: &mut String, rng: &mut NoiseRng) -> MutationResult {
        Ok(self.mutate_value(input, rng).into_iter().collect())
    }
}

/// Apply one string mutation. `None` means the kind does not apply to the value.
pub(crate) fn apply_string_mutation(
    kind: MutationKind,
    value: &str,
    rng: &mut NoiseRng,
) -> Option<String> {
    match kind {
        MutationKind::Missing => mark_missing(value),
        MutationKind::Typo => substitute_char(value, rng),
        MutationKind::CaseChange => change_case(value, rng),
        MutationKind::CharSwap => swap_adjacent(value, rng),
        MutationKind::Whitespace => insert_whitespace(value, rng),
        MutationKind::Suffix => add_suffix(value, rng),
        _ => None,
    }
}

fn mark_missing(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    Some(MISSING_TOKEN.to_string())
}

fn substitute_char(value: &str, rng: &mut NoiseRng) -> Option<String> {
    let mut chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return None;
    }

    let idx = rng.below(chars.len());
    let current = chars[idx];
    let lower = current.to_ascii_lowercase();
    let replacements: Vec<char> = TYPO_ALPHABET.iter().copied().filter(|&c| c != lower).collect();
    let replacement = *rng.pick(&replacements)?;

    chars[idx] = if current.is_uppercase() {
        replacement.to_ascii_uppercase()
    } else {
        replacement
    };
    Some(chars.into_iter().collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseStyle {
    Upper,
    Lower,
    Title,
    Capitalize,
}

const CASE_STYLES: [CaseStyle; 4] = [
    CaseStyle::Upper,
    CaseStyle::Lower,
    CaseStyle::Title,
    CaseStyle::Capitalize,
];

fn render_case(value: &str, style: CaseStyle) -> String {
    match style {
        CaseStyle::Upper => value.to_uppercase(),
        CaseStyle::Lower => value.to_lowercase(),
        CaseStyle::Title => {
            let mut out = String::with_capacity(value.len());
            let mut word_start = true;
            for c in value.chars() {
                if word_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.extend(c.to_lowercase());
                }
                word_start = !c.is_alphabetic();
            }
            out
        }
        CaseStyle::Capitalize => {
            let mut chars = value.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        }
    }
}

fn change_case(value: &str, rng: &mut NoiseRng) -> Option<String> {
    // Only styles that actually change the value are eligible
    let mut variants: Vec<String> = Vec::with_capacity(CASE_STYLES.len());
    for style in CASE_STYLES {
        let rendered = render_case(value, style);
        if rendered != value && !variants.contains(&rendered) {
            variants.push(rendered);
        }
    }
    rng.pick(&variants).cloned()
}

fn swap_adjacent(value: &str, rng: &mut NoiseRng) -> Option<String> {
    let mut chars: Vec<char> = value.chars().collect();
    if chars.len() < 2 {
        return None;
    }

    let positions: Vec<usize> = (0..chars.len() - 1)
        .filter(|&i| chars[i] != chars[i + 1])
        .collect();
    let idx = *rng.pick(&positions)?;
    chars.swap(idx, idx + 1);
    Some(chars.into_iter().collect())
}

fn insert_whitespace(value: &str, rng: &mut NoiseRng) -> Option<String> {
    let mut chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return None;
    }

    let count = 1 + rng.below(2);
    let position = rng.below(chars.len() + 1);
    for _ in 0..count {
        chars.insert(position, ' ');
    }
    Some(chars.into_iter().collect())
}

fn add_suffix(value: &str, rng: &mut NoiseRng) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let suffix = rng.pick(NAME_SUFFIXES)?;
    Some(format!("{}{}", value, suffix))
}
