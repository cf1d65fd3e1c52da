// record-noise/src/mutators/date.rs
//! Mutator for date fields (date of birth)

use chrono::{Days, NaiveDate};

use crate::config::{DateDiscipline, NoiseSettings};
use crate::constants::{DATE_INPUT_FORMATS, DATE_OUTPUT_FORMATS, DATE_TEXT_TOKENS};
use crate::errors::FieldFormatError;
use crate::mutators::{first_success, Candidate, MutationKind, MutationResult, Mutator};
use crate::rng::NoiseRng;

/// Candidate order for date fields. Not reorderable.
pub const DATE_CANDIDATE_ORDER: [MutationKind; 3] = [
    MutationKind::DateShift,
    MutationKind::DateFormat,
    MutationKind::DateTextToken,
];

/// A date value together with the format it was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub format: &'static str,
}

impl ParsedDate {
    pub fn render(&self) -> String {
        self.date.format(self.format).to_string()
    }
}

/// Parse a date written in one of the accepted input formats
pub fn parse_date(value: &str) -> Option<ParsedDate> {
    let trimmed = value.trim();
    DATE_INPUT_FORMATS.iter().find_map(|&format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .map(|date| ParsedDate { date, format })
    })
}

/// Date field mutator
#[derive(Debug, Clone)]
pub struct DateMutator {
    field: String,
    candidates: Vec<Candidate>,
    max_shift_days: u32,
    discipline: DateDiscipline,
}

impl DateMutator {
    pub fn new(settings: &NoiseSettings) -> Self {
        Self {
            field: "date_of_birth".to_string(),
            candidates: DATE_CANDIDATE_ORDER
                .iter()
                .map(|&kind| Candidate::new(kind, settings.probability(kind)))
                .collect(),
            max_shift_days: settings.max_date_shift_days(),
            discipline: settings.date_discipline,
        }
    }

    /// Name reported in `FieldFormatError`s
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    fn probability(&self, kind: MutationKind) -> f64 {
        self.candidates
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.probability)
            .unwrap_or(0.0)
    }

    fn shift(&self, parsed: ParsedDate, rng: &mut NoiseRng) -> Option<ParsedDate> {
        let offset = rng.signed_offset(self.max_shift_days);
        let days = Days::new(offset.unsigned_abs());
        let date = if offset > 0 {
            parsed.date.checked_add_days(days)
        } else {
            parsed.date.checked_sub_days(days)
        }?;
        Some(ParsedDate { date, format: parsed.format })
    }

    fn reformat(&self, parsed: ParsedDate, current: &str, rng: &mut NoiseRng) -> Option<String> {
        let renderings: Vec<String> = DATE_OUTPUT_FORMATS
            .iter()
            .filter(|&&format| format != parsed.format)
            .map(|&format| parsed.date.format(format).to_string())
            .filter(|rendered| rendered != current)
            .collect();
        rng.pick(&renderings).cloned()
    }

    fn text_token(rng: &mut NoiseRng) -> Option<String> {
        rng.pick(DATE_TEXT_TOKENS).map(|token| token.to_string())
    }

    fn mutate_first_success(
        &self,
        parsed: ParsedDate,
        value: &mut String,
        rng: &mut NoiseRng,
    ) -> Vec<MutationKind> {
        let applied = first_success(&self.candidates, value, rng, |kind, current, rng| match kind {
            MutationKind::DateShift => self.shift(parsed, rng).map(|shifted| shifted.render()),
            MutationKind::DateFormat => self.reformat(parsed, current, rng),
            MutationKind::DateTextToken => Self::text_token(rng),
            _ => None,
        });
        applied.into_iter().collect()
    }

    fn mutate_independent(
        &self,
        parsed: ParsedDate,
        value: &mut String,
        rng: &mut NoiseRng,
    ) -> Vec<MutationKind> {
        let mut applied = Vec::new();
        let mut current = parsed;

        if rng.chance(self.probability(MutationKind::DateShift)) {
            if let Some(shifted) = self.shift(current, rng) {
                current = shifted;
                *value = current.render();
                applied.push(MutationKind::DateShift);
            }
        }

        if rng.chance(self.probability(MutationKind::DateFormat)) {
            if let Some(rendered) = self.reformat(current, value, rng) {
                *value = rendered;
                applied.push(MutationKind::DateFormat);
            }
        }

        if rng.chance(self.probability(MutationKind::DateTextToken)) {
            if let Some(token) = Self::text_token(rng) {
                *value = token;
                applied.push(MutationKind::DateTextToken);
            }
        }

        applied
    }
}

impl Mutator<String> for DateMutator {
    fn mutate(&self, input: &mut String, rng: &mut NoiseRng) -> MutationResult {
        let parsed = parse_date(input).ok_or_else(|| {
            FieldFormatError::new(&self.field, input.as_str(), "not a date in any accepted format")
        })?;

        let applied = match self.discipline {
            DateDiscipline::FirstSuccess => self.mutate_first_success(parsed, input, rng),
            DateDiscipline::Independent => self.mutate_independent(parsed, input, rng),
        };
        Ok(applied)
    }
}
