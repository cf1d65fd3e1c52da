// record-noise/src/constants.rs
//! Shared constants for the noise injection engine

/// Seed used when neither the config file nor the CLI provides one
pub const DEFAULT_SEED: u64 = 42;

/// Default noise level (multiplier applied to every default probability)
pub const DEFAULT_NOISE_LEVEL: f64 = 1.0;

/// Ceiling applied to scaled default probabilities
pub const MAX_SCALED_PROBABILITY: f64 = 0.95;

/// Width of the date shift window at noise level 1.0 (days)
pub const BASE_MAX_DATE_SHIFT_DAYS: u32 = 12;

/// Default trigger probabilities, one per mutation kind
pub mod probabilities {
    /// Name field replaced with the missing token
    pub const MISSING: f64 = 0.03;
    /// One character substituted
    pub const TYPO: f64 = 0.15;
    /// Case style changed
    pub const CASE_CHANGE: f64 = 0.10;
    /// Two adjacent characters exchanged
    pub const CHAR_SWAP: f64 = 0.06;
    /// Whitespace inserted
    pub const WHITESPACE: f64 = 0.12;
    /// Suffix appended
    pub const SUFFIX: f64 = 0.05;
    /// Date moved by a small offset
    pub const DATE_SHIFT: f64 = 0.30;
    /// Date re-rendered in another format
    pub const DATE_FORMAT: f64 = 0.45;
    /// Date replaced by a text token
    pub const DATE_TEXT_TOKEN: f64 = 0.02;
    /// Given name and surname exchanged
    pub const NAME_SWAP: f64 = 0.04;
    /// Encodings of two records exchanged
    pub const ENCODING_SWAP: f64 = 0.01;
}

/// Value written in place of a missing field
pub const MISSING_TOKEN: &str = "";

/// Letters used for typographical substitution
pub const TYPO_ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Suffix vocabulary for name fields
pub const NAME_SUFFIXES: &[&str] = &[" Jr", " Sr", " II", " III", "-Smith"];

/// Out-of-band tokens that replace a whole date field
pub const DATE_TEXT_TOKENS: &[&str] = &["unknown", "n/a", "see notes", "??"];

/// Formats accepted when parsing a date field, tried in order
pub const DATE_INPUT_FORMATS: &[&str] = &["%m/%d/%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Formats a date may be re-rendered in
pub const DATE_OUTPUT_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%m-%d-%Y",
    "%d %b %Y",
    // Leading zeros dropped
    "%-m/%-d/%Y",
];

/// Column names with fixed roles in encoded datasets
pub mod columns {
    /// Given name column
    pub const GIVEN_NAME: &str = "GivenName";
    /// Surname column
    pub const SURNAME: &str = "Surname";
    /// Lowercase fragments that mark the date column, in priority order
    pub const DATE_MARKERS: &[&str] = &["birth", "date"];
}

/// File patterns of encoded datasets, processed in this order
pub const ENCODED_FILE_PATTERNS: &[&str] = &[
    "*_bf_encoded.tsv",
    "*_bfd_encoded.tsv",
    "*_tmh_encoded.tsv",
    "*_tsh_encoded.tsv",
];
