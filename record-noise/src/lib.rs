// Record Noise Injection
// Core library definition

pub mod constants;
pub mod errors;
pub mod rng;

// Core modules
pub mod config;
pub mod corruptor;
pub mod model;
pub mod mutators;
pub mod reporters;
pub mod tsv;

// Re-exports for convenience
pub use config::{load_config, DateDiscipline, NoiseSettings};
pub use corruptor::DatasetCorruptor;
pub use errors::{FieldFormatError, NoiseError, NoiseResult};
pub use model::{Dataset, Encoding, FieldRoles, Record, RecordId, Schema};
pub use mutators::{MutationKind, Mutator};
pub use reporters::NoiseReport;
pub use rng::NoiseRng;

/// Corrupt one encoded TSV file into `output`, returning the run report.
///
/// Each file gets its own random stream seeded from `settings.seed`, so the
/// result does not depend on which other files are processed alongside it.
pub fn corrupt_file(
    settings: &NoiseSettings,
    input: &std::path::Path,
    output: &std::path::Path,
) -> NoiseResult<NoiseReport> {
    let mut dataset = tsv::read_dataset(input)?;
    let report = DatasetCorruptor::new(settings.clone())?.corrupt(&mut dataset)?;
    tsv::write_dataset(&dataset, output)?;
    Ok(report.with_source(input.display().to_string()))
}

/// Corrupt several encoded TSV files into `output_dir`, keeping file names.
///
/// Every input is read and validated before the first output is written, so
/// an integrity error in any file leaves the output directory untouched.
pub fn corrupt_files(
    settings: &NoiseSettings,
    inputs: &[std::path::PathBuf],
    output_dir: &std::path::Path,
) -> NoiseResult<Vec<NoiseReport>> {
    let corruptor = DatasetCorruptor::new(settings.clone())?;

    let mut datasets = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.file_name().ok_or_else(|| {
            NoiseError::Tsv(format!("{} does not name a file", input.display()))
        })?;
        let dataset = tsv::read_dataset(input)?;
        log::info!("Loaded {} records from {}", dataset.len(), input.display());
        datasets.push((input, output_dir.join(name), dataset));
    }

    let mut reports = Vec::with_capacity(datasets.len());
    for (input, _, dataset) in datasets.iter_mut() {
        let report = corruptor.corrupt(dataset)?;
        reports.push(report.with_source(input.display().to_string()));
    }

    for (_, output, dataset) in &datasets {
        tsv::write_dataset(dataset, output)?;
        log::info!("Wrote {}", output.display());
    }

    Ok(reports)
}
