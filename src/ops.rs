//! The read-convert-write cycle applied to one content file

use crate::config::Config;
use crate::core::{apply_shamsi_date, ConversionOutcome};
use crate::error::{HoorError, Result};
use crate::io::{absolutize, formatter, read_bytes, write_atomic};
use log::{debug, info};
use std::path::Path;

/// Add the Shamsi date to the file at `path`, rewriting it in place.
///
/// The file is only written when the outcome is
/// [`ConversionOutcome::Converted`]; on any error it is left as it was.
pub fn convert_file(path: &Path, date_format: &str) -> Result<ConversionOutcome> {
    let bytes = read_bytes(path)?;

    let Some(mut content) = formatter::parse(&bytes).map_err(|e| e.at(path))? else {
        debug!("{}: no front matter", path.display());
        return Ok(ConversionOutcome::NoDate);
    };

    let outcome = apply_shamsi_date(&mut content, date_format).map_err(|e| e.at(path))?;
    match &outcome {
        ConversionOutcome::Converted(value) => {
            let rendered = formatter::render(&content).map_err(|e| e.at(path))?;
            write_atomic(path, &rendered)?;
            debug!(
                "{}: shamsi date {} in {:?} front matter",
                path.display(),
                value,
                content.delimiter()
            );
        }
        ConversionOutcome::NoDate => debug!("{}: no publish date", path.display()),
        ConversionOutcome::Unrenderable => {
            debug!("{}: date format rendered nothing", path.display())
        }
    }
    Ok(outcome)
}

/// Convert one explicitly named file on the calling thread.
///
/// Relative paths are taken from the current directory.
pub fn convert_single(input: &Path, config: &Config) -> Result<ConversionOutcome> {
    let path = absolutize(input)?;
    if !path.is_file() {
        return Err(HoorError::file_not_found(path));
    }

    info!("Converting {}", path.display());
    convert_file(&path, &config.date_format)
}
