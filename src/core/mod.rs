pub mod calendar;
pub mod digits;
pub mod front_matter;

pub use calendar::{to_shamsi_string, ShamsiDate, DEFAULT_DATE_FORMAT};
pub use digits::persianize_numbers;
pub use front_matter::{
    apply_shamsi_date, parse_publish_date, ConversionOutcome, Delimiter, Metadata, ParsedContent,
    DATE_KEY, SHAMSI_DATE_KEY,
};
