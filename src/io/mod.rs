pub mod formatter;
pub mod fs;

pub use formatter::{parse, render};
pub use fs::{absolutize, normalize, read_bytes, write_atomic};
