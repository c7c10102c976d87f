//! hoor: add Shamsi (Solar Hijri) dates to static-site content files
//!
//! For every content file whose front matter carries a publish `date`, hoor
//! converts that date to the Shamsi calendar, renders it with Persian digits
//! and writes it back into the front matter as `shamsiDate`. Everything else
//! in the file, the body above all, is left exactly as it was.
//!
//! # Quick Start
//!
//! ## Converting a site
//!
//! ```rust,no_run
//! use hoor::{Config, FsSite, Pipeline, Result, RunOutcome};
//!
//! fn main() -> Result<()> {
//!     let config = Config::builder().source("my-site").build()?;
//!     let site = FsSite::new(&config.content_dir);
//!
//!     match Pipeline::new(&site, &config).run()? {
//!         RunOutcome::Completed(summary) => println!("{summary}"),
//!         RunOutcome::NoFiles => println!("nothing to do"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Converting one file
//!
//! ```rust,no_run
//! use hoor::{convert_single, Config, Result};
//!
//! fn main() -> Result<()> {
//!     let outcome = convert_single("content/posts/nowruz.md".as_ref(), &Config::default())?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Dates only
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hoor::core::{persianize_numbers, to_shamsi_string};
//!
//! let nowruz = NaiveDate::from_ymd_opt(2021, 3, 21).unwrap();
//! assert_eq!(to_shamsi_string(nowruz, "dd MM yyyy"), "۰۱ ۰۱ ۱۴۰۰");
//! assert_eq!(persianize_numbers("page 12"), "page ۱۲");
//! ```
//!
//! # Architecture
//!
//! - [`core`]: calendar conversion, digit localization and the front matter transform
//! - [`io`]: front matter codec and atomic file writes
//! - [`site`]: the host contract ([`Site`]) and its filesystem implementation
//! - [`handler`]: extension to page kind dispatch
//! - [`pipeline`]: the two-stage worker pipeline
//! - [`ops`]: the per-file read-convert-write cycle
//! - [`config`]: run configuration
//! - [`error`]: error types

pub use config::{Config, ConfigBuilder};
pub use core::{ConversionOutcome, ParsedContent, ShamsiDate};
pub use error::{HoorError, Result};
pub use handler::{PageHandler, PageKind};
pub use ops::{convert_file, convert_single};
pub use pipeline::{Pipeline, RunOutcome, RunSummary};
pub use site::{FsSite, Page, Site, SourceFile};

pub mod config;
pub mod core;
pub mod error;
pub mod handler;
pub mod io;
pub mod ops;
pub mod pipeline;
pub mod site;
