//! Two-stage worker pipeline from discovered files to rewritten files
//!
//! Stage A classifies files: it picks a handler by extension and has the
//! host read the file as a page. Stage B resolves each page to its file on
//! disk and runs the read-convert-write cycle. Both pools have the same size
//! and talk only through two bounded queues.
//!
//! Shutdown is ordered: the file queue closes once every file is enqueued,
//! the page queue closes only after every Stage A worker has been joined,
//! and the run ends when every Stage B worker has been joined. Closing the
//! page queue any earlier would lose pages still held by Stage A.
//!
//! A panic while handling one item is caught inside the worker loop and
//! counted like any other per-file failure.

use crate::config::Config;
use crate::core::ConversionOutcome;
use crate::error::Result;
use crate::handler::PageHandler;
use crate::ops::convert_file;
use crate::site::{Page, Site, SourceFile};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info, warn};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

/// Workers per stage for each unit of parallelism
pub const FAN_OUT: usize = 4;

/// Counts reported after a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    /// Files no handler accepts
    pub unsupported: usize,
    /// Files the host failed to read as pages
    pub unreadable: usize,
    /// Pages handed to Stage B
    pub classified: usize,
    pub converted: usize,
    /// Pages without a usable date
    pub unchanged: usize,
    /// Pages whose conversion failed
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Pages Stage B actually worked on
    pub fn attempted(&self) -> usize {
        self.converted + self.unchanged + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} converted, {} unchanged, {} failed, {} unsupported, {} unreadable in {:.2?}",
            self.discovered,
            self.converted,
            self.unchanged,
            self.failed,
            self.unsupported,
            self.unreadable,
            self.elapsed
        )
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The host found nothing to process
    NoFiles,
    Completed(RunSummary),
}

#[derive(Debug, Default)]
struct ClassifyTally {
    unsupported: usize,
    unreadable: usize,
    classified: usize,
}

#[derive(Debug, Default)]
struct ConvertTally {
    converted: usize,
    unchanged: usize,
    failed: usize,
}

/// Classify one discovered file.
///
/// `Ok(None)` means no handler takes the file's extension; a warning has
/// been logged and the file drops out of the run.
pub fn classify<S: Site + ?Sized>(site: &S, file: &SourceFile) -> Result<Option<Page>> {
    match PageHandler::for_extension(file.extension()) {
        Some(handler) => handler.read(site, file).map(Some),
        None => {
            warn!(
                "Unsupported file type {:?}: {}",
                file.extension(),
                file.path().display()
            );
            Ok(None)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs every discovered file of a site through both stages
pub struct Pipeline<'a, S: Site + ?Sized> {
    site: &'a S,
    config: &'a Config,
    workers: usize,
}

impl<'a, S: Site + ?Sized> Pipeline<'a, S> {
    /// Pool size is `max(1, parallelism) * FAN_OUT` per stage.
    pub fn new(site: &'a S, config: &'a Config) -> Self {
        Self {
            site,
            config,
            workers: config.parallelism.max(1) * FAN_OUT,
        }
    }

    /// Override the pool size of each stage (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process every file the site reports.
    ///
    /// Only a discovery failure is returned as an error; per-file failures
    /// are logged and counted.
    pub fn run(&self) -> Result<RunOutcome> {
        let started = Instant::now();

        let files = self.site.files()?;
        if files.is_empty() {
            warn!("No content files found");
            return Ok(RunOutcome::NoFiles);
        }

        let discovered = files.len();
        info!(
            "Processing {} files with {} workers per stage",
            discovered, self.workers
        );

        let (file_tx, file_rx) = bounded::<SourceFile>(self.workers);
        let (page_tx, page_rx) = bounded::<Page>(self.workers);

        let (classified, converted) = thread::scope(|scope| {
            let classifiers: Vec<_> = (0..self.workers)
                .map(|id| {
                    let files = file_rx.clone();
                    let pages = page_tx.clone();
                    scope.spawn(move || self.run_classifier(id, files, pages))
                })
                .collect();

            let converters: Vec<_> = (0..self.workers)
                .map(|id| {
                    let pages = page_rx.clone();
                    scope.spawn(move || self.run_converter(id, pages))
                })
                .collect();

            drop(file_rx);
            drop(page_rx);

            for file in files {
                if file_tx.send(file).is_err() {
                    error!("All classifier workers stopped, abandoning remaining files");
                    break;
                }
            }
            drop(file_tx);

            let mut classified = ClassifyTally::default();
            for (id, handle) in classifiers.into_iter().enumerate() {
                match handle.join() {
                    Ok(tally) => {
                        classified.unsupported += tally.unsupported;
                        classified.unreadable += tally.unreadable;
                        classified.classified += tally.classified;
                    }
                    Err(_) => error!("Classifier {} panicked", id),
                }
            }
            drop(page_tx);

            let mut converted = ConvertTally::default();
            for (id, handle) in converters.into_iter().enumerate() {
                match handle.join() {
                    Ok(tally) => {
                        converted.converted += tally.converted;
                        converted.unchanged += tally.unchanged;
                        converted.failed += tally.failed;
                    }
                    Err(_) => error!("Converter {} panicked", id),
                }
            }

            (classified, converted)
        });

        let summary = RunSummary {
            discovered,
            unsupported: classified.unsupported,
            unreadable: classified.unreadable,
            classified: classified.classified,
            converted: converted.converted,
            unchanged: converted.unchanged,
            failed: converted.failed,
            elapsed: started.elapsed(),
        };
        info!("{}", summary);
        Ok(RunOutcome::Completed(summary))
    }

    fn run_classifier(
        &self,
        id: usize,
        files: Receiver<SourceFile>,
        pages: Sender<Page>,
    ) -> ClassifyTally {
        debug!("Classifier {} started", id);
        let mut tally = ClassifyTally::default();

        for file in files.iter() {
            let classified = panic::catch_unwind(AssertUnwindSafe(|| classify(self.site, &file)));
            let classified = match classified {
                Ok(classified) => classified,
                Err(payload) => {
                    error!(
                        "Classifier {} panicked on {}: {}",
                        id,
                        file.path().display(),
                        panic_message(&*payload)
                    );
                    tally.unreadable += 1;
                    continue;
                }
            };

            match classified {
                Ok(Some(page)) => {
                    tally.classified += 1;
                    if pages.send(page).is_err() {
                        error!("Classifier {}: no converter left to take pages", id);
                        break;
                    }
                }
                Ok(None) => tally.unsupported += 1,
                Err(e) => {
                    error!("Failed to read {}: {}", file.path().display(), e);
                    tally.unreadable += 1;
                }
            }
        }

        debug!("Classifier {} stopped", id);
        tally
    }

    fn run_converter(&self, id: usize, pages: Receiver<Page>) -> ConvertTally {
        debug!("Converter {} started", id);
        let mut tally = ConvertTally::default();

        for page in pages.iter() {
            debug!(
                "Converter {}: {} page {}",
                id,
                page.kind(),
                page.file_path().display()
            );
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                self.site
                    .resolve(&self.config.content_dir, page.file_path())
                    .and_then(|path| convert_file(&path, &self.config.date_format))
            }));
            let result = match result {
                Ok(result) => result,
                Err(payload) => {
                    error!(
                        "Converter {} panicked on {}: {}",
                        id,
                        page.file_path().display(),
                        panic_message(&*payload)
                    );
                    tally.failed += 1;
                    continue;
                }
            };

            match result {
                Ok(ConversionOutcome::Converted(_)) => tally.converted += 1,
                Ok(_) => tally.unchanged += 1,
                Err(e) => {
                    error!("Failed to convert {}: {}", page.file_path().display(), e);
                    tally.failed += 1;
                }
            }
        }

        debug!("Converter {} stopped", id);
        tally
    }
}
