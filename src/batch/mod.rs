//! Batch validation.
//!
//! Applies the single-address validate call to every item of a bulk input
//! (stdin lines or a CSV column) while isolating per-item failures.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchRunner`] | Drives one validate call per item, in input order |
//! | [`BatchStrategy`] | Sequential, or concurrent with a worker cap |
//! | [`ItemOutcome`] | Validated / failed / skipped, per item |
//! | [`BatchOutcome`] | Running tally by verdict plus failures |
//! | [`BatchReport`] | Tally, failure list, timing, cancellation flag |
//! | [`CsvBatch`] | CSV input with the verdict appended to each row |
//!
//! ## Example
//!
//! ```rust,no_run
//! use truelist::batch::{BatchRunner, ItemOutcome};
//! use truelist::TruelistClientBuilder;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> truelist::Result<()> {
//! let client = TruelistClientBuilder::new("tk_live_example").build()?;
//! let runner = BatchRunner::new(client);
//! let report = runner
//!     .run(["a@example.com", "", "b@example.com"], &CancellationToken::new(), |_, outcome| {
//!         if let ItemOutcome::Failed { email, error } = outcome {
//!             eprintln!("failed to validate {}: {}", email, error);
//!         }
//!         Ok(())
//!     })
//!     .await?;
//! println!("{} validated", report.outcome.total());
//! # Ok(())
//! # }
//! ```

mod csv_file;
mod outcome;
mod runner;

pub use csv_file::{default_output_path, find_email_column, CsvBatch, ERROR_MARKER, OUTPUT_COLUMNS};
pub use outcome::{BatchError, BatchOutcome, BatchReport, ItemOutcome};
pub use runner::{read_lines, BatchRunner, BatchStrategy};
