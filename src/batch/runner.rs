//! Batch runner.

use super::outcome::{BatchReport, ItemOutcome};
use crate::client::EmailValidator;
use crate::{Error, Result};
use futures::stream::{self, Stream, StreamExt};
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    Sequential,
    Concurrent { max_concurrency: usize },
}

impl BatchStrategy {
    /// Pick a strategy from a worker count; 0 and 1 both mean sequential.
    pub fn from_concurrency(n: usize) -> Self {
        if n <= 1 {
            BatchStrategy::Sequential
        } else {
            BatchStrategy::Concurrent { max_concurrency: n }
        }
    }

    fn concurrency(&self) -> usize {
        match self {
            BatchStrategy::Sequential => 1,
            BatchStrategy::Concurrent { max_concurrency } => (*max_concurrency).max(1),
        }
    }
}

impl Default for BatchStrategy {
    fn default() -> Self {
        BatchStrategy::Sequential
    }
}

/// Applies a validator to each item of a bulk input.
///
/// A failing item is recorded and the run carries on. Only a failure to read
/// the input, or an error returned by the per-item callback, ends the run
/// with `Err`.
pub struct BatchRunner<V> {
    validator: V,
    strategy: BatchStrategy,
}

impl<V: EmailValidator> BatchRunner<V> {
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            strategy: BatchStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: BatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> BatchStrategy {
        self.strategy
    }

    async fn process(&self, cancel: &CancellationToken, raw: &str) -> ItemOutcome {
        let email = raw.trim();
        if email.is_empty() {
            return ItemOutcome::Skipped;
        }
        match self.validator.validate(cancel, email).await {
            Ok(result) => ItemOutcome::Validated(result),
            Err(error) => ItemOutcome::Failed {
                email: email.to_string(),
                error,
            },
        }
    }

    /// Run over a stream of lines or cells, in input order.
    ///
    /// `on_item` sees every outcome, `Skipped` included, with the item's input
    /// index. Outcomes are delivered in input order whatever the strategy.
    pub async fn run_stream<St, F>(
        &self,
        input: St,
        cancel: &CancellationToken,
        mut on_item: F,
    ) -> Result<BatchReport>
    where
        St: Stream<Item = std::io::Result<String>>,
        F: FnMut(usize, &ItemOutcome) -> Result<()>,
    {
        let start = Instant::now();
        let mut report = BatchReport::new();

        let outcomes = input
            .enumerate()
            .map(move |(index, line)| async move {
                let line = line?;
                Ok::<_, std::io::Error>((index, self.process(cancel, &line).await))
            })
            .buffered(self.strategy.concurrency());
        futures::pin_mut!(outcomes);

        while let Some(next) = outcomes.next().await {
            let (index, outcome) = next.map_err(Error::Io)?;

            if let ItemOutcome::Failed { email, error } = &outcome {
                // The item was interrupted, not rejected; leave it out of the tally.
                if error.is_cancelled() {
                    report.cancelled = true;
                    break;
                }
                warn!(index, email = email.as_str(), error = %error, "failed to validate");
            }

            report.record(index, &outcome);
            on_item(index, &outcome)?;

            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
        }

        report.execution_time = start.elapsed();
        info!(
            total = report.outcome.total(),
            valid = report.outcome.valid,
            invalid = report.outcome.invalid,
            risky = report.outcome.risky,
            unknown = report.outcome.unknown,
            failed = report.outcome.failed,
            skipped = report.skipped,
            cancelled = report.cancelled,
            duration_ms = report.execution_time.as_millis() as u64,
            "batch finished"
        );
        Ok(report)
    }

    /// Run over in-memory items; never fails on account of the items themselves.
    pub async fn run<I, S, F>(
        &self,
        items: I,
        cancel: &CancellationToken,
        on_item: F,
    ) -> Result<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(usize, &ItemOutcome) -> Result<()>,
    {
        let input = stream::iter(items.into_iter().map(|s| Ok(s.into())));
        self.run_stream(input, cancel, on_item).await
    }
}

/// Split a byte source into lines for [`BatchRunner::run_stream`].
///
/// Lines end at `\n` with an optional `\r` stripped. Invalid UTF-8 is replaced
/// rather than rejected, so a bad line fails on its own at validation time.
/// Only an I/O error from `reader` becomes an `Err` item.
pub fn read_lines<R>(reader: R) -> impl Stream<Item = std::io::Result<String>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold(reader.split(b'\n'), |mut segments| async move {
        match segments.next_segment().await {
            Ok(Some(raw)) => Some((Ok(decode_line(&raw)), segments)),
            Ok(None) => None,
            Err(e) => Some((Err(e), segments)),
        }
    })
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
