//! CSV batch mode: validate one column of a file and append the verdict to each row.

use super::outcome::{BatchReport, ItemOutcome};
use super::runner::BatchRunner;
use crate::client::EmailValidator;
use crate::{Error, ErrorContext, Result};
use csv::{ByteRecord, StringRecord};
use futures::stream;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Columns appended to every output row.
pub const OUTPUT_COLUMNS: [&str; 3] = [
    "truelist_state",
    "truelist_sub_state",
    "truelist_suggestion",
];

/// Marker written in the state column for rows whose validation failed.
pub const ERROR_MARKER: &str = "error";

const EMAIL_COLUMN_CANDIDATES: [&str; 5] =
    ["email", "email_address", "emailaddress", "e-mail", "mail"];

/// Locate the email column.
///
/// An explicit `column` is matched case-insensitively against trimmed header
/// names; otherwise the first well-known email header wins.
pub fn find_email_column(header: &StringRecord, column: Option<&str>) -> Result<usize> {
    if let Some(wanted) = column.filter(|c| !c.trim().is_empty()) {
        let wanted = wanted.trim();
        return header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::configuration_with_context(
                    format!("column {:?} not found in CSV header", wanted),
                    ErrorContext::new().with_field_path("column"),
                )
            });
    }

    header
        .iter()
        .position(|h| {
            let normalized = h.trim().to_ascii_lowercase();
            EMAIL_COLUMN_CANDIDATES.contains(&normalized.as_str())
        })
        .ok_or_else(|| {
            Error::configuration_with_context(
                "could not detect email column; use --column to specify it",
                ErrorContext::new().with_field_path("column"),
            )
        })
}

/// `emails.csv` becomes `emails_validated.csv` in the same directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_validated.{}", stem, ext.to_string_lossy()),
        None => format!("{}_validated", stem),
    };
    input.with_file_name(name)
}

/// A fully read CSV input, ready to be validated row by row.
///
/// Cells are kept as raw bytes and written back unchanged, so a file in a
/// legacy encoding still round-trips. Only the email cell is decoded, lossily.
#[derive(Debug, Clone)]
pub struct CsvBatch {
    header: ByteRecord,
    rows: Vec<ByteRecord>,
    email_column: usize,
}

impl CsvBatch {
    /// Read the header and every row up front. Malformed CSV structure is fatal;
    /// cell encoding is not.
    pub fn read<R: Read>(reader: R, column: Option<&str>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let header = reader.byte_headers()?.clone();
        if header.is_empty() {
            return Err(Error::configuration_with_context(
                "could not read CSV header",
                ErrorContext::new().with_details("file is empty"),
            ));
        }
        let email_column = find_email_column(&lossy_record(&header), column)?;

        let rows = reader
            .byte_records()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        Ok(Self {
            header,
            rows,
            email_column,
        })
    }

    pub fn email_column(&self) -> usize {
        self.email_column
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validate every row and write the augmented CSV to `writer`.
    ///
    /// Rows are written in input order. Short rows and blank cells get three
    /// empty columns, failed rows get [`ERROR_MARKER`] plus the error message.
    /// `on_row` runs after each row is written. Write failures abort the run.
    pub async fn process<V, W, F>(
        &self,
        runner: &BatchRunner<V>,
        writer: W,
        cancel: &CancellationToken,
        mut on_row: F,
    ) -> Result<BatchReport>
    where
        V: EmailValidator,
        W: Write,
        F: FnMut(usize, &ItemOutcome),
    {
        let mut out = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        out.write_record(
            self.header
                .iter()
                .chain(OUTPUT_COLUMNS.iter().map(|c| c.as_bytes())),
        )?;

        let column = self.email_column;
        let cells = self.rows.iter().map(|row| {
            Ok(row
                .get(column)
                .map(|cell| String::from_utf8_lossy(cell).into_owned())
                .unwrap_or_default())
        });

        let report = runner
            .run_stream(stream::iter(cells), cancel, |index, outcome| {
                let extra = augment(outcome);
                let row = &self.rows[index];
                out.write_record(row.iter().chain(extra.iter().map(String::as_bytes)))?;
                on_row(index, outcome);
                Ok(())
            })
            .await?;

        out.flush()?;
        Ok(report)
    }
}

fn lossy_record(record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field))
        .collect()
}

fn augment(outcome: &ItemOutcome) -> [String; 3] {
    match outcome {
        ItemOutcome::Validated(result) => [
            result.state.clone(),
            result.sub_state.clone(),
            result.suggestion.clone().unwrap_or_default(),
        ],
        ItemOutcome::Failed { error, .. } => {
            [ERROR_MARKER.to_string(), error.to_string(), String::new()]
        }
        ItemOutcome::Skipped => Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_find_email_column_auto_detect() {
        let h = header(&["id", " E-Mail ", "name"]);
        assert_eq!(find_email_column(&h, None).unwrap(), 1);

        let h = header(&["Email_Address", "email"]);
        assert_eq!(find_email_column(&h, None).unwrap(), 0);
    }

    #[test]
    fn test_find_email_column_explicit() {
        let h = header(&["id", "Contact", "email"]);
        assert_eq!(find_email_column(&h, Some("contact")).unwrap(), 1);

        let err = find_email_column(&h, Some("work_email")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "column \"work_email\" not found in CSV header"
        );
    }

    #[test]
    fn test_find_email_column_missing() {
        let h = header(&["id", "name"]);
        let err = find_email_column(&h, None).unwrap_err();
        assert!(err.to_string().contains("could not detect email column"));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/emails.csv")),
            PathBuf::from("data/emails_validated.csv")
        );
        assert_eq!(
            default_output_path(Path::new("list")),
            PathBuf::from("list_validated")
        );
    }

    #[test]
    fn test_read_keeps_short_rows() {
        let input = "name,email\nAnn,ann@x.io\nBob\n";
        let batch = CsvBatch::read(input.as_bytes(), None).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.email_column(), 1);
    }

    #[test]
    fn test_read_empty_input() {
        let err = CsvBatch::read("".as_bytes(), None).unwrap_err();
        assert!(err.to_string().starts_with("could not read CSV header"));
    }

    #[test]
    fn test_augment_failed_row() {
        let outcome = ItemOutcome::Failed {
            email: "a@b.co".into(),
            error: Error::Unauthorized,
        };
        assert_eq!(
            augment(&outcome),
            [
                "error".to_string(),
                "unauthorized: check your API key".to_string(),
                String::new()
            ]
        );
        assert_eq!(augment(&ItemOutcome::Skipped), <[String; 3]>::default());
    }

    #[test]
    fn test_read_tolerates_non_utf8_cells() {
        let input: &[u8] = b"name,email\nann,ann@x.io\nRen\xE9,rene@x.io\nbob,bob@x.io\n";
        let batch = CsvBatch::read(input, None).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.email_column(), 1);
        assert_eq!(&batch.rows[1][0], b"Ren\xE9");
    }

    #[test]
    fn test_read_detects_column_in_non_utf8_header() {
        let input: &[u8] = b"n\xE4me,Email\nann,ann@x.io\n";
        let batch = CsvBatch::read(input, None).unwrap();
        assert_eq!(batch.email_column(), 1);
    }
}
