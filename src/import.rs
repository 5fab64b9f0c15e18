//! CSV import into a [`Catalog`]
//!
//! One record per physical line, comma separated, no header row and no
//! quoting: `"` is ordinary field data. Two schemas:
//!
//! - `with-id` (default): `id,title,author,genre,publisher,year,pages`
//! - `generated-id`: `title,author,genre,publisher,year,pages`, ids generated
//!   by the catalog
//!
//! Lines that do not parse, fail field validation, or collide with an existing
//! id are skipped and recorded in the [`ImportReport`]; they never abort the
//! import. Only a source that cannot be opened or read is an error.

use crate::catalog::{Book, BookDraft, Catalog};
use crate::error::{CatalogError, Result};
use csv::{ByteRecord, ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};
use validator::Validate;

/// Column layout of an import source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportSchema {
    /// `id,title,author,genre,publisher,year,pages`
    #[default]
    WithId,
    /// `title,author,genre,publisher,year,pages`
    GeneratedId,
}

static WITH_ID_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "author",
    "genre",
    "publisher",
    "year",
    "pages",
];

impl ImportSchema {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ImportSchema::WithId => &WITH_ID_COLUMNS,
            ImportSchema::GeneratedId => &WITH_ID_COLUMNS[1..],
        }
    }

    pub fn field_count(&self) -> usize {
        self.columns().len()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportSchema::WithId => "with-id",
            ImportSchema::GeneratedId => "generated-id",
        }
    }
}

impl fmt::Display for ImportSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportSchema {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "with-id" | "with_id" | "withid" => Ok(ImportSchema::WithId),
            "generated-id" | "generated_id" | "generatedid" => Ok(ImportSchema::GeneratedId),
            _ => Err(CatalogError::InvalidConfig(format!(
                "unknown import schema '{}' (expected with-id or generated-id)",
                s
            ))),
        }
    }
}

/// A record parsed from one line, not yet inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Id taken from the line
    Book(Book),
    /// Id to be generated on insert
    Draft(BookDraft),
}

/// A successfully parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// 1-based line number in the source
    pub line: u64,
    pub content: String,
    pub candidate: Candidate,
}

/// Why a line was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    /// Wrong field count or a non-numeric number field
    Malformed,
    /// A text field was empty or too long
    Invalid,
    /// The id was already in the catalog
    Duplicate,
    /// No free id was left to generate
    IdSpaceExhausted,
}

impl From<&CatalogError> for SkipKind {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::DuplicateKey(_) => SkipKind::Duplicate,
            CatalogError::InvalidRecord(_) => SkipKind::Invalid,
            CatalogError::IdSpaceExhausted { .. } => SkipKind::IdSpaceExhausted,
            _ => SkipKind::Malformed,
        }
    }
}

/// A dropped line and the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: u64,
    pub content: String,
    pub kind: SkipKind,
    pub message: String,
}

impl SkippedLine {
    fn new(line: u64, content: String, err: &CatalogError) -> Self {
        SkippedLine {
            line,
            content,
            kind: SkipKind::from(err),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.message, self.content)
    }
}

/// Result of parsing a source, before touching a catalog
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub lines: Vec<ParsedLine>,
    pub skipped: Vec<SkippedLine>,
}

/// Outcome of an import
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Records inserted into the catalog
    pub imported: usize,
    /// Lines dropped, in source order
    pub skipped: Vec<SkippedLine>,
}

impl ImportReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Skipped lines of one kind
    pub fn skipped_by(&self, kind: SkipKind) -> impl Iterator<Item = &SkippedLine> {
        self.skipped.iter().filter(move |s| s.kind == kind)
    }
}

/// Import a CSV file into `catalog`
///
/// Fails with `Io` if the file cannot be opened or read; in that case the
/// catalog is not modified.
pub fn bulk_load<P: AsRef<Path>>(
    path: P,
    catalog: &mut Catalog,
    schema: ImportSchema,
) -> Result<ImportReport> {
    let path = path.as_ref();
    info!("Importing books from {:?} ({} schema)", path, schema);
    let file = File::open(path)?;
    load_reader(file, catalog, schema)
}

/// Import CSV text from any reader into `catalog`
///
/// The whole source is parsed before the first insert, so a read failure
/// leaves the catalog untouched.
pub fn load_reader<R: Read>(
    reader: R,
    catalog: &mut Catalog,
    schema: ImportSchema,
) -> Result<ImportReport> {
    let parsed = parse_source(reader, schema)?;
    Ok(apply(parsed, catalog))
}

/// Parse a CSV source into candidates and skipped lines
pub fn parse_source<R: Read>(reader: R, schema: ImportSchema) -> Result<ParsedSource> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedSource::default();
    let mut record = ByteRecord::new();

    loop {
        match csv.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                match err.into_kind() {
                    csv::ErrorKind::Io(io) => return Err(CatalogError::Io(io)),
                    other => {
                        // Any other reader error describes a single record
                        let err = CatalogError::MalformedLine {
                            line,
                            reason: format!("{:?}", other),
                        };
                        warn!("Skipping line {}: {}", line, err);
                        parsed.skipped.push(SkippedLine::new(line, String::new(), &err));
                        continue;
                    }
                }
            }
        }

        if record.len() == 1 && record.get(0).map_or(true, |f| f.is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let content = record_content(&record);

        match parse_record(&record, line, schema) {
            Ok(candidate) => parsed.lines.push(ParsedLine {
                line,
                content,
                candidate,
            }),
            Err(err) => {
                warn!("Skipping line {}: {}", line, err);
                parsed.skipped.push(SkippedLine::new(line, content, &err));
            }
        }
    }

    debug!(
        "Parsed {} candidate lines, {} skipped",
        parsed.lines.len(),
        parsed.skipped.len()
    );
    Ok(parsed)
}

/// Insert parsed candidates into `catalog`
///
/// Duplicate ids and exhausted id ranges are recorded as skipped lines.
pub fn apply(parsed: ParsedSource, catalog: &mut Catalog) -> ImportReport {
    let mut report = ImportReport {
        imported: 0,
        skipped: parsed.skipped,
    };

    for parsed_line in parsed.lines {
        let result = match parsed_line.candidate {
            Candidate::Book(book) => catalog.insert(book),
            Candidate::Draft(draft) => catalog.insert_draft(draft).map(|_| ()),
        };

        match result {
            Ok(()) => report.imported += 1,
            Err(err) => {
                warn!("Skipping line {}: {}", parsed_line.line, err);
                report
                    .skipped
                    .push(SkippedLine::new(parsed_line.line, parsed_line.content, &err));
            }
        }
    }

    report.skipped.sort_by_key(|s| s.line);
    info!(
        "Imported {} books, skipped {} lines",
        report.imported,
        report.skipped_count()
    );
    report
}

fn record_content(record: &ByteRecord) -> String {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_record(record: &ByteRecord, line: u64, schema: ImportSchema) -> Result<Candidate> {
    let expected = schema.field_count();
    if record.len() != expected {
        return Err(CatalogError::MalformedLine {
            line,
            reason: format!("expected {} fields, found {}", expected, record.len()),
        });
    }

    let fields = FieldReader {
        record,
        line,
        columns: schema.columns(),
    };

    // Column offsets below are relative to the draft fields
    let offset = expected - 6;
    let draft = BookDraft {
        title: fields.text(offset)?,
        author: fields.text(offset + 1)?,
        genre: fields.text(offset + 2)?,
        publisher: fields.text(offset + 3)?,
        year: fields.number(offset + 4)?,
        pages: fields.number(offset + 5)?,
    };

    match schema {
        ImportSchema::WithId => {
            let book = Book::from_draft(fields.number(0)?, draft);
            book.validate()?;
            Ok(Candidate::Book(book))
        }
        ImportSchema::GeneratedId => {
            draft.validate()?;
            Ok(Candidate::Draft(draft))
        }
    }
}

struct FieldReader<'a> {
    record: &'a ByteRecord,
    line: u64,
    columns: &'static [&'static str],
}

impl FieldReader<'_> {
    fn column(&self, index: usize) -> &'static str {
        self.columns.get(index).copied().unwrap_or("field")
    }

    fn raw(&self, index: usize) -> Result<&str> {
        let bytes = self
            .record
            .get(index)
            .ok_or_else(|| self.malformed(format!("missing {}", self.column(index))))?;
        std::str::from_utf8(bytes)
            .map_err(|_| self.malformed(format!("{} is not valid UTF-8", self.column(index))))
    }

    fn text(&self, index: usize) -> Result<String> {
        self.raw(index).map(str::to_owned)
    }

    fn number(&self, index: usize) -> Result<u32> {
        let raw = self.raw(index)?;
        raw.parse::<u32>().map_err(|_| {
            self.malformed(format!(
                "{} '{}' is not a non-negative integer",
                self.column(index),
                raw
            ))
        })
    }

    fn malformed(&self, reason: String) -> CatalogError {
        CatalogError::MalformedLine {
            line: self.line,
            reason,
        }
    }
}
