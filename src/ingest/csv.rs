use std::io::Read;
use std::path::PathBuf;

use crate::error::{GraphError, Result};
use crate::ingest::edge_list::{Edge, ParseOptions, parse_fields};

/// Streams `(u, v)` pairs out of a headerless comma-separated edge list.
///
/// Records are read as bytes so a line that is not valid UTF-8 still reports
/// its content. A line holding only whitespace counts as blank; any other
/// record must be exactly two non-negative integers.
pub struct CsvEdgeReader<R> {
    records: csv::ByteRecordsIntoIter<R>,
    skipped: u64,
    source: PathBuf,
}

impl<R: Read> CsvEdgeReader<R> {
    pub fn new(reader: R, options: &ParseOptions) -> Self {
        let csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(options.allow_comments.then_some(b'#'))
            .from_reader(reader);
        Self {
            records: csv_reader.into_byte_records(),
            skipped: 0,
            source: PathBuf::from("<stream>"),
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = path.into();
        self
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn convert_error(&self, err: csv::Error) -> GraphError {
        let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => GraphError::io(&self.source, e),
            other => GraphError::Parse {
                line,
                content: String::new(),
                reason: format!("{other:?} (line content unavailable)"),
            },
        }
    }
}

impl<R: Read> Iterator for CsvEdgeReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(self.convert_error(e))),
            };
            // the csv reader drops empty lines itself, a whitespace-only one trims to a single ""
            if record.len() == 1 && record[0].is_empty() {
                self.skipped += 1;
                continue;
            }
            break record;
        };

        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let content = record
            .iter()
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(",");
        let fields = match record
            .iter()
            .map(std::str::from_utf8)
            .collect::<std::result::Result<Vec<_>, _>>()
        {
            Ok(fields) => fields,
            Err(e) => {
                return Some(Err(GraphError::Parse {
                    line,
                    content,
                    reason: format!("invalid UTF-8: {e}"),
                }));
            }
        };
        Some(parse_fields(line, &content, fields.into_iter()))
    }
}
