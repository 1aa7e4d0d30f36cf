use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::core::graph::GraphBuilder;
use crate::core::ids::ExternalId;
use crate::error::{GraphError, Result};
use crate::ingest::csv::CsvEdgeReader;

/// One parsed `(u, v)` pair.
pub type Edge = (ExternalId, ExternalId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeListFormat {
    /// `u v` per line, any run of spaces or tabs between the two.
    Whitespace,
    /// `u,v` per line.
    Csv,
}

impl EdgeListFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => EdgeListFormat::Csv,
            _ => EdgeListFormat::Whitespace,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Inferred from the file extension when unset.
    pub format: Option<EdgeListFormat>,
    /// Skip lines starting with `#` instead of rejecting them.
    pub allow_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            format: None,
            allow_comments: true,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub parsed: u64,
    pub skipped: u64,
}

/// Streams `(u, v)` pairs out of a whitespace edge list.
///
/// Blank lines (and comment lines when allowed) are skipped. Any other line
/// must hold exactly two non-negative integers or iteration yields a
/// [`GraphError::Parse`] carrying the 1-based line number and raw content.
pub struct EdgeListReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    skipped: u64,
    allow_comments: bool,
    source: PathBuf,
}

impl<R: BufRead> EdgeListReader<R> {
    pub fn new(reader: R, options: &ParseOptions) -> Self {
        Self {
            reader,
            buf: vec![],
            line_no: 0,
            skipped: 0,
            allow_comments: options.allow_comments,
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
}

impl<R: BufRead> Iterator for EdgeListReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(GraphError::io(&self.source, e))),
            }
            self.line_no += 1;

            let mut bytes = self.buf.as_slice();
            bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
            bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
            let line = match std::str::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(GraphError::Parse {
                        line: self.line_no,
                        content: String::from_utf8_lossy(bytes).into_owned(),
                        reason: format!("invalid UTF-8: {e}"),
                    }));
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || (self.allow_comments && trimmed.starts_with('#')) {
                self.skipped += 1;
                continue;
            }

            return Some(parse_fields(self.line_no, line, trimmed.split_whitespace()));
        }
    }
}

pub(crate) fn parse_fields<'a>(
    line: usize,
    content: &str,
    mut fields: impl Iterator<Item = &'a str>,
) -> Result<Edge> {
    let parse_error = |reason: String| GraphError::Parse {
        line,
        content: content.to_string(),
        reason,
    };

    let (Some(u), Some(v), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(parse_error("expected two node identifiers".to_string()));
    };
    let parse_id = |field: &str| {
        field
            .parse::<ExternalId>()
            .map_err(|e| parse_error(format!("invalid node identifier {field:?}: {e}")))
    };

    Ok((parse_id(u)?, parse_id(v)?))
}

/// Reads a whole edge list file into memory.
pub fn read_edge_list(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Vec<Edge>> {
    let mut edges = vec![];
    let mut collect = |src: ExternalId, dst: ExternalId| -> Result<()> {
        edges.push((src, dst));
        Ok(())
    };
    for_each_edge(path.as_ref(), options, &mut collect)?;
    Ok(edges)
}

/// Streams an edge list file straight into a builder.
pub fn ingest_edge_list(
    path: impl AsRef<Path>,
    options: &ParseOptions,
    builder: &mut GraphBuilder,
) -> Result<IngestStats> {
    for_each_edge(path.as_ref(), options, &mut |src: ExternalId, dst: ExternalId| {
        builder.add_edge(src, dst)
    })
}

fn for_each_edge(
    path: &Path,
    options: &ParseOptions,
    sink: &mut dyn FnMut(ExternalId, ExternalId) -> Result<()>,
) -> Result<IngestStats> {
    let file = File::open(path).map_err(|e| GraphError::io(path, e))?;
    let reader = BufReader::new(file);
    let format = options
        .format
        .unwrap_or_else(|| EdgeListFormat::from_path(path));

    match format {
        EdgeListFormat::Whitespace => {
            let mut edges = EdgeListReader::new(reader, options).with_source(path);
            let parsed = drain(&mut edges, sink)?;
            Ok(IngestStats {
                parsed,
                skipped: edges.skipped(),
            })
        }
        EdgeListFormat::Csv => {
            let mut edges = CsvEdgeReader::new(reader, options).with_source(path);
            let parsed = drain(&mut edges, sink)?;
            Ok(IngestStats {
                parsed,
                skipped: edges.skipped(),
            })
        }
    }
}

fn drain<I>(edges: I, sink: &mut dyn FnMut(ExternalId, ExternalId) -> Result<()>) -> Result<u64>
where
    I: Iterator<Item = Result<Edge>>,
{
    let mut parsed = 0;
    for edge in edges {
        let (src, dst) = edge?;
        sink(src, dst)?;
        parsed += 1;
    }
    Ok(parsed)
}
