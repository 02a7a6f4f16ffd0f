use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::fs::File;
use std::path::{Path, PathBuf};

use super::error::Error;
use common::types::Edge;
use negcycle_core::GraphCSR;
use negcycle_core::matching::{Matching, Preferences};

/// Produces a graph from some external representation.
pub trait GraphLoader {
    fn load(&self) -> Result<GraphCSR, Error>;
}

/// Reads the comma-separated text format:
///
/// ```text
/// n            number of vertices, ids 0..n
/// m            number of directed edges (an undirected edge counts twice)
/// u,v[,w]      one edge per line; w defaults to 1
/// ```
pub struct TextGraphLoader {
    path: PathBuf,
}

impl TextGraphLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TextGraphLoader { path: path.into() }
    }
}

impl GraphLoader for TextGraphLoader {
    fn load(&self) -> Result<GraphCSR, Error> {
        let records = read_records(&self.path)?;
        let mut rows = records.iter();

        let (line, header) = rows.next().ok_or_else(|| self.parse_error(1, "missing vertex count"))?;
        let n = parse_count(&self.path, *line, header.get(0))?;

        let (line, header) = rows.next().ok_or_else(|| self.parse_error(2, "missing edge count"))?;
        let declared_m = parse_count(&self.path, *line, header.get(0))?;

        let mut edges: Vec<Edge> = Vec::with_capacity(declared_m);
        for (line, record) in rows {
            if record.len() < 2 || record.len() > 3 {
                return Err(self.parse_error(
                    *line,
                    &format!("expected `u,v` or `u,v,w`, found {} fields", record.len()),
                ));
            }
            let u = parse_vertex(&self.path, *line, record.get(0), n)?;
            let v = parse_vertex(&self.path, *line, record.get(1), n)?;
            let weight = match record.get(2) {
                Some(raw) => raw
                    .parse::<f64>()
                    .map_err(|e| self.parse_error(*line, &format!("bad weight `{}`: {}", raw, e)))?,
                None => 1.0,
            };
            edges.push((u, v, weight));
        }

        if edges.len() != declared_m {
            warn!(
                "{}: header declares {} edges but {} were read.",
                self.path.display(),
                declared_m,
                edges.len()
            );
        }
        debug!(
            "Loaded graph from {} with {} vertices and {} edges.",
            self.path.display(),
            n,
            edges.len()
        );

        Ok(GraphCSR::from_edges(n, &mut edges)?)
    }
}

impl TextGraphLoader {
    fn parse_error(&self, line: usize, message: &str) -> Error {
        Error::ParseError {
            path: self.path.clone(),
            line,
            message: message.to_string(),
        }
    }
}

/// Reads a file holding a single vertex id.
pub fn read_source(path: &Path) -> Result<usize, Error> {
    let records = read_records(path)?;
    let (line, record) = records.first().ok_or_else(|| Error::ParseError {
        path: path.to_path_buf(),
        line: 1,
        message: "missing source vertex".into(),
    })?;
    parse_count(path, *line, record.get(0))
}

/// Reads both preference files: line 1 holds `N`, then one ranked list per line.
pub fn read_preferences(proposer_path: &Path, receiver_path: &Path) -> Result<Preferences, Error> {
    let (n, proposers) = read_preference_file(proposer_path)?;
    let (n_receivers, receivers) = read_preference_file(receiver_path)?;

    if n != n_receivers {
        return Err(Error::ParseError {
            path: receiver_path.to_path_buf(),
            line: 1,
            message: format!("side sizes differ: {} vs {}", n, n_receivers),
        });
    }

    Ok(Preferences::new(n, proposers, receivers)?)
}

fn read_preference_file(path: &Path) -> Result<(usize, Vec<Vec<usize>>), Error> {
    let records = read_records(path)?;
    let mut rows = records.iter();

    let (line, header) = rows.next().ok_or_else(|| Error::ParseError {
        path: path.to_path_buf(),
        line: 1,
        message: "missing size line".into(),
    })?;
    let n = parse_count(path, *line, header.get(0))?;

    let lists = rows
        .map(|(line, record)| {
            record
                .iter()
                .map(|field| parse_vertex(path, *line, Some(field), n))
                .collect::<Result<Vec<usize>, Error>>()
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok((n, lists))
}

/// Reads `proposer,receiver` lines into a receiver-indexed matching.
///
/// Receivers that never appear are left unmatched (`usize::MAX`), which makes the
/// matching unstable rather than unreadable.
pub fn read_matching(path: &Path, n: usize) -> Result<Matching, Error> {
    let mut receiver_to_proposer = vec![usize::MAX; n];

    for (line, record) in read_records(path)? {
        let proposer = parse_vertex(path, line, record.get(0), n)?;
        let receiver = parse_vertex(path, line, record.get(1), n)?;
        if receiver_to_proposer[receiver] != usize::MAX {
            return Err(Error::ParseError {
                path: path.to_path_buf(),
                line,
                message: format!("receiver {} matched twice", receiver),
            });
        }
        receiver_to_proposer[receiver] = proposer;
    }

    Ok(Matching {
        receiver_to_proposer,
    })
}

/// All non-empty records of a headerless, comma-separated file with their line numbers.
fn read_records(path: &Path) -> Result<Vec<(usize, StringRecord)>, Error> {
    let file = File::open(path)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        records.push((line, record));
    }
    Ok(records)
}

/// Parses a non-negative integer; integral floats such as `3.0` are accepted.
fn parse_count(path: &Path, line: usize, field: Option<&str>) -> Result<usize, Error> {
    let raw = field.unwrap_or_default();
    if let Ok(value) = raw.parse::<usize>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 => {
            Ok(value as usize)
        }
        _ => Err(Error::ParseError {
            path: path.to_path_buf(),
            line,
            message: format!("expected a non-negative integer, found `{}`", raw),
        }),
    }
}

fn parse_vertex(path: &Path, line: usize, field: Option<&str>, n: usize) -> Result<usize, Error> {
    let vertex = parse_count(path, line, field)?;
    if vertex >= n {
        return Err(Error::ParseError {
            path: path.to_path_buf(),
            line,
            message: format!("vertex {} is outside 0..{}", vertex, n),
        });
    }
    Ok(vertex)
}
