use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::error::Error;
use negcycle_core::cycle::DirectedCycle;
use negcycle_core::hole::Hole;
use negcycle_core::matching::Matching;

/// Serializes solver results; the solvers never see the output format.
pub trait ResultWriter {
    fn write_negative_cycle(&mut self, found: bool, cycle: &[usize]) -> Result<(), Error>;

    fn write_shortest_paths(
        &mut self,
        distances: &[f64],
        parents: &[Option<usize>],
    ) -> Result<(), Error>;

    fn write_average_weight(&mut self, average: f64) -> Result<(), Error>;

    fn write_hole(&mut self, hole: Option<&Hole>) -> Result<(), Error>;

    fn write_directed_cycle(&mut self, cycle: Option<&DirectedCycle>) -> Result<(), Error>;

    fn write_matching(&mut self, matching: &Matching) -> Result<(), Error>;
}

/// Writes each result to a file, replacing previous contents.
pub struct FileResultWriter {
    path: PathBuf,
}

impl FileResultWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileResultWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_text(&self, text: &str) -> Result<(), Error> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        out.write_all(text.as_bytes())?;
        out.flush()?;
        info!("Wrote results to {}.", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct DistanceRow {
    vertex: usize,
    distance: String,
    parent: Option<usize>,
}

impl ResultWriter for FileResultWriter {
    fn write_negative_cycle(&mut self, found: bool, cycle: &[usize]) -> Result<(), Error> {
        self.write_text(&format!("{}\n{}\n", format_bool(found), format_list(cycle)))
    }

    /// CSV with header `vertex,distance,parent`; unreachable vertices show `inf`
    /// and the source an empty parent.
    fn write_shortest_paths(
        &mut self,
        distances: &[f64],
        parents: &[Option<usize>],
    ) -> Result<(), Error> {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        for (vertex, (&distance, &parent)) in distances.iter().zip(parents).enumerate() {
            wtr.serialize(DistanceRow {
                vertex,
                distance: format_float(distance),
                parent,
            })?;
        }
        wtr.flush()?;
        info!("Wrote {} distances to {}.", distances.len(), self.path.display());
        Ok(())
    }

    fn write_average_weight(&mut self, average: f64) -> Result<(), Error> {
        self.write_text(&format!("{}\n", format_float(average)))
    }

    /// `found`, length (`-1` when absent) and the vertex list, one per line.
    fn write_hole(&mut self, hole: Option<&Hole>) -> Result<(), Error> {
        let text = match hole {
            Some(hole) => format!(
                "{}\n{}\n{}\n",
                format_bool(true),
                hole.length,
                format_list(&hole.vertices)
            ),
            None => format!("{}\n-1\n[]\n", format_bool(false)),
        };
        self.write_text(&text)
    }

    /// Cost (`inf` when there is no cycle) and the vertex list.
    fn write_directed_cycle(&mut self, cycle: Option<&DirectedCycle>) -> Result<(), Error> {
        let text = match cycle {
            Some(cycle) => format!(
                "{}\n{}\n",
                format_float(cycle.cost),
                format_list(&cycle.vertices)
            ),
            None => format!("{}\n[]\n", format_float(f64::INFINITY)),
        };
        self.write_text(&text)
    }

    /// One `proposer,receiver` line per receiver.
    fn write_matching(&mut self, matching: &Matching) -> Result<(), Error> {
        let text: String = matching
            .pairs()
            .map(|(proposer, receiver)| format!("{},{}\n", proposer, receiver))
            .collect();
        self.write_text(&text)
    }
}

fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// `[1, 2, 3]`, or `[]` when empty.
pub fn format_list(values: &[usize]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Floats always carry a decimal point; infinities print as `inf`.
pub fn format_float(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 { "inf".into() } else { "-inf".into() }
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn negative_cycle_output() {
        let dir = tempdir().unwrap();
        let mut writer = FileResultWriter::new(dir.path().join("out.txt"));

        writer.write_negative_cycle(true, &[1, 2, 0]).unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "True\n[1, 2, 0]\n");
    }

    #[test]
    fn no_negative_cycle_output() {
        let dir = tempdir().unwrap();
        let mut writer = FileResultWriter::new(dir.path().join("out.txt"));

        writer.write_negative_cycle(false, &[]).unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "False\n[]\n");
    }

    #[test]
    fn shortest_paths_csv() {
        let dir = tempdir().unwrap();
        let mut writer = FileResultWriter::new(dir.path().join("paths.csv"));

        writer
            .write_shortest_paths(&[0.0, 3.5, f64::INFINITY], &[None, Some(0), None])
            .unwrap();

        assert_eq!(
            fs::read_to_string(writer.path()).unwrap(),
            "vertex,distance,parent\n0,0.0,\n1,3.5,0\n2,inf,\n"
        );
    }

    #[test]
    fn hole_output() {
        let dir = tempdir().unwrap();
        let mut writer = FileResultWriter::new(dir.path().join("hole.txt"));

        let hole = Hole {
            length: 3,
            vertices: vec![0, 1, 2],
        };
        writer.write_hole(Some(&hole)).unwrap();
        assert_eq!(
            fs::read_to_string(writer.path()).unwrap(),
            "True\n3\n[0, 1, 2]\n"
        );

        writer.write_hole(None).unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "False\n-1\n[]\n");
    }

    #[test]
    fn directed_cycle_output() {
        let dir = tempdir().unwrap();
        let mut writer = FileResultWriter::new(dir.path().join("cycle.txt"));

        let cycle = DirectedCycle {
            cost: 3.0,
            vertices: vec![1, 2, 3],
        };
        writer.write_directed_cycle(Some(&cycle)).unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "3.0\n[1, 2, 3]\n");

        writer.write_directed_cycle(None).unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "inf\n[]\n");
    }

    #[test]
    fn matching_output() {
        let dir = tempdir().unwrap();
        let mut writer = FileResultWriter::new(dir.path().join("match.txt"));

        let matching = Matching {
            receiver_to_proposer: vec![1, 0],
        };
        writer.write_matching(&matching).unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "1,0\n0,1\n");
    }

    #[test]
    fn average_weight_output() {
        let dir = tempdir().unwrap();
        let mut writer = FileResultWriter::new(dir.path().join("avg.txt"));

        writer.write_average_weight(2.5).unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "2.5\n");
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }
}
