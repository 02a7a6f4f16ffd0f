use log::{debug, info, warn};
use std::io;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{error::Error, types::SweepRow};
use negcycle_core::{GraphCSR, traits::GraphSolver};

/// Runs a [`GraphSolver`] from many sources over one shared, immutable graph.
///
/// Each source is solved in its own blocking task; at most `max_concurrency`
/// run at once.
pub struct CycleSweep<S> {
    solver: Arc<S>,
    graph: Arc<GraphCSR>,
    max_concurrency: usize,
}

impl<S> CycleSweep<S>
where
    S: GraphSolver + Send + Sync + 'static,
{
    pub fn new(graph: Arc<GraphCSR>, solver: S, max_concurrency: usize) -> Self {
        CycleSweep {
            solver: Arc::new(solver),
            graph,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Solves every source and returns one row per source, ordered by source.
    ///
    /// The first solver error aborts the sweep.
    pub async fn run(&self, sources: &[usize]) -> Result<Vec<SweepRow>, Error> {
        info!(
            "Sweeping {} sources with up to {} workers.",
            sources.len(),
            self.max_concurrency
        );

        let limiter = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for &source in sources {
            let permit = limiter
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| Error::LimiterClosed)?;
            let solver = Arc::clone(&self.solver);
            let graph = Arc::clone(&self.graph);

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let result = solver.find_negative_cycle(&graph, source);
                (source, result)
            });
        }

        let mut rows = Vec::with_capacity(sources.len());
        while let Some(joined) = tasks.join_next().await {
            let (source, result) = joined?;
            match result {
                Ok(cycle) => {
                    debug!("Source {}: cycle found = {}.", source, cycle.is_some());
                    rows.push(SweepRow::new(source, cycle.as_ref()));
                }
                Err(e) => {
                    warn!("Source {}: solver failed: {}.", source, e);
                    tasks.abort_all();
                    return Err(e.into());
                }
            }
        }

        rows.sort_by_key(|row| row.source);
        Ok(rows)
    }
}

/// Writes sweep rows as CSV with a header line.
pub fn write_rows<W: io::Write>(rows: &[SweepRow], out: W) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use negcycle_core::traits::BellmanFordSolver;

    fn shared_graph() -> Arc<GraphCSR> {
        // 0 -> 1 -> 2 -> 1 is a negative cycle; 3 only reaches itself.
        let mut edges = vec![(0, 1, 1.0), (1, 2, -3.0), (2, 1, 1.0), (3, 3, 2.0)];
        Arc::new(GraphCSR::from_edges(4, &mut edges).unwrap())
    }

    #[tokio::test]
    async fn rows_follow_source_order() {
        let sweep = CycleSweep::new(shared_graph(), BellmanFordSolver, 2);

        let rows = sweep.run(&[3, 0, 2, 1]).await.unwrap();

        let sources: Vec<usize> = rows.iter().map(|r| r.source).collect();
        assert_eq!(sources, vec![0, 1, 2, 3]);
        assert!(rows[0].found && rows[1].found && rows[2].found);
        assert!(!rows[3].found);
        assert_eq!(rows[0].cycle_len, 2);
        assert_eq!(rows[0].cycle_weight, Some(-2.0));
    }

    #[tokio::test]
    async fn single_worker_gives_same_rows() {
        let graph = shared_graph();
        let sources: Vec<usize> = (0..graph.num_nodes).collect();

        let serial = CycleSweep::new(graph.clone(), BellmanFordSolver, 1)
            .run(&sources)
            .await
            .unwrap();
        let parallel = CycleSweep::new(graph, BellmanFordSolver, 4)
            .run(&sources)
            .await
            .unwrap();

        assert_eq!(serial, parallel);
    }

    #[tokio::test]
    async fn unknown_source_aborts_sweep() {
        let sweep = CycleSweep::new(shared_graph(), BellmanFordSolver, 2);

        let result = sweep.run(&[0, 9]).await;

        assert!(matches!(
            result,
            Err(Error::GraphError(common::error::Error::NodeIndexOutOfBounds(9)))
        ));
    }

    #[test]
    fn rows_serialize_as_csv() {
        let rows = vec![
            SweepRow {
                source: 0,
                found: true,
                cycle_len: 2,
                cycle_weight: Some(-2.0),
                cycle: "1 2".into(),
            },
            SweepRow {
                source: 3,
                found: false,
                cycle_len: 0,
                cycle_weight: None,
                cycle: String::new(),
            },
        ];
        let mut out = Vec::new();

        write_rows(&rows, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "source,found,cycle_len,cycle_weight,cycle\n0,true,2,-2.0,1 2\n3,false,0,,\n"
        );
    }
}
