use std::{io::Read, path::Path};

use serde::Deserialize;
use tracing::debug;

use super::{
    error::{Error, Result},
    utils::open,
};

/// One row of the solver's per-generation log.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Generation {
    pub generation: u64,
    pub best_cost: f64,
    pub temperature: f64,
    /// Generations since the best cost last changed.
    pub solution_counter: u64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EvolutionLog {
    pub generations: Vec<Generation>,
}

/// Reads `evolution_data.csv` style logs.
pub fn read_evolution(path: impl AsRef<Path>) -> Result<EvolutionLog> {
    let path = path.as_ref();
    let log = EvolutionLog::from_reader(open(path)?)?;
    debug!(path = %path.display(), generations = log.len(), "read evolution log");

    Ok(log)
}

impl EvolutionLog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let generations = reader
            .deserialize::<Generation>()
            .map(|record| record.map_err(csv_error))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { generations })
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn first(&self) -> Result<&Generation> {
        self.generations.first().ok_or(Error::EmptyLog)
    }

    pub fn last(&self) -> Result<&Generation> {
        self.generations.last().ok_or(Error::EmptyLog)
    }

    /// Cost decrease from the previous generation, `0` for the first one.
    pub fn improvements(&self) -> Vec<f64> {
        let mut previous = None;
        self.generations
            .iter()
            .map(|g| {
                let improvement = previous.map_or(0.0, |p: f64| p - g.best_cost);
                previous = Some(g.best_cost);
                improvement
            })
            .collect()
    }
}

fn csv_error(err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line() as usize);
    match err.into_kind() {
        csv::ErrorKind::Io(err) => Error::Io(err),
        kind => Error::parse(line, format!("{:?}", kind)),
    }
}
