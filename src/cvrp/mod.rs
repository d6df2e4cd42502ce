pub use error::{Error, Result};
pub use evolution::{read_evolution, EvolutionLog, Generation};
pub use problem::{read_problem, Coordinates, Metadata, NodeCoordinate, Problem};
pub use solution::{read_solution, Route, Solution};
pub use stats::{route_length, EvolutionStatistics, RouteStatistics};

pub mod evolution;
pub mod problem;
pub mod solution;
pub mod stats;

mod error;
mod utils;
