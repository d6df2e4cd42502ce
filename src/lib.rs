//! Readers for CVRP problem, solution and evolution files, and the charts
//! drawn from them.

pub use cvrp::{read_evolution, read_problem, read_solution, Error, Result};
pub use logging::{init_logging, try_init_logging};

pub mod cvrp;
pub mod render;

mod logging;
