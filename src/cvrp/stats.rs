use super::{
    error::{Error, Result},
    evolution::EvolutionLog,
    problem::{Coordinates, Metadata, Problem, DEPOT},
    solution::{Route, Solution},
};

/// Length of depot -> customers -> depot.
///
/// Legs touching a node without a coordinate contribute nothing, but the walk
/// still moves on to that node.
pub fn route_length(route: &[usize], coordinates: &Coordinates) -> f64 {
    let mut length = 0.0;
    let mut previous = DEPOT;

    for &node in route.iter().chain(std::iter::once(&DEPOT)) {
        if let (Some(a), Some(b)) = (coordinates.get(&previous), coordinates.get(&node)) {
            length += a.distance_from(b);
        }
        previous = node;
    }

    length
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread<T> {
    pub mean: f64,
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd + Into<f64>> Spread<T> {
    fn of(values: &[T]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let start: f64 = first.into();
        let (min, max, sum) = rest.iter().fold((first, first, start), |(min, max, sum), &v| {
            let value: f64 = v.into();
            (
                if v < min { v } else { min },
                if v > max { v } else { max },
                sum + value,
            )
        });

        Some(Self {
            mean: sum / values.len() as f64,
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteStatistics {
    pub lengths: Vec<f64>,
    pub customers: Vec<u32>,
    pub total_cost: f64,
    pub metadata: Metadata,
}

impl RouteStatistics {
    pub fn compute(problem: &Problem, solution: &Solution) -> Result<Self> {
        problem.depot().ok_or(Error::MissingDepot)?;

        let lengths = solution
            .routes
            .iter()
            .map(|route| route_length(route, &problem.coordinates))
            .collect();
        let customers = solution.routes.iter().map(|route: &Route| route.len() as u32).collect();

        Ok(Self {
            lengths,
            customers,
            total_cost: solution.cost,
            metadata: problem.metadata,
        })
    }

    pub fn route_count(&self) -> usize {
        self.lengths.len()
    }

    pub fn total_customers(&self) -> u32 {
        self.customers.iter().sum()
    }

    pub fn total_length(&self) -> f64 {
        self.lengths.iter().sum()
    }

    /// `None` when the solution has no routes.
    pub fn length_spread(&self) -> Option<Spread<f64>> {
        Spread::of(&self.lengths)
    }

    pub fn customer_spread(&self) -> Option<Spread<u32>> {
        Spread::of(&self.customers)
    }

    /// The text shown next to the route charts.
    pub fn summary(&self) -> Vec<String> {
        let na = || "N/A".to_string();
        let lengths = self.length_spread();
        let customers = self.customer_spread();

        vec![
            "SOLUTION STATISTICS".to_string(),
            "=".repeat(30),
            format!("Total Routes:          {}", self.route_count()),
            format!("Total Customers:       {}", self.total_customers()),
            format!("Total Cost:            {:.2}", self.total_cost),
            format!("Avg Route Length:      {}", lengths.map_or_else(na, |s| format!("{:.2}", s.mean))),
            format!("Min Route Length:      {}", lengths.map_or_else(na, |s| format!("{:.2}", s.min))),
            format!("Max Route Length:      {}", lengths.map_or_else(na, |s| format!("{:.2}", s.max))),
            format!("Avg Customers/Route:   {}", customers.map_or_else(na, |s| format!("{:.1}", s.mean))),
            format!("Min Customers/Route:   {}", customers.map_or_else(na, |s| s.min.to_string())),
            format!("Max Customers/Route:   {}", customers.map_or_else(na, |s| s.max.to_string())),
            format!("Vehicle Capacity:      {}", self.metadata.capacity.map_or_else(na, |v| v.to_string())),
            format!("Problem Dimension:     {}", self.metadata.dimension.map_or_else(na, |v| v.to_string())),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionStatistics {
    pub generations: usize,
    pub initial_cost: f64,
    pub final_cost: f64,
    pub best_generation: u64,
    pub worst_stagnation: u64,
    pub mean_cost: f64,
    pub cost_std_dev: f64,
}

impl EvolutionStatistics {
    pub fn compute(log: &EvolutionLog) -> Result<Self> {
        let initial_cost = log.first()?.best_cost;
        let final_cost = log.last()?.best_cost;

        // First occurrence of the minimum
        let best = log.generations.iter().fold(log.first()?, |best, g| {
            if g.best_cost < best.best_cost {
                g
            } else {
                best
            }
        });

        let worst_stagnation = log.generations.iter().map(|g| g.solution_counter).max().unwrap_or(0);

        let n = log.len() as f64;
        let mean_cost = log.generations.iter().map(|g| g.best_cost).sum::<f64>() / n;
        let cost_std_dev = if log.len() < 2 {
            0.0
        } else {
            let squares = log.generations.iter().map(|g| (g.best_cost - mean_cost).powi(2)).sum::<f64>();
            (squares / (n - 1.0)).sqrt()
        };

        Ok(Self {
            generations: log.len(),
            initial_cost,
            final_cost,
            best_generation: best.generation,
            worst_stagnation,
            mean_cost,
            cost_std_dev,
        })
    }

    pub fn total_improvement(&self) -> f64 {
        self.initial_cost - self.final_cost
    }

    /// Relative improvement in percent, `0` when starting from a zero cost.
    pub fn improvement_rate(&self) -> f64 {
        if self.initial_cost == 0.0 {
            0.0
        } else {
            self.total_improvement() * 100.0 / self.initial_cost
        }
    }

    pub fn summary(&self) -> Vec<String> {
        vec![
            "EVOLUTION STATISTICS".to_string(),
            "=".repeat(35),
            format!("Total Generations:     {}", self.generations),
            format!("Initial Cost:          {:.3}", self.initial_cost),
            format!("Final Cost:            {:.3}", self.final_cost),
            format!("Total Improvement:     {:.3}", self.total_improvement()),
            format!("Improvement Rate:      {:.2}%", self.improvement_rate()),
            format!("Best Generation:       {}", self.best_generation),
            format!("Worst Stagnation:      {} generations", self.worst_stagnation),
            format!("Avg Cost per Gen:      {:.3}", self.mean_cost),
            format!("Cost Std Dev:          {:.3}", self.cost_std_dev),
        ]
    }
}
