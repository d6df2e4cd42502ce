use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::{Duration, SystemTime},
};

use anyhow::{anyhow, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use strum::IntoEnumIterator;
use tracing::{debug, error, info, warn};

use cvrp_viz::{
    init_logging, read_evolution, read_problem, read_solution,
    render::{render_evolution, render_routes, Chart, RenderOptions, DEFAULT_SIZE, MIN_SIZE},
};

const ROUTES_PNG: &str = "routes_visualization.png";
const EVOLUTION_PNG: &str = "evolution_progress.png";

#[derive(Parser, Debug)]
#[clap(about, version, author)]
struct Args {
    /// Image width in pixels
    #[clap(long, global = true, default_value_t = DEFAULT_SIZE.0,
           value_parser = clap::value_parser!(u32).range(MIN_SIZE.0 as i64..))]
    width: u32,

    /// Image height in pixels
    #[clap(long, global = true, default_value_t = DEFAULT_SIZE.1,
           value_parser = clap::value_parser!(u32).range(MIN_SIZE.1 as i64..))]
    height: u32,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the solution's routes with per-route statistics
    Routes(RoutesArgs),
    /// Draw cost convergence, temperature and stagnation of a solver run
    Evolution(EvolutionArgs),
    /// Draw every chart, a failing chart does not stop the others
    All(AllArgs),
}

#[derive(ClapArgs, Debug)]
struct RouteFiles {
    /// Problem file
    #[clap(short, long, default_value = "fruitybun250.vrp")]
    vrp: PathBuf,

    /// Solution file written by the solver
    #[clap(short, long, default_value = "best-solution.txt")]
    solution: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct EvolutionFiles {
    /// Per-generation log written by the solver
    #[clap(short, long, default_value = "evolution_data.csv")]
    csv: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct RoutesArgs {
    #[clap(flatten)]
    files: RouteFiles,

    /// Image to write
    #[clap(short, long, default_value = ROUTES_PNG)]
    output: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct EvolutionArgs {
    #[clap(flatten)]
    files: EvolutionFiles,

    /// Image to write
    #[clap(short, long, default_value = EVOLUTION_PNG)]
    output: PathBuf,

    /// Keep re-rendering whenever the log changes, polling every N seconds
    #[clap(long, value_name = "SECONDS")]
    watch: Option<u64>,
}

#[derive(ClapArgs, Debug)]
struct AllArgs {
    #[clap(long, conflicts_with = "routes-only")]
    evolution_only: bool,

    #[clap(long)]
    routes_only: bool,

    #[clap(flatten)]
    routes: RouteFiles,

    #[clap(flatten)]
    evolution: EvolutionFiles,

    #[clap(long, default_value = ROUTES_PNG)]
    routes_output: PathBuf,

    #[clap(long, default_value = EVOLUTION_PNG)]
    evolution_output: PathBuf,
}

impl RouteFiles {
    fn render(&self, output: &Path, size: (u32, u32)) -> Result<()> {
        let problem = read_problem(&self.vrp).with_context(|| format!("reading {}", self.vrp.display()))?;
        let solution =
            read_solution(&self.solution).with_context(|| format!("reading {}", self.solution.display()))?;

        render_routes(&problem, &solution, &RenderOptions::new(output).with_size(size))
            .with_context(|| format!("writing {}", output.display()))
    }
}

impl EvolutionFiles {
    fn render(&self, output: &Path, size: (u32, u32)) -> Result<()> {
        let log = read_evolution(&self.csv).with_context(|| format!("reading {}", self.csv.display()))?;

        render_evolution(&log, &RenderOptions::new(output).with_size(size))
            .with_context(|| format!("writing {}", output.display()))
    }
}

impl EvolutionArgs {
    fn run(&self, size: (u32, u32)) -> Result<()> {
        match self.watch {
            Some(seconds) => self.watch(size, Duration::from_secs(seconds.max(1))),
            None => self.files.render(&self.output, size),
        }
    }

    /// Re-renders on every change of the log's modification time, until interrupted.
    fn watch(&self, size: (u32, u32), interval: Duration) -> Result<()> {
        info!(csv = %self.files.csv.display(), ?interval, "watching evolution log");

        let mut last_modified = None;
        loop {
            self.refresh(size, &mut last_modified);
            thread::sleep(interval);
        }
    }

    /// One polling step: renders when the log's modification time differs from
    /// `last_modified`. Returns whether a render was attempted.
    fn refresh(&self, size: (u32, u32), last_modified: &mut Option<SystemTime>) -> bool {
        match fs::metadata(&self.files.csv).and_then(|meta| meta.modified()) {
            Ok(modified) if *last_modified != Some(modified) => {
                *last_modified = Some(modified);
                // The solver may be halfway through a row, the next change retries
                if let Err(err) = self.files.render(&self.output, size) {
                    warn!("{:#}", err);
                }
                true
            }
            Ok(_) => false,
            Err(err) => {
                debug!(%err, "evolution log not readable yet");
                false
            }
        }
    }
}

impl AllArgs {
    fn selected(&self) -> Vec<Chart> {
        Chart::iter()
            .filter(|chart| match chart {
                Chart::Evolution => !self.routes_only,
                Chart::Routes => !self.evolution_only,
            })
            .collect()
    }

    fn run(&self, size: (u32, u32)) -> Result<()> {
        let charts = self.selected();
        let mut succeeded = 0;

        for chart in &charts {
            info!(%chart, "generating visualization");
            let result = match chart {
                Chart::Evolution => self.evolution.render(&self.evolution_output, size),
                Chart::Routes => self.routes.render(&self.routes_output, size),
            };

            match result {
                Ok(()) => succeeded += 1,
                Err(err) => error!(%chart, "{:#}", err),
            }
        }

        info!("Completed {}/{} visualizations successfully", succeeded, charts.len());

        if succeeded == charts.len() {
            Ok(())
        } else {
            Err(anyhow!("{} of {} visualizations failed", charts.len() - succeeded, charts.len()))
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let size = (args.width, args.height);

    match &args.command {
        Command::Routes(routes) => routes.files.render(&routes.output, size),
        Command::Evolution(evolution) => evolution.run(size),
        Command::All(all) => all.run(size),
    }
}
