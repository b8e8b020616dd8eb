// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Command line driver: loads an instance, solves it and prints the tour.

use clap::Parser;
use std::{
    error::Error,
    io,
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};
use tourbound_bnb::{
    bnb::BnbSolver,
    bound::RowMinimumBound,
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogTreeSearchMonitor,
        node_limit::NodeLimitMonitor, time_limit::TimeLimitMonitor,
    },
    result::{BnbSolverOutcome, SolverResult},
};
use tourbound_model::{graph::Graph, loading::InstanceLoader, tour::Tour};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

type CostType = i64;

/// Exact solver for symmetric travelling salesman instances.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// A path to an instance file, else reads from stdin
    file: Option<PathBuf>,

    /// Stop after this many seconds and report the best tour so far
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    time_limit: Option<Duration>,

    /// Stop after exploring this many search nodes
    #[arg(long, value_name = "N")]
    node_limit: Option<u64>,

    /// Seconds between progress lines
    #[arg(long, value_name = "SECS", value_parser = parse_seconds, default_value = "1")]
    log_interval: Duration,

    /// Accept tokens after the last cost in the instance
    #[arg(long)]
    allow_trailing_data: bool,

    /// Print search statistics after the tour
    #[arg(long)]
    stats: bool,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("`{}` is not a number: {}", s, e))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("`{}` is not a valid duration: {}", s, e))
}

fn load(args: &Args) -> Result<Graph<CostType>, Box<dyn Error>> {
    let loader = InstanceLoader::new().allow_trailing_data(args.allow_trailing_data);
    let graph = match &args.file {
        Some(path) => loader.from_path(path)?,
        None => {
            info!("reading instance from stdin");
            loader.from_reader(io::stdin().lock())?
        }
    };
    Ok(graph)
}

fn solve(args: &Args, graph: &Graph<CostType>) -> BnbSolverOutcome<CostType> {
    let mut monitor = CompositeTreeSearchMonitor::with_capacity(3);
    if let Some(limit) = args.time_limit {
        monitor.add_monitor(TimeLimitMonitor::with_default_check_interval(limit));
    }
    if let Some(limit) = args.node_limit {
        monitor.add_monitor(NodeLimitMonitor::new(limit));
    }
    monitor.add_monitor(LogTreeSearchMonitor::new(args.log_interval, 4095));

    let mut solver = BnbSolver::preallocated(graph.num_cities());
    solver.solve(graph, &mut RowMinimumBound::new(), monitor)
}

fn print_tour(tour: &Tour<CostType>) {
    let cities: Vec<String> = tour.cities().iter().map(|c| c.get().to_string()).collect();
    println!("tour: {}", cities.join(" "));
    println!("cost: {}", tour.cost());
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tourbound=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let graph = match load(&args) {
        Ok(graph) => graph,
        Err(e) => {
            error!("failed to load instance: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let outcome = solve(&args, &graph);

    let code = match outcome.result() {
        SolverResult::Optimal(tour) => {
            print_tour(tour);
            ExitCode::SUCCESS
        }
        SolverResult::Feasible(tour) => {
            warn!(reason = %outcome.termination_reason(), "search stopped early");
            print_tour(tour);
            println!("status: feasible, not proven optimal");
            ExitCode::SUCCESS
        }
        SolverResult::Unknown => {
            warn!(reason = %outcome.termination_reason(), "search stopped before finding a tour");
            println!("status: no tour found");
            ExitCode::from(2)
        }
    };

    if args.stats {
        print!("{}", outcome.statistics());
    }

    Ok(code)
}
