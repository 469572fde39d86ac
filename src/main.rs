//! Binomial distribution calculator CLI

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use u_binomial::config::SessionConfig;
use u_binomial::random::{create_rng, simulate, Simulation};
use u_binomial::render::{format_probability, render_chart, render_table, ChartKind, ChartOptions};
use u_binomial::session::Session;
use u_binomial::{Binomial, Outcome, Query, Summary};

#[derive(Parser)]
#[command(name = "binomial")]
#[command(about = "Binomial distribution calculator")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Directory charts are written to
    #[arg(long, global = true, env = "BINOMIAL_CHART_DIR", default_value = ".")]
    chart_dir: PathBuf,

    /// Chart width in pixels
    #[arg(long, global = true, default_value = "1024")]
    width: u32,

    /// Chart height in pixels
    #[arg(long, global = true, default_value = "768")]
    height: u32,

    /// Decimal places for probabilities. Full precision if omitted.
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Do not clear the screen between menus (interactive mode)
    #[arg(long)]
    no_clear: bool,

    /// Without a subcommand the interactive menu starts.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the probability table and summary statistics
    Summary {
        /// Number of trials
        #[arg(long, allow_negative_numbers = true)]
        n: i64,

        /// Probability of success
        #[arg(long, allow_negative_numbers = true)]
        pi: f64,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a single probability such as Pr(X <= x)
    Query {
        /// Number of trials
        #[arg(long, allow_negative_numbers = true)]
        n: i64,

        /// Probability of success
        #[arg(long, allow_negative_numbers = true)]
        pi: f64,

        /// Which probability to compute
        #[arg(long, value_enum)]
        kind: QueryKind,

        /// The x in Pr(X <op> x)
        #[arg(long, allow_negative_numbers = true)]
        x: i64,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Draw a chart of the distribution
    Chart {
        /// Number of trials
        #[arg(long, allow_negative_numbers = true)]
        n: i64,

        /// Probability of success
        #[arg(long, allow_negative_numbers = true)]
        pi: f64,

        /// bar, line, scatter, linepoint or linebar
        #[arg(long, default_value = "bar")]
        kind: ChartKind,

        /// Output file (.png or .svg). Defaults to a name under --chart-dir.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample draws and compare empirical with theoretical moments
    Simulate {
        /// Number of trials
        #[arg(long, allow_negative_numbers = true)]
        n: i64,

        /// Probability of success
        #[arg(long, allow_negative_numbers = true)]
        pi: f64,

        /// Number of simulated draws
        #[arg(long, default_value = "10000")]
        draws: u64,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum QueryKind {
    /// Pr(X <= x)
    Le,
    /// Pr(X >= x)
    Ge,
    /// Pr(X < x)
    Lt,
    /// Pr(X > x)
    Gt,
    /// Pr(X = x)
    Eq,
}

impl From<QueryKind> for Query {
    fn from(kind: QueryKind) -> Self {
        match kind {
            QueryKind::Le => Query::LessOrEqual,
            QueryKind::Ge => Query::GreaterOrEqual,
            QueryKind::Lt => Query::LessThan,
            QueryKind::Gt => Query::GreaterThan,
            QueryKind::Eq => Query::Equal,
        }
    }
}

#[derive(Serialize)]
struct SummaryReport {
    summary: Summary,
    table: Vec<Outcome>,
}

#[derive(Serialize)]
struct QueryReport {
    n: u64,
    pi: f64,
    query: String,
    x: i64,
    probability: f64,
}

#[derive(Serialize)]
struct SimulationReport {
    summary: Summary,
    seed: u64,
    simulation: Simulation,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig {
        chart_dir: cli.chart_dir,
        chart: ChartOptions {
            width: cli.width,
            height: cli.height,
        },
        precision: cli.precision,
        clear_screen: !cli.no_clear,
    };

    match cli.command {
        None => cmd_interactive(config),
        Some(Commands::Summary { n, pi, json }) => cmd_summary(n, pi, json, &config),
        Some(Commands::Query { n, pi, kind, x, json }) => {
            cmd_query(n, pi, kind.into(), x, json, &config)
        }
        Some(Commands::Chart { n, pi, kind, output }) => cmd_chart(n, pi, kind, output, &config),
        Some(Commands::Simulate { n, pi, draws, seed, json }) => {
            cmd_simulate(n, pi, draws, seed, json, &config)
        }
    }
}

fn cmd_interactive(config: SessionConfig) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), config);
    session.run().context("terminal I/O failed")
}

fn cmd_summary(n: i64, pi: f64, json: bool, config: &SessionConfig) -> Result<()> {
    let dist = Binomial::new(n, pi)?;
    if json {
        let report = SummaryReport {
            summary: dist.describe(),
            table: dist.outcomes(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_table(&dist.outcomes(), config.precision));
        println!("{}", dist.describe());
    }
    Ok(())
}

fn cmd_query(
    n: i64,
    pi: f64,
    query: Query,
    x: i64,
    json: bool,
    config: &SessionConfig,
) -> Result<()> {
    let dist = Binomial::new(n, pi)?;
    let probability = dist.evaluate(query, x)?;
    if json {
        let report = QueryReport {
            n: dist.n(),
            pi: dist.pi(),
            query: query.to_string(),
            x,
            probability,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Pr(X {} {x}) = {}",
            query.symbol(),
            format_probability(probability, config.precision)
        );
    }
    Ok(())
}

fn cmd_chart(
    n: i64,
    pi: f64,
    kind: ChartKind,
    output: Option<PathBuf>,
    config: &SessionConfig,
) -> Result<()> {
    let dist = Binomial::new(n, pi)?;
    let path = output.unwrap_or_else(|| config.chart_path(&dist, kind));
    render_chart(&dist, kind, &path, config.chart)
        .with_context(|| format!("failed to draw {}", path.display()))?;
    println!("Chart written to {}", path.display());
    Ok(())
}

fn cmd_simulate(
    n: i64,
    pi: f64,
    draws: u64,
    seed: u64,
    json: bool,
    config: &SessionConfig,
) -> Result<()> {
    let dist = Binomial::new(n, pi)?;
    let mut rng = create_rng(seed);
    let simulation = simulate(&dist, draws, &mut rng)?;
    tracing::info!(draws, seed, mean = simulation.mean, "simulation complete");

    if json {
        let report = SimulationReport {
            summary: dist.describe(),
            seed,
            simulation,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("x\tcount\tfrequency\tPr(X = x)");
    for (x, (&count, &p)) in simulation
        .counts
        .iter()
        .zip(dist.probabilities())
        .enumerate()
    {
        println!(
            "{x}\t{count}\t{}\t{}",
            format_probability(simulation.frequency(x), config.precision),
            format_probability(p, config.precision)
        );
    }
    println!();
    println!("Draws\t\t{draws}");
    println!("Mean\t\t{} (theoretical {})", simulation.mean, dist.mean());
    println!("Variance\t{} (theoretical {})", simulation.variance, dist.variance());
    Ok(())
}
