use solsim::{bench_gravity, bench_step, CatalogConfig, SimulationSession, Storage};

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "solsim", about = "Headless solar-system simulation session")]
struct Args {
    /// Catalog YAML overriding the built-in solar system
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Snapshot file used to resume and persist the session
    #[arg(long, default_value = "solsim_state.json")]
    state_file: PathBuf,

    /// Start date (YYYY-MM-DD); defaults to the catalog epoch
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Simulated days to advance before exiting
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Discard any saved session and start fresh
    #[arg(long)]
    reset: bool,

    /// Run micro-benchmarks instead of a session
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_catalog(path: Option<&PathBuf>) -> Result<CatalogConfig> {
    match path {
        Some(p) => {
            let file = File::open(p)?;
            let reader = BufReader::new(file);
            Ok(serde_yaml::from_reader(reader)?)
        }
        None => Ok(CatalogConfig::builtin()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.bench {
        bench_gravity();
        bench_step();
        return Ok(());
    }

    let catalog = load_catalog(args.catalog.as_ref())?;
    let storage = Storage::new(&args.state_file);
    if args.reset {
        storage.clear()?;
    }

    let mut session = SimulationSession::new(catalog);

    // Resume from the saved snapshot when one exists; fall back to catalog
    // defaults on anything unreadable, never crash on a bad state file.
    let resumed = match storage.load() {
        Ok(Some(snapshot)) => match session.restore(Some(snapshot)) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "saved session unusable, starting fresh");
                storage.clear()?;
                session.restore(None)?;
                true
            }
        },
        Ok(None) => false,
        Err(e) => {
            warn!(error = %e, "state file unreadable, starting fresh");
            storage.clear()?;
            session.restore(None)?;
            true
        }
    };

    if !resumed {
        let start = args.start_date.unwrap_or_else(|| session.epoch());
        session.start(start);
    }

    // Jump ahead the requested span, then run a short live stint at a
    // nominal 60 fps so the frame-driven path is exercised too.
    let target = session.current_date() + Duration::days(args.days as i64);
    session.fast_forward_to(target);
    for _ in 0..600 {
        session.step(60.0);
    }

    println!("date: {}", session.current_date());
    for body in session.bodies() {
        println!(
            "{:8} pos = ({:+.6e}, {:+.6e}) m, speed = {:9.1} m/s",
            body.name, body.x.x, body.x.y,
            body.orbital_speed(),
        );
    }

    storage.save(&session.snapshot_and_exit())?;

    Ok(())
}
