//! `makepop` — initialize a synthetic population and its death queue.
//!
//! Ages come from a population pyramid CSV, deaths from a life table (or the
//! built-in Gompertz–Makeham curve).  Every agent's date of death is pushed
//! into a fixed-capacity min-heap so the earliest death is always on top.
//!
//! Run with:
//!   cargo run -p makepop --release -- --pyramid demos/makepop/data/synthetic-pyramid.csv
//!
//! Logging is controlled by `RUST_LOG` (default `info`).

// Use mimalloc to keep multi-million-agent allocations cheap.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use memory_stats::memory_stats;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pop_core::{DAYS_PER_YEAR, Day};
use pop_init::{
    InitConfig, InitObserver, InitPhase, KernelChoice, PopulationBuilder, write_population_csv,
};
use pop_queue::{NativeKernel, PortableKernel, SiftKernel};

// ── Memory helper ─────────────────────────────────────────────────────────────

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "makepop")]
#[command(about = "Create a population from a pyramid and queue every agent's date of death")]
struct Cli {
    /// Population pyramid CSV (`Age,M,F`).  Required unless --config names one.
    #[arg(long)]
    pyramid: Option<PathBuf>,

    /// Random seed [default: 20240607]
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of agents [default: 1000000]
    #[arg(short, long)]
    count: Option<usize>,

    /// Life table CSV (`age,deaths`).  Defaults to a Gompertz–Makeham curve.
    #[arg(long)]
    life_table: Option<PathBuf>,

    /// Sift kernel for the death queue: `portable` or `native` [default: native]
    #[arg(long)]
    kernel: Option<KernelChoice>,

    /// Worker threads for death prediction [default: all logical cores]
    #[arg(long)]
    threads: Option<usize>,

    /// JSON configuration file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write `agent_id,date_of_birth,date_of_death` rows to this CSV file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pop and print the first N deaths from the queue.
    #[arg(long, default_value_t = 0)]
    drain: usize,
}

impl Cli {
    /// Merge the optional JSON config with command-line overrides.
    fn resolve(&self) -> Result<InitConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str::<InitConfig>(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => {
                let pyramid = self
                    .pyramid
                    .clone()
                    .context("--pyramid is required unless --config supplies it")?;
                InitConfig::new(pyramid)
            }
        };

        if let Some(p) = &self.pyramid {
            config.pyramid = p.clone();
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        if let Some(c) = self.count {
            config.count = c;
        }
        if let Some(t) = &self.life_table {
            config.life_table = Some(t.clone());
        }
        if let Some(k) = self.kernel {
            config.kernel = k;
        }
        if self.threads.is_some() {
            config.num_threads = self.threads;
        }

        config.validate()?;
        Ok(config)
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs phase timings and resident memory.
struct ProgressLog {
    total: usize,
}

impl InitObserver for ProgressLog {
    fn on_phase_start(&mut self, phase: InitPhase, total: usize) {
        self.total = total;
        debug!(%phase, total, mem_mb = mem_mb() as u64, "phase start");
    }

    fn on_progress(&mut self, phase: InitPhase, done: usize) {
        let pct = 100.0 * done as f64 / self.total.max(1) as f64;
        debug!(%phase, done, "{pct:5.1}%");
    }

    fn on_phase_end(&mut self, phase: InitPhase, elapsed: Duration) {
        info!(
            "  {:<20} {:>8.3}s  mem={:.0} MB",
            phase.to_string(),
            elapsed.as_secs_f64(),
            mem_mb()
        );
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn run<K: SiftKernel<u32>>(config: &InitConfig, cli: &Cli) -> Result<()> {
    let t_total = Instant::now();
    let mut observer = ProgressLog { total: config.count };

    let mut init = PopulationBuilder::from_config(config)?.build::<K>(&mut observer)?;

    let elapsed = t_total.elapsed().as_secs_f64();
    info!(
        "Population ready: {} agents, {} queued deaths in {:.3}s ({:.1} M agents/s)  mem={:.0} MB",
        init.population.len(),
        init.deaths.len(),
        elapsed,
        init.population.len() as f64 / elapsed.max(f64::EPSILON) / 1_000_000.0,
        mem_mb(),
    );

    if let Some(path) = &cli.output {
        write_population_csv(path, &init.population)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    if cli.drain > 0 {
        println!();
        println!("{:>10}  {:>8}  {:>6}", "agent", "day", "age");
        for _ in 0..cli.drain {
            let Ok((agent, day)) = init.deaths.pop() else {
                break;
            };
            let Some(death) = Day::from_priority(day) else {
                break;
            };
            let dob = init.population.date_of_birth[agent as usize];
            let age_at_death = death - dob;
            println!(
                "{agent:>10}  {day:>8}  {:>6.1}",
                age_at_death as f64 / DAYS_PER_YEAR as f64
            );
        }
    }

    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve()?;

    info!("=== makepop ===");
    info!(
        "Agents: {}  |  Seed: {}  |  Kernel: {}  |  Pyramid: {}",
        config.count,
        config.seed,
        config.kernel,
        config.pyramid.display()
    );
    info!("mem[startup] {:.0} MB", mem_mb());

    match config.kernel {
        KernelChoice::Portable => run::<PortableKernel>(&config, &cli),
        KernelChoice::Native => run::<NativeKernel>(&config, &cli),
    }
}
