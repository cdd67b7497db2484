//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    validate_policy_config, validate_signal_config, validate_simulation_config,
};
use crate::domain::error::TradesimError;
use crate::domain::evaluator::{run_simulation, EvaluationResult, SimulationConfig};
use crate::domain::metrics::Metrics;
use crate::domain::policy::{Direction, PolicyConfig, QuantityRule, ZeroQuantity};
use crate::domain::signal::{generate_signals, SignalConfig, SignalFrame, Smoothing};
use crate::domain::simulator::make_rng;
use crate::domain::universe::{default_universe, parse_instruments};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Random-walk trading simulator and signal generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a price path and compare trading policies on it
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        days: Option<usize>,
        /// Write per-policy equity curves to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the simulated price history to this CSV file
        #[arg(long)]
        prices: Option<PathBuf>,
    },
    /// Generate always-in signals from a bar file
    Signals {
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            seed,
            days,
            output,
            prices,
        } => run_simulate(
            config.as_ref(),
            seed,
            days,
            output.as_ref(),
            prices.as_ref(),
        ),
        Command::Signals {
            symbol,
            data_dir,
            config,
            start,
            end,
            output,
        } => run_signals(
            &symbol,
            &data_dir,
            config.as_ref(),
            start,
            end,
            output.as_ref(),
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &TradesimError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradesimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        fail(&err)
    })
}

/// Load `path` when given, otherwise an empty config so every key takes its default.
fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            load_config(p)
        }
        None => FileConfigAdapter::from_string("").map_err(|reason| {
            fail(&TradesimError::ConfigParse {
                file: "<defaults>".into(),
                reason,
            })
        }),
    }
}

pub fn build_simulation_config(
    adapter: &dyn ConfigPort,
) -> Result<SimulationConfig, TradesimError> {
    let seed = match adapter.get_string("simulation", "seed") {
        Some(s) => Some(s.trim().parse::<u64>().map_err(|_| {
            TradesimError::invalid("simulation", "seed", "seed must be a non-negative integer")
        })?),
        None => None,
    };

    let instruments = match adapter.get_string("simulation", "instruments") {
        Some(list) => parse_instruments(&list)
            .map_err(|e| TradesimError::invalid("simulation", "instruments", e.to_string()))?,
        None => default_universe(),
    };

    let days = adapter.get_int("simulation", "days")?.unwrap_or(30);
    if days < 1 {
        return Err(TradesimError::invalid(
            "simulation",
            "days",
            "days must be at least 1",
        ));
    }

    Ok(SimulationConfig {
        seed,
        days: days as usize,
        volatility: adapter
            .get_double("simulation", "volatility")?
            .unwrap_or(0.05),
        starting_cash: adapter
            .get_double("simulation", "starting_cash")?
            .unwrap_or(10_000.0),
        instruments,
        risk_free_rate: adapter
            .get_double("simulation", "risk_free_rate")?
            .unwrap_or(0.0),
    })
}

pub fn build_policy_config(adapter: &dyn ConfigPort) -> Result<PolicyConfig, TradesimError> {
    let directions = match adapter.get_string("policy", "policies") {
        Some(list) => {
            let mut directions: Vec<Direction> = Vec::new();
            for token in list.split(',') {
                let d = token
                    .parse::<Direction>()
                    .map_err(|e| TradesimError::invalid("policy", "policies", e))?;
                if !directions.contains(&d) {
                    directions.push(d);
                }
            }
            directions
        }
        None => PolicyConfig::default().directions,
    };

    let quantity = match adapter
        .get_string("policy", "quantity")
        .map(|s| s.trim().to_lowercase())
        .as_deref()
    {
        None | Some("fixed") => {
            let q = adapter.get_int("policy", "fixed_quantity")?.unwrap_or(1);
            if q < 1 {
                return Err(TradesimError::invalid(
                    "policy",
                    "fixed_quantity",
                    "fixed_quantity must be at least 1",
                ));
            }
            QuantityRule::Fixed(q as u64)
        }
        Some("weighted") => QuantityRule::Weighted {
            scaling_factor: adapter
                .get_double("policy", "scaling_factor")?
                .unwrap_or(200.0),
        },
        Some(other) => {
            return Err(TradesimError::invalid(
                "policy",
                "quantity",
                format!("unknown quantity mode '{other}' (expected fixed or weighted)"),
            ));
        }
    };

    let zero_quantity = match adapter.get_string("policy", "zero_quantity") {
        Some(s) => s
            .parse::<ZeroQuantity>()
            .map_err(|e| TradesimError::invalid("policy", "zero_quantity", e))?,
        None => ZeroQuantity::default(),
    };

    Ok(PolicyConfig {
        directions,
        quantity,
        zero_quantity,
        parallel: adapter.get_bool("policy", "parallel")?.unwrap_or(false),
    })
}

pub fn build_signal_config(adapter: &dyn ConfigPort) -> Result<SignalConfig, TradesimError> {
    let defaults = SignalConfig::default();

    let length = |key: &str, default: usize| -> Result<usize, TradesimError> {
        let value = adapter
            .get_int("signals", key)?
            .unwrap_or(default as i64);
        if value < 1 {
            return Err(TradesimError::invalid(
                "signals",
                key,
                format!("{key} must be at least 1"),
            ));
        }
        Ok(value as usize)
    };

    let smoothing = match adapter.get_string("signals", "smoothing") {
        Some(s) => s
            .parse::<Smoothing>()
            .map_err(|e| TradesimError::invalid("signals", "smoothing", e))?,
        None => defaults.smoothing,
    };

    Ok(SignalConfig {
        ma_length: length("ma_length", defaults.ma_length)?,
        smoothing,
        ibs_bull_min: adapter
            .get_double("signals", "ibs_bull_min")?
            .unwrap_or(defaults.ibs_bull_min),
        ibs_bear_max: adapter
            .get_double("signals", "ibs_bear_max")?
            .unwrap_or(defaults.ibs_bear_max),
        abr_lookback: length("abr_lookback", defaults.abr_lookback)?,
    })
}

fn run_simulate(
    config_path: Option<&PathBuf>,
    seed_override: Option<u64>,
    days_override: Option<usize>,
    output_path: Option<&PathBuf>,
    prices_path: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        return fail(&e);
    }
    if let Err(e) = validate_policy_config(&adapter) {
        return fail(&e);
    }

    let mut sim_config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let policy_config = match build_policy_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    if let Some(days) = days_override {
        if days == 0 {
            return fail(&TradesimError::invalid(
                "simulation",
                "days",
                "days must be at least 1",
            ));
        }
        sim_config.days = days;
    }
    // Always run with a concrete seed so the run can be replayed.
    let seed = seed_override
        .or(sim_config.seed)
        .unwrap_or_else(rand::random::<u64>);
    sim_config.seed = Some(seed);

    let policies = policy_config.policies();
    eprintln!(
        "Simulating {} days for {} instruments (seed {})",
        sim_config.days,
        sim_config.instruments.len(),
        seed
    );

    let result = run_simulation(
        &sim_config,
        &policies,
        policy_config.parallel,
        &mut make_rng(sim_config.seed),
    );

    print_simulation_summary(&result, &sim_config);

    let reporter = CsvReportAdapter::new();
    if let Some(path) = prices_path {
        if let Err(e) = reporter.write_prices(&result.prices, &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("Prices written to: {}", path.display());
    }
    if let Some(path) = output_path {
        if let Err(e) = reporter.write_equity(&result, &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("Equity curves written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_simulation_summary(result: &EvaluationResult, config: &SimulationConfig) {
    eprintln!("\n=== Final Prices ===");
    for inst in result.prices.instruments() {
        let first = inst.history().first().copied().unwrap_or(0.0);
        eprintln!(
            "  {:<8} {:>12.2} -> {:>12.2}",
            inst.symbol(),
            first,
            inst.price()
        );
    }

    eprintln!("\n=== Policy Comparison ===");
    eprintln!(
        "  {:<14} {:>12} {:>10} {:>9} {:>8} {:>8} {:>6} {:>6} {:>6} {:>6}",
        "policy", "equity", "profit", "return", "sharpe", "max_dd", "buys", "sells", "rej", "skip"
    );
    for run in &result.runs {
        let m = Metrics::compute(run, config.risk_free_rate);
        let sign = if m.profit >= 0.0 { "+" } else { "" };
        eprintln!(
            "  {:<14} {:>12.2} {:>10} {:>8.2}% {:>8.2} {:>7.1}% {:>6} {:>6} {:>6} {:>6}",
            run.policy.name,
            m.final_equity,
            format!("{}{:.2}", sign, m.profit),
            m.total_return * 100.0,
            m.sharpe_ratio,
            m.max_drawdown * 100.0,
            m.buys_filled,
            m.sells_filled,
            m.rejected,
            m.skipped,
        );
    }
}

fn run_signals(
    symbol: &str,
    data_dir: &Path,
    config_path: Option<&PathBuf>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_signal_config(&adapter) {
        return fail(&e);
    }
    let signal_config = match build_signal_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let data_port = CsvAdapter::new(data_dir.to_path_buf());
    run_signals_pipeline(&data_port, symbol, &signal_config, start, end, output_path)
}

/// Fetch bars through `data_port`, generate signals and optionally write them as CSV.
pub fn run_signals_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    signal_config: &SignalConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let symbol = symbol.trim().to_uppercase();
    let bars = match data_port.fetch_bars(&symbol, start, end) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };
    eprintln!("Loaded {} bars for {}", bars.len(), symbol);

    let frame = match generate_signals(&bars, signal_config) {
        Ok(f) => f,
        Err(e) => return fail(&e),
    };

    print_signal_summary(&symbol, &frame);

    if let Some(path) = output_path {
        if let Err(e) = CsvReportAdapter::new().write_signals(&frame, &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("Signals written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_signal_summary(symbol: &str, frame: &SignalFrame) {
    let config = &frame.config;
    let ma_label = match config.smoothing {
        Smoothing::Simple => "SMA",
        Smoothing::Exponential => "EMA",
    };

    eprintln!("\n=== Always-In Signals: {} ===", symbol);
    eprintln!(
        "  {}({}), IBS bull > {}, IBS bear < {}, ABR({})",
        ma_label, config.ma_length, config.ibs_bull_min, config.ibs_bear_max, config.abr_lookback
    );
    eprintln!(
        "  {} bars, {} warmup, {} bull, {} bear",
        frame.rows.len(),
        frame.warmup,
        frame.bull_count(),
        frame.bear_count()
    );

    for row in frame.rows.iter().filter(|r| r.bull_signal || r.bear_signal) {
        let kind = if row.bull_signal { "BULL" } else { "BEAR" };
        println!("{} {}", row.date, kind);
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let checks: [fn(&dyn ConfigPort) -> Result<(), TradesimError>; 3] = [
        validate_simulation_config,
        validate_policy_config,
        validate_signal_config,
    ];
    for check in checks {
        if let Err(e) = check(&adapter) {
            return fail(&e);
        }
    }

    let sim = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let policy = match build_policy_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let signals = match build_signal_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    eprintln!("\nSimulation:");
    match sim.seed {
        Some(s) => eprintln!("  seed:          {}", s),
        None => eprintln!("  seed:          (entropy)"),
    }
    eprintln!("  days:          {}", sim.days);
    eprintln!("  volatility:    {}", sim.volatility);
    eprintln!("  starting_cash: {:.2}", sim.starting_cash);
    let instruments: Vec<String> = sim
        .instruments
        .iter()
        .map(|i| format!("{}@{}", i.symbol, i.initial_price))
        .collect();
    eprintln!("  instruments:   {}", instruments.join(", "));

    eprintln!("\nPolicies:");
    let names: Vec<&str> = policy.directions.iter().map(|d| d.name()).collect();
    eprintln!("  policies:      {}", names.join(", "));
    match policy.quantity {
        QuantityRule::Fixed(q) => eprintln!("  quantity:      fixed {}", q),
        QuantityRule::Weighted { scaling_factor } => {
            eprintln!("  quantity:      weighted x{}", scaling_factor)
        }
    }

    eprintln!("\nSignals:");
    eprintln!(
        "  ma:            {} {}",
        signals.smoothing, signals.ma_length
    );
    eprintln!(
        "  ibs:           bull > {}, bear < {}",
        signals.ibs_bull_min, signals.ibs_bear_max
    );
    eprintln!("  abr_lookback:  {}", signals.abr_lookback);
    eprintln!("  warmup:        {} bars", signals.warmup());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
