use allocation_core::{Horizon, Percent, RiskLevel};
use anyhow::{bail, Context};
use clap::Parser;
use portfolio_planner::{PlanRequest, PlannerConfig, PortfolioPlanner};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about = "Builds a sized portfolio plan from a risk profile")]
struct Args {
    /// Investment horizon: short, medium or long
    #[arg(long, default_value = "medium")]
    horizon: String,

    /// Risk appetite from 1 (cautious) to 5 (adventurous)
    #[arg(long, default_value_t = 3)]
    risk_level: u8,

    /// Cash to deploy, in dollars
    #[arg(long, default_value_t = 10_000.0)]
    budget: f64,

    /// Annualized volatility tolerance, in percent
    #[arg(long, default_value_t = 15.0)]
    max_vol: f64,

    /// Sleep-better dial, 0 (aggressive) to 1 (most conservative)
    #[arg(long, default_value_t = 0.0)]
    sleep_dial: f64,

    /// Optional JSON config overriding the built-in guardrails
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the plan as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.budget <= 0.0 {
        bail!("budget must be positive, got {}", args.budget);
    }

    let horizon = Horizon::from_str(&args.horizon)?;
    let risk_level = RiskLevel::new(args.risk_level)?;

    let config = match &args.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };

    let planner = PortfolioPlanner::new(config);
    let request = PlanRequest {
        horizon,
        risk_level,
        budget: args.budget,
        max_volatility: Percent(args.max_vol),
        sleep_dial: args.sleep_dial,
    };
    let plan = planner.create_plan(&request);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&plan).context("serializing plan to JSON")?;
        println!("{rendered}");
    } else {
        print!("{}", plan.summary());
    }
    Ok(())
}
