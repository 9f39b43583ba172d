//! Loan Calculator CLI
//!
//! Command-line front end for the loan calculators. Prints a readable summary by
//! default, or JSON with `--json`.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

use loan_calculator::affordability::{LiveRates, RatePolicy, RateSource};
use loan_calculator::calculator::{load_requests, LoanCalculator};
use loan_calculator::limits::{
    format_currency, GeoLimitTable, DEFAULT_LOAN_LIMITS_PATH, FHFA_2026_BASELINE, FHFA_2026_YEAR,
};
use loan_calculator::payoff::monthly_rate_from_apr;

#[derive(Parser)]
#[command(
    name = "loan-calc",
    version,
    about = "Mortgage, affordability, credit card payoff and loan limit calculations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Loan limits CSV (State,County,Limit) to use instead of the built-in FHFA 2026 data;
    /// `--limits` with no value reads data/loan_limits.csv
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = DEFAULT_LOAN_LIMITS_PATH)]
    limits: Option<PathBuf>,

    /// Data year reported for a --limits file
    #[arg(long, global = true, default_value_t = FHFA_2026_YEAR)]
    limits_year: u16,

    /// National baseline limit for a --limits file
    #[arg(long, global = true, default_value_t = FHFA_2026_BASELINE)]
    national_baseline: f64,

    /// JSON file with the rate fallback policy
    #[arg(long, global = true)]
    rates_config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and total cost of a fixed-rate loan
    Amortize(AmortizeArgs),
    /// Principal a monthly payment can support
    Afford(AffordArgs),
    /// Months and total cost to pay off a credit card balance
    Payoff(PayoffArgs),
    /// Conforming or jumbo for a location
    Classify(ClassifyArgs),
    /// Classify every loan in a CSV file (Principal,State,County)
    ClassifyBatch(ClassifyBatchArgs),
    /// List states in the limit table
    States,
    /// List counties with their own limit in a state
    Counties(CountiesArgs),
}

#[derive(Args)]
struct AmortizeArgs {
    #[arg(long)]
    principal: f64,
    /// Annual rate in percent
    #[arg(long)]
    rate: f64,
    /// Term in years
    #[arg(long)]
    years: u32,
    /// Include the month-by-month schedule
    #[arg(long)]
    schedule: bool,
    /// Write the schedule to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct AffordArgs {
    /// Monthly payment (e.g. current rent)
    #[arg(long)]
    payment: f64,
    /// Live 30-year rate in percent, if known
    #[arg(long = "rate-30")]
    rate_30: Option<f64>,
    /// Live 15-year rate in percent, if known
    #[arg(long = "rate-15")]
    rate_15: Option<f64>,
    /// Single rate in percent; with --years computes one scenario only
    #[arg(long, requires = "years")]
    rate: Option<f64>,
    #[arg(long, requires = "rate")]
    years: Option<u32>,
}

#[derive(Args)]
struct PayoffArgs {
    #[arg(long)]
    balance: f64,
    /// Annual percentage rate
    #[arg(long)]
    apr: f64,
    /// Fixed monthly payment
    #[arg(long)]
    payment: f64,
}

#[derive(Args)]
struct ClassifyArgs {
    #[arg(long)]
    principal: f64,
    #[arg(long)]
    state: String,
    #[arg(long)]
    county: Option<String>,
}

#[derive(Args)]
struct ClassifyBatchArgs {
    #[arg(long)]
    input: PathBuf,
}

#[derive(Args)]
struct CountiesArgs {
    #[arg(long)]
    state: String,
    /// Only counties whose name contains this text
    #[arg(long)]
    search: Option<String>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn build_calculator(cli: &Cli) -> Result<LoanCalculator> {
    let table = match &cli.limits {
        Some(path) => GeoLimitTable::from_csv_path(path, cli.limits_year, cli.national_baseline)
            .with_context(|| format!("loading loan limits from {}", path.display()))?,
        None => GeoLimitTable::fhfa_2026().context("loading built-in loan limits")?,
    };

    let policy = match &cli.rates_config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader::<_, RatePolicy>(file).with_context(|| format!("parsing rate policy {}", path.display()))?
        }
        None => RatePolicy::default(),
    };

    info!("limits year {}, rate policy {:?}", table.year(), policy);
    Ok(LoanCalculator::with_table(table).with_rate_policy(policy))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let calc = build_calculator(&cli)?;

    match &cli.command {
        Commands::Amortize(args) => run_amortize(&calc, args, cli.json),
        Commands::Afford(args) => run_afford(&calc, args, cli.json),
        Commands::Payoff(args) => run_payoff(&calc, args, cli.json),
        Commands::Classify(args) => {
            let result = calc.classify(args.principal, &args.state, args.county.as_deref());
            if cli.json {
                return print_json(&result);
            }
            println!("{}", result);
            println!("  Limit:         {}", format_currency(result.limit));
            println!("  Principal:     {}", format_currency(result.principal));
            println!("  Of limit:      {:.1}%", result.percentage_of_limit);
            Ok(())
        }
        Commands::ClassifyBatch(args) => {
            let requests = load_requests(&args.input)
                .with_context(|| format!("reading loans from {}", args.input.display()))?;
            let results = calc.classify_batch(&requests);
            if cli.json {
                return print_json(&results);
            }
            println!("{:>16} {:<24} {:<28} {:<11} {:>16}", "Principal", "State", "County", "Type", "Limit");
            println!("{}", "-".repeat(99));
            for (request, result) in requests.iter().zip(&results) {
                println!(
                    "{:>16} {:<24} {:<28} {:<11} {:>16}",
                    format_currency(request.principal),
                    request.state,
                    request.county.as_deref().unwrap_or("-"),
                    result.loan_type.to_string(),
                    format_currency(result.limit),
                );
            }
            let jumbo = results.iter().filter(|r| !r.is_conforming).count();
            println!("\n{} loans, {} jumbo", results.len(), jumbo);
            Ok(())
        }
        Commands::States => {
            let states = calc.limits().states();
            if cli.json {
                return print_json(&states);
            }
            println!("Loan limits {} (baseline {})", calc.limits().year(), format_currency(calc.limits().national_baseline()));
            for state in states {
                println!("  {}", state);
            }
            Ok(())
        }
        Commands::Counties(args) => {
            let limits = calc.limits();
            let counties = match &args.search {
                Some(query) => limits.search_counties(&args.state, query),
                None => limits.counties(&args.state),
            };
            let rows: Vec<(&str, f64)> = counties
                .into_iter()
                .map(|c| (c, limits.get_limit(&args.state, Some(c))))
                .collect();
            if cli.json {
                return print_json(&rows);
            }
            println!(
                "{}: baseline {}",
                args.state,
                format_currency(limits.get_limit(&args.state, None))
            );
            for (county, limit) in rows {
                println!("  {:<36} {:>16}", county, format_currency(limit));
            }
            Ok(())
        }
    }
}

fn run_amortize(calc: &LoanCalculator, args: &AmortizeArgs, json: bool) -> Result<()> {
    let result = calc.amortize(args.principal, args.rate, args.years)?;
    let schedule = if args.schedule || args.csv.is_some() {
        Some(calc.schedule(args.principal, args.rate, args.years)?)
    } else {
        None
    };

    if let (Some(path), Some(schedule)) = (&args.csv, &schedule) {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        schedule.write_csv(BufWriter::new(file))?;
        info!("schedule written to {}", path.display());
    }

    if json {
        #[derive(Serialize)]
        struct Output<'a> {
            #[serde(flatten)]
            result: &'a loan_calculator::AmortizationResult,
            #[serde(skip_serializing_if = "Option::is_none")]
            schedule: Option<&'a loan_calculator::AmortizationSchedule>,
        }
        return print_json(&Output {
            result: &result,
            schedule: schedule.as_ref().filter(|_| args.schedule),
        });
    }

    println!("Monthly payment: {}", format_currency(result.monthly_payment));
    println!("Total paid:      {}", format_currency(result.total_amount));
    println!("Total interest:  {}", format_currency(result.total_interest));
    println!("Interest ratio:  {:.1}%", result.interest_ratio);
    println!("Payments:        {}", result.number_of_payments);

    if let (true, Some(schedule)) = (args.schedule, &schedule) {
        println!();
        println!("{:>5} {:>14} {:>14} {:>14} {:>16}", "Month", "Payment", "Principal", "Interest", "Balance");
        println!("{}", "-".repeat(67));
        for entry in schedule {
            println!(
                "{:>5} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
                entry.month, entry.payment, entry.principal_portion, entry.interest_portion, entry.remaining_balance
            );
        }
    }

    if let Some(path) = &args.csv {
        println!("\nSchedule written to: {}", path.display());
    }
    Ok(())
}

fn run_afford(calc: &LoanCalculator, args: &AffordArgs, json: bool) -> Result<()> {
    if let (Some(rate), Some(years)) = (args.rate, args.years) {
        let principal = calc.affordable_principal(args.payment, rate, years)?;
        if json {
            return print_json(&serde_json::json!({
                "monthly_payment": args.payment,
                "annual_rate_percent": rate,
                "term_years": years,
                "principal": principal,
            }));
        }
        println!(
            "{} per month at {}% over {} years supports {}",
            format_currency(args.payment),
            rate,
            years,
            format_currency(principal)
        );
        return Ok(());
    }

    let report = calc.affordability_by_term(args.payment, &LiveRates::new(args.rate_30, args.rate_15))?;
    if json {
        return print_json(&report);
    }

    println!("Affordable principal for {} per month:", format_currency(report.monthly_payment));
    println!("{:>6} {:>8} {:>10} {:>16} {:>16}", "Term", "Rate", "Source", "Principal", "Interest");
    for s in &report.scenarios {
        let source = match s.source {
            RateSource::Live => "live",
            RateSource::Estimated => "estimated",
        };
        println!(
            "{:>5}y {:>7.3}% {:>10} {:>16} {:>16}",
            s.term_years,
            s.annual_rate_percent,
            source,
            format_currency(s.principal),
            format_currency(s.total_interest)
        );
    }
    if report.rates.any_estimated() {
        println!("\nSome rates are estimates; live rates were not available for every term.");
    }
    Ok(())
}

fn run_payoff(calc: &LoanCalculator, args: &PayoffArgs, json: bool) -> Result<()> {
    let monthly_rate = monthly_rate_from_apr(args.apr);
    let result = calc.payoff(args.balance, monthly_rate, args.payment)?;
    let breakdown = calc
        .payoff_simulator()
        .first_payment_breakdown(args.balance, monthly_rate, args.payment)?;

    if json {
        return print_json(&serde_json::json!({
            "result": result,
            "first_payment": breakdown,
            "monthly_rate_percent": monthly_rate * 100.0,
        }));
    }

    println!("Starting balance: {}", format_currency(args.balance));
    println!("Payoff time:      {}", result.duration());
    println!("Total interest:   {}", format_currency(result.total_interest));
    println!("Total paid:       {}", format_currency(result.total_paid));
    println!("Monthly rate:     {:.4}%", monthly_rate * 100.0);
    println!(
        "First payment:    {} principal ({:.1}%), {} interest ({:.1}%)",
        format_currency(breakdown.principal),
        breakdown.principal_percent,
        format_currency(breakdown.interest),
        breakdown.interest_percent
    );
    if result.capped {
        println!(
            "\nNot paid off within {} months; {} still owed.",
            loan_calculator::MAX_PAYOFF_MONTHS,
            format_currency(result.remaining_balance)
        );
    }
    Ok(())
}
