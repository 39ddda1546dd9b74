use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use rutax_core::{
    CustomerTaxParameters, EntityType, Money, TaxCalculatorFactory, TaxComparison, TaxRegime,
    TaxReportDetails,
};
use rutax_data::RateTable;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Calculate the tax and insurance liability of a small business.
///
/// Rates and amounts are read from a CSV file with the columns
/// `tax_year,kind,value`, one row per rate or amount and year.
#[derive(Parser, Debug)]
#[command(name = "rutax-calc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing rates and amounts
    #[arg(short, long)]
    rates: PathBuf,

    /// Entity type: IP (individual entrepreneur) or ORG (organization)
    #[arg(short, long, value_parser = parse_entity)]
    entity: EntityType,

    /// Tax regime: USN6, USN15 or OSN
    #[arg(short = 's', long, value_parser = parse_regime, default_value = "USN6")]
    regime: TaxRegime,

    /// Tax year (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Income for the period, VAT included
    #[arg(long)]
    income: Decimal,

    /// Expenses for the period, VAT included
    #[arg(long, default_value = "0")]
    expense: Decimal,

    /// Payroll paid out to employees, net of income tax
    #[arg(long, default_value = "0")]
    salary: Decimal,

    /// Also calculate the other regimes and name the cheapest
    #[arg(short, long, default_value_t = false)]
    compare: bool,
}

fn parse_entity(s: &str) -> Result<EntityType, String> {
    EntityType::parse(s).ok_or_else(|| format!("unknown entity type '{s}', expected IP or ORG"))
}

fn parse_regime(s: &str) -> Result<TaxRegime, String> {
    TaxRegime::parse(s).ok_or_else(|| format!("unknown regime '{s}', expected USN6, USN15 or OSN"))
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Honours `RUST_LOG`, falling back to `warn` so normal runs print only the
/// report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── output ──────────────────────────────────────────────────────────────────

fn print_details(details: &TaxReportDetails) {
    println!("{}", details.tax_system);

    let lines = [
        ("employee pension", Some(details.pension_insurance_employees)),
        ("employee health", Some(details.health_insurance_employees)),
        ("employee social", Some(details.social_insurance_employees)),
        ("own pension", details.pension_insurance_oneself),
        ("own health", details.health_insurance_oneself),
        ("additional contribution", details.additional_insurance_fee),
        ("insurance contributions", Some(details.insurance_contributions)),
        ("charged USN tax", details.charged_usn_tax),
        ("contribution deduction", details.insurance_contributions_deduction),
        ("taxable expenses", details.taxable_expenses),
        ("USN tax", details.usn_tax),
        ("personal income tax", details.pit),
        ("VAT", details.vat),
        ("profit tax", details.profit_tax),
        ("total", Some(details.total)),
    ];
    for (label, amount) in lines {
        if let Some(amount) = amount {
            println!("  {label:<24} {}", amount.round());
        }
    }

    match details.tax_burden {
        Some(burden) => println!("  {:<24} {burden}%", "tax burden"),
        None => println!("  {:<24} above 100%", "tax burden"),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let file = File::open(&args.rates)
        .with_context(|| format!("Failed to open: {}", args.rates.display()))?;
    let table = RateTable::from_reader(file)
        .with_context(|| format!("Failed to load rate table: {}", args.rates.display()))?;
    debug!(years = ?table.years(), "rate table ready");

    let customer = CustomerTaxParameters::new(
        Money::new(args.income),
        Money::new(args.expense),
        Money::new(args.salary),
    )
    .context("Invalid customer figures")?;

    let factory = TaxCalculatorFactory::new(&table, &table);
    let calculator = match args.year {
        Some(year) => factory.build_calculator(args.entity, args.regime, year),
        None => factory.build_calculator_for_current_year(args.entity, args.regime),
    }
    .context("Failed to build calculator")?;
    info!(
        entity = %calculator.entity_type(),
        regime = %calculator.regime(),
        year = calculator.year(),
        "calculating"
    );

    let aggregate = calculator.calculate(customer);
    print_details(&TaxReportDetails::from(&aggregate));

    if args.compare {
        let comparison = TaxComparison::calculate(
            &factory,
            args.entity,
            args.regime,
            calculator.year(),
            customer,
        )
        .context("Failed to compare regimes")?;

        for details in [&comparison.usn_income, &comparison.usn_income_expense, &comparison.osn] {
            if details.tax_system != comparison.current_tax_system {
                print_details(details);
            }
        }
        println!("cheapest: {}", comparison.cheapest().tax_system);
    }

    Ok(())
}
