use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;
use std::error::Error;
use std::process;
use tabled::{builder::Builder, settings::Style, Table};

use mortgage_calc::{
    analyze_lump_sum, analyze_recurring, average, comparison_rows, format_currency,
    generate_baseline_schedule, generate_extra_principal_schedule, payment_dates, ComparisonRow,
    InvalidTermsError, LoanTerms, MortgageRecord, MortgageRegistry, ScheduleRow, ScheduleSummary,
};

/// Fixed-rate mortgage payments, amortization schedules and overpayment what-ifs
#[derive(Parser)]
#[command(name = "mortgage", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and lifetime interest for a loan
    Payment(LoanArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Model paying more than the fixed payment
    Overpay {
        #[command(subcommand)]
        kind: Overpay,
    },
    /// Side-by-side table of two or more loans
    Compare(LoanListArgs),
    /// Averages across the given loans
    Metrics(LoanListArgs),
}

#[derive(Subcommand)]
enum Overpay {
    /// Extra principal paid every month
    Extra(OverpayArgs),
    /// One-time principal reduction, re-amortized over the same term
    Lump(OverpayArgs),
}

#[derive(Args)]
struct LoanArgs {
    /// Loan amount, or remaining principal on an existing loan
    #[arg(short, long)]
    principal: f64,

    /// Annual percentage rate, e.g. 4.3
    #[arg(short, long)]
    apr: f64,

    /// Term, or remaining term, in years
    #[arg(short, long)]
    years: u32,

    /// Name of up to 10 characters
    #[arg(short, long)]
    name: Option<String>,
}

impl LoanArgs {
    fn terms(&self) -> Result<LoanTerms, InvalidTermsError> {
        let terms = LoanTerms::new(self.principal, self.apr, self.years)?;
        match &self.name {
            Some(name) => terms.with_name(name.as_str()),
            None => Ok(terms),
        }
    }
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Extra principal paid each month
    #[arg(short, long)]
    extra: Option<f64>,

    /// Label rows with dates starting here (YYYY-MM-DD)
    #[arg(long)]
    first_payment: Option<NaiveDate>,
}

#[derive(Args)]
struct OverpayArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Overpayment amount
    #[arg(long)]
    amount: f64,
}

#[derive(Args)]
struct LoanListArgs {
    /// NAME:PRINCIPAL:APR:YEARS, repeatable
    #[arg(short, long = "loan", value_parser = parse_loan, required = true)]
    loans: Vec<LoanTerms>,
}

fn parse_loan(s: &str) -> Result<LoanTerms, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [name, principal, apr, years] = parts.as_slice() else {
        return Err(format!("expected NAME:PRINCIPAL:APR:YEARS, got {:?}", s));
    };
    let principal: f64 = principal
        .parse()
        .map_err(|e| format!("principal {:?}: {}", principal, e))?;
    let apr: f64 = apr.parse().map_err(|e| format!("APR {:?}: {}", apr, e))?;
    let years: u32 = years
        .parse()
        .map_err(|e| format!("years {:?}: {}", years, e))?;

    let terms = LoanTerms::new(principal, apr, years).map_err(|e| e.to_string())?;
    if name.is_empty() {
        Ok(terms)
    } else {
        terms.with_name(*name).map_err(|e| e.to_string())
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).env().init() {
        eprintln!("{}: logger: {}", "warning".yellow().bold(), e);
    }

    let result: Result<(), Box<dyn Error>> = match cli.command {
        Commands::Payment(args) => run_payment(&args),
        Commands::Schedule(args) => run_schedule(&args),
        Commands::Overpay {
            kind: Overpay::Extra(args),
        } => run_extra(&args),
        Commands::Overpay {
            kind: Overpay::Lump(args),
        } => run_lump(&args),
        Commands::Compare(args) => run_compare(args),
        Commands::Metrics(args) => run_metrics(&args),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }
}

fn print_details(terms: &LoanTerms) {
    if let Some(name) = terms.name() {
        println!("MORTGAGE: {}", name);
    }
    println!("Principal: {}", format_currency(terms.principal()));
    println!("Length of Mortgage: {} years", terms.term_years());
    println!("Annual Percentage Rate: {}%", terms.apr());
    println!("Monthly Payment: {}", format_currency(terms.monthly_payment()));
    println!("Cost of this loan: {}", format_currency(terms.lifetime_interest()));
}

fn schedule_table(rows: &[ScheduleRow], dates: Option<&[NaiveDate]>, show_extra: bool) -> Table {
    let mut builder = Builder::default();

    let mut header = vec!["Month"];
    if dates.is_some() {
        header.push("Date");
    }
    header.extend(["Pmts Left", "Payment", "Principal"]);
    if show_extra {
        header.push("Xtra Princ");
    }
    header.extend(["Interest", "Balance"]);
    builder.push_record(header);

    for (i, row) in rows.iter().enumerate() {
        let mut record = vec![row.month.to_string()];
        if let Some(dates) = dates {
            record.push(dates.get(i).map(ToString::to_string).unwrap_or_default());
        }
        record.push(row.payments_remaining.to_string());
        record.push(format_currency(row.payment));
        record.push(format_currency(row.principal));
        if show_extra {
            record.push(format_currency(row.extra_principal));
        }
        record.push(format_currency(row.interest));
        record.push(format_currency(row.balance));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::markdown());
    table
}

fn print_summary(rows: &[ScheduleRow]) {
    let summary = ScheduleSummary::from_rows(rows);
    println!("Months shown: {}", summary.months);
    println!("Interest paid: {}", format_currency(summary.total_interest));
    println!("Total paid: {}", format_currency(summary.total_paid));
}

fn run_payment(args: &LoanArgs) -> Result<(), Box<dyn Error>> {
    let terms = args.terms()?;
    print_details(&terms);
    Ok(())
}

fn run_schedule(args: &ScheduleArgs) -> Result<(), Box<dyn Error>> {
    let terms = args.loan.terms()?;
    let rows = match args.extra {
        Some(extra) => generate_extra_principal_schedule(&terms, extra)?,
        None => generate_baseline_schedule(&terms),
    };
    // rows can skip months only when filtered, so date each row by its month
    let dates = args.first_payment.map(|first| {
        let all = payment_dates(first, terms.total_payments() as usize);
        rows.iter()
            .filter_map(|row| all.get(row.month as usize - 1).copied())
            .collect::<Vec<_>>()
    });

    println!("{}", "AMORTIZATION SCHEDULE FOR:".yellow());
    print_details(&terms);
    println!();
    println!(
        "{}",
        schedule_table(&rows, dates.as_deref(), args.extra.is_some())
    );
    println!();
    print_summary(&rows);
    Ok(())
}

fn run_extra(args: &OverpayArgs) -> Result<(), Box<dyn Error>> {
    let terms = args.loan.terms()?;
    let analysis = analyze_recurring(&terms, args.amount)?;

    println!("{}", "Current Mortgage:".yellow());
    print_details(&analysis.current.terms);
    println!();
    println!("{}", "UPDATED MORTGAGE AMORTIZATION SCHEDULE:".yellow());
    println!(
        "Extra Monthly Principal Payment: {}",
        format_currency(analysis.extra_monthly_principal)
    );
    println!();
    println!("{}", schedule_table(&analysis.schedule, None, true));
    println!();
    println!("Months saved: {}", analysis.months_saved());
    println!("Interest saved: {}", format_currency(analysis.interest_saved()));
    Ok(())
}

fn run_lump(args: &OverpayArgs) -> Result<(), Box<dyn Error>> {
    let terms = args.loan.terms()?;
    let analysis = analyze_lump_sum(&terms, args.amount)?;

    println!("{}", "Current Mortgage:".yellow());
    print_details(&analysis.original.terms);
    println!();
    println!("{}", "UPDATED Mortgage:".yellow());
    print_details(&analysis.reduced.terms);
    println!(
        "Principal Lump Overpayment: {}",
        format_currency(analysis.lump_sum)
    );
    println!();
    println!(
        "Payment reduction: {}",
        format_currency(analysis.payment_reduction())
    );
    println!("Interest saved: {}", format_currency(analysis.interest_saved()));
    Ok(())
}

fn run_compare(args: LoanListArgs) -> Result<(), Box<dyn Error>> {
    if args.loans.len() < 2 {
        return Err("comparison needs at least two mortgages".into());
    }
    let mut registry = MortgageRegistry::new();
    for terms in args.loans {
        let id = registry.add(terms);
        debug!("registered {}", id);
    }

    let mut builder = Builder::default();
    builder.push_record(ComparisonRow::HEADERS);
    for row in comparison_rows(&registry) {
        builder.push_record(row.fields());
    }
    let mut table = builder.build();
    table.with(Style::psql());

    println!("{}", "MORTGAGE COMPARISON TABLE".yellow());
    println!();
    println!("{}", table);
    Ok(())
}

fn run_metrics(args: &LoanListArgs) -> Result<(), Box<dyn Error>> {
    let records: Vec<MortgageRecord> = args.loans.iter().map(MortgageRecord::from_terms).collect();
    let averages = average(&records).ok_or("no mortgages to average")?;
    println!("{}", averages);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_loan;
    use mortgage_calc::{LoanTerms, MortgageProfile, MortgageRegistry, ScheduleRow};
    use test_log::test;

    // verifies that types can implement the gated traits below
    fn is_normal<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn normal_types() {
        is_normal::<LoanTerms>();
        is_normal::<ScheduleRow>();
        is_normal::<MortgageProfile>();
        is_normal::<MortgageRegistry>();
    }

    #[test]
    fn test_parse_loan() {
        let terms = parse_loan("House:350000:4.3:30").unwrap();
        assert_eq!(terms.name(), Some("House"));
        assert_eq!(terms.principal(), 350000.);
        assert_eq!(terms.apr(), 4.3);
        assert_eq!(terms.term_years(), 30);

        assert_eq!(parse_loan(":1000:5:10").unwrap().name(), None);
        assert!(parse_loan("House:350000:4.3").is_err());
        assert!(parse_loan("House:lots:4.3:30").is_err());
        assert!(parse_loan("House:350000:0:30").is_err());
        assert!(parse_loan("Beach house:350000:4.3:30").is_err());
    }
}
