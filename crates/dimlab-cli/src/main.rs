//! dimlab CLI
//!
//! Terminal front end for the dimension-table simulations:
//! - `pipeline`: narrated SCD run over the seeded customer dimension
//! - `query`: current / as-of / history reads against the same dimension
//! - `sql`: the warehouse statement a strategy corresponds to
//! - `mask` / `rows`: dynamic masking and row access policy demos
//! - `snapshot`: seeded dimension as JSON

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

use dimlab_policy::{
    render_masking_policy, render_row_access_policy, AccessContext, MaskingPolicy, Region, Role,
    RowAccessPolicy,
};
use dimlab_scd::{as_of, current, history, render_as_of_predicate, render_statement};
use dimlab_scd::{DimensionRecord, DimensionTable, ScdStrategy};
use dimlab_sim::fixtures::{
    customer_accounts, customer_dimension, regional_activity, CUSTOMER_SQL_CONTEXT,
};
use dimlab_sim::{FixedDelay, LogLevel, NoDelay, PipelineRun, PipelineState, Scheduler};

#[derive(Parser)]
#[command(name = "dimlab")]
#[command(
    author,
    version,
    about = "Slowly-changing-dimension and governance-policy simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the staged SCD pipeline against the seeded customer dimension.
    Pipeline {
        /// Update strategy to apply when a delta is detected
        #[arg(long, value_enum, default_value = "type2")]
        strategy: StrategyArg,
        /// Incoming value for the tracked attribute
        #[arg(long, default_value = "Austin, TX")]
        incoming: String,
        /// Business key targeted by the incoming record
        #[arg(long, default_value_t = 1)]
        business_key: u64,
        /// Effective date for Type-2 versioning
        #[arg(long, default_value = "2025-01-01")]
        effective_date: NaiveDate,
        /// Pause between stages, in milliseconds
        #[arg(long, default_value_t = 800)]
        delay_ms: u64,
        /// Run all stages without pausing
        #[arg(long)]
        no_delay: bool,
    },

    /// Read queries over the seeded customer dimension.
    Query {
        #[command(subcommand)]
        command: QueryCommands,
    },

    /// Print the warehouse statement for a strategy.
    Sql {
        #[arg(long, value_enum)]
        strategy: StrategyArg,
    },

    /// Dynamic data masking demo over the customer accounts.
    Mask {
        /// Role the query runs as
        #[arg(long, value_enum, default_value = "admin")]
        role: RoleArg,
        /// Also print the policy DDL
        #[arg(long)]
        show_ddl: bool,
    },

    /// Row access policy demo over regional data.
    Rows {
        /// Role the query runs as
        #[arg(long, value_enum, default_value = "admin")]
        role: RoleArg,
        /// Region assigned to a non-admin role
        #[arg(long, value_enum)]
        region: Option<RegionArg>,
        /// Also print the policy DDL
        #[arg(long)]
        show_ddl: bool,
    },

    /// Dump the seeded customer dimension as JSON.
    Snapshot {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum QueryCommands {
    /// Rows valid at a point in time.
    AsOf {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        business_key: Option<u64>,
    },
    /// Rows with the current flag set.
    Current,
    /// Full version history of one business key.
    History {
        #[arg(long, default_value_t = 1)]
        business_key: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Type1,
    Type2,
    Type3,
}

impl From<StrategyArg> for ScdStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Type1 => ScdStrategy::Type1Overwrite,
            StrategyArg::Type2 => ScdStrategy::Type2NewVersion,
            StrategyArg::Type3 => ScdStrategy::Type3PriorValue,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Analyst,
    External,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Analyst => Role::Analyst,
            RoleArg::External => Role::External,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RegionArg {
    Us,
    Eu,
    Apac,
}

impl From<RegionArg> for Region {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Us => Region::Us,
            RegionArg::Eu => Region::Eu,
            RegionArg::Apac => Region::Apac,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Pipeline {
            strategy,
            incoming,
            business_key,
            effective_date,
            delay_ms,
            no_delay,
        } => run_pipeline(
            strategy.into(),
            &incoming,
            business_key,
            effective_date,
            delay_ms,
            no_delay,
        ),
        Commands::Query { command } => run_query(command),
        Commands::Sql { strategy } => {
            println!("{}", render_statement(strategy.into(), &CUSTOMER_SQL_CONTEXT));
            Ok(())
        }
        Commands::Mask { role, show_ddl } => run_mask(role.into(), show_ddl),
        Commands::Rows {
            role,
            region,
            show_ddl,
        } => run_rows(role.into(), region.map(Into::into), show_ddl),
        Commands::Snapshot { out } => run_snapshot(out),
    }
}

// ============================================================================
// Pipeline
// ============================================================================

fn run_pipeline(
    strategy: ScdStrategy,
    incoming: &str,
    business_key: u64,
    effective_date: NaiveDate,
    delay_ms: u64,
    no_delay: bool,
) -> Result<()> {
    let scheduler: Box<dyn Scheduler> = if no_delay {
        Box::new(NoDelay)
    } else {
        Box::new(FixedDelay::from_millis(delay_ms))
    };

    let mut run = PipelineRun::new(customer_dimension(), business_key, strategy);
    println!(
        "{} {} (strategy {}, incoming {})",
        "==".dimmed(),
        run.table().name.bold(),
        strategy.to_string().cyan(),
        format!("'{incoming}'").yellow()
    );
    print_dimension_table(run.table());
    println!();

    let mut printed = 0;
    run.begin_scan(incoming)?;
    printed = drain_log(&run, printed);
    scheduler.pause(PipelineState::Scanning);

    let matches = run.complete_scan()?.matches;
    printed = drain_log(&run, printed);

    if !matches {
        scheduler.pause(PipelineState::Updating);
        run.begin_update()?;
        printed = drain_log(&run, printed);

        scheduler.pause(PipelineState::Done);
        run.commit_update(effective_date)?;
        drain_log(&run, printed);

        println!();
        print_dimension_table(run.table());
    }

    let metrics = run.metrics();
    println!();
    println!(
        "{} rows: {} (seeded {}, growth {}%)",
        "metrics".dimmed(),
        metrics.rows,
        metrics.seed_rows,
        metrics.growth_percent
    );

    println!();
    println!("{}", "-- SQL equivalent".dimmed());
    println!("{}", render_statement(strategy, &CUSTOMER_SQL_CONTEXT));
    Ok(())
}

/// Print log events past `printed`, returning the new high-water mark.
fn drain_log(run: &PipelineRun, printed: usize) -> usize {
    for event in &run.log()[printed..] {
        let line = match event.level {
            LogLevel::Info => event.message.normal(),
            LogLevel::Delta => event.message.yellow(),
            LogLevel::Warn => event.message.red(),
            LogLevel::Success => event.message.green(),
        };
        println!("{line}");
    }
    run.log().len()
}

// ============================================================================
// Queries
// ============================================================================

fn run_query(command: QueryCommands) -> Result<()> {
    let table = customer_dimension();
    match command {
        QueryCommands::AsOf { date, business_key } => {
            println!("{}", render_as_of_predicate(date).dimmed());
            let rows: Vec<&DimensionRecord> = as_of(&table, business_key, date).collect();
            print_rows(&table, &rows);
        }
        QueryCommands::Current => {
            println!("{}", "WHERE CURRENT_FLAG = TRUE".dimmed());
            let rows: Vec<&DimensionRecord> = current(&table).collect();
            print_rows(&table, &rows);
        }
        QueryCommands::History { business_key } => {
            let rows = history(&table, business_key);
            print_rows(&table, &rows);
        }
    }
    Ok(())
}

// ============================================================================
// Policies
// ============================================================================

fn run_mask(role: Role, show_ddl: bool) -> Result<()> {
    let email = MaskingPolicy::email();
    let ssn = MaskingPolicy::ssn();
    let card = MaskingPolicy::credit_card();

    println!("{} {}", "current role:".dimmed(), role.to_string().bold());
    println!(
        "{:<4} {:<16} {:<24} {:<14} {:<22} {:>10}",
        "ID", "NAME", "EMAIL", "SSN", "CREDIT_CARD", "REVENUE"
    );
    for account in customer_accounts() {
        println!(
            "{:<4} {:<16} {:<24} {:<14} {:<22} {:>10}",
            account.id,
            account.name,
            email.apply(role, &account.email),
            ssn.apply(role, &account.ssn),
            card.apply(role, &account.credit_card),
            format!("${}", account.revenue)
        );
    }

    if show_ddl {
        println!();
        for policy in [email, ssn, card] {
            println!("{}", render_masking_policy(&policy, "customers"));
            println!();
        }
    }
    Ok(())
}

fn run_rows(role: Role, region: Option<Region>, show_ddl: bool) -> Result<()> {
    let policy = RowAccessPolicy::regional_isolation();
    let ctx = AccessContext {
        role,
        assigned_region: region,
    };

    let accounts = customer_accounts();
    let outcome = policy.filter(&ctx, &accounts);
    println!(
        "{} {}{}",
        "current role:".dimmed(),
        role.to_string().bold(),
        region.map(|r| format!(" ({r})")).unwrap_or_default()
    );
    println!("{:<4} {:<16} {:<8} {:>10}", "ID", "NAME", "REGION", "REVENUE");
    for account in &outcome.visible {
        println!(
            "{:<4} {:<16} {:<8} {:>10}",
            account.id,
            account.name,
            account.region.to_string(),
            format!("${}", account.revenue)
        );
    }
    if outcome.hidden > 0 {
        println!("{}", format!("{} rows filtered by policy", outcome.hidden).red());
    }

    let activity = regional_activity();
    let visible_points = policy.filter(&ctx, &activity);
    println!(
        "visible activity samples: {}/{}",
        visible_points.visible.len(),
        activity.len()
    );

    if show_ddl {
        println!();
        println!("{}", render_row_access_policy(&policy, "customers"));
    }
    Ok(())
}

// ============================================================================
// Snapshot
// ============================================================================

fn run_snapshot(out: Option<PathBuf>) -> Result<()> {
    let table = customer_dimension();
    let json = serde_json::to_string_pretty(&table)?;
    match out {
        Some(path) => {
            let mut file = std::fs::File::create(&path)?;
            writeln!(file, "{json}")?;
            println!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

fn print_dimension_table(table: &DimensionTable) {
    let rows: Vec<&DimensionRecord> = table.records().iter().collect();
    print_rows(table, &rows);
}

fn print_rows(table: &DimensionTable, rows: &[&DimensionRecord]) {
    println!(
        "{:<4} {:<4} {:<16} {:<18} {:<14} {:<12} {:<12} {:<8}",
        "SK", "ID", "NAME", "LOCATION", "PREV", "START", "END", "CURRENT"
    );
    for row in rows {
        let start = row.valid_from.to_string();
        let end = row
            .valid_to
            .map(|d| d.to_string())
            .unwrap_or_else(|| "NULL".to_string());
        let flag = if row.is_current { "TRUE" } else { "FALSE" };
        let line = format!(
            "{:<4} {:<4} {:<16} {:<18} {:<14} {:<12} {:<12} {:<8}",
            row.surrogate_key,
            row.business_key,
            row.attribute("name").unwrap_or("-"),
            row.attribute(&table.tracked_attribute).unwrap_or("-"),
            row.prior_value.as_deref().unwrap_or("-"),
            start,
            end,
            flag
        );
        if row.is_current {
            println!("{}", line.green());
        } else {
            println!("{}", line.dimmed());
        }
    }
    if rows.is_empty() {
        println!("{}", "(no records match)".dimmed());
    }
}
