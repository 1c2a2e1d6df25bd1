//! tablecraft CLI - pivot queries and table materialization
//!
//! Usage:
//!   tablecraft generate-pivot <schema> <table> --base-columns <c>... --pivot-columns <c>...
//!   tablecraft create-pivot <schema> <table> <target> --base-columns <c>... --pivot-columns <c>...
//!   tablecraft materialize <schema> <table> [--sql-file <file>] [--design <file>]
//!
//! Examples:
//!   tablecraft generate-pivot analytics logins --base-columns user_id --pivot-columns month
//!   tablecraft create-pivot analytics logins logins_by_month \
//!       --base-columns user_id --pivot-columns month --aggregate streak=max
//!   tablecraft --connection local materialize main daily_users --sql-file daily_users.sql

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tablecraft::aggregate::AggregateOverrides;
use tablecraft::config::{ConnectionSettings, Settings};
use tablecraft::design::TableDesign;
use tablecraft::executor::SqliteExecutor;
use tablecraft::pivot::PivotRequest;
use tablecraft::workflow::Workflow;
use tablecraft::Dialect;

#[derive(Parser)]
#[command(name = "tablecraft")]
#[command(about = "tablecraft - Generate pivot queries and materialize SELECTs as typed tables")]
#[command(version)]
struct Cli {
    /// Config file (defaults to TABLECRAFT_CONFIG, ./tablecraft.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Named connection from the config file
    #[arg(short, long, global = true)]
    connection: Option<String>,

    /// SQL dialect (defaults to the connection's driver; must match it for sqlite)
    #[arg(short, long, global = true)]
    dialect: Option<DialectArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print (or write) the pivot query for a source table
    GeneratePivot {
        #[command(flatten)]
        pivot: PivotArgs,

        /// Write the query to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the pivot query and materialize it as a table
    CreatePivot {
        #[command(flatten)]
        pivot: PivotArgs,

        /// Table to create, in the source schema
        table_name: String,

        /// Table design file (TOML or JSON)
        #[arg(long)]
        design: Option<PathBuf>,
    },

    /// (Re-)create a table from a stored SELECT
    Materialize {
        /// Schema in which to create the table
        schema: String,

        /// Name of the table to create
        table: String,

        /// Query file (defaults to <sql_directory>/<table>.sql)
        #[arg(long)]
        sql_file: Option<PathBuf>,

        /// Table design file (defaults to <design_directory>/<table>.toml if present)
        #[arg(long)]
        design: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PivotArgs {
    /// Schema of the source table
    source_schema: String,

    /// Source table
    source_table: String,

    /// Columns kept as-is and grouped by
    #[arg(long, num_args = 1.., required = true)]
    base_columns: Vec<String>,

    /// Columns whose distinct values become buckets
    #[arg(long, num_args = 1.., required = true)]
    pivot_columns: Vec<String>,

    /// Columns left out of the output
    #[arg(long, num_args = 0..)]
    exclude_columns: Vec<String>,

    /// Columns that get no overall aggregate
    #[arg(long, num_args = 0..)]
    exclude_aggregates: Vec<String>,

    /// Aggregate override, `column=alias` or `column=FUNCTION:default`
    #[arg(short, long = "aggregate")]
    aggregates: Vec<String>,
}

impl PivotArgs {
    fn to_request(&self) -> tablecraft::Result<PivotRequest> {
        let overrides = AggregateOverrides::parse_items(self.aggregates.iter().map(String::as_str))?;
        Ok(PivotRequest::new(&self.source_schema, &self.source_table)
            .base_columns(&self.base_columns)
            .pivot_columns(&self.pivot_columns)
            .exclude_columns(&self.exclude_columns)
            .exclude_from_overall(&self.exclude_aggregates)
            .overrides(overrides))
    }
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Redshift,
    Postgres,
    Snowflake,
    Duckdb,
    Sqlite,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Redshift => Dialect::Redshift,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Snowflake => Dialect::Snowflake,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Sqlite => Dialect::Sqlite,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    let (name, connection) = select_connection(&settings, cli.connection.as_deref())?;
    let driver = connection.driver_type()?;
    let dialect = driver.resolve_dialect(cli.dialect.map(Dialect::from))?;

    if !driver.has_builtin_executor() {
        return Err(format!(
            "connection '{}' uses driver '{}', which has no built-in executor; \
             use the library with an Executor for that client",
            name, driver
        )
        .into());
    }
    let executor = open_sqlite(&connection.resolved_connection_string()?)?;
    let workflow = Workflow::from_settings(settings.clone(), dialect);

    match cli.command {
        Commands::GeneratePivot { pivot, output } => {
            let query = workflow
                .generate_pivot_query(&executor, &pivot.to_request()?)
                .await?;
            match output {
                Some(path) => fs::write(&path, &query)?,
                None => print!("{}", query),
            }
        }
        Commands::CreatePivot {
            pivot,
            table_name,
            design,
        } => {
            let design = load_design(design.as_deref())?;
            let report = workflow
                .create_pivot_table(
                    &executor,
                    &pivot.to_request()?,
                    &pivot.source_schema,
                    &table_name,
                    &design,
                )
                .await?;
            println!(
                "Created {}.{} ({} columns)",
                report.schema,
                report.table,
                report.columns.len()
            );
        }
        Commands::Materialize {
            schema,
            table,
            sql_file,
            design,
        } => {
            let report = workflow
                .create_table_from_select(
                    &executor,
                    &schema,
                    &table,
                    sql_file.as_deref(),
                    design.as_deref(),
                )
                .await?;
            println!(
                "Created {}.{} ({} columns)",
                report.schema,
                report.table,
                report.columns.len()
            );
        }
    }

    Ok(())
}

fn select_connection<'a>(
    settings: &'a Settings,
    name: Option<&str>,
) -> CliResult<(String, &'a ConnectionSettings)> {
    match name {
        Some(name) => Ok((name.to_string(), settings.get_connection(name)?)),
        None => settings
            .default_connection()
            .map(|(name, conn)| (name.to_string(), conn))
            .ok_or_else(|| "no connection configured; add [connections.<name>] to tablecraft.toml".into()),
    }
}

fn open_sqlite(connection_string: &str) -> CliResult<SqliteExecutor> {
    let executor = if connection_string == ":memory:" {
        SqliteExecutor::open_in_memory()?
    } else {
        SqliteExecutor::open(connection_string)?
    };
    Ok(executor)
}

fn load_design(path: Option<&Path>) -> CliResult<TableDesign> {
    Ok(match path {
        Some(path) => TableDesign::load(path)?,
        None => TableDesign::default(),
    })
}
