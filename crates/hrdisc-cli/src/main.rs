//! hrdisc CLI - client record viewer, editor and exporter

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use hrdisc::prelude::*;
use hrdisc::{connect_store, export_file_name, mailto_link, profile_file_name, tel_link, TABLE_EXPORT_STEM};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hrdisc")]
#[command(
    author,
    version,
    about = "HR DISC client records: view, edit, export and sync"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "HRDISC_CONFIG")]
    config: Option<PathBuf>,

    /// Spreadsheet document id
    #[arg(long, global = true)]
    sheet_id: Option<String>,

    /// Preferred worksheet title
    #[arg(long, global = true)]
    worksheet: Option<String>,

    /// Service-account key file
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List clients with completeness markers
    #[command(alias = "ls")]
    List {
        /// Case-insensitive text to look for in any field
        #[arg(short, long)]
        search: Option<String>,

        /// Sort by full_name, email, company_id, first_name or last_name
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one client's profile
    Show {
        /// Client index as shown by `list`
        index: usize,

        /// Print narrative fields in full
        #[arg(long)]
        full: bool,
    },

    /// Add a client to the worksheet
    Add {
        #[command(flatten)]
        input: RecordInput,
    },

    /// Overwrite fields of an existing client
    Edit {
        /// Client index as shown by `list`
        index: usize,

        #[command(flatten)]
        input: RecordInput,
    },

    /// Remove a client from the table
    Delete {
        /// Client index as shown by `list`
        index: usize,

        /// Rewrite the worksheet afterwards
        #[arg(long)]
        sync: bool,
    },

    /// Rewrite the worksheet from the current table
    Sync,

    /// Merge a CSV file into the table, skipping duplicates
    Import {
        /// CSV file with a header row
        file: PathBuf,

        /// Rewrite the worksheet afterwards
        #[arg(long)]
        sync: bool,
    },

    /// Export clients as CSV or JSON
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Export only this client
        #[arg(long)]
        client: Option<usize>,

        /// Output file (default: a timestamped name in the current directory)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Show record count, valid emails and average completeness
    Stats,

    /// List worksheets in the remote document
    Sheets,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(clap::Args)]
struct RecordInput {
    /// Field value as FIELD=VALUE (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// JSON object file with field values
    #[arg(long)]
    from: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut session = open_session(&cli)?;

    match cli.command {
        Commands::List { search, sort } => list_clients(&session, search.as_deref(), sort.as_deref()),
        Commands::Show { index, full } => show_client(&session, index, full),
        Commands::Add { input } => {
            let record = input.apply(ClientRecord::new())?;
            report(session.add_client(record)?)
        }
        Commands::Edit { index, input } => {
            let record = input.apply(session.record(index)?.clone())?;
            report(session.edit_client(index, record)?)
        }
        Commands::Delete { index, sync } => {
            let (removed, outcome) = session.delete_client(index, sync)?;
            eprintln!("Removed '{}'", removed.full_name());
            match outcome {
                Some(outcome) => report(outcome),
                None => {
                    eprintln!("Local change only; run with --sync to update the worksheet");
                    Ok(())
                }
            }
        }
        Commands::Sync => report(session.sync()?),
        Commands::Import { file, sync } => {
            let added = session
                .import_csv(&file)
                .with_context(|| format!("Failed to import '{}'", file.display()))?;
            eprintln!("Imported {} new clients ({} total)", added, session.table().len());
            if sync {
                report(session.sync()?)
            } else {
                Ok(())
            }
        }
        Commands::Export {
            format,
            client,
            output,
            stdout,
        } => export(&session, format, client, output.as_deref(), stdout),
        Commands::Stats => show_stats(&session),
        Commands::Sheets => list_sheets(&mut session),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_session(cli: &Cli) -> Result<Session> {
    let mut config = CrmConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(id) = &cli.sheet_id {
        config.spreadsheet_id = Some(id.clone());
    }
    if let Some(title) = &cli.worksheet {
        config.worksheet = title.clone();
    }
    if let Some(path) = &cli.credentials {
        config.credentials_path = Some(path.clone());
    }

    let store = match connect_store(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Warning: {e}");
            None
        }
    };
    if store.is_none() {
        tracing::info!("No authenticated store; running local-only");
    }

    let mut session = Session::new(store, &config);
    session.ensure_loaded();
    match session.status() {
        LoadStatus::Success | LoadStatus::NotConnected => {}
        status => eprintln!("Warning: {status}"),
    }
    Ok(session)
}

impl RecordInput {
    fn apply(&self, mut record: ClientRecord) -> Result<ClientRecord> {
        if let Some(path) = &self.from {
            let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
            let from: ClientRecord =
                serde_json::from_str(&text).with_context(|| format!("'{}' is not a JSON object", path.display()))?;
            for (field, value) in from.iter() {
                if !value.is_empty() {
                    record.set(field, value)?;
                }
            }
        }

        for assignment in &self.set {
            let (field, value) = assignment
                .split_once('=')
                .with_context(|| format!("Expected FIELD=VALUE, got '{assignment}'"))?;
            record
                .set(field.trim(), value)
                .with_context(|| format!("Cannot set '{}'", field.trim()))?;
        }
        Ok(record)
    }
}

fn report(outcome: MutationOutcome) -> Result<()> {
    if !outcome.ok {
        bail!(outcome.message);
    }
    eprintln!("{}", outcome.message);
    Ok(())
}

fn list_clients(session: &Session, search: Option<&str>, sort: Option<&str>) -> Result<()> {
    let entries = session.list(search, sort)?;
    if entries.is_empty() {
        eprintln!("No clients found");
        return Ok(());
    }

    for entry in &entries {
        println!("{:>4}  {}", entry.index, entry);
    }
    eprintln!("{} of {} clients", entries.len(), session.table().len());
    Ok(())
}

fn show_client(session: &Session, index: usize, full: bool) -> Result<()> {
    let record = session.record(index)?;
    let profile = session.profile(index)?;

    println!("{}", profile.name);
    println!("{}", profile.email);
    println!(
        "{} {:.0}% complete",
        CompletenessTier::from_percent(profile.completeness).marker(),
        profile.completeness
    );

    let links: Vec<String> = [mailto_link(record), tel_link(record)].into_iter().flatten().collect();
    if !links.is_empty() {
        println!("Contact: {}", links.join("  "));
    }

    for section in &profile.sections {
        println!();
        println!("== {} ==", section.category.label());
        for row in &section.rows {
            match (full, row.value.expanded()) {
                (true, Some(text)) => {
                    println!("  {}:", row.label);
                    for line in text.lines() {
                        println!("    {line}");
                    }
                }
                (false, Some(_)) => println!("  {}: {} [--full to expand]", row.label, row.value),
                _ => println!("  {}: {}", row.label, row.value),
            }
        }
    }

    Ok(())
}

fn export(
    session: &Session,
    format: ExportFormat,
    client: Option<usize>,
    output: Option<&Path>,
    stdout: bool,
) -> Result<()> {
    let data = match format {
        ExportFormat::Csv => session.export_csv(client)?,
        ExportFormat::Json => session.export_json(client)?,
    };

    if stdout {
        io::stdout()
            .write_all(data.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let path = match (output, client) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(index)) => PathBuf::from(profile_file_name(session.record(index)?, format.extension())),
        (None, None) => PathBuf::from(export_file_name(
            TABLE_EXPORT_STEM,
            format.extension(),
            chrono::Local::now().naive_local(),
        )),
    };

    std::fs::write(&path, &data).with_context(|| format!("Failed to write '{}'", path.display()))?;
    let count = if client.is_some() { 1 } else { session.table().len() };
    eprintln!("Wrote {} clients to '{}'", count, path.display());
    Ok(())
}

fn show_stats(session: &Session) -> Result<()> {
    let stats = session.stats();
    println!("Total Records: {}", stats.total);
    println!("Valid Emails: {}", stats.valid_emails);
    println!("Avg Completeness: {:.1}%", stats.average_completeness);
    if let Some(url) = session.document_url() {
        println!("Document: {url}");
    }
    Ok(())
}

fn list_sheets(session: &mut Session) -> Result<()> {
    let current = session.worksheet().map(|w| w.title.clone());
    for (i, title) in session.worksheet_titles()?.iter().enumerate() {
        let marker = if current.as_deref() == Some(title.as_str()) { "*" } else { " " };
        println!("{}{}\t{}", marker, i, title);
    }
    Ok(())
}
