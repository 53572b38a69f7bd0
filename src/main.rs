use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use secrecy::SecretString;

use mailbackup::backup::{BackupProcessor, BackupRequest, ConsoleReporter};
use mailbackup::config::Config;
use mailbackup::email::{parse_cutoff, BackupSummary, FolderKind};
use mailbackup::imap_client::ImapConnector;

#[derive(Parser)]
#[command(name = "mailbackup")]
#[command(about = "Save IMAP messages received since a cutoff date as .eml files")]
#[command(version)]
struct Args {
    /// Email address (prompted for when omitted)
    #[arg(short, long)]
    email: Option<String>,

    /// Destination folder (prompted for when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Cutoff date, YYYY-MM-DD or RFC 3339 (default: 2025-09-12, or BACKUP_SINCE)
    #[arg(short, long)]
    since: Option<String>,

    /// Folder to back up
    #[arg(short, long, value_enum, default_value_t = FolderKind::Inbox)]
    folder: FolderKind,

    /// Print the configuration without connecting
    #[arg(long)]
    check_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present
    dotenv::dotenv().ok();

    let args = Args::parse();

    env_logger::init();

    let config = Config::new()?;
    let since = match args.since.as_deref() {
        Some(raw) => parse_cutoff(raw).context("Invalid --since value")?,
        None => config.since,
    };

    if args.check_config {
        println!("✅ Configuration is valid");
        println!("📧 IMAP server: {}:{}", config.imap.server, config.imap.port);
        println!("📅 Cutoff: {}", since.to_rfc3339());
        println!("📂 Folder: {}", args.folder);
        if let Some(dir) = args.output.as_ref().or(config.backup_dir.as_ref()) {
            println!("📁 Destination: {}", dir);
        }
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("SAVE MESSAGES FROM {} (SINCE {})", config.imap.server, since.format("%d.%m.%Y"));
    println!("{}", "=".repeat(60));
    println!("IMPORTANT: use an application password from your mail settings!");
    println!("{}", "=".repeat(60));

    let email = match args.email {
        Some(email) => email,
        None => prompt("Enter your email: ")?,
    };
    let password = SecretString::from(prompt("Enter the application password: ")?);
    let output = match args.output.or(config.backup_dir.clone()) {
        Some(output) => output,
        None => prompt("Enter the full path of the destination folder: ")?,
    };

    let request = match BackupRequest::new(&email, password, &output, since, args.folder) {
        Ok(request) => request,
        Err(e) => {
            println!("❌ All fields are required! Operation cancelled.");
            return Err(e.into());
        }
    };

    info!("🚀 Starting backup for {}", request.credentials.username);

    let connector = ImapConnector::new(config.imap.clone());
    let processor = BackupProcessor::new(request, ConsoleReporter);

    match processor.run(&connector).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            error!("❌ Backup failed: {}", e);
            println!("❌ Error: {}", e);
            Err(e.into())
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush().context("Unable to write to stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Unable to read from stdin")?;

    Ok(line.trim().to_string())
}

fn print_summary(summary: &BackupSummary) {
    println!("{}", "=".repeat(50));
    if summary.cancelled {
        println!("⏹  Backup cancelled");
    } else {
        println!("✓ Backup completed!");
    }
    println!("✓ Messages found: {}", summary.found);
    println!("✓ Messages saved: {}", summary.saved);
    println!("✓ Skipped (older than cutoff): {}", summary.skipped);
    if summary.failed > 0 {
        println!("⚠️  Failed: {}", summary.failed);
    }
    println!("✓ Saved to: {}", summary.destination.display());
    println!("{}", "=".repeat(50));
}
