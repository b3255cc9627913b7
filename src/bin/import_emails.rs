use std::{error::Error, fs, path::PathBuf};

use clap::Parser;
use rusqlite::Connection;

use spendlog::{import_emails, initialize_db, parse_email_import};

/// Load bank notification emails from a JSON export into the spendlog database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path to a JSON array of emails, each with a `subject` and an RFC 3339 `date`.
    #[arg(long)]
    file: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().init();

    let args = Args::parse();

    let json = fs::read_to_string(&args.file)?;
    let emails = parse_email_import(&json)?;

    let mut connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;
    let imported = import_emails(&emails, &mut connection)?;

    println!("Imported {} emails from {:?}", imported.len(), args.file);

    Ok(())
}
