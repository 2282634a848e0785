//! Invomail CLI - email invoice verification results
//!
//! # Commands
//!
//! ```bash
//! invomail serve                 # Start HTTP server (port 3000)
//! invomail process               # Run one batch from the terminal
//! invomail test-email qa@x.com   # Send a single test email
//! ```
//!
//! Configuration comes from the environment (or a `.env` file); see
//! `config` for the variable list. Missing transport credentials abort
//! before any command runs.

use clap::{Parser, Subcommand};
use invomail::{process_invoices, send_test_email, AppConfig, CsvDataSource};

#[derive(Parser)]
#[command(name = "invomail")]
#[command(about = "Email invoice verification results to vendors and treasury", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Run one batch over the configured tables and print the report
    Process,

    /// Send a single test email
    TestEmail {
        /// Recipient address
        to: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Configuration faults are fatal before any command runs.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve { port } => invomail::server::start_server(config, port).await,

        Commands::Process => cmd_process(config).await,

        Commands::TestEmail { to } => cmd_test_email(config, &to).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_process(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mailer = invomail::mailer::from_config(&config)?;
    let source = CsvDataSource::from_config(&config);

    let report = process_invoices(&source, mailer.as_ref()).await?;

    println!("\n{}", "=".repeat(70));
    println!("📊 BATCH REPORT ({})", report.run_id);
    println!("{}", "=".repeat(70));
    println!("   Processed: {}", report.total_processed);
    println!("   Succeeded: {}", report.succeeded);
    println!("   Failed:    {}", report.failed);

    for outcome in &report.results {
        if outcome.success {
            println!(
                "   ✅ {} [{}] → {}",
                outcome.invoice_no,
                outcome.status,
                outcome.email_sent_to.join(", ")
            );
        } else {
            println!(
                "   ❌ {} [{}]: {}",
                outcome.invoice_no,
                outcome.status,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("{}\n", "=".repeat(70));

    Ok(())
}

async fn cmd_test_email(config: AppConfig, to: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mailer = invomail::mailer::from_config(&config)?;

    println!("📧 Sending test email to {}", to);
    send_test_email(mailer.as_ref(), to).await?;
    println!("✅ Test email sent");

    Ok(())
}
