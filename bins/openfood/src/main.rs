//! openfood - Open Food Facts from the command line
//!
//! Facet search, barcode lookup and product submission.

use clap::{Parser, Subcommand};
use openfood_api_client::FacetKind;
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;

use commands::{facets, product, search, submit};

/// Open Food Facts command-line client
#[derive(Parser)]
#[command(name = "openfood")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List facet kinds and their endpoints
    Facets,

    /// Search products by facet value
    Search {
        /// Facet kind (e.g. brand, purchase-place, nutrition-grade)
        facet: FacetKind,

        /// Facet value slug (e.g. monoprix)
        value: String,

        /// Comma-separated fields to include for each product
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Maximum number of products to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Look up a product by barcode
    Product {
        /// Product barcode
        barcode: String,

        /// Comma-separated fields to fetch
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// User-agent tag to send (defaults to OPENFOOD_USER_AGENT or the client name)
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Save product fields (credentials from OPENFOOD_USERNAME/OPENFOOD_PASSWORD or OPENFOOD_AUTH_TOKEN)
    Submit {
        /// Product barcode
        barcode: String,

        /// Product name
        #[arg(long)]
        name: Option<String>,

        /// Brands, comma-separated as the server stores them
        #[arg(long)]
        brands: Option<String>,

        /// Net weight without unit
        #[arg(long)]
        weight: Option<String>,

        /// Weight unit (g, kg, ml, ...)
        #[arg(long, requires = "weight")]
        unit: Option<String>,

        /// Product language
        #[arg(long)]
        lang: Option<String>,

        /// Edit comment (defaults to OPENFOOD_COMMENT or the client name)
        #[arg(long)]
        comment: Option<String>,

        /// Re-fetch the product and check every submitted field
        #[arg(long)]
        verify: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("openfood=debug,openfood_api_client=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Facets => facets::run(&cli.format),

        Commands::Search { facet, value, fields, limit } => {
            search::run(facet, &value, fields, limit, &cli.format).await
        }

        Commands::Product { barcode, fields, user_agent } => {
            product::run(&barcode, fields, user_agent.as_deref(), &cli.format).await
        }

        Commands::Submit { barcode, name, brands, weight, unit, lang, comment, verify } => {
            let args = submit::SubmitArgs {
                barcode,
                name,
                brands,
                weight,
                unit,
                lang,
                comment,
                verify,
            };
            submit::run(args, &cli.format).await
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
