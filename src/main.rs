use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geoshare::analysis::{ContextAnalyzer, GeminiAnalyzer};
use geoshare::batch::project_csv;
use geoshare::config::Config;
use geoshare::format;
use geoshare::projection::epsg;
use geoshare::share::SharePayload;
use geoshare::{project, LocationFix};

#[derive(Parser)]
#[command(name = "geoshare")]
#[command(about = "WGS84 to Stereo 70 projection, location context and sharing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project one WGS84 position onto the Stereo 70 grid
    #[command(allow_negative_numbers = true)]
    Project {
        /// Latitude in degrees
        latitude: f64,

        /// Longitude in degrees
        longitude: f64,

        /// Accuracy radius in meters
        #[arg(long, default_value_t = 0.0)]
        accuracy: f64,

        /// Ask the AI service for a description of the place
        #[arg(long)]
        analyze: bool,

        /// Print the share message and links
        #[arg(long)]
        share: bool,

        /// Also print a mailto link for this recipient (implies --share)
        #[arg(long, value_name = "ADDRESS")]
        email: Option<String>,
    },

    /// Project a CSV of `latitude,longitude[,name]` rows
    Batch {
        /// Input file (omit to read from stdin)
        input: Option<PathBuf>,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the grid coordinates of a few Romanian cities
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Project {
            latitude,
            longitude,
            accuracy,
            analyze,
            share,
            email,
        } => cmd_project(latitude, longitude, accuracy, analyze, share, email).await,
        Commands::Batch { input, output } => cmd_batch(input, output),
        Commands::Demo => {
            cmd_demo();
            Ok(())
        }
    }
}

async fn cmd_project(
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    analyze: bool,
    share: bool,
    email: Option<String>,
) -> Result<()> {
    let fix = LocationFix::new(latitude, longitude, accuracy);

    println!("WGS84 ({})", epsg::authority(epsg::WGS84));
    println!("  Latitude:  {}", format::degrees(latitude, 6));
    println!("  Longitude: {}", format::degrees(longitude, 6));
    if accuracy > 0.0 {
        println!("  Accuracy:  {}", format::accuracy(accuracy));
    }

    if let Some(projected) = fix.projected {
        println!("\nStereo 70 ({})", epsg::authority(epsg::STEREO_70));
        println!("  N (Y): {} m", format::meters(projected.northing));
        println!("  E (X): {} m", format::meters(projected.easting));
    }

    let mut description = None;
    if analyze {
        let config = Config::from_env().context("reading configuration")?;
        let analyzer = GeminiAnalyzer::new(&config.analysis).context("creating AI client")?;
        match analyzer.analyze(latitude, longitude).await {
            Ok(analysis) => {
                println!("\nContext");
                println!("  {}", analysis.description);
                for source in &analysis.sources {
                    println!("  - {} <{}>", source.title, source.uri);
                }
                description = Some(analysis.description);
            }
            Err(e) => eprintln!("\n{}", e),
        }
    }

    if share || email.is_some() {
        let payload = SharePayload::new(&fix, description.as_deref());
        println!("\n{}", payload.text);
        println!("\nWhatsApp: {}", payload.whatsapp_url);
        if let Some(recipient) = email {
            println!("Email:    {}", payload.mailto(&recipient));
        }
    }

    Ok(())
}

fn cmd_batch(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();
    let result = match &input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            project_csv(file, start)?
        }
        None => project_csv(io::stdin().lock(), start)?,
    };

    match output {
        Some(path) => std::fs::write(&path, result.csv)
            .with_context(|| format!("writing {}", path.display()))?,
        None => io::stdout().write_all(result.csv.as_bytes())?,
    }
    Ok(())
}

fn cmd_demo() {
    let cities = [
        ("Bucuresti", 44.4268, 26.1025),
        ("Cluj-Napoca", 46.7712, 23.6236),
        ("Timisoara", 45.7489, 21.2087),
        ("Iasi", 47.1585, 27.6014),
        ("Constanta", 44.1598, 28.6348),
        ("Projection origin", 46.0, 25.0),
    ];

    println!("WGS84 -> Stereo 70\n");
    for (name, lat, lon) in cities {
        let projected = project(lat, lon);
        println!(
            "{:<18} lat={:>9.4} lon={:>9.4}  N={:>12} E={:>12}",
            name,
            lat,
            lon,
            format::meters(projected.northing),
            format::meters(projected.easting)
        );
    }
}
