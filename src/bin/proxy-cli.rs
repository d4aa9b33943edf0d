use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for the steering proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show origin health as seen by the proxy
    Health,
    /// Encode steering parameters (key=value overrides)
    Encode {
        #[arg(value_parser = parse_key_value)]
        overrides: Vec<(String, String)>,
    },
    /// Generate a full token, signed when a secret is given
    Generate {
        #[arg(short, long)]
        secret: Option<String>,

        #[arg(value_parser = parse_key_value)]
        overrides: Vec<(String, String)>,
    },
    /// Build a one-off token from DASH pathway and throughput
    DashJwt {
        #[arg(short, long)]
        pathway: String,

        #[arg(short, long)]
        throughput: u64,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{base}/health")),
        Commands::Encode { overrides } => client
            .get(format!("{base}/jwt/encode"))
            .query(&overrides),
        Commands::Generate { secret, mut overrides } => {
            if let Some(secret) = secret {
                overrides.push(("secret".to_string(), secret));
            }
            client.get(format!("{base}/jwt/generate")).query(&overrides)
        }
        Commands::DashJwt { pathway, throughput } => client
            .get(format!("{base}/dash-jwt"))
            .query(&[
                ("_DASH_pathway", pathway),
                ("_DASH_throughput", throughput.to_string()),
            ]),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
