use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "node-cli")]
#[command(about = "Query the identity and counters of a storage node", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:6200")]
    url: String,

    /// Request ID sent with the query.
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show namespace, volume, service id and TLS endpoint
    Info,
    /// Show request counters
    Stat {
        /// Render counters as a JSON object
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(id) = &cli.request_id {
        headers.insert("x-request-id", HeaderValue::from_str(id)?);
    }

    let (path, json) = match cli.command {
        Commands::Info => ("info", false),
        Commands::Stat { json } => ("stat", json),
    };

    let res = client
        .get(format!("{}/{}", cli.url.trim_end_matches('/'), path))
        .headers(headers)
        .send()
        .await?;

    ensure_success(res.status())?;

    let text = res.text().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stat_to_json(&text))?);
    } else {
        print!("{}", text);
    }
    Ok(())
}

/// Non-2xx replies become an error so the process exits non-zero.
fn ensure_success(status: StatusCode) -> Result<(), String> {
    if status.is_success() {
        Ok(())
    } else {
        Err(format!("node returned status {}", status))
    }
}

/// `counter <name> <value>` lines become numbers, `config <key> <value>` strings.
fn stat_to_json(text: &str) -> Value {
    let mut counters = Map::new();
    let mut config = Map::new();
    for line in text.lines() {
        let mut fields = line.splitn(3, ' ');
        match (fields.next(), fields.next(), fields.next()) {
            (Some("counter"), Some(name), Some(value)) => {
                if let Ok(n) = value.parse::<u64>() {
                    counters.insert(name.to_string(), Value::from(n));
                }
            }
            (Some("config"), Some(key), Some(value)) => {
                config.insert(key.to_string(), Value::from(value));
            }
            _ => {}
        }
    }
    let mut root = Map::new();
    root.insert("counters".into(), Value::Object(counters));
    root.insert("config".into(), Value::Object(config));
    Value::Object(root)
}
