use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use std::io::Write;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Client CLI for a running chat relay", long_about = None)]
struct Cli {
    #[arg(short, long, env = "RELAY_URL", default_value = "http://localhost:8000")]
    url: String,

    /// Relay API key, sent as a Bearer token
    #[arg(short, long, env = "RELAY_API_KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show relay service information
    Status,
    /// Check relay health
    Health,
    /// List models available upstream
    Models,
    /// Send a single-message chat completion
    Chat {
        /// Prompt sent as the user message
        prompt: String,

        #[arg(short, long, default_value = "gpt-4o-mini")]
        model: String,

        /// Print the event stream as it arrives
        #[arg(short, long)]
        stream: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Models => {
            let res = client.get(format!("{}/v1/models", base))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Chat { prompt, model, stream } => {
            let body = json!({
                "model": model,
                "messages": [{ "role": "user", "content": prompt }],
                "stream": stream,
            });
            let res = client.post(format!("{}/v1/chat/completions", base))
                .headers(headers)
                .json(&body)
                .send()
                .await?;

            if stream && res.status().is_success() {
                print_stream(res).await?;
            } else {
                print_response(res).await?;
            }
        }
    }

    Ok(())
}

async fn print_stream(mut res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    while let Some(chunk) = res.chunk().await? {
        stdout.write_all(&chunk)?;
        stdout.flush()?;
    }
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
