use std::io::Read;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use message_logger::http::payload::is_truthy;

#[derive(Parser)]
#[command(name = "msglog-cli")]
#[command(about = "Push JSON messages to a message logger", long_about = None)]
struct Cli {
    /// Full URL of the logger endpoint.
    #[arg(short, long, default_value = "http://localhost:8080/")]
    url: String,

    /// Shared API key sent as X-Api-Key.
    #[arg(short, long)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append one JSON message (read from stdin when omitted)
    Send {
        /// JSON text of the message
        message: Option<String>,

        /// Send the message as given, without filling in `timestamp`
        /// or rewriting a `0x` node id in `from`
        #[arg(long)]
        no_stamp: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", HeaderValue::from_str(&cli.key)?);

    match cli.command {
        Commands::Send { message, no_stamp } => {
            let text = match message {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let mut payload: Value = serde_json::from_str(&text)?;
            if !no_stamp {
                let now = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
                enrich(&mut payload, &now);
            }

            let res = client
                .post(&cli.url)
                .headers(headers)
                .json(&payload)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Fill in what a mesh gateway would add before logging an entry.
///
/// Objects get `timestamp` set to `now` when it is missing or falsy, and a
/// hex node id in `from` (`0x1234`) is rewritten to the `!1234` form.
/// Anything other than an object is left alone.
fn enrich(entry: &mut Value, now: &str) {
    let Value::Object(map) = entry else {
        return;
    };

    if !map.get("timestamp").is_some_and(is_truthy) {
        map.insert("timestamp".to_string(), Value::String(now.to_string()));
    }

    if let Some(Value::String(from)) = map.get_mut("from") {
        if let Some(rest) = from.strip_prefix("0x") {
            *from = format!("!{rest}");
        }
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        eprintln!("Error: logger returned status {}", status);
        eprintln!("Response: {}", text);
        return Err(format!("request failed with status {}", status).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
