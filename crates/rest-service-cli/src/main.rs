use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use rest_service::{Headers, Method, RequestError, ReqwestTransport, RestConfig, RestRegistry};
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Send a request through a configured REST client
#[derive(Parser)]
#[command(name = "rest-service")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the client configuration file (TOML or JSON)
    #[arg(short, long, env = "RESTSVC_CONFIG")]
    config: PathBuf,
    /// Logging level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
    /// Request timeout in milliseconds
    #[arg(short, long)]
    timeout: Option<u64>,
    /// Caller header as name=value; only whitelisted names are sent
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
    /// JSON request body
    #[arg(short, long)]
    body: Option<String>,
    /// Client type name
    client: String,
    /// HTTP method
    method: Method,
    /// Request path appended to the client's base URL
    path: String,
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("header must be name=value: {}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("header name must not be empty: {}", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    let env_filter = EnvFilter::new(format!("{},hyper=warn,reqwest=warn", args.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = RestConfig::from_file(&args.config)?;
    let registry = RestRegistry::from_config(Arc::new(ReqwestTransport::new()), config)?;

    let headers: Headers = args.headers.into_iter().collect();
    let mut client = registry.client(&args.client, Some(&headers))?;
    if let Some(timeout) = args.timeout {
        client = client.with_timeout(timeout);
    }

    let body = args
        .body
        .as_deref()
        .map(|raw| serde_json::from_str::<Value>(raw))
        .transpose()?;

    match client.request(args.method, &args.path, body).await {
        Ok(response) => {
            println!("{}", response.status_code);
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            Ok(())
        }
        Err(RequestError::Operational(err)) => {
            eprintln!("{}", err.status_code);
            eprintln!("{}", serde_json::to_string_pretty(&err.body)?);
            bail!("request failed with status {}", err.status_code)
        }
        Err(err) => Err(err.into()),
    }
}
