//! gbatch CLI — run Google API batch requests from the terminal.
//!
//! Usage:
//! ```bash
//! # Look up the batch path of an API
//! gbatch path --api drive --version v3
//!
//! # Run the batch described in a JSON file
//! GBATCH_ACCESS_TOKEN=ya29... gbatch run --file batch.json --skip-errors
//! ```

mod logging;

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context};
use gbatch_core::{ApiSpec, BatchConfig, BatchError, BatchRunner, BatchSpec};
use gbatch_http::HttpTransport;

use logging::{init_tracing, LogConfig};

const TOKEN_ENV: &str = "GBATCH_ACCESS_TOKEN";

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let log = LogConfig {
        level: if has_flag(&args, "--verbose") { "debug" } else { "warn" }.into(),
        json: has_flag(&args, "--log-json"),
    };

    let result = match args[1].as_str() {
        "path" => {
            init_tracing(&log);
            cmd_path(&args[2..]).await
        }
        "run" => {
            init_tracing(&log);
            cmd_run(&args[2..]).await
        }
        "version" | "--version" | "-V" => {
            println!("gbatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        if let Some(raw) = e.downcast_ref::<BatchError>().and_then(BatchError::raw_response) {
            eprintln!("\nFailing chunk response:\n{raw}");
        }
        process::exit(1);
    }
}

fn print_usage() {
    println!("gbatch {}", env!("CARGO_PKG_VERSION"));
    println!("Batch requests for Google APIs\n");
    println!("USAGE:");
    println!("    gbatch <COMMAND>\n");
    println!("COMMANDS:");
    println!("    path       Print the batch path of an API");
    println!("    run        Run the batch described in a JSON file");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("PATH FLAGS:");
    println!("    --api <NAME>        API name, e.g. drive  [required]");
    println!("    --version <V>       API version (default: preferred)");
    println!();
    println!("RUN FLAGS:");
    println!("    --file <PATH>       Batch spec JSON  [required]");
    println!("    --token <TOKEN>     Access token (overrides the file; fallback ${TOKEN_ENV})");
    println!("    --skip-errors       Keep error items instead of aborting");
    println!("    --raw               Print raw chunk responses");
    println!();
    println!("COMMON FLAGS:");
    println!("    --base-url <URL>    API root (default: https://www.googleapis.com)");
    println!("    --verbose           Debug logging (RUST_LOG overrides)");
    println!("    --log-json          JSON log lines on stderr");
}

fn runner(args: &[String]) -> anyhow::Result<BatchRunner> {
    let config = match parse_flag(args, "--base-url") {
        Some(url) => BatchConfig::with_base_url(url),
        None => BatchConfig::default(),
    };
    let transport = HttpTransport::default_client()?;
    Ok(BatchRunner::new(Arc::new(transport), config))
}

async fn cmd_path(args: &[String]) -> anyhow::Result<()> {
    let name = parse_flag(args, "--api").context("--api is required")?;
    let api = ApiSpec {
        name,
        version: parse_flag(args, "--version"),
    };

    let path = runner(args)?.resolve_batch_path(&api).await?;
    println!("{path}");
    Ok(())
}

async fn cmd_run(args: &[String]) -> anyhow::Result<()> {
    let file = parse_flag(args, "--file").context("--file is required")?;
    let content =
        std::fs::read_to_string(&file).with_context(|| format!("cannot read {file}"))?;
    let mut spec: BatchSpec =
        serde_json::from_str(&content).with_context(|| format!("invalid batch spec in {file}"))?;

    spec.access_token = resolve_token(
        parse_flag(args, "--token"),
        spec.access_token.take(),
        env::var(TOKEN_ENV).ok(),
    );
    if has_flag(args, "--skip-errors") {
        spec.skip_error = true;
    }
    if has_flag(args, "--raw") {
        spec.return_raw_data = true;
    }
    if spec.access_token.is_none() {
        bail!("no access token: pass --token, set {TOKEN_ENV}, or add accessToken to {file}");
    }
    tracing::debug!(%file, requests = spec.requests.len(), "loaded batch spec");

    let result = runner(args)?.run(&spec).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Token precedence: `--token` flag, then the spec file, then the environment.
fn resolve_token(
    flag: Option<String>,
    file: Option<String>,
    env: Option<String>,
) -> Option<String> {
    let non_empty = |t: &String| !t.is_empty();
    flag.filter(non_empty)
        .or_else(|| file.filter(non_empty))
        .or_else(|| env.filter(non_empty))
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_flag_reads_following_value() {
        let a = args(&["--api", "drive", "--version", "v3"]);
        assert_eq!(parse_flag(&a, "--api").as_deref(), Some("drive"));
        assert_eq!(parse_flag(&a, "--version").as_deref(), Some("v3"));
        assert!(parse_flag(&a, "--file").is_none());
    }

    #[test]
    fn parse_flag_without_value() {
        let a = args(&["--api"]);
        assert!(parse_flag(&a, "--api").is_none());
    }

    #[test]
    fn token_precedence() {
        let some = |s: &str| Some(s.to_string());
        assert_eq!(resolve_token(some("flag"), some("file"), some("env")), some("flag"));
        assert_eq!(resolve_token(None, some("file"), some("env")), some("file"));
        assert_eq!(resolve_token(None, None, some("env")), some("env"));
        assert_eq!(resolve_token(None, some(""), some("env")), some("env"));
        assert_eq!(resolve_token(None, None, None), None);
    }

    #[test]
    fn boolean_flags() {
        let a = args(&["--file", "b.json", "--raw"]);
        assert!(has_flag(&a, "--raw"));
        assert!(!has_flag(&a, "--skip-errors"));
    }
}
