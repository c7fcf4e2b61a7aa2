//! Code Operation MCP Server
//!
//! A Model Context Protocol (MCP) server exposing precise file-editing
//! tools to an AI agent host over stdio.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use code_ops_mcp_server::config::Config;
use code_ops_mcp_server::error::Result;
use code_ops_mcp_server::fsops::ops::FileOps;
use code_ops_mcp_server::mcp::server::McpServer;
use code_ops_mcp_server::syntax::SyntaxChecker;

/// Code Operation MCP Server
#[derive(Parser)]
#[command(name = "code-ops-mcp")]
#[command(author, version, about = "Code Operation MCP Server - file editing tools over MCP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Syntax-check a file without starting the server
    Check {
        /// File to check
        file: PathBuf,

        /// Language to check as (defaults to the file extension)
        #[arg(long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is the protocol channel; all logging goes to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new();

    match cli.command {
        Some(Commands::Check { file, language }) => {
            run_check(&file, language.as_deref())?;
        }
        None => {
            run_server(config).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    tracing::info!("Initializing Code Operation MCP Server");

    let file_ops = Arc::new(FileOps::new(config));
    let mut server = McpServer::new(file_ops);
    server.run_stdio().await?;

    Ok(())
}

fn run_check(file: &PathBuf, language: Option<&str>) -> Result<()> {
    let language = language
        .map(str::to_string)
        .or_else(|| {
            file.extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
        })
        .unwrap_or_default();

    let code = std::fs::read_to_string(file)?;
    let report = match SyntaxChecker::check(&code, &language) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Supported languages: {}",
                SyntaxChecker::supported_languages().join(", ")
            );
            std::process::exit(2);
        }
    };

    println!("File: {}", file.display());
    println!("Language: {}", report.language);
    if report.is_valid {
        println!("Syntax OK");
    } else {
        println!("Syntax errors found:");
        for issue in &report.issues {
            println!("- {}", issue.message);
        }
        std::process::exit(1);
    }

    Ok(())
}
