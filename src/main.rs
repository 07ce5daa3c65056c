//! rankkv - An In-Process Key-Value Store with Sorted Sets
//!
//! This is the main entry point for the rankkv server.
//! It sets up the store, the TCP listener and the interactive console.

use rankkv::commands::CommandHandler;
use rankkv::connection::{handle_connection, ConnectionStats};
use rankkv::console::run_console;
use rankkv::storage::Store;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Server configuration
struct Config {
    /// Host to bind to
    host: String,
    /// Port to listen on
    port: u16,
    /// Run the interactive console on stdin
    console: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: rankkv::DEFAULT_HOST.to_string(),
            port: rankkv::DEFAULT_PORT,
            console: true,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    if i + 1 < args.len() {
                        config.host = args[i + 1].clone();
                        i += 2;
                    } else {
                        eprintln!("Error: --host requires a value");
                        std::process::exit(1);
                    }
                }
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        config.port = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid port number");
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --port requires a value");
                        std::process::exit(1);
                    }
                }
                "--no-console" => {
                    config.console = false;
                    i += 1;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("rankkv version {}", rankkv::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    /// Returns the bind address as a string
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn print_help() {
    println!(
        r#"
rankkv - An In-Process Key-Value Store with Sorted Sets

USAGE:
    rankkv [OPTIONS]

OPTIONS:
    -h, --host <HOST>    Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>    Port to listen on (default: 6380)
        --no-console     Serve TCP only, without the stdin console
    -v, --version        Print version information
        --help           Print this help message

EXAMPLES:
    rankkv                         # Start on 127.0.0.1:6380 with a console
    rankkv --port 7000             # Start on port 7000
    rankkv --host 0.0.0.0          # Listen on all interfaces

CONNECTING:
    Send one command per line, get one JSON reply per line:
    $ nc 127.0.0.1 6380
    SET name Ariz
    true
    GET name
    "Ariz"
    ZADD board 10 amy
    1
"#
    );
}

fn print_banner(config: &Config) {
    println!(
        r#"
rankkv v{} - In-Process Key-Value Store
──────────────────────────────────────────
Server started on {}
Ready to accept connections.

Use Ctrl+C to shutdown gracefully.
"#,
        rankkv::VERSION,
        config.bind_address()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging on stderr so it stays out of the console's output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    print_banner(&config);

    // Create the store (shared by all connections and the console)
    let store = Store::new();
    info!("Store initialized");

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    // Set up graceful shutdown
    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, stopping server..."),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    let console = console_task(config.console, CommandHandler::new(store.clone()));

    tokio::select! {
        _ = accept_loop(listener, store.clone(), Arc::clone(&stats)) => {}
        result = console => {
            if let Err(e) = result {
                error!("Console failed: {}", e);
            }
        }
        _ = shutdown => {}
    }

    let store_stats = store.stats();
    info!(
        keys = store_stats.keys,
        expired = store_stats.expired,
        connections = stats.connections_accepted.load(Ordering::Relaxed),
        commands = stats.commands_processed.load(Ordering::Relaxed),
        "Server shutdown complete"
    );
    Ok(())
}

/// Runs the console on stdin, or waits forever when it is disabled.
async fn console_task(enabled: bool, handler: CommandHandler) -> std::io::Result<()> {
    if !enabled {
        return std::future::pending().await;
    }

    let input = BufReader::new(tokio::io::stdin());
    run_console(&handler, input, tokio::io::stdout()).await
}

/// Main loop that accepts incoming connections
async fn accept_loop(listener: TcpListener, store: Store, stats: Arc<ConnectionStats>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                // Create a command handler for this connection
                let handler = CommandHandler::new(store.clone());
                let stats = Arc::clone(&stats);

                // Spawn a task to handle this connection
                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
