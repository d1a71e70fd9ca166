mod cli;

use env_logger::Env;
use log::error;

#[tokio::main]
async fn main() {
    // stdout belongs to the MCP transport, env_logger writes to stderr
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = cli::run().await {
        error!("{e}");
        std::process::exit(1);
    }
}
