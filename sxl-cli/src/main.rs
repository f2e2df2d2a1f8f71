//! SXL CLI - Command line tool for normalizing and analyzing launch data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "sxl-cli",
    version,
    about = "Launch record normalizer and reports"
)]
struct Cli {
    #[command(flatten)]
    feed: sxl_cmd::FeedArgs,

    #[command(subcommand)]
    command: sxl_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    sxl_cmd::run(&cli.feed, cli.command).await
}
