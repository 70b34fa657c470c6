use clap::Parser;
use ds_down::cli::{Args, init_logging};
use ds_down::send::send_url;
use log::warn;
use std::process::{self, ExitCode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbosity());

    // Ctrl+C abandons whatever request is in flight
    if let Err(e) = ctrlc::set_handler(|| {
        println!();
        process::exit(1);
    }) {
        warn!("Could not install interrupt handler: {e}");
    }

    if send_url(&args.add_url, &args.config_file).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
