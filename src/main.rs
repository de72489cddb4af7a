//! # otpline Main Entry Point

use anyhow::Result;
use otpline::cmd_args::CommandLineArgs;
use otpline::config;
use otpline::io::{TerminalEventStream, TerminalRenderStream};
use otpline::logging::init_logging;
use otpline::services::auth_service;
use otpline::{AppController, AuthFlowController, ProgressSimulator};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();

    if let Some(level) = args.log_level() {
        init_logging(&level, &config::get_log_path())?;
    }

    let service = auth_service(args.offline(), &args.server_url())?;

    let progress = if args.no_progress() {
        ProgressSimulator::instant()
    } else {
        ProgressSimulator::default()
    };

    let flow = AuthFlowController::builder(service)
        .progress(progress)
        .mobile_number(args.number().unwrap_or_default())
        .channel(args.channel())
        .build();

    let mut app = AppController::with_io_streams(
        Arc::new(flow),
        TerminalEventStream::new(),
        TerminalRenderStream::new(),
    )?;
    app.run().await
}
