mod cli;
mod demo;

use std::process::ExitCode;

use clap::Parser;

use trine_engine::logging::init_logging;
use trine_engine::window::{RunOutcome, Runtime};

use crate::cli::Args;
use crate::demo::TriangleDemo;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.logging_config());

    let demo_config = args.demo_config();
    log::info!(
        "starting {} demo with {} objects",
        demo_config.variant,
        if demo_config.variant.uses_params() { demo_config.count } else { 1 }
    );

    match Runtime::run(args.runtime_config(), args.gpu_init(), TriangleDemo::new(demo_config)) {
        Ok(RunOutcome::Completed) => ExitCode::SUCCESS,
        Ok(RunOutcome::Unavailable) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
