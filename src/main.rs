// src/main.rs
use clap::Parser;
use crossterm::style::Stylize;
use pagemark::cli::args::Cli;
use pagemark::cli::error::CliError;
use pagemark::config::load_settings;
use pagemark::exitcode;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    prelude::*,
};

#[instrument]
fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug, cli.no_color);

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: {}", "Failed to load configuration".red(), e);
            std::process::exit(exitcode::CONFIG);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}: {}", "Failed to create async runtime".red(), e);
            std::process::exit(exitcode::FAILURE);
        }
    };

    let result = rt.block_on(pagemark::cli::execute_command(cli, &settings));
    match result {
        Ok(()) => std::process::exit(exitcode::SUCCESS),
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            let code = match e {
                CliError::InvalidInput(_) => exitcode::USAGE,
                _ => exitcode::FAILURE,
            };
            std::process::exit(code);
        }
    }
}

fn setup_logging(verbosity: u8, no_color: bool) {
    debug!("INIT: Attempting logger init from main.rs");

    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let noisy_modules = ["html5ever", "reqwest", "hyper_util", "mio", "want", "diesel"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // stdout carries responses, logs go to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => info!("Debug mode: info"),
        LevelFilter::DEBUG => debug!("Debug mode: debug"),
        LevelFilter::TRACE => debug!("Debug mode: trace"),
        _ => {}
    }
}
