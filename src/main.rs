use anyhow::Result;
use std::env;
use ticket_amend::amend;
use ticket_amend::cli::{self, Invocation, PLUGIN_DESCRIPTOR};
use ticket_amend::config::{Settings, LOG_ENV};
use ticket_amend::error::AmendError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<AmendError>()
            .map_or(1, AmendError::exit_code);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    match cli::interpret(env::args_os())? {
        Invocation::Describe => {
            println!("{}", PLUGIN_DESCRIPTOR);
            Ok(())
        }

        Invocation::Print(text) => {
            print!("{}", text);
            Ok(())
        }

        Invocation::Amend(options) => {
            let settings = Settings::from_env()?;
            let report = amend::run(&settings, &options.request, options.dry_run)?;

            if options.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if let Some(document) = &report.document {
                print!("{}", document);
            } else {
                println!("Updated {}", report.id);
            }
            Ok(())
        }
    }
}

/// Log to stderr, filtered by `TICKET_AMEND_LOG` (warnings only by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
