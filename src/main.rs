#![deny(clippy::all, clippy::pedantic)]

use std::process;

use bctoolkit::{app, error::CliError};

#[tokio::main]
async fn main() {
    if let Err(error) = app::run().await {
        report(&error);
        process::exit(1);
    }
}

/// Errors go to stderr as `error[<Kind>]: <message>` so scripts can match on the kind.
fn report(err: &CliError) {
    eprintln!("error[{}]: {err}", err.kind());
}
