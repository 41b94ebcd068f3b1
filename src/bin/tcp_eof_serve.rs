//! `tcp-eof-serve` — listen on a port and close every accepted connection
//! immediately, giving clients an instant EOF.

use clap::Parser;
use clap::error::ErrorKind;

use ghcr_tools::output::OutputContext;
use ghcr_tools::serve;

/// Accept TCP connections on the given port and close each immediately.
#[derive(Parser)]
#[command(name = "tcp-eof-serve", version)]
struct Cli {
    /// TCP port to listen on
    port: u16,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(0);
        }
        // Malformed invocations exit 1, with the usage message on stderr.
        Err(e) => {
            eprint!("{e}");
            std::process::exit(1);
        }
    };

    let ctx = OutputContext::new(false, false);
    let listener = match serve::bind(cli.port) {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };
    ctx.info(&format!("Listening on port {}", cli.port));
    serve::run(&listener, &ctx);
}
