//! `tcp-eof-probe` — smoke test that a local TCP service accepts a
//! connection and closes it with an immediate EOF.

use clap::Parser;
use clap::error::ErrorKind;

use ghcr_tools::probe::{ProbeOptions, ProbeOutcome, probe};

/// Check that a TCP service on 127.0.0.1 closes new connections with an
/// immediate EOF instead of sending data.
#[derive(Parser)]
#[command(name = "tcp-eof-probe", version)]
struct Cli {
    /// TCP port on the local host to probe
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

    match probe(cli.port, &ProbeOptions::default()) {
        Ok(ProbeOutcome::Eof) => {
            println!("OK: Connection accepted and closed with EOF");
        }
        Ok(ProbeOutcome::UnexpectedData(data)) => {
            println!(
                "FAIL: Got unexpected data: {:?}",
                String::from_utf8_lossy(&data)
            );
            std::process::exit(1);
        }
        Ok(ProbeOutcome::NeverReady) => {
            println!("FAIL: Service did not become ready in time");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
