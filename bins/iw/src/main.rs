//! iw command - wireless interface configuration via nl80211.

mod commands;

use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches, Parser};
use iwlink::Error;
use iwlink::cmd::{Dispatcher, Registry};
use iwlink::nl80211::Nl80211Connection;
use iwlink::output::{OutputFormat, OutputOptions, Printer};

#[derive(Parser)]
#[command(name = "iw", version, about = "Wireless interface configuration tool")]
struct Cli {
    /// Log netlink traffic to stderr.
    #[arg(long)]
    debug: bool,

    /// Give up if the kernel has not answered after this many milliseconds.
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Command words, target and command arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut registry = Registry::new();
    commands::register_all(&mut registry);

    let matches = Cli::command()
        .after_help(registry.usage())
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Initialize tracing
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(&cli, &registry).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e {
                Error::Usage { .. } | Error::InvalidUsage { .. } | Error::InvalidArgument(_) => {
                    eprintln!("{}", e)
                }
                Error::UnknownCommand(_) => {
                    eprintln!("Error: {}", e);
                    eprintln!("Run 'iw --help' for the list of commands.");
                }
                _ => eprintln!("Error: {}", e),
            }
            if let Some(line) = hint(&e) {
                eprintln!("{line}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Extra line printed under errors the user can do something about.
fn hint(e: &Error) -> Option<&'static str> {
    e.is_permission_denied()
        .then_some("Changing wireless interfaces needs CAP_NET_ADMIN; try running as root.")
}

async fn run(cli: &Cli, registry: &Registry) -> iwlink::Result<()> {
    // Build the request before touching the socket so command line errors
    // need no privileges.
    let invocation = Dispatcher::with_sysfs(registry).prepare(&cli.command)?;

    let mut conn = Nl80211Connection::new().await?;
    if let Some(ms) = cli.timeout {
        conn = conn.with_timeout(Duration::from_millis(ms));
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let opts = OutputOptions {
        pretty: cli.pretty,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut printer = Printer::new(&mut out, format, opts);

    invocation.execute(&conn, &mut printer).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_for_permission_errors() {
        let err = Error::from_errno(-1).with_context("command failed"); // EPERM
        assert!(hint(&err).is_some_and(|h| h.contains("CAP_NET_ADMIN")));

        assert!(hint(&Error::from_errno(-16)).is_none());
        assert!(hint(&Error::UnknownCommand("bogus".into())).is_none());
    }
}
