use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::CounterClient;
use shared::domain::CounterOp;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Increment, decrement, read or reset the shared counter")]
struct Args {
    #[arg(long, env = "COUNTER_SERVER_URL", default_value = "http://localhost:8000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    Increment {
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    Decrement {
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    Read,
    Reset,
}

impl Command {
    /// Requests to issue, one per repetition, produced lazily.
    fn ops(&self) -> impl Iterator<Item = CounterOp> {
        let (op, times) = match *self {
            Command::Increment { times } => (CounterOp::Increment, times as usize),
            Command::Decrement { times } => (CounterOp::Decrement, times as usize),
            Command::Read => (CounterOp::Read, 1),
            Command::Reset => (CounterOp::Reset, 1),
        };
        std::iter::repeat(op).take(times)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut client = CounterClient::new(&args.server_url)?;
    for op in args.command.ops() {
        let value = client
            .perform(op)
            .await
            .with_context(|| format!("{op} against {} failed", client.server_url()))?;
        info!(%op, value, "counter request completed");
        println!("{op}: {value}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_repeats_requested_times() {
        let args =
            Args::try_parse_from(["counter_cli", "increment", "--times", "3"]).expect("args");
        assert_eq!(args.command.ops().collect::<Vec<_>>(), vec![CounterOp::Increment; 3]);
    }

    #[test]
    fn read_and_reset_issue_one_request() {
        let args = Args::try_parse_from([
            "counter_cli",
            "--server-url",
            "http://127.0.0.1:9000",
            "reset",
        ])
        .expect("args");
        assert_eq!(args.command, Command::Reset);
        assert_eq!(args.command.ops().collect::<Vec<_>>(), vec![CounterOp::Reset]);
        assert_eq!(args.server_url, "http://127.0.0.1:9000");

        let args = Args::try_parse_from(["counter_cli", "read"]).expect("args");
        assert_eq!(args.command.ops().collect::<Vec<_>>(), vec![CounterOp::Read]);
    }

    #[test]
    fn zero_times_issues_nothing() {
        let args =
            Args::try_parse_from(["counter_cli", "decrement", "--times", "0"]).expect("args");
        assert_eq!(args.command.ops().count(), 0);
    }

    #[test]
    fn huge_times_is_produced_lazily() {
        let args = Args::try_parse_from(["counter_cli", "increment", "--times", "4000000000"])
            .expect("args");
        let mut ops = args.command.ops();
        assert_eq!(ops.size_hint(), (4_000_000_000, Some(4_000_000_000)));
        assert_eq!(ops.next(), Some(CounterOp::Increment));
    }
}
