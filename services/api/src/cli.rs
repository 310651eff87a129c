use crate::report::{run_report, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use regional_insight::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Regional Insight",
    about = "Serve and report regional village indicators, risk lenses and resilience scores",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a regional summary for a snapshot export
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured snapshot file (JSON or CSV)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regional_insight::engine::Lens;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["regional-insight"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_parses_lens_and_seed() {
        let cli = Cli::try_parse_from([
            "regional-insight",
            "report",
            "--snapshot",
            "data/villages.json",
            "--lens",
            "economy",
            "--seed",
            "7",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.lens, Lens::Economy);
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.top, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn report_rejects_unknown_lens() {
        let result = Cli::try_parse_from([
            "regional-insight",
            "report",
            "--snapshot",
            "villages.json",
            "--lens",
            "weather",
        ]);
        assert!(result.is_err());
    }
}
