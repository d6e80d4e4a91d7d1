use crate::demo::{run_demo, run_import, run_score, DemoArgs, ImportArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use homekey::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "homekey",
    about = "Score homebuyer readiness and run the HomeKey coaching service",
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
    /// Score a single buyer profile and print the milestone timeline
    Score(ScoreArgs),
    /// Batch-score a signup CSV export
    Import(ImportArgs),
    /// Walk a demo buyer from intake to appraisal prep
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Import(args) => run_import(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_command_parses_phases_and_dates() {
        let cli = Cli::try_parse_from([
            "homekey",
            "score",
            "--income",
            "3900",
            "--credit-score",
            "630",
            "--savings",
            "6200",
            "--price-min",
            "180000",
            "--price-max",
            "210000",
            "--completed",
            "documents",
            "--completed",
            "credit",
            "--today",
            "2026-01-05",
        ])
        .expect("arguments parse");

        let Some(Command::Score(args)) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(args.credit_score, Some(630));
        assert_eq!(args.completed.len(), 2);
        assert_eq!(args.debts, 0.0);
        assert!(args.today.is_some());
    }

    #[test]
    fn missing_command_defaults_to_serve() {
        let cli = Cli::try_parse_from(["homekey"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
