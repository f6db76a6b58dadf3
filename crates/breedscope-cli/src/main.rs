use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod serve;
mod stats;

#[derive(Debug, Parser)]
#[command(
    name = "breedscope",
    version,
    about = "Dog breed classifier service with label-correction feedback"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the prediction and feedback HTTP API.
    Serve(serve::ServeArgs),

    /// Summarise collected feedback.
    Stats {
        #[arg(long, env = "BREEDSCOPE_DB", default_value = "feedback.duckdb")]
        db: PathBuf,

        /// Number of recent submissions to list.
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },

    /// Export collected feedback, images included, to a Parquet file.
    Export {
        #[arg(long, env = "BREEDSCOPE_DB", default_value = "feedback.duckdb")]
        db: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("breedscope v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Serve(args) => serve::run(args).await,
        Command::Stats { db, recent } => stats::print_stats(&db, recent),
        Command::Export { db, out } => stats::export(&db, &out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["breedscope", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.port(), 5000);
        assert_eq!(args.labels, PathBuf::from("breed_names.txt"));
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["breedscope", "export"]).is_err());
        let cli =
            Cli::try_parse_from(["breedscope", "export", "--out", "feedback.parquet"]).unwrap();
        assert!(matches!(cli.command, Command::Export { .. }));
    }
}
