//! Command line interface for the `bfd-load` binary.
//!
//! Kept free of crate imports so the build script can include it to render
//! the manual page.

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Command line arguments for the `bfd-load` binary.
#[derive(Debug, Parser)]
#[command(
    name = "bfd-load",
    version,
    about = "Run the V1 BFD Server regression load scenario"
)]
pub struct Cli {
    /// Directory holding `bene_ids.csv`, `hashed_mbis.csv` and `contracts.csv`.
    #[arg(short, long, required_unless_present = "list_tasks")]
    pub data_dir: Option<PathBuf>,

    /// Number of concurrent simulated users.
    #[arg(short, long, default_value_t = 1)]
    pub users: usize,

    /// Tasks each user runs; runs until interrupted when omitted.
    #[arg(short, long)]
    pub iterations: Option<u64>,

    /// Seed for task selection.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Maximum tasks started per second across all users.
    #[arg(long)]
    pub rate: Option<usize>,

    /// Base URL of the server under test.
    #[arg(long, default_value = "https://localhost:6500")]
    pub host: String,

    /// Lower bound for `_lastUpdated` filters.
    #[arg(long)]
    pub last_updated: Option<String>,

    /// Print the run summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// List the scenario's tasks and exit.
    #[arg(long)]
    pub list_tasks: bool,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;

    use super::Cli;

    #[test]
    fn parses_run_options() {
        let cli = Cli::parse_from([
            "bfd-load",
            "--data-dir",
            "data",
            "--users",
            "4",
            "--iterations",
            "10",
            "--rate",
            "20",
            "--json",
        ]);
        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("data")));
        assert_eq!(cli.users, 4);
        assert_eq!(cli.iterations, Some(10));
        assert_eq!(cli.rate, Some(20));
        assert!(cli.json);
        assert_eq!(cli.seed, 0);
    }

    #[test]
    fn list_tasks_needs_no_data_dir() {
        let cli = Cli::parse_from(["bfd-load", "--list-tasks"]);
        assert!(cli.list_tasks);
        assert!(cli.data_dir.is_none());
    }

    #[rstest]
    #[case(&["bfd-load"][..])]
    #[case(&["bfd-load", "--users", "many", "--data-dir", "d"][..])]
    fn invalid_arguments_are_rejected(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
