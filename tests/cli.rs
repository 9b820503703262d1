//! CLI command tests.

mod common;

use clap::Parser;
use common::*;
use ctstore::cli::commands::simulate;
use ctstore::cli::{Cli, Commands};

#[tokio::test]
async fn simulate_sequences_every_distinct_leaf() {
    let config = load_config(&create_minimal_config());

    let report = simulate(&config, 4, 8).await.unwrap();

    assert_eq!(report.added, 8);
    assert_eq!(report.duplicates, 24);
    assert_eq!(report.sequenced, 8);
    assert_eq!(report.conflicts, 0);
    // One create per leaf, two writes per assignment, one node-state write.
    assert_eq!(report.final_index, 8 + 2 * 8 + 1);
}

#[tokio::test]
async fn simulate_rejects_empty_runs() {
    let config = load_config(&create_minimal_config());
    assert!(simulate(&config, 0, 8).await.is_err());
    assert!(simulate(&config, 2, 0).await.is_err());
}

#[test]
fn parse_simulate_args() {
    let cli = Cli::try_parse_from([
        "ctstore",
        "--node-id",
        "n1",
        "simulate",
        "--submitters",
        "2",
    ])
    .unwrap();

    assert_eq!(cli.node_id.as_deref(), Some("n1"));
    match cli.command {
        Commands::Simulate(args) => {
            assert_eq!(args.submitters, 2);
            assert_eq!(args.entries, 16);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_keys_args() {
    let cli = Cli::try_parse_from(["ctstore", "keys", "--leaf", "abc", "--seq", "7"]).unwrap();
    match cli.command {
        Commands::Keys(args) => {
            assert_eq!(args.leaf, "abc");
            assert_eq!(args.seq, Some(7));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
