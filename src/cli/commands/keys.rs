//! Keys command implementation.

use crate::core::config::Config;
use crate::entry::{LoggedCertificate, LoggedEntry};
use crate::store::PathScheme;
use anyhow::Result;
use clap::Args;

/// Print the keys an entry maps to.
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Leaf certificate contents.
    #[arg(long)]
    pub leaf: String,

    /// Sequence number to show the sequenced key for.
    #[arg(long)]
    pub seq: Option<u64>,
}

/// Run the keys command.
pub fn run_keys(args: KeysArgs, config: &Config) -> Result<()> {
    let paths = PathScheme::new(config.store.root.clone());
    let hash = LoggedCertificate::x509(0, args.leaf.into_bytes()).hash();

    println!("hash:      {}", hex::encode(&hash));
    println!("pending:   {}", paths.pending_entry(&hash));
    match args.seq {
        Some(seq) => println!("sequenced: {}", paths.sequenced_entry(seq)),
        None => println!("sequenced: {}/<n>", paths.sequenced_dir()),
    }
    println!("node:      {}", paths.node(&config.store.node_id));
    Ok(())
}
