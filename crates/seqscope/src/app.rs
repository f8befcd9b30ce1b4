//! Application entry point and dispatch.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use num_bigint::BigInt;
use seqscope_core::registry::{DefaultFactory, SequenceFactory, FAMILIES};
use seqscope_core::{Index, Sequence, SequenceError};
use seqscope_oeis::{CatalogStore, OeisOptions, OeisSequence};
use tracing::info;

use crate::config::{AppConfig, Command};
use crate::output::{write_rows, Row};

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        crate::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start async runtime")?;
    runtime.block_on(run_async(config))
}

async fn run_async(config: &AppConfig) -> Result<()> {
    let Some(command) = &config.command else {
        return Err(SequenceError::InvalidConfig(
            "no sequence given; try `seqscope list`".into(),
        )
        .into());
    };

    let mut stdout = io::stdout().lock();
    let mut sequence = match command {
        Command::List => return list_families(&mut stdout),
        Command::Oeis {
            id,
            fetch,
            modulus,
            name,
            show_key,
        } => {
            let modulus: BigInt = modulus.trim().parse().map_err(|_| {
                SequenceError::InvalidConfig(format!("modulus {modulus:?} is not an integer"))
            })?;
            let options = OeisOptions {
                count: *fetch,
                modulus,
                name: name.clone(),
            };
            let seq = OeisSequence::new(id, options, store(config))?;
            if *show_key {
                writeln!(stdout, "{}", seq.to_key())?;
            }
            Box::new(seq) as Box<dyn Sequence>
        }
        Command::Key { key, show_key } => {
            let seq = OeisSequence::from_key(key, store(config))?;
            if *show_key {
                writeln!(stdout, "{}", seq.to_key())?;
            }
            Box::new(seq)
        }
        _ => {
            let (family, params) = config
                .family_params()
                .context("command is not a sequence family")?;
            DefaultFactory::new().create(family, &params)?.sequence
        }
    };

    sequence.initialize().await?;
    info!(
        name = sequence.name(),
        first = sequence.first(),
        last = %sequence.last(),
        "sequence ready"
    );

    let rows = collect_rows(sequence.as_mut(), config.start, config.count, config.factors)?;
    write_rows(&mut stdout, &rows, config.json)?;
    Ok(())
}

fn store(config: &AppConfig) -> Arc<CatalogStore> {
    Arc::new(CatalogStore::http(config.backend_url.as_str()))
}

/// Read up to `count` entries from `start`, clamped to the sequence's bounds.
pub fn collect_rows(
    sequence: &mut dyn Sequence,
    start: Option<Index>,
    count: u64,
    with_factors: bool,
) -> Result<Vec<Row>, SequenceError> {
    let first = sequence.first();
    let last = sequence.last();
    let start = start.map_or(first, |s| s.max(first));
    let mut rows = Vec::new();
    let mut index = start;
    for _ in 0..count {
        if !last.admits(index) {
            break;
        }
        let value = sequence.get_element(index)?;
        let factors = if with_factors {
            Some(sequence.get_factors(index)?)
        } else {
            None
        };
        rows.push(Row::new(index, &value, factors.as_ref()));
        let Some(next) = index.checked_add(1) else {
            break;
        };
        index = next;
    }
    Ok(rows)
}

fn list_families(out: &mut dyn Write) -> Result<()> {
    for family in FAMILIES {
        writeln!(out, "{:<10} {}", family.name, family.description)?;
    }
    writeln!(out, "{:<10} A sequence fetched from the OEIS", "oeis")?;
    Ok(())
}
