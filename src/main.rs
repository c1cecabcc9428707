mod cli_utils;

use std::{cmp::Ordering, collections::HashMap, io::Write, path::PathBuf, str::from_utf8};

use anyhow::{anyhow, Result};
use bytes::Bytes;
use clap::{Args, Parser, Subcommand};

use sorted_merge::{
    file::LineSource,
    iterator::{merge_iterator::KWayMerger, Source},
    kv::kv_pair::KeyValuePair,
    memory::table::SortedTable,
    options::MergeOptions,
};

#[derive(Parser)]
#[clap(name = "", no_binary_name = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert a key into a named in-memory table
    Put {
        table: String,
        key: String,
        value: String,
    },
    /// Merge named tables by key
    Scan {
        #[clap(required = true)]
        tables: Vec<String>,
        #[clap(flatten)]
        order: OrderArgs,
    },
    /// Merge already-sorted files line by line
    Merge {
        #[clap(required = true)]
        files: Vec<PathBuf>,
        #[clap(flatten)]
        order: OrderArgs,
    },
    Quit,
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[clap(long)]
    numeric: bool,
    #[clap(long)]
    reverse: bool,
    #[clap(long)]
    ignore_case: bool,
}

impl From<OrderArgs> for MergeOptions {
    fn from(args: OrderArgs) -> Self {
        Self {
            numeric: args.numeric,
            reverse: args.reverse,
            ignore_case: args.ignore_case,
        }
    }
}

fn main() -> Result<()> {
    cli_utils::init_logging();
    let mut tables: HashMap<String, SortedTable> = HashMap::new();
    loop {
        print!("$ ");
        std::io::stdout().flush()?;

        let Some(line) = cli_utils::readline()? else {
            return Ok(());
        };
        let args = shlex::split(&line).unwrap_or_default();
        if args.is_empty() {
            continue;
        }
        let command = match Cli::try_parse_from(args) {
            Ok(cli) => cli.command,
            Err(e) => {
                e.print()?;
                continue;
            }
        };
        if let Command::Quit = command {
            return Ok(());
        }
        if let Err(e) = run(command, &mut tables) {
            eprintln!("error: {:#}", e);
        }
    }
}

fn run(command: Command, tables: &mut HashMap<String, SortedTable>) -> Result<()> {
    match command {
        Command::Put { table, key, value } => {
            tables
                .entry(table)
                .or_default()
                .put(key.as_bytes(), value.as_bytes());
        }
        Command::Scan { tables: names, order } => {
            let sources = names
                .iter()
                .map(|name| {
                    tables
                        .get(name)
                        .map(SortedTable::source)
                        .ok_or_else(|| anyhow!("no table named {}", name))
                })
                .collect::<Result<Vec<_>>>()?;
            let options = MergeOptions::from(order);
            let merger = KWayMerger::new(sources, options.key_order());
            drain(merger, |kv: KeyValuePair| {
                println!("{}={}", from_utf8(&kv.key)?, from_utf8(&kv.value)?);
                Ok(())
            })?;
        }
        Command::Merge { files, order } => {
            let sources = files
                .iter()
                .map(LineSource::open)
                .collect::<Result<Vec<_>>>()?;
            let options = MergeOptions::from(order);
            let merger = KWayMerger::new(sources, options.line_order());
            drain(merger, |line: Bytes| {
                println!("{}", String::from_utf8_lossy(&line));
                Ok(())
            })?;
        }
        Command::Quit => {}
    }
    Ok(())
}

/// Hands every merged element to `emit`, stopping at the first failure.
/// The merger is closed either way.
fn drain<S, F>(
    mut merger: KWayMerger<S, F>,
    mut emit: impl FnMut(S::Item) -> Result<()>,
) -> Result<()>
where
    S: Source,
    F: Fn(&S::Item, &S::Item) -> Ordering,
{
    let mut result = Ok(());
    while merger.has_next() {
        if let Err(e) = merger.take_next().and_then(&mut emit) {
            result = Err(e);
            break;
        }
    }
    merger.close()?;
    result
}
