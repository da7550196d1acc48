// src/bin/tdigest_tree.rs
use clap::{Parser, Subcommand, ValueEnum};
use gr_digest_tree::tdigest::{CentroidTree, TreeOptions};
use serde::Serialize;
use std::error::Error;
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    Tsv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Node slots to allocate up front
    #[arg(short = 'c', long, default_value_t = 16)]
    capacity: usize,

    /// Fold identical values into one centroid instead of one centroid per value
    #[arg(long)]
    merge_equal: bool,

    /// Keep the raw values behind each centroid (shown in json output)
    #[arg(long)]
    record_samples: bool,

    /// Output format (tsv|json)
    #[arg(short = 'o', long, value_enum, default_value_t = Output::Tsv)]
    output: Output,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Read numbers from stdin and print the ordered centroids
    Centroids,
    /// Read numbers from stdin and print tree statistics
    Stats,
}

#[derive(Serialize)]
struct Stats {
    len: usize,
    depth: u8,
    capacity: usize,
    total_weight: u64,
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    let mut out = Vec::new();
    for tok in s
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
    {
        out.push(tok.parse::<f64>()?);
    }
    Ok(out)
}

fn read_stdin_f64s() -> Result<Vec<f64>, Box<dyn Error>> {
    let mut s = String::new();
    io::stdin().read_to_string(&mut s)?;
    parse_numbers(&s)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TDIGEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let xs = read_stdin_f64s()?;
    debug!(values = xs.len(), "read input");

    let mut tree = CentroidTree::with_options(TreeOptions {
        initial_capacity: args.capacity,
        record_samples: args.record_samples,
    });
    if args.merge_equal {
        for &x in &xs {
            tree.accumulate(x, 1)?;
        }
    } else {
        tree.extend(xs)?;
    }
    info!(centroids = tree.len(), depth = tree.depth(), "tree built");

    match args.cmd {
        Cmd::Centroids => match args.output {
            Output::Tsv => {
                for c in tree.centroids() {
                    println!("{}\t{}\t{}", c.mean(), c.weight(), c.id());
                }
            }
            Output::Json => {
                println!("{}", serde_json::to_string(&tree.to_vec())?);
            }
        },
        Cmd::Stats => {
            let stats = Stats {
                len: tree.len(),
                depth: tree.depth(),
                capacity: tree.capacity(),
                total_weight: tree.total_weight(),
            };
            match args.output {
                Output::Tsv => {
                    println!("len\t{}", stats.len);
                    println!("depth\t{}", stats.depth);
                    println!("capacity\t{}", stats.capacity);
                    println!("total_weight\t{}", stats.total_weight);
                }
                Output::Json => println!("{}", serde_json::to_string(&stats)?),
            }
        }
    }
    Ok(())
}
