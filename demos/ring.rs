//! Build a ring, converge it, print the successor walk and check a put/get round trip.
//!
//! Run: `cargo run --example ring -- --nodes 16`

use std::time::Instant;

use chordring::{Config, Error, Lookup, Ring, TickOrder};

use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of nodes to add to the ring
    #[arg(short, long, default_value_t = 10)]
    nodes: usize,
    /// Finger table entries per node
    #[arg(short, long, default_value_t = 12)]
    fingers: usize,
    /// Visit nodes in a random order on every tick
    #[arg(long)]
    shuffle: bool,
    /// Number of keys to put then get
    #[arg(short, long, default_value_t = 1000)]
    keys: usize,
    /// Log every pointer change
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let mut ring = Ring::new(Config {
        finger_table_size: cli.fingers,
        tick_order: if cli.shuffle {
            TickOrder::Shuffled
        } else {
            TickOrder::ReverseJoin
        },
        ..Default::default()
    })?;

    let root = ring.add_node("ROOT")?;
    ring.cohere(root)?;

    for i in 0..cli.nodes.saturating_sub(1) {
        match ring.add_node(&i.to_string()) {
            Ok(node) => {
                ring.join(node, root)?;
                println!("Added node {i}");
            }
            Err(Error::IdCollision { id, existing }) => {
                println!("Skipping node {i}: {id:?} is taken by {existing}");
            }
            Err(error) => return Err(error),
        }
    }

    let start = Instant::now();
    let rounds = ring.converge(100 * cli.nodes.max(1))?;

    println!(
        "\nConverged after {rounds} ticks in {:?}\n",
        start.elapsed()
    );

    for index in ring.walk(root)? {
        let node = ring.node(index)?;
        println!("{:>10} {:>5}", node.address(), node.id());
    }

    for lookup in [Lookup::SingleHop, Lookup::Recursive] {
        for i in 0..cli.keys {
            let value = (i as i64 - 255).to_be_bytes().to_vec();
            ring.put(root, i.to_string(), value, lookup)?;
        }
        for i in 0..cli.keys {
            let value = ring.get(root, i.to_string(), lookup)?;
            assert_eq!(&value[..], &(i as i64 - 255).to_be_bytes()[..]);
        }

        println!("\n{lookup:?}: {} keys round tripped", cli.keys);
    }

    Ok(())
}
