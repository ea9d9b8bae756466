use clap::Parser;
use linked_seq::collections::SequenceError;
use linked_seq::demo::{self, DemoConfig};
use tracing_subscriber::EnvFilter;

/// run the LinkedSequence demos: integer statistics, a string insert/erase
/// walk, splitting person records by age, a sort check with a shuffle, and
/// a fixed sample list
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// how many random integers to summarize
    #[arg(long, default_value_t = 1000)]
    count: usize,

    /// how many "old" strings to fill before inserting
    #[arg(long, default_value_t = 10)]
    strings: usize,

    /// index where "new" is inserted and erased
    #[arg(long, default_value_t = 5)]
    insert_index: usize,

    /// how many person records to generate
    #[arg(long, default_value_t = 100)]
    people: usize,

    /// how many integers to selection sort
    #[arg(long, default_value_t = 1000)]
    sort_count: usize,

    /// fixed seed for the generated data
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Args> for DemoConfig {
    fn from(args: Args) -> Self {
        Self {
            count: args.count,
            strings: args.strings,
            insert_index: args.insert_index,
            people: args.people,
            sort_count: args.sort_count,
            seed: args.seed,
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn main() -> Result<(), SequenceError> {
    enable_tracing();

    let config = DemoConfig::from(Args::parse());
    tracing::info!(?config, "starting demo run");
    demo::run(&config)
}
