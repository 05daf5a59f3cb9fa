use clap::Parser;

use crate::player::config::read_config;
use crate::player::runner::ReplayRunner;

mod player;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct CliArgs {
    #[arg(short = 'c', long, value_name = "CONFIG_FILE")]
    config: String,
}

fn main() {
    let args = CliArgs::parse();
    let start = std::time::Instant::now();
    let config = read_config(&args.config);
    let mut runner = ReplayRunner::new(config);
    runner.run();
    let elapsed = start.elapsed();
    println!("Replay finished in {} ms.", elapsed.as_millis());
}
