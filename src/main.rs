#![warn(clippy::pedantic, clippy::cargo, clippy::nursery)]
#![allow(clippy::cargo_common_metadata)]

use alldone::cli::cli;
use alldone::engine::MemStore;
use flexi_logger::Logger;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
  let _logger = Logger::try_with_env_or_str("warn")?.start()?;
  cli(MemStore::new())
}
