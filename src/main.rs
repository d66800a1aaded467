use anyhow::Result;
use clap::Parser;
use hashmark::{run, Args};

fn main() -> Result<()> {
    run(Args::parse())
}
