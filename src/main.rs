use clap::Parser;
use crosstrader::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
