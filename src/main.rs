use clap::Parser;
use regimescope::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
