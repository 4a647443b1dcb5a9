use clap::Parser;
use plastic_flows::cli::{Cli, run};
use plastic_flows::logging::init_logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
