mod app;
mod cli;
mod renderer;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();
    let argv = cli.argv();

    let supervisor = app::Supervisor::new(&argv, cli.rows, cli.cols)?;
    supervisor.run()
}
