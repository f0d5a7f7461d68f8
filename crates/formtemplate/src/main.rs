//! formtemplate - render XML form templates from the command line.

use clap::Parser;
use env_logger::Env;
use miette::Result;
use std::process::ExitCode;

mod cli;
mod config;
mod output;
mod render;

use cli::Args;
use config::Config;
use output::OutputFormatter;
use render::Outcome;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = Config::load(&args)?;
    let formatter = OutputFormatter::new(config.output);

    match render::run(&config).await? {
        Outcome::List(names) => formatter.print_list(&names),
        Outcome::Panel(rendered) => formatter.print_panel(&rendered),
    }
    Ok(ExitCode::SUCCESS)
}
