use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod console;
pub mod exit_codes;

use cli::args::Cli;
use cli::config::Config;
use cli::publish::run;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(exit_codes::FAILURE);
        }
    };

    println!("{}", console::banner());
    let config = match Config::from_args(cli) {
        Ok(config) => config,
        Err(problems) => {
            print!("{}", console::config_errors(&problems));
            std::process::exit(exit_codes::FAILURE);
        }
    };

    let code = match run(config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::FAILURE
        }
    };
    std::process::exit(code);
}
