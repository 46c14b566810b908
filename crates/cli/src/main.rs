use std::io::{stdin, stdout};
use std::process::ExitCode;

use clap::Parser;
use hyperlab_core::config;
use hyperlab_core::error::Result;
use hyperlab_core::file_handling;
use hyperlab_core::remote::SshExecutor;
use hyperlab_cli::cli_args::Args;
use hyperlab_cli::handlers::Session;
use log::debug;

fn execute() -> Result<()> {
    let args = Args::parse();

    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{}`", config_path);

    let hosts_config =
        file_handling::get_hosts_config_or_single(&config_path, args.host.as_deref())?;
    let executor = SshExecutor::from_config(&hosts_config);

    let mut session = Session {
        args: &args,
        config: &hosts_config,
        executor: &executor,
        input: stdin().lock(),
        output: stdout(),
    };

    session.run()
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
