// crates/prompter/src/main.rs

use anyhow::{Context, Result};
use std::env;
use std::io::{self, Write};
use std::process;

use deliver_prompt::SystemClipboard;
use prompter::app::{self, config_error, AppIo};
use prompter::cli::{
    build_cli, options_from_matches, prescan_config_path, prescan_verbose, request_from_matches,
};
use prompter_config::ConfigManager;
use prompter_errors::recover_from_error;

const LOG_ENV: &str = "PROMPTER_LOG";

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, default_filter))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn try_main(args: Vec<String>) -> Result<()> {
    // The config file has to be read before clap runs: it defines custom template flags.
    let mut manager = ConfigManager::new();
    let loaded = manager
        .load(prescan_config_path(&args).as_deref())
        .map_err(config_error)?;

    let matches = build_cli(&loaded.custom_template).get_matches_from(&args);
    let options = options_from_matches(&matches);
    let request = request_from_matches(&matches, &loaded.custom_template);
    log::debug!("request: {:?}", request);

    let cwd = env::current_dir().context("failed to determine the working directory")?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let clipboard = SystemClipboard::default();

    let mut io = AppIo {
        input: &mut input,
        stdout: &mut stdout,
        stderr: &mut stderr,
        clipboard: &clipboard,
    };
    app::run(request, options, &mut manager, &cwd, &mut io)?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    init_logging(prescan_verbose(&args));

    if let Err(err) = try_main(args) {
        let err = recover_from_error(err);
        log::debug!("{:?}", err);
        eprintln!("{}", err);
        process::exit(1);
    }
}
