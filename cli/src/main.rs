mod cli;
mod errors;
mod logger;

use std::env::var;

use structopt::StructOpt;

use crate::errors::report;
use crate::logger::{init_logger, GRAPHQLGEN_LOG_LEVEL};

fn main() {
    let cli = cli::Graphqlgen::from_args();

    // get log level env variable and initialize the global logger
    let env_log_level = var(GRAPHQLGEN_LOG_LEVEL);
    init_logger(cli.verbose, cli.quiet, env_log_level);

    match cli.run() {
        Ok(code) => code.exit(),
        Err(err) => {
            report(&err);
            err.exit_code().exit();
        }
    }
}
