use std::env::VarError;

use log::LevelFilter::{Debug, Error, Info};

pub const GRAPHQLGEN_LOG_LEVEL: &str = "GRAPHQLGEN_LOG_LEVEL";

pub fn init_logger(verbose: bool, quiet: bool, env_log_level: Result<String, VarError>) {
    // warn if someone is trying to use the flags _and_ env
    if env_log_level.is_ok() && (verbose || quiet) {
        let flag = if verbose { "--verbose" } else { "--quiet" };
        eprintln!(
            "{} and the {} flag is set. The {} flag takes precedence over {}.",
            GRAPHQLGEN_LOG_LEVEL, flag, flag, GRAPHQLGEN_LOG_LEVEL
        );
    };

    // flags take precedence over the env variable's log level; with neither,
    // default to `Info`
    if verbose || quiet || env_log_level.is_err() {
        let flag_log_level = match (verbose, quiet) {
            (false, false) => Info, // default
            (false, true) => Error,
            (true, false) => Debug,
            (true, true) => unreachable!("Cannot pass verbose and quiet flags"),
        };
        env_logger::builder()
            .filter_level(flag_log_level)
            // only show timestamps and module paths on verbose levels
            .format_timestamp(None)
            .format_module_path(verbose)
            .init()
    } else {
        let env_filter = env_logger::Env::default().filter(GRAPHQLGEN_LOG_LEVEL);
        let log_level = env_log_level.unwrap_or_default().to_lowercase();
        let print_module_path = log_level.contains("debug") || log_level.contains("trace");
        env_logger::Builder::from_env(env_filter)
            .format_timestamp(None)
            .format_module_path(print_module_path)
            .init()
    }
}
