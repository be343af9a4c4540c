use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use structopt::clap::AppSettings;
use structopt::StructOpt;

use graphqlgen::model;
use graphqlgen::response::{to_json_pretty, to_json_with_capacity};

use crate::errors::{CliError, ExitCode, Fallible};

#[derive(StructOpt)]
#[structopt(
    name = "graphqlgen",
    about = "Compiles a GraphQL schema and emits its runtime introspection table",
    rename_all = "kebab-case",
    global_setting = AppSettings::ColoredHelp,
    global_setting = AppSettings::ColorAuto,
    global_setting = AppSettings::DeriveDisplayOrder,
)]
pub struct Graphqlgen {
    /// Path to the GraphQL SDL schema file
    #[structopt(parse(from_os_str))]
    pub schema: PathBuf,

    /// Write the introspection table to this file instead of stdout
    #[structopt(long, short, parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Pretty-print the emitted JSON
    #[structopt(long)]
    pub pretty: bool,

    #[structopt(long, help = "Enables verbose diagnostics", global = true)]
    pub verbose: bool,

    #[structopt(
        long,
        help = "Prevents unnecessary output",
        global = true,
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Graphqlgen {
    pub fn run(self) -> Fallible<ExitCode> {
        let source = fs::read_to_string(&self.schema).map_err(|source| CliError::Read {
            path: self.schema.clone(),
            source,
        })?;
        debug!("compiling {}", self.schema.display());

        let schema = graphqlgen::compile_schema(&source)?;
        info!(
            "compiled {}: {} objects, {} interfaces, {} unions, {} enums, {} inputs, {} scalars",
            self.schema.display(),
            schema.objects.len(),
            schema.interfaces.len(),
            schema.unions.len(),
            schema.enums.len(),
            schema.inputs.len(),
            schema.scalars.len(),
        );

        let table = model::schema_value(&schema);
        let json = if self.pretty {
            to_json_pretty(&table)
        } else {
            to_json_with_capacity(&table, 64 * 1024)
        };

        match &self.output {
            Some(path) => {
                fs::write(path, json.as_bytes()).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                info!("wrote {}", path.display());
            }
            None => println!("{}", json),
        }
        Ok(ExitCode::Success)
    }
}
