use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "progression server")]
pub struct Cli {
    #[clap(long, env, default_value = "progression.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// How many of the most recent sessions the engine looks at per exercise
    #[arg(long, env, default_value = "5")]
    pub history_window: usize,
    /// Working sets per exercise when a recommendation request doesn't say
    #[arg(long, env, default_value = "3")]
    pub default_set_count: u32,

    /// Deletes the database before starting the main program for debug purposes
    #[arg(long, env, default_value = "false")]
    pub debug_delete_database: bool,
}
