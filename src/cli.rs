use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, Command, ValueHint};

pub fn build_command() -> Command {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args([
            Arg::new("config")
                .short('c')
                .long("config-file")
                .alias("config")
                .global(true)
                .value_hint(ValueHint::FilePath)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the YAML config file."),
            Arg::new("catalog")
                .long("catalog")
                .global(true)
                .value_hint(ValueHint::FilePath)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the games catalog JSON."),
            Arg::new("output")
                .short('o')
                .long("output")
                .alias("players")
                .global(true)
                .value_hint(ValueHint::FilePath)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the player count JSON document."),
            Arg::new("log_level")
                .short('l')
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .help("One of error, warn, info, debug, trace."),
        ])
        .subcommand(
            Command::new("fetch")
                .about("Query Steam for every catalog entry and rewrite the player document.")
                .args([
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64))
                        .help("Per-request timeout in seconds."),
                    Arg::new("country")
                        .long("country")
                        .alias("cc")
                        .value_name("CC")
                        .help("Store region used for sale prices."),
                ]),
        )
        .subcommand(
            Command::new("watch")
                .about("Show the player document as a table, refreshing periodically.")
                .args([
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64))
                        .help("Seconds between refreshes."),
                    Arg::new("once")
                        .long("once")
                        .action(ArgAction::SetTrue)
                        .help("Render a single frame and exit."),
                ]),
        )
}
