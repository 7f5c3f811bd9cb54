use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};
use emptycopy::config::Overrides;
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("source")
                .help("Directory whose layout is replicated")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("target")
                .help("Where the empty copy is created [default: <parent>/empty_<source name>]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .value_name("N")
                .help("Only replicate N levels below the source (unlimited if omitted)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("PREFIX")
                .help("Prefix of the default target name"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("TOML file with default `prefix` and `depth`")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the tree that would be created and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let source = matches
        .get_one::<PathBuf>("source")
        .expect("source required");
    let target = matches.get_one::<PathBuf>("target");

    let overrides = Overrides {
        prefix: matches.get_one::<String>("prefix").cloned(),
        depth: matches.get_one::<usize>("depth").copied(),
    };

    let settings = emptycopy::load_settings(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        overrides,
    )?;

    if matches.get_flag("dry-run") {
        emptycopy::dry_run(source, target.map(PathBuf::as_path), &settings)?;
    } else {
        emptycopy::empty_copy(source, target.map(PathBuf::as_path), &settings)?;
    }

    Ok(())
}
