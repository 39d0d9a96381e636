use anyhow::{Context, Result};
use clap::{crate_version, App, Arg, ArgMatches};
use quire::build::build_site;
use quire::config::{Config, Options};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let matches = app().get_matches();
    init_logging(matches.occurrences_of("verbose"));

    if let Err(e) = run(&matches) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("quire")
        .version(crate_version!())
        .about("Builds a static blog from a directory of markdown posts")
        .arg(
            Arg::with_name("working-dir")
                .short("w")
                .long("working-dir")
                .takes_value(true)
                .default_value(".")
                .help("The directory the other directories are relative to"),
        )
        .arg(
            Arg::with_name("output-dir")
                .short("o")
                .long("output-dir")
                .takes_value(true)
                .default_value("public")
                .help("The directory where the site is written"),
        )
        .arg(
            Arg::with_name("empty-output-dir")
                .short("x")
                .long("empty-output-dir")
                .help("Delete the output directory before writing to it"),
        )
        .arg(
            Arg::with_name("template-dir")
                .short("t")
                .long("template-dir")
                .takes_value(true)
                .default_value("templates")
                .help("The directory where the site templates are located"),
        )
        .arg(
            Arg::with_name("blog-dir")
                .short("b")
                .long("blog-dir")
                .takes_value(true)
                .default_value("blogs")
                .help("The directory where the posts are located"),
        )
        .arg(
            Arg::with_name("static-dir")
                .short("s")
                .long("static-dir")
                .takes_value(true)
                .default_value("static")
                .help("The directory whose contents are copied into the output directory"),
        )
        .arg(
            Arg::with_name("url")
                .short("u")
                .long("url")
                .takes_value(true)
                .help("The site URL feed links are built from [default: <link> in channel.rss]"),
        )
        .arg(
            Arg::with_name("index-entries")
                .short("i")
                .long("index-entries")
                .takes_value(true)
                .help("The maximum number of entries on the index page [default: 3]"),
        )
        .arg(
            Arg::with_name("feed-entries")
                .short("f")
                .long("feed-entries")
                .takes_value(true)
                .help("The maximum number of items in the feed [default: 10]"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Log more (repeat for more detail); RUST_LOG overrides"),
        )
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let path = |name: &str| PathBuf::from(matches.value_of(name).unwrap_or_default());
    let count = |name: &str| -> Result<Option<usize>> {
        match matches.value_of(name) {
            Some(v) => Ok(Some(
                v.parse::<usize>()
                    .with_context(|| format!("Parsing --{} `{}`", name, v))?,
            )),
            None => Ok(None),
        }
    };

    let config = Config::from_options(Options {
        working_directory: path("working-dir"),
        output_directory: path("output-dir"),
        empty_output_directory: matches.is_present("empty-output-dir"),
        template_directory: path("template-dir"),
        blog_directory: path("blog-dir"),
        static_directory: path("static-dir"),
        url: matches.value_of("url").map(str::to_owned),
        index_entries: count("index-entries")?,
        feed_entries: count("feed-entries")?,
    })?;
    tracing::debug!(?config, "resolved configuration");

    build_site(&config).context("Building site")?;
    Ok(())
}
