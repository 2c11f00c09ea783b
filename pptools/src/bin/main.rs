use clap::{Parser, Subcommand};
use pokepack::Scheme;
use pptools::{app_paths::AppPaths, compress, config::Config, decompress, inspect, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pptools", about = "Compress and expand Pokemon Showdown pastes")]
struct Opts {
    #[arg(long, short = 'c')]
    config_dir: Option<PathBuf>,
    #[arg(long)]
    scheme: Option<Scheme>,
    #[arg(long)]
    dex_dir: Option<PathBuf>,
    #[arg(long)]
    log_to_file: bool,
    #[arg(long)]
    enable_debug: bool,
    #[command(subcommand)]
    tool: ToolOpts,
}

#[derive(Subcommand)]
enum ToolOpts {
    Compress(compress::Opts),
    Decompress(decompress::Opts),
    Inspect(inspect::Opts),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();

    let app_paths = AppPaths::resolve(opts.config_dir.clone())?;
    if opts.log_to_file {
        logging::initialize(opts.enable_debug, app_paths.log_dir()?)?;
    } else {
        env_logger::init();
    }

    let mut config = Config::load(app_paths.config_dir())?;
    if let Some(scheme) = opts.scheme {
        config.scheme = scheme;
    }
    if let Some(dex_dir) = opts.dex_dir {
        config.dex_dir = Some(dex_dir);
    }
    log::debug!("Using {config:?}");
    let gateway = config.build_gateway()?;

    match opts.tool {
        ToolOpts::Compress(opts) => compress::run(opts, &gateway, config.format),
        ToolOpts::Decompress(opts) => decompress::run(opts, &gateway),
        ToolOpts::Inspect(opts) => inspect::run(opts, &gateway, config.scheme),
    }
    .map_err(|err| {
        eprintln!("Failed to execute command: {err}");
        err
    })
}
