//! nsscache-gen: CLI tool for generating NSS cache and index files.

use clap::{Parser, Subcommand};
use nsscache::{
    parse_entries, write_map_files, Cache, Config, Entry, GroupEntry, MapKind, PasswdEntry,
    ShadowEntry,
};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nsscache-gen")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Generate NSS flat-file caches and binary-search indices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every map listed in a YAML config
    Build {
        /// YAML configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Convert a single source map without a config file
    Convert {
        /// Map kind: passwd, shadow or group
        #[arg(short, long)]
        map: MapKind,

        /// Input flat file in passwd(5)/shadow(5)/group(5) format
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for cache and index files
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { config } => build(&config),
        Commands::Convert {
            map,
            input,
            output_dir,
            verbose,
        } => convert(map, &input, &output_dir, Cache::new(), verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build(config_path: &Path) -> nsscache::Result<()> {
    let config = Config::load(config_path)?;

    for source in &config.maps {
        let map = source.kind()?;
        convert(map, &source.source, &config.output_dir, config.new_cache(), false)?;
    }

    Ok(())
}

fn convert(
    map: MapKind,
    input: &Path,
    output_dir: &Path,
    mut cache: Cache,
    verbose: bool,
) -> nsscache::Result<()> {
    if verbose {
        println!("Reading {} source: {:?}", map, input);
    }

    let file = File::open(input)?;
    let entries = read_entries(map, file)?;
    let parsed = entries.len();
    cache.add(entries);

    if verbose {
        println!(
            "Parsed {} entries, {} accepted ({} bytes)",
            parsed,
            cache.len(),
            cache.serialized_len()
        );
    }

    let paths = write_map_files(&cache, map, output_dir)?;

    println!("Successfully converted {:?} -> {} files", input, paths.len());
    Ok(())
}

fn read_entries(map: MapKind, file: File) -> nsscache::Result<Vec<Box<dyn Entry>>> {
    Ok(match map {
        MapKind::Passwd => boxed(parse_entries::<PasswdEntry, _>(file)?),
        MapKind::Shadow => boxed(parse_entries::<ShadowEntry, _>(file)?),
        MapKind::Group => boxed(parse_entries::<GroupEntry, _>(file)?),
    })
}

fn boxed<E: Into<Box<dyn Entry>>>(entries: Vec<E>) -> Vec<Box<dyn Entry>> {
    entries.into_iter().map(Into::into).collect()
}
