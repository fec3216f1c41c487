use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use companion_catalog::{CatalogStore, DirAssetSource, SpeciesDefinition};
use companion_dex::{DexView, DexViewState, MergedEntry, ReadyView};
use companion_progress::FileSnapshotSource;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "companion")]
#[command(about = "Pokédex completion view over a species catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Catalog asset directory (gen1/, gen2/, ... partitions)
    #[arg(long, global = true, default_value = "species")]
    catalog: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the completion view, optionally overlaid with a save snapshot
    Dex {
        /// Progress snapshot exported from the game save (JSON)
        #[arg(long)]
        save: Option<PathBuf>,

        /// Show a single generation only
        #[arg(long)]
        generation: Option<u32>,
    },

    /// Show the catalog record for one species
    Species {
        /// Canonical species name, case-insensitive
        name: String,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let store = Arc::new(CatalogStore::new(Arc::new(DirAssetSource::new(
        &cli.catalog,
    ))));

    match cli.command {
        Commands::Dex { save, generation } => run_dex(store, save, generation).await,
        Commands::Species { name } => run_species(&store, &name).await,
    }
}

async fn run_dex(
    store: Arc<CatalogStore>,
    save: Option<PathBuf>,
    generation: Option<u32>,
) -> Result<()> {
    let view = DexView::new(store);
    view.activate().await;

    if let Some(path) = &save {
        let source = FileSnapshotSource::new(path);
        view.import_progress(&source)
            .await
            .with_context(|| format!("failed to import save {}", path.display()))?;
    }
    if generation.is_some() {
        view.select_generation(generation);
    }

    match view.state() {
        DexViewState::Ready(ready) => print_dex(&ready),
        DexViewState::Error { message } => bail!("catalog load failed: {message}"),
        // activate() resolves before returning, so these are unreachable in
        // a one-shot command.
        DexViewState::Idle | DexViewState::Loading => bail!("view did not finish loading"),
    }
    Ok(())
}

fn print_dex(ready: &ReadyView) {
    println!(
        "Captured {} of {} species",
        ready.captured_count(),
        ready.all_entries.len()
    );
    match ready.selected_generation {
        Some(generation) => println!("Generation {generation}:"),
        None => println!("All generations:"),
    }
    for entry in ready.displayed_entries.iter() {
        println!("{}", format_entry(entry));
    }
}

fn format_entry(entry: &MergedEntry) -> String {
    let species = &entry.species;
    let types = match &species.secondary_type {
        Some(secondary) => format!("{}/{}", species.primary_type, secondary),
        None => species.primary_type.clone(),
    };
    let capture = if entry.captured {
        if entry.aspects.is_empty() {
            "caught".to_string()
        } else {
            format!("caught [{}]", entry.aspects.join(", "))
        }
    } else {
        "missing".to_string()
    };
    format!(
        "#{:04} {:<12} gen {} {:<15} {}",
        species.national_pokedex_number, species.name, species.generation, types, capture
    )
}

async fn run_species(store: &CatalogStore, name: &str) -> Result<()> {
    let species = store
        .species_by_name(name)
        .await
        .context("failed to load the species catalog")?;
    let Some(species) = species else {
        bail!("species {name:?} is not in the catalog");
    };
    print_species(&species);
    Ok(())
}

fn print_species(species: &SpeciesDefinition) {
    println!(
        "#{:04} {} (generation {})",
        species.national_pokedex_number, species.name, species.generation
    );
    match &species.secondary_type {
        Some(secondary) => println!("Type: {}/{}", species.primary_type, secondary),
        None => println!("Type: {}", species.primary_type),
    }
    println!("Abilities: {}", species.abilities.join(", "));
    let stats = &species.base_stats;
    println!(
        "Stats: hp {} / atk {} / def {} / spa {} / spd {} / spe {}",
        stats.hp, stats.attack, stats.defense, stats.special_attack, stats.special_defense,
        stats.speed
    );
    println!("Catch rate: {}", species.catch_rate);
    println!(
        "Gender ratio: {:.1}% male / {:.1}% female",
        species.male_ratio * 100.0,
        species.female_ratio * 100.0
    );
    if let Some(evolutions) = &species.evolutions {
        for evolution in evolutions {
            match (&evolution.level, &evolution.item) {
                (Some(level), _) => println!("Evolves into {} at level {}", evolution.result, level),
                (None, Some(item)) => println!("Evolves into {} with {}", evolution.result, item),
                (None, None) => println!("Evolves into {}", evolution.result),
            }
        }
    }
    if let Some(biomes) = &species.spawn_biomes {
        println!("Spawns in: {}", biomes.join(", "));
    }
}
