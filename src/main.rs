//! Command-line front end for tile grids
//!
//! Usage:
//!   tilegrid info /grids/level.tilegrid --root content   # Show grid contents and status
//!   tilegrid build /grids/level.tilegrid --root content  # Check resources, write .tilegridc
//!   tilegrid toggle-grid                                 # Flip the editor's show-grid preference
//!   tilegrid toggle-group collision                      # Flip a group's visibility

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tilegrid::grid::{load_grid_with_storage, GridDocument};
use tilegrid::pipeline;
use tilegrid::prefs::EditorPreferences;
use tilegrid::LocalStorage;

#[derive(Parser)]
#[command(name = "tilegrid")]
#[command(version = tilegrid::VERSION)]
#[command(about = "Inspect and build tile grid assets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a grid's tile set, cell size, layers and status
    Info {
        /// Grid path, relative to the content root
        grid: String,
        /// Content root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Check referenced resources and write the compiled grid
    Build {
        /// Grid path, relative to the content root
        grid: String,
        /// Content root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Toggle the show-grid editor preference
    ToggleGrid,
    /// Toggle visibility of a scene group
    ToggleGroup {
        group: String,
    },
}

fn main() -> Result<()> {
    // Initialize crash logging FIRST (before any other code)
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { grid, root } => info(&grid, root),
        Commands::Build { grid, root } => build(&grid, root),
        Commands::ToggleGrid => update_prefs(|prefs| {
            let shown = prefs.toggle_show_grid();
            println!("Grid {}", if shown { "shown" } else { "hidden" });
        }),
        Commands::ToggleGroup { group } => update_prefs(|prefs| {
            let visible = prefs.toggle_group(&group);
            println!("Group '{}' {}", group, if visible { "shown" } else { "hidden" });
        }),
    }
}

fn info(grid: &str, root: PathBuf) -> Result<()> {
    let storage = LocalStorage::with_base_dir(root);
    let msg = load_grid_with_storage(grid, &storage)
        .with_context(|| format!("Failed to load grid {}", grid))?;
    let doc = GridDocument::from_message(&msg, Box::new(storage));

    println!("Grid: {}", grid);
    println!("  Tile set:  {}", if doc.tile_set().is_empty() { "(none)" } else { doc.tile_set() });
    println!("  Cell size: {} x {}", doc.cell_width(), doc.cell_height());
    println!("  Layers:    {}", doc.layer_count());
    for layer in doc.layers() {
        println!(
            "    {:<16} z={:<6} {:<7} {} cells",
            layer.id(),
            layer.z(),
            if layer.is_visible() { "visible" } else { "hidden" },
            layer.cell_count()
        );
    }

    let statuses: Vec<_> = doc.status().iter().collect();
    if statuses.is_empty() {
        println!("Status: OK");
    } else {
        println!("Status:");
        for (field, status) in statuses {
            println!("  {}: {}", field, status);
        }
    }
    Ok(())
}

fn build(grid: &str, root: PathBuf) -> Result<()> {
    let storage = LocalStorage::with_base_dir(root);
    let output = pipeline::build_grid(&storage, grid)
        .with_context(|| format!("Failed to build {}", grid))?;
    println!("Built {}", output);
    Ok(())
}

fn update_prefs(edit: impl FnOnce(&mut EditorPreferences)) -> Result<()> {
    let path = EditorPreferences::default_path();
    let mut prefs = EditorPreferences::load_for_update(&path)
        .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
    edit(&mut prefs);
    prefs
        .save(&path)
        .with_context(|| format!("Failed to save preferences to {}", path.display()))
}
