//! Tables of countries and pops from a save game
//!
//! Run with: cargo run --bin sgm-gamestate-tool -- countries path/to/save.sav

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use stellaris_map::{open, CountryId, GameState, LoadOptions, NameTables, PopId, SpeciesId};

#[derive(Parser)]
#[command(name = "sgm-gamestate-tool")]
#[command(about = "A tool to work with save games")]
struct Cli {
    /// Print rows as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Archive entry holding the gamestate
    #[arg(long, global = true, default_value = stellaris_map::load::DEFAULT_ENTRY_NAME)]
    entry: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shows countries
    Countries { save: PathBuf },
    /// Shows pops
    Pops {
        save: PathBuf,
        /// Filter by owning country
        #[arg(long)]
        country: Option<u32>,
    },
}

#[derive(Debug, Serialize)]
struct CountryRow {
    id: CountryId,
    name: String,
}

#[derive(Debug, Serialize)]
struct PopRow {
    id: PopId,
    country: CountryId,
    planet: String,
    category: String,
    species: SpeciesId,
}

fn country_rows(state: &GameState, tables: &NameTables) -> Vec<CountryRow> {
    let mut rows: Vec<_> = state
        .countries
        .iter()
        .map(|(&id, country)| CountryRow {
            id,
            name: country.as_ref().map(|c| c.name(tables)).unwrap_or_default(),
        })
        .collect();
    rows.sort_by_key(|row| row.id);
    rows
}

fn pop_rows(state: &GameState, tables: &NameTables, country: Option<CountryId>) -> Vec<PopRow> {
    let mut rows: Vec<_> = state
        .pops
        .iter()
        .filter_map(|(&id, pop)| {
            let pop = pop.as_ref()?;
            let (planet, owner) = match state.planet(pop.planet_id) {
                Some(planet) => (planet.name(tables), planet.owner_id),
                None => (pop.planet_id.to_string(), CountryId::NONE),
            };
            Some(PopRow {
                id,
                country: owner,
                planet,
                category: pop.category.clone(),
                species: pop.species_id,
            })
        })
        .filter(|row| country.map_or(true, |c| c == row.country))
        .collect();

    rows.sort_by(|l, r| {
        l.country
            .cmp(&r.country)
            .then_with(|| l.planet.cmp(&r.planet))
            .then_with(|| l.category.cmp(&r.category))
            .then_with(|| l.species.cmp(&r.species))
            .then_with(|| l.id.cmp(&r.id))
    });
    rows
}

fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(header.to_vec());
    for row in rows {
        line(row.iter().map(String::as_str).collect());
    }
}

fn print_json<T: Serialize>(rows: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = LoadOptions::new().entry_name(cli.entry);
    let tables = NameTables::default();

    match cli.command {
        Commands::Countries { save } => {
            let game = open(&save, &options)?;
            let rows = country_rows(&game.state, &tables);
            if cli.json {
                print_json(&rows)?;
            } else {
                let cells: Vec<_> = rows
                    .iter()
                    .map(|row| vec![row.id.to_string(), row.name.clone()])
                    .collect();
                print_table(&["ID", "Country"], &cells);
            }
        }
        Commands::Pops { save, country } => {
            let game = open(&save, &options)?;
            let rows = pop_rows(&game.state, &tables, country.map(CountryId));
            if cli.json {
                print_json(&rows)?;
            } else {
                let cells: Vec<_> = rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.id.to_string(),
                            row.country.to_string(),
                            row.planet.clone(),
                            row.category.clone(),
                            row.species.to_string(),
                        ]
                    })
                    .collect();
                print_table(&["ID", "Country", "Planet", "Category", "Species"], &cells);
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellaris_map::{link, parser::decode_str};

    const STATE: &str = r#"
country={ 2={ name="Tzynn Empire" } 0={ name="United Nations of Earth" } 1=none }
planets={ planet={
    10={ name="Earth" owner=0 }
    11={ name="Mars" owner=0 }
    12={ name="Tzynn" owner=2 }
} }
pop={
    100={ species=1 planet=11 category="worker" }
    101={ species=0 planet=10 category="specialist" }
    102={ species=0 planet=10 category="worker" }
    103={ species=3 planet=12 category="slave" }
    104={ species=0 planet=99 category="worker" }
    105=none
}
"#;

    fn state() -> GameState {
        let mut state: GameState = decode_str(STATE).unwrap();
        link(&mut state);
        state
    }

    #[test]
    fn test_country_rows_sorted_by_id() {
        let rows = country_rows(&state(), &NameTables::default());
        let ids: Vec<_> = rows.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(rows[0].name, "United Nations of Earth");
        assert_eq!(rows[1].name, "");
    }

    #[test]
    fn test_pop_rows_order() {
        let rows = pop_rows(&state(), &NameTables::default(), None);
        let ids: Vec<_> = rows.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![101, 102, 100, 103, 104]);
        assert_eq!(rows[4].planet, "99");
        assert_eq!(rows[4].country, CountryId::NONE);
    }

    #[test]
    fn test_pop_rows_country_filter() {
        let rows = pop_rows(&state(), &NameTables::default(), Some(CountryId(2)));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].planet, "Tzynn");
        assert_eq!(rows[0].category, "slave");
    }
}
