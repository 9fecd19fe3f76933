use std::path::Path;

use anyhow::{Context, Result};
use oews_atlas_core::constants::DEFAULT_YEAR;
use oews_atlas_core::slugify;
use oews_atlas_storage::{LocationStore, SalaryStore, StatsStore, Storage};

use crate::ensure_db_dir;

fn open_storage(db_path: &Path) -> Result<Storage> {
    ensure_db_dir(db_path)?;
    Storage::new(db_path).with_context(|| format!("opening {}", db_path.display()))
}

pub(crate) async fn run_stats(db_path: &Path) -> Result<()> {
    let storage = open_storage(db_path)?;
    let stats = StatsStore::get_stats(&storage).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub(crate) async fn run_lookup(
    db_path: &Path,
    career: &str,
    location: Option<&str>,
    year: Option<i32>,
) -> Result<()> {
    let storage = open_storage(db_path)?;
    let career = slugify(career);
    let year = year.unwrap_or(DEFAULT_YEAR);

    let location_id = match location {
        Some(slug) => match LocationStore::get_location_by_slug(&storage, slug).await? {
            Some(loc) => Some(loc.id),
            None => {
                println!("Location not found: {slug}");
                return Ok(());
            },
        },
        None => None,
    };

    match SalaryStore::get_salary(&storage, &career, location_id.as_deref(), year).await? {
        Some(row) => println!("{}", serde_json::to_string_pretty(&row)?),
        None => println!(
            "Salary data not found: {career} ({}, {year})",
            location.unwrap_or("national")
        ),
    }
    Ok(())
}

pub(crate) async fn run_locations(db_path: &Path, state: Option<&str>) -> Result<()> {
    let storage = open_storage(db_path)?;
    let locations = LocationStore::list_locations(&storage, state).await?;
    println!("{}", serde_json::to_string_pretty(&locations)?);
    Ok(())
}
