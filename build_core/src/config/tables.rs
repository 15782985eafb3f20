//! Data table loading: scroll table, cube catalog and ability line catalog

use super::ConfigError;
use crate::cube::{CubeCatalog, RarityTier};
use crate::lines::{LineCatalog, LineTable, StatLineOption};
use crate::scroll::{ScrollAction, ScrollTable};
use crate::types::{Rarity, SlotId, StatDelta, StatKind};
use std::path::Path;
use tracing::warn;

const SCROLL_TABLE: &str = "scroll table";
const CUBE_CATALOG: &str = "cube catalog";
const LINE_CATALOG: &str = "line catalog";

/// Load and validate a scroll table from a TOML file
pub fn load_scroll_table(path: &Path) -> Result<ScrollTable, ConfigError> {
    let table: ScrollTable = super::load_toml(path, SCROLL_TABLE)?;
    table.validate().map_err(|e| e.in_table(SCROLL_TABLE))?;
    Ok(table)
}

pub fn parse_scroll_table(content: &str) -> Result<ScrollTable, ConfigError> {
    let table: ScrollTable = super::parse_toml(content, SCROLL_TABLE)?;
    table.validate().map_err(|e| e.in_table(SCROLL_TABLE))?;
    Ok(table)
}

/// Get the shipped scroll table
pub fn default_scroll_table() -> ScrollTable {
    let toml = include_str!("../../config/scrolls.toml");
    parse_scroll_table(toml).unwrap_or_else(|e| {
        warn!(error = %e, "shipped scroll table is invalid, using a single sure action");
        ScrollTable {
            slots: 7,
            discard_cost: 5.0,
            global_bonus: 0.0,
            bonus_slots: Vec::new(),
            bonus_slot_extra: 0.0,
            max_resets: 10_000,
            actions: vec![ScrollAction {
                id: "scroll_100".to_string(),
                cost: 1.0,
                success_rate: 100.0,
                rewards: vec![StatDelta::new(StatKind::Attack, 3.0)],
            }],
        }
    })
}

/// Load and validate a cube catalog from a TOML file
pub fn load_cube_catalog(path: &Path) -> Result<CubeCatalog, ConfigError> {
    let catalog: CubeCatalog = super::load_toml(path, CUBE_CATALOG)?;
    catalog.validate().map_err(|e| e.in_table(CUBE_CATALOG))?;
    Ok(catalog)
}

pub fn parse_cube_catalog(content: &str) -> Result<CubeCatalog, ConfigError> {
    let catalog: CubeCatalog = super::parse_toml(content, CUBE_CATALOG)?;
    catalog.validate().map_err(|e| e.in_table(CUBE_CATALOG))?;
    Ok(catalog)
}

/// Get the shipped cube catalog
pub fn default_cube_catalog() -> CubeCatalog {
    let toml = include_str!("../../config/cubes.toml");
    parse_cube_catalog(toml).unwrap_or_else(|e| {
        warn!(error = %e, "shipped cube catalog is invalid, using a one-slot catalog");
        CubeCatalog {
            slots: vec![SlotId::from("weapon")],
            starting_rarity: Rarity::Rare,
            tiers: vec![RarityTier {
                rarity: Rarity::Rare,
                promotion_rate: 0.0,
                pity: None,
            }],
            lines: (1..=3)
                .map(|line| LineTable {
                    rarity: Rarity::Rare,
                    line,
                    options: vec![StatLineOption::new(StatKind::Damage, 3.0)],
                })
                .collect(),
            slot_lines: Vec::new(),
        }
    })
}

fn validate_line_catalog(catalog: &LineCatalog) -> Result<(), ConfigError> {
    if let Some(table) = catalog.lines.iter().find(|t| !(1..=3).contains(&t.line)) {
        return Err(ConfigError::ValidationError(format!(
            "{} line position {} is outside 1..=3",
            table.rarity, table.line
        )));
    }
    Ok(())
}

/// Load and validate a line catalog (inner ability style) from a TOML file
pub fn load_line_catalog(path: &Path) -> Result<LineCatalog, ConfigError> {
    let catalog: LineCatalog = super::load_toml(path, LINE_CATALOG)?;
    validate_line_catalog(&catalog).map_err(|e| e.in_table(LINE_CATALOG))?;
    Ok(catalog)
}

pub fn parse_line_catalog(content: &str) -> Result<LineCatalog, ConfigError> {
    let catalog: LineCatalog = super::parse_toml(content, LINE_CATALOG)?;
    validate_line_catalog(&catalog).map_err(|e| e.in_table(LINE_CATALOG))?;
    Ok(catalog)
}

/// Get the shipped inner ability catalog
pub fn default_line_catalog() -> LineCatalog {
    let toml = include_str!("../../config/inner_ability.toml");
    parse_line_catalog(toml).unwrap_or_else(|e| {
        warn!(error = %e, "shipped line catalog is invalid, using an empty catalog");
        LineCatalog::default()
    })
}
