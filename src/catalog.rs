use std::collections::HashSet;
use std::path::Path;

use crate::error::Error;
use crate::game::Game;

/// Reads the catalog document. Any problem here is fatal for the run.
pub fn load_catalog(path: &Path) -> Result<Vec<Game>, Error> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let games: Vec<Game> = serde_json::from_str(&raw).map_err(|e| Error::json(path, e))?;
    validate(&games)?;
    Ok(games)
}

// Ids key the fallback lookup, so they must be present and unique.
fn validate(games: &[Game]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for (index, game) in games.iter().enumerate() {
        if game.id.trim().is_empty() {
            return Err(Error::Catalog(format!("entry {index} has an empty id")));
        }
        if !seen.insert(game.id.as_str()) {
            return Err(Error::Catalog(format!("duplicate id '{}'", game.id)));
        }
    }
    Ok(())
}
