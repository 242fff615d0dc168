//! JSON-backed location catalog.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;

use super::types::CandidateProvider;
use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::model::{Location, LocationId};

/// Location set loaded from a JSON array (the `DataPath` file) or supplied
/// directly.
///
/// Ids are renumbered on construction so that every location's id equals
/// its index.
///
/// # Examples
///
/// ```
/// use u_orienteering::model::Location;
/// use u_orienteering::strategy::{CandidateProvider, LocationCatalog};
///
/// let catalog = LocationCatalog::from_locations(vec![
///     Location::new(17, 0.0, 0.0),
///     Location::new(3, 10.0, 0.0),
/// ]);
/// assert_eq!(catalog.all_locations()[1].id, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    locations: Vec<Arc<Location>>,
}

impl LocationCatalog {
    /// Creates an empty catalog that loads `DataPath` on initialization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a preloaded catalog.
    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let locations = locations
            .into_iter()
            .enumerate()
            .map(|(idx, mut loc)| {
                loc.id = idx;
                Arc::new(loc)
            })
            .collect();
        Self { locations }
    }

    /// Parses a JSON array of locations from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let locations: Vec<Location> = serde_json::from_str(&raw)?;
        info!("loaded {} locations from {}", locations.len(), path.display());
        Ok(Self::from_locations(locations))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, id: LocationId) -> Option<&Arc<Location>> {
        self.locations.get(id)
    }
}

impl CandidateProvider for LocationCatalog {
    fn initialize(&mut self, config: &SolverConfig) -> Result<()> {
        if self.locations.is_empty() {
            *self = Self::load(config.require_data_path()?)?;
        }
        Ok(())
    }

    fn all_locations(&self) -> &[Arc<Location>] {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Anchors, FeasibilityChecker};
    use crate::variants::BudgetChecker;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "u-orienteering-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_renumbers_ids() {
        let catalog = LocationCatalog::from_locations(vec![
            Location::new(9, 0.0, 0.0),
            Location::new(9, 1.0, 0.0),
            Location::new(2, 2.0, 0.0),
        ]);
        let ids: Vec<_> = catalog.all_locations().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(catalog.get(2).unwrap().x, 2.0);
    }

    #[test]
    fn test_initialize_loads_data_path() {
        let path = temp_file(
            "catalog",
            r#"[{"x": 0, "y": 0, "title": "A"}, {"x": 100, "y": 0, "title": "B"}]"#,
        );
        let mut catalog = LocationCatalog::new();
        catalog
            .initialize(&SolverConfig::greedy().with_data_path(&path))
            .unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().title, "B");
    }

    #[test]
    fn test_initialize_without_data_path_fails() {
        let mut catalog = LocationCatalog::new();
        let err = catalog.initialize(&SolverConfig::greedy()).unwrap_err();
        assert!(matches!(err, Error::MissingKey("DataPath")));
    }

    #[test]
    fn test_preloaded_ignores_data_path() {
        let mut catalog = LocationCatalog::from_locations(vec![Location::new(0, 0.0, 0.0)]);
        catalog
            .initialize(&SolverConfig::greedy().with_data_path("/missing.json"))
            .unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_file("malformed", r#"[{"x": "east"}]"#);
        let err = LocationCatalog::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_current_candidates_filters_by_checker() {
        let catalog = LocationCatalog::from_locations(vec![
            Location::new(0, 0.0, 0.0),
            Location::new(0, 100.0, 0.0),
            Location::new(0, 50_000.0, 0.0),
            Location::new(0, 200.0, 0.0),
        ]);
        let checker = BudgetChecker::new(Anchors::new(0, 3), 60)
            .initialize(catalog.all_locations())
            .unwrap();
        let ids: Vec<_> = catalog.current_candidates(&checker).into_keys().collect();
        assert_eq!(ids, vec![1]);
    }
}
