use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use validator::Validate;

use crate::error::{EngineError, EngineResult};
use crate::models::domain::{normalize_name, Location};

/// Read-only catalog of tourist locations
///
/// Built once at startup and never mutated, so it can be shared freely
/// across request handlers.
#[derive(Debug, Clone)]
pub struct LocationCatalog {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl LocationCatalog {
    /// Load the catalog from a CSV reference dataset
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            EngineError::catalog_unavailable(format!("{}: {}", path.display(), e))
        })?;

        let catalog = Self::from_reader(file)?;
        tracing::info!("Loaded {} locations from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a CSV dataset from any reader
    pub fn from_reader<R: Read>(reader: R) -> EngineResult<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut locations = Vec::new();
        for (row, result) in rdr.deserialize::<Location>().enumerate() {
            // Header is line 1
            let location = result.map_err(|e| {
                EngineError::catalog_unavailable(format!("row {}: {}", row + 2, e))
            })?;
            locations.push(location);
        }

        Self::from_locations(locations)
    }

    /// Build a catalog from already-constructed locations
    ///
    /// Every location is validated. Later entries whose normalized name
    /// repeats an earlier one are dropped.
    pub fn from_locations(locations: Vec<Location>) -> EngineResult<Self> {
        if locations.is_empty() {
            return Err(EngineError::catalog_unavailable("dataset contains no locations"));
        }

        let mut kept = Vec::with_capacity(locations.len());
        let mut index = HashMap::with_capacity(locations.len());

        for location in locations {
            if let Err(errors) = location.validate() {
                return Err(EngineError::catalog_unavailable(format!(
                    "invalid location '{}': {}",
                    location.name, errors
                )));
            }
            if !location.is_finite() {
                return Err(EngineError::catalog_unavailable(format!(
                    "invalid location '{}': non-finite attribute",
                    location.name
                )));
            }

            let key = location.normalized_name();
            if key.is_empty() {
                return Err(EngineError::catalog_unavailable("location with blank name"));
            }
            if index.contains_key(&key) {
                tracing::warn!("Skipping duplicate location '{}'", location.name);
                continue;
            }

            index.insert(key, kept.len());
            kept.push(location);
        }

        Ok(Self {
            locations: kept,
            index,
        })
    }

    /// Find a location by name, ignoring case and surrounding whitespace
    pub fn lookup(&self, name: &str) -> EngineResult<&Location> {
        self.index
            .get(&normalize_name(name))
            .map(|&i| &self.locations[i])
            .ok_or_else(|| EngineError::NotFound(name.trim().to_string()))
    }

    /// All locations in dataset order
    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Location_Name,l_hist,l_adv,l_nat,l_rel,l_outdoor,l_lat,l_lng
Sigiriya Rock Fortress,1.0,0.4,0.5,0.1,1,7.9570,80.7603
Temple of the Tooth,1.0,0.1,0.2,0.6,0,7.2936,80.6413
Galle Fort,0.9,0.1,0.2,0.8,1,6.0311,80.2170
";

    #[test]
    fn test_parse_csv() {
        let catalog = LocationCatalog::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.all()[0].name, "Sigiriya Rock Fortress");
        assert!(catalog.all()[0].outdoor);
        assert!(!catalog.all()[1].outdoor);
    }

    #[test]
    fn test_lookup_is_normalized() {
        let catalog = LocationCatalog::from_reader(SAMPLE.as_bytes()).unwrap();

        let loc = catalog.lookup("  galle FORT ").unwrap();
        assert_eq!(loc.name, "Galle Fort");
        assert_eq!(loc.latitude, 6.0311);
    }

    #[test]
    fn test_lookup_not_found() {
        let catalog = LocationCatalog::from_reader(SAMPLE.as_bytes()).unwrap();

        match catalog.lookup("Atlantis") {
            Err(EngineError::NotFound(name)) => assert_eq!(name, "Atlantis"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_name_header_alias() {
        let csv = "name,l_hist,l_adv,l_nat,l_rel,l_outdoor,l_lat,l_lng\n\
                   Lotus Tower,0.1,0.3,0.1,0.7,false,6.9269,79.8583\n";
        let catalog = LocationCatalog::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(catalog.lookup("lotus tower").unwrap().name, "Lotus Tower");
    }

    #[test]
    fn test_out_of_range_affinity_rejected() {
        let csv = "Location_Name,l_hist,l_adv,l_nat,l_rel,l_outdoor,l_lat,l_lng\n\
                   Broken,1.4,0.3,0.1,0.7,1,6.9,79.8\n";

        assert!(matches!(
            LocationCatalog::from_reader(csv.as_bytes()),
            Err(EngineError::ArtifactUnavailable { .. })
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let csv = "Location_Name,l_hist,l_adv,l_nat,l_rel,l_outdoor,l_lat,l_lng\n\
                   Nowhere,0.4,0.3,0.1,0.7,1,96.0,79.8\n";

        assert!(LocationCatalog::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "Location_Name,l_hist,l_adv,l_nat,l_rel,l_lat,l_lng\n\
                   Galle Fort,0.9,0.1,0.2,0.8,6.0311,80.2170\n";

        assert!(LocationCatalog::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_outdoor_flag_rejected() {
        let csv = "Location_Name,l_hist,l_adv,l_nat,l_rel,l_outdoor,l_lat,l_lng\n\
                   Galle Fort,0.9,0.1,0.2,0.8,maybe,6.0311,80.2170\n";

        assert!(LocationCatalog::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let csv = "Location_Name,l_hist,l_adv,l_nat,l_rel,l_outdoor,l_lat,l_lng\n\
                   Galle Fort,0.9,0.1,0.2,0.8,1,6.0311,80.2170\n\
                   galle fort,0.1,0.1,0.1,0.1,0,6.0,80.0\n";
        let catalog = LocationCatalog::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("Galle Fort").unwrap().historical, 0.9);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let csv = "Location_Name,l_hist,l_adv,l_nat,l_rel,l_outdoor,l_lat,l_lng\n";
        assert!(LocationCatalog::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = LocationCatalog::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, EngineError::ArtifactUnavailable { .. }));
    }
}
