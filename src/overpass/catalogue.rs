//! Amenity type dictionary
//!
//! Maps the type names callers use (the UI speaks Portuguese) to Overpass tag
//! filters. Built once at startup and shared read-only.

use std::collections::HashMap;

use tracing::debug;

use super::TagFilter;

const DEFAULT_ENTRIES: [(&str, &str, &str); 12] = [
    ("Escolas", "amenity", "school"),
    ("Universidades", "amenity", "university"),
    ("Hospitais", "amenity", "hospital"),
    ("Farmácias", "amenity", "pharmacy"),
    ("Restaurantes", "amenity", "restaurant"),
    ("Cafés", "amenity", "cafe"),
    ("Bancos", "amenity", "bank"),
    ("Supermercados", "shop", "supermarket"),
    ("Parques", "leisure", "park"),
    ("Ginásios", "leisure", "fitness_centre"),
    ("Estacionamento", "amenity", "parking"),
    ("Paragens", "highway", "bus_stop"),
];

#[derive(Debug, Clone)]
pub struct AmenityCatalogue {
    entries: HashMap<String, TagFilter>,
}

impl Default for AmenityCatalogue {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_ENTRIES
                .iter()
                .map(|(name, key, value)| (name.to_string(), TagFilter::key_value(*key, *value))),
        )
    }
}

impl AmenityCatalogue {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, TagFilter)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, filter)| (normalize(&name), filter))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, type_name: &str) -> Option<&TagFilter> {
        self.entries.get(&normalize(type_name))
    }

    /// Translate requested type names into filters.
    ///
    /// Unknown names are dropped. Order follows the request, duplicates collapse.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Vec<TagFilter> {
        let mut filters: Vec<TagFilter> = Vec::new();
        for name in requested {
            match self.lookup(name.as_ref()) {
                Some(filter) if !filters.contains(filter) => filters.push(filter.clone()),
                Some(_) => {}
                None => debug!("Dropping unsupported amenity type '{}'", name.as_ref()),
            }
        }
        filters
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
