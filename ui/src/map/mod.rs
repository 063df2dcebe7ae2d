pub mod maplibre;

pub use maplibre::MapLibreEngine;

/// Element id the map renders into.
pub const MAP_CONTAINER: &str = "map";
