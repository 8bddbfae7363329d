//! Static metadata describing logistical properties of the built-in circuits.
//!
//! Each circuit is assigned to a continent and flagged for whether it can be
//! reasonably accessed by sea transport. Coordinates are used to derive a
//! geographic distance matrix when no matrix file is supplied, and by the map
//! renderer.

use serde::{Deserialize, Serialize};

/// Reference data for a single venue. Created once at startup, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Unique name, acts as the label key everywhere else
    pub name: String,
    /// Continent used by mode-eligibility rules
    pub continent: String,
    /// Whether sea transport is a realistic option
    pub coastal: bool,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Circuit {
    pub fn new(name: &str, continent: &str, coastal: bool, lat: f64, lon: f64) -> Self {
        Circuit {
            name: name.to_string(),
            continent: continent.to_string(),
            coastal,
            lat,
            lon,
        }
    }
}

/// The built-in venue season.
pub fn builtin_circuits() -> Vec<Circuit> {
    vec![
        // Europe
        Circuit::new("Autodromo Enzo e Dino Ferrari", "Europe", false, 44.3439, 11.7167),
        Circuit::new("Circuit de Monaco", "Europe", true, 43.7347, 7.4206),
        Circuit::new("Circuit de Barcelona-Catalunya", "Europe", true, 41.5700, 2.2611),
        Circuit::new("Red Bull Ring", "Europe", false, 47.2197, 14.7647),
        Circuit::new("Silverstone Circuit", "Europe", false, 52.0786, -1.0169),
        Circuit::new("Circuit de Spa-Francorchamps", "Europe", false, 50.4372, 5.9714),
        Circuit::new("Hungaroring", "Europe", false, 47.5789, 19.2486),
        Circuit::new("Circuit Park Zandvoort", "Europe", true, 52.3889, 4.5409),
        Circuit::new("Autodromo Nazionale Monza", "Europe", false, 45.6156, 9.2811),
        // Asia
        Circuit::new("Shanghai International Circuit", "Asia", true, 31.3389, 121.2197),
        Circuit::new("Suzuka International Racing Course", "Asia", false, 34.8431, 136.5419),
        Circuit::new("Bahrain International Circuit", "Asia", true, 26.0325, 50.5106),
        Circuit::new("Jeddah Corniche Circuit", "Asia", true, 21.6319, 39.1044),
        Circuit::new("Marina Bay Street Circuit", "Asia", true, 1.2914, 103.8644),
        Circuit::new("Losail International Circuit", "Asia", true, 25.4900, 51.4542),
        Circuit::new("Yas Marina Circuit", "Asia", true, 24.4672, 54.6031),
        // The Caspian Sea can't reasonably be considered coastal for our purposes
        Circuit::new("Baku City Circuit", "Asia", false, 40.3725, 49.8533),
        // North America
        Circuit::new("Miami International Autodrome", "North America", true, 25.9581, -80.2389),
        Circuit::new("Circuit Gilles-Villeneuve", "North America", true, 45.5006, -73.5228),
        Circuit::new("Circuit of The Americas (COTA)", "North America", false, 30.1328, -97.6411),
        Circuit::new("Autodromo Hermanos Rodriguez", "North America", false, 19.4042, -99.0907),
        Circuit::new("Las Vegas Strip Circuit", "North America", false, 36.1147, -115.1728),
        // South America
        Circuit::new("Interlagos (Autodromo Jose Carlos Pace)", "South America", true, -23.7036, -46.6997),
        // Oceania
        Circuit::new("Albert Park Circuit", "Oceania", true, -37.8497, 144.9680),
    ]
}

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two (lat, lon) pairs.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_circuits_unique_names() {
        let circuits = builtin_circuits();
        let mut names: Vec<&str> = circuits.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), circuits.len());
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert!(haversine_km(43.7347, 7.4206, 43.7347, 7.4206).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_monaco_barcelona() {
        // Monaco -> Barcelona-Catalunya is roughly 480 km as the crow flies
        let d = haversine_km(43.7347, 7.4206, 41.5700, 2.2611);
        assert!(d > 400.0 && d < 550.0, "unexpected distance {d}");
    }

    #[test]
    fn test_haversine_symmetric() {
        let d1 = haversine_km(52.0786, -1.0169, -37.8497, 144.9680);
        let d2 = haversine_km(-37.8497, 144.9680, 52.0786, -1.0169);
        assert!((d1 - d2).abs() < 1e-9);
    }
}
