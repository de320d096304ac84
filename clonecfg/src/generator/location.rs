//! Coordinates that land on one of the major landmasses.

use rand::Rng;

/// Latitude/longitude bounding box of a landmass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmass {
    pub name: &'static str,
    pub lat: (f64, f64),
    pub lon: (f64, f64),
}

impl Landmass {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat.0..=self.lat.1).contains(&lat) && (self.lon.0..=self.lon.1).contains(&lon)
    }
}

pub const LANDMASSES: &[Landmass] = &[
    Landmass {
        name: "Americas",
        lat: (-56.0, 72.0),
        lon: (-168.0, -34.0),
    },
    Landmass {
        name: "Europe",
        lat: (36.0, 71.0),
        lon: (-25.0, 45.0),
    },
    Landmass {
        name: "Asia",
        lat: (-11.0, 82.0),
        lon: (25.0, 180.0),
    },
    Landmass {
        name: "Australia",
        lat: (-44.0, -10.0),
        lon: (112.0, 154.0),
    },
];

fn uniform<R: Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    min + rng.r#gen::<f64>() * (max - min)
}

/// Pick a landmass uniformly and sample a point inside it.
pub fn random_coordinates<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let area = &LANDMASSES[rng.gen_range(0..LANDMASSES.len())];
    let lat = uniform(rng, area.lat);
    let lon = uniform(rng, area.lon);
    (lat, lon)
}

/// `"lat,lon"` with six decimals each.
pub fn format_location(lat: f64, lon: f64) -> String {
    format!("{lat:.6},{lon:.6}")
}

/// Random on-land location formatted as `"lat,lon"`.
pub fn generate_realistic_location<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (lat, lon) = random_coordinates(rng);
    format_location(lat, lon)
}

/// Split a `"lat,lon"` string into its two numbers.
pub fn parse_location(location: &str) -> Option<(f64, f64)> {
    let (lat, lon) = location.split_once(',')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}
