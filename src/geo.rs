use geographiclib_rs::{Geodesic, InverseGeodesic};

/// A reference ellipsoid, named the way PROJ's `ellps` parameter names it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    pub name: &'static str,
    /// Semi-major axis in meters
    pub a: f64,
    /// Flattening
    pub f: f64,
}

impl Ellipsoid {
    /// Clarke 1866, a = 6378206.4 m, b = 6356583.8 m.
    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        name: "clrk66",
        a: 6_378_206.4,
        f: 1.0 - 6_356_583.8 / 6_378_206.4,
    };

    pub const WGS84: Ellipsoid = Ellipsoid {
        name: "WGS84",
        a: 6_378_137.0,
        f: 1.0 / 298.257223563,
    };

    pub const GRS80: Ellipsoid = Ellipsoid {
        name: "GRS80",
        a: 6_378_137.0,
        f: 1.0 / 298.257222101,
    };

    const ALL: [Ellipsoid; 3] = [Self::CLARKE_1866, Self::WGS84, Self::GRS80];

    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Clap value parser for `--ellps`.
    pub fn parse_arg(name: &str) -> Result<Self, String> {
        Self::by_name(name).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|e| e.name).collect();
            format!("unknown ellipsoid {:?}, possible options are: {}", name, known.join(", "))
        })
    }

    fn geodesic(&self) -> Geodesic {
        Geodesic::new(self.a, self.f)
    }
}

/// Geodesic distance on `ellipsoid` by solving the inverse problem.
/// Input lon/lat in degrees. Output in meters, azimuths are dropped.
///
/// Coordinates are not range-checked; out-of-range latitudes give whatever the
/// solver gives, usually `NaN`.
pub fn inverse_distance(ellipsoid: &Ellipsoid, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (s12, _azi1, _azi2, _a12): (f64, f64, f64, f64) =
        ellipsoid.geodesic().inverse(lat1, lon1, lat2, lon2);
    s12
}
