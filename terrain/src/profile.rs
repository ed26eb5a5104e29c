use crate::{
    math::{distance_km, linspace},
    BatchedElevation, ElevationSource, TerrainError,
};
use geo::geometry::Coord;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Total distance from `start` to `end` in meters.
    pub distance_m: f64,

    /// Distance of each step from `start` (meters).
    pub distances_m: Vec<f64>,

    /// Location of each step along the straight (lat, lon) line from
    /// `start` to `end`.
    pub points: Vec<Coord<f64>>,

    /// Elevation at each step from `start` to `end`.
    pub terrain_elev_m: Vec<f64>,

    /// Where the elevation samples came from.
    pub source: String,
}

impl Profile {
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder {
            start: None,
            end: None,
            steps: None,
        }
    }

    /// Number of samples in this profile (`steps + 1`).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub struct ProfileBuilder {
    start: Option<Coord<f64>>,

    end: Option<Coord<f64>>,

    /// Number of intervals between `start` and `end`.
    steps: Option<usize>,
}

impl ProfileBuilder {
    /// Start point of the path (required).
    #[must_use]
    pub fn start(mut self, coord: Coord<f64>) -> Self {
        self.start = Some(coord);
        self
    }

    /// End point of the path (required).
    #[must_use]
    pub fn end(mut self, coord: Coord<f64>) -> Self {
        self.end = Some(coord);
        self
    }

    /// Number of intervals between start and end (required, at least
    /// 1).
    #[must_use]
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn build<S>(&self, elevation: &BatchedElevation<S>) -> Result<Profile, TerrainError>
    where
        S: ElevationSource,
    {
        if let (Some(start), Some(end), Some(steps)) = (self.start, self.end, self.steps) {
            let steps = steps.max(1);
            let len = steps + 1;

            let distance_m = distance_km(start, end) * 1000.0;

            let (points, path_runtime) = {
                let now = std::time::Instant::now();
                let points: Vec<Coord<f64>> = linspace(start.x, end.x, len)
                    .zip(linspace(start.y, end.y, len))
                    .map(|(x, y)| Coord { x, y })
                    .collect();
                (points, now.elapsed())
            };

            let distances_m = linspace(0.0, distance_m, len).collect();

            let (elevations, terrain_runtime) = {
                let now = std::time::Instant::now();
                let elevations = elevation.lookup(&points);
                (elevations, now.elapsed())
            };

            debug!(
                "profile; len: {}, path_exec: {:?}, terrain_exec: {:?}, source: {}",
                points.len(),
                path_runtime,
                terrain_runtime,
                elevations.source
            );

            Ok(Profile {
                distance_m,
                distances_m,
                points,
                terrain_elev_m: elevations.elevations_m,
                source: elevations.source,
            })
        } else {
            Err(TerrainError::Builder)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, Profile};
    use crate::{BatchedElevation, ElevationSource, FlatTerrain, TerrainError};
    use approx::assert_relative_eq;

    /// A ridge 300 m tall between longitudes -71.29 and -71.28.
    struct Ridge;

    impl ElevationSource for Ridge {
        fn name(&self) -> &str {
            "ridge"
        }

        fn elevations(&self, coords: &[Coord<f64>]) -> Result<Vec<f64>, TerrainError> {
            Ok(coords
                .iter()
                .map(|c| {
                    if (-71.29..=-71.28).contains(&c.x) {
                        300.0
                    } else {
                        100.0
                    }
                })
                .collect())
        }
    }

    const START: Coord = Coord {
        x: -71.30830716441369,
        y: 44.28309806603165,
    };

    const END: Coord = Coord {
        x: -71.2672073283768,
        y: 44.25628098424278,
    };

    #[test]
    fn test_profile() {
        let elevation = BatchedElevation::new(FlatTerrain);
        let profile = Profile::builder()
            .start(START)
            .end(END)
            .steps(128)
            .build(&elevation)
            .unwrap();
        assert_eq!(profile.len(), 129);
        assert_eq!(profile.distances_m.len(), 129);
        assert_eq!(profile.terrain_elev_m, vec![0.0; 129]);
        assert_eq!(profile.source, "flat");
        assert_eq!(profile.points[0], START);
        assert_eq!(profile.points[128], END);
        assert_eq!(profile.distances_m[0], 0.0);
        assert_relative_eq!(profile.distances_m[128], profile.distance_m);
        assert_relative_eq!(profile.distance_m, 4_427.29, epsilon = 0.01);
    }

    #[test]
    fn test_profile_terrain() {
        let elevation = BatchedElevation::new(Ridge);
        let profile = Profile::builder()
            .start(START)
            .end(END)
            .steps(16)
            .build(&elevation)
            .unwrap();
        assert_eq!(profile.source, "ridge");
        assert_eq!(profile.terrain_elev_m[0], 100.0);
        assert_eq!(profile.terrain_elev_m[16], 100.0);
        assert!(profile.terrain_elev_m.iter().any(|elev| *elev == 300.0));
    }

    #[test]
    fn test_zero_steps_is_one_interval() {
        let elevation = BatchedElevation::new(FlatTerrain);
        let profile = Profile::builder()
            .start(START)
            .end(START)
            .steps(0)
            .build(&elevation)
            .unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile.distance_m, 0.0);
    }

    #[test]
    fn test_missing_params() {
        let elevation = BatchedElevation::new(FlatTerrain);
        assert!(matches!(
            Profile::builder().start(START).build(&elevation),
            Err(TerrainError::Builder)
        ));
    }
}
