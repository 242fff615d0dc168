//! Planar distance and walking-time helpers.

use super::Location;

/// Walking speed in metres per minute (about 4 km/h).
pub const WALKING_SPEED: f64 = 66.7;

/// Euclidean distance between two locations' planar positions.
pub fn euclidean(a: &Location, b: &Location) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Walking time between two locations, truncated to whole minutes.
pub fn walking_time(a: &Location, b: &Location) -> u32 {
    (euclidean(a, b) / WALKING_SPEED) as u32
}

/// Whether `p` lies within `radius` of `a` or of `b`.
///
/// Used to decide which locations are "near" a route interval.
pub fn near_either(p: &Location, a: &Location, b: &Location, radius: f64) -> bool {
    euclidean(p, a) <= radius || euclidean(p, b) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        let a = Location::new(0, 0.0, 0.0);
        let b = Location::new(1, 3.0, 4.0);
        assert!((euclidean(&a, &b) - 5.0).abs() < 1e-12);
        assert!((euclidean(&b, &a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_walking_time_truncates() {
        let a = Location::new(0, 0.0, 0.0);
        assert_eq!(walking_time(&a, &Location::new(1, 66.0, 0.0)), 0);
        assert_eq!(walking_time(&a, &Location::new(1, 66.7, 0.0)), 1);
        assert_eq!(walking_time(&a, &Location::new(1, 700.0, 0.0)), 10);
    }

    #[test]
    fn test_near_either() {
        let a = Location::new(0, 0.0, 0.0);
        let b = Location::new(1, 100.0, 0.0);
        assert!(near_either(&Location::new(2, 50.0, 80.0), &a, &b, 100.0));
        assert!(!near_either(&Location::new(3, 50.0, 200.0), &a, &b, 100.0));
    }
}
