//! Static overlap tests
//!
//! All ranges are open: touching an edge exactly is not a hit.

use crate::renderer::LogicalPoint;
use crate::scene::targets::{DOOR_HEIGHT, DOOR_WIDTH, OFFICE_HALF_SIZE};

/// Does a disc at `center` straddle the curve height `height` at its x?
///
/// `height` is relative to `curve_origin`, as returned by the curve function.
pub fn disc_overlaps_curve(center: LogicalPoint, radius: f64, curve_origin: LogicalPoint, height: f64) -> bool {
    let bottom = center.y - radius - curve_origin.y;
    let top = center.y + radius - curve_origin.y;
    bottom < height && height < top
}

/// Is `p` inside the door standing on `door`?
pub fn point_in_door(p: LogicalPoint, door: LogicalPoint) -> bool {
    let half = DOOR_WIDTH / 2.0;
    door.x - half < p.x && p.x < door.x + half && door.y < p.y && p.y < door.y + DOOR_HEIGHT
}

/// Is `p` inside the office square centred on `office`?
pub fn point_in_office(p: LogicalPoint, office: LogicalPoint) -> bool {
    office.x - OFFICE_HALF_SIZE < p.x
        && p.x < office.x + OFFICE_HALF_SIZE
        && office.y - OFFICE_HALF_SIZE < p.y
        && p.y < office.y + OFFICE_HALF_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> LogicalPoint {
        LogicalPoint::new(x, y)
    }

    #[test]
    fn test_door_interior_and_edges() {
        let door = p(18.0, 0.0);
        assert!(point_in_door(p(18.0, 2.0), door));
        assert!(point_in_door(p(17.01, 0.01), door));
        assert!(point_in_door(p(18.99, 3.99), door));

        // Edges are exclusive
        assert!(!point_in_door(p(17.0, 2.0), door));
        assert!(!point_in_door(p(19.0, 2.0), door));
        assert!(!point_in_door(p(18.0, 0.0), door));
        assert!(!point_in_door(p(18.0, 4.0), door));
        // Below the door's base
        assert!(!point_in_door(p(18.0, -0.5), door));
    }

    #[test]
    fn test_office_interior_and_edges() {
        let office = p(7.0, -5.0);
        assert!(point_in_office(p(7.0, -5.0), office));
        assert!(point_in_office(p(7.99, -4.01), office));
        assert!(point_in_office(p(6.01, -5.99), office));

        assert!(!point_in_office(p(8.0, -5.0), office));
        assert!(!point_in_office(p(6.0, -5.0), office));
        assert!(!point_in_office(p(7.0, -4.0), office));
        assert!(!point_in_office(p(7.0, -6.0), office));
    }

    #[test]
    fn test_disc_straddles_curve() {
        let origin = p(0.0, 0.0);
        assert!(disc_overlaps_curve(p(0.0, 0.2), 0.5, origin, 0.0));
        assert!(disc_overlaps_curve(p(0.0, -0.2), 0.5, origin, 0.0));
        // Resting exactly on the surface does not count
        assert!(!disc_overlaps_curve(p(0.0, 0.5), 0.5, origin, 0.0));
        assert!(!disc_overlaps_curve(p(0.0, 3.0), 0.5, origin, 0.0));
        // Deeply buried discs fall through
        assert!(!disc_overlaps_curve(p(0.0, -3.0), 0.5, origin, 0.0));
    }
}
