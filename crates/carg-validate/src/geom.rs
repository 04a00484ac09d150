//! Planar primitives used by the checks.

use carg_model::Coord;

/// Twice the signed area of a ring (shoelace). Positive means counter-clockwise.
pub fn signed_area2(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

pub fn is_closed(ring: &[Coord]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => ring.len() > 1 && first == last,
        _ => false,
    }
}

/// Drops consecutive repeated vertices.
pub fn dedup_consecutive(points: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(points.len());
    for point in points {
        if out.last() != Some(point) {
            out.push(*point);
        }
    }
    out
}

fn cross(o: Coord, a: Coord, b: Coord) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(p: Coord, q: Coord, r: Coord) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether segments `p1-p2` and `q1-q2` share at least one point.
pub fn segments_intersect(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> bool {
    let d1 = sign(cross(q1, q2, p1));
    let d2 = sign(cross(q1, q2, p2));
    let d3 = sign(cross(p1, p2, q1));
    let d4 = sign(cross(p1, p2, q2));

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && on_segment(q1, p1, q2))
        || (d2 == 0 && on_segment(q1, p2, q2))
        || (d3 == 0 && on_segment(p1, q1, p2))
        || (d4 == 0 && on_segment(p1, q2, p2))
}

/// First pair of non-adjacent segments that touch, as segment indices.
///
/// With `closed`, the path is a ring and its first and last segments are adjacent.
pub fn first_self_intersection(points: &[Coord], closed: bool) -> Option<(usize, usize)> {
    let segments = points.len().checked_sub(1)?;
    for i in 0..segments {
        for j in (i + 2)..segments {
            if closed && i == 0 && j == segments - 1 {
                continue;
            }
            if segments_intersect(points[i], points[i + 1], points[j], points[j + 1]) {
                return Some((i, j));
            }
        }
    }
    None
}
