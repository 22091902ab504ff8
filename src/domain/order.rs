//! Natural ordering of dotted criterion ids ("1.2" before "1.10").

use std::cmp::Ordering;

/// Separator between id segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// Compare two dotted ids segment by segment.
///
/// Segments that both parse as unsigned integers compare numerically, two textual
/// segments compare case-insensitively. When every shared segment is equal the shorter id
/// sorts first, so a parent always precedes its children. Remaining ties (`"01"` vs
/// `"1"`, `"A"` vs `"a"`) fall back to byte order, which keeps the order total.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    let mut left = a.split(SEGMENT_SEPARATOR);
    let mut right = b.split(SEGMENT_SEPARATOR);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = compare_segments(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

// A numeric segment sorts before a textual one; mixing the two comparisons
// directly would break transitivity ("2" < "10" < "1a" < "2").
fn compare_segments(l: &str, r: &str) -> Ordering {
    let (l, r) = (l.trim(), r.trim());
    match (l.parse::<u64>(), r.parse::<u64>()) {
        (Ok(ln), Ok(rn)) => ln.cmp(&rn),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => l.to_lowercase().cmp(&r.to_lowercase()),
    }
}

/// Id of the parent criterion: the id with its last segment removed.
///
/// Returns `None` for single-segment ids.
pub fn parent_id(id: &str) -> Option<&str> {
    id.rsplit_once(SEGMENT_SEPARATOR).map(|(parent, _)| parent)
}

/// Number of segments in a dotted id.
pub fn depth(id: &str) -> usize {
    id.split(SEGMENT_SEPARATOR).count()
}
