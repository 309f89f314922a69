use std::cmp::Ordering;

/// Compares two version strings segment by segment.
///
/// Both `.` and `-` act as separators, so "11-13-4" compares equal to
/// "11.13.4". Segments are compared numerically up to the longer segment
/// count; a missing trailing segment counts as 0, which makes "2.0" equal
/// to "2.0.0". Non-numeric segments also count as 0 so that the order
/// stays total and sorting stays stable.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }

    Ordering::Equal
}

fn segments(version: &str) -> Vec<u64> {
    version
        .split(['.', '-'])
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

/// Returns a sorted copy of `versions`; the input is left untouched.
///
/// The sort is stable. `descending` flips the comparator so the newest
/// version comes first.
pub fn sort_versions(versions: &[String], descending: bool) -> Vec<String> {
    let mut sorted = versions.to_vec();
    sorted.sort_by(|a, b| {
        let order = compare_versions(a, b);
        if descending { order.reverse() } else { order }
    });
    sorted
}
