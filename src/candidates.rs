//! Candidate subset enumeration.
//!
//! The planner searches over every combination of instruments within the
//! configured transaction-count range. Enumeration order is fixed (sorted
//! names, sizes ascending, lexicographic within each size) so that ranking
//! ties resolve the same way on every run.

/// Every combination of `names` with size in `[min_count, max_count]`.
///
/// `max_count` is clamped to the number of names; a range that admits no
/// sizes yields an empty list.
pub fn subsets(names: &[String], min_count: usize, max_count: usize) -> Vec<Vec<String>> {
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort_unstable();

    let max_count = max_count.min(sorted.len());
    let mut out = Vec::new();
    for size in min_count.max(1)..=max_count {
        push_combinations(&sorted, size, &mut out);
    }
    out
}

/// Append all size-`size` combinations of `names` in lexicographic order.
fn push_combinations(names: &[&String], size: usize, out: &mut Vec<Vec<String>>) {
    let n = names.len();
    if size == 0 || size > n {
        return;
    }

    let mut idx: Vec<usize> = (0..size).collect();
    loop {
        out.push(idx.iter().map(|&i| names[i].clone()).collect());

        // Advance the rightmost index that still has room to move.
        let mut i = size - 1;
        while idx[i] == i + n - size {
            if i == 0 {
                return;
            }
            i -= 1;
        }
        idx[i] += 1;
        for j in i + 1..size {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
