/// Compute the Levenshtein distance between `a` and `b`.
///
/// Insertions, deletions and substitutions each cost one. Works on any characters, so it
/// is used on amino-acid prefixes as well as nucleotides. Runs in O(len(a) * len(b)) time
/// and keeps only two rows of the DP matrix.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    edit_distance_by(&a, &b)
}

/// Levenshtein distance over arbitrary comparable items.
pub fn edit_distance_by<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];

    for (i, x) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}
