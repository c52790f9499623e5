//! Small list helpers used when combining layers of names.

/// Remove repeated items from `items`, keeping each first occurrence.
///
/// Returns one copy of every value that appeared more than once, in the order
/// its first repetition was met.
///
/// # Examples
///
/// ```
/// use kard::util::dedup_in_place;
///
/// let mut names = vec!["web", "db", "web", "cache", "db", "web"];
/// let duplicates = dedup_in_place(&mut names);
/// assert_eq!(names, ["web", "db", "cache"]);
/// assert_eq!(duplicates, ["web", "db"]);
/// ```
pub fn dedup_in_place<T: PartialEq + Clone>(items: &mut Vec<T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut duplicates: Vec<T> = Vec::new();

    for item in items.drain(..) {
        if kept.contains(&item) {
            if !duplicates.contains(&item) {
                duplicates.push(item);
            }
        } else {
            kept.push(item);
        }
    }

    *items = kept;
    duplicates
}

/// Add the items of `source` missing from `dest`.
///
/// With `insert`, missing items go to the front of `dest` in their `source`
/// order; otherwise they are appended.
///
/// # Examples
///
/// ```
/// use kard::util::merge_lists;
///
/// let mut dest = vec![2, 3];
/// merge_lists(&[1, 2, 4], &mut dest, true);
/// assert_eq!(dest, [1, 4, 2, 3]);
///
/// let mut dest = vec![2, 3];
/// merge_lists(&[1, 2, 4], &mut dest, false);
/// assert_eq!(dest, [2, 3, 1, 4]);
/// ```
pub fn merge_lists<T: PartialEq + Clone>(source: &[T], dest: &mut Vec<T>, insert: bool) {
    if insert {
        for item in source.iter().rev() {
            if !dest.contains(item) {
                dest.insert(0, item.clone());
            }
        }
    } else {
        for item in source {
            if !dest.contains(item) {
                dest.push(item.clone());
            }
        }
    }
}
