use super::insertion::try_insertion_sort_by;
use std::cmp::Ordering;
use std::convert::Infallible;

/// Runs at or below this length are finished with insertion sort.
const INSERTION_THRESHOLD: usize = 16;

/// Stable sort with a custom comparator.
///
/// # Examples
///
/// ```
/// use sift_util::sort::stable_sort_by;
///
/// let mut arr = vec![("b", 1), ("a", 2), ("b", 0), ("a", 1)];
/// stable_sort_by(&mut arr, |x, y| x.0.cmp(y.0));
/// assert_eq!(arr, vec![("a", 2), ("a", 1), ("b", 1), ("b", 0)]);
/// ```
pub fn stable_sort_by<T, F>(arr: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let result: Result<(), Infallible> = try_stable_sort_by(arr, |a, b| Ok(compare(a, b)));
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Stable merge sort with a fallible comparator.
///
/// The slice is only rearranged once every comparison has succeeded; on
/// error it is left untouched.
pub fn try_stable_sort_by<T, E, F>(arr: &mut [T], mut compare: F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    if arr.len() < 2 {
        return Ok(());
    }
    let mut order: Vec<usize> = (0..arr.len()).collect();
    let mut scratch = order.clone();
    {
        let items: &[T] = arr;
        let mut by_index = |a: &usize, b: &usize| compare(&items[*a], &items[*b]);
        merge_sort(&mut order, &mut scratch, &mut by_index)?;
    }
    apply_permutation(arr, order);
    Ok(())
}

fn merge_sort<E, F>(v: &mut [usize], buf: &mut [usize], compare: &mut F) -> Result<(), E>
where
    F: FnMut(&usize, &usize) -> Result<Ordering, E>,
{
    let len = v.len();
    if len <= INSERTION_THRESHOLD {
        return try_insertion_sort_by(v, |a, b| compare(a, b));
    }
    let mid = len / 2;
    {
        let (left, right) = v.split_at_mut(mid);
        let (buf_left, buf_right) = buf.split_at_mut(mid);
        merge_sort(left, buf_left, compare)?;
        merge_sort(right, buf_right, compare)?;
    }

    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < mid && j < len {
        // Right side wins only when strictly smaller, which keeps equal
        // elements in input order.
        if compare(&v[j], &v[i])? == Ordering::Less {
            buf[k] = v[j];
            j += 1;
        } else {
            buf[k] = v[i];
            i += 1;
        }
        k += 1;
    }
    let rest_left = mid - i;
    buf[k..k + rest_left].copy_from_slice(&v[i..mid]);
    k += rest_left;
    buf[k..].copy_from_slice(&v[j..len]);
    v.copy_from_slice(&buf[..len]);
    Ok(())
}

/// Rearranges `arr` so that position `i` holds the element previously at
/// `order[i]`.
fn apply_permutation<T>(arr: &mut [T], mut order: Vec<usize>) {
    for start in 0..arr.len() {
        let mut current = start;
        loop {
            let next = order[current];
            order[current] = current;
            if next == start || next == current {
                break;
            }
            arr.swap(current, next);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_long_input() {
        let mut arr: Vec<i64> = (0..200).map(|i| (i * 7919) % 211).collect();
        let mut expected = arr.clone();
        expected.sort();
        stable_sort_by(&mut arr, |a, b| a.cmp(b));
        assert_eq!(arr, expected);
    }

    #[test]
    fn keeps_ties_in_input_order() {
        let mut arr: Vec<(u8, usize)> = (0..100).map(|i| ((i % 3) as u8, i)).collect();
        stable_sort_by(&mut arr, |a, b| a.0.cmp(&b.0));
        for pair in arr.windows(2) {
            assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
        }
    }

    #[test]
    fn tolerates_inconsistent_comparator() {
        let mut arr: Vec<u32> = (0..64).collect();
        let mut flip = false;
        stable_sort_by(&mut arr, |_, _| {
            flip = !flip;
            if flip { Ordering::Less } else { Ordering::Greater }
        });
        let mut seen = arr.clone();
        seen.sort();
        assert_eq!(seen, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn error_leaves_slice_untouched() {
        let mut arr: Vec<u32> = (0..40).rev().collect();
        let before = arr.clone();
        let mut calls = 0;
        let result = try_stable_sort_by(&mut arr, |a, b| {
            calls += 1;
            if calls > 50 { Err("stop") } else { Ok(a.cmp(b)) }
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(arr, before);
    }

    #[test]
    fn permutation_cycles() {
        let mut arr = vec!['a', 'b', 'c', 'd'];
        apply_permutation(&mut arr, vec![2, 0, 3, 1]);
        assert_eq!(arr, vec!['c', 'a', 'd', 'b']);
    }
}
