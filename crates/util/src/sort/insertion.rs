use std::cmp::Ordering;

/// Insertion sort with a custom comparator.
///
/// Stable; elements only move past neighbours that compare `Greater`.
///
/// # Examples
///
/// ```
/// use sift_util::sort::insertion_sort_by;
///
/// let mut arr = vec![3, 1, 4, 1, 5];
/// insertion_sort_by(&mut arr, |a, b| b.cmp(a)); // Descending order
/// assert_eq!(arr, vec![5, 4, 3, 1, 1]);
/// ```
pub fn insertion_sort_by<T, F>(arr: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = arr.len();
    for i in 1..len {
        let mut j = i;
        while j > 0 && compare(&arr[j - 1], &arr[j]) == Ordering::Greater {
            arr.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Insertion sort with a fallible comparator. Stops at the first error,
/// leaving the slice partially sorted.
pub fn try_insertion_sort_by<T, E, F>(arr: &mut [T], mut compare: F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let len = arr.len();
    for i in 1..len {
        let mut j = i;
        while j > 0 && compare(&arr[j - 1], &arr[j])? == Ordering::Greater {
            arr.swap(j - 1, j);
            j -= 1;
        }
    }
    Ok(())
}
