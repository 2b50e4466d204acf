//! An in-place iterative quicksort over descriptors into a container's
//! packed byte buffer, used to locally sort one container's entries at
//! emission time (see `emit.rs`).
//!
//! The header this was extracted from declared a `tuned_qsort` but
//! never shipped its definition. This is an in-place iterative
//! quicksort with median-of-three pivot selection and an insertion-sort
//! cutover for small ranges, matching the documented contract:
//! comparison is unsigned-byte lexicographic on the common prefix,
//! tie-broken by length ascending. Stability is not required — equal
//! payload and equal length mean identical strings, so stability is
//! vacuous here.

use std::cmp::Ordering;

/// A pointer into a container's packed region: byte offset and length
/// of one entry's payload.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub offset: usize,
    pub len: usize,
}

const INSERTION_SORT_CUTOVER: usize = 16;

fn cmp_entries(a: Descriptor, b: Descriptor, packed: &[u8]) -> Ordering {
    let common = a.len.min(b.len);
    let a_bytes = &packed[a.offset..a.offset + common];
    let b_bytes = &packed[b.offset..b.offset + common];

    match a_bytes.cmp(b_bytes) {
        Ordering::Equal => a.len.cmp(&b.len),
        ord => ord,
    }
}

/// Sort `descriptors` in place by the bytes they point to in `packed`.
pub fn tuned_qsort(descriptors: &mut [Descriptor], packed: &[u8]) {
    if descriptors.len() < 2 {
        return;
    }

    let mut stack = vec![(0usize, descriptors.len() - 1)];

    while let Some((lo, hi)) = stack.pop() {
        if lo >= hi {
            continue;
        }

        if hi - lo + 1 <= INSERTION_SORT_CUTOVER {
            insertion_sort(descriptors, lo, hi, packed);
            continue;
        }

        let pivot_index = median_of_three(descriptors, lo, hi, packed);
        descriptors.swap(pivot_index, hi);
        let pivot = descriptors[hi];

        let mut store = lo;
        for i in lo..hi {
            if cmp_entries(descriptors[i], pivot, packed) == Ordering::Less {
                descriptors.swap(i, store);
                store += 1;
            }
        }
        descriptors.swap(store, hi);

        if store > lo {
            stack.push((lo, store - 1));
        }
        stack.push((store + 1, hi));
    }
}

fn median_of_three(descriptors: &[Descriptor], lo: usize, hi: usize, packed: &[u8]) -> usize {
    let mid = lo + (hi - lo) / 2;

    let (a, b, c) = (descriptors[lo], descriptors[mid], descriptors[hi]);

    if cmp_entries(a, b, packed) == Ordering::Less {
        if cmp_entries(b, c, packed) == Ordering::Less {
            mid
        } else if cmp_entries(a, c, packed) == Ordering::Less {
            hi
        } else {
            lo
        }
    } else if cmp_entries(a, c, packed) == Ordering::Less {
        lo
    } else if cmp_entries(b, c, packed) == Ordering::Less {
        hi
    } else {
        mid
    }
}

fn insertion_sort(descriptors: &mut [Descriptor], lo: usize, hi: usize, packed: &[u8]) {
    for i in (lo + 1)..=hi {
        let mut j = i;
        while j > lo && cmp_entries(descriptors[j - 1], descriptors[j], packed) == Ordering::Greater {
            descriptors.swap(j - 1, j);
            j -= 1;
        }
    }
}
