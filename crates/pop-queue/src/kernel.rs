//! Sift kernels — the heap-restoring loops behind `push` and `pop`.
//!
//! # Contract
//!
//! A kernel operates on two index-aligned slices whose common length is the
//! current heap size.  It may only swap `payloads[i] <-> payloads[j]` together
//! with `priorities[i] <-> priorities[j]`.
//!
//! - **sift-up**: while the entry has a parent with a strictly larger
//!   priority, swap with the parent.  Equal priorities stop the loop.
//! - **sift-down**: pick the smallest of {entry, left child, right child};
//!   a child only wins when strictly smaller than everything compared before
//!   it (entry first, then left, then right).  Swap and repeat until the
//!   entry is the smallest.
//!
//! Every implementation must produce the same sequence of swaps for the same
//! input.  `tests/heap_properties.rs` checks this for the two kernels below.

use std::ptr;

use crate::Payload;

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Strategy for executing the sift loops over raw heap storage.
///
/// Kernels are zero-sized marker types; the queue never holds an instance.
pub trait SiftKernel<P: Payload> {
    /// Short name for logs and benchmark labels.
    const NAME: &'static str;

    /// Restore the heap property upward from `index`.
    fn sift_up(payloads: &mut [P], priorities: &mut [u32], index: usize);

    /// Restore the heap property downward from `index`.
    fn sift_down(payloads: &mut [P], priorities: &mut [u32], index: usize);
}

#[inline(always)]
fn parent_of(index: usize) -> usize {
    (index - 1) >> 1
}

#[inline(always)]
fn left_child_of(index: usize) -> usize {
    (index << 1) + 1
}

// ── PortableKernel ────────────────────────────────────────────────────────────

/// Bounds-checked kernel written against the safe slice API.
///
/// The reference behavior.  Out-of-range indices panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableKernel;

impl<P: Payload> SiftKernel<P> for PortableKernel {
    const NAME: &'static str = "portable";

    fn sift_up(payloads: &mut [P], priorities: &mut [u32], mut index: usize) {
        while index > 0 {
            let parent = parent_of(index);
            if priorities[index] < priorities[parent] {
                payloads.swap(index, parent);
                priorities.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(payloads: &mut [P], priorities: &mut [u32], mut index: usize) {
        let size = priorities.len();
        loop {
            let left = left_child_of(index);
            let right = left + 1;
            let mut smallest = index;

            if left < size && priorities[left] < priorities[smallest] {
                smallest = left;
            }
            if right < size && priorities[right] < priorities[smallest] {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            payloads.swap(index, smallest);
            priorities.swap(index, smallest);
            index = smallest;
        }
    }
}

// ── NativeKernel ──────────────────────────────────────────────────────────────

/// Unchecked kernel for the bulk-insert hot path.
///
/// Monomorphized per payload width and inlined into `push`/`pop`, with every
/// bounds check removed from the loop body.  The heap size is taken as the
/// shorter of the two slices and an out-of-range starting index is a no-op,
/// so the unchecked accesses below can never leave the allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeKernel;

impl<P: Payload> SiftKernel<P> for NativeKernel {
    const NAME: &'static str = "native";

    #[inline(always)]
    fn sift_up(payloads: &mut [P], priorities: &mut [u32], mut index: usize) {
        let size = payloads.len().min(priorities.len());
        if index >= size {
            return;
        }
        let pays = payloads.as_mut_ptr();
        let pris = priorities.as_mut_ptr();

        // SAFETY: `index < size` on entry and `parent < index` on every
        // iteration, so all offsets stay below `size`, which is in bounds for
        // both slices.  `parent != index`, so each swap is between distinct
        // elements.
        unsafe {
            while index > 0 {
                let parent = parent_of(index);
                if *pris.add(index) < *pris.add(parent) {
                    ptr::swap(pays.add(index), pays.add(parent));
                    ptr::swap(pris.add(index), pris.add(parent));
                    index = parent;
                } else {
                    break;
                }
            }
        }
    }

    #[inline(always)]
    fn sift_down(payloads: &mut [P], priorities: &mut [u32], mut index: usize) {
        let size = payloads.len().min(priorities.len());
        if index >= size {
            return;
        }
        let pays = payloads.as_mut_ptr();
        let pris = priorities.as_mut_ptr();

        // SAFETY: `index < size` holds on entry and is preserved because
        // `index` only ever moves to `smallest`, which is either `index` or a
        // child that passed its `< size` check.  Children are read only after
        // their bounds check.
        unsafe {
            loop {
                let left = left_child_of(index);
                let right = left + 1;
                let mut smallest = index;

                if left < size && *pris.add(left) < *pris.add(smallest) {
                    smallest = left;
                }
                if right < size && *pris.add(right) < *pris.add(smallest) {
                    smallest = right;
                }

                if smallest == index {
                    break;
                }

                ptr::swap(pays.add(index), pays.add(smallest));
                ptr::swap(pris.add(index), pris.add(smallest));
                index = smallest;
            }
        }
    }
}
