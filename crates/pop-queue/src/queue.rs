//! `PriorityQueue` — fixed-capacity SoA min-heap.
//!
//! # Why a custom heap
//!
//! `std::collections::BinaryHeap` stores one composite element per entry and
//! grows on demand.  Population initialization knows its size up front and
//! inserts tens of millions of `(agent, day)` pairs in one tight loop, so the
//! queue here:
//!
//! - allocates both arrays exactly once, to the caller-supplied capacity,
//! - keeps payloads and priorities in separate contiguous arrays so the sift
//!   loops only touch the 4-byte priority keys when comparing,
//! - reports "full" and "empty" as ordinary `Result`s instead of growing or
//!   returning `Option`.
//!
//! # Ties
//!
//! Equal priorities are not ordered relative to each other.  Sift-up stops at
//! a parent with an equal key, and sift-down only moves past strictly smaller
//! children, so which of several equal entries surfaces first depends on the
//! insertion and removal history.

use std::fmt;
use std::marker::PhantomData;

use crate::{NativeKernel, Payload, PortableKernel, QueueError, QueueResult, SiftKernel};

/// Fixed-capacity min-heap over `(payload, u32 priority)` pairs.
///
/// `P` selects the payload width; `K` selects the sift kernel.
pub struct PriorityQueue<P: Payload = u32, K: SiftKernel<P> = PortableKernel> {
    payloads:   Box<[P]>,
    priorities: Box<[u32]>,
    /// Number of live entries; `payloads[size..]` is stale.
    size:       usize,
    kernel:     PhantomData<K>,
}

/// A queue driven by the bounds-checked [`PortableKernel`].
pub type PortableQueue<P = u32> = PriorityQueue<P, PortableKernel>;

/// A queue driven by the unchecked [`NativeKernel`].
pub type NativeQueue<P = u32> = PriorityQueue<P, NativeKernel>;

impl<P: Payload, K: SiftKernel<P>> PriorityQueue<P, K> {
    /// Allocate an empty queue able to hold exactly `capacity` entries.
    ///
    /// Both arrays are zero-initialized.  A capacity of 0 is allowed; such a
    /// queue is simultaneously full and empty.
    pub fn new(capacity: usize) -> Self {
        Self {
            payloads:   vec![P::default(); capacity].into_boxed_slice(),
            priorities: vec![0u32; capacity].into_boxed_slice(),
            size:       0,
            kernel:     PhantomData,
        }
    }

    /// Maximum number of entries, fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.priorities.len()
    }

    /// Number of entries currently in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    /// Insert `payload` with `priority`.
    ///
    /// Fails with [`QueueError::CapacityExceeded`] when the queue already
    /// holds `capacity` entries; the queue is untouched in that case.
    pub fn push(&mut self, payload: P, priority: u32) -> QueueResult<()> {
        let index = self.size;
        if index >= self.capacity() {
            return Err(QueueError::CapacityExceeded { capacity: self.capacity() });
        }

        self.payloads[index] = payload;
        self.priorities[index] = priority;
        K::sift_up(
            &mut self.payloads[..=index],
            &mut self.priorities[..=index],
            index,
        );
        self.size += 1;
        Ok(())
    }

    /// The entry with the smallest priority, without removing it.
    ///
    /// Among several minimal entries this is always the one at the root, so
    /// repeated calls return the same pair.
    #[inline]
    pub fn peek(&self) -> QueueResult<(P, u32)> {
        if self.size == 0 {
            return Err(QueueError::EmptyQueue);
        }
        Ok((self.payloads[0], self.priorities[0]))
    }

    /// Remove and return the entry with the smallest priority.
    pub fn pop(&mut self) -> QueueResult<(P, u32)> {
        let root = self.peek()?;

        self.size -= 1;
        let last = self.size;
        if last > 0 {
            self.payloads[0] = self.payloads[last];
            self.priorities[0] = self.priorities[last];
            K::sift_down(&mut self.payloads[..last], &mut self.priorities[..last], 0);
        }
        Ok(root)
    }

    /// Live payloads in heap order (index-aligned with [`priorities`](Self::priorities)).
    #[inline]
    pub fn payloads(&self) -> &[P] {
        &self.payloads[..self.size]
    }

    /// Live priorities in heap order.
    #[inline]
    pub fn priorities(&self) -> &[u32] {
        &self.priorities[..self.size]
    }

    /// Pop entries in ascending priority order until the queue is empty.
    ///
    /// Dropping the iterator early leaves the remaining entries queued.
    pub fn drain(&mut self) -> Drain<'_, P, K> {
        Drain { queue: self }
    }
}

// Kernels are markers; these impls place no bounds on `K`.

impl<P: Payload, K: SiftKernel<P>> Clone for PriorityQueue<P, K> {
    fn clone(&self) -> Self {
        Self {
            payloads:   self.payloads.clone(),
            priorities: self.priorities.clone(),
            size:       self.size,
            kernel:     PhantomData,
        }
    }
}

impl<P: Payload, K: SiftKernel<P>> fmt::Debug for PriorityQueue<P, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("kernel", &K::NAME)
            .field("capacity", &self.capacity())
            .field("size", &self.size)
            .field("payloads", &self.payloads())
            .field("priorities", &self.priorities())
            .finish()
    }
}

// ── Drain ─────────────────────────────────────────────────────────────────────

/// Iterator returned by [`PriorityQueue::drain`].
pub struct Drain<'a, P: Payload, K: SiftKernel<P>> {
    queue: &'a mut PriorityQueue<P, K>,
}

impl<P: Payload, K: SiftKernel<P>> Iterator for Drain<'_, P, K> {
    type Item = (P, u32);

    #[inline]
    fn next(&mut self) -> Option<(P, u32)> {
        self.queue.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl<P: Payload, K: SiftKernel<P>> ExactSizeIterator for Drain<'_, P, K> {}
