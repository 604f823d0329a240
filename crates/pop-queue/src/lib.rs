//! `pop-queue` — fixed-capacity indexed min-heap for scheduled agent events.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`queue`]   | `PriorityQueue` (SoA payload/priority arrays), `Drain`      |
//! | [`kernel`]  | `SiftKernel` trait, `PortableKernel`, `NativeKernel`        |
//! | [`payload`] | `Payload` trait (u8 / u16 / u32 / u64 / usize)              |
//! | [`error`]   | `QueueError`, `QueueResult<T>`                              |
//!
//! # Layout
//!
//! ```text
//! payloads:   [ p0 | p1 | p2 | ... | p(size-1) | stale ... ]   len = capacity
//! priorities: [ k0 | k1 | k2 | ... | k(size-1) | stale ... ]   len = capacity
//!
//! k(i) >= k((i-1)/2)   for every 1 <= i < size
//! ```
//!
//! Both arrays are allocated once at construction and never grow.  Index `i`
//! of `payloads` always belongs to index `i` of `priorities`; the kernels only
//! ever swap the two arrays in lockstep.
//!
//! # Choosing a kernel
//!
//! The kernel is a type parameter, fixed when the queue is constructed:
//!
//! ```rust
//! use pop_queue::{NativeKernel, PriorityQueue};
//!
//! let mut q: PriorityQueue<u32, NativeKernel> = PriorityQueue::new(3);
//! q.push(10, 30).unwrap();
//! q.push(20, 10).unwrap();
//! assert_eq!(q.pop().unwrap(), (20, 10));
//! ```
//!
//! Both kernels perform the same swaps in the same order, so a queue driven
//! by either one ends in a bit-identical state.

pub mod error;
pub mod kernel;
pub mod payload;
pub mod queue;


pub use error::{QueueError, QueueResult};
pub use kernel::{NativeKernel, PortableKernel, SiftKernel};
pub use payload::Payload;
pub use queue::{Drain, NativeQueue, PortableQueue, PriorityQueue};
