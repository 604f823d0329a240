//! Payload element types.
//!
//! The payload width is chosen per queue instantiation.  Agent indices fit in
//! a `u32`, which is what the initializer uses; narrower types halve or
//! quarter the payload array for small populations.

use std::fmt::Debug;

/// An unsigned integer that can be carried as a queue payload.
///
/// The queue never interprets the value; it only copies it around.
pub trait Payload: Copy + Default + PartialEq + Debug + Send + Sync + 'static {}

macro_rules! impl_payload {
    ($($t:ty),* $(,)?) => {
        $(impl Payload for $t {})*
    };
}

impl_payload!(u8, u16, u32, u64, usize);
