//! `pop-core` — foundational types shared by every `pop-*` crate.
//!
//! This crate intentionally has no `pop-*` dependencies and only one external
//! one (`rand`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                              |
//! |-----------|-------------------------------------------------------|
//! | [`ids`]   | `AgentId`                                             |
//! | [`time`]  | `Day` offsets relative to t = 0, `DAYS_PER_YEAR`      |
//! | [`rng`]   | `AgentRng` (per-agent), `SimRng` (global)             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{DAYS_PER_YEAR, Day};
