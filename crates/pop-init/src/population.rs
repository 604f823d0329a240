//! Population state and the initializer's output bundle.

use pop_core::{AgentId, Day};
use pop_queue::{PriorityQueue, SiftKernel};

use crate::InitResult;

// ── Population ────────────────────────────────────────────────────────────────

/// Structure-of-arrays population, indexed by `AgentId::index()`.
///
/// All dates are day offsets from the start of the simulation (t = 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    /// `date_of_birth[i] <= 0`: agent `i` was born this many days ago.
    pub date_of_birth: Vec<Day>,
    /// `date_of_death[i] >= 0`: agent `i` dies this many days from now.
    pub date_of_death: Vec<Day>,
    pub count:         usize,
}

impl Population {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Age at t = 0, in days.
    #[inline]
    pub fn age(&self, agent: AgentId) -> Day {
        -self.date_of_birth[agent.index()]
    }

    /// Iterate over `(agent, date_of_birth, date_of_death)` in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (AgentId, Day, Day)> + '_ {
        self.date_of_birth
            .iter()
            .zip(&self.date_of_death)
            .enumerate()
            .map(|(i, (&dob, &dod))| (AgentId(i as u32), dob, dod))
    }
}

// ── InitializedPopulation ─────────────────────────────────────────────────────

/// A freshly initialized population together with its death queue.
///
/// The queue holds one `(agent index, date_of_death)` entry per agent, keyed
/// by day, so the earliest death is always at the front.
pub struct InitializedPopulation<K: SiftKernel<u32>> {
    pub population: Population,
    pub deaths:     PriorityQueue<u32, K>,
}

impl<K: SiftKernel<u32>> InitializedPopulation<K> {
    /// Remove and return every agent whose death falls on or before `day`,
    /// earliest first.
    ///
    /// Agents dying on the same day come out in no particular order.
    pub fn deaths_through(&mut self, day: Day) -> InitResult<Vec<(AgentId, Day)>> {
        let mut dead = Vec::new();
        while let Ok((_, priority)) = self.deaths.peek() {
            let Some(due) = Day::from_priority(priority).filter(|&due| due <= day) else {
                break;
            };
            let (agent, _) = self.deaths.pop()?;
            dead.push((AgentId(agent), due));
        }
        Ok(dead)
    }
}
