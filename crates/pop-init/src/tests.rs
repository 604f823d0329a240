//! Integration tests for pop-init.

use std::io::Cursor;
use std::time::Duration;

use pop_core::{AgentId, AgentRng, Day};
use pop_mortality::{MortalityModel, SurvivalCurve};
use pop_pyramid::{Pyramid, load_pyramid_reader};
use pop_queue::{NativeKernel, PortableKernel};

use crate::{
    InitError, InitObserver, InitPhase, InitializedPopulation, NoopObserver, PopulationBuilder,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const PYRAMID_CSV: &str = "\
Age,M,F\n\
0-9,50,50\n\
10-19,40,40\n\
20-29,30,30\n\
30+,20,20\n\
";

/// Oldest possible age in `PYRAMID_CSV`, exclusive, in days.
const AGE_LIMIT_DAYS: i32 = 40 * 365;

fn pyramid() -> Pyramid {
    load_pyramid_reader(Cursor::new(PYRAMID_CSV)).unwrap()
}

fn build_native(count: usize, seed: u64) -> InitializedPopulation<NativeKernel> {
    PopulationBuilder::new(count, seed)
        .pyramid(pyramid())
        .build::<NativeKernel>(&mut NoopObserver)
        .unwrap()
}

/// Everyone dies the same number of days after t = 0.
struct FixedLifespan(i32);

impl MortalityModel for FixedLifespan {
    fn predict_day_of_death(&self, age: Day, _rng: &mut AgentRng) -> Day {
        age + self.0
    }
}

/// Broken model: predicts a death one day in the past.
struct Retroactive;

impl MortalityModel for Retroactive {
    fn predict_day_of_death(&self, age: Day, _rng: &mut AgentRng) -> Day {
        Day(age.0 - 1)
    }
}

/// Broken model: predicts a death on the earliest representable day.
struct LongAgo;

impl MortalityModel for LongAgo {
    fn predict_day_of_death(&self, _age: Day, _rng: &mut AgentRng) -> Day {
        Day(i32::MIN)
    }
}

#[derive(Default)]
struct Recorder {
    events: Vec<(&'static str, InitPhase, usize)>,
}

impl InitObserver for Recorder {
    fn on_phase_start(&mut self, phase: InitPhase, total: usize) {
        self.events.push(("start", phase, total));
    }

    fn on_progress(&mut self, phase: InitPhase, done: usize) {
        self.events.push(("progress", phase, done));
    }

    fn on_phase_end(&mut self, phase: InitPhase, _elapsed: Duration) {
        self.events.push(("end", phase, 0));
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use crate::{DEFAULT_COUNT, DEFAULT_SEED, InitConfig, KernelChoice};

    use super::*;

    #[test]
    fn json_defaults() {
        let cfg: InitConfig = serde_json::from_str(r#"{ "pyramid": "p.csv" }"#).unwrap();
        assert_eq!(cfg, InitConfig::new("p.csv"));
        assert_eq!(cfg.count, DEFAULT_COUNT);
        assert_eq!(cfg.seed, DEFAULT_SEED);
        assert_eq!(cfg.kernel, KernelChoice::Native);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn json_overrides() {
        let json = r#"{ "pyramid": "p.csv", "count": 10, "seed": 7, "kernel": "portable", "num_threads": 2 }"#;
        let cfg: InitConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.count, 10);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.kernel, KernelChoice::Portable);
        assert_eq!(cfg.num_threads, Some(2));
    }

    #[test]
    fn validate_rejects_bad_counts() {
        let mut cfg = InitConfig::new("p.csv");
        cfg.count = 0;
        assert!(matches!(cfg.validate(), Err(InitError::Config(_))));

        cfg.count = u32::MAX as usize + 1;
        assert!(matches!(cfg.validate(), Err(InitError::Config(_))));

        cfg.count = 1;
        cfg.num_threads = Some(0);
        assert!(matches!(cfg.validate(), Err(InitError::Config(_))));
    }

    #[test]
    fn kernel_choice_parses() {
        assert_eq!("portable".parse::<KernelChoice>(), Ok(KernelChoice::Portable));
        assert_eq!("NATIVE".parse::<KernelChoice>(), Ok(KernelChoice::Native));
        assert!("jit".parse::<KernelChoice>().is_err());
        assert_eq!(KernelChoice::Portable.to_string(), "portable");
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn missing_pyramid_errors() {
        let result = PopulationBuilder::new(10, 1).build::<PortableKernel>(&mut NoopObserver);
        assert!(matches!(result, Err(InitError::Config(_))));
    }

    #[test]
    fn zero_count_errors() {
        let result = PopulationBuilder::new(0, 1)
            .pyramid(pyramid())
            .build::<PortableKernel>(&mut NoopObserver);
        assert!(matches!(result, Err(InitError::Config(_))));
    }

    #[test]
    fn dates_are_consistent() {
        let init = build_native(2_000, 42);
        let pop = &init.population;
        assert_eq!(pop.len(), 2_000);
        assert_eq!(pop.date_of_birth.len(), 2_000);
        assert_eq!(pop.date_of_death.len(), 2_000);

        for (agent, dob, dod) in pop.iter() {
            assert!(dob.0 <= 0, "{agent} born in the future: {dob}");
            assert!(-dob.0 < AGE_LIMIT_DAYS, "{agent} too old: {dob}");
            assert!(dod.0 >= 0, "{agent} already dead: {dod}");
            assert_eq!(pop.age(agent), -dob);
        }
    }

    #[test]
    fn queue_holds_every_agent() {
        let mut init = build_native(2_000, 42);
        assert_eq!(init.deaths.len(), 2_000);
        assert!(init.deaths.is_full());

        let mut expected: Vec<u32> = init.population.date_of_death.iter().map(|d| d.0 as u32).collect();
        expected.sort_unstable();

        let dod = init.population.date_of_death.clone();
        let drained: Vec<(u32, u32)> = init.deaths.drain().collect();
        let priorities: Vec<u32> = drained.iter().map(|&(_, p)| p).collect();
        assert_eq!(priorities, expected);
        for (agent, day) in drained {
            assert_eq!(dod[agent as usize].0 as u32, day);
        }
    }

    #[test]
    fn same_seed_same_population() {
        let a = build_native(1_000, 7);
        let b = build_native(1_000, 7);
        assert_eq!(a.population, b.population);
        assert_eq!(a.deaths.payloads(), b.deaths.payloads());
        assert_eq!(a.deaths.priorities(), b.deaths.priorities());
    }

    #[test]
    fn different_seed_different_population() {
        let a = build_native(1_000, 7);
        let b = build_native(1_000, 8);
        assert_ne!(a.population.date_of_birth, b.population.date_of_birth);
    }

    #[test]
    fn kernels_build_identical_queues() {
        let native = build_native(3_000, 99);
        let portable = PopulationBuilder::new(3_000, 99)
            .pyramid(pyramid())
            .build::<PortableKernel>(&mut NoopObserver)
            .unwrap();
        assert_eq!(native.population, portable.population);
        assert_eq!(native.deaths.payloads(), portable.deaths.payloads());
        assert_eq!(native.deaths.priorities(), portable.deaths.priorities());
    }

    #[test]
    fn deaths_use_per_agent_streams() {
        let seed = 1234;
        let init = build_native(500, seed);
        let curve = SurvivalCurve::standard().unwrap();
        let pop = &init.population;
        for i in [0usize, 1, 250, 499] {
            let age = pop.age(AgentId(i as u32));
            let mut rng = AgentRng::new(seed, AgentId(i as u32));
            let at_death = curve.predicted_day_of_death(age, rng.inner());
            assert_eq!(pop.date_of_death[i], Day(at_death - age));
        }
    }

    #[test]
    fn custom_mortality_model() {
        let init = PopulationBuilder::new(100, 3)
            .pyramid(pyramid())
            .mortality(FixedLifespan(10))
            .build::<NativeKernel>(&mut NoopObserver)
            .unwrap();
        assert!(init.population.date_of_death.iter().all(|&d| d == Day(10)));
        assert_eq!(init.deaths.peek().unwrap().1, 10);
    }

    #[test]
    fn death_before_start_rejected() {
        let result = PopulationBuilder::new(5, 3)
            .pyramid(pyramid())
            .mortality(Retroactive)
            .build::<NativeKernel>(&mut NoopObserver);
        assert!(matches!(result, Err(InitError::DeathBeforeStart { agent: 0, days: 1 })));
    }

    #[test]
    fn death_beyond_day_range_rejected() {
        let result = PopulationBuilder::new(5, 3)
            .pyramid(pyramid())
            .mortality(LongAgo)
            .build::<NativeKernel>(&mut NoopObserver);
        assert!(matches!(
            result,
            Err(InitError::DeathBeforeStart { agent: 0, days: i32::MAX })
        ));
    }

    #[test]
    fn thread_count_does_not_change_result() {
        let build = |threads: Option<usize>| {
            PopulationBuilder::new(200_000, 77)
                .pyramid(pyramid())
                .num_threads(threads)
                .build::<NativeKernel>(&mut NoopObserver)
                .unwrap()
        };
        let single = build(Some(1));
        let default = build(None);
        assert_eq!(single.population, default.population);
        assert_eq!(single.deaths.payloads(), default.deaths.payloads());
        assert_eq!(single.deaths.priorities(), default.deaths.priorities());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn rayon_pool_matches_single_thread() {
        let build = |threads: usize| {
            PopulationBuilder::new(200_000, 2024)
                .pyramid(pyramid())
                .num_threads(Some(threads))
                .build::<NativeKernel>(&mut NoopObserver)
                .unwrap()
        };
        let single = build(1);
        let pooled = build(4);
        assert_eq!(single.population, pooled.population);
        assert_eq!(single.deaths.payloads(), pooled.deaths.payloads());
        assert_eq!(single.deaths.priorities(), pooled.deaths.priorities());
    }

    #[test]
    fn observer_sees_phases_in_order() {
        let count = 150_000;
        let mut rec = Recorder::default();
        PopulationBuilder::new(count, 5)
            .pyramid(pyramid())
            .mortality(FixedLifespan(1))
            .build::<NativeKernel>(&mut rec)
            .unwrap();

        let starts: Vec<InitPhase> = rec
            .events
            .iter()
            .filter(|e| e.0 == "start")
            .map(|e| e.1)
            .collect();
        assert_eq!(starts, InitPhase::ALL);
        assert!(rec.events.iter().filter(|e| e.0 == "start").all(|e| e.2 == count));

        for phase in InitPhase::ALL {
            let progress: Vec<usize> = rec
                .events
                .iter()
                .filter(|e| e.0 == "progress" && e.1 == phase)
                .map(|e| e.2)
                .collect();
            assert!(progress.windows(2).all(|w| w[0] < w[1]), "{phase}: {progress:?}");
            assert_eq!(progress.last(), Some(&count), "{phase}");
        }

        let predict: Vec<usize> = rec
            .events
            .iter()
            .filter(|e| e.0 == "progress" && e.1 == InitPhase::PredictDeaths)
            .map(|e| e.2)
            .collect();
        assert_eq!(predict, [65_536, 131_072, 150_000]);
        assert_eq!(rec.events.last().map(|e| (e.0, e.1)), Some(("end", InitPhase::QueueDeaths)));
    }
}

// ── deaths_through ────────────────────────────────────────────────────────────

#[cfg(test)]
mod deaths_through_tests {
    use super::*;

    #[test]
    fn pops_first_year_in_order() {
        let mut init = build_native(5_000, 11);
        let horizon = Day(365);
        let expected = init.population.date_of_death.iter().filter(|&&d| d <= horizon).count();

        let dead = init.deaths_through(horizon).unwrap();
        assert_eq!(dead.len(), expected);
        assert!(dead.windows(2).all(|w| w[0].1 <= w[1].1));
        for &(agent, day) in &dead {
            assert!(day <= horizon);
            assert_eq!(init.population.date_of_death[agent.index()], day);
        }
        assert_eq!(init.deaths.len(), 5_000 - expected);
        if let Ok((_, next)) = init.deaths.peek() {
            assert!(next as i32 > horizon.0);
        }
    }

    #[test]
    fn before_start_is_empty() {
        let mut init = build_native(100, 11);
        assert!(init.deaths_through(Day(-1)).unwrap().is_empty());
        assert_eq!(init.deaths.len(), 100);
    }

    #[test]
    fn far_future_drains_everything() {
        let mut init = build_native(100, 11);
        assert_eq!(init.deaths_through(Day(i32::MAX)).unwrap().len(), 100);
        assert!(init.deaths.is_empty());
    }

    #[test]
    fn priority_past_last_day_stays_queued() {
        let mut init = build_native(100, 11);
        let (agent, _) = init.deaths.pop().unwrap();
        init.deaths.push(agent, u32::MAX).unwrap();

        let dead = init.deaths_through(Day(i32::MAX)).unwrap();
        assert_eq!(dead.len(), 99);
        assert!(dead.iter().all(|&(_, day)| day >= Day(0)));
        assert_eq!(init.deaths.peek().unwrap(), (agent, u32::MAX));
    }
}

// ── Files ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod file_tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::{InitConfig, PopulationBuilder, write_population_csv};

    use super::*;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn population_csv_round_trip() {
        let dir = tmp();
        let path = dir.path().join("population.csv");
        let init = build_native(50, 2);
        write_population_csv(&path, &init.population).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["agent_id", "date_of_birth", "date_of_death"]);

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 50);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row[0].parse::<usize>().unwrap(), i);
            assert_eq!(row[1].parse::<i32>().unwrap(), init.population.date_of_birth[i].0);
            assert_eq!(row[2].parse::<i32>().unwrap(), init.population.date_of_death[i].0);
        }
    }

    #[test]
    fn from_config_loads_files() {
        let dir = tmp();
        let pyramid_path = dir.path().join("pyramid.csv");
        let table_path = dir.path().join("life.csv");
        fs::write(&pyramid_path, PYRAMID_CSV).unwrap();
        // Everyone dies in their first year of life.
        fs::write(&table_path, "age,deaths\n0,10\n").unwrap();

        let mut cfg = InitConfig::new(&pyramid_path);
        cfg.count = 200;
        cfg.life_table = Some(table_path);

        let init = PopulationBuilder::from_config(&cfg)
            .unwrap()
            .build::<PortableKernel>(&mut NoopObserver)
            .unwrap();
        assert_eq!(init.population.len(), 200);
        // Past the one-year table, agents die within their current year.
        for (agent, _, dod) in init.population.iter() {
            let age = init.population.age(agent);
            assert!(dod.0 < 365 - age.day_of_year(), "{agent}: age {age}, dod {dod}");
        }
    }

    #[test]
    fn from_config_missing_pyramid_file() {
        let dir = tmp();
        let cfg = InitConfig::new(dir.path().join("nope.csv"));
        assert!(matches!(PopulationBuilder::from_config(&cfg), Err(InitError::Pyramid(_))));
    }
}
