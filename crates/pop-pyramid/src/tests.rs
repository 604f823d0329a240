//! Unit tests for pop-pyramid.

use std::io::Cursor;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::{AgeBin, Pyramid, PyramidError, load_pyramid_reader};

// ── Helpers ───────────────────────────────────────────────────────────────────

const SMALL_PYRAMID: &str = "\
Age,M,F\n\
0-4,60,40\n\
5-9,30,20\n\
10-14,0,0\n\
15+,25,25\n\
";

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(20240607)
}

fn bin(min_age: u32, max_age: u32, total: u64) -> AgeBin {
    AgeBin { min_age, max_age, male: total, female: 0 }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    #[test]
    fn parses_closed_and_open_bins() {
        let p = load_pyramid_reader(Cursor::new(SMALL_PYRAMID)).unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p.bins()[0], AgeBin { min_age: 0, max_age: 4, male: 60, female: 40 });
        // "15+" inherits the 5-year width of the previous bin.
        assert_eq!(p.bins()[3].min_age, 15);
        assert_eq!(p.bins()[3].max_age, 19);
        assert_eq!(p.weights(), vec![100, 50, 0, 50]);
        assert_eq!(p.max_age(), 19);
    }

    #[test]
    fn whitespace_is_tolerated() {
        let csv = "Age, M, F\n 0-4 , 1 , 2 \n";
        let p = load_pyramid_reader(Cursor::new(csv)).unwrap();
        assert_eq!(p.bins()[0].total(), 3);
    }

    #[test]
    fn lone_open_bin_spans_one_year() {
        let p = load_pyramid_reader(Cursor::new("Age,M,F\n0+,5,5\n")).unwrap();
        assert_eq!(p.bins()[0].max_age, 0);
    }

    #[test]
    fn open_bin_must_be_last() {
        let csv = "Age,M,F\n0+,1,1\n5-9,1,1\n";
        assert!(matches!(load_pyramid_reader(Cursor::new(csv)), Err(PyramidError::Parse(_))));
    }

    #[test]
    fn gap_between_bins_rejected() {
        let csv = "Age,M,F\n0-4,1,1\n6-9,1,1\n";
        match load_pyramid_reader(Cursor::new(csv)) {
            Err(PyramidError::NonContiguous { index, expected, found }) => {
                assert_eq!((index, expected, found), (1, 5, 6));
            }
            other => panic!("expected NonContiguous, got {other:?}"),
        }
    }

    #[test]
    fn malformed_age_rejected() {
        let csv = "Age,M,F\nbabies,1,1\n";
        assert!(matches!(load_pyramid_reader(Cursor::new(csv)), Err(PyramidError::Parse(_))));
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(load_pyramid_reader(Cursor::new("Age,M,F\n")), Err(PyramidError::Empty)));
    }

    #[test]
    fn absurd_age_rejected() {
        let csv = "Age,M,F\n0-999,1,1\n";
        assert!(matches!(load_pyramid_reader(Cursor::new(csv)), Err(PyramidError::Parse(_))));
    }

    #[test]
    fn pyramid_must_start_at_zero() {
        let err = Pyramid::new(vec![bin(1, 4, 10)]).unwrap_err();
        assert!(matches!(err, PyramidError::NonContiguous { index: 0, expected: 0, found: 1 }));
    }
}

// ── Alias sampler ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod alias {
    use super::*;
    use crate::AliasedDistribution;

    #[test]
    fn rejects_degenerate_weights() {
        assert!(matches!(AliasedDistribution::new(&[]), Err(PyramidError::Empty)));
        assert!(matches!(AliasedDistribution::new(&[0, 0]), Err(PyramidError::ZeroTotal)));
        assert!(matches!(
            AliasedDistribution::new(&[u64::MAX, 1]),
            Err(PyramidError::WeightOverflow)
        ));
    }

    #[test]
    fn zero_weight_never_drawn() {
        let dist = AliasedDistribution::new(&[0, 5, 0, 5]).unwrap();
        let mut rng = rng();
        for _ in 0..10_000 {
            let i = dist.sample(&mut rng);
            assert!(i == 1 || i == 3, "drew zero-weight category {i}");
        }
    }

    #[test]
    fn single_category_always_drawn() {
        let dist = AliasedDistribution::new(&[7]).unwrap();
        let mut rng = rng();
        assert!(dist.sample_n(&mut rng, 100).iter().all(|&i| i == 0));
    }

    #[test]
    fn frequencies_track_weights() {
        let weights = [100u64, 50, 0, 50];
        let dist = AliasedDistribution::new(&weights).unwrap();
        assert_eq!(dist.total(), 200);
        assert_eq!(dist.len(), 4);

        let n = 200_000;
        let mut counts = [0usize; 4];
        for i in dist.sample_n(&mut rng(), n) {
            counts[i] += 1;
        }
        for (i, &w) in weights.iter().enumerate() {
            let expected = n as f64 * w as f64 / 200.0;
            let got = counts[i] as f64;
            assert!(
                (got - expected).abs() <= 0.02 * n as f64,
                "category {i}: got {got}, expected ~{expected}"
            );
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let dist = AliasedDistribution::new(&[3, 1, 4, 1, 5, 9, 2, 6]).unwrap();
        assert_eq!(dist.sample_n(&mut rng(), 64), dist.sample_n(&mut rng(), 64));
    }
}

// ── Birth sampler ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod birth {
    use super::*;
    use crate::BirthSampler;
    use pop_core::{DAYS_PER_YEAR, Day};

    #[test]
    fn ages_fall_inside_their_bin() {
        let pyramid = load_pyramid_reader(Cursor::new(SMALL_PYRAMID)).unwrap();
        let sampler = BirthSampler::new(&pyramid).unwrap();
        let mut rng = rng();

        let bins = sampler.sample_bins(&mut rng, 5_000);
        let ages = sampler.sample_ages(&mut rng, &bins);
        assert_eq!(ages.len(), 5_000);

        for (&b, &age) in bins.iter().zip(&ages) {
            let info = pyramid.bins()[b];
            let lo = info.min_age as i32 * DAYS_PER_YEAR;
            let hi = (info.max_age as i32 + 1) * DAYS_PER_YEAR;
            assert!((lo..hi).contains(&age.0), "age {age} outside bin {b}");
            assert_ne!(b, 2, "empty bin sampled");
        }
    }

    #[test]
    fn one_year_bin_covers_whole_year() {
        let pyramid = Pyramid::new(vec![bin(0, 0, 1)]).unwrap();
        let sampler = BirthSampler::new(&pyramid).unwrap();
        let mut rng = rng();
        let ages: Vec<Day> = (0..2_000).map(|_| sampler.sample_age(&mut rng, 0)).collect();
        assert!(ages.iter().all(|a| (0..DAYS_PER_YEAR).contains(&a.0)));
        // Both ends of the year get hit over 2 000 draws.
        assert!(ages.iter().any(|a| a.0 < 30));
        assert!(ages.iter().any(|a| a.0 > 335));
    }

    #[test]
    fn date_of_birth_is_negated_age() {
        assert_eq!(BirthSampler::date_of_birth(Day(400)), Day(-400));
        assert_eq!(BirthSampler::date_of_birth(Day::ZERO), Day::ZERO);
    }
}
