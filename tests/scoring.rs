#[cfg(test)]
mod tests {
    use biaslens::analysis::benchmark::{scale_to_benchmark_weighted, BenchmarkError};
    use biaslens::analysis::metrics::round2;
    use biaslens::analysis::{
        benchmarks_for, calculate_engagement_rate, calculate_follower_like_ratio, scale_to_benchmark,
        Benchmark, Niche, Platform,
    };
    use proptest::prelude::*;

    #[test]
    fn test_scale_reference_points() {
        assert_eq!(scale_to_benchmark(5.0, 5.0, 10.0), 60.0);
        assert_eq!(scale_to_benchmark(10.0, 5.0, 10.0), 100.0);
        assert_eq!(scale_to_benchmark(2.5, 5.0, 10.0), 30.0);
        assert_eq!(scale_to_benchmark(7.5, 5.0, 10.0), 80.0);
        assert_eq!(scale_to_benchmark(50.0, 5.0, 10.0), 100.0);
    }

    #[test]
    fn test_scale_degenerate_inputs() {
        assert_eq!(scale_to_benchmark(0.0, 5.0, 10.0), 0.0);
        assert_eq!(scale_to_benchmark(-3.0, 5.0, 10.0), 0.0);
        assert_eq!(scale_to_benchmark(f64::NAN, 5.0, 10.0), 0.0);
        assert_eq!(scale_to_benchmark(f64::INFINITY, 5.0, 10.0), 0.0);
        // No average to compare against: any positive value is full marks.
        assert_eq!(scale_to_benchmark(1.0, 0.0, 10.0), 100.0);
        // top <= average collapses to a step at the average.
        assert_eq!(scale_to_benchmark(2.5, 5.0, 5.0), 30.0);
        assert_eq!(scale_to_benchmark(5.0, 5.0, 5.0), 100.0);
        assert_eq!(scale_to_benchmark(6.0, 5.0, 3.0), 100.0);
    }

    #[test]
    fn test_scale_custom_weights() {
        assert_eq!(scale_to_benchmark_weighted(5.0, 5.0, 10.0, 50.0, 50.0), 50.0);
        assert_eq!(scale_to_benchmark_weighted(7.5, 5.0, 10.0, 50.0, 50.0), 75.0);
    }

    #[test]
    fn test_benchmark_validation() {
        assert!(Benchmark::new(5.0, 10.0).is_ok());
        assert_eq!(
            Benchmark::new(10.0, 5.0),
            Err(BenchmarkError::NotIncreasing { average: 10.0, top_performer: 5.0 })
        );
        assert!(Benchmark::new(0.0, 5.0).is_err());
        assert!(Benchmark::new(5.0, 5.0).is_err());
    }

    #[test]
    fn test_every_table_entry_is_valid() {
        for platform in [Platform::Tiktok, Platform::Instagram, Platform::Youtube] {
            for niche in Niche::ALL {
                let set = benchmarks_for(platform, niche);
                for (metric, benchmark) in set.all() {
                    assert!(
                        benchmark.is_valid(),
                        "{:?}/{:?} {} has average={} top={}",
                        platform,
                        niche,
                        metric,
                        benchmark.average,
                        benchmark.top_performer
                    );
                }
            }
        }
    }

    #[test]
    fn test_platform_and_niche_parsing() {
        assert_eq!("TikTok".parse::<Platform>(), Ok(Platform::Tiktok));
        assert_eq!("reels".parse::<Platform>(), Ok(Platform::Instagram));
        assert!("myspace".parse::<Platform>().is_err());
        assert_eq!(" Fitness ".parse::<Niche>(), Ok(Niche::Fitness));
        assert_eq!("".parse::<Niche>(), Ok(Niche::General));
        assert_eq!(
            "knitting".parse::<Niche>(),
            Err(BenchmarkError::UnknownNiche("knitting".to_string()))
        );
    }

    #[test]
    fn test_engagement_rate() {
        assert_eq!(calculate_engagement_rate(0.0, 0.0), 0.0);
        assert_eq!(calculate_engagement_rate(150.0, 0.0), 0.0);
        assert_eq!(calculate_engagement_rate(50.0, 1000.0), 5.0);
        assert_eq!(calculate_engagement_rate(1.0, 3.0), 33.33);
        assert_eq!(calculate_engagement_rate(2.0, 3.0), 66.67);
    }

    #[test]
    fn test_follower_like_ratio() {
        assert_eq!(calculate_follower_like_ratio(100.0, 0.0), 0.0);
        assert_eq!(calculate_follower_like_ratio(2000.0, 10000.0), 0.2);
        assert_eq!(calculate_follower_like_ratio(10.0, 3.0), 3.33);
    }

    proptest! {
        #[test]
        fn prop_scale_stays_in_range(
            value in -1.0e6f64..1.0e6,
            average in -100.0f64..1.0e4,
            top in -100.0f64..1.0e4,
        ) {
            let score = scale_to_benchmark(value, average, top);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_scale_is_monotone(
            a in 0.0f64..1.0e4,
            b in 0.0f64..1.0e4,
            average in 0.01f64..100.0,
            spread in 0.01f64..100.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let top = average + spread;
            prop_assert!(scale_to_benchmark(lo, average, top) <= scale_to_benchmark(hi, average, top));
        }

        #[test]
        fn prop_scale_anchors(average in 0.01f64..1.0e3, spread in 0.01f64..1.0e3, extra in 0.0f64..1.0e3) {
            let top = average + spread;
            prop_assert!((scale_to_benchmark(average, average, top) - 60.0).abs() < 1e-9);
            prop_assert_eq!(scale_to_benchmark(top + extra, average, top), 100.0);
        }

        #[test]
        fn prop_rates_are_rounded(interactions in 0.0f64..1.0e7, reach in 1.0f64..1.0e7) {
            let rate = calculate_engagement_rate(interactions, reach);
            prop_assert!(rate >= 0.0);
            prop_assert_eq!(round2(rate), rate);
            let ratio = calculate_follower_like_ratio(interactions, reach);
            prop_assert_eq!(round2(ratio), ratio);
        }
    }
}
