#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use fastline::libs::clock::MockClock;
    use fastline::libs::data_storage::MemoryStateStore;
    use fastline::libs::error::FastingError;
    use fastline::libs::weight::{GoalPrediction, NewWeight, WeightGoal, WeightSource, WeightStore, WeightUnit};
    use std::sync::Arc;
    use test_context::{test_context, TestContext};

    const NOW_MS: i64 = 1_717_200_000_000;

    struct WeightTestContext {
        clock: MockClock,
        storage: MemoryStateStore,
        store: WeightStore,
    }

    impl TestContext for WeightTestContext {
        fn setup() -> Self {
            let clock = MockClock::at_millis(NOW_MS);
            let storage = MemoryStateStore::new();
            let store = WeightStore::open(Box::new(storage.clone()), Arc::new(clock.clone()));
            WeightTestContext { clock, storage, store }
        }
    }

    impl WeightTestContext {
        fn days_ago(&self, days: i64) -> DateTime<Utc> {
            DateTime::<Utc>::from_timestamp_millis(NOW_MS).unwrap() - Duration::days(days)
        }

        fn add(&mut self, weight: f64, days_ago: i64) {
            let date = self.days_ago(days_ago);
            self.store
                .add_entry(
                    NewWeight {
                        weight,
                        unit: WeightUnit::Lbs,
                        date,
                        note: None,
                    },
                    WeightSource::Manual,
                )
                .unwrap();
        }

        fn goal(&mut self, target: f64, started_days_ago: i64) {
            let start_date = self.days_ago(started_days_ago);
            self.store
                .set_goal(WeightGoal {
                    target_weight: target,
                    unit: WeightUnit::Lbs,
                    start_date,
                    target_date: None,
                })
                .unwrap();
        }
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_entries_sorted_most_recent_first(ctx: &mut WeightTestContext) {
        ctx.add(158.0, 7);
        ctx.add(155.0, 0);
        ctx.add(160.0, 14);

        let weights: Vec<f64> = ctx.store.entries().iter().map(|entry| entry.weight).collect();
        assert_eq!(weights, vec![155.0, 158.0, 160.0]);
        assert_eq!(ctx.store.current_weight(), Some(155.0));
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_progress_halfway_to_goal(ctx: &mut WeightTestContext) {
        ctx.add(160.0, 14);
        ctx.add(155.0, 0);
        ctx.goal(150.0, 30);

        assert_eq!(ctx.store.start_weight(), Some(160.0));
        assert_eq!(ctx.store.weight_change(), Some(-5.0));
        assert_eq!(ctx.store.progress_percentage(), Some(50.0));
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_progress_when_goal_equals_start(ctx: &mut WeightTestContext) {
        ctx.add(160.0, 0);
        ctx.goal(160.0, 30);

        assert_eq!(ctx.store.progress_percentage(), Some(100.0));
        assert_eq!(ctx.store.predicted_goal_date(), Some(GoalPrediction::Reached));
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_progress_is_clamped(ctx: &mut WeightTestContext) {
        ctx.add(160.0, 14);
        ctx.add(163.0, 0);
        ctx.goal(150.0, 30);
        assert_eq!(ctx.store.progress_percentage(), Some(0.0));

        ctx.add(148.0, -1);
        assert_eq!(ctx.store.progress_percentage(), Some(100.0));
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_change_needs_two_entries(ctx: &mut WeightTestContext) {
        assert_eq!(ctx.store.current_weight(), None);
        ctx.add(160.0, 0);
        assert_eq!(ctx.store.weight_change(), None);
        assert_eq!(ctx.store.average_weekly_change(), None);
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_weekly_trend_and_prediction(ctx: &mut WeightTestContext) {
        ctx.add(162.0, 14);
        ctx.add(161.0, 7);
        ctx.add(160.0, 0);
        ctx.goal(150.0, 20);

        let weekly = ctx.store.average_weekly_change().unwrap();
        assert!((weekly + 1.0).abs() < 1e-9);

        match ctx.store.predicted_goal_date() {
            Some(GoalPrediction::On(date)) => {
                let expected = ctx.days_ago(-70);
                assert!((date - expected).num_seconds().abs() < 5);
            }
            other => panic!("unexpected prediction {:?}", other),
        }
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_trend_falls_back_to_full_history(ctx: &mut WeightTestContext) {
        ctx.add(166.0, 60);
        ctx.add(164.0, 40);
        ctx.add(160.2, 2);

        let weekly = ctx.store.average_weekly_change().unwrap();
        assert!((weekly + 0.7).abs() < 1e-9);
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_trend_ignores_entries_outside_window(ctx: &mut WeightTestContext) {
        ctx.add(200.0, 90);
        ctx.add(162.0, 14);
        ctx.add(161.0, 7);
        ctx.add(160.0, 0);

        let weekly = ctx.store.average_weekly_change().unwrap();
        assert!((weekly + 1.0).abs() < 1e-9);
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_no_prediction_when_trend_is_nearly_flat(ctx: &mut WeightTestContext) {
        ctx.add(160.0, 14);
        ctx.add(159.9999999, 0);
        ctx.goal(150.0, 20);

        let weekly = ctx.store.average_weekly_change().unwrap();
        assert!(weekly < 0.0);
        assert_eq!(ctx.store.predicted_goal_date(), None);
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_no_prediction_when_moving_away(ctx: &mut WeightTestContext) {
        ctx.add(158.0, 14);
        ctx.add(160.0, 0);
        ctx.goal(150.0, 20);

        assert_eq!(ctx.store.predicted_goal_date(), None);
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_unit_conversion_in_views(ctx: &mut WeightTestContext) {
        let date = ctx.days_ago(0);
        ctx.store
            .add_entry(
                NewWeight {
                    weight: 100.0,
                    unit: WeightUnit::Kg,
                    date,
                    note: None,
                },
                WeightSource::Manual,
            )
            .unwrap();

        let lbs = ctx.store.current_weight().unwrap();
        assert!((lbs - 220.462).abs() < 0.01);

        ctx.store.set_unit(WeightUnit::Kg);
        assert!((ctx.store.current_weight().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_invalid_weight_and_goal(ctx: &mut WeightTestContext) {
        let start_date = ctx.days_ago(0);
        let result = ctx.store.add_entry(
            NewWeight {
                weight: 0.0,
                unit: WeightUnit::Lbs,
                date: start_date,
                note: None,
            },
            WeightSource::Manual,
        );
        assert_eq!(result.unwrap_err(), FastingError::InvalidWeight(0.0));

        let goal = WeightGoal {
            target_weight: 150.0,
            unit: WeightUnit::Lbs,
            start_date,
            target_date: Some(start_date - Duration::days(1)),
        };
        assert!(matches!(ctx.store.set_goal(goal), Err(FastingError::InvalidGoal(_))));
        assert!(ctx.store.goal().is_none());
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_delete_entry(ctx: &mut WeightTestContext) {
        ctx.add(160.0, 1);
        let id = ctx.store.entries()[0].id.clone();

        ctx.store.delete_entry(&id).unwrap();
        assert!(ctx.store.entries().is_empty());
        assert!(matches!(ctx.store.delete_entry(&id), Err(FastingError::WeightEntryNotFound(_))));
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_import_skips_known_dates(ctx: &mut WeightTestContext) {
        ctx.add(160.0, 2);
        let batch = vec![
            NewWeight {
                weight: 159.0,
                unit: WeightUnit::Lbs,
                date: ctx.days_ago(2),
                note: None,
            },
            NewWeight {
                weight: 158.0,
                unit: WeightUnit::Lbs,
                date: ctx.days_ago(1),
                note: None,
            },
            NewWeight {
                weight: 157.0,
                unit: WeightUnit::Lbs,
                date: ctx.days_ago(1),
                note: None,
            },
            NewWeight {
                weight: -1.0,
                unit: WeightUnit::Lbs,
                date: ctx.days_ago(0),
                note: None,
            },
        ];

        let summary = ctx.store.import_entries(batch, WeightSource::AppleHealth);
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 3);
        assert_eq!(ctx.store.entries().len(), 2);
        assert_eq!(ctx.store.entries()[0].source, WeightSource::AppleHealth);
        assert_eq!(ctx.store.state().health_sync.imported_count, 1);
        assert_eq!(ctx.store.state().health_sync.last_import, Some(ctx.days_ago(0)));
    }

    #[test_context(WeightTestContext)]
    #[test]
    fn test_state_survives_reopen(ctx: &mut WeightTestContext) {
        ctx.add(160.0, 3);
        ctx.goal(150.0, 10);
        ctx.store.set_unit(WeightUnit::Kg);

        let reopened = WeightStore::open(Box::new(ctx.storage.clone()), Arc::new(ctx.clock.clone()));
        assert_eq!(reopened.state(), ctx.store.state());
        assert_eq!(reopened.unit(), WeightUnit::Kg);

        assert!(ctx.store.clear_goal().is_some());
        assert!(ctx.store.clear_goal().is_none());
    }
}
