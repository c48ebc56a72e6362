#[cfg(test)]
mod tests {
    use chrono::Duration;
    use fastline::libs::clock::MockClock;
    use fastline::libs::data_storage::{MemoryStateStore, StateStore};
    use fastline::libs::fast::FastStatus;
    use fastline::libs::fasting::{FastTarget, FastingStore, FASTING_STATE_KEY};
    use fastline::libs::timer::{FastTimer, TimerConfig, TimerEvent, TimerState};
    use std::sync::Arc;
    use test_context::{test_context, TestContext};

    struct TimerTestContext {
        clock: MockClock,
        store: FastingStore,
        state: TimerState,
        config: TimerConfig,
    }

    impl TestContext for TimerTestContext {
        fn setup() -> Self {
            let clock = MockClock::at_millis(1_700_000_000_000);
            let store = FastingStore::open(Box::new(MemoryStateStore::new()), Arc::new(clock.clone()));
            TimerTestContext {
                clock,
                store,
                state: TimerState::new(),
                config: TimerConfig {
                    tick_interval_ms: 1000,
                    checkpoint_every: 2,
                    milestones: vec![12, 16],
                },
            }
        }
    }

    impl TimerTestContext {
        fn step(&mut self) -> Vec<TimerEvent> {
            self.state.step(&self.store, &self.config)
        }

        /// Events other than the per-tick snapshot.
        fn notable(&mut self) -> Vec<TimerEvent> {
            self.step()
                .into_iter()
                .filter(|event| !matches!(event, TimerEvent::Tick(_)))
                .collect()
        }
    }

    #[test_context(TimerTestContext)]
    #[test]
    fn test_idle_produces_nothing(ctx: &mut TimerTestContext) {
        assert!(ctx.step().is_empty());
    }

    #[test_context(TimerTestContext)]
    #[test]
    fn test_tick_snapshot(ctx: &mut TimerTestContext) {
        ctx.store.start_fast(FastTarget::Plan("16:8".to_string())).unwrap();
        ctx.clock.advance(Duration::hours(4));

        let events = ctx.step();
        let [TimerEvent::Tick(snapshot)] = events.as_slice() else {
            panic!("expected a single tick, got {:?}", events);
        };
        assert_eq!(snapshot.status, FastStatus::Running);
        assert_eq!(snapshot.elapsed, Duration::hours(4));
        assert_eq!(snapshot.remaining, Duration::hours(12));
        assert_eq!(snapshot.progress, 25.0);
        assert_eq!(snapshot.target_time, ctx.store.now() + Duration::hours(12));
    }

    #[test_context(TimerTestContext)]
    #[test]
    fn test_milestones_and_target(ctx: &mut TimerTestContext) {
        ctx.store.start_fast(FastTarget::Plan("16:8".to_string())).unwrap();
        assert!(ctx.notable().is_empty());

        ctx.clock.advance(Duration::hours(12));
        assert_eq!(ctx.notable(), vec![TimerEvent::Milestone(12)]);

        ctx.clock.advance(Duration::minutes(1));
        assert!(ctx.notable().is_empty());

        ctx.clock.advance(Duration::hours(4));
        assert_eq!(ctx.notable(), vec![TimerEvent::Milestone(16), TimerEvent::TargetReached]);

        ctx.clock.advance(Duration::hours(1));
        assert!(ctx.notable().is_empty());
    }

    #[test_context(TimerTestContext)]
    #[test]
    fn test_no_retroactive_milestones(ctx: &mut TimerTestContext) {
        ctx.store.start_fast(FastTarget::Plan("16:8".to_string())).unwrap();
        ctx.clock.advance(Duration::hours(17));

        assert!(ctx.notable().is_empty());
        ctx.clock.advance(Duration::hours(1));
        assert!(ctx.notable().is_empty());
    }

    #[test_context(TimerTestContext)]
    #[test]
    fn test_pause_resume_and_end(ctx: &mut TimerTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.step();

        ctx.store.pause_fast();
        assert_eq!(ctx.notable(), vec![TimerEvent::Paused]);

        ctx.clock.advance(Duration::hours(13));
        assert!(ctx.notable().is_empty());

        ctx.store.pause_fast();
        assert_eq!(ctx.notable(), vec![TimerEvent::Resumed]);

        ctx.store.end_fast();
        assert_eq!(ctx.step(), vec![TimerEvent::Ended]);
        assert!(ctx.step().is_empty());
    }

    #[test_context(TimerTestContext)]
    #[test]
    fn test_replaced_fast_ends_previous(ctx: &mut TimerTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.step();

        ctx.store.replace_fast(FastTarget::Selected);
        assert_eq!(ctx.notable(), vec![TimerEvent::Ended]);
    }

    #[test_context(TimerTestContext)]
    #[test]
    fn test_checkpoints_while_running(ctx: &mut TimerTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.clock.advance(Duration::minutes(5));
        ctx.step();
        assert!(ctx.store.last_checkpoint().is_none());

        ctx.clock.advance(Duration::minutes(5));
        ctx.step();
        assert_eq!(ctx.store.last_checkpoint().unwrap().elapsed, Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_run_returns_when_idle() {
        let clock = MockClock::at_millis(0);
        let mut store = FastingStore::open(Box::new(MemoryStateStore::new()), Arc::new(clock));
        let mut events = Vec::new();

        FastTimer::new(TimerConfig::default())
            .run(&mut store, |event| events.push(event.clone()))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_run_ticks_until_fast_ends_elsewhere() {
        let clock = MockClock::at_millis(1_700_000_000_000);
        let storage = MemoryStateStore::new();
        let mut store = FastingStore::open(Box::new(storage.clone()), Arc::new(clock));
        store.start_fast(FastTarget::Selected).unwrap();

        let config = TimerConfig {
            tick_interval_ms: 1,
            ..TimerConfig::default()
        };
        let mut ticks = 0;
        let mut events = Vec::new();
        FastTimer::new(config)
            .run(&mut store, |event| {
                if let TimerEvent::Tick(_) = event {
                    ticks += 1;
                    if ticks == 3 {
                        storage.save(FASTING_STATE_KEY, "{}").unwrap();
                    }
                }
                events.push(event.clone());
            })
            .await
            .unwrap();

        assert_eq!(ticks, 3);
        assert_eq!(events.last(), Some(&TimerEvent::Ended));
        assert!(store.current().is_none());
    }
}
