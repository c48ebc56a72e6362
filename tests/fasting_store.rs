#[cfg(test)]
mod tests {
    use chrono::Duration;
    use fastline::libs::clock::MockClock;
    use fastline::libs::data_storage::{DataStorage, FileStateStore, MemoryStateStore, StateStore};
    use fastline::libs::error::FastingError;
    use fastline::libs::fast::FastStatus;
    use fastline::libs::fasting::{FastEvent, FastTarget, FastingStore, FASTING_STATE_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const START_MS: i64 = 1_700_000_000_000;

    struct StoreTestContext {
        clock: MockClock,
        storage: MemoryStateStore,
        store: FastingStore,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let clock = MockClock::at_millis(START_MS);
            let storage = MemoryStateStore::new();
            let store = FastingStore::open(Box::new(storage.clone()), Arc::new(clock.clone()));
            StoreTestContext { clock, storage, store }
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_sixteen_eight_plan_duration(ctx: &mut StoreTestContext) {
        let fast = ctx.store.start_fast(FastTarget::Plan("16:8".to_string())).unwrap();
        assert_eq!(fast.planned_duration.num_milliseconds(), 57_600_000);
        assert_eq!(fast.start_time.timestamp_millis(), START_MS);
        assert_eq!(ctx.store.status(), FastStatus::Running);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_progress_half_and_capped(ctx: &mut StoreTestContext) {
        ctx.store.start_fast(FastTarget::Plan("16:8".to_string())).unwrap();

        ctx.clock.advance(Duration::hours(8));
        assert_eq!(ctx.store.progress(), 50.0);

        ctx.clock.advance(Duration::hours(12));
        assert_eq!(ctx.store.progress(), 100.0);
        assert_eq!(ctx.store.current().unwrap().remaining_at(ctx.store.now()), Duration::zero());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_end_records_history(ctx: &mut StoreTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.clock.advance(Duration::hours(17));

        let completed = ctx.store.end_fast().unwrap();
        assert!(ctx.store.current().is_none());
        assert_eq!(ctx.store.history().len(), 1);
        assert_eq!(ctx.store.history()[0], completed);
        assert_eq!(completed.duration(), Duration::hours(17));
        assert!(completed.reached_target());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_end_without_fast_is_noop(ctx: &mut StoreTestContext) {
        assert!(ctx.store.end_fast().is_none());
        assert!(ctx.store.history().is_empty());
        assert_eq!(ctx.store.status(), FastStatus::Idle);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_history_is_most_recent_first(ctx: &mut StoreTestContext) {
        let first = ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.clock.advance(Duration::hours(16));
        ctx.store.end_fast();
        ctx.clock.advance(Duration::hours(8));
        let second = ctx.store.start_fast(FastTarget::Plan("18:6".to_string())).unwrap();
        ctx.clock.advance(Duration::hours(10));
        ctx.store.end_fast();

        let ids: Vec<&str> = ctx.store.history().iter().map(|fast| fast.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_start_refuses_active_fast(ctx: &mut StoreTestContext) {
        let first = ctx.store.start_fast(FastTarget::Selected).unwrap();
        let result = ctx.store.start_fast(FastTarget::Selected);

        assert!(matches!(result, Err(FastingError::FastAlreadyActive { started_at }) if started_at == first.start_time));
        assert_eq!(ctx.store.current().unwrap().id, first.id);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_replace_discards_without_history(ctx: &mut StoreTestContext) {
        let first = ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.clock.advance(Duration::hours(3));

        let second = ctx.store.replace_fast(FastTarget::Duration(Duration::hours(20)));
        assert_ne!(first.id, second.id);
        assert!(ctx.store.history().is_empty());
        assert_eq!(ctx.store.current().unwrap().planned_duration, Duration::hours(20));
        assert_eq!(ctx.store.elapsed(), Duration::zero());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_pause_freezes_elapsed(ctx: &mut StoreTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.clock.advance(Duration::hours(2));

        assert_eq!(ctx.store.pause_fast(), Some(FastStatus::Paused));
        ctx.clock.advance(Duration::hours(1));
        assert_eq!(ctx.store.elapsed(), Duration::hours(2));

        assert_eq!(ctx.store.pause_fast(), Some(FastStatus::Running));
        ctx.clock.advance(Duration::hours(1));
        assert_eq!(ctx.store.elapsed(), Duration::hours(3));

        let completed = ctx.store.end_fast().unwrap();
        assert_eq!(completed.duration(), Duration::hours(3));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_pause_without_fast(ctx: &mut StoreTestContext) {
        assert_eq!(ctx.store.pause_fast(), None);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_update_plan_discards_current(ctx: &mut StoreTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();

        let discarded = ctx.store.update_plan("20:4").unwrap();
        assert!(discarded.is_some());
        assert!(ctx.store.current().is_none());
        assert!(ctx.store.history().is_empty());
        assert_eq!(ctx.store.preferences().selected_plan, "20:4");
        assert_eq!(ctx.store.preferences().planned_duration(), Duration::hours(20));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_update_plan_rejects_unknown(ctx: &mut StoreTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();

        assert!(ctx.store.update_plan("25:1").is_err());
        assert!(ctx.store.current().is_some());
        assert_eq!(ctx.store.preferences().selected_plan, "16:8");
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_custom_duration_range(ctx: &mut StoreTestContext) {
        assert!(ctx.store.set_custom_duration(3.0).is_err());
        assert!(ctx.store.set_custom_duration(49.0).is_err());

        ctx.store.set_custom_duration(36.0).unwrap();
        ctx.store.update_plan("custom").unwrap();
        let fast = ctx.store.start_fast(FastTarget::Selected).unwrap();
        assert_eq!(fast.planned_duration, Duration::hours(36));
        assert_eq!(fast.plan.as_deref(), Some("custom"));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_mutations_are_persisted(ctx: &mut StoreTestContext) {
        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.store.set_dark_mode(true);

        let json = ctx.storage.load(FASTING_STATE_KEY).unwrap().unwrap();
        assert!(json.contains("currentFast"));

        let reopened = FastingStore::open(Box::new(ctx.storage.clone()), Arc::new(ctx.clock.clone()));
        assert_eq!(reopened.state(), ctx.store.state());
        assert!(reopened.preferences().dark_mode);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_subscribers_are_notified(ctx: &mut StoreTestContext) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let id = ctx.store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.store.pause_fast();
        ctx.store.end_fast();
        assert!(ctx.store.unsubscribe(id));
        ctx.store.start_fast(FastTarget::Selected).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], FastEvent::Started(_)));
        assert!(matches!(events[1], FastEvent::Paused(_)));
        assert!(matches!(events[2], FastEvent::Ended(_)));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_checkpoint_tracks_current_fast(ctx: &mut StoreTestContext) {
        assert!(ctx.store.checkpoint().is_none());

        ctx.store.start_fast(FastTarget::Selected).unwrap();
        ctx.clock.advance(Duration::minutes(90));
        ctx.store.checkpoint().unwrap();

        let checkpoint = ctx.store.last_checkpoint().unwrap();
        assert_eq!(checkpoint.elapsed, Duration::minutes(90));

        ctx.store.replace_fast(FastTarget::Selected);
        assert!(ctx.store.last_checkpoint().is_none());
    }

    #[test]
    fn test_unreadable_state_starts_fresh() {
        let storage = MemoryStateStore::new();
        storage.save(FASTING_STATE_KEY, "{ not json").unwrap();

        let store = FastingStore::open(Box::new(storage), Arc::new(MockClock::at_millis(START_MS)));
        assert!(store.current().is_none());
        assert_eq!(store.preferences().selected_plan, "16:8");
    }

    #[test]
    fn test_out_of_range_duration_starts_fresh() {
        let storage = MemoryStateStore::new();
        let blob = r#"{"currentFast":{"id":"a","startTime":1700000000000,"plannedDuration":-9223372036854775808,"state":{"status":"running"}}}"#;
        storage.save(FASTING_STATE_KEY, blob).unwrap();

        let store = FastingStore::open(Box::new(storage), Arc::new(MockClock::at_millis(START_MS)));
        assert!(store.current().is_none());
        assert_eq!(store.preferences().selected_plan, "16:8");
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let clock = MockClock::at_millis(START_MS);
        let data = DataStorage::at(temp_dir.path());

        let mut store = FastingStore::open(Box::new(FileStateStore::new(data.clone())), Arc::new(clock.clone()));
        let fast = store.start_fast(FastTarget::Plan("18:6".to_string())).unwrap();
        clock.advance(Duration::hours(1));
        store.pause_fast();

        let reopened = FastingStore::open(Box::new(FileStateStore::new(data)), Arc::new(clock.clone()));
        let current = reopened.current().unwrap();
        assert_eq!(current.id, fast.id);
        assert!(current.is_paused());
        assert_eq!(reopened.elapsed(), Duration::hours(1));
        assert!(temp_dir.path().join("fasting-state.json").exists());
    }
}
