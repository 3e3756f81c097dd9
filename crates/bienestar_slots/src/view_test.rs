#[cfg(test)]
mod tests {
    use crate::logic::{SlotRequest, NO_SLOTS_MESSAGE};
    use crate::service::SlotService;
    use crate::view::{
        AvailabilityState, AvailabilityView, LoadOutcome, RequestSequencer, LOAD_FAILED_MESSAGE,
    };
    use bienestar_common::{
        AvailabilityStore, BookedTime, BoxFuture, InMemoryStore, StoreError, WorkingWindow,
    };
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    /// Wraps the in-memory store and answers slower for some days.
    struct DelayedStore {
        inner: InMemoryStore,
        delays: HashMap<NaiveDate, Duration>,
    }

    impl DelayedStore {
        async fn pause(&self, date: NaiveDate) {
            if let Some(delay) = self.delays.get(&date) {
                tokio::time::sleep(*delay).await;
            }
        }
    }

    impl AvailabilityStore for DelayedStore {
        type Error = StoreError;

        fn working_windows(
            &self,
            specialist_id: &str,
            date: NaiveDate,
        ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error> {
            let specialist_id = specialist_id.to_string();
            Box::pin(async move {
                self.pause(date).await;
                self.inner.working_windows(&specialist_id, date).await
            })
        }

        fn booked_times(
            &self,
            specialist_id: &str,
            date: NaiveDate,
        ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error> {
            self.inner.booked_times(specialist_id, date)
        }

        fn working_windows_between(
            &self,
            specialist_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> BoxFuture<'_, Vec<WorkingWindow>, Self::Error> {
            self.inner.working_windows_between(specialist_id, start, end)
        }

        fn booked_times_between(
            &self,
            specialist_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> BoxFuture<'_, Vec<BookedTime>, Self::Error> {
            self.inner.booked_times_between(specialist_id, start, end)
        }
    }

    fn seeded_inner() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_window(WorkingWindow::new("w1", "S1", june(10), "08:00", "09:00"));
        store.add_window(WorkingWindow::new("w2", "S1", june(11), "14:00", "15:00"));
        store
    }

    #[test]
    fn test_sequencer_only_latest_is_current() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.issue();
        assert!(sequencer.is_current(&first));
        let second = sequencer.issue();
        assert!(second > first);
        assert!(!sequencer.is_current(&first));
        assert!(sequencer.is_current(&second));
    }

    #[test]
    fn test_state_accessors() {
        let request = SlotRequest::new("S1", june(10));
        assert!(AvailabilityState::Idle.slots().is_empty());
        assert!(AvailabilityState::Loading {
            request: request.clone()
        }
        .is_loading());

        let empty = AvailabilityState::Ready {
            request: request.clone(),
            slots: vec![],
        };
        assert_eq!(empty.message(), Some(NO_SLOTS_MESSAGE));

        let failed = AvailabilityState::Failed {
            request,
            message: LOAD_FAILED_MESSAGE.to_string(),
        };
        assert!(failed.slots().is_empty());
        assert_eq!(failed.message(), Some(LOAD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_load_applies_ready_state() {
        let service = SlotService::with_increment(Arc::new(seeded_inner()), 30);
        let view = AvailabilityView::new();
        assert_eq!(view.state(), AvailabilityState::Idle);

        let outcome = view.load(&service, SlotRequest::new("S1", june(10))).await;
        let LoadOutcome::Applied(state) = outcome else {
            panic!("expected the only request to be applied");
        };
        let rendered: Vec<String> = state.slots().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["08:00", "08:30"]);
        assert_eq!(view.state(), state);
        assert_eq!(state.message(), None);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_list() {
        let store = Arc::new(seeded_inner());
        store.set_offline(true);
        let service = SlotService::with_increment(store, 30);
        let view = AvailabilityView::new();

        view.load(&service, SlotRequest::new("S1", june(10))).await;
        let state = view.state();
        assert!(matches!(state, AvailabilityState::Failed { .. }));
        assert!(state.slots().is_empty());
        assert!(!state.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_older_response_is_discarded() {
        let store = DelayedStore {
            inner: seeded_inner(),
            delays: HashMap::from([
                (june(10), Duration::from_millis(500)),
                (june(11), Duration::from_millis(10)),
            ]),
        };
        let service = SlotService::with_increment(Arc::new(store), 30);
        let view = AvailabilityView::new();

        // The user picks the 10th, then the 11th before the first lookup returns.
        let (older, newer) = tokio::join!(
            view.load(&service, SlotRequest::new("S1", june(10))),
            view.load(&service, SlotRequest::new("S1", june(11))),
        );

        assert_eq!(older, LoadOutcome::Stale);
        assert!(matches!(newer, LoadOutcome::Applied(_)));
        match view.state() {
            AvailabilityState::Ready { request, slots } => {
                assert_eq!(request.date, june(11));
                let rendered: Vec<String> = slots.iter().map(ToString::to_string).collect();
                assert_eq!(rendered, vec!["14:00", "14:30"]);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let service = SlotService::with_increment(Arc::new(seeded_inner()), 30);
        let view = AvailabilityView::new();
        view.load(&service, SlotRequest::new("S1", june(10)).excluding("apt1"))
            .await;
        view.reset();
        assert_eq!(view.state(), AvailabilityState::Idle);
    }
}
