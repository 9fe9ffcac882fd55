//! Tracing diagnostics emitted by chains and stores.
//!
//! Kept to a single test so the scoped subscriber never races another test
//! in this binary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};
use trellis_engine::{Action, Case, Chain, MemoryStore, Store, UnhandledPolicy};

/// Counts WARN events and ignores everything else.
struct WarnCounter {
    warnings: Arc<AtomicUsize>,
}

impl Subscriber for WarnCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

#[test]
fn warn_policy_reports_real_unhandled_actions_but_not_store_seeding() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = WarnCounter {
        warnings: Arc::clone(&warnings),
    };

    tracing::subscriber::with_default(subscriber, || {
        let chain = Chain::new(0_i64)
            .on_unhandled(UnhandledPolicy::Warn)
            .chain(Case::unit("INCR", |n: i64| n + 1))
            .unwrap();
        let store = MemoryStore::new(chain.into_transition()).unwrap();
        assert_eq!(warnings.load(Ordering::SeqCst), 0, "seeding warned");

        store.dispatch(Action::bare("INCR")).unwrap();
        assert_eq!(warnings.load(Ordering::SeqCst), 0);

        store.dispatch(Action::bare("DECR")).unwrap();
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
        assert_eq!(store.get_state(), 1);
    });
}
