use cropshare::application::engine::BatchEngine;
use cropshare::domain::contribution::ParticipantId;
use cropshare::domain::ports::{FundTransfer, TransferError};
use cropshare::error::LedgerError;
use std::sync::{Arc, Mutex};

fn id(s: &str) -> ParticipantId {
    ParticipantId::from(s)
}

/// Payout backend that calls back into the engine mid-transfer, the way a
/// hostile recipient would.
#[derive(Default, Clone)]
struct ReentrantTransfer {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    engine: Option<Arc<BatchEngine>>,
    mutation_results: Vec<LedgerError>,
    observed_paid: Vec<bool>,
}

impl ReentrantTransfer {
    fn arm(&self, engine: Arc<BatchEngine>) {
        self.inner.lock().unwrap().engine = Some(engine);
    }
}

impl FundTransfer for ReentrantTransfer {
    fn transfer(&self, to: &ParticipantId, _amount: u64) -> Result<(), TransferError> {
        let engine = self.inner.lock().unwrap().engine.clone();
        let Some(engine) = engine else {
            return Ok(());
        };

        // Every mutating operation must bounce while a distribution is in
        // flight.
        let attempts = vec![
            engine
                .add_contribution(id("intruder"), "Mallory", "", 5)
                .unwrap_err(),
            engine.remove_contribution(to).unwrap_err(),
            engine.set_price_per_unit(1).unwrap_err(),
            engine.receive_payment(id("intruder"), u64::MAX).unwrap_err(),
            engine.distribute().unwrap_err(),
            engine.set_label("hijacked").unwrap_err(),
        ];

        // Read-only queries stay available, and the entry being paid is
        // already marked: effects land before this interaction runs.
        let paid = engine.get_contribution(to).paid;

        let mut inner = self.inner.lock().unwrap();
        inner.mutation_results.extend(attempts);
        inner.observed_paid.push(paid);
        Ok(())
    }
}

#[test]
fn test_reentrant_mutations_are_rejected() {
    let hostile = ReentrantTransfer::default();
    let engine = Arc::new(BatchEngine::new(Box::new(hostile.clone())));
    hostile.arm(engine.clone());

    engine.add_contribution(id("x"), "X", "", 3).unwrap();
    engine.add_contribution(id("y"), "Y", "", 7).unwrap();
    engine.set_price_per_unit(2).unwrap();
    engine.receive_payment(id("buyer"), 20).unwrap();
    engine.distribute().unwrap();

    let inner = hostile.inner.lock().unwrap();
    assert_eq!(inner.mutation_results.len(), 12);
    assert!(
        inner
            .mutation_results
            .iter()
            .all(|err| matches!(err, LedgerError::ReentrancyRejected))
    );
    assert_eq!(inner.observed_paid, vec![true, true]);
    drop(inner);

    // The hostile callback left no trace: no intruder entry, escrow and
    // payouts exactly as a clean run would produce them.
    assert_eq!(engine.get_contribution(&id("intruder")).quantity, 0);
    assert_eq!(engine.count(), 2);
    assert_eq!(engine.total_received(), 20);
    assert_eq!(engine.label(), "");
    assert_eq!(engine.get_contribution(&id("x")).paid_amount, 6);
    assert_eq!(engine.get_contribution(&id("y")).paid_amount, 14);
}

#[test]
fn test_engine_usable_after_reentrant_attack() {
    let hostile = ReentrantTransfer::default();
    let engine = Arc::new(BatchEngine::new(Box::new(hostile.clone())));
    hostile.arm(engine.clone());

    engine.add_contribution(id("x"), "X", "", 5).unwrap();
    engine.set_price_per_unit(2).unwrap();
    engine.receive_payment(id("buyer"), 10).unwrap();
    engine.distribute().unwrap();

    // The guard is released once the distribution returns.
    engine.add_contribution(id("z"), "Z", "", 5).unwrap();
    assert_eq!(engine.count(), 2);
}
