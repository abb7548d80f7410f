use crate::domain::contribution::ParticipantId;
use crate::domain::ports::{FundTransfer, TransferError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Payout backend that records transfers instead of moving real funds.
///
/// Clones share the same log, so a handle kept by the caller observes every
/// transfer made through the engine's boxed copy. Individual participants
/// can be marked as rejected to exercise failure paths.
#[derive(Default, Clone)]
pub struct RecordingTransfer {
    inner: Arc<Mutex<RecordingState>>,
}

#[derive(Default)]
struct RecordingState {
    transfers: Vec<(ParticipantId, u64)>,
    rejected: HashSet<ParticipantId>,
}

impl RecordingTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every subsequent transfer to `participant` fail.
    pub fn reject(&self, participant: ParticipantId) {
        self.state().rejected.insert(participant);
    }

    /// Lifts a rejection set by [`RecordingTransfer::reject`].
    pub fn allow(&self, participant: &ParticipantId) {
        self.state().rejected.remove(participant);
    }

    /// Every transfer accepted so far, in call order.
    pub fn transfers(&self) -> Vec<(ParticipantId, u64)> {
        self.state().transfers.clone()
    }

    pub fn total_transferred(&self) -> u64 {
        self.state().transfers.iter().map(|(_, amount)| amount).sum()
    }
}

impl FundTransfer for RecordingTransfer {
    fn transfer(&self, to: &ParticipantId, amount: u64) -> Result<(), TransferError> {
        let mut state = self.state();
        if state.rejected.contains(to) {
            return Err(TransferError::new(format!("{to} refused the transfer")));
        }
        state.transfers.push((to.clone(), amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_transfer_log() {
        let recorder = RecordingTransfer::new();
        let clone = recorder.clone();

        clone
            .transfer(&ParticipantId::from("f1"), 600)
            .unwrap();

        assert_eq!(recorder.transfers(), vec![(ParticipantId::from("f1"), 600)]);
        assert_eq!(recorder.total_transferred(), 600);
    }

    #[test]
    fn test_rejected_participant_fails_until_allowed() {
        let recorder = RecordingTransfer::new();
        let id = ParticipantId::from("f1");

        recorder.reject(id.clone());
        assert!(recorder.transfer(&id, 100).is_err());
        assert!(recorder.transfers().is_empty());

        recorder.allow(&id);
        recorder.transfer(&id, 100).unwrap();
        assert_eq!(recorder.transfers().len(), 1);
    }
}
