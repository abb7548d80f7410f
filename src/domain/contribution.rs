use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a contributor or buyer, as known to the payout backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One participant's stake in the current batch.
///
/// `quantity` is fixed at creation; only the distribution walk touches
/// `paid` and `paid_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub participant: ParticipantId,
    pub display_name: String,
    pub contact_phone: String,
    /// Kilograms contributed.
    pub quantity: u64,
    pub paid: bool,
    /// Minor currency units paid out; nonzero only once `paid` is set.
    pub paid_amount: u64,
}

impl Contribution {
    pub fn new(
        participant: ParticipantId,
        display_name: impl Into<String>,
        contact_phone: impl Into<String>,
        quantity: u64,
    ) -> Self {
        Self {
            participant,
            display_name: display_name.into(),
            contact_phone: contact_phone.into(),
            quantity,
            paid: false,
            paid_amount: 0,
        }
    }

    /// The well-defined empty record returned for lookups that miss.
    pub fn absent(participant: ParticipantId) -> Self {
        Self::new(participant, "", "", 0)
    }
}

/// Per-participant payout view: everything a collaborator needs to render
/// one row of the settlement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDetails {
    pub display_name: String,
    pub contact_phone: String,
    pub quantity: u64,
    pub paid: bool,
    pub paid_amount: u64,
}

impl From<&Contribution> for PaymentDetails {
    fn from(contribution: &Contribution) -> Self {
        Self {
            display_name: contribution.display_name.clone(),
            contact_phone: contribution.contact_phone.clone(),
            quantity: contribution.quantity,
            paid: contribution.paid,
            paid_amount: contribution.paid_amount,
        }
    }
}
