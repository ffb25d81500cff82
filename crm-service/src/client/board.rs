//! Kanban projection of leads grouped by status, with optimistic moves.
//!
//! A move is applied to the board before the persistence call is made and
//! undone if the call fails. Overlapping moves of the same lead are not
//! serialized: the second one works against whatever the first left behind.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use uuid::Uuid;

use super::gateway::LeadStatusGateway;
use crate::models::{Lead, LeadStatus};

/// Why a move was undone.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionRejected {
    #[error("Status update refused: {0}")]
    Refused(String),

    #[error("Status update did not complete: {0}")]
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Source and target were the same bucket.
    NoOp,
    Committed,
    RolledBack(TransitionRejected),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Pending,
    Settled,
}

/// A move that has been applied locally and awaits confirmation.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a pending transition must be settled"]
pub struct PendingTransition {
    original: Lead,
    from: LeadStatus,
    to: LeadStatus,
}

impl PendingTransition {
    pub fn lead_id(&self) -> Uuid {
        self.original.lead_id
    }

    pub fn from(&self) -> LeadStatus {
        self.from
    }

    pub fn to(&self) -> LeadStatus {
        self.to
    }
}

/// Per-status totals for the dashboard chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub status: LeadStatus,
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadBoard {
    buckets: BTreeMap<LeadStatus, Vec<Lead>>,
    in_flight: HashMap<Uuid, usize>,
}

impl Default for LeadBoard {
    fn default() -> Self {
        Self {
            buckets: LeadStatus::ALL.into_iter().map(|s| (s, Vec::new())).collect(),
            in_flight: HashMap::new(),
        }
    }
}

impl LeadBoard {
    /// Group a flat list, keeping the list order inside each bucket.
    pub fn from_leads(leads: impl IntoIterator<Item = Lead>) -> Self {
        let mut board = Self::default();
        for lead in leads {
            board.bucket_mut(lead.status).push(lead);
        }
        board
    }

    pub fn bucket(&self, status: LeadStatus) -> &[Lead] {
        self.buckets.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> &BTreeMap<LeadStatus, Vec<Lead>> {
        &self.buckets
    }

    pub fn total_leads(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn total_deal_amount(&self) -> Decimal {
        self.buckets
            .values()
            .flatten()
            .fold(Decimal::ZERO, |acc, lead| acc.saturating_add(lead.amount))
    }

    pub fn summary(&self) -> Vec<BucketSummary> {
        self.buckets
            .iter()
            .map(|(status, leads)| BucketSummary {
                status: *status,
                count: leads.len(),
                amount: leads
                    .iter()
                    .fold(Decimal::ZERO, |acc, lead| acc.saturating_add(lead.amount)),
            })
            .collect()
    }

    pub fn state_of(&self, lead_id: Uuid) -> TransitionState {
        if self.in_flight.contains_key(&lead_id) {
            TransitionState::Pending
        } else {
            TransitionState::Settled
        }
    }

    fn bucket_mut(&mut self, status: LeadStatus) -> &mut Vec<Lead> {
        self.buckets.entry(status).or_default()
    }

    /// Apply a move locally. Returns `None` when `from == to`, in which case
    /// nothing changed.
    pub fn begin_transition(
        &mut self,
        lead: &Lead,
        from: LeadStatus,
        to: LeadStatus,
    ) -> Option<PendingTransition> {
        if from == to {
            return None;
        }

        self.bucket_mut(from).retain(|l| l.lead_id != lead.lead_id);
        self.bucket_mut(to).push(Lead {
            status: to,
            ..lead.clone()
        });
        *self.in_flight.entry(lead.lead_id).or_insert(0) += 1;

        Some(PendingTransition {
            original: lead.clone(),
            from,
            to,
        })
    }

    /// Resolve a pending move, undoing it on rejection.
    pub fn settle(
        &mut self,
        pending: PendingTransition,
        result: Result<(), TransitionRejected>,
    ) -> TransitionOutcome {
        let lead_id = pending.lead_id();
        if let Some(count) = self.in_flight.get_mut(&lead_id) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(&lead_id);
            }
        }

        match result {
            Ok(()) => TransitionOutcome::Committed,
            Err(rejected) => {
                self.bucket_mut(pending.to).retain(|l| l.lead_id != lead_id);
                self.bucket_mut(pending.from).push(pending.original);
                TransitionOutcome::RolledBack(rejected)
            }
        }
    }
}

/// Move `lead` from one bucket to another and persist the new status.
///
/// Never fails: a refused or failed persistence call is reported as
/// [`TransitionOutcome::RolledBack`] after the board has been restored.
pub async fn move_lead<G>(
    board: &mut LeadBoard,
    gateway: &G,
    lead: &Lead,
    from: LeadStatus,
    to: LeadStatus,
) -> TransitionOutcome
where
    G: LeadStatusGateway + ?Sized,
{
    let Some(pending) = board.begin_transition(lead, from, to) else {
        return TransitionOutcome::NoOp;
    };

    let result = match gateway.update_status(lead.lead_id, to).await {
        Ok(response) if response.success => Ok(()),
        Ok(response) => Err(TransitionRejected::Refused(
            response.message.unwrap_or_default(),
        )),
        Err(e) => Err(TransitionRejected::Unreachable(e.to_string())),
    };

    let outcome = board.settle(pending, result);
    match &outcome {
        TransitionOutcome::RolledBack(reason) => {
            tracing::warn!(lead_id = %lead.lead_id, %from, %to, %reason, "Lead move rolled back");
        }
        _ => tracing::debug!(lead_id = %lead.lead_id, %from, %to, "Lead move committed"),
    }
    outcome
}
