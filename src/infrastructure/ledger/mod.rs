pub mod jsonl;
pub mod memory;
pub mod repositories;

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::repositories::ledger::RecordKind;

/// One mutex per record kind, shared by every repository built on the same
/// store. Guards read-modify-append sections, not plain appends.
pub(crate) struct KindLocks {
    buyers: Arc<Mutex<()>>,
    leads: Arc<Mutex<()>>,
    billing_transactions: Arc<Mutex<()>>,
    lead_deliveries: Arc<Mutex<()>>,
    drip_events: Arc<Mutex<()>>,
}

impl KindLocks {
    pub(crate) fn new() -> Self {
        Self {
            buyers: Arc::new(Mutex::new(())),
            leads: Arc::new(Mutex::new(())),
            billing_transactions: Arc::new(Mutex::new(())),
            lead_deliveries: Arc::new(Mutex::new(())),
            drip_events: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) async fn acquire(&self, kind: RecordKind) -> OwnedMutexGuard<()> {
        let lock = match kind {
            RecordKind::Buyers => &self.buyers,
            RecordKind::Leads => &self.leads,
            RecordKind::BillingTransactions => &self.billing_transactions,
            RecordKind::LeadDeliveries => &self.lead_deliveries,
            RecordKind::DripEvents => &self.drip_events,
        };
        Arc::clone(lock).lock_owned().await
    }
}
