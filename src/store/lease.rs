use tokio::time::{Duration, Instant};

use super::identity::Identity;

/// Default writer lease lifetime
pub const DEFAULT_LEASE_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
struct Grant {
    holder: Identity,
    acquired_at: Instant,
}

/// Time-bounded exclusive write permission.
///
/// There is no release: a grant simply stops counting once `ttl` has
/// elapsed since it was acquired, and the next `acquire_at` replaces it.
#[derive(Clone, Debug)]
pub struct WriterLease {
    grant: Option<Grant>,
    ttl: Duration,
}

impl WriterLease {
    pub fn new(ttl: Duration) -> Self {
        Self { grant: None, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Holder of the lease at `now`, if the grant is still live
    pub fn holder_at(&self, now: Instant) -> Option<&Identity> {
        self.grant
            .as_ref()
            .filter(|grant| now.duration_since(grant.acquired_at) < self.ttl)
            .map(|grant| &grant.holder)
    }

    /// Acquire or renew the lease for `identity`.
    /// Returns false when another identity holds a live grant.
    pub fn acquire_at(&mut self, identity: &Identity, now: Instant) -> bool {
        if let Some(holder) = self.holder_at(now) {
            if holder != identity {
                return false;
            }
        }
        self.grant = Some(Grant {
            holder: identity.clone(),
            acquired_at: now,
        });
        true
    }
}

impl Default for WriterLease {
    fn default() -> Self {
        Self::new(DEFAULT_LEASE_TTL)
    }
}
