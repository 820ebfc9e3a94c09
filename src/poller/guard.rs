/// Sequence guard for overlapping poll requests.
///
/// Each tick takes a [`Ticket`] carrying a strictly increasing sequence
/// number. A response may be applied only if its ticket is newer than every
/// ticket applied before it, so a slow response from tick N can never
/// overwrite data already rendered from tick N+1.
///
/// [`SequenceGuard::accept`] must be called under the same lock that
/// protects the render, otherwise two accepted responses could still render
/// out of order.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug)]
pub struct SequenceGuard {
    issued: AtomicU64,
    applied: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: usize,
}

/// Permission to issue one request. Dropping it frees the in-flight slot.
#[derive(Debug)]
pub struct Ticket {
    seq: u64,
    guard: Arc<SequenceGuard>,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.guard.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SequenceGuard {
    /// A guard allowing at most `max_in_flight` outstanding tickets (at least one).
    pub fn new(max_in_flight: usize) -> Arc<Self> {
        Arc::new(Self {
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: max_in_flight.max(1),
        })
    }

    /// Take a ticket for a new request, or `None` when the source already
    /// has `max_in_flight` requests outstanding.
    pub fn issue(self: &Arc<Self>) -> Option<Ticket> {
        let max = self.max_in_flight;
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max).then_some(n + 1)
            })
            .ok()?;

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Some(Ticket {
            seq,
            guard: Arc::clone(self),
        })
    }

    /// Claim the right to apply this ticket's response. `false` means a newer
    /// response has already been applied and this one must be dropped.
    pub fn accept(&self, ticket: &Ticket) -> bool {
        self.applied.fetch_max(ticket.seq, Ordering::SeqCst) < ticket.seq
    }

    /// Whether the ticket is still the newest thing that could be applied.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.applied.load(Ordering::SeqCst) < ticket.seq
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}
