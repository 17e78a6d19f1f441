//! Single stuck-at faults.

use std::cmp::Ordering;
use std::fmt;

use crate::circuit::NetId;
use crate::error::InvalidFaultError;
use crate::logic::Logic;

/// A single stuck-at fault: net `net_id` permanently held at `stuck_at`.
///
/// `stuck_at` is always `Low` or `High`; `Fault::new` and the string
/// parsers enforce this. Totally ordered by `(net_id, stuck_at)` so fault
/// sets have a deterministic listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fault {
    /// The net held at a fixed value.
    pub net_id: NetId,
    /// The stuck value, always `Low` or `High`.
    pub stuck_at: Logic,
}

impl Fault {
    /// Build a fault. Panics if `stuck_at` is not `Low` or `High`: callers
    /// constructing a `Fault` directly from engine-internal values are
    /// expected to already have a binary value; use [`Fault::parse`] for
    /// untrusted text.
    pub fn new(net_id: NetId, stuck_at: Logic) -> Fault {
        assert!(
            stuck_at.is_binary(),
            "a Fault's stuck_at value must be Low or High, got {stuck_at:?}"
        );
        Fault { net_id, stuck_at }
    }

    /// Parse `"[net-id]-sa-[0|1]"` or the whitespace-separated alternative
    /// `"<net-id> <0|1>"`.
    pub fn parse(s: &str) -> Result<Fault, InvalidFaultError> {
        let err = |reason: &str| InvalidFaultError {
            text: s.to_string(),
            reason: reason.to_string(),
        };
        let (net_token, value_token) = if let Some((n, v)) = s.rsplit_once("-sa-") {
            (n, v)
        } else {
            let mut parts = s.split_whitespace();
            let n = parts.next().ok_or_else(|| err("empty string"))?;
            let v = parts.next().ok_or_else(|| err("missing stuck-at value"))?;
            if parts.next().is_some() {
                return Err(err("too many tokens"));
            }
            (n, v)
        };
        if net_token.is_empty() {
            return Err(err("missing net id"));
        }
        let stuck_at = match value_token {
            "0" => Logic::Low,
            "1" => Logic::High,
            other => return Err(err(&format!("stuck-at value must be 0 or 1, got {other:?}"))),
        };
        Ok(Fault::new(net_token.into(), stuck_at))
    }
}

impl PartialOrd for Fault {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fault {
    fn cmp(&self, other: &Self) -> Ordering {
        self.net_id
            .cmp(&other.net_id)
            .then_with(|| stuck_at_rank(self.stuck_at).cmp(&stuck_at_rank(other.stuck_at)))
    }
}

fn stuck_at_rank(l: Logic) -> u8 {
    match l {
        Logic::Low => 0,
        Logic::High => 1,
        _ => unreachable!("Fault::stuck_at is always Low or High"),
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-sa-{}", self.net_id, self.stuck_at)
    }
}

/// Convenience alias for [`Fault::parse`] under its conventional name.
pub fn str_to_fault(s: &str) -> Option<Fault> {
    Fault::parse(s).ok()
}
