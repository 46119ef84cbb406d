//! # Cart Session Identity
//!
//! The backend keys carts by a session id string:
//!
//! ```text
//! signed in   ──► user_{userId}                      e.g. user_42
//! anonymous   ──► guest_{unixMillis}_{9 × base36}    e.g. guest_1717200000000_k3j9x0q2m
//! ```
//!
//! The guest id is generated once and kept in local storage until sign-in
//! merges the guest cart into the user's cart.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

const GUEST_PREFIX: &str = "guest_";
const USER_PREFIX: &str = "user_";
const GUEST_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Who the cart belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionIdentity {
    /// Signed-in user, by backend user id.
    User(i64),
    /// Anonymous visitor, by the full stored guest id.
    Guest(String),
}

impl SessionIdentity {
    /// The `sessionId` value the backend expects.
    pub fn session_id(&self) -> String {
        match self {
            SessionIdentity::User(id) => format!("{USER_PREFIX}{id}"),
            SessionIdentity::Guest(id) => id.clone(),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, SessionIdentity::Guest(_))
    }

    /// Parses a stored session id back into an identity.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(id) = raw.strip_prefix(USER_PREFIX) {
            return id.parse().ok().map(SessionIdentity::User);
        }
        is_guest_session_id(raw).then(|| SessionIdentity::Guest(raw.to_string()))
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.session_id())
    }
}

/// Generates a new guest session id from the clock and an RNG.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use storefront_core::session::{generate_guest_id, is_guest_session_id};
///
/// let now = Utc.timestamp_millis_opt(1_717_200_000_000).unwrap();
/// let id = generate_guest_id(now, &mut rand::thread_rng());
/// assert!(id.starts_with("guest_1717200000000_"));
/// assert!(is_guest_session_id(&id));
/// ```
pub fn generate_guest_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..GUEST_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{GUEST_PREFIX}{}_{suffix}", now.timestamp_millis())
}

/// Checks the `guest_{millis}_{base36}` shape.
pub fn is_guest_session_id(raw: &str) -> bool {
    let Some(rest) = raw.strip_prefix(GUEST_PREFIX) else {
        return false;
    };
    let Some((millis, suffix)) = rest.split_once('_') else {
        return false;
    };
    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == GUEST_SUFFIX_LEN
        && suffix.bytes().all(|b| BASE36.contains(&b))
}

// =============================================================================
// Unit Tests
// =============================================================================
