//! # Identifiers
//!
//! All system-generated identifiers are UUID v7: time-ordered, and
//! monotonic within a process, so rapid successive calls never collide.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh, process-unique identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id!(
    /// Identifies a registered member.
    MemberId
);
entity_id!(
    /// Identifies a discussion thread.
    ThreadId
);
entity_id!(
    /// Identifies a reply anywhere in a thread's reply tree.
    ReplyId
);
entity_id!(
    /// Identifies a private message.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rapid_generation_never_collides() {
        let ids: HashSet<Uuid> = (0..10_000)
            .map(|i| match i % 4 {
                0 => MemberId::generate().as_uuid(),
                1 => ThreadId::generate().as_uuid(),
                2 => ReplyId::generate().as_uuid(),
                _ => MessageId::generate().as_uuid(),
            })
            .collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn ids_are_ordered_by_creation() {
        let first = ThreadId::generate();
        let second = ThreadId::generate();
        assert!(first < second);
    }

    #[test]
    fn parses_its_own_display_form() {
        let id = ReplyId::generate();
        let parsed: ReplyId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<MemberId>().is_err());
    }
}
