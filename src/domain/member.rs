//! Member - Membership Directory Entry

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::components::virtual_list::Keyed;

/// Membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    Basic,
    Supporting,
    Patron,
}

impl MembershipTier {
    /// Tier label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Supporting => "Supporting",
            Self::Patron => "Patron",
        }
    }
}

/// A member row as returned by the members API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: MembershipTier,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member joining now
    pub fn new(name: impl Into<String>, email: impl Into<String>, tier: MembershipTier) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            tier,
            joined_at: Utc::now(),
        }
    }

    /// Row shown when the directory is empty
    pub fn placeholder() -> Self {
        Self {
            id: Uuid::nil(),
            name: "No members yet".to_string(),
            email: String::new(),
            tier: MembershipTier::Basic,
            joined_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Deterministic sample directory for demos and tests
    pub fn samples(count: usize) -> Vec<Self> {
        let epoch = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().unwrap_or_default();
        (0..count)
            .map(|n| {
                let tier = match n % 10 {
                    0 => MembershipTier::Patron,
                    1..=3 => MembershipTier::Supporting,
                    _ => MembershipTier::Basic,
                };
                Self {
                    id: Uuid::new_v4(),
                    name: format!("Member {:04}", n + 1),
                    email: format!("member{:04}@example.org", n + 1),
                    tier,
                    joined_at: epoch + Duration::days(n as i64),
                }
            })
            .collect()
    }
}

impl Keyed for Member {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_have_distinct_keys_and_ordered_names() {
        let members = Member::samples(12);
        assert_eq!(members[0].name, "Member 0001");
        assert_eq!(members[11].email, "member0012@example.org");
        assert_eq!(members[0].tier, MembershipTier::Patron);

        let mut keys: Vec<_> = members.iter().map(Keyed::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn member_serializes_tier_in_snake_case() {
        let member = Member::new("Ada", "ada@example.org", MembershipTier::Supporting);
        let json = serde_json::to_value(&member).expect("json");
        assert_eq!(json["tier"], "supporting");
        assert_eq!(json["name"], "Ada");
    }
}
