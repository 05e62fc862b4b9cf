use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee identifiers are opaque strings owned by the external user
/// directory.
pub type UserId = String;

/// Display name used when a member has no nickname on record.
pub const ANONYMOUS_NAME: &str = "익명";

/// Immutable snapshot of one employee, valid for the duration of a single
/// generation run. Multi-valued tag fields arrive comma-separated from
/// upstream and are normalized with [`parse_tags`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub nickname: Option<String>,
    pub cuisine_genres: Vec<String>,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub lunch_styles: Vec<String>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Accepts a comma-separated tag field as stored upstream.
    pub fn with_cuisine_genres(mut self, raw: &str) -> Self {
        self.cuisine_genres = parse_tags(raw);
        self
    }

    pub fn with_age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_group = Some(age_group.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_lunch_styles(mut self, raw: &str) -> Self {
        self.lunch_styles = parse_tags(raw);
        self
    }

    /// Tag shown next to the member in a recommendation card.
    pub fn primary_cuisine_genre(&self) -> Option<&str> {
        self.cuisine_genres.first().map(String::as_str)
    }
}

/// One reason a user is unavailable on a date: a party membership or a
/// personal schedule entry. The date is carried as the raw upstream string;
/// parsing (and the fail-open rule for malformed values) belongs to the
/// availability resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub user_id: UserId,
    pub date: String,
}

impl Commitment {
    pub fn new(user_id: impl Into<UserId>, date: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            date: date.into(),
        }
    }
}

/// Pairwise score components for two users within one generation run.
/// Symmetric by construction; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairScore {
    pub compatibility: i64,
    pub pattern: i64,
}

impl PairScore {
    pub fn total(&self) -> i64 {
        self.compatibility + self.pattern
    }
}

/// One member of a proposed lunch group, decorated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: UserId,
    pub display_name: String,
    pub cuisine_genre: Option<String>,
    /// Normalized lunch-style preference from the preference store, not the
    /// profile record.
    pub lunch_style: Option<String>,
    /// Most recent party the requester and this member attended together
    /// before the proposed date. `None` means first meeting.
    pub last_dined_together: Option<NaiveDate>,
}

/// A candidate lunch group proposed to one requester for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub requester: UserId,
    pub date: NaiveDate,
    pub members: Vec<GroupMember>,
}

impl RecommendationEntry {
    pub fn group_size(&self) -> usize {
        self.members.len()
    }
}

/// Split a comma-separated upstream tag field into a normalized tag list.
/// Empty segments and surrounding whitespace are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_splits_and_trims() {
        assert_eq!(parse_tags("한식, 중식 ,일식"), vec!["한식", "중식", "일식"]);
    }

    #[test]
    fn parse_tags_drops_empty_segments() {
        assert_eq!(parse_tags(" , 한식,,"), vec!["한식"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn profile_builder_normalizes_tag_fields() {
        let profile = UserProfile::new("u1")
            .with_nickname("김철수")
            .with_cuisine_genres("한식,분식")
            .with_lunch_styles("빠른 식사, 가성비");

        assert_eq!(profile.primary_cuisine_genre(), Some("한식"));
        assert_eq!(profile.lunch_styles.len(), 2);
    }
}
