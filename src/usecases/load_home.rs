//! Everything the home view needs: rooms, the signed-in profile and the
//! community counters.
//!
//! Only the room list is required. Profile and counter failures degrade to
//! the greeting fallback and blank stats.

use crate::domain::{
    events::HomeSnapshot, home_state::CommunityStats, profile::UserProfile,
};

use super::list_rooms::{list_rooms, ListRoomsError, ListRoomsQuery, RoomsSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountedTable {
    Rooms,
    Messages,
    Profiles,
}

impl CountedTable {
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Rooms => "rooms",
            Self::Messages => "messages",
            Self::Profiles => "profiles",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunitySourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

pub trait CommunitySource {
    fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CommunitySourceError>;
    fn count(&self, table: CountedTable) -> Result<u64, CommunitySourceError>;
}

impl<T> CommunitySource for &T
where
    T: CommunitySource + ?Sized,
{
    fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CommunitySourceError> {
        (*self).load_profile(user_id)
    }

    fn count(&self, table: CountedTable) -> Result<u64, CommunitySourceError> {
        (*self).count(table)
    }
}

pub fn load_home(
    rooms: &dyn RoomsSource,
    community: &dyn CommunitySource,
    current_user_id: Option<&str>,
) -> Result<HomeSnapshot, ListRoomsError> {
    let rooms = list_rooms(rooms, ListRoomsQuery::default())?;

    let profile = current_user_id.and_then(|user_id| match community.load_profile(user_id) {
        Ok(profile) => profile,
        Err(error) => {
            tracing::warn!(?error, "profile load failed; using greeting fallback");
            None
        }
    });

    let count = |table: CountedTable| match community.count(table) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(table = table.table_name(), ?error, "community count failed");
            None
        }
    };

    let stats = CommunityStats {
        rooms: count(CountedTable::Rooms),
        messages: count(CountedTable::Messages),
        members: count(CountedTable::Profiles),
    };

    Ok(HomeSnapshot {
        rooms,
        profile,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        domain::room::{Room, RoomType},
        usecases::list_rooms::RoomsSourceError,
    };

    struct StubRooms(Result<Vec<Room>, RoomsSourceError>);

    impl RoomsSource for StubRooms {
        fn list_rooms(&self, _limit: usize) -> Result<Vec<Room>, RoomsSourceError> {
            self.0.clone()
        }
    }

    struct StubCommunity {
        profile: Result<Option<UserProfile>, CommunitySourceError>,
        fail_counts: bool,
        profile_requests: RefCell<Vec<String>>,
    }

    impl CommunitySource for StubCommunity {
        fn load_profile(
            &self,
            user_id: &str,
        ) -> Result<Option<UserProfile>, CommunitySourceError> {
            self.profile_requests.borrow_mut().push(user_id.to_owned());
            self.profile.clone()
        }

        fn count(&self, table: CountedTable) -> Result<u64, CommunitySourceError> {
            if self.fail_counts {
                return Err(CommunitySourceError::Unavailable);
            }
            Ok(match table {
                CountedTable::Rooms => 8,
                CountedTable::Messages => 1200,
                CountedTable::Profiles => 340,
            })
        }
    }

    fn community(
        profile: Result<Option<UserProfile>, CommunitySourceError>,
        fail_counts: bool,
    ) -> StubCommunity {
        StubCommunity {
            profile,
            fail_counts,
            profile_requests: RefCell::new(Vec::new()),
        }
    }

    fn room() -> Room {
        Room {
            id: "r1".to_owned(),
            name: "General".to_owned(),
            room_type: RoomType::General,
            is_anonymous: false,
            description: None,
        }
    }

    #[test]
    fn collects_rooms_profile_and_counts() {
        let profile = UserProfile {
            id: "u1".to_owned(),
            name: Some("Sam Ortiz".to_owned()),
            ..UserProfile::default()
        };
        let community = community(Ok(Some(profile.clone())), false);

        let snapshot = load_home(&StubRooms(Ok(vec![room()])), &community, Some("u1"))
            .expect("home should load");

        assert_eq!(snapshot.rooms, vec![room()]);
        assert_eq!(snapshot.profile, Some(profile));
        assert_eq!(
            snapshot.stats,
            CommunityStats {
                rooms: Some(8),
                messages: Some(1200),
                members: Some(340),
            }
        );
    }

    #[test]
    fn profile_and_count_failures_degrade_gracefully() {
        let community = community(Err(CommunitySourceError::Unavailable), true);

        let snapshot = load_home(&StubRooms(Ok(vec![room()])), &community, Some("u1"))
            .expect("home should load");

        assert_eq!(snapshot.profile, None);
        assert_eq!(snapshot.stats, CommunityStats::default());
    }

    #[test]
    fn skips_profile_lookup_without_user() {
        let community = community(Ok(None), false);

        let _ = load_home(&StubRooms(Ok(vec![])), &community, None).expect("home should load");

        assert!(community.profile_requests.borrow().is_empty());
    }

    #[test]
    fn room_failure_fails_the_load() {
        let community = community(Ok(None), false);

        let err = load_home(
            &StubRooms(Err(RoomsSourceError::Unauthorized)),
            &community,
            None,
        )
        .expect_err("must fail");

        assert_eq!(err, ListRoomsError::Unauthorized);
    }
}
