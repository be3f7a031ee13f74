use super::{profile::UserProfile, room::Room};

const FEATURED_ROOMS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomListUiState {
    Loading,
    Ready,
    Empty,
    Error,
}

/// Community stats shown on the home view. `None` until counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommunityStats {
    pub rooms: Option<u64>,
    pub messages: Option<u64>,
    pub members: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeState {
    ui_state: RoomListUiState,
    rooms: Vec<Room>,
    selected_index: Option<usize>,
    profile: Option<UserProfile>,
    stats: CommunityStats,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            ui_state: RoomListUiState::Loading,
            rooms: Vec::new(),
            selected_index: None,
            profile: None,
            stats: CommunityStats::default(),
        }
    }
}

impl HomeState {
    pub fn ui_state(&self) -> RoomListUiState {
        self.ui_state
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// The "popular rooms" strip: the first three rooms in list order.
    pub fn featured_rooms(&self) -> &[Room] {
        &self.rooms[..self.rooms.len().min(FEATURED_ROOMS)]
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_room(&self) -> Option<&Room> {
        self.selected_index.and_then(|index| self.rooms.get(index))
    }

    pub fn set_profile(&mut self, profile: Option<UserProfile>) {
        self.profile = profile;
    }

    pub fn greeting_name(&self) -> String {
        UserProfile::greeting_name(self.profile.as_ref())
    }

    pub fn stats(&self) -> CommunityStats {
        self.stats
    }

    pub fn set_stats(&mut self, stats: CommunityStats) {
        self.stats = stats;
    }

    /// Replaces the room list, keeping the selection on the same room id.
    pub fn set_ready(&mut self, rooms: Vec<Room>) {
        if rooms.is_empty() {
            self.set_empty();
            return;
        }

        let previous_selected_id = self.selected_room().map(|room| room.id.clone());
        self.ui_state = RoomListUiState::Ready;
        self.rooms = rooms;
        self.selected_index = resolve_selection_index(&self.rooms, previous_selected_id.as_deref());
    }

    pub fn set_empty(&mut self) {
        self.ui_state = RoomListUiState::Empty;
        self.rooms.clear();
        self.selected_index = None;
    }

    pub fn set_error(&mut self) {
        self.ui_state = RoomListUiState::Error;
        self.rooms.clear();
        self.selected_index = None;
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.rooms.len().saturating_sub(1);
        self.selected_index = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }

    /// Selects a featured room by its 1-based position in the strip.
    pub fn select_featured(&mut self, position: usize) -> bool {
        if position == 0 || position > self.featured_rooms().len() {
            return false;
        }
        self.selected_index = Some(position - 1);
        true
    }
}

fn resolve_selection_index(rooms: &[Room], previous_selected_id: Option<&str>) -> Option<usize> {
    if rooms.is_empty() {
        return None;
    }

    previous_selected_id
        .and_then(|id| rooms.iter().position(|room| room.id == id))
        .or(Some(0))
}
