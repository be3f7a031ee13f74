use crate::domain::room::Room;

const DEFAULT_ROOM_PAGE_SIZE: usize = 50;
const MAX_ROOM_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoomsQuery {
    pub limit: usize,
}

impl Default for ListRoomsQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_ROOM_PAGE_SIZE,
        }
    }
}

impl ListRoomsQuery {
    fn normalized_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_ROOM_PAGE_SIZE,
            value if value > MAX_ROOM_PAGE_SIZE => MAX_ROOM_PAGE_SIZE,
            value => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomsSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

pub trait RoomsSource {
    fn list_rooms(&self, limit: usize) -> Result<Vec<Room>, RoomsSourceError>;
}

impl<T> RoomsSource for &T
where
    T: RoomsSource + ?Sized,
{
    fn list_rooms(&self, limit: usize) -> Result<Vec<Room>, RoomsSourceError> {
        (*self).list_rooms(limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRoomsError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

impl ListRoomsError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "LIST_ROOMS_UNAUTHORIZED",
            Self::TemporarilyUnavailable => "LIST_ROOMS_UNAVAILABLE",
            Self::DataContractViolation => "LIST_ROOMS_INVALID_DATA",
        }
    }
}

pub fn list_rooms(
    source: &dyn RoomsSource,
    query: ListRoomsQuery,
) -> Result<Vec<Room>, ListRoomsError> {
    let limit = query.normalized_limit();
    source.list_rooms(limit).map_err(map_source_error)
}

fn map_source_error(error: RoomsSourceError) -> ListRoomsError {
    match error {
        RoomsSourceError::Unauthorized => ListRoomsError::Unauthorized,
        RoomsSourceError::Unavailable => ListRoomsError::TemporarilyUnavailable,
        RoomsSourceError::InvalidData => ListRoomsError::DataContractViolation,
    }
}
