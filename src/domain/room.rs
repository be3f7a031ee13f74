/// Room category. Selects the colour theme, header icon and online placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoomType {
    #[default]
    General,
    Salary,
    Career,
    Leadership,
    Entrepreneurship,
    Certifications,
    Students,
    Library,
    /// Unrecognized category, kept verbatim.
    Other(String),
}

impl RoomType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "general" => Self::General,
            "salary" => Self::Salary,
            "career" => Self::Career,
            "leadership" => Self::Leadership,
            "entrepreneurship" => Self::Entrepreneurship,
            "certifications" => Self::Certifications,
            "students" => Self::Students,
            "library" => Self::Library,
            _ => Self::Other(raw.to_owned()),
        }
    }

    /// Placeholder "online now" figure shown in the chat header.
    pub fn online_placeholder(&self) -> u32 {
        match self {
            Self::General => 142,
            Self::Salary => 89,
            Self::Career => 67,
            Self::Leadership => 53,
            Self::Entrepreneurship => 34,
            Self::Certifications => 98,
            Self::Students => 76,
            Self::Library => 45,
            Self::Other(_) => 0,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Students => "🎓",
            Self::Certifications => "🏅",
            _ => "💬",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub room_type: RoomType,
    pub is_anonymous: bool,
    pub description: Option<String>,
}

impl Room {
    pub fn online_label(&self) -> String {
        let online = self.room_type.online_placeholder();
        let plural = if online == 1 { "" } else { "s" };
        format!("{online} professional{plural} online")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(room_type: RoomType) -> Room {
        Room {
            id: "r1".to_owned(),
            name: "General Discussion".to_owned(),
            room_type,
            is_anonymous: false,
            description: None,
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(RoomType::parse("Students"), RoomType::Students);
        assert_eq!(RoomType::parse(" salary "), RoomType::Salary);
    }

    #[test]
    fn parse_keeps_unknown_category_verbatim() {
        assert_eq!(
            RoomType::parse("night-shift"),
            RoomType::Other("night-shift".to_owned())
        );
    }

    #[test]
    fn online_label_pluralizes() {
        assert_eq!(
            room(RoomType::General).online_label(),
            "142 professionals online"
        );
        assert_eq!(
            room(RoomType::Other("x".to_owned())).online_label(),
            "0 professionals online"
        );
    }

    #[test]
    fn icon_depends_on_room_type() {
        assert_eq!(RoomType::Students.icon(), "🎓");
        assert_eq!(RoomType::Certifications.icon(), "🏅");
        assert_eq!(RoomType::Career.icon(), "💬");
    }
}
