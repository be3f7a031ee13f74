//! Professional role badges.
//!
//! Profiles carry a free-text qualification. It is mapped once into [`Role`],
//! which owns both the badge label and its theme.

/// Colour family of a role badge. The UI maps it to terminal colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTheme {
    Slate,
    Rose,
    Emerald,
    Blue,
    Sky,
    Red,
    Amber,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    HrRecruiter,
    Paramedic,
    Emr,
    Emt,
    AdvanceEmt,
    AdvanceParamedic,
    Instructor,
    /// Unrecognized qualification, already formatted for display.
    Other(String),
}

impl Role {
    /// Total mapping from a raw qualification string.
    ///
    /// Simple roles match exactly (case-insensitive). Compound roles need
    /// "advance" plus "emt" or "paramedic" anywhere in the string; when both
    /// are present the paramedic variant wins.
    pub fn from_raw(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();

        match lowered.as_str() {
            "hr" => return Self::HrRecruiter,
            "paramedic" => return Self::Paramedic,
            "emr" => return Self::Emr,
            "emt" => return Self::Emt,
            "instructor" => return Self::Instructor,
            _ => {}
        }

        if lowered.contains("advance") {
            if lowered.contains("paramedic") {
                return Self::AdvanceParamedic;
            }
            if lowered.contains("emt") {
                return Self::AdvanceEmt;
            }
        }

        Self::Other(lowered.to_uppercase().replace('_', " "))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::HrRecruiter => "HR / RECRUITER",
            Self::Paramedic => "PARAMEDIC",
            Self::Emr => "EMR",
            Self::Emt => "EMT",
            Self::AdvanceEmt => "ADVANCE EMT",
            Self::AdvanceParamedic => "ADVANCE PARAMEDIC",
            Self::Instructor => "INSTRUCTOR",
            Self::Other(label) => label,
        }
    }

    pub fn badge_theme(&self) -> BadgeTheme {
        match self {
            Self::HrRecruiter => BadgeTheme::Slate,
            Self::Paramedic => BadgeTheme::Rose,
            Self::Emr => BadgeTheme::Emerald,
            Self::Emt => BadgeTheme::Blue,
            Self::AdvanceEmt => BadgeTheme::Sky,
            Self::AdvanceParamedic => BadgeTheme::Red,
            Self::Instructor => BadgeTheme::Amber,
            Self::Other(_) => BadgeTheme::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_roles_map_case_insensitively() {
        assert_eq!(Role::from_raw("HR"), Role::HrRecruiter);
        assert_eq!(Role::from_raw("Paramedic"), Role::Paramedic);
        assert_eq!(Role::from_raw("emr"), Role::Emr);
        assert_eq!(Role::from_raw("EMT"), Role::Emt);
        assert_eq!(Role::from_raw("instructor"), Role::Instructor);
    }

    #[test]
    fn compound_roles_use_containment() {
        assert_eq!(Role::from_raw("advance_emt"), Role::AdvanceEmt);
        assert_eq!(Role::from_raw("Advanced EMT"), Role::AdvanceEmt);
        assert_eq!(Role::from_raw("advance_paramedic"), Role::AdvanceParamedic);
    }

    #[test]
    fn compound_role_with_both_keywords_prefers_paramedic() {
        assert_eq!(
            Role::from_raw("advance emt paramedic"),
            Role::AdvanceParamedic
        );
    }

    #[test]
    fn emt_without_advance_is_not_compound() {
        assert_eq!(
            Role::from_raw("emt_student"),
            Role::Other("EMT STUDENT".to_owned())
        );
    }

    #[test]
    fn unknown_role_is_uppercased_with_spaces() {
        let role = Role::from_raw("flight_nurse");

        assert_eq!(role.label(), "FLIGHT NURSE");
        assert_eq!(role.badge_theme(), BadgeTheme::Neutral);
    }

    #[test]
    fn labels_and_themes_are_paired() {
        assert_eq!(Role::HrRecruiter.label(), "HR / RECRUITER");
        assert_eq!(Role::AdvanceParamedic.badge_theme(), BadgeTheme::Red);
        assert_eq!(Role::Emr.badge_theme(), BadgeTheme::Emerald);
    }
}
