const DEFAULT_GREETING_NAME: &str = "EMR";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub qualification: Option<String>,
    pub user_type: Option<String>,
}

impl UserProfile {
    /// First word of the profile name, used in the home greeting.
    pub fn greeting_name(profile: Option<&UserProfile>) -> String {
        profile
            .and_then(|profile| profile.name.as_deref())
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or(DEFAULT_GREETING_NAME)
            .to_owned()
    }
}
