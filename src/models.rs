use chrono::NaiveDateTime;

/// Form fields Slack posts for a slash command. Missing fields are left empty
/// so that validation, not extraction, rejects the request.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct SlashCommand {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LastLogin {
    Found(NaiveDateTime),
    NotFound,
    UpstreamFailure(String),
}
