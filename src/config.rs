use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "last-login", about = "Slack slash commands: /last-login and /hello-there")]
pub struct Config {
    /// Address the slash-command server listens on.
    #[arg(long, env = "LAST_LOGIN_BIND", default_value = "0.0.0.0:3000")]
    pub bind: String,

    #[arg(long, env = "SLACK_API_BASE", default_value = "https://slack.com/api")]
    pub slack_api_base: String,

    /// User token allowed to read `team.accessLogs`.
    #[arg(long, env = "SLACK_OAUTH_TOKEN", hide_env_values = true)]
    pub slack_oauth_token: String,

    #[arg(long, env = "SLACK_VERIFICATION_TOKEN", hide_env_values = true)]
    pub verification_token: String,

    #[arg(long, env = "SLACK_TEAM_ID")]
    pub team_id: String,
}
