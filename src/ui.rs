use crate::{ models::LastLogin, utils::humanize_at };
use chrono::NaiveDateTime;
use serde_json::{ json, Value };

const GRIEVOUS_IMAGE_URL: &str =
    "https://external-content.duckduckgo.com/iu/?u=https%3A%2F%2Fi.ytimg.com%2Fvi%2FfrszEJb0aOo%2Fmaxresdefault.jpg&f=1&nofb=1";

pub fn hello_there_message() -> Value {
    json!({
        "response_type": "in_channel",
        "text": "General Kenobi!",
        "blocks": [
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": "_*General Kenobi!*_" }
            },
            {
                "type": "image",
                "image_url": GRIEVOUS_IMAGE_URL,
                "alt_text": "General Grievous"
            }
        ]
    })
}

pub fn invalid_user_message(command_text: &str) -> Value {
    ephemeral_notice(
        "Please enter a valid user.",
        &format!("Command ran: /last-login {}", command_text),
    )
}

pub fn last_login_message(user_id: &str, outcome: &LastLogin, now: NaiveDateTime) -> Value {
    let text = match outcome {
        LastLogin::Found(last_seen) => {
            format!("<@{}> was last seen {}.", user_id, humanize_at(*last_seen, now))
        }
        LastLogin::NotFound => format!("No login recorded for <@{}>.", user_id),
        LastLogin::UpstreamFailure(_) => format!("Could not get last login for <@{}>.", user_id),
    };
    ephemeral_notice(&text, &format!("Command ran: /last-login <@{}>", user_id))
}

/// Section, divider, then a context line echoing the command.
fn ephemeral_notice(text: &str, context: &str) -> Value {
    json!({
        "response_type": "ephemeral",
        "text": text,
        "blocks": [
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": text }
            },
            { "type": "divider" },
            {
                "type": "context",
                "elements": [{ "type": "mrkdwn", "text": context }]
            }
        ]
    })
}
