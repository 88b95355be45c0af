//! Wire payload for `POST /api/v1/emails`

use chrono::NaiveDate;
use serde::Serialize;

use crate::address::normalize;
use crate::config::ConnectionConfig;
use crate::providers::Slugger;
use crate::types::{Address, OutboundMessage, Priority};

/// JSON body sent to the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPayload {
    pub from_email: String,
    pub from_name: String,
    pub priority: Priority,
    pub campaign: String,
    pub recipients: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub template: TemplatePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplatePayload {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl DeliveryPayload {
    /// Assemble the payload for `message`, dated `today`
    pub fn build(
        message: &OutboundMessage,
        config: &ConnectionConfig,
        slugger: &dyn Slugger,
        today: NaiveDate,
    ) -> Self {
        Self {
            from_email: message.from.email.clone(),
            from_name: message.from.name.clone(),
            priority: message.priority,
            campaign: campaign_slug(config.project(), today, slugger),
            recipients: normalize(&message.to),
            cc: normalize(&message.cc),
            bcc: normalize(&message.bcc),
            template: TemplatePayload {
                subject: message.subject.clone(),
                html: message.html_body.clone().unwrap_or_default(),
                text: message.text_body.clone().unwrap_or_default(),
            },
        }
    }
}

/// Slug of `"{project} - {YYYY-MM-DD}"`, or just the date without a project
pub fn campaign_slug(project: Option<&str>, date: NaiveDate, slugger: &dyn Slugger) -> String {
    let date = date.format("%Y-%m-%d");
    let label = match project {
        Some(project) => format!("{} - {}", project, date),
        None => date.to_string(),
    };
    slugger.slug(&label)
}
