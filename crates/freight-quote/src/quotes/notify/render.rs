use std::fmt::Write as _;

use crate::quotes::domain::QuoteRequest;

pub const NOTIFICATION_SUBJECT: &str = "New Cold Transport Quote Request";
const ABSENT: &str = "—";

/// Subject plus plain-text and HTML bodies for one quote notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub fn render(request: &QuoteRequest, submitted_at: &str) -> NotificationMessage {
    NotificationMessage {
        subject: NOTIFICATION_SUBJECT.to_string(),
        text: render_text(request, submitted_at),
        html: render_html(request, submitted_at),
    }
}

fn render_text(request: &QuoteRequest, submitted_at: &str) -> String {
    let company = request.company.as_deref().unwrap_or(ABSENT);
    [
        NOTIFICATION_SUBJECT.to_string(),
        "=".repeat(NOTIFICATION_SUBJECT.len()),
        String::new(),
        format!("Name:      {}", request.name),
        format!("Company:   {}", company),
        format!("Email:     {}", request.email),
        format!("Phone:     {}", request.phone),
        String::new(),
        format!("Pickup:    {}", request.pickup),
        format!("Delivery:  {}", request.delivery),
        String::new(),
        format!("Freight:   {}", request.freight_summary()),
        String::new(),
        format!("Submitted: {}", submitted_at),
    ]
    .join("\n")
}

fn render_html(request: &QuoteRequest, submitted_at: &str) -> String {
    let company = request.company.as_deref().unwrap_or(ABSENT);
    let freight = request.freight_summary();
    let rows = [
        ("Name", request.name.as_str()),
        ("Company", company),
        ("Email", request.email.as_str()),
        ("Phone", request.phone.as_str()),
        ("Pickup", request.pickup.as_str()),
        ("Delivery", request.delivery.as_str()),
        ("Freight Type", freight.as_str()),
        ("Submitted", submitted_at),
    ];

    let mut html = format!("<h2>{}</h2>\n", NOTIFICATION_SUBJECT);
    for (label, value) in rows {
        let _ = writeln!(
            html,
            "<p><strong>{}:</strong> {}</p>",
            label,
            html_escape::encode_text(value)
        );
    }
    html
}
