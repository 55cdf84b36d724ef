use crate::mailer::types::AppointmentEmail;
use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: #2563eb; color: white; padding: 20px; text-align: center; }
    .content { background: #f9fafb; padding: 30px; border-radius: 8px; margin: 20px 0; }
    .detail { margin: 15px 0; padding: 10px; background: white; border-left: 4px solid #2563eb; }
    .footer { text-align: center; color: #6b7280; font-size: 14px; margin-top: 30px; }
    .button { display: inline-block; padding: 12px 30px; background: #2563eb; color: white;
              text-decoration: none; border-radius: 5px; margin: 20px 0; }
"#;

pub const BUYER_SUBJECT: &str = "Property Viewing Appointment Confirmed - Urban Vault";
pub const SELLER_SUBJECT: &str = "New Viewing Request for Your Property - Urban Vault";

/// e.g. "Monday, March 2, 2026"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn page(heading: &str, body: &str, link: &str, link_label: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><style>{STYLE}</style></head>
<body>
  <div class="container">
    <div class="header"><h1>{heading}</h1></div>
    <div class="content">
{body}
      <center><a href="{link}" class="button">{link_label}</a></center>
    </div>
    <div class="footer"><p>Urban Vault</p></div>
  </div>
</body>
</html>"#
    )
}

pub fn buyer_confirmation(email: &AppointmentEmail, frontend_url: &str) -> String {
    let body = format!(
        r#"      <p>Hi <strong>{buyer}</strong>,</p>
      <p>Your property viewing appointment has been successfully scheduled!</p>
      <div class="detail"><strong>Property:</strong> {title}<br>
        <strong>Address:</strong> {address}</div>
      <div class="detail"><strong>Date:</strong> {date}<br><strong>Time:</strong> {time}</div>
      <div class="detail"><strong>Meeting with:</strong> {seller}</div>
      <p>Please arrive on time. If you need to reschedule or cancel,
        please log in to your dashboard.</p>"#,
        buyer = encode_text(&email.buyer_name),
        title = encode_text(&email.property_title),
        address = encode_text(&email.property_address),
        date = long_date(email.appointment_date),
        time = encode_text(&email.appointment_time),
        seller = encode_text(&email.seller_name),
    );

    page(
        "🏡 Appointment Confirmed",
        &body,
        &dashboard_link(frontend_url),
        "View My Appointments",
    )
}

pub fn seller_alert(email: &AppointmentEmail, frontend_url: &str) -> String {
    let body = format!(
        r#"      <p>Hi <strong>{seller}</strong>,</p>
      <p><strong>{buyer}</strong> has requested to view your property.</p>
      <div class="detail"><strong>Property:</strong> {title}</div>
      <div class="detail"><strong>Date:</strong> {date}<br><strong>Time:</strong> {time}</div>
      <div class="detail"><strong>Offer:</strong> ${bid}</div>
      <p>Log in to your dashboard to confirm or cancel the appointment.</p>"#,
        seller = encode_text(&email.seller_name),
        buyer = encode_text(&email.buyer_name),
        title = encode_text(&email.property_title),
        date = long_date(email.appointment_date),
        time = encode_text(&email.appointment_time),
        bid = email.bid_amount,
    );

    page(
        "📅 New Appointment Request",
        &body,
        &dashboard_link(frontend_url),
        "Manage Appointments",
    )
}

fn dashboard_link(frontend_url: &str) -> String {
    let url = format!("{}/dashboard/appointments", frontend_url.trim_end_matches('/'));
    encode_double_quoted_attribute(&url).into_owned()
}
