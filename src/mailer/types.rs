use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the booking emails need to know about an appointment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentEmail {
    pub buyer_name: String,
    pub buyer_email: String,
    pub seller_name: String,
    pub seller_email: String,
    pub property_title: String,
    pub property_address: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub bid_amount: f64,
}

/// A rendered message ready for a transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}
