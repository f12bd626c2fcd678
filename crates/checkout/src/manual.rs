//! Manual order channel: a preformatted chat message plus a link that opens it.

use common::{LineItem, Money};

use crate::error::ManualChannelError;

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Customer fields for a manual order. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Formatted message and where to send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualOrderMessage {
    pub text: String,
    pub destination: String,
}

/// Formats carts as chat messages addressed to the store's phone.
#[derive(Debug, Clone)]
pub struct ManualChannel {
    phone_digits: String,
}

impl ManualChannel {
    /// Non-digit characters in `destination_phone` are dropped.
    pub fn new(destination_phone: &str) -> Self {
        Self {
            phone_digits: destination_phone
                .chars()
                .filter(char::is_ascii_digit)
                .collect(),
        }
    }

    /// Builds the message text and its destination link. Nothing is stored.
    pub fn format(
        &self,
        items: &[LineItem],
        customer: &ManualCustomer,
    ) -> Result<ManualOrderMessage, ManualChannelError> {
        if items.is_empty() {
            return Err(ManualChannelError::NoItems);
        }

        let subtotal: Money = items.iter().map(LineItem::line_total).sum();
        let mut lines = vec!["New order request".to_string(), String::new()];
        lines.extend(items.iter().enumerate().map(|(i, item)| {
            format!(
                "{}. {} × {} = {}",
                i + 1,
                item.display_name(),
                item.quantity,
                item.line_total()
            )
        }));
        lines.push(String::new());
        lines.push(format!("Subtotal: {subtotal}"));

        let fields = [
            ("Name", &customer.name),
            ("Phone", &customer.phone),
            ("Address", &customer.address),
            ("Notes", &customer.notes),
        ];
        let provided: Vec<String> = fields
            .iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{label}: {v}"))
            })
            .collect();
        if !provided.is_empty() {
            lines.push(String::new());
            lines.extend(provided);
        }
        let text = lines.join("\n");

        let destination = format!(
            "{WHATSAPP_BASE_URL}/{}?text={}",
            self.phone_digits,
            urlencoding::encode(&text)
        );

        tracing::debug!(lines = items.len(), "formatted manual order message");

        Ok(ManualOrderMessage { text, destination })
    }
}
