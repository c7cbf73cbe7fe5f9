//! Prefilled chat links built from the contact form and price cards.

use pageflow_config::{FormTemplate, InterestTemplate, OutboundConfig};

use crate::error::CoreError;
use crate::page::{ElementId, Page, Selector};

/// Form controls that contribute to the message.
pub const FORM_FIELDS: &str = "[name]";

/// Fields read from the contact form, keyed by input `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub contact: String,
    pub message: String,
}

pub fn form_message(template: &FormTemplate, fields: &FormFields) -> String {
    let or = |value: &str, fallback: &str| {
        let value = value.trim();
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };
    [
        template.greeting.clone(),
        format!(
            "{}: {}",
            template.name_label,
            or(&fields.name, &template.name_fallback)
        ),
        format!(
            "{}: {}",
            template.contact_label,
            or(&fields.contact, &template.contact_fallback)
        ),
        format!(
            "{}: {}",
            template.message_label,
            or(&fields.message, &template.message_fallback)
        ),
    ]
    .join("\n")
}

pub fn interest_message(template: &InterestTemplate, title: &str, price: Option<&str>) -> String {
    let title = title.trim();
    let title = if title.is_empty() {
        template.title_fallback.as_str()
    } else {
        title
    };
    let mut message = format!("{}{title}", template.prefix);
    if let Some(price) = price.map(str::trim).filter(|price| !price.is_empty()) {
        message.push_str(&format!(" ({price})"));
    }
    message.push_str(&template.suffix);
    message
}

#[derive(Debug)]
pub struct Outbound {
    config: OutboundConfig,
    form: Option<ElementId>,
    price_buttons: Vec<ElementId>,
    card: Selector,
    title: Selector,
    price: Selector,
    fields: Selector,
}

impl Outbound {
    pub fn new(page: &Page, config: &OutboundConfig) -> Result<Self, CoreError> {
        let form = CoreError::selector("outbound.form_selector", &config.form_selector)?;
        let buttons =
            CoreError::selector("outbound.price_button_selector", &config.price_button_selector)?;
        Ok(Self {
            form: page.query_first(&form),
            price_buttons: page.query_all(&buttons),
            card: CoreError::selector("outbound.price_card_selector", &config.price_card_selector)?,
            title: CoreError::selector(
                "outbound.price_title_selector",
                &config.price_title_selector,
            )?,
            price: CoreError::selector(
                "outbound.price_value_selector",
                &config.price_value_selector,
            )?,
            fields: CoreError::selector("outbound form fields", FORM_FIELDS)?,
            config: config.clone(),
        })
    }

    /// `<base>/<phone>?text=<message>` with the message percent-encoded.
    pub fn link(&self, message: &str) -> String {
        format!(
            "{}/{}?text={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.phone,
            urlencoding::encode(message)
        )
    }

    /// Contact form submitted: compose the request, reset the form and
    /// return the link to open.
    pub fn on_submit(&self, page: &mut Page, target: ElementId) -> Option<String> {
        let form = self.form.filter(|form| page.contains(*form, target))?;
        let inputs = page.query_within(form, &self.fields);

        let mut fields = FormFields::default();
        for input in &inputs {
            let value = page.attribute(*input, "value").unwrap_or_default().to_string();
            match page.attribute(*input, "name") {
                Some("name") => fields.name = value,
                Some("contact") => fields.contact = value,
                Some("message") => fields.message = value,
                _ => {}
            }
        }
        for input in inputs {
            page.set_attribute(input, "value", "");
        }

        log::debug!("outbound: contact form submitted");
        Some(self.link(&form_message(&self.config.form, &fields)))
    }

    /// Price card button clicked: link asking about that offer.
    pub fn on_click(&self, page: &Page, target: ElementId) -> Option<String> {
        let button = self
            .price_buttons
            .iter()
            .copied()
            .find(|button| page.contains(*button, target))?;
        let card = page.closest(button, &self.card)?;

        let title = page
            .query_first_within(card, &self.title)
            .and_then(|title| page.text(title))
            .unwrap_or_default();
        let price = page
            .query_first_within(card, &self.price)
            .and_then(|price| page.text(price));

        log::debug!("outbound: price card {}", page.describe(card));
        Some(self.link(&interest_message(&self.config.interest, title, price)))
    }
}
