use serde::{Deserialize, Serialize};

/// FAQ accordion settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccordionConfig {
    /// One entry per match.
    pub item: String,
    /// Trigger looked up inside each entry.
    pub trigger: String,
    /// Content panel looked up inside each entry.
    pub panel: String,
    /// Duration of the `max-height` transition (ms). Zero completes instantly.
    pub transition_ms: u64,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            item: ".faq-item".to_string(),
            trigger: ".faq-question".to_string(),
            panel: ".faq-answer".to_string(),
            transition_ms: 350,
        }
    }
}

/// In-page navigation and mobile menu settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Links whose `href` names an in-page target.
    pub anchor_selector: String,
    /// Buttons whose `data-scroll` attribute names an in-page target.
    pub scroll_button_selector: String,
    /// Smooth scroll tween duration (ms).
    pub smooth_scroll_ms: u64,
    pub menu_toggle: String,
    pub mobile_menu: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            anchor_selector: "a[href^=\"#\"]".to_string(),
            scroll_button_selector: "[data-scroll]".to_string(),
            smooth_scroll_ms: 450,
            menu_toggle: ".menu-toggle".to_string(),
            mobile_menu: "#mobile-menu".to_string(),
        }
    }
}

/// Header and footer settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub selector: String,
    /// Vertical scroll (px) past which the header gets `is-scrolled`.
    pub scrolled_threshold: f64,
    /// Element whose text becomes the current year.
    pub year_selector: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            selector: ".site-header".to_string(),
            scrolled_threshold: 50.0,
            year_selector: "[data-year]".to_string(),
        }
    }
}

/// Lines of the contact form message. Empty fields fall back to the
/// matching `*_fallback` text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormTemplate {
    pub greeting: String,
    pub name_label: String,
    pub name_fallback: String,
    pub contact_label: String,
    pub contact_fallback: String,
    pub message_label: String,
    pub message_fallback: String,
}

impl Default for FormTemplate {
    fn default() -> Self {
        Self {
            greeting: "Здравствуйте! Заявка с сайта.".to_string(),
            name_label: "Имя".to_string(),
            name_fallback: "Не указано".to_string(),
            contact_label: "Контакт".to_string(),
            contact_fallback: "Не указан".to_string(),
            message_label: "Сообщение".to_string(),
            message_fallback: "Без сообщения".to_string(),
        }
    }
}

/// Message sent from a price card button.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InterestTemplate {
    pub prefix: String,
    pub title_fallback: String,
    pub suffix: String,
}

impl Default for InterestTemplate {
    fn default() -> Self {
        Self {
            prefix: "Здравствуйте! Меня интересует: ".to_string(),
            title_fallback: "Проект".to_string(),
            suffix: ". Хотел(а) бы обсудить детали.".to_string(),
        }
    }
}

/// Outbound chat link settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutboundConfig {
    pub base_url: String,
    /// Destination number in international format, digits only.
    pub phone: String,
    pub form_selector: String,
    pub price_button_selector: String,
    pub price_card_selector: String,
    pub price_title_selector: String,
    pub price_value_selector: String,
    pub form: FormTemplate,
    pub interest: InterestTemplate,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wa.me".to_string(),
            phone: "77713226575".to_string(),
            form_selector: ".contact-form".to_string(),
            price_button_selector: "#price .price-card .btn-secondary"
                .to_string(),
            price_card_selector: ".price-card".to_string(),
            price_title_selector: "h4".to_string(),
            price_value_selector: ".price".to_string(),
            form: FormTemplate::default(),
            interest: InterestTemplate::default(),
        }
    }
}
