use std::fmt::Write;

use serde::{Deserialize, Serialize};
use url::{form_urlencoded::byte_serialize, Url};

use crate::common::error::{QRError, QRResult};

// Content
//------------------------------------------------------------------------------

/// Structured input turned into the text payload of a QR code.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Content {
    Link { url: String },
    Text { text: String },
    Email { to: String, subject: String, body: String },
    Call { number: String },
    Sms { number: String, message: String },
    Vcard(VCard),
    Wifi(Wifi),
    Event(Event),
    // Hosted assets, encoded as links to where they live
    App { url: String },
    Pdf { url: String },
    Image { url: String },
    Video { url: String },
    Social { url: String },
    Barcode { text: String },
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VCard {
    pub name: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub url: String,
    pub address: String,
}

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum WifiAuth {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    Open,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Wifi {
    pub ssid: String,
    pub password: String,
    pub auth: WifiAuth,
    pub hidden: bool,
}

/// Calendar event. Times are iCalendar date-times such as `20250301T090000Z`.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub summary: String,
    pub location: String,
    pub start: String,
    pub end: String,
    pub description: String,
}

impl Content {
    /// Link when the input is an absolute url, plain text otherwise.
    pub fn infer(input: &str) -> Self {
        if is_valid_url(input) {
            Self::Link { url: input.to_string() }
        } else {
            Self::Text { text: input.to_string() }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Link { .. } => "Link",
            Self::Text { .. } => "Text",
            Self::Email { .. } => "E-mail",
            Self::Call { .. } => "Call",
            Self::Sms { .. } => "SMS",
            Self::Vcard(_) => "V-card",
            Self::Wifi(_) => "Wi-Fi",
            Self::Event(_) => "Event",
            Self::App { .. } => "App",
            Self::Pdf { .. } => "PDF",
            Self::Image { .. } => "Images",
            Self::Video { .. } => "Video",
            Self::Social { .. } => "Social Media",
            Self::Barcode { .. } => "2D Barcode",
        }
    }

    /// Text to encode into the symbol.
    pub fn payload(&self) -> QRResult<String> {
        let payload = match self {
            Self::Link { url }
            | Self::App { url }
            | Self::Pdf { url }
            | Self::Image { url }
            | Self::Video { url }
            | Self::Social { url } => {
                if !is_valid_url(url) {
                    return Err(QRError::InvalidUrl(url.clone()));
                }
                url.clone()
            }
            Self::Text { text } | Self::Barcode { text } => text.clone(),
            Self::Email { to, subject, body } => {
                let mut query = Vec::new();
                if !subject.is_empty() {
                    query.push(format!("subject={}", percent_encode(subject)));
                }
                if !body.is_empty() {
                    query.push(format!("body={}", percent_encode(body)));
                }
                if query.is_empty() {
                    format!("mailto:{to}")
                } else {
                    format!("mailto:{to}?{}", query.join("&"))
                }
            }
            Self::Call { number } => format!("tel:{}", strip_spaces(number)),
            Self::Sms { number, message } => format!("SMSTO:{}:{message}", strip_spaces(number)),
            Self::Vcard(card) => card.to_payload(),
            Self::Wifi(wifi) => wifi.to_payload(),
            Self::Event(event) => event.to_payload(),
        };

        if payload.is_empty() {
            return Err(QRError::EmptyData);
        }
        Ok(payload)
    }
}

impl VCard {
    fn to_payload(&self) -> String {
        let mut res = String::from("BEGIN:VCARD\nVERSION:3.0\n");
        let fields = [
            ("FN", &self.name),
            ("ORG", &self.organization),
            ("TITLE", &self.title),
            ("TEL", &self.phone),
            ("EMAIL", &self.email),
            ("URL", &self.url),
            ("ADR", &self.address),
        ];
        for (key, val) in fields.into_iter().filter(|(_, v)| !v.is_empty()) {
            let _ = writeln!(res, "{key}:{}", escape(val, &[',', ';']));
        }
        res.push_str("END:VCARD");
        res
    }
}

impl Wifi {
    fn to_payload(&self) -> String {
        let auth = match self.auth {
            WifiAuth::Wpa => "WPA",
            WifiAuth::Wep => "WEP",
            WifiAuth::Open => "nopass",
        };
        let special = ['\\', ';', ',', ':', '"'];
        let mut res = format!("WIFI:T:{auth};S:{};", escape(&self.ssid, &special));
        if self.auth != WifiAuth::Open {
            let _ = write!(res, "P:{};", escape(&self.password, &special));
        }
        if self.hidden {
            res.push_str("H:true;");
        }
        res.push(';');
        res
    }
}

impl Event {
    fn to_payload(&self) -> String {
        let mut res = String::from("BEGIN:VEVENT\n");
        let fields = [
            ("SUMMARY", &self.summary),
            ("LOCATION", &self.location),
            ("DTSTART", &self.start),
            ("DTEND", &self.end),
            ("DESCRIPTION", &self.description),
        ];
        for (key, val) in fields.into_iter().filter(|(_, v)| !v.is_empty()) {
            let _ = writeln!(res, "{key}:{}", escape(val, &[',', ';']));
        }
        res.push_str("END:VEVENT");
        res
    }
}

/// True when the input parses as an absolute url.
pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

fn percent_encode(s: &str) -> String {
    // form encoding writes spaces as '+', literal '+' is already escaped as %2B
    byte_serialize(s.as_bytes()).collect::<String>().replace('+', "%20")
}

fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn escape(s: &str, special: &[char]) -> String {
    let mut res = String::with_capacity(s.len());
    for ch in s.chars() {
        if special.contains(&ch) {
            res.push('\\');
        }
        res.push(ch);
    }
    res
}
