//! Text helpers applied to fixture fields before they are stored.

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use std::sync::OnceLock;

/// Domain hardcoded in fixture texts, replaced by the configured domain.
pub const LEGACY_DOMAIN: &str = "juice-sh.op";

/// Brand name hardcoded in fixture texts, replaced by the configured name.
pub const LEGACY_BRAND: &str = "OWASP Juice Shop";

/// Embedded media widget that is swapped for the configured bonus payload.
pub const LEGACY_WIDGET: &str = r#"<iframe width="100%" height="166" scrolling="no" frameborder="no" allow="autoplay" src="https://w.soundcloud.com/player/?url=https%3A//api.soundcloud.com/tracks/771984076&color=%23ff5500&auto_play=true&hide_related=false&show_comments=true&show_user=true&show_reposts=false&show_teaser=true"></iframe>"#;

pub const DELUXE_TOKEN_LENGTH: usize = 32;

/// Settings the substitutions draw from.
#[derive(Debug, Clone, Copy)]
pub struct Branding<'a> {
    pub domain: &'a str,
    pub name: &'a str,
}

/// Appends the application domain unless the fixture carries its own.
#[must_use]
pub fn compose_email(raw: &str, custom_domain: bool, domain: &str) -> String {
    if custom_domain {
        raw.to_string()
    } else {
        format!("{raw}@{domain}")
    }
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"));
    re.is_match(email)
}

/// Random alphanumeric string of `length` characters.
#[must_use]
pub fn generate_token(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Escapes `& < > " '`.
#[must_use]
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Replaces the legacy domain and brand without escaping.
#[must_use]
pub fn brand_text(text: &str, branding: Branding<'_>) -> String {
    text.replace(LEGACY_DOMAIN, branding.domain)
        .replace(LEGACY_BRAND, branding.name)
}

/// Escaped challenge description with branding applied and the legacy
/// widget replaced by the encoded bonus payload.
#[must_use]
pub fn sanitize_description(text: &str, branding: Branding<'_>, bonus_payload: &str) -> String {
    let escaped = brand_text(&escape_html(text), branding);
    escaped.replace(&escape_html(LEGACY_WIDGET), &escape_html(bonus_payload))
}

#[must_use]
pub fn sanitize_hint(text: &str, branding: Branding<'_>) -> String {
    brand_text(&escape_html(text), branding)
}

/// Masks everything but the tail of the author's email: `(***<email[3..]>)`.
#[must_use]
pub fn authored_comment(comment: &str, author: Option<&str>) -> String {
    match author {
        Some(email) => {
            let tail: String = email.chars().skip(3).collect();
            format!("{comment} (***{tail})")
        }
        None => format!("{comment} (anonymous)"),
    }
}
