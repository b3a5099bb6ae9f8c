//! SMS carrier gateway directory.
//!
//! Maps a carrier name to the email domain of its email-to-text gateway.
//! Recipients may also store a custom domain in place of a carrier name.

/// Sentinel carrier name for a user-supplied gateway domain.
pub const CUSTOM_CARRIER: &str = "Custom";

/// Known carrier gateways, in display order.
pub const CARRIER_GATEWAYS: &[(&str, &str)] = &[
    ("Verizon", "vtext.com"),
    ("AT&T", "txt.att.net"),
    ("T-Mobile", "tmomail.net"),
    ("Sprint", "messaging.sprintpcs.com"),
    ("Boost Mobile", "sms.alltel.net"),
    ("MetroPCS", "mymetropcs.com"),
    ("Cricket", "mms.aiowireless.net"),
    ("US Cellular", "email.uscc.net"),
];

/// Carrier names for pick lists.
pub fn carrier_names() -> impl Iterator<Item = &'static str> {
    CARRIER_GATEWAYS.iter().map(|(name, _)| *name)
}

/// Gateway domain for a known carrier name.
pub fn lookup(carrier: &str) -> Option<&'static str> {
    CARRIER_GATEWAYS
        .iter()
        .find(|(name, _)| *name == carrier)
        .map(|(_, domain)| *domain)
}

/// Resolve a stored carrier value to a domain.
///
/// Unknown values are treated as custom domains and returned unchanged.
pub fn gateway_domain(carrier: &str) -> &str {
    lookup(carrier).unwrap_or(carrier)
}

/// `phone@domain` address for the email-to-text gateway.
pub fn gateway_address(phone: &str, carrier: &str) -> String {
    format!("{phone}@{}", gateway_domain(carrier))
}
