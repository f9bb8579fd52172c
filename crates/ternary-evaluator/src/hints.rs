//! Domain-specific next-step hints
//!
//! A static lookup table keyed by domain tag, matched case-insensitively.
//! Configured entries in
//! [`EngineConfig::domain_hints`](crate::EngineConfig) take precedence over
//! the built-in ones.

use crate::EngineConfig;

const FINANCIAL: &[&str] = &[
    "Consider market volatility and liquidity conditions",
    "Review risk management protocols",
    "Consult market data providers for additional signals",
];

const MEDICAL: &[&str] = &[
    "Order additional diagnostic tests",
    "Consult specialist colleagues",
    "Review patient history for additional context",
];

const POLICY: &[&str] = &[
    "Conduct stakeholder consultation",
    "Review policy precedents and case studies",
    "Assess potential unintended consequences",
];

/// Built-in hints for a domain tag (case-insensitive)
pub fn builtin_hints(domain: &str) -> &'static [&'static str] {
    match domain.to_lowercase().as_str() {
        "financial" => FINANCIAL,
        "medical" => MEDICAL,
        "policy" => POLICY,
        _ => &[],
    }
}

/// Hints to append to an EPISTEMIC_HOLD for the configured domain
pub fn hints_for(config: &EngineConfig) -> Vec<String> {
    let Some(domain) = config.domain.as_deref() else {
        return Vec::new();
    };

    let configured = config
        .domain_hints
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(domain));

    match configured {
        Some((_, custom)) => custom.clone(),
        None => builtin_hints(domain).iter().map(|s| s.to_string()).collect(),
    }
}
