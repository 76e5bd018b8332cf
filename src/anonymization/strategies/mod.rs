//! Built-in anonymization strategies
//!
//! Every built-in derives its pseudorandomness from a keyed hash of
//! `(seed, value)` rather than an RNG, so outputs are stable across calls,
//! instances, and process restarts. A keyed hash (not a bare fast hash) is
//! required to resist precomputed dictionary attacks against low-entropy
//! inputs such as short strings.

pub mod address;
pub mod credit_card;
pub mod custom;
pub mod date;
pub mod email;
pub mod hash;
pub mod ip_address;
pub mod name;
pub mod phone;
pub mod preserve;
pub mod redact;
pub mod text_redaction;

use crate::anonymization::registry::StrategyRegistry;
use crate::anonymization::strategy::Strategy;
use crate::domain::Result;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Keyed digest of a value under a seed.
///
/// HMAC-SHA256 with the big-endian seed bytes as key and the value as
/// message. All built-in strategies draw their deterministic bytes from
/// this one derivation.
pub(crate) fn keyed_bytes(seed: i64, value: &str) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(&seed.to_be_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(value.as_bytes());
    mac.finalize().into_bytes().into()
}

/// First eight digest bytes as an unsigned index.
pub(crate) fn index_from(bytes: &[u8]) -> u64 {
    let mut eight = [0u8; 8];
    eight.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(eight)
}

/// Null and empty-string inputs pass through every strategy unchanged.
pub(crate) fn is_passthrough(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Registers the built-in strategy vocabulary into a registry.
///
/// Caller-supplied functions are not part of this closed set; they enter
/// the registry under caller-chosen names via
/// [`StrategyRegistry::register_function`].
pub fn register_builtins(registry: &mut StrategyRegistry) -> Result<()> {
    registry.register("hash", Arc::new(|cfg, seeds| {
        Ok(Arc::new(hash::HashStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("email", Arc::new(|cfg, seeds| {
        Ok(Arc::new(email::EmailMaskingStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("phone", Arc::new(|cfg, seeds| {
        Ok(Arc::new(phone::PhoneMaskingStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("credit_card", Arc::new(|cfg, seeds| {
        Ok(Arc::new(credit_card::CreditCardMaskingStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("name", Arc::new(|cfg, seeds| {
        Ok(Arc::new(name::NameMaskingStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("date", Arc::new(|cfg, seeds| {
        Ok(Arc::new(date::DateMaskingStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("address", Arc::new(|cfg, seeds| {
        Ok(Arc::new(address::AddressMaskingStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("ip_address", Arc::new(|cfg, seeds| {
        Ok(Arc::new(ip_address::IpAddressMaskingStrategy::from_config(cfg, seeds)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("redact", Arc::new(|cfg, _seeds| {
        Ok(Arc::new(redact::RedactStrategy::from_config(cfg)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("text_redaction", Arc::new(|cfg, _seeds| {
        Ok(Arc::new(text_redaction::TextRedactionStrategy::from_config(cfg)?) as Arc<dyn Strategy>)
    }))?;
    registry.register("preserve", Arc::new(|_cfg, _seeds| {
        Ok(Arc::new(preserve::PreserveStrategy::new()) as Arc<dyn Strategy>)
    }))?;
    Ok(())
}
