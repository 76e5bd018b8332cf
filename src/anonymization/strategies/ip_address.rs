//! IP address masking strategy

use super::{is_passthrough, keyed_bytes};
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Masks IP addresses while preserving a configured leading subnet.
///
/// Both address families are supported: v4 keeps `preserve_octets` leading
/// octets, v6 keeps `preserve_segments` leading 16-bit segments. The
/// remaining components are replaced deterministically from a keyed hash
/// of the whole address.
///
/// Parameters:
/// - `preserve_octets`: leading v4 octets kept (default 2)
/// - `preserve_segments`: leading v6 segments kept (default 4)
pub struct IpAddressMaskingStrategy {
    seed: i64,
    preserve_octets: usize,
    preserve_segments: usize,
}

impl IpAddressMaskingStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        let preserve_octets = config.param_usize("preserve_octets")?.unwrap_or(2);
        if preserve_octets > 4 {
            return Err(CloakError::Configuration(
                "strategy 'ip_address': parameter 'preserve_octets' must be at most 4".to_string(),
            ));
        }
        let preserve_segments = config.param_usize("preserve_segments")?.unwrap_or(4);
        if preserve_segments > 8 {
            return Err(CloakError::Configuration(
                "strategy 'ip_address': parameter 'preserve_segments' must be at most 8"
                    .to_string(),
            ));
        }
        Ok(Self {
            seed: seeds.require()?,
            preserve_octets,
            preserve_segments,
        })
    }

    fn mask_v4(&self, addr: Ipv4Addr, original: &str) -> String {
        let digest = keyed_bytes(self.seed, original);
        let mut octets = addr.octets();
        for (i, octet) in octets.iter_mut().enumerate().skip(self.preserve_octets) {
            *octet = digest[i];
        }
        Ipv4Addr::from(octets).to_string()
    }

    fn mask_v6(&self, addr: Ipv6Addr, original: &str) -> String {
        let digest = keyed_bytes(self.seed, original);
        let mut segments = addr.segments();
        for (i, segment) in segments.iter_mut().enumerate().skip(self.preserve_segments) {
            *segment = u16::from_be_bytes([digest[2 * i], digest[2 * i + 1]]);
        }
        Ipv6Addr::from(segments).to_string()
    }
}

impl Strategy for IpAddressMaskingStrategy {
    fn name(&self) -> &str {
        "ip_address"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        let text = value.as_str().ok_or_else(|| {
            CloakError::strategy_execution("ip_address", "expected a text value")
        })?;

        if let Ok(v4) = text.parse::<Ipv4Addr>() {
            return Ok(Value::String(self.mask_v4(v4, text)));
        }
        if let Ok(v6) = text.parse::<Ipv6Addr>() {
            return Ok(Value::String(self.mask_v6(v6, text)));
        }
        Err(CloakError::strategy_execution(
            "ip_address",
            "value is not an IPv4 or IPv6 address",
        ))
    }
}
