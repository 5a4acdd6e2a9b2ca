//! Single-byte enums stored in account data
//!
//! The program may add variants in later versions, so every enum keeps an
//! `Unknown(u8)` fallback instead of rejecting unrecognised bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
            Unknown(u8),
        }

        impl $name {
            pub fn from_u8(value: u8) -> Self {
                match value {
                    $($value => Self::$variant,)+
                    other => Self::Unknown(other),
                }
            }

            pub fn to_u8(self) -> u8 {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Unknown(other) => other,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unknown(_) => "unknown",
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                Self::from_u8(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    Self::Unknown(code) => write!(f, "unknown({})", code),
                    known => f.write_str(known.as_str()),
                }
            }
        }
    };
}

byte_enum! {
    /// Lifecycle state of a market
    pub enum MarketStatus {
        Active = 0 => "active",
        Closed = 1 => "closed",
        Resolved = 2 => "resolved",
        Cancelled = 3 => "cancelled",
        Paused = 4 => "paused",
        ResolvedPending = 5 => "resolved_pending",
        Disputed = 6 => "disputed",
    }
}

byte_enum! {
    /// Currency the pools are denominated in
    pub enum Currency {
        Sol = 0 => "sol",
        Usdc = 1 => "usdc",
    }
}

byte_enum! {
    /// Visibility tier of a market
    pub enum Layer {
        Public = 0 => "public",
        Community = 1 => "community",
        Private = 2 => "private",
    }
}

byte_enum! {
    /// Who may place bets
    pub enum AccessGate {
        Public = 0 => "public",
        Whitelist = 1 => "whitelist",
        InviteHash = 2 => "invite_hash",
    }
}

byte_enum! {
    /// Who proposes the outcome
    pub enum ResolutionMode {
        Platform = 0 => "platform",
        HostOracle = 1 => "host_oracle",
        Council = 2 => "council",
    }
}

impl MarketStatus {
    /// Bets are only accepted while active
    pub fn accepts_bets(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Winning positions can be claimed
    pub fn is_claimable(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Stakes are returned instead of paid out
    pub fn is_refundable(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Access gate actually in force for a market.
///
/// The program only honours a restricted gate on private markets; public and
/// community markets are open whatever byte is stored.
pub fn effective_access_gate(layer: Layer, stored: AccessGate) -> AccessGate {
    match layer {
        Layer::Private => stored,
        _ => AccessGate::Public,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roundtrip() {
        for code in 0..=6u8 {
            let status = MarketStatus::from_u8(code);
            assert!(status.is_known());
            assert_eq!(status.to_u8(), code);
        }
    }

    #[test]
    fn test_unknown_fallback() {
        let status = MarketStatus::from_u8(42);
        assert_eq!(status, MarketStatus::Unknown(42));
        assert_eq!(status.to_u8(), 42);
        assert_eq!(status.to_string(), "unknown(42)");
        assert_eq!(Layer::from(9), Layer::Unknown(9));
    }

    #[test]
    fn test_effective_gate_only_restricts_private() {
        assert_eq!(
            effective_access_gate(Layer::Private, AccessGate::Whitelist),
            AccessGate::Whitelist
        );
        assert_eq!(
            effective_access_gate(Layer::Public, AccessGate::Whitelist),
            AccessGate::Public
        );
        assert_eq!(
            effective_access_gate(Layer::Community, AccessGate::InviteHash),
            AccessGate::Public
        );
        assert_eq!(
            effective_access_gate(Layer::Unknown(7), AccessGate::Whitelist),
            AccessGate::Public
        );
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(MarketStatus::ResolvedPending.to_string(), "resolved_pending");
        assert_eq!(ResolutionMode::HostOracle.to_string(), "host_oracle");
    }
}
