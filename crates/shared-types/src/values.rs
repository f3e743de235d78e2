//! # Validated Value Types
//!
//! Small immutable wrappers that refuse to exist in an invalid state.
//! The only admission path for each type is its validating constructor
//! (`of` / `parse`); there are no setters and equality is by wrapped value.
//!
//! | Family | Wraps | Rule |
//! |--------|-------|------|
//! | Identifiers | `U256` | decimal, non-negative; `0` is the absent sentinel |
//! | Text | `String` | non-empty |
//! | [`EthereumAddress`] | `String` | `0x` + 40 hex digits; all-zero is the unknown sentinel |
//! | [`Timestamp`] | `u64` | non-negative seconds since epoch |

use std::fmt;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

const VALUE: &str = "value";

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(U256);

        impl $name {
            /// The "uninitialized/absent" sentinel.
            pub const SENTINEL: Self = Self(U256::ZERO);

            pub fn of(value: impl Into<U256>) -> Self {
                Self(value.into())
            }

            /// Parse a stringified decimal integer as returned by the chain.
            pub fn parse(value: &str) -> Result<Self, ValidationError> {
                parse_uint(value).map(Self)
            }

            pub fn value(&self) -> U256 {
                self.0
            }

            pub fn is_sentinel(&self) -> bool {
                self.0.is_zero()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self::of(U256::from(value))
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }
    };
}

fn parse_uint(value: &str) -> Result<U256, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::single(value, VALUE, "should not be empty"));
    }
    let invalid = || ValidationError::single(value, VALUE, "must be a non-negative integer");
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    U256::from_str_radix(value, 10).map_err(|_| invalid())
}

identifier!(
    /// Identifier of an agent registered in the `Agents` contract.
    AgentId
);
identifier!(
    /// Identifier of a device registered in the `Devices` contract.
    DeviceId
);
identifier!(
    /// Identifier of an action tracked by the `Actions` contract.
    ActionId
);
identifier!(
    /// Identifier of a challenge tracked by the `Challenges` contract.
    ChallengeId
);
identifier!(
    /// Identifier of a policy.
    PolicyId
);
identifier!(
    /// Identifier of an organization.
    OrganizationId
);

// =============================================================================
// TEXT
// =============================================================================

macro_rules! text {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn of(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::single(value, VALUE, "should not be empty"));
                }
                Ok(Self(value))
            }

            pub fn value(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::of(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

text!(AgentName);
text!(AgentUsername);
text!(DeviceName);
text!(
    /// Push token of a device.
    DeviceToken
);
text!(ChallengeTitle);
text!(ChallengeMessage);
text!(
    /// Logical contract name registered in the domain name system.
    DomainName
);
text!(ObsoleteDeviceReason);
text!(PolicyTitle);

// =============================================================================
// ADDRESS
// =============================================================================

/// A 20-byte account or contract address in `0x`-prefixed hex form.
///
/// The exact admitted string is retained (no case normalization), so equality
/// is textual. [`EthereumAddress::zero`] is the "unknown/unset" sentinel.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EthereumAddress(String);

impl EthereumAddress {
    pub const ZERO: &'static str = "0x0000000000000000000000000000000000000000";

    pub fn of(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::single(value, VALUE, "should not be empty"));
        }
        if !is_address(&value) {
            return Err(ValidationError::single(
                value,
                VALUE,
                "must be an Ethereum address",
            ));
        }
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(Self::ZERO.to_string())
    }

    pub fn from_address(address: Address) -> Self {
        Self(format!("0x{}", hex::encode(address.as_slice())))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// True for the all-zero sentinel, regardless of letter case.
    pub fn is_unknown(&self) -> bool {
        self.to_address() == Address::ZERO
    }

    pub fn to_address(&self) -> Address {
        // Admission already checked the shape.
        let mut bytes = [0u8; 20];
        if hex::decode_to_slice(&self.0[2..], &mut bytes).is_err() {
            return Address::ZERO;
        }
        Address::from(bytes)
    }
}

fn is_address(value: &str) -> bool {
    let Some(digits) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) else {
        return false;
    };
    digits.len() == 40 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthereumAddress({})", self.0)
    }
}

impl TryFrom<String> for EthereumAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(value)
    }
}

impl From<EthereumAddress> for String {
    fn from(value: EthereumAddress) -> Self {
        value.0
    }
}

// =============================================================================
// TIMESTAMP
// =============================================================================

/// Seconds since the Unix epoch, as recorded by the chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn of(seconds: u64) -> Self {
        Self(seconds)
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::single(value, VALUE, "should not be empty"));
        }
        value
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::single(value, VALUE, "must be a non-negative integer"))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.0.to_string()
    }
}
