//! SMI application types from SNMPv2-SMI and their SMIv1 aliases.

use crate::constraint::{Constraint, ValueRange};
use crate::diagnostics::FileLocation;
use crate::types::{ElementType, Type, TypeTag};
use crate::value::{NumberValue, Value};

/// Application types of SNMPv2-SMI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinBaseType {
    /// Signed 32-bit integer (-2147483648..2147483647).
    Integer32,
    /// 32-bit counter (0..4294967295), monotonically increasing, wraps.
    Counter32,
    /// 64-bit counter (0..18446744073709551615).
    Counter64,
    /// 32-bit gauge (0..4294967295), can increase or decrease.
    Gauge32,
    /// Unsigned 32-bit integer (0..4294967295).
    Unsigned32,
    /// Time in hundredths of a second (0..4294967295).
    TimeTicks,
    /// IPv4 address as 4 octets in network byte order.
    IpAddress,
    /// Arbitrary ASN.1 data (discouraged).
    Opaque,
}

impl BuiltinBaseType {
    /// Canonical name of this base type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer32 => "Integer32",
            Self::Counter32 => "Counter32",
            Self::Counter64 => "Counter64",
            Self::Gauge32 => "Gauge32",
            Self::Unsigned32 => "Unsigned32",
            Self::TimeTicks => "TimeTicks",
            Self::IpAddress => "IpAddress",
            Self::Opaque => "Opaque",
        }
    }

    /// Look up a base type by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|t| t.name() == name)
    }

    /// Valid value range, `None` for the octet string types.
    #[must_use]
    pub const fn range(self) -> Option<(i128, i128)> {
        match self {
            Self::Integer32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::Counter32 | Self::Gauge32 | Self::Unsigned32 | Self::TimeTicks => {
                Some((0, u32::MAX as i128))
            }
            Self::Counter64 => Some((0, u64::MAX as i128)),
            Self::IpAddress | Self::Opaque => None,
        }
    }

    /// `[APPLICATION n]` tag, `None` for `Integer32`, which is a plain
    /// subrange of `INTEGER`.
    #[must_use]
    pub const fn tag(self) -> Option<TypeTag> {
        let number = match self {
            Self::Integer32 => return None,
            Self::IpAddress => 0,
            Self::Counter32 => 1,
            Self::Gauge32 | Self::Unsigned32 => 2,
            Self::TimeTicks => 3,
            Self::Opaque => 4,
            Self::Counter64 => 6,
        };
        Some(TypeTag::application(number))
    }

    /// The resolved type a declaration of this base type carries.
    #[must_use]
    pub fn to_type(self) -> Type {
        let ty = match self {
            Self::IpAddress => Type::octet_string().with_constraint(Constraint::fixed_size(4)),
            Self::Opaque => Type::octet_string(),
            Self::Counter64 => Type::integer().with_constraint(Constraint::ValueRange(ValueRange::inclusive(
                Some(Value::integer(0)),
                Some(Value::Number(NumberValue::new(u64::MAX))),
            ))),
            Self::Integer32 => Type::integer().with_constraint(Constraint::range(
                i64::from(i32::MIN),
                i64::from(i32::MAX),
            )),
            Self::Counter32 | Self::Gauge32 | Self::Unsigned32 | Self::TimeTicks => {
                Type::integer().with_constraint(Constraint::range(0, i64::from(u32::MAX)))
            }
        };
        match self.tag() {
            Some(tag) => ty.with_tag(tag),
            None => ty,
        }
    }

    /// Iterate over all base types.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Integer32,
            Self::Counter32,
            Self::Counter64,
            Self::Gauge32,
            Self::Unsigned32,
            Self::TimeTicks,
            Self::IpAddress,
            Self::Opaque,
        ]
        .into_iter()
    }
}

/// RFC1155-SMI names for the SMIv1 application types.
pub const SMIV1_TYPES: &[(&str, BuiltinBaseType)] = &[
    ("Counter", BuiltinBaseType::Counter32),
    ("Gauge", BuiltinBaseType::Gauge32),
    ("TimeTicks", BuiltinBaseType::TimeTicks),
    ("IpAddress", BuiltinBaseType::IpAddress),
    ("Opaque", BuiltinBaseType::Opaque),
];

/// `ObjectName ::= OBJECT IDENTIFIER`.
pub(super) fn object_name() -> Type {
    Type::object_identifier()
}

/// `NetworkAddress ::= CHOICE { internet IpAddress }`.
pub(super) fn network_address(location: &FileLocation) -> Type {
    Type::choice(vec![ElementType::named(
        "internet",
        Type::reference("IpAddress", location.clone()),
    )])
}

/// `ExtUTCTime ::= OCTET STRING (SIZE (11 | 13))`.
pub(super) fn ext_utc_time() -> Type {
    Type::octet_string().with_constraint(Constraint::Size(Box::new(
        Constraint::single(Value::integer(11)).or(Constraint::single(Value::integer(13))),
    )))
}
