use std::fmt;

/// DNS record types this server routes and caches.
///
/// The wire value round-trips through `Other` for anything not named here, so
/// unknown types are forwarded and cached like any other query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Srv,
    Txt,
    Https,
    Other(u16),
}

impl RecordType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::A,
            28 => Self::Aaaa,
            5 => Self::Cname,
            15 => Self::Mx,
            2 => Self::Ns,
            12 => Self::Ptr,
            6 => Self::Soa,
            33 => Self::Srv,
            16 => Self::Txt,
            65 => Self::Https,
            other => Self::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Aaaa => 28,
            Self::Cname => 5,
            Self::Mx => 15,
            Self::Ns => 2,
            Self::Ptr => 12,
            Self::Soa => 6,
            Self::Srv => 33,
            Self::Txt => 16,
            Self::Https => 65,
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Aaaa => write!(f, "AAAA"),
            Self::Cname => write!(f, "CNAME"),
            Self::Mx => write!(f, "MX"),
            Self::Ns => write!(f, "NS"),
            Self::Ptr => write!(f, "PTR"),
            Self::Soa => write!(f, "SOA"),
            Self::Srv => write!(f, "SRV"),
            Self::Txt => write!(f, "TXT"),
            Self::Https => write!(f, "HTTPS"),
            Self::Other(code) => write!(f, "TYPE{code}"),
        }
    }
}

/// DNS record class. Almost always `In`, but the cache key carries it so
/// queries differing only in class never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordClass {
    In,
    Ch,
    Hs,
    Any,
    Other(u16),
}

impl RecordClass {
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::In,
            3 => Self::Ch,
            4 => Self::Hs,
            255 => Self::Any,
            other => Self::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::In => 1,
            Self::Ch => 3,
            Self::Hs => 4,
            Self::Any => 255,
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Ch => write!(f, "CH"),
            Self::Hs => write!(f, "HS"),
            Self::Any => write!(f, "ANY"),
            Self::Other(code) => write!(f, "CLASS{code}"),
        }
    }
}
