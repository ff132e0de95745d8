//! Strongly typed identifier wrappers.
//!
//! Street-graph ids (`NodeId`, `EdgeId`) are dense integers used to index
//! CSR `Vec`s directly.  Delivery-domain ids (`StopId`, `RouteId`, …) wrap
//! the opaque strings that come out of the source datasets
//! (e.g. `"RouteID_00143bdd-…"`).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" (`u32::MAX`).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

/// Generate a typed ID wrapper around an owned dataset string.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        // Lets `HashSet<StopId>` / `BTreeMap<RouteId, _>` be queried with `&str`.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id! {
    /// Index of a street-network node (intersection).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed street-network edge.
    pub struct EdgeId(u32);
}

string_id! {
    /// Identifier of a delivery stop, unique within its route.
    pub struct StopId;
}

string_id! {
    /// Identifier of a route.
    pub struct RouteId;
}

string_id! {
    /// Identifier of a package.
    pub struct PackageId;
}

string_id! {
    /// Identifier of a vehicle.
    pub struct VehicleId;
}
