//! Identifier newtypes for the static dataset.
//!
//! GTFS identifiers are opaque strings. Wrapping them keeps the seams
//! strongly typed: a function that wants a `TripId` cannot be handed a
//! `StopId` by accident.

use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

id_type! {
    /// Identifier of a stop (GTFS `stop_id`).
    StopId
}

id_type! {
    /// Identifier of a route (GTFS `route_id`).
    RouteId
}

id_type! {
    /// Identifier of a trip (GTFS `trip_id`).
    TripId
}

id_type! {
    /// Identifier of a service calendar (GTFS `service_id`).
    ServiceId
}
