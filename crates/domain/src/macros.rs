//! Macro for implementing Display and FromStr for wire enums
//!
//! UCL sends enum-like string fields (operations, assignment states) whose
//! casing is not guaranteed. The macro gives each enum a canonical wire string
//! and case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use ias_adapter_domain::impl_wire_string_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Initial,
//!     Ready,
//! }
//!
//! impl_wire_string_conversions!(Phase {
//!     Initial => "INITIAL",
//!     Ready => "READY",
//! });
//!
//! assert_eq!(Phase::Ready.to_string(), "READY");
//! assert_eq!("initial".parse::<Phase>().unwrap(), Phase::Initial);
//! ```

/// Implements `Display`, `FromStr` and `as_str` for wire enums
///
/// - `Display` and `as_str` emit the canonical wire string
/// - `FromStr` accepts any casing of the wire string
#[macro_export]
macro_rules! impl_wire_string_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical wire representation.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
