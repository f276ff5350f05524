use std::fmt;

/// An enumerated field: a closed set of named values.
///
/// Implemented through the [`choice!`](crate::choice) macro, which also wires
/// up `Display`, `FromStr` and serde using the same spelling.
pub trait Choice: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Every value, in declaration order.
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Parse user input (case-insensitive, surrounding whitespace ignored).
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(input))
    }

    /// Spellings offered to a select box, in declaration order.
    fn options() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|variant| variant.as_str()).collect()
    }
}

/// Input did not name any value of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value {input:?} (expected one of: {expected})")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub input: String,
    pub expected: String,
}

impl UnknownChoice {
    pub fn new<C: Choice>(kind: &'static str, input: &str) -> Self {
        UnknownChoice {
            kind,
            input: input.to_string(),
            expected: C::options().join(", "),
        }
    }
}

/// Declare an enumerated field type.
///
/// ```ignore
/// attune_records::choice! {
///     /// How urgent an initiative is.
///     pub enum Priority {
///         High => "high",
///         Medium => "medium",
///         Low => "low",
///     }
/// }
/// ```
///
/// Variant order is significant: it drives `Ord`, `VARIANTS`, and the order
/// of grouped aggregates. The calling crate needs `serde` as a dependency.
#[macro_export]
macro_rules! choice {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $crate::Choice for $name {
            const VARIANTS: &'static [Self] = &[$( $name::$variant ),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::Choice::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::UnknownChoice;

            fn from_str(input: &str) -> ::std::result::Result<Self, Self::Err> {
                <$name as $crate::Choice>::parse(input)
                    .ok_or_else(|| $crate::UnknownChoice::new::<$name>(stringify!($name), input))
            }
        }
    };
}
