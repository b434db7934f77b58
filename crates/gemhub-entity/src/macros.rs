//! Declarative helper for closed string enumerations.

/// Define a closed enumeration whose variants serialize to fixed strings.
///
/// Generates `as_str`, `ALL`, `Display`, and a `FromStr` that returns a
/// validation error naming the rejected value.
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the stored string form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = gemhub_core::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(gemhub_core::AppError::validation(format!(
                        "{s} is not a valid {}",
                        $label
                    ))),
                }
            }
        }
    };
}
