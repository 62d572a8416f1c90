//! Helper macro for declaring driven-port error enums.
//!
//! Every variant carries named fields and gets a snake_case constructor that
//! accepts `impl Into<T>` for each field.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    $(
                        #[doc = concat!("The `", stringify!($field), "` reported with the failure.")]
                        $field : $ty
                    ),*
                },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    #[must_use]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Offline { message: String } => "offline: {message}",
            Clash { field: String, attempts: u32 } => "clash on {field} after {attempts}",
        }
    }

    #[test]
    fn constructor_converts_str_into_string() {
        assert_eq!(
            SamplePortError::offline("pool closed").to_string(),
            "offline: pool closed"
        );
    }

    #[test]
    fn constructor_handles_several_fields() {
        let err = SamplePortError::clash("email", 2_u32);
        assert_eq!(
            err,
            SamplePortError::Clash {
                field: "email".to_owned(),
                attempts: 2
            }
        );
        assert_eq!(err.to_string(), "clash on email after 2");
    }
}
