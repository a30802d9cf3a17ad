//! Helper macro generating repository error enums with snake_case
//! constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

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
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant { $($field : $ty),* });
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for generated constructors.

    use rstest::rstest;

    define_port_error! {
        pub enum LookupError {
            Timeout { message: String } => "lookup timed out: {message}",
            Throttled { retries: u32 } => "lookup throttled after {retries} retries",
            Rejected { message: String, code: u16 } => "lookup rejected ({code}): {message}",
        }
    }

    #[rstest]
    fn string_fields_accept_str_slices() {
        assert_eq!(
            LookupError::timeout("5s elapsed").to_string(),
            "lookup timed out: 5s elapsed"
        );
    }

    #[rstest]
    fn numeric_fields_keep_their_type() {
        let err = LookupError::throttled(3_u32);
        assert_eq!(err, LookupError::Throttled { retries: 3 });
    }

    #[rstest]
    fn mixed_fields_are_initialised_in_order() {
        assert_eq!(
            LookupError::rejected("quota", 429_u16).to_string(),
            "lookup rejected (429): quota"
        );
    }
}
