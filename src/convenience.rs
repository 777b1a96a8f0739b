//! Convenience macros for constructing and wrapping chain errors with
//! format strings.
//!
//! Call sites in service code almost always interpolate identifiers into the
//! internal message; these macros keep that ergonomic without giving up the
//! call-site capture of the underlying constructors - the `#[track_caller]`
//! attribute on [`crate::ChainError::new`] and [`crate::wrap`] resolves to
//! the macro invocation site.
//!
//! ```rust
//! use trellis_core::{chain_err, wrap_err, codes};
//!
//! let user_id = 42;
//! let root = chain_err!(codes::NOT_FOUND, "user does not exist", "no row for user {user_id}");
//! let err = wrap_err!(Some(root.into()), "lookup failed for user {user_id}");
//! assert!(err.is_some());
//! ```

/// Construct a chain-root [`crate::ChainError`] with a formatted internal
/// message.
///
/// Arguments: classification code, public message, then a format string with
/// optional arguments for the internal message. Public messages are fixed
/// text on purpose - interpolating runtime data into user-facing output is
/// how internals leak.
#[macro_export]
macro_rules! chain_err {
    ($code:expr, $public:expr, $($msg:tt)+) => {
        $crate::ChainError::new(format!($($msg)+), $public, $code)
    };
}

/// Wrap an existing error with a formatted context message via
/// [`crate::wrap`].
#[macro_export]
macro_rules! wrap_err {
    ($err:expr, $($context:tt)+) => {
        $crate::wrap($err, format!($($context)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::{code_of, codes, public_message, BoxError, ChainError};

    #[test]
    fn chain_err_formats_internal_message_only() {
        let attempt = 3;
        let err = chain_err!(
            codes::TOO_MANY_REQUESTS,
            "please slow down",
            "rate limit hit on attempt {attempt}"
        );
        assert_eq!(err.message(), "rate limit hit on attempt 3");
        assert_eq!(err.public(), "please slow down");
        assert_eq!(err.code(), codes::TOO_MANY_REQUESTS);
        assert!(err.location().file().ends_with("convenience.rs"));
    }

    #[test]
    fn wrap_err_forwards_to_wrap() {
        let root: BoxError = ChainError::new("boom", "oops", codes::CONFLICT).into();
        let err = wrap_err!(Some(root), "retry {} failed", 2).unwrap();
        assert_eq!(public_message(Some(&*err)), "oops");
        assert_eq!(code_of(Some(&*err)), codes::CONFLICT);
    }

    #[test]
    fn wrap_err_on_none_is_none() {
        assert!(wrap_err!(None, "context").is_none());
    }
}
