use thiserror::Error;

macro_rules! invariant {
    ($msg:literal $(, $args:expr)* ) => {{
        return Err($crate::stdx::error::InternalInvariant::from( format!($msg $(, $args)*)).into());
    }};
    ($err:expr) => {{
        return Err($crate::stdx::error::InternalInvariant::from( format!("{}", $err)).into());
    }};
    ($cond:expr, $msg:literal $(, $args:expr)* ) => {{
        if !$cond {
        return Err($crate::stdx::error::InternalInvariant::from( format!("`{}`, {}", stringify!($cond), format!($msg $(, $args)*))).into());
        }
    }};
}

pub(crate) use invariant;

/// Represents internal invariants that were violated.
///
/// If this is returned, this is considered a bug that must be fixed!
///
/// This error is not actionable by library user, and must be fixed via internal
/// code changes! Please open an issue!
///
/// # Use
///
/// The rule of thumb for this error is that it is only used when interacting
/// with GitHub, as opposed to input data that might be passed to the library.
///
/// In an effort to maintain correctness in the library, liberal use of pre and
/// post checks are used to make sure any changes that happen underneath the
/// library are caught and fixed as soon as possible.
#[derive(Debug, Error)]
#[error("internal invariant violated: {0}")]
pub struct InternalInvariant(String);

impl From<String> for InternalInvariant {
    #[inline]
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

pub trait Invariant<T> {
    type Output;

    fn invariant(self, msg: impl Into<String>) -> Self::Output;
}

impl<T> Invariant<T> for Option<T> {
    type Output = Result<T, InternalInvariant>;

    #[inline]
    fn invariant(self, msg: impl Into<String>) -> Self::Output {
        self.ok_or_else(|| InternalInvariant(msg.into()))
    }
}

impl<T, E> Invariant<T> for Result<T, E> {
    type Output = Result<T, InternalInvariant>;

    #[inline]
    fn invariant(self, msg: impl Into<String>) -> Self::Output {
        self.map_err(|_err: _| InternalInvariant(msg.into()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn first_node(nodes: &[u32]) -> Result<u32, InternalInvariant> {
        invariant!(
            !nodes.is_empty(),
            "issue nodes should not be empty, but was {}",
            nodes.len()
        );
        Ok(nodes[0])
    }

    #[test]
    fn should_bail_on_condition_fail_with_message() {
        let err = first_node(&[]).unwrap_err();
        assert_eq!(
            "internal invariant violated: `!nodes.is_empty()`, issue nodes should not be empty, but was 0",
            err.to_string()
        );
        assert_eq!(7, first_node(&[7]).unwrap());
    }

    #[test]
    fn should_error_with_internal_invariant() {
        let missing: Option<()> = None;
        let err = missing
            .invariant("`repository` field missing from github graphql response")
            .unwrap_err();
        assert_eq!(
            "internal invariant violated: `repository` field missing from github graphql response",
            err.to_string()
        );
    }

    #[test]
    fn result_errors_are_replaced_by_message() {
        let parsed: Result<u32, _> = "abc".parse::<u32>();
        let err = parsed.invariant("`totalCount` should be numeric").unwrap_err();
        assert_eq!(
            "internal invariant violated: `totalCount` should be numeric",
            err.to_string()
        );
    }
}
