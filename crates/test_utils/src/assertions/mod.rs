// Path: crates/test_utils/src/assertions/mod.rs
//! Assertion macros for tests.

/// Assert that two byte slices are equal, printing both as hex on failure.
#[macro_export]
macro_rules! assert_bytes_eq {
    ($left:expr, $right:expr) => {
        assert_eq!(
            ::std::convert::AsRef::<[u8]>::as_ref(&$left),
            ::std::convert::AsRef::<[u8]>::as_ref(&$right)
        );
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        assert_eq!(
            ::std::convert::AsRef::<[u8]>::as_ref(&$left),
            ::std::convert::AsRef::<[u8]>::as_ref(&$right),
            $($arg)+
        );
    };
}

/// Assert that a result is `Ok` and unwrap it.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?}", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?} ({})", err, format!($($arg)+)),
        }
    };
}

/// Assert that a result is `Err` and unwrap the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("Expected Err, got Ok: {:?}", val),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => panic!("Expected Err, got Ok: {:?} ({})", val, format!($($arg)+)),
            Err(err) => err,
        }
    };
}

/// Assert that a `VerifyStatus` or `ProposalStatus` is a rejection whose
/// reason matches `$pattern`.
#[macro_export]
macro_rules! assert_rejected {
    ($status:expr, $pattern:pat) => {{
        let status = $status;
        match status.reject_reason() {
            Some(reason) => assert!(
                matches!(reason, $pattern),
                "unexpected rejection: {:?}",
                reason
            ),
            None => panic!("Expected rejection, got {:?}", status),
        }
    }};
}
