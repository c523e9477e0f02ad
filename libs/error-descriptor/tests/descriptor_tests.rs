#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Behavioral tests for descriptors and their raisable form

use std::error::Error;
use std::fmt;

use error_descriptor::catalog::{CANNOT_BE_PROCESSED, VALUE_NOT_HIGHER_THAN_FIVE};
use error_descriptor::cause::{
    CAUSE_KIND_KEY, CAUSE_MESSAGE_KEY, ERROR_KIND_KEY, ERROR_MESSAGE_KEY, MISSING_MESSAGE,
    UNKNOWN_KIND,
};
use error_descriptor::{
    ADDITIONAL_INFO_KEY, DescriptorError, DescriptorException, ErrorDescriptor, ResultExt,
};
use http::StatusCode;

#[derive(Debug)]
struct StorageError {
    inner: std::io::Error,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("storage unavailable")
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

#[derive(Debug)]
struct Mute;

impl fmt::Display for Mute {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl Error for Mute {}

fn base() -> ErrorDescriptor {
    ErrorDescriptor::new("ORDER_001", "Order rejected")
        .with_context("order", 17)
        .with_logged_context("customer", "c-9")
}

// =============================================================================
// Copy-on-write updates
// =============================================================================

#[test]
fn with_status_changes_only_status() {
    let d = base();
    let e = d.with_status(StatusCode::CONFLICT);

    assert_eq!(e.status(), StatusCode::CONFLICT);
    assert_eq!(e.code(), d.code());
    assert_eq!(e.message(), d.message());
    assert_eq!(e.context(), d.context());
    assert_eq!(e.logged_context(), d.logged_context());
    assert_eq!(d.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn with_status_to_current_value_is_identity() {
    let d = base();
    assert_eq!(d.with_status(d.status()), d);
}

#[test]
fn with_context_leaves_receiver_untouched() {
    let d = base();
    let e = d.with_context("item", 3.5);

    assert_eq!(e.context()["item"], "3.5");
    assert_eq!(e.context()["order"], "17");
    assert!(!d.context().contains_key("item"));
}

#[test]
fn with_context_overwrites_existing_key() {
    let d = base()
        .with_context("attempt", 1)
        .with_context("attempt", 2);

    assert_eq!(d.context()["attempt"], "2");
    assert_eq!(d.context()["order"], "17");
    assert_eq!(d.context().len(), 2);
}

#[test]
fn additional_info_uses_fixed_key() {
    let d = base().with_additional_info("value=7");
    assert_eq!(d.context()[ADDITIONAL_INFO_KEY], "value=7");
}

#[test]
fn logged_context_is_separate_from_context() {
    let d = base().with_logged_context("token", "secret");
    assert_eq!(d.logged_context()["token"], "secret");
    assert!(!d.context().contains_key("token"));
    assert!(!base().logged_context().contains_key("token"));
}

// =============================================================================
// Capturing originating failures
// =============================================================================

#[test]
fn for_error_records_message_and_kind() {
    let err = "abc".parse::<u32>().unwrap_err();
    let expected = err.to_string();
    let d = base().for_error(err);

    assert_eq!(d.logged_context()[ERROR_MESSAGE_KEY], expected);
    assert_eq!(d.logged_context()[ERROR_KIND_KEY], "ParseIntError");
    assert!(!d.logged_context().contains_key(CAUSE_MESSAGE_KEY));
    assert!(d.cause().is_some());
    assert_eq!(d.logged_context()["customer"], "c-9");
}

#[test]
fn for_error_summarizes_one_source_level() {
    let err = StorageError {
        inner: std::io::Error::other("connection reset"),
    };
    let d = base().for_error(err);
    let logged = d.logged_context();

    assert_eq!(logged[ERROR_MESSAGE_KEY], "storage unavailable");
    assert_eq!(logged[ERROR_KIND_KEY], "StorageError");
    assert_eq!(logged[CAUSE_MESSAGE_KEY], "connection reset");
    assert_eq!(logged[CAUSE_KIND_KEY], "io::Error");
}

#[test]
fn io_error_kind_does_not_depend_on_construction() {
    let custom = base().for_error(std::io::Error::other("boom"));
    let simple = base().for_error(std::io::Error::from(std::io::ErrorKind::NotFound));
    let os = base().for_error(std::io::Error::from_raw_os_error(2));

    for d in [&custom, &simple, &os] {
        assert_eq!(d.logged_context()[ERROR_KIND_KEY], "io::Error");
    }
}

#[test]
fn erased_source_of_unlisted_type_is_unknown() {
    #[derive(Debug)]
    struct Wrapper(Mute);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("wrapped")
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    let d = base().for_error(Wrapper(Mute));
    assert_eq!(d.logged_context()[ERROR_KIND_KEY], "Wrapper");
    assert_eq!(d.logged_context()[CAUSE_KIND_KEY], UNKNOWN_KIND);
}

#[test]
fn logged_context_keys_match_the_wire_names() {
    assert_eq!(ERROR_MESSAGE_KEY, "exceptionMessage");
    assert_eq!(ERROR_KIND_KEY, "exceptionClass");
    assert_eq!(CAUSE_MESSAGE_KEY, "exceptionCauseMessage");
    assert_eq!(CAUSE_KIND_KEY, "exceptionCauseClass");
}

#[test]
fn for_error_uses_placeholder_for_empty_message() {
    let d = base().for_error(Mute);
    assert_eq!(d.logged_context()[ERROR_MESSAGE_KEY], MISSING_MESSAGE);
    assert_eq!(d.logged_context()[ERROR_KIND_KEY], "Mute");
}

#[test]
fn for_error_does_not_touch_user_context() {
    let d = base();
    let e = d.for_error(Mute);
    assert_eq!(e.context(), d.context());
    assert!(d.cause().is_none());
}

// =============================================================================
// Raising
// =============================================================================

#[test]
fn exception_message_is_code_and_message() {
    let d = base();
    let exc = d.to_exception();
    assert_eq!(exc.to_string(), format!("{} : {}", d.code(), d.message()));
    assert!(exc.source().is_none());
}

#[test]
fn exception_chains_to_captured_cause() {
    let exc = base().for_error(Mute).to_exception();
    assert!(exc.source().is_some());
}

#[test]
fn to_exception_caused_by_captures_then_wraps() {
    let exc = base().to_exception_caused_by(StorageError {
        inner: std::io::Error::other("boom"),
    });
    assert_eq!(exc.source().unwrap().to_string(), "storage unavailable");
    assert_eq!(
        exc.descriptor().logged_context()[ERROR_KIND_KEY],
        "StorageError"
    );
}

#[test]
fn missing_cause_is_a_clear_error() {
    let res = base().try_to_exception_caused_by::<Mute>(None);
    assert!(matches!(
        res,
        Err(DescriptorError::MissingCause { ref code }) if code == "ORDER_001"
    ));
    assert!(base().try_to_exception_caused_by(Some(Mute)).is_ok());
}

fn validate(value: u32) -> Result<u32, DescriptorException> {
    if value > 5 {
        return VALUE_NOT_HIGHER_THAN_FIVE
            .descriptor()
            .with_additional_info(format!("value={value}"))
            .raise();
    }
    Ok(value)
}

#[test]
fn raise_transfers_control_with_exception() {
    assert_eq!(validate(3).unwrap(), 3);

    let exc = validate(7).unwrap_err();
    assert_eq!(
        exc.to_string(),
        "INVALID_INPUT_001 : Value added can't be higher than five"
    );
    assert_eq!(exc.descriptor().context()[ADDITIONAL_INFO_KEY], "value=7");
    assert_eq!(exc.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn raise_caused_by_keeps_the_cause() {
    let res: Result<(), _> = CANNOT_BE_PROCESSED.descriptor().raise_caused_by(Mute);
    let exc = res.unwrap_err();
    assert_eq!(exc.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(exc.source().is_some());
}

#[test]
fn or_raise_converts_caught_failures() {
    let template = CANNOT_BE_PROCESSED.descriptor();
    let exc = "x".parse::<i64>().or_raise(&template).unwrap_err();

    assert_eq!(exc.code(), "INTERNAL_ERROR_001");
    assert_eq!(
        exc.descriptor().logged_context()[ERROR_KIND_KEY],
        "ParseIntError"
    );
    // the template itself is still pristine
    assert!(template.logged_context().is_empty());
}

#[test]
fn internal_template_is_500_without_with_status() {
    let d = CANNOT_BE_PROCESSED.descriptor();
    assert_eq!(d.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(d.is_server_error());
}

#[test]
fn descriptors_are_shareable_across_threads() {
    let d = base();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let d = d.clone();
            std::thread::spawn(move || d.with_context("worker", i))
        })
        .collect();
    for h in handles {
        let e = h.join().unwrap();
        assert!(e.context().contains_key("worker"));
    }
    assert!(!d.context().contains_key("worker"));
}
