//! Response validation never yields a partial result

use content_ai::error::ApiError;
use content_ai::generation::parse_generation_result;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_well_formed_objects_parse_exactly() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(".{0,40}", ".{0,200}", prop::collection::vec("#[A-Za-z]{1,12}", 1..6)),
            |(title, post, hashtags)| {
                let raw = json!({ "title": title, "post": post, "hashtags": hashtags }).to_string();
                let parsed = parse_generation_result(&raw).unwrap();
                prop_assert_eq!(parsed.title, title);
                prop_assert_eq!(parsed.post, post);
                prop_assert_eq!(parsed.hashtags, hashtags);
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_dropping_any_field_is_malformed() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(".{0,20}", prop::sample::select(vec!["title", "post", "hashtags"])),
            |(text, missing)| {
                let mut value = json!({ "title": text, "post": text, "hashtags": ["#BIDV"] });
                value.as_object_mut().unwrap().remove(missing);
                let err = parse_generation_result(&value.to_string()).unwrap_err();
                prop_assert!(matches!(err, ApiError::MalformedResponse(_)));
                Ok(())
            },
        )
        .unwrap();
}
