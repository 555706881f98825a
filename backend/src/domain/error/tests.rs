//! Tests for the domain error payload and its serialisation contract.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::empty_composition("empty"), ErrorCode::EmptyComposition)]
#[case(Error::duplicate_ingredient("dup"), ErrorCode::DuplicateIngredientInComposition)]
#[case(Error::unknown_ingredient("missing"), ErrorCode::UnknownIngredient)]
#[case(Error::invalid_amount("range"), ErrorCode::InvalidAmount)]
#[case(Error::already_exists("again"), ErrorCode::AlreadyExists)]
#[case(Error::self_relation_forbidden("self"), ErrorCode::SelfRelationForbidden)]
#[case(Error::constraint_violation("unique"), ErrorCode::ConstraintViolation)]
fn convenience_constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::new(ErrorCode::NotFound, "");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "not found");
}

#[rstest]
fn serialises_code_in_snake_case_with_details() {
    let error = Error::unknown_ingredient("ingredient does not exist")
        .with_details(json!({ "ingredientId": "abc" }));

    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({
            "code": "unknown_ingredient",
            "message": "ingredient does not exist",
            "details": { "ingredientId": "abc" },
        })
    );
}

#[rstest]
fn omits_details_when_absent() {
    let value = serde_json::to_value(Error::forbidden("nope")).expect("serialise error");
    assert!(value.get("details").is_none());
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let payload = json!({ "code": "not_found", "message": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn display_uses_message() {
    assert_eq!(Error::internal("boom").to_string(), "boom");
}
