//! Tests for the domain user model.

use super::*;
use rstest::rstest;
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn user_id_preserves_original_spelling() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.as_ref(), VALID_ID);
    assert_eq!(id, UserId::from_uuid(*id.as_uuid()));
}

#[rstest]
#[case("ada")]
#[case("ada.lovelace@example.com")]
#[case("ada+cook-1_2")]
fn username_accepts_allowed_characters(#[case] raw: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), raw);
}

#[rstest]
#[case("   ", UserValidationError::EmptyUsername)]
#[case("ada lovelace", UserValidationError::UsernameInvalidCharacters)]
#[case("ada!", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn username_rejects_overlong_values() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
fn user_serialises_as_camel_case_strings() {
    let user = User::try_from_strings(VALID_ID, "ada").expect("valid user");
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(value, json!({ "id": VALID_ID, "username": "ada" }));
}

#[rstest]
fn user_deserialisation_validates_fields() {
    let payload = json!({ "id": "nope", "username": "ada" });
    assert!(serde_json::from_value::<User>(payload).is_err());
}
