use biodata_core::error::CoreError;
use biodata_core::models::form::{FieldId, FormSnapshot};

#[test]
fn keys_round_trip_through_from_str() {
    for field in FieldId::ALL {
        assert_eq!(field.key().parse::<FieldId>().unwrap(), field);
        assert_eq!(field.to_string(), field.key());
    }
}

#[test]
fn unknown_key_is_rejected() {
    let err = FormSnapshot::new().with_pairs([("shoe_size", "42")]).unwrap_err();
    assert!(matches!(err, CoreError::UnknownField(k) if k == "shoe_size"));
}

#[test]
fn missing_fields_read_as_empty() {
    let snapshot = FormSnapshot::new().with_pairs([("first_name", "Jane")]).unwrap();
    assert_eq!(snapshot.get(FieldId::FirstName), "Jane");
    assert_eq!(snapshot.get(FieldId::Email), "");
}

#[test]
fn json_form_accepts_strings_numbers_and_null() {
    let snapshot = FormSnapshot::from_json_str(
        r#"{"first_name": "Jane", "height": 170, "blood_type": null, "address_line1": "1 Main St"}"#,
    )
    .unwrap();

    assert_eq!(snapshot.get(FieldId::FirstName), "Jane");
    assert_eq!(snapshot.get(FieldId::Height), "170");
    assert_eq!(snapshot.get(FieldId::BloodType), "");
    assert_eq!(snapshot.get(FieldId::AddressLine1), "1 Main St");
}

#[test]
fn json_form_rejects_nested_values_and_unknown_keys() {
    let err = FormSnapshot::from_json_str(r#"{"first_name": ["Jane"]}"#).unwrap_err();
    assert!(matches!(err, CoreError::NonStringField(k) if k == "first_name"));

    let err = FormSnapshot::from_json_str(r#"{"nickname": "JJ"}"#).unwrap_err();
    assert!(matches!(err, CoreError::UnknownField(_)));

    let err = FormSnapshot::from_json_str("not json").unwrap_err();
    assert!(matches!(err, CoreError::Serialization(_)));
}

#[test]
fn required_fields_match_the_form() {
    let required: Vec<&str> = FieldId::ALL
        .into_iter()
        .filter(|f| f.is_required())
        .map(FieldId::key)
        .collect();
    assert_eq!(
        required,
        ["first_name", "last_name", "birthdate", "gender", "email"]
    );
}
