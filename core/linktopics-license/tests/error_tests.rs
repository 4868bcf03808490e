use linktopics_license::LicenseError;

#[test]
fn error_display_invalid_token_format() {
    let err = LicenseError::InvalidTokenFormat("bad format".into());
    assert!(format!("{err}").contains("invalid license token format"));
}

#[test]
fn error_display_invalid_signature() {
    let err = LicenseError::InvalidSignature;
    assert!(format!("{err}").contains("signature"));
}

#[test]
fn error_display_invalid_payload() {
    let err = LicenseError::InvalidPayload("missing field".into());
    let msg = format!("{err}");
    assert!(msg.contains("invalid license payload"));
    assert!(msg.contains("missing field"));
}

#[test]
fn error_display_expired() {
    let err = LicenseError::Expired("2025-01-01".into());
    assert!(format!("{err}").contains("expired"));
}

#[test]
fn error_display_signing() {
    let err = LicenseError::Signing("bad key".into());
    assert!(format!("{err}").contains("signing failed"));
}

#[test]
fn error_display_activation_failed() {
    let err = LicenseError::ActivationFailed("server error".into());
    assert!(format!("{err}").contains("activation failed"));
}

#[test]
fn error_display_network() {
    let err = LicenseError::Network("timeout".into());
    assert!(format!("{err}").contains("network"));
}

#[test]
fn error_display_storage() {
    let err = LicenseError::Storage("disk full".into());
    assert!(format!("{err}").contains("storage"));
}

#[test]
fn error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let license_err: LicenseError = serde_err.unwrap_err().into();
    assert!(format!("{license_err}").contains("serialization"));
}
