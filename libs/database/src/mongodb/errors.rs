use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Whether the driver error is a unique index violation (E11000).
///
/// Inserts report it as a write error; `findAndModify` reports it as a
/// command error.
pub fn is_duplicate_key(error: &Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Whether no server could be selected, i.e. the deployment is unreachable.
pub fn is_unavailable(error: &Error) -> bool {
    matches!(error.kind.as_ref(), ErrorKind::ServerSelection { .. })
}

/// Whether a stored document failed to decode into the requested type.
pub fn is_decode_error(error: &Error) -> bool {
    matches!(error.kind.as_ref(), ErrorKind::BsonDeserialization(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_error_is_not_classified() {
        let error = Error::custom("boom");
        assert!(!is_duplicate_key(&error));
        assert!(!is_unavailable(&error));
        assert!(!is_decode_error(&error));
    }
}
