//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::path::PathBuf;
    use thermofit::FitError;
    use thermofit::io::error::{computation_error, invalid_parameter, io_error};

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = FitError::FileSystem {
            path: "/tmp/run.dat".into(),
            operation: "read",
            source: io_error,
        };

        assert!(error.source().is_some());
        let message = error.to_string();
        assert!(message.contains("/tmp/run.dat"));
        assert!(message.contains("file not found"));
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("noise", &-1.0, &"must be finite and non-negative");

        let message = error.to_string();
        assert!(message.contains("noise"));
        assert!(message.contains("-1"));
        assert!(message.contains("must be finite and non-negative"));
        assert!(error.source().is_none());
    }

    // Tests DimensionMismatch reports both lengths
    // Verified by swapping expected and found
    #[test]
    fn test_dimension_mismatch_error() {
        let error = FitError::DimensionMismatch {
            context: "curve_fit (x and y)",
            expected: 10,
            found: 9,
        };

        let message = error.to_string();
        assert!(message.contains("curve_fit (x and y)"));
        assert!(message.contains("expected 10, found 9"));
    }

    // Tests InsufficientData and SingularMatrix formatting
    // Verified by omitting counts from messages
    #[test]
    fn test_numeric_errors() {
        let insufficient = FitError::InsufficientData {
            points: 2,
            required: 3,
        };
        assert!(insufficient.to_string().contains("2 points"));
        assert!(insufficient.to_string().contains("at least 3"));

        let singular = FitError::SingularMatrix { column: 1 };
        assert!(singular.to_string().contains("column 1"));
    }

    // Tests Parse errors point at the file and line
    // Verified by reporting zero-based line numbers
    #[test]
    fn test_parse_error() {
        let error = FitError::Parse {
            path: PathBuf::from("data/correction.dat"),
            line: 7,
            reason: "expected 2 columns, found 3".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("data/correction.dat"));
        assert!(message.contains("line 7"));
        assert!(message.contains("expected 2 columns"));
    }

    // Tests Computation error formatting
    // Verified by omitting reason from message
    #[test]
    fn test_computation_error() {
        let error = computation_error("curve_fit", &"sro is not finite at the initial parameters");

        let message = error.to_string();
        assert!(message.contains("curve_fit"));
        assert!(message.contains("not finite"));
    }

    // Tests raw I/O errors convert with a placeholder path
    // Verified by dropping the From impl
    #[test]
    fn test_from_io_error() {
        let error: FitError = std::io::Error::other("boom").into();
        assert!(matches!(error, FitError::FileSystem { operation: "unknown", .. }));
        assert!(io_error("bad target").to_string().contains("bad target"));
    }
}
