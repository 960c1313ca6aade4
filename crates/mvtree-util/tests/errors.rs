use mvtree_util::errors::MvtreeError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = MvtreeError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_request_error_display() {
    let err = MvtreeError::Request {
        message: "missing [project]".to_string(),
    };
    assert_eq!(err.to_string(), "Request error: missing [project]");
}

#[test]
fn test_filter_error_display() {
    let err = MvtreeError::Filter {
        pattern: "a:b:c:d:e".to_string(),
        message: "too many segments".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid artifact pattern `a:b:c:d:e`: too many segments"
    );
}

#[test]
fn test_repository_error_display() {
    let err = MvtreeError::Repository {
        message: "bad pom".to_string(),
    };
    assert_eq!(err.to_string(), "Repository error: bad pom");
}

#[test]
fn test_generic_error_display() {
    let err = MvtreeError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: MvtreeError = io_err.into();
    assert!(matches!(err, MvtreeError::Io(_)));
}
