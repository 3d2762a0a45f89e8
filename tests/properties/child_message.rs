//! Property tests for decoding child IPC messages.

use proptest::prelude::*;

use hotrun::{ChildMessage, CompileRequest};

fn path_string() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9._ -]{1,12}").unwrap();
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| format!("/{}", segments.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: decoding arbitrary lines never panics.
    #[test]
    fn property_decode_never_panics(line in ".{0,200}") {
        let _ = ChildMessage::decode(&line);
    }

    /// PROPERTY: a `required` object always decodes to `Required` with the same path.
    #[test]
    fn property_required_is_recognized(path in path_string()) {
        let line = serde_json::json!({ "required": path }).to_string();
        match ChildMessage::decode(&line) {
            Ok(ChildMessage::Required(required)) => prop_assert_eq!(required.required, path),
            other => prop_assert!(false, "unexpected decode: {:?}", other),
        }
    }

    /// PROPERTY: a compile request keeps both paths.
    #[test]
    fn property_compile_request_is_recognized(
        source in path_string(),
        destination in path_string(),
    ) {
        let line = serde_json::json!({ "compile": source, "compiledPath": destination }).to_string();
        prop_assert_eq!(
            ChildMessage::decode(&line).ok(),
            Some(ChildMessage::Compile(CompileRequest::new(source, destination)))
        );
    }

    /// PROPERTY: errors keep `willTerminate` whatever else they carry.
    #[test]
    fn property_error_keeps_will_terminate(
        message in ".{0,40}",
        will_terminate in any::<bool>(),
        code in proptest::option::of("[A-Z_]{1,20}"),
    ) {
        let line = serde_json::json!({
            "code": code,
            "message": message,
            "willTerminate": will_terminate,
        })
        .to_string();
        match ChildMessage::decode(&line) {
            Ok(ChildMessage::Error(error)) => {
                prop_assert_eq!(error.will_terminate, will_terminate);
                prop_assert_eq!(error.code, code);
            }
            other => prop_assert!(false, "unexpected decode: {:?}", other),
        }
    }
}
