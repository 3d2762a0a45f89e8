#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let request = hotrun::application::supervisor::parse_request_file(content);
        assert!(!request.compile.contains('\n'));
        assert!(!request.compiled_path.contains('\n'));
    }
});
