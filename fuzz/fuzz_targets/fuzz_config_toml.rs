#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing and filter compilation must never panic
        if let Ok(config) = toml::from_str::<hotrun::Config>(content) {
            let _ = config.watch.dependency_filter();
        }
    }
});
