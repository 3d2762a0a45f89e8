#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        if let Ok(message) = hotrun::ChildMessage::decode(line) {
            let _ = hotrun::ChildMessage::decode(&message.encode());
        }
    }
});
