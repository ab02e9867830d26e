#![no_main]

use libfuzzer_sys::fuzz_target;

use tilfetch::facts::{RawPost, RetainedFields, normalize, run};

fuzz_target!(|data: &[u8]| {
    let title = String::from_utf8_lossy(data).to_string();

    let text = normalize(&title);
    if !text.is_empty() {
        assert!(text.ends_with(['.', '!', '?']));
        assert_eq!(text.trim(), text);
    }

    // The pipeline should never panic regardless of input
    let post = RawPost::new(title, "https://example.com", 10, false);
    let _ = run(std::slice::from_ref(&post), RetainedFields::ALL);
});
