#![no_main]

use libfuzzer_sys::fuzz_target;
use mtots_syntax::parser;
use mtots_syntax::position::SourceId;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Parsing is total: every input yields a file, possibly with syntax errors
        let _ = parser::parse(&SourceId::new("fuzz.mtots"), s);
    }
});
