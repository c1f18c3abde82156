// Run with: cargo fuzz run fuzz_customer_email
// Lossy decoding lets invalid UTF-8, partial multi-byte characters and BOMs through
#![no_main]

use crm_purge::domain::CustomerEmail;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data).to_string();
    let _ = CustomerEmail::parse(input);
});
