// Run with: cargo fuzz run fuzz_new_customer_json
// Exercises CustomerName, CustomerEmail and CustomerPhone through NewCustomer
#![no_main]

use crm_purge::domain::NewCustomer;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    if let Ok(v) = serde_json::from_slice::<Value>(data) {
        let field = |key: &str| v.get(key).and_then(|s| s.as_str()).map(str::to_string);

        let _ = NewCustomer::new(
            field("name").unwrap_or_default(),
            field("email").unwrap_or_default(),
            field("phone"),
        );
    }
});
