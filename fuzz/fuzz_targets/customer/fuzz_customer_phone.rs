// Run with: cargo fuzz run fuzz_customer_phone
#![no_main]

use crm_purge::domain::CustomerPhone;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Accepted phones must only hold the documented characters
        if let Ok(Some(phone)) = CustomerPhone::parse(Some(s.to_string())) {
            assert!(phone.as_ref().chars().count() <= 20);
            assert!(
                phone
                    .as_ref()
                    .chars()
                    .all(|c| c.is_ascii_digit() || "+-() ".contains(c))
            );
        }
    }
});
