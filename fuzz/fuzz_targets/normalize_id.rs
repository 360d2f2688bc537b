#![no_main]

use atlas_core::graph::normalize_id;
use libfuzzer_sys::fuzz_target;

// A normalized id is a fixed point and never escapes the root.
fuzz_target!(|data: &str| {
    if let Ok(id) = normalize_id(data) {
        assert_eq!(normalize_id(&id).ok().as_deref(), Some(id.as_str()));
        assert!(!id.starts_with('/'));
        assert!(id.split('/').all(|s| !s.is_empty() && s != "." && s != ".."));
    }
});
