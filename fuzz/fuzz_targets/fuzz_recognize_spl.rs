#![no_main]

use libfuzzer_sys::fuzz_target;
use sigma_translate::model::Profile;
use sigma_translate::recognizer::recognize;

fuzz_target!(|data: &str| {
    let profile = Profile::new("fuzz");
    let _ = recognize(data, &profile);
});
