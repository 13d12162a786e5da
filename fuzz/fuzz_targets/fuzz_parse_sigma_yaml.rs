#![no_main]

use libfuzzer_sys::fuzz_target;
use sigma_translate::parser::parse_sigma_yaml;

fuzz_target!(|data: &str| {
    let _ = parse_sigma_yaml(data);
});
