//! Fuzz target for runner config parsing.
//!
//! Any YAML that deserializes must keep every runner named after applying
//! default names.

#![no_main]

use libfuzzer_sys::fuzz_target;

use diffsuggest_types::RunnerConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = serde_yaml::from_str::<RunnerConfig>(text) else {
        return;
    };

    let config = config.with_default_names();
    for (key, runner) in &config.runner {
        assert!(!runner.name.is_empty() || key.is_empty());
    }
});
