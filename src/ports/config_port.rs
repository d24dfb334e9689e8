//! Configuration access port trait.
//!
//! Typed getters fall back to `default` when the key is missing or does not
//! parse; `config_validation` reports the latter before anything runs.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
