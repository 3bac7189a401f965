use std::{fs, path::Path};

pub fn load_payload(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}
