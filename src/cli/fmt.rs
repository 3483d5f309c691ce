use serde::Serialize;

pub struct Fmt {}

impl Fmt {
    pub fn display(s: String) {
        println!("{}", s);
    }

    pub fn json<T: Serialize>(value: &T) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}
