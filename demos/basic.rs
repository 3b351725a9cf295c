//! Reading and editing a document with typed accessors.
//!
//! Run with: cargo run --example basic

use inidoc::{parse, Value};
use std::error::Error;

const CONFIG: &str = "\
; application settings
name = inventory

[server]
host = 0.0.0.0
port = 8080
tls = off

[limits]
max_body = 0x100000   ; 1 MiB
timeout = 2.5
";

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = parse(CONFIG)?;

    println!("name     = {}", doc.get("", "name")?);
    println!("port     = {}", doc.get_as::<u16>("server", "port")?);
    println!("tls      = {}", doc.get_as::<bool>("server", "tls")?);
    println!("max_body = {}", doc.get_as::<u64>("limits", "max_body")?);
    println!("workers  = {} (default)", doc.get_or("server", "workers", 4u32));

    for section in doc.sections() {
        for entry in section.entries() {
            let kind = match entry.to_value() {
                Value::Bool(_) => "bool",
                Value::Integer(_) => "integer",
                Value::Float(_) => "float",
                Value::String(_) => "string",
            };
            println!("[{}] {} is a {}", section.name(), entry.key(), kind);
        }
    }

    doc.set_value("server", "tls", true);
    doc.set("server", "cert", "/etc/ssl/inventory.pem");
    doc.remove("limits", "timeout")?;

    println!("\nUpdated document:\n{doc}");
    println!("Debug listing:\n{}", doc.dump());

    Ok(())
}
