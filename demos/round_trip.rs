//! Format-preserving edits versus canonical output.
//!
//! Run with: cargo run --example round_trip

use inidoc::{parse, serialize, LineEnding, SerializeOptions};
use std::error::Error;

const CONFIG: &str = "\
# Deployment descriptor
#   edit with care

[database]
url      = \"postgres://db:5432/app\"   # primary
pool     = 8


[cache]
ttl=300
";

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = parse(CONFIG)?;
    assert_eq!(doc.to_string(), CONFIG);
    println!("✓ Unmodified document renders byte for byte");

    doc.set("database", "pool", "16");
    doc.set("cache", "backend", "redis");

    println!("\nRound-trip after edits:\n{doc}");

    let canonical = serialize(&doc, &SerializeOptions::canonical());
    println!("Canonical:\n{canonical}");

    let again = serialize(&parse(&canonical)?, &SerializeOptions::canonical());
    assert_eq!(canonical, again);
    println!("✓ Canonical output is stable");

    let windows = SerializeOptions::canonical().with_line_ending(LineEnding::CrLf);
    let crlf = serialize(&doc, &windows);
    println!("CRLF output has {} lines", crlf.matches("\r\n").count());

    Ok(())
}
