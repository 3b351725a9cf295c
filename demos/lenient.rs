//! Lenient parsing with diagnostics and tracing output.
//!
//! Run with: RUST_LOG=debug cargo run --example lenient

use inidoc::{
    parse_with_options, validate, DuplicateKeyPolicy, DuplicateSectionPolicy, ParseOptions,
};
use std::error::Error;

const BROKEN: &str = "\
[server]
host = localhost
this line has no delimiter
port = 80
port = 8080

[server]
extra = merged

[]
value = \"unterminated
";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let options = ParseOptions::lenient()
        .with_duplicate_keys(DuplicateKeyPolicy::Overwrite)
        .with_duplicate_sections(DuplicateSectionPolicy::Merge);

    let parsed = parse_with_options(BROKEN, &options)?;
    println!("Recovered document:\n{}", parsed.document);

    for diagnostic in &parsed.diagnostics {
        println!(
            "line {}, column {}: {}",
            diagnostic.line, diagnostic.column, diagnostic
        );
    }

    let strict_keys = ParseOptions::new().with_duplicate_keys(DuplicateKeyPolicy::Reject);
    let problems = validate(BROKEN, &strict_keys);
    println!("\nWith duplicate keys rejected: {} problems", problems.len());

    Ok(())
}
