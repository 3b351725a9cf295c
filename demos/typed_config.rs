//! Loading and saving a config struct through serde.
//!
//! Run with: cargo run --example typed_config

use inidoc::{from_str, to_string};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Level {
    Debug,
    Info,
    Warn,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Logging {
    level: Level,
    file: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
    keep_alive: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Config {
    name: String,
    server: Server,
    logging: Logging,
}

fn main() -> Result<(), Box<dyn Error>> {
    let text = "\
name = gateway

[server]
host = 127.0.0.1
port = 0x1F90
keep_alive = yes

[logging]
level = info
";

    let config: Config = from_str(text)?;
    println!("Loaded: {config:#?}");
    assert_eq!(config.server.port, 8080);
    assert!(config.server.keep_alive);
    assert_eq!(config.logging.file, None);

    let saved = to_string(&config)?;
    println!("\nSaved:\n{saved}");

    let reloaded: Config = from_str(&saved)?;
    assert_eq!(config, reloaded);
    println!("✓ Round-trip successful");

    Ok(())
}
