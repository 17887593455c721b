//! # eufy-bridge CLI
//!
//! Command-line utilities for inspecting the property catalog, topic layout
//! and upstream event feeds.

use anyhow::{Context, Result};
use eufy_bridge_core::{
    CatalogError, DeviceType, OwnerClass, OwnerSnapshot, SchemaResolver, StaticCatalog,
};
use eufy_bridge_ingress::parse_line;
use eufy_bridge_proto::topics::DEFAULT_PREFIX;
use eufy_bridge_proto::{
    encode_discovery, Component, OwnerIdentity, PropertyIdentity, TopicScheme,
};
use std::collections::BTreeMap;
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "types" => {
            for ty in DeviceType::ALL {
                let kind = if ty.is_camera() { "camera" } else { "-" };
                println!("{:>3}  {:<28} {kind}", ty.code(), ty.label());
            }
        }
        "catalog" => {
            if args.len() < 4 {
                eprintln!("Usage: eufy-bridge catalog <device|station> <type>");
                std::process::exit(1);
            }
            let class: OwnerClass = args[2].parse()?;
            let type_tag = parse_type(&args[3])?;

            let catalog = StaticCatalog;
            let properties: Vec<_> = catalog
                .declared(class, type_tag)
                .iter()
                .map(|property| -> Result<serde_json::Value, serde_json::Error> {
                    let mut entry = serde_json::to_value(property)?;
                    entry["generic"] = catalog.is_generic(class, property.key).into();
                    Ok(entry)
                })
                .collect::<Result<_, _>>()
                .context("Failed to encode catalog")?;

            println!("{}", serde_json::to_string_pretty(&properties)?);
        }
        "topics" => {
            if args.len() < 4 {
                eprintln!("Usage: eufy-bridge topics <component> <unique_id> [prefix]");
                std::process::exit(1);
            }
            let component = Component::parse(&args[2])
                .with_context(|| format!("Unknown component: {}", args[2]))?;
            let prefix = args.get(4).map_or(DEFAULT_PREFIX, String::as_str);
            let topics = TopicScheme::new(prefix).entity(component, &args[3]);

            println!("base        {}", topics.base);
            println!("discovery   {}", topics.discovery);
            println!("attributes  {}", topics.attributes);
            println!("state       {}", topics.state);
        }
        "preview" => {
            if args.len() < 5 {
                eprintln!("Usage: eufy-bridge preview <device|station> <type> <serial> [name]");
                std::process::exit(1);
            }
            let class: OwnerClass = args[2].parse()?;
            let type_tag = parse_type(&args[3])?;
            let name = args.get(5).unwrap_or(&args[4]);

            for (topic, body) in preview(class, type_tag, &args[4], name)? {
                println!("{topic}");
                println!("    {}", String::from_utf8_lossy(&body));
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: eufy-bridge check <events-file>");
                std::process::exit(1);
            }
            let path = &args[2];
            let feed = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {path}"))?;

            let mut events = 0;
            let mut errors = 0;
            for (index, line) in feed.lines().enumerate() {
                match parse_line(line) {
                    Ok(Some(_)) => events += 1,
                    Ok(None) => {}
                    Err(err) => {
                        errors += 1;
                        eprintln!("line {}: {err}", index + 1);
                    }
                }
            }

            println!("{events} events, {errors} errors");
            if errors > 0 {
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Discovery messages a fully populated owner would produce, in publish order.
fn preview(
    class: OwnerClass,
    type_tag: u16,
    serial: &str,
    name: &str,
) -> Result<Vec<(String, Vec<u8>)>> {
    let scheme = TopicScheme::default();
    let catalog = StaticCatalog;
    let snapshot = OwnerSnapshot {
        serial: serial.to_string(),
        model: DeviceType::from_code(type_tag)
            .map_or_else(String::new, |ty| ty.label().to_string()),
        name: name.to_string(),
        software_version: String::new(),
        type_tag,
        station_serial: None,
        properties: BTreeMap::new(),
    };
    let owner = OwnerIdentity::new(&scheme, class, &snapshot);

    let mut messages = vec![(
        owner.topics.discovery.clone(),
        encode_discovery(&owner.device, &owner.discovery_payload())?,
    )];

    for property in catalog.declared(class, type_tag) {
        if !OwnerIdentity::surfaces(&catalog, class, property) {
            continue;
        }
        let Some(entity) = PropertyIdentity::new(&scheme, &owner, property) else {
            continue;
        };
        let body = encode_discovery(&owner.device, &entity.payload)?;
        messages.push((entity.topics.discovery, body));
    }

    Ok(messages)
}

fn parse_type(arg: &str) -> Result<u16> {
    let code: u16 = arg
        .parse()
        .map_err(|_| CatalogError::UnknownType(arg.to_string()))?;
    DeviceType::from_code(code).ok_or_else(|| CatalogError::UnknownType(arg.to_string()))?;
    Ok(code)
}

fn print_help() {
    println!(
        r#"eufy-bridge CLI

USAGE:
    eufy-bridge <COMMAND> [OPTIONS]

COMMANDS:
    types                              List known device type codes
    catalog <device|station> <type>    Print the property schema for a type
    topics <component> <unique_id>     Print the topics of an entity
    preview <device|station> <type> <serial> [name]
                                       Print the discovery messages for an owner
    check <events-file>                Validate a JSON-lines event feed
    help                               Show this help message

EXAMPLES:
    eufy-bridge catalog device 1
    eufy-bridge preview device 1 T8113N1234 "Front Door"
    eufy-bridge topics binary_sensor T8113N1234_motionDetected
    eufy-bridge check events.jsonl
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_matches_published_identity() {
        let messages = preview(OwnerClass::Device, 1, "T8113N1234", "Front Door").unwrap();

        let (topic, body) = &messages[0];
        assert_eq!(topic, "homeassistant/camera/T8113N1234_camera/config");
        let owner: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(owner["name"], "Front Door");
        assert_eq!(owner["device"]["identifiers"][0], "T8113N1234");

        assert!(messages.len() > 1);
        for (topic, body) in &messages[1..] {
            let entity: serde_json::Value = serde_json::from_slice(body).unwrap();
            assert!(entity["name"].as_str().unwrap().starts_with("Front Door "), "{topic}");
            assert_eq!(
                entity["state_topic"],
                "homeassistant/camera/T8113N1234_camera/state"
            );
            assert!(!topic.contains("pictureUrl"));
        }
    }

    #[test]
    fn station_preview_uses_station_descriptor() {
        let messages = preview(OwnerClass::Station, 0, "T8010N5678", "Hall").unwrap();

        let (topic, body) = &messages[0];
        assert_eq!(topic, "homeassistant/sensor/T8010N5678_station/config");
        let owner: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(owner["name"], "Hall Station");
        assert_eq!(owner["device"]["identifiers"][0], "T8010N5678_station");
    }
}
