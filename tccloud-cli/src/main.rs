use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

use tccloud_core::provider::{Provider, ResourceType};
use tccloud_core::resource::{Resource, ResourceId, State, Value};
use tccloud_core::schema::{AttributeType, ResourceSchema};
use tccloud_provider::resources::resource_types;
use tccloud_provider::{ProviderConfig, TencentCloudProvider};

#[derive(Parser)]
#[command(name = "tccloud")]
#[command(about = "Inspect and manage Tencent Cloud VPC and MySQL resources", long_about = None)]
struct Cli {
    /// Path to provider config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query a data source (e.g. vpc_instances, mysql_backup_list)
    List {
        /// Data source type
        kind: String,

        /// Primary id filter of the data source (vpc_id, subnet_id, mysql_id, ...)
        #[arg(long)]
        id: Option<String>,

        /// Name filter
        #[arg(long)]
        name: Option<String>,

        /// Extra filter as key=value, may be repeated
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
    /// Read a single resource by its identifier
    Show {
        /// Resource type
        resource_type: String,
        /// Cloud identifier (e.g. vpc-1a2b3c4d, cdb-xxxx#user)
        identifier: String,
    },
    /// Delete a single resource by its identifier
    Delete {
        /// Resource type
        resource_type: String,
        /// Cloud identifier
        identifier: String,

        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
    /// Validate a resource description file without calling the API
    Validate {
        /// Path to resource .json file
        file: PathBuf,
    },
    /// List supported resource and data source types
    Types,
    /// Show the attributes of a resource or data source type
    Describe {
        /// Resource or data source type
        resource_type: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::List {
            kind,
            id,
            name,
            filters,
        } => run_list(config, &kind, id, name, &filters).await,
        Commands::Show {
            resource_type,
            identifier,
        } => run_show(config, &resource_type, &identifier).await,
        Commands::Delete {
            resource_type,
            identifier,
            auto_approve,
        } => run_delete(config, &resource_type, &identifier, auto_approve).await,
        Commands::Validate { file } => run_validate(&file),
        Commands::Types => {
            run_types();
            Ok(())
        }
        Commands::Describe { resource_type } => run_describe(&resource_type),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ProviderConfig, String> {
    let config = match path {
        Some(path) => ProviderConfig::load(path).map_err(|e| e.to_string())?,
        None => ProviderConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn get_provider(path: Option<&Path>) -> Result<TencentCloudProvider, String> {
    let config = load_config(path)?;
    TencentCloudProvider::new(config).map_err(|e| e.to_string())
}

fn find_type(name: &str) -> Result<Box<dyn ResourceType>, String> {
    resource_types()
        .into_iter()
        .find(|t| t.name() == name)
        .ok_or_else(|| {
            format!(
                "unknown type '{}', run `tccloud types` to list supported types",
                name
            )
        })
}

/// Attribute that `--id` filters on for each data source
fn id_filter_key(kind: &str) -> Option<&'static str> {
    match kind {
        "vpc_instances" => Some("vpc_id"),
        "vpc_subnets" => Some("subnet_id"),
        "vpc_route_tables" => Some("route_table_id"),
        "mysql_backup_list" | "mysql_parameter_list" => Some("mysql_id"),
        _ => None,
    }
}

async fn run_list(
    config: Option<&Path>,
    kind: &str,
    id: Option<String>,
    name: Option<String>,
    filters: &[String],
) -> Result<(), String> {
    let resource_type = find_type(kind)?;
    if !resource_type.is_data_source() {
        return Err(format!("'{}' is a resource, not a data source", kind));
    }
    let schema = resource_type.schema();

    let mut query = Resource::new(kind, "cli").with_read_only(true);
    if let Some(id) = id {
        let key = id_filter_key(kind)
            .ok_or_else(|| format!("data source '{}' has no id filter", kind))?;
        query = query.with_attribute(key, id);
    }
    if let Some(name) = name {
        query = query.with_attribute("name", name);
    }
    for filter in filters {
        let (key, raw) = filter
            .split_once('=')
            .ok_or_else(|| format!("filter '{}' should be KEY=VALUE", filter))?;
        query = query.with_attribute(key, parse_filter_value(&schema, key, raw)?);
    }

    let provider = get_provider(config)?;
    let state = provider.query(&query).await.map_err(|e| e.to_string())?;

    print_state(&state);
    Ok(())
}

/// Int attributes in the schema take integer filter values
fn parse_filter_value(schema: &ResourceSchema, key: &str, raw: &str) -> Result<Value, String> {
    let Some(attribute) = schema.attributes.get(key) else {
        return Err(format!("unknown filter '{}' for {}", key, schema.resource_type));
    };
    if matches!(
        attribute.attr_type,
        AttributeType::Int | AttributeType::BoundedInt { .. }
    ) {
        raw.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("filter '{}' expects an integer, got '{}'", key, raw))
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

async fn run_show(
    config: Option<&Path>,
    resource_type: &str,
    identifier: &str,
) -> Result<(), String> {
    find_type(resource_type)?;
    let provider = get_provider(config)?;
    let id = ResourceId::new(resource_type, identifier);

    let state = provider
        .read(&id, Some(identifier))
        .await
        .map_err(|e| e.to_string())?;

    if !state.exists {
        return Err(format!("{} {} does not exist", resource_type, identifier));
    }
    print_state(&state);
    Ok(())
}

async fn run_delete(
    config: Option<&Path>,
    resource_type: &str,
    identifier: &str,
    auto_approve: bool,
) -> Result<(), String> {
    let kind = find_type(resource_type)?;
    if kind.is_data_source() {
        return Err(format!("'{}' is a data source and cannot be deleted", resource_type));
    }

    if !auto_approve {
        println!(
            "{} {} {}",
            "Delete".red().bold(),
            resource_type.cyan().bold(),
            identifier
        );
        println!();
        println!("  Only 'yes' will be accepted to confirm.");
        print!("  Enter a value: ");
        std::io::Write::flush(&mut std::io::stdout()).map_err(|e| e.to_string())?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .map_err(|e| format!("Failed to read input: {}", e))?;
        if input.trim() != "yes" {
            println!();
            println!("{}", "Delete cancelled.".yellow());
            return Ok(());
        }
    }

    let provider = get_provider(config)?;
    let id = ResourceId::new(resource_type, identifier);
    provider
        .delete(&id, identifier)
        .await
        .map_err(|e| e.to_string())?;

    println!("  {} {}", "✓".green(), id);
    Ok(())
}

fn run_validate(file: &Path) -> Result<(), String> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read file {}: {}", file.display(), e))?;
    let resource = parse_resource(&content)?;

    let resource_type = find_type(&resource.id.resource_type)?;
    let schema = resource_type.schema();

    let mut attributes = resource.attributes.clone();
    schema.apply_defaults(&mut attributes);
    if let Err(errors) = schema.validate(&attributes) {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| format!("{}: {}", resource.id, e))
            .collect();
        return Err(format!("Validation failed:\n  {}", messages.join("\n  ")));
    }

    println!(
        "{}",
        format!("✓ {} is valid.", resource.id).green().bold()
    );
    Ok(())
}

fn run_types() {
    let (data_sources, resources): (Vec<_>, Vec<_>) =
        resource_types().into_iter().partition(|t| t.is_data_source());

    for (title, types) in [("Resources:", &resources), ("Data sources:", &data_sources)] {
        println!("{}", title.cyan().bold());
        for t in types {
            let schema = t.schema();
            println!(
                "  {:<22} {}",
                t.name(),
                schema.description.as_deref().unwrap_or("")
            );
        }
        println!();
    }
}

fn run_describe(resource_type: &str) -> Result<(), String> {
    let schema = find_type(resource_type)?.schema();

    println!("{}", schema.resource_type.cyan().bold());
    if let Some(description) = &schema.description {
        println!("  {}", description);
    }
    println!();
    for line in attribute_lines(&schema) {
        println!("  {}", line);
    }
    Ok(())
}

/// One line per attribute, sorted by name
fn attribute_lines(schema: &ResourceSchema) -> Vec<String> {
    let mut attributes: Vec<_> = schema.attributes.values().collect();
    attributes.sort_by(|a, b| a.name.cmp(&b.name));

    attributes
        .into_iter()
        .map(|attr| {
            let mut flags = Vec::new();
            if attr.required {
                flags.push("required".to_string());
            }
            if attr.computed {
                flags.push("computed".to_string());
            }
            if attr.force_new {
                flags.push("force new".to_string());
            }
            if attr.write_only {
                flags.push("write only".to_string());
            }
            if let Some(default) = &attr.default {
                flags.push(format!("default {}", value_to_json(default)));
            }

            let mut line = format!("{}: {}", attr.name, attr.attr_type.type_name());
            if !flags.is_empty() {
                line.push_str(&format!(" ({})", flags.join(", ")));
            }
            if let Some(description) = &attr.description {
                line.push_str(&format!(" - {}", description));
            }
            line
        })
        .collect()
}

/// Parse `{"type": "...", "name": "...", "attributes": {...}}`
fn parse_resource(content: &str) -> Result<Resource, String> {
    let json: JsonValue =
        serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {}", e))?;

    let resource_type = json
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or("resource file needs a string 'type'")?;
    let name = json.get("name").and_then(JsonValue::as_str).unwrap_or("main");

    let mut resource = Resource::new(resource_type, name);
    if let Some(attributes) = json.get("attributes") {
        let JsonValue::Object(map) = attributes else {
            return Err("'attributes' should be an object".to_string());
        };
        for (key, value) in map {
            if let Some(value) = json_to_value(value)? {
                resource.attributes.insert(key.clone(), value);
            }
        }
    }
    Ok(resource)
}

/// `null` means unset
fn json_to_value(json: &JsonValue) -> Result<Option<Value>, String> {
    let value = match json {
        JsonValue::Null => return Ok(None),
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => Value::Int(
            n.as_i64()
                .ok_or_else(|| format!("{} is not an integer", n))?,
        ),
        JsonValue::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.extend(json_to_value(item)?);
            }
            Value::List(values)
        }
        JsonValue::Object(map) => {
            let mut values = HashMap::new();
            for (key, item) in map {
                if let Some(value) = json_to_value(item)? {
                    values.insert(key.clone(), value);
                }
            }
            Value::Map(values)
        }
    };
    Ok(Some(value))
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Int(n) => JsonValue::from(*n),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::List(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => {
            let mut object: Vec<_> = map.iter().collect();
            object.sort_by(|a, b| a.0.cmp(b.0));
            JsonValue::Object(
                object
                    .into_iter()
                    .map(|(k, v)| (k.clone(), value_to_json(v)))
                    .collect(),
            )
        }
    }
}

fn print_state(state: &State) {
    if let Some(identifier) = &state.identifier {
        println!("{} {}", state.id.resource_type.cyan().bold(), identifier.bold());
    }

    let mut keys: Vec<&String> = state.attributes.keys().collect();
    keys.sort();
    for key in keys {
        let value = &state.attributes[key];
        let rendered = match value {
            Value::List(_) | Value::Map(_) => serde_json::to_string_pretty(&value_to_json(value))
                .unwrap_or_default()
                .replace('\n', "\n    "),
            _ => value_to_json(value).to_string(),
        };
        println!("  {}: {}", key.bold(), rendered);
    }
}
