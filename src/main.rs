// ==============================================================================
// CLI for the XSD/XML to Avro Converter
// ==============================================================================
//
// Two subcommands:
//   - `xsd-avro schema <XSD> [OUTPUT]`        -- translate an XSD to Avro schema JSON
//   - `xsd-avro datum <XSD> <XML> [OUTPUT]`   -- build an Avro datum from an XML document

use std::fs;
use std::io;
use std::path::PathBuf;

use lexopt::prelude::*;
use xsd_avro::ConverterError;

const MAIN_HELP: &str = "\
xsd-avro - XSD/XML to Avro converter

Usage: xsd-avro <COMMAND>

Commands:
  schema  Translate an XSD document to Avro schema (.avsc) JSON
  datum   Build an Avro datum from an XML document and its XSD

Options:
  -h, --help    Print help";

const SCHEMA_HELP: &str = "\
Usage: xsd-avro schema [OPTIONS] <XSD> [OUTPUT]

Options:
  -q, --quiet   Suppress debug logging about dropped/collapsed constructs
  -h, --help    Print help";

const DATUM_HELP: &str = "\
Usage: xsd-avro datum [OPTIONS] <XSD> <XML> [OUTPUT]

Options:
  -q, --quiet   Suppress debug logging about dropped/unmapped XML content
  -h, --help    Print help";

struct SchemaArgs {
    xsd_path: String,
    output: Option<String>,
    quiet: bool,
}

struct DatumArgs {
    xsd_path: String,
    xml_path: String,
    output: Option<String>,
    quiet: bool,
}

fn parse_schema_args(parser: &mut lexopt::Parser) -> Result<SchemaArgs, lexopt::Error> {
    let mut quiet = false;
    let mut positionals: Vec<String> = Vec::new();

    while let Some(arg) = parser.next()? {
        match arg {
            Short('q') | Long("quiet") => quiet = true,
            Short('h') | Long("help") => {
                println!("{SCHEMA_HELP}");
                std::process::exit(0);
            }
            Value(val) => positionals.push(val.string()?),
            _ => return Err(arg.unexpected()),
        }
    }

    let xsd_path = positionals.first().cloned().ok_or_else(|| lexopt::Error::MissingValue {
        option: Some("XSD".to_string()),
    })?;
    let output = positionals.get(1).cloned();

    Ok(SchemaArgs { xsd_path, output, quiet })
}

fn parse_datum_args(parser: &mut lexopt::Parser) -> Result<DatumArgs, lexopt::Error> {
    let mut quiet = false;
    let mut positionals: Vec<String> = Vec::new();

    while let Some(arg) = parser.next()? {
        match arg {
            Short('q') | Long("quiet") => quiet = true,
            Short('h') | Long("help") => {
                println!("{DATUM_HELP}");
                std::process::exit(0);
            }
            Value(val) => positionals.push(val.string()?),
            _ => return Err(arg.unexpected()),
        }
    }

    let xsd_path = positionals.first().cloned().ok_or_else(|| lexopt::Error::MissingValue {
        option: Some("XSD".to_string()),
    })?;
    let xml_path = positionals.get(1).cloned().ok_or_else(|| lexopt::Error::MissingValue {
        option: Some("XML".to_string()),
    })?;
    let output = positionals.get(2).cloned();

    Ok(DatumArgs {
        xsd_path,
        xml_path,
        output,
        quiet,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut parser = lexopt::Parser::from_env();

    let subcommand = match parser.next() {
        Ok(Some(Value(val))) => val.string()?,
        Ok(Some(Short('h') | Long("help"))) => {
            println!("{MAIN_HELP}");
            return Ok(());
        }
        Ok(Some(other)) => {
            let err = other.unexpected();
            eprintln!("error: {err}\n\n{MAIN_HELP}");
            std::process::exit(2);
        }
        Ok(None) => {
            eprintln!("error: a subcommand is required\n\n{MAIN_HELP}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    match subcommand.as_str() {
        "schema" => {
            let args = parse_schema_args(&mut parser)?;
            run_schema(args)
        }
        "datum" => {
            let args = parse_datum_args(&mut parser)?;
            run_datum(args)
        }
        other => {
            eprintln!("error: unknown subcommand `{other}`\n\n{MAIN_HELP}");
            std::process::exit(2);
        }
    }
}

fn run_schema(args: SchemaArgs) -> Result<(), Box<dyn std::error::Error>> {
    let xsd_text = fs::read_to_string(&args.xsd_path)
        .map_err(|e| format!("{e}: read {}", args.xsd_path))?;

    let mut translator = xsd_avro::SchemaTranslator::new();
    translator.quiet(args.quiet);
    let schema = translator.translate(&xsd_text).map_err(describe)?;

    let json_str = serde_json::to_string_pretty(&xsd_avro::schema_to_json(&schema))?;
    write_output(&args.output, &json_str)?;
    Ok(())
}

fn run_datum(args: DatumArgs) -> Result<(), Box<dyn std::error::Error>> {
    let xsd_text = fs::read_to_string(&args.xsd_path)
        .map_err(|e| format!("{e}: read {}", args.xsd_path))?;
    let xml_text = fs::read_to_string(&args.xml_path)
        .map_err(|e| format!("{e}: read {}", args.xml_path))?;

    let schema = xsd_avro::create_schema(&xsd_text).map_err(describe)?;

    let mut builder = xsd_avro::DatumBuilder::new();
    builder.quiet(args.quiet);
    let datum = builder.build(&schema, &xml_text).map_err(describe)?;

    let json_str = serde_json::to_string_pretty(&avro_value_to_json(&datum))?;
    write_output(&args.output, &json_str)?;
    Ok(())
}

fn describe(err: ConverterError) -> Box<dyn std::error::Error> {
    Box::new(err)
}

/// A minimal JSON rendering of a built datum, for CLI display only -- the
/// library's own consumers work with `apache_avro::types::Value` directly.
fn avro_value_to_json(value: &apache_avro::types::Value) -> serde_json::Value {
    use apache_avro::types::Value as V;
    use serde_json::Value as J;
    match value {
        V::Null => J::Null,
        V::Boolean(b) => J::Bool(*b),
        V::Int(n) => J::from(*n),
        V::Long(n) => J::from(*n),
        V::Float(n) => J::from(*n),
        V::Double(n) => J::from(*n),
        V::Bytes(b) => J::String(b.iter().map(|byte| format!("{byte:02x}")).collect()),
        V::String(s) => J::String(s.clone()),
        V::Enum(_, symbol) => J::String(symbol.clone()),
        V::Union(_, inner) => avro_value_to_json(inner),
        V::Array(items) => J::Array(items.iter().map(avro_value_to_json).collect()),
        V::Map(entries) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in entries {
                obj.insert(k.clone(), avro_value_to_json(v));
            }
            J::Object(obj)
        }
        V::Record(fields) => {
            let mut obj = serde_json::Map::new();
            for (name, v) in fields {
                obj.insert(name.clone(), avro_value_to_json(v));
            }
            J::Object(obj)
        }
        other => J::String(format!("{other:?}")),
    }
}

fn write_output(output: &Option<String>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file_path = output.as_deref().filter(|s| *s != "-");
    match file_path {
        None => {
            use std::io::Write;
            if let Err(e) = write!(io::stdout(), "{content}") {
                if e.kind() == io::ErrorKind::BrokenPipe {
                    return Ok(());
                }
                return Err(format!("{e}: write to stdout").into());
            }
            Ok(())
        }
        Some(file_path) => {
            let path = PathBuf::from(file_path);
            fs::write(&path, format!("{content}\n"))
                .map_err(|e| format!("{e}: write {}", path.display()).into())
        }
    }
}
