//! `treetext` CLI: convert JSON trees to INI/XML and render them as text or
//! HTML from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON as INI (stdin → stdout)
//! echo '{"name":"app","db":{"port":5432}}' | treetext encode --format ini
//!
//! # Encode JSON as XML under a custom root, file to file
//! treetext encode --format xml --root config -i data.json -o data.xml
//!
//! # Decode INI or XML back to pretty-printed JSON
//! treetext decode --format xml -i data.xml
//!
//! # Render every entry through printf-style templates
//! treetext render --scalar '%s=%s%s' --complex '[%s] %s%s' --glue ', ' -i data.json
//!
//! # Nested HTML lists and menus
//! treetext tree --as ol -i data.json
//! treetext menu --class nav -i menu.json
//! ```
//!
//! Set `RUST_LOG=treetext=debug` for diagnostics on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treetext::html::{show_menu, show_tree};
use treetext::xml::Element;
use treetext::{ini, render, xml, Map, Templates, Tree, NO_MARKERS};

#[derive(Parser)]
#[command(
    name = "treetext",
    version,
    about = "Convert JSON trees to INI/XML and render them as text or HTML",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Ini,
    Xml,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON as INI or XML
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Target format
        #[arg(short, long, value_enum, default_value_t = Format::Ini)]
        format: Format,
        /// Dotted prefix for INI section headers (e.g. "app.v1")
        #[arg(long)]
        parent: Option<String>,
        /// Root element name for XML output
        #[arg(long, default_value = xml::DEFAULT_ROOT)]
        root: String,
    },
    /// Decode INI or XML into pretty-printed JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Source format
        #[arg(short, long, value_enum, default_value_t = Format::Ini)]
        format: Format,
    },
    /// Render each entry of a JSON tree through printf-style templates
    Render {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Template for scalar entries, given (key, value, marker)
        #[arg(long)]
        scalar: String,
        /// Template for nested entries, given (key, rendered children, marker)
        #[arg(long)]
        complex: Option<String>,
        /// Separator between the rendered children of a nested entry
        #[arg(long, default_value = "")]
        glue: String,
        /// JSON file holding the marker overlay
        #[arg(long)]
        markers: Option<String>,
        /// Separator between top-level results
        #[arg(long, default_value = "\n")]
        join: String,
    },
    /// Render a JSON tree as nested HTML lists
    Tree {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Container tag: ul/ol use <li> items, div uses <div>, others <span>
        #[arg(long = "as", default_value = "ul")]
        tag: String,
    },
    /// Render a JSON map of label → href (nested maps are submenus) as a menu
    Menu {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Class attribute for the outermost <ul>
        #[arg(long)]
        class: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            format,
            parent,
            root,
        } => {
            let tree = read_tree(input.as_deref())?;
            let text = match format {
                Format::Ini => {
                    let parent: Vec<&str> = parent
                        .as_deref()
                        .map(|p| p.split('.').filter(|s| !s.is_empty()).collect())
                        .unwrap_or_default();
                    ini::encode_with_parent(&tree, &parent).context("Failed to encode JSON as INI")?
                }
                Format::Xml => xml::encode_with_root(&tree, Element::new(root))
                    .and_then(|el| el.to_xml_string())
                    .context("Failed to encode JSON as XML")?,
            };
            debug!(?format, bytes = text.len(), "encoded");
            write_output(output.as_deref(), &text)?;
        }
        Commands::Decode {
            input,
            output,
            format,
        } => {
            let text = read_input(input.as_deref())?;
            let tree = match format {
                Format::Ini => ini::decode(&text).context("Failed to decode INI")?,
                Format::Xml => xml::from_str(&text).context("Failed to decode XML")?,
            };
            let pretty = serde_json::to_string_pretty(&tree)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Render {
            input,
            output,
            scalar,
            complex,
            glue,
            markers,
            join,
        } => {
            let tree = read_tree(input.as_deref())?;
            let markers = match markers {
                Some(path) => read_tree(Some(&path))?,
                None => NO_MARKERS,
            };
            let mut templates = Templates::new(scalar).with_glue(glue);
            templates.complex = complex;
            let lines = render(&tree, &templates, &markers).context("Failed to render templates")?;
            write_output(output.as_deref(), &lines.join(&join))?;
        }
        Commands::Tree { input, output, tag } => {
            let tree = read_tree(input.as_deref())?;
            let lines = show_tree(&tree, &tag).context("Failed to build HTML list")?;
            write_output(output.as_deref(), &lines.join("\n"))?;
        }
        Commands::Menu {
            input,
            output,
            class,
        } => {
            let tree = read_tree(input.as_deref())?;
            let attrs = class.map(|c| Tree::Map(Map::new().with("class", c)));
            let lines = show_menu(&tree, attrs.as_ref()).context("Failed to build HTML menu")?;
            write_output(output.as_deref(), &lines.join("\n"))?;
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "treetext=warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_tree(path: Option<&str>) -> Result<Tree> {
    let json = read_input(path)?;
    Tree::from_json_str(&json).context("Input is not valid JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
