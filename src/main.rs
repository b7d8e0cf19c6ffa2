use attrtree::{AttrTree, Node, Path, ViewRef, render};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::Value;
use std::fs;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use anyhow::Context;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "attrtree")]
#[command(about = "Inspect and edit ordered attribute trees", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tree as an indented outline.
    Show {
        #[arg(long)]
        tree: String,
    },

    /// Print every stored value with its dotted path.
    Paths {
        #[arg(long)]
        tree: String,
    },

    /// Store a JSON value at a dotted path and write the tree back.
    Set {
        #[arg(long)]
        tree: String,

        #[arg(long)]
        path: String,

        /// JSON text; quote strings, e.g. '"label"'.
        #[arg(long)]
        value: String,

        /// Write here instead of overwriting --tree.
        #[arg(short = 'o', long)]
        out: Option<String>,

        /// Start from an empty tree when --tree does not exist.
        #[arg(long)]
        create: bool,

        /// Freeze the shape of the whole tree first, so only existing paths can be set.
        #[arg(long)]
        fix: bool,
    },

    /// Merge every value of another tree into --tree.
    Merge {
        #[arg(long)]
        tree: String,

        #[arg(long)]
        with: String,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },

    /// Resolve a view reference such as "A.B * C.D" and print it as JSON.
    Resolve {
        #[arg(long)]
        tree: String,

        #[arg(long = "ref")]
        reference: String,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_tree(path: &str) -> Result<AttrTree<Value>> {
    let text = fs::read_to_string(path).with_context(|| format!("read tree file {}", path))?;
    let tree = serde_json::from_str(&text).with_context(|| format!("parse tree file {}", path))?;
    Ok(tree)
}

fn write_tree(tree: &AttrTree<Value>, path: &str) -> Result<()> {
    let mut json = serde_json::to_string_pretty(tree)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write tree file {}", path))?;
    println!("Wrote {}", path);
    Ok(())
}

/// Load (or, with `create`, start) a tree and store `value_json` at `path`.
/// With `fix` the whole tree is frozen first, so only existing paths can be set.
fn set_value(
    tree_file: &str,
    path: &str,
    value_json: &str,
    create: bool,
    fix: bool,
) -> Result<AttrTree<Value>> {
    let mut tree = if create && !std::path::Path::new(tree_file).exists() {
        debug!(file = %tree_file, "starting from an empty tree");
        AttrTree::new()
    } else {
        load_tree(tree_file)?
    };
    if fix {
        tree.set_fixed_all(true);
    }

    let path: Path = path.parse().with_context(|| format!("bad path {:?}", path))?;
    let value: Value = serde_json::from_str(value_json)
        .with_context(|| format!("value is not JSON (quote strings): {}", value_json))?;

    if let Some(Node::Tree(_)) = tree.set_path(&path, value)? {
        warn!(%path, "replaced a sub-tree with a value");
    }
    Ok(tree)
}

/// Resolve `reference` against `tree`: a single value, or an array for an overlay.
fn resolve_json(tree: &AttrTree<Value>, reference: &str) -> Result<String> {
    let view_ref: ViewRef = reference.parse()?;
    let resolved = view_ref
        .resolve(tree)
        .with_context(|| format!("resolve {}", view_ref))?;
    Ok(serde_json::to_string_pretty(&resolved)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Show { tree } => {
            let tree = load_tree(&tree)?;
            print!("{}", render::render_outline(&tree)?);
        }
        Commands::Paths { tree } => {
            let tree = load_tree(&tree)?;
            print!("{}", render::render_paths(&tree)?);
        }
        Commands::Set {
            tree: tree_file,
            path,
            value,
            out,
            create,
            fix,
        } => {
            let tree = set_value(&tree_file, &path, &value, create, fix)?;
            write_tree(&tree, out.as_deref().unwrap_or(&tree_file))?;
        }
        Commands::Merge {
            tree: tree_file,
            with,
            out,
        } => {
            let mut tree = load_tree(&tree_file)?;
            let other = load_tree(&with)?;
            tree.update(&other)
                .with_context(|| format!("merge {} into {}", with, tree_file))?;
            write_tree(&tree, out.as_deref().unwrap_or(&tree_file))?;
        }
        Commands::Resolve { tree, reference } => {
            let tree = load_tree(&tree)?;
            println!("{}", resolve_json(&tree, &reference)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Fresh path under the system temp dir; removed on drop.
    struct TempFile(String);

    impl TempFile {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "attrtree-{}-{}.json",
                std::process::id(),
                name
            ));
            let _ = fs::remove_file(&path);
            Self(path.to_string_lossy().into_owned())
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn set_with_create_then_reload() {
        let file = TempFile::new("create");
        assert!(set_value(&file.0, "Example.Path1", "42", false, false).is_err());

        let tree = set_value(&file.0, "Example.Path1", "42", true, false).unwrap();
        write_tree(&tree, &file.0).unwrap();
        let tree = set_value(&file.0, "Example.Path2", r#""label""#, false, false).unwrap();
        write_tree(&tree, &file.0).unwrap();

        let loaded = load_tree(&file.0).unwrap();
        assert_eq!(
            loaded.data().into_iter().collect::<Vec<_>>(),
            vec![
                (path("Example.Path1"), &json!(42)),
                (path("Example.Path2"), &json!("label")),
            ]
        );
    }

    #[test]
    fn set_with_fix_only_overwrites() {
        let file = TempFile::new("fix");
        let tree = set_value(&file.0, "Test.Path", "1", true, false).unwrap();
        write_tree(&tree, &file.0).unwrap();

        let err = set_value(&file.0, "Other.Path", "2", false, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No attribute 'Other' in this AttrTree, and none can be added because fixed=True"
        );

        let tree = set_value(&file.0, "Test.Path", "3", false, true).unwrap();
        assert!(tree.fixed());
        assert_eq!(tree.leaf(&path("Test.Path")), Ok(&json!(3)));
    }

    #[test]
    fn set_rejects_non_json_values() {
        let file = TempFile::new("badvalue");
        assert!(set_value(&file.0, "A.B", "not json", true, false).is_err());
        assert!(set_value(&file.0, "A..B", "1", true, false).is_err());
    }

    #[test]
    fn resolve_prints_value_or_array() {
        let mut tree: AttrTree<Value> = AttrTree::new();
        tree.set_path(&path("Example.Path1"), json!(1)).unwrap();
        tree.set_path(&path("Example.Path2"), json!({"k": "v"})).unwrap();

        assert_eq!(resolve_json(&tree, "Example.Path1").unwrap(), "1");
        let both: Value =
            serde_json::from_str(&resolve_json(&tree, "Example.Path1 * Example.Path2").unwrap())
                .unwrap();
        assert_eq!(both, json!([1, {"k": "v"}]));
        assert!(resolve_json(&tree, "Example.Missing").is_err());
    }
}
