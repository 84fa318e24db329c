mod dot;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plustree_core::{BPlusTree, DEFAULT_ORDER};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

type Tree = BPlusTree<i64, String>;

#[derive(Parser)]
#[command(name = "plustree")]
#[command(about = "Inspect and visualize an in-memory B+ tree")]
struct Cli {
    /// Log filter, e.g. `debug` to trace splits and merges. `RUST_LOG` overrides it.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell over an i64 -> string tree.
    Repl {
        #[arg(short, long, default_value_t = DEFAULT_ORDER)]
        order: usize,
    },

    /// Build a tree and print it as a Graphviz digraph.
    Dot {
        #[arg(short, long, default_value_t = DEFAULT_ORDER)]
        order: usize,

        #[arg(short, long, value_delimiter = ',', required = true)]
        keys: Vec<i64>,

        #[arg(short, long, value_delimiter = ',')]
        delete: Vec<i64>,
    },

    /// Replay a small insert/delete scenario, printing the tree after each step.
    Demo {
        #[arg(short, long, default_value_t = 3)]
        order: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Repl { order } => run_repl(order),
        Commands::Dot { order, keys, delete } => run_dot(order, &keys, &delete),
        Commands::Demo { order } => run_demo(order),
    }
}

fn new_tree(order: usize) -> Result<Tree> {
    BPlusTree::new(order).with_context(|| format!("Failed to create tree of order {}", order))
}

fn run_dot(order: usize, keys: &[i64], delete: &[i64]) -> Result<()> {
    let mut tree = new_tree(order)?;
    for &key in keys {
        tree.insert(key, key.to_string());
    }
    for key in delete {
        if tree.remove(key).is_none() {
            info!(key, "skipping delete of absent key");
        }
    }

    print!("{}", dot::render(&tree));
    Ok(())
}

fn run_demo(order: usize) -> Result<()> {
    let mut tree = new_tree(order)?;
    println!("B+ tree of order {}\n", order);

    for key in [10, 20, 5, 6, 12, 30, 7, 17] {
        tree.insert(key, format!("value_{}", key));
        println!("insert {}:\n{}\n", key, tree);
    }

    for key in [6, 5, 7, 10] {
        tree.delete(&key)?;
        println!("delete {}:\n{}\n", key, tree);
    }

    tree.check_invariants().context("Invariant check failed")?;
    println!("height {}, {} entries, {} nodes", tree.height(), tree.len(), tree.node_count());
    Ok(())
}

fn run_repl(order: usize) -> Result<()> {
    let mut tree = new_tree(order)?;
    let mut rl = DefaultEditor::new()?;

    println!("B+ tree REPL (order {})", order);
    println!("Commands: insert <k> <v>, delete <k>, search <k>, get <k>, scan <k>,");
    println!("          range <a> <b>, print, dot, check, stats, quit");
    println!();

    loop {
        let readline = rl.readline("plustree> ");

        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                if line == "quit" || line == "exit" {
                    break;
                }

                if let Err(e) = handle_command(&mut tree, line) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    println!("Goodbye");
    Ok(())
}

fn parse_key(arg: &str) -> Result<i64> {
    arg.parse()
        .with_context(|| format!("Invalid key '{}': expected an integer", arg))
}

fn handle_command(tree: &mut Tree, line: &str) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(());
    }

    match parts[0] {
        "insert" | "put" => {
            if parts.len() < 3 {
                anyhow::bail!("Usage: insert <key> <value>");
            }

            let key = parse_key(parts[1])?;
            let value = parts[2..].join(" ");

            if tree.insert(key, value) {
                println!("OK");
            } else {
                println!("(exists, unchanged)");
            }
        }

        "delete" | "del" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: delete <key>");
            }

            let key = parse_key(parts[1])?;
            let value = tree.delete(&key)?;
            println!("Removed {} => {}", key, value);
        }

        "search" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: search <key>");
            }

            println!("{}", tree.search(&parse_key(parts[1])?));
        }

        "get" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: get <key>");
            }

            match tree.get(&parse_key(parts[1])?) {
                Some(value) => println!("{}", value),
                None => println!("(nil)"),
            }
        }

        "scan" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: scan <start>");
            }

            for (key, value) in tree.range_scan(&parse_key(parts[1])?) {
                println!("{} => {}", key, value);
            }
        }

        "range" => {
            if parts.len() != 3 {
                anyhow::bail!("Usage: range <start> <end>");
            }

            let start = parse_key(parts[1])?;
            let end = parse_key(parts[2])?;
            for (key, value) in tree.range(&start, &end) {
                println!("{} => {}", key, value);
            }
        }

        "print" => {
            println!("{}", tree);
        }

        "dot" => {
            print!("{}", dot::render(tree));
        }

        "check" => {
            tree.check_invariants()?;
            println!("OK");
        }

        "stats" => {
            println!("Order: {}", tree.order());
            println!("Entries: {}", tree.len());
            println!("Height: {}", tree.height());
            println!("Nodes: {}", tree.node_count());
            println!("Leaves: {}", tree.leaves().count());
        }

        _ => {
            anyhow::bail!("Unknown command: {}", parts[0]);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_command_roundtrip() {
        let mut tree = new_tree(3).unwrap();
        handle_command(&mut tree, "insert 5 five").unwrap();
        handle_command(&mut tree, "insert 1 one").unwrap();
        handle_command(&mut tree, "insert 9 nine and more").unwrap();

        assert_eq!(tree.get(&9), Some(&"nine and more".to_string()));
        assert!(handle_command(&mut tree, "check").is_ok());

        handle_command(&mut tree, "delete 5").unwrap();
        assert!(!tree.search(&5));
    }

    #[test]
    fn test_handle_command_errors() {
        let mut tree = new_tree(4).unwrap();
        assert!(handle_command(&mut tree, "delete 1").is_err());
        assert!(handle_command(&mut tree, "insert x y").is_err());
        assert!(handle_command(&mut tree, "insert 1").is_err());
        assert!(handle_command(&mut tree, "frobnicate").is_err());
    }

    #[test]
    fn test_invalid_order() {
        assert!(new_tree(2).is_err());
    }

    #[test]
    fn test_cli_parses_key_lists() {
        let cli = Cli::try_parse_from(["plustree", "dot", "--keys", "3,1,2", "--delete", "1"]).unwrap();
        match cli.command {
            Commands::Dot { order, keys, delete } => {
                assert_eq!(order, DEFAULT_ORDER);
                assert_eq!(keys, vec![3, 1, 2]);
                assert_eq!(delete, vec![1]);
            }
            _ => panic!("expected dot subcommand"),
        }
    }
}
