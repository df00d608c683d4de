// =====================================================================
// File: bin/jumptree-cli.rs
//
// Interactive driver for a JumpTree. Reads one command per line from
// stdin and prints its result to stdout, until EXIT/QUIT or EOF.
//
//   CONSTRUCT <k1> <v1> [<k2> <v2> ...] -> bulk-load, replacing the tree
//   INSERT <key> <id>                   -> upsert
//   DELETE <key>                        -> remove if present
//   FIND <key>                          -> the stored value, or -1
//   SUCC <key>                          -> successor, or -1
//   PRED <key>                          -> predecessor, or -1
//   HEIGHT                              -> current tree height
//   PRINT                               -> debug dump
//   EXIT / QUIT                         -> terminate the program
// =====================================================================
use std::io::{self, BufRead};

use clap::Parser;
use jumptree::{JumpTree, JumpTreeConfig};

enum CommandResult {
    Continue,
    Exit,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = JumpTreeConfig::parse();
    let mut tree = JumpTree::from_config(&config);

    let stdin = io::stdin();
    for input_line in stdin.lock().lines() {
        let full_command = input_line?;
        let (cmd, args) = parse_command(&full_command);

        match handle_command(&cmd, &args, &mut tree) {
            CommandResult::Exit => break,
            CommandResult::Continue => (),
        }
    }
    Ok(())
}

/// Parses a raw input line into a command and its arguments. The first
/// token is normalized to uppercase; the rest are left as-is.
fn parse_command(line: &str) -> (String, Vec<String>) {
    let trimmed = line.trim();
    let mut segments = trimmed.split_whitespace();
    let cmd = segments.next().unwrap_or("").to_uppercase();
    let args: Vec<String> = segments.map(|s| s.to_string()).collect();
    (cmd, args)
}

fn handle_command(cmd: &str, args: &[String], tree: &mut JumpTree) -> CommandResult {
    let usage = "Syntax: CONSTRUCT <k v>..., INSERT <k> <v>, DELETE <k>, FIND <k>, SUCC <k>, PRED <k>, HEIGHT, PRINT, EXIT";

    match cmd {
        "CONSTRUCT" => {
            if args.is_empty() || args.len() % 2 != 0 {
                println!("{usage}");
                return CommandResult::Continue;
            }
            let mut pairs = Vec::with_capacity(args.len() / 2);
            for chunk in args.chunks(2) {
                match (chunk[0].parse::<i32>(), chunk[1].parse::<i32>()) {
                    (Ok(k), Ok(v)) => pairs.push((k, v)),
                    _ => {
                        println!("ERR: keys and values must be integers");
                        return CommandResult::Continue;
                    }
                }
            }
            tree.construct(pairs);
            println!("OK");
        }
        "INSERT" => match args {
            [k, v] => match (k.parse::<i32>(), v.parse::<i32>()) {
                (Ok(k), Ok(v)) => {
                    tree.insert_key(k, v);
                    println!("OK");
                }
                _ => println!("ERR: key and value must be integers"),
            },
            _ => println!("{usage}"),
        },
        "DELETE" => match args {
            [k] => match k.parse::<i32>() {
                Ok(k) => {
                    tree.delete_key(k);
                    println!("OK");
                }
                Err(_) => println!("ERR: key must be an integer"),
            },
            _ => println!("{usage}"),
        },
        "FIND" => match args {
            [k] => match k.parse::<i32>() {
                Ok(k) => println!("{}", tree.search(k)),
                Err(_) => println!("ERR: key must be an integer"),
            },
            _ => println!("{usage}"),
        },
        "SUCC" => match args {
            [k] => match k.parse::<i32>() {
                Ok(k) => println!("{}", tree.successor(k)),
                Err(_) => println!("ERR: key must be an integer"),
            },
            _ => println!("{usage}"),
        },
        "PRED" => match args {
            [k] => match k.parse::<i32>() {
                Ok(k) => println!("{}", tree.predecessor(k)),
                Err(_) => println!("ERR: key must be an integer"),
            },
            _ => println!("{usage}"),
        },
        "HEIGHT" => println!("{}", tree.tree_height()),
        "PRINT" => print!("{}", tree.print()),
        "EXIT" | "QUIT" => return CommandResult::Exit,
        "" => {}
        other => println!("ERR: unknown command '{other}'. {usage}"),
    }

    CommandResult::Continue
}
