use colored::Colorize;
use envstore::{classify, load, DotenvConfig, DotenvError, FileSource, LineKind, TextSource};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("list") => list(path_arg(args.next())),
        Some("get") => match args.next() {
            Some(key) => get(&key, path_arg(args.next())),
            None => {
                eprintln!("usage: envstore-cli get KEY [PATH]");
                ExitCode::FAILURE
            }
        },
        Some("check") => check(path_arg(args.next())),
        Some(arg) => {
            println!("unknown arg: {}. Available: list, get, check", arg);
            ExitCode::FAILURE
        }
        None => {
            println!("Usage: envstore-cli [command] [PATH]");
            println!("Commands:");
            println!("  list        - Print the entries defined by the file");
            println!("  get KEY     - Print one value, falling back to the host environment");
            println!("  check       - Report malformed lines");
            println!("PATH defaults to ./.env");
            ExitCode::SUCCESS
        }
    }
}

fn path_arg(arg: Option<String>) -> PathBuf {
    arg.map(PathBuf::from)
        .unwrap_or_else(|| DotenvConfig::default().path())
}

fn config_for(path: PathBuf) -> DotenvConfig {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".env".to_string());
    DotenvConfig::default()
        .with_directory(path)
        .with_filename(filename)
}

fn list(path: PathBuf) -> ExitCode {
    match load(&config_for(path)) {
        Ok(store) => {
            for entry in store.file_entries() {
                println!("{}={}", entry.key().magenta().bold(), entry.value().cyan());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn get(key: &str, path: PathBuf) -> ExitCode {
    match load(&config_for(path).ignore_missing()) {
        Ok(store) => match store.get(key) {
            Some(value) => {
                println!("{}", value);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("✗ {} is not defined", key.magenta().bold());
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(path: PathBuf) -> ExitCode {
    let text = match FileSource::new(&path).read_text() {
        Ok(Some(text)) => text,
        Ok(None) => {
            eprintln!("✗ {}", DotenvError::SourceMissing { path });
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut malformed = 0;
    for (line_number, line, kind) in classify(&text) {
        if kind == LineKind::Malformed {
            malformed += 1;
            println!("{}: {}", line_number.to_string().yellow().bold(), line.red());
        }
    }

    if malformed == 0 {
        println!("✓ {} is well formed", path.display());
        ExitCode::SUCCESS
    } else {
        println!("✗ {} malformed line(s) in {}", malformed, path.display());
        ExitCode::FAILURE
    }
}
