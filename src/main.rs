use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use backtrack_re::{compile_with, Backtrack, Dialect, Lexer, Options};
use clap::Parser;

/// Match a whole line of text against a pattern.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pattern to match
    #[arg(short = 'E', long, value_name = "PATTERN")]
    pattern: String,

    /// Text to match; read one line from stdin if omitted
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Reject malformed patterns and non-alphabetic literals
    #[arg(long)]
    strict: bool,

    /// Retry the right branch of `|` when the rest of the pattern fails
    #[arg(long)]
    full_backtracking: bool,

    /// Print what each group captured
    #[arg(short, long)]
    captures: bool,

    /// Dump tokens and the parsed tree to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> Options {
        let mut options = Options::default();
        if self.strict {
            options = options.with_dialect(Dialect::Strict);
        }
        if self.full_backtracking {
            options = options.with_backtrack(Backtrack::Full);
        }
        options
    }
}

// Usage: echo <input_text> | backtrack-re -E <pattern>
fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let options = args.options();

    if args.verbose {
        for token in Lexer::new(&args.pattern, options.dialect).flatten() {
            eprintln!("token: {token:?}");
        }
    }

    let pattern = compile_with(&args.pattern, options)
        .with_context(|| format!("invalid pattern {:?}", args.pattern))?;

    if args.verbose {
        eprintln!("tree: {:#?}", pattern.root());
        for (pc, inst) in pattern.program().insts().iter().enumerate() {
            eprintln!("{pc:>4}: {inst:?}");
        }
    }

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut line = String::new();
            io::stdin()
                .read_line(&mut line)
                .context("failed to read text from stdin")?;
            // Trim trailing newline so the match covers only the line
            line.trim_end_matches(['\n', '\r']).to_string()
        }
    };

    let Some(caps) = pattern.captures(&text) else {
        println!("No match.");
        return Ok(false);
    };

    println!("Match!");
    if args.captures {
        for (index, capture) in caps.iter().enumerate() {
            match capture {
                Some(s) => println!("{index}: {s:?}"),
                None => println!("{index}: -"),
            }
        }
    }
    Ok(true)
}
