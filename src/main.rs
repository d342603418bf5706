//! `lyrictext` - extract display-ready lyric lines from a file.
//!
//! Usage:
//!   `lyrictext <file>` prints one display line per output line
//!   `lyrictext <file> --text` prints the normalized plain text
//!   `lyrictext <file> --json` prints the format and lines as JSON

use std::env;
use std::path::Path;
use std::process::ExitCode;

use lyrictext::config::Config;
use lyrictext::error::Result;
use lyrictext::extract;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file> [--json|--text]", args[0]);
        return ExitCode::FAILURE;
    }

    match run(Path::new(&args[1]), &args[2..]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, flags: &[String]) -> Result<()> {
    let config = Config::load()?;
    let raw = fs_err::read_to_string(path)?;

    if flags.iter().any(|f| f == "--text") {
        print!("{}", extract::plain_text(None, &raw));
        if !raw.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    let result = extract::load_lyrics_with(None, &raw, &config.segment);

    if flags.iter().any(|f| f == "--json") {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| lyrictext::error::Error::Msg(e.to_string()))?;
        println!("{json}");
    } else {
        if result.lines.is_empty() {
            tracing::debug!("no display lines extracted from {}", path.display());
        }
        for line in &result.lines {
            println!("{line}");
        }
    }

    Ok(())
}
