// nori-lookup: Dictionary prefix lookup.
//
// For each input word (arguments, or stdin one per line), prints every
// dictionary entry that is a prefix of the word, with its output. Root-arc
// cache statistics are logged after the dictionary loads.
//
// Usage:
//   nori-lookup [-d DICT] [-r RANGE_JSON] [WORD...]
//
// Options:
//   -d, --dict-path PATH      Dictionary transducer (file or directory)
//   -r, --cache-range JSON    Cached root labels, e.g. {"base":44032,"ceiling":55203}
//   -h, --help                Print help

use std::io::{self, BufRead, Write};

use log::info;

use nori_dict::{CacheRange, TokenInfoFst};
use nori_fst::BytesReader;

fn main() {
    log_init::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, args) = nori_cli::parse_option(&args, "--dict-path", "-d");
    let (range_json, args) = nori_cli::parse_option(&args, "--cache-range", "-r");

    if nori_cli::wants_help(&args) {
        println!("nori-lookup: Dictionary prefix lookup.");
        println!();
        println!("Usage: nori-lookup [-d DICT] [-r RANGE_JSON] [WORD...]");
        println!();
        println!("If WORD arguments are given, looks up each word.");
        println!("Otherwise reads words from stdin (one per line).");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH     Dictionary transducer (file or directory)");
        println!("  -r, --cache-range JSON   Cached root labels (default: Hangul syllables)");
        println!("  -h, --help               Print this help");
        return;
    }

    let range = match range_json {
        Some(json) => nori_cli::parse_cache_range(&json).unwrap_or_else(|e| nori_cli::fatal(&e)),
        None => CacheRange::default(),
    };

    let words: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let dict = nori_cli::load_dictionary(dict_path.as_deref(), range)
        .unwrap_or_else(|e| nori_cli::fatal(&e));
    info!("{}", nori_cli::cache_stats(&dict));
    let mut reader = dict.bytes_reader();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let lookup_word = |word: &str,
                       dict: &TokenInfoFst,
                       reader: &mut BytesReader<'_>,
                       out: &mut io::BufWriter<io::StdoutLock<'_>>| {
        let chars: Vec<char> = word.chars().collect();
        match dict.prefix_matches(&chars, reader) {
            Ok(matches) if matches.is_empty() => {
                let _ = writeln!(out, "{word}: (no match)");
            }
            Ok(matches) => {
                let _ = writeln!(out, "{word}:");
                for m in matches {
                    let entry: String = chars[..m.len].iter().collect();
                    let _ = writeln!(out, "  {entry}\t{}", m.output);
                }
            }
            Err(e) => nori_cli::fatal(&format!("lookup of {word:?} failed: {e}")),
        }
    };

    if words.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("error reading stdin: {e}");
                    break;
                }
            };
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            lookup_word(word, &dict, &mut reader, &mut out);
        }
    } else {
        for word in &words {
            lookup_word(word, &dict, &mut reader, &mut out);
        }
    }
}
