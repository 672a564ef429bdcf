// nori-cli: shared utilities for CLI tools.

use std::io::BufRead;
use std::path::PathBuf;
use std::process;

use log::info;
use nori_dict::{CacheRange, DictError, TokenInfoFst};
use nori_fst::Fst;
use nori_fst::compile::Builder;

/// Default dictionary file name.
pub const DICT_FILE: &str = "dict.fst";

/// Search for the dictionary transducer and wrap it with a root-arc cache.
///
/// Search order:
/// 1. `dict_path` argument (a file, or a directory containing `dict.fst`)
/// 2. `NORI_FST_PATH` environment variable (same rules)
/// 3. `dict.fst` in the current working directory
pub fn load_dictionary(dict_path: Option<&str>, range: CacheRange) -> Result<TokenInfoFst, String> {
    let candidates = build_search_paths(dict_path);

    for path in &candidates {
        if path.is_file() {
            let data = std::fs::read(path)
                .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
            let fst = Fst::from_bytes(&data)
                .map_err(|e| format!("failed to load {}: {}", path.display(), e))?;
            info!("loaded {} ({} arcs)", path.display(), fst.arc_count());
            return TokenInfoFst::with_range(fst, range)
                .map_err(|e: DictError| format!("failed to build dictionary: {e}"));
        }
    }

    Err(format!(
        "could not find {} in any of the search paths:\n{}",
        DICT_FILE,
        candidates
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of candidate dictionary files.
fn build_search_paths(dict_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    let mut push_candidate = |p: PathBuf| {
        if p.is_dir() {
            paths.push(p.join(DICT_FILE));
        } else {
            paths.push(p);
        }
    };

    if let Some(p) = dict_path {
        push_candidate(PathBuf::from(p));
    }

    if let Ok(env_path) = std::env::var("NORI_FST_PATH") {
        push_candidate(PathBuf::from(env_path));
    }

    // Fallback for local development
    if let Ok(cwd) = std::env::current_dir() {
        push_candidate(cwd.join(DICT_FILE));
    }

    paths
}

/// Parse a `--name=VALUE` or `--name VALUE` / `-s VALUE` option.
///
/// Returns `(value, remaining_args)`.
pub fn parse_option(args: &[String], long: &str, short: &str) -> (Option<String>, Vec<String>) {
    let prefix = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == long || arg == short {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                fatal(&format!("{arg} requires a value"));
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Parse a cache range given as JSON, e.g. `{"base":44032,"ceiling":55203}`.
pub fn parse_cache_range(json: &str) -> Result<CacheRange, String> {
    let range: CacheRange =
        serde_json::from_str(json).map_err(|e| format!("invalid cache range {json:?}: {e}"))?;
    range.validate().map_err(|e| e.to_string())?;
    Ok(range)
}

/// Compile `entry<TAB>output` lines into a serialized transducer.
///
/// Empty lines and lines starting with `#` are skipped.
pub fn compile_entries(input: impl BufRead) -> Result<(Vec<u8>, usize), String> {
    let mut builder = Builder::new();

    for (line_no, line) in input.lines().enumerate() {
        let line = line.map_err(|e| format!("read error: {e}"))?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (entry, output) = line
            .split_once('\t')
            .ok_or_else(|| format!("line {}: expected entry<TAB>output", line_no + 1))?;
        let output: i64 = output
            .trim()
            .parse()
            .map_err(|e| format!("line {}: invalid output {output:?}: {e}", line_no + 1))?;
        builder
            .insert(entry, output)
            .map_err(|e| format!("line {}: {e}", line_no + 1))?;
    }

    let count = builder.len();
    Ok((builder.finish(), count))
}

/// One-line summary of the root-arc cache, e.g.
/// `root cache 0xAC00..=0xD7A3: 2350 of 11172 labels cached`.
pub fn cache_stats(dict: &TokenInfoFst) -> String {
    let range = dict.cache_range();
    format!(
        "root cache {:#06X}..={:#06X}: {} of {} labels cached",
        range.base,
        range.ceiling,
        dict.cached_arc_count(),
        dict.cached_len()
    )
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_short_option() {
        let (value, rest) = parse_option(&args(&["-d", "x.fst", "한국"]), "--dict-path", "-d");
        assert_eq!(value.as_deref(), Some("x.fst"));
        assert_eq!(rest, args(&["한국"]));
    }

    #[test]
    fn parse_long_option_with_equals() {
        let (value, rest) = parse_option(&args(&["a", "--output=out.fst"]), "--output", "-o");
        assert_eq!(value.as_deref(), Some("out.fst"));
        assert_eq!(rest, args(&["a"]));
    }

    #[test]
    fn missing_option() {
        let (value, rest) = parse_option(&args(&["a", "b"]), "--dict-path", "-d");
        assert!(value.is_none());
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn help_flag() {
        assert!(wants_help(&args(&["x", "-h"])));
        assert!(!wants_help(&args(&["x"])));
    }

    #[test]
    fn cache_range_json() {
        let range = parse_cache_range(r#"{"base":97,"ceiling":122}"#).unwrap();
        assert_eq!(range, CacheRange::new(97, 122));
        assert!(parse_cache_range(r#"{"base":122,"ceiling":97}"#).is_err());
        assert!(parse_cache_range("not json").is_err());
    }

    #[test]
    fn compile_tsv() {
        let input = "# comment\n한국\t20\n한\t10\n\n국어\t-5\n";
        let (data, count) = compile_entries(input.as_bytes()).unwrap();
        assert_eq!(count, 3);

        let dict = TokenInfoFst::from_bytes(&data).unwrap();
        let mut reader = dict.bytes_reader();
        let text: Vec<char> = "한국".chars().collect();
        assert_eq!(dict.get(&text, &mut reader).unwrap(), Some(20));
        let text: Vec<char> = "국어".chars().collect();
        assert_eq!(dict.get(&text, &mut reader).unwrap(), Some(-5));
    }

    #[test]
    fn cache_stats_line() {
        let (data, _) = compile_entries("a\t1\nc\t2\nz\t3\n".as_bytes()).unwrap();
        let fst = Fst::from_bytes(&data).unwrap();
        let dict = TokenInfoFst::with_range(fst, CacheRange::new(0x61, 0x7A)).unwrap();
        assert_eq!(cache_stats(&dict), "root cache 0x0061..=0x007A: 3 of 26 labels cached");
    }

    #[test]
    fn compile_rejects_bad_lines() {
        let err = compile_entries("한국 20\n".as_bytes()).unwrap_err();
        assert!(err.contains("line 1"));
        let err = compile_entries("한국\tabc\n".as_bytes()).unwrap_err();
        assert!(err.contains("invalid output"));
        let err = compile_entries("가\t1\n가\t2\n".as_bytes()).unwrap_err();
        assert!(err.contains("line 2"));
    }

    #[test]
    fn explicit_path_comes_first() {
        let paths = build_search_paths(Some("/nonexistent/custom.fst"));
        assert_eq!(paths[0], PathBuf::from("/nonexistent/custom.fst"));
        assert!(paths.last().unwrap().ends_with(DICT_FILE));
    }
}
