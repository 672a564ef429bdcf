// nori-compile: Build a dictionary transducer from tab-separated entries.
//
// Reads `entry<TAB>output` lines from FILE (or stdin) and writes the
// serialized transducer.
//
// Usage:
//   nori-compile [-o OUT] [FILE]
//
// Options:
//   -o, --output PATH   Output file (default: dict.fst)
//   -h, --help          Print help

use std::io::{self, BufReader};

use log::info;

fn main() {
    log_init::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (output, args) = nori_cli::parse_option(&args, "--output", "-o");

    if nori_cli::wants_help(&args) {
        println!("nori-compile: Build a dictionary transducer from entry<TAB>output lines.");
        println!();
        println!("Usage: nori-compile [-o OUT] [FILE]");
        println!();
        println!("Reads FILE, or stdin when no FILE is given.");
        println!();
        println!("Options:");
        println!("  -o, --output PATH   Output file (default: {})", nori_cli::DICT_FILE);
        println!("  -h, --help          Print this help");
        return;
    }

    let output = output.unwrap_or_else(|| nori_cli::DICT_FILE.to_string());

    let compiled = match args.iter().find(|a| !a.starts_with('-')) {
        Some(path) => {
            let file = std::fs::File::open(path)
                .unwrap_or_else(|e| nori_cli::fatal(&format!("failed to open {path}: {e}")));
            nori_cli::compile_entries(BufReader::new(file))
        }
        None => nori_cli::compile_entries(io::stdin().lock()),
    };
    let (data, count) = compiled.unwrap_or_else(|e| nori_cli::fatal(&e));

    std::fs::write(&output, &data)
        .unwrap_or_else(|e| nori_cli::fatal(&format!("failed to write {output}: {e}")));
    info!("wrote {count} entries ({} bytes) to {output}", data.len());
}
