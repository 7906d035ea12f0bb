extern crate clap;

use clap::{App, Arg, SubCommand};
use std::fs::File;
use std::io::{BufRead, BufReader};

use xapian_spelling::{SpellingBackend, SpellingConfig, SpellingTable};

fn load_vocabulary(config: &SpellingConfig, path: &str) -> xapian_spelling::SpellingStore {
    let mut store = config.build_store();
    let file = File::open(path).unwrap_or_else(|e| panic!("unable to open vocabulary file {}: {}", path, e));
    for line in BufReader::new(file).lines() {
        let line = line.expect("reading vocabulary line");
        let mut parts = line.split_whitespace();
        let word = match parts.next() {
            Some(w) => w,
            None => continue,
        };
        let freq: u32 = parts.next().and_then(|f| f.parse().ok()).unwrap_or(1);
        store.add_word(word, freq, "").unwrap_or_else(|e| eprintln!("skipping {:?}: {}", word, e));
    }
    store.flush().expect("flushing vocabulary into the in-memory store");
    store
}

fn main() {
    let matches = App::new("spellcheck")
        .version("0.1.0")
        .about("Single-word and sequence spelling correction over a small in-memory index")
        .arg(
            Arg::with_name("vocabulary")
                .short("v")
                .long("vocabulary")
                .value_name("FILE")
                .help("Whitespace-separated word/frequency pairs, one per line")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("backend")
                .short("b")
                .long("backend")
                .value_name("ngram|fastss")
                .help("Fragment-index backend to use")
                .takes_value(true)
                .default_value("ngram"),
        )
        .arg(Arg::with_name("debug").long("debug").help("Enable diagnostic logging to stderr"))
        .subcommand(
            SubCommand::with_name("word")
                .about("Correct a single word")
                .arg(Arg::with_name("WORD").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("sequence")
                .about("Correct a whitespace-tokenized sequence")
                .arg(Arg::with_name("TOKENS").required(true).multiple(true)),
        )
        .get_matches();

    let backend = match matches.value_of("backend").unwrap() {
        "fastss" => SpellingBackend::FastSs,
        _ => SpellingBackend::NGram,
    };
    let config = SpellingConfig::default().with_backend(backend).with_debug(matches.is_present("debug"));
    let mut store = load_vocabulary(&config, matches.value_of("vocabulary").unwrap());

    match matches.subcommand() {
        ("word", Some(sub)) => {
            let word = sub.value_of("WORD").unwrap();
            let results = config.correct_word(&mut store, word, "");
            if results.is_empty() {
                println!("{}\t(no suggestions)", word);
            }
            for candidate in results {
                println!("{}\t{}\t{:.3}\t{}", word, candidate.word, candidate.distance, candidate.freq);
            }
        }
        ("sequence", Some(sub)) => {
            let tokens: Vec<String> = sub.values_of("TOKENS").unwrap().map(String::from).collect();
            match config.correct_sequence(&mut store, &tokens, "") {
                Some(corrected) => println!("{}", corrected.join(" ")),
                None => println!("{}", tokens.join(" ")),
            }
        }
        _ => {
            eprintln!("no subcommand given; use `spellcheck word <WORD>` or `spellcheck sequence <TOKENS...>`");
            std::process::exit(1);
        }
    }
}
