// File: src/bin/dict_shell.rs
//
// Interactive demo shell for the dictionary layer. Type a prefix to see the
// fan-out across the main, contacts and user dictionaries; learned words are
// persisted atomically and picked up again through the reload path.
use crossterm::style::Stylize;
use dict_core::persistence::{discard_temp_files, DictionaryPersister};
use dict_core::stores::{BinaryDictStore, JsonWordListStore};
use dict_core::{
    DictionaryAggregate, Lexicon, NgramContext, ReloadPolicy, ReloadableDictionary,
    StaticDictionary, SuggestedWord,
};
use std::io::{stdin, stdout, Write};
use std::path::Path;
use std::sync::Arc;

const DATA_DIR: &str = "dict_data";
const USER_DICT: &str = "dict_data/user.dict";
const CONTACTS_FILE: &str = "dict_data/contacts.json";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    std::fs::create_dir_all(DATA_DIR).ok();
    // Sweep leftovers from any interrupted write before touching the files.
    if let Ok(removed) = discard_temp_files(Path::new(DATA_DIR)) {
        for path in removed {
            eprintln!("discarded stale temp file: {}", path.display());
        }
    }

    let aggregate = DictionaryAggregate::new();
    aggregate.add_dictionary(Arc::new(StaticDictionary::new("main", seed_vocabulary())));
    aggregate.add_dictionary(Arc::new(ReloadableDictionary::new(
        "user",
        ReloadPolicy::Synchronous,
        BinaryDictStore::new(USER_DICT),
    )));
    if Path::new(CONTACTS_FILE).exists() {
        aggregate.add_dictionary(Arc::new(ReloadableDictionary::new(
            "contacts",
            ReloadPolicy::Synchronous,
            JsonWordListStore::new(CONTACTS_FILE),
        )));
    }

    let persister = DictionaryPersister::new();
    let mut user_words = dict_core::persistence::read_lexicon(Path::new(USER_DICT))
        .unwrap_or_else(|_| Lexicon::new());
    let mut previous_word: Option<String> = None;

    println!("{}", "Predictive dictionary shell".bold());
    println!("Type a prefix for suggestions. Commands: !valid <w>, !learn <w>, exit.");

    loop {
        print!("\n> ");
        stdout().flush().unwrap();
        let mut input = String::new();
        if stdin().read_line(&mut input).unwrap_or(0) == 0 {
            break;
        }
        let line = input.trim();
        let context = match &previous_word {
            Some(word) => NgramContext::with_previous_word(word.clone()),
            None => NgramContext::beginning_of_sentence(),
        };

        match line {
            "exit" => break,
            "" => continue,
            cmd if cmd.starts_with("!valid ") => {
                let word = cmd.trim_start_matches("!valid ").trim();
                let verdict = if aggregate.is_valid_word(word) {
                    "valid".green()
                } else {
                    "unknown".red()
                };
                println!("  '{word}' is {verdict}");
            }
            cmd if cmd.starts_with("!learn ") => {
                let word = cmd.trim_start_matches("!learn ").trim().to_string();
                let freq = user_words.frequency(&word).unwrap_or(0) + 1;
                user_words.insert_unigram(word.clone(), freq);
                if let Some(prev) = &previous_word {
                    user_words.insert_bigram(prev.clone(), word.clone(), 1);
                }
                match persister.write(&user_words, Path::new(USER_DICT)) {
                    Ok(()) => println!("  learned '{word}' (freq {freq})"),
                    Err(err) => eprintln!("  could not persist user dictionary: {err}"),
                }
                previous_word = Some(word);
            }
            prefix => {
                let mut sink: Vec<SuggestedWord> = Vec::new();
                aggregate.get_suggestions(prefix, &context, &mut sink);
                aggregate.get_bigrams(&context, &mut sink);
                sink.sort_by_key(|s| std::cmp::Reverse(s.score));
                if sink.is_empty() {
                    println!("  no suggestions");
                } else {
                    for suggestion in sink.iter().take(8) {
                        println!(
                            "  {} (score {}, {})",
                            suggestion.word.clone().bold(),
                            suggestion.score,
                            suggestion.dict_type
                        );
                    }
                }
            }
        }
    }

    if let Err(err) = aggregate.close() {
        eprintln!("shutdown: {err}");
    }
}

/// Tiny built-in vocabulary so the shell is usable before anything is
/// learned.
fn seed_vocabulary() -> Lexicon {
    let mut lex = Lexicon::new();
    for (word, freq) in [
        ("the", 5000u64),
        ("they", 2100),
        ("there", 1800),
        ("cat", 400),
        ("catalog", 120),
        ("hello", 900),
        ("world", 700),
    ] {
        lex.insert_unigram(word, freq);
    }
    lex.insert_bigram("hello", "world", 300);
    lex.insert_bigram("the", "cat", 150);
    lex
}
