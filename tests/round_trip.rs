// Integration: persist a dictionary, reload it through the reload path, and
// query it through an aggregate alongside a second source.
use dict_core::persistence::DictionaryPersister;
use dict_core::stores::{BinaryDictStore, JsonWordListStore};
use dict_core::{
    DictionaryAggregate, DictionarySource, Lexicon, NgramContext, ReloadPolicy,
    ReloadableDictionary, SuggestedWord,
};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn main_vocabulary() -> Lexicon {
    let mut lex = Lexicon::new();
    lex.insert_unigram("cat", 400);
    lex.insert_unigram("catalog", 120);
    lex.insert_unigram("hello", 900);
    lex.insert_bigram("hello", "world", 300);
    lex
}

#[test]
fn persisted_dictionary_round_trips_through_the_reload_path() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("main.dict");
    let original = main_vocabulary();
    DictionaryPersister::new().write(&original, &target).unwrap();

    let dict = ReloadableDictionary::new(
        "main",
        ReloadPolicy::Synchronous,
        BinaryDictStore::new(&target),
    );

    // Every word written is valid after reload, at the same frequency.
    for (word, freq) in original.iter_unigrams() {
        assert!(dict.is_valid_word(word), "lost word '{word}'");
        let mut sink: Vec<SuggestedWord> = Vec::new();
        dict.get_suggestions(word, &NgramContext::beginning_of_sentence(), &mut sink);
        let exact = sink.iter().find(|s| s.word == word).unwrap();
        assert_eq!(exact.score, freq, "frequency drifted for '{word}'");
    }
    assert!(!dict.is_valid_word("xyzzy"));

    // Bigrams survive too.
    let mut sink: Vec<SuggestedWord> = Vec::new();
    dict.get_bigrams(&NgramContext::with_previous_word("hello"), &mut sink);
    assert_eq!(sink.len(), 1);
    assert_eq!((sink[0].word.as_str(), sink[0].score), ("world", 300));
}

#[test]
fn rewritten_file_is_picked_up_by_the_next_query() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("user.dict");
    let persister = DictionaryPersister::new();
    persister.write(&main_vocabulary(), &target).unwrap();

    let dict = ReloadableDictionary::new(
        "user",
        ReloadPolicy::Synchronous,
        BinaryDictStore::new(&target),
    );
    assert!(dict.is_valid_word("cat"));
    assert!(!dict.is_valid_word("namaste"));

    let mut updated = main_vocabulary();
    updated.insert_unigram("namaste", 77);
    persister.write(&updated, &target).unwrap();

    assert!(dict.is_valid_word("namaste"));
}

#[test]
fn aggregate_of_main_and_contacts_sources() {
    let dir = tempdir().unwrap();

    let main_path = dir.path().join("main.dict");
    DictionaryPersister::new()
        .write(&main_vocabulary(), &main_path)
        .unwrap();

    let contacts_path = dir.path().join("contacts.json");
    fs::write(
        &contacts_path,
        r#"[{"word": "Alice", "frequency": 10}, {"word": "Bob", "frequency": 4}]"#,
    )
    .unwrap();

    let aggregate = DictionaryAggregate::new();
    aggregate.add_dictionary(Arc::new(ReloadableDictionary::new(
        "main",
        ReloadPolicy::Synchronous,
        BinaryDictStore::new(&main_path),
    )));
    aggregate.add_dictionary(Arc::new(ReloadableDictionary::new(
        "contacts",
        ReloadPolicy::Synchronous,
        JsonWordListStore::new(&contacts_path),
    )));

    // Non-overlapping vocabularies: each word is only in one source, and the
    // aggregate validates both.
    assert!(aggregate.is_valid_word("cat"));
    assert!(aggregate.is_valid_word("Alice"));
    assert!(!aggregate.is_valid_word("xyzzy"));

    let mut sink: Vec<SuggestedWord> = Vec::new();
    aggregate.get_suggestions("ca", &NgramContext::beginning_of_sentence(), &mut sink);
    let mut words: Vec<_> = sink.iter().map(|s| s.word.as_str()).collect();
    words.sort_unstable();
    assert_eq!(words, ["cat", "catalog"]);

    aggregate.close().unwrap();
    assert!(!aggregate.is_valid_word("cat"));
}
