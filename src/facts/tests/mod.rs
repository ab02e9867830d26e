use crate::facts::{FactRecord, RawPost, RetainedFields, run};

fn sample_batch() -> Vec<RawPost> {
    vec![
        RawPost::new("TIL that the moon has moonquakes", "http://x", 50, false),
        RawPost::new("TIL something nsfw", "http://y", 100, true),
        RawPost::new("TIL ok", "http://z", 1, false),
    ]
}

#[test]
fn test_end_to_end_batch() {
    let facts = run(&sample_batch(), RetainedFields::ALL);

    assert_eq!(
        facts,
        vec![FactRecord {
            text: "The moon has moonquakes.".to_string(),
            source_url: Some("http://x".to_string()),
            score: Some(50),
        }]
    );
}

#[test]
fn test_end_to_end_without_passthrough_fields() {
    let facts = run(&sample_batch(), RetainedFields::NONE);

    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].text, "The moon has moonquakes.");
    assert!(facts[0].source_url.is_none());
    assert!(facts[0].score.is_none());
}

#[test]
fn test_run_is_repeatable() {
    let batch = sample_batch();
    assert_eq!(
        run(&batch, RetainedFields::ALL),
        run(&batch, RetainedFields::ALL)
    );
}

#[test]
fn test_every_fact_is_a_sentence() {
    let batch = vec![
        RawPost::new("TIL  the   Eiffel tower grows in summer", "http://a", 900, false),
        RawPost::new("Today I Learned that honey never spoils!", "http://b", 12, false),
        RawPost::new("today i learned why cats purr?", "http://c", 10, false),
        RawPost::new("TIL that ", "http://d", 500, false),
        RawPost::new(&"TIL long ".repeat(40), "http://e", 500, false),
    ];

    let facts = run(&batch, RetainedFields::ALL);
    let texts: Vec<_> = facts.iter().map(|f| f.text.as_str()).collect();

    assert_eq!(
        texts,
        vec![
            "The Eiffel tower grows in summer.",
            "Honey never spoils!",
            "Why cats purr?",
        ]
    );
    for fact in &facts {
        assert!(fact.text.starts_with(char::is_uppercase));
        assert!(fact.text.ends_with(['.', '!', '?']));
    }
}
