use std::path::{Path, PathBuf};

pub const HEADER: &str = "SentimentText\tSentiment";

pub const POSITIVE: &[&str] = &[
    "good movie",
    "a wonderful film with great acting",
    "i loved every minute of it",
    "great story and a brilliant cast",
    "good fun and a lovely ending",
    "an excellent and touching drama",
    "really good and very enjoyable",
    "superb performances and good music",
];

pub const NEGATIVE: &[&str] = &[
    "bad movie",
    "a terrible film with awful acting",
    "i hated every minute of it",
    "boring story and a weak cast",
    "bad fun and a dreadful ending",
    "a poor and lifeless drama",
    "really bad and very dull",
    "horrible performances and bad music",
];

/// Write `rows` under a header line and return the file path.
pub fn write_tsv(dir: &Path, name: &str, rows: &[(&str, bool)]) -> PathBuf {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for (text, label) in rows {
        contents.push_str(text);
        contents.push('\t');
        contents.push_str(if *label { "1" } else { "0" });
        contents.push('\n');
    }
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write tsv fixture");
    path
}

/// Alternating positive and negative rows, `count` in total.
pub fn polar_rows(count: usize) -> Vec<(&'static str, bool)> {
    POSITIVE
        .iter()
        .zip(NEGATIVE.iter())
        .flat_map(|(pos, neg)| [(*pos, true), (*neg, false)])
        .cycle()
        .take(count)
        .collect()
}
