use tfidf_pipeline::classifier::split::select;
use tfidf_pipeline::{deserialize, serialize, train_test_split, Label, Model, SpamFilter, SpamOptions, SplitOptions};

const MESSAGES: &[(&str, &str)] = &[
    ("spam", "WINNER!! You have been selected to receive a free prize, call now"),
    ("spam", "Free entry in a weekly competition to win cash, text WIN to 87121"),
    ("spam", "URGENT! Your mobile number has won a 2000 bonus prize, claim today"),
    ("spam", "Congratulations, you have won a free holiday voucher, reply CLAIM"),
    ("spam", "Cash prize waiting for you, call our hotline to claim your reward"),
    ("ham", "Are we still meeting for lunch tomorrow?"),
    ("ham", "I'll call you when I get home from work"),
    ("ham", "Can you pick up some milk on the way back"),
    ("ham", "Sorry, running late. See you at the station"),
    ("ham", "Happy birthday! Hope you have a great day"),
];

fn main() -> tfidf_pipeline::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut labelled: Vec<(&str, Label)> = Vec::with_capacity(MESSAGES.len());
    for (label, text) in MESSAGES {
        labelled.push((*text, label.parse()?));
    }

    let split = SplitOptions { test_ratio: 0.3, seed: 42 };
    let (train_idx, test_idx) = train_test_split(labelled.len(), &split)?;
    let options = SpamOptions::default();
    let filter = SpamFilter::train(&select(&labelled, &train_idx), &options)?;

    println!("{}", filter.evaluate(&select(&labelled, &test_idx))?);

    for message in ["Claim your free prize now", "See you at lunch"] {
        let c = filter.classify(message)?;
        println!("{message:<30} -> {} ({:.3})", c.label, c.confidence);
    }

    let (state, model) = filter.into_parts();
    let model_bytes = serialize(&model)?;
    let state_bytes = serialize(&state)?;
    println!("snapshot sizes: encoder {} bytes, model {} bytes", state_bytes.len(), model_bytes.len());
    let restored = SpamFilter::from_parts(deserialize(&state_bytes)?, deserialize::<Model>(&model_bytes)?, &options)?;
    println!("restored: {:?}", restored.classify("win cash now")?);
    Ok(())
}
