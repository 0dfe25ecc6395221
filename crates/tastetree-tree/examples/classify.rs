use std::sync::Arc;
use tastetree_core::{AttributeUniverse, Feedback, Item};
use tastetree_tree::DecisionTree;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let universe = Arc::new(AttributeUniverse::new([
        "long_title",
        "weekend",
        "many_images",
    ])?);
    let item = |key: &str, attributes: &[&str]| -> Result<Arc<Item>, tastetree_core::CoreError> {
        Ok(Arc::new(Item::new(key, attributes, &universe)?))
    };

    let mut feedback = Feedback::new();
    feedback.record(item("https://e.org/1", &["weekend", "many_images"])?, true);
    feedback.record(item("https://e.org/2", &["long_title"])?, false);
    feedback.record(item("https://e.org/3", &["many_images"])?, true);
    feedback.record(item("https://e.org/4", &[])?, false);

    let tree = DecisionTree::train(Arc::clone(&universe), &feedback);
    println!("{tree}\n");
    println!("{}", serde_json::to_string_pretty(&tree.snapshot())?);

    let candidate = item("https://e.org/5", &["many_images", "long_title"])?;
    println!("recommend {candidate}: {}", tree.predict(&candidate));
    Ok(())
}
