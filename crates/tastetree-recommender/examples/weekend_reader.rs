//! Builds a tiny catalog, trains two readers and prints what they get.
//!
//! Run with: cargo run -p tastetree-recommender --example weekend_reader

use std::sync::Arc;
use tastetree_core::{AttributeUniverse, Item, User, UserId};
use tastetree_recommender::Recommender;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let universe = Arc::new(AttributeUniverse::new(["weekend", "long_title", "video"])?);

    let mut catalog = Vec::new();
    for i in 0..20 {
        let mut attributes = Vec::new();
        if i % 2 == 0 {
            attributes.push("weekend");
        }
        if i % 3 == 0 {
            attributes.push("long_title");
        }
        if i % 5 == 0 {
            attributes.push("video");
        }
        let key = format!("https://news.example/{i}");
        catalog.push(Arc::new(Item::new(key, attributes, &universe)?));
    }

    let mut weekend_reader = User::new(UserId(1));
    weekend_reader.like_all([Arc::clone(&catalog[2]), Arc::clone(&catalog[4])]);
    weekend_reader.dislike_all([Arc::clone(&catalog[1]), Arc::clone(&catalog[7])]);

    let mut video_fan = User::new(UserId(2));
    video_fan.like(Arc::clone(&catalog[5]));
    video_fan.dislike(Arc::clone(&catalog[3]));

    let users = [weekend_reader, video_fan];
    let mut recommender = Recommender::seeded(Arc::clone(&universe), users, catalog.clone(), 7)?;
    print!("{recommender}");

    for id in recommender.user_ids() {
        let picked = recommender.recommend_to_user(id)?;
        println!("User {id}:");
        for item in picked {
            println!("  {item}");
        }
    }

    recommender.users_liked_item(&[UserId(2)], &catalog[9])?;
    let audience = recommender.recommend_item_to_users(&catalog[15]);
    println!("{} would be pushed to {audience:?}", catalog[15]);
    Ok(())
}
