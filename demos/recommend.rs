use tfidf_pipeline::{MovieRecord, Recommendation, Recommender, RecommenderOptions};

fn main() -> tfidf_pipeline::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let movies = vec![
        MovieRecord::new(19995, "Avatar")
            .with_overview("A paraplegic Marine dispatched to the moon Pandora on a unique mission")
            .with_genres(["Action", "Adventure", "Fantasy", "Science Fiction"])
            .with_keywords(["culture clash", "future", "space war", "space colony"])
            .with_cast(["Sam Worthington", "Zoe Saldana", "Sigourney Weaver"])
            .with_director("James Cameron"),
        MovieRecord::new(1726, "Iron Man")
            .with_overview("An industrialist builds a high-tech suit of armor to escape captivity")
            .with_genres(["Action", "Science Fiction", "Adventure"])
            .with_keywords(["superhero", "weapon", "future"])
            .with_cast(["Robert Downey Jr.", "Terrence Howard", "Jeff Bridges"])
            .with_director("Jon Favreau"),
        MovieRecord::new(597, "Titanic")
            .with_overview("A young aristocrat falls in love with a poor artist aboard the ill-fated ship")
            .with_genres(["Drama", "Romance"])
            .with_keywords(["shipwreck", "love", "ocean"])
            .with_cast(["Kate Winslet", "Leonardo DiCaprio", "Frances Fisher"])
            .with_director("James Cameron"),
        MovieRecord::new(679, "Aliens")
            .with_overview("Ripley returns to the planet with a unit of space marines")
            .with_genres(["Horror", "Action", "Science Fiction"])
            .with_keywords(["alien", "space marine", "future"])
            .with_cast(["Sigourney Weaver", "Michael Biehn", "James Remar"])
            .with_director("James Cameron"),
        MovieRecord::new(11036, "The Notebook")
            .with_overview("A poor young man falls in love with a rich young woman")
            .with_genres(["Romance", "Drama"])
            .with_keywords(["love", "summer"])
            .with_cast(["Rachel McAdams", "Ryan Gosling", "Gena Rowlands"])
            .with_director("Nick Cassavetes"),
    ];

    let recommender = Recommender::fit(&movies, &RecommenderOptions::default())?;
    for title in ["Avatar", "Titanic", "Nonexistent Movie"] {
        match recommender.recommend(title) {
            Recommendation::Found(titles) => println!("{title}: {}", titles.join(", ")),
            Recommendation::NotFound => println!("{title}: not in catalogue"),
        }
    }
    for (title, score) in recommender.recommend_scored("Aliens")? {
        println!("  {score:.4}  {title}");
    }
    Ok(())
}
