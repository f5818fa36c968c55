//! The final screen: placeholder duck images instead of search results.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

pub const RESULT_TITLES: &[&str] = &[
    "Oops! Here are ducks instead! 🦆",
    "Search Failed Successfully! 🎉",
    "404: Answer Not Found, But Ducks Found! 🦆",
    "We Tried... Here Are Ducks! 💙",
    "Your Results: 100% Duck! 🦆",
    "Plot Twist: It's All Ducks! ✨",
];

pub const RESULT_SUBTITLES: &[&str] = &[
    "We couldn't figure out what you wanted, but we hope these ducks make you smile!",
    "Our sophisticated AI decided that ducks are the answer to everything.",
    "After extensive analysis, we determined that showing you ducks was the best option.",
    "We gave up trying to understand your query. Please enjoy these ducks instead!",
    "The algorithm has spoken: More ducks, less confusion!",
    "Sometimes the best answer isn't an answer at all. It's ducks.",
];

pub const DUCK_CAPTIONS: &[&str] = &[
    "Look at this adorable duck! 🦆",
    "Ducks make everything better! 💙",
    "Who doesn't love ducks? 🌟",
    "Quack quack! 🎉",
    "This duck gets it! 🦆✨",
    "Duck pics > Search results 🎨",
];

pub const RESULT_MESSAGE: &str = "Backend successfully failed to find relevant results! 🦆";

const DUCK_IMAGE_BASE: &str = "https://random-d.uk/api";
const FIRST_DUCK_ID: u32 = 70;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duck {
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevealSet {
    pub title: String,
    pub subtitle: String,
    pub ducks: Vec<Duck>,
    pub message: String,
}

fn duck_url(id: u32) -> String {
    format!("{DUCK_IMAGE_BASE}/{id}.jpg")
}

/// Random title and subtitle, six ducks in shuffled order.
pub fn reveal(rng: &mut impl Rng) -> RevealSet {
    let mut ducks: Vec<Duck> = DUCK_CAPTIONS
        .iter()
        .zip(FIRST_DUCK_ID..)
        .map(|(caption, id)| Duck {
            url: duck_url(id),
            caption: caption.to_string(),
        })
        .collect();
    ducks.shuffle(rng);

    RevealSet {
        title: RESULT_TITLES[rng.random_range(0..RESULT_TITLES.len())].to_string(),
        subtitle: RESULT_SUBTITLES[rng.random_range(0..RESULT_SUBTITLES.len())].to_string(),
        ducks,
        message: RESULT_MESSAGE.to_string(),
    }
}

/// Shown when anything upstream failed. Deterministic.
pub fn fallback_reveal() -> RevealSet {
    let ducks = (0..3)
        .map(|i| Duck {
            url: duck_url(FIRST_DUCK_ID + i),
            caption: format!("Emergency duck #{}! 🦆", i + 1),
        })
        .collect();
    RevealSet {
        title: "Error! But Ducks to the Rescue! 🦆".to_string(),
        subtitle: "Something went wrong, but we've got backup content!".to_string(),
        ducks,
        message: RESULT_MESSAGE.to_string(),
    }
}
