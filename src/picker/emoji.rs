//! Emoji mood game: a themed prompt with six options per draw.

use serde::Serialize;

use super::random::{RandomSource, shuffle};

pub const OPTIONS_PER_PROMPT: usize = 6;
pub const OPTIONS_PER_THEME: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EmojiOption {
    pub emoji: &'static str,
    pub caption: &'static str,
}

#[derive(Debug)]
pub struct EmojiTheme {
    pub key: &'static str,
    pub prompt: &'static str,
    pub options: [EmojiOption; OPTIONS_PER_THEME],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmojiAnnotation {
    pub theme: &'static str,
    pub prompt: &'static str,
    pub options: Vec<EmojiOption>,
}

const fn opt(emoji: &'static str, caption: &'static str) -> EmojiOption {
    EmojiOption { emoji, caption }
}

pub static THEMES: [EmojiTheme; 3] = [
    EmojiTheme {
        key: "animals",
        prompt: "Pick an animal that describes you today:",
        options: [
            opt("🦁", "Lion - natural born leader"),
            opt("🦊", "Fox - smart and adaptable"),
            opt("🐢", "Turtle - steady and reliable"),
            opt("🦋", "Butterfly - in transformation"),
            opt("🦉", "Owl - night thinker"),
            opt("🐝", "Bee - super productive"),
            opt("🦅", "Eagle - high achiever"),
            opt("🐼", "Panda - chill and relaxed"),
            opt("🐬", "Dolphin - playful and friendly"),
            opt("🦄", "Unicorn - feeling special"),
            opt("🐌", "Snail - taking it slow"),
            opt("🦆", "Duck - going with the flow"),
            opt("🦁", "Lion - feeling powerful"),
            opt("🐵", "Monkey - full of energy"),
            opt("🦈", "Shark - unstoppable"),
        ],
    },
    EmojiTheme {
        key: "transport",
        prompt: "Pick a transport that matches your energy today:",
        options: [
            opt("🚀", "Rocket - sky-high energy"),
            opt("🚂", "Train - steady and reliable"),
            opt("🚲", "Bicycle - eco-friendly pace"),
            opt("🏃", "Runner - self-powered"),
            opt("🚗", "Car - in control"),
            opt("🛵", "Scooter - quick and agile"),
            opt("🚁", "Helicopter - overseeing everything"),
            opt("🚶", "Walking - taking it easy"),
            opt("⛵", "Sailboat - going with the flow"),
            opt("🏎️", "Race car - super charged"),
            opt("🚌", "Bus - team player"),
            opt("🛸", "UFO - feeling otherworldly"),
            opt("🚤", "Speedboat - cutting through"),
            opt("🦽", "Wheelchair - persistent"),
            opt("🛹", "Skateboard - cool and casual"),
        ],
    },
    EmojiTheme {
        key: "sports",
        prompt: "Which sport describes you today?",
        options: [
            opt("⚽", "Soccer - team player"),
            opt("🎾", "Tennis - precise and focused"),
            opt("🏊‍♂️", "Swimming - going with the flow"),
            opt("🏃‍♂️", "Running - on my own path"),
            opt("🧗‍♀️", "Climbing - overcoming challenges"),
            opt("🏄‍♂️", "Surfing - riding the waves"),
            opt("🤸‍♂️", "Gymnastics - flexible and balanced"),
            opt("🏋️‍♂️", "Weight lifting - feeling strong"),
            opt("🎯", "Darts - focused on targets"),
            opt("⛳", "Golf - strategic and patient"),
            opt("🥋", "Martial arts - disciplined"),
            opt("🧘‍♂️", "Yoga - mindful and centered"),
            opt("🤾‍♂️", "Handball - dynamic and fast"),
            opt("🏹", "Archery - aiming high"),
            opt("🏂", "Snowboarding - adventurous"),
        ],
    },
];

pub fn generate_prompt<R: RandomSource + ?Sized>(rng: &mut R) -> EmojiAnnotation {
    let theme = &THEMES[rng.index(THEMES.len())];

    let mut deck = theme.options;
    shuffle(&mut deck, rng);

    EmojiAnnotation {
        theme: theme.key,
        prompt: theme.prompt,
        options: deck[..OPTIONS_PER_PROMPT].to_vec(),
    }
}
