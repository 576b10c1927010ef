//! Command module
//!
//! Describes possible commands used during gameplay and parses player
//! input into them. Filler words are stripped before matching, so
//! "talk to the wolf" and "talk wolf" parse the same.

use variantly;

/// Words ignored while parsing, wherever they appear.
const FILLER_WORDS: &[&str] = &["a", "an", "the", "at", "to", "with", "using", "from", "in", "on"];

/// Commands that can be executed by the player.
#[derive(Debug, PartialEq, variantly::Variantly)]
pub enum Command {
    Achievements,
    Attack(String),
    Camp,
    Cook(String),
    Drink,
    Drop(String),
    Eat(String),
    Equip(String),
    Equipment,
    Examine(String),
    Feed { target: String, item: String },
    Help,
    Inventory,
    Journal,
    Load(Option<String>),
    Look,
    #[variantly(rename = "movement")]
    Move(String),
    Quests,
    Quit,
    Relieve,
    Rest,
    Save(Option<String>),
    Search(String),
    Stats,
    Status,
    Survey,
    Take(String),
    Talk(String),
    Time,
    Unequip(String),
    Unknown,
    Wait(Option<String>),
}

/// Parses an input string and returns a corresponding `Command` if recognized.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(word))
        .collect();
    match words.as_slice() {
        ["look" | "l"] => Command::Look,
        ["look", rest @ ..] | ["examine" | "read" | "inspect" | "x", rest @ ..] => {
            Command::Examine(rest.join(" "))
        },
        ["go" | "move" | "walk", rest @ ..] => Command::Move(rest.join(" ")),
        [dir @ ("north" | "n" | "south" | "s" | "east" | "e" | "west" | "w")] => {
            Command::Move((*dir).to_string())
        },
        ["take" | "get" | "grab", rest @ ..] => Command::Take(rest.join(" ")),
        ["drop" | "discard", rest @ ..] => Command::Drop(rest.join(" ")),
        ["inventory" | "inv" | "i"] => Command::Inventory,
        ["equip" | "wear" | "wield", rest @ ..] => Command::Equip(rest.join(" ")),
        ["unequip" | "remove", rest @ ..] => Command::Unequip(rest.join(" ")),
        ["equipment" | "gear" | "eq"] => Command::Equipment,
        ["attack" | "fight" | "hit", rest @ ..] => Command::Attack(rest.join(" ")),
        ["talk" | "speak" | "chat", rest @ ..] => Command::Talk(rest.join(" ")),
        ["feed" | "give"] => Command::Feed {
            target: String::new(),
            item: String::new(),
        },
        ["feed" | "give", target, rest @ ..] => Command::Feed {
            target: (*target).to_string(),
            item: rest.join(" "),
        },
        ["search" | "scan", rest @ ..] => Command::Search(rest.join(" ")),
        ["survey"] => Command::Survey,
        ["eat" | "taste", rest @ ..] => Command::Eat(rest.join(" ")),
        ["drink" | "sip"] => Command::Drink,
        ["cook" | "prepare", rest @ ..] => Command::Cook(rest.join(" ")),
        ["camp"] => Command::Camp,
        ["rest"] => Command::Rest,
        ["relieve"] => Command::Relieve,
        ["status"] => Command::Status,
        ["stats"] => Command::Stats,
        ["time"] => Command::Time,
        ["wait"] => Command::Wait(None),
        ["wait", minutes] => Command::Wait(Some((*minutes).to_string())),
        ["quests"] => Command::Quests,
        ["achievements"] => Command::Achievements,
        ["journal"] => Command::Journal,
        ["save"] => Command::Save(None),
        ["save", rest @ ..] => Command::Save(Some(rest.join(" "))),
        ["load"] => Command::Load(None),
        ["load", rest @ ..] => Command::Load(Some(rest.join(" "))),
        ["help" | "h" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        _ => Command::Unknown,
    }
}
