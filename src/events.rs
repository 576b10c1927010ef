//! Events Module
//!
//! Ambient happenings rolled after time advances. Each event has an hour
//! window (possibly wrapping midnight) and a 30% chance when its window is
//! open; candidates are checked in table order and the first success that
//! fits the current location wins.

use rand::Rng;

use crate::location::LocationKind;

struct AmbientEvent {
    id: &'static str,
    message: &'static str,
    /// Hour window [start, end), wrapping when start > end.
    window: (u64, u64),
}

const EVENTS: &[AmbientEvent] = &[
    // Dawn
    AmbientEvent {
        id: "wolf_howl",
        message: "You hear distant wolf howls as the sun rises",
        window: (5, 7),
    },
    AmbientEvent {
        id: "bird_song",
        message: "Birds begin their morning songs",
        window: (4, 8),
    },
    // Day
    AmbientEvent {
        id: "merchant",
        message: "A traveling merchant appears",
        window: (9, 17),
    },
    AmbientEvent {
        id: "butterfly",
        message: "Colorful butterflies flutter nearby",
        window: (10, 16),
    },
    // Dusk
    AmbientEvent {
        id: "bat_swarm",
        message: "Bats emerge from the caves",
        window: (18, 20),
    },
    AmbientEvent {
        id: "sunset",
        message: "The setting sun casts long shadows",
        window: (17, 19),
    },
    // Night
    AmbientEvent {
        id: "ghost",
        message: "A ghostly figure appears in the distance",
        window: (22, 4),
    },
    AmbientEvent {
        id: "owl",
        message: "An owl hoots somewhere in the darkness",
        window: (20, 4),
    },
];

/// Roll for an ambient event at the given hour and location.
pub fn check(hour: u64, location: LocationKind, rng: &mut impl Rng) -> Option<&'static str> {
    for event in EVENTS {
        if !in_window(hour, event.window.0, event.window.1) {
            continue;
        }
        // An in-window candidate burns its roll even if the location then
        // disqualifies it.
        if !rng.random_bool(0.3) {
            continue;
        }
        if !fits_location(event.id, location) {
            continue;
        }
        return Some(event.message);
    }
    None
}

fn in_window(hour: u64, start: u64, end: u64) -> bool {
    if start <= end {
        (start..end).contains(&hour)
    } else {
        hour >= start || hour < end
    }
}

fn fits_location(event_id: &str, location: LocationKind) -> bool {
    match event_id {
        "bat_swarm" => location == LocationKind::Cave,
        "butterfly" => location != LocationKind::Cave,
        _ => true,
    }
}
