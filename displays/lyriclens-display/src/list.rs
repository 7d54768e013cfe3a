//! Text-list fallback for bridges without image containers
//!
//! Four list containers stacked top to bottom: a title block (track name,
//! then artist with a text progress bar) and one container per lyric line.
//! The glasses lay the text out themselves, so lines are shortened and
//! wrapped by character count.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use lyriclens_core::{DeviceProfile, ListContainer, ListItems};

use crate::compositor::{non_empty, FrameDescription};
use crate::fit::{format_time, text_progress_bar, truncate, wrap_line};

/// Container names, top to bottom
pub const CONTAINER_NAMES: [&str; 4] = ["title", "prev", "current", "next"];

const TITLE: usize = 0;
const PREV: usize = 1;
const CURRENT: usize = 2;

fn container(profile: &DeviceProfile, slot: usize, line_height: u32, names: Vec<String>) -> ListContainer {
    let list = &profile.list;
    let (y, height) = match slot {
        TITLE => (list.title_y, list.title_height),
        PREV => (list.prev_y, line_height),
        CURRENT => (list.current_y, line_height),
        _ => (list.next_y, line_height),
    };
    ListContainer {
        id: profile.container_id.saturating_add(slot as u32),
        name: String::from(CONTAINER_NAMES[slot]),
        x: list.x,
        y,
        width: list.width,
        height,
        items: ListItems {
            item_width: list.item_width,
            select_border: matches!(slot, TITLE | CURRENT),
            names,
        },
        event_capture: slot == CURRENT,
    }
}

fn build(profile: &DeviceProfile, line_height: u32, items: [Vec<String>; 4]) -> Vec<ListContainer> {
    items
        .into_iter()
        .enumerate()
        .map(|(slot, names)| container(profile, slot, line_height, names))
        .collect()
}

/// Containers for the start-up page, showing the splash text
pub fn startup_containers(profile: &DeviceProfile) -> Vec<ListContainer> {
    let splash = &profile.splash;
    build(
        profile,
        profile.list.startup_line_height,
        [
            vec![String::from(splash.title.as_str()), String::new()],
            vec![String::new()],
            vec![String::from(splash.subtitle.as_str())],
            vec![String::new()],
        ],
    )
}

/// Title block items; empty when no track is playing
pub fn title_items(profile: &DeviceProfile, desc: &FrameDescription<'_>) -> Vec<String> {
    if desc.track.is_empty() {
        return Vec::new();
    }
    let max = profile.list.max_line_chars;
    let status = format!(
        "{}    {} {} {}",
        desc.artist,
        format_time(desc.elapsed_ms),
        text_progress_bar(desc.progress, profile.list.progress_cells),
        format_time(desc.total_ms),
    );
    vec![
        truncate(desc.track, max).into_owned(),
        truncate(&status, max).into_owned(),
    ]
}

/// Containers for one frame in list mode
pub fn frame_containers(profile: &DeviceProfile, desc: &FrameDescription<'_>) -> Vec<ListContainer> {
    let max = profile.list.max_line_chars;
    let lyric = |line: Option<&str>| match non_empty(line) {
        Some(text) => wrap_line(text, max),
        None => vec![String::new()],
    };
    build(
        profile,
        profile.list.line_height,
        [
            title_items(profile, desc),
            lyric(desc.prev_line),
            wrap_line(desc.current_line.unwrap_or(""), max),
            lyric(desc.next_line),
        ],
    )
}
